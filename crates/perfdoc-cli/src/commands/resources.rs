use crate::{OutputFormat, csv_field};
use anyhow::{Context, Result};
use perfdoc_core::aggregate::ResourceCollector;
use perfdoc_core::filter::ResourceFilter;
use perfdoc_core::har::HarReader;
use perfdoc_core::metrics::{ResourceEntry, ResourceType};
use std::path::Path;

/// Normalize the resources of a HAR file and keep those matching `filter`
pub fn collect_resources(file: &Path, filter: &ResourceFilter) -> Result<Vec<ResourceEntry>> {
    tracing::debug!("Reading HAR file: {}", file.display());

    let har = HarReader::from_file(file)
        .with_context(|| format!("Could not load HAR file {}", file.display()))?;

    let resources = ResourceCollector::from_har(&har);
    Ok(filter.apply(&resources).into_iter().cloned().collect())
}

pub fn execute(
    file: &Path,
    types: Vec<ResourceType>,
    hosts: Vec<String>,
    min_size: Option<u64>,
    min_time: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!("Listing resources in: {}", file.display());

    let mut filter = ResourceFilter::new().with_types(types).with_hosts(hosts)?;
    if let Some(bytes) = min_size {
        filter = filter.with_min_size(bytes);
    }
    if let Some(ms) = min_time {
        filter = filter.with_min_time(ms);
    }

    let resources = collect_resources(file, &filter)?;

    match format {
        OutputFormat::Json => output_json(&resources)?,
        OutputFormat::Table => output_table(&resources)?,
        OutputFormat::Pretty => output_pretty(&resources)?,
    }

    Ok(())
}

fn output_pretty(resources: &[ResourceEntry]) -> Result<()> {
    use console::style;

    println!(
        "\n{}",
        style(format!("Resources ({})", resources.len())).bold().cyan()
    );

    if resources.is_empty() {
        println!("  {}", style("No resources matched").dim());
        println!();
        return Ok(());
    }

    for resource in resources {
        println!(
            "  {:<10} {:>9} {:>9.0}ms  {}",
            resource.resource_type.as_str(),
            resource.human_size,
            resource.time,
            resource.name
        );
    }

    let total: u64 = resources.iter().map(|r| r.size).sum();
    println!(
        "\n  Total: {}",
        style(perfdoc_core::aggregate::format_size(total)).yellow()
    );
    println!();
    Ok(())
}

fn output_json(resources: &[ResourceEntry]) -> Result<()> {
    let json = serde_json::to_string_pretty(resources)?;
    println!("{}", json);
    Ok(())
}

fn output_table(resources: &[ResourceEntry]) -> Result<()> {
    println!("Type,Size (bytes),Time (ms),Name");
    for resource in resources {
        println!(
            "{},{},{:.2},{}",
            resource.resource_type,
            resource.size,
            resource.time,
            csv_field(&resource.name)
        );
    }
    Ok(())
}
