use crate::{OutputFormat, csv_field};
use anyhow::{Context, Result};
use perfdoc_core::aggregate::ResourceCollector;
use perfdoc_core::har::{Har, HarReader};
use perfdoc_core::metrics::{NavigationTiming, PageMetrics};
use perfdoc_core::report::{Grade, Impact, PageSummary, Report, Tone};
use perfdoc_detectors::analyze_performance;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// Everything one analysis run produces
#[derive(Debug, Clone, Serialize)]
pub struct Diagnosis {
    pub grade: Grade,
    #[serde(flatten)]
    pub report: Report,
    pub summary: PageSummary,
}

/// Load the three inputs, run the analyzer and return structured results.
///
/// A navigation timing file that was asked for must load. Page metrics are
/// best effort: an unreadable file degrades to an empty snapshot.
pub fn diagnose(
    har_file: &Path,
    navigation_file: Option<&Path>,
    page_metrics_file: Option<&Path>,
) -> Result<Diagnosis> {
    tracing::debug!("Reading HAR file: {}", har_file.display());

    let har = HarReader::from_file(har_file)
        .with_context(|| format!("Could not load HAR file {}", har_file.display()))?;
    HarReader::validate(&har)?;

    let resources = ResourceCollector::from_har(&har);

    let navigation = match navigation_file {
        Some(path) => NavigationTiming::from_file(path)
            .with_context(|| format!("Could not load navigation timing {}", path.display()))?,
        None => NavigationTiming::from_har(&har),
    };

    let page = load_page_metrics(page_metrics_file, &har);

    let report = analyze_performance(&navigation, &resources, &page);
    let summary = PageSummary::new(&navigation, &resources, &page);

    Ok(Diagnosis {
        grade: report.grade(),
        report,
        summary,
    })
}

fn load_page_metrics(path: Option<&Path>, har: &Har) -> PageMetrics {
    let mut page = match path {
        Some(path) => match PageMetrics::from_file(path) {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(
                    "Ignoring page metrics {}: {}. Continuing without long task data.",
                    path.display(),
                    e
                );
                PageMetrics::default()
            }
        },
        None => {
            tracing::debug!("No page metrics given, JavaScript blocking will not be assessed");
            PageMetrics::default()
        }
    };

    if page.title.is_empty()
        && let Some(first) = har.log.pages.first()
    {
        page.title = first.title.clone();
    }

    page
}

pub fn execute(
    file: &Path,
    navigation: Option<&Path>,
    page_metrics: Option<&Path>,
    technical: bool,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!("Diagnosing page load from: {}", file.display());

    let diagnosis = match format {
        OutputFormat::Pretty => {
            let spinner = spinner("Diagnosing page load...");
            let result = diagnose(file, navigation, page_metrics);
            spinner.finish_and_clear();
            result?
        }
        _ => diagnose(file, navigation, page_metrics)?,
    };

    match format {
        OutputFormat::Json => output_json(&diagnosis)?,
        OutputFormat::Table => output_table(&diagnosis)?,
        OutputFormat::Pretty => output_pretty(&diagnosis, technical)?,
    }

    Ok(())
}

fn spinner(message: &'static str) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn output_pretty(diagnosis: &Diagnosis, technical: bool) -> Result<()> {
    use console::style;

    let report = &diagnosis.report;
    let summary = &diagnosis.summary;

    let heading = if summary.title.is_empty() {
        "Page Health Report".to_string()
    } else {
        format!("Page Health Report: {}", summary.title)
    };
    println!("\n{}", style(heading).bold().cyan());
    println!();

    let grade = format!("{} ({}/100)", diagnosis.grade, report.score);
    let grade = match diagnosis.grade.tone() {
        Tone::Good => style(grade).green().bold(),
        Tone::Warning => style(grade).yellow().bold(),
        Tone::Danger => style(grade).red().bold(),
    };
    println!("  Grade:      {}", grade);
    println!("  Load Time:  {:.2}s", summary.load_seconds);
    println!("  Weight:     {:.2} MB", summary.total_megabytes);
    println!("  Blocking:   {}ms", summary.total_blocking_ms);

    if summary.dom_nodes > 0 {
        println!("  DOM Nodes:  {}", summary.dom_nodes);
    }
    if !summary.frameworks.is_empty() {
        println!("  Frameworks: {}", summary.frameworks.join(", "));
    }

    if report.is_clean() {
        println!("\n{}", style("Clean Bill of Health!").bold().green());
        println!("  No performance bottlenecks detected.");
        println!();
        return Ok(());
    }

    println!(
        "\n{}",
        style(format!("Issues ({})", report.issues.len())).bold()
    );

    for issue in &report.issues {
        let tag = match issue.impact {
            Impact::High => style(issue.impact.as_str()).red().bold(),
            Impact::Medium => style(issue.impact.as_str()).yellow().bold(),
            Impact::Low => style(issue.impact.as_str()).blue().bold(),
        };
        println!("\n  [{}] {}", tag, style(&issue.title).bold());
        println!("  {}", issue.explanation);
        println!("  {} {}", style("Rx:").bold(), issue.fix);
        println!("  {} {}", style("Saves:").dim(), issue.save);

        if technical {
            for line in issue.technical.lines() {
                println!("  {}", style(line).dim());
            }
        }
    }

    println!();
    Ok(())
}

fn output_json(diagnosis: &Diagnosis) -> Result<()> {
    let json = serde_json::to_string_pretty(diagnosis)?;
    println!("{}", json);
    Ok(())
}

fn output_table(diagnosis: &Diagnosis) -> Result<()> {
    let summary = &diagnosis.summary;

    println!("Metric,Value");
    println!("Score,{}", diagnosis.report.score);
    println!("Grade,{}", diagnosis.grade);
    println!("Load Time (s),{:.2}", summary.load_seconds);
    println!("Page Weight (MB),{:.2}", summary.total_megabytes);
    println!("Blocking Time (ms),{}", summary.total_blocking_ms);
    println!("Resources,{}", summary.resource_count);

    if !diagnosis.report.issues.is_empty() {
        println!();
        println!("Impact,Id,Title,Save");
        for issue in &diagnosis.report.issues {
            println!(
                "{},{},{},{}",
                issue.impact,
                csv_field(&issue.id),
                csv_field(&issue.title),
                csv_field(&issue.save)
            );
        }
    }

    Ok(())
}
