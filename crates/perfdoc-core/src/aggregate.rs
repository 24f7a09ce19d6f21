//! Builds analyzer inputs from exported telemetry.
//!
//! The network log arrives as a HAR export. Resource entries are reduced to
//! `{name, size, type, time, humanSize}`, and when no navigation timing dump
//! is available the marks are reconstructed from the main document request.

use crate::har::{Entry, Har};
use crate::metrics::{NavigationTiming, ResourceEntry, ResourceType};
use url::Url;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

pub struct ResourceCollector;

impl ResourceCollector {
    /// Normalize every HAR entry into a resource entry, in log order
    pub fn from_har(har: &Har) -> Vec<ResourceEntry> {
        tracing::debug!("Collecting resources from {} HAR entries", har.log.entries.len());

        let resources: Vec<ResourceEntry> = har.log.entries.iter().map(Self::from_entry).collect();

        let total: u64 = resources.iter().map(|r| r.size).sum();
        tracing::info!(
            "Collected {} resources ({})",
            resources.len(),
            format_size(total)
        );

        resources
    }

    pub fn from_entry(entry: &Entry) -> ResourceEntry {
        let size = transfer_size(entry);

        ResourceEntry {
            name: entry.request.url.clone(),
            size,
            resource_type: classify(entry),
            time: entry.time.max(0.0),
            human_size: format_size(size),
        }
    }
}

/// Bytes attributed to an entry: transfer size, else decoded content size,
/// else zero.
fn transfer_size(entry: &Entry) -> u64 {
    let response = &entry.response;
    response
        .transfer_size
        .filter(|size| *size > 0)
        .or(Some(response.content.size).filter(|size| *size > 0))
        .map(|size| size as u64)
        .unwrap_or(0)
}

/// DevTools' own label wins, then the response MIME type, then the URL
/// extension.
fn classify(entry: &Entry) -> ResourceType {
    if let Some(label) = entry.resource_type.as_deref() {
        return ResourceType::from_label(label);
    }

    classify_mime(&entry.response.content.mime_type)
        .or_else(|| classify_extension(&entry.request.url))
        .unwrap_or(ResourceType::Other)
}

fn classify_mime(mime_type: &str) -> Option<ResourceType> {
    let parsed: mime::Mime = mime_type.trim().parse().ok()?;
    let top = parsed.type_().as_str();
    let sub = parsed.subtype().as_str();

    if top == "image" {
        Some(ResourceType::Image)
    } else if top == "text" && sub == "css" {
        Some(ResourceType::Stylesheet)
    } else if sub.contains("javascript") || sub.contains("ecmascript") {
        Some(ResourceType::Script)
    } else if top == "font" || sub.contains("font") || sub.starts_with("woff") {
        Some(ResourceType::Font)
    } else {
        None
    }
}

fn classify_extension(raw_url: &str) -> Option<ResourceType> {
    let url = Url::parse(raw_url).ok()?;
    let file = url.path_segments()?.next_back()?;
    let (_, extension) = file.rsplit_once('.')?;

    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" | "png" | "gif" | "webp" | "avif" | "svg" | "ico" | "bmp" => {
            Some(ResourceType::Image)
        }
        "css" => Some(ResourceType::Stylesheet),
        "js" | "mjs" | "cjs" => Some(ResourceType::Script),
        "woff" | "woff2" | "ttf" | "otf" | "eot" => Some(ResourceType::Font),
        _ => None,
    }
}

/// Treat HAR's `-1`/absent convention as zero elapsed time
fn phase_ms(value: Option<f64>) -> f64 {
    value.filter(|v| *v > 0.0).unwrap_or(0.0)
}

/// Human-readable byte count, e.g. `"812B"`, `"586KB"`, `"2.40MB"`
pub fn format_size(bytes: u64) -> String {
    if bytes < KIB {
        return format!("{}B", bytes);
    }

    let kilobytes = (bytes as f64 / KIB as f64).round() as u64;
    if kilobytes < KIB {
        format!("{}KB", kilobytes)
    } else {
        format!("{:.2}MB", bytes as f64 / MIB as f64)
    }
}

impl NavigationTiming {
    /// Reconstruct navigation marks from a HAR log.
    ///
    /// The main document request (or the first request when no entry is
    /// labelled `document`) provides request and response start; the first
    /// page's `onLoad` provides load end. Missing data yields zeros.
    pub fn from_har(har: &Har) -> Self {
        let entries = &har.log.entries;
        let document = entries
            .iter()
            .find(|e| e.resource_type.as_deref() == Some("document"))
            .or_else(|| entries.first());

        let (request_start, response_start) = match document {
            Some(entry) => {
                let t = &entry.timings;
                // HAR 1.2 includes ssl inside connect
                let request_start = phase_ms(t.blocked) + phase_ms(t.dns) + phase_ms(t.connect);
                let response_start =
                    request_start + t.send.max(0.0) + t.wait.max(0.0);
                (request_start, response_start)
            }
            None => (0.0, 0.0),
        };

        let load_event_end = har
            .log
            .pages
            .first()
            .map(|page| phase_ms(page.page_timings.on_load))
            .unwrap_or(0.0);

        let timing = NavigationTiming::new(request_start, response_start, load_event_end);
        tracing::debug!(
            "Derived navigation timing from HAR: ttfb={:.2}ms load={:.2}ms",
            timing.ttfb(),
            timing.load_event_end
        );
        timing
    }
}
