use super::{AnalysisInput, BLOCKING_STYLESHEET_MS, OVERSIZED_IMAGE_BYTES, Rule, tail};
use perfdoc_core::metrics::ResourceType;
use perfdoc_core::report::{Impact, Issue};

/// One issue per image above the size budget
pub struct OversizedImages;

impl Rule for OversizedImages {
    fn id(&self) -> &'static str {
        "oversized-image"
    }

    fn evaluate(&self, input: &AnalysisInput<'_>) -> Vec<Issue> {
        input
            .resources
            .iter()
            .filter(|r| r.resource_type == ResourceType::Image && r.size > OVERSIZED_IMAGE_BYTES)
            .map(|image| {
                tracing::debug!("Oversized image: {} ({})", image.name, image.human_size);

                Issue {
                    // Full name keeps ids unique when two URLs share a suffix
                    id: format!("img-{}", image.name),
                    title: "Massive Image Detected".to_string(),
                    impact: Impact::Medium,
                    save: "Bandwidth & Load Time".to_string(),
                    explanation: format!(
                        "An image file is {}. That's larger than the entire code of some websites.",
                        image.human_size
                    ),
                    fix: "Convert to WebP/AVIF, resize to actual display dimensions, and compress."
                        .to_string(),
                    technical: format!(
                        "File: ...{}\nSize: {}",
                        tail(&image.name, 20),
                        image.human_size
                    ),
                }
            })
            .collect()
    }
}

/// A single aggregate issue for slow stylesheets delaying first paint
pub struct RenderBlockingStyles;

impl Rule for RenderBlockingStyles {
    fn id(&self) -> &'static str {
        "render-blocking-css"
    }

    fn evaluate(&self, input: &AnalysisInput<'_>) -> Vec<Issue> {
        let blocking: Vec<&str> = input
            .resources
            .iter()
            .filter(|r| r.resource_type == ResourceType::Stylesheet && r.time > BLOCKING_STYLESHEET_MS)
            .map(|r| r.name.as_str())
            .collect();

        if blocking.is_empty() {
            return vec![];
        }

        tracing::debug!("{} render-blocking stylesheets", blocking.len());

        let files: Vec<&str> = blocking.iter().map(|name| tail(name, 15)).collect();

        vec![Issue {
            id: "render-blocking-css".to_string(),
            title: "Styles are delaying the first paint".to_string(),
            impact: Impact::High,
            save: "Visual Perception".to_string(),
            explanation: format!(
                "The browser pauses drawing the page until it finishes downloading these {} style files.",
                blocking.len()
            ),
            fix: "Inline critical CSS and defer the rest, or reduce CSS file size.".to_string(),
            technical: format!("Blocking files: {}", files.join(", ")),
        }]
    }
}
