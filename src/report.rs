use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::extractor::Extraction;
use crate::posts::BlogPost;

const BANNER_WIDTH: usize = 80;

/// One post plus whatever image was found for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub title: String,
    pub url: String,
    pub categories: Vec<String>,
    pub featured_image: Option<String>,
}

impl ExtractionResult {
    pub fn new(post: &BlogPost, featured_image: Option<String>) -> Self {
        Self {
            title: post.title.clone(),
            url: post.url.clone(),
            categories: post.categories.clone(),
            featured_image,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub found: usize,
    pub missing: usize,
    pub failed: usize,
    /// Subset of `failed` that hit the request timeout.
    pub timeouts: usize,
}

impl RunStats {
    pub fn record(&mut self, extraction: &Extraction) {
        self.total += 1;
        match extraction {
            Extraction::Found(_) => self.found += 1,
            Extraction::Missing => self.missing += 1,
            Extraction::Failed(e) => {
                self.failed += 1;
                if e.is_timeout() {
                    self.timeouts += 1;
                }
            }
        }
    }
}

/// Render a result as an object literal ready to paste into the blog component.
pub fn format_snippet(result: &ExtractionResult) -> String {
    let categories = result
        .categories
        .iter()
        .map(|c| format!("\"{}\"", js_escape(c)))
        .collect::<Vec<_>>()
        .join(", ");

    let image = match result.featured_image.as_deref() {
        Some(image) if !image.is_empty() => format!("\"{}\",", js_escape(image)),
        _ => "\"\", // No image found".to_string(),
    };

    let mut out = String::new();
    out.push_str("  {\n");
    out.push_str(&format!("    title: \"{}\",\n", js_escape(&result.title)));
    out.push_str(&format!("    link: \"{}\",\n", js_escape(&result.url)));
    out.push_str("    description: \"\", // Add description manually\n");
    out.push_str("    pubDate: \"\", // Add date manually\n");
    out.push_str(&format!("    categories: [{}],\n", categories));
    out.push_str(&format!("    featuredImage: {}\n", image));
    out.push_str("  },\n");
    out
}

pub fn print_results(results: &[ExtractionResult]) {
    let banner = "=".repeat(BANNER_WIDTH);
    println!("{}", banner);
    println!("RESULTS - Copy this to your React component:");
    println!("{}", banner);

    for result in results {
        println!("{}", format_snippet(result));
    }
}

/// Serialize all results as 2-space indented JSON, replacing any previous file.
pub fn write_json(path: &Path, results: &[ExtractionResult]) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

fn js_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
