use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Default post list, used when no posts file exists on disk.
const BUNDLED_POSTS: &str = include_str!("../blog_posts.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    pub url: String,
    pub categories: Vec<String>,
}

/// Load the ordered post list from `path`, or the bundled list if it is absent.
pub fn load(path: &Path) -> Result<Vec<BlogPost>> {
    match std::fs::read_to_string(path) {
        Ok(raw) => {
            let posts = parse(&raw).with_context(|| format!("Invalid posts file {}", path.display()))?;
            info!("Loaded {} posts from {}", posts.len(), path.display());
            Ok(posts)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("{} not found, using bundled post list", path.display());
            bundled()
        }
        Err(e) => Err(e).with_context(|| format!("Failed to read posts file {}", path.display())),
    }
}

pub fn bundled() -> Result<Vec<BlogPost>> {
    parse(BUNDLED_POSTS).context("Bundled post list is invalid")
}

fn parse(raw: &str) -> Result<Vec<BlogPost>> {
    Ok(serde_json::from_str(raw)?)
}
