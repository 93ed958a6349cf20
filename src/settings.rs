use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "blog_images.toml";
const ENV_PREFIX: &str = "BLOG_IMAGES";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub posts_file: PathBuf,
    pub output_file: PathBuf,
    pub timeout_secs: u64,
    /// Pause after every post, whether or not the fetch worked.
    pub delay_ms: u64,
    pub user_agent: String,
    pub twitter_fallback: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            posts_file: PathBuf::from("blog_posts.json"),
            output_file: PathBuf::from("blog_images.json"),
            timeout_secs: 10,
            delay_ms: 1000,
            user_agent: BROWSER_USER_AGENT.to_string(),
            twitter_fallback: false,
        }
    }
}

/// Command-line values that take precedence over file and environment.
#[derive(Debug, Default, clap::Args)]
pub struct Overrides {
    /// JSON file listing the posts to check
    #[arg(long = "posts")]
    pub posts_file: Option<PathBuf>,
    /// Where to write the JSON results
    #[arg(short, long = "output")]
    pub output_file: Option<PathBuf>,
    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
    /// Pause between posts in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,
    /// Fall back to twitter:image when a page has no og:image
    #[arg(long)]
    pub twitter_fallback: bool,
}

impl Settings {
    /// Defaults, then the optional settings file, then `BLOG_IMAGES_*` env vars.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        Self::load_from(config_file, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(config_file: Option<&Path>, env: Environment) -> Result<Self> {
        let (path, required) = match config_file {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .add_source(env.try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize::<Settings>())
            .with_context(|| format!("Failed to load settings (file: {})", path.display()))
    }

    pub fn apply(&mut self, o: Overrides) {
        if let Some(p) = o.posts_file {
            self.posts_file = p;
        }
        if let Some(p) = o.output_file {
            self.output_file = p;
        }
        if let Some(t) = o.timeout_secs {
            self.timeout_secs = t;
        }
        if let Some(d) = o.delay_ms {
            self.delay_ms = d;
        }
        if o.twitter_fallback {
            self.twitter_fallback = true;
        }
    }
}
