use std::sync::OnceLock;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::settings::Settings;

/// Outcome of checking one page for its featured image.
#[derive(Debug)]
pub enum Extraction {
    /// The page carried an image tag; holds its `content` value verbatim.
    Found(String),
    /// The page loaded but had no usable image tag.
    Missing,
    Failed(ExtractError),
}

impl Extraction {
    pub fn featured_image(&self) -> Option<&str> {
        match self {
            Extraction::Found(url) => Some(url),
            _ => None,
        }
    }
}

/// Fetches pages and pulls the Open Graph image out of them.
pub struct ImageExtractor {
    client: Client,
    twitter_fallback: bool,
}

impl ImageExtractor {
    pub fn new(settings: &Settings) -> Result<Self, ExtractError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(ExtractError::Client)?;

        Ok(Self {
            client,
            twitter_fallback: settings.twitter_fallback,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_client(client: Client, twitter_fallback: bool) -> Self {
        Self {
            client,
            twitter_fallback,
        }
    }

    /// Fetch `url` and look for its featured image. Never fails: network and
    /// status errors come back as `Extraction::Failed`.
    pub fn extract(&self, url: &str) -> Extraction {
        println!("Fetching: {}", url);

        let html = match self.fetch_html(url) {
            Ok(html) => html,
            Err(e) => {
                warn!(url, timeout = e.is_timeout(), "fetch failed: {}", e);
                println!("Error fetching {}: {}", url, e);
                return Extraction::Failed(e);
            }
        };

        match parse_featured_image(&html, self.twitter_fallback) {
            Some(image) => {
                println!("Found image: {}", image);
                Extraction::Found(image)
            }
            None => {
                println!("Could not find og:image meta tag");
                Extraction::Missing
            }
        }
    }

    fn fetch_html(&self, url: &str) -> Result<String, ExtractError> {
        let start = Instant::now();
        let response = self.client.get(url).send()?;

        let status = response.status();
        debug!(
            url,
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "response received"
        );
        if !status.is_success() {
            return Err(ExtractError::Status(status));
        }

        Ok(response.text()?)
    }
}

fn og_image_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse(r#"meta[property="og:image"]"#).unwrap())
}

fn twitter_image_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse(r#"meta[name="twitter:image"]"#).unwrap())
}

/// Return the `content` of the first `og:image` meta tag in `html`.
///
/// Only the first matching tag is considered; if it has no `content`
/// attribute the page counts as missing an image. With `twitter_fallback`
/// set, a page without `og:image` is checked for `twitter:image` instead.
pub fn parse_featured_image(html: &str, twitter_fallback: bool) -> Option<String> {
    let document = Html::parse_document(html);

    let content_of = |selector: &Selector| {
        document
            .select(selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(String::from)
    };

    match document.select(og_image_selector()).next() {
        Some(el) => el.value().attr("content").map(String::from),
        None if twitter_fallback => content_of(twitter_image_selector()),
        None => None,
    }
}
