//! URL handling module
//!
//! Normalizes audit targets and derives the robots.txt location for a page.

mod normalize;

pub use normalize::{normalize_target, robots_url};

use url::Url;

/// Returns true if the URL uses the `https` scheme
pub fn is_https(url: &str) -> bool {
    Url::parse(url)
        .map(|u| u.scheme() == "https")
        .unwrap_or(false)
}
