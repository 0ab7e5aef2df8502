use serde::{Deserialize, Serialize};

/// Path prefix whose routes are never localized
pub const API_PREFIX: &str = "/api";

/// A route pattern with its per-locale variants, as consumed by the compiler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlPattern {
    pub pattern: String,
    /// `(locale, localized pattern)` pairs in locale order
    pub localized: Vec<(String, String)>,
}

fn is_api_path(url: &str) -> bool {
    url == API_PREFIX || url.starts_with("/api/")
}

/// Insert `locale` as the first path segment of `url`
pub fn localize_path(url: &str, locale: &str) -> String {
    if is_api_path(url) {
        return url.to_string();
    }
    let localized = format!("/{}/{}", locale, url.trim_start_matches('/'));
    localized.trim_end_matches('/').to_string()
}

/// Build the localized pattern table for every URL and locale
pub fn localize_urls(urls: &[String], locales: &[String]) -> Vec<UrlPattern> {
    urls.iter()
        .map(|url| UrlPattern {
            pattern: url.clone(),
            localized: locales
                .iter()
                .map(|locale| (locale.clone(), localize_path(url, locale)))
                .collect(),
        })
        .collect()
}
