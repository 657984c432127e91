// Domain whitelist - lets messages whose links all point at trusted sites skip the classifier.
//
// Matching is substring containment on the host, not suffix matching: a host like
// `github.com.evil.example` contains `github.com` and is treated as trusted.
// Keep it that way until there is a product decision on suffix matching.

use once_cell::sync::Lazy;
use regex::Regex;

/// Domains trusted out of the box.
pub const DEFAULT_ALLOWED_DOMAINS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "deviantart.com",
    "discord.com",
    "discord.gg",
    "github.com",
];

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://[^\s]+").unwrap());

/// Extract the lowercased host segment of every http(s) URL in `text`.
///
/// The host is whatever sits between `scheme://` and the next `/`, so ports and
/// query strings glued to the host stay part of it. A URL like `https:///evil.example`
/// yields an empty host, which is kept so it can never pass the allow-list.
pub fn extract_hosts(text: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .filter_map(|m| {
            let (_, rest) = m.as_str().split_once("://")?;
            let host = rest.split('/').next().unwrap_or_default();
            Some(host.to_lowercase())
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct DomainWhitelist {
    allowed: Vec<String>,
}

impl Default for DomainWhitelist {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_DOMAINS.iter().map(|d| d.to_string()))
    }
}

impl DomainWhitelist {
    pub fn new(allowed: impl IntoIterator<Item = String>) -> Self {
        Self {
            allowed: allowed
                .into_iter()
                .map(|d| d.trim().to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    #[cfg(test)]
    pub fn allowed_domains(&self) -> &[String] {
        &self.allowed
    }

    fn host_is_trusted(&self, host: &str) -> bool {
        !host.is_empty()
            && self.allowed.iter().any(|allowed| host.contains(allowed.as_str()))
    }

    /// True when the message has at least one link and every link's host is trusted.
    /// A message without links is never whitelisted.
    pub fn is_whitelisted(&self, text: &str) -> bool {
        let hosts = extract_hosts(text);
        !hosts.is_empty() && hosts.iter().all(|host| self.host_is_trusted(host))
    }
}
