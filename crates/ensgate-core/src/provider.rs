//! Provider URL list resolution.
//!
//! Turns the optional override value from configuration into the ordered
//! list of upstream endpoints. The first entry is the preferred provider.

use std::collections::HashSet;

/// Built-in public endpoints, in preference order.
pub const DEFAULT_PROVIDER_URLS: [&str; 4] = [
    "https://eth.llamarpc.com",
    "https://ethereum.publicnode.com",
    "https://rpc.ankr.com/eth",
    "https://cloudflare-eth.com",
];

/// Ordered, non-empty, deduplicated provider list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUrls {
    urls: Vec<String>,
}

impl ProviderUrls {
    /// Resolves the provider list from an optional override.
    ///
    /// | Override | Result |
    /// |----------|--------|
    /// | `"a, b"` | `[a, b]` (defaults dropped) |
    /// | `"a"` | `[a, defaults without a...]` |
    /// | none / blank | defaults |
    pub fn resolve(override_value: Option<&str>) -> Self {
        let Some(raw) = override_value.map(str::trim).filter(|value| !value.is_empty()) else {
            return Self::defaults();
        };

        if raw.contains(',') {
            let urls = dedupe(raw.split(',').map(str::trim).filter(|url| !url.is_empty()));
            if urls.is_empty() {
                return Self::defaults();
            }
            return Self { urls };
        }

        let urls = dedupe(
            std::iter::once(raw).chain(
                DEFAULT_PROVIDER_URLS
                    .iter()
                    .copied()
                    .filter(|url| *url != raw),
            ),
        );
        Self { urls }
    }

    pub fn defaults() -> Self {
        Self {
            urls: DEFAULT_PROVIDER_URLS.iter().map(|url| (*url).to_owned()).collect(),
        }
    }

    pub fn preferred(&self) -> &str {
        self.urls
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_PROVIDER_URLS[0])
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.urls.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.urls
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }
}

fn dedupe<'a>(urls: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut output = Vec::new();

    for url in urls {
        if seen.insert(url) {
            output.push(url.to_owned());
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Vec<String> {
        DEFAULT_PROVIDER_URLS.iter().map(|url| (*url).to_owned()).collect()
    }

    #[test]
    fn unset_override_returns_defaults_unchanged() {
        assert_eq!(ProviderUrls::resolve(None).as_slice(), defaults().as_slice());
        assert_eq!(ProviderUrls::resolve(Some("   ")).as_slice(), defaults().as_slice());
    }

    #[test]
    fn comma_list_replaces_defaults_in_given_order() {
        let urls = ProviderUrls::resolve(Some(" https://b.example ,https://a.example"));

        assert_eq!(
            urls.as_slice(),
            &[
                String::from("https://b.example"),
                String::from("https://a.example")
            ]
        );
    }

    #[test]
    fn single_override_is_preferred_and_defaults_follow() {
        let urls = ProviderUrls::resolve(Some("https://mine.example"));

        assert_eq!(urls.preferred(), "https://mine.example");
        assert_eq!(urls.len(), 5);
        assert_eq!(&urls.as_slice()[1..], defaults().as_slice());
    }

    #[test]
    fn single_override_matching_a_default_is_not_duplicated() {
        let urls = ProviderUrls::resolve(Some("https://rpc.ankr.com/eth"));

        assert_eq!(
            urls.as_slice(),
            &[
                String::from("https://rpc.ankr.com/eth"),
                String::from("https://eth.llamarpc.com"),
                String::from("https://ethereum.publicnode.com"),
                String::from("https://cloudflare-eth.com"),
            ]
        );
    }

    #[test]
    fn resolution_is_idempotent() {
        let first = ProviderUrls::resolve(Some("https://a.example,https://b.example"));
        let second = ProviderUrls::resolve(Some("https://a.example,https://b.example"));

        assert_eq!(first, second);
    }

    #[test]
    fn comma_list_without_entries_falls_back_to_defaults() {
        let urls = ProviderUrls::resolve(Some(" , ,"));

        assert_eq!(urls.as_slice(), defaults().as_slice());
    }
}
