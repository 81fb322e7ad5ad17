//! Case-insensitive response header map.

use std::collections::HashMap;

/// Response headers keyed by lower-cased name.
///
/// Repeated headers keep the last value, which is all the stream endpoints
/// ever need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.inner.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Get a header value by name, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .get(&name.to_ascii_lowercase())
            .map(|v| v.as_str())
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Headers {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        let headers: Headers = [("X-Rate-Limit-Limit", "150")].into_iter().collect();
        assert_eq!(headers.get("x-rate-limit-limit"), Some("150"));
        assert_eq!(headers.get("X-RATE-LIMIT-LIMIT"), Some("150"));
        assert_eq!(headers.get("x-Rate-limit-LIMIT"), Some("150"));
        assert_eq!(headers.get("x-rate-limit-remaining"), None);
    }

    #[test]
    fn test_repeated_header_keeps_last() {
        let headers: Headers = [("Via", "a"), ("via", "b")].into_iter().collect();
        assert_eq!(headers.inner.len(), 1);
        assert_eq!(headers.get("VIA"), Some("b"));
    }
}
