//! Upstream query construction
//!
//! Builds the `GET {base}/search/` parameters and the cache key derived from
//! the final URL.

use serde::Serialize;

/// Query used when the caller gives none
pub const DEFAULT_QUERY: &str = "*:*";

/// Page size when the caller gives none
pub const DEFAULT_COUNT: u64 = 10;

/// Parameters of one upstream search
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub count: u64,
    pub start: u64,
    /// Filter-query clauses, AND-ed together
    pub filters: Vec<String>,
    pub facet_fields: Vec<String>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            q: None,
            count: DEFAULT_COUNT,
            start: 0,
            filters: Vec::new(),
            facet_fields: Vec::new(),
        }
    }
}

impl SearchQuery {
    pub fn new(count: u64, start: u64) -> Self {
        Self {
            count,
            start,
            ..Self::default()
        }
    }

    pub fn with_query(mut self, q: impl Into<String>) -> Self {
        let q = q.into();
        self.q = (!q.trim().is_empty()).then_some(q);
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filters.push(filter.into());
        self
    }

    pub fn with_facets<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facet_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Same filters, a single document, no facets: used to learn the total
    pub fn count_probe(&self) -> Self {
        Self {
            q: self.q.clone(),
            count: 1,
            start: 0,
            filters: self.filters.clone(),
            facet_fields: Vec::new(),
        }
    }

    /// Ordered `(name, value)` pairs sent upstream
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", self.q.clone().unwrap_or_else(|| DEFAULT_QUERY.to_string())),
            ("count", self.count.to_string()),
            ("start", self.start.to_string()),
            ("format", "json".to_string()),
        ];

        let filters: Vec<&str> = self
            .filters
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .collect();
        if !filters.is_empty() {
            params.push(("fq", filters.join(" AND ")));
        }

        if !self.facet_fields.is_empty() {
            params.push(("facet", "true".to_string()));
            params.push(("facet_field", self.facet_fields.join(",")));
        }

        params
    }
}

/// Search endpoint for a configured base URL
pub fn search_endpoint(base_url: &str) -> String {
    format!("{}/search/", base_url.trim_end_matches('/'))
}

/// Full request URL, used for logging and as the cache key source
pub fn search_url(base_url: &str, query: &SearchQuery) -> String {
    let encoded: Vec<String> = query
        .params()
        .iter()
        .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
        .collect();
    format!("{}?{}", search_endpoint(base_url), encoded.join("&"))
}

/// Cache key for a request URL (hex MD5)
pub fn cache_key(url: &str) -> String {
    format!("{:x}", md5::compute(url.as_bytes()))
}

/// `field:"value"` exact-match clause
pub fn exact_filter(field: &str, value: &str) -> String {
    format!("{field}:\"{}\"", value.trim().replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_defaults() {
        let params = SearchQuery::default().params();
        assert_eq!(
            params,
            vec![
                ("q", "*:*".to_string()),
                ("count", "10".to_string()),
                ("start", "0".to_string()),
                ("format", "json".to_string()),
            ]
        );
    }

    #[test]
    fn test_params_with_filters_and_facets() {
        let query = SearchQuery::new(20, 40)
            .with_query("dengue")
            .with_filter("country:\"Brasil\"")
            .with_filter("  ")
            .with_filter("status:\"C\"")
            .with_facets(["country", "language"]);

        let params = query.params();
        assert_eq!(params[0], ("q", "dengue".to_string()));
        assert_eq!(params[1], ("count", "20".to_string()));
        assert_eq!(params[2], ("start", "40".to_string()));
        assert!(params.contains(&("fq", "country:\"Brasil\" AND status:\"C\"".to_string())));
        assert!(params.contains(&("facet", "true".to_string())));
        assert!(params.contains(&("facet_field", "country,language".to_string())));
    }

    #[test]
    fn test_blank_query_falls_back_to_match_all() {
        let query = SearchQuery::default().with_query("   ");
        assert_eq!(query.q, None);
        assert_eq!(query.params()[0].1, "*:*");
    }

    #[test]
    fn test_count_probe() {
        let query = SearchQuery::new(50, 100)
            .with_filter("a:b")
            .with_facets(["country"]);
        let probe = query.count_probe();
        assert_eq!(probe.count, 1);
        assert_eq!(probe.start, 0);
        assert_eq!(probe.filters, vec!["a:b"]);
        assert!(probe.facet_fields.is_empty());
    }

    #[test]
    fn test_search_url() {
        let query = SearchQuery::new(5, 0).with_filter("country:\"Brasil\"");
        assert_eq!(
            search_url("https://api.example.org/title/v1/", &query),
            "https://api.example.org/title/v1/search/?q=%2A%3A%2A&count=5&start=0&format=json&fq=country%3A%22Brasil%22"
        );
    }

    #[test]
    fn test_cache_key_is_stable_md5() {
        let a = cache_key("https://x/search/?q=1");
        assert_eq!(a.len(), 32);
        assert_eq!(a, cache_key("https://x/search/?q=1"));
        assert_ne!(a, cache_key("https://x/search/?q=2"));
    }

    #[test]
    fn test_exact_filter() {
        assert_eq!(exact_filter("status", " C "), "status:\"C\"");
        assert_eq!(exact_filter("title", "a \"b\""), "title:\"a \\\"b\\\"\"");
    }
}
