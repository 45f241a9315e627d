//! Log filtering and pagination.

use crate::model::RequestLog;
use serde::Serialize;

/// Criteria for querying or deleting logs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Substring (or exact) match against the logged path
    pub path_or_endpoint_id: Option<String>,
    /// Exact method match
    pub method: Option<String>,
    /// Exact status code match
    pub status_code: Option<u16>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// One page of query results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogPage {
    pub logs: Vec<RequestLog>,
    /// Number of matches before pagination
    pub total: usize,
}

impl LogFilter {
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path_or_endpoint_id = Some(path.into());
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = Some(offset);
        self.limit = Some(limit);
        self
    }

    /// Per-predicate results for the predicates that are set. Empty strings
    /// and a zero status code count as unset.
    fn predicate_results(&self, log: &RequestLog) -> impl Iterator<Item = bool> {
        let path = self
            .path_or_endpoint_id
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| log.path.contains(p) || log.path == p);
        let method = self
            .method
            .as_deref()
            .filter(|m| !m.is_empty())
            .map(|m| log.method == m);
        let status = self
            .status_code
            .filter(|s| *s != 0)
            .map(|s| log.status_code == Some(s));

        [path, method, status].into_iter().flatten()
    }

    /// Whether any predicate (path, method, status) is set
    pub fn has_predicates(&self) -> bool {
        self.path_or_endpoint_id.as_deref().is_some_and(|p| !p.is_empty())
            || self.method.as_deref().is_some_and(|m| !m.is_empty())
            || self.status_code.is_some_and(|s| s != 0)
    }

    /// AND semantics, used by queries. No predicates matches everything.
    pub fn matches_all(&self, log: &RequestLog) -> bool {
        self.predicate_results(log).all(|matched| matched)
    }

    /// OR semantics, used by deletion. No predicates matches nothing.
    pub fn matches_any(&self, log: &RequestLog) -> bool {
        self.predicate_results(log).any(|matched| matched)
    }

    /// Filter (AND) then page over newest-first logs
    pub fn apply<'a>(&self, logs: impl IntoIterator<Item = &'a RequestLog>) -> LogPage {
        let matched: Vec<&RequestLog> = logs.into_iter().filter(|l| self.matches_all(l)).collect();
        let total = matched.len();

        let offset = self.offset.unwrap_or(0);
        let limit = self.limit.unwrap_or(usize::MAX);
        let logs = matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        LogPage { logs, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LoggedRequest;
    use chrono::Utc;

    fn log(id: &str, method: &str, path: &str, status: Option<u16>) -> RequestLog {
        RequestLog {
            id: id.to_string(),
            timestamp: Utc::now(),
            method: method.to_string(),
            path: path.to_string(),
            status_code: status,
            request: LoggedRequest::default(),
            response: None,
            duration_ms: 0,
        }
    }

    fn sample() -> Vec<RequestLog> {
        vec![
            log("1", "GET", "/api/users", Some(200)),
            log("2", "POST", "/api/users", Some(201)),
            log("3", "GET", "/api/orders", Some(500)),
            log("4", "DELETE", "/health", Some(444)),
        ]
    }

    fn ids(page: &LogPage) -> Vec<&str> {
        page.logs.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let logs = sample();
        let page = LogFilter::default().apply(&logs);
        assert_eq!(page.total, 4);
        assert_eq!(ids(&page), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_path_is_substring_match() {
        let logs = sample();
        let page = LogFilter::default().path("api").apply(&logs);
        assert_eq!(ids(&page), vec!["1", "2", "3"]);

        let page = LogFilter::default().path("/health").apply(&logs);
        assert_eq!(ids(&page), vec!["4"]);
    }

    #[test]
    fn test_query_predicates_are_anded() {
        let logs = sample();
        let page = LogFilter::default()
            .path("/api/users")
            .method("GET")
            .apply(&logs);
        assert_eq!(ids(&page), vec!["1"]);

        let page = LogFilter::default()
            .method("GET")
            .status_code(500)
            .apply(&logs);
        assert_eq!(ids(&page), vec!["3"]);
    }

    #[test]
    fn test_pagination_applies_after_filtering() {
        let logs = sample();
        let page = LogFilter::default().path("api").page(1, 1).apply(&logs);
        assert_eq!(page.total, 3);
        assert_eq!(ids(&page), vec!["2"]);

        let page = LogFilter::default().page(10, 5).apply(&logs);
        assert_eq!(page.total, 4);
        assert!(page.logs.is_empty());
    }

    #[test]
    fn test_delete_predicates_are_ored() {
        let filter = LogFilter::default().path("/health").method("POST");
        let deleted: Vec<_> = sample()
            .into_iter()
            .filter(|l| filter.matches_any(l))
            .map(|l| l.id)
            .collect();
        assert_eq!(deleted, vec!["2", "4"]);
    }

    #[test]
    fn test_blank_predicates_are_ignored() {
        let filter = LogFilter {
            path_or_endpoint_id: Some(String::new()),
            method: Some(String::new()),
            status_code: Some(0),
            ..Default::default()
        };
        assert!(!filter.has_predicates());
        assert_eq!(filter.apply(&sample()).total, 4);
        assert!(!filter.matches_any(&sample()[0]));
    }
}
