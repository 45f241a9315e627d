//! Endpoint resolution.

use crate::model::EndpointConfig;

/// Find the first endpoint whose normalized path equals `request_path`
/// byte for byte. Placeholder-looking segments such as `[id]` are literal.
pub fn resolve<'a>(endpoints: &'a [EndpointConfig], request_path: &str) -> Option<&'a EndpointConfig> {
    endpoints
        .iter()
        .find(|endpoint| endpoint.normalized_path() == request_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn endpoint(id: &str, path: &str) -> EndpointConfig {
        let mut endpoint = EndpointConfig::new(path, None);
        endpoint.id = id.to_string();
        endpoint
    }

    #[test]
    fn test_leading_slash_is_optional_in_storage() {
        let endpoints = vec![endpoint("a", "api/users"), endpoint("b", "/api/orders")];
        assert_eq!(resolve(&endpoints, "/api/users").unwrap().id, "a");
        assert_eq!(resolve(&endpoints, "/api/orders").unwrap().id, "b");
    }

    #[test]
    fn test_no_partial_or_parameter_matching() {
        let endpoints = vec![endpoint("a", "/api/users/[id]"), endpoint("b", "/api")];
        assert!(resolve(&endpoints, "/api/users/42").is_none());
        assert!(resolve(&endpoints, "/api/users").is_none());
        assert_eq!(resolve(&endpoints, "/api/users/[id]").unwrap().id, "a");
    }

    #[test]
    fn test_first_match_wins() {
        let endpoints = vec![endpoint("first", "/dup"), endpoint("second", "dup")];
        assert_eq!(resolve(&endpoints, "/dup").unwrap().id, "first");
    }

    #[test]
    fn test_not_found() {
        assert!(resolve(&[], "/missing").is_none());
        let endpoints = vec![endpoint("a", "/present")];
        assert!(resolve(&endpoints, "/missing").is_none());
    }

    proptest! {
        #[test]
        fn prop_resolves_regardless_of_slash_style(
            segments in prop::collection::vec("[a-z0-9_-]{1,8}", 1..4),
            leading_slash in any::<bool>(),
        ) {
            let joined = segments.join("/");
            let request_path = format!("/{joined}");
            let stored = if leading_slash { request_path.clone() } else { joined };

            let endpoints = vec![endpoint("other", "/zzz-unrelated/x"), endpoint("target", &stored)];
            prop_assert_eq!(&resolve(&endpoints, &request_path).unwrap().id, "target");

            let without = vec![endpoint("other", "/zzz-unrelated/x")];
            prop_assert!(resolve(&without, &request_path).is_none());
        }
    }
}
