//! Property-based tests for exemption-list matching

use proptest::prelude::*;
use tasket::backend::middleware::PublicPaths;

proptest! {
    #[test]
    fn test_paths_below_an_exempt_prefix_are_public(rest in "[a-z0-9/]{0,20}") {
        let paths = PublicPaths::default();
        let path = format!("/health/{}", rest);
        prop_assert!(paths.is_public(&path));
    }

    #[test]
    fn test_lookalike_paths_are_gated(suffix in "[a-z0-9_-]{1,12}") {
        let paths = PublicPaths::default();
        let health = format!("/health{}", suffix);
        let login = format!("/api/v1/auth/login{}", suffix);
        prop_assert!(!paths.is_public(&health));
        prop_assert!(!paths.is_public(&login));
    }

    #[test]
    fn test_root_exemption_is_exact(rest in "[a-z0-9]{1,12}") {
        let paths = PublicPaths::new(["/"]);
        let path = format!("/{}", rest);
        prop_assert!(!paths.is_public(&path));
    }
}
