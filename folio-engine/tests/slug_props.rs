use folio_engine::slugify;
use proptest::prelude::*;

proptest! {
    #[test]
    fn slugs_only_contain_safe_characters(input in ".*") {
        let slug = slugify(&input);
        prop_assert!(
            slug.chars().all(|c| (c.is_alphanumeric() && !c.is_uppercase()) || c == '-'),
            "unsafe character in {slug:?}"
        );
    }

    #[test]
    fn slugs_never_have_hyphen_runs_or_edges(input in ".*") {
        let slug = slugify(&input);
        prop_assert!(!slug.starts_with('-'));
        prop_assert!(!slug.ends_with('-'));
        prop_assert!(!slug.contains("--"));
    }

    #[test]
    fn slugify_is_idempotent(input in ".*") {
        let once = slugify(&input);
        prop_assert_eq!(slugify(&once), once.clone());
    }

    #[test]
    fn ascii_alphanumerics_survive(word in "[a-z0-9]{1,20}") {
        prop_assert_eq!(slugify(&word), word.clone());
    }
}
