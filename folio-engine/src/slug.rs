//! Slug derivation for `url_handle` fields.

/// Normalizes human text into a URL-safe handle: lowercase, alphanumeric
/// runs kept, everything else collapsed into single hyphens.
///
/// `slugify("Hello World!")` is `"hello-world"`. Idempotent.
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            // Lowercasing can expand to combining marks (e.g. 'İ'); keep
            // only the alphanumeric parts so the result stays stable.
            slug.extend(c.to_lowercase().filter(|lc| lc.is_alphanumeric()));
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn basic_derivation() {
        assert_eq!(slugify("Hello World!"), "hello-world");
    }

    #[test]
    fn collapses_punctuation_runs() {
        assert_eq!(slugify("a -- b__c"), "a-b-c");
    }

    #[test]
    fn trims_edges() {
        assert_eq!(slugify("  !Hello!  "), "hello");
    }

    #[test]
    fn empty_input() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn idempotent() {
        let once = slugify("Écran Noël 2024");
        assert_eq!(slugify(&once), once);
    }
}
