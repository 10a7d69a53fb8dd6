// src/checker/substitute.rs
// =============================================================================
// Turns a backlink template into the concrete URL for one domain.
//
// Example:
//   template    = "http://vostroportale.com/page1"
//   placeholder = "vostroportale.com"
//   domain      = "example.com"
//   result      = "http://example.com/page1"
// =============================================================================

/// Replaces every occurrence of `placeholder` in `template` with `domain`
///
/// A template without the placeholder comes back unchanged.
pub fn resolve(template: &str, placeholder: &str, domain: &str) -> String {
    // str::replace with an empty pattern would splice the domain between
    // every character
    if placeholder.is_empty() {
        return template.to_string();
    }
    template.replace(placeholder, domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACEHOLDER: &str = "vostroportale.com";

    #[test]
    fn test_resolve_simple() {
        let url = resolve("http://vostroportale.com/page1", PLACEHOLDER, "example.com");
        assert_eq!(url, "http://example.com/page1");
    }

    #[test]
    fn test_resolve_every_occurrence() {
        let url = resolve(
            "https://dir.test/vostroportale.com?ref=vostroportale.com",
            PLACEHOLDER,
            "example.com",
        );
        assert_eq!(url, "https://dir.test/example.com?ref=example.com");
    }

    #[test]
    fn test_resolve_without_placeholder_is_identity() {
        let template = "https://static.test/listing";
        assert_eq!(resolve(template, PLACEHOLDER, "example.com"), template);
    }

    #[test]
    fn test_resolve_empty_placeholder_is_identity() {
        let template = "https://static.test/listing";
        assert_eq!(resolve(template, "", "example.com"), template);
    }
}
