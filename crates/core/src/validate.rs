use once_cell::sync::Lazy;
use regex::Regex;

// Hostname syntax: dot-separated labels of at most 63 chars, no leading or
// trailing hyphen, alphabetic TLD of at least two chars.
static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,}$")
        .expect("domain regex")
});

/// Pre-flight check; invalid domains never enter the pipeline.
pub fn is_valid_domain(domain: &str) -> bool {
    !domain.is_empty() && DOMAIN_RE.is_match(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_and_multi_label_domains() {
        assert!(is_valid_domain("example.com"));
        assert!(is_valid_domain("sub.example.co.uk"));
        assert!(is_valid_domain("discord.com"));
        assert!(is_valid_domain("a1-b2.example.org"));
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(!is_valid_domain(""));
        assert!(!is_valid_domain("not a domain"));
        assert!(!is_valid_domain("-bad-.com"));
        assert!(!is_valid_domain("nodots"));
        assert!(!is_valid_domain("example."));
    }
}
