//! Canonical form for tracked domains.
//!
//! `https://WWW.Example.com/ ` and `example.com` name the same site, so every
//! domain entering the store or a rank lookup goes through [`normalize_domain`].

const SCHEMES: [&str; 2] = ["https://", "http://"];

/// Lowercase, drop all whitespace, then strip scheme, `www.`, leading dots
/// and a trailing slash until nothing changes.
///
/// Never fails; input made only of noise normalizes to an empty string.
pub fn normalize_domain(raw: &str) -> String {
    let mut domain: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    loop {
        let stripped = strip_once(&domain);
        if stripped.len() == domain.len() {
            return domain;
        }
        domain = stripped.to_string();
    }
}

fn strip_once(domain: &str) -> &str {
    let mut rest = domain;
    for scheme in SCHEMES {
        if let Some(stripped) = rest.strip_prefix(scheme) {
            rest = stripped;
            break;
        }
    }
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    rest.trim_start_matches('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_www_and_slash() {
        assert_eq!(normalize_domain("https://www.Example.com/"), "example.com");
        assert_eq!(normalize_domain("http://example.com"), "example.com");
        assert_eq!(normalize_domain("WWW.example.co.il"), "example.co.il");
    }

    #[test]
    fn removes_all_whitespace() {
        assert_eq!(normalize_domain("  exa mple.com \t\n"), "example.com");
    }

    #[test]
    fn strips_leading_dots() {
        assert_eq!(normalize_domain("..example.com"), "example.com");
        assert_eq!(normalize_domain("https://.www.example.com"), "example.com");
    }

    #[test]
    fn keeps_path_but_not_trailing_slash() {
        assert_eq!(normalize_domain("example.com/blog/"), "example.com/blog");
    }

    #[test]
    fn repeated_prefixes_are_all_stripped() {
        assert_eq!(normalize_domain("https://https://www.www.example.com//"), "example.com");
    }

    #[test]
    fn noise_only_is_empty() {
        assert_eq!(normalize_domain("   "), "");
        assert_eq!(normalize_domain("https://www./"), "");
    }

    #[test]
    fn output_invariants_and_idempotence() {
        let inputs = [
            "",
            "/",
            ".",
            "www.",
            "HTTPS://WWW.EXAMPLE.COM/",
            "http://www.https://example.com",
            " w w w . example.com / ",
            "https:// www.example.com",
            "...www...example.com///",
            "xn--4dbrk0ce.co.il",
            "דוגמה.co.il/",
        ];
        for input in inputs {
            let once = normalize_domain(input);
            assert!(!once.starts_with("http://") && !once.starts_with("https://"), "{input:?} -> {once:?}");
            assert!(!once.starts_with("www."), "{input:?} -> {once:?}");
            assert!(!once.ends_with('/'), "{input:?} -> {once:?}");
            assert!(!once.chars().any(char::is_whitespace), "{input:?} -> {once:?}");
            assert_eq!(normalize_domain(&once), once, "not idempotent for {input:?}");
        }
    }
}
