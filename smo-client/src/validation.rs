//! Input grammars for SMO fields
//!
//! Resource identifiers must be either a URN (RFC 2141) or a URL following
//! the generic RFC 3986 layout `scheme://[userinfo@]host[:port][/path|?query]`.
//! Review timestamps are ISO 8601 with seconds and a mandatory zone designator.

use regex::Regex;

lazy_static::lazy_static! {
    static ref URL_RE: Regex = Regex::new(
        r#"^([a-z][a-z0-9*.-]*)://(?:(?:(?:[A-Za-z0-9_.+!$&'()*,;=-]|%[0-9a-f]{2})+:)*(?:[A-Za-z0-9_.+%!$&'()*,;=-]|%[0-9a-f]{2})+@)?(?:(?:[a-z0-9.-]|%[0-9a-f]{2})+|(?:\[(?:[0-9a-f]{0,4}:)*(?:[0-9a-f]{0,4})\]))(?::[0-9]+)?(?:[/|?](?:[A-Za-z0-9_#!:.?+=&@$'~*,;/()\[\]-]|%[0-9a-f]{2})*)?$"#
    )
    .unwrap();

    static ref URN_RE: Regex = Regex::new(
        r#"(?i)^urn:[a-z0-9][a-z0-9-]{1,31}:(?:[a-z0-9()+,.:=@;$_!*'-]|%(?:0[1-9a-f]|[1-9a-f][0-9a-f]))+$"#
    )
    .unwrap();

    static ref DATE_RE: Regex = Regex::new(
        r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(?:Z|[+-][0-9]{2}:[0-9]{2})$"
    )
    .unwrap();
}

/// Check URL syntax
pub fn is_url(candidate: &str) -> bool {
    URL_RE.is_match(candidate)
}

/// Check URN syntax (case-insensitive)
pub fn is_urn(candidate: &str) -> bool {
    URN_RE.is_match(candidate)
}

/// A resource identifier is any URN or URL
pub fn is_resource_uri(candidate: &str) -> bool {
    is_urn(candidate) || is_url(candidate)
}

/// Check `YYYY-MM-DDTHH:MM:SS` followed by `Z` or a `±HH:MM` offset
pub fn is_review_timestamp(candidate: &str) -> bool {
    DATE_RE.is_match(candidate)
}

/// Rating triple rule: all finite, `worst <= value <= best` and a non-empty scale
pub fn is_valid_rating(value: f64, worst: f64, best: f64) -> bool {
    value.is_finite()
        && worst.is_finite()
        && best.is_finite()
        && value >= worst
        && value <= best
        && worst != best
}
