//! Request-target handling: route/query splitting, path-id decoding,
//! and listing parameters.

use std::borrow::Cow;

use crate::db::ContactQuery;
use crate::models::ContactStatus;

/// Splits a request target into its route and query string.
pub fn split_target(target: &str) -> (&str, &str) {
    match target.split_once('?') {
        Some((route, query)) => (route, query),
        None => (target, ""),
    }
}

/// Decodes a percent-encoded path segment. Sequences that are not
/// valid UTF-8 are kept as sent rather than rejected.
pub fn decode_segment(raw: &str) -> Cow<'_, str> {
    percent_encoding::percent_decode_str(raw)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(raw))
}

/// Parses listing parameters out of a request target. Repeating
/// `status` grows the accepted set; empty values and unknown
/// parameters are ignored. An unparsable status is reported back
/// so the caller can reject the request.
pub fn parse_contact_query(target: &str) -> Result<ContactQuery, String> {
    let url = url::Url::parse(&format!("http://localhost{}", target))
        .map_err(|e| format!("bad request target: {}", e))?;

    let mut query = ContactQuery::default();
    for (key, value) in url.query_pairs() {
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "search" => query.search = value.to_string(),
            "status" => query.statuses.push(value.parse::<ContactStatus>()?),
            "company" => query.company = value.to_string(),
            "role" => query.role = value.to_string(),
            _ => {}
        }
    }
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_target() {
        assert_eq!(
            split_target("/api/users?search=ada"),
            ("/api/users", "search=ada")
        );
        assert_eq!(split_target("/api/users"), ("/api/users", ""));
    }

    #[test]
    fn test_decode_segment() {
        assert_eq!(decode_segment("user-1"), "user-1");
        assert_eq!(decode_segment("user%2D1"), "user-1");
        assert_eq!(decode_segment("a%20b"), "a b");
        // Broken encodings pass through untouched.
        assert_eq!(decode_segment("a%FFb"), "a%FFb");
    }

    #[test]
    fn test_parse_every_parameter() {
        let query = parse_contact_query(
            "/api/users?search=ada&status=active&status=pending&company=Acme&role=CEO",
        )
        .unwrap();
        assert_eq!(query.search, "ada");
        assert_eq!(
            query.statuses,
            vec![ContactStatus::Active, ContactStatus::Pending]
        );
        assert_eq!(query.company, "Acme");
        assert_eq!(query.role, "CEO");
    }

    #[test]
    fn test_percent_and_plus_decoding() {
        let query = parse_contact_query("/api/users?search=Tech%20Corp&company=A%26B+Co").unwrap();
        assert_eq!(query.search, "Tech Corp");
        assert_eq!(query.company, "A&B Co");
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = parse_contact_query("/api/users?status=archived").unwrap_err();
        assert!(err.contains("unknown status"));
    }

    #[test]
    fn test_empty_values_and_unknown_keys_are_ignored() {
        let query = parse_contact_query("/api/users?status=&page=2&search=").unwrap();
        assert!(query.statuses.is_empty());
        assert!(query.search.is_empty());
    }
}
