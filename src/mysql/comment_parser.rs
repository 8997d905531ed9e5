/// Extracts the route tag from a query of the form
/// `SELECT /* host:route */ ...`, i.e. the part after the first colon of
/// the second space-delimited token when it sits between `/*` and `*/`.
/// A comment without a colon yields the whole token.
///
/// The split runs over the raw payload bytes, so extra whitespace around
/// the comment defeats the match; this mirrors how applications emit the
/// tag right after the verb.
pub fn extract_route(payload: &[u8]) -> Option<String> {
    let parts: Vec<&[u8]> = payload.splitn(5, |&b| b == b' ').collect();
    if parts.len() < 4 || parts[1] != b"/*" || parts[3] != b"*/" {
        return None;
    }
    let tag = parts[2];
    let route = match tag.iter().position(|&b| b == b':') {
        Some(colon) => &tag[colon + 1..],
        None => tag,
    };
    Some(String::from_utf8_lossy(route).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_with_hostname() {
        assert_eq!(
            extract_route(b"SELECT /* web01:user_lookup */ * FROM u WHERE id=1"),
            Some("user_lookup".to_string()),
        );
    }

    #[test]
    fn route_without_hostname() {
        assert_eq!(
            extract_route(b"SELECT /* user_lookup */ * FROM u"),
            Some("user_lookup".to_string()),
        );
    }

    #[test]
    fn no_comment() {
        assert_eq!(extract_route(b"SELECT * FROM u"), None);
        assert_eq!(extract_route(b"SELECT"), None);
    }

    #[test]
    fn comment_not_in_second_position() {
        assert_eq!(extract_route(b"SELECT * /* web01:late */ FROM u"), None);
    }

    #[test]
    fn non_utf8_payload_does_not_disturb_the_split() {
        assert_eq!(
            extract_route(b"SELECT /* web01:user_lookup */ * FROM t WHERE name='caf\xe9'"),
            Some("user_lookup".to_string()),
        );
    }
}
