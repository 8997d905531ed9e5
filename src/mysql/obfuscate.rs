use std::fmt::Write;

/// Token classes recognized by the query scanner. Value-bearing tokens
/// (quotes and numbers) collapse to `?`, whitespace runs collapse to a
/// single space, everything else is copied through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TokenType {
    Quote,
    Number,
    Whitespace,
    Word,
    Other,
}

fn is_whitespace(ch: u8) -> bool {
    ch == b' ' || (0x09..=0x0d).contains(&ch)
}

fn is_word_part(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'$' || ch == b'_'
}

/// Scans one token at the start of `query`, returning its length and
/// class. A quoted token runs to the matching unescaped delimiter and
/// includes both delimiters; an unterminated quote runs to end of input.
///
/// The scanner intentionally keeps the historical warts of this tool:
/// numbers know no sign or decimal point, and a digit opens a NUMBER
/// token even when it would read as part of an identifier.
fn scan_token(query: &[u8]) -> (usize, TokenType) {
    debug_assert!(!query.is_empty());
    match query[0] {
        delim @ (b'\'' | b'"') => {
            let mut escaped = false;
            for (i, &ch) in query.iter().enumerate().skip(1) {
                if escaped {
                    escaped = false;
                    continue;
                }
                if ch == b'\\' {
                    escaped = true;
                } else if ch == delim {
                    return (i + 1, TokenType::Quote);
                }
            }
            (query.len(), TokenType::Quote)
        }
        b'0'..=b'9' => {
            for (i, &ch) in query.iter().enumerate().skip(1) {
                if !ch.is_ascii_digit() {
                    return (i, TokenType::Number);
                }
            }
            (query.len(), TokenType::Number)
        }
        ch if is_whitespace(ch) => {
            for (i, &ch) in query.iter().enumerate().skip(1) {
                if !is_whitespace(ch) {
                    return (i, TokenType::Whitespace);
                }
            }
            (query.len(), TokenType::Whitespace)
        }
        ch if ch.is_ascii_alphabetic() => {
            for (i, &ch) in query.iter().enumerate().skip(1) {
                if !is_word_part(ch) {
                    return (i, TokenType::Word);
                }
            }
            (query.len(), TokenType::Word)
        }
        _ => (1, TokenType::Other),
    }
}

/// Replaces value-bearing tokens with `?` so structurally identical
/// queries share one aggregation bucket, then normalizes any leading
/// route comment and collapses `IN (?, ?, ...)` lists to `(?)`.
///
/// The whole pass runs on bytes; word and other tokens are copied
/// through untouched and the result is converted to text once at the
/// end, so non-UTF-8 query text keeps its byte ranges intact.
pub fn canonicalize(query: &[u8]) -> String {
    let mut out = Vec::with_capacity(query.len());
    let mut i = 0;
    while i < query.len() {
        let (length, toktype) = scan_token(&query[i..]);
        match toktype {
            TokenType::Quote | TokenType::Number => out.push(b'?'),
            TokenType::Whitespace => out.push(b' '),
            TokenType::Word | TokenType::Other => out.extend_from_slice(&query[i..i + length]),
        }
        i += length;
    }
    let out = collapse_placeholder_lists(normalize_route_comment(out));
    String::from_utf8_lossy(&out).into_owned()
}

/// Strips the `hostname:` prefix from a `/* hostname:route */` comment in
/// the second space-delimited token, leaving only the route tag.
fn normalize_route_comment(query: Vec<u8>) -> Vec<u8> {
    let parts: Vec<&[u8]> = query.splitn(5, |&b| b == b' ').collect();
    if parts.len() >= 4 && parts[1] == b"/*" && parts[3] == b"*/" {
        if let Some(colon) = parts[2].iter().position(|&b| b == b':') {
            let mut normalized = parts.clone();
            normalized[2] = &parts[2][colon + 1..];
            return normalized.join(&b' ');
        }
    }
    query
}

/// Removes every `"?, "` occurrence so placeholder lists left by the
/// scanner shrink to a single `?`.
fn collapse_placeholder_lists(buf: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(buf.len());
    let mut i = 0;
    while i < buf.len() {
        if buf[i..].starts_with(b"?, ") {
            i += 3;
        } else {
            out.push(buf[i]);
            i += 1;
        }
    }
    out
}

/// Escapes a raw query for terminal display, keeping printable ASCII,
/// LF and CR and rendering everything else as `\xNN`.
pub fn escape_raw(query: &[u8]) -> String {
    let mut out = String::with_capacity(query.len());
    for &ch in query {
        if (0x20..=0x7e).contains(&ch) || ch == 0x0a || ch == 0x0d {
            out.push(ch as char);
        } else {
            let _ = write!(out, "\\x{:02x}", ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_queries() {
        let cases = [
            (
                "select * from table where col=1",
                "select * from table where col=?",
            ),
            (
                "select * from table where col=\"hello\"",
                "select * from table where col=?",
            ),
            (
                "select * from table where col='hello'",
                "select * from table where col=?",
            ),
            (
                "select * from table where col='\\''",
                "select * from table where col=?",
            ),
            (
                "select * from table where x in (1, 2, 'foo')",
                "select * from table where x in (?)",
            ),
            ("select *     from      table", "select * from table"),
            ("select *\nfrom\n\n\n\r\ntable", "select * from table"),
            ("select * from s2compiled", "select * from s2compiled"),
            (
                "select * from table where col=\"'\"",
                "select * from table where col=?",
            ),
            (
                "select * from table where col='\"'",
                "select * from table where col=?",
            ),
        ];
        for (input, expected) in cases {
            assert_eq!(canonicalize(input.as_bytes()), expected, "for {:?}", input);
        }
    }

    #[test]
    fn deterministic_and_idempotent() {
        let queries = [
            "select * from table where x in (1, 2, 'foo')",
            "SELECT /* web01:user_lookup */ * FROM u WHERE id=1",
            "update t set a='x', b=2 where id=3",
        ];
        for q in queries {
            let once = canonicalize(q.as_bytes());
            assert_eq!(once, canonicalize(q.as_bytes()));
            assert_eq!(once, canonicalize(once.as_bytes()));
        }
    }

    #[test]
    fn literal_elision() {
        assert_eq!(
            canonicalize(b"select * from t where a=12345 and b='x'"),
            canonicalize(b"select * from t where a=9 and b='something else'"),
        );
    }

    #[test]
    fn values_list_collapses() {
        assert_eq!(
            canonicalize(b"insert into t (a, b, c) values (1, 'two', 3)"),
            "insert into t (a, b, c) values (?)",
        );
    }

    #[test]
    fn unterminated_quote_elided() {
        assert_eq!(
            canonicalize(b"select * from t where a='oops"),
            "select * from t where a=?",
        );
    }

    #[test]
    fn standalone_leading_digit_splits_word() {
        // historical tokenizer wart, kept as-is
        assert_eq!(canonicalize(b"select 2compiled"), "select ?compiled");
    }

    #[test]
    fn route_comment_normalized() {
        assert_eq!(
            canonicalize(b"SELECT /* web01:user_lookup */ * FROM u WHERE id=1"),
            "SELECT /* user_lookup */ * FROM u WHERE id=?",
        );
        // no colon means no hostname to strip
        assert_eq!(
            canonicalize(b"SELECT /* lookup */ * FROM u"),
            "SELECT /* lookup */ * FROM u",
        );
    }

    #[test]
    fn non_ascii_bytes_pass_through_the_scan() {
        // multibyte text is kept byte for byte even though each byte
        // scans as its own OTHER token
        assert_eq!(
            canonicalize("select * from café".as_bytes()),
            "select * from café",
        );
        // bytes that are invalid UTF-8 are only replaced at the text
        // boundary, after tokenizing
        assert_eq!(canonicalize(b"select 1 #\xff"), "select ? #\u{fffd}");
    }

    #[test]
    fn escape_raw_keeps_printable() {
        assert_eq!(escape_raw(b"select 1\n"), "select 1\n");
        assert_eq!(escape_raw(b"\x00\xffok"), "\\x00\\xffok");
    }
}
