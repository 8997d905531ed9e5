use std::fmt::Write;

use crate::common::FlowKey;
use crate::mysql::{comment_parser, obfuscate};

/// One step of a compiled aggregation-key format.
#[derive(Debug, PartialEq, Eq)]
enum FormatItem {
    Literal(String),
    Source,
    SourceIp,
    Route,
    Query,
}

/// Aggregation-key format, compiled once at startup from a `#`-escaped
/// template: `#s` source `ip:port`, `#i` source ip, `#r` route comment,
/// `#q` query, `##` a literal `#`. Any other escape is kept verbatim.
pub struct KeyFormat(Vec<FormatItem>);

impl KeyFormat {
    pub fn compile(format: &str) -> Self {
        let mut items = Vec::new();
        let mut literal = String::new();
        let flush = |literal: &mut String, items: &mut Vec<FormatItem>| {
            if !literal.is_empty() {
                items.push(FormatItem::Literal(std::mem::take(literal)));
            }
        };
        let mut chars = format.chars();
        while let Some(ch) = chars.next() {
            if ch != '#' {
                literal.push(ch);
                continue;
            }
            match chars.next() {
                Some('s') => {
                    flush(&mut literal, &mut items);
                    items.push(FormatItem::Source);
                }
                Some('i') => {
                    flush(&mut literal, &mut items);
                    items.push(FormatItem::SourceIp);
                }
                Some('r') => {
                    flush(&mut literal, &mut items);
                    items.push(FormatItem::Route);
                }
                Some('q') => {
                    flush(&mut literal, &mut items);
                    items.push(FormatItem::Query);
                }
                Some('#') => literal.push('#'),
                Some(other) => {
                    literal.push('#');
                    literal.push(other);
                }
                None => literal.push('#'),
            }
        }
        flush(&mut literal, &mut items);
        KeyFormat(items)
    }

    /// Concatenates the program's items for one request. `query` is the
    /// QUERY token text (canonicalized, or raw when so configured); the
    /// route item re-reads the raw payload.
    pub fn build_key(&self, source: &FlowKey, payload: &[u8], query: &str) -> String {
        let mut key = String::new();
        for item in &self.0 {
            match item {
                FormatItem::Literal(text) => key.push_str(text),
                FormatItem::Source => {
                    let _ = write!(key, "{}", source);
                }
                FormatItem::SourceIp => {
                    let _ = write!(key, "{}", source.ip);
                }
                FormatItem::Query => key.push_str(query),
                FormatItem::Route => match comment_parser::extract_route(payload) {
                    Some(route) => key.push_str(&route),
                    None => {
                        key.push_str("(unknown) ");
                        key.push_str(&obfuscate::canonicalize(payload));
                    }
                },
            }
        }
        key
    }
}
