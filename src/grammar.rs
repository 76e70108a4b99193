//! Segment grammar for the inline IDL micro-syntax.
//!
//! Every dot-separated token is classified by trying the rules below in
//! declaration order; the first rule that accepts the token decides its kind.
//!
//! 1. method         `name(arg, arg)`   (anchored at the end of the token only)
//! 2. internal slot  `[[name]]`
//! 3. enum value     `name["some value"]`
//! 4. attribute      `name`             (only while tokens remain to the left)
//! 5. base           `name`             (only for the leftmost token)
//!
//! Identifiers are ASCII word characters.

use crate::ast::SegmentKind;
use once_cell::sync::Lazy;
use regex::Regex;

static METHOD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9A-Za-z_]+)\((.*)\)$").unwrap());
static ARG_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*").unwrap());
static SLOT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[\[([0-9A-Za-z_]+)\]\]$").unwrap());
static ENUM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^([0-9A-Za-z_]+)\["([0-9A-Za-z_ ]*)"\]$"#).unwrap());
static WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Za-z_]+$").unwrap());

/// Where a token sits in the chain, as far as classification cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPosition {
    /// More tokens remain to the left.
    Inner,
    /// The leftmost token; nothing remains to process after it.
    Leftmost,
}

/// What a rule extracted from one token.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub kind: SegmentKind,
    pub identifier: String,
}

pub type Matcher = fn(&str, TokenPosition) -> Option<Classified>;

/// Rules in priority order. Order matters: the first match wins.
pub const RULES: &[(&str, Matcher)] = &[
    ("method", match_method),
    ("internal_slot", match_internal_slot),
    ("enum_value", match_enum_value),
    ("attribute", match_attribute),
    ("base", match_base),
];

/// Runs the rule table over `token`, returning the winning rule's name and result.
pub fn classify(token: &str, position: TokenPosition) -> Option<(&'static str, Classified)> {
    RULES
        .iter()
        .find_map(|(name, matcher)| matcher(token, position).map(|c| (*name, c)))
}

fn match_method(token: &str, _position: TokenPosition) -> Option<Classified> {
    let caps = METHOD_REGEX.captures(token)?;
    let args = ARG_SEPARATOR_REGEX
        .split(&caps[2])
        .filter(|arg| !arg.is_empty())
        .map(str::to_string)
        .collect();
    Some(Classified {
        kind: SegmentKind::Method { args },
        identifier: caps[1].to_string(),
    })
}

fn match_internal_slot(token: &str, _position: TokenPosition) -> Option<Classified> {
    let caps = SLOT_REGEX.captures(token)?;
    Some(Classified {
        kind: SegmentKind::InternalSlot,
        identifier: caps[1].to_string(),
    })
}

fn match_enum_value(token: &str, _position: TokenPosition) -> Option<Classified> {
    let caps = ENUM_REGEX.captures(token)?;
    Some(Classified {
        kind: SegmentKind::EnumValue {
            value: caps[2].to_string(),
        },
        identifier: caps[1].to_string(),
    })
}

fn match_attribute(token: &str, position: TokenPosition) -> Option<Classified> {
    if position != TokenPosition::Inner || !WORD_REGEX.is_match(token) {
        return None;
    }
    Some(Classified {
        kind: SegmentKind::Attribute,
        identifier: token.to_string(),
    })
}

fn match_base(token: &str, position: TokenPosition) -> Option<Classified> {
    if position != TokenPosition::Leftmost || !WORD_REGEX.is_match(token) {
        return None;
    }
    Some(Classified {
        kind: SegmentKind::Base,
        identifier: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenPosition::{Inner, Leftmost};

    fn kind_of(token: &str, position: TokenPosition) -> Option<&'static str> {
        classify(token, position).map(|(name, _)| name)
    }

    #[test]
    fn test_method_args() {
        let (_, c) = classify("baz(arg1, arg2)", Inner).unwrap();
        assert_eq!(c.identifier, "baz");
        assert_eq!(
            c.kind,
            SegmentKind::Method {
                args: vec!["arg1".to_string(), "arg2".to_string()]
            }
        );
    }

    #[test]
    fn test_method_without_args() {
        let (_, c) = classify("baz()", Inner).unwrap();
        assert_eq!(c.kind, SegmentKind::Method { args: vec![] });
    }

    #[test]
    fn test_method_separator_without_space() {
        let (_, c) = classify("f(a,b,,c)", Inner).unwrap();
        assert_eq!(
            c.kind,
            SegmentKind::Method {
                args: vec!["a".to_string(), "b".to_string(), "c".to_string()]
            }
        );
    }

    #[test]
    fn test_method_is_only_anchored_at_the_end() {
        let (_, c) = classify("x y(a)", Inner).unwrap();
        assert_eq!(c.identifier, "y");
        assert_eq!(kind_of("f(a", Inner), None);
        assert_eq!(kind_of("f(a) ", Inner), None);
    }

    #[test]
    fn test_internal_slot_requires_whole_token() {
        assert_eq!(kind_of("[[slot]]", Inner), Some("internal_slot"));
        assert_eq!(kind_of("x[[slot]]", Inner), None);
        assert_eq!(kind_of("[[slot]]x", Inner), None);
        assert_eq!(kind_of("[[]]", Inner), None);
    }

    #[test]
    fn test_enum_value() {
        let (name, c) = classify(r#"Mode["enum value 2"]"#, Leftmost).unwrap();
        assert_eq!(name, "enum_value");
        assert_eq!(c.identifier, "Mode");
        assert_eq!(
            c.kind,
            SegmentKind::EnumValue {
                value: "enum value 2".to_string()
            }
        );
        assert_eq!(kind_of(r#"Mode[""]"#, Inner), Some("enum_value"));
        assert_eq!(kind_of(r#"Mode["a-b"]"#, Inner), None);
        assert_eq!(kind_of(r#"Mode['a']"#, Inner), None);
    }

    #[test]
    fn test_bare_word_depends_on_position() {
        assert_eq!(kind_of("bar", Inner), Some("attribute"));
        assert_eq!(kind_of("bar", Leftmost), Some("base"));
    }

    #[test]
    fn test_rejects_non_words() {
        assert_eq!(kind_of("", Inner), None);
        assert_eq!(kind_of("", Leftmost), None);
        assert_eq!(kind_of("foo-bar", Inner), None);
        assert_eq!(kind_of("café", Leftmost), None);
    }
}
