use crate::ast::{Chain, Segment, SegmentKind};
use crate::error::SyntaxError;
use crate::grammar::{classify, Classified, TokenPosition};
use crate::utils::split_tokens;
use log::debug;
use miette::NamedSource;
use std::ops::Range;

/// Right-to-left parser for inline IDL references such as `Foo.bar.baz(a, b)`.
///
/// Tokens are consumed from the end of the input toward the start. Working
/// backwards means a bare word can be told apart as attribute or base just by
/// checking whether any tokens remain, and each segment's parent is simply the
/// next segment produced.
#[derive(Debug)]
pub struct Parser<'a> {
    name: String,
    source_text: &'a str,
    tokens: Vec<(&'a str, Range<usize>)>,
}

impl<'a> Parser<'a> {
    pub fn new(source_text: &'a str) -> Self {
        Self::new_with_name(source_text, "inline-idl".to_string())
    }

    /// `name` only shows up in diagnostics.
    pub fn new_with_name(source_text: &'a str, name: String) -> Self {
        Self {
            name,
            source_text,
            tokens: split_tokens(source_text),
        }
    }

    pub fn parse_chain(&self) -> Result<Chain, SyntaxError> {
        // Collected innermost first.
        let mut segments: Vec<Segment> = Vec::with_capacity(self.tokens.len() + 1);
        let mut remaining = self.tokens.len();

        for (token, span) in self.tokens.iter().rev() {
            remaining -= 1;
            let position = if remaining == 0 {
                TokenPosition::Leftmost
            } else {
                TokenPosition::Inner
            };

            let Some((rule, classified)) = classify(token, position) else {
                return Err(self.err_unmatched(token, remaining + 1, span.clone()));
            };
            debug!("token {} `{}` matched {}", remaining + 1, token, rule);

            match (position, classified) {
                (
                    TokenPosition::Leftmost,
                    Classified {
                        kind: kind @ SegmentKind::EnumValue { .. },
                        identifier,
                    },
                ) => {
                    // `Foo["value"]` with nothing to its left still needs a base.
                    segments.push(Segment::new(kind, identifier.clone(), span.clone()));
                    segments.push(Segment::new(SegmentKind::Base, identifier, span.clone()));
                }
                (TokenPosition::Leftmost, Classified { kind, .. }) if kind != SegmentKind::Base => {
                    return Err(self.err_unmatched(token, 1, span.clone()));
                }
                (_, Classified { kind, identifier }) => {
                    segments.push(Segment::new(kind, identifier, span.clone()));
                }
            }
        }

        segments.reverse();
        for (index, segment) in segments.iter_mut().enumerate() {
            segment.parent = index.checked_sub(1);
        }

        Ok(Chain {
            source: self.source_text.to_string(),
            segments,
        })
    }

    fn err_unmatched(&self, token: &str, position: usize, span: Range<usize>) -> SyntaxError {
        SyntaxError::UnmatchedToken {
            token: token.to_string(),
            position,
            src: NamedSource::new(self.name.clone(), self.source_text.to_string()),
            span: (span.start, span.len()).into(),
        }
    }
}

/// Parses `input` into a chain of segments.
pub fn parse(input: &str) -> Result<Chain, SyntaxError> {
    Parser::new(input).parse_chain()
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Report;

    fn parse_ok(source: &str) -> Chain {
        match parse(source) {
            Ok(chain) => chain,
            Err(err) => {
                let report = Report::from(err);
                panic!("{:?}", report);
            }
        }
    }

    fn kinds(chain: &Chain) -> Vec<&SegmentKind> {
        chain.segments.iter().map(|s| &s.kind).collect()
    }

    #[test]
    fn test_single_base() {
        let chain = parse_ok("Foo");
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.segments[0].kind, SegmentKind::Base);
        assert_eq!(chain.segments[0].identifier, "Foo");
        assert_eq!(chain.segments[0].parent, None);
    }

    #[test]
    fn test_base_and_attribute() {
        let chain = parse_ok("Foo.bar");
        assert_eq!(kinds(&chain), vec![&SegmentKind::Base, &SegmentKind::Attribute]);
        assert_eq!(chain.segments[1].identifier, "bar");
        assert_eq!(chain.segments[1].parent, Some(0));
    }

    #[test]
    fn test_attribute_then_method() {
        let chain = parse_ok("Foo.bar.baz()");
        assert_eq!(
            kinds(&chain),
            vec![
                &SegmentKind::Base,
                &SegmentKind::Attribute,
                &SegmentKind::Method { args: vec![] }
            ]
        );
        assert_eq!(chain.segments[1].parent, Some(0));
        assert_eq!(chain.segments[2].parent, Some(1));
    }

    #[test]
    fn test_method_args() {
        let chain = parse_ok("Foo.baz(arg1, arg2)");
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.segments[1].identifier, "baz");
        assert_eq!(chain.segments[1].args(), ["arg1", "arg2"]);
        assert!(chain.segments[0].args().is_empty());
    }

    #[test]
    fn test_internal_slot() {
        let chain = parse_ok("Foo.[[bar]]");
        assert_eq!(chain.segments[1].kind, SegmentKind::InternalSlot);
        assert_eq!(chain.segments[1].identifier, "bar");
        assert_eq!(chain.segments[1].span, 4..11);
    }

    #[test]
    fn test_leftmost_enum_value_gets_a_base() {
        let chain = parse_ok(r#"Foo["enum value"]"#);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.segments[0].kind, SegmentKind::Base);
        assert_eq!(chain.segments[0].identifier, "Foo");
        assert_eq!(chain.segments[1].identifier, "Foo");
        assert_eq!(chain.segments[1].enum_value(), Some("enum value"));
        assert_eq!(chain.segments[1].parent, Some(0));
    }

    #[test]
    fn test_inner_enum_value() {
        let chain = parse_ok(r#"Foo.Mode["fast"]"#);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.segments[1].identifier, "Mode");
        assert_eq!(chain.segments[1].enum_value(), Some("fast"));
    }

    #[test]
    fn test_leftmost_word_is_always_base() {
        let chain = parse_ok("a.b.c.d");
        assert!(chain.segments[0].is_base());
        assert!(chain.segments[1..]
            .iter()
            .all(|s| s.kind == SegmentKind::Attribute));
    }

    #[test]
    fn test_parents_walk_back_to_base() {
        let chain = parse_ok("Foo.bar.[[slot]].baz(x).qux");
        for index in 0..chain.len() {
            let ancestors: Vec<_> = chain.ancestors(index).collect();
            assert_eq!(ancestors.len(), index);
            if index > 0 {
                assert!(ancestors.last().unwrap().is_base());
            }
        }
    }

    #[test]
    fn test_empty_input() {
        let err = parse("").unwrap_err();
        assert_eq!(err.token(), "");
        assert_eq!(err.position(), 1);
    }

    #[test]
    fn test_empty_token_position() {
        let err = parse("Foo..bar").unwrap_err();
        assert_eq!(err.token(), "");
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn test_trailing_dot() {
        let err = parse("Foo.").unwrap_err();
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn test_leftmost_method_is_rejected() {
        let err = parse("foo().bar").unwrap_err();
        assert_eq!(err.token(), "foo()");
        assert_eq!(err.position(), 1);
        assert!(parse("[[slot]]").is_err());
    }

    #[test]
    fn test_dot_inside_arguments_splits() {
        let err = parse("Foo.bar(a.b)").unwrap_err();
        assert_eq!(err.token(), "b)");
        assert_eq!(err.position(), 3);
    }

    #[test]
    fn test_unbalanced_parens() {
        let err = parse("Foo.bar(a").unwrap_err();
        assert_eq!(err.token(), "bar(a");
    }

    #[test]
    fn test_error_message_names_token() {
        let err = parse("Foo.b-r.baz").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("`b-r`"));
        assert!(message.contains("position 2"));
    }
}
