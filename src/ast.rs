use serde::Serialize;
use std::ops::Range;

/// A parsed inline IDL reference, left to right as written.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Chain {
    pub source: String,
    pub segments: Vec<Segment>,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub identifier: String,
    /// Filled in by the renderer.
    pub resolved_type: Option<String>,
    /// Index of the segment to the left. `None` only for the base.
    pub parent: Option<usize>,
    /// Byte range of the originating token in `Chain::source`.
    #[serde(skip)]
    pub span: Range<usize>,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SegmentKind {
    Base,
    Attribute,
    Method { args: Vec<String> },
    InternalSlot,
    EnumValue { value: String },
}

impl Segment {
    pub fn new(kind: SegmentKind, identifier: impl Into<String>, span: Range<usize>) -> Self {
        Segment {
            kind,
            identifier: identifier.into(),
            resolved_type: None,
            parent: None,
            span,
        }
    }

    /// Method arguments; empty for every other kind.
    pub fn args(&self) -> &[String] {
        match &self.kind {
            SegmentKind::Method { args } => args.as_slice(),
            _ => &[],
        }
    }

    pub fn enum_value(&self) -> Option<&str> {
        match &self.kind {
            SegmentKind::EnumValue { value } => Some(value),
            _ => None,
        }
    }

    pub fn is_base(&self) -> bool {
        matches!(self.kind, SegmentKind::Base)
    }
}

impl Chain {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn base(&self) -> Option<&Segment> {
        self.segments.first().filter(|s| s.is_base())
    }

    pub fn parent_of(&self, index: usize) -> Option<&Segment> {
        let parent = self.segments.get(index)?.parent?;
        self.segments.get(parent)
    }

    /// Walks parent links from `index` back to the base, nearest first.
    pub fn ancestors(&self, index: usize) -> Ancestors<'_> {
        Ancestors {
            chain: self,
            next: self.segments.get(index).and_then(|s| s.parent),
        }
    }
}

pub struct Ancestors<'a> {
    chain: &'a Chain,
    next: Option<usize>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Segment;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let segment = self.chain.segments.get(current)?;
        // Parents always point left; stop on anything else rather than loop.
        self.next = segment.parent.filter(|&p| p < current);
        Some(segment)
    }
}
