use crate::ast::{Chain, Segment, SegmentKind};
use crate::error::RenderError;
use crate::markup::{CrossRef, Fragment, Node, XrefType};
use crate::resolver::{Anchor, Resolver};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Wrap the whole reference in a single code node.
    pub wrap_in_code: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions { wrap_in_code: true }
    }
}

/// Renders a parsed chain left to right, recording each segment's resolved type
/// as it goes so later segments can link against it.
pub struct Renderer<'r, R: Resolver + ?Sized> {
    resolver: &'r R,
    context: Option<Anchor>,
    options: RenderOptions,
}

impl<'r, R: Resolver + ?Sized> Renderer<'r, R> {
    pub fn new(resolver: &'r R, context: Option<Anchor>) -> Self {
        Self::with_options(resolver, context, RenderOptions::default())
    }

    pub fn with_options(resolver: &'r R, context: Option<Anchor>, options: RenderOptions) -> Self {
        Renderer {
            resolver,
            context,
            options,
        }
    }

    /// Segments that already carry a resolved type keep it.
    pub fn render(&self, chain: &mut Chain) -> Result<Fragment, RenderError> {
        check_consistency(chain)?;

        let mut fragment = Fragment::new();
        for index in 0..chain.segments.len() {
            let link_for = chain.parent_of(index).and_then(|p| p.resolved_type.clone());
            let segment = &mut chain.segments[index];
            debug!("rendering {:?} `{}`", segment.kind, segment.identifier);
            fragment.extend(self.render_segment(segment, link_for));
        }

        if self.options.wrap_in_code {
            return Ok(Fragment {
                nodes: vec![Node::Code {
                    children: fragment.nodes,
                }],
            });
        }
        Ok(fragment)
    }

    fn render_segment(&self, segment: &mut Segment, link_for: Option<String>) -> Fragment {
        let mut out = Fragment::new();
        match &segment.kind {
            SegmentKind::Base => {
                match self
                    .resolver
                    .lookup_contextual_variable_type(&segment.identifier, self.context)
                {
                    Some(var_type) => {
                        out.push(Node::var(&segment.identifier, Some(var_type.clone())));
                        record_type(&mut segment.resolved_type, Some(var_type));
                    }
                    None => {
                        out.push(Node::link(&segment.identifier, XrefType::Idl, None));
                        let assumed = segment.identifier.clone();
                        record_type(&mut segment.resolved_type, Some(assumed));
                    }
                }
            }
            SegmentKind::InternalSlot => {
                let slot_type = self.resolver.lookup_declared_type(&segment.identifier);
                out.push(Node::text(".[["));
                out.push(Node::Link(CrossRef {
                    text: segment.identifier.clone(),
                    xref_type: XrefType::InternalSlot,
                    link_for,
                    lt: None,
                    data_type: slot_type.clone(),
                }));
                out.push(Node::text("]]"));
                record_type(&mut segment.resolved_type, slot_type);
            }
            SegmentKind::Attribute => {
                out.push(Node::text("."));
                out.push(Node::link(&segment.identifier, XrefType::Attribute, link_for));
            }
            SegmentKind::Method { args } => {
                out.push(Node::text("."));
                out.push(Node::Link(CrossRef {
                    text: segment.identifier.clone(),
                    xref_type: XrefType::Method,
                    link_for,
                    lt: Some(format!("{}({})", segment.identifier, args.join(", "))),
                    data_type: None,
                }));
                out.push(Node::text("("));
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push(Node::text(", "));
                    }
                    let arg_type = self
                        .resolver
                        .lookup_contextual_variable_type(arg, self.context);
                    out.push(Node::var(arg, arg_type));
                }
                out.push(Node::text(")"));
            }
            SegmentKind::EnumValue { value } => {
                out.push(Node::text("\""));
                out.push(Node::link(
                    value,
                    XrefType::EnumValue,
                    Some(segment.identifier.clone()),
                ));
                out.push(Node::text("\""));
            }
        }
        out
    }
}

/// A resolved type is recorded once; rendering the same chain again keeps it.
fn record_type(slot: &mut Option<String>, resolved: Option<String>) {
    if slot.is_none() {
        *slot = resolved;
    }
}

/// The shape the parser guarantees: one base, first, and every other segment
/// linked to its left neighbour.
fn check_consistency(chain: &Chain) -> Result<(), RenderError> {
    let fail = |index: usize, reason: &str| -> Result<(), RenderError> {
        warn!("refusing to render `{}`: {reason}", chain.source);
        Err(RenderError::Inconsistent {
            index,
            reason: reason.to_string(),
        })
    };

    if chain.segments.is_empty() {
        return fail(0, "chain has no segments");
    }
    for (index, segment) in chain.segments.iter().enumerate() {
        match (index, segment.is_base(), segment.parent) {
            (0, true, None) => {}
            (0, true, Some(_)) => return fail(0, "base segment has a parent"),
            (0, false, _) => return fail(0, "first segment is not a base"),
            (_, true, _) => return fail(index, "base segment after the first position"),
            (_, false, Some(parent)) if parent + 1 == index => {}
            (_, false, Some(_)) => return fail(index, "parent is not the left neighbour"),
            (_, false, None) => return fail(index, "segment has no parent"),
        }
    }
    Ok(())
}

/// Renders `chain` with default options.
pub fn render<R: Resolver + ?Sized>(
    chain: &mut Chain,
    resolver: &R,
    context: Option<Anchor>,
) -> Result<Fragment, RenderError> {
    Renderer::new(resolver, context).render(chain)
}
