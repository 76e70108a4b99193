use crate::ast::Chain;
use crate::error::IdlError;
use crate::markup::Fragment;
use crate::parser::Parser;
use crate::render::{RenderOptions, Renderer};
use crate::resolver::{Anchor, Resolver};
use crate::serialization::to_html;
use serde::Serialize;

/// The result of processing one inline IDL reference.
/// Holds the chain with its resolved types filled in alongside the rendered
/// markup, so callers can inspect either.
#[derive(Debug, Clone, Serialize)]
pub struct InlineIdl {
    pub chain: Chain,
    pub fragment: Fragment,
}

impl InlineIdl {
    /// Renders the fragment as an HTML string.
    #[must_use]
    pub fn to_html(&self) -> String {
        to_html(&self.fragment)
    }

    /// Serializes the chain and fragment into a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self)
    }

    /// Serializes the chain and fragment into a YAML string.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self)
    }
}

/// Parses and renders an inline IDL reference such as `Foo.bar.baz(a, b)`.
///
/// This is the primary entry point. `anchor` is where the reference appears in
/// the document and only scopes variable lookups.
///
/// # Errors
///
/// Returns `IdlError::Syntax` if the reference does not parse, and
/// `IdlError::Render` if the parsed chain is internally inconsistent.
pub fn process<R: Resolver + ?Sized>(
    input: &str,
    resolver: &R,
    anchor: Option<Anchor>,
) -> Result<InlineIdl, IdlError> {
    process_with_options(input, resolver, anchor, RenderOptions::default())
}

/// Like [`process`], with explicit render options.
pub fn process_with_options<R: Resolver + ?Sized>(
    input: &str,
    resolver: &R,
    anchor: Option<Anchor>,
    options: RenderOptions,
) -> Result<InlineIdl, IdlError> {
    let mut chain = Parser::new(input).parse_chain()?;
    let fragment = Renderer::with_options(resolver, anchor, options).render(&mut chain)?;
    Ok(InlineIdl { chain, fragment })
}
