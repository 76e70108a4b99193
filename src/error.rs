use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum IdlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Index(#[from] IndexError),
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum SyntaxError {
    #[error("IDL micro-syntax parsing error: unexpected `{token}` at position {position}")]
    #[diagnostic(
        code(idl::syntax::unmatched_token),
        help(
            "Each dot-separated part must be `name`, `name(args)`, `[[slot]]` or `name[\"value\"]`, and the first part must be a plain name."
        )
    )]
    UnmatchedToken {
        token: String,
        /// 1-based, counted from the left.
        position: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a valid reference segment")]
        span: SourceSpan,
    },
}

impl SyntaxError {
    /// The literal text of the token that no rule accepted.
    pub fn token(&self) -> &str {
        match self {
            SyntaxError::UnmatchedToken { token, .. } => token,
        }
    }

    pub fn position(&self) -> usize {
        match self {
            SyntaxError::UnmatchedToken { position, .. } => *position,
        }
    }
}

/// Faults in the parser/renderer correspondence. These are bugs, not bad input.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum RenderError {
    #[error("inconsistent chain at segment {index}: {reason}")]
    #[diagnostic(
        code(idl::render::inconsistent),
        help("The chain handed to the renderer does not have the shape the parser produces.")
    )]
    Inconsistent { index: usize, reason: String },
}

#[derive(Error, Debug, Diagnostic)]
pub enum IndexError {
    #[error("failed to read document index from {path}")]
    #[diagnostic(code(idl::index::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON document index")]
    #[diagnostic(code(idl::index::json))]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML document index")]
    #[diagnostic(code(idl::index::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("record refers to unknown scope {scope}")]
    #[diagnostic(
        code(idl::index::unknown_scope),
        help("Scopes must be declared before the records and scopes that refer to them.")
    )]
    UnknownScope { scope: usize },

    #[error("unsupported document index format `{extension}`")]
    #[diagnostic(code(idl::index::format), help("Use a .json, .yaml or .yml file."))]
    UnsupportedFormat { extension: String },
}
