use crate::error::IndexError;
use log::trace;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Read-only queries the renderer makes against the surrounding document.
///
/// Both lookups compare trimmed, case-sensitive text and return the first
/// match in document order. A miss is `None`, never an error.
pub trait Resolver {
    /// Declared type of the definition whose display text is `identifier`.
    fn lookup_declared_type(&self, identifier: &str) -> Option<String>;

    /// Declared type of the first variable named `identifier` in the nearest
    /// structural scope enclosing `context`. No context means the whole document.
    fn lookup_contextual_variable_type(
        &self,
        identifier: &str,
        context: Option<Anchor>,
    ) -> Option<String>;
}

/// A resolver that knows nothing. Every lookup misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullResolver;

impl Resolver for NullResolver {
    fn lookup_declared_type(&self, _identifier: &str) -> Option<String> {
        None
    }

    fn lookup_contextual_variable_type(
        &self,
        _identifier: &str,
        _context: Option<Anchor>,
    ) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeId(pub usize);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);
}

/// The place in the document an inline reference was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor(pub ScopeId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    #[serde(default = "root_scope")]
    pub parent: ScopeId,
    /// Structural scopes (sections, definition blocks) bound variable lookups.
    #[serde(default = "structural_default")]
    pub structural: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionRecord {
    pub text: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableRecord {
    pub text: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
    #[serde(default = "root_scope")]
    pub scope: ScopeId,
}

fn root_scope() -> ScopeId {
    ScopeId::ROOT
}

fn structural_default() -> bool {
    true
}

/// Serialized shape of a [`DocumentIndex`]. The root scope is implicit, so
/// `scopes[0]` gets id 1.
#[derive(Debug, Default, Serialize, Deserialize)]
struct IndexData {
    #[serde(default)]
    scopes: Vec<Scope>,
    #[serde(default)]
    definitions: Vec<DefinitionRecord>,
    #[serde(default)]
    variables: Vec<VariableRecord>,
}

/// In-memory definitions and variables of a document, in document order.
#[derive(Debug, Clone)]
pub struct DocumentIndex {
    scopes: Vec<Scope>,
    definitions: Vec<DefinitionRecord>,
    variables: Vec<VariableRecord>,
}

impl Default for DocumentIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentIndex {
    pub fn new() -> Self {
        DocumentIndex {
            scopes: vec![Scope {
                parent: ScopeId::ROOT,
                structural: true,
            }],
            definitions: Vec::new(),
            variables: Vec::new(),
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId::ROOT
    }

    pub fn add_scope(&mut self, parent: ScopeId, structural: bool) -> Result<ScopeId, IndexError> {
        self.check_scope(parent)?;
        self.scopes.push(Scope { parent, structural });
        Ok(ScopeId(self.scopes.len() - 1))
    }

    pub fn define(&mut self, text: impl Into<String>, type_tag: Option<&str>) {
        self.definitions.push(DefinitionRecord {
            text: text.into(),
            type_tag: type_tag.map(str::to_string),
        });
    }

    pub fn declare_var(
        &mut self,
        scope: ScopeId,
        text: impl Into<String>,
        type_tag: Option<&str>,
    ) -> Result<(), IndexError> {
        self.check_scope(scope)?;
        self.variables.push(VariableRecord {
            text: text.into(),
            type_tag: type_tag.map(str::to_string),
            scope,
        });
        Ok(())
    }

    /// # Errors
    /// Returns an `IndexError` if the JSON is malformed or refers to unknown scopes.
    pub fn from_json_str(source: &str) -> Result<Self, IndexError> {
        let data: IndexData = serde_json::from_str(source)?;
        Self::from_data(data)
    }

    /// # Errors
    /// Returns an `IndexError` if the YAML is malformed or refers to unknown scopes.
    pub fn from_yaml_str(source: &str) -> Result<Self, IndexError> {
        let data: IndexData = serde_yaml::from_str(source)?;
        Self::from_data(data)
    }

    /// Loads an index from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let read = || {
            std::fs::read_to_string(path).map_err(|source| IndexError::Io {
                path: path.to_string_lossy().to_string(),
                source,
            })
        };
        match extension.as_str() {
            "json" => Self::from_json_str(&read()?),
            "yaml" | "yml" => Self::from_yaml_str(&read()?),
            _ => Err(IndexError::UnsupportedFormat { extension }),
        }
    }

    /// Serializes the index back to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let data = IndexData {
            scopes: self.scopes[1..].to_vec(),
            definitions: self.definitions.clone(),
            variables: self.variables.clone(),
        };
        serde_json::to_string_pretty(&data)
    }

    fn from_data(data: IndexData) -> Result<Self, IndexError> {
        let mut index = DocumentIndex::new();
        for scope in data.scopes {
            index.add_scope(scope.parent, scope.structural)?;
        }
        for definition in data.definitions {
            index.definitions.push(definition);
        }
        for variable in data.variables {
            index.check_scope(variable.scope)?;
            index.variables.push(variable);
        }
        Ok(index)
    }

    fn check_scope(&self, scope: ScopeId) -> Result<(), IndexError> {
        if scope.0 < self.scopes.len() {
            Ok(())
        } else {
            Err(IndexError::UnknownScope { scope: scope.0 })
        }
    }

    /// Closest structural scope at or above `scope`, the root if none is.
    fn structural_ancestor(&self, scope: ScopeId) -> ScopeId {
        let mut current = scope;
        loop {
            match self.scopes.get(current.0) {
                Some(s) if s.structural => return current,
                // Parents are always created before children, so this terminates.
                Some(s) if current != ScopeId::ROOT && s.parent < current => current = s.parent,
                _ => return ScopeId::ROOT,
            }
        }
    }

    fn is_within(&self, scope: ScopeId, ancestor: ScopeId) -> bool {
        let mut current = scope;
        loop {
            if current == ancestor {
                return true;
            }
            match self.scopes.get(current.0) {
                Some(s) if current != ScopeId::ROOT && s.parent < current => current = s.parent,
                _ => return false,
            }
        }
    }
}

fn text_matches(candidate: &str, identifier: &str) -> bool {
    candidate.trim() == identifier.trim()
}

impl Resolver for DocumentIndex {
    fn lookup_declared_type(&self, identifier: &str) -> Option<String> {
        let Some(found) = self
            .definitions
            .iter()
            .find(|d| text_matches(&d.text, identifier))
        else {
            trace!("no definition for `{identifier}`");
            return None;
        };
        found.type_tag.clone()
    }

    fn lookup_contextual_variable_type(
        &self,
        identifier: &str,
        context: Option<Anchor>,
    ) -> Option<String> {
        let boundary = context
            .map(|Anchor(scope)| self.structural_ancestor(scope))
            .unwrap_or(ScopeId::ROOT);
        let Some(found) = self
            .variables
            .iter()
            .filter(|v| self.is_within(v.scope, boundary))
            .find(|v| text_matches(&v.text, identifier))
        else {
            trace!("no variable `{identifier}` in scope {}", boundary.0);
            return None;
        };
        found.type_tag.clone()
    }
}
