use serde::Serialize;

/// Rendered output of one inline reference, in source order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Fragment {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "kebab-case")]
pub enum Node {
    Text { text: String },
    Code { children: Vec<Node> },
    Link(CrossRef),
    Var(VarRef),
}

/// A link that a later stage resolves against the definition index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossRef {
    pub text: String,
    pub xref_type: XrefType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_for: Option<String>,
    /// Link text to match when it differs from `text`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum XrefType {
    #[serde(rename = "_IDL_")]
    Idl,
    #[serde(rename = "attribute")]
    Attribute,
    #[serde(rename = "method")]
    Method,
    #[serde(rename = "internal-slot")]
    InternalSlot,
    #[serde(rename = "enum-value")]
    EnumValue,
}

impl XrefType {
    pub fn as_str(self) -> &'static str {
        match self {
            XrefType::Idl => "_IDL_",
            XrefType::Attribute => "attribute",
            XrefType::Method => "method",
            XrefType::InternalSlot => "internal-slot",
            XrefType::EnumValue => "enum-value",
        }
    }
}

/// A variable reference, optionally carrying its declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarRef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub var_type: Option<String>,
}

impl Node {
    pub fn text(text: impl Into<String>) -> Node {
        Node::Text { text: text.into() }
    }

    pub fn link(text: impl Into<String>, xref_type: XrefType, link_for: Option<String>) -> Node {
        Node::Link(CrossRef {
            text: text.into(),
            xref_type,
            link_for,
            lt: None,
            data_type: None,
        })
    }

    pub fn var(name: impl Into<String>, var_type: Option<String>) -> Node {
        Node::Var(VarRef {
            name: name.into(),
            var_type,
        })
    }
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: Node) {
        // Adjacent text is merged so output stays compact.
        if let (Some(Node::Text { text: last }), Node::Text { text }) = (self.nodes.last_mut(), &node)
        {
            last.push_str(text);
            return;
        }
        self.nodes.push(node);
    }

    pub fn extend(&mut self, other: Fragment) {
        for node in other.nodes {
            self.push(node);
        }
    }

    /// Concatenated visible text, with all markup stripped.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.nodes, &mut out);
        out
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text { text } => out.push_str(text),
            Node::Code { children } => collect_text(children, out),
            Node::Link(link) => out.push_str(&link.text),
            Node::Var(var) => out.push_str(&var.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_merges_text() {
        let mut fragment = Fragment::new();
        fragment.push(Node::text("."));
        fragment.push(Node::text("[["));
        fragment.push(Node::link("slot", XrefType::InternalSlot, None));
        fragment.push(Node::text("]]"));
        assert_eq!(fragment.nodes.len(), 3);
        assert_eq!(fragment.text_content(), ".[[slot]]");
    }
}
