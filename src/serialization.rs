use crate::markup::{CrossRef, Fragment, Node, VarRef};
use std::fmt::{self, Display, Write};

impl Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_nodes(f, &self.nodes)
    }
}

/// Writes a fragment as HTML. Text and attribute values are escaped; quotes
/// only inside attributes.
pub(crate) fn to_html(fragment: &Fragment) -> String {
    fragment.to_string()
}

fn write_nodes(out: &mut impl Write, nodes: &[Node]) -> fmt::Result {
    for node in nodes {
        match node {
            Node::Text { text } => write_escaped(out, text, false)?,
            Node::Code { children } => {
                out.write_str("<code>")?;
                write_nodes(out, children)?;
                out.write_str("</code>")?;
            }
            Node::Link(link) => write_link(out, link)?,
            Node::Var(var) => write_var(out, var)?,
        }
    }
    Ok(())
}

fn write_link(out: &mut impl Write, link: &CrossRef) -> fmt::Result {
    out.write_str("<a")?;
    write_attr(out, "data-xref-type", Some(link.xref_type.as_str()))?;
    write_attr(out, "data-link-for", link.link_for.as_deref())?;
    write_attr(out, "data-lt", link.lt.as_deref())?;
    write_attr(out, "data-type", link.data_type.as_deref())?;
    out.write_char('>')?;
    write_escaped(out, &link.text, false)?;
    out.write_str("</a>")
}

fn write_var(out: &mut impl Write, var: &VarRef) -> fmt::Result {
    out.write_str("<var")?;
    write_attr(out, "data-type", var.var_type.as_deref())?;
    out.write_char('>')?;
    write_escaped(out, &var.name, false)?;
    out.write_str("</var>")
}

fn write_attr(out: &mut impl Write, name: &str, value: Option<&str>) -> fmt::Result {
    let Some(value) = value else {
        return Ok(());
    };
    write!(out, " {name}=\"")?;
    write_escaped(out, value, true)?;
    out.write_char('"')
}

fn write_escaped(out: &mut impl Write, text: &str, in_attr: bool) -> fmt::Result {
    for c in text.chars() {
        match c {
            '&' => out.write_str("&amp;")?,
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            '"' if in_attr => out.write_str("&quot;")?,
            _ => out.write_char(c)?,
        }
    }
    Ok(())
}
