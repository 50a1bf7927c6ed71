//! Serialize a rewritten tree back to HTML.

use std::fmt::Write;

use super::tree::Node;

/// Serialize the children of `root`, omitting the synthetic wrapper.
pub(crate) fn to_html(root: &Node) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str(&escape_xml(&root.text, false));
    for child in &root.children {
        write_node(child, &mut out);
    }
    out
}

fn write_node(node: &Node, out: &mut String) {
    out.push('<');
    out.push_str(&node.tag);
    for (key, value) in &node.attrs {
        // Writing into a String cannot fail.
        let _ = write!(out, r#" {key}="{}""#, escape_xml(value, true));
    }

    if node.children.is_empty() && node.text.is_empty() {
        out.push_str(" />");
    } else {
        out.push('>');
        out.push_str(&escape_xml(&node.text, false));
        for child in &node.children {
            write_node(child, out);
        }
        let _ = write!(out, "</{}>", node.tag);
    }

    out.push_str(&escape_xml(&node.tail, false));
}

fn escape_xml(text: &str, escape_quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if escape_quotes => result.push_str("&quot;"),
            _ => result.push(ch),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_serialize_nested() {
        let mut strong = Node::new("strong").with_text("Bold");
        strong.tail = " text".to_owned();
        let root = Node::new("root").with_children(vec![Node::new("p").with_children(vec![strong])]);

        assert_eq!(to_html(&root), "<p><strong>Bold</strong> text</p>");
    }

    #[test]
    fn test_serialize_self_closing_and_attributes() {
        let root = Node::new("root").with_children(vec![
            Node::new("img")
                .with_attr("src", "a.png")
                .with_attr("alt", r#"say "hi""#),
        ]);

        assert_eq!(
            to_html(&root),
            r#"<img src="a.png" alt="say &quot;hi&quot;" />"#
        );
    }

    #[test]
    fn test_escape_text() {
        let root = Node::new("root").with_children(vec![Node::new("code").with_text("a < b && c")]);
        assert_eq!(to_html(&root), "<code>a &lt; b &amp;&amp; c</code>");
    }

    #[test]
    fn test_root_text_kept() {
        let root = Node::new("root").with_text("plain");
        assert_eq!(to_html(&root), "plain");
    }
}
