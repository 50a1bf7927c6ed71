//! Storage markup parser.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::entities::replace_html_entities;
use super::tree::Node;
use crate::error::PreprocessError;

/// Namespace declarations for the `ac:` and `ri:` prefixes.
const NAMESPACES: &[(&str, &str)] = &[
    ("ac", "http://www.atlassian.com/schema/confluence/4/ac/"),
    ("ri", "http://www.atlassian.com/schema/confluence/4/ri/"),
];

/// Tag of the synthetic element wrapping every fragment.
pub(crate) const ROOT_TAG: &str = "cfetch-root";

/// Deepest element nesting accepted below the root.
///
/// Parsing, rewriting and rendering recurse once per level.
pub(crate) const MAX_DEPTH: usize = 512;

/// Parse a storage markup fragment into a tree under a synthetic root.
pub(crate) fn parse_storage(html: &str) -> Result<Node, PreprocessError> {
    let html = replace_html_entities(html);

    let namespace_decls = NAMESPACES
        .iter()
        .map(|(prefix, uri)| format!(r#"xmlns:{prefix}="{uri}""#))
        .collect::<Vec<_>>()
        .join(" ");
    let wrapped = format!("<{ROOT_TAG} {namespace_decls}>{html}</{ROOT_TAG}>");

    let mut reader = Reader::from_str(&wrapped);
    reader.config_mut().trim_text(false);

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let mut root = element(&reader, &e)?;
                parse_children(&mut reader, &mut root, 0)?;
                return Ok(root);
            }
            Event::Eof => return Ok(Node::new(ROOT_TAG)),
            _ => {}
        }
    }
}

fn parse_children(
    reader: &mut Reader<&[u8]>,
    node: &mut Node,
    depth: usize,
) -> Result<(), PreprocessError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if depth >= MAX_DEPTH {
                    return Err(PreprocessError::TooDeep { limit: MAX_DEPTH });
                }
                let mut child = element(reader, &e)?;
                parse_children(reader, &mut child, depth + 1)?;
                node.children.push(child);
            }
            Event::Empty(e) => {
                let child = element(reader, &e)?;
                node.children.push(child);
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?;
                append_text(node, &text);
            }
            Event::GeneralRef(e) => {
                let entity = reader.decoder().decode(&e)?;
                append_text(node, &decode_reference(&entity));
            }
            Event::CData(e) => {
                append_text(node, &String::from_utf8_lossy(&e));
            }
            Event::End(_) | Event::Eof => return Ok(()),
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }
}

fn element(reader: &Reader<&[u8]>, e: &BytesStart) -> Result<Node, PreprocessError> {
    let tag = reader.decoder().decode(e.name().as_ref())?.into_owned();
    let mut node = Node::new(tag);
    for attr in e.attributes() {
        let attr = attr?;
        let key = reader.decoder().decode(attr.key.as_ref())?;
        if key.starts_with("xmlns") {
            continue;
        }
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            std::borrow::Cow::into_owned,
        );
        node.attrs.push((key.into_owned(), value));
    }
    Ok(node)
}

/// Append text to the node's text, or to its last child's tail.
fn append_text(node: &mut Node, text: &str) {
    match node.children.last_mut() {
        Some(last) => last.tail.push_str(text),
        None => node.text.push_str(text),
    }
}

/// Resolve an XML entity or character reference.
fn decode_reference(entity: &str) -> String {
    let resolved = match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        s => s.strip_prefix('#').and_then(|num| {
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => num.parse::<u32>().ok(),
            };
            code.and_then(char::from_u32)
        }),
    };
    resolved.map_or_else(|| format!("&{entity};"), String::from)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_nested_elements() {
        let root = parse_storage("<p>Hi <strong>there</strong> you</p>").unwrap();

        assert_eq!(root.tag, ROOT_TAG);
        let p = &root.children[0];
        assert_eq!(p.tag, "p");
        assert_eq!(p.text, "Hi ");
        assert_eq!(p.children[0].tag, "strong");
        assert_eq!(p.children[0].text, "there");
        assert_eq!(p.children[0].tail, " you");
    }

    #[test]
    fn test_parse_prefixed_attributes() {
        let root =
            parse_storage(r#"<ac:link><ri:page ri:content-title="Home" /></ac:link>"#).unwrap();

        let page = &root.children[0].children[0];
        assert_eq!(page.tag, "ri:page");
        assert_eq!(page.attr("ri:content-title"), Some("Home"));
    }

    #[test]
    fn test_namespace_declarations_skipped() {
        let root = parse_storage("<p>x</p>").unwrap();
        assert!(root.attrs.is_empty());
    }

    #[test]
    fn test_parse_entities() {
        let root = parse_storage("<p>a&nbsp;b &amp; c &#169; &#x41;</p>").unwrap();
        assert_eq!(root.children[0].text, "a\u{00a0}b & c \u{00a9} A");
    }

    #[test]
    fn test_parse_cdata() {
        let root = parse_storage(
            "<ac:plain-text-body><![CDATA[fn main() { a < b }]]></ac:plain-text-body>",
        )
        .unwrap();
        assert_eq!(root.children[0].text, "fn main() { a < b }");
    }

    #[test]
    fn test_parse_empty_fragment() {
        let root = parse_storage("").unwrap();
        assert!(root.children.is_empty());
        assert!(root.text.is_empty());
    }

    #[test]
    fn test_parse_mismatched_tags_fails() {
        assert!(parse_storage("<p><b>broken</p>").is_err());
    }

    #[test]
    fn test_nesting_at_limit_parses() {
        let html = format!("{}x{}", "<div>".repeat(MAX_DEPTH), "</div>".repeat(MAX_DEPTH));
        let root = parse_storage(&html).unwrap();
        assert_eq!(root.text_content(), "x");
    }

    #[test]
    fn test_nesting_past_limit_fails() {
        let depth = 200_000;
        let html = format!("{}x{}", "<div>".repeat(depth), "</div>".repeat(depth));
        let err = parse_storage(&html).unwrap_err();
        assert!(matches!(err, PreprocessError::TooDeep { limit: MAX_DEPTH }));
    }

    #[test]
    fn test_decode_reference_unknown() {
        assert_eq!(decode_reference("bogus"), "&bogus;");
    }
}
