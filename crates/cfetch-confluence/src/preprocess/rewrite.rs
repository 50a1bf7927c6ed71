//! Rewrite Confluence-specific storage elements into plain HTML.
//!
//! After this pass the tree contains only ordinary HTML tags, so both the
//! HTML serializer and the Markdown renderer can ignore the `ac:`/`ri:`
//! vocabulary.

use super::PageContext;
use super::tree::Node;
use crate::url;

/// Macros rendered as a quoted panel.
const PANEL_MACROS: &[&str] = &["info", "note", "warning", "tip", "panel"];

enum Action {
    Keep,
    Replace(Node),
    Remove,
}

/// Rewrite all descendants of `root` in place.
pub(crate) fn rewrite(root: &mut Node, context: &PageContext) {
    let mut i = 0;
    while i < root.children.len() {
        match transform(&root.children[i], context) {
            Action::Keep => {}
            Action::Replace(replacement) => root.children[i].replace_with(replacement),
            Action::Remove => {
                root.remove_child(i);
                continue;
            }
        }
        let child = &mut root.children[i];
        absolutize_attrs(child, context);
        rewrite(child, context);
        i += 1;
    }
}

fn transform(node: &Node, context: &PageContext) -> Action {
    match node.tag.as_str() {
        "ac:link" => Action::Replace(link(node, context)),
        "ac:structured-macro" => structured_macro(node),
        "ac:image" => image(node),
        "ac:task-list" => Action::Replace(task_list(node)),
        "ac:emoticon" => node
            .attr("ac:emoji-fallback")
            .map_or(Action::Remove, |fallback| {
                Action::Replace(Node::new("span").with_text(fallback))
            }),
        "ac:placeholder" | "ac:parameter" => Action::Remove,
        "time" if node.children.is_empty() && node.text.is_empty() => {
            let datetime = node.attr("datetime").unwrap_or_default();
            Action::Replace(Node::new("span").with_text(datetime))
        }
        tag if tag.starts_with("ac:layout") => Action::Replace(unwrap_into("div", node)),
        tag if tag.starts_with("ac:") || tag.starts_with("ri:") => {
            Action::Replace(unwrap_into("span", node))
        }
        _ => Action::Keep,
    }
}

fn link(node: &Node, context: &PageContext) -> Node {
    let label = node
        .child("ac:plain-text-link-body")
        .or_else(|| node.child("ac:link-body"))
        .map(Node::text_content)
        .filter(|l| !l.trim().is_empty());
    let anchor = node.attr("ac:anchor");

    if let Some(page) = node.child("ri:page") {
        let title = page.attr("ri:content-title").unwrap_or_default();
        let space = page.attr("ri:space-key").unwrap_or(&context.space_key);
        let mut href = url::display_url(&context.base_url, space, title);
        if let Some(anchor) = anchor {
            href.push('#');
            href.push_str(anchor);
        }
        return Node::new("a")
            .with_attr("href", href)
            .with_text(label.unwrap_or_else(|| title.to_owned()));
    }

    if let Some(user) = node.child("ri:user") {
        let account = user
            .attr("ri:account-id")
            .or_else(|| user.attr("ri:userkey"))
            .or_else(|| user.attr("ri:username"))
            .unwrap_or("unknown");
        return Node::new("span")
            .with_attr("class", "user-mention")
            .with_attr("data-account-id", account)
            .with_text(format!("@{account}"));
    }

    if let Some(attachment) = node.child("ri:attachment") {
        let filename = attachment.attr("ri:filename").unwrap_or_default();
        return Node::new("span").with_text(label.unwrap_or_else(|| filename.to_owned()));
    }

    match anchor {
        Some(anchor) => Node::new("a")
            .with_attr("href", format!("#{anchor}"))
            .with_text(label.unwrap_or_else(|| anchor.to_owned())),
        None => Node::new("span").with_text(label.unwrap_or_default()),
    }
}

fn parameter(node: &Node, name: &str) -> Option<String> {
    node.children
        .iter()
        .find(|c| c.tag == "ac:parameter" && c.attr("ac:name") == Some(name))
        .map(Node::text_content)
}

fn structured_macro(node: &Node) -> Action {
    let name = node.attr("ac:name").unwrap_or_default();
    let rich_body = node.child("ac:rich-text-body");

    match name {
        "code" | "noformat" => {
            let body = node
                .child("ac:plain-text-body")
                .map(Node::text_content)
                .unwrap_or_default();
            let mut code = Node::new("code").with_text(body);
            if let Some(language) = parameter(node, "language").filter(|l| !l.is_empty()) {
                code = code.with_attr("class", format!("language-{language}"));
            }
            Action::Replace(Node::new("pre").with_children(vec![code]))
        }
        "status" => parameter(node, "title").map_or(Action::Remove, |title| {
            Action::Replace(Node::new("span").with_text(title))
        }),
        "jira" => parameter(node, "key").map_or(Action::Remove, |key| {
            Action::Replace(Node::new("span").with_text(key))
        }),
        panel if PANEL_MACROS.contains(&panel) => {
            let mut children = Vec::new();
            if let Some(title) = parameter(node, "title").filter(|t| !t.is_empty()) {
                children.push(
                    Node::new("p").with_children(vec![Node::new("strong").with_text(title)]),
                );
            }
            if let Some(body) = rich_body {
                children.push(unwrap_into("div", body));
            }
            Action::Replace(Node::new("blockquote").with_children(children))
        }
        _ => rich_body.map_or(Action::Remove, |body| {
            Action::Replace(unwrap_into("div", body))
        }),
    }
}

/// Keep an element's content under a different tag.
fn unwrap_into(tag: &str, node: &Node) -> Node {
    Node::new(tag)
        .with_text(node.text.clone())
        .with_children(node.children.clone())
}

fn image(node: &Node) -> Action {
    let alt = node.attr("ac:alt");
    if let Some(src) = node.child("ri:url").and_then(|u| u.attr("ri:value")) {
        return Action::Replace(
            Node::new("img")
                .with_attr("src", src)
                .with_attr("alt", alt.unwrap_or_default()),
        );
    }
    if let Some(filename) = node
        .child("ri:attachment")
        .and_then(|a| a.attr("ri:filename"))
    {
        return Action::Replace(
            Node::new("img")
                .with_attr("src", filename)
                .with_attr("alt", alt.unwrap_or(filename)),
        );
    }
    Action::Remove
}

fn task_list(node: &Node) -> Node {
    let items = node
        .children
        .iter()
        .filter(|c| c.tag == "ac:task")
        .map(|task| {
            let done = task
                .child("ac:task-status")
                .is_some_and(|s| s.text_content().trim() == "complete");
            let marker = if done { "[x] " } else { "[ ] " };
            let body = task.child("ac:task-body");
            let text = body.map(|b| b.text.clone()).unwrap_or_default();
            Node::new("li")
                .with_text(format!("{marker}{text}"))
                .with_children(body.map(|b| b.children.clone()).unwrap_or_default())
        })
        .collect();
    Node::new("ul").with_children(items)
}

fn absolutize_attrs(node: &mut Node, context: &PageContext) {
    let key = match node.tag.as_str() {
        "a" => "href",
        "img" => "src",
        _ => return,
    };
    for (k, v) in &mut node.attrs {
        if k == key {
            *v = url::resolve(&context.base_url, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::preprocess::parser::parse_storage;

    fn context() -> PageContext {
        PageContext::new("DEV", "https://example.atlassian.net/wiki")
    }

    fn rewritten(html: &str) -> Node {
        let mut root = parse_storage(html).unwrap();
        rewrite(&mut root, &context());
        root
    }

    #[test]
    fn test_page_link_uses_context_space() {
        let root = rewritten(r#"<p>See <ac:link><ri:page ri:content-title="Home Page" /></ac:link>.</p>"#);

        let a = &root.children[0].children[0];
        assert_eq!(a.tag, "a");
        assert_eq!(
            a.attr("href"),
            Some("https://example.atlassian.net/wiki/display/DEV/Home+Page")
        );
        assert_eq!(a.text, "Home Page");
        assert_eq!(a.tail, ".");
    }

    #[test]
    fn test_page_link_explicit_space_and_label() {
        let root = rewritten(
            r#"<ac:link><ri:page ri:space-key="OPS" ri:content-title="Runbook" /><ac:plain-text-link-body><![CDATA[the runbook]]></ac:plain-text-link-body></ac:link>"#,
        );

        let a = &root.children[0];
        assert_eq!(
            a.attr("href"),
            Some("https://example.atlassian.net/wiki/display/OPS/Runbook")
        );
        assert_eq!(a.text, "the runbook");
    }

    #[test]
    fn test_user_mention() {
        let root = rewritten(r#"<ac:link><ri:user ri:account-id="557058:abc" /></ac:link>"#);
        assert_eq!(root.children[0].text, "@557058:abc");
    }

    #[test]
    fn test_code_macro() {
        let root = rewritten(
            r#"<ac:structured-macro ac:name="code"><ac:parameter ac:name="language">rust</ac:parameter><ac:plain-text-body><![CDATA[let x = 1;]]></ac:plain-text-body></ac:structured-macro>"#,
        );

        let pre = &root.children[0];
        assert_eq!(pre.tag, "pre");
        assert_eq!(pre.children[0].attr("class"), Some("language-rust"));
        assert_eq!(pre.children[0].text, "let x = 1;");
    }

    #[test]
    fn test_unknown_macro_removed_keeping_tail() {
        let root = rewritten(r#"<p>a<ac:structured-macro ac:name="toc" /> b</p>"#);
        let p = &root.children[0];
        assert!(p.children.is_empty());
        assert_eq!(p.text, "a b");
    }

    #[test]
    fn test_inline_comment_marker_unwrapped() {
        let root = rewritten(
            r#"<p><ac:inline-comment-marker ac:ref="r1">marked</ac:inline-comment-marker> text</p>"#,
        );
        let span = &root.children[0].children[0];
        assert_eq!(span.tag, "span");
        assert_eq!(span.text, "marked");
        assert!(span.attrs.is_empty());
    }

    #[test]
    fn test_relative_href_absolutized() {
        let root = rewritten(r#"<a href="/wiki/spaces/DEV/pages/1">x</a><a href="/people/1">y</a>"#);
        assert_eq!(
            root.children[0].attr("href"),
            Some("https://example.atlassian.net/wiki/spaces/DEV/pages/1")
        );
        assert_eq!(
            root.children[1].attr("href"),
            Some("https://example.atlassian.net/wiki/people/1")
        );
    }

    #[test]
    fn test_task_list() {
        let root = rewritten(
            "<ac:task-list><ac:task><ac:task-status>complete</ac:task-status><ac:task-body>Ship it</ac:task-body></ac:task></ac:task-list>",
        );
        let ul = &root.children[0];
        assert_eq!(ul.tag, "ul");
        assert_eq!(ul.children[0].text, "[x] Ship it");
    }
}
