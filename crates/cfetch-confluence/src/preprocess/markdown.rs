//! Markdown rendering of a rewritten storage tree.
//!
//! Block elements emit their content surrounded by blank lines; the final
//! pass trims trailing whitespace and collapses runs of blank lines.

use std::sync::LazyLock;

use regex::Regex;

use super::tree::Node;

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("invalid blank line regex"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\n]+").expect("invalid whitespace regex"));

/// Render the children of `root` as Markdown.
pub(crate) fn to_markdown(root: &Node) -> String {
    let raw = render_contents(root);
    let trimmed = raw.lines().map(str::trim_end).collect::<Vec<_>>().join("\n");
    BLANK_LINES
        .replace_all(&trimmed, "\n\n")
        .trim()
        .to_owned()
}

fn render_contents(node: &Node) -> String {
    let mut out = inline_text(&node.text);
    for child in &node.children {
        out.push_str(&render_node(child));
        out.push_str(&inline_text(&child.tail));
    }
    out
}

fn render_node(node: &Node) -> String {
    match node.tag.as_str() {
        "p" | "div" | "section" | "article" | "center" => block(render_contents(node).trim()),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = node.tag[1..].parse::<usize>().unwrap_or(1);
            let text = render_contents(node).replace('\n', " ");
            block(&format!("{} {}", "#".repeat(level), text.trim()))
        }
        "br" => "\\\n".to_owned(),
        "hr" => block("---"),
        "strong" | "b" => wrap(&render_contents(node), "**"),
        "em" | "i" | "cite" => wrap(&render_contents(node), "*"),
        "s" | "del" | "strike" => wrap(&render_contents(node), "~~"),
        "code" | "tt" | "kbd" => inline_code(&node.text_content()),
        "pre" => code_block(node),
        "a" => link(node),
        "img" => format!(
            "![{}]({})",
            node.attr("alt").unwrap_or_default(),
            node.attr("src").unwrap_or_default()
        ),
        "blockquote" => {
            let inner = to_markdown(node);
            let quoted = inner
                .lines()
                .map(|line| {
                    if line.is_empty() {
                        ">".to_owned()
                    } else {
                        format!("> {line}")
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            block(&quoted)
        }
        "ul" | "ol" => block(&render_list(node, "")),
        "table" => block(&render_table(node)),
        "script" | "style" => String::new(),
        _ => render_contents(node),
    }
}

fn block(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    format!("\n\n{content}\n\n")
}

/// Collapse whitespace and escape emphasis characters in running text.
fn inline_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let collapsed = WHITESPACE.replace_all(text, " ");
    let mut out = String::with_capacity(collapsed.len());
    for ch in collapsed.chars() {
        if matches!(ch, '*' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Wrap trimmed content in `marker`, keeping surrounding whitespace outside it.
fn wrap(content: &str, marker: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return content.to_owned();
    }
    let leading = if content.starts_with(char::is_whitespace) { " " } else { "" };
    let trailing = if content.ends_with(char::is_whitespace) { " " } else { "" };
    format!("{leading}{marker}{trimmed}{marker}{trailing}")
}

fn inline_code(text: &str) -> String {
    let text = text.replace('\n', " ");
    if text.is_empty() {
        return String::new();
    }
    if text.contains('`') {
        format!("`` {text} ``")
    } else {
        format!("`{text}`")
    }
}

fn code_block(node: &Node) -> String {
    let language = node
        .child("code")
        .and_then(|c| c.attr("class"))
        .and_then(|class| class.strip_prefix("language-"))
        .unwrap_or_default();
    let text = node.text_content();
    let fence = if text.contains("```") { "~~~" } else { "```" };
    format!(
        "\n\n{fence}{language}\n{}\n{fence}\n\n",
        text.trim_end_matches('\n')
    )
}

fn link(node: &Node) -> String {
    let text = render_contents(node);
    let text = text.trim();
    match node.attr("href").filter(|h| !h.is_empty()) {
        None => text.to_owned(),
        Some(href) if text.is_empty() => format!("<{href}>"),
        Some(href) => format!("[{text}]({})", href.replace(' ', "%20")),
    }
}

fn render_list(node: &Node, indent: &str) -> String {
    let ordered = node.tag == "ol";
    let start = node
        .attr("start")
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1);

    let mut lines = Vec::new();
    for (i, item) in node.children.iter().filter(|c| c.tag == "li").enumerate() {
        let marker = if ordered {
            format!("{}. ", start.saturating_add(i))
        } else {
            "- ".to_owned()
        };
        let child_indent = format!("{indent}{}", " ".repeat(marker.len()));
        let body = render_list_item(item, &child_indent);

        let mut item_lines = body.lines().filter(|l| !l.trim().is_empty());
        let first = item_lines.next().unwrap_or_default();
        lines.push(format!("{indent}{marker}{}", first.trim_start()));
        for line in item_lines {
            if line.starts_with(&child_indent) {
                lines.push(line.to_owned());
            } else {
                lines.push(format!("{child_indent}{}", line.trim_start()));
            }
        }
    }
    lines.join("\n")
}

fn render_list_item(item: &Node, child_indent: &str) -> String {
    let mut out = inline_text(&item.text);
    for child in &item.children {
        if matches!(child.tag.as_str(), "ul" | "ol") {
            out.push('\n');
            out.push_str(&render_list(child, child_indent));
            out.push('\n');
        } else {
            out.push_str(&render_node(child));
        }
        out.push_str(&inline_text(&child.tail));
    }
    out
}

fn render_table(node: &Node) -> String {
    let mut rows = Vec::new();
    collect_rows(node, &mut rows);

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            row.children
                .iter()
                .filter(|c| matches!(c.tag.as_str(), "th" | "td"))
                .map(|cell| {
                    render_contents(cell)
                        .replace('\n', " ")
                        .trim()
                        .replace('|', "\\|")
                })
                .collect()
        })
        .filter(|row: &Vec<String>| !row.is_empty())
        .collect();

    let Some(columns) = cells.iter().map(Vec::len).max() else {
        return String::new();
    };

    let format_row = |row: &Vec<String>| {
        let mut padded = row.clone();
        padded.resize(columns, String::new());
        format!("| {} |", padded.join(" | "))
    };

    let mut out = Vec::with_capacity(cells.len() + 1);
    out.push(format_row(&cells[0]));
    out.push(format!("|{}", " --- |".repeat(columns)));
    out.extend(cells[1..].iter().map(format_row));
    out.join("\n")
}

fn collect_rows<'a>(node: &'a Node, rows: &mut Vec<&'a Node>) {
    for child in &node.children {
        match child.tag.as_str() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => collect_rows(child, rows),
            _ => {}
        }
    }
}
