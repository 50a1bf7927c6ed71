//! Element tree for Confluence storage markup.

/// Element in a parsed storage document.
///
/// Text follows the lxml convention: `text` precedes the first child,
/// `tail` follows the element's own end tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Node {
    /// Tag name with namespace prefix (`p`, `ac:link`, `ri:page`).
    pub tag: String,
    /// Text before the first child.
    pub text: String,
    /// Text after the end tag.
    pub tail: String,
    /// Attributes in document order.
    pub attrs: Vec<(String, String)>,
    /// Child elements.
    pub children: Vec<Node>,
}

impl Node {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Attribute value by exact key.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Concatenated text of this node and its descendants, excluding its own tail.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
            out.push_str(&child.tail);
        }
    }

    /// Remove the child at `index`, keeping its tail text in the document.
    pub fn remove_child(&mut self, index: usize) {
        let removed = self.children.remove(index);
        if removed.tail.is_empty() {
            return;
        }
        match index.checked_sub(1).and_then(|i| self.children.get_mut(i)) {
            Some(prev) => prev.tail.push_str(&removed.tail),
            None => self.text.push_str(&removed.tail),
        }
    }

    /// Replace this element with a new tag, keeping its position and tail.
    pub fn replace_with(&mut self, replacement: Node) {
        let tail = std::mem::take(&mut self.tail);
        *self = replacement;
        self.tail = tail;
    }
}
