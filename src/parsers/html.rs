//! Explicit node tree built from the scraper HTML parser.
//!
//! Extraction works on this tree instead of on scraper's own DOM so that the
//! search in [`find_all`] is a plain walk over typed nodes. Building,
//! walking and dropping the tree use explicit stacks, so nesting depth is
//! bounded by memory rather than by the thread's stack.

use scraper::{ElementRef, Html};

/// Elements whose text is never page content
const NON_CONTENT_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// A node of the parsed document
#[derive(Debug)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with its lowercased tag name, attributes and children
#[derive(Debug)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// Value of an attribute, if present
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    fn is_non_content(&self) -> bool {
        NON_CONTENT_TAGS.iter().any(|tag| self.is(tag))
    }

    /// All text runs below this element, in document order
    pub fn text_runs(&self) -> Vec<&str> {
        let mut runs = Vec::new();
        collect_text(self, &mut runs);
        runs
    }

    /// Text runs concatenated as they appear in the markup
    pub fn text_content(&self) -> String {
        self.text_runs().concat()
    }

    /// Trimmed, non-empty text runs joined with `separator`
    pub fn joined_text(&self, separator: &str) -> String {
        self.text_runs()
            .into_iter()
            .map(str::trim)
            .filter(|run| !run.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl Drop for Element {
    fn drop(&mut self) {
        // Unlink descendants one level at a time instead of recursing
        let mut pending = std::mem::take(&mut self.children);
        while let Some(node) = pending.pop() {
            if let Node::Element(mut el) = node {
                pending.append(&mut el.children);
            }
        }
    }
}

fn collect_text<'a>(element: &'a Element, runs: &mut Vec<&'a str>) {
    if element.is_non_content() {
        return;
    }
    let mut stack = vec![element.children.iter()];
    while let Some(children) = stack.last_mut() {
        match children.next() {
            Some(Node::Text(text)) => runs.push(text),
            Some(Node::Element(el)) if !el.is_non_content() => stack.push(el.children.iter()),
            Some(Node::Element(_)) => {}
            None => {
                stack.pop();
            }
        }
    }
}

/// Find every descendant of `root` (not `root` itself) whose tag is one of
/// `tags` and that satisfies `predicate`, in document order.
pub fn find_all<'a, S, P>(root: &'a Element, tags: &[S], predicate: P) -> Vec<&'a Element>
where
    S: AsRef<str>,
    P: Fn(&Element) -> bool,
{
    let mut found = Vec::new();
    let mut stack = vec![root.children.iter()];
    while let Some(children) = stack.last_mut() {
        match children.next() {
            Some(Node::Element(el)) => {
                if tags.iter().any(|tag| el.is(tag.as_ref())) && predicate(el) {
                    found.push(el);
                }
                stack.push(el.children.iter());
            }
            Some(Node::Text(_)) => {}
            None => {
                stack.pop();
            }
        }
    }
    found
}

/// A parsed HTML document
#[derive(Debug)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse an HTML string
    pub fn parse(html: &str) -> Self {
        let doc = Html::parse_document(html);
        Self {
            root: convert(doc.root_element()),
        }
    }

    /// Parse raw response bytes, replacing invalid UTF-8 sequences
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::parse(&String::from_utf8_lossy(bytes))
    }

    /// The `<html>` element
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The `<body>` element, if the document has one
    pub fn body(&self) -> Option<&Element> {
        find_all(&self.root, &["body"], |_| true).into_iter().next()
    }
}

/// Copy a scraper element and its subtree into our own node types.
/// Comments, doctypes and processing instructions are dropped.
fn convert(root: ElementRef<'_>) -> Element {
    // Partially built elements with the scraper children still to visit
    let mut stack = vec![(shallow_copy(root), root.children())];
    let mut converted = None;

    while let Some((mut element, mut children)) = stack.pop() {
        match children.next() {
            Some(child) => {
                let child_el = ElementRef::wrap(child);
                if child_el.is_none() {
                    if let scraper::Node::Text(text) = child.value() {
                        element.children.push(Node::Text(String::from(&**text)));
                    }
                }
                stack.push((element, children));
                if let Some(child_el) = child_el {
                    stack.push((shallow_copy(child_el), child_el.children()));
                }
            }
            None => match stack.last_mut() {
                Some((parent, _)) => parent.children.push(Node::Element(element)),
                None => converted = Some(element),
            },
        }
    }

    converted.unwrap_or_else(|| shallow_copy(root))
}

fn shallow_copy(element: ElementRef<'_>) -> Element {
    let value = element.value();
    Element {
        tag: value.name().to_lowercase(),
        attrs: value
            .attrs()
            .map(|(key, val)| (key.to_string(), val.to_string()))
            .collect(),
        children: Vec::new(),
    }
}
