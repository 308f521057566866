//! Document tree accessor.
//!
//! Thin wrappers over `kuchiki` giving the normalizer passes the tree
//! primitives they need: selector queries, text/HTML extraction, node
//! replacement, and attribute editing. Selector strings are compile-time
//! constants throughout the crate, so selector compilation may `expect`.

use kuchiki::NodeRef;
use kuchiki::traits::TendrilSink;

/// Parse a full HTML document into a mutable tree.
pub fn parse_document(markup: &str) -> NodeRef {
    kuchiki::parse_html().one(markup)
}

/// Parse an HTML fragment and return its body-level nodes.
pub fn parse_fragment(markup: &str) -> Vec<NodeRef> {
    let doc = kuchiki::parse_html().one(markup);
    match doc.select_first("body") {
        Ok(body) => body.as_node().children().collect(),
        Err(()) => Vec::new(),
    }
}

/// All descendants of `node` matching `selector`, collected up front so the
/// caller can mutate the tree while iterating.
pub fn select(node: &NodeRef, selector: &str) -> Vec<NodeRef> {
    node.select(selector)
        .expect("valid selector")
        .map(|m| m.as_node().clone())
        .collect()
}

/// First descendant of `node` matching `selector`, if any.
pub fn select_first(node: &NodeRef, selector: &str) -> Option<NodeRef> {
    node.select_first(selector).ok().map(|m| m.as_node().clone())
}

/// Concatenated text content of a node's subtree.
pub fn text(node: &NodeRef) -> String {
    node.text_contents()
}

/// Serialized HTML of a node's children (inner HTML).
pub fn inner_html(node: &NodeRef) -> String {
    let mut buf = Vec::new();
    for child in node.children() {
        child
            .serialize(&mut buf)
            .expect("serialization to a buffer cannot fail");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Replace `node` with the nodes parsed from `markup`.
pub fn replace_with_html(node: &NodeRef, markup: &str) {
    for new in parse_fragment(markup) {
        node.insert_before(new);
    }
    node.detach();
}

/// Replace `node` with its own text content.
pub fn replace_with_text(node: &NodeRef) {
    node.insert_before(NodeRef::new_text(node.text_contents()));
    node.detach();
}

/// Replace `node` with its children, keeping them in place.
pub fn unwrap_children(node: &NodeRef) {
    let children: Vec<NodeRef> = node.children().collect();
    for child in children {
        node.insert_before(child);
    }
    node.detach();
}

/// The local tag name of an element node.
pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.as_element().map(|el| el.name.local.to_string())
}

/// Read an attribute value.
pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    node.as_element()
        .and_then(|el| el.attributes.borrow().get(name).map(str::to_string))
}

/// Set an attribute value.
pub fn set_attr(node: &NodeRef, name: &str, value: &str) {
    if let Some(el) = node.as_element() {
        el.attributes.borrow_mut().insert(name, value.to_string());
    }
}

/// Remove an attribute.
pub fn remove_attr(node: &NodeRef, name: &str) {
    if let Some(el) = node.as_element() {
        el.attributes.borrow_mut().remove(name);
    }
}

/// Drop every attribute except `name` (kept with its current value, if set).
pub fn retain_attr(node: &NodeRef, name: &str) {
    let kept = attr(node, name);
    if let Some(el) = node.as_element() {
        let mut attributes = el.attributes.borrow_mut();
        attributes.map.clear();
        if let Some(value) = kept {
            attributes.insert(name, value);
        }
    }
}

/// Whether the element carries `class` as one of its class tokens.
pub fn has_class(node: &NodeRef, class: &str) -> bool {
    attr(node, "class").is_some_and(|c| c.split_whitespace().any(|token| token == class))
}

/// Escape text for embedding as literal character data in markup.
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
