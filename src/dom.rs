//! Small helpers over the rcdom tree
//!
//! rcdom keeps element names, attributes and children behind `RefCell`s; the
//! lookups the converter and extractor need (tag name, one attribute, class
//! tokens, descendant searches) are wrapped here so call sites stay readable.

use markup5ever_rcdom::{Handle, NodeData};

/// Tag name of an element node, `None` for non-elements.
pub fn element_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// Value of the named attribute, if present.
pub fn attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| a.name.local.as_ref() == attr_name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

/// Lowercased class tokens of an element.
pub fn classes(node: &Handle) -> Vec<String> {
    attr(node, "class")
        .map(|value| {
            value
                .split_whitespace()
                .map(|token| token.to_lowercase())
                .collect()
        })
        .unwrap_or_default()
}

/// True when the element carries the exact class token.
pub fn has_class(node: &Handle, class: &str) -> bool {
    classes(node).iter().any(|token| token == class)
}

/// Raw concatenated text of all text descendants, no normalization.
pub fn text_content(node: &Handle) -> String {
    let mut output = String::new();
    collect_text(node, &mut output);
    output
}

fn collect_text(node: &Handle, output: &mut String) {
    match &node.data {
        NodeData::Text { contents } => output.push_str(&contents.borrow()),
        NodeData::Element { .. } | NodeData::Document => {
            for child in node.children.borrow().iter() {
                collect_text(child, output);
            }
        }
        _ => {}
    }
}

/// Text runs of all text descendants, in document order.
///
/// Unlike [`text_content`] the runs stay separate, so callers can rejoin them
/// with an explicit separator (sample `<pre>` blocks split lines across
/// several runs when the export wraps them in per-line tags).
pub fn text_runs(node: &Handle) -> Vec<String> {
    let mut runs = Vec::new();
    collect_text_runs(node, &mut runs);
    runs
}

fn collect_text_runs(node: &Handle, runs: &mut Vec<String>) {
    match &node.data {
        NodeData::Text { contents } => {
            let text = contents.borrow();
            if !text.is_empty() {
                runs.push(text.to_string());
            }
        }
        NodeData::Element { .. } | NodeData::Document => {
            for child in node.children.borrow().iter() {
                collect_text_runs(child, runs);
            }
        }
        _ => {}
    }
}

/// Depth-first search for the first element carrying the class token.
pub fn find_first_by_class(node: &Handle, class: &str) -> Option<Handle> {
    if element_name(node).is_some() && has_class(node, class) {
        return Some(node.clone());
    }
    for child in node.children.borrow().iter() {
        if let Some(found) = find_first_by_class(child, class) {
            return Some(found);
        }
    }
    None
}

/// Depth-first collection of all elements carrying the class token.
///
/// A matching element's subtree is not searched further; rows of a sample
/// table never nest inside one another.
pub fn find_all_by_class(node: &Handle, class: &str) -> Vec<Handle> {
    let mut found = Vec::new();
    collect_by_class(node, class, &mut found);
    found
}

fn collect_by_class(node: &Handle, class: &str, found: &mut Vec<Handle>) {
    if element_name(node).is_some() && has_class(node, class) {
        found.push(node.clone());
        return;
    }
    for child in node.children.borrow().iter() {
        collect_by_class(child, class, found);
    }
}

/// Depth-first search for the first element with the tag name.
pub fn find_first_tag(node: &Handle, tag: &str) -> Option<Handle> {
    if element_name(node) == Some(tag) {
        return Some(node.clone());
    }
    for child in node.children.borrow().iter() {
        if let Some(found) = find_first_tag(child, tag) {
            return Some(found);
        }
    }
    None
}

/// Depth-first collection of all elements with the tag name.
pub fn find_all_tags(node: &Handle, tag: &str) -> Vec<Handle> {
    let mut found = Vec::new();
    collect_tags(node, tag, &mut found);
    found
}

fn collect_tags(node: &Handle, tag: &str, found: &mut Vec<Handle>) {
    if element_name(node) == Some(tag) {
        found.push(node.clone());
    }
    for child in node.children.borrow().iter() {
        collect_tags(child, tag, found);
    }
}

/// Direct element children, in order.
pub fn child_elements(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|child| element_name(child).is_some())
        .cloned()
        .collect()
}
