mod content;
mod node;

pub use content::Content;
pub use node::Element;

/// Find an element by ID in the tree.
pub fn find_element<'a>(root: &'a Element, id: &str) -> Option<&'a Element> {
    if root.id == id {
        return Some(root);
    }

    for child in root.content.children() {
        if let Some(found) = find_element(child, id) {
            return Some(found);
        }
    }

    None
}

/// Find an element by ID in the tree, mutably.
pub fn find_element_mut<'a>(root: &'a mut Element, id: &str) -> Option<&'a mut Element> {
    if root.id == id {
        return Some(root);
    }

    if let Content::Children(children) = &mut root.content {
        for child in children {
            if let Some(found) = find_element_mut(child, id) {
                return Some(found);
            }
        }
    }

    None
}

/// Whether `target` is `ancestor` itself or one of its descendants.
pub fn contains(ancestor: &Element, target: &str) -> bool {
    find_element(ancestor, target).is_some()
}

/// A minimal subset of CSS selectors, enough to locate widget parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// `tag`
    Tag(&'a str),
    /// `.class`
    Class(&'a str),
    /// `input[type="..."]`
    Input(&'a str),
}

impl Selector<'_> {
    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Self::Tag(tag) => element.tag == *tag,
            Self::Class(class) => element.has_class(class),
            Self::Input(kind) => element.tag == "input" && element.get_attr("type") == Some(kind),
        }
    }
}

/// First descendant of `root` (not `root` itself) matching the selector, in document order.
pub fn query_first<'a>(root: &'a Element, selector: &Selector<'_>) -> Option<&'a Element> {
    for child in root.content.children() {
        if selector.matches(child) {
            return Some(child);
        }
        if let Some(found) = query_first(child, selector) {
            return Some(found);
        }
    }
    None
}

/// All descendants of `root` (not `root` itself) matching the selector, in document order.
pub fn query_all<'a>(root: &'a Element, selector: &Selector<'_>) -> Vec<&'a Element> {
    let mut result = Vec::new();
    query_all_recursive(root, selector, &mut result);
    result
}

fn query_all_recursive<'a>(element: &'a Element, selector: &Selector<'_>, result: &mut Vec<&'a Element>) {
    for child in element.content.children() {
        if selector.matches(child) {
            result.push(child);
        }
        query_all_recursive(child, selector, result);
    }
}
