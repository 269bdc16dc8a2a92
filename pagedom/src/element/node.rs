use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::Content;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    // Identity
    pub id: String,
    pub tag: String,

    // Content
    pub content: Content,

    // Styling hooks (class="...")
    pub classes: Vec<String>,

    /// Every attribute other than `id` and `class` (role, aria-*, data-*, type, tabindex).
    pub attrs: BTreeMap<String, String>,

    /// Current form value. Only meaningful for `<input>` elements.
    pub value: String,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: generate_id("el"),
            tag: "div".to_string(),
            content: Content::None,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            value: String::new(),
        }
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            id: generate_id(&tag),
            tag,
            ..Default::default()
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn form() -> Self {
        Self::new("form")
    }

    pub fn button(label: impl Into<String>) -> Self {
        Self::new("button").attr("type", "button").text(label)
    }

    pub fn span(text: impl Into<String>) -> Self {
        Self::new("span").text(text)
    }

    pub fn ul() -> Self {
        Self::new("ul")
    }

    pub fn li(text: impl Into<String>) -> Self {
        Self::new("li").text(text)
    }

    pub fn svg() -> Self {
        Self::new("svg")
    }

    /// Create an `<input type="hidden">` carrying the given form field name.
    pub fn hidden_input(name: impl Into<String>) -> Self {
        Self::new("input").attr("type", "hidden").attr("name", name)
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Add one or more whitespace-separated classes.
    pub fn class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            self.add_class(class);
        }
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.content = Content::Text(text.into());
        self
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            _ => self.content = Content::Children(vec![child]),
        }
        self
    }

    pub fn children(mut self, children: Vec<Element>) -> Self {
        self.content = Content::Children(children);
        self
    }

    /// Replace the element's content with the given children.
    pub fn set_children(&mut self, children: Vec<Element>) {
        self.content = Content::Children(children);
    }

    // Classes
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Returns true if the class was not present before.
    pub fn add_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            return false;
        }
        self.classes.push(class.to_string());
        true
    }

    /// Returns true if the class was present.
    pub fn remove_class(&mut self, class: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c != class);
        self.classes.len() != before
    }

    /// Toggle a class. Returns whether the class is present afterwards.
    pub fn toggle_class(&mut self, class: &str) -> bool {
        if self.remove_class(class) {
            false
        } else {
            self.add_class(class)
        }
    }

    /// Add or remove a class depending on `on`.
    pub fn set_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    // Attributes
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attrs.insert(name.to_string(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.remove(name)
    }

    // Text
    /// Concatenated text of this element and all of its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content = Content::Text(text.into());
    }

    // Focus
    /// Effective tab index, following the browser defaults.
    ///
    /// An explicit `tabindex` attribute wins. Otherwise buttons, non-hidden
    /// inputs and links with an `href` are in the tab order (0) and every
    /// other element is not focusable at all (None).
    pub fn tab_index(&self) -> Option<i32> {
        if let Some(raw) = self.get_attr("tabindex") {
            return raw.trim().parse().ok();
        }
        match self.tag.as_str() {
            "button" | "select" | "textarea" => Some(0),
            "input" if self.get_attr("type") != Some("hidden") => Some(0),
            "a" if self.attrs.contains_key("href") => Some(0),
            _ => None,
        }
    }

    /// Whether the element can receive programmatic focus.
    pub fn is_focusable(&self) -> bool {
        self.tab_index().is_some() && !self.attrs.contains_key("disabled")
    }

    /// Whether the element participates in sequential (Tab) navigation.
    pub fn is_tabbable(&self) -> bool {
        self.is_focusable() && self.tab_index().is_some_and(|i| i >= 0)
    }
}

fn collect_text(element: &Element, out: &mut String) {
    match &element.content {
        Content::None => {}
        Content::Text(text) => out.push_str(text),
        Content::Children(children) => {
            for child in children {
                collect_text(child, out);
            }
        }
    }
}
