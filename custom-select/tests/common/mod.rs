#![allow(dead_code)]

use custom_select::{Page, SelectId};
use pagedom::{Element, Event, Key, Modifiers};
use simplelog::{Config, LevelFilter, TestLogger};

pub fn init_logger() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}

/// Markup of one custom select, the way the site's forms write it.
pub fn select_markup(wrapper: &str, name: &str, values: &[&str]) -> Element {
    let rows = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            Element::li(*v)
                .id(format!("{wrapper}-row-{i}"))
                .class("px-4 py-2 cursor-pointer")
                .attr("data-value", *v)
        })
        .collect();

    Element::div()
        .id(wrapper)
        .class("custom-select-wrapper relative")
        .child(Element::hidden_input(name).id(format!("{wrapper}-input")))
        .child(
            Element::button("")
                .id(format!("{wrapper}-trigger"))
                .class("w-full border rounded-lg")
                .child(
                    Element::span("Select an option")
                        .id(format!("{wrapper}-label"))
                        .class("selected-option-text text-gray-500"),
                )
                .child(Element::svg().id(format!("{wrapper}-arrow"))),
        )
        .child(
            Element::ul()
                .id(format!("{wrapper}-panel"))
                .class("options-panel absolute")
                .children(rows),
        )
}

/// A contact form holding the given selects, followed by a message field
/// and a submit button.
pub fn contact_form(selects: Vec<Element>) -> Element {
    Element::form()
        .id("contact-form")
        .children(selects)
        .child(Element::new("textarea").id("message"))
        .child(Element::button("Send").id("submit").attr("type", "submit"))
}

pub fn page_root(form: Element) -> Element {
    Element::div()
        .id("body")
        .child(Element::div().id("main-header"))
        .child(Element::new("main").id("main").child(form))
        .child(Element::div().id("main-footer"))
}

/// Page with a single select `size` bound and nothing focused.
pub fn single(values: &[&str]) -> (Page, SelectId) {
    init_logger();
    let mut page = Page::new(page_root(contact_form(vec![select_markup("size", "size", values)])));
    let ids = page.init_all();
    assert_eq!(ids.len(), 1);
    (page, ids[0])
}

pub fn press(page: &mut Page, key: Key) -> custom_select::EventResult {
    page.dispatch(Event::key(key))
}

pub fn press_on(page: &mut Page, target: &str, key: Key) -> custom_select::EventResult {
    page.dispatch(Event::key_on(target, key))
}

pub fn press_with(page: &mut Page, key: Key, modifiers: Modifiers) -> custom_select::EventResult {
    page.dispatch(Event::Key {
        target: None,
        key,
        modifiers,
    })
}

pub fn attr(page: &Page, id: &str, name: &str) -> Option<String> {
    page.document()
        .get(id)
        .and_then(|el| el.get_attr(name))
        .map(str::to_string)
}

pub fn has_class(page: &Page, id: &str, class: &str) -> bool {
    page.document().get(id).is_some_and(|el| el.has_class(class))
}

pub fn highlighted_value(page: &Page, id: SelectId) -> Option<String> {
    let select = page.select(id)?;
    let index = select.highlighted()?;
    Some(select.options()[index].value().to_string())
}
