mod common;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use common::*;
use custom_select::{ConfigError, Page, SelectConfig, SelectId};
use pagedom::{Element, Event, Key};

fn two_selects() -> (Page, SelectId, SelectId) {
    init_logger();
    let form = contact_form(vec![
        select_markup("service", "service", &["Design", "Development", "Hosting"]),
        select_markup("budget", "budget", &["Small", "Medium", "Large"]),
    ]);
    let mut page = Page::new(page_root(form));
    let ids = page.init_all();
    assert_eq!(ids.len(), 2);
    (page, ids[0], ids[1])
}

fn is_open(page: &Page, id: SelectId) -> bool {
    page.select(id).is_some_and(|s| s.is_open())
}

// ============================================================================
// Exclusivity
// ============================================================================

#[test]
fn test_opening_one_select_closes_the_other() {
    let (mut page, a, b) = two_selects();

    page.dispatch(Event::click("service-trigger"));
    assert!(is_open(&page, a));

    page.dispatch(Event::click("budget-trigger"));
    assert!(is_open(&page, b));
    assert!(!is_open(&page, a));
    assert_eq!(attr(&page, "service-trigger", "aria-expanded").as_deref(), Some("false"));
    assert!(!has_class(&page, "custom-options-0", "visible"));
    assert_eq!(page.registry().open_ids(), vec![b]);
}

#[test]
fn test_keyboard_open_closes_the_other() {
    let (mut page, a, b) = two_selects();

    page.dispatch(Event::Focus {
        target: "service-trigger".to_string(),
    });
    press(&mut page, Key::Down);
    press(&mut page, Key::Down);
    assert_eq!(page.select(a).unwrap().highlighted(), Some(1));

    press_on(&mut page, "budget-trigger", Key::Char('l'));
    assert!(is_open(&page, b));
    assert!(!is_open(&page, a));
    assert_eq!(page.select(a).unwrap().highlighted(), None);
    assert!(!has_class(&page, "custom-option-0-1", "bg-gray-100"));
    assert_eq!(highlighted_value(&page, b).as_deref(), Some("Large"));
}

#[test]
fn test_at_most_one_open_for_any_select_count() {
    for count in 1..=6 {
        init_logger();
        let names: Vec<String> = (0..count).map(|i| format!("field{i}")).collect();
        let selects = names
            .iter()
            .map(|n| select_markup(n, n, &["One", "Two", "Three"]))
            .collect();
        let mut page = Page::new(page_root(contact_form(selects)));
        assert_eq!(page.init_all().len(), count);

        // Mix clicks and keys over every select, twice around
        for round in 0..2 {
            for name in &names {
                let trigger = format!("{name}-trigger");
                if round == 0 {
                    page.dispatch(Event::click(trigger.as_str()));
                } else {
                    press_on(&mut page, &trigger, Key::Up);
                }
                assert!(page.registry().open_ids().len() <= 1, "count={count}");

                let open_expanded = page
                    .registry()
                    .iter()
                    .filter(|s| attr(&page, &s.parts().trigger, "aria-expanded").as_deref() == Some("true"))
                    .count();
                assert!(open_expanded <= 1);
            }
        }
        assert_eq!(page.registry().open_ids().len(), 1);
    }
}

#[test]
fn test_selecting_closes_everything() {
    let (mut page, a, b) = two_selects();
    page.dispatch(Event::click("budget-trigger"));
    page.dispatch(Event::click("custom-option-1-2"));

    assert!(!is_open(&page, a));
    assert!(!is_open(&page, b));
    assert!(page.registry().open_ids().is_empty());
}

#[test]
fn test_outside_click_only_affects_open_select() {
    let (mut page, a, b) = two_selects();
    page.dispatch(Event::click("service-trigger"));
    // Inside the other wrapper but not on its trigger
    page.dispatch(Event::click("budget"));

    assert!(!is_open(&page, a));
    assert!(!is_open(&page, b));
    assert_eq!(attr(&page, "budget-trigger", "aria-expanded").as_deref(), Some("false"));
}

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn test_ids_follow_document_order() {
    let (page, a, b) = two_selects();
    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
    assert_eq!(a.to_string(), "select-0");
    assert_eq!(page.select(b).unwrap().parts().panel, "custom-options-1");
    assert_eq!(page.select(b).unwrap().options()[2].id(), "custom-option-1-2");
    assert_eq!(page.select_by_name("budget").map(|s| s.id()), Some(b));
    assert!(page.select_by_name("nope").is_none());
}

#[test]
fn test_init_all_is_idempotent() {
    let (mut page, a, b) = two_selects();
    let before = page.document().root().clone();

    assert!(page.init_all().is_empty());
    assert!(page.init_within("contact-form").is_empty());
    assert_eq!(page.initialize("service"), Some(a));

    assert_eq!(page.registry().ids(), vec![a, b]);
    assert_eq!(page.document().root(), &before);
}

#[test]
fn test_malformed_wrapper_is_skipped() {
    init_logger();
    let broken = Element::div()
        .id("broken")
        .class("custom-select-wrapper")
        .child(Element::button("Pick").id("broken-trigger"))
        .child(Element::hidden_input("broken"));
    let empty_panel = Element::div()
        .id("empty")
        .class("custom-select-wrapper")
        .child(Element::button("Pick").id("empty-trigger"))
        .child(Element::ul().id("empty-panel").class("options-panel"))
        .child(Element::hidden_input("empty"));
    let form = contact_form(vec![
        broken.clone(),
        empty_panel.clone(),
        select_markup("budget", "budget", &["Small", "Large"]),
    ]);
    let mut page = Page::new(page_root(form));

    let ids = page.init_all();
    assert_eq!(ids.len(), 1);
    assert_eq!(page.select(ids[0]).unwrap().parts().wrapper, "budget");

    // Skipped markup is left exactly as it was
    assert_eq!(page.document().get("broken"), Some(&broken));
    assert_eq!(page.document().get("empty"), Some(&empty_panel));
    assert_eq!(attr(&page, "broken-trigger", "role"), None);

    // The skipped index is not handed out again
    assert_eq!(ids[0].index(), 2);
}

#[test]
fn test_initialize_unknown_wrapper() {
    let (mut page, _, _) = two_selects();
    assert_eq!(page.initialize("no-such-wrapper"), None);
    assert_eq!(page.registry().len(), 2);
}

#[test]
fn test_init_within_late_header_markup() {
    let (mut page, _, _) = two_selects();

    page.document_mut().replace_children(
        "main-header",
        vec![select_markup("lang", "lang", &["English", "Deutsch"])],
    );
    let ids = page.init_within("main-header");
    assert_eq!(ids.len(), 1);
    assert_eq!(ids[0].index(), 2);
    assert_eq!(page.registry().len(), 3);

    page.dispatch(Event::click("lang-trigger"));
    page.dispatch(Event::click("custom-option-2-1"));
    assert_eq!(page.document().get("lang-input").unwrap().value, "Deutsch");
}

#[test]
fn test_init_within_scope_is_wrapper() {
    init_logger();
    let mut page = Page::new(page_root(contact_form(vec![select_markup("size", "size", &["S"])])));
    let ids = page.init_within("size");
    assert_eq!(ids.len(), 1);
    assert_eq!(page.select(ids[0]).unwrap().parts().wrapper, "size");
}

// ============================================================================
// Teardown and fragment replacement
// ============================================================================

#[test]
fn test_form_reset_rebinds_with_fresh_ids() {
    init_logger();
    let form = contact_form(vec![select_markup("size", "size", &["Red", "Green", "Blue"])]);
    let mut page = Page::new(page_root(form));
    let pristine = page.snapshot("contact-form").unwrap();
    let old = page.init_all()[0];

    // Leave a pending type-ahead reset and a chosen value behind
    page.dispatch(Event::click("size-trigger"));
    page.dispatch(Event::click("custom-option-0-2"));
    press_on(&mut page, "size-trigger", Key::Char('g'));
    assert_eq!(page.pending_timers(), 1);
    assert_eq!(page.document().focused(), Some("custom-option-0-1"));

    let new = page.replace_fragment("contact-form", pristine);

    assert_eq!(new.len(), 1);
    assert_ne!(new[0], old);
    assert_eq!(new[0].index(), 1);
    assert!(page.select(old).is_none());
    assert_eq!(page.pending_timers(), 0);
    assert_eq!(page.registry().len(), 1);
    assert_eq!(page.document().focused(), None);

    let select = page.select(new[0]).unwrap();
    assert!(!select.is_open());
    assert_eq!(select.selected(), None);
    assert_eq!(select.parts().panel, "custom-options-1");
    assert_eq!(page.document().get("size-input").unwrap().value, "");
    assert!(page.document().get("custom-options-0").is_none());

    // Old timer firing later does nothing
    page.advance(Duration::from_secs(1));
    page.dispatch(Event::click("size-trigger"));
    assert!(page.select(new[0]).unwrap().is_open());
}

#[test]
fn test_replace_unknown_fragment() {
    let (mut page, a, b) = two_selects();
    assert!(page.replace_fragment("nowhere", Vec::new()).is_empty());
    assert_eq!(page.registry().ids(), vec![a, b]);
}

#[test]
fn test_teardown_stops_handling() {
    let (mut page, a, b) = two_selects();
    press_on(&mut page, "service-trigger", Key::Char('d'));
    assert_eq!(page.pending_timers(), 1);

    assert!(page.teardown(a));
    assert!(!page.teardown(a));
    assert_eq!(page.pending_timers(), 0);
    assert_eq!(page.registry().ids(), vec![b]);

    let before = page.document().root().clone();
    page.dispatch(Event::click("service-trigger"));
    press_on(&mut page, "service-trigger", Key::Down);
    assert_eq!(page.document().root(), &before);
}

// ============================================================================
// Change notifications
// ============================================================================

#[test]
fn test_change_listeners_run_once_per_selection() {
    let (mut page, a, b) = two_selects();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    page.on_change(move |change| {
        sink.borrow_mut().push((change.name.clone(), change.value.clone()));
    });

    page.dispatch(Event::click("service-trigger"));
    page.dispatch(Event::click("custom-option-0-1"));
    press_on(&mut page, "budget-trigger", Key::Down);
    press(&mut page, Key::Enter);
    // Reselecting the same value still reports a change
    page.dispatch(Event::click("budget-trigger"));
    page.dispatch(Event::click("custom-option-1-0"));

    assert_eq!(
        *seen.borrow(),
        vec![
            (Some("service".to_string()), "Development".to_string()),
            (Some("budget".to_string()), "Small".to_string()),
            (Some("budget".to_string()), "Small".to_string()),
        ]
    );

    let drained = page.drain_changes();
    assert_eq!(drained.len(), 3);
    assert_eq!(drained[0].select, a);
    assert_eq!(drained[1].select, b);
    assert!(page.drain_changes().is_empty());
}

#[test]
fn test_no_change_without_selection() {
    let (mut page, _, _) = two_selects();
    press_on(&mut page, "service-trigger", Key::Down);
    press(&mut page, Key::Down);
    press(&mut page, Key::Escape);
    page.dispatch(Event::click("budget-trigger"));
    page.dispatch(Event::click_background());
    assert!(page.drain_changes().is_empty());
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_from_json_uses_defaults() {
    let config: SelectConfig = serde_json::from_str(r#"{"search_reset_ms": 800}"#).unwrap();
    assert_eq!(config.search_delay(), Duration::from_millis(800));
    assert_eq!(config.wrapper_class, "custom-select-wrapper");
    assert_eq!(config.highlight_class, "bg-gray-100");
    assert_eq!(config.type_ahead_pattern, None);
}

#[test]
fn test_custom_search_delay() {
    init_logger();
    let config = SelectConfig::new().search_reset(Duration::from_millis(800));
    let form = contact_form(vec![select_markup("size", "size", &["Red", "Blue"])]);
    let mut page = Page::with_config(page_root(form), config).unwrap();
    let id = page.init_all()[0];

    press_on(&mut page, "size-trigger", Key::Char('b'));
    page.advance(Duration::from_millis(700));
    assert_eq!(page.select(id).unwrap().search_buffer(), "b");
    page.advance(Duration::from_millis(100));
    assert_eq!(page.select(id).unwrap().search_buffer(), "");
    assert_eq!(page.now(), Duration::from_millis(800));
}

#[test]
fn test_custom_type_ahead_pattern() {
    init_logger();
    let config = SelectConfig::new().type_ahead_pattern("^[a-z]$");
    let form = contact_form(vec![select_markup("size", "size", &["10", "Red"])]);
    let mut page = Page::with_config(page_root(form), config).unwrap();
    let id = page.init_all()[0];

    press_on(&mut page, "size-trigger", Key::Char('1'));
    assert!(!page.select(id).unwrap().is_open());
    press_on(&mut page, "size-trigger", Key::Char('r'));
    assert_eq!(highlighted_value(&page, id).as_deref(), Some("Red"));
}

#[test]
fn test_space_rejected_by_pattern_selects_highlight() {
    init_logger();
    let config = SelectConfig::new().type_ahead_pattern("^[a-z]$");
    let form = contact_form(vec![select_markup("size", "size", &["Red", "Rose"])]);
    let mut page = Page::with_config(page_root(form), config).unwrap();
    let id = page.init_all()[0];

    press_on(&mut page, "size-trigger", Key::Char('r'));
    assert_eq!(highlighted_value(&page, id).as_deref(), Some("Red"));
    press(&mut page, Key::Char(' '));

    let select = page.select(id).unwrap();
    assert_eq!(select.search_buffer(), "r");
    assert_eq!(select.selected_value(), Some("Red"));
    assert!(!select.is_open());
    assert_eq!(page.document().get("size-input").unwrap().value, "Red");
}

#[test]
fn test_custom_class_names() {
    init_logger();
    let config = SelectConfig::new().highlight_class("is-active");
    let form = contact_form(vec![select_markup("size", "size", &["Red", "Blue"])]);
    let mut page = Page::with_config(page_root(form), config).unwrap();
    page.init_all();

    press_on(&mut page, "size-trigger", Key::Down);
    assert!(has_class(&page, "custom-option-0-0", "is-active"));
    assert!(!has_class(&page, "custom-option-0-0", "bg-gray-100"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let root = page_root(contact_form(Vec::new()));

    let err = Page::with_config(root.clone(), SelectConfig::new().type_ahead_pattern("(")).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPattern(_)));

    let err = Page::with_config(root.clone(), SelectConfig::new().search_reset(Duration::ZERO)).unwrap_err();
    assert!(matches!(err, ConfigError::ZeroSearchDelay));

    let err = Page::with_config(root, SelectConfig::new().wrapper_class(" ")).unwrap_err();
    assert!(matches!(err, ConfigError::EmptyClass("wrapper_class")));
}
