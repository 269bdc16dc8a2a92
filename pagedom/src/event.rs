/// High-level events with element targeting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Key press event. A `None` target means "whatever is focused".
    Key {
        target: Option<String>,
        key: Key,
        modifiers: Modifiers,
    },
    /// Mouse click event. A `None` target is a click on the bare page.
    Click {
        target: Option<String>,
        button: MouseButton,
    },
    /// Element gained focus
    Focus { target: String },
    /// Element lost focus
    Blur {
        target: String,
        new_target: Option<String>,
    },
}

impl Event {
    /// Unmodified key press aimed at the focused element.
    pub fn key(key: Key) -> Self {
        Self::Key {
            target: None,
            key,
            modifiers: Modifiers::new(),
        }
    }

    /// Unmodified key press aimed at a specific element.
    pub fn key_on(target: impl Into<String>, key: Key) -> Self {
        Self::Key {
            target: Some(target.into()),
            key,
            modifiers: Modifiers::new(),
        }
    }

    /// Left click on an element.
    pub fn click(target: impl Into<String>) -> Self {
        Self::Click {
            target: Some(target.into()),
            button: MouseButton::Left,
        }
    }

    /// Left click on the page background.
    pub fn click_background() -> Self {
        Self::Click {
            target: None,
            button: MouseButton::Left,
        }
    }
}

/// Simplified key representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    F(u8),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value to a key.
    ///
    /// Single characters become `Key::Char`; named keys use the DOM names
    /// ("ArrowDown", "Escape", ...). Unknown names return None.
    pub fn from_dom(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(Key::Char(c));
        }
        let key = match name {
            "Enter" => Key::Enter,
            "Backspace" => Key::Backspace,
            "Delete" => Key::Delete,
            "Tab" => Key::Tab,
            "Escape" | "Esc" => Key::Escape,
            "ArrowUp" | "Up" => Key::Up,
            "ArrowDown" | "Down" => Key::Down,
            "ArrowLeft" | "Left" => Key::Left,
            "ArrowRight" | "Right" => Key::Right,
            "Home" => Key::Home,
            "End" => Key::End,
            "PageUp" => Key::PageUp,
            "PageDown" => Key::PageDown,
            "Insert" => Key::Insert,
            "Spacebar" => Key::Char(' '),
            _ => {
                let n = name.strip_prefix('F')?.parse().ok()?;
                Key::F(n)
            }
        };
        Some(key)
    }
}

/// Key modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Default::default()
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Default::default()
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Default::default()
        }
    }
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}
