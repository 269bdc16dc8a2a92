pub mod document;
pub mod element;
pub mod event;
pub mod focus;
pub mod timer;

pub use document::Document;
pub use element::{Content, Element, Selector};
pub use event::{Event, Key, Modifiers, MouseButton};
pub use focus::{collect_focusable, FocusState};
pub use timer::{TimerId, TimerQueue};
