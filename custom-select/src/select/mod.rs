//! Select widget - a custom dropdown bound to existing page markup.

pub mod events;
pub mod item;
pub mod render;
mod state;

pub use events::{DismissReason, EventResult, Hit, SelectAction, Step};
pub use item::SelectOption;
pub use state::{SelectId, SelectInstance, SelectParts, SelectTask};
