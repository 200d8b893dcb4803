//! Ticket board core: data loading, grouping/sorting and display preferences.

pub mod board;
pub mod engine;
pub mod error;
pub mod loader;
pub mod preferences;

pub use board::{BoardSnapshot, KanbanBoard, LoadState};
pub use engine::{derive_view, group, group_by_name, sort, sort_by_name};
pub use error::LoadError;
pub use loader::{FileTicketSource, HttpTicketSource, StaticTicketSource, TicketSource};
pub use preferences::{DisplaySettings, MemoryPreferenceStore, PreferenceStore};
