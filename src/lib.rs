//! # Taskboard Core
//!
//! State engine for a three-column kanban task board.
//!
//! This crate owns the board's data model (cards and the ordered card ids
//! of each column), the commands that add, edit, delete and reorder cards,
//! the search/priority filter used to build column views, and the snapshot
//! format used to persist the board. Rendering and gesture handling live
//! elsewhere; they talk to [`BoardStore`] through plain ids and indices.

pub mod domain;
pub mod error;
pub mod snapshot;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use domain::{
    board::{BoardConfig, BoardState, ColumnConfig},
    card::{Card, CardId, CardPatch, NewCard, Priority},
    column::{Column, ColumnId},
    filter::{CardFilter, ColumnView, PriorityFilter},
    id_gen::{IdGenerator, SequentialIds, UuidIds},
};
pub use error::{BoardError, ErrorKind, Result};
pub use storage::{Autosave, FileStorage, Storage};
pub use store::{BoardStore, CardDrop, SubscriptionId};
