pub mod board;
pub mod card;
pub mod column;
pub mod filter;
pub mod id_gen;
pub mod ordering;

pub use board::{BoardConfig, BoardState, ColumnConfig};
pub use card::{Card, CardId, CardPatch, NewCard, Priority};
pub use column::{Column, ColumnId};
pub use filter::{visible_ids, CardFilter, ColumnView, PriorityFilter};
pub use id_gen::{IdGenerator, SequentialIds, UuidIds};
pub use ordering::{relocate, splice_across, OrderingError};
