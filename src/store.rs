//! Explicit state holder for the board.
//!
//! Every command runs against a private copy of the current [`BoardState`];
//! only a command that succeeds swaps its copy in, bumps the revision and
//! notifies subscribers. A failed command leaves the visible state exactly
//! as it was.

use crate::domain::{
    BoardConfig, BoardState, Card, CardFilter, CardId, CardPatch, Column, ColumnId, ColumnView,
    IdGenerator, NewCard, UuidIds,
};
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Callback invoked with the new state after every committed command
pub type Listener = Box<dyn FnMut(&Arc<BoardState>) + Send>;

/// Handle returned by [`BoardStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A completed drag gesture, as reported by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDrop {
    pub card_id: CardId,
    pub source_column: ColumnId,
    pub source_index: usize,
    pub dest_column: ColumnId,
    pub dest_index: usize,
}

impl CardDrop {
    pub fn is_within_column(&self) -> bool {
        self.source_column == self.dest_column
    }
}

pub struct BoardStore {
    state: Arc<BoardState>,
    ids: Box<dyn IdGenerator>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    revision: u64,
}

impl BoardStore {
    /// Creates a store holding an empty board, generating UUID card ids
    pub fn new(config: &BoardConfig) -> Self {
        Self::with_state(BoardState::new(config))
    }

    /// Creates a store around an existing (e.g. restored) board
    pub fn with_state(state: BoardState) -> Self {
        Self {
            state: Arc::new(state),
            ids: Box::new(UuidIds),
            listeners: Vec::new(),
            next_subscription: 0,
            revision: 0,
        }
    }

    /// Replaces the id generator used by [`BoardStore::add_card`]
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Cheap handle to the current state; later commands do not affect it
    pub fn state(&self) -> Arc<BoardState> {
        Arc::clone(&self.state)
    }

    /// Number of commands committed so far, for callers that poll
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get_card(&self, id: &CardId) -> Result<&Card> {
        self.state.get_card(id)
    }

    pub fn get_column(&self, id: ColumnId) -> Result<&Column> {
        self.state.get_column(id)
    }

    pub fn list_columns(&self) -> Vec<&Column> {
        self.state.list_columns()
    }

    /// Every column with its filtered card ids, in board order
    pub fn column_views(&self, filter: &CardFilter) -> Vec<ColumnView> {
        self.state
            .list_columns()
            .into_iter()
            .map(|column| ColumnView::build(column, self.state.cards(), filter))
            .collect()
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&Arc<BoardState>) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Creates a card at the end of `column` and returns its fresh id
    pub fn add_card(&mut self, fields: NewCard, column: ColumnId) -> Result<CardId> {
        let id = self.ids.next_id();
        let inserted = id.clone();
        self.commit(move |state| state.insert_card(inserted, fields, column))?;

        debug!(card_id = %id, column = %column, "card added");
        Ok(id)
    }

    pub fn update_card(&mut self, id: &CardId, patch: CardPatch) -> Result<Card> {
        let card = self.commit(|state| state.update_card(id, patch).cloned())?;

        debug!(card_id = %id, "card updated");
        Ok(card)
    }

    pub fn delete_card(&mut self, id: &CardId, column: ColumnId) -> Result<Card> {
        let card = self.commit(|state| state.delete_card(id, column))?;

        debug!(card_id = %id, column = %column, "card deleted");
        Ok(card)
    }

    pub fn move_within_column(&mut self, column: ColumnId, from: usize, to: usize) -> Result<()> {
        self.commit(|state| state.move_within_column(column, from, to))?;

        debug!(column = %column, from, to, "card reordered");
        Ok(())
    }

    pub fn move_across_columns(
        &mut self,
        from: ColumnId,
        to: ColumnId,
        card_id: &CardId,
        to_index: usize,
    ) -> Result<()> {
        self.commit(|state| state.move_across_columns(from, to, card_id, to_index))?;

        debug!(card_id = %card_id, from = %from, to = %to, to_index, "card moved");
        Ok(())
    }

    /// Applies a drag gesture, reordering or moving as appropriate
    ///
    /// The card's position is looked up by id; `source_index` may come from
    /// a filtered view and is only compared for diagnostics.
    pub fn apply_drop(&mut self, drop: &CardDrop) -> Result<()> {
        let from = self
            .state
            .get_column(drop.source_column)?
            .position_of(&drop.card_id)
            .ok_or_else(|| BoardError::CardNotInColumn {
                card: drop.card_id.to_string(),
                column: drop.source_column.to_string(),
            })?;

        if from != drop.source_index {
            debug!(
                card_id = %drop.card_id,
                reported = drop.source_index,
                actual = from,
                "drop source index differs from card position"
            );
        }

        if drop.is_within_column() {
            self.move_within_column(drop.source_column, from, drop.dest_index)
        } else {
            self.move_across_columns(
                drop.source_column,
                drop.dest_column,
                &drop.card_id,
                drop.dest_index,
            )
        }
    }

    fn commit<T>(&mut self, op: impl FnOnce(&mut BoardState) -> Result<T>) -> Result<T> {
        let mut next = BoardState::clone(&self.state);
        let output = op(&mut next)?;

        self.state = Arc::new(next);
        self.revision += 1;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.state);
        }
        Ok(output)
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new(&BoardConfig::default())
    }
}

impl fmt::Debug for BoardStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardStore")
            .field("state", &self.state)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
