use crate::domain::{
    card::{Card, CardId, CardPatch, NewCard},
    column::{Column, ColumnId},
    filter::{self, CardFilter},
    ordering::{self, OrderingError},
};
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Title configuration for one board column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub id: ColumnId,
    pub title: String,
}

impl ColumnConfig {
    pub fn new(id: ColumnId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// Board configuration
///
/// The column set itself is fixed; configuration only decides what each
/// column is called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub columns: Vec<ColumnConfig>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: ColumnId::ALL
                .iter()
                .map(|id| ColumnConfig::new(*id, id.default_title()))
                .collect(),
        }
    }
}

impl BoardConfig {
    /// Overrides the title of one column
    pub fn with_title(mut self, id: ColumnId, title: impl Into<String>) -> Self {
        let title = title.into();
        match self.columns.iter_mut().find(|col| col.id == id) {
            Some(col) => col.title = title,
            None => self.columns.push(ColumnConfig::new(id, title)),
        }
        self
    }

    /// Checks that every column is configured exactly once
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for col in &self.columns {
            if !seen.insert(col.id) {
                return Err(BoardError::validation(
                    "columns",
                    format!("column '{}' is configured twice", col.id),
                ));
            }
        }
        if let Some(missing) = ColumnId::ALL.iter().find(|id| !seen.contains(*id)) {
            return Err(BoardError::validation(
                "columns",
                format!("column '{}' is missing", missing),
            ));
        }
        Ok(())
    }

    pub fn title_for(&self, id: ColumnId) -> &str {
        self.columns
            .iter()
            .find(|col| col.id == id)
            .map(|col| col.title.as_str())
            .unwrap_or_else(|| id.default_title())
    }
}

/// In-memory kanban board: the card map plus each column's ordered ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    columns: BTreeMap<ColumnId, Column>,
    cards: BTreeMap<CardId, Card>,
}

impl BoardState {
    /// Creates an empty board with every column present
    pub fn new(config: &BoardConfig) -> Self {
        let columns = ColumnId::ALL
            .iter()
            .map(|id| (*id, Column::new(*id, config.title_for(*id))))
            .collect();

        Self {
            columns,
            cards: BTreeMap::new(),
        }
    }

    /// Builds a board from raw parts, rejecting anything that breaks
    /// referential integrity
    pub fn from_parts(
        columns: BTreeMap<ColumnId, Column>,
        cards: BTreeMap<CardId, Card>,
    ) -> Result<Self> {
        let state = Self { columns, cards };
        state.check_integrity()?;
        Ok(state)
    }

    pub fn columns(&self) -> &BTreeMap<ColumnId, Column> {
        &self.columns
    }

    pub fn cards(&self) -> &BTreeMap<CardId, Card> {
        &self.cards
    }

    /// Columns in board order
    pub fn list_columns(&self) -> Vec<&Column> {
        self.columns.values().collect()
    }

    pub fn get_column(&self, id: ColumnId) -> Result<&Column> {
        self.columns
            .get(&id)
            .ok_or_else(|| BoardError::ColumnNotFound(id.to_string()))
    }

    pub fn get_card(&self, id: &CardId) -> Result<&Card> {
        self.cards
            .get(id)
            .ok_or_else(|| BoardError::CardNotFound(id.to_string()))
    }

    /// Finds the column currently holding a card
    pub fn column_of(&self, card_id: &CardId) -> Option<ColumnId> {
        self.columns
            .values()
            .find(|col| col.contains(card_id))
            .map(|col| col.id)
    }

    /// Filtered, order-preserving view of one column
    pub fn visible_ids(&self, column: ColumnId, filter: &CardFilter) -> Result<Vec<CardId>> {
        let column = self.get_column(column)?;
        Ok(filter::visible_ids(column, &self.cards, filter))
    }

    /// Inserts a new card and appends it to `column`
    pub fn insert_card(&mut self, id: CardId, fields: NewCard, column: ColumnId) -> Result<()> {
        if self.cards.contains_key(&id) {
            return Err(BoardError::DuplicateCardId(id.to_string()));
        }
        let card = Card::new(id.clone(), fields)?;
        let target = self.column_mut(column)?;

        target.card_ids.push(id.clone());
        self.cards.insert(id, card);
        Ok(())
    }

    /// Merges `patch` into an existing card without touching ordering
    pub fn update_card(&mut self, id: &CardId, patch: CardPatch) -> Result<&Card> {
        let card = self
            .cards
            .get_mut(id)
            .ok_or_else(|| BoardError::CardNotFound(id.to_string()))?;
        card.apply(patch)?;
        Ok(&*card)
    }

    /// Removes a card from the card map and from `column` together
    pub fn delete_card(&mut self, id: &CardId, column: ColumnId) -> Result<Card> {
        if !self.cards.contains_key(id) {
            return Err(BoardError::CardNotFound(id.to_string()));
        }
        let position = self
            .get_column(column)?
            .position_of(id)
            .ok_or_else(|| BoardError::CardNotInColumn {
                card: id.to_string(),
                column: column.to_string(),
            })?;

        self.column_mut(column)?.card_ids.remove(position);
        self.cards
            .remove(id)
            .ok_or_else(|| BoardError::CardNotFound(id.to_string()))
    }

    /// Reorders a column; `to` is read against the sequence with the moved
    /// card already taken out
    pub fn move_within_column(&mut self, column: ColumnId, from: usize, to: usize) -> Result<()> {
        let current = self.get_column(column)?;
        let reordered = ordering::relocate(&current.card_ids, from, to)
            .map_err(|err| index_error(column, err))?;
        self.column_mut(column)?.card_ids = reordered;
        Ok(())
    }

    /// Moves a card out of `from` and into `to` at `to_index`
    pub fn move_across_columns(
        &mut self,
        from: ColumnId,
        to: ColumnId,
        card_id: &CardId,
        to_index: usize,
    ) -> Result<()> {
        let source = self.get_column(from)?;
        let position = source
            .position_of(card_id)
            .ok_or_else(|| BoardError::CardNotInColumn {
                card: card_id.to_string(),
                column: from.to_string(),
            })?;

        if from == to {
            return self.move_within_column(from, position, to_index);
        }

        let dest = self.get_column(to)?;
        let (new_source, new_dest) =
            ordering::splice_across(&source.card_ids, &dest.card_ids, card_id, to_index)
                .map_err(|err| index_error(to, err))?;

        self.column_mut(from)?.card_ids = new_source;
        self.column_mut(to)?.card_ids = new_dest;
        Ok(())
    }

    /// Verifies that column ids and card ids reference each other exactly once
    pub fn check_integrity(&self) -> Result<()> {
        for id in ColumnId::ALL {
            if !self.columns.contains_key(&id) {
                return Err(BoardError::corrupt(format!("column '{}' is missing", id)));
            }
        }

        let mut placed: HashSet<&CardId> = HashSet::new();
        for (key, column) in &self.columns {
            if *key != column.id {
                return Err(BoardError::corrupt(format!(
                    "column stored under '{}' claims id '{}'",
                    key, column.id
                )));
            }
            for card_id in &column.card_ids {
                if !self.cards.contains_key(card_id) {
                    return Err(BoardError::corrupt(format!(
                        "column '{}' references unknown card '{}'",
                        column.id, card_id
                    )));
                }
                if !placed.insert(card_id) {
                    return Err(BoardError::corrupt(format!(
                        "card '{}' appears more than once across columns",
                        card_id
                    )));
                }
            }
        }

        for (key, card) in &self.cards {
            if *key != card.id {
                return Err(BoardError::corrupt(format!(
                    "card stored under '{}' claims id '{}'",
                    key, card.id
                )));
            }
            if !placed.contains(key) {
                return Err(BoardError::corrupt(format!(
                    "card '{}' is not placed in any column",
                    key
                )));
            }
        }

        Ok(())
    }

    fn column_mut(&mut self, id: ColumnId) -> Result<&mut Column> {
        self.columns
            .get_mut(&id)
            .ok_or_else(|| BoardError::ColumnNotFound(id.to_string()))
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new(&BoardConfig::default())
    }
}

fn index_error(column: ColumnId, err: OrderingError) -> BoardError {
    match err {
        OrderingError::IndexOutOfRange { index, len } => BoardError::IndexOutOfRange {
            column: column.to_string(),
            index,
            len,
        },
        other => BoardError::Ordering(other),
    }
}
