use crate::domain::{
    card::{Card, CardId, Priority},
    column::{Column, ColumnId},
};
use crate::error::BoardError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fmt, str::FromStr};

/// Priority selection for the board view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityFilter {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl PriorityFilter {
    pub fn matches(&self, priority: Priority) -> bool {
        match self {
            Self::All => true,
            Self::Low => priority == Priority::Low,
            Self::Medium => priority == Priority::Medium,
            Self::High => priority == Priority::High,
        }
    }
}

impl From<Priority> for PriorityFilter {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Low => Self::Low,
            Priority::Medium => Self::Medium,
            Priority::High => Self::High,
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(BoardError::validation(
                "priority filter",
                format!("'{}' is not one of all, low, medium, high", s),
            )),
        }
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All Priorities"),
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Search and priority predicates overlaid on the board
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFilter {
    pub search: String,
    pub priority: PriorityFilter,
}

impl CardFilter {
    pub fn new(search: impl Into<String>, priority: PriorityFilter) -> Self {
        Self {
            search: search.into(),
            priority,
        }
    }

    /// True when either predicate would hide something
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || self.priority != PriorityFilter::All
    }

    pub fn clear(&mut self) {
        self.search.clear();
        self.priority = PriorityFilter::All;
    }

    fn matches(&self, card: &Card, search_lower: &str) -> bool {
        card.title_contains(search_lower) && self.priority.matches(card.priority)
    }
}

/// Ids of the cards in `column` that pass `filter`, in column order
///
/// Ids with no entry in `cards` are skipped.
pub fn visible_ids(
    column: &Column,
    cards: &BTreeMap<CardId, Card>,
    filter: &CardFilter,
) -> Vec<CardId> {
    let search_lower = filter.search.to_lowercase();

    column
        .card_ids
        .iter()
        .filter(|id| {
            cards
                .get(*id)
                .map(|card| filter.matches(card, &search_lower))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

/// What the presentation layer needs to draw one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnView {
    pub id: ColumnId,
    pub title: String,
    /// Card count before filtering
    pub total: usize,
    pub visible: Vec<CardId>,
}

impl ColumnView {
    pub fn build(column: &Column, cards: &BTreeMap<CardId, Card>, filter: &CardFilter) -> Self {
        Self {
            id: column.id,
            title: column.title.clone(),
            total: column.len(),
            visible: visible_ids(column, cards, filter),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}
