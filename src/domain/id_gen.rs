use crate::domain::board::BoardState;
use crate::domain::card::CardId;
use uuid::Uuid;

/// Source of fresh card identifiers
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> CardId;
}

/// Random v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> CardId {
        CardId::new(Uuid::new_v4().to_string())
    }
}

/// Counter-based ids such as `c1`, `c2`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    // wider than parsed suffixes: `c{u64::MAX}` still has a successor
    next: u128,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Continues after the highest `prefix<N>` id already on the board
    pub fn resume(prefix: impl Into<String>, state: &BoardState) -> Self {
        let prefix = prefix.into();
        let highest = state
            .cards()
            .keys()
            .filter_map(|id| id.as_str().strip_prefix(prefix.as_str()))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        Self {
            prefix,
            next: u128::from(highest) + 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> CardId {
        let id = CardId::new(format!("{}{}", self.prefix, self.next));
        self.next = self.next.saturating_add(1);
        id
    }
}
