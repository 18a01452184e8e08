//! Persisted form of the whole board.
//!
//! A snapshot is a JSON document:
//!
//! ```json
//! {
//!   "version": 1,
//!   "saved_at": "2024-01-01T00:00:00Z",
//!   "columns": { "todo": { "id": "todo", "title": "To Do", "cardIds": ["c1"] } },
//!   "cards": { "c1": { "id": "c1", "title": "A", "description": "d", "assignee": "X", "priority": "low" } }
//! }
//! ```
//!
//! `version` and `saved_at` may be absent. Unknown fields are ignored.
//! Loading re-checks referential integrity and never repairs a bad document.

use crate::domain::{BoardState, Card, CardId, Column, ColumnId};
use crate::error::{BoardError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use std::collections::BTreeMap;

/// Newest snapshot layout this crate reads and the one it writes
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotDocument {
    #[serde(default = "first_version")]
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<DateTime<Utc>>,
    columns: BTreeMap<String, Column>,
    cards: BTreeMap<String, Card>,
}

fn first_version() -> u32 {
    1
}

/// Encodes the board, stamped with the current time
pub fn serialize(state: &BoardState) -> Result<String> {
    serialize_at(state, Utc::now())
}

/// Encodes the board with an explicit `saved_at` stamp
pub fn serialize_at(state: &BoardState, saved_at: DateTime<Utc>) -> Result<String> {
    let document = SnapshotDocument {
        version: SNAPSHOT_VERSION,
        saved_at: Some(saved_at),
        columns: state
            .columns()
            .iter()
            .map(|(id, column)| (id.as_str().to_string(), column.clone()))
            .collect(),
        cards: state
            .cards()
            .iter()
            .map(|(id, card)| (id.as_str().to_string(), card.clone()))
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&document)?)
}

/// Decodes and validates a snapshot
///
/// Text that is not JSON fails with [`BoardError::Deserialization`]; JSON
/// that is missing fields, names unknown columns or breaks card/column
/// integrity fails with [`BoardError::CorruptState`].
pub fn deserialize(contents: &str) -> Result<BoardState> {
    let document: SnapshotDocument = serde_json::from_str(contents).map_err(classify)?;

    if document.version == 0 || document.version > SNAPSHOT_VERSION {
        return Err(BoardError::UnsupportedVersion {
            found: document.version,
            supported: SNAPSHOT_VERSION,
        });
    }

    let mut columns = BTreeMap::new();
    for (key, column) in document.columns {
        // keys must be written exactly as `ColumnId::as_str` spells them
        let id = ColumnId::ALL
            .into_iter()
            .find(|id| id.as_str() == key)
            .ok_or_else(|| BoardError::corrupt(format!("unknown column '{}'", key)))?;
        if id != column.id {
            return Err(BoardError::corrupt(format!(
                "column stored under '{}' claims id '{}'",
                key, column.id
            )));
        }
        if columns.insert(id, column).is_some() {
            return Err(BoardError::corrupt(format!("column '{}' stored twice", id)));
        }
    }

    let mut cards = BTreeMap::new();
    for (key, card) in document.cards {
        if card.title.trim().is_empty() {
            return Err(BoardError::corrupt(format!("card '{}' has an empty title", key)));
        }
        cards.insert(CardId::new(key), card);
    }

    BoardState::from_parts(columns, cards)
}

fn classify(err: serde_json::Error) -> BoardError {
    match err.classify() {
        Category::Data => BoardError::corrupt(err.to_string()),
        Category::Syntax | Category::Eof | Category::Io => {
            BoardError::Deserialization(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewCard, Priority};
    use crate::error::ErrorKind;

    fn sample_board() -> BoardState {
        let mut board = BoardState::default();
        board
            .insert_card(
                CardId::new("c1"),
                NewCard::new("A", "d", "X", Priority::Low),
                ColumnId::Todo,
            )
            .unwrap();
        board
            .insert_card(
                CardId::new("c2"),
                NewCard::new("B", "d", "Y", Priority::High),
                ColumnId::Done,
            )
            .unwrap();
        board
    }

    #[test]
    fn test_serialized_document_shape() {
        let saved_at = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let json = serialize_at(&sample_board(), saved_at).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["saved_at"], "2024-01-01T00:00:00Z");
        assert_eq!(value["columns"]["todo"]["cardIds"][0], "c1");
        assert_eq!(value["columns"]["inprogress"]["title"], "In Progress");
        assert_eq!(value["cards"]["c2"]["priority"], "high");
    }

    #[test]
    fn test_restores_what_was_saved() {
        let board = sample_board();
        let restored = deserialize(&serialize(&board).unwrap()).unwrap();
        assert_eq!(restored, board);
    }

    #[test]
    fn test_bare_document_without_version_loads() {
        let json = r#"{
            "columns": {
                "todo": { "id": "todo", "title": "To Do", "cardIds": ["c1"] },
                "inprogress": { "id": "inprogress", "title": "In Progress", "cardIds": [] },
                "done": { "id": "done", "title": "Done", "cardIds": [] }
            },
            "cards": {
                "c1": { "id": "c1", "title": "A", "description": "d", "assignee": "X", "priority": "low", "color": "red" }
            },
            "theme": "dark"
        }"#;

        let board = deserialize(json).unwrap();
        assert_eq!(board.get_card(&CardId::new("c1")).unwrap().assignee, "X");
    }

    #[test]
    fn test_not_json_is_a_deserialization_error() {
        let err = deserialize("not json at all").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Deserialization);

        let err = deserialize("{\"columns\": {").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Deserialization);
    }

    #[test]
    fn test_missing_field_is_corrupt() {
        let json = r#"{
            "columns": {
                "todo": { "id": "todo", "title": "To Do", "cardIds": ["c1"] },
                "inprogress": { "id": "inprogress", "title": "In Progress", "cardIds": [] },
                "done": { "id": "done", "title": "Done", "cardIds": [] }
            },
            "cards": {
                "c1": { "id": "c1", "title": "A", "description": "d", "priority": "low" }
            }
        }"#;

        let err = deserialize(json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptState);
    }

    #[test]
    fn test_dangling_card_reference_is_corrupt() {
        let mut value: serde_json::Value =
            serde_json::from_str(&serialize(&sample_board()).unwrap()).unwrap();
        value["columns"]["inprogress"]["cardIds"] = serde_json::json!(["ghost"]);

        let err = deserialize(&value.to_string()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptState);
    }

    #[test]
    fn test_card_in_two_columns_is_corrupt() {
        let mut value: serde_json::Value =
            serde_json::from_str(&serialize(&sample_board()).unwrap()).unwrap();
        value["columns"]["inprogress"]["cardIds"] = serde_json::json!(["c1"]);

        let err = deserialize(&value.to_string()).unwrap_err();
        assert!(matches!(err, BoardError::CorruptState(_)));
    }

    #[test]
    fn test_unknown_or_missing_column_is_corrupt() {
        let mut value: serde_json::Value =
            serde_json::from_str(&serialize(&sample_board()).unwrap()).unwrap();
        value["columns"]["backlog"] =
            serde_json::json!({ "id": "todo", "title": "Backlog", "cardIds": [] });
        assert_eq!(
            deserialize(&value.to_string()).unwrap_err().kind(),
            ErrorKind::CorruptState
        );

        let mut value: serde_json::Value =
            serde_json::from_str(&serialize(&sample_board()).unwrap()).unwrap();
        value["columns"].as_object_mut().unwrap().remove("inprogress");
        assert_eq!(
            deserialize(&value.to_string()).unwrap_err().kind(),
            ErrorKind::CorruptState
        );
    }

    #[test]
    fn test_column_key_alias_is_corrupt() {
        // "TODO" would fold onto "todo" and hide c1 being listed twice
        let json = r#"{
            "columns": {
                "TODO": { "id": "todo", "title": "To Do", "cardIds": ["c1"] },
                "todo": { "id": "todo", "title": "To Do", "cardIds": ["c1"] },
                "inprogress": { "id": "inprogress", "title": "In Progress", "cardIds": [] },
                "done": { "id": "done", "title": "Done", "cardIds": [] }
            },
            "cards": {
                "c1": { "id": "c1", "title": "A", "description": "d", "assignee": "X", "priority": "low" }
            }
        }"#;

        let err = deserialize(json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptState);

        let mut value: serde_json::Value =
            serde_json::from_str(&serialize(&sample_board()).unwrap()).unwrap();
        let columns = value["columns"].as_object_mut().unwrap();
        let done = columns.remove("done").unwrap();
        columns.insert("Done".to_string(), done);
        assert_eq!(
            deserialize(&value.to_string()).unwrap_err().kind(),
            ErrorKind::CorruptState
        );
    }

    #[test]
    fn test_future_version_is_rejected() {
        let mut value: serde_json::Value =
            serde_json::from_str(&serialize(&sample_board()).unwrap()).unwrap();
        value["version"] = serde_json::json!(SNAPSHOT_VERSION + 1);

        let err = deserialize(&value.to_string()).unwrap_err();
        assert!(matches!(err, BoardError::UnsupportedVersion { found: 2, .. }));
    }
}
