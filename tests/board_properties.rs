//! Property tests for board invariants

use proptest::prelude::*;
use std::collections::HashSet;
use taskboard_core::{
    BoardState, BoardStore, CardFilter, CardId, ColumnId, NewCard, Priority, PriorityFilter,
    SequentialIds,
};

#[derive(Debug, Clone)]
enum Command {
    Add { title: String, priority: Priority, column: ColumnId },
    Delete { pick: usize, column: ColumnId },
    Within { column: ColumnId, from: usize, to: usize },
    Across { pick: usize, to: ColumnId, index: usize },
}

fn column() -> impl Strategy<Value = ColumnId> {
    prop_oneof![
        Just(ColumnId::Todo),
        Just(ColumnId::InProgress),
        Just(ColumnId::Done)
    ]
}

fn priority() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::Low), Just(Priority::Medium), Just(Priority::High)]
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        3 => ("[a-zA-Z ]{1,12}", priority(), column())
            .prop_map(|(title, priority, column)| Command::Add { title, priority, column }),
        1 => (0usize..20, column()).prop_map(|(pick, column)| Command::Delete { pick, column }),
        2 => (column(), 0usize..8, 0usize..8)
            .prop_map(|(column, from, to)| Command::Within { column, from, to }),
        2 => (0usize..20, column(), 0usize..8)
            .prop_map(|(pick, to, index)| Command::Across { pick, to, index }),
    ]
}

fn nth_card(state: &BoardState, pick: usize) -> Option<CardId> {
    let cards: Vec<&CardId> = state.cards().keys().collect();
    if cards.is_empty() {
        None
    } else {
        Some(cards[pick % cards.len()].clone())
    }
}

fn apply(store: &mut BoardStore, command: &Command) {
    // Invalid commands are expected to fail without side effects
    let _ = match command {
        Command::Add {
            title,
            priority,
            column,
        } => store
            .add_card(NewCard::new(title.clone(), "d", "X", *priority), *column)
            .map(|_| ()),
        Command::Delete { pick, column } => match nth_card(&store.state(), *pick) {
            Some(id) => store.delete_card(&id, *column).map(|_| ()),
            None => Ok(()),
        },
        Command::Within { column, from, to } => store.move_within_column(*column, *from, *to),
        Command::Across { pick, to, index } => {
            let state = store.state();
            match nth_card(&state, *pick) {
                Some(id) => {
                    let from = state.column_of(&id).unwrap_or_default();
                    store.move_across_columns(from, *to, &id, *index)
                }
                None => Ok(()),
            }
        }
    };
}

fn assert_referential_integrity(state: &BoardState) {
    let mut placed = HashSet::new();
    for column in state.list_columns() {
        for id in &column.card_ids {
            assert!(state.cards().contains_key(id), "dangling id {}", id);
            assert!(placed.insert(id.clone()), "card {} placed twice", id);
        }
    }
    assert_eq!(placed.len(), state.cards().len(), "orphaned card");
}

fn is_subsequence(needle: &[CardId], haystack: &[CardId]) -> bool {
    let mut rest = haystack.iter();
    needle.iter().all(|id| rest.any(|candidate| candidate == id))
}

proptest! {
    #[test]
    fn prop_commands_preserve_referential_integrity(
        commands in prop::collection::vec(command(), 0..60)
    ) {
        let mut store = BoardStore::default().with_id_generator(SequentialIds::new("c"));
        for command in &commands {
            apply(&mut store, command);
            assert_referential_integrity(&store.state());
        }
    }

    #[test]
    fn prop_cross_column_move_conserves_count(
        commands in prop::collection::vec(command(), 1..30),
        pick in 0usize..20,
        index in 0usize..8,
    ) {
        let mut store = BoardStore::default().with_id_generator(SequentialIds::new("c"));
        for command in &commands {
            apply(&mut store, command);
        }

        let state = store.state();
        if let Some(id) = nth_card(&state, pick) {
            let from = state.column_of(&id).unwrap();
            let to = ColumnId::ALL.into_iter().find(|c| *c != from).unwrap();
            let before = state.get_column(from).unwrap().len() + state.get_column(to).unwrap().len();

            if store.move_across_columns(from, to, &id, index).is_ok() {
                let after = store.get_column(from).unwrap().len() + store.get_column(to).unwrap().len();
                prop_assert_eq!(before, after);
                prop_assert_eq!(store.state().column_of(&id), Some(to));
            }
        }
    }

    #[test]
    fn prop_filter_output_is_ordered_subsequence(
        commands in prop::collection::vec(command(), 0..40),
        search in "[a-zA-Z]{0,3}",
        priority in prop_oneof![
            Just(PriorityFilter::All),
            Just(PriorityFilter::Low),
            Just(PriorityFilter::Medium),
            Just(PriorityFilter::High)
        ],
    ) {
        let mut store = BoardStore::default().with_id_generator(SequentialIds::new("c"));
        for command in &commands {
            apply(&mut store, command);
        }

        let filter = CardFilter::new(search, priority);
        let state = store.state();
        for column in state.list_columns() {
            let visible = state.visible_ids(column.id, &filter).unwrap();
            prop_assert!(is_subsequence(&visible, &column.card_ids));
        }
    }
}

#[test]
fn test_move_within_round_trip() {
    let mut store = BoardStore::default().with_id_generator(SequentialIds::new("c"));
    for title in ["a", "b", "c", "d"] {
        store
            .add_card(NewCard::new(title, "d", "X", Priority::Low), ColumnId::Todo)
            .unwrap();
    }
    let original = store.get_column(ColumnId::Todo).unwrap().card_ids.clone();

    store.move_within_column(ColumnId::Todo, 0, 2).unwrap();
    let titles: Vec<String> = store
        .get_column(ColumnId::Todo)
        .unwrap()
        .card_ids
        .iter()
        .map(|id| store.get_card(id).unwrap().title.clone())
        .collect();
    assert_eq!(titles, vec!["b", "c", "a", "d"]);

    store.move_within_column(ColumnId::Todo, 2, 0).unwrap();
    assert_eq!(store.get_column(ColumnId::Todo).unwrap().card_ids, original);
}

#[test]
fn test_delete_removes_card_everywhere() {
    let mut store = BoardStore::default().with_id_generator(SequentialIds::new("c"));
    let id = store
        .add_card(NewCard::new("A", "d", "X", Priority::Low), ColumnId::InProgress)
        .unwrap();

    store.delete_card(&id, ColumnId::InProgress).unwrap();

    let state = store.state();
    assert!(!state.cards().contains_key(&id));
    assert!(!state.get_column(ColumnId::InProgress).unwrap().contains(&id));
    assert!(store
        .delete_card(&id, ColumnId::InProgress)
        .unwrap_err()
        .is_not_found());
}
