//! Value table, visit table and return bookkeeping tests.

#![allow(clippy::float_cmp)]

use bjrl::learn::{Pending, SplitStack};
use bjrl::{
    Action, FirstVisits, HandType, ILLEGAL, NUM_ACTIONS, NUM_STATES, State, TableError,
    ValueTable, VisitTable,
};

fn pair_of_eights() -> usize {
    State::new(HandType::Pair, 8, 10, true, true)
        .unwrap()
        .encode()
}

fn hard_sixteen() -> usize {
    State::new(HandType::Hard, 16, 10, false, false)
        .unwrap()
        .encode()
}

#[test]
fn masks_illegal_actions() {
    let table = ValueTable::new(0.5);
    assert_eq!(table.row(pair_of_eights()).unwrap(), &[0.5; NUM_ACTIONS]);
    assert_eq!(
        table.row(hard_sixteen()).unwrap(),
        &[0.5, 0.5, ILLEGAL, ILLEGAL]
    );
    let unreachable = State::new(HandType::Pair, 8, 10, false, false)
        .unwrap()
        .encode();
    assert_eq!(table.row(unreachable).unwrap(), &[ILLEGAL; NUM_ACTIONS]);
}

#[test]
fn sample_average_tracks_the_mean() {
    let mut table = ValueTable::new(0.0);
    let mut visits = VisitTable::new();
    let state = hard_sixteen();
    for target in [1.0, -1.0, 1.0, 1.0] {
        table
            .sample_average(&mut visits, state, Action::Stand, target)
            .unwrap();
    }
    assert_eq!(table.get(state, Action::Stand).unwrap(), 0.5);
    assert_eq!(visits.get(state, Action::Stand), 4);
    assert_eq!(visits.state_visits(state), 4);
    assert_eq!(visits.total(), 4);
}

#[test]
fn sample_average_refuses_sentinel_entries() {
    let mut table = ValueTable::new(0.0);
    let mut visits = VisitTable::new();
    let state = hard_sixteen();
    assert_eq!(
        table.sample_average(&mut visits, state, Action::Split, 1.0),
        Err(TableError::IllegalEntry {
            state,
            action: Action::Split
        })
    );
    assert_eq!(table.get(state, Action::Split).unwrap(), ILLEGAL);
    assert_eq!(visits.total(), 0);
}

#[test]
fn dense_form_checks_shape_and_mask() {
    let mut table = ValueTable::new(0.0);
    let mut visits = VisitTable::new();
    table
        .sample_average(&mut visits, pair_of_eights(), Action::Split, 2.0)
        .unwrap();
    assert_eq!(
        ValueTable::from_dense(table.as_dense().to_vec()).unwrap(),
        table
    );

    assert_eq!(
        ValueTable::from_dense(vec![0.0; 3]),
        Err(TableError::ShapeMismatch {
            expected: NUM_STATES * NUM_ACTIONS,
            found: 3
        })
    );

    let mut values = table.as_dense().to_vec();
    let flat = hard_sixteen() * NUM_ACTIONS + Action::Split.index();
    values[flat] = 0.0;
    assert_eq!(
        ValueTable::from_dense(values),
        Err(TableError::MaskMismatch(flat))
    );
}

#[test]
fn best_action_breaks_ties_low() {
    let table = ValueTable::new(0.0);
    assert_eq!(table.best_action(pair_of_eights()), Ok(Action::Hit));
    assert_eq!(
        table.best_action(NUM_STATES),
        Err(TableError::IndexOutOfRange(NUM_STATES))
    );
}

#[test]
fn first_visit_keeps_first_return() {
    let mut visits = FirstVisits::new();
    assert!(visits.assign(12, 1.0));
    assert!(visits.assign(4, -1.0));
    assert!(!visits.assign(12, 2.0));
    assert_eq!(visits.get(12), Some(1.0));
    assert_eq!(visits.len(), 2);
    assert_eq!(visits.iter().collect::<Vec<_>>(), vec![(12, 1.0), (4, -1.0)]);

    visits.clear();
    assert!(visits.is_empty());
    assert!(visits.assign(12, 3.0));
    assert_eq!(visits.iter().collect::<Vec<_>>(), vec![(12, 3.0)]);
}

#[test]
fn split_waits_for_both_branches() {
    let mut stack = SplitStack::new();
    let mut visits = FirstVisits::new();
    stack.push_split(7);
    stack.complete(1.0, &mut visits).unwrap();
    assert_eq!(visits.get(7), None);
    assert_eq!(stack.entries(), &[Pending::Split(7), Pending::Partial(1.0)]);
    stack.complete(-2.0, &mut visits).unwrap();
    assert_eq!(visits.get(7), Some(-1.0));
    assert!(stack.is_empty());
}

#[test]
fn nested_splits_propagate_upward() {
    let mut stack = SplitStack::new();
    let mut visits = FirstVisits::new();
    stack.push_split(1);
    stack.push_split(2);
    stack.complete(1.0, &mut visits).unwrap();
    stack.complete(1.0, &mut visits).unwrap();
    assert_eq!(visits.get(2), Some(2.0));
    assert_eq!(visits.get(1), None);
    stack.complete(-1.0, &mut visits).unwrap();
    assert_eq!(visits.get(1), Some(1.0));
    assert!(stack.is_empty());
}

#[test]
fn completing_without_a_split_is_a_no_op() {
    let mut stack = SplitStack::new();
    let mut visits = FirstVisits::new();
    stack.complete(1.5, &mut visits).unwrap();
    assert!(visits.is_empty());
    assert!(stack.is_empty());
}

#[test]
fn cleared_stack_forgets_open_splits() {
    let mut stack = SplitStack::new();
    let mut visits = FirstVisits::new();
    stack.push_split(3);
    stack.complete(1.0, &mut visits).unwrap();
    stack.clear();
    assert!(stack.is_empty());
    stack.complete(2.0, &mut visits).unwrap();
    assert!(visits.is_empty());
}
