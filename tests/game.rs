//! Simulator integration tests.

#![allow(clippy::float_cmp)]

use bjrl::{
    Action, ActionError, Card, DealerHand, Game, GameState, Greedy, Hand, HandOutcome, HandType,
    Policy, Settlement, StackedDeck, State, TableError, ValueTable, VisitTable, game,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Splits every pair it may and stands on everything else.
struct SplitThenStand;

impl Policy for SplitThenStand {
    fn choose(
        &mut self,
        state: State,
        _table: &ValueTable,
        _visits: &VisitTable,
        _rng: &mut ChaCha8Rng,
    ) -> Result<Action, TableError> {
        Ok(if state.can_split() {
            Action::Split
        } else {
            Action::Stand
        })
    }
}

/// Hits the first decision and stands on every later one.
struct HitOnce(bool);

impl Policy for HitOnce {
    fn choose(
        &mut self,
        _state: State,
        _table: &ValueTable,
        _visits: &VisitTable,
        _rng: &mut ChaCha8Rng,
    ) -> Result<Action, TableError> {
        let hit = !self.0;
        self.0 = true;
        Ok(if hit { Action::Hit } else { Action::Stand })
    }
}

fn stacked(cards: &[Card]) -> Game<StackedDeck> {
    Game::new(StackedDeck::new(cards.to_vec(), Card::Ten))
}

fn eights_against_seventeen() -> Game<StackedDeck> {
    // Deal order is player, dealer, player, dealer.
    stacked(&[Card::Eight, Card::Ten, Card::Eight, Card::Seven])
}

fn hard_eighteen() -> usize {
    State::new(HandType::Hard, 18, 10, true, false)
        .unwrap()
        .encode()
}

fn pair_of_eights() -> usize {
    State::new(HandType::Pair, 8, 10, true, true)
        .unwrap()
        .encode()
}

#[test]
fn hand_values_and_types() {
    assert_eq!(Hand::from_cards(&[Card::Ace, Card::Ace, Card::Nine]).value(), 21);
    assert_eq!(Hand::from_cards(&[Card::Eight, Card::Eight]).hand_type(), HandType::Pair);
    assert_eq!(Hand::from_cards(&[Card::Ace, Card::Six]).hand_type(), HandType::Soft);
    assert_eq!(Hand::from_cards(&[Card::Ten, Card::Three]).hand_type(), HandType::Hard);
    assert_eq!(Hand::from_cards(&[Card::King, Card::Queen]).hand_type(), HandType::Hard);
}

#[test]
fn payout_table() {
    let reward = |player: &[Card], dealer: &[Card]| {
        game::settle(&Hand::from_cards(player), &DealerHand::from_cards(dealer)).reward
    };
    assert_eq!(reward(&[Card::Ace, Card::King], &[Card::Ten, Card::Nine]), 1.5);
    assert_eq!(reward(&[Card::Ace, Card::King], &[Card::Ace, Card::Jack]), 0.0);
    assert_eq!(
        reward(&[Card::Ten, Card::Six, Card::Nine], &[Card::Ten, Card::Six, Card::Nine]),
        -1.0
    );
    assert_eq!(reward(&[Card::Ten, Card::Two], &[Card::Ten, Card::Six, Card::Six]), 1.0);
    assert_eq!(reward(&[Card::Ten, Card::Nine], &[Card::Ten, Card::Eight]), 1.0);
}

#[test]
fn natural_pays_one_and_a_half_through_the_game() {
    let mut game = stacked(&[Card::Ace, Card::Ten, Card::King, Card::Nine]);
    game.deal();
    let state = game.current_state().unwrap();
    assert_eq!(state.hand_type(), HandType::Soft);
    assert_eq!(state.value(), 21);

    let step = game.step(Action::Stand).unwrap();
    assert_eq!(step.settled, Settlement::Hand(1.5));
    assert!(step.terminated);
    assert_eq!(game.results()[0].outcome, HandOutcome::Blackjack);
}

#[test]
fn split_plays_the_first_sub_hand_first() {
    let mut game = eights_against_seventeen();
    game.deal();
    assert_eq!(game.current_state().unwrap().encode(), pair_of_eights());

    let split = game.step(Action::Split).unwrap();
    assert_eq!(split.reward, 0.0);
    assert_eq!(split.settled, Settlement::Open);
    assert_eq!(split.next_state.map(|s| s.encode()), Some(hard_eighteen()));
    assert_eq!(split.split_state.map(|s| s.encode()), Some(hard_eighteen()));
    assert_eq!(game.hands().len(), 2);

    let first = game.step(Action::Stand).unwrap();
    assert_eq!(first.settled, Settlement::Hand(1.0));
    assert!(!first.terminated);
    assert_eq!(game.state(), GameState::PlayerTurn);

    let second = game.step(Action::Stand).unwrap();
    assert_eq!(second.settled, Settlement::Hand(1.0));
    assert!(second.terminated);
    assert!(game.is_over());
    assert_eq!(game.dealer_hand().value(), 17);
}

#[test]
fn dealer_draws_before_the_second_sub_hand_settles() {
    // Eights against 16: both sub-hands draw a ten at the split, then the
    // dealer plays out on the first settlement and takes the five.
    let mut game = stacked(&[
        Card::Eight,
        Card::Ten,
        Card::Eight,
        Card::Six,
        Card::Ten,
        Card::Ten,
        Card::Five,
    ]);
    game.deal();
    game.step(Action::Split).unwrap();
    assert_eq!(game.dealer_hand().len(), 2);

    let first = game.step(Action::Stand).unwrap();
    assert_eq!(first.settled, Settlement::Hand(-1.0));
    assert_eq!(game.hands().len(), 1);
    assert_eq!(game.dealer_hand().len(), 3);
    assert_eq!(game.dealer_hand().value(), 21);

    // The second sub-hand now draws from the fallback, after the dealer.
    let second = game.step(Action::Hit).unwrap();
    assert_eq!(second.settled, Settlement::Hand(-1.0));
    assert!(second.terminated);
    assert_eq!(game.dealer_hand().len(), 3);
}

#[test]
fn split_aces_settle_at_once() {
    let mut game = stacked(&[Card::Ace, Card::Ten, Card::Ace, Card::Seven]);
    game.deal();
    let step = game.step(Action::Split).unwrap();
    // Ace and ten after a split is 21 but not a natural.
    assert_eq!(step.settled, Settlement::AcePair(1.0, 1.0));
    assert_eq!(step.reward, 2.0);
    assert!(step.terminated);
    assert_eq!(step.next_state, None);
    assert!(game
        .results()
        .iter()
        .all(|result| result.outcome == HandOutcome::Win));
}

#[test]
fn illegal_actions_are_rejected() {
    let mut game = stacked(&[Card::Ten, Card::Ten, Card::Six, Card::Seven, Card::Two]);
    assert_eq!(game.step(Action::Hit), Err(ActionError::InvalidState));

    game.deal();
    assert_eq!(game.step(Action::Split), Err(ActionError::CannotSplit));
    game.step(Action::Hit).unwrap();
    assert_eq!(game.step(Action::DoubleDown), Err(ActionError::CannotDouble));
    assert!(game.step(Action::Stand).unwrap().terminated);
    assert_eq!(game.step(Action::Stand), Err(ActionError::InvalidState));
}

#[test]
fn doubling_draws_one_card_and_settles() {
    let mut game = stacked(&[Card::Five, Card::Ten, Card::Six, Card::Seven]);
    game.deal();
    let step = game.step(Action::DoubleDown).unwrap();
    assert_eq!(step.settled, Settlement::Hand(2.0));
    assert!(step.terminated);
    assert_eq!(game.results()[0].bet, 2);
}

#[test]
fn round_credits_splits_with_both_branches() {
    let mut game = eights_against_seventeen();
    let table = ValueTable::new(0.0);
    let visits = VisitTable::new();
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let outcome = game
        .play_round(&mut SplitThenStand, &table, &visits, &mut rng)
        .unwrap();
    assert_eq!(outcome.total, 2.0);
    assert_eq!(outcome.hands.len(), 2);

    let stand = hard_eighteen() * 4 + Action::Stand.index();
    let split = pair_of_eights() * 4 + Action::Split.index();
    assert_eq!(outcome.first_visits.get(stand), Some(1.0));
    assert_eq!(outcome.first_visits.get(split), Some(2.0));
    assert_eq!(outcome.first_visits.len(), 2);
}

#[test]
fn round_plays_every_hand_before_the_dealer() {
    // Player 10,6 hits a five; dealer 10,6 must then draw the fallback ten.
    let mut game = stacked(&[Card::Ten, Card::Ten, Card::Six, Card::Six, Card::Five]);
    let outcome = game
        .play_round(
            &mut HitOnce(false),
            &ValueTable::new(0.0),
            &VisitTable::new(),
            &mut ChaCha8Rng::seed_from_u64(0),
        )
        .unwrap();
    assert_eq!(outcome.hands[0].player_value, 21);
    assert_eq!(outcome.hands[0].dealer_value, 26);
    assert_eq!(outcome.total, 1.0);
    assert_eq!(game.state(), GameState::RoundOver);
}

#[test]
fn greedy_rounds_are_reproducible() {
    let table = ValueTable::new(0.0);
    let visits = VisitTable::new();
    let play = || {
        let mut game = Game::seeded(5);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        (0..500)
            .map(|_| {
                game.play_round(&mut Greedy, &table, &visits, &mut rng)
                    .unwrap()
                    .total
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(play(), play());
}
