use bigtwo_app::config::{EngineConfig, OpeningConfig, OpeningRule};
use bigtwo_app::controller::{EnginePhase, GameController, InvalidDeal, InvalidPlay};
use bigtwo_app::event::{GameEvent, Rejection};
use bigtwo_bot::{Policy, PolicyContext};
use bigtwo_core::combo::{ComboError, HandType};
use bigtwo_core::model::card::{Card, parse_cards};
use bigtwo_core::model::hand::Hand;
use bigtwo_core::model::player::Seat;
use std::sync::mpsc::Receiver;

fn cards(text: &str) -> Vec<Card> {
    parse_cards(text).unwrap()
}

fn hands(north: &str, east: &str, south: &str, west: &str) -> [Hand; 4] {
    [north, east, south, west].map(|text| Hand::with_cards(cards(text)))
}

fn controller(human_seats: Vec<usize>) -> (GameController, Receiver<GameEvent>) {
    let mut controller = GameController::new(EngineConfig {
        seed: Some(1),
        human_seats,
        ..EngineConfig::default()
    });
    let events = controller.subscribe();
    (controller, events)
}

fn drain(events: &Receiver<GameEvent>) -> Vec<GameEvent> {
    events.try_iter().collect()
}

#[test]
fn three_passes_after_a_single_king_clear_the_table() {
    let (mut game, events) = controller(vec![0, 1, 2, 3]);
    game.start_round_with_hands(hands("KS 3D 4D", "5D 6D", "7D 8D", "9D 10D")).unwrap();
    drain(&events);

    game.submit_play(&cards("KS")).unwrap();
    assert_eq!(game.last_played(), cards("KS").as_slice());
    assert_eq!(game.last_player(), Some(Seat::North));

    game.submit_play(&[]).unwrap();
    game.submit_play(&[]).unwrap();
    assert_eq!(game.pass_count(), 2);
    assert_eq!(game.last_played(), cards("KS").as_slice());

    game.submit_play(&[]).unwrap();
    assert!(game.last_played().is_empty());
    assert_eq!(game.last_player(), None);
    assert_eq!(game.pass_count(), 0);
    assert_eq!(game.current_turn(), Seat::North);

    let cleared: Vec<(Seat, bool)> = drain(&events)
        .into_iter()
        .filter_map(|event| match event {
            GameEvent::InvalidPlay {
                seat,
                reason: Rejection::Pass,
                table_cleared,
            } => Some((seat, table_cleared)),
            _ => None,
        })
        .collect();
    assert_eq!(
        cleared,
        vec![
            (Seat::East, false),
            (Seat::South, false),
            (Seat::West, true)
        ]
    );
}

#[test]
fn rejected_play_keeps_the_turn_and_counts_as_a_pass() {
    let (mut game, events) = controller(vec![0]);
    game.start_round_with_hands(hands("3D 3S 9C", "4D 5D 6D", "4C 5C", "4H 5H")).unwrap();
    drain(&events);

    let err = game.submit_play(&cards("3D 9C")).unwrap_err();
    assert_eq!(err, InvalidPlay::IllegalShape(ComboError::NotASet));
    assert_eq!(game.current_turn(), Seat::North);
    assert_eq!(game.pass_count(), 1);
    assert_eq!(game.hand(Seat::North).len(), 3);
    assert_eq!(
        drain(&events),
        vec![GameEvent::InvalidPlay {
            seat: Seat::North,
            reason: Rejection::IllegalShape,
            table_cleared: false,
        }]
    );

    // nobody can beat the nine of clubs, so the table comes back open
    game.submit_play(&cards("9C")).unwrap();
    assert_eq!(game.current_turn(), Seat::North);
    assert!(game.last_played().is_empty());
    assert_eq!(game.hand(Seat::North), &Hand::with_cards(cards("3D 3S")));

    let kinds: Vec<&str> = drain(&events).iter().map(GameEvent::kind).collect();
    assert_eq!(
        kinds,
        vec![
            "cards_played",
            "turn_started",
            "invalid_play",
            "turn_started",
            "invalid_play",
            "turn_started",
            "invalid_play",
            "turn_started",
        ]
    );
}

#[test]
fn unheld_and_duplicate_cards_are_refused() {
    let (mut game, _events) = controller(vec![0]);
    game.start_round_with_hands(hands("3D 9C", "4D", "4C", "4H")).unwrap();

    assert_eq!(
        game.submit_play(&cards("KH")),
        Err(InvalidPlay::CardNotInHand(cards("KH")[0]))
    );
    assert_eq!(
        game.submit_play(&cards("9C 9C")),
        Err(InvalidPlay::DuplicateCard(cards("9C")[0]))
    );
    assert_eq!(game.pass_count(), 2);
    assert_eq!(game.hand(Seat::North).len(), 2);
}

#[test]
fn wrong_size_and_weaker_plays_count_toward_clearing() {
    let (mut game, events) = controller(vec![0, 1, 2, 3]);
    game.start_round_with_hands(hands("9C 3S", "4D 4S 5D", "6C", "7C")).unwrap();
    game.submit_play(&cards("9C")).unwrap();
    drain(&events);

    assert_eq!(
        game.submit_play(&cards("4D 4S")),
        Err(InvalidPlay::SizeMismatch {
            expected: 1,
            actual: 2
        })
    );
    assert_eq!(game.submit_play(&cards("4D")), Err(InvalidPlay::DoesNotBeat));
    assert_eq!(game.current_turn(), Seat::East);
    assert_eq!(game.pass_count(), 2);

    // a third failure clears the table and leaves East to lead
    assert!(game.submit_play(&cards("5D")).is_err());
    assert_eq!(game.current_turn(), Seat::East);
    assert!(game.last_played().is_empty());
    let last = drain(&events).pop().unwrap();
    assert_eq!(
        last,
        GameEvent::InvalidPlay {
            seat: Seat::East,
            reason: Rejection::DoesNotBeat,
            table_cleared: true,
        }
    );

    game.submit_play(&cards("4D 4S")).unwrap();
    assert_eq!(game.current_turn(), Seat::South);
}

#[test]
fn emptying_a_hand_ends_the_round_and_settles_scores() {
    let (mut game, events) = controller(vec![0, 1, 2, 3]);
    let deal = hands(
        "3D",
        "2S 4D 5D 6D 7D 8D 9D 10D JD",
        "4C 5C 6C 7C 8C 9C 10C",
        "4H 5H 6H 7H 8H 9H 10H JH QH KH",
    );
    game.start_round_with_hands(deal).unwrap();
    drain(&events);

    game.submit_play(&cards("3D")).unwrap();
    assert_eq!(game.phase(), EnginePhase::Ended);
    assert!(!game.is_running());

    let result = *game.result().unwrap();
    assert_eq!(result.winner, Seat::North);
    assert_eq!(result.base_scores, [0, 36, 7, 30]);
    assert_eq!(result.final_scores, [73, -71, 45, -47]);
    assert_eq!(result.final_scores.iter().sum::<i32>(), 0);

    let events = drain(&events);
    assert!(matches!(
        events.last(),
        Some(GameEvent::RoundEnded { winner: Seat::North, .. })
    ));
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, GameEvent::TurnStarted { .. }))
    );

    assert_eq!(game.submit_play(&[]), Err(InvalidPlay::NotRunning));
    assert_eq!(game.phase(), EnginePhase::Ended);
}

#[test]
fn computer_seats_play_inside_start_round() {
    let mut game = GameController::new(EngineConfig {
        seed: Some(1),
        opening: OpeningConfig {
            rule: OpeningRule::ThreeOfDiamonds,
            seat: 0,
        },
        ..EngineConfig::default()
    });
    let events = game.subscribe();
    game.start_round_with_hands(hands("KH", "3D 9S", "4C", "5C")).unwrap();

    // East leads the three, South follows with its last card
    assert_eq!(game.phase(), EnginePhase::Ended);
    let result = game.result().copied().unwrap();
    assert_eq!(result.winner, Seat::South);
    assert_eq!(result.final_scores, [-1, -1, 3, -1]);

    let played: Vec<(Seat, Vec<Card>, HandType)> = drain(&events)
        .into_iter()
        .filter_map(|event| match event {
            GameEvent::CardsPlayed {
                seat, cards, combo, ..
            } => Some((seat, cards, combo.hand_type)),
            _ => None,
        })
        .collect();
    assert_eq!(
        played,
        vec![
            (Seat::East, cards("3D"), HandType::Single),
            (Seat::South, cards("4C"), HandType::Single),
        ]
    );
}

#[test]
fn turn_started_is_reported_for_every_seat() {
    let (mut game, events) = controller(vec![0]);
    game.start_round_with_hands(hands("3D 4S", "AD AC", "AH 6C", "AS 7C")).unwrap();
    game.submit_play(&cards("3D")).unwrap();

    let seats: Vec<Seat> = drain(&events)
        .into_iter()
        .filter_map(|event| match event {
            GameEvent::TurnStarted { seat, .. } => Some(seat),
            _ => None,
        })
        .collect();
    assert_eq!(seats[0], Seat::North);
    assert!(seats.contains(&Seat::East));
    assert!(seats.contains(&Seat::South));
    assert!(seats.contains(&Seat::West));
}

struct CheatingPolicy;

impl Policy for CheatingPolicy {
    fn choose_play(&mut self, _ctx: &PolicyContext) -> Vec<Card> {
        parse_cards("2S").unwrap()
    }
}

#[test]
fn illegal_policy_choice_is_treated_as_a_pass() {
    let (mut game, events) = controller(vec![0]);
    game.set_policy(Seat::East, Box::new(CheatingPolicy));
    game.start_round_with_hands(hands("3D 4S", "5D 6D", "4C 5C", "4H 5H")).unwrap();
    drain(&events);

    game.submit_play(&cards("3D")).unwrap();
    assert_eq!(game.hand(Seat::East).len(), 2);
    let first_reply = drain(&events)
        .into_iter()
        .find(|event| event.seat() == Some(Seat::East) && event.kind() != "turn_started");
    assert_eq!(
        first_reply,
        Some(GameEvent::InvalidPlay {
            seat: Seat::East,
            reason: Rejection::Pass,
            table_cleared: false,
        })
    );
}

#[test]
fn out_of_turn_submission_is_refused_without_side_effects() {
    let (mut game, _events) = controller(vec![0, 1, 2, 3]);
    game.start_round_with_hands(hands("3D", "4D", "5D", "6D")).unwrap();
    assert_eq!(
        game.submit_play_as(Seat::South, &cards("5D")),
        Err(InvalidPlay::OutOfTurn {
            expected: Seat::North,
            actual: Seat::South
        })
    );
    assert_eq!(game.pass_count(), 0);
    assert_eq!(game.hand(Seat::South).len(), 1);
}

#[test]
fn deal_with_an_empty_hand_is_refused_before_anything_starts() {
    let (mut game, events) = controller(Vec::new());
    let deal = [
        Hand::new(),
        Hand::with_cards(cards("4D")),
        Hand::with_cards(cards("5D")),
        Hand::with_cards(cards("6D")),
    ];
    assert_eq!(
        game.start_round_with_hands(deal),
        Err(InvalidDeal::EmptyHand(Seat::North))
    );
    assert_eq!(game.phase(), EnginePhase::NotStarted);
    assert_eq!(game.round_number(), 0);
    assert!(drain(&events).is_empty());
}

#[test]
fn card_dealt_to_two_seats_is_refused() {
    let (mut game, _events) = controller(Vec::new());
    assert_eq!(
        game.start_round_with_hands(hands("3D", "3D", "3D", "3D")),
        Err(InvalidDeal::DuplicateCard(cards("3D")[0]))
    );
    assert_eq!(
        game.start_round_with_hands(hands("3D 4D", "5D", "6D 4D", "7D")),
        Err(InvalidDeal::DuplicateCard(cards("4D")[0]))
    );
    assert_eq!(game.phase(), EnginePhase::NotStarted);
}

#[test]
fn card_repeated_within_one_hand_is_refused() {
    let (mut game, _events) = controller(vec![0]);
    assert_eq!(
        game.start_round_with_hands(hands("3D", "9S 9S", "4C", "5C")),
        Err(InvalidDeal::DuplicateCard(cards("9S")[0]))
    );
}

#[test]
fn hand_larger_than_thirteen_is_refused() {
    let (mut game, _events) = controller(vec![0]);
    let deal = hands(
        "AD 2D 3D 4D 5D 6D 7D 8D 9D 10D JD QD KD AC",
        "2C",
        "3C",
        "4C",
    );
    assert_eq!(
        game.start_round_with_hands(deal),
        Err(InvalidDeal::TooManyCards {
            seat: Seat::North,
            count: 14
        })
    );
}

#[test]
fn refused_deal_leaves_the_running_round_alone() {
    let (mut game, events) = controller(vec![0, 1, 2, 3]);
    game.start_round_with_hands(hands("3D 4D", "5D", "6D", "7D")).unwrap();
    game.submit_play(&cards("3D")).unwrap();
    drain(&events);

    assert!(game.start_round_with_hands(hands("8D", "", "9D", "10D")).is_err());
    assert_eq!(game.round_number(), 1);
    assert_eq!(game.current_turn(), Seat::East);
    assert_eq!(game.last_played(), cards("3D").as_slice());
    assert_eq!(game.hand(Seat::North).len(), 1);
    assert!(drain(&events).is_empty());
}
