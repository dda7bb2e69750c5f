use crate::config::{EngineConfig, OpeningRule};
use crate::event::{EventBus, GameEvent, PlayerSummary, Rejection};
use bigtwo_bot::{CheapestBeatPolicy, Policy, PolicyContext};
use bigtwo_core::combo::{ComboError, HandResult, classify, compare};
use bigtwo_core::model::card::{Card, format_cards};
use bigtwo_core::model::deck::{Deck, HAND_SIZE};
use bigtwo_core::model::hand::Hand;
use bigtwo_core::model::player::{Controller, Player, Seat};
use bigtwo_core::model::score::GameResult;
use core::cmp::Ordering;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::mpsc::Receiver;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Consecutive passes that clear the table.
pub const PASSES_TO_CLEAR: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnginePhase {
    NotStarted,
    Running,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidPlay {
    #[error("no round is running")]
    NotRunning,
    #[error("{0} is not controlled by a human")]
    NotHumanTurn(Seat),
    #[error("it is {expected}'s turn, not {actual}'s")]
    OutOfTurn { expected: Seat, actual: Seat },
    #[error("{0} is not in hand")]
    CardNotInHand(Card),
    #[error("{0} was submitted more than once")]
    DuplicateCard(Card),
    #[error("illegal combination: {0}")]
    IllegalShape(#[from] ComboError),
    #[error("the table holds {expected} cards but {actual} were played")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("play does not beat the table")]
    DoesNotBeat,
}

/// Why a prepared deal was refused by [`GameController::start_round_with_hands`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidDeal {
    #[error("{0} was dealt no cards")]
    EmptyHand(Seat),
    #[error("{seat} was dealt {count} cards, more than a full hand")]
    TooManyCards { seat: Seat, count: usize },
    #[error("{0} appears more than once in the deal")]
    DuplicateCard(Card),
}

impl InvalidPlay {
    pub fn rejection(self) -> Rejection {
        match self {
            InvalidPlay::CardNotInHand(_) | InvalidPlay::DuplicateCard(_) => Rejection::NotHeld,
            InvalidPlay::IllegalShape(_) => Rejection::IllegalShape,
            InvalidPlay::SizeMismatch { .. } => Rejection::WrongSize,
            InvalidPlay::DoesNotBeat => Rejection::DoesNotBeat,
            InvalidPlay::NotRunning
            | InvalidPlay::NotHumanTurn(_)
            | InvalidPlay::OutOfTurn { .. } => Rejection::Pass,
        }
    }
}

/// Owns one table of four players and runs rounds to completion.
///
/// Computer seats are played synchronously inside [`start_round`] and
/// [`submit_play`]; control returns to the caller only when a human seat must
/// act or the round has ended. Every state change is reported on the event
/// bus in the order it happened.
///
/// [`start_round`]: GameController::start_round
/// [`submit_play`]: GameController::submit_play
pub struct GameController {
    config: EngineConfig,
    players: [Player; 4],
    policies: [Option<Box<dyn Policy>>; 4],
    phase: EnginePhase,
    turn: Seat,
    last_played: Vec<Card>,
    last_player: Option<Seat>,
    passes: u8,
    turns: u32,
    round_number: u32,
    result: Option<GameResult>,
    rng: StdRng,
    events: EventBus,
}

impl GameController {
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let names = config.names();
        let controllers = config.controllers();
        let players = Seat::LOOP.map(|seat| {
            Player::new(names[seat.index()].clone(), seat, controllers[seat.index()])
        });
        let policies = controllers.map(|controller| match controller {
            Controller::Computer => Some(Box::new(CheapestBeatPolicy::new()) as Box<dyn Policy>),
            Controller::Human => None,
        });
        Self {
            config,
            players,
            policies,
            phase: EnginePhase::NotStarted,
            turn: Seat::North,
            last_played: Vec::new(),
            last_player: None,
            passes: 0,
            turns: 0,
            round_number: 0,
            result: None,
            rng,
            events: EventBus::new(),
        }
    }

    pub fn new_with_seed(seed: Option<u64>) -> Self {
        Self::new(EngineConfig {
            seed,
            ..EngineConfig::default()
        })
    }

    /// Replace the decision policy of a computer seat. Ignored for human seats.
    pub fn set_policy(&mut self, seat: Seat, policy: Box<dyn Policy>) {
        if self.players[seat.index()].is_human() {
            warn!(
                target: "bigtwo_app::controller",
                %seat,
                policy = policy.name(),
                "ignoring policy for human seat"
            );
            return;
        }
        self.policies[seat.index()] = Some(policy);
    }

    pub fn subscribe(&mut self) -> Receiver<GameEvent> {
        self.events.subscribe()
    }

    pub fn attach_relay(&mut self) -> Receiver<GameEvent> {
        self.events.attach_relay()
    }

    /// Deal a fresh round and play computer seats until a human must act.
    /// Calling this while a round is running abandons it.
    pub fn start_round(&mut self) {
        let deck = Deck::shuffled(&mut self.rng);
        self.begin_round(deck.deal());
    }

    /// Start a round from a prepared deal, e.g. a replayed or constructed one.
    ///
    /// Hands may be short, but each must hold between one and thirteen cards
    /// and no card may appear twice anywhere in the deal. A refused deal
    /// leaves the controller as it was.
    pub fn start_round_with_hands(&mut self, hands: [Hand; 4]) -> Result<(), InvalidDeal> {
        check_deal(&hands)?;
        self.begin_round(hands);
        Ok(())
    }

    fn begin_round(&mut self, hands: [Hand; 4]) {
        for (player, hand) in self.players.iter_mut().zip(hands) {
            player.receive(hand);
        }

        self.last_played.clear();
        self.last_player = None;
        self.passes = 0;
        self.turns = 0;
        self.result = None;
        self.round_number += 1;
        self.phase = EnginePhase::Running;
        self.turn = self.opening_seat();

        info!(
            target: "bigtwo_app::controller",
            round = self.round_number,
            opening = %self.turn,
            "round started"
        );
        let players = self
            .players
            .iter()
            .map(|p| PlayerSummary {
                seat: p.seat(),
                name: p.name().to_string(),
                controller: p.controller(),
                hand_size: p.hand_size(),
            })
            .collect();
        self.events.emit(GameEvent::RoundStarted {
            round: self.round_number,
            players,
        });

        self.drive();
    }

    /// Submit cards for the human seat whose turn it is. An empty selection
    /// passes. A rejected selection still counts toward the pass counter and
    /// leaves the turn with the same seat.
    pub fn submit_play(&mut self, cards: &[Card]) -> Result<(), InvalidPlay> {
        if self.phase != EnginePhase::Running {
            return Err(InvalidPlay::NotRunning);
        }
        let seat = self.turn;
        if !self.players[seat.index()].is_human() {
            return Err(InvalidPlay::NotHumanTurn(seat));
        }

        if cards.is_empty() {
            debug!(target: "bigtwo_app::controller", %seat, "human passed");
            self.record_pass(seat, Rejection::Pass);
            self.advance();
            return Ok(());
        }

        match self.validate(seat, cards) {
            Ok((play, combo)) => {
                self.apply_play(seat, play, combo);
                if self.phase == EnginePhase::Running {
                    self.advance();
                }
                Ok(())
            }
            Err(reason) => {
                info!(
                    target: "bigtwo_app::controller",
                    %seat,
                    cards = %format_cards(cards),
                    %reason,
                    "rejected play"
                );
                self.record_pass(seat, reason.rejection());
                Err(reason)
            }
        }
    }

    /// Like [`submit_play`](Self::submit_play), but only when `seat` is the
    /// seat to act. Used by callers that speak for a specific seat.
    pub fn submit_play_as(&mut self, seat: Seat, cards: &[Card]) -> Result<(), InvalidPlay> {
        if self.phase == EnginePhase::Running && self.turn != seat {
            return Err(InvalidPlay::OutOfTurn {
                expected: self.turn,
                actual: seat,
            });
        }
        self.submit_play(cards)
    }

    /// What the built-in policy would play for the seat to act.
    pub fn suggest_play(&self) -> Vec<Card> {
        bigtwo_bot::decide(self.players[self.turn.index()].hand().cards(), &self.last_played)
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        self.players[seat.index()].hand()
    }

    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat.index()]
    }

    pub fn players(&self) -> &[Player; 4] {
        &self.players
    }

    pub fn names(&self) -> [String; 4] {
        self.players.each_ref().map(|p| p.name().to_string())
    }

    pub fn last_played(&self) -> &[Card] {
        &self.last_played
    }

    pub fn last_player(&self) -> Option<Seat> {
        self.last_player
    }

    pub fn current_turn(&self) -> Seat {
        self.turn
    }

    pub fn is_running(&self) -> bool {
        self.phase == EnginePhase::Running
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn pass_count(&self) -> u8 {
        self.passes
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn seed(&self) -> Option<u64> {
        self.config.seed
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn opening_seat(&self) -> Seat {
        match self.config.opening.rule {
            OpeningRule::FixedSeat => self.config.opening.fixed_seat(),
            OpeningRule::ThreeOfDiamonds => self
                .players
                .iter()
                .find(|p| p.has_card(Card::THREE_OF_DIAMONDS))
                .map(Player::seat)
                .unwrap_or(Seat::North),
        }
    }

    fn advance(&mut self) {
        self.turn = self.turn.next();
        self.drive();
    }

    /// Announce the current turn and play it if a computer holds the seat,
    /// repeating until a human must act or the round ends.
    fn drive(&mut self) {
        while self.phase == EnginePhase::Running {
            let seat = self.turn;
            self.turns += 1;
            self.events.emit(GameEvent::TurnStarted {
                seat,
                open_table: self.last_played.is_empty(),
            });
            if self.players[seat.index()].is_human() {
                return;
            }
            self.computer_turn(seat);
            if self.phase == EnginePhase::Running {
                self.turn = seat.next();
            }
        }
    }

    fn computer_turn(&mut self, seat: Seat) {
        let choice = match self.policies[seat.index()].as_mut() {
            Some(policy) => {
                let ctx = PolicyContext {
                    seat,
                    hand: self.players[seat.index()].hand(),
                    previous: &self.last_played,
                    passes: self.passes,
                };
                policy.choose_play(&ctx)
            }
            None => {
                warn!(target: "bigtwo_app::controller", %seat, "no policy for computer seat");
                Vec::new()
            }
        };

        if choice.is_empty() {
            self.record_pass(seat, Rejection::Pass);
            return;
        }

        match self.validate(seat, &choice) {
            Ok((play, combo)) => self.apply_play(seat, play, combo),
            Err(reason) => {
                warn!(
                    target: "bigtwo_app::controller",
                    %seat,
                    cards = %format_cards(&choice),
                    %reason,
                    "policy chose an illegal play; passing"
                );
                self.record_pass(seat, Rejection::Pass);
            }
        }
    }

    fn validate(&self, seat: Seat, cards: &[Card]) -> Result<(Vec<Card>, HandResult), InvalidPlay> {
        let mut play = cards.to_vec();
        play.sort();
        if let Some(pair) = play.windows(2).find(|w| w[0] == w[1]) {
            return Err(InvalidPlay::DuplicateCard(pair[0]));
        }

        let player = &self.players[seat.index()];
        if let Some(missing) = play.iter().find(|card| !player.has_card(**card)) {
            return Err(InvalidPlay::CardNotInHand(*missing));
        }

        let combo = classify(&play)?;
        if self.last_played.is_empty() {
            return Ok((play, combo));
        }

        if play.len() != self.last_played.len() {
            return Err(InvalidPlay::SizeMismatch {
                expected: self.last_played.len(),
                actual: play.len(),
            });
        }
        match compare(&play, &self.last_played)? {
            Ordering::Greater => Ok((play, combo)),
            _ => Err(InvalidPlay::DoesNotBeat),
        }
    }

    fn apply_play(&mut self, seat: Seat, play: Vec<Card>, combo: HandResult) {
        let player = &mut self.players[seat.index()];
        if !player.play_cards(&play) {
            // validated against this hand a moment ago
            warn!(target: "bigtwo_app::controller", %seat, "validated cards vanished from hand");
            return;
        }
        let remaining = player.hand_size();

        debug!(
            target: "bigtwo_app::controller",
            %seat,
            cards = %format_cards(&play),
            combo = combo.hand_type.as_str(),
            remaining,
            "cards played"
        );

        self.last_played = play.clone();
        self.last_player = Some(seat);
        self.passes = 0;
        self.events.emit(GameEvent::CardsPlayed {
            seat,
            cards: play,
            combo,
            remaining,
        });

        if remaining == 0 {
            self.finish_round(seat);
        }
    }

    fn record_pass(&mut self, seat: Seat, reason: Rejection) {
        self.passes += 1;
        let table_cleared = self.passes >= PASSES_TO_CLEAR;
        if table_cleared {
            debug!(target: "bigtwo_app::controller", %seat, "table cleared");
            self.last_played.clear();
            self.last_player = None;
            self.passes = 0;
        }
        self.events.emit(GameEvent::InvalidPlay {
            seat,
            reason,
            table_cleared,
        });
    }

    fn finish_round(&mut self, winner: Seat) {
        let hands = self.players.each_ref().map(Player::hand);
        let result = GameResult::settle(winner, hands);
        self.phase = EnginePhase::Ended;
        self.result = Some(result);

        info!(
            target: "bigtwo_app::controller",
            round = self.round_number,
            %winner,
            turns = self.turns,
            final_scores = ?result.final_scores,
            "round ended"
        );
        self.events.emit(GameEvent::RoundEnded { winner, result });
    }
}

fn check_deal(hands: &[Hand; 4]) -> Result<(), InvalidDeal> {
    let mut seen = HashSet::new();
    for (seat, hand) in Seat::LOOP.into_iter().zip(hands) {
        if hand.is_empty() {
            return Err(InvalidDeal::EmptyHand(seat));
        }
        if hand.len() > HAND_SIZE {
            return Err(InvalidDeal::TooManyCards {
                seat,
                count: hand.len(),
            });
        }
        if let Some(card) = hand.iter().find(|card| !seen.insert(**card)) {
            return Err(InvalidDeal::DuplicateCard(*card));
        }
    }
    Ok(())
}
