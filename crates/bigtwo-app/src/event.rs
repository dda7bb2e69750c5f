use bigtwo_core::combo::HandResult;
use bigtwo_core::model::card::Card;
use bigtwo_core::model::player::{Controller, Seat};
use bigtwo_core::model::score::GameResult;
use serde::Serialize;
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    pub seat: Seat,
    pub name: String,
    pub controller: Controller,
    pub hand_size: usize,
}

/// Why a turn ended without cards reaching the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    Pass,
    NotHeld,
    IllegalShape,
    WrongSize,
    DoesNotBeat,
}

/// Everything the engine reports, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    RoundStarted {
        round: u32,
        players: Vec<PlayerSummary>,
    },
    TurnStarted {
        seat: Seat,
        open_table: bool,
    },
    CardsPlayed {
        seat: Seat,
        cards: Vec<Card>,
        combo: HandResult,
        remaining: usize,
    },
    InvalidPlay {
        seat: Seat,
        reason: Rejection,
        table_cleared: bool,
    },
    RoundEnded {
        winner: Seat,
        result: GameResult,
    },
}

impl GameEvent {
    pub fn seat(&self) -> Option<Seat> {
        match self {
            GameEvent::RoundStarted { .. } => None,
            GameEvent::TurnStarted { seat, .. }
            | GameEvent::CardsPlayed { seat, .. }
            | GameEvent::InvalidPlay { seat, .. } => Some(*seat),
            GameEvent::RoundEnded { winner, .. } => Some(*winner),
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            GameEvent::RoundStarted { .. } => "round_started",
            GameEvent::TurnStarted { .. } => "turn_started",
            GameEvent::CardsPlayed { .. } => "cards_played",
            GameEvent::InvalidPlay { .. } => "invalid_play",
            GameEvent::RoundEnded { .. } => "round_ended",
        }
    }
}

/// Single ordered event channel. The primary subscriber usually drives a UI;
/// the relay subscriber, when attached, receives the same stream for
/// forwarding to remote seats.
#[derive(Debug, Default)]
pub struct EventBus {
    primary: Option<Sender<GameEvent>>,
    relay: Option<Sender<GameEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<GameEvent> {
        let (tx, rx) = mpsc::channel();
        self.primary = Some(tx);
        rx
    }

    pub fn attach_relay(&mut self) -> Receiver<GameEvent> {
        let (tx, rx) = mpsc::channel();
        self.relay = Some(tx);
        rx
    }

    pub fn has_subscribers(&self) -> bool {
        self.primary.is_some() || self.relay.is_some()
    }

    pub fn emit(&mut self, event: GameEvent) {
        for slot in [&mut self.primary, &mut self.relay] {
            let disconnected = match slot.as_ref() {
                Some(tx) => tx.send(event.clone()).is_err(),
                None => false,
            };
            if disconnected {
                tracing::debug!(
                    target: "bigtwo_app::event",
                    kind = event.kind(),
                    "subscriber dropped; detaching"
                );
                *slot = None;
            }
        }
    }
}
