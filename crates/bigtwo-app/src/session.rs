use crate::controller::{EnginePhase, GameController, InvalidPlay};
use crate::event::GameEvent;
use bigtwo_core::model::card::Card;
use bigtwo_core::model::player::Seat;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

/// Cloneable handle that serializes engine calls from several callers, such
/// as a UI thread and a relay thread.
#[derive(Clone)]
pub struct SharedController {
    inner: Arc<Mutex<GameController>>,
}

impl SharedController {
    pub fn new(controller: GameController) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    pub fn start_round(&self) {
        self.inner.lock().start_round();
    }

    pub fn submit_play(&self, cards: &[Card]) -> Result<(), InvalidPlay> {
        self.inner.lock().submit_play(cards)
    }

    pub fn submit_play_as(&self, seat: Seat, cards: &[Card]) -> Result<(), InvalidPlay> {
        self.inner.lock().submit_play_as(seat, cards)
    }

    pub fn subscribe(&self) -> Receiver<GameEvent> {
        self.inner.lock().subscribe()
    }

    pub fn attach_relay(&self) -> RelayForwarder {
        let receiver = self.inner.lock().attach_relay();
        RelayForwarder {
            controller: self.clone(),
            receiver,
        }
    }

    /// Run a read-only query under the lock.
    pub fn with<R>(&self, query: impl FnOnce(&GameController) -> R) -> R {
        let guard = self.inner.lock();
        query(&*guard)
    }

    pub fn current_turn(&self) -> Seat {
        self.with(GameController::current_turn)
    }

    pub fn phase(&self) -> EnginePhase {
        self.with(GameController::phase)
    }
}

/// A request arriving from a remote seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RemoteCommand {
    Submit { seat: Seat, cards: Vec<Card> },
    Pass { seat: Seat },
}

impl RemoteCommand {
    pub fn seat(&self) -> Seat {
        match self {
            RemoteCommand::Submit { seat, .. } | RemoteCommand::Pass { seat } => *seat,
        }
    }
}

/// Bridges the engine and a remote transport: relay events go out through a
/// caller-provided sink, remote commands come back in as submissions.
pub struct RelayForwarder {
    controller: SharedController,
    receiver: Receiver<GameEvent>,
}

impl RelayForwarder {
    /// Forward every pending event. Returns how many were delivered; stops
    /// early when the sink reports failure.
    pub fn forward_pending<F>(&self, mut sink: F) -> usize
    where
        F: FnMut(&GameEvent) -> bool,
    {
        let mut delivered = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if !sink(&event) {
                        debug!(target: "bigtwo_app::relay", kind = event.kind(), "sink refused event");
                        break;
                    }
                    delivered += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        delivered
    }

    pub fn handle(&self, command: RemoteCommand) -> Result<(), InvalidPlay> {
        let seat = command.seat();
        let outcome = match &command {
            RemoteCommand::Submit { cards, .. } => self.controller.submit_play_as(seat, cards),
            RemoteCommand::Pass { .. } => self.controller.submit_play_as(seat, &[]),
        };
        if let Err(reason) = &outcome {
            info!(target: "bigtwo_app::relay", %seat, %reason, "remote command refused");
        }
        outcome
    }

    /// Move forwarding onto its own thread. The thread ends when the engine
    /// is dropped or the sink reports failure, returning the delivered count.
    pub fn spawn<F>(self, mut sink: F) -> JoinHandle<usize>
    where
        F: FnMut(&GameEvent) -> bool + Send + 'static,
    {
        let RelayForwarder { receiver, .. } = self;
        thread::spawn(move || {
            let mut delivered = 0;
            while let Ok(event) = receiver.recv() {
                if !sink(&event) {
                    break;
                }
                delivered += 1;
            }
            delivered
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{RemoteCommand, SharedController};
    use crate::config::EngineConfig;
    use crate::controller::{GameController, InvalidPlay};
    use crate::event::GameEvent;
    use bigtwo_core::model::player::Seat;

    fn shared(human_seats: Vec<usize>) -> SharedController {
        SharedController::new(GameController::new(EngineConfig {
            seed: Some(21),
            human_seats,
            ..EngineConfig::default()
        }))
    }

    #[test]
    fn relay_sees_the_same_stream_as_primary() {
        let session = shared(vec![0]);
        let primary = session.subscribe();
        let relay = session.attach_relay();
        session.start_round();

        let mut forwarded = Vec::new();
        let count = relay.forward_pending(|event| {
            forwarded.push(event.clone());
            true
        });
        let direct: Vec<GameEvent> = primary.try_iter().collect();
        assert_eq!(count, forwarded.len());
        assert_eq!(forwarded, direct);
        assert!(matches!(forwarded[0], GameEvent::RoundStarted { .. }));
    }

    #[test]
    fn remote_command_for_wrong_seat_is_refused() {
        let session = shared(vec![0, 2]);
        let relay = session.attach_relay();
        session.start_round();
        assert_eq!(session.current_turn(), Seat::North);

        let err = relay
            .handle(RemoteCommand::Pass { seat: Seat::South })
            .unwrap_err();
        assert_eq!(
            err,
            InvalidPlay::OutOfTurn {
                expected: Seat::North,
                actual: Seat::South
            }
        );
        assert_eq!(session.with(|c| c.pass_count()), 0);
    }

    #[test]
    fn remote_pass_hands_the_turn_on() {
        let session = shared(vec![0, 1, 2, 3]);
        let relay = session.attach_relay();
        session.start_round();
        relay
            .handle(RemoteCommand::Pass { seat: Seat::North })
            .unwrap();
        assert_eq!(session.current_turn(), Seat::East);
        assert_eq!(session.with(|c| c.pass_count()), 1);
    }

    #[test]
    fn commands_decode_from_json() {
        let json = r#"{"command":"pass","seat":"East"}"#;
        let cmd: RemoteCommand = serde_json::from_str(json).unwrap();
        assert_eq!(cmd, RemoteCommand::Pass { seat: Seat::East });

        let submit = RemoteCommand::Submit {
            seat: Seat::West,
            cards: bigtwo_core::model::card::parse_cards("3D 3S").unwrap(),
        };
        let text = serde_json::to_string(&submit).unwrap();
        assert!(text.starts_with(r#"{"command":"submit","seat":"West""#));
        assert_eq!(serde_json::from_str::<RemoteCommand>(&text).unwrap(), submit);
    }

    #[test]
    fn spawned_forwarder_stops_when_engine_drops() {
        let session = shared(Vec::new());
        let relay = session.attach_relay();
        session.start_round();
        let handle = relay.spawn(|_| true);
        drop(session);
        let delivered = handle.join().unwrap();
        assert!(delivered > 0);
    }
}
