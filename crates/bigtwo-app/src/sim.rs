use crate::config::EngineConfig;
use crate::controller::{GameController, InvalidPlay};
use crate::event::GameEvent;
use anyhow::{Context, Result, bail};
use bigtwo_core::game::serialization::RoundSnapshot;
use bigtwo_core::model::score::ScoreBoard;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::thread;
use std::time::Duration;
use tracing::{debug, trace};

/// Upper bound on submissions in one round; a round needs far fewer.
const MAX_SUBMISSIONS_PER_ROUND: usize = 2_000;

/// Plays whole rounds unattended, answering for human seats with the same
/// cheapest-beat rule the computer seats use.
pub struct Simulator {
    controller: GameController,
    events: Receiver<GameEvent>,
    scoreboard: ScoreBoard,
    bot_delay: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    pub rounds_played: u32,
    pub totals: [i64; 4],
    pub jsonl_path: Option<PathBuf>,
}

impl Simulator {
    pub fn new(config: EngineConfig) -> Self {
        let bot_delay = Duration::from_millis(config.pacing.bot_delay_ms);
        let mut controller = GameController::new(config);
        let events = controller.subscribe();
        Self {
            controller,
            events,
            scoreboard: ScoreBoard::new(),
            bot_delay,
        }
    }

    pub fn controller(&self) -> &GameController {
        &self.controller
    }

    pub fn scoreboard(&self) -> &ScoreBoard {
        &self.scoreboard
    }

    pub fn play_round(&mut self) -> Result<RoundSnapshot> {
        self.controller.start_round();
        self.observe();

        let mut submissions = 0;
        while self.controller.is_running() {
            submissions += 1;
            if submissions > MAX_SUBMISSIONS_PER_ROUND {
                bail!(
                    "round {} did not finish after {MAX_SUBMISSIONS_PER_ROUND} submissions",
                    self.controller.round_number()
                );
            }

            let cards = self.controller.suggest_play();
            match self.controller.submit_play(&cards) {
                Ok(()) => {}
                Err(InvalidPlay::NotRunning) => break,
                Err(reason) => {
                    debug!(target: "bigtwo_app::sim", %reason, "autopilot play refused; passing");
                    self.controller
                        .submit_play(&[])
                        .with_context(|| format!("forcing a pass after: {reason}"))?;
                }
            }
            self.observe();
        }

        let result = self
            .controller
            .result()
            .copied()
            .context("round stopped without a result")?;
        self.scoreboard.apply_result(&result);

        Ok(RoundSnapshot::capture(
            self.controller.seed(),
            self.controller.round_number(),
            self.controller.names(),
            self.controller.turns(),
            &result,
        ))
    }

    /// Play `rounds` rounds, writing one JSON line per round when a path is
    /// given. `on_round` sees each snapshot and the running totals. The file
    /// is a report of this run only; nothing reads it back.
    pub fn run<F>(
        &mut self,
        rounds: u32,
        jsonl: Option<&Path>,
        mut on_round: F,
    ) -> Result<SimulationSummary>
    where
        F: FnMut(&RoundSnapshot, &ScoreBoard),
    {
        let mut writer = match jsonl {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("creating directory {}", parent.display()))?;
                }
                let file = File::create(path)
                    .with_context(|| format!("creating {}", path.display()))?;
                Some(BufWriter::new(file))
            }
            None => None,
        };

        for _ in 0..rounds {
            let snapshot = self.play_round()?;
            if let Some(writer) = writer.as_mut() {
                let line = snapshot.to_json().context("serializing round snapshot")?;
                writeln!(writer, "{line}").context("writing round snapshot")?;
            }
            on_round(&snapshot, &self.scoreboard);
        }

        if let Some(writer) = writer.as_mut() {
            writer.flush().context("flushing round snapshots")?;
        }

        Ok(SimulationSummary {
            rounds_played: self.scoreboard.rounds(),
            totals: *self.scoreboard.standings(),
            jsonl_path: jsonl.map(Path::to_path_buf),
        })
    }

    /// Drain pending events, pausing after each computer play.
    fn observe(&self) {
        for event in self.events.try_iter() {
            trace!(target: "bigtwo_app::sim", kind = event.kind(), seat = ?event.seat());
            if let GameEvent::CardsPlayed { seat, .. } = &event {
                let computer = !self.controller.player(*seat).is_human();
                if computer && !self.bot_delay.is_zero() {
                    thread::sleep(self.bot_delay);
                }
            }
        }
    }
}
