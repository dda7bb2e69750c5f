#![deny(warnings)]

use anyhow::Context;
use clap::Parser;

use bigtwo_app::cli::Cli;
use bigtwo_app::logging::init_logging;
use bigtwo_app::sim::Simulator;
use bigtwo_core::model::player::Seat;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config().context("loading configuration")?;

    let names = config.names();
    println!(
        "Loaded configuration: {} ({} on autopilot, seed {})",
        names.join(", "),
        config.human_seats.len(),
        config
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "random".to_string())
    );

    if cli.validate_only {
        println!("Validation-only mode: no rounds played.");
        return Ok(());
    }

    let _logging_guard = init_logging(&config.logging, cli.verbose)?;
    let mut simulator = Simulator::new(config);
    let summary = simulator.run(cli.rounds, cli.jsonl.as_deref(), |snapshot, _| {
        let scores: Vec<String> = Seat::LOOP
            .iter()
            .map(|seat| {
                format!(
                    "{} {:+}",
                    snapshot.players[seat.index()],
                    snapshot.final_scores[seat.index()]
                )
            })
            .collect();
        println!(
            "Round {}: {} wins in {} turns | {}",
            snapshot.round_number,
            snapshot.players[snapshot.winner.index()],
            snapshot.turns,
            scores.join(" | ")
        );
    })?;

    println!("Final standings after {} rounds:", summary.rounds_played);
    let mut order = Seat::LOOP;
    order.sort_by_key(|seat| std::cmp::Reverse(summary.totals[seat.index()]));
    for seat in order {
        println!("  {:<12} {:+}", names[seat.index()], summary.totals[seat.index()]);
    }
    let leader = simulator.scoreboard().leading_player();
    println!("Leader: {}", names[leader.index()]);
    if let Some(path) = summary.jsonl_path.as_ref() {
        println!("Round log: {}", path.display());
    }

    Ok(())
}
