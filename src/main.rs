use cardgame::{FileTraceSink, RoundOrchestrator, RunReport, SimulationConfig, SimulationError};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cardgame=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(report) => {
            info!(
                rounds = report.rounds.len(),
                elapsed_ms = (report.finished_at - report.started_at).num_milliseconds(),
                "Simulation complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Simulation failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<RunReport, SimulationError> {
    let config = SimulationConfig::from_env()?;
    info!(
        players = config.players,
        rounds = config.rounds,
        cards = config.composition.len(),
        seed = ?config.seed,
        trace_path = %config.trace_path.display(),
        "Starting card game simulation"
    );

    let sink = Arc::new(FileTraceSink::create(&config.trace_path, config.trace_format).await?);
    let orchestrator = RoundOrchestrator::new(config, sink)?;
    let report = orchestrator.run().await?;

    for round in &report.rounds {
        info!(
            round = round.round,
            winner = %round.winner,
            turns = round.turns,
            "Round result"
        );
    }

    Ok(report)
}
