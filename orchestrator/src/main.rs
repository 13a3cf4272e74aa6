//! Main entry point for the orchestrator binary

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use orchestrator::{
    services::{write_report_json, RandomDescriptorSource, RealUnitSpawner, ShutdownSignal},
    Orchestrator, OrchestratorResult, RunConfig,
};
use shared::{logging, process_debug, UnitId};

/// Coordinates production workers filling one fixed-size order
#[derive(Parser)]
#[command(name = "orchestrator")]
#[command(about = "Runs production workers against a shared order and reports the final tally")]
pub struct Args {
    /// Number of production workers (1..=40)
    pub workers: u32,

    /// Total units in the order
    pub order_size: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Seed for worker capacity and delay draws (random if not set)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Capacity of the report channel
    #[arg(long, default_value_t = orchestrator::config::DEFAULT_CHANNEL_BOUND)]
    pub channel_bound: usize,

    /// Seconds the aggregator waits for any report before giving up (0 waits forever)
    #[arg(long, default_value = "30")]
    pub stall_timeout_secs: u64,

    /// Seconds allowed for all units to exit after the final report is granted
    #[arg(long)]
    pub reap_timeout_secs: Option<u64>,

    /// Write the final report as JSON to this path
    #[arg(long)]
    pub report_json: Option<PathBuf>,
}

impl Args {
    fn run_config(&self) -> RunConfig {
        let stall_timeout = (self.stall_timeout_secs > 0).then(|| Duration::from_secs(self.stall_timeout_secs));
        RunConfig::new(self.workers, self.order_size)
            .with_channel_bound(self.channel_bound)
            .with_stall_timeout(stall_timeout)
            .with_reap_timeout(self.reap_timeout_secs.map(Duration::from_secs))
    }
}

#[tokio::main]
async fn main() -> OrchestratorResult<()> {
    let args = Args::parse();
    logging::init_tracing_with_level(Some(&args.log_level));

    // Listen before any unit exists so an early Ctrl+C still tears down cleanly.
    let shutdown = ShutdownSignal::install()?;

    let config = args.run_config();
    process_debug!(UnitId::Orchestrator, "Run configuration: {:?}", config);

    let descriptors = RandomDescriptorSource::from_config(&config, args.seed);
    let orchestrator = match Orchestrator::new(config, descriptors, RealUnitSpawner::new()) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            logging::log_error(&UnitId::Orchestrator, "Configuration", &e);
            return Err(e);
        }
    };

    let outcome = orchestrator.run(shutdown.triggered()).await?;

    if let Some(path) = &args.report_json {
        write_report_json(&outcome.report, path)?;
    }

    logging::log_success(&UnitId::Orchestrator, "Orchestrator stopped gracefully");
    Ok(())
}
