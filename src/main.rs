use std::error::Error as _;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;

use lifeterm::config::{self, ParseOutcome};
use lifeterm::render::{self, TerminalSink};
use lifeterm::stats::{RunStats, format_clock};
use lifeterm::sim::{self, StopFlag};
use lifeterm::{SimError, Simulation};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), SimError> {
    let start = Instant::now();

    let cfg = match config::parse_args(std::env::args().skip(1), render::display_size())? {
        ParseOutcome::Run(cfg) => cfg,
        ParseOutcome::Help => {
            print!("{}", config::USAGE);
            return Ok(());
        }
    };
    debug!("config: {}", serde_json::to_string(&cfg)?);

    print!("{} Initializing Game of Life...", render::info_tag());
    let _ = io::stdout().flush();
    let t = Instant::now();
    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let board = sim::initial_board(&cfg, &mut rng)?;
    let mut simulation = Simulation::new(board, &cfg, TerminalSink::new(io::stdout()))?;
    println!("done ({:.03} seconds)", t.elapsed().as_secs_f64());

    // The loop is synchronous; ctrl-c raises the flag it checks between
    // generations and wakes it from the pacing sleep.
    let stop = Arc::new(StopFlag::new());
    let worker_stop = Arc::clone(&stop);
    let mut worker = tokio::task::spawn_blocking(move || {
        let result = simulation.run(&worker_stop);
        let (stats, _) = simulation.finish();
        result.map(|()| stats)
    });

    let joined = tokio::select! {
        joined = &mut worker => joined,
        Ok(()) = tokio::signal::ctrl_c() => {
            stop.raise();
            worker.await
        }
    };
    let stats = joined??;

    report(&stats, start, cfg.json_stats)
}

fn report(stats: &RunStats, start: Instant, json: bool) -> Result<(), SimError> {
    let mut summary = stats.summary();
    summary.total_secs = start.elapsed().as_secs_f64();

    println!("\n");
    if json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        let tag = render::info_tag();
        println!("{tag} total time for sim:      {}", format_clock(summary.total_secs));
        println!("{tag} average generation time: {:.03} seconds", summary.mean_step_secs);
    }
    Ok(())
}
