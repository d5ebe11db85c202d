use std::io::Write;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::Rng;

use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::grid::Board;
use crate::life;
use crate::render::{StatusBar, TerminalSink};
use crate::snapshot::{self, SnapshotWriter};
use crate::stats::{FrameTiming, RunStats};

/// Added to the per-tick sleep whenever a frame beats the fps cap.
pub const SLEEP_STEP: f64 = 0.0001;

/// Frame-rate governor. The extra sleep only ever grows: each frame faster
/// than `max_fps` nudges it up by `SLEEP_STEP` until the cap holds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pacer {
    sleep: f64,
    max_fps: Option<f64>,
}

impl Pacer {
    pub fn new(sleep: f64, max_fps: Option<f64>) -> Self {
        Self { sleep, max_fps }
    }

    pub fn sleep_secs(&self) -> f64 {
        self.sleep
    }

    pub fn sleep_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.sleep).unwrap_or(Duration::MAX)
    }

    /// Step + render + the sleep currently in force.
    pub fn frame_secs(&self, timing: FrameTiming) -> f64 {
        timing.step.as_secs_f64() + timing.render.as_secs_f64() + self.sleep
    }

    /// Feed back the last frame time. Returns true when the sleep grew.
    pub fn observe(&mut self, frame_secs: f64) -> bool {
        match self.max_fps {
            Some(cap) if 1.0 / frame_secs > cap => {
                self.sleep += SLEEP_STEP;
                true
            }
            _ => false,
        }
    }
}

/// Interrupt flag shared between the signal handler and the driver loop.
/// Waiting on it sleeps like `thread::sleep` but wakes as soon as it is raised.
#[derive(Debug, Default)]
pub struct StopFlag {
    raised: Mutex<bool>,
    wake: Condvar,
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        *self.lock() = true;
        self.wake.notify_all();
    }

    pub fn is_raised(&self) -> bool {
        *self.lock()
    }

    /// Block for up to `dur`, returning early once the flag is raised.
    /// Returns whether the flag is raised.
    pub fn wait_timeout(&self, dur: Duration) -> bool {
        if dur.is_zero() {
            return self.is_raised();
        }
        let (raised, _) = self
            .wake
            .wait_timeout_while(self.lock(), dur, |raised| !*raised)
            .unwrap_or_else(PoisonError::into_inner);
        *raised
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.raised.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Starting board: the configured `.board` file, or a random board when no
/// file is given or it fails to load.
pub fn initial_board<R: Rng>(cfg: &SimulationConfig, rng: &mut R) -> Result<Board, SimError> {
    if let Some(path) = &cfg.load {
        match snapshot::load_board(path) {
            Ok(board) => {
                info!(
                    "loaded {}x{} board from {}",
                    board.width(),
                    board.height(),
                    path.display()
                );
                return Ok(board);
            }
            Err(e) => warn!("{e}; starting from a random board instead"),
        }
    }
    info!("seeding random {}x{} board", cfg.width, cfg.height);
    Ok(life::random_board(cfg.width, cfg.height, rng)?)
}

/// The driver loop: tick, sleep, export, draw, repeat.
pub struct Simulation<W: Write> {
    board: Board,
    generation: u64,
    limit: Option<u64>,
    pacer: Pacer,
    terminal: TerminalSink<W>,
    exporter: Option<SnapshotWriter>,
    stats: RunStats,
}

impl<W: Write> Simulation<W> {
    /// Creates the export directory when exporting is on.
    pub fn new(board: Board, cfg: &SimulationConfig, terminal: TerminalSink<W>) -> Result<Self, SimError> {
        let exporter = match (&cfg.output, cfg.export) {
            (Some(dir), true) => {
                let writer = SnapshotWriter::create(dir)?;
                info!("exporting generations to {}", writer.dir().display());
                Some(writer)
            }
            _ => None,
        };
        Ok(Self {
            board,
            generation: 0,
            limit: cfg.generations,
            pacer: Pacer::new(cfg.sleep, cfg.max_fps),
            terminal,
            exporter,
            stats: RunStats::new(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.limit == Some(self.generation)
    }

    /// Advance one generation and present it.
    ///
    /// The new board only becomes current once it has been exported and
    /// drawn, so an error never leaves a half-finished generation behind.
    pub fn step(&mut self) -> Result<FrameTiming, SimError> {
        self.advance(&StopFlag::new())
    }

    /// `step`, with the pacing sleep cut short when `stop` is raised. The
    /// generation already computed is still exported and drawn.
    fn advance(&mut self, stop: &StopFlag) -> Result<FrameTiming, SimError> {
        let generation = self.generation + 1;

        let t = Instant::now();
        let next = life::tick(&self.board);
        let step = t.elapsed();

        stop.wait_timeout(self.pacer.sleep_duration());

        let t = Instant::now();
        if let Some(exporter) = &self.exporter {
            exporter.write(generation, &next)?;
        }
        self.terminal.draw_board(&next).map_err(SimError::Terminal)?;
        let render = t.elapsed();

        let timing = FrameTiming { step, render };
        let frame = self.pacer.frame_secs(timing);
        self.terminal
            .draw_status(&StatusBar {
                generation,
                step: step.as_secs_f64(),
                render: render.as_secs_f64(),
                frame,
            })
            .map_err(SimError::Terminal)?;
        if self.pacer.observe(frame) {
            debug!("fps cap exceeded, sleep now {:.4}s", self.pacer.sleep_secs());
        }

        self.board = next;
        self.generation = generation;
        self.stats.push(timing);
        debug!("generation {generation}: step {step:?}, render {render:?}");
        Ok(timing)
    }

    /// Run until the generation limit or until `stop` is raised. `stop` is
    /// only checked between generations.
    pub fn run(&mut self, stop: &StopFlag) -> Result<(), SimError> {
        while !self.is_finished() {
            if stop.is_raised() {
                info!("interrupted after generation {}", self.generation);
                break;
            }
            self.advance(stop)?;
        }
        Ok(())
    }

    pub fn finish(self) -> (RunStats, TerminalSink<W>) {
        (self.stats, self.terminal)
    }
}
