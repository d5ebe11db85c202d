use std::time::{Duration, Instant};

use serde::Serialize;

/// Wall time spent in one generation, split by phase.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTiming {
    pub step: Duration,
    pub render: Duration,
}

/// Per-generation timings, appended as the run goes and summarised at exit.
#[derive(Clone, Debug)]
pub struct RunStats {
    start: Instant,
    frames: Vec<FrameTiming>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub generations: usize,
    pub total_secs: f64,
    pub mean_step_secs: f64,
    pub mean_render_secs: f64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            frames: Vec::new(),
        }
    }

    pub fn push(&mut self, frame: FrameTiming) {
        self.frames.push(frame);
    }

    pub fn frames(&self) -> &[FrameTiming] {
        &self.frames
    }

    pub fn summary(&self) -> Summary {
        let n = self.frames.len();
        let mean = |f: fn(&FrameTiming) -> Duration| {
            if n == 0 {
                0.0
            } else {
                self.frames.iter().map(|t| f(t).as_secs_f64()).sum::<f64>() / n as f64
            }
        };
        Summary {
            generations: n,
            total_secs: self.start.elapsed().as_secs_f64(),
            mean_step_secs: mean(|t| t.step),
            mean_render_secs: mean(|t| t.render),
        }
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

/// `H:MM:SS.sss`
pub fn format_clock(secs: f64) -> String {
    let whole = secs.max(0.0);
    let hours = (whole / 3600.0).floor() as u64;
    let minutes = ((whole / 60.0).floor() as u64) % 60;
    let seconds = whole % 60.0;
    format!("{hours}:{minutes:02}:{seconds:06.3}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_empty_summary() {
        let s = RunStats::new().summary();
        assert_eq!(s.generations, 0);
        assert_eq!(s.mean_step_secs, 0.0);
        assert_eq!(s.mean_render_secs, 0.0);
    }

    #[test]
    fn test_means() {
        let mut stats = RunStats::new();
        stats.push(FrameTiming { step: ms(10), render: ms(2) });
        stats.push(FrameTiming { step: ms(30), render: ms(4) });
        let s = stats.summary();
        assert_eq!(s.generations, 2);
        assert!((s.mean_step_secs - 0.020).abs() < 1e-9);
        assert!((s.mean_render_secs - 0.003).abs() < 1e-9);
        assert_eq!(stats.frames().len(), 2);
    }

    #[test]
    fn test_total_covers_start() {
        let start = Instant::now() - Duration::from_secs(2);
        let s = RunStats::starting_at(start).summary();
        assert!(s.total_secs >= 2.0);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "0:00:00.000");
        assert_eq!(format_clock(61.5), "0:01:01.500");
        assert_eq!(format_clock(3723.25), "1:02:03.250");
    }

    #[test]
    fn test_summary_json() {
        let s = Summary {
            generations: 3,
            total_secs: 1.5,
            mean_step_secs: 0.25,
            mean_render_secs: 0.125,
        };
        let v: serde_json::Value = serde_json::to_value(s).unwrap();
        assert_eq!(v["generations"], 3);
        assert_eq!(v["mean_step_secs"], 0.25);
    }
}
