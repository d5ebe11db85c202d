use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::ConfigError;

/// Everything a run needs, fixed once parsing succeeds.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationConfig {
    // Board
    pub width: usize,
    pub height: usize,
    pub seed: Option<u64>,
    pub load: Option<PathBuf>,

    // Run length and pacing
    /// None runs until interrupted.
    pub generations: Option<u64>,
    /// Extra sleep per tick, seconds.
    pub sleep: f64,
    /// None leaves the frame rate uncapped.
    pub max_fps: Option<f64>,

    // Output
    pub export: bool,
    /// Export directory. Only set when `export` is on.
    pub output: Option<PathBuf>,
    pub json_stats: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 23,
            seed: None,
            load: None,
            generations: None,
            sleep: 0.0,
            max_fps: None,
            export: false,
            output: None,
            json_stats: false,
        }
    }
}

impl SimulationConfig {
    /// Defaults sized to the display: the board fills it exactly.
    pub fn for_display(cols: usize, rows: usize) -> Self {
        Self {
            width: cols.max(1),
            height: rows.max(1),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParseOutcome {
    Run(SimulationConfig),
    Help,
}

pub const USAGE: &str = "\
usage: lifeterm [options]

arguments:
  -x, --width <N>         width of the board (default: terminal width)
  -y, --height <N>        height of the board (default: terminal height minus one)
  -g, --generations <N>   generations to simulate, -1 runs until interrupted (default: -1)
  -s, --sleep <SECS>      additional sleep per tick (default: 0)
  -f, --maxfps <FPS>      frame rate cap, -1 is uncapped (default: -1)
  -o, --output <DIR>      export directory (default: exports/<width>x<height>-<ddMonyy-HH.MM.SS>)
  -l, --load <PATH>       start from a .board file instead of a random board
      --seed <N>          seed for the random board

flags:
  -e, --export            save every generation into the output directory
      --json-stats        print the final statistics as JSON
  -h, --help              show this message
";

/// Parse command-line arguments (without the program name).
/// `display` is the `(cols, rows)` area available for the board, used for the
/// default width and height.
pub fn parse_args<I>(args: I, display: (usize, usize)) -> Result<ParseOutcome, ConfigError>
where
    I: IntoIterator<Item = String>,
{
    let mut cfg = SimulationConfig::for_display(display.0, display.1);
    let mut width = cfg.width as i64;
    let mut height = cfg.height as i64;
    let mut output = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        // Accept both `--flag value` and `--flag=value`.
        let (flag, inline) = match arg.split_once('=') {
            Some((f, v)) if f.starts_with("--") => (f.to_string(), Some(v.to_string())),
            _ => (arg, None),
        };
        let mut value = || {
            inline
                .clone()
                .or_else(|| args.next())
                .ok_or_else(|| ConfigError::MissingValue(flag.clone()))
        };

        match flag.as_str() {
            "-x" | "--width" => width = parse_num(&flag, &value()?)?,
            "-y" | "--height" => height = parse_num(&flag, &value()?)?,
            "-g" | "--generations" => {
                let g: i64 = parse_num(&flag, &value()?)?;
                cfg.generations = match g {
                    -1 => None,
                    g if g >= 0 => Some(g as u64),
                    g => return Err(ConfigError::Generations(g)),
                };
            }
            "-s" | "--sleep" => {
                let s: f64 = parse_num(&flag, &value()?)?;
                if !s.is_finite() || s < 0.0 {
                    return Err(ConfigError::Sleep(s));
                }
                cfg.sleep = s;
            }
            "-f" | "--maxfps" => {
                let f: f64 = parse_num(&flag, &value()?)?;
                cfg.max_fps = if f == -1.0 {
                    None
                } else if f.is_finite() && f > 0.0 {
                    Some(f)
                } else {
                    return Err(ConfigError::MaxFps(f));
                };
            }
            "-o" | "--output" => output = Some(PathBuf::from(value()?)),
            "-l" | "--load" => cfg.load = Some(PathBuf::from(value()?)),
            "--seed" => cfg.seed = Some(parse_num(&flag, &value()?)?),
            "-e" | "--export" => cfg.export = true,
            "--json-stats" => cfg.json_stats = true,
            "-h" | "--help" => return Ok(ParseOutcome::Help),
            _ => return Err(ConfigError::UnknownArgument(flag.clone())),
        }
    }

    if width < 1 || height < 1 {
        return Err(ConfigError::Dimensions { width, height });
    }
    let too_large = || ConfigError::BoardTooLarge { width, height };
    cfg.width = usize::try_from(width).map_err(|_| too_large())?;
    cfg.height = usize::try_from(height).map_err(|_| too_large())?;
    if cfg.width.checked_mul(cfg.height).is_none() {
        return Err(too_large());
    }

    if cfg.export {
        cfg.output = Some(output.unwrap_or_else(|| default_output_dir(cfg.width, cfg.height)));
    }

    Ok(ParseOutcome::Run(cfg))
}

fn parse_num<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}

/// `exports/<w>x<h>-<local time>`, e.g. `exports/80x23-19Oct26-14.03.22`.
pub fn default_output_dir(width: usize, height: usize) -> PathBuf {
    PathBuf::from("exports").join(export_dir_name(width, height, chrono::Local::now().naive_local()))
}

fn export_dir_name(width: usize, height: usize, at: NaiveDateTime) -> String {
    format!("{width}x{height}-{}", at.format("%d%b%y-%H.%M.%S"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ParseOutcome, ConfigError> {
        parse_args(args.iter().map(|s| s.to_string()), (120, 40))
    }

    fn run(args: &[&str]) -> SimulationConfig {
        match parse(args) {
            Ok(ParseOutcome::Run(cfg)) => cfg,
            other => panic!("expected a config, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_follow_display() {
        let cfg = run(&[]);
        assert_eq!((cfg.width, cfg.height), (120, 40));
        assert_eq!(cfg.generations, None);
        assert_eq!(cfg.max_fps, None);
        assert_eq!(cfg.sleep, 0.0);
        assert!(!cfg.export);
        assert_eq!(cfg.output, None);
    }

    #[test]
    fn test_all_flags() {
        let cfg = run(&[
            "-x", "30", "--height", "12", "-g", "100", "-s", "0.25", "-f", "30", "-l",
            "start.board", "--seed", "9", "--json-stats",
        ]);
        assert_eq!((cfg.width, cfg.height), (30, 12));
        assert_eq!(cfg.generations, Some(100));
        assert_eq!(cfg.sleep, 0.25);
        assert_eq!(cfg.max_fps, Some(30.0));
        assert_eq!(cfg.load, Some(PathBuf::from("start.board")));
        assert_eq!(cfg.seed, Some(9));
        assert!(cfg.json_stats);
    }

    #[test]
    fn test_inline_values() {
        let cfg = run(&["--width=7", "--generations=-1", "--maxfps=-1"]);
        assert_eq!(cfg.width, 7);
        assert_eq!(cfg.generations, None);
        assert_eq!(cfg.max_fps, None);
    }

    #[test]
    fn test_output_needs_export() {
        assert_eq!(run(&["-o", "out"]).output, None);
        assert_eq!(run(&["-o", "out", "-e"]).output, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_default_export_dir() {
        let cfg = run(&["-e", "-x", "10", "-y", "5"]);
        let out = cfg.output.unwrap();
        assert!(out.starts_with("exports"));
        let name = out.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("10x5-"), "{name}");
    }

    #[test]
    fn test_export_dir_name_is_timestamped() {
        let at = chrono::NaiveDate::from_ymd_opt(2026, 10, 19)
            .and_then(|d| d.and_hms_opt(14, 3, 22))
            .unwrap();
        assert_eq!(export_dir_name(10, 5, at), "10x5-19Oct26-14.03.22");
    }

    #[test]
    fn test_zero_generations_allowed() {
        assert_eq!(run(&["-g", "0"]).generations, Some(0));
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert_eq!(
            parse(&["-x", "0"]),
            Err(ConfigError::Dimensions { width: 0, height: 40 })
        );
        assert_eq!(
            parse(&["-y", "-3"]),
            Err(ConfigError::Dimensions { width: 120, height: -3 })
        );
    }

    #[test]
    fn test_rejects_board_that_overflows() {
        let side = (1u64 << 33).to_string();
        assert_eq!(
            parse(&["-x", &side, "-y", &side]),
            Err(ConfigError::BoardTooLarge { width: 1 << 33, height: 1 << 33 })
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_eq!(parse(&["-g", "-2"]), Err(ConfigError::Generations(-2)));
        assert_eq!(parse(&["-s", "-1"]), Err(ConfigError::Sleep(-1.0)));
        assert_eq!(parse(&["-f", "0"]), Err(ConfigError::MaxFps(0.0)));
        assert!(matches!(
            parse(&["-x", "wide"]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(
            parse(&["-x"]),
            Err(ConfigError::MissingValue("-x".to_string()))
        );
        assert_eq!(
            parse(&["--bogus"]),
            Err(ConfigError::UnknownArgument("--bogus".to_string()))
        );
    }

    #[test]
    fn test_help() {
        assert_eq!(parse(&["-x", "3", "--help"]), Ok(ParseOutcome::Help));
    }

    #[test]
    fn test_config_serializes() {
        let json = serde_json::to_string(&run(&["-g", "5"])).unwrap();
        assert!(json.contains("\"generations\":5"));
    }
}
