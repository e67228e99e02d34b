use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use crate::sampler::SampleLimits;
use crate::utilities::default_log_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabId {
    Calculator,
    History,
    Timer,
    Reader,
}

impl TabId {
    pub const ALL: [TabId; 4] = [TabId::Calculator, TabId::History, TabId::Timer, TabId::Reader];

    pub fn title(self) -> &'static str {
        match self {
            TabId::Calculator => "Calculator",
            TabId::History => "History",
            TabId::Timer => "Stopwatch/Timer",
            TabId::Reader => "Reading Predictor",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "calculator" | "calc" => Some(TabId::Calculator),
            "history" => Some(TabId::History),
            "timer" | "stopwatch" => Some(TabId::Timer),
            "reader" | "reading" => Some(TabId::Reader),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub start_dir: PathBuf,
    pub initial_tab: TabId,
    pub sample_limits: SampleLimits,
    pub log_file: PathBuf,
    pub verbosity: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_dir: PathBuf::from("."),
            initial_tab: TabId::Calculator,
            sample_limits: SampleLimits::default(),
            log_file: default_log_path(),
            verbosity: 0,
        }
    }
}

pub fn command() -> Command {
    Command::new("tabdesk")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Calculator, history, stopwatch, countdown and reading-time predictor in one terminal")
        .arg(
            Arg::new("dir")
                .short('d')
                .long("dir")
                .num_args(1)
                .value_parser(value_parser!(PathBuf))
                .help("Starting directory of the reading predictor's file browser"),
        )
        .arg(
            Arg::new("tab")
                .short('t')
                .long("tab")
                .num_args(1)
                .help("Tab shown at startup: calculator, history, timer or reader"),
        )
        .arg(
            Arg::new("sample_min")
                .long("sample-min")
                .num_args(1)
                .value_parser(value_parser!(usize))
                .help("Minimum words in the calibration sample"),
        )
        .arg(
            Arg::new("sample_max")
                .long("sample-max")
                .num_args(1)
                .value_parser(value_parser!(usize))
                .help("Calibration samples stay below this many words"),
        )
        .arg(
            Arg::new("log_file")
                .long("log-file")
                .num_args(1)
                .value_parser(value_parser!(PathBuf))
                .help("Where to write the log"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("More logging (-v info, -vv debug)"),
        )
}

impl Settings {
    /// Command line > defaults.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let defaults = Settings::default();

        let initial_tab = match matches.get_one::<String>("tab") {
            Some(name) => TabId::parse(name).with_context(|| format!("unknown tab '{}'", name))?,
            None => defaults.initial_tab,
        };

        let sample_limits = SampleLimits {
            min_words: matches
                .get_one::<usize>("sample_min")
                .copied()
                .unwrap_or(defaults.sample_limits.min_words),
            max_words: matches
                .get_one::<usize>("sample_max")
                .copied()
                .unwrap_or(defaults.sample_limits.max_words),
        };
        if sample_limits.min_words == 0 || sample_limits.min_words >= sample_limits.max_words {
            bail!(
                "sample limits must satisfy 0 < min < max (got min {}, max {})",
                sample_limits.min_words,
                sample_limits.max_words
            );
        }

        let start_dir = matches.get_one::<PathBuf>("dir").cloned().unwrap_or(defaults.start_dir);
        if !start_dir.is_dir() {
            bail!("{} is not a directory", start_dir.display());
        }

        Ok(Settings {
            start_dir,
            initial_tab,
            sample_limits,
            log_file: matches.get_one::<PathBuf>("log_file").cloned().unwrap_or(defaults.log_file),
            verbosity: matches.get_count("verbose"),
        })
    }
}
