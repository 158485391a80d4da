//! Runtime configuration
//!
//! Resolved settings for a summary run, independent of how they were parsed.

use std::path::PathBuf;

use crate::line::MalformedPolicy;

/// Where the input bytes come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Read through a fixed buffer.
    #[default]
    Stream,
    /// Map the whole file and scan it in place.
    Mmap,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Measurements file, one `<station>;<value>` per line
    pub file: PathBuf,
    pub on_malformed: MalformedPolicy,
    pub input_mode: InputMode,
    /// Write a pprof protobuf profile here when set
    pub profile: Option<PathBuf>,
    /// Verbosity level for logging
    pub verbose: u8,
}

impl Config {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            on_malformed: MalformedPolicy::default(),
            input_mode: InputMode::default(),
            profile: None,
            verbose: 0,
        }
    }

    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    pub fn with_input_mode(mut self, mode: InputMode) -> Self {
        self.input_mode = mode;
        self
    }

    pub fn with_profile(mut self, path: Option<PathBuf>) -> Self {
        self.profile = path;
        self
    }

    pub fn with_verbose(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }

    /// Get the log level string based on verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
