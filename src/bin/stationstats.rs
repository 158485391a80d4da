use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use stationstats::{
    Config, InputMode, MalformedPolicy, logging::init_logging, profiling::Profiler,
};

/// Summarize `<station>;<value>` measurements as min/mean/max per station
#[derive(Parser)]
#[command(name = "stationstats", version)]
struct Cli {
    /// Measurements file
    #[arg(env = "FILE")]
    file: PathBuf,

    /// What to do with lines that are not `<station>;<number>`
    #[arg(long, value_enum, env = "STATIONSTATS_ON_MALFORMED", default_value_t = MalformedPolicy::Reject)]
    on_malformed: MalformedPolicy,

    /// Memory-map the file instead of streaming it
    #[arg(long, env = "STATIONSTATS_MMAP")]
    mmap: bool,

    /// Write a pprof profile of the run to this path
    #[arg(long, value_name = "PATH")]
    profile: Option<PathBuf>,

    /// Profile to `profile.pb` (same as `--profile profile.pb`)
    #[arg(long, env = "PROFILING", hide = true)]
    profiling: bool,

    /// Enable verbose output (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> Config {
        let profile = self
            .profile
            .or_else(|| self.profiling.then(|| PathBuf::from("profile.pb")));
        let input_mode = if self.mmap {
            InputMode::Mmap
        } else {
            InputMode::Stream
        };

        Config::new(self.file)
            .with_policy(self.on_malformed)
            .with_input_mode(input_mode)
            .with_profile(profile)
            .with_verbose(self.verbose)
    }
}

fn main() -> Result<()> {
    let config = Cli::parse().into_config();
    init_logging(&config);

    let profiler = config
        .profile
        .clone()
        .map(Profiler::start)
        .transpose()
        .context("failed to start profiler")?;

    let summary = stationstats::run(&config)
        .with_context(|| format!("failed to summarize {}", config.file.display()))?;
    println!("{summary}");

    if let Some(profiler) = profiler {
        profiler.finish().context("failed to write profile")?;
    }

    Ok(())
}
