pub mod accumulator;
pub mod byte_buffer;
pub mod config;
pub mod error;
pub mod format;
pub mod line;
pub mod logging;
pub mod profiling;
pub mod stats;

use std::{fs::File, io::Read, time::Instant};

use memmap2::Mmap;
use tracing::info;

pub use accumulator::Accumulator;
pub use config::{Config, InputMode};
pub use error::{Error, MalformedReason, Result};
pub use format::format_summary;
pub use line::MalformedPolicy;
pub use stats::Statistics;

/// Reduces everything `reader` yields and formats the summary line.
pub fn summarize<R: Read>(reader: R, policy: MalformedPolicy) -> Result<String> {
    let mut acc = Accumulator::new();
    acc.reduce_reader(reader, policy)?;
    Ok(format_summary(&acc))
}

/// Opens the configured file, reduces it and returns the accumulator.
pub fn compute(config: &Config) -> Result<Accumulator> {
    let started = Instant::now();
    let file = File::open(&config.file).map_err(|source| Error::Open {
        path: config.file.clone(),
        source,
    })?;
    info!(path = %config.file.display(), mode = ?config.input_mode, "reading measurements");

    let mut acc = Accumulator::new();
    match config.input_mode {
        InputMode::Stream => acc.reduce_reader(file, config.on_malformed)?,
        InputMode::Mmap => {
            let buf = unsafe { Mmap::map(&file)? };
            acc.reduce_bytes(&buf, config.on_malformed)?;
        }
    }

    info!(
        lines = acc.lines_read(),
        stations = acc.len(),
        skipped = acc.skipped(),
        elapsed = ?started.elapsed(),
        "reduced measurements"
    );

    Ok(acc)
}

/// [`compute`] followed by [`format_summary`].
pub fn run(config: &Config) -> Result<String> {
    let acc = compute(config)?;
    Ok(format_summary(&acc))
}
