use std::{fs, path::PathBuf};

use pprof::{ProfilerGuard, ProfilerGuardBuilder, protos::Message};
use tracing::info;

use crate::error::{Error, Result};

const BLOCKLIST: [&str; 4] = ["libc", "libgcc", "pthread", "vdso"];

/// Samples the process from `start` until `finish`, then writes a pprof
/// protobuf profile.
pub struct Profiler {
    guard: ProfilerGuard<'static>,
    output: PathBuf,
}

impl Profiler {
    pub fn start(output: PathBuf) -> Result<Self> {
        let guard = ProfilerGuardBuilder::default()
            .frequency(1000)
            .blocklist(&BLOCKLIST)
            .build()
            .map_err(|e| Error::Profile(e.to_string()))?;

        Ok(Self { guard, output })
    }

    pub fn finish(self) -> Result<()> {
        let report = self
            .guard
            .report()
            .build()
            .map_err(|e| Error::Profile(e.to_string()))?;
        let profile = report.pprof().map_err(|e| Error::Profile(e.to_string()))?;

        let mut content = Vec::new();
        profile
            .encode(&mut content)
            .map_err(|e| Error::Profile(e.to_string()))?;

        fs::write(&self.output, &content).map_err(|source| Error::Write {
            path: self.output.clone(),
            source,
        })?;
        info!(path = %self.output.display(), bytes = content.len(), "wrote profile");

        Ok(())
    }
}
