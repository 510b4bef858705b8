use crate::changelog::{Changelog, NO_CHANGES};
use crate::transcript::Transcript;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Create or truncate `path` and write `contents` to it. An existing
/// symlink or device at `path` is written through, not replaced.
pub fn write_output(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

/// Both rendered outputs of one run, held in memory until written.
#[derive(Debug, PartialEq, Eq)]
pub struct Extraction {
    pub result: String,
    pub changelog: String,
}

impl Extraction {
    pub fn from_transcript(transcript: &Transcript) -> Self {
        let changelog = Changelog::from_transcript(transcript);
        tracing::debug!(changes = changelog.changes().len(), "built changelog");
        Self {
            result: transcript.result.clone(),
            changelog: changelog.render(),
        }
    }

    /// Outputs for input that could not be read or parsed.
    pub fn degraded() -> Self {
        Self {
            result: String::new(),
            changelog: format!("{NO_CHANGES}\n"),
        }
    }

    /// Write the result text, then the changelog.
    pub fn write(&self, result_out: &Path, changelog_out: &Path) -> Result<()> {
        write_output(result_out, self.result.as_bytes())?;
        write_output(changelog_out, self.changelog.as_bytes())?;
        Ok(())
    }
}

/// Extract the result text and changelog from `input` into the two output
/// paths.
///
/// An unreadable or malformed input is not an error: a warning is logged
/// and the degraded outputs are written instead. Only failures to write
/// the outputs are returned.
pub fn run(input: &Path, result_out: &Path, changelog_out: &Path) -> Result<()> {
    let extraction = match Transcript::load(input) {
        Ok(transcript) => Extraction::from_transcript(&transcript),
        Err(err) => {
            tracing::warn!("cannot parse {}: {err:#}", input.display());
            Extraction::degraded()
        }
    };
    extraction.write(result_out, changelog_out)
}
