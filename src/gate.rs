/*
 *  gate.rs
 *
 *  pihole-dashboard - Pi-hole stats on an e-ink panel
 *  (c) 2021-26 the pihole-dashboard authors
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */
//! Change detection for the rendered report. A SHA-1 of the report text is
//! kept in a single plaintext file; the file is rewritten only when the
//! digest differs from the stored one.

use log::debug;
use sha1::{Digest, Sha1};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("hash file I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Deterministic fingerprint of the report bytes, lowercase hex.
pub fn digest(text: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Compares the digest of each report against the one persisted by the
/// previous run and updates the persisted value on change.
#[derive(Debug, Clone)]
pub struct ChangeGate {
    path: PathBuf,
}

impl ChangeGate {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        ChangeGate { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true when `text` differs from the last persisted report.
    ///
    /// A missing hash file is not an error: it reads as the empty string and
    /// therefore forces a change on the first ever run. On change the new
    /// digest is written to a sibling temp file and renamed into place, so a
    /// crash mid-write never leaves a truncated digest behind.
    pub fn check_and_update(&self, text: &str) -> Result<bool, GateError> {
        let new = digest(text);
        let old = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        if old == new {
            debug!("report unchanged ({})", new);
            return Ok(false);
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &new)?;
        fs::rename(&tmp, &self.path)?;
        debug!("report changed ({} -> {})", if old.is_empty() { "none" } else { &old }, new);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn scratch_path() -> PathBuf {
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "pihole-dashboard-gate-{}-{}",
            std::process::id(),
            n
        ))
    }

    #[test]
    fn digest_is_deterministic_and_sensitive() {
        let a = digest("report one");
        assert_eq!(a, digest("report one"));
        assert_eq!(a.len(), 40);
        assert_ne!(a, digest("report two"));
        // known vector
        assert_eq!(
            digest("abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn first_run_forces_change_and_persists() {
        let path = scratch_path();
        let gate = ChangeGate::new(&path);

        assert!(gate.check_and_update("hello").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), digest("hello"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unchanged_report_leaves_file_untouched() {
        let path = scratch_path();
        let gate = ChangeGate::new(&path);

        assert!(gate.check_and_update("stable").unwrap());
        let before = fs::read(&path).unwrap();

        assert!(!gate.check_and_update("stable").unwrap());
        assert_eq!(fs::read(&path).unwrap(), before);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn changed_report_overwrites_digest() {
        let path = scratch_path();
        let gate = ChangeGate::new(&path);

        gate.check_and_update("one").unwrap();
        assert!(gate.check_and_update("two").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), digest("two"));

        fs::remove_file(&path).unwrap();
    }
}
