//! A/B rotation of the published filter file.
//!
//! qBittorrent only reloads its IP filter when the configured path
//! changes, so each update is written to whichever of two slot files is
//! not in use and the client is then pointed at it.

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// File name of the first slot.
pub const SLOT_A: &str = "ipfilter-a.dat";

/// File name of the second slot.
pub const SLOT_B: &str = "ipfilter-b.dat";

/// The two slot files in an output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPair {
    a: PathBuf,
    b: PathBuf,
}

/// Outcome of slot selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Slot to write the new list into.
    pub target: PathBuf,
    /// Slot holding the list currently published.
    pub current: PathBuf,
}

impl SlotPair {
    /// Locates the slots in `dir`, made absolute against the working directory.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the working directory cannot be determined.
    pub fn in_dir(dir: &Path) -> io::Result<Self> {
        let dir = std::path::absolute(dir)?;
        Ok(Self {
            a: dir.join(SLOT_A),
            b: dir.join(SLOT_B),
        })
    }

    /// Returns the path of slot A.
    #[must_use]
    pub fn a(&self) -> &Path {
        &self.a
    }

    /// Returns the path of slot B.
    #[must_use]
    pub fn b(&self) -> &Path {
        &self.b
    }

    /// Picks the slot to write.
    ///
    /// A missing slot is filled first (A before B). With both present the
    /// older one is overwritten; on equal times B is. When the chosen slot
    /// is the one qBittorrent currently reads (`in_use`) the roles swap.
    #[must_use]
    pub fn select(&self, in_use: Option<&Path>) -> Selection {
        let (target, current) = match (modified(&self.a), modified(&self.b)) {
            (None, _) => (&self.a, &self.b),
            (Some(_), None) => (&self.b, &self.a),
            (Some(a), Some(b)) if a < b => (&self.a, &self.b),
            (Some(_), Some(_)) => (&self.b, &self.a),
        };

        let (target, current) = if in_use.is_some_and(|p| p == target.as_path()) {
            tracing::debug!("{} is in use, writing {} instead", target.display(), current.display());
            (current, target)
        } else {
            (target, current)
        };

        Selection {
            target: target.clone(),
            current: current.clone(),
        }
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
