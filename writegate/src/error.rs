//! Errors that stop the `writegate` binary.
//!
//! A rejected change is not an error: it is reported and the run continues.
//! These variants cover the cases where the run itself cannot go on.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Neither `--write` nor `--delete` was given.
    #[error("nothing to do: pass --write TARGET=SOURCE or --delete TARGET")]
    NoChanges,

    /// Reading a source or the current target failed.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing an approved change failed.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Deleting an approved target failed.
    #[error("failed to delete {}: {source}", .path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The approval prompt could not be shown.
    #[error("approval prompt failed: {0}")]
    Prompt(String),

    /// Startup failed (runtime, signal handler).
    #[error("failed to start: {0}")]
    Startup(#[source] io::Error),

    /// SIGTERM arrived while changes were pending.
    #[error("terminated before all changes were reviewed")]
    Terminated,
}
