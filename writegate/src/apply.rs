//! Runs each requested change through the approval session and applies the
//! approved ones.
//!
//! This is the only place that touches the target files. The session decides;
//! this module reads the current and proposed content beforehand and performs
//! the write or deletion afterwards, and only on `Decision::Approved`.

use std::io;
use std::path::Path;

use tracing::{info, warn};
use writegate_core::{ConfirmationSession, Decision, InputChannel};

use crate::cli::Change;
use crate::error::AppError;

/// Tally of decisions over one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub applied: usize,
    pub rejected: usize,
    pub skipped: usize,
}

impl Outcome {
    /// `true` when nothing was refused.
    pub fn all_applied(&self) -> bool {
        self.rejected == 0
    }
}

/// Reviews and applies `changes` in order.
///
/// # Errors
///
/// Stops at the first I/O failure or prompt error. Changes already applied
/// stay applied.
pub async fn apply_all<C: InputChannel + 'static>(
    session: &ConfirmationSession<C>,
    changes: &[Change],
) -> Result<Outcome, AppError> {
    let mut outcome = Outcome::default();
    for change in changes {
        let target = change.target();
        let old = read_existing(target).await?;
        let new = match change {
            Change::Write { source, .. } => Some(read(source).await?),
            Change::Delete { .. } => None,
        };
        if old.is_none() && new.is_none() {
            warn!(target = %target.display(), "nothing to delete");
            eprintln!("skipped {}: file does not exist", target.display());
            outcome.skipped += 1;
            continue;
        }

        let shown = target.display().to_string();
        let decision = session
            .request(&shown, old.is_some(), old.as_deref(), new.as_deref())
            .await;
        match decision {
            Decision::Approved => {
                match &new {
                    Some(content) => write(target, content).await?,
                    None => delete(target).await?,
                }
                info!(target = %shown, "applied");
                eprintln!("applied {shown}");
                outcome.applied += 1;
            }
            Decision::Rejected(reason) => {
                match reason {
                    Some(reason) => eprintln!("rejected {shown}: {reason}"),
                    None => eprintln!("rejected {shown}"),
                }
                outcome.rejected += 1;
            }
            Decision::Error(message) => return Err(AppError::Prompt(message)),
        }
    }
    Ok(outcome)
}

async fn read(path: &Path) -> Result<String, AppError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Reads the current target; a missing file is `None`, not an error.
async fn read_existing(path: &Path) -> Result<Option<String>, AppError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(AppError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

async fn write(path: &Path, content: &str) -> Result<(), AppError> {
    let wrap = |source| AppError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(wrap)?;
    }
    tokio::fs::write(path, content).await.map_err(wrap)
}

async fn delete(path: &Path) -> Result<(), AppError> {
    tokio::fs::remove_file(path)
        .await
        .map_err(|source| AppError::Delete {
            path: path.to_path_buf(),
            source,
        })
}
