//! writegate-core: diff engine, renderer, and approval state machine.
//!
//! The crate answers one question for an automated writer: may this file be
//! written? It computes a line diff of the old and new content, renders it for
//! the operator, and drives a prompt loop over an [`input::InputChannel`] until
//! it has a [`types::Decision`]. It never touches the file itself.

pub mod command;
pub mod diff;
pub mod error;
pub mod input;
pub mod render;
pub mod session;
pub mod state;
pub mod types;

pub use command::Command;
pub use input::{InputChannel, Token};
pub use session::{ApprovalRequest, ConfirmationSession, SessionCore, SessionSettings};
pub use state::SessionState;
pub use types::{Decision, DiffLine, DiffStats, EditScript, ScriptKind};
