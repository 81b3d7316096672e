//! Failures that end a prompt.
//!
//! None of these is fatal to the caller: every variant resolves to a rejected
//! write, and its `Display` text becomes the reason inside
//! [`Decision::Rejected`](crate::types::Decision::Rejected).

/// Why a prompt could not obtain a decision from the operator.
#[derive(Debug, thiserror::Error)]
pub enum PromptFailure {
    /// No input source is attached (e.g. running under CI or with stdin closed).
    #[error("no interactive input is available")]
    InputUnavailable,

    /// The input source returned end-of-file repeatedly.
    #[error("no input after {attempts} attempts")]
    InputExhausted {
        /// Number of consecutive empty reads before giving up.
        attempts: u32,
    },

    /// Reading from the input source failed.
    #[error("failed to read input: {0}")]
    InputRead(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_cause() {
        assert_eq!(
            PromptFailure::InputExhausted { attempts: 3 }.to_string(),
            "no input after 3 attempts"
        );
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        assert_eq!(
            PromptFailure::from(io).to_string(),
            "failed to read input: pipe closed"
        );
    }
}
