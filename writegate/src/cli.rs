//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::input::InteractionMode;

/// Review proposed file changes as diffs and apply only the approved ones.
#[derive(Debug, Parser)]
#[command(name = "writegate", version)]
pub struct Cli {
    /// Replace TARGET with the contents of SOURCE. Repeatable.
    #[arg(short, long = "write", value_name = "TARGET=SOURCE", value_parser = parse_write)]
    pub writes: Vec<WriteSpec>,

    /// Delete TARGET. Repeatable.
    #[arg(short, long = "delete", value_name = "TARGET")]
    pub deletes: Vec<PathBuf>,

    /// Approve every change without prompting.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Input style; overrides the config file.
    #[arg(long, value_enum)]
    pub interaction: Option<InteractionMode>,

    /// Disable colored diff output.
    #[arg(long)]
    pub no_color: bool,

    /// Config file to use instead of the default location.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// One `TARGET=SOURCE` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSpec {
    pub target: PathBuf,
    pub source: PathBuf,
}

/// A change to review, in the order it will be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Replace or create `target` with the contents of `source`.
    Write { target: PathBuf, source: PathBuf },
    /// Remove `target`.
    Delete { target: PathBuf },
}

impl Change {
    pub fn target(&self) -> &PathBuf {
        match self {
            Change::Write { target, .. } | Change::Delete { target } => target,
        }
    }
}

impl Cli {
    /// All requested changes: writes first, then deletions.
    pub fn changes(&self) -> Vec<Change> {
        let writes = self.writes.iter().map(|w| Change::Write {
            target: w.target.clone(),
            source: w.source.clone(),
        });
        let deletes = self
            .deletes
            .iter()
            .map(|t| Change::Delete { target: t.clone() });
        writes.chain(deletes).collect()
    }
}

fn parse_write(raw: &str) -> Result<WriteSpec, String> {
    match raw.split_once('=') {
        Some((target, source)) if !target.is_empty() && !source.is_empty() => Ok(WriteSpec {
            target: PathBuf::from(target),
            source: PathBuf::from(source),
        }),
        _ => Err(format!("expected TARGET=SOURCE, got {raw:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_writes_and_deletes_in_order() {
        let cli = Cli::try_parse_from([
            "writegate",
            "--write",
            "src/a.rs=/tmp/a.rs",
            "-w",
            "b.txt=b.new",
            "--delete",
            "old.txt",
            "--yes",
            "--interaction",
            "plain",
        ])
        .unwrap();
        assert!(cli.yes);
        assert_eq!(cli.interaction, Some(InteractionMode::Plain));
        assert_eq!(
            cli.changes(),
            vec![
                Change::Write {
                    target: "src/a.rs".into(),
                    source: "/tmp/a.rs".into()
                },
                Change::Write {
                    target: "b.txt".into(),
                    source: "b.new".into()
                },
                Change::Delete {
                    target: "old.txt".into()
                },
            ]
        );
    }

    #[test]
    fn malformed_write_spec_is_rejected() {
        assert!(Cli::try_parse_from(["writegate", "--write", "nopair"]).is_err());
        assert!(Cli::try_parse_from(["writegate", "--write", "=src"]).is_err());
        assert!(Cli::try_parse_from(["writegate", "--write", "dst="]).is_err());
    }

    #[test]
    fn no_arguments_parse_to_no_changes() {
        let cli = Cli::try_parse_from(["writegate"]).unwrap();
        assert!(cli.changes().is_empty());
    }
}
