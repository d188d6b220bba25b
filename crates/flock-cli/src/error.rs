//! CLI error types.

use std::io;

/// Errors that stop a script run.
///
/// Network failures inside a script are not in here: the session reports
/// them inline and carries on.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Reading the script or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A script line could not be parsed.
    #[error("line {line}: {reason}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What was wrong.
        reason: ParseError,
    },

    /// Command line arguments are inconsistent.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Why a script line did not parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Opening quote without a closing one.
    #[error("unterminated quote")]
    UnterminatedQuote,

    /// First word is not a command.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// Wrong number of arguments.
    #[error("'{command}' expects {expected}")]
    Arity {
        /// Command name.
        command: &'static str,
        /// Usage hint.
        expected: &'static str,
    },

    /// An argument that should be a number is not.
    #[error("'{0}' is not a number")]
    NotANumber(String),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Io(_) => 74,
            Self::Parse { .. } => 65,
            Self::Config(_) => 78,
        }
    }
}
