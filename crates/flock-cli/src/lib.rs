//! Flock command line front end.
//!
//! Reads a script of commands (see [`command`]), runs them against a
//! [`flock_core::Network`] and renders the resulting actions as text.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod command;
pub mod error;
pub mod render;
pub mod session;

pub use command::Command;
pub use error::{CliError, ParseError};
pub use session::{ScriptStats, Session};

use flock_core::NetworkConfig;

/// Build a network config, checking that the credential bounds make sense.
///
/// # Errors
///
/// Returns `CliError::Config` for an empty name or `min > max`.
pub fn network_config(
    name: &str,
    min_credential_len: usize,
    max_credential_len: usize,
) -> Result<NetworkConfig, CliError> {
    if name.trim().is_empty() {
        return Err(CliError::Config("network name must not be empty".to_string()));
    }
    if min_credential_len > max_credential_len {
        return Err(CliError::Config(format!(
            "min credential length {min_credential_len} exceeds max {max_credential_len}"
        )));
    }

    Ok(NetworkConfig { name: name.to_string(), min_credential_len, max_credential_len })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_inverted_bounds() {
        assert!(matches!(network_config("X", 9, 4), Err(CliError::Config(_))));
        assert!(matches!(network_config("  ", 4, 8), Err(CliError::Config(_))));

        let config = network_config("Twitter", 2, 3).unwrap();
        assert_eq!(config.name, "Twitter");
        assert!(config.accepts_credential_len(2));
        assert!(!config.accepts_credential_len(4));
    }
}
