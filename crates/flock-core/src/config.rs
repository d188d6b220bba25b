//! Network configuration.

/// Registry settings.
///
/// Credential bounds are counted in characters and inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Display name of the network.
    pub name: String,
    /// Shortest accepted credential.
    pub min_credential_len: usize,
    /// Longest accepted credential.
    pub max_credential_len: usize,
}

impl NetworkConfig {
    /// Default config with a custom name.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Whether a credential of `len` characters is accepted.
    pub fn accepts_credential_len(&self, len: usize) -> bool {
        (self.min_credential_len..=self.max_credential_len).contains(&len)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { name: "Flock".to_string(), min_credential_len: 4, max_credential_len: 8 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_credential_bounds() {
        let config = NetworkConfig::default();
        assert!(!config.accepts_credential_len(3));
        assert!(config.accepts_credential_len(4));
        assert!(config.accepts_credential_len(8));
        assert!(!config.accepts_credential_len(9));
    }
}
