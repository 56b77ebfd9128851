use serde::{Deserialize, Serialize};

/// Root of `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
}

/// Feature flags gating optional side effects. All default off so a
/// missing or unparseable config file degrades to in-app delivery only.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Outbound email via Mailgun for case approval/rejection events.
    #[serde(default)]
    pub mailgun: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_from_toml() {
        let config: AppConfig = toml::from_str("[features]\nmailgun = true\n").unwrap();
        assert!(config.features.mailgun);
    }

    #[test]
    fn missing_sections_default_off() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(!config.features.mailgun);
    }
}
