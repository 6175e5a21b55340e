//! Telex-family configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All generic options from `libviet_core::Config` (flattened via serde)
//! - The quick-entry shortcuts specific to letter-based conventions
//! - The f/j/w/z literal-consonant escape for typing foreign names

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelexConfig {
    /// Base configuration fields (method, code table, placement style, ...)
    #[serde(flatten)]
    pub base: libviet_core::Config,

    /// Doubled-consonant expansions: cc → ch, gg → gh, kk → kh, nn → ng,
    /// pp → ph, qq → qu, tt → th
    pub quick_telex: bool,

    /// Word-initial expansions: f → ph, j → gi
    pub quick_start_consonant: bool,

    /// Post-nucleus expansions: g → ng, h → nh
    pub quick_end_consonant: bool,

    /// Treat f/j/w/z as literal letters instead of foreign-word evidence
    pub allow_consonant_zfwj: bool,
}

impl Default for TelexConfig {
    fn default() -> Self {
        Self {
            base: libviet_core::Config::default(),
            quick_telex: false,
            quick_start_consonant: false,
            quick_end_consonant: false,
            allow_consonant_zfwj: false,
        }
    }
}

impl TelexConfig {
    /// Convert into the base config.
    pub fn into_base(self) -> libviet_core::Config {
        self.base
    }

    /// Get a reference to the base config.
    pub fn base(&self) -> &libviet_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config.
    pub fn base_mut(&mut self) -> &mut libviet_core::Config {
        &mut self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libviet_core::{CodeTable, InputMethod};

    #[test]
    fn test_defaults() {
        let config = TelexConfig::default();
        assert_eq!(config.base.input_method, InputMethod::Telex);
        assert!(!config.quick_telex);
        assert!(!config.allow_consonant_zfwj);
    }

    #[test]
    fn test_flattened_serde() {
        let mut config = TelexConfig::default();
        config.base.code_table = CodeTable::VietnameseLocaleCp1258;
        config.quick_telex = true;

        let toml_str = toml::to_string(&config).unwrap();
        // Base fields serialize at the top level, not nested.
        assert!(toml_str.contains("code_table"));
        assert!(!toml_str.contains("[base]"));

        let parsed: TelexConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.base.code_table, CodeTable::VietnameseLocaleCp1258);
        assert!(parsed.quick_telex);
    }
}
