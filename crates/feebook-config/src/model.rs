use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User preferences for the Feebook CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    /// strftime pattern used when dates are shown; stored data and exports stay ISO.
    #[serde(default = "Config::default_date_format")]
    pub date_format: String,
    /// Whether a fresh ledger is populated with the sample students.
    #[serde(default = "Config::default_seed_sample_data")]
    pub seed_sample_data: bool,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for ledger documents. Defaults to `<base>/ledger`.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: Self::default_currency_symbol(),
            date_format: Self::default_date_format(),
            seed_sample_data: Self::default_seed_sample_data(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn default_currency_symbol() -> String {
        "₹".into()
    }

    pub fn default_date_format() -> String {
        "%d %b %Y".into()
    }

    pub fn default_seed_sample_data() -> bool {
        true
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_ledger_dir(&self, base: &Path) -> PathBuf {
        match &self.data_dir {
            Some(path) => path.clone(),
            None => base.join("ledger"),
        }
    }
}
