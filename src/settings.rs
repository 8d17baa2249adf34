use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TenCentsError};
use crate::importer::AmountPolicy;
use crate::models::KindFilter;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_data_dir_string")]
    pub data_dir: String,
    #[serde(default = "default_currency_label")]
    pub currency_label: String,
    #[serde(default = "default_kind")]
    pub default_kind: String,
    /// Reject rows whose amount is not a number instead of reading them as 0.
    #[serde(default)]
    pub strict_amounts: bool,
}

fn default_currency_label() -> String {
    "KES".to_string()
}

fn default_kind() -> String {
    "expense".to_string()
}

fn default_data_dir_string() -> String {
    default_data_dir().to_string_lossy().to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir_string(),
            currency_label: default_currency_label(),
            default_kind: default_kind(),
            strict_amounts: false,
        }
    }
}

impl Settings {
    pub fn amount_policy(&self) -> AmountPolicy {
        if self.strict_amounts {
            AmountPolicy::Strict
        } else {
            AmountPolicy::Lenient
        }
    }

    /// Falls back to expenses when the stored value is not a known filter.
    pub fn kind_filter(&self) -> KindFilter {
        self.default_kind.parse().unwrap_or_default()
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// Apply a `key=value` assignment as given on the command line.
    pub fn apply(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| TenCentsError::Settings(format!("expected key=value, got '{assignment}'")))?;
        let value = value.trim();
        match key.trim() {
            "data_dir" => self.data_dir = shellexpand_path(value),
            "currency_label" => self.currency_label = value.to_string(),
            "default_kind" => {
                let kind: KindFilter = value.parse()?;
                self.default_kind = kind.to_string();
            }
            "strict_amounts" => {
                self.strict_amounts = value.parse().map_err(|_| {
                    TenCentsError::Settings(format!("strict_amounts must be true or false, got '{value}'"))
                })?;
            }
            other => return Err(TenCentsError::Settings(format!("unknown setting '{other}'"))),
        }
        Ok(())
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("tencents")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("tencents")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| TenCentsError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.currency_label, "KES");
        assert_eq!(s.kind_filter(), KindFilter::Expense);
        assert_eq!(s.amount_policy(), AmountPolicy::Lenient);
        assert!(!s.data_dir.is_empty());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"data_dir": "/tmp/test", "strict_amounts": true}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.data_dir, "/tmp/test");
        assert_eq!(s.currency_label, "KES");
        assert_eq!(s.amount_policy(), AmountPolicy::Strict);
    }

    #[test]
    fn test_unknown_default_kind_falls_back() {
        let s = Settings {
            default_kind: "transfers".into(),
            ..Settings::default()
        };
        assert_eq!(s.kind_filter(), KindFilter::Expense);
    }

    #[test]
    fn test_apply_assignments() {
        let mut s = Settings::default();
        s.apply("currency_label=USD").unwrap();
        s.apply("default_kind = all").unwrap();
        s.apply("strict_amounts=true").unwrap();
        s.apply("data_dir=/srv/tencents").unwrap();
        assert_eq!(s.currency_label, "USD");
        assert_eq!(s.kind_filter(), KindFilter::All);
        assert!(s.strict_amounts);
        assert_eq!(s.data_dir, "/srv/tencents");
    }

    #[test]
    fn test_apply_rejects_bad_input() {
        let mut s = Settings::default();
        assert!(s.apply("currency_label").is_err());
        assert!(s.apply("colour=blue").is_err());
        assert!(s.apply("strict_amounts=maybe").is_err());
        assert!(s.apply("default_kind=gifts").is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            data_dir: "/tmp/test".to_string(),
            currency_label: "EUR".to_string(),
            default_kind: "income".to_string(),
            strict_amounts: true,
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        std::fs::write(&path, &json).unwrap();
        let loaded: Settings = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.currency_label, "EUR");
        assert_eq!(loaded.kind_filter(), KindFilter::Income);
    }
}
