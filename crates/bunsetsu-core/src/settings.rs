//! Global engine settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub splitter: SplitterSettings,
    pub ordering: OrderingSettings,
    pub matrix: MatrixSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SplitterSettings {
    pub max_word_len: usize,
    pub lattice_node_max: usize,
    pub poisson_lambda: f64,
    pub min_segment_len: usize,
    pub max_segment_len: usize,
    pub min_rentai_segment_len: usize,
    pub dep_strong_bonus_num: i64,
    pub dep_strong_bonus_den: i64,
    pub high_freq_threshold: i64,
    pub enable_ochaire: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderingSettings {
    pub history_depth: usize,
    pub max_indep_pair: usize,
    pub max_ochaire_entries: usize,
    pub max_ochaire_len: usize,
    pub max_history_entries: usize,
    pub max_expand_pairs: usize,
    pub candidate_score_cap: i64,
    #[serde(default = "default_wal_compact_threshold")]
    pub wal_compact_threshold: usize,
}

fn default_wal_compact_threshold() -> usize {
    64
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatrixSettings {
    pub max_failure: usize,
    pub max_growth_rounds: usize,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings =
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_non_negative {
        ($section:ident . $field:ident) => {
            if s.$section.$field < 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be non-negative".to_string(),
                });
            }
        };
    }
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    check_positive_usize!(splitter.max_word_len);
    check_positive_usize!(splitter.lattice_node_max);
    check_positive_usize!(splitter.min_segment_len);
    check_positive_usize!(splitter.max_segment_len);
    check_positive_usize!(splitter.min_rentai_segment_len);
    check_non_negative!(splitter.dep_strong_bonus_num);
    check_non_negative!(splitter.high_freq_threshold);
    if s.splitter.dep_strong_bonus_den <= 0 {
        return Err(SettingsError::InvalidValue {
            field: "splitter.dep_strong_bonus_den".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if s.splitter.poisson_lambda <= 0.0 {
        return Err(SettingsError::InvalidValue {
            field: "splitter.poisson_lambda".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if s.splitter.min_segment_len > s.splitter.max_segment_len {
        return Err(SettingsError::InvalidValue {
            field: "splitter.min_segment_len".to_string(),
            reason: "must not exceed splitter.max_segment_len".to_string(),
        });
    }

    check_positive_usize!(ordering.history_depth);
    check_positive_usize!(ordering.max_indep_pair);
    check_positive_usize!(ordering.max_ochaire_entries);
    check_positive_usize!(ordering.max_ochaire_len);
    check_positive_usize!(ordering.max_history_entries);
    check_positive_usize!(ordering.max_expand_pairs);
    check_positive_usize!(ordering.wal_compact_threshold);
    check_non_negative!(ordering.candidate_score_cap);

    check_positive_usize!(matrix.max_failure);
    check_positive_usize!(matrix.max_growth_rounds);

    Ok(())
}
