use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_DURATION_MINUTES: i32 = 999;

/// Filters applied before films are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingConfig {
    pub exclude_not_present: bool,
    pub max_duration_minutes: i32,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            exclude_not_present: false,
            max_duration_minutes: DEFAULT_MAX_DURATION_MINUTES,
        }
    }
}

/// Raw filter input as submitted by the ranking form or query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingFilters {
    #[serde(default)]
    pub exclude_not_present: Option<String>,
    #[serde(default)]
    pub max_duration: Option<String>,
}

/// Problems with the filter input that were recovered from. Shown to the caller, never
/// fatal to the ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterWarning {
    InvalidMaxDuration { input: String, applied: i32 },
}

impl FilterWarning {
    pub fn message(&self) -> String {
        match self {
            FilterWarning::InvalidMaxDuration { input, .. } => format!(
                "Invalid maximum film duration input '{input}'! Filter not applied."
            ),
        }
    }
}

impl RankingFilters {
    /// Resolves the raw input into a config, falling back to `default_max_duration` when the
    /// duration is missing, blank or not an integer.
    pub fn resolve(&self, default_max_duration: i32) -> (RankingConfig, Vec<FilterWarning>) {
        let mut warnings = Vec::new();

        let exclude_not_present = self
            .exclude_not_present
            .as_deref()
            .map(parse_flag)
            .unwrap_or(false);

        let max_duration_minutes = match self.max_duration.as_deref().map(str::trim) {
            None | Some("") => default_max_duration,
            Some(raw) => match raw.parse::<i32>() {
                Ok(value) => value,
                Err(_) => {
                    warnings.push(FilterWarning::InvalidMaxDuration {
                        input: raw.to_string(),
                        applied: default_max_duration,
                    });
                    default_max_duration
                }
            },
        };

        (
            RankingConfig {
                exclude_not_present,
                max_duration_minutes,
            },
            warnings,
        )
    }
}

/// Checkbox semantics: present and not an explicit negative counts as set.
fn parse_flag(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "off" | "no"
    )
}
