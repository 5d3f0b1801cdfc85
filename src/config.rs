//! Runtime configuration read from the environment.

use std::env;
use std::path::PathBuf;

use tracing::warn;

use crate::data::loader::DEFAULT_DATA_DIR;
use crate::data::normalize::{NameNormalizer, DEFAULT_SUBSTITUTIONS};

pub const DATA_DIR_ENV: &str = "AZUR_STATS_DATA_DIR";
pub const SUBSTITUTIONS_ENV: &str = "AZUR_STATS_SUBSTITUTIONS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the `<Class>_Level_<N>.csv` tables.
    pub data_dir: PathBuf,
    /// Name-normalizer symbol substitutions, source token → symbol.
    pub substitutions: Vec<(String, String)>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            substitutions: DEFAULT_SUBSTITUTIONS
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }
}

impl AppConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `AZUR_STATS_DATA_DIR` - table directory (default: `ship_stats_data`)
    /// - `AZUR_STATS_SUBSTITUTIONS` - extra `word=symbol` pairs separated by `;`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(raw) = read_env(SUBSTITUTIONS_ENV) {
            config.add_substitutions(&raw);
        }

        config
    }

    /// Parse `word=symbol;word=symbol` and add the pairs. A later pair for an
    /// existing word replaces it.
    pub fn add_substitutions(&mut self, raw: &str) {
        for pair in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((from, to)) = pair.split_once('=') else {
                warn!(pair, "ignoring substitution without '='");
                continue;
            };
            let from = from.trim().to_lowercase();
            if from.is_empty() {
                warn!(pair, "ignoring substitution with an empty word");
                continue;
            }
            self.substitutions.retain(|(existing, _)| *existing != from);
            self.substitutions.push((from, to.trim().to_string()));
        }
    }

    pub fn normalizer(&self) -> NameNormalizer {
        NameNormalizer::with_substitutions(self.substitutions.iter().cloned())
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::AppConfig;

    #[test]
    fn substitutions_extend_and_override_defaults() {
        let mut config = AppConfig::default();
        config.add_substitutions("meta=(meta); broken ;MUSE=μ; =x");
        assert_eq!(
            config.substitutions,
            vec![
                ("meta".to_string(), "(meta)".to_string()),
                ("muse".to_string(), "μ".to_string()),
            ]
        );
    }
}
