//! Session configuration with TOML support for the tunable parameters.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use veriflow_types::{SessionParams, StepDefinition};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("a verification flow needs at least one step")]
    NoSteps,

    #[error("duplicate step id: {0}")]
    DuplicateStepId(String),

    #[error("duplicate step order: {0}")]
    DuplicateOrder(u32),

    #[error("could not read config file: {0}")]
    Io(String),

    #[error("could not parse config file: {0}")]
    Parse(String),
}

/// The full configuration of one verification flow: the ordered step
/// definitions plus the tunable parameters.
///
/// Step definitions carry code (custom validation predicates), so they are
/// built programmatically by the host; only [`SessionParams`] can come
/// from a TOML file.
pub struct SessionConfig {
    pub steps: Vec<StepDefinition>,
    pub params: SessionParams,
}

impl SessionConfig {
    /// Validate and normalize a flow definition. Steps are sorted by their
    /// `order`; ids and orders must be unique.
    pub fn new(mut steps: Vec<StepDefinition>, params: SessionParams) -> Result<Self, ConfigError> {
        if steps.is_empty() {
            return Err(ConfigError::NoSteps);
        }
        steps.sort_by_key(|step| step.order);

        for window in steps.windows(2) {
            if window[0].order == window[1].order {
                return Err(ConfigError::DuplicateOrder(window[0].order));
            }
        }
        let mut ids: Vec<&str> = steps.iter().map(|step| step.id.as_str()).collect();
        ids.sort_unstable();
        for window in ids.windows(2) {
            if window[0] == window[1] {
                return Err(ConfigError::DuplicateStepId(window[0].to_string()));
            }
        }

        Ok(Self { steps, params })
    }

    /// Load [`SessionParams`] from a TOML file. Missing fields fall back
    /// to their defaults.
    pub fn params_from_toml_file(path: impl AsRef<Path>) -> Result<SessionParams, ConfigError> {
        let raw =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::params_from_toml(&raw)
    }

    /// Parse [`SessionParams`] from a TOML string.
    pub fn params_from_toml(raw: &str) -> Result<SessionParams, ConfigError> {
        #[derive(Deserialize)]
        struct ParamsFile {
            #[serde(default)]
            params: Option<SessionParams>,
        }
        let file: ParamsFile = toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(file.params.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_sorted_by_order() {
        let config = SessionConfig::new(
            vec![
                StepDefinition::new("address", "Address", 2, 2),
                StepDefinition::new("personal", "Personal", 0, 1),
                StepDefinition::new("identity", "Identity", 1, 1),
            ],
            SessionParams::default(),
        )
        .unwrap();

        let ids: Vec<&str> = config.steps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["personal", "identity", "address"]);
    }

    #[test]
    fn duplicate_orders_are_rejected() {
        let result = SessionConfig::new(
            vec![
                StepDefinition::new("a", "A", 0, 1),
                StepDefinition::new("b", "B", 0, 1),
            ],
            SessionParams::default(),
        );
        assert!(matches!(result, Err(ConfigError::DuplicateOrder(0))));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = SessionConfig::new(
            vec![
                StepDefinition::new("a", "A", 0, 1),
                StepDefinition::new("a", "A again", 1, 1),
            ],
            SessionParams::default(),
        );
        assert!(matches!(result, Err(ConfigError::DuplicateStepId(_))));
    }

    #[test]
    fn empty_flow_is_rejected() {
        assert!(matches!(
            SessionConfig::new(vec![], SessionParams::default()),
            Err(ConfigError::NoSteps)
        ));
    }

    #[test]
    fn params_parse_from_toml_with_defaults() {
        let params = SessionConfig::params_from_toml(
            r#"
            [params]
            debounce_ms = 800
            level_thresholds = [3, 5]
            "#,
        )
        .unwrap();
        assert_eq!(params.debounce_ms, 800);
        assert_eq!(params.level_thresholds, vec![3, 5]);
        // Unspecified fields keep their defaults.
        assert_eq!(params.max_document_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn empty_toml_yields_default_params() {
        let params = SessionConfig::params_from_toml("").unwrap();
        assert_eq!(params.debounce_ms, 1_500);
    }
}
