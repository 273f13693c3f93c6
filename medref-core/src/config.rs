//! Query and library configuration.
//!
//! Configuration is resolved once (usually at process startup) and handed to
//! repositories; query functions never read the environment themselves.

use crate::content::education::ComplexityLevel;
use thiserror::Error;

/// Environment variable selecting the empty-query policy (`all` or `none`).
pub const EMPTY_QUERY_ENV: &str = "MEDREF_EMPTY_QUERY";

/// Environment variable selecting the default complexity level (1-5).
pub const DEFAULT_LEVEL_ENV: &str = "MEDREF_DEFAULT_LEVEL";

/// Errors from resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// What an empty query string matches in substring search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyQueryPolicy {
    /// Every string contains the empty string, so every entry matches.
    #[default]
    MatchAll,
    /// An empty query matches nothing.
    MatchNone,
}

impl EmptyQueryPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "all" | "match-all" => Some(EmptyQueryPolicy::MatchAll),
            "none" | "match-none" => Some(EmptyQueryPolicy::MatchNone),
            _ => None,
        }
    }
}

/// Configuration applied by a repository to its queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryConfig {
    /// Empty-query behaviour for substring and field-scoped search.
    pub empty_query: EmptyQueryPolicy,
}

impl QueryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the empty-query policy.
    pub fn with_empty_query(mut self, policy: EmptyQueryPolicy) -> Self {
        self.empty_query = policy;
        self
    }
}

/// Library-wide settings for consumers such as the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryConfig {
    pub query: QueryConfig,

    /// Level shown when a caller does not ask for one.
    pub default_level: ComplexityLevel,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            query: QueryConfig::default(),
            default_level: ComplexityLevel::Patient,
        }
    }
}

impl LibraryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the query configuration.
    pub fn with_query(mut self, query: QueryConfig) -> Self {
        self.query = query;
        self
    }

    /// Set the default complexity level.
    pub fn with_default_level(mut self, level: ComplexityLevel) -> Self {
        self.default_level = level;
        self
    }

    /// Resolve configuration from the process environment.
    ///
    /// Unset variables keep their defaults; set but malformed ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolve configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(EMPTY_QUERY_ENV) {
            let policy = EmptyQueryPolicy::parse(&value).ok_or(ConfigError::InvalidValue {
                var: EMPTY_QUERY_ENV,
                value: value.clone(),
            })?;
            config.query = config.query.with_empty_query(policy);
        }

        if let Some(value) = lookup(DEFAULT_LEVEL_ENV) {
            let level = value
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(|n| ComplexityLevel::try_from(n).ok())
                .ok_or(ConfigError::InvalidValue {
                    var: DEFAULT_LEVEL_ENV,
                    value: value.clone(),
                })?;
            config.default_level = level;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = LibraryConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, LibraryConfig::default());
        assert_eq!(config.query.empty_query, EmptyQueryPolicy::MatchAll);
        assert_eq!(config.default_level, ComplexityLevel::Patient);
    }

    #[test]
    fn test_reads_policy_and_level() {
        let config = LibraryConfig::from_lookup(lookup_from(&[
            (EMPTY_QUERY_ENV, "None"),
            (DEFAULT_LEVEL_ENV, "4"),
        ]))
        .unwrap();
        assert_eq!(config.query.empty_query, EmptyQueryPolicy::MatchNone);
        assert_eq!(config.default_level, ComplexityLevel::MedicalStudent);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = LibraryConfig::from_lookup(lookup_from(&[(DEFAULT_LEVEL_ENV, "7")])).unwrap_err();
        assert!(err.to_string().contains(DEFAULT_LEVEL_ENV));

        assert!(LibraryConfig::from_lookup(lookup_from(&[(EMPTY_QUERY_ENV, "maybe")])).is_err());
    }

    #[test]
    fn test_builder() {
        let config = LibraryConfig::new()
            .with_query(QueryConfig::new().with_empty_query(EmptyQueryPolicy::MatchNone))
            .with_default_level(ComplexityLevel::Child);
        assert_eq!(config.query.empty_query, EmptyQueryPolicy::MatchNone);
        assert_eq!(config.default_level, ComplexityLevel::Child);
    }
}
