//! Deployment environments
//!
//! The store serves exactly two environments. Their names come from
//! configuration; nothing in the crate hard-codes them beyond the defaults.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FaqStoreError, FaqStoreResult};

/// A validated environment name (lowercase `[a-z0-9_-]+`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Environment(String);

impl Environment {
    /// Validate and wrap an environment name
    pub fn parse(name: &str) -> Result<Self, String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("environment name cannot be empty".into());
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(format!(
                "environment name '{}' must be lowercase alphanumeric, dash or underscore",
                name
            ));
        }
        Ok(Self(name.to_string()))
    }

    /// The environment name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Environment> for String {
    fn from(env: Environment) -> Self {
        env.0
    }
}

/// The two environments this store manages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSet {
    envs: [Environment; 2],
}

impl EnvironmentSet {
    /// Build a set from two distinct names
    pub fn new(first: &str, second: &str) -> FaqStoreResult<Self> {
        let first = Environment::parse(first).map_err(FaqStoreError::Config)?;
        let second = Environment::parse(second).map_err(FaqStoreError::Config)?;
        if first == second {
            return Err(FaqStoreError::Config(format!(
                "environments must be distinct, got '{}' twice",
                first
            )));
        }
        Ok(Self {
            envs: [first, second],
        })
    }

    /// Slot index of an environment, if it belongs to this set
    pub fn index_of(&self, env: &Environment) -> Option<usize> {
        self.envs.iter().position(|e| e == env)
    }

    /// Resolve a name to one of the configured environments
    pub fn resolve(&self, name: &str) -> FaqStoreResult<Environment> {
        let name = name.trim();
        self.envs
            .iter()
            .find(|e| e.as_str() == name)
            .cloned()
            .ok_or_else(|| FaqStoreError::UnknownEnvironment(name.to_string()))
    }

    /// Check membership
    pub fn contains(&self, env: &Environment) -> bool {
        self.index_of(env).is_some()
    }

    /// Iterate environments in configuration order
    pub fn iter(&self) -> impl Iterator<Item = &Environment> {
        self.envs.iter()
    }
}

impl Default for EnvironmentSet {
    fn default() -> Self {
        Self {
            envs: [
                Environment("stunting".to_string()),
                Environment("ppid".to_string()),
            ],
        }
    }
}
