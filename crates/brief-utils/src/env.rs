//! Environment variable helpers
//!
//! Configuration code reads variables through [`EnvLookup`] instead of
//! `std::env` directly, so tests can supply a fixed map.

use std::collections::HashMap;

/// Source of environment-style key/value settings
pub trait EnvLookup {
    /// Return the raw value for `key`, if present
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl EnvLookup for HashMap<&str, &str> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).map(|v| (*v).to_string())
    }
}

/// Return the first of `keys` that is set to a non-blank value (trimmed)
pub fn first_non_empty(env: &impl EnvLookup, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| env.get(key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
