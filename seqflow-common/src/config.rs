use crate::error::{SeqError, SeqResult};
use crate::types::ExecutionMode;
use std::collections::HashMap;

pub const MODE_KEY: &str = "seqflow.mode";
pub const PARALLELISM_KEY: &str = "seqflow.parallelism";

#[derive(Debug, Clone, Default)]
pub struct Configuration {
    config: HashMap<String, String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self {
            config: HashMap::new(),
        }
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.config.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.config.get(key)
    }

    pub fn get_string(&self, key: &str, default_value: &str) -> String {
        self.config
            .get(key)
            .cloned()
            .unwrap_or_else(|| default_value.to_string())
    }

    pub fn get_usize(&self, key: &str, default_value: usize) -> SeqResult<usize> {
        match self.config.get(key) {
            None => Ok(default_value),
            Some(raw) => raw.trim().parse().map_err(|e| {
                SeqError::InvalidArgument(format!("config {key}={raw:?} is not a count: {e}"))
            }),
        }
    }

    pub fn get_mode(&self) -> SeqResult<ExecutionMode> {
        self.config
            .get(MODE_KEY)
            .map(|raw| raw.parse::<ExecutionMode>())
            .transpose()
            .map(Option::unwrap_or_default)
    }
}
