use seqflow_common::config::{Configuration, MODE_KEY, PARALLELISM_KEY};
use seqflow_common::error::{SeqError, SeqResult};
use seqflow_common::types::ExecutionMode;

#[derive(Debug, Clone)]
pub struct Environment {
    pub mode: ExecutionMode,
    pub config: Configuration,
}

impl Environment {
    pub fn sequential() -> Self {
        Self {
            mode: ExecutionMode::Sequential,
            config: Configuration::new(),
        }
    }

    /// Parallel environment with `threads` workers (0 = rayon's global pool).
    pub fn parallel(threads: usize) -> Self {
        let mut config = Configuration::new();
        config.put(MODE_KEY, ExecutionMode::Parallel.to_string());
        config.put(PARALLELISM_KEY, threads.to_string());
        Self {
            mode: ExecutionMode::Parallel,
            config,
        }
    }

    pub fn from_config(config: Configuration) -> SeqResult<Self> {
        let mode = config.get_mode()?;
        Ok(Self { mode, config })
    }

    pub fn parallelism(&self) -> SeqResult<usize> {
        self.config.get_usize(PARALLELISM_KEY, 0)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::sequential()
    }
}

pub fn ensure_parallel(env: &Environment) -> SeqResult<()> {
    match env.mode {
        ExecutionMode::Parallel => Ok(()),
        ExecutionMode::Sequential => Err(SeqError::InvalidArgument(
            "environment mode is sequential; parallel evaluation requires mode=parallel"
                .to_string(),
        )),
    }
}
