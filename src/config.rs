use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_COMPILE_TIMEOUT_MS, DEFAULT_COMPILER_ARGS, DEFAULT_GNUCPP_PATH,
    DEFAULT_MAX_OUTPUT_BYTES, DEFAULT_MAX_PARALLEL_COMPILATIONS, DEFAULT_MAX_PARALLEL_TESTS,
    DEFAULT_RUN_TIMEOUT_MS, DEFAULT_WORKSPACE_DIR_NAME, ENV_COMPILE_TIMEOUT_MS, ENV_COMPILER_ARGS,
    ENV_GNUCPP_PATH, ENV_MAX_OUTPUT_BYTES, ENV_MAX_PARALLEL_COMPILATIONS, ENV_MAX_PARALLEL_TESTS,
    ENV_RUN_TIMEOUT_MS, ENV_WORKSPACE_ROOT,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: String,
        value: String,
        reason: String,
    },
}

/// Everything the engine needs to know about its host, passed in at construction.
#[derive(Clone, Debug)]
pub struct JudgeConfig {
    pub workspace_root: PathBuf,
    pub compiler_path: PathBuf,
    pub compiler_args: Vec<String>,
    pub compile_timeout: Duration,
    pub run_timeout: Duration,
    pub max_parallel_tests: usize,
    pub max_parallel_compilations: usize,
    pub max_output_bytes: usize,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            workspace_root: std::env::temp_dir().join(DEFAULT_WORKSPACE_DIR_NAME),
            compiler_path: DEFAULT_GNUCPP_PATH.into(),
            compiler_args: DEFAULT_COMPILER_ARGS.iter().map(|a| a.to_string()).collect(),
            compile_timeout: Duration::from_millis(DEFAULT_COMPILE_TIMEOUT_MS),
            run_timeout: Duration::from_millis(DEFAULT_RUN_TIMEOUT_MS),
            max_parallel_tests: DEFAULT_MAX_PARALLEL_TESTS,
            max_parallel_compilations: DEFAULT_MAX_PARALLEL_COMPILATIONS,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

impl JudgeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from `lookup`, falling back to defaults for unset variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let workspace_root = lookup(ENV_WORKSPACE_ROOT)
            .map(PathBuf::from)
            .unwrap_or(defaults.workspace_root);
        let compiler_path = lookup(ENV_GNUCPP_PATH)
            .map(PathBuf::from)
            .unwrap_or(defaults.compiler_path);
        let compiler_args = lookup(ENV_COMPILER_ARGS)
            .map(|args| args.split_whitespace().map(String::from).collect())
            .unwrap_or(defaults.compiler_args);

        let compile_timeout_ms = parse_positive(&lookup, ENV_COMPILE_TIMEOUT_MS)?
            .unwrap_or(DEFAULT_COMPILE_TIMEOUT_MS);
        let run_timeout_ms =
            parse_positive(&lookup, ENV_RUN_TIMEOUT_MS)?.unwrap_or(DEFAULT_RUN_TIMEOUT_MS);

        Ok(Self {
            workspace_root,
            compiler_path,
            compiler_args,
            compile_timeout: Duration::from_millis(compile_timeout_ms),
            run_timeout: Duration::from_millis(run_timeout_ms),
            max_parallel_tests: parse_positive(&lookup, ENV_MAX_PARALLEL_TESTS)?
                .unwrap_or(defaults.max_parallel_tests),
            max_parallel_compilations: parse_positive(&lookup, ENV_MAX_PARALLEL_COMPILATIONS)?
                .unwrap_or(defaults.max_parallel_compilations),
            max_output_bytes: parse_positive(&lookup, ENV_MAX_OUTPUT_BYTES)?
                .unwrap_or(defaults.max_output_bytes),
        })
    }
}

fn parse_positive<F, T>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };

    let invalid = |reason: String| ConfigError::Invalid {
        var: var.to_string(),
        value: value.clone(),
        reason,
    };

    let parsed = value.trim().parse::<T>().map_err(|e| invalid(e.to_string()))?;
    if parsed <= T::default() {
        return Err(invalid("must be greater than zero".to_string()));
    }

    Ok(Some(parsed))
}
