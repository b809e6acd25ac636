pub const WORKSPACE_DIR_PREFIX: &str = "submission_";
pub const SOURCE_FILE_NAME: &str = "solution.cpp";
pub const BINARY_FILE_NAME: &str = "solution";

pub const DEFAULT_WORKSPACE_DIR_NAME: &str = "coderunner";
pub const DEFAULT_GNUCPP_PATH: &str = "/usr/bin/g++";
pub const DEFAULT_COMPILER_ARGS: &[&str] = &["-std=c++17", "-O2"];
pub const DEFAULT_COMPILE_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_RUN_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_MAX_PARALLEL_TESTS: usize = 4;
pub const DEFAULT_MAX_PARALLEL_COMPILATIONS: usize = 2;
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 1024 * 1024;

/// How long to keep collecting output after a timed out process was killed.
pub const CAPTURE_CHUNK_BYTES: usize = 8192;
pub const OUTPUT_DRAIN_GRACE_MS: u64 = 200;

pub const ENV_WORKSPACE_ROOT: &str = "JUDGE_WORKSPACE_ROOT";
pub const ENV_GNUCPP_PATH: &str = "GNUCPP_PATH";
pub const ENV_COMPILER_ARGS: &str = "JUDGE_COMPILER_ARGS";
pub const ENV_COMPILE_TIMEOUT_MS: &str = "JUDGE_COMPILE_TIMEOUT_MS";
pub const ENV_RUN_TIMEOUT_MS: &str = "JUDGE_RUN_TIMEOUT_MS";
pub const ENV_MAX_PARALLEL_TESTS: &str = "JUDGE_MAX_PARALLEL_TESTS";
pub const ENV_MAX_PARALLEL_COMPILATIONS: &str = "JUDGE_MAX_PARALLEL_COMPILATIONS";
pub const ENV_MAX_OUTPUT_BYTES: &str = "JUDGE_MAX_OUTPUT_BYTES";
