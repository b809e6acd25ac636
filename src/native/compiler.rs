use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use itertools::Itertools;
use tokio::{fs, process::Command, time::timeout};

use crate::config::JudgeConfig;
use crate::core::{
    domain::Artifact,
    traits::compiler::{CompileError, Compiler},
    workspace::Workspace,
};

/// Runs the configured GNU C++ compiler as a child process.
#[derive(Clone, Debug)]
pub struct NativeCompiler {
    compiler_path: PathBuf,
    args: Vec<String>,
    time_limit: Duration,
}

impl NativeCompiler {
    pub fn new<T>(compiler_path: T, args: Vec<String>, time_limit: Duration) -> Self
    where
        T: AsRef<Path>,
    {
        NativeCompiler {
            compiler_path: compiler_path.as_ref().into(),
            args,
            time_limit,
        }
    }

    pub fn from_config(config: &JudgeConfig) -> Self {
        Self::new(
            &config.compiler_path,
            config.compiler_args.clone(),
            config.compile_timeout,
        )
    }
}

#[async_trait::async_trait]
impl Compiler for NativeCompiler {
    #[tracing::instrument(skip_all, fields(submission_id = %workspace.id()))]
    async fn compile(&self, source: &str, workspace: &Workspace) -> Result<Artifact, CompileError> {
        fs::write(workspace.source_path(), source)
            .await
            .map_err(|e| CompileError::Internal {
                msg: format!("Failed to write source file: {}", e),
            })?;

        let mut cmd = Command::new(&self.compiler_path);
        cmd.args(&self.args)
            .arg(workspace.source_path())
            .arg("-o")
            .arg(workspace.binary_path())
            .current_dir(workspace.dir())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        tracing::debug!("Compiler command: {:?}", cmd);

        let child = cmd.spawn().map_err(|e| CompileError::Internal {
            msg: format!("Failed to execute {}: {}", self.compiler_path.display(), e),
        })?;

        // Dropping the child on timeout kills the compiler.
        let output = match timeout(self.time_limit, child.wait_with_output()).await {
            Ok(output) => output.map_err(|e| CompileError::Internal {
                msg: format!("Failed to wait for compiler: {}", e),
            })?,
            Err(_) => {
                return Err(CompileError::TimedOut {
                    limit_ms: self.time_limit.as_millis() as u64,
                });
            }
        };

        let diagnostics = [&output.stdout, &output.stderr]
            .iter()
            .map(|stream| String::from_utf8_lossy(stream).trim_end().to_string())
            .filter(|text| !text.is_empty())
            .join("\n");

        if !output.status.success() {
            let diagnostics = if diagnostics.is_empty() {
                format!("{} {}", self.compiler_path.display(), output.status)
            } else {
                diagnostics
            };
            return Err(CompileError::CompilationFailed { diagnostics });
        }

        if !fs::try_exists(workspace.binary_path()).await.unwrap_or(false) {
            return Err(CompileError::Internal {
                msg: format!(
                    "Executable file was not created at: {}",
                    workspace.binary_path().display()
                ),
            });
        }

        Ok(Artifact {
            submission_id: workspace.id(),
            path: workspace.binary_path().to_path_buf(),
            warnings: diagnostics,
        })
    }
}
