use tokio::sync::Semaphore;

use crate::core::{
    domain::Artifact,
    errors::JudgeError,
    traits::compiler::{CompileError, Compiler},
    workspace::Workspace,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompilationOutcome {
    Compiled(Artifact),
    Failed { diagnostics: String },
}

/// Compiles a submission once a compile permit is available.
///
/// Problems with the submitted code come back as [`CompilationOutcome::Failed`];
/// only host-side failures are errors.
#[tracing::instrument(skip_all, fields(submission_id = %workspace.id()))]
pub async fn compile_submission(
    compiler: &dyn Compiler,
    permits: &Semaphore,
    source: &str,
    workspace: &Workspace,
) -> Result<CompilationOutcome, JudgeError> {
    let _permit = permits
        .acquire()
        .await
        .map_err(|e| JudgeError::Internal { msg: e.to_string() })?;

    tracing::debug!("Start compiling");
    let compilation_result = compiler.compile(source, workspace).await;
    tracing::debug!("Compilation result: {:?}", compilation_result);

    match compilation_result {
        Ok(artifact) => {
            if !artifact.warnings.trim().is_empty() {
                tracing::warn!("Compilation warnings: {}", artifact.warnings);
            }
            Ok(CompilationOutcome::Compiled(artifact))
        }
        Err(CompileError::CompilationFailed { diagnostics }) => {
            Ok(CompilationOutcome::Failed { diagnostics })
        }
        Err(e @ CompileError::TimedOut { .. }) => Ok(CompilationOutcome::Failed {
            diagnostics: e.to_string(),
        }),
        Err(CompileError::Internal { msg }) => {
            tracing::error!("Internal error while compiling: {}", msg);
            Err(JudgeError::Internal { msg })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use uuid::Uuid;

    use super::*;
    use crate::core::traits::compiler::MockCompiler;
    use crate::core::workspace::WorkspaceManager;
    use crate::stubs::compiler::CompilerStub;

    fn manager() -> WorkspaceManager {
        WorkspaceManager::new(std::env::temp_dir().join(format!("coderunner_{}", Uuid::new_v4())))
    }

    #[tokio::test]
    async fn test_successful_compilation() {
        let manager = manager();
        let workspace = manager.create(Uuid::new_v4()).await.unwrap();
        let artifact = Artifact {
            submission_id: workspace.id(),
            path: workspace.binary_path().to_path_buf(),
            warnings: "warning: unused variable 'x'".to_string(),
        };

        let mut compiler = MockCompiler::new();
        compiler
            .expect_compile()
            .times(1)
            .return_const(Ok(artifact.clone()));

        let outcome = compile_submission(&compiler, &Semaphore::new(1), "int main() {}", &workspace)
            .await
            .unwrap();

        assert_eq!(outcome, CompilationOutcome::Compiled(artifact));
        workspace.destroy().await;
    }

    #[tokio::test]
    async fn test_compilation_failed() {
        let manager = manager();
        let workspace = manager.create(Uuid::new_v4()).await.unwrap();

        let mut compiler = MockCompiler::new();
        compiler
            .expect_compile()
            .return_const(Err(CompileError::CompilationFailed {
                diagnostics: "syntax error".to_string(),
            }));

        let outcome = compile_submission(&compiler, &Semaphore::new(1), "int main(", &workspace)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            CompilationOutcome::Failed {
                diagnostics: "syntax error".to_string()
            }
        );
        workspace.destroy().await;
    }

    #[tokio::test]
    async fn test_compilation_timeout_is_reported_as_failure() {
        let manager = manager();
        let workspace = manager.create(Uuid::new_v4()).await.unwrap();

        let mut compiler = MockCompiler::new();
        compiler
            .expect_compile()
            .return_const(Err(CompileError::TimedOut { limit_ms: 10_000 }));

        let outcome = compile_submission(&compiler, &Semaphore::new(1), "", &workspace)
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            CompilationOutcome::Failed { ref diagnostics } if diagnostics.contains("10000 ms")
        ));
        workspace.destroy().await;
    }

    #[tokio::test]
    async fn test_compilation_internal_error() {
        let manager = manager();
        let workspace = manager.create(Uuid::new_v4()).await.unwrap();

        let mut compiler = MockCompiler::new();
        compiler.expect_compile().return_const(Err(CompileError::Internal {
            msg: "Tux is sad and won't work :(".to_string(),
        }));

        let result = compile_submission(&compiler, &Semaphore::new(1), "", &workspace).await;

        assert!(matches!(result, Err(JudgeError::Internal { .. })));
        workspace.destroy().await;
    }

    #[tokio::test]
    async fn test_compilations_respect_permit_count() {
        let manager = manager();
        let compiler = Arc::new(CompilerStub::new(Ok(()), Duration::from_millis(50)));
        let permits = Arc::new(Semaphore::new(2));

        let mut handles = Vec::new();
        for _ in 0..6 {
            let manager = manager.clone();
            let compiler = compiler.clone();
            let permits = permits.clone();
            handles.push(tokio::spawn(async move {
                let workspace = manager.create(Uuid::new_v4()).await.unwrap();
                let outcome =
                    compile_submission(compiler.as_ref(), &permits, "int main() {}", &workspace)
                        .await;
                workspace.destroy().await;
                outcome
            }));
        }

        for handle in handles {
            let outcome = handle.await.unwrap().unwrap();
            assert!(matches!(outcome, CompilationOutcome::Compiled(_)));
        }

        assert_eq!(compiler.probe().peak(), 2);
        assert_eq!(manager.active(), 0);
    }
}
