use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::config::JudgeConfig;
use crate::core::{
    aggregator::aggregate,
    domain::{OverallStatus, Submission, SubmissionResult, SubmissionState},
    errors::JudgeError,
    pipeline::{
        Progress,
        compiling::{CompilationOutcome, compile_submission},
        running::{RunLimits, run_test_cases},
    },
    traits::{compiler::Compiler, runner::Runner},
    workspace::{Workspace, WorkspaceManager},
};
use crate::native::{compiler::NativeCompiler, runner::NativeRunner};

/// Compiles a submission, runs it against its test cases and grades it.
///
/// One engine can judge many submissions at once. They share only the
/// compile permits and the workspace registry.
#[derive(Debug)]
pub struct JudgeEngine {
    compiler: Arc<dyn Compiler>,
    runner: Arc<dyn Runner>,
    workspaces: WorkspaceManager,
    compile_permits: Semaphore,
    run_limits: RunLimits,
}

impl JudgeEngine {
    pub fn new(config: &JudgeConfig, compiler: Arc<dyn Compiler>, runner: Arc<dyn Runner>) -> Self {
        Self {
            compiler,
            runner,
            workspaces: WorkspaceManager::new(&config.workspace_root),
            compile_permits: Semaphore::new(config.max_parallel_compilations.max(1)),
            run_limits: RunLimits {
                time_limit: config.run_timeout,
                max_parallel: config.max_parallel_tests.max(1),
            },
        }
    }

    /// Engine backed by the host toolchain and plain subprocesses.
    pub fn native(config: &JudgeConfig) -> Self {
        Self::new(
            config,
            Arc::new(NativeCompiler::from_config(config)),
            Arc::new(NativeRunner::new(config.max_output_bytes)),
        )
    }

    pub fn workspaces(&self) -> &WorkspaceManager {
        &self.workspaces
    }

    pub async fn judge(&self, submission: &Submission) -> Result<SubmissionResult, JudgeError> {
        self.judge_with_progress(submission, &Progress::disabled())
            .await
    }

    /// Same as [`JudgeEngine::judge`], publishing every state change to `progress`.
    ///
    /// The workspace is gone by the time the terminal state is reported.
    #[tracing::instrument(skip_all, fields(submission_id = %submission.id))]
    pub async fn judge_with_progress(
        &self,
        submission: &Submission,
        progress: &Progress,
    ) -> Result<SubmissionResult, JudgeError> {
        progress.report(SubmissionState::Received);
        tracing::info!(
            "Judging submission with {} test cases",
            submission.test_cases.len()
        );

        let workspace = match self.workspaces.create(submission.id).await {
            Ok(workspace) => workspace,
            Err(e) => {
                tracing::error!("Failed to create workspace: {}", e);
                progress.report(SubmissionState::Failed);
                return Err(e.into());
            }
        };

        let result = self.process(submission, &workspace, progress).await;
        workspace.destroy().await;

        match &result {
            Ok(result) => {
                let state = match result.overall {
                    OverallStatus::CompilationError => SubmissionState::CompileFailed,
                    _ => SubmissionState::Completed,
                };
                tracing::info!(
                    "Submission judged: {:?} {:?} in {} ms",
                    result.overall,
                    result.verdicts(),
                    (chrono::Utc::now() - submission.received_at).num_milliseconds()
                );
                progress.report(state);
            }
            Err(e) => {
                tracing::error!("Submission failed: {}", e);
                progress.report(SubmissionState::Failed);
            }
        }

        result
    }

    async fn process(
        &self,
        submission: &Submission,
        workspace: &Workspace,
        progress: &Progress,
    ) -> Result<SubmissionResult, JudgeError> {
        progress.report(SubmissionState::Compiling);

        let outcome = compile_submission(
            self.compiler.as_ref(),
            &self.compile_permits,
            &submission.code,
            workspace,
        )
        .await?;

        let artifact = match outcome {
            CompilationOutcome::Compiled(artifact) => artifact,
            CompilationOutcome::Failed { diagnostics } => {
                tracing::info!("Compilation failed, no test case will run");
                return Ok(SubmissionResult::compilation_failed(
                    submission.id,
                    diagnostics,
                ));
            }
        };
        progress.report(SubmissionState::Compiled);

        let outcomes = run_test_cases(
            self.runner.as_ref(),
            &artifact,
            &submission.test_cases,
            self.run_limits,
            progress,
        )
        .await;
        let overall = aggregate(outcomes.iter().map(|outcome| &outcome.verdict));

        Ok(SubmissionResult {
            submission_id: submission.id,
            overall,
            outcomes,
            diagnostics: artifact.warnings,
        })
    }
}
