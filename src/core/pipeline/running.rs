use std::time::Duration;

use futures::{StreamExt, stream};

use crate::core::{
    classifier::classify,
    domain::{Artifact, ExecutionResult, SubmissionState, Termination, TestCase, TestOutcome},
    pipeline::Progress,
    traits::runner::{RunError, RunResult, Runner},
};

#[derive(Clone, Copy, Debug)]
pub struct RunLimits {
    pub time_limit: Duration,
    pub max_parallel: usize,
}

/// Runs every test case against the artifact, at most `max_parallel` at a
/// time, and returns the outcomes in test case order.
///
/// A failing test case never stops the others.
pub async fn run_test_cases(
    runner: &dyn Runner,
    artifact: &Artifact,
    test_cases: &[TestCase],
    limits: RunLimits,
    progress: &Progress,
) -> Vec<TestOutcome> {
    // Collected up front so the stream holds plain futures, keeping it `Send`.
    let runs: Vec<_> = test_cases
        .iter()
        .enumerate()
        .map(|(test_idx, test_case)| {
            run_test_case(runner, artifact, test_idx, test_case, limits.time_limit, progress)
        })
        .collect();

    let mut outcomes: Vec<TestOutcome> = stream::iter(runs)
        .buffer_unordered(limits.max_parallel.max(1))
        .collect()
        .await;

    outcomes.sort_by_key(|outcome| outcome.execution.test_case_index);
    outcomes
}

async fn run_test_case(
    runner: &dyn Runner,
    artifact: &Artifact,
    test_idx: usize,
    test_case: &TestCase,
    time_limit: Duration,
    progress: &Progress,
) -> TestOutcome {
    progress.report(SubmissionState::Executing { index: test_idx });
    tracing::debug!("Running test {} with input {:?}", test_idx, test_case.input);

    let result = runner.run(artifact, &test_case.input, time_limit).await;
    let execution = into_execution_result(test_idx, time_limit, result);
    let verdict = classify(&execution, test_case);

    tracing::debug!(
        "Test {} finished with {:?} in {} ms",
        test_idx,
        verdict,
        execution.elapsed_ms()
    );

    TestOutcome {
        execution,
        expected_output: test_case.expected_output.clone(),
        verdict,
    }
}

fn into_execution_result(
    test_idx: usize,
    time_limit: Duration,
    result: Result<RunResult, RunError>,
) -> ExecutionResult {
    match result {
        Ok(result) => {
            let termination = if result.timed_out {
                Termination::TimedOut {
                    limit_ms: time_limit.as_millis() as u64,
                }
            } else if let Some(signal) = result.signal {
                Termination::Signaled { signal }
            } else {
                Termination::Exited {
                    code: result.status.unwrap_or(-1),
                }
            };

            let failed = termination != Termination::Exited { code: 0 };
            let stderr = if failed && result.stderr.trim().is_empty() {
                termination.describe()
            } else {
                result.stderr
            };

            ExecutionResult {
                test_case_index: test_idx,
                stdout: result.stdout.trim_end().to_string(),
                stderr,
                timed_out: result.timed_out,
                termination,
                elapsed: result.execution_time,
            }
        }
        Err(RunError::FailedToLaunch { msg }) => {
            tracing::warn!("Test {} could not be launched: {}", test_idx, msg);
            let termination = Termination::FailedToLaunch { msg };

            ExecutionResult {
                test_case_index: test_idx,
                stdout: String::new(),
                stderr: termination.describe(),
                termination,
                elapsed: Duration::ZERO,
                timed_out: false,
            }
        }
    }
}
