use std::time::Duration;

use tokio::fs;

use crate::{
    core::domain::Artifact,
    core::traits::compiler::{CompileError, Compiler},
    core::workspace::Workspace,
    stubs::ConcurrencyProbe,
};

#[derive(Debug, Clone)]
pub struct CompilerStub {
    result: Result<(), CompileError>,
    delay: Duration,
    probe: ConcurrencyProbe,
}

impl CompilerStub {
    pub fn new(result: Result<(), CompileError>, delay: Duration) -> Self {
        Self {
            result,
            delay,
            probe: ConcurrencyProbe::default(),
        }
    }

    pub fn probe(&self) -> ConcurrencyProbe {
        self.probe.clone()
    }
}

#[async_trait::async_trait]
impl Compiler for CompilerStub {
    #[tracing::instrument(skip(self, workspace))]
    async fn compile(&self, source: &str, workspace: &Workspace) -> Result<Artifact, CompileError> {
        let _guard = self.probe.enter();

        fs::write(workspace.source_path(), source)
            .await
            .map_err(|e| CompileError::Internal { msg: e.to_string() })?;
        tokio::time::sleep(self.delay).await;
        tracing::debug!("Compilation result: {:?}", self.result);

        self.result.clone()?;
        fs::write(workspace.binary_path(), "stub binary")
            .await
            .map_err(|e| CompileError::Internal { msg: e.to_string() })?;

        Ok(Artifact {
            submission_id: workspace.id(),
            path: workspace.binary_path().to_path_buf(),
            warnings: String::new(),
        })
    }
}
