//! Fully wired orchestrator over in-memory stores and mocks

use axum::Router;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use uxlens_analysis::{AnalysisSettings, AnalyzeDocumentUseCase};
use uxlens_core::Config;
use uxlens_core::config::LlmConfig;
use uxlens_core::domain::{Design, LedgerRepository, NewDesign};
use uxlens_core::infrastructure::InMemoryLedgerRepository;
use uxlens_llm::CritiqueFrameUseCase;
use uxlens_orchestrator::application::{
    CreateDesignUseCase, EvaluationRunner, GetEvaluationResultsUseCase, GetProgressUseCase,
    JobWorkflow, ListVersionsUseCase, PreparedRun, RevertVersionUseCase, StartEvaluationUseCase,
};
use uxlens_orchestrator::domain::{EvaluationError, EvaluationRequest, RunSummary};
use uxlens_orchestrator::infrastructure::InMemoryJobStore;
use uxlens_orchestrator::presentation::{OrchestratorState, create_router};

use super::fixtures::PLACEHOLDER_IMAGE;
use super::mocks::{MockDesignSource, ScriptedLlmProvider};

pub const MAX_FRAMES: usize = 5;

pub struct Harness {
    pub ledger: Arc<InMemoryLedgerRepository>,
    pub workflow: JobWorkflow,
    pub runner: Arc<EvaluationRunner>,
    pub provider: Arc<ScriptedLlmProvider>,
    pub shutdown: CancellationToken,
    pub state: OrchestratorState,
}

impl Harness {
    pub fn new(source: MockDesignSource, provider: ScriptedLlmProvider) -> Self {
        let ledger = Arc::new(InMemoryLedgerRepository::new());
        let ledger_dyn: Arc<dyn LedgerRepository> = ledger.clone();
        let workflow = JobWorkflow::new(Arc::new(InMemoryJobStore::new()));
        let provider = Arc::new(provider);

        let analyzer = Arc::new(AnalyzeDocumentUseCase::new(AnalysisSettings::default()));
        let critic = Arc::new(CritiqueFrameUseCase::new(
            provider.clone(),
            LlmConfig::default(),
        ));
        let runner = Arc::new(EvaluationRunner::new(
            ledger_dyn.clone(),
            Arc::new(source),
            analyzer,
            critic,
            workflow.clone(),
            PLACEHOLDER_IMAGE,
            MAX_FRAMES,
        ));
        let shutdown = CancellationToken::new();

        let state = OrchestratorState {
            create_design_use_case: Arc::new(CreateDesignUseCase::new(ledger_dyn.clone())),
            start_evaluation_use_case: Arc::new(StartEvaluationUseCase::new(
                ledger_dyn.clone(),
                workflow.clone(),
                runner.clone(),
                shutdown.clone(),
            )),
            get_progress_use_case: Arc::new(GetProgressUseCase::new(workflow.clone())),
            get_results_use_case: Arc::new(GetEvaluationResultsUseCase::new(ledger_dyn.clone())),
            list_versions_use_case: Arc::new(ListVersionsUseCase::new(ledger_dyn.clone())),
            revert_version_use_case: Arc::new(RevertVersionUseCase::new(ledger_dyn)),
        };

        Self {
            ledger,
            workflow,
            runner,
            provider,
            shutdown,
            state,
        }
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone(), Arc::new(Config::default()))
    }

    pub async fn create_design(&self, title: &str) -> Design {
        self.ledger
            .create_design(NewDesign {
                title: title.to_string(),
                owner_id: Some("user_42".to_string()),
            })
            .await
            .expect("design should be created")
    }

    pub async fn prepare(&self, request: EvaluationRequest) -> Result<PreparedRun, EvaluationError> {
        self.state.start_evaluation_use_case.prepare(request).await
    }

    /// Prepare and run to completion on the current task
    pub async fn evaluate(
        &self,
        request: EvaluationRequest,
    ) -> (PreparedRun, Result<RunSummary, EvaluationError>) {
        let prepared = self.prepare(request).await.expect("request should be accepted");
        let result = self.runner.run(prepared.clone(), self.shutdown.clone()).await;
        (prepared, result)
    }
}

pub fn request_for(design: &Design, frame_ids: &[&str]) -> EvaluationRequest {
    EvaluationRequest {
        design_id: design.id,
        file_key: "FgK3x9PqLm2".to_string(),
        node_id: None,
        frame_ids: frame_ids.iter().map(|id| id.to_string()).collect(),
        snapshot: serde_json::json!({"persona": "first-time shopper"}),
        thumbnail_url: None,
        created_by: Some("user_42".to_string()),
    }
}
