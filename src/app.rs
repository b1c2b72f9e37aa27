//! Application setup and wiring

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;

use uxlens_analysis::{AnalysisSettings, AnalyzeDocumentUseCase};
use uxlens_core::Config;
use uxlens_core::domain::LedgerRepository;
use uxlens_core::infrastructure::{InMemoryLedgerRepository, SqlxLedgerRepository};
use uxlens_llm::{CritiqueFrameUseCase, ProviderRegistry};
use uxlens_orchestrator::application::{
    CreateDesignUseCase, EvaluationRunner, GetEvaluationResultsUseCase, GetProgressUseCase,
    JobWorkflow, ListVersionsUseCase, RevertVersionUseCase, StartEvaluationUseCase,
};
use uxlens_orchestrator::infrastructure::{FigmaDesignSource, InMemoryJobStore, JobStore};
use uxlens_orchestrator::presentation::controllers::OrchestratorState;
use uxlens_orchestrator::presentation::routes::create_router;

/// Handle returned from create_app for graceful shutdown coordination
pub struct AppHandle {
    pub router: Router,
    pub shutdown_token: CancellationToken,
}

/// PostgreSQL when a database URL is configured, otherwise a process-local ledger
async fn create_ledger(
    config: &Config,
) -> Result<Arc<dyn LedgerRepository>, Box<dyn std::error::Error + Send + Sync>> {
    let Some(url) = config.database.url.as_deref() else {
        tracing::warn!("No database URL configured, keeping the ledger in memory");
        return Ok(Arc::new(InMemoryLedgerRepository::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(
            config.database.connect_timeout_seconds,
        ))
        .connect(url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to the ledger database: {}", e);
            e
        })?;

    tracing::info!("Ledger database connected");
    Ok(Arc::new(SqlxLedgerRepository::new(Arc::new(pool))))
}

/// Create the application router and return an AppHandle for shutdown coordination
pub async fn create_app(
    config: Config,
) -> Result<AppHandle, Box<dyn std::error::Error + Send + Sync>> {
    let startup_time = Instant::now();
    let config_arc = Arc::new(config.clone());
    let shutdown_token = CancellationToken::new();

    let ledger = create_ledger(&config).await?;

    let registry = ProviderRegistry::from_llm_config(&config.llm).map_err(|e| {
        tracing::error!("Failed to configure critique provider: {}", e);
        e
    })?;
    let provider = registry
        .default_provider()
        .ok_or("No critique provider registered")?;
    tracing::info!(
        provider = provider.info().id,
        model = %config.llm.default_model,
        "Critique provider configured"
    );

    let design_source = Arc::new(FigmaDesignSource::new(&config.design_source));
    if config.design_source.access_token.is_none() {
        tracing::warn!("No design API token configured; private files will not be readable");
    }

    let analyzer = Arc::new(AnalyzeDocumentUseCase::new(AnalysisSettings::from_config(
        &config.evaluation,
    )));
    let critic = Arc::new(CritiqueFrameUseCase::new(provider, config.llm.clone()));

    let job_store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());
    let workflow = JobWorkflow::new(job_store);

    let runner = Arc::new(EvaluationRunner::new(
        ledger.clone(),
        design_source,
        analyzer,
        critic,
        workflow.clone(),
        config.design_source.placeholder_image_url.clone(),
        config.evaluation.max_frames_per_run,
    ));

    let orchestrator_state = OrchestratorState {
        create_design_use_case: Arc::new(CreateDesignUseCase::new(ledger.clone())),
        start_evaluation_use_case: Arc::new(StartEvaluationUseCase::new(
            ledger.clone(),
            workflow.clone(),
            runner,
            shutdown_token.clone(),
        )),
        get_progress_use_case: Arc::new(GetProgressUseCase::new(workflow)),
        get_results_use_case: Arc::new(GetEvaluationResultsUseCase::new(ledger.clone())),
        list_versions_use_case: Arc::new(ListVersionsUseCase::new(ledger.clone())),
        revert_version_use_case: Arc::new(RevertVersionUseCase::new(ledger)),
    };

    let router = create_router(orchestrator_state, config_arc);

    tracing::info!(
        startup_ms = startup_time.elapsed().as_millis() as u64,
        "Application initialized"
    );

    Ok(AppHandle {
        router,
        shutdown_token,
    })
}
