//! Study Match service entry point.
//!
//! Wires the in-memory adapters, starts the recompute dispatcher and runs
//! until Ctrl-C, then drains pending recomputes.

use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use study_match::adapters::{
    InMemoryCharacteristicProfileStore, InMemoryEventBus, InMemoryGroupDirectory,
    InMemoryGroupProfileStore, StaticAnswerKeySource, YamlAnswerKeySource,
};
use study_match::application::{
    MatchingQueryService, ProfileAggregator, QueryLimits, RecomputeDispatcher,
    RecomputeEventHandler, SubmitQuizAnswersHandler,
};
use study_match::config::{AppConfig, TelemetryConfig};
use study_match::domain::matching::MatchScorer;
use study_match::domain::quiz::QuizScoringAdapter;
use study_match::ports::AnswerKeySource;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.telemetry)?;

    let answer_key_source: Box<dyn AnswerKeySource> = match &config.quiz.answer_key_path {
        Some(path) => Box::new(YamlAnswerKeySource::new(path)),
        None => Box::new(StaticAnswerKeySource::builtin()?),
    };
    let answer_key = answer_key_source.load().await?;
    let scoring = Arc::new(QuizScoringAdapter::new(Arc::new(answer_key)));
    tracing::info!(
        questions = scoring.answer_key().total_questions(),
        "answer key loaded"
    );

    let bus = Arc::new(InMemoryEventBus::without_capture());
    let profiles = Arc::new(InMemoryCharacteristicProfileStore::new());
    let group_profiles = Arc::new(InMemoryGroupProfileStore::new());
    let directory = Arc::new(InMemoryGroupDirectory::new());

    let aggregator = Arc::new(ProfileAggregator::new(
        directory.clone(),
        profiles.clone(),
        group_profiles.clone(),
    ));
    let dispatcher = RecomputeDispatcher::start(
        aggregator,
        directory.clone(),
        config.dispatcher.worker_count,
    );
    RecomputeEventHandler::register(bus.as_ref(), dispatcher.clone());

    // No transport is bundled; embedders drive these handlers directly.
    let _submit_quiz = SubmitQuizAnswersHandler::new(
        profiles.clone(),
        scoring,
        bus.clone(),
        config.profile.max_write_retries,
    );
    let _matching = MatchingQueryService::new(
        profiles,
        group_profiles,
        directory.clone(),
        directory,
        MatchScorer::new(config.matching.scorer_config()?),
        QueryLimits {
            default_limit: config.matching.default_limit,
            max_limit: config.matching.max_limit,
        },
    );

    tracing::info!(
        environment = ?config.telemetry.environment,
        "study-match ready, press Ctrl-C to stop"
    );
    tokio::signal::ctrl_c().await?;

    tracing::info!("shutdown requested");
    dispatcher
        .shutdown(config.dispatcher.shutdown_timeout())
        .await?;
    Ok(())
}

fn init_tracing(telemetry: &TelemetryConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&telemetry.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if telemetry.json_logs {
        builder.json().try_init()?;
    } else {
        builder.try_init()?;
    }
    Ok(())
}
