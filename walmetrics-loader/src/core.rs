use tracing::info;
use walmetrics::error::WalmetricsResult;
use walmetrics::metrics::CommonMetricsExtractor;
use walmetrics::pipeline::Pipeline;
use walmetrics_config::shared::LoaderConfig;

/// Runs one pipeline pass with the provided configuration.
///
/// The shipped extractor derives the common metrics; swapping the analytical
/// query means wiring a different [`walmetrics::metrics::MetricsExtractor`]
/// here.
pub async fn start_loader_with_config(loader_config: LoaderConfig) -> WalmetricsResult<()> {
    info!("starting walmetrics loader");

    let pipeline = Pipeline::new(loader_config.pipeline, CommonMetricsExtractor::new());

    pipeline.run().await
}
