use anyhow::Context;
use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use mesh_sanitizer::config::{CliArgs, PipelineConfig};
use mesh_sanitizer::pipeline::Pipeline;

/// Logs go to stderr so stdout carries only the run summary.
fn init_tracing(config: &PipelineConfig) {
    // RUST_LOG wins over -v.
    let default_level = if config.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mesh_sanitizer={default_level}")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.log_json {
        builder.json().with_current_span(false).init();
    } else {
        builder.with_target(false).init();
    }
}

fn main() -> anyhow::Result<()> {
    let config: PipelineConfig = CliArgs::parse().into();
    init_tracing(&config);

    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure rayon thread pool")?;
    }

    let result = Pipeline::run(&config).map_err(|e| {
        error!(%e, "Pipeline failed");
        anyhow::anyhow!(e)
    });
    let result = result.with_context(|| format!("Failed to sanitize {}", config.input.display()))?;

    if config.dry_run {
        return Ok(());
    }
    if result.failed > 0 {
        warn!(failed = result.failed, "Some samples failed; see the output document");
    }
    println!(
        "Done: {} sanitized, {} failed in {:.2}s",
        result.succeeded,
        result.failed,
        result.duration.as_secs_f64()
    );
    Ok(())
}
