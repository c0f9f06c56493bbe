use std::time::{Duration, Instant};

use tracing::info;

use crate::config::PipelineConfig;
use crate::error::{Result, SanitizeError};
use crate::interchange::{self, BatchOutput, MeshSample};
use crate::sanitize::{self, MeshStats, Sanitizer};

/// Summary of a completed pipeline run.
#[derive(Debug)]
pub struct ProcessingResult {
    pub succeeded: usize,
    pub failed: usize,
    pub duration: Duration,
}

/// Pipeline orchestrator -- load, sanitize, write.
pub struct Pipeline;

impl Pipeline {
    /// Run the full batch pipeline.
    ///
    /// Per-mesh failures are recorded in the output document; only I/O and
    /// parse failures abort the run, unless `strict` is set, in which case
    /// the document is still written and the run then fails.
    pub fn run(config: &PipelineConfig) -> Result<ProcessingResult> {
        let start = Instant::now();

        info!(input = %config.input.display(), "Starting pipeline");

        info!("Stage 1/3: Load");
        let batch = interchange::load_batch(&config.input)?;
        let samples: Vec<_> = batch.samples.into_iter().map(MeshSample::into_mesh).collect();
        info!(samples = samples.len(), "Loaded samples");

        if config.dry_run {
            info!("--dry-run: classifying attributes only");
            println!("=== Dry Run Summary ===");
            for (name, mesh) in &samples {
                print_stats(name, &sanitize::inspect(mesh));
            }
            return Ok(ProcessingResult {
                succeeded: 0,
                failed: 0,
                duration: start.elapsed(),
            });
        }

        info!(
            handedness = %config.sanitize.handedness,
            axis = %config.sanitize.reflection_axis,
            "Stage 2/3: Sanitize"
        );
        let sanitizer = Sanitizer::new(config.sanitize.clone());
        let outcomes = sanitizer.sanitize_batch(samples);
        let output = BatchOutput::from_outcomes(outcomes);

        info!(output = %config.output.display(), "Stage 3/3: Write");
        interchange::write_output(&output, &config.output)?;

        let duration = start.elapsed();
        info!(
            succeeded = output.summary.succeeded,
            failed = output.summary.failed,
            elapsed = ?duration,
            "Pipeline complete"
        );

        if config.strict && output.summary.failed > 0 {
            return Err(SanitizeError::BatchFailed {
                failed: output.summary.failed,
                total: output.samples.len(),
            });
        }

        Ok(ProcessingResult {
            succeeded: output.summary.succeeded,
            failed: output.summary.failed,
            duration,
        })
    }
}

fn print_stats(name: &str, stats: &MeshStats) {
    println!("  {name}");
    println!("    Faces:     {}", stats.faces);
    println!("    Points:    {}", stats.points);
    println!("    Corners:   {}", stats.corners);
    println!("    Triangles: {}", stats.triangles);
    for (attr, domain) in &stats.domains {
        println!("    {attr:<12} {domain}");
    }
    println!(
        "    Layout:    {}",
        if stats.forces_unweld { "unwelded" } else { "welded" }
    );
}
