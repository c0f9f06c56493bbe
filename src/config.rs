use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Handedness conversion applied while sanitizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    /// Leave the basis untouched.
    #[default]
    #[value(name = "none")]
    None,
    /// Report a negative object scale instead of touching vertices.
    #[value(name = "negative-scale")]
    NegativeScaleOnly,
    /// Reflect every position, normal and tangent.
    #[value(name = "full")]
    FullReflection,
}

impl std::fmt::Display for Handedness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handedness::None => write!(f, "none"),
            Handedness::NegativeScaleOnly => write!(f, "negative-scale"),
            Handedness::FullReflection => write!(f, "full"),
        }
    }
}

/// Coordinate axis negated by the handedness conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    #[default]
    #[value(name = "x")]
    X,
    #[value(name = "y")]
    Y,
    #[value(name = "z")]
    Z,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// Per-mesh sanitize options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeConfig {
    pub handedness: Handedness,
    pub reflection_axis: Axis,
    /// Material binding needs face-varying fidelity: authored face-varying
    /// attributes always force unwelding.
    pub bind_materials_requiring_face_varying: bool,
    pub compute_missing_normals: bool,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            handedness: Handedness::None,
            reflection_axis: Axis::X,
            bind_materials_requiring_face_varying: true,
            compute_missing_normals: true,
        }
    }
}

/// Fully resolved pipeline configuration (constructed from CLI args).
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub sanitize: SanitizeConfig,
    pub dry_run: bool,
    pub verbose: bool,
    /// Emit log records as JSON lines instead of human-readable text.
    pub log_json: bool,
    /// Exit with an error when any sample fails to sanitize.
    pub strict: bool,
    pub threads: Option<usize>,
}

/// CLI argument definition (clap derive).
#[derive(Parser, Debug)]
#[command(
    name = "mesh-sanitize",
    about = "Triangulate and canonicalize polygon mesh samples for realtime mesh builders",
    version
)]
pub struct CliArgs {
    /// Input sample batch (JSON)
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Output file (JSON)
    #[arg(short = 'o', long)]
    pub output: PathBuf,

    /// Handedness conversion: none, negative-scale, or full
    #[arg(long, value_enum, default_value = "none")]
    pub handedness: Handedness,

    /// Axis negated by the handedness conversion
    #[arg(long, value_enum, default_value = "x")]
    pub axis: Axis,

    /// Allow welding face-varying attributes that hold one value per point
    #[arg(long)]
    pub no_face_varying_binding: bool,

    /// Do not generate normals for meshes that lack them
    #[arg(long)]
    pub no_compute_normals: bool,

    /// Classify input and report stats only
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Log as JSON lines (for log collectors)
    #[arg(long)]
    pub log_json: bool,

    /// Fail the run if any sample fails to sanitize
    #[arg(long)]
    pub strict: bool,

    /// Worker thread count (default: all cores)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,
}

impl From<CliArgs> for PipelineConfig {
    fn from(args: CliArgs) -> Self {
        PipelineConfig {
            input: args.input,
            output: args.output,
            sanitize: SanitizeConfig {
                handedness: args.handedness,
                reflection_axis: args.axis,
                bind_materials_requiring_face_varying: !args.no_face_varying_binding,
                compute_missing_normals: !args.no_compute_normals,
            },
            dry_run: args.dry_run,
            verbose: args.verbose,
            log_json: args.log_json,
            strict: args.strict,
            threads: args.threads,
        }
    }
}
