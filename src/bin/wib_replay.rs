//! Scenario replay for the Fast classification tier.
//!
//! Drives workloads through classification cycles from a JSON scenario whose
//! indices and MASE metrics are already materialized, and prints (or writes)
//! the resulting strategy assignments and events.
//!
//! Usage:
//! ```bash
//! cargo run --bin wib_replay -- demos/scenario.json --config demos/fast.toml
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use wib_classifier::classifier::mock::{scripted_collaborators, CountingComplex, ScriptedInputs};
use wib_classifier::classifier::{RecordingSink, Tee, TracingSink};
use wib_classifier::infra::logging::targets;
use wib_classifier::{
    init_logging, ClassificationConfig, ClassificationEvent, ClassificationLevel, Classifier,
    ForecastObjectives, ForecastResult, ForecastStrategy, IndexVector, LogConfig, LogFormat,
    MaseMetric, TimeSeries, WorkloadId, WorkloadIntensityBehavior, WorkloadRegistry,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser)]
#[command(name = "wib_replay")]
#[command(version, about = "Replay classification cycles from a scenario file", long_about = None)]
struct Cli {
    /// Scenario file (JSON)
    scenario: PathBuf,

    /// Threshold configuration (TOML); the preset applies when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Threshold preset used without a config file
    #[arg(long, value_enum, default_value_t = Preset::Default)]
    preset: Preset,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log format: pretty, compact, json (json when --log-dir is set)
    #[arg(long)]
    log_format: Option<String>,

    /// Also write rotated JSON logs to this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Include every emitted event in the report
    #[arg(long)]
    events: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    Default,
    Responsive,
    Conservative,
}

impl Preset {
    fn config(self) -> ClassificationConfig {
        match self {
            Preset::Default => ClassificationConfig::default(),
            Preset::Responsive => ClassificationConfig::responsive(),
            Preset::Conservative => ClassificationConfig::conservative(),
        }
    }
}

fn log_config(cli: &Cli) -> LogConfig {
    let base = match &cli.log_dir {
        Some(dir) => LogConfig::production(dir.clone()),
        None => LogConfig::development(),
    };
    let mut config = base.with_level(&cli.log_level);
    match cli.log_format.as_deref() {
        Some("json") => config.stdout_format = LogFormat::Json,
        Some("compact") => config.stdout_format = LogFormat::Compact,
        Some(_) => config.stdout_format = LogFormat::Pretty,
        None => {}
    }
    config
}

// ============================================================================
// Scenario
// ============================================================================

#[derive(Debug, Deserialize)]
struct Scenario {
    workloads: Vec<WorkloadScenario>,
}

#[derive(Debug, Deserialize)]
struct WorkloadScenario {
    id: String,
    #[serde(default)]
    values: Vec<f64>,
    #[serde(default)]
    frequency: usize,
    objectives: ForecastObjectives,
    period_ms: u64,
    /// Per-workload thresholds, replacing the CLI config
    #[serde(default)]
    config: Option<ClassificationConfig>,
    /// First entry feeds the activation cycle
    cycles: Vec<CycleScript>,
}

#[derive(Debug, Default, Deserialize)]
struct CycleScript {
    /// Observations arriving before this cycle
    #[serde(default)]
    append: Vec<f64>,
    #[serde(default)]
    overhead: Option<f64>,
    #[serde(default)]
    indices: IndexVector,
    #[serde(default)]
    mase: MaseMetric,
    #[serde(default)]
    result1: Option<ForecastResult>,
    #[serde(default)]
    result2: Option<ForecastResult>,
}

impl CycleScript {
    fn apply(&self, wib: &mut WorkloadIntensityBehavior) {
        wib.series.extend_from_slice(&self.append);
        if let Some(overhead) = self.overhead {
            wib.objectives.overhead = overhead;
        }
        if self.result1.is_some() || self.result2.is_some() {
            wib.record_results(self.result1, self.result2);
        }
    }
}

// ============================================================================
// Report
// ============================================================================

#[derive(Debug, Serialize)]
struct WorkloadReport {
    id: WorkloadId,
    level: ClassificationLevel,
    slot1: ForecastStrategy,
    slot2: ForecastStrategy,
    recent_horizon: u32,
    period_ms: u64,
    size: usize,
    skipped_values: usize,
    size_threshold_fast: usize,
    last_smoothed_point: usize,
    cycles: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    events: Vec<ClassificationEvent>,
}

impl WorkloadReport {
    fn new(wib: &WorkloadIntensityBehavior, events: Vec<ClassificationEvent>) -> Self {
        Self {
            id: wib.id().clone(),
            level: wib.setting.level,
            slot1: wib.setting.recent_strategy1,
            slot2: wib.setting.recent_strategy2,
            recent_horizon: wib.objectives.recent_horizon,
            period_ms: u64::try_from(wib.period.as_millis()).unwrap_or(u64::MAX),
            size: wib.series.size(),
            skipped_values: wib.series.skipped_values(),
            size_threshold_fast: wib.setting.size_threshold_fast(),
            last_smoothed_point: wib.setting.last_smoothed_point(),
            cycles: wib.cycles(),
            events,
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    workloads: Vec<WorkloadReport>,
    complex_cycles: u64,
}

// ============================================================================
// Replay
// ============================================================================

fn load_config(
    path: Option<&PathBuf>,
    preset: Preset,
) -> Result<ClassificationConfig, wib_classifier::Error> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            Ok(ClassificationConfig::from_toml_str(&content)?)
        }
        None => Ok(preset.config()),
    }
}

fn replay(
    scenario: &Scenario,
    base_config: &ClassificationConfig,
    keep_events: bool,
) -> Result<Report, wib_classifier::Error> {
    let inputs = Arc::new(ScriptedInputs::default());
    let complex = Arc::new(CountingComplex::new());
    let recorder = Arc::new(RecordingSink::new());
    let collaborators = scripted_collaborators(
        inputs.clone(),
        complex.clone(),
        Arc::new(Tee(TracingSink, recorder.clone())),
    );
    let registry = WorkloadRegistry::new(Classifier::new(collaborators));

    let mut reports = Vec::with_capacity(scenario.workloads.len());
    for ws in &scenario.workloads {
        let config = ws.config.clone().unwrap_or_else(|| base_config.clone());
        config.validate()?;
        ws.objectives.validate()?;

        let id = WorkloadId::new(&ws.id);
        let mut wib = WorkloadIntensityBehavior::new(
            id.clone(),
            TimeSeries::new(ws.values.clone(), ws.frequency),
            ws.objectives,
            Duration::from_millis(ws.period_ms),
            config,
        );

        let mut cycles = ws.cycles.iter();
        match cycles.next() {
            Some(first) => {
                first.apply(&mut wib);
                inputs.set(first.indices, first.mase);
            }
            None => inputs.set(IndexVector::default(), MaseMetric::default()),
        }
        registry.register(wib)?;

        for (n, cycle) in cycles.enumerate() {
            inputs.set(cycle.indices, cycle.mase);
            registry.update(&id, |wib| cycle.apply(wib))?;
            registry.classify(&id)?;
            debug!(target: targets::REPLAY, workload = %id, cycle = n + 1, "Cycle replayed");
        }

        let wib = registry.snapshot(&id)?;
        let events = recorder.drain();
        info!(
            target: targets::REPLAY,
            workload = %id,
            level = wib.setting.level.as_str(),
            slot1 = wib.setting.recent_strategy1.name(),
            slot2 = wib.setting.recent_strategy2.name(),
            "Workload replayed"
        );
        reports.push(WorkloadReport::new(
            &wib,
            if keep_events { events } else { Vec::new() },
        ));
    }

    Ok(Report {
        workloads: reports,
        complex_cycles: complex.cycles(),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let _guard = init_logging(&log_config(&cli)).map_err(|e| -> Box<dyn std::error::Error> { e })?;

    let config = load_config(cli.config.as_ref(), cli.preset)?;
    let content = std::fs::read_to_string(&cli.scenario)?;
    let scenario: Scenario = serde_json::from_str(&content)?;

    let report = replay(&scenario, &config, cli.events)?;
    let json = serde_json::to_string_pretty(&report)?;

    match cli.output {
        Some(path) => {
            std::fs::write(&path, json)?;
            info!(target: targets::REPLAY, path = %path.display(), "Report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
