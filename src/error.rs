//! Error types.

use thiserror::Error;

/// Invalid [`crate::anneal::AnnealConfig`] value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("calibration_steps must be positive")]
    ZeroCalibrationSteps,
    #[error("target_acceptance must be in (0, 1), got {0}")]
    TargetAcceptance(f64),
    #[error("temperature_step must be greater than 1, got {0}")]
    TemperatureStep(f64),
    #[error("seed_search_limit must be positive")]
    ZeroSeedSearchLimit,
    #[error("max_calibration_trials must be positive")]
    ZeroCalibrationTrials,
    #[error("check_interval must be positive")]
    ZeroCheckInterval,
    #[error("move_attempts must be positive")]
    ZeroMoveAttempts,
    #[error("workers must be positive when set")]
    ZeroWorkers,
    #[error("temperatures must satisfy 0 < t_min <= t_max, got t_max={t_max} t_min={t_min}")]
    Temperatures { t_max: f64, t_min: f64 },
}

/// Calibration phase that ran out of trials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationPhase {
    Cooling,
    Heating,
    Quench,
}

impl std::fmt::Display for CalibrationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CalibrationPhase::Cooling => "cooling towards target acceptance",
            CalibrationPhase::Heating => "heating towards target acceptance",
            CalibrationPhase::Quench => "quenching until no improvement",
        };
        f.write_str(name)
    }
}

/// Temperature calibration could not bracket a cooling range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    #[error("route has no interior positions to move")]
    EmptyRoute,
    #[error("no move changed the route cost within {attempts} attempts")]
    NoEnergyChange { attempts: usize },
    #[error("calibration did not converge while {phase} after {trials} trials")]
    TrialLimit {
        phase: CalibrationPhase,
        trials: usize,
    },
}

/// Malformed instance text.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing header line `<visits> <start>`")]
    MissingHeader,
    #[error("line {line}: expected {expected}, got `{content}`")]
    MalformedLine {
        line: usize,
        expected: &'static str,
        content: String,
    },
    #[error("line {line}: invalid number `{value}`")]
    InvalidNumber { line: usize, value: String },
    #[error("input ended after {found} of {expected} groups")]
    TruncatedGroups { expected: usize, found: usize },
}

/// Failure of a full calibrate-and-resolve run.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    #[error("failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
