use thiserror::Error;

/// Top-level error type for stance-core.
#[derive(Debug, Error)]
pub enum StanceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Variable error: {0}")]
    Variable(#[from] VariableError),

    #[error("Motion error: {0}")]
    Motion(#[from] MotionError),
}

/// Configuration and construction errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Timing sequence is empty")]
    EmptyTimings,

    #[error("Invalid duration at phase {index}: {value} (must be > 0)")]
    NonPositiveDuration { index: usize, value: f64 },

    #[error("Invalid duration bounds [{min}, {max}] (need 0 < min <= max)")]
    InvalidBounds { min: f64, max: f64 },

    #[error("Invalid phase order for foot {foot}: {message}")]
    PhaseOrder { foot: usize, message: String },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors raised while the solver updates or queries optimization variables.
///
/// Copy + plain data so a rejected iterate is cheap to report.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum VariableError {
    #[error("Variable dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Derived last phase duration {duration} is not positive (total time {total})")]
    NonPositiveLastDuration { duration: f64, total: f64 },

    #[error("Phase {phase} out of range for {phases} phases")]
    PhaseOutOfRange { phase: usize, phases: usize },
}

/// End-effector motion errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MotionError {
    #[error("Contact {index} out of range: only {count} free contacts")]
    ContactOutOfRange { index: usize, count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stance_error_from_config_error() {
        let err = ConfigError::InvalidBounds { min: -1.0, max: 0.5 };
        let stance_err: StanceError = err.into();
        assert!(matches!(stance_err, StanceError::Config(_)));
        assert!(stance_err.to_string().contains("-1"));
    }

    #[test]
    fn stance_error_from_variable_error() {
        let err = VariableError::NonPositiveLastDuration {
            duration: 0.0,
            total: 1.0,
        };
        let stance_err: StanceError = err.into();
        assert!(matches!(stance_err, StanceError::Variable(_)));
        assert!(stance_err.to_string().contains("not positive"));
    }

    #[test]
    fn stance_error_from_motion_error() {
        let err = MotionError::ContactOutOfRange { index: 4, count: 2 };
        let stance_err: StanceError = err.into();
        assert!(matches!(stance_err, StanceError::Motion(_)));
    }

    #[test]
    fn config_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let config_err: ConfigError = io_err.into();
        assert!(matches!(config_err, ConfigError::Io(_)));
    }

    #[test]
    fn variable_error_is_copy() {
        let err = VariableError::DimensionMismatch { expected: 2, got: 3 };
        let err2 = err;
        assert_eq!(err, err2);
    }

    #[test]
    fn variable_error_display_messages() {
        assert_eq!(
            VariableError::DimensionMismatch {
                expected: 2,
                got: 3
            }
            .to_string(),
            "Variable dimension mismatch: expected 2, got 3"
        );
        assert_eq!(
            VariableError::NonPositiveLastDuration {
                duration: -0.5,
                total: 1.0
            }
            .to_string(),
            "Derived last phase duration -0.5 is not positive (total time 1)"
        );
        assert_eq!(
            VariableError::PhaseOutOfRange {
                phase: 3,
                phases: 3
            }
            .to_string(),
            "Phase 3 out of range for 3 phases"
        );
    }

    #[test]
    fn config_error_display_messages() {
        assert_eq!(
            ConfigError::EmptyTimings.to_string(),
            "Timing sequence is empty"
        );
        assert_eq!(
            ConfigError::NonPositiveDuration {
                index: 1,
                value: 0.0
            }
            .to_string(),
            "Invalid duration at phase 1: 0 (must be > 0)"
        );
        assert_eq!(
            ConfigError::InvalidBounds { min: 0.6, max: 0.1 }.to_string(),
            "Invalid duration bounds [0.6, 0.1] (need 0 < min <= max)"
        );
        assert_eq!(
            ConfigError::PhaseOrder {
                foot: 2,
                message: "first phase must be stance".into()
            }
            .to_string(),
            "Invalid phase order for foot 2: first phase must be stance"
        );
        assert_eq!(
            ConfigError::MissingField("feet".into()).to_string(),
            "Missing required field: feet"
        );
        assert_eq!(
            ConfigError::InvalidValue {
                field: "lift_height".into(),
                message: "must be non-negative".into()
            }
            .to_string(),
            "Invalid value for lift_height: must be non-negative"
        );
    }

    #[test]
    fn motion_error_display_message() {
        assert_eq!(
            MotionError::ContactOutOfRange { index: 4, count: 2 }.to_string(),
            "Contact 4 out of range: only 2 free contacts"
        );
    }
}
