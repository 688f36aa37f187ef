use serde::{Deserialize, Serialize};

use crate::endeffectors::EndeffectorId;
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_min_duration() -> f64 {
    0.1
}
const fn default_max_duration() -> f64 {
    1.0
}
const fn default_lift_height() -> f64 {
    0.03
}
const fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// ScheduleConfig
// ---------------------------------------------------------------------------

/// Bounds applied to every optimized phase duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Shortest allowed phase in seconds (default: 0.1).
    #[serde(default = "default_min_duration")]
    pub min_duration: f64,

    /// Longest allowed phase in seconds (default: 1.0).
    #[serde(default = "default_max_duration")]
    pub max_duration: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            min_duration: default_min_duration(),
            max_duration: default_max_duration(),
        }
    }
}

impl ScheduleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_duration_bounds(self.min_duration, self.max_duration)
    }
}

/// Check `0 < min <= max`, both finite.
pub fn validate_duration_bounds(min: f64, max: f64) -> Result<(), ConfigError> {
    if !(min > 0.0 && min.is_finite() && max.is_finite() && min <= max) {
        return Err(ConfigError::InvalidBounds { min, max });
    }
    Ok(())
}

/// Check that a timing list is non-empty with finite positive entries.
pub fn validate_timings(timings: &[f64]) -> Result<(), ConfigError> {
    if timings.is_empty() {
        return Err(ConfigError::EmptyTimings);
    }
    if let Some((index, &value)) = timings
        .iter()
        .enumerate()
        .find(|&(_, &t)| !(t > 0.0 && t.is_finite()))
    {
        return Err(ConfigError::NonPositiveDuration { index, value });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// MotionConfig
// ---------------------------------------------------------------------------

/// Shape of the swing trajectories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Peak foot height above the straight start-goal line (meters, default: 0.03).
    #[serde(default = "default_lift_height")]
    pub lift_height: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            lift_height: default_lift_height(),
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.lift_height >= 0.0 && self.lift_height.is_finite()) {
            return Err(ConfigError::InvalidValue {
                field: "lift_height".into(),
                message: format!("{} must be finite and non-negative", self.lift_height),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PhaseConfig / FootConfig
// ---------------------------------------------------------------------------

/// One stance or swing phase of the initial guess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseConfig {
    #[serde(default = "default_true")]
    pub contact: bool,
    pub duration: f64,
    /// Landing position, required for swing phases.
    #[serde(default)]
    pub goal: Option<[f64; 3]>,
}

impl PhaseConfig {
    pub const fn stance(duration: f64) -> Self {
        Self {
            contact: true,
            duration,
            goal: None,
        }
    }

    pub const fn swing(duration: f64, goal: [f64; 3]) -> Self {
        Self {
            contact: false,
            duration,
            goal: Some(goal),
        }
    }
}

/// Initial contact sequence of one foot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootConfig {
    /// Position of the initial stance, never optimized.
    #[serde(default)]
    pub initial_position: [f64; 3],
    pub phases: Vec<PhaseConfig>,
}

impl FootConfig {
    /// Phase durations in order.
    pub fn timings(&self) -> Vec<f64> {
        self.phases.iter().map(|p| p.duration).collect()
    }

    /// Validate this foot's phase list. `foot` only labels errors.
    pub fn validate(&self, foot: usize) -> Result<(), ConfigError> {
        validate_timings(&self.timings())?;
        let phase_order = |message: String| ConfigError::PhaseOrder { foot, message };

        if !self.phases[0].contact {
            return Err(phase_order("first phase must be stance".into()));
        }
        for (i, pair) in self.phases.windows(2).enumerate() {
            if pair[0].contact == pair[1].contact {
                return Err(phase_order(format!(
                    "phases {i} and {} do not alternate stance/swing",
                    i + 1
                )));
            }
        }
        if let Some(i) = self
            .phases
            .iter()
            .position(|p| !p.contact && p.goal.is_none())
        {
            return Err(phase_order(format!("swing phase {i} has no goal")));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ProblemConfig
// ---------------------------------------------------------------------------

/// Everything needed to set up the contact-timing problem for all feet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemConfig {
    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub motion: MotionConfig,

    /// One entry per foot, E0 first.
    #[serde(default)]
    pub feet: Vec<FootConfig>,
}

impl ProblemConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.schedule.validate()?;
        self.motion.validate()?;
        if self.feet.is_empty() {
            return Err(ConfigError::MissingField("feet".into()));
        }
        if self.feet.len() > EndeffectorId::MAX_COUNT {
            return Err(ConfigError::InvalidValue {
                field: "feet".into(),
                message: format!(
                    "{} feet given, at most {} supported",
                    self.feet.len(),
                    EndeffectorId::MAX_COUNT
                ),
            });
        }
        for (i, foot) in self.feet.iter().enumerate() {
            foot.validate(i)?;
        }
        Ok(())
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
