// stance-core: end-effector ids and containers, optimization capabilities, config and errors.

pub mod composite;
pub mod config;
pub mod endeffectors;
pub mod error;
pub mod state;
pub mod traits;

pub use composite::{SharedVariableSet, VariableComposite};
pub use config::{FootConfig, MotionConfig, PhaseConfig, ProblemConfig, ScheduleConfig};
pub use endeffectors::{
    EndeffectorId, Endeffectors, EndeffectorsBool, EndeffectorsPos, EndeffectorsVel,
};
pub use error::{ConfigError, MotionError, StanceError, VariableError};
pub use state::StateLin3d;
pub use traits::{Bounds, Constraint, ContactScheduleObserver, Jacobian, VariableSet};
