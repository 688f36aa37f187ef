//! Contact timing as optimization variables.
//!
//! Every foot's stance/swing durations become a [`ContactSchedule`]: a
//! variable set of `phases - 1` free durations whose last phase absorbs the
//! remainder of the fixed total time. The schedule pushes every accepted
//! iterate to the foot motions observing it and provides the Jacobian of
//! their positions w.r.t. the durations.

pub mod foothold;
pub mod jacobian;
pub mod problem;
pub mod schedule;

pub use foothold::{FootholdConstraint, SharedSchedule};
pub use jacobian::pos_jacobian_wrt_durations;
pub use problem::{MotionProblem, SCHEDULES_NAME};
pub use schedule::{ContactSchedule, schedule_name};
