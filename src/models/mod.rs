pub mod ledger;
pub mod priority;
pub mod task;
pub mod timer;
pub mod user;

pub use ledger::{ItemKind, Ledger, TaskDescriptor, TransactionResult, TransactionStatus};
pub use priority::{compute_priority, sort_tasks, Importance, Priority};
pub use task::TaskSubmission;
pub use timer::{route_point_request, Continuation, PointOutcome, PointRoute, TimerTicket};
pub use user::{Credentials, UserRecord};
