//! Timer workflow for timed task completions.
//!
//! The countdown runs on the client, so no state is held between requests:
//! an armed task is handed back as a [`TimerTicket`] and the client echoes it
//! to the point endpoint with `from = "timer"` once the countdown elapses.
//!
//! ```text
//! Idle ──(time == 0 or reward)──> Resolved
//! Idle ──(time > 0)──> Armed ──(from timer)──> Completed   (task removed)
//!                                          └─> ReArmed     (task kept)
//! ReArmed ──(timer_submit)──> Armed
//! ```

use serde::Serialize;

use crate::constants::TIMER_FROM_PAGE;
use crate::models::{ItemKind, TransactionResult, TransactionStatus};

/// What the point endpoint should do with a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointRoute {
    /// Apply the change now and report the result
    Immediate,
    /// Start a countdown; no points move yet
    Arm,
    /// Countdown finished; apply the change
    Complete,
}

/// Decide how a point request is handled.
///
/// Rewards never enter the timer, whatever `time` says.
pub fn route_point_request(kind: ItemKind, time: i64, from_page: Option<&str>) -> PointRoute {
    match kind {
        ItemKind::Reward => PointRoute::Immediate,
        ItemKind::Task if time == 0 => PointRoute::Immediate,
        ItemKind::Task if from_page == Some(TIMER_FROM_PAGE) => PointRoute::Complete,
        ItemKind::Task => PointRoute::Arm,
    }
}

/// Everything the client needs to run a countdown and echo it back
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerTicket {
    pub name: String,
    pub value: i64,
    pub time: i64,
    pub repeat: bool,
    pub rest_time_to_work_ratio: i64,
}

/// Form data offered after a timed task that is still around
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Continuation {
    #[serde(rename = "fromPage")]
    pub from_page: &'static str,
    pub name: String,
    pub value: i64,
    pub time: i64,
    pub repeat: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PointOutcome {
    Resolved {
        name: String,
        result: TransactionResult,
    },
    Armed(TimerTicket),
    Completed {
        name: String,
        result: TransactionResult,
    },
    ReArmed {
        name: String,
        result: TransactionResult,
        continuation: Continuation,
    },
}

impl PointOutcome {
    /// Outcome of a countdown that has run out.
    ///
    /// Only a removed task ends the loop; anything else offers another round.
    pub fn after_countdown(
        name: String,
        value: i64,
        time: i64,
        repeat: bool,
        result: TransactionResult,
    ) -> Self {
        if result.status == TransactionStatus::OkDeleted {
            return PointOutcome::Completed { name, result };
        }

        PointOutcome::ReArmed {
            continuation: Continuation {
                from_page: TIMER_FROM_PAGE,
                name: name.clone(),
                value,
                time,
                repeat,
            },
            name,
            result,
        }
    }
}
