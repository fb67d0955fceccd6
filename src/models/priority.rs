//! Task priority scoring and display ordering.
//!
//! A task's priority is either a finite score or the `"max"` sentinel, which
//! outranks every score. Scores are computed as
//! `importance*4 + urgency*2 + value*3 - time/10`, rounded half up
//! (toward positive infinity) to the nearest integer.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::TaskDescriptor;

/// Stored priority of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PriorityRepr", into = "PriorityRepr")]
pub enum Priority {
    Score(i64),
    Max,
}

/// JSON shape of a priority: a bare integer or the string `"max"`
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PriorityRepr {
    Score(i64),
    Sentinel(String),
}

impl TryFrom<PriorityRepr> for Priority {
    type Error = String;

    fn try_from(repr: PriorityRepr) -> Result<Self, Self::Error> {
        match repr {
            PriorityRepr::Score(score) => Ok(Priority::Score(score)),
            PriorityRepr::Sentinel(s) if s == "max" => Ok(Priority::Max),
            PriorityRepr::Sentinel(s) => Err(format!("unknown priority sentinel: {s}")),
        }
    }
}

impl From<Priority> for PriorityRepr {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Score(score) => PriorityRepr::Score(score),
            Priority::Max => PriorityRepr::Sentinel("max".to_string()),
        }
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Priority::Max, Priority::Max) => Ordering::Equal,
            (Priority::Max, Priority::Score(_)) => Ordering::Greater,
            (Priority::Score(_), Priority::Max) => Ordering::Less,
            (Priority::Score(a), Priority::Score(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Score(score) => write!(f, "{score}"),
            Priority::Max => f.write_str("max"),
        }
    }
}

/// Importance level chosen when a task is added
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Importance {
    Zero,
    Three,
    Four,
    /// Must-do escape hatch; always sorts first
    Max,
}

impl Importance {
    fn weight(self) -> Option<i64> {
        match self {
            Importance::Zero => Some(0),
            Importance::Three => Some(3),
            Importance::Four => Some(4),
            Importance::Max => None,
        }
    }
}

impl std::str::FromStr for Importance {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Importance::Zero),
            "3" => Ok(Importance::Three),
            "4" => Ok(Importance::Four),
            "max" => Ok(Importance::Max),
            other => Err(AppError::InvalidArgument(format!(
                "Importance must be one of 0, 3, 4 or max (got {other:?})"
            ))),
        }
    }
}

/// Compute a task's priority.
///
/// Inputs are validated by the caller; urgency and value are expected in
/// `1..=3` and `time_minutes` to be non-negative.
pub fn compute_priority(
    importance: Importance,
    urgency: i64,
    value: i64,
    time_minutes: i64,
) -> Priority {
    let Some(weight) = importance.weight() else {
        return Priority::Max;
    };

    // Work in tenths so the time penalty stays exact
    let base = weight * 4 + urgency * 2 + value * 3;
    let tenths = base * 10 - time_minutes;
    Priority::Score((tenths + 5).div_euclid(10))
}

/// Task names ordered for display: highest priority first.
///
/// Ties keep the map's iteration order, i.e. ascending by name.
pub fn sort_tasks(tasks: &BTreeMap<String, TaskDescriptor>) -> Vec<String> {
    let mut ranked: Vec<(&String, Priority)> = tasks
        .iter()
        .map(|(name, task)| (name, task.priority))
        .collect();

    // sort_by is stable, so equal priorities stay in name order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked.into_iter().map(|(name, _)| name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(priority: Priority) -> TaskDescriptor {
        TaskDescriptor {
            points: 1,
            time: 0,
            priority,
            repeat: false,
        }
    }

    #[test]
    fn test_max_importance_yields_sentinel() {
        for urgency in 1..=3 {
            for value in 1..=3 {
                for time in [0, 25, 1000] {
                    assert_eq!(
                        compute_priority(Importance::Max, urgency, value, time),
                        Priority::Max
                    );
                }
            }
        }
    }

    #[test]
    fn test_zero_time_has_no_penalty() {
        for (importance, weight) in [
            (Importance::Zero, 0),
            (Importance::Three, 3),
            (Importance::Four, 4),
        ] {
            for urgency in 1..=3 {
                for value in 1..=3 {
                    assert_eq!(
                        compute_priority(importance, urgency, value, 0),
                        Priority::Score(weight * 4 + urgency * 2 + value * 3)
                    );
                }
            }
        }
    }

    #[test]
    fn test_known_scores() {
        assert_eq!(compute_priority(Importance::Four, 3, 3, 0), Priority::Score(31));
        assert_eq!(compute_priority(Importance::Four, 3, 3, 50), Priority::Score(26));
    }

    #[test]
    fn test_rounding_is_half_up() {
        // 31 - 0.5 = 30.5
        assert_eq!(compute_priority(Importance::Four, 3, 3, 5), Priority::Score(31));
        // 31 - 0.4 = 30.6
        assert_eq!(compute_priority(Importance::Four, 3, 3, 4), Priority::Score(31));
        // 31 - 0.6 = 30.4
        assert_eq!(compute_priority(Importance::Four, 3, 3, 6), Priority::Score(30));
        // 5 - 15.5 = -10.5
        assert_eq!(compute_priority(Importance::Zero, 1, 1, 155), Priority::Score(-10));
    }

    #[test]
    fn test_importance_parsing() {
        assert_eq!("0".parse::<Importance>().unwrap(), Importance::Zero);
        assert_eq!("3".parse::<Importance>().unwrap(), Importance::Three);
        assert_eq!("4".parse::<Importance>().unwrap(), Importance::Four);
        assert_eq!("max".parse::<Importance>().unwrap(), Importance::Max);
        assert!(matches!(
            "2".parse::<Importance>(),
            Err(AppError::InvalidArgument(_))
        ));
        assert!("MAX".parse::<Importance>().is_err());
    }

    #[test]
    fn test_max_sorts_above_every_score() {
        assert!(Priority::Max > Priority::Score(i64::MAX));
        assert!(Priority::Score(-5) < Priority::Score(3));

        let mut tasks = BTreeMap::new();
        tasks.insert("a".to_string(), task(Priority::Score(40)));
        tasks.insert("b".to_string(), task(Priority::Max));
        tasks.insert("c".to_string(), task(Priority::Score(-2)));
        tasks.insert("d".to_string(), task(Priority::Score(12)));

        assert_eq!(sort_tasks(&tasks), vec!["b", "a", "d", "c"]);
    }

    #[test]
    fn test_ties_are_ordered_by_name() {
        let mut tasks = BTreeMap::new();
        tasks.insert("zeta".to_string(), task(Priority::Score(10)));
        tasks.insert("alpha".to_string(), task(Priority::Score(10)));
        tasks.insert("mid".to_string(), task(Priority::Max));
        tasks.insert("beta".to_string(), task(Priority::Max));

        assert_eq!(sort_tasks(&tasks), vec!["beta", "mid", "alpha", "zeta"]);
    }

    #[test]
    fn test_sort_empty() {
        assert!(sort_tasks(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_priority_json_shape() {
        assert_eq!(serde_json::to_string(&Priority::Max).unwrap(), "\"max\"");
        assert_eq!(serde_json::to_string(&Priority::Score(26)).unwrap(), "26");
        assert_eq!(
            serde_json::from_str::<Priority>("\"max\"").unwrap(),
            Priority::Max
        );
        assert_eq!(
            serde_json::from_str::<Priority>("-3").unwrap(),
            Priority::Score(-3)
        );
        assert!(serde_json::from_str::<Priority>("\"high\"").is_err());
    }
}
