use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_REST_TO_WORK_RATIO, ERR_EMPTY_NAME, ERR_POINTS_NOT_POSITIVE, ERR_UNKNOWN_KIND,
    ERR_ZERO_POINT_CHANGE, MAX_QUOTE_SEED_LEN,
};
use crate::error::{AppError, Result};
use crate::models::Priority;

/// Per-user record of point balance, rewards and tasks
///
/// Stored as JSON in the `ledgers` table, keyed by username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Point balance; never negative after a committed transaction
    pub point: i64,
    /// Reward name -> cost
    pub rewards: BTreeMap<String, i64>,
    /// Task name -> descriptor
    pub tasks: BTreeMap<String, TaskDescriptor>,
    /// Opaque text used to bias quote retrieval
    #[serde(default)]
    pub favorite_quote_seed: String,
    #[serde(default = "default_rest_to_work_ratio")]
    pub rest_to_work_ratio: i64,
}

fn default_rest_to_work_ratio() -> i64 {
    DEFAULT_REST_TO_WORK_RATIO
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            point: 0,
            rewards: BTreeMap::new(),
            tasks: BTreeMap::new(),
            favorite_quote_seed: String::new(),
            rest_to_work_ratio: DEFAULT_REST_TO_WORK_RATIO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub points: i64,
    /// Countdown length in minutes; 0 completes immediately
    pub time: i64,
    pub priority: Priority,
    pub repeat: bool,
}

/// Which map a point change or removal targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Reward,
    Task,
}

impl ItemKind {
    /// Kind implied by the sign of a point change: spending is a reward
    /// redemption, earning is a task completion.
    pub fn from_delta(delta: i64) -> Option<Self> {
        match delta.signum() {
            -1 => Some(ItemKind::Reward),
            1 => Some(ItemKind::Task),
            _ => None,
        }
    }
}

impl std::str::FromStr for ItemKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "reward" => Ok(ItemKind::Reward),
            "task" => Ok(ItemKind::Task),
            _ => Err(AppError::InvalidArgument(ERR_UNKNOWN_KIND.to_string())),
        }
    }
}

/// Outcome of a point transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Balance would go negative; nothing was changed
    InsufficientPoints,
    Ok,
    /// Non-repeating task completed and removed
    OkDeleted,
    /// Non-repeating task was already gone
    OkMissing,
}

impl TransactionStatus {
    pub fn message(self) -> &'static str {
        match self {
            TransactionStatus::InsufficientPoints => "Failed, not enough points",
            TransactionStatus::Ok => "Success",
            TransactionStatus::OkDeleted => "Success. The task was removed automatically",
            TransactionStatus::OkMissing => "Success. The task no longer exists",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransactionResult {
    pub status: TransactionStatus,
    pub balance: i64,
    pub message: &'static str,
}

impl TransactionResult {
    fn new(status: TransactionStatus, balance: i64) -> Self {
        Self {
            status,
            balance,
            message: status.message(),
        }
    }
}

fn require_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidArgument(ERR_EMPTY_NAME.to_string()));
    }
    Ok(())
}

impl Ledger {
    /// Add or replace a reward
    pub fn add_reward(&mut self, name: &str, cost: i64) -> Result<()> {
        require_name(name)?;
        if cost <= 0 {
            return Err(AppError::InvalidArgument(
                ERR_POINTS_NOT_POSITIVE.to_string(),
            ));
        }

        if self.rewards.insert(name.to_string(), cost).is_some() {
            tracing::info!("Reward {:?} replaced with cost {}", name, cost);
        }
        Ok(())
    }

    /// Add or replace a task
    pub fn add_task(&mut self, name: &str, task: TaskDescriptor) -> Result<()> {
        require_name(name)?;
        if task.points <= 0 {
            return Err(AppError::InvalidArgument(
                ERR_POINTS_NOT_POSITIVE.to_string(),
            ));
        }
        if task.time < 0 {
            return Err(AppError::InvalidArgument(
                "Time must not be negative".to_string(),
            ));
        }

        if self.tasks.insert(name.to_string(), task).is_some() {
            tracing::info!("Task {:?} replaced", name);
        }
        Ok(())
    }

    /// Remove every listed name from the chosen map; unknown names are ignored.
    ///
    /// Returns how many entries were removed.
    pub fn remove_items<S: AsRef<str>>(&mut self, kind: ItemKind, names: &[S]) -> usize {
        names
            .iter()
            .filter(|name| match kind {
                ItemKind::Reward => self.rewards.remove(name.as_ref()).is_some(),
                ItemKind::Task => self.tasks.remove(name.as_ref()).is_some(),
            })
            .count()
    }

    /// Apply a signed point change.
    ///
    /// Negative deltas redeem rewards and positive deltas complete tasks; an
    /// explicit `kind` that disagrees with the sign is rejected. A change that
    /// would take the balance below zero leaves the ledger untouched.
    pub fn apply_point_change(
        &mut self,
        delta: i64,
        name: &str,
        kind: ItemKind,
        repeat: bool,
    ) -> Result<TransactionResult> {
        require_name(name)?;
        let Some(implied) = ItemKind::from_delta(delta) else {
            return Err(AppError::InvalidArgument(ERR_ZERO_POINT_CHANGE.to_string()));
        };
        if implied != kind {
            tracing::warn!(
                "Point change {} for {:?} does not match kind {:?}",
                delta,
                name,
                kind
            );
            return Err(AppError::InvalidArgument(format!(
                "A {} point change cannot be applied to a {:?}",
                if delta < 0 { "negative" } else { "positive" },
                kind
            )));
        }

        let new_balance = self
            .point
            .checked_add(delta)
            .ok_or_else(|| AppError::InvalidArgument("Point change is too large".to_string()))?;

        if new_balance < 0 {
            return Ok(TransactionResult::new(
                TransactionStatus::InsufficientPoints,
                self.point,
            ));
        }

        self.point = new_balance;

        let status = match kind {
            ItemKind::Reward => TransactionStatus::Ok,
            ItemKind::Task if repeat => TransactionStatus::Ok,
            ItemKind::Task => {
                if self.tasks.remove(name).is_some() {
                    TransactionStatus::OkDeleted
                } else {
                    tracing::info!("Completed task {:?} was already removed", name);
                    TransactionStatus::OkMissing
                }
            }
        };

        Ok(TransactionResult::new(status, new_balance))
    }

    /// Update the timer's rest-to-work ratio
    pub fn set_rest_to_work_ratio(&mut self, ratio: i64) -> Result<()> {
        if ratio <= 0 {
            return Err(AppError::InvalidArgument(
                "Ratio must be a positive integer".to_string(),
            ));
        }
        self.rest_to_work_ratio = ratio;
        Ok(())
    }

    pub fn set_favorite_quote_seed(&mut self, seed: String) -> Result<()> {
        if seed.chars().count() > MAX_QUOTE_SEED_LEN {
            return Err(AppError::InvalidArgument(format!(
                "Quote seed must be at most {MAX_QUOTE_SEED_LEN} characters"
            )));
        }
        self.favorite_quote_seed = seed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_shot_task(points: i64) -> TaskDescriptor {
        TaskDescriptor {
            points,
            time: 0,
            priority: Priority::Score(10),
            repeat: false,
        }
    }

    fn ledger_with_points(point: i64) -> Ledger {
        Ledger {
            point,
            ..Ledger::default()
        }
    }

    #[test]
    fn test_new_ledger_is_empty() {
        let ledger = Ledger::default();
        assert_eq!(ledger.point, 0);
        assert!(ledger.rewards.is_empty());
        assert!(ledger.tasks.is_empty());
        assert_eq!(ledger.rest_to_work_ratio, DEFAULT_REST_TO_WORK_RATIO);
    }

    #[test]
    fn test_insufficient_points_leaves_balance() {
        let mut ledger = ledger_with_points(3);
        let before = ledger.clone();

        let result = ledger
            .apply_point_change(-5, "coffee", ItemKind::Reward, false)
            .unwrap();

        assert_eq!(result.status, TransactionStatus::InsufficientPoints);
        assert_eq!(result.balance, 3);
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_reward_redemption_spends_points() {
        let mut ledger = ledger_with_points(8);
        ledger.add_reward("coffee", 5).unwrap();

        let result = ledger
            .apply_point_change(-5, "coffee", ItemKind::Reward, false)
            .unwrap();

        assert_eq!(result.status, TransactionStatus::Ok);
        assert_eq!(result.balance, 3);
        assert_eq!(ledger.point, 3);
        // Rewards are reusable
        assert!(ledger.rewards.contains_key("coffee"));
    }

    #[test]
    fn test_spending_to_exactly_zero_is_allowed() {
        let mut ledger = ledger_with_points(5);
        let result = ledger
            .apply_point_change(-5, "coffee", ItemKind::Reward, false)
            .unwrap();
        assert_eq!(result.status, TransactionStatus::Ok);
        assert_eq!(ledger.point, 0);
    }

    #[test]
    fn test_completing_one_shot_task_removes_it() {
        let mut ledger = Ledger::default();
        ledger.add_task("X", one_shot_task(10)).unwrap();

        let result = ledger
            .apply_point_change(10, "X", ItemKind::Task, false)
            .unwrap();

        assert_eq!(result.status, TransactionStatus::OkDeleted);
        assert_eq!(ledger.point, 10);
        assert!(!ledger.tasks.contains_key("X"));
    }

    #[test]
    fn test_completing_repeating_task_keeps_it() {
        let mut ledger = Ledger::default();
        let mut task = one_shot_task(4);
        task.repeat = true;
        ledger.add_task("stretch", task).unwrap();

        let result = ledger
            .apply_point_change(4, "stretch", ItemKind::Task, true)
            .unwrap();

        assert_eq!(result.status, TransactionStatus::Ok);
        assert_eq!(ledger.point, 4);
        assert!(ledger.tasks.contains_key("stretch"));
    }

    #[test]
    fn test_missing_task_is_benign_and_repeatable() {
        let mut ledger = Ledger::default();

        let first = ledger
            .apply_point_change(7, "ghost", ItemKind::Task, false)
            .unwrap();
        let second = ledger
            .apply_point_change(7, "ghost", ItemKind::Task, false)
            .unwrap();

        assert_eq!(first.status, TransactionStatus::OkMissing);
        assert_eq!(second.status, TransactionStatus::OkMissing);
        assert_eq!(ledger.point, 14);
    }

    #[test]
    fn test_zero_delta_is_rejected() {
        let mut ledger = ledger_with_points(5);
        assert!(matches!(
            ledger.apply_point_change(0, "X", ItemKind::Task, false),
            Err(AppError::InvalidArgument(_))
        ));
        assert_eq!(ledger.point, 5);
    }

    #[test]
    fn test_kind_must_match_sign() {
        let mut ledger = ledger_with_points(50);
        ledger.add_task("X", one_shot_task(10)).unwrap();

        assert!(matches!(
            ledger.apply_point_change(-10, "X", ItemKind::Task, false),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            ledger.apply_point_change(10, "X", ItemKind::Reward, false),
            Err(AppError::InvalidArgument(_))
        ));
        assert_eq!(ledger.point, 50);
        assert!(ledger.tasks.contains_key("X"));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut ledger = Ledger::default();
        assert!(ledger.apply_point_change(3, "", ItemKind::Task, false).is_err());
        assert!(ledger.add_reward("  ", 3).is_err());
        assert!(ledger.add_task("", one_shot_task(1)).is_err());
    }

    #[test]
    fn test_overflow_is_rejected() {
        let mut ledger = ledger_with_points(i64::MAX);
        assert!(matches!(
            ledger.apply_point_change(1, "X", ItemKind::Task, true),
            Err(AppError::InvalidArgument(_))
        ));
        assert_eq!(ledger.point, i64::MAX);
    }

    #[test]
    fn test_reward_cost_must_be_positive() {
        let mut ledger = Ledger::default();
        assert!(ledger.add_reward("free", 0).is_err());
        assert!(ledger.add_reward("negative", -4).is_err());
        assert!(ledger.rewards.is_empty());
    }

    #[test]
    fn test_remove_items_ignores_unknown_names() {
        let mut ledger = Ledger::default();
        ledger.add_reward("coffee", 50).unwrap();
        ledger.add_reward("movie", 120).unwrap();
        ledger.add_task("coffee", one_shot_task(2)).unwrap();

        let removed = ledger.remove_items(ItemKind::Reward, &["coffee", "nope"]);

        assert_eq!(removed, 1);
        assert!(!ledger.rewards.contains_key("coffee"));
        assert!(ledger.rewards.contains_key("movie"));
        // Only the chosen map is touched
        assert!(ledger.tasks.contains_key("coffee"));
    }

    #[test]
    fn test_add_and_remove_do_not_touch_balance() {
        let mut ledger = ledger_with_points(12);
        ledger.add_reward("coffee", 50).unwrap();
        assert_eq!(ledger.rewards.get("coffee"), Some(&50));
        ledger.remove_items(ItemKind::Reward, &["coffee"]);
        assert!(ledger.rewards.is_empty());
        assert_eq!(ledger.point, 12);
    }

    #[test]
    fn test_kind_from_delta() {
        assert_eq!(ItemKind::from_delta(-3), Some(ItemKind::Reward));
        assert_eq!(ItemKind::from_delta(3), Some(ItemKind::Task));
        assert_eq!(ItemKind::from_delta(0), None);
    }

    #[test]
    fn test_ratio_must_be_positive() {
        let mut ledger = Ledger::default();
        assert!(ledger.set_rest_to_work_ratio(0).is_err());
        ledger.set_rest_to_work_ratio(3).unwrap();
        assert_eq!(ledger.rest_to_work_ratio, 3);
    }

    #[test]
    fn test_quote_seed_length_is_capped() {
        let mut ledger = Ledger::default();
        ledger
            .set_favorite_quote_seed("a".repeat(MAX_QUOTE_SEED_LEN))
            .unwrap();
        assert_eq!(ledger.favorite_quote_seed.len(), MAX_QUOTE_SEED_LEN);

        assert!(matches!(
            ledger.set_favorite_quote_seed("a".repeat(MAX_QUOTE_SEED_LEN + 1)),
            Err(AppError::InvalidArgument(_))
        ));
        assert_eq!(ledger.favorite_quote_seed.len(), MAX_QUOTE_SEED_LEN);
    }

    #[test]
    fn test_remove_several_tasks() {
        let mut ledger = ledger_with_points(9);
        ledger.add_reward("coffee", 50).unwrap();
        for name in ["dishes", "essay", "run"] {
            ledger.add_task(name, one_shot_task(3)).unwrap();
        }

        let removed = ledger.remove_items(ItemKind::Task, &["dishes", "run", "ghost"]);

        assert_eq!(removed, 2);
        assert_eq!(ledger.tasks.keys().collect::<Vec<_>>(), vec!["essay"]);
        assert!(ledger.rewards.contains_key("coffee"));
        assert_eq!(ledger.point, 9);
    }

    #[test]
    fn test_ledger_json_layout() {
        let mut ledger = ledger_with_points(9);
        ledger.add_reward("coffee", 50).unwrap();
        ledger
            .add_task(
                "read",
                TaskDescriptor {
                    points: 3,
                    time: 25,
                    priority: Priority::Max,
                    repeat: true,
                },
            )
            .unwrap();

        let value = serde_json::to_value(&ledger).unwrap();
        assert_eq!(value["point"], 9);
        assert_eq!(value["rewards"]["coffee"], 50);
        assert_eq!(value["tasks"]["read"]["priority"], "max");
        assert_eq!(value["tasks"]["read"]["repeat"], true);

        let decoded: Ledger = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, ledger);
    }
}
