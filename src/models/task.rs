use crate::constants::{ERR_EMPTY_NAME, ERR_POINTS_NOT_POSITIVE, MAX_TASK_SCORE};
use crate::error::{AppError, Result};
use crate::models::{compute_priority, Importance, TaskDescriptor};

/// Parsed add-task submission, before its priority is scored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSubmission {
    pub name: String,
    pub points: i64,
    pub time: i64,
    pub importance: Importance,
    pub value: i64,
    pub urgent: i64,
    pub repeat: bool,
}

impl TaskSubmission {
    /// Check business ranges and score the task
    pub fn into_descriptor(self) -> Result<(String, TaskDescriptor)> {
        if self.name.trim().is_empty() {
            return Err(AppError::InvalidArgument(ERR_EMPTY_NAME.to_string()));
        }
        if self.points <= 0 {
            return Err(AppError::InvalidArgument(
                ERR_POINTS_NOT_POSITIVE.to_string(),
            ));
        }
        if self.time < 0 {
            return Err(AppError::InvalidArgument(
                "Time must not be negative".to_string(),
            ));
        }
        if !(1..=MAX_TASK_SCORE).contains(&self.value) {
            return Err(AppError::InvalidArgument(format!(
                "Value must be between 1 and {MAX_TASK_SCORE}"
            )));
        }
        if !(1..=MAX_TASK_SCORE).contains(&self.urgent) {
            return Err(AppError::InvalidArgument(format!(
                "Urgency must be between 1 and {MAX_TASK_SCORE}"
            )));
        }

        let priority = compute_priority(self.importance, self.urgent, self.value, self.time);
        let descriptor = TaskDescriptor {
            points: self.points,
            time: self.time,
            priority,
            repeat: self.repeat,
        };

        Ok((self.name, descriptor))
    }
}
