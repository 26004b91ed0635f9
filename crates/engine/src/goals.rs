//! Savings goals.
//!
//! A goal is either active or deleted; deleting it is how the user marks it
//! as achieved. There is no partial-progress update.

use serde::{Deserialize, Serialize};

use crate::{Amount, EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target: Amount,
    pub current: Amount,
}

impl Goal {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        target: f64,
        current: f64,
    ) -> ResultEngine<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EngineError::empty("goal name"));
        }
        Ok(Self {
            id: id.into(),
            name,
            target: Amount::non_negative(target)?,
            current: Amount::non_negative(current)?,
        })
    }

    /// What is still missing to reach the target, never below zero.
    pub fn remaining(&self) -> Amount {
        if self.current >= self.target {
            Amount::ZERO
        } else {
            self.target - self.current
        }
    }

    /// Saved share of the target in percent; `None` for a zero target.
    pub fn progress(&self) -> Option<f64> {
        self.current.percentage_of(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_and_progress() {
        let goal = Goal::new("g", "Bike", 400.0, 100.0).unwrap();
        assert_eq!(goal.remaining(), Amount::new(300.0));
        assert_eq!(goal.progress(), Some(25.0));

        let reached = Goal::new("g", "Bike", 400.0, 450.0).unwrap();
        assert_eq!(reached.remaining(), Amount::ZERO);
    }

    #[test]
    fn zero_target_has_no_progress() {
        let goal = Goal::new("g", "Someday", 0.0, 0.0).unwrap();
        assert_eq!(goal.progress(), None);
    }

    #[test]
    fn rejects_blank_name_and_negative_target() {
        assert!(Goal::new("g", " ", 10.0, 0.0).is_err());
        assert!(Goal::new("g", "Car", -10.0, 0.0).is_err());
    }
}
