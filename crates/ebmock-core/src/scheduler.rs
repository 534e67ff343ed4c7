//! Pending status transitions.
//!
//! Creating or terminating an environment schedules a follow-up transition
//! that completes after a delay. The scheduler only records what is pending;
//! the engine decides when to fire due entries against the store.

use chrono::{DateTime, Utc};
use ebmock_schema::EnvironmentId;
use ebmock_store::EnvironmentStatus;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TaskId(u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransitionKind {
    LaunchComplete,
    TerminateComplete,
}

impl TransitionKind {
    /// Status the environment moves to when the transition fires.
    pub fn target(self) -> EnvironmentStatus {
        match self {
            TransitionKind::LaunchComplete => EnvironmentStatus::Launched,
            TransitionKind::TerminateComplete => EnvironmentStatus::Terminated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledTransition {
    pub id: TaskId,
    pub environment_id: EnvironmentId,
    pub kind: TransitionKind,
    pub due_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    pending: Vec<ScheduledTransition>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(
        &mut self,
        environment_id: EnvironmentId,
        kind: TransitionKind,
        due_at: DateTime<Utc>,
    ) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(ScheduledTransition {
            id,
            environment_id,
            kind,
            due_at,
        });
        id
    }

    pub fn pending(&self) -> &[ScheduledTransition] {
        &self.pending
    }

    pub fn pending_for<'a>(
        &'a self,
        environment_id: &'a str,
    ) -> impl Iterator<Item = &'a ScheduledTransition> + 'a {
        self.pending
            .iter()
            .filter(move |t| t.environment_id == environment_id)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest due time among pending transitions.
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.pending.iter().map(|t| t.due_at).min()
    }

    /// Remove and return every transition due at or before `now`, earliest
    /// first. Transitions due at the same instant keep scheduling order.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<ScheduledTransition> {
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|t| t.due_at <= now);
        self.pending = rest;
        due.sort_by_key(|t| (t.due_at, t.id));
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn id(s: &str) -> EnvironmentId {
        EnvironmentId::new(s)
    }

    #[test]
    fn nothing_is_due_before_its_time() {
        let now = Utc::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(
            id("e-aaaaaaaaaa"),
            TransitionKind::LaunchComplete,
            now + Duration::milliseconds(50),
        );
        assert!(scheduler.take_due(now).is_empty());
        assert_eq!(scheduler.pending().len(), 1);
    }

    #[test]
    fn due_transitions_come_out_in_order() {
        let now = Utc::now();
        let mut scheduler = Scheduler::new();
        let late = scheduler.schedule(
            id("e-aaaaaaaaaa"),
            TransitionKind::TerminateComplete,
            now + Duration::milliseconds(20),
        );
        let early = scheduler.schedule(
            id("e-bbbbbbbbbb"),
            TransitionKind::LaunchComplete,
            now + Duration::milliseconds(10),
        );
        let tie = scheduler.schedule(
            id("e-cccccccccc"),
            TransitionKind::LaunchComplete,
            now + Duration::milliseconds(20),
        );
        let due = scheduler.take_due(now + Duration::milliseconds(20));
        let order: Vec<TaskId> = due.iter().map(|t| t.id).collect();
        assert_eq!(order, vec![early, late, tie]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn pending_for_filters_by_environment() {
        let now = Utc::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(id("e-aaaaaaaaaa"), TransitionKind::LaunchComplete, now);
        scheduler.schedule(id("e-bbbbbbbbbb"), TransitionKind::LaunchComplete, now);
        scheduler.schedule(id("e-aaaaaaaaaa"), TransitionKind::TerminateComplete, now);
        assert_eq!(scheduler.pending_for("e-aaaaaaaaaa").count(), 2);
        assert_eq!(scheduler.next_due(), Some(now));
    }

    #[test]
    fn kinds_target_final_statuses() {
        assert_eq!(TransitionKind::LaunchComplete.target(), EnvironmentStatus::Launched);
        assert_eq!(
            TransitionKind::TerminateComplete.target(),
            EnvironmentStatus::Terminated
        );
    }
}
