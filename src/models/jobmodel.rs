use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

/// Job lifecycle. `Searching` is the only state where `worker_id` is NULL;
/// `Completed` and `Cancelled` are terminal.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "job_status", rename_all = "snake_case")]
pub enum JobStatus {
    Searching,
    Accepted,
    Arrived,
    InProgress,
    CompletedPendingPayment,
    Completed,
    Cancelled,
    Disputed,
}

impl JobStatus {
    pub fn to_str(&self) -> &str {
        match self {
            JobStatus::Searching => "searching",
            JobStatus::Accepted => "accepted",
            JobStatus::Arrived => "arrived",
            JobStatus::InProgress => "in_progress",
            JobStatus::CompletedPendingPayment => "completed_pending_payment",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
            JobStatus::Disputed => "disputed",
        }
    }

    /// The permitted-transition relation. Every mutation path revalidates
    /// against this before touching the database.
    pub fn can_transition_to(&self, to: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (*self, to),
            (Searching, Accepted)
                | (Accepted, Arrived)
                | (Arrived, InProgress)
                | (InProgress, CompletedPendingPayment)
                | (CompletedPendingPayment, Completed)
                | (Searching, Cancelled)
                | (Accepted, Cancelled)
                | (Accepted, Disputed)
                | (Arrived, Disputed)
                | (InProgress, Disputed)
                | (Disputed, Completed)
                | (Disputed, Cancelled)
        )
    }

    /// States a customer may dispute from. Resolution leaves `Disputed`
    /// only toward a terminal state, never back to an active one.
    pub fn is_disputable(&self) -> bool {
        matches!(
            self,
            JobStatus::Accepted | JobStatus::Arrived | JobStatus::InProgress
        )
    }

    pub fn is_cancellable_by_customer(&self) -> bool {
        matches!(self, JobStatus::Searching | JobStatus::Accepted)
    }
}

/// Closed icon set for category display. Unknown/legacy names map to
/// `Wrench` at the DTO boundary rather than fuzzy text matching.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "category_icon", rename_all = "snake_case")]
pub enum CategoryIcon {
    Wrench,
    Bolt,
    Broom,
    PaintRoller,
    Hammer,
    Snowflake,
    Leaf,
    Truck,
    Sparkles,
}

impl CategoryIcon {
    pub fn fallback() -> Self {
        CategoryIcon::Wrench
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ServiceCategory {
    pub id: Uuid,
    pub name: String,
    pub icon: CategoryIcon,
    pub description: String,
    pub base_price: BigDecimal,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub worker_id: Option<Uuid>,
    /// May dangle after a category deletion; joins must tolerate it.
    pub category_id: Uuid,
    pub description: String,
    pub images: Option<Vec<String>>,
    pub location_address: String,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub status: JobStatus,
    pub scheduled_time: Option<DateTime<Utc>>,
    /// Final amount, set by the worker at completion.
    pub amount: Option<BigDecimal>,
    /// 4-digit code generated at creation; sole gate for Arrived -> InProgress.
    #[serde(skip_serializing)]
    pub otp: String,
    pub dispute_reason: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Job {
    /// `worker_id` is NULL iff the job is still searching.
    pub fn assignment_consistent(&self) -> bool {
        (self.status == JobStatus::Searching) == self.worker_id.is_none()
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub job_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewee_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions_are_legal() {
        use JobStatus::*;
        let path = [
            (Searching, Accepted),
            (Accepted, Arrived),
            (Arrived, InProgress),
            (InProgress, CompletedPendingPayment),
            (CompletedPendingPayment, Completed),
        ];
        for (from, to) in path {
            assert!(from.can_transition_to(to), "{:?} -> {:?}", from, to);
        }
    }

    #[test]
    fn terminal_states_admit_no_exit() {
        use JobStatus::*;
        let all = [
            Searching,
            Accepted,
            Arrived,
            InProgress,
            CompletedPendingPayment,
            Completed,
            Cancelled,
            Disputed,
        ];
        for to in all {
            assert!(!Completed.can_transition_to(to));
            assert!(!Cancelled.can_transition_to(to));
        }
    }

    #[test]
    fn cancellation_only_before_arrival() {
        use JobStatus::*;
        assert!(Searching.is_cancellable_by_customer());
        assert!(Accepted.is_cancellable_by_customer());
        for s in [Arrived, InProgress, CompletedPendingPayment, Completed, Cancelled, Disputed] {
            assert!(!s.is_cancellable_by_customer(), "{:?}", s);
        }
    }

    #[test]
    fn dispute_reachable_only_from_active_states() {
        use JobStatus::*;
        assert!(Accepted.is_disputable());
        assert!(Arrived.is_disputable());
        assert!(InProgress.is_disputable());
        for s in [Searching, CompletedPendingPayment, Completed, Cancelled, Disputed] {
            assert!(!s.is_disputable(), "{:?}", s);
        }
    }

    #[test]
    fn dispute_resolves_only_to_terminal_states() {
        use JobStatus::*;
        assert!(Disputed.can_transition_to(Completed));
        assert!(Disputed.can_transition_to(Cancelled));
        for s in [Searching, Accepted, Arrived, InProgress, CompletedPendingPayment] {
            assert!(!Disputed.can_transition_to(s), "{:?}", s);
        }
    }

    #[test]
    fn skipping_states_is_illegal() {
        use JobStatus::*;
        assert!(!Searching.can_transition_to(Arrived));
        assert!(!Searching.can_transition_to(InProgress));
        assert!(!Accepted.can_transition_to(InProgress));
        assert!(!Arrived.can_transition_to(CompletedPendingPayment));
        assert!(!InProgress.can_transition_to(Completed));
    }
}
