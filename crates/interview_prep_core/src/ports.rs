//! crates/interview_prep_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases.

use crate::domain::{Feedback, Interview, Question, User};
use crate::query::{FeedbackFilter, InterviewFilter, Pagination, QuestionFilter, UserFilter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A unique key (external identity id, email) or a one-to-one link is already taken.
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The document store behind every route.
///
/// List operations return records sorted by creation time, newest first, and
/// apply the pagination window after filtering. Count operations count every
/// record matching the filter. A list and its count are independent reads and
/// need not observe the same snapshot.
///
/// The `latest_*_change` operations return the newest `updated_at` among the
/// records matching a filter. Every insert and every link moves it forward, so
/// it serves as the modification date of a filtered collection.
#[async_trait]
pub trait DatabaseService: Send + Sync {
    /// Connectivity probe.
    async fn ping(&self) -> PortResult<()>;

    // --- Users ---
    /// Fails with `Conflict` when the external identity id or email is taken;
    /// nothing is written in that case.
    async fn create_user(&self, user: User) -> PortResult<User>;

    async fn find_user(&self, filter: &UserFilter) -> PortResult<Option<User>>;

    async fn list_users(&self, filter: &UserFilter, window: Pagination) -> PortResult<Vec<User>>;

    async fn count_users(&self, filter: &UserFilter) -> PortResult<u64>;

    async fn latest_user_change(&self, filter: &UserFilter) -> PortResult<Option<DateTime<Utc>>>;

    // --- Interviews ---
    async fn create_interview(&self, interview: Interview) -> PortResult<Interview>;

    async fn list_interviews(
        &self,
        filter: &InterviewFilter,
        window: Pagination,
    ) -> PortResult<Vec<Interview>>;

    async fn count_interviews(&self, filter: &InterviewFilter) -> PortResult<u64>;

    async fn latest_interview_change(
        &self,
        filter: &InterviewFilter,
    ) -> PortResult<Option<DateTime<Utc>>>;

    async fn get_interviews_by_ids(&self, ids: &[Uuid]) -> PortResult<Vec<Interview>>;

    /// Mean score of the completed, scored interviews matching the owner
    /// constraints of `filter` (its status is ignored). `None` when there are none.
    async fn average_completed_score(&self, filter: &InterviewFilter) -> PortResult<Option<f64>>;

    // --- Questions ---
    async fn create_question(&self, question: Question) -> PortResult<Question>;

    async fn list_questions(
        &self,
        filter: &QuestionFilter,
        window: Pagination,
    ) -> PortResult<Vec<Question>>;

    async fn count_questions(&self, filter: &QuestionFilter) -> PortResult<u64>;

    async fn latest_question_change(
        &self,
        filter: &QuestionFilter,
    ) -> PortResult<Option<DateTime<Utc>>>;

    // --- Feedback ---
    /// Stores the feedback and links it from its interview in one operation.
    /// Fails with `NotFound` when the interview does not exist and with
    /// `Conflict` when it already has feedback.
    async fn create_feedback(&self, feedback: Feedback) -> PortResult<Feedback>;

    async fn list_feedback(
        &self,
        filter: &FeedbackFilter,
        window: Pagination,
    ) -> PortResult<Vec<Feedback>>;

    async fn count_feedback(&self, filter: &FeedbackFilter) -> PortResult<u64>;

    async fn latest_feedback_change(
        &self,
        filter: &FeedbackFilter,
    ) -> PortResult<Option<DateTime<Utc>>>;

    async fn get_feedback_by_ids(&self, ids: &[Uuid]) -> PortResult<Vec<Feedback>>;
}
