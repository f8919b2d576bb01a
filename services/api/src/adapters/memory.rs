//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the `DatabaseService` port. It backs the
//! service when no `DATABASE_URL` is configured and is the store used by the
//! route tests. It reproduces the ordering, filtering and uniqueness rules of
//! the PostgreSQL adapter.

use async_trait::async_trait;
use interview_prep_core::domain::{Feedback, Interview, InterviewStatus, Question, User};
use interview_prep_core::ports::{DatabaseService, PortError, PortResult};
use interview_prep_core::query::{
    paginate, FeedbackFilter, InterviewFilter, Pagination, QuestionFilter, UserFilter,
};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    interviews: Vec<Interview>,
    questions: Vec<Question>,
    feedback: Vec<Feedback>,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Matching records, newest first. Records created in the same instant are
/// ordered by descending id, as the PostgreSQL adapter orders them.
fn newest_first<T: Clone>(
    rows: &[T],
    keep: impl Fn(&T) -> bool,
    key: impl Fn(&T) -> (DateTime<Utc>, Uuid),
) -> Vec<T> {
    let mut matched: Vec<T> = rows.iter().filter(|r| keep(r)).cloned().collect();
    matched.sort_by(|a, b| key(b).cmp(&key(a)));
    matched
}

fn latest_change<T>(
    rows: &[T],
    keep: impl Fn(&T) -> bool,
    updated_at: impl Fn(&T) -> DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    rows.iter().filter(|r| keep(r)).map(updated_at).max()
}

#[async_trait]
impl DatabaseService for InMemoryStore {
    async fn ping(&self) -> PortResult<()> {
        Ok(())
    }

    async fn create_user(&self, user: User) -> PortResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.clerk_id == user.clerk_id) {
            return Err(PortError::Conflict(
                "User already exists with this Clerk ID".to_string(),
            ));
        }
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(PortError::Conflict(
                "User already exists with this email".to_string(),
            ));
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, filter: &UserFilter) -> PortResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.users, |u| filter.matches(u), |u| (u.created_at, u.id))
            .into_iter()
            .next())
    }

    async fn list_users(&self, filter: &UserFilter, window: Pagination) -> PortResult<Vec<User>> {
        let tables = self.tables.read().await;
        let sorted = newest_first(&tables.users, |u| filter.matches(u), |u| (u.created_at, u.id));
        Ok(paginate(&sorted, window))
    }

    async fn count_users(&self, filter: &UserFilter) -> PortResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().filter(|u| filter.matches(u)).count() as u64)
    }

    async fn latest_user_change(&self, filter: &UserFilter) -> PortResult<Option<DateTime<Utc>>> {
        let tables = self.tables.read().await;
        Ok(latest_change(&tables.users, |u| filter.matches(u), |u| u.updated_at))
    }

    async fn create_interview(&self, interview: Interview) -> PortResult<Interview> {
        self.tables.write().await.interviews.push(interview.clone());
        Ok(interview)
    }

    async fn list_interviews(
        &self,
        filter: &InterviewFilter,
        window: Pagination,
    ) -> PortResult<Vec<Interview>> {
        let tables = self.tables.read().await;
        let sorted = newest_first(&tables.interviews, |i| filter.matches(i), |i| (i.created_at, i.id));
        Ok(paginate(&sorted, window))
    }

    async fn count_interviews(&self, filter: &InterviewFilter) -> PortResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables.interviews.iter().filter(|i| filter.matches(i)).count() as u64)
    }

    async fn latest_interview_change(
        &self,
        filter: &InterviewFilter,
    ) -> PortResult<Option<DateTime<Utc>>> {
        let tables = self.tables.read().await;
        Ok(latest_change(&tables.interviews, |i| filter.matches(i), |i| i.updated_at))
    }

    async fn get_interviews_by_ids(&self, ids: &[Uuid]) -> PortResult<Vec<Interview>> {
        let tables = self.tables.read().await;
        Ok(tables
            .interviews
            .iter()
            .filter(|i| ids.contains(&i.id))
            .cloned()
            .collect())
    }

    async fn average_completed_score(&self, filter: &InterviewFilter) -> PortResult<Option<f64>> {
        let completed = filter.with_status(InterviewStatus::Completed);
        let tables = self.tables.read().await;
        let scores: Vec<f64> = tables
            .interviews
            .iter()
            .filter(|i| completed.matches(i))
            .filter_map(|i| i.score.map(f64::from))
            .collect();
        if scores.is_empty() {
            return Ok(None);
        }
        Ok(Some(scores.iter().sum::<f64>() / scores.len() as f64))
    }

    async fn create_question(&self, question: Question) -> PortResult<Question> {
        self.tables.write().await.questions.push(question.clone());
        Ok(question)
    }

    async fn list_questions(
        &self,
        filter: &QuestionFilter,
        window: Pagination,
    ) -> PortResult<Vec<Question>> {
        let tables = self.tables.read().await;
        let sorted = newest_first(&tables.questions, |q| filter.matches(q), |q| (q.created_at, q.id));
        Ok(paginate(&sorted, window))
    }

    async fn count_questions(&self, filter: &QuestionFilter) -> PortResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables.questions.iter().filter(|q| filter.matches(q)).count() as u64)
    }

    async fn latest_question_change(
        &self,
        filter: &QuestionFilter,
    ) -> PortResult<Option<DateTime<Utc>>> {
        let tables = self.tables.read().await;
        Ok(latest_change(&tables.questions, |q| filter.matches(q), |q| q.updated_at))
    }

    async fn create_feedback(&self, feedback: Feedback) -> PortResult<Feedback> {
        let mut tables = self.tables.write().await;
        let Some(interview) = tables
            .interviews
            .iter_mut()
            .find(|i| i.id == feedback.interview_id)
        else {
            return Err(PortError::NotFound(format!(
                "Interview {} not found",
                feedback.interview_id
            )));
        };
        if let Some(existing) = interview.feedback_id {
            return Err(PortError::Conflict(format!(
                "Interview {} already has feedback {}",
                feedback.interview_id, existing
            )));
        }
        interview.feedback_id = Some(feedback.id);
        interview.updated_at = Utc::now();
        tables.feedback.push(feedback.clone());
        Ok(feedback)
    }

    async fn list_feedback(
        &self,
        filter: &FeedbackFilter,
        window: Pagination,
    ) -> PortResult<Vec<Feedback>> {
        let tables = self.tables.read().await;
        let sorted = newest_first(&tables.feedback, |f| filter.matches(f), |f| (f.created_at, f.id));
        Ok(paginate(&sorted, window))
    }

    async fn count_feedback(&self, filter: &FeedbackFilter) -> PortResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables.feedback.iter().filter(|f| filter.matches(f)).count() as u64)
    }

    async fn latest_feedback_change(
        &self,
        filter: &FeedbackFilter,
    ) -> PortResult<Option<DateTime<Utc>>> {
        let tables = self.tables.read().await;
        Ok(latest_change(&tables.feedback, |f| filter.matches(f), |f| f.updated_at))
    }

    async fn get_feedback_by_ids(&self, ids: &[Uuid]) -> PortResult<Vec<Feedback>> {
        let tables = self.tables.read().await;
        Ok(tables
            .feedback
            .iter()
            .filter(|f| ids.contains(&f.id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use interview_prep_core::domain::{ExperienceLevel, InterviewType};
    use interview_prep_core::validation::{
        validate_feedback, validate_interview, validate_user, CategoryScoresDraft, FeedbackDraft,
        InterviewDraft, UserDraft,
    };

    fn user(clerk_id: &str, email: &str) -> User {
        validate_user(
            UserDraft {
                clerk_id: Some(clerk_id.to_string()),
                email: Some(email.to_string()),
                first_name: Some("Ada".to_string()),
                last_name: Some("Lovelace".to_string()),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn interview(user_id: &str, status: &str, score: Option<i64>, at: DateTime<Utc>) -> Interview {
        validate_interview(
            InterviewDraft {
                user_id: Some(user_id.to_string()),
                clerk_id: Some(format!("clerk_{user_id}")),
                title: Some("Mock".to_string()),
                interview_type: Some(InterviewType::Technical.as_str().to_string()),
                experience_level: Some(ExperienceLevel::Advanced.as_str().to_string()),
                status: Some(status.to_string()),
                score,
                ..Default::default()
            },
            at,
        )
        .unwrap()
    }

    fn feedback_for(interview_id: Uuid) -> Feedback {
        validate_feedback(
            FeedbackDraft {
                interview_id: Some(interview_id),
                user_id: Some("u1".to_string()),
                clerk_id: Some("clerk_u1".to_string()),
                overall_score: Some(80),
                category_scores: Some(CategoryScoresDraft {
                    technical_knowledge: Some(80),
                    communication: Some(80),
                    problem_solving: Some(80),
                    confidence: Some(80),
                    time_management: Some(80),
                }),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_clerk_id_conflicts_without_writing() {
        let store = InMemoryStore::new();
        store.create_user(user("clerk_1", "a@example.com")).await.unwrap();

        let result = store.create_user(user("clerk_1", "b@example.com")).await;
        assert!(matches!(result, Err(PortError::Conflict(_))));
        let result = store.create_user(user("clerk_2", "a@example.com")).await;
        assert!(matches!(result, Err(PortError::Conflict(_))));

        assert_eq!(store.count_users(&UserFilter::default()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_lists_are_newest_first() {
        let store = InMemoryStore::new();
        let base = Utc::now();
        for minutes in [5, 1, 3] {
            store
                .create_interview(interview("u1", "pending", None, base + Duration::minutes(minutes)))
                .await
                .unwrap();
        }
        let listed = store
            .list_interviews(&InterviewFilter::default(), Pagination::default())
            .await
            .unwrap();
        let times: Vec<_> = listed.iter().map(|i| i.created_at).collect();
        assert_eq!(
            times,
            vec![
                base + Duration::minutes(5),
                base + Duration::minutes(3),
                base + Duration::minutes(1)
            ]
        );
    }

    #[tokio::test]
    async fn test_average_only_counts_completed_scored_interviews() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        store.create_interview(interview("u1", "completed", Some(70), now)).await.unwrap();
        store.create_interview(interview("u1", "completed", Some(90), now)).await.unwrap();
        store.create_interview(interview("u1", "completed", None, now)).await.unwrap();
        store.create_interview(interview("u1", "pending", None, now)).await.unwrap();
        store.create_interview(interview("u2", "completed", Some(10), now)).await.unwrap();

        let filter = InterviewFilter {
            user_id: Some("u1".to_string()),
            ..Default::default()
        };
        assert_eq!(store.average_completed_score(&filter).await.unwrap(), Some(80.0));

        let nobody = InterviewFilter {
            user_id: Some("u9".to_string()),
            ..Default::default()
        };
        assert_eq!(store.average_completed_score(&nobody).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_feedback_links_its_interview_once() {
        let store = InMemoryStore::new();
        let stored = store
            .create_interview(interview("u1", "completed", Some(80), Utc::now()))
            .await
            .unwrap();

        let first = store.create_feedback(feedback_for(stored.id)).await.unwrap();
        let linked = store.get_interviews_by_ids(&[stored.id]).await.unwrap();
        assert_eq!(linked[0].feedback_id, Some(first.id));

        let again = store.create_feedback(feedback_for(stored.id)).await;
        assert!(matches!(again, Err(PortError::Conflict(_))));

        let missing = store.create_feedback(feedback_for(Uuid::new_v4())).await;
        assert!(matches!(missing, Err(PortError::NotFound(_))));

        assert_eq!(store.count_feedback(&FeedbackFilter::default()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_same_instant_records_order_by_id() {
        let store = InMemoryStore::new();
        let at = Utc::now();
        let mut ids = Vec::new();
        for _ in 0..4 {
            let stored = store
                .create_interview(interview("u1", "pending", None, at))
                .await
                .unwrap();
            ids.push(stored.id);
        }
        ids.sort_by(|a, b| b.cmp(a));

        let listed = store
            .list_interviews(&InterviewFilter::default(), Pagination::default())
            .await
            .unwrap();
        let listed: Vec<Uuid> = listed.iter().map(|i| i.id).collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_latest_change_moves_on_insert_and_link() {
        let store = InMemoryStore::new();
        let filter = InterviewFilter::default();
        assert_eq!(store.latest_interview_change(&filter).await.unwrap(), None);

        let base = Utc::now() - Duration::hours(1);
        let first = store
            .create_interview(interview("u1", "completed", Some(80), base))
            .await
            .unwrap();
        assert_eq!(store.latest_interview_change(&filter).await.unwrap(), Some(base));

        store.create_feedback(feedback_for(first.id)).await.unwrap();
        let linked = store.latest_interview_change(&filter).await.unwrap().unwrap();
        assert!(linked > base);

        let later = linked + Duration::seconds(5);
        store
            .create_interview(interview("u2", "pending", None, later))
            .await
            .unwrap();
        assert_eq!(store.latest_interview_change(&filter).await.unwrap(), Some(later));

        let other_owner = InterviewFilter {
            user_id: Some("u1".to_string()),
            ..Default::default()
        };
        assert_eq!(store.latest_interview_change(&other_owner).await.unwrap(), Some(linked));
    }
}
