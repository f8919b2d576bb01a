//! services/api/src/adapters/db.rs
//!
//! This module contains the PostgreSQL adapter, a concrete implementation of the
//! `DatabaseService` port from the `core` crate. It handles all interactions
//! with the database using `sqlx`. Nested documents (transcripts, scores,
//! recommendations) are stored as JSONB columns.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use interview_prep_core::domain::{
    AiRecommendations, CategoryDetail, CategoryScores, DetailedFeedback, Feedback, Interview,
    InterviewStatus, LearningResource, Question, QuestionMetadata, TranscriptEntry,
    UnknownVariant, User,
};
use interview_prep_core::ports::{DatabaseService, PortError, PortResult};
use interview_prep_core::query::{
    FeedbackFilter, InterviewFilter, Pagination, QuestionFilter, UserFilter,
};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use std::str::FromStr;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, clerk_id, email, first_name, last_name, profile_image, \
    experience_level, preferred_technologies, created_at, updated_at";

const INTERVIEW_COLUMNS: &str = "id, user_id, clerk_id, title, interview_type, experience_level, \
    technologies, status, duration_minutes, total_questions, completed_questions, score, \
    transcript, feedback_id, started_at, completed_at, created_at, updated_at";

const QUESTION_COLUMNS: &str = "id, text, category, subcategory, difficulty, experience_level, \
    technologies, question_type, expected_answer, sample_answers, hints, time_limit_minutes, \
    points, tags, is_active, usage_count, average_rating, created_by, ai_generated, metadata, \
    created_at, updated_at";

const FEEDBACK_COLUMNS: &str = "id, interview_id, user_id, clerk_id, overall_score, \
    category_scores, strengths, areas_for_improvement, detailed_feedback, ai_recommendations, \
    generated_at, created_at, updated_at";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

/// Narrows a count to the `INTEGER` column type.
fn int_column(column: &str, value: u32) -> PortResult<i32> {
    i32::try_from(value)
        .map_err(|_| PortError::Unexpected(format!("{column} value {value} does not fit INTEGER")))
}

fn parse<T: FromStr<Err = UnknownVariant>>(value: &str) -> PortResult<T> {
    value
        .parse()
        .map_err(|e: UnknownVariant| PortError::Unexpected(format!("corrupt record: {e}")))
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    clerk_id: String,
    email: String,
    first_name: String,
    last_name: String,
    profile_image: Option<String>,
    experience_level: String,
    preferred_technologies: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> PortResult<User> {
        Ok(User {
            id: self.id,
            clerk_id: self.clerk_id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            profile_image: self.profile_image,
            experience_level: parse(&self.experience_level)?,
            preferred_technologies: self.preferred_technologies,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct TranscriptRecord {
    speaker: String,
    message: String,
    timestamp: DateTime<Utc>,
}

#[derive(FromRow)]
struct InterviewRecord {
    id: Uuid,
    user_id: String,
    clerk_id: String,
    title: String,
    interview_type: String,
    experience_level: String,
    technologies: Vec<String>,
    status: String,
    duration_minutes: i32,
    total_questions: i32,
    completed_questions: i32,
    score: Option<i16>,
    transcript: Json<Vec<TranscriptRecord>>,
    feedback_id: Option<Uuid>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl InterviewRecord {
    fn to_domain(self) -> PortResult<Interview> {
        let transcript = self
            .transcript
            .0
            .into_iter()
            .map(|line| {
                Ok(TranscriptEntry {
                    speaker: parse(&line.speaker)?,
                    message: line.message,
                    timestamp: line.timestamp,
                })
            })
            .collect::<PortResult<Vec<_>>>()?;

        Ok(Interview {
            id: self.id,
            user_id: self.user_id,
            clerk_id: self.clerk_id,
            title: self.title,
            interview_type: parse(&self.interview_type)?,
            experience_level: parse(&self.experience_level)?,
            technologies: self.technologies,
            status: parse(&self.status)?,
            duration_minutes: self.duration_minutes.max(0) as u32,
            total_questions: self.total_questions.max(0) as u32,
            completed_questions: self.completed_questions.max(0) as u32,
            score: self.score.map(|s| s.clamp(0, 100) as u8),
            transcript,
            feedback_id: self.feedback_id,
            started_at: self.started_at,
            completed_at: self.completed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct MetadataRecord {
    model: Option<String>,
    prompt: Option<String>,
    temperature: Option<f64>,
}

#[derive(FromRow)]
struct QuestionRecord {
    id: Uuid,
    text: String,
    category: String,
    subcategory: String,
    difficulty: String,
    experience_level: String,
    technologies: Vec<String>,
    question_type: String,
    expected_answer: Option<String>,
    sample_answers: Vec<String>,
    hints: Vec<String>,
    time_limit_minutes: i32,
    points: i16,
    tags: Vec<String>,
    is_active: bool,
    usage_count: i32,
    average_rating: Option<f64>,
    created_by: String,
    ai_generated: bool,
    metadata: Option<Json<MetadataRecord>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl QuestionRecord {
    fn to_domain(self) -> PortResult<Question> {
        Ok(Question {
            id: self.id,
            text: self.text,
            category: parse(&self.category)?,
            subcategory: self.subcategory,
            difficulty: parse(&self.difficulty)?,
            experience_level: parse(&self.experience_level)?,
            technologies: self.technologies,
            question_type: parse(&self.question_type)?,
            expected_answer: self.expected_answer,
            sample_answers: self.sample_answers,
            hints: self.hints,
            time_limit_minutes: self.time_limit_minutes.max(0) as u32,
            points: self.points.clamp(1, 100) as u8,
            tags: self.tags,
            is_active: self.is_active,
            usage_count: self.usage_count.max(0) as u32,
            average_rating: self.average_rating,
            created_by: parse(&self.created_by)?,
            ai_generated: self.ai_generated,
            metadata: self.metadata.map(|Json(m)| QuestionMetadata {
                model: m.model,
                prompt: m.prompt,
                temperature: m.temperature,
            }),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct CategoryScoresRecord {
    technical_knowledge: u8,
    communication: u8,
    problem_solving: u8,
    confidence: u8,
    time_management: u8,
}

#[derive(Serialize, Deserialize)]
struct CategoryDetailRecord {
    score: u8,
    comments: String,
    suggestions: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct DetailedFeedbackRecord {
    technical_knowledge: CategoryDetailRecord,
    communication: CategoryDetailRecord,
    problem_solving: CategoryDetailRecord,
    confidence: CategoryDetailRecord,
    time_management: CategoryDetailRecord,
}

#[derive(Serialize, Deserialize)]
struct ResourceRecord {
    title: String,
    url: String,
    #[serde(rename = "type")]
    resource_type: String,
}

#[derive(Serialize, Deserialize)]
struct RecommendationsRecord {
    next_steps: Vec<String>,
    resources: Vec<ResourceRecord>,
    practice_areas: Vec<String>,
}

impl From<&CategoryScores> for CategoryScoresRecord {
    fn from(s: &CategoryScores) -> Self {
        Self {
            technical_knowledge: s.technical_knowledge,
            communication: s.communication,
            problem_solving: s.problem_solving,
            confidence: s.confidence,
            time_management: s.time_management,
        }
    }
}

impl From<&CategoryDetail> for CategoryDetailRecord {
    fn from(d: &CategoryDetail) -> Self {
        Self {
            score: d.score,
            comments: d.comments.clone(),
            suggestions: d.suggestions.clone(),
        }
    }
}

impl From<CategoryDetailRecord> for CategoryDetail {
    fn from(d: CategoryDetailRecord) -> Self {
        Self {
            score: d.score,
            comments: d.comments,
            suggestions: d.suggestions,
        }
    }
}

impl From<&DetailedFeedback> for DetailedFeedbackRecord {
    fn from(d: &DetailedFeedback) -> Self {
        Self {
            technical_knowledge: (&d.technical_knowledge).into(),
            communication: (&d.communication).into(),
            problem_solving: (&d.problem_solving).into(),
            confidence: (&d.confidence).into(),
            time_management: (&d.time_management).into(),
        }
    }
}

impl From<&AiRecommendations> for RecommendationsRecord {
    fn from(r: &AiRecommendations) -> Self {
        Self {
            next_steps: r.next_steps.clone(),
            resources: r
                .resources
                .iter()
                .map(|res| ResourceRecord {
                    title: res.title.clone(),
                    url: res.url.clone(),
                    resource_type: res.resource_type.as_str().to_string(),
                })
                .collect(),
            practice_areas: r.practice_areas.clone(),
        }
    }
}

#[derive(FromRow)]
struct FeedbackRecord {
    id: Uuid,
    interview_id: Uuid,
    user_id: String,
    clerk_id: String,
    overall_score: i16,
    category_scores: Json<CategoryScoresRecord>,
    strengths: Vec<String>,
    areas_for_improvement: Vec<String>,
    detailed_feedback: Json<DetailedFeedbackRecord>,
    ai_recommendations: Json<RecommendationsRecord>,
    generated_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl FeedbackRecord {
    fn to_domain(self) -> PortResult<Feedback> {
        let Json(scores) = self.category_scores;
        let Json(detail) = self.detailed_feedback;
        let Json(recs) = self.ai_recommendations;

        let resources = recs
            .resources
            .into_iter()
            .map(|r| {
                Ok(LearningResource {
                    title: r.title,
                    url: r.url,
                    resource_type: parse(&r.resource_type)?,
                })
            })
            .collect::<PortResult<Vec<_>>>()?;

        Ok(Feedback {
            id: self.id,
            interview_id: self.interview_id,
            user_id: self.user_id,
            clerk_id: self.clerk_id,
            overall_score: self.overall_score.clamp(0, 100) as u8,
            category_scores: CategoryScores {
                technical_knowledge: scores.technical_knowledge,
                communication: scores.communication,
                problem_solving: scores.problem_solving,
                confidence: scores.confidence,
                time_management: scores.time_management,
            },
            strengths: self.strengths,
            areas_for_improvement: self.areas_for_improvement,
            detailed_feedback: DetailedFeedback {
                technical_knowledge: detail.technical_knowledge.into(),
                communication: detail.communication.into(),
                problem_solving: detail.problem_solving.into(),
                confidence: detail.confidence.into(),
                time_management: detail.time_management.into(),
            },
            ai_recommendations: AiRecommendations {
                next_steps: recs.next_steps,
                resources,
                practice_areas: recs.practice_areas,
            },
            generated_at: self.generated_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

//=========================================================================================
// Filter Builders
//=========================================================================================

fn push_user_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    qb.push(" WHERE TRUE");
    if let Some(id) = filter.id {
        qb.push(" AND id = ").push_bind(id);
    }
    if let Some(clerk_id) = &filter.clerk_id {
        qb.push(" AND clerk_id = ").push_bind(clerk_id.clone());
    }
}

fn push_interview_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &InterviewFilter) {
    qb.push(" WHERE TRUE");
    if let Some(user_id) = &filter.user_id {
        qb.push(" AND user_id = ").push_bind(user_id.clone());
    }
    if let Some(clerk_id) = &filter.clerk_id {
        qb.push(" AND clerk_id = ").push_bind(clerk_id.clone());
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
}

fn push_question_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &QuestionFilter) {
    qb.push(" WHERE TRUE");
    if filter.active_only {
        qb.push(" AND is_active");
    }
    if let Some(category) = filter.category {
        qb.push(" AND category = ").push_bind(category.as_str());
    }
    if let Some(difficulty) = filter.difficulty {
        qb.push(" AND difficulty = ").push_bind(difficulty.as_str());
    }
    if let Some(level) = filter.experience_level {
        qb.push(" AND experience_level = ").push_bind(level.as_str());
    }
    if !filter.technologies.is_empty() {
        qb.push(" AND technologies && ")
            .push_bind(filter.technologies.clone());
    }
    if !filter.search_terms.is_empty() {
        // Terms are alphanumeric only, so joining with `|` yields a valid tsquery.
        qb.push(" AND to_tsvector('simple', text || ' ' || array_to_string(tags, ' ')) @@ to_tsquery('simple', ")
            .push_bind(filter.search_terms.join(" | "))
            .push(")");
    }
}

fn push_feedback_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &FeedbackFilter) {
    qb.push(" WHERE TRUE");
    if let Some(user_id) = &filter.user_id {
        qb.push(" AND user_id = ").push_bind(user_id.clone());
    }
    if let Some(clerk_id) = &filter.clerk_id {
        qb.push(" AND clerk_id = ").push_bind(clerk_id.clone());
    }
}

fn push_window(qb: &mut QueryBuilder<'_, Postgres>, window: Pagination) {
    qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
        .push_bind(i64::from(window.limit()))
        .push(" OFFSET ")
        .push_bind(window.offset() as i64);
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn ping(&self) -> PortResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn create_user(&self, user: User) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .bind(&user.clerk_id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.profile_image)
        .bind(user.experience_level.as_str())
        .bind(&user.preferred_technologies)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                match db.constraint() {
                    Some("users_email_key") => {
                        PortError::Conflict("User already exists with this email".to_string())
                    }
                    _ => PortError::Conflict(
                        "User already exists with this Clerk ID".to_string(),
                    ),
                }
            }
            _ => unexpected(e),
        })?;
        record.to_domain()
    }

    async fn find_user(&self, filter: &UserFilter) -> PortResult<Option<User>> {
        let mut qb = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users"));
        push_user_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT 1");
        let record = qb
            .build_query_as::<UserRecord>()
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;
        record.map(UserRecord::to_domain).transpose()
    }

    async fn list_users(&self, filter: &UserFilter, window: Pagination) -> PortResult<Vec<User>> {
        let mut qb = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users"));
        push_user_filter(&mut qb, filter);
        push_window(&mut qb, window);
        let records = qb
            .build_query_as::<UserRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        records.into_iter().map(UserRecord::to_domain).collect()
    }

    async fn count_users(&self, filter: &UserFilter) -> PortResult<u64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM users");
        push_user_filter(&mut qb, filter);
        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(count.max(0) as u64)
    }

    async fn latest_user_change(
        &self,
        filter: &UserFilter,
    ) -> PortResult<Option<DateTime<Utc>>> {
        let mut qb = QueryBuilder::new("SELECT MAX(updated_at) FROM users");
        push_user_filter(&mut qb, filter);
        qb.build_query_scalar::<Option<DateTime<Utc>>>()
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)
    }

    async fn create_interview(&self, interview: Interview) -> PortResult<Interview> {
        let transcript: Vec<TranscriptRecord> = interview
            .transcript
            .iter()
            .map(|line| TranscriptRecord {
                speaker: line.speaker.as_str().to_string(),
                message: line.message.clone(),
                timestamp: line.timestamp,
            })
            .collect();

        let record = sqlx::query_as::<_, InterviewRecord>(&format!(
            "INSERT INTO interviews ({INTERVIEW_COLUMNS}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18) \
             RETURNING {INTERVIEW_COLUMNS}"
        ))
        .bind(interview.id)
        .bind(&interview.user_id)
        .bind(&interview.clerk_id)
        .bind(&interview.title)
        .bind(interview.interview_type.as_str())
        .bind(interview.experience_level.as_str())
        .bind(&interview.technologies)
        .bind(interview.status.as_str())
        .bind(int_column("duration_minutes", interview.duration_minutes)?)
        .bind(int_column("total_questions", interview.total_questions)?)
        .bind(int_column("completed_questions", interview.completed_questions)?)
        .bind(interview.score.map(i16::from))
        .bind(Json(transcript))
        .bind(interview.feedback_id)
        .bind(interview.started_at)
        .bind(interview.completed_at)
        .bind(interview.created_at)
        .bind(interview.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        record.to_domain()
    }

    async fn list_interviews(
        &self,
        filter: &InterviewFilter,
        window: Pagination,
    ) -> PortResult<Vec<Interview>> {
        let mut qb = QueryBuilder::new(format!("SELECT {INTERVIEW_COLUMNS} FROM interviews"));
        push_interview_filter(&mut qb, filter);
        push_window(&mut qb, window);
        let records = qb
            .build_query_as::<InterviewRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        records.into_iter().map(InterviewRecord::to_domain).collect()
    }

    async fn count_interviews(&self, filter: &InterviewFilter) -> PortResult<u64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM interviews");
        push_interview_filter(&mut qb, filter);
        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(count.max(0) as u64)
    }

    async fn latest_interview_change(
        &self,
        filter: &InterviewFilter,
    ) -> PortResult<Option<DateTime<Utc>>> {
        let mut qb = QueryBuilder::new("SELECT MAX(updated_at) FROM interviews");
        push_interview_filter(&mut qb, filter);
        qb.build_query_scalar::<Option<DateTime<Utc>>>()
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)
    }

    async fn get_interviews_by_ids(&self, ids: &[Uuid]) -> PortResult<Vec<Interview>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let records = sqlx::query_as::<_, InterviewRecord>(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews WHERE id = ANY($1)"
        ))
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        records.into_iter().map(InterviewRecord::to_domain).collect()
    }

    async fn average_completed_score(&self, filter: &InterviewFilter) -> PortResult<Option<f64>> {
        let mut qb = QueryBuilder::new("SELECT AVG(score)::float8 FROM interviews");
        push_interview_filter(&mut qb, &filter.with_status(InterviewStatus::Completed));
        qb.push(" AND score IS NOT NULL");
        qb.build_query_scalar::<Option<f64>>()
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)
    }

    async fn create_question(&self, question: Question) -> PortResult<Question> {
        let metadata = question.metadata.as_ref().map(|m| {
            Json(MetadataRecord {
                model: m.model.clone(),
                prompt: m.prompt.clone(),
                temperature: m.temperature,
            })
        });

        let record = sqlx::query_as::<_, QuestionRecord>(&format!(
            "INSERT INTO questions ({QUESTION_COLUMNS}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, \
              $19, $20, $21, $22) \
             RETURNING {QUESTION_COLUMNS}"
        ))
        .bind(question.id)
        .bind(&question.text)
        .bind(question.category.as_str())
        .bind(&question.subcategory)
        .bind(question.difficulty.as_str())
        .bind(question.experience_level.as_str())
        .bind(&question.technologies)
        .bind(question.question_type.as_str())
        .bind(&question.expected_answer)
        .bind(&question.sample_answers)
        .bind(&question.hints)
        .bind(int_column("time_limit_minutes", question.time_limit_minutes)?)
        .bind(i16::from(question.points))
        .bind(&question.tags)
        .bind(question.is_active)
        .bind(int_column("usage_count", question.usage_count)?)
        .bind(question.average_rating)
        .bind(question.created_by.as_str())
        .bind(question.ai_generated)
        .bind(metadata)
        .bind(question.created_at)
        .bind(question.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        record.to_domain()
    }

    async fn list_questions(
        &self,
        filter: &QuestionFilter,
        window: Pagination,
    ) -> PortResult<Vec<Question>> {
        let mut qb = QueryBuilder::new(format!("SELECT {QUESTION_COLUMNS} FROM questions"));
        push_question_filter(&mut qb, filter);
        push_window(&mut qb, window);
        let records = qb
            .build_query_as::<QuestionRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        records.into_iter().map(QuestionRecord::to_domain).collect()
    }

    async fn count_questions(&self, filter: &QuestionFilter) -> PortResult<u64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM questions");
        push_question_filter(&mut qb, filter);
        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(count.max(0) as u64)
    }

    async fn latest_question_change(
        &self,
        filter: &QuestionFilter,
    ) -> PortResult<Option<DateTime<Utc>>> {
        let mut qb = QueryBuilder::new("SELECT MAX(updated_at) FROM questions");
        push_question_filter(&mut qb, filter);
        qb.build_query_scalar::<Option<DateTime<Utc>>>()
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)
    }

    async fn create_feedback(&self, feedback: Feedback) -> PortResult<Feedback> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let linked = sqlx::query_scalar::<_, Option<Uuid>>(
            "SELECT feedback_id FROM interviews WHERE id = $1 FOR UPDATE",
        )
        .bind(feedback.interview_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(unexpected)?;

        match linked {
            None => {
                return Err(PortError::NotFound(format!(
                    "Interview {} not found",
                    feedback.interview_id
                )))
            }
            Some(Some(existing)) => {
                return Err(PortError::Conflict(format!(
                    "Interview {} already has feedback {}",
                    feedback.interview_id, existing
                )))
            }
            Some(None) => {}
        }

        let record = sqlx::query_as::<_, FeedbackRecord>(&format!(
            "INSERT INTO feedback ({FEEDBACK_COLUMNS}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {FEEDBACK_COLUMNS}"
        ))
        .bind(feedback.id)
        .bind(feedback.interview_id)
        .bind(&feedback.user_id)
        .bind(&feedback.clerk_id)
        .bind(i16::from(feedback.overall_score))
        .bind(Json(CategoryScoresRecord::from(&feedback.category_scores)))
        .bind(&feedback.strengths)
        .bind(&feedback.areas_for_improvement)
        .bind(Json(DetailedFeedbackRecord::from(&feedback.detailed_feedback)))
        .bind(Json(RecommendationsRecord::from(&feedback.ai_recommendations)))
        .bind(feedback.generated_at)
        .bind(feedback.created_at)
        .bind(feedback.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;

        sqlx::query("UPDATE interviews SET feedback_id = $1, updated_at = now() WHERE id = $2")
            .bind(feedback.id)
            .bind(feedback.interview_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;
        record.to_domain()
    }

    async fn list_feedback(
        &self,
        filter: &FeedbackFilter,
        window: Pagination,
    ) -> PortResult<Vec<Feedback>> {
        let mut qb = QueryBuilder::new(format!("SELECT {FEEDBACK_COLUMNS} FROM feedback"));
        push_feedback_filter(&mut qb, filter);
        push_window(&mut qb, window);
        let records = qb
            .build_query_as::<FeedbackRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        records.into_iter().map(FeedbackRecord::to_domain).collect()
    }

    async fn count_feedback(&self, filter: &FeedbackFilter) -> PortResult<u64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM feedback");
        push_feedback_filter(&mut qb, filter);
        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(count.max(0) as u64)
    }

    async fn latest_feedback_change(
        &self,
        filter: &FeedbackFilter,
    ) -> PortResult<Option<DateTime<Utc>>> {
        let mut qb = QueryBuilder::new("SELECT MAX(updated_at) FROM feedback");
        push_feedback_filter(&mut qb, filter);
        qb.build_query_scalar::<Option<DateTime<Utc>>>()
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)
    }

    async fn get_feedback_by_ids(&self, ids: &[Uuid]) -> PortResult<Vec<Feedback>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let records = sqlx::query_as::<_, FeedbackRecord>(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE id = ANY($1)"
        ))
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        records.into_iter().map(FeedbackRecord::to_domain).collect()
    }
}
