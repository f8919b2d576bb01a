//! services/api/src/web/data.rs
//!
//! The `GET /data` route: paginated, filtered reads of each collection plus the
//! dashboard and summary aggregates.

use crate::cache::{CacheOptions, CachePolicy};
use crate::error::RouteError;
use crate::web::dto::{
    DashboardFeedbackView, DashboardInterviewView, DashboardView, DataResponse, FeedbackView,
    InterviewView, QuestionView, RecentFeedback, RecentInterview, RecentItems, RecentQuestion,
    RecentUser, StatisticsView, SummaryCounts, SummaryView, UserView,
};
use crate::web::reply::cached_json;
use crate::web::state::AppState;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use interview_prep_core::domain::{Feedback, Interview, InterviewStatus, UnknownVariant};
use interview_prep_core::query::{
    search_terms, FeedbackFilter, InterviewFilter, Pagination, QuestionFilter, UserFilter,
    DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, RECENT_LIMIT,
};
use interview_prep_core::validation::ValidationError;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;
use utoipa::IntoParams;
use uuid::Uuid;

//=========================================================================================
// Query Parameters
//=========================================================================================

/// Query string of `GET /data`. Every parameter is optional.
#[derive(Deserialize, IntoParams, Debug, Default)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DataQuery {
    /// users, interviews, questions, feedback or dashboard. Anything else returns the summary.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Page size, 1 to 100 (default 10).
    pub limit: Option<String>,
    /// 1-based page number (default 1).
    pub page: Option<String>,
    pub user_id: Option<String>,
    pub clerk_id: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub experience_level: Option<String>,
    /// Comma-separated; matches questions listing any of them.
    pub technologies: Option<String>,
    /// Free text matched against question text and tags.
    pub search: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn number_or(value: &Option<String>, default: i64) -> i64 {
    value
        .as_deref()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

fn parse_param<T: FromStr<Err = UnknownVariant>>(
    field: &'static str,
    value: &Option<String>,
) -> Result<Option<T>, RouteError> {
    non_blank(value)
        .map(|v| v.parse::<T>())
        .transpose()
        .map_err(|source| ValidationError::InvalidEnum { field, source }.into())
}

impl DataQuery {
    /// Non-numeric values fall back to the defaults; numeric values are clamped.
    pub fn pagination(&self) -> Pagination {
        let page = number_or(&self.page, 1).clamp(1, i64::from(u32::MAX));
        let limit =
            number_or(&self.limit, i64::from(DEFAULT_PAGE_LIMIT)).clamp(1, i64::from(MAX_PAGE_LIMIT));
        Pagination::new(page as u32, limit as u32)
    }

    fn user_uuid(&self) -> Result<Option<Uuid>, RouteError> {
        non_blank(&self.user_id)
            .map(|raw| {
                Uuid::parse_str(&raw)
                    .map_err(|_| RouteError::Validation(format!("Invalid userId: {raw}")))
            })
            .transpose()
    }

    fn user_filter(&self) -> Result<UserFilter, RouteError> {
        Ok(UserFilter {
            id: self.user_uuid()?,
            clerk_id: non_blank(&self.clerk_id),
        })
    }

    fn interview_filter(&self) -> InterviewFilter {
        InterviewFilter {
            user_id: non_blank(&self.user_id),
            clerk_id: non_blank(&self.clerk_id),
            status: None,
        }
    }

    fn feedback_filter(&self) -> FeedbackFilter {
        FeedbackFilter {
            user_id: non_blank(&self.user_id),
            clerk_id: non_blank(&self.clerk_id),
        }
    }

    fn question_filter(&self) -> Result<QuestionFilter, RouteError> {
        let technologies = non_blank(&self.technologies)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(QuestionFilter {
            active_only: true,
            category: parse_param("category", &self.category)?,
            difficulty: parse_param("difficulty", &self.difficulty)?,
            experience_level: parse_param("experienceLevel", &self.experience_level)?,
            technologies,
            search_terms: non_blank(&self.search)
                .map(|s| search_terms(&s))
                .unwrap_or_default(),
        })
    }
}

//=========================================================================================
// Handler
//=========================================================================================

/// Read users, interviews, questions or feedback, or an aggregate view.
#[utoipa::path(
    get,
    path = "/data",
    params(DataQuery),
    responses(
        (status = 200, description = "`{ success, data, pagination? }` for the requested type"),
        (status = 304, description = "The client's cached copy is current"),
        (status = 400, description = "A filter parameter is invalid"),
        (status = 500, description = "The store failed")
    ),
    tag = "Data"
)]
pub async fn data_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<DataQuery>,
) -> Result<Response, RouteError> {
    debug!("GET /data type={:?}", query.kind);
    match query.kind.as_deref() {
        Some("users") => users(&app_state, &headers, &query).await,
        Some("interviews") => interviews(&app_state, &headers, &query).await,
        Some("questions") => questions(&app_state, &headers, &query).await,
        Some("feedback") => feedback(&app_state, &headers, &query).await,
        Some("dashboard") => dashboard(&app_state, &headers, &query).await,
        _ => summary(&app_state, &headers).await,
    }
}

async fn users(
    app_state: &AppState,
    headers: &HeaderMap,
    query: &DataQuery,
) -> Result<Response, RouteError> {
    let window = query.pagination();
    let filter = query.user_filter()?;
    let db = &app_state.db;

    let (users, total, changed) = tokio::try_join!(
        db.list_users(&filter, window),
        db.count_users(&filter),
        db.latest_user_change(&filter)
    )
    .map_err(RouteError::store("Failed to fetch users"))?;

    let data: Vec<UserView> = users.iter().map(UserView::from).collect();
    let options = CacheOptions::new(CachePolicy::PRIVATE)
        .with_last_modified(changed);
    cached_json(headers, StatusCode::OK, &DataResponse::page(data, window.info(total)), options)
}

/// Feedback records for the given interviews, keyed by feedback id.
async fn linked_feedback(
    app_state: &AppState,
    interviews: &[Interview],
) -> Result<HashMap<Uuid, Feedback>, RouteError> {
    let ids: Vec<Uuid> = interviews.iter().filter_map(|i| i.feedback_id).collect();
    let found = app_state
        .db
        .get_feedback_by_ids(&ids)
        .await
        .map_err(RouteError::store("Failed to fetch interviews"))?;
    Ok(found.into_iter().map(|f| (f.id, f)).collect())
}

/// Interviews assessed by the given feedback records, keyed by interview id.
async fn linked_interviews(
    app_state: &AppState,
    feedback: &[Feedback],
    context: &'static str,
) -> Result<HashMap<Uuid, Interview>, RouteError> {
    let ids: Vec<Uuid> = feedback.iter().map(|f| f.interview_id).collect();
    let found = app_state
        .db
        .get_interviews_by_ids(&ids)
        .await
        .map_err(RouteError::store(context))?;
    Ok(found.into_iter().map(|i| (i.id, i)).collect())
}

async fn interviews(
    app_state: &AppState,
    headers: &HeaderMap,
    query: &DataQuery,
) -> Result<Response, RouteError> {
    let window = query.pagination();
    let filter = query.interview_filter();
    let db = &app_state.db;

    let (interviews, total, changed) = tokio::try_join!(
        db.list_interviews(&filter, window),
        db.count_interviews(&filter),
        db.latest_interview_change(&filter)
    )
    .map_err(RouteError::store("Failed to fetch interviews"))?;
    let feedback = linked_feedback(app_state, &interviews).await?;

    let data: Vec<InterviewView> = interviews
        .iter()
        .map(|i| InterviewView::new(i, i.feedback_id.and_then(|id| feedback.get(&id))))
        .collect();
    let options = CacheOptions::new(CachePolicy::INTERVIEWS)
        .with_last_modified(changed);
    cached_json(headers, StatusCode::OK, &DataResponse::page(data, window.info(total)), options)
}

async fn questions(
    app_state: &AppState,
    headers: &HeaderMap,
    query: &DataQuery,
) -> Result<Response, RouteError> {
    let window = query.pagination();
    let filter = query.question_filter()?;
    let db = &app_state.db;

    let (questions, total, changed) = tokio::try_join!(
        db.list_questions(&filter, window),
        db.count_questions(&filter),
        db.latest_question_change(&filter)
    )
    .map_err(RouteError::store("Failed to fetch questions"))?;

    let data: Vec<QuestionView> = questions.iter().map(QuestionView::from).collect();
    let options = CacheOptions::new(CachePolicy::QUESTIONS)
        .with_last_modified(changed);
    cached_json(headers, StatusCode::OK, &DataResponse::page(data, window.info(total)), options)
}

async fn feedback(
    app_state: &AppState,
    headers: &HeaderMap,
    query: &DataQuery,
) -> Result<Response, RouteError> {
    let window = query.pagination();
    let filter = query.feedback_filter();
    let db = &app_state.db;

    let (feedback, total, changed) = tokio::try_join!(
        db.list_feedback(&filter, window),
        db.count_feedback(&filter),
        db.latest_feedback_change(&filter)
    )
    .map_err(RouteError::store("Failed to fetch feedback"))?;
    let interviews = linked_interviews(app_state, &feedback, "Failed to fetch feedback").await?;

    let data: Vec<FeedbackView> = feedback
        .iter()
        .map(|f| FeedbackView::new(f, interviews.get(&f.interview_id)))
        .collect();
    let options = CacheOptions::new(CachePolicy::FEEDBACK)
        .with_last_modified(changed);
    cached_json(headers, StatusCode::OK, &DataResponse::page(data, window.info(total)), options)
}

async fn dashboard(
    app_state: &AppState,
    headers: &HeaderMap,
    query: &DataQuery,
) -> Result<Response, RouteError> {
    const CONTEXT: &str = "Failed to fetch dashboard data";
    let user_filter = query.user_filter()?;
    let owner = query.interview_filter();
    let feedback_filter = query.feedback_filter();
    let recent = Pagination::first(RECENT_LIMIT);
    let db = &app_state.db;

    let completed = owner.with_status(InterviewStatus::Completed);
    let in_progress = owner.with_status(InterviewStatus::InProgress);
    let (
        user,
        total_interviews,
        completed_interviews,
        in_progress_interviews,
        recent_interviews,
        recent_feedback,
        average,
    ) = tokio::try_join!(
        db.find_user(&user_filter),
        db.count_interviews(&owner),
        db.count_interviews(&completed),
        db.count_interviews(&in_progress),
        db.list_interviews(&owner, recent),
        db.list_feedback(&feedback_filter, recent),
        db.average_completed_score(&owner),
    )
    .map_err(RouteError::store(CONTEXT))?;

    let (feedback_by_id, interviews_by_id) = tokio::try_join!(
        linked_feedback(app_state, &recent_interviews),
        linked_interviews(app_state, &recent_feedback, CONTEXT)
    )?;

    let data = DashboardView {
        user: user.as_ref().map(UserView::from),
        statistics: StatisticsView {
            total_interviews,
            completed_interviews,
            in_progress_interviews,
            average_score: average.unwrap_or(0.0),
        },
        recent_interviews: recent_interviews
            .iter()
            .map(|i| {
                DashboardInterviewView::new(i, i.feedback_id.and_then(|id| feedback_by_id.get(&id)))
            })
            .collect(),
        recent_feedback: recent_feedback
            .iter()
            .map(|f| DashboardFeedbackView::new(f, interviews_by_id.get(&f.interview_id)))
            .collect(),
    };
    cached_json(
        headers,
        StatusCode::OK,
        &DataResponse::single(data),
        CachePolicy::DASHBOARD.into(),
    )
}

async fn summary(app_state: &AppState, headers: &HeaderMap) -> Result<Response, RouteError> {
    const CONTEXT: &str = "Failed to fetch data";
    let recent = Pagination::first(RECENT_LIMIT);
    let everyone = UserFilter::default();
    let all_interviews = InterviewFilter::default();
    let active = QuestionFilter::default();
    let all_feedback = FeedbackFilter::default();
    let db = &app_state.db;

    let (users, interviews, questions, feedback) = tokio::try_join!(
        db.count_users(&everyone),
        db.count_interviews(&all_interviews),
        db.count_questions(&active),
        db.count_feedback(&all_feedback),
    )
    .map_err(RouteError::store(CONTEXT))?;

    let (recent_users, recent_interviews, recent_questions, recent_feedback) = tokio::try_join!(
        db.list_users(&everyone, recent),
        db.list_interviews(&all_interviews, recent),
        db.list_questions(&active, recent),
        db.list_feedback(&all_feedback, recent),
    )
    .map_err(RouteError::store(CONTEXT))?;
    let assessed = linked_interviews(app_state, &recent_feedback, CONTEXT).await?;

    let data = SummaryView {
        summary: SummaryCounts {
            users,
            interviews,
            questions,
            feedback,
        },
        recent: RecentItems {
            users: recent_users.iter().map(RecentUser::from).collect(),
            interviews: recent_interviews.iter().map(RecentInterview::from).collect(),
            questions: recent_questions.iter().map(RecentQuestion::from).collect(),
            feedback: recent_feedback
                .iter()
                .map(|f| RecentFeedback::new(f, assessed.get(&f.interview_id)))
                .collect(),
        },
    };
    cached_json(
        headers,
        StatusCode::OK,
        &DataResponse::single(data),
        CachePolicy::SUMMARY.into(),
    )
}
