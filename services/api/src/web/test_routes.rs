//! services/api/src/web/test_routes.rs
//!
//! The `/test/*` routes: quick listing and creation of records plus a store
//! connectivity check.

use crate::cache::{CacheOptions, CachePolicy};
use crate::error::RouteError;
use crate::web::dto::{
    ConnectionResponse, CreateFeedbackRequest, CreateInterviewRequest, CreateQuestionRequest,
    CreateUserRequest, FeedbackCreatedResponse, FeedbackView, InterviewCreatedResponse,
    InterviewView, QuestionCreatedResponse, QuestionListResponse, QuestionView,
    UserCreatedResponse, UserListResponse, UserView,
};
use crate::web::reply::cached_json;
use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{Json, Response},
};
use chrono::Utc;
use interview_prep_core::ports::PortError;
use interview_prep_core::query::{Pagination, QuestionFilter, UserFilter};
use interview_prep_core::validation::{
    validate_feedback, validate_interview, validate_question, validate_user,
};
use std::sync::Arc;
use tracing::{error, info};

/// Number of records returned by the test listings.
const TEST_LIST_LIMIT: u32 = 10;

/// Maps the store's refusal to write onto the matching request error.
fn create_error(context: &'static str) -> impl FnOnce(PortError) -> RouteError {
    move |e| match e {
        PortError::Conflict(message) => RouteError::Conflict(message),
        PortError::NotFound(message) => RouteError::NotFound(message),
        other => RouteError::store(context)(other),
    }
}

//=========================================================================================
// Users
//=========================================================================================

/// List the ten most recently created users.
#[utoipa::path(
    get,
    path = "/test/users",
    responses(
        (status = 200, description = "Most recent users", body = UserListResponse),
        (status = 500, description = "The store failed")
    ),
    tag = "Test"
)]
pub async fn list_users_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, RouteError> {
    let users = app_state
        .db
        .list_users(&UserFilter::default(), Pagination::first(TEST_LIST_LIMIT))
        .await
        .map_err(RouteError::store("Failed to fetch users"))?;

    let body = UserListResponse {
        success: true,
        count: users.len(),
        users: users.iter().map(UserView::from).collect(),
    };
    cached_json(&headers, StatusCode::OK, &body, CachePolicy::PRIVATE.into())
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/test/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserCreatedResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "The Clerk ID or email is already registered"),
        (status = 500, description = "The store failed")
    ),
    tag = "Test"
)]
pub async fn create_user_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Response, RouteError> {
    let Json(request) = payload?;
    let user = validate_user(request.into(), Utc::now())?;

    let user = app_state
        .db
        .create_user(user)
        .await
        .map_err(create_error("Failed to create user"))?;
    info!("Created user {} ({})", user.id, user.clerk_id);

    let body = UserCreatedResponse {
        success: true,
        message: "User created successfully".to_string(),
        user: UserView::from(&user),
    };
    cached_json(&headers, StatusCode::CREATED, &body, CacheOptions::none())
}

//=========================================================================================
// Questions
//=========================================================================================

/// List the ten most recently created active questions.
#[utoipa::path(
    get,
    path = "/test/questions",
    responses(
        (status = 200, description = "Most recent active questions", body = QuestionListResponse),
        (status = 500, description = "The store failed")
    ),
    tag = "Test"
)]
pub async fn list_questions_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, RouteError> {
    let questions = app_state
        .db
        .list_questions(&QuestionFilter::default(), Pagination::first(TEST_LIST_LIMIT))
        .await
        .map_err(RouteError::store("Failed to fetch questions"))?;

    let body = QuestionListResponse {
        success: true,
        count: questions.len(),
        questions: questions.iter().map(QuestionView::from).collect(),
    };
    cached_json(&headers, StatusCode::OK, &body, CachePolicy::QUESTIONS.into())
}

/// Create a question. Tags are derived from its classification.
#[utoipa::path(
    post,
    path = "/test/questions",
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, description = "Question created", body = QuestionCreatedResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 500, description = "The store failed")
    ),
    tag = "Test"
)]
pub async fn create_question_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<CreateQuestionRequest>, JsonRejection>,
) -> Result<Response, RouteError> {
    let Json(request) = payload?;
    let question = validate_question(request.into(), Utc::now())?;

    let question = app_state
        .db
        .create_question(question)
        .await
        .map_err(create_error("Failed to create question"))?;
    info!("Created question {} ({})", question.id, question.category);

    let body = QuestionCreatedResponse {
        success: true,
        message: "Question created successfully".to_string(),
        question: QuestionView::from(&question),
    };
    cached_json(&headers, StatusCode::CREATED, &body, CacheOptions::none())
}

//=========================================================================================
// Interviews and Feedback
//=========================================================================================

/// Create an interview.
#[utoipa::path(
    post,
    path = "/test/interviews",
    request_body = CreateInterviewRequest,
    responses(
        (status = 201, description = "Interview created", body = InterviewCreatedResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 500, description = "The store failed")
    ),
    tag = "Test"
)]
pub async fn create_interview_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<CreateInterviewRequest>, JsonRejection>,
) -> Result<Response, RouteError> {
    let Json(request) = payload?;
    let interview = validate_interview(request.into(), Utc::now())?;

    let interview = app_state
        .db
        .create_interview(interview)
        .await
        .map_err(create_error("Failed to create interview"))?;
    info!("Created interview {} for user {}", interview.id, interview.user_id);

    let body = InterviewCreatedResponse {
        success: true,
        message: "Interview created successfully".to_string(),
        interview: InterviewView::new(&interview, None),
    };
    cached_json(&headers, StatusCode::CREATED, &body, CacheOptions::none())
}

/// Attach feedback to an interview that has none yet.
#[utoipa::path(
    post,
    path = "/test/feedback",
    request_body = CreateFeedbackRequest,
    responses(
        (status = 201, description = "Feedback created and linked", body = FeedbackCreatedResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "The interview does not exist"),
        (status = 409, description = "The interview already has feedback"),
        (status = 500, description = "The store failed")
    ),
    tag = "Test"
)]
pub async fn create_feedback_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<CreateFeedbackRequest>, JsonRejection>,
) -> Result<Response, RouteError> {
    let Json(request) = payload?;
    let feedback = validate_feedback(request.into(), Utc::now())?;

    let feedback = app_state
        .db
        .create_feedback(feedback)
        .await
        .map_err(create_error("Failed to create feedback"))?;
    info!(
        "Created feedback {} for interview {}",
        feedback.id, feedback.interview_id
    );

    let interview = app_state
        .db
        .get_interviews_by_ids(&[feedback.interview_id])
        .await
        .map_err(RouteError::store("Failed to fetch interview"))?;

    let body = FeedbackCreatedResponse {
        success: true,
        message: "Feedback created successfully".to_string(),
        feedback: FeedbackView::new(&feedback, interview.first()),
    };
    cached_json(&headers, StatusCode::CREATED, &body, CacheOptions::none())
}

//=========================================================================================
// Connectivity
//=========================================================================================

/// Check that the store is reachable.
#[utoipa::path(
    get,
    path = "/test/connection",
    responses(
        (status = 200, description = "The store answered", body = ConnectionResponse),
        (status = 500, description = "The store did not answer", body = ConnectionResponse)
    ),
    tag = "Test"
)]
pub async fn connection_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, RouteError> {
    let (status, body) = match app_state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            ConnectionResponse {
                success: true,
                message: "Database connection successful".to_string(),
                error: None,
                timestamp: Utc::now(),
            },
        ),
        Err(e) => {
            error!("Database connection check failed: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ConnectionResponse {
                    success: false,
                    message: "Database connection failed".to_string(),
                    error: Some(e.to_string()),
                    timestamp: Utc::now(),
                },
            )
        }
    };
    cached_json(&headers, status, &body, CacheOptions::none())
}
