//! Shared harness for the route tests: an application over the in-memory
//! store (or a store that always fails), driven with `oneshot`.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use interview_prep_core::domain::{Feedback, Interview, Question, User};
use interview_prep_core::ports::{DatabaseService, PortError, PortResult};
use interview_prep_core::query::{
    FeedbackFilter, InterviewFilter, Pagination, QuestionFilter, UserFilter,
};
use prep_api::adapters::InMemoryStore;
use prep_api::config::Config;
use prep_api::web::{router, state::AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
    pub uploads: TempDir,
}

pub fn app_with(db: Arc<dyn DatabaseService>) -> TestApp {
    let uploads = tempfile::tempdir().expect("temp upload dir");
    let config = Config {
        upload_dir: uploads.path().to_path_buf(),
        relay_capacity: 16,
        ..Config::default()
    };
    let state = Arc::new(AppState::new(db, Arc::new(config)));
    TestApp {
        router: router(state.clone()),
        state,
        uploads,
    }
}

pub fn app() -> TestApp {
    app_with(Arc::new(InMemoryStore::new()))
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> Reply {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        Reply {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> Reply {
        self.send(get(uri)).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Reply {
        self.send(post_json(uri, body)).await
    }

    pub async fn create_user(&self, n: usize) -> Value {
        let reply = self
            .post(
                "/test/users",
                json!({
                    "clerkId": format!("clerk_{n}"),
                    "email": format!("user{n}@example.com"),
                    "firstName": "Grace",
                    "lastName": format!("Hopper{n}"),
                    "experienceLevel": "intermediate"
                }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        reply.body["user"].clone()
    }

    pub async fn create_question(&self, category: &str, difficulty: &str, text: &str) -> Value {
        let reply = self
            .post(
                "/test/questions",
                json!({
                    "text": text,
                    "category": category,
                    "subcategory": "general",
                    "difficulty": difficulty,
                    "experienceLevel": "intermediate",
                    "type": "open-ended",
                    "technologies": ["rust"]
                }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        reply.body["question"].clone()
    }

    pub async fn create_interview(&self, user_id: &str, status: &str, score: Option<u8>) -> Value {
        let mut body = json!({
            "userId": user_id,
            "clerkId": format!("clerk_{user_id}"),
            "title": format!("{status} mock"),
            "type": "technical",
            "experienceLevel": "advanced",
            "status": status,
            "technologies": ["rust", "tokio"]
        });
        if let Some(score) = score {
            body["score"] = json!(score);
        }
        let reply = self.post("/test/interviews", body).await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        reply.body["interview"].clone()
    }

    pub async fn create_feedback(&self, interview_id: &str, user_id: &str, overall: u8) -> Reply {
        self.post(
            "/test/feedback",
            json!({
                "interviewId": interview_id,
                "userId": user_id,
                "clerkId": format!("clerk_{user_id}"),
                "overallScore": overall,
                "categoryScores": {
                    "technicalKnowledge": overall,
                    "communication": overall,
                    "problemSolving": overall,
                    "confidence": overall,
                    "timeManagement": overall
                },
                "strengths": ["clear explanations"],
                "areasForImprovement": ["edge cases"]
            }),
        )
        .await
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn header_str<'a>(headers: &'a HeaderMap, name: header::HeaderName) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

//=========================================================================================
// A store that is always down
//=========================================================================================

pub struct FailingStore;

fn down<T>() -> PortResult<T> {
    Err(PortError::Unexpected("connection refused".to_string()))
}

#[async_trait]
impl DatabaseService for FailingStore {
    async fn ping(&self) -> PortResult<()> {
        down()
    }
    async fn create_user(&self, _: User) -> PortResult<User> {
        down()
    }
    async fn find_user(&self, _: &UserFilter) -> PortResult<Option<User>> {
        down()
    }
    async fn list_users(&self, _: &UserFilter, _: Pagination) -> PortResult<Vec<User>> {
        down()
    }
    async fn count_users(&self, _: &UserFilter) -> PortResult<u64> {
        down()
    }
    async fn latest_user_change(&self, _: &UserFilter) -> PortResult<Option<DateTime<Utc>>> {
        down()
    }
    async fn create_interview(&self, _: Interview) -> PortResult<Interview> {
        down()
    }
    async fn list_interviews(&self, _: &InterviewFilter, _: Pagination) -> PortResult<Vec<Interview>> {
        down()
    }
    async fn count_interviews(&self, _: &InterviewFilter) -> PortResult<u64> {
        down()
    }
    async fn latest_interview_change(&self, _: &InterviewFilter) -> PortResult<Option<DateTime<Utc>>> {
        down()
    }
    async fn get_interviews_by_ids(&self, _: &[Uuid]) -> PortResult<Vec<Interview>> {
        down()
    }
    async fn average_completed_score(&self, _: &InterviewFilter) -> PortResult<Option<f64>> {
        down()
    }
    async fn create_question(&self, _: Question) -> PortResult<Question> {
        down()
    }
    async fn list_questions(&self, _: &QuestionFilter, _: Pagination) -> PortResult<Vec<Question>> {
        down()
    }
    async fn count_questions(&self, _: &QuestionFilter) -> PortResult<u64> {
        down()
    }
    async fn latest_question_change(&self, _: &QuestionFilter) -> PortResult<Option<DateTime<Utc>>> {
        down()
    }
    async fn create_feedback(&self, _: Feedback) -> PortResult<Feedback> {
        down()
    }
    async fn list_feedback(&self, _: &FeedbackFilter, _: Pagination) -> PortResult<Vec<Feedback>> {
        down()
    }
    async fn count_feedback(&self, _: &FeedbackFilter) -> PortResult<u64> {
        down()
    }
    async fn latest_feedback_change(&self, _: &FeedbackFilter) -> PortResult<Option<DateTime<Utc>>> {
        down()
    }
    async fn get_feedback_by_ids(&self, _: &[Uuid]) -> PortResult<Vec<Feedback>> {
        down()
    }
}
