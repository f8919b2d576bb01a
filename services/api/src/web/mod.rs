pub mod data;
pub mod dto;
pub mod protocol;
pub mod relay;
pub mod reply;
pub mod rest;
pub mod state;
pub mod test_routes;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use state::AppState;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Largest request body accepted on any route.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub use data::data_handler;
pub use relay::{relay_handler, Relay};
pub use test_routes::{
    connection_handler, create_feedback_handler, create_interview_handler,
    create_question_handler, create_user_handler, list_questions_handler, list_users_handler,
};
pub use upload::upload_handler;

/// Builds the application router. CORS and the documentation UI are layered
/// on by the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    let files = ServeDir::new(&app_state.config.upload_dir);

    Router::new()
        .route("/data", get(data_handler))
        .route(
            "/test/users",
            get(list_users_handler).post(create_user_handler),
        )
        .route(
            "/test/questions",
            get(list_questions_handler).post(create_question_handler),
        )
        .route("/test/interviews", post(create_interview_handler))
        .route("/test/feedback", post(create_feedback_handler))
        .route("/test/connection", get(connection_handler))
        .route("/uploads/{endpoint}", post(upload_handler))
        .nest_service(upload::FILES_PATH, files)
        .route("/api/socket/io", get(relay_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
