//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification of the REST surface.

use crate::web::{data, dto, test_routes, upload};
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        data::data_handler,
        test_routes::list_users_handler,
        test_routes::create_user_handler,
        test_routes::list_questions_handler,
        test_routes::create_question_handler,
        test_routes::create_interview_handler,
        test_routes::create_feedback_handler,
        test_routes::connection_handler,
        upload::upload_handler,
    ),
    components(
        schemas(
            dto::PaginationView,
            dto::UserView,
            dto::InterviewView,
            dto::QuestionView,
            dto::FeedbackView,
            dto::CreateUserRequest,
            dto::CreateQuestionRequest,
            dto::CreateInterviewRequest,
            dto::CreateFeedbackRequest,
            dto::UserListResponse,
            dto::QuestionListResponse,
            dto::UserCreatedResponse,
            dto::QuestionCreatedResponse,
            dto::InterviewCreatedResponse,
            dto::FeedbackCreatedResponse,
            dto::ConnectionResponse,
            upload::UploadResponse,
        )
    ),
    tags(
        (name = "Data", description = "Paginated reads and aggregate views."),
        (name = "Test", description = "Record creation and connectivity checks."),
        (name = "Uploads", description = "Single-file uploads.")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/data",
            "/test/users",
            "/test/questions",
            "/test/interviews",
            "/test/feedback",
            "/test/connection",
            "/uploads/{endpoint}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
