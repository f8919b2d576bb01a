pub mod domain;
pub mod ports;
pub mod query;
pub mod validation;

pub use domain::{
    AiRecommendations, CategoryDetail, CategoryScores, CreatedBy, DetailedFeedback, Difficulty,
    ExperienceLevel, Feedback, Interview, InterviewStatus, InterviewType, LearningResource,
    Question, QuestionCategory, QuestionMetadata, QuestionType, ResourceType, Speaker,
    TranscriptEntry, UnknownVariant, User,
};
pub use ports::{DatabaseService, PortError, PortResult};
pub use query::{
    FeedbackFilter, InterviewFilter, PageInfo, Pagination, QuestionFilter, UserFilter,
};
pub use validation::ValidationError;
