//! services/api/src/web/dto.rs
//!
//! JSON request bodies and response views. Keys are camelCase on the wire;
//! enum fields travel as their string forms.

use chrono::{DateTime, Utc};
use interview_prep_core::domain::{
    AiRecommendations, CategoryDetail, CategoryScores, DetailedFeedback, Feedback, Interview,
    Question, QuestionMetadata, TranscriptEntry, User,
};
use interview_prep_core::query::PageInfo;
use interview_prep_core::validation::{
    CategoryDetailDraft, CategoryScoresDraft, DetailedFeedbackDraft, FeedbackDraft,
    InterviewDraft, QuestionDraft, RecommendationsDraft, ResourceDraft, TranscriptDraft,
    UserDraft,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Envelopes
//=========================================================================================

#[derive(Serialize, ToSchema, Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl From<PageInfo> for PaginationView {
    fn from(info: PageInfo) -> Self {
        Self {
            page: info.page,
            limit: info.limit,
            total: info.total,
            pages: info.pages,
        }
    }
}

/// `{ success, data, pagination? }` as returned by `GET /data`.
#[derive(Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationView>,
}

impl<T> DataResponse<T> {
    pub fn page(data: T, info: PageInfo) -> Self {
        Self {
            success: true,
            data,
            pagination: Some(info.into()),
        }
    }

    pub fn single(data: T) -> Self {
        Self {
            success: true,
            data,
            pagination: None,
        }
    }
}

//=========================================================================================
// Request Bodies
//=========================================================================================

#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub clerk_id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image: Option<String>,
    pub experience_level: Option<String>,
    pub preferred_technologies: Option<Vec<String>>,
}

impl From<CreateUserRequest> for UserDraft {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            clerk_id: req.clerk_id,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            profile_image: req.profile_image,
            experience_level: req.experience_level,
            preferred_technologies: req.preferred_technologies,
        }
    }
}

#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    pub text: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub difficulty: Option<String>,
    pub experience_level: Option<String>,
    pub technologies: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub question_type: Option<String>,
    pub expected_answer: Option<String>,
    pub sample_answers: Option<Vec<String>>,
    pub hints: Option<Vec<String>>,
    /// Minutes.
    pub time_limit: Option<u32>,
    pub points: Option<i64>,
}

impl From<CreateQuestionRequest> for QuestionDraft {
    fn from(req: CreateQuestionRequest) -> Self {
        Self {
            text: req.text,
            category: req.category,
            subcategory: req.subcategory,
            difficulty: req.difficulty,
            experience_level: req.experience_level,
            technologies: req.technologies,
            question_type: req.question_type,
            expected_answer: req.expected_answer,
            sample_answers: req.sample_answers,
            hints: req.hints,
            time_limit_minutes: req.time_limit,
            points: req.points,
        }
    }
}

#[derive(Deserialize, ToSchema, Debug, Default)]
pub struct TranscriptLineRequest {
    pub speaker: Option<String>,
    pub message: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterviewRequest {
    pub user_id: Option<String>,
    pub clerk_id: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub interview_type: Option<String>,
    pub experience_level: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub status: Option<String>,
    /// Minutes.
    pub duration: Option<u32>,
    pub total_questions: Option<u32>,
    pub completed_questions: Option<u32>,
    pub score: Option<i64>,
    pub transcript: Option<Vec<TranscriptLineRequest>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<CreateInterviewRequest> for InterviewDraft {
    fn from(req: CreateInterviewRequest) -> Self {
        Self {
            user_id: req.user_id,
            clerk_id: req.clerk_id,
            title: req.title,
            interview_type: req.interview_type,
            experience_level: req.experience_level,
            technologies: req.technologies,
            status: req.status,
            duration_minutes: req.duration,
            total_questions: req.total_questions,
            completed_questions: req.completed_questions,
            score: req.score,
            transcript: req.transcript.map(|lines| {
                lines
                    .into_iter()
                    .map(|line| TranscriptDraft {
                        speaker: line.speaker,
                        message: line.message,
                        timestamp: line.timestamp,
                    })
                    .collect()
            }),
            started_at: req.started_at,
            completed_at: req.completed_at,
        }
    }
}

#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScoresRequest {
    pub technical_knowledge: Option<i64>,
    pub communication: Option<i64>,
    pub problem_solving: Option<i64>,
    pub confidence: Option<i64>,
    pub time_management: Option<i64>,
}

#[derive(Deserialize, ToSchema, Debug, Default)]
pub struct CategoryDetailRequest {
    pub score: Option<i64>,
    pub comments: Option<String>,
    pub suggestions: Option<Vec<String>>,
}

#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DetailedFeedbackRequest {
    pub technical_knowledge: Option<CategoryDetailRequest>,
    pub communication: Option<CategoryDetailRequest>,
    pub problem_solving: Option<CategoryDetailRequest>,
    pub confidence: Option<CategoryDetailRequest>,
    pub time_management: Option<CategoryDetailRequest>,
}

#[derive(Deserialize, ToSchema, Debug, Default)]
pub struct ResourceRequest {
    pub title: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
}

#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsRequest {
    pub next_steps: Option<Vec<String>>,
    pub resources: Option<Vec<ResourceRequest>>,
    pub practice_areas: Option<Vec<String>>,
}

#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackRequest {
    pub interview_id: Option<Uuid>,
    pub user_id: Option<String>,
    pub clerk_id: Option<String>,
    pub overall_score: Option<i64>,
    pub category_scores: Option<CategoryScoresRequest>,
    pub strengths: Option<Vec<String>>,
    pub areas_for_improvement: Option<Vec<String>>,
    pub detailed_feedback: Option<DetailedFeedbackRequest>,
    pub ai_recommendations: Option<RecommendationsRequest>,
}

fn detail_draft(req: Option<CategoryDetailRequest>) -> Option<CategoryDetailDraft> {
    req.map(|d| CategoryDetailDraft {
        score: d.score,
        comments: d.comments,
        suggestions: d.suggestions,
    })
}

impl From<CreateFeedbackRequest> for FeedbackDraft {
    fn from(req: CreateFeedbackRequest) -> Self {
        Self {
            interview_id: req.interview_id,
            user_id: req.user_id,
            clerk_id: req.clerk_id,
            overall_score: req.overall_score,
            category_scores: req.category_scores.map(|s| CategoryScoresDraft {
                technical_knowledge: s.technical_knowledge,
                communication: s.communication,
                problem_solving: s.problem_solving,
                confidence: s.confidence,
                time_management: s.time_management,
            }),
            strengths: req.strengths,
            areas_for_improvement: req.areas_for_improvement,
            detailed_feedback: req.detailed_feedback.map(|d| DetailedFeedbackDraft {
                technical_knowledge: detail_draft(d.technical_knowledge),
                communication: detail_draft(d.communication),
                problem_solving: detail_draft(d.problem_solving),
                confidence: detail_draft(d.confidence),
                time_management: detail_draft(d.time_management),
            }),
            ai_recommendations: req.ai_recommendations.map(|r| RecommendationsDraft {
                next_steps: r.next_steps,
                resources: r.resources.map(|resources| {
                    resources
                        .into_iter()
                        .map(|res| ResourceDraft {
                            title: res.title,
                            url: res.url,
                            resource_type: res.resource_type,
                        })
                        .collect()
                }),
                practice_areas: r.practice_areas,
            }),
        }
    }
}

//=========================================================================================
// Full Views
//=========================================================================================

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub clerk_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_image: Option<String>,
    pub experience_level: String,
    pub preferred_technologies: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            clerk_id: user.clerk_id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            profile_image: user.profile_image.clone(),
            experience_level: user.experience_level.to_string(),
            preferred_technologies: user.preferred_technologies.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct TranscriptView {
    pub speaker: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&TranscriptEntry> for TranscriptView {
    fn from(line: &TranscriptEntry) -> Self {
        Self {
            speaker: line.speaker.to_string(),
            message: line.message.clone(),
            timestamp: line.timestamp,
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScoresView {
    pub technical_knowledge: u8,
    pub communication: u8,
    pub problem_solving: u8,
    pub confidence: u8,
    pub time_management: u8,
}

impl From<&CategoryScores> for CategoryScoresView {
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

/// The part of an interview's feedback shown next to the interview.
#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSummaryView {
    pub id: Uuid,
    pub overall_score: u8,
    pub category_scores: CategoryScoresView,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
}

impl From<&Feedback> for FeedbackSummaryView {
    fn from(f: &Feedback) -> Self {
        Self {
            id: f.id,
            overall_score: f.overall_score,
            category_scores: (&f.category_scores).into(),
            strengths: f.strengths.clone(),
            areas_for_improvement: f.areas_for_improvement.clone(),
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InterviewView {
    pub id: Uuid,
    pub user_id: String,
    pub clerk_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub interview_type: String,
    pub experience_level: String,
    pub technologies: Vec<String>,
    pub status: String,
    /// Minutes.
    pub duration: u32,
    pub total_questions: u32,
    pub completed_questions: u32,
    pub score: Option<u8>,
    pub transcript: Vec<TranscriptView>,
    pub feedback_id: Option<Uuid>,
    /// Joined from the linked feedback record, when one exists.
    pub feedback: Option<FeedbackSummaryView>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InterviewView {
    pub fn new(interview: &Interview, feedback: Option<&Feedback>) -> Self {
        Self {
            id: interview.id,
            user_id: interview.user_id.clone(),
            clerk_id: interview.clerk_id.clone(),
            title: interview.title.clone(),
            interview_type: interview.interview_type.to_string(),
            experience_level: interview.experience_level.to_string(),
            technologies: interview.technologies.clone(),
            status: interview.status.to_string(),
            duration: interview.duration_minutes,
            total_questions: interview.total_questions,
            completed_questions: interview.completed_questions,
            score: interview.score,
            transcript: interview.transcript.iter().map(TranscriptView::from).collect(),
            feedback_id: interview.feedback_id,
            feedback: feedback.map(FeedbackSummaryView::from),
            started_at: interview.started_at,
            completed_at: interview.completed_at,
            created_at: interview.created_at,
            updated_at: interview.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct QuestionMetadataView {
    pub model: Option<String>,
    pub prompt: Option<String>,
    pub temperature: Option<f64>,
}

impl From<&QuestionMetadata> for QuestionMetadataView {
    fn from(m: &QuestionMetadata) -> Self {
        Self {
            model: m.model.clone(),
            prompt: m.prompt.clone(),
            temperature: m.temperature,
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: Uuid,
    pub text: String,
    pub category: String,
    pub subcategory: String,
    pub difficulty: String,
    pub experience_level: String,
    pub technologies: Vec<String>,
    #[serde(rename = "type")]
    pub question_type: String,
    pub expected_answer: Option<String>,
    pub sample_answers: Vec<String>,
    pub hints: Vec<String>,
    /// Minutes.
    pub time_limit: u32,
    pub points: u8,
    pub tags: Vec<String>,
    pub is_active: bool,
    pub usage_count: u32,
    pub average_rating: Option<f64>,
    pub created_by: String,
    pub ai_generated: bool,
    pub metadata: Option<QuestionMetadataView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Question> for QuestionView {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            text: q.text.clone(),
            category: q.category.to_string(),
            subcategory: q.subcategory.clone(),
            difficulty: q.difficulty.to_string(),
            experience_level: q.experience_level.to_string(),
            technologies: q.technologies.clone(),
            question_type: q.question_type.to_string(),
            expected_answer: q.expected_answer.clone(),
            sample_answers: q.sample_answers.clone(),
            hints: q.hints.clone(),
            time_limit: q.time_limit_minutes,
            points: q.points,
            tags: q.tags.clone(),
            is_active: q.is_active,
            usage_count: q.usage_count,
            average_rating: q.average_rating,
            created_by: q.created_by.to_string(),
            ai_generated: q.ai_generated,
            metadata: q.metadata.as_ref().map(QuestionMetadataView::from),
            created_at: q.created_at,
            updated_at: q.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct CategoryDetailView {
    pub score: u8,
    pub comments: String,
    pub suggestions: Vec<String>,
}

impl From<&CategoryDetail> for CategoryDetailView {
    fn from(d: &CategoryDetail) -> Self {
        Self {
            score: d.score,
            comments: d.comments.clone(),
            suggestions: d.suggestions.clone(),
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DetailedFeedbackView {
    pub technical_knowledge: CategoryDetailView,
    pub communication: CategoryDetailView,
    pub problem_solving: CategoryDetailView,
    pub confidence: CategoryDetailView,
    pub time_management: CategoryDetailView,
}

impl From<&DetailedFeedback> for DetailedFeedbackView {
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

#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct ResourceView {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub resource_type: String,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsView {
    pub next_steps: Vec<String>,
    pub resources: Vec<ResourceView>,
    pub practice_areas: Vec<String>,
}

impl From<&AiRecommendations> for RecommendationsView {
    fn from(r: &AiRecommendations) -> Self {
        Self {
            next_steps: r.next_steps.clone(),
            resources: r
                .resources
                .iter()
                .map(|res| ResourceView {
                    title: res.title.clone(),
                    url: res.url.clone(),
                    resource_type: res.resource_type.to_string(),
                })
                .collect(),
            practice_areas: r.practice_areas.clone(),
        }
    }
}

/// The part of the assessed interview shown next to a feedback record.
#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSummaryView {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub interview_type: String,
    pub experience_level: String,
    pub technologies: Vec<String>,
    pub status: String,
    pub score: Option<u8>,
}

impl From<&Interview> for InterviewSummaryView {
    fn from(i: &Interview) -> Self {
        Self {
            id: i.id,
            title: i.title.clone(),
            interview_type: i.interview_type.to_string(),
            experience_level: i.experience_level.to_string(),
            technologies: i.technologies.clone(),
            status: i.status.to_string(),
            score: i.score,
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackView {
    pub id: Uuid,
    pub interview_id: Uuid,
    /// Joined from the assessed interview.
    pub interview: Option<InterviewSummaryView>,
    pub user_id: String,
    pub clerk_id: String,
    pub overall_score: u8,
    pub category_scores: CategoryScoresView,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub detailed_feedback: DetailedFeedbackView,
    pub ai_recommendations: RecommendationsView,
    pub generated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FeedbackView {
    pub fn new(feedback: &Feedback, interview: Option<&Interview>) -> Self {
        Self {
            id: feedback.id,
            interview_id: feedback.interview_id,
            interview: interview.map(InterviewSummaryView::from),
            user_id: feedback.user_id.clone(),
            clerk_id: feedback.clerk_id.clone(),
            overall_score: feedback.overall_score,
            category_scores: (&feedback.category_scores).into(),
            strengths: feedback.strengths.clone(),
            areas_for_improvement: feedback.areas_for_improvement.clone(),
            detailed_feedback: (&feedback.detailed_feedback).into(),
            ai_recommendations: (&feedback.ai_recommendations).into(),
            generated_at: feedback.generated_at,
            created_at: feedback.created_at,
            updated_at: feedback.updated_at,
        }
    }
}

//=========================================================================================
// Dashboard Projections
//=========================================================================================

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub user: Option<UserView>,
    pub statistics: StatisticsView,
    pub recent_interviews: Vec<DashboardInterviewView>,
    pub recent_feedback: Vec<DashboardFeedbackView>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsView {
    pub total_interviews: u64,
    pub completed_interviews: u64,
    pub in_progress_interviews: u64,
    pub average_score: f64,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRef {
    pub id: Uuid,
    pub overall_score: u8,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DashboardInterviewView {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub interview_type: String,
    pub status: String,
    pub score: Option<u8>,
    pub created_at: DateTime<Utc>,
    pub feedback: Option<ScoreRef>,
}

impl DashboardInterviewView {
    pub fn new(interview: &Interview, feedback: Option<&Feedback>) -> Self {
        Self {
            id: interview.id,
            title: interview.title.clone(),
            interview_type: interview.interview_type.to_string(),
            status: interview.status.to_string(),
            score: interview.score,
            created_at: interview.created_at,
            feedback: feedback.map(|f| ScoreRef {
                id: f.id,
                overall_score: f.overall_score,
            }),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InterviewTitleRef {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub interview_type: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFeedbackView {
    pub id: Uuid,
    pub overall_score: u8,
    pub category_scores: CategoryScoresView,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub interview: Option<InterviewTitleRef>,
}

impl DashboardFeedbackView {
    pub fn new(feedback: &Feedback, interview: Option<&Interview>) -> Self {
        Self {
            id: feedback.id,
            overall_score: feedback.overall_score,
            category_scores: (&feedback.category_scores).into(),
            strengths: feedback.strengths.clone(),
            areas_for_improvement: feedback.areas_for_improvement.clone(),
            created_at: feedback.created_at,
            interview: interview.map(|i| InterviewTitleRef {
                id: i.id,
                title: i.title.clone(),
                interview_type: Some(i.interview_type.to_string()),
            }),
        }
    }
}

//=========================================================================================
// Summary Projections
//=========================================================================================

#[derive(Serialize, Debug, Clone)]
pub struct SummaryView {
    pub summary: SummaryCounts,
    pub recent: RecentItems,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SummaryCounts {
    pub users: u64,
    pub interviews: u64,
    /// Active questions only.
    pub questions: u64,
    pub feedback: u64,
}

#[derive(Serialize, Debug, Clone)]
pub struct RecentItems {
    pub users: Vec<RecentUser>,
    pub interviews: Vec<RecentInterview>,
    pub questions: Vec<RecentQuestion>,
    pub feedback: Vec<RecentFeedback>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecentUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub experience_level: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for RecentUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            email: u.email.clone(),
            experience_level: u.experience_level.to_string(),
            created_at: u.created_at,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecentInterview {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub interview_type: String,
    pub status: String,
    pub score: Option<u8>,
    pub created_at: DateTime<Utc>,
}

impl From<&Interview> for RecentInterview {
    fn from(i: &Interview) -> Self {
        Self {
            id: i.id,
            title: i.title.clone(),
            interview_type: i.interview_type.to_string(),
            status: i.status.to_string(),
            score: i.score,
            created_at: i.created_at,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecentQuestion {
    pub id: Uuid,
    pub text: String,
    pub category: String,
    pub difficulty: String,
    pub experience_level: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Question> for RecentQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            text: q.text.clone(),
            category: q.category.to_string(),
            difficulty: q.difficulty.to_string(),
            experience_level: q.experience_level.to_string(),
            created_at: q.created_at,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecentFeedback {
    pub id: Uuid,
    pub overall_score: u8,
    pub category_scores: CategoryScoresView,
    pub created_at: DateTime<Utc>,
    pub interview: Option<InterviewTitleRef>,
}

impl RecentFeedback {
    pub fn new(feedback: &Feedback, interview: Option<&Interview>) -> Self {
        Self {
            id: feedback.id,
            overall_score: feedback.overall_score,
            category_scores: (&feedback.category_scores).into(),
            created_at: feedback.created_at,
            interview: interview.map(|i| InterviewTitleRef {
                id: i.id,
                title: i.title.clone(),
                interview_type: None,
            }),
        }
    }
}

//=========================================================================================
// Test Route Responses
//=========================================================================================

#[derive(Serialize, ToSchema, Debug)]
pub struct UserListResponse {
    pub success: bool,
    pub count: usize,
    pub users: Vec<UserView>,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct QuestionListResponse {
    pub success: bool,
    pub count: usize,
    pub questions: Vec<QuestionView>,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct UserCreatedResponse {
    pub success: bool,
    pub message: String,
    pub user: UserView,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct QuestionCreatedResponse {
    pub success: bool,
    pub message: String,
    pub question: QuestionView,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct InterviewCreatedResponse {
    pub success: bool,
    pub message: String,
    pub interview: InterviewView,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct FeedbackCreatedResponse {
    pub success: bool,
    pub message: String,
    pub feedback: FeedbackView,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct ConnectionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}
