//! crates/interview_prep_core/src/validation.rs
//!
//! Create-time validation. Each `validate_*` function takes an unvalidated
//! draft (as received from a client), checks required fields, enum values and
//! numeric bounds, applies the schema defaults, and returns the domain entity
//! ready to be persisted.

use crate::domain::{
    AiRecommendations, CategoryDetail, CategoryScores, CreatedBy, DetailedFeedback, Difficulty,
    ExperienceLevel, Feedback, Interview, InterviewStatus, LearningResource, Question,
    QuestionCategory, QuestionMetadata, TranscriptEntry, UnknownVariant, User,
};
use chrono::{DateTime, Utc};
use std::str::FromStr;
use uuid::Uuid;

pub const USER_REQUIRED_FIELDS: &[&str] = &["clerkId", "email", "firstName", "lastName"];
pub const QUESTION_REQUIRED_FIELDS: &[&str] = &[
    "text",
    "category",
    "subcategory",
    "difficulty",
    "experienceLevel",
    "type",
];
pub const INTERVIEW_REQUIRED_FIELDS: &[&str] =
    &["userId", "clerkId", "title", "type", "experienceLevel"];
pub const FEEDBACK_REQUIRED_FIELDS: &[&str] = &[
    "interviewId",
    "userId",
    "clerkId",
    "overallScore",
    "categoryScores",
];

pub const DEFAULT_INTERVIEW_DURATION_MINUTES: u32 = 30;
pub const DEFAULT_TIME_LIMIT_MINUTES: u32 = 5;
pub const DEFAULT_POINTS: u8 = 10;
pub const GENERATED_QUESTION_MODEL: &str = "gpt-4";
pub const GENERATED_QUESTION_TEMPERATURE: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Lists every required field of the entity, not only the absent ones.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(&'static [&'static str]),

    #[error("Invalid value for {field}: {source}")]
    InvalidEnum {
        field: &'static str,
        source: UnknownVariant,
    },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("{0}")]
    Inconsistent(String),
}

//=========================================================================================
// Drafts
//=========================================================================================

#[derive(Debug, Clone, Default)]
pub struct UserDraft {
    pub clerk_id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image: Option<String>,
    pub experience_level: Option<String>,
    pub preferred_technologies: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionDraft {
    pub text: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub difficulty: Option<String>,
    pub experience_level: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub question_type: Option<String>,
    pub expected_answer: Option<String>,
    pub sample_answers: Option<Vec<String>>,
    pub hints: Option<Vec<String>>,
    pub time_limit_minutes: Option<u32>,
    pub points: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct TranscriptDraft {
    pub speaker: Option<String>,
    pub message: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct InterviewDraft {
    pub user_id: Option<String>,
    pub clerk_id: Option<String>,
    pub title: Option<String>,
    pub interview_type: Option<String>,
    pub experience_level: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub status: Option<String>,
    pub duration_minutes: Option<u32>,
    pub total_questions: Option<u32>,
    pub completed_questions: Option<u32>,
    pub score: Option<i64>,
    pub transcript: Option<Vec<TranscriptDraft>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryScoresDraft {
    pub technical_knowledge: Option<i64>,
    pub communication: Option<i64>,
    pub problem_solving: Option<i64>,
    pub confidence: Option<i64>,
    pub time_management: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryDetailDraft {
    pub score: Option<i64>,
    pub comments: Option<String>,
    pub suggestions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct DetailedFeedbackDraft {
    pub technical_knowledge: Option<CategoryDetailDraft>,
    pub communication: Option<CategoryDetailDraft>,
    pub problem_solving: Option<CategoryDetailDraft>,
    pub confidence: Option<CategoryDetailDraft>,
    pub time_management: Option<CategoryDetailDraft>,
}

#[derive(Debug, Clone, Default)]
pub struct ResourceDraft {
    pub title: Option<String>,
    pub url: Option<String>,
    pub resource_type: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RecommendationsDraft {
    pub next_steps: Option<Vec<String>>,
    pub resources: Option<Vec<ResourceDraft>>,
    pub practice_areas: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct FeedbackDraft {
    pub interview_id: Option<Uuid>,
    pub user_id: Option<String>,
    pub clerk_id: Option<String>,
    pub overall_score: Option<i64>,
    pub category_scores: Option<CategoryScoresDraft>,
    pub strengths: Option<Vec<String>>,
    pub areas_for_improvement: Option<Vec<String>>,
    pub detailed_feedback: Option<DetailedFeedbackDraft>,
    pub ai_recommendations: Option<RecommendationsDraft>,
}

//=========================================================================================
// Helpers
//=========================================================================================

/// A present, non-blank string. Blank strings count as missing.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_enum<T: FromStr<Err = UnknownVariant>>(
    field: &'static str,
    value: &str,
) -> Result<T, ValidationError> {
    value
        .parse()
        .map_err(|source| ValidationError::InvalidEnum { field, source })
}

fn bounded(field: &'static str, value: i64, min: i64, max: i64) -> Result<u8, ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            min: min as f64,
            max: max as f64,
            value: value as f64,
        });
    }
    Ok(value as u8)
}

fn score(field: &'static str, value: i64) -> Result<u8, ValidationError> {
    bounded(field, value, 0, 100)
}

/// Counts and durations are stored as 32-bit signed integers.
fn count(field: &'static str, value: u32) -> Result<u32, ValidationError> {
    if i32::try_from(value).is_err() {
        return Err(ValidationError::OutOfRange {
            field,
            min: 0.0,
            max: f64::from(i32::MAX),
            value: f64::from(value),
        });
    }
    Ok(value)
}

//=========================================================================================
// Validators
//=========================================================================================

pub fn validate_user(draft: UserDraft, now: DateTime<Utc>) -> Result<User, ValidationError> {
    let (Some(clerk_id), Some(email), Some(first_name), Some(last_name)) = (
        present(draft.clerk_id),
        present(draft.email),
        present(draft.first_name),
        present(draft.last_name),
    ) else {
        return Err(ValidationError::MissingFields(USER_REQUIRED_FIELDS));
    };

    let experience_level = match present(draft.experience_level) {
        Some(level) => parse_enum("experienceLevel", &level)?,
        None => ExperienceLevel::default(),
    };

    Ok(User {
        id: Uuid::new_v4(),
        clerk_id,
        email,
        first_name,
        last_name,
        profile_image: present(draft.profile_image),
        experience_level,
        preferred_technologies: draft.preferred_technologies.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    })
}

/// Validates a new question. Tags are derived from the classification fields
/// and technologies; generation metadata is stamped for AI-authored questions.
pub fn validate_question(
    draft: QuestionDraft,
    now: DateTime<Utc>,
) -> Result<Question, ValidationError> {
    let (
        Some(text),
        Some(category),
        Some(subcategory),
        Some(difficulty),
        Some(experience_level),
        Some(question_type),
    ) = (
        present(draft.text),
        present(draft.category),
        present(draft.subcategory),
        present(draft.difficulty),
        present(draft.experience_level),
        present(draft.question_type),
    )
    else {
        return Err(ValidationError::MissingFields(QUESTION_REQUIRED_FIELDS));
    };

    let category: QuestionCategory = parse_enum("category", &category)?;
    let difficulty: Difficulty = parse_enum("difficulty", &difficulty)?;
    let experience_level: ExperienceLevel = parse_enum("experienceLevel", &experience_level)?;
    let question_type = parse_enum("type", &question_type)?;
    let points = match draft.points {
        Some(p) => bounded("points", p, 1, 100)?,
        None => DEFAULT_POINTS,
    };
    let time_limit_minutes = count(
        "timeLimit",
        draft.time_limit_minutes.unwrap_or(DEFAULT_TIME_LIMIT_MINUTES),
    )?;
    let technologies = draft.technologies.unwrap_or_default();

    let mut tags = vec![
        category.as_str().to_string(),
        subcategory.clone(),
        difficulty.as_str().to_string(),
        experience_level.as_str().to_string(),
    ];
    tags.extend(technologies.iter().cloned());

    Ok(Question {
        id: Uuid::new_v4(),
        text,
        category,
        subcategory,
        difficulty,
        experience_level,
        technologies,
        question_type,
        expected_answer: present(draft.expected_answer),
        sample_answers: draft.sample_answers.unwrap_or_default(),
        hints: draft.hints.unwrap_or_default(),
        time_limit_minutes,
        points,
        tags,
        is_active: true,
        usage_count: 0,
        average_rating: None,
        created_by: CreatedBy::default(),
        ai_generated: true,
        metadata: Some(QuestionMetadata {
            model: Some(GENERATED_QUESTION_MODEL.to_string()),
            prompt: None,
            temperature: Some(GENERATED_QUESTION_TEMPERATURE),
        }),
        created_at: now,
        updated_at: now,
    })
}

/// Validates a new interview. A score is only accepted on a completed
/// interview, and completed questions may not exceed the total.
pub fn validate_interview(
    draft: InterviewDraft,
    now: DateTime<Utc>,
) -> Result<Interview, ValidationError> {
    let (Some(user_id), Some(clerk_id), Some(title), Some(interview_type), Some(experience_level)) = (
        present(draft.user_id),
        present(draft.clerk_id),
        present(draft.title),
        present(draft.interview_type),
        present(draft.experience_level),
    ) else {
        return Err(ValidationError::MissingFields(INTERVIEW_REQUIRED_FIELDS));
    };

    let interview_type = parse_enum("type", &interview_type)?;
    let experience_level = parse_enum("experienceLevel", &experience_level)?;
    let status = match present(draft.status) {
        Some(s) => parse_enum("status", &s)?,
        None => InterviewStatus::default(),
    };

    let score = draft.score.map(|s| score("score", s)).transpose()?;
    if score.is_some() && status != InterviewStatus::Completed {
        return Err(ValidationError::Inconsistent(format!(
            "score is only accepted when status is completed (status is {status})"
        )));
    }

    let duration_minutes = count(
        "duration",
        draft.duration_minutes.unwrap_or(DEFAULT_INTERVIEW_DURATION_MINUTES),
    )?;
    let total_questions = count("totalQuestions", draft.total_questions.unwrap_or(0))?;
    let completed_questions = count("completedQuestions", draft.completed_questions.unwrap_or(0))?;
    if completed_questions > total_questions {
        return Err(ValidationError::Inconsistent(format!(
            "completedQuestions ({completed_questions}) exceeds totalQuestions ({total_questions})"
        )));
    }

    let mut transcript = Vec::new();
    for line in draft.transcript.unwrap_or_default() {
        let (Some(speaker), Some(message)) = (present(line.speaker), present(line.message)) else {
            return Err(ValidationError::Inconsistent(
                "every transcript entry needs a speaker and a message".to_string(),
            ));
        };
        transcript.push(TranscriptEntry {
            speaker: parse_enum("transcript.speaker", &speaker)?,
            message,
            timestamp: line.timestamp.unwrap_or(now),
        });
    }

    Ok(Interview {
        id: Uuid::new_v4(),
        user_id,
        clerk_id,
        title,
        interview_type,
        experience_level,
        technologies: draft.technologies.unwrap_or_default(),
        status,
        duration_minutes,
        total_questions,
        completed_questions,
        score,
        transcript,
        feedback_id: None,
        started_at: draft.started_at,
        completed_at: draft.completed_at,
        created_at: now,
        updated_at: now,
    })
}

fn validate_category_scores(draft: CategoryScoresDraft) -> Result<CategoryScores, ValidationError> {
    let (
        Some(technical_knowledge),
        Some(communication),
        Some(problem_solving),
        Some(confidence),
        Some(time_management),
    ) = (
        draft.technical_knowledge,
        draft.communication,
        draft.problem_solving,
        draft.confidence,
        draft.time_management,
    )
    else {
        return Err(ValidationError::MissingFields(FEEDBACK_REQUIRED_FIELDS));
    };

    Ok(CategoryScores {
        technical_knowledge: score("categoryScores.technicalKnowledge", technical_knowledge)?,
        communication: score("categoryScores.communication", communication)?,
        problem_solving: score("categoryScores.problemSolving", problem_solving)?,
        confidence: score("categoryScores.confidence", confidence)?,
        time_management: score("categoryScores.timeManagement", time_management)?,
    })
}

fn validate_detail(
    field: &'static str,
    draft: Option<CategoryDetailDraft>,
) -> Result<CategoryDetail, ValidationError> {
    let Some(draft) = draft else {
        return Ok(CategoryDetail::default());
    };
    let (Some(value), Some(comments)) = (draft.score, present(draft.comments)) else {
        return Err(ValidationError::Inconsistent(format!(
            "{field} needs a score and comments"
        )));
    };
    Ok(CategoryDetail {
        score: score(field, value)?,
        comments,
        suggestions: draft.suggestions.unwrap_or_default(),
    })
}

fn validate_recommendations(
    draft: Option<RecommendationsDraft>,
) -> Result<AiRecommendations, ValidationError> {
    let Some(draft) = draft else {
        return Ok(AiRecommendations::default());
    };
    let mut resources = Vec::new();
    for resource in draft.resources.unwrap_or_default() {
        let (Some(title), Some(url), Some(kind)) = (
            present(resource.title),
            present(resource.url),
            present(resource.resource_type),
        ) else {
            return Err(ValidationError::Inconsistent(
                "every resource needs a title, url and type".to_string(),
            ));
        };
        resources.push(LearningResource {
            title,
            url,
            resource_type: parse_enum("aiRecommendations.resources.type", &kind)?,
        });
    }
    Ok(AiRecommendations {
        next_steps: draft.next_steps.unwrap_or_default(),
        resources,
        practice_areas: draft.practice_areas.unwrap_or_default(),
    })
}

/// Validates a new feedback record. Whether the referenced interview exists is
/// the store's concern, not this function's.
pub fn validate_feedback(
    draft: FeedbackDraft,
    now: DateTime<Utc>,
) -> Result<Feedback, ValidationError> {
    let (Some(interview_id), Some(user_id), Some(clerk_id), Some(overall), Some(category_scores)) = (
        draft.interview_id,
        present(draft.user_id),
        present(draft.clerk_id),
        draft.overall_score,
        draft.category_scores,
    ) else {
        return Err(ValidationError::MissingFields(FEEDBACK_REQUIRED_FIELDS));
    };

    let detailed = draft.detailed_feedback.unwrap_or_default();
    let detailed_feedback = DetailedFeedback {
        technical_knowledge: validate_detail(
            "detailedFeedback.technicalKnowledge",
            detailed.technical_knowledge,
        )?,
        communication: validate_detail("detailedFeedback.communication", detailed.communication)?,
        problem_solving: validate_detail(
            "detailedFeedback.problemSolving",
            detailed.problem_solving,
        )?,
        confidence: validate_detail("detailedFeedback.confidence", detailed.confidence)?,
        time_management: validate_detail(
            "detailedFeedback.timeManagement",
            detailed.time_management,
        )?,
    };

    Ok(Feedback {
        id: Uuid::new_v4(),
        interview_id,
        user_id,
        clerk_id,
        overall_score: score("overallScore", overall)?,
        category_scores: validate_category_scores(category_scores)?,
        strengths: draft.strengths.unwrap_or_default(),
        areas_for_improvement: draft.areas_for_improvement.unwrap_or_default(),
        detailed_feedback,
        ai_recommendations: validate_recommendations(draft.ai_recommendations)?,
        generated_at: now,
        created_at: now,
        updated_at: now,
    })
}
