//! crates/interview_prep_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//=========================================================================================
// Enumerations
//=========================================================================================

/// Returned when a string does not name any variant of a domain enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a closed set of string-valued variants with `as_str`, `ALL`,
/// `Display` and `FromStr`. The string forms are the stored and wire forms.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

string_enum!(
    /// Self-reported seniority, shared by users, interviews and questions.
    ExperienceLevel, "experience level" {
        Beginner => "beginner",
        Intermediate => "intermediate",
        Advanced => "advanced",
    }
);

impl Default for ExperienceLevel {
    fn default() -> Self {
        ExperienceLevel::Beginner
    }
}

string_enum!(
    InterviewType, "interview type" {
        Technical => "technical",
        Behavioral => "behavioral",
        Mixed => "mixed",
    }
);

string_enum!(
    /// Lifecycle of a mock interview. A score is only meaningful once completed.
    InterviewStatus, "interview status" {
        Pending => "pending",
        InProgress => "in-progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
);

impl Default for InterviewStatus {
    fn default() -> Self {
        InterviewStatus::Pending
    }
}

string_enum!(
    Speaker, "speaker" {
        User => "user",
        Ai => "ai",
    }
);

string_enum!(
    QuestionCategory, "question category" {
        Technical => "technical",
        Behavioral => "behavioral",
        SystemDesign => "system-design",
        Algorithms => "algorithms",
        Frontend => "frontend",
        Backend => "backend",
        Devops => "devops",
    }
);

string_enum!(
    Difficulty, "difficulty" {
        Easy => "easy",
        Medium => "medium",
        Hard => "hard",
        Expert => "expert",
    }
);

string_enum!(
    QuestionType, "question type" {
        MultipleChoice => "multiple-choice",
        OpenEnded => "open-ended",
        Coding => "coding",
        Scenario => "scenario",
        Whiteboard => "whiteboard",
    }
);

string_enum!(
    /// Who authored a question in the pool.
    CreatedBy, "question author" {
        Ai => "ai",
        Admin => "admin",
        User => "user",
    }
);

impl Default for CreatedBy {
    fn default() -> Self {
        CreatedBy::Ai
    }
}

string_enum!(
    ResourceType, "resource type" {
        Article => "article",
        Video => "video",
        Course => "course",
        Practice => "practice",
    }
);

//=========================================================================================
// Users
//=========================================================================================

/// A candidate, keyed externally by the identity provider's id (`clerk_id`).
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub clerk_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_image: Option<String>,
    pub experience_level: ExperienceLevel,
    pub preferred_technologies: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//=========================================================================================
// Interviews
//=========================================================================================

/// One line of an interview transcript, in spoken order.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interview {
    pub id: Uuid,
    pub user_id: String,
    pub clerk_id: String,
    pub title: String,
    pub interview_type: InterviewType,
    pub experience_level: ExperienceLevel,
    pub technologies: Vec<String>,
    pub status: InterviewStatus,
    pub duration_minutes: u32,
    pub total_questions: u32,
    pub completed_questions: u32,
    /// Overall score out of 100, present only for completed interviews.
    pub score: Option<u8>,
    pub transcript: Vec<TranscriptEntry>,
    pub feedback_id: Option<Uuid>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//=========================================================================================
// Questions
//=========================================================================================

/// Generation parameters recorded for AI-authored questions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuestionMetadata {
    pub model: Option<String>,
    pub prompt: Option<String>,
    pub temperature: Option<f64>,
}

/// A question in the shared pool. Inactive questions are hidden by default.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: Uuid,
    pub text: String,
    pub category: QuestionCategory,
    pub subcategory: String,
    pub difficulty: Difficulty,
    pub experience_level: ExperienceLevel,
    pub technologies: Vec<String>,
    pub question_type: QuestionType,
    pub expected_answer: Option<String>,
    pub sample_answers: Vec<String>,
    pub hints: Vec<String>,
    pub time_limit_minutes: u32,
    pub points: u8,
    pub tags: Vec<String>,
    pub is_active: bool,
    pub usage_count: u32,
    pub average_rating: Option<f64>,
    pub created_by: CreatedBy,
    pub ai_generated: bool,
    pub metadata: Option<QuestionMetadata>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//=========================================================================================
// Feedback
//=========================================================================================

/// Per-category scores, each in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryScores {
    pub technical_knowledge: u8,
    pub communication: u8,
    pub problem_solving: u8,
    pub confidence: u8,
    pub time_management: u8,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryDetail {
    pub score: u8,
    pub comments: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetailedFeedback {
    pub technical_knowledge: CategoryDetail,
    pub communication: CategoryDetail,
    pub problem_solving: CategoryDetail,
    pub confidence: CategoryDetail,
    pub time_management: CategoryDetail,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LearningResource {
    pub title: String,
    pub url: String,
    pub resource_type: ResourceType,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AiRecommendations {
    pub next_steps: Vec<String>,
    pub resources: Vec<LearningResource>,
    pub practice_areas: Vec<String>,
}

/// The assessment of exactly one interview.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub user_id: String,
    pub clerk_id: String,
    pub overall_score: u8,
    pub category_scores: CategoryScores,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub detailed_feedback: DetailedFeedback,
    pub ai_recommendations: AiRecommendations,
    pub generated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_hyphenated_form() {
        assert_eq!(InterviewStatus::InProgress.as_str(), "in-progress");
        assert_eq!(
            "in-progress".parse::<InterviewStatus>(),
            Ok(InterviewStatus::InProgress)
        );
    }

    #[test]
    fn test_unknown_variant_names_the_kind() {
        let err = "guru".parse::<ExperienceLevel>().unwrap_err();
        assert_eq!(err.kind, "experience level");
        assert_eq!(err.to_string(), "'guru' is not a valid experience level");
    }

    #[test]
    fn test_parsing_is_case_sensitive() {
        assert!("Technical".parse::<QuestionCategory>().is_err());
        assert_eq!(
            "system-design".parse::<QuestionCategory>(),
            Ok(QuestionCategory::SystemDesign)
        );
    }

    #[test]
    fn test_defaults_match_schema() {
        assert_eq!(ExperienceLevel::default(), ExperienceLevel::Beginner);
        assert_eq!(InterviewStatus::default(), InterviewStatus::Pending);
        assert_eq!(CreatedBy::default(), CreatedBy::Ai);
    }

    #[test]
    fn test_all_lists_every_variant() {
        assert_eq!(QuestionCategory::ALL.len(), 7);
        assert_eq!(QuestionType::ALL.len(), 5);
        assert_eq!(Difficulty::ALL.len(), 4);
    }
}
