//! crates/interview_prep_core/src/query.rs
//!
//! Filter and pagination types passed across the `DatabaseService` port.
//!
//! Every filter field is optional: an absent field places no constraint on the
//! result. The `matches` methods are the reference semantics that every store
//! adapter must reproduce.

use crate::domain::{
    Difficulty, ExperienceLevel, Feedback, Interview, InterviewStatus, Question,
    QuestionCategory, User,
};
use uuid::Uuid;

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Number of items in every "recent" list on the aggregate routes.
pub const RECENT_LIMIT: u32 = 5;

//=========================================================================================
// Pagination
//=========================================================================================

/// A 1-based page request. Construction clamps out-of-range input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// The first `n` records, used by the "recent" lists.
    pub fn first(n: u32) -> Self {
        Self::new(1, n)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Records to skip before the page starts.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Combines this request with a total match count.
    pub fn info(&self, total: u64) -> PageInfo {
        PageInfo {
            page: self.page,
            limit: self.limit,
            total,
            pages: total.div_ceil(u64::from(self.limit)),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_LIMIT)
    }
}

/// Pagination block returned alongside a page of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

/// Applies offset/limit to records already sorted newest first.
pub fn paginate<T: Clone>(sorted: &[T], window: Pagination) -> Vec<T> {
    sorted
        .iter()
        .skip(window.offset() as usize)
        .take(window.limit() as usize)
        .cloned()
        .collect()
}

//=========================================================================================
// Filters
//=========================================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub id: Option<Uuid>,
    pub clerk_id: Option<String>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        self.id.map_or(true, |id| user.id == id)
            && self.clerk_id.as_ref().map_or(true, |c| &user.clerk_id == c)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterviewFilter {
    pub user_id: Option<String>,
    pub clerk_id: Option<String>,
    pub status: Option<InterviewStatus>,
}

impl InterviewFilter {
    /// The same owner constraints, narrowed to one status.
    pub fn with_status(&self, status: InterviewStatus) -> Self {
        Self {
            status: Some(status),
            ..self.clone()
        }
    }

    pub fn matches(&self, interview: &Interview) -> bool {
        self.user_id.as_ref().map_or(true, |u| &interview.user_id == u)
            && self.clerk_id.as_ref().map_or(true, |c| &interview.clerk_id == c)
            && self.status.map_or(true, |s| interview.status == s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionFilter {
    /// When set (the default), inactive questions are excluded.
    pub active_only: bool,
    pub category: Option<QuestionCategory>,
    pub difficulty: Option<Difficulty>,
    pub experience_level: Option<ExperienceLevel>,
    /// Matches questions listing any of these technologies.
    pub technologies: Vec<String>,
    /// Lower-cased search terms; a question matches when any term occurs as a
    /// word of its text or tags. Build with [`search_terms`].
    pub search_terms: Vec<String>,
}

impl Default for QuestionFilter {
    fn default() -> Self {
        Self {
            active_only: true,
            category: None,
            difficulty: None,
            experience_level: None,
            technologies: Vec::new(),
            search_terms: Vec::new(),
        }
    }
}

impl QuestionFilter {
    pub fn matches(&self, question: &Question) -> bool {
        if self.active_only && !question.is_active {
            return false;
        }
        if self.category.map_or(false, |c| question.category != c)
            || self.difficulty.map_or(false, |d| question.difficulty != d)
            || self
                .experience_level
                .map_or(false, |l| question.experience_level != l)
        {
            return false;
        }
        if !self.technologies.is_empty()
            && !question
                .technologies
                .iter()
                .any(|t| self.technologies.contains(t))
        {
            return false;
        }
        if !self.search_terms.is_empty() {
            let words = question_words(question);
            return self.search_terms.iter().any(|term| words.contains(term));
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackFilter {
    pub user_id: Option<String>,
    pub clerk_id: Option<String>,
}

impl FeedbackFilter {
    pub fn matches(&self, feedback: &Feedback) -> bool {
        self.user_id.as_ref().map_or(true, |u| &feedback.user_id == u)
            && self.clerk_id.as_ref().map_or(true, |c| &feedback.clerk_id == c)
    }
}

//=========================================================================================
// Free-text search
//=========================================================================================

/// Splits free text into lower-cased alphanumeric terms.
///
/// Terms contain only alphanumeric characters so that they can be handed to a
/// full-text query language without escaping.
pub fn search_terms(text: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
    {
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

fn question_words(question: &Question) -> Vec<String> {
    let mut words = search_terms(&question.text);
    for tag in &question.tags {
        words.extend(search_terms(tag));
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CreatedBy, QuestionType};
    use chrono::Utc;

    fn question(text: &str, tags: &[&str]) -> Question {
        let now = Utc::now();
        Question {
            id: Uuid::new_v4(),
            text: text.to_string(),
            category: QuestionCategory::Technical,
            subcategory: "rust".to_string(),
            difficulty: Difficulty::Medium,
            experience_level: ExperienceLevel::Intermediate,
            technologies: vec!["rust".to_string()],
            question_type: QuestionType::OpenEnded,
            expected_answer: None,
            sample_answers: vec![],
            hints: vec![],
            time_limit_minutes: 5,
            points: 10,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            is_active: true,
            usage_count: 0,
            average_rating: None,
            created_by: CreatedBy::Ai,
            ai_generated: true,
            metadata: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_pagination_clamps_input() {
        let p = Pagination::new(0, 0);
        assert_eq!((p.page(), p.limit()), (1, 1));
        let p = Pagination::new(3, 1_000);
        assert_eq!(p.limit(), MAX_PAGE_LIMIT);
    }

    #[test]
    fn test_offset_is_page_minus_one_times_limit() {
        assert_eq!(Pagination::new(1, 5).offset(), 0);
        assert_eq!(Pagination::new(3, 5).offset(), 10);
    }

    #[test]
    fn test_pages_is_ceiling_of_total_over_limit() {
        assert_eq!(Pagination::new(1, 5).info(12).pages, 3);
        assert_eq!(Pagination::new(1, 5).info(10).pages, 2);
        assert_eq!(Pagination::new(1, 5).info(0).pages, 0);
    }

    #[test]
    fn test_paginate_takes_the_requested_window() {
        let items: Vec<u32> = (0..12).collect();
        assert_eq!(paginate(&items, Pagination::new(3, 5)), vec![10, 11]);
        assert!(paginate(&items, Pagination::new(4, 5)).is_empty());
    }

    #[test]
    fn test_search_terms_are_lowercased_and_deduplicated() {
        assert_eq!(
            search_terms("Rust, rust & Tokio!"),
            vec!["rust".to_string(), "tokio".to_string()]
        );
        assert!(search_terms("  --  ").is_empty());
    }

    #[test]
    fn test_search_matches_any_term_in_text_or_tags() {
        let q = question("Explain ownership in Rust", &["memory-safety"]);
        let mut filter = QuestionFilter {
            search_terms: search_terms("borrowing ownership"),
            ..Default::default()
        };
        assert!(filter.matches(&q));

        filter.search_terms = search_terms("safety");
        assert!(filter.matches(&q));

        filter.search_terms = search_terms("garbage");
        assert!(!filter.matches(&q));
    }

    #[test]
    fn test_inactive_questions_hidden_by_default() {
        let mut q = question("What is a trait?", &[]);
        q.is_active = false;
        assert!(!QuestionFilter::default().matches(&q));
        let all = QuestionFilter {
            active_only: false,
            ..Default::default()
        };
        assert!(all.matches(&q));
    }

    #[test]
    fn test_technology_filter_is_membership() {
        let q = question("What is a trait?", &[]);
        let filter = QuestionFilter {
            technologies: vec!["go".to_string(), "rust".to_string()],
            ..Default::default()
        };
        assert!(filter.matches(&q));
        let filter = QuestionFilter {
            technologies: vec!["go".to_string()],
            ..Default::default()
        };
        assert!(!filter.matches(&q));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let q = question("Anything", &[]);
        assert!(QuestionFilter::default().matches(&q));
    }
}
