//! Canned data served when a read path cannot reach its service.

use crate::{Question, QuestionId, QuestionSet};

const FALLBACK_QUESTIONS: [(&str, &str, u32); 8] = [
    (
        "fallback-1",
        "What are you most passionate about in your life right now?",
        1,
    ),
    (
        "fallback-2",
        "What's your favorite type of cuisine, and why do you enjoy it?",
        2,
    ),
    (
        "fallback-3",
        "If you could travel anywhere in the world, where would you go and why?",
        1,
    ),
    (
        "fallback-4",
        "What's a book or movie that has significantly influenced your thinking?",
        2,
    ),
    (
        "fallback-5",
        "What do you enjoy most about your current job or studies?",
        1,
    ),
    (
        "fallback-6",
        "Do you have any hobbies or activities you're trying to make more time for?",
        2,
    ),
    (
        "fallback-7",
        "What's one goal you're currently working toward?",
        1,
    ),
    (
        "fallback-8",
        "What's your favorite way to spend a weekend?",
        2,
    ),
];

/// The fixed icebreaker list, ids `fallback-1` through `fallback-8`.
pub fn fallback_questions() -> Vec<Question> {
    FALLBACK_QUESTIONS
        .iter()
        .map(|(id, text, for_user)| Question {
            id: QuestionId::from(*id),
            text: (*text).to_owned(),
            for_user: Some(*for_user),
            extra: serde_json::Map::new(),
        })
        .collect()
}

impl QuestionSet {
    /// Success-shaped set carrying [`fallback_questions`].
    pub fn fallback() -> Self {
        Self {
            code: 200,
            questions: fallback_questions(),
            extra: serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fallback_questions;
    use crate::QuestionSet;

    #[test]
    fn eight_questions_with_sequential_ids() {
        let questions = fallback_questions();
        assert_eq!(questions.len(), 8);
        for (index, question) in questions.iter().enumerate() {
            assert_eq!(question.id.to_string(), format!("fallback-{}", index + 1));
            assert_eq!(question.for_user, Some(if index % 2 == 0 { 1 } else { 2 }));
            assert!(!question.text.is_empty());
        }
    }

    #[test]
    fn fallback_set_is_success_shaped() {
        let set = QuestionSet::fallback();
        assert_eq!(set.code, 200);
        assert_eq!(set.questions, fallback_questions());
    }
}
