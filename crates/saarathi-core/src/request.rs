//! Form state and the validated generation request built from it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::{ClassLevel, Difficulty};

/// Message shown next to the form when a required field is blank.
pub const VALIDATION_MESSAGE: &str = "Please fill in both Subject and Topic.";

/// Raw values of the four form inputs, as last entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanForm {
    #[serde(default)]
    pub class: ClassLevel,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub difficulty: Difficulty,
}

/// A required form field was blank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("subject is required")]
    MissingSubject,
    #[error("topic is required")]
    MissingTopic,
    #[error("subject and topic are required")]
    MissingSubjectAndTopic,
}

impl ValidationError {
    /// Text for the inline banner. The same for every variant.
    pub fn user_message(&self) -> &'static str {
        VALIDATION_MESSAGE
    }
}

/// A request that has passed validation. Subject and topic are non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    class: ClassLevel,
    subject: String,
    topic: String,
    difficulty: Difficulty,
}

impl GenerationRequest {
    /// Validate the fields and build a request.
    ///
    /// Subject and topic are trimmed; a field that is empty after trimming
    /// is rejected.
    pub fn new(
        class: ClassLevel,
        subject: &str,
        topic: &str,
        difficulty: Difficulty,
    ) -> Result<Self, ValidationError> {
        let subject = subject.trim();
        let topic = topic.trim();

        match (subject.is_empty(), topic.is_empty()) {
            (true, true) => return Err(ValidationError::MissingSubjectAndTopic),
            (true, false) => return Err(ValidationError::MissingSubject),
            (false, true) => return Err(ValidationError::MissingTopic),
            (false, false) => {}
        }

        Ok(Self {
            class,
            subject: subject.to_owned(),
            topic: topic.to_owned(),
            difficulty,
        })
    }

    pub fn class(&self) -> ClassLevel {
        self.class
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

impl TryFrom<&PlanForm> for GenerationRequest {
    type Error = ValidationError;

    fn try_from(form: &PlanForm) -> Result<Self, Self::Error> {
        Self::new(form.class, &form.subject, &form.topic, form.difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_filled_form() {
        let form = PlanForm {
            class: ClassLevel::Seven,
            subject: "Science".to_string(),
            topic: "Photosynthesis".to_string(),
            difficulty: Difficulty::Average,
        };
        let req = GenerationRequest::try_from(&form).unwrap();
        assert_eq!(req.class(), ClassLevel::Seven);
        assert_eq!(req.subject(), "Science");
        assert_eq!(req.topic(), "Photosynthesis");
        assert_eq!(req.difficulty(), Difficulty::Average);
    }

    #[test]
    fn trims_fields() {
        let req =
            GenerationRequest::new(ClassLevel::Six, "  Maths ", "\tFractions\n", Difficulty::Mixed)
                .unwrap();
        assert_eq!(req.subject(), "Maths");
        assert_eq!(req.topic(), "Fractions");
    }

    #[test]
    fn rejects_missing_subject() {
        let err = GenerationRequest::new(ClassLevel::Six, "", "Fractions", Difficulty::Average)
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingSubject);
        assert_eq!(err.user_message(), VALIDATION_MESSAGE);
    }

    #[test]
    fn rejects_whitespace_topic() {
        let err = GenerationRequest::new(ClassLevel::Six, "Maths", "   ", Difficulty::Average)
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingTopic);
    }

    #[test]
    fn rejects_both_missing() {
        let err = GenerationRequest::try_from(&PlanForm::default()).unwrap_err();
        assert_eq!(err, ValidationError::MissingSubjectAndTopic);
    }

    #[test]
    fn form_deserializes_with_defaults() {
        let form: PlanForm = serde_json::from_str(r#"{"subject":"History"}"#).unwrap();
        assert_eq!(form.class, ClassLevel::Six);
        assert_eq!(form.difficulty, Difficulty::Average);
        assert_eq!(form.subject, "History");
        assert!(form.topic.is_empty());
    }
}
