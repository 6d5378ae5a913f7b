// Static interview content: per-occupation open questions and the structured
// questionnaires whose field ids key into the voice vendor's extracted answers.

pub mod bank;
pub mod questionnaire;

pub use bank::{questions_for, SUPPORTED_OCCUPATIONS};
pub use questionnaire::{questionnaire_for, QuestionCategory};
