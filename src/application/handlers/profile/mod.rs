//! Characteristic profile command handlers.

mod create_profile;
mod submit_quiz_answers;

pub use create_profile::{
    CreateCharacteristicProfileCommand, CreateCharacteristicProfileHandler,
    CreateCharacteristicProfileResult,
};
pub use submit_quiz_answers::{
    SubmitQuizAnswersCommand, SubmitQuizAnswersHandler, SubmitQuizAnswersResult,
};
