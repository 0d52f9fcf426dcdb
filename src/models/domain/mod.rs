pub mod quiz;
pub mod quiz_attempt;
pub mod schedule;
pub mod summary;
pub mod timestamp;

pub use quiz::{Question, Quiz, QuizOption};
pub use quiz_attempt::{QuestionResponse, QuizAttempt};
pub use schedule::{Course, Schedule, Session, SessionMaterial, SessionObjective, SessionTopic};
pub use summary::Summary;
