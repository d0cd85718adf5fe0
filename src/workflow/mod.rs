pub mod quiz_session;
pub mod quiz_state;

pub use quiz_session::QuizSession;
pub use quiz_state::{MistakeWrite, Outcome, QuizState, SessionSummary, SessionTick};
