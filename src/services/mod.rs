pub mod encouragement;
pub mod mistake_log;
pub mod question_bank;

pub use encouragement::Encouragement;
pub use mistake_log::MistakeLog;
pub use question_bank::{DrawPolicy, FileSource, QuestionBank, QuestionSource, TextSource};
