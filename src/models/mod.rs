pub mod loaders;
pub mod mistake;
pub mod question;

pub use loaders::{read_document, read_phrases};
pub use mistake::MistakeRecord;
pub use question::{
    is_option_letter, QuestionOption, QuestionRecord, RecordDefect, NO_EXPLANATION,
    OPTION_LETTERS,
};
