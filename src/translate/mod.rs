pub mod interface;
pub mod prompt;
pub mod validation;

pub use interface::*;
pub use validation::MAX_TEXT_CHARS;
