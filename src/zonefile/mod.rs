//! Reading presentation format text.
//!
//! The [`tokenizer`] splits text into tokens following the rules of zone
//! files: whitespace separates tokens, double quotes enclose strings that
//! may contain whitespace, semicolons start comments, and parentheses group
//! tokens across line breaks. Escape sequences are kept in the token text.
//!
//! The [`scan`] module builds on this to read sequences of character
//! strings.

pub use self::scan::ScanError;
pub use self::tokenizer::{Token, TokenKind, Tokenizer};

pub mod scan;
pub mod tokenizer;
