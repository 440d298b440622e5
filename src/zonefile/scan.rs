//! Scanning sequences of character strings.

use super::tokenizer::{self, Token, Tokenizer};
use crate::base::charstr::{CharStr, FromStrError};
use core::fmt;
use tracing::trace;

//------------ Tokenizer -----------------------------------------------------

/// # Scanning Character Strings
///
impl<'a> Tokenizer<'a> {
    /// Scans a sequence of character strings.
    ///
    /// Reads tokens for as long as they are strings, quoted or not, and
    /// converts each of them into a character string. The first token that
    /// isn’t a string is pushed back, so the tokenizer is positioned right
    /// at it afterwards. Normally, this will be the end of a line or of the
    /// input.
    ///
    /// If any token fails to scan or convert, the error is returned and
    /// the strings scanned so far are dropped.
    pub fn scan_charstrs(
        &mut self,
    ) -> Result<Vec<CharStr<Vec<u8>>>, ScanError> {
        let mut res = Vec::new();
        loop {
            let text = match self.get(false, false)? {
                Token::Identifier(text) | Token::QuotedString(text) => text,
                token => {
                    trace!("character strings end at {:?}", token.kind());
                    self.unget(token)?;
                    return Ok(res);
                }
            };
            let charstr = CharStr::from_presentation(&text).map_err(|err| {
                ScanError::CharStr {
                    err,
                    line: self.line(),
                }
            })?;
            res.push(charstr);
        }
    }
}

//------------ ScanError -----------------------------------------------------

/// An error happened while scanning character strings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScanError {
    /// The input could not be split into tokens.
    Token(tokenizer::Error),

    /// A string token did not contain a valid character string.
    CharStr { err: FromStrError, line: usize },

    /// The character strings exceed the record data length limit.
    LongRecordData,
}

impl ScanError {
    /// Returns whether the input ended with parentheses still open.
    pub fn is_unbalanced(&self) -> bool {
        match *self {
            ScanError::Token(ref err) => {
                err.kind() == tokenizer::ErrorKind::UnbalancedParentheses
            }
            ScanError::CharStr { .. } | ScanError::LongRecordData => false,
        }
    }
}

//--- From

impl From<tokenizer::Error> for ScanError {
    fn from(err: tokenizer::Error) -> Self {
        ScanError::Token(err)
    }
}

//--- Display and Error

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ScanError::Token(ref err) => fmt::Display::fmt(err, f),
            ScanError::CharStr { ref err, line } => {
                write!(f, "line {}: {}", line, err)
            }
            ScanError::LongRecordData => f.write_str("record data too long"),
        }
    }
}

impl std::error::Error for ScanError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::zonefile::tokenizer::ErrorKind;

    fn scan(input: &str) -> Result<Vec<Vec<u8>>, ScanError> {
        Tokenizer::from(input).scan_charstrs().map(|strs| {
            strs.into_iter().map(CharStr::into_octets).collect()
        })
    }

    #[test]
    fn scan_charstrs() {
        assert_eq!(scan(""), Ok(vec![]));
        assert_eq!(scan("foo"), Ok(vec![b"foo".to_vec()]));
        assert_eq!(
            scan("\"one\" two"),
            Ok(vec![b"one".to_vec(), b"two".to_vec()])
        );
        assert_eq!(
            scan("\"a\\\"b\" c\\\\d \\065"),
            Ok(vec![b"a\"b".to_vec(), b"c\\d".to_vec(), b"A".to_vec()])
        );
        assert_eq!(scan("\"\""), Ok(vec![Vec::new()]));
    }

    #[test]
    fn stops_at_line_end() {
        let mut tokenizer = Tokenizer::from("foo bar\nbaz");
        let strs = tokenizer.scan_charstrs().unwrap();
        assert_eq!(strs.len(), 2);
        assert_eq!(tokenizer.get(false, false), Ok(Token::EndOfLine));
        let strs = tokenizer.scan_charstrs().unwrap();
        assert_eq!(strs.len(), 1);
        assert_eq!(strs[0].as_slice(), b"baz");
        assert_eq!(tokenizer.get(false, false), Ok(Token::EndOfInput));
    }

    #[test]
    fn errors() {
        assert_eq!(
            scan("foo \\12x"),
            Err(ScanError::CharStr {
                err: FromStrError::BadEscape(
                    crate::base::scan::SymbolOctetsError::BadEscape
                ),
                line: 1
            })
        );
        assert_eq!(
            scan(&"a".repeat(256)),
            Err(ScanError::CharStr {
                err: FromStrError::LongString,
                line: 1
            })
        );

        let err = scan("foo \"bar").unwrap_err();
        assert!(matches!(
            err,
            ScanError::Token(err) if err.kind() == ErrorKind::EofInQuotedString
        ));
        assert!(!err.is_unbalanced());
        assert!(scan("(foo").unwrap_err().is_unbalanced());
        assert!(scan("(foo ; bar").unwrap_err().is_unbalanced());
        assert!(!scan("foo)").unwrap_err().is_unbalanced());
    }
}
