//! A tokenizer for presentation format data.
//!
//! The [`Tokenizer`] splits presentation format text into a sequence of
//! [`Token`]s. It knows about quoted strings, comments, and the grouping of
//! several lines via parentheses, but nothing about the meaning of the
//! tokens it produces.
//!
//! Escape sequences are kept in the token text verbatim. Interpreting them
//! is left to whoever consumes the tokens, typically via
//! [`CharStr::from_presentation`][crate::base::charstr::CharStr::from_presentation].

use core::fmt;
use tracing::trace;

//------------ Constants -----------------------------------------------------

/// The characters delimiting a token outside of a quoted string.
const DELIMITERS: &[u8] = b" \t\n;()\"";

//------------ TokenKind -----------------------------------------------------

/// The kind of a token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenKind {
    /// The end of the input has been reached.
    EndOfInput,

    /// The end of a line outside of a parenthesized group.
    EndOfLine,

    /// A non-empty sequence of white space.
    Whitespace,

    /// An unquoted string.
    Identifier,

    /// A string enclosed in double quotes.
    QuotedString,

    /// A comment started by a semicolon.
    Comment,
}

impl TokenKind {
    /// Returns whether tokens of this kind are strings.
    pub fn is_string(self) -> bool {
        matches!(self, TokenKind::Identifier | TokenKind::QuotedString)
    }
}

//------------ Token ---------------------------------------------------------

/// A single token of presentation format data.
///
/// The string and comment variants contain the raw text of the token.
/// Escape sequences have not been processed. For quoted strings, the
/// surrounding quotes are not part of the text. For comments, the
/// leading semicolon is not.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Token {
    /// The end of the input.
    EndOfInput,

    /// The end of a line outside of a parenthesized group.
    EndOfLine,

    /// White space, only returned when asked for.
    Whitespace,

    /// An unquoted string.
    Identifier(Vec<u8>),

    /// A string that was enclosed in double quotes.
    QuotedString(Vec<u8>),

    /// A comment, only returned when asked for.
    Comment(Vec<u8>),
}

impl Token {
    /// Returns the kind of the token.
    pub fn kind(&self) -> TokenKind {
        match *self {
            Token::EndOfInput => TokenKind::EndOfInput,
            Token::EndOfLine => TokenKind::EndOfLine,
            Token::Whitespace => TokenKind::Whitespace,
            Token::Identifier(_) => TokenKind::Identifier,
            Token::QuotedString(_) => TokenKind::QuotedString,
            Token::Comment(_) => TokenKind::Comment,
        }
    }

    /// Returns the text of the token if it has any.
    pub fn text(&self) -> Option<&[u8]> {
        match *self {
            Token::Identifier(ref text)
            | Token::QuotedString(ref text)
            | Token::Comment(ref text) => Some(text.as_slice()),
            _ => None,
        }
    }

    /// Returns whether the token is a string, quoted or not.
    pub fn is_string(&self) -> bool {
        self.kind().is_string()
    }

    fn string(quoted: bool, text: Vec<u8>) -> Self {
        if quoted {
            Token::QuotedString(text)
        } else {
            Token::Identifier(text)
        }
    }
}

//------------ Tokenizer -----------------------------------------------------

/// Reader of presentation format tokens.
///
/// The tokenizer reads from an octets slice held in memory. It produces one
/// token per call to [`get`][Self::get]. One token can be pushed back via
/// [`unget`][Self::unget] to be returned again by the next call to `get`.
///
/// A carriage return is treated as a line feed. A carriage return directly
/// followed by a line feed counts as a single line feed.
#[derive(Clone, Debug)]
pub struct Tokenizer<'a> {
    /// The input data.
    input: &'a [u8],

    /// The index in `input` of the next character to be read.
    pos: usize,

    /// The number of octets the last character read took up in `input`.
    ///
    /// This is needed to push back a line feed that was read from a CR LF
    /// sequence.
    last_len: usize,

    /// The current line, starting at 1.
    line: usize,

    /// The number of currently open parentheses.
    depth: usize,

    /// Are we inside a quoted string?
    ///
    /// While this is true, the only delimiter is the double quote.
    quoting: bool,

    /// A token that has been pushed back.
    pending: Option<Token>,
}

impl<'a> Tokenizer<'a> {
    /// Creates a new tokenizer atop the given input.
    pub fn new(input: &'a [u8]) -> Self {
        Tokenizer {
            input,
            pos: 0,
            last_len: 0,
            line: 1,
            depth: 0,
            quoting: false,
            pending: None,
        }
    }

    /// Returns the current line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the number of currently open parentheses.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns whether the tokenizer currently is inside a quoted string.
    pub fn is_quoting(&self) -> bool {
        self.quoting
    }

    /// Returns the next token.
    ///
    /// If `want_whitespace` is `false`, white space is skipped silently.
    /// Otherwise a [`Token::Whitespace`] is returned for it. Likewise, if
    /// `want_comment` is `false`, comments are skipped, otherwise returned
    /// as [`Token::Comment`].
    ///
    /// A token that was pushed back is returned first. If it is white space
    /// or a comment and the respective flag is not set, it is dropped.
    pub fn get(
        &mut self,
        want_whitespace: bool,
        want_comment: bool,
    ) -> Result<Token, Error> {
        if let Some(token) = self.pending.take() {
            match token.kind() {
                TokenKind::Whitespace => {
                    if want_whitespace {
                        return Ok(token);
                    }
                }
                TokenKind::Comment => {
                    if want_comment {
                        return Ok(token);
                    }
                }
                kind => {
                    if kind == TokenKind::EndOfLine {
                        self.line += 1;
                    }
                    return Ok(token);
                }
            }
        }

        if self.skip_whitespace() > 0 && want_whitespace {
            return Ok(Token::Whitespace);
        }

        let mut quoted = false;
        let mut text = Vec::new();
        loop {
            let ch = match self.read_char() {
                Some(ch) => ch,
                None => {
                    if self.quoting {
                        return Err(self.error(ErrorKind::EofInQuotedString));
                    }
                    if text.is_empty() {
                        self.check_balanced()?;
                        return Ok(Token::EndOfInput);
                    }
                    return Ok(Token::string(quoted, text));
                }
            };

            if self.is_delimiter(ch) {
                if !text.is_empty() || quoted {
                    self.unread_char(Some(ch));
                    return Ok(Token::string(quoted, text));
                }
                match ch {
                    b'(' => {
                        self.depth += 1;
                        self.skip_whitespace();
                    }
                    b')' => {
                        if self.depth == 0 {
                            return Err(
                                self.error(ErrorKind::InvalidCloseParen)
                            );
                        }
                        self.depth -= 1;
                        self.skip_whitespace();
                    }
                    b'"' => {
                        if self.quoting {
                            self.quoting = false;
                            self.skip_whitespace();
                        } else {
                            self.quoting = true;
                            quoted = true;
                        }
                    }
                    b'\n' => return Ok(Token::EndOfLine),
                    b';' => {
                        let (comment, end) = self.read_comment();
                        if want_comment {
                            self.unread_char(end);
                            return Ok(Token::Comment(comment));
                        }
                        trace!(
                            "skipping comment in line {}: {}",
                            self.line,
                            String::from_utf8_lossy(&comment)
                        );
                        if end.is_none() {
                            self.check_balanced()?;
                            return Ok(Token::EndOfInput);
                        }
                        if self.depth == 0 {
                            return Ok(Token::EndOfLine);
                        }
                        // Inside a group, the comment vanishes and the
                        // token simply continues on the next line.
                        self.skip_whitespace();
                    }
                    _ => return Err(self.error(ErrorKind::IllegalState)),
                }
                continue;
            }

            if ch == b'\\' {
                let next = match self.read_char() {
                    Some(next) => next,
                    None => {
                        return Err(self.error(ErrorKind::UnterminatedEscape))
                    }
                };
                text.push(b'\\');
                text.push(next);
            } else if self.quoting && ch == b'\n' {
                return Err(self.error(ErrorKind::NewlineInQuotedString));
            } else {
                text.push(ch);
            }
        }
    }

    /// Pushes back a token.
    ///
    /// The token will be returned by the next call to [`get`][Self::get].
    /// Only one token can be pushed back at a time. If there already is a
    /// token pending, an error is returned and the pending token is kept.
    pub fn unget(&mut self, token: Token) -> Result<(), Error> {
        if self.pending.is_some() {
            return Err(self.error(ErrorKind::MultiplePushback));
        }
        if token.kind() == TokenKind::EndOfLine {
            self.line = self.line.saturating_sub(1);
        }
        self.pending = Some(token);
        Ok(())
    }
}

/// # Character Level
///
impl<'a> Tokenizer<'a> {
    /// Reads the next character.
    ///
    /// Translates CR and CR LF into LF and keeps track of the line number.
    fn read_char(&mut self) -> Option<u8> {
        let mut ch = *self.input.get(self.pos)?;
        self.pos += 1;
        self.last_len = 1;
        if ch == b'\r' {
            if self.input.get(self.pos) == Some(&b'\n') {
                self.pos += 1;
                self.last_len = 2;
            }
            ch = b'\n';
        }
        if ch == b'\n' {
            self.line += 1;
        }
        Some(ch)
    }

    /// Pushes back the character last read.
    ///
    /// Does nothing if `ch` is `None`, i.e., the end of input.
    fn unread_char(&mut self, ch: Option<u8>) {
        if let Some(ch) = ch {
            self.pos -= self.last_len;
            self.last_len = 0;
            if ch == b'\n' {
                self.line -= 1;
            }
        }
    }

    /// Returns whether `ch` ends the current token.
    fn is_delimiter(&self, ch: u8) -> bool {
        if self.quoting {
            ch == b'"'
        } else {
            DELIMITERS.contains(&ch)
        }
    }

    /// Skips over white space and returns how many characters were skipped.
    ///
    /// Line feeds are white space while inside parentheses.
    fn skip_whitespace(&mut self) -> usize {
        let mut skipped = 0;
        loop {
            let ch = self.read_char();
            match ch {
                Some(b' ') | Some(b'\t') => {}
                Some(b'\n') if self.depth > 0 => {}
                _ => {
                    self.unread_char(ch);
                    return skipped;
                }
            }
            skipped += 1;
        }
    }

    /// Reads the remainder of a comment.
    ///
    /// Returns the comment text and the character that ended it, which is
    /// either a line feed or `None` for the end of input. The ending
    /// character has been consumed.
    fn read_comment(&mut self) -> (Vec<u8>, Option<u8>) {
        let mut comment = Vec::new();
        loop {
            match self.read_char() {
                Some(b'\n') => return (comment, Some(b'\n')),
                Some(ch) => comment.push(ch),
                None => return (comment, None),
            }
        }
    }

    /// Checks that all parentheses have been closed.
    fn check_balanced(&self) -> Result<(), Error> {
        if self.depth > 0 {
            Err(self.error(ErrorKind::UnbalancedParentheses))
        } else {
            Ok(())
        }
    }

    fn error(&self, kind: ErrorKind) -> Error {
        Error::new(kind, self.line)
    }
}

//--- From

impl<'a> From<&'a str> for Tokenizer<'a> {
    fn from(src: &'a str) -> Self {
        Self::new(src.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for Tokenizer<'a> {
    fn from(src: &'a [u8]) -> Self {
        Self::new(src)
    }
}

//============ Error Types ===================================================

//------------ ErrorKind -----------------------------------------------------

/// The kind of error that happened while tokenizing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input ended while parentheses were still open.
    UnbalancedParentheses,

    /// A closing parenthesis without a matching opening one.
    InvalidCloseParen,

    /// The input ended inside a quoted string.
    EofInQuotedString,

    /// An unescaped line feed inside a quoted string.
    NewlineInQuotedString,

    /// The input ended right after a backslash.
    UnterminatedEscape,

    /// The tokenizer ended up in a state it should never be in.
    IllegalState,

    /// A token was pushed back while another one was still pending.
    MultiplePushback,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            ErrorKind::UnbalancedParentheses => "unbalanced parentheses",
            ErrorKind::InvalidCloseParen => "invalid close parenthesis",
            ErrorKind::EofInQuotedString => "EOF in quoted string",
            ErrorKind::NewlineInQuotedString => "newline in quoted string",
            ErrorKind::UnterminatedEscape => "unterminated escape sequence",
            ErrorKind::IllegalState => "illegal state",
            ErrorKind::MultiplePushback => "cannot unget multiple tokens",
        })
    }
}

//------------ Error ---------------------------------------------------------

/// An error happened while tokenizing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    line: usize,
}

impl Error {
    fn new(kind: ErrorKind, line: usize) -> Self {
        Error { kind, line }
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the line where the error happened.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl std::error::Error for Error {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    fn tokens(input: &str) -> Result<Vec<Token>, ErrorKind> {
        let mut tokenizer = Tokenizer::from(input);
        let mut res = Vec::new();
        loop {
            let token = tokenizer.get(false, false).map_err(|e| e.kind())?;
            if token == Token::EndOfInput {
                return Ok(res);
            }
            res.push(token);
        }
    }

    fn ident(s: &str) -> Token {
        Token::Identifier(s.as_bytes().into())
    }

    fn quoted(s: &str) -> Token {
        Token::QuotedString(s.as_bytes().into())
    }

    #[test]
    fn identifiers() {
        assert_eq!(tokens("foo"), Ok(vec![ident("foo")]));
        assert_eq!(tokens("  foo \t bar  "), Ok(vec![ident("foo"), ident("bar")]));
        assert_eq!(tokens(""), Ok(vec![]));
        assert_eq!(tokens("   "), Ok(vec![]));
    }

    #[test]
    fn quoted_strings() {
        assert_eq!(tokens("\"foo bar\""), Ok(vec![quoted("foo bar")]));
        assert_eq!(tokens("\"\""), Ok(vec![quoted("")]));
        assert_eq!(
            tokens("\"one\" two"),
            Ok(vec![quoted("one"), ident("two")])
        );
        assert_eq!(
            tokens("\"a;(b)\"\"c\""),
            Ok(vec![quoted("a;(b)"), quoted("c")])
        );
        assert_eq!(tokens("foo\"bar\""), Ok(vec![ident("foo"), quoted("bar")]));
    }

    #[test]
    fn escapes_are_kept() {
        assert_eq!(tokens("a\\ b"), Ok(vec![ident("a\\ b")]));
        assert_eq!(tokens("\"a\\\"b\""), Ok(vec![quoted("a\\\"b")]));
        assert_eq!(tokens("a\\065"), Ok(vec![ident("a\\065")]));
        assert_eq!(tokens("a\\"), Err(ErrorKind::UnterminatedEscape));
    }

    #[test]
    fn quoting_errors() {
        assert_eq!(tokens("\"foo"), Err(ErrorKind::EofInQuotedString));
        assert_eq!(tokens("\"foo\nbar\""), Err(ErrorKind::NewlineInQuotedString));
        assert_eq!(tokens("Hel\\lo\"world"), Err(ErrorKind::EofInQuotedString));
    }

    #[test]
    fn end_of_line() {
        assert_eq!(
            tokens("foo\nbar\r\nbaz\rqux"),
            Ok(vec![
                ident("foo"),
                Token::EndOfLine,
                ident("bar"),
                Token::EndOfLine,
                ident("baz"),
                Token::EndOfLine,
                ident("qux"),
            ])
        );
    }

    #[test]
    fn comments() {
        assert_eq!(tokens("one; two"), Ok(vec![ident("one")]));
        assert_eq!(
            tokens("one ; two\nthree"),
            Ok(vec![ident("one"), Token::EndOfLine, ident("three")])
        );

        let mut tokenizer = Tokenizer::from("one ;two\nthree");
        assert_eq!(tokenizer.get(false, true), Ok(ident("one")));
        assert_eq!(
            tokenizer.get(false, true),
            Ok(Token::Comment(b"two".to_vec()))
        );
        assert_eq!(tokenizer.get(false, true), Ok(Token::EndOfLine));
        assert_eq!(tokenizer.get(false, true), Ok(ident("three")));
        assert_eq!(tokenizer.get(false, true), Ok(Token::EndOfInput));
    }

    #[test]
    fn whitespace_tokens() {
        let mut tokenizer = Tokenizer::from("a  b");
        assert_eq!(tokenizer.get(true, false), Ok(ident("a")));
        assert_eq!(tokenizer.get(true, false), Ok(Token::Whitespace));
        assert_eq!(tokenizer.get(true, false), Ok(ident("b")));
        assert_eq!(tokenizer.get(true, false), Ok(Token::EndOfInput));
    }

    #[test]
    fn parentheses() {
        assert_eq!(
            tokens("( foo\n bar )\nbaz"),
            Ok(vec![ident("foo"), ident("bar"), Token::EndOfLine, ident("baz")])
        );
        assert_eq!(tokens("((a) b)"), Ok(vec![ident("a"), ident("b")]));
        assert_eq!(tokens("(foo"), Err(ErrorKind::UnbalancedParentheses));
        assert_eq!(tokens("(this ;"), Err(ErrorKind::UnbalancedParentheses));
        assert_eq!(tokens("foo)"), Err(ErrorKind::InvalidCloseParen));
        assert_eq!(tokens(")"), Err(ErrorKind::InvalidCloseParen));
    }

    #[test]
    fn comment_inside_group_joins_token() {
        // The comment and the line feed vanish, and scanning continues
        // with the same token.
        let mut tokenizer = Tokenizer::from("(;note\nfoo)");
        assert_eq!(tokenizer.get(false, false), Ok(ident("foo")));
        assert_eq!(tokenizer.get(false, false), Ok(Token::EndOfInput));
        assert_eq!(tokenizer.line(), 2);
    }

    #[test]
    fn depth_and_quoting() {
        let mut tokenizer = Tokenizer::from("( \"a\" b");
        assert_eq!(tokenizer.get(false, false), Ok(quoted("a")));
        assert_eq!(tokenizer.depth(), 1);
        assert!(tokenizer.is_quoting());
        assert_eq!(tokenizer.get(false, false), Ok(ident("b")));
        assert!(!tokenizer.is_quoting());
        let err = tokenizer.get(false, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnbalancedParentheses);
    }

    #[test]
    fn unget() {
        let mut tokenizer = Tokenizer::from("a b");
        let token = tokenizer.get(false, false).unwrap();
        tokenizer.unget(token).unwrap();
        assert_eq!(
            tokenizer.unget(Token::EndOfInput).unwrap_err().kind(),
            ErrorKind::MultiplePushback
        );
        assert_eq!(tokenizer.get(false, false), Ok(ident("a")));
        assert_eq!(tokenizer.get(false, false), Ok(ident("b")));
    }

    #[test]
    fn unget_whitespace_and_comment() {
        let mut tokenizer = Tokenizer::from("a");
        tokenizer.unget(Token::Whitespace).unwrap();
        assert_eq!(tokenizer.get(false, false), Ok(ident("a")));

        let mut tokenizer = Tokenizer::from("a");
        tokenizer.unget(Token::Comment(b"x".to_vec())).unwrap();
        assert_eq!(
            tokenizer.get(false, true),
            Ok(Token::Comment(b"x".to_vec()))
        );
        assert_eq!(tokenizer.get(false, true), Ok(ident("a")));
    }

    #[test]
    fn line_numbers() {
        let mut tokenizer = Tokenizer::from("a\r\nb\n\"c");
        assert_eq!(tokenizer.line(), 1);
        assert_eq!(tokenizer.get(false, false), Ok(ident("a")));
        assert_eq!(tokenizer.line(), 1);
        let eol = tokenizer.get(false, false).unwrap();
        assert_eq!(eol, Token::EndOfLine);
        assert_eq!(tokenizer.line(), 2);
        tokenizer.unget(eol).unwrap();
        assert_eq!(tokenizer.line(), 1);
        assert_eq!(tokenizer.get(false, false), Ok(Token::EndOfLine));
        assert_eq!(tokenizer.line(), 2);
        assert_eq!(tokenizer.get(false, false), Ok(ident("b")));
        assert_eq!(tokenizer.get(false, false), Ok(Token::EndOfLine));
        let err = tokenizer.get(false, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EofInQuotedString);
        assert_eq!(err.line(), 3);
        assert_eq!(err.to_string(), "line 3: EOF in quoted string");
    }

    #[test]
    fn token_accessors() {
        assert_eq!(ident("a").text(), Some(b"a".as_ref()));
        assert_eq!(Token::EndOfLine.text(), None);
        assert!(quoted("a").is_string());
        assert!(!Token::Comment(Vec::new()).is_string());
        assert_eq!(quoted("").kind(), TokenKind::QuotedString);
    }
}
