//! Normalizing free-form text into TXT record presentation format.
//!
//! The functions of this module take arbitrary text, as it may have been
//! entered by a user as the value of a TXT or SPF record, and turn it into
//! the canonical presentation format of TXT record data: a sequence of
//! quoted character strings separated by a single space, such as
//! `"v=spf1 -all"` or `"part one" "part two"`.
//!
//! Normalizing happens in up to two attempts. The first attempt interprets
//! the text as presentation format. This allows callers to provide several
//! character strings, quoted or not, and use escape sequences. If this
//! fails because the text contains an unbalanced double quote or a stray
//! backslash, the second attempt treats the whole text as the content of a
//! single quoted string. Failures caused by parentheses left open at the
//! end of the input are not retried.
//!
//! ```
//! use domain_txt::normalize;
//!
//! assert_eq!(normalize("\"one\" two").unwrap(), "\"one\" \"two\"");
//! assert_eq!(normalize("one; two").unwrap(), "\"one\"");
//! assert_eq!(
//!     normalize("Hel\\lo\"world").unwrap(),
//!     "\"Hel\\\\lo\\\"world\""
//! );
//! assert_eq!(normalize("").unwrap(), "\"\"");
//! assert!(normalize("(this ;").is_err());
//! ```

use crate::base::scan::Symbol;
use crate::utils::config::DefMinMax;
use crate::zonefile::scan::ScanError;
use crate::zonefile::tokenizer::Tokenizer;
use core::fmt;
use tracing::{debug, trace};

//------------ Configuration Constants ----------------------------------------

/// Configuration limits for the maximum record data length.
///
/// The default imposes no limit.
const RDATA_LEN: DefMinMax<usize> = DefMinMax::new(usize::MAX, 1, usize::MAX);

//------------ Config ---------------------------------------------------------

/// Configuration for normalizing.
#[derive(Clone, Debug)]
pub struct Config {
    /// Whether to retry failed input as a single quoted string.
    quote_fallback: bool,

    /// Maximum length of the resulting record data in wire format.
    max_rdata_len: usize,
}

impl Config {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns whether failed input is retried as a quoted string.
    ///
    /// If this is enabled, input that cannot be read as presentation format
    /// is wrapped in double quotes with all double quotes and backslashes
    /// escaped and then read again. This is enabled by default.
    pub fn quote_fallback(&self) -> bool {
        self.quote_fallback
    }

    /// Sets whether failed input is retried as a quoted string.
    pub fn set_quote_fallback(&mut self, value: bool) {
        self.quote_fallback = value
    }

    /// Returns the maximum length of the resulting record data.
    ///
    /// The length is that of the record data in wire format. Each character
    /// string takes up its length plus one octet. By default, there is no
    /// limit. Set this to [`MAX_RDATA_LEN`][crate::rdata::MAX_RDATA_LEN] if
    /// the result has to fit into a single record.
    pub fn max_rdata_len(&self) -> usize {
        self.max_rdata_len
    }

    /// Sets the maximum length of the resulting record data.
    ///
    /// If this value is too small or too large, it will be capped.
    pub fn set_max_rdata_len(&mut self, value: usize) {
        self.max_rdata_len = RDATA_LEN.limit(value)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quote_fallback: true,
            max_rdata_len: RDATA_LEN.default(),
        }
    }
}

//------------ Normalizing ----------------------------------------------------

/// Normalizes text into TXT record presentation format.
///
/// Uses the default configuration. See [`normalize_with`] for details.
pub fn normalize(input: &str) -> Result<String, NormalizeError> {
    normalize_with(input, &Config::default())
}

/// Normalizes text into TXT record presentation format using a config.
///
/// The text is processed as a sequence of octets. Anything beyond ASCII is
/// therefore represented via decimal escape sequences of its UTF-8 encoding
/// in the result.
pub fn normalize_with(
    input: &str,
    config: &Config,
) -> Result<String, NormalizeError> {
    normalize_octets_with(input.as_bytes(), config)
}

/// Normalizes an octets sequence into TXT record presentation format.
///
/// Uses the default configuration.
pub fn normalize_octets(input: &[u8]) -> Result<String, NormalizeError> {
    normalize_octets_with(input, &Config::default())
}

/// Normalizes an octets sequence using the given config.
///
/// On success, returns the character strings found in `input` each in
/// double quotes and separated by a single space. If there aren’t any
/// character strings at all, returns an empty quoted string.
pub fn normalize_octets_with(
    input: &[u8],
    config: &Config,
) -> Result<String, NormalizeError> {
    let err = match normalize_attempt(input, config) {
        Ok(res) => return Ok(res),
        Err(err) => err,
    };
    if !config.quote_fallback() || err.is_unbalanced() {
        debug!("normalizing failed: {}", err);
        return Err(NormalizeError::new(input));
    }
    debug!("normalizing failed: {}; retrying as quoted string", err);
    normalize_attempt(&quote_literal(input), config).map_err(|err| {
        debug!("normalizing as quoted string failed: {}", err);
        NormalizeError::new(input)
    })
}

/// Performs a single attempt at normalizing.
fn normalize_attempt(
    input: &[u8],
    config: &Config,
) -> Result<String, ScanError> {
    let input = escape_unsafe(input);
    trace!("normalizing {:?}", String::from_utf8_lossy(&input));
    let strings = Tokenizer::new(&input).scan_charstrs()?;
    if strings.is_empty() {
        return Ok(String::from("\"\""));
    }
    let rdata_len: usize =
        strings.iter().map(|s| s.as_slice().len() + 1).sum();
    if rdata_len > config.max_rdata_len() {
        return Err(ScanError::LongRecordData);
    }
    Ok(strings
        .iter()
        .map(|s| s.display_quoted().to_string())
        .collect::<Vec<_>>()
        .join(" "))
}

/// Replaces all octets outside of printable ASCII with decimal escapes.
///
/// The delete character 0x7F is kept.
fn escape_unsafe(input: &[u8]) -> Vec<u8> {
    let mut res = Vec::with_capacity(input.len());
    for &ch in input {
        if (0x20..=0x7F).contains(&ch) {
            res.push(ch)
        } else {
            res.extend_from_slice(
                Symbol::DecimalEscape(ch).to_string().as_bytes(),
            )
        }
    }
    res
}

/// Turns the input into a single quoted string.
///
/// Double quotes and backslashes are escaped. All other octets are kept.
fn quote_literal(input: &[u8]) -> Vec<u8> {
    let mut res = Vec::with_capacity(input.len() + 2);
    res.push(b'"');
    for &ch in input {
        if ch == b'"' || ch == b'\\' {
            res.push(b'\\');
        }
        res.push(ch);
    }
    res.push(b'"');
    res
}

//============ Error Types ===================================================

//------------ NormalizeError -------------------------------------------------

/// The input could not be normalized.
///
/// The error contains the input that failed, with anything that isn’t valid
/// UTF-8 replaced.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NormalizeError {
    input: String,
}

impl NormalizeError {
    fn new(input: &[u8]) -> Self {
        NormalizeError {
            input: String::from_utf8_lossy(input).into_owned(),
        }
    }

    /// Returns the input that failed to normalize.
    pub fn input(&self) -> &str {
        &self.input
    }
}

//--- Display and Error

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "cannot normalize TXT record data '{}'", self.input)
    }
}

impl std::error::Error for NormalizeError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn config() {
        let mut config = Config::new();
        assert!(config.quote_fallback());
        assert_eq!(config.max_rdata_len(), usize::MAX);
        config.set_max_rdata_len(0);
        assert_eq!(config.max_rdata_len(), 1);
        config.set_max_rdata_len(100_000);
        assert_eq!(config.max_rdata_len(), 100_000);
        config.set_quote_fallback(false);
        assert!(!config.quote_fallback());
    }

    #[test]
    fn escape_unsafe_octets() {
        assert_eq!(escape_unsafe(b"foo bar"), b"foo bar");
        assert_eq!(escape_unsafe(b"a\nb\tc\r"), b"a\\010b\\009c\\013");
        assert_eq!(
            escape_unsafe(b"\x00\x7f\x80\xff"),
            b"\\000\x7f\\128\\255"
        );
        assert_eq!(escape_unsafe("ä".as_bytes()), b"\\195\\164");
    }

    #[test]
    fn quote_literal_escapes() {
        assert_eq!(quote_literal(b""), b"\"\"");
        assert_eq!(quote_literal(b"a b"), b"\"a b\"");
        assert_eq!(
            quote_literal(b"Hel\\lo\"world"),
            b"\"Hel\\\\lo\\\"world\""
        );
        assert_eq!(quote_literal(b"a\nb"), b"\"a\nb\"");
    }

    #[test]
    fn first_attempt() {
        let config = Config::default();
        assert_eq!(
            normalize_attempt(b"foo \"bar baz\"", &config),
            Ok("\"foo\" \"bar baz\"".into())
        );
        assert_eq!(
            normalize_attempt(b"(foo\nbar)", &config),
            Ok("\"foo\\010bar\"".into())
        );
        assert_eq!(
            normalize_attempt(b"(foo bar)", &config),
            Ok("\"foo\" \"bar\"".into())
        );
        assert!(normalize_attempt(b"foo\"", &config).is_err());
        assert!(normalize_attempt(b"foo\\", &config).is_err());
        assert!(normalize_attempt(b"(this ;", &config)
            .unwrap_err()
            .is_unbalanced());
        assert!(!normalize_attempt(b"a)", &config)
            .unwrap_err()
            .is_unbalanced());
    }

    #[test]
    fn fallback() {
        assert_eq!(normalize("say \"hi"), Ok("\"say \\\"hi\"".into()));
        assert_eq!(normalize("back\\"), Ok("\"back\\\\\"".into()));

        let mut config = Config::new();
        config.set_quote_fallback(false);
        assert_eq!(
            normalize_with("say \"hi", &config),
            Err(NormalizeError::new(b"say \"hi"))
        );
        assert_eq!(
            normalize_with("say hi", &config),
            Ok("\"say\" \"hi\"".into())
        );
    }

    #[test]
    fn no_fallback_for_open_parentheses() {
        assert!(normalize("(this ;").is_err());
        assert!(normalize("(open").is_err());
    }

    #[test]
    fn fallback_for_close_parenthesis() {
        assert_eq!(normalize("a)"), Ok("\"a)\"".into()));
        assert_eq!(normalize("close)"), Ok("\"close)\"".into()));
        assert_eq!(normalize(")("), Ok("\")(\"".into()));
    }

    #[test]
    fn max_rdata_len() {
        let mut config = Config::new();
        config.set_max_rdata_len(8);
        assert_eq!(
            normalize_with("foo bar", &config),
            Ok("\"foo\" \"bar\"".into())
        );
        assert!(normalize_with("foo bar baz", &config).is_err());
        assert_eq!(normalize_with("", &config), Ok("\"\"".into()));

        let input = vec!["a".repeat(255); 257].join(" ");
        let output = normalize(&input).unwrap();
        assert_eq!(output.len(), 257 * 258 - 1);

        config.set_max_rdata_len(crate::rdata::MAX_RDATA_LEN);
        assert!(normalize_with(&input, &config).is_err());
    }

    #[test]
    fn non_utf8_octets() {
        assert_eq!(
            normalize_octets(b"\xff\x00"),
            Ok("\"\\255\\000\"".into())
        );
        let err = normalize_octets(b"(\xff").unwrap_err();
        assert_eq!(err.input(), "(\u{fffd}");
        assert_eq!(
            err.to_string(),
            "cannot normalize TXT record data '(\u{fffd}'"
        );
    }
}
