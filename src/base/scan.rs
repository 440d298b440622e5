//! Symbols of the presentation format.
//!
//! Character strings in presentation format are sequences of symbols. A
//! symbol is either a plain character, a character escaped via a preceding
//! backslash, or a raw octet given as a backslash followed by exactly three
//! decimal digits.
//!
//! All processing happens on octets. Non-ASCII data never reaches this
//! module unescaped when it is used via the normalizer.

use core::fmt;

//------------ Constants -----------------------------------------------------

/// The number of digits in a decimal escape sequence.
pub const DECIMAL_ESCAPE_LEN: usize = 3;

/// The radix of the digits in a decimal escape sequence.
pub const DECIMAL_ESCAPE_RADIX: u32 = 10;

//------------ Symbol --------------------------------------------------------

/// The presentation format representation of a single octet.
///
/// This is either a regular character or an escape sequence. See the variants
/// for more details.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Symbol {
    /// An unescaped octet.
    Char(u8),

    /// An octet escaped via a preceding backslash.
    SimpleEscape(u8),

    /// A raw octet escaped using the decimal escape sequence.
    ///
    /// This escape sequence consists of a backslash followed by exactly three
    /// decimal digits with the value of the octet.
    DecimalEscape(u8),
}

impl Symbol {
    /// Reads a symbol from the given position in an octets slice.
    ///
    /// Returns the symbol and the index of the end of the symbol in the
    /// slice or `Ok(None)` if `pos` is at the end of the slice.
    ///
    /// A backslash followed by anything but a digit is a simple escape for
    /// whatever octet follows, including a double quote or another
    /// backslash. A backslash followed by a digit must be followed by
    /// exactly [`DECIMAL_ESCAPE_LEN`] digits giving a value of at most 255.
    pub fn from_slice_index(
        octets: &[u8],
        pos: usize,
    ) -> Result<Option<(Symbol, usize)>, SymbolOctetsError> {
        use self::SymbolOctetsError::*;

        let c1 = match octets.get(pos) {
            Some(c1) => *c1,
            None => return Ok(None),
        };
        let pos = pos + 1;

        if c1 != b'\\' {
            return Ok(Some((Symbol::Char(c1), pos)));
        }

        let c2 = match octets.get(pos) {
            Some(c2) => *c2,
            None => return Err(ShortInput),
        };
        if !c2.is_ascii_digit() {
            return Ok(Some((Symbol::SimpleEscape(c2), pos + 1)));
        }

        let mut pos = pos;
        let mut value = 0u32;
        for _ in 0..DECIMAL_ESCAPE_LEN {
            let digit = match octets.get(pos) {
                Some(ch) => match char::from(*ch).to_digit(DECIMAL_ESCAPE_RADIX)
                {
                    Some(digit) => digit,
                    None => return Err(BadEscape),
                },
                None => return Err(ShortInput),
            };
            value = value * DECIMAL_ESCAPE_RADIX + digit;
            pos += 1;
        }
        let value = u8::try_from(value).map_err(|_| BadEscape)?;
        Ok(Some((Symbol::DecimalEscape(value), pos)))
    }

    /// Provides the best symbol for an octet inside a quoted string.
    ///
    /// Double quotes and backslashes use the simple escape sequence. Octets
    /// outside printable ASCII (that is, below 0x20 and from 0x7F upwards)
    /// use the decimal escape sequence. Everything else, including space and
    /// the semicolon, is used as is.
    pub fn from_octet(ch: u8) -> Self {
        if ch == b'"' || ch == b'\\' {
            Symbol::SimpleEscape(ch)
        } else if !(0x20..0x7F).contains(&ch) {
            Symbol::DecimalEscape(ch)
        } else {
            Symbol::Char(ch)
        }
    }

    /// Converts the symbol into the octet it represents.
    pub fn into_octet(self) -> u8 {
        match self {
            Symbol::Char(ch)
            | Symbol::SimpleEscape(ch)
            | Symbol::DecimalEscape(ch) => ch,
        }
    }
}

//--- Display

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Symbol::Char(ch) => write!(f, "{}", char::from(ch)),
            Symbol::SimpleEscape(ch) => write!(f, "\\{}", char::from(ch)),
            Symbol::DecimalEscape(ch) => write!(f, "\\{:03}", ch),
        }
    }
}

//============ Error Types ===================================================

//------------ SymbolOctetsError ---------------------------------------------

/// An error happened when reading a symbol.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SymbolOctetsError {
    /// An illegal escape sequence was encountered.
    BadEscape,

    /// Unexpected end of input.
    ///
    /// This can only happen in an escape sequence.
    ShortInput,
}

//--- Display and Error

impl fmt::Display for SymbolOctetsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SymbolOctetsError::BadEscape => {
                f.write_str("illegal escape sequence")
            }
            SymbolOctetsError::ShortInput => {
                f.write_str("unexpected end of input in escape sequence")
            }
        }
    }
}

impl std::error::Error for SymbolOctetsError {}

//============ Testing =======================================================
