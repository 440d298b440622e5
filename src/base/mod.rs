//! Basic types for DNS presentation format data.
//!
//! This module provides the building blocks for dealing with character
//! strings, the length-limited octet sequences used in the data of TXT and
//! similar records:
//!
//! * [`CharStr`] is a character string of at most 255 octets. It can be
//!   decoded from presentation format via [`CharStr::from_presentation`] or
//!   `FromStr` and displayed in quoted presentation format via
//!   [`CharStr::display_quoted`].
//! * [`Symbol`] is a single presentation format symbol, i.e., a plain
//!   character or an escape sequence representing one octet.

pub use self::charstr::{CharStr, CharStrError, DisplayQuoted, FromStrError};
pub use self::scan::{Symbol, SymbolOctetsError};

pub mod charstr;
pub mod scan;
