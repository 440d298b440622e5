//! Character strings.
//!
//! The somewhat ill-named `<character-string>` is defined in [RFC 1035] as
//! binary information of up to 255 octets. As such, it doesn’t necessarily
//! contain (ASCII-) characters nor is it a string in a Rust-sense.
//!
//! An existing, immutable character string is represented by the type
//! [`CharStr`].
//!
//! A [`CharStr`] can be constructed from its presentation format via the
//! `FromStr` trait or [`CharStr::from_presentation`]. Octets that are not
//! part of an escape sequence are taken as they are. A backslash followed
//! by exactly three decimal digits stands for the octet with that value. A
//! backslash followed by any other character stands for that character,
//! which is how double quotes and backslashes themselves are given.
//!
//! The reverse direction is provided by the `Display` implementation, which
//! produces the unquoted presentation format, and by
//! [`CharStr::display_quoted`], which wraps it in double quotes.
//!
//! [RFC 1035]: https://tools.ietf.org/html/rfc1035

use super::scan::{Symbol, SymbolOctetsError};
use core::{fmt, ops, str};

//------------ CharStr -------------------------------------------------------

/// The content of a DNS character string.
///
/// A character string consists of up to 255 octets of binary data. This type
/// wraps a octets value. It is guaranteed to always be at most 255 octets in
/// length. It derefs into the underlying octets for working with the content
/// in a familiar way.
///
/// As per [RFC 1035], character strings compare ignoring ASCII case.
/// `CharStr`’s implementations of the `std::cmp` traits act accordingly.
///
/// [RFC 1035]: https://tools.ietf.org/html/rfc1035
#[derive(Clone)]
#[repr(transparent)]
pub struct CharStr<Octets: ?Sized>(Octets);

impl<Octets: ?Sized> CharStr<Octets> {
    /// The maximum length of a character string in octets.
    pub const MAX_LEN: usize = 255;

    /// Creates a new empty character string.
    pub fn empty() -> Self
    where
        Octets: From<&'static [u8]>,
    {
        CharStr(b"".as_ref().into())
    }

    /// Creates a new character string from an octets value.
    ///
    /// Returns succesfully if `octets` can indeed be used as a
    /// character string, i.e., it is not longer than 255 bytes.
    pub fn from_octets(octets: Octets) -> Result<Self, CharStrError>
    where
        Octets: AsRef<[u8]> + Sized,
    {
        if octets.as_ref().len() > Self::MAX_LEN {
            Err(CharStrError)
        } else {
            Ok(CharStr(octets))
        }
    }

    /// Converts the character string into its underlying octets value.
    pub fn into_octets(self) -> Octets
    where
        Octets: Sized,
    {
        self.0
    }

    /// Returns a reference to a slice of the character string’s data.
    pub fn as_slice(&self) -> &[u8]
    where
        Octets: AsRef<[u8]>,
    {
        self.0.as_ref()
    }

    /// Returns an object that displays the quoted presentation format.
    ///
    /// The content is wrapped in double quotes. Double quotes and
    /// backslashes are escaped with a backslash, octets outside of
    /// printable ASCII are given as decimal escapes.
    pub fn display_quoted(&self) -> DisplayQuoted<'_>
    where
        Octets: AsRef<[u8]>,
    {
        DisplayQuoted(self.0.as_ref())
    }
}

impl CharStr<[u8]> {
    /// Creates a new character string from an octet slice.
    ///
    /// If the byte slice is longer than 255 bytes, the function will return
    /// an error.
    pub fn from_slice(slice: &[u8]) -> Result<&Self, CharStrError> {
        if slice.len() > Self::MAX_LEN {
            Err(CharStrError)
        } else {
            Ok(Self::from_slice_unchecked(slice))
        }
    }

    /// Creates a character string from a slice without length check.
    pub(crate) fn from_slice_unchecked(slice: &[u8]) -> &Self {
        // SAFETY: CharStr is repr(transparent).
        unsafe { &*(slice as *const [u8] as *const CharStr<[u8]>) }
    }
}

impl CharStr<Vec<u8>> {
    /// Creates a character string from its presentation format.
    ///
    /// The text is the content of a single token with all escape sequences
    /// still in place, i.e., without any surrounding quotes. If the text
    /// contains no backslash at all, it is copied as is.
    ///
    /// Returns an error if an escape sequence is malformed or if the
    /// resulting character string would be longer than 255 octets.
    pub fn from_presentation(text: &[u8]) -> Result<Self, FromStrError> {
        if !text.contains(&b'\\') {
            return Ok(Self::from_octets(text.to_vec())?);
        }

        let mut res = Vec::with_capacity(text.len());
        let mut pos = 0;
        while let Some((symbol, end)) = Symbol::from_slice_index(text, pos)? {
            if res.len() == Self::MAX_LEN {
                return Err(FromStrError::LongString);
            }
            res.push(symbol.into_octet());
            pos = end;
        }
        Ok(CharStr(res))
    }
}

//--- FromStr

impl str::FromStr for CharStr<Vec<u8>> {
    type Err = FromStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_presentation(s.as_bytes())
    }
}

//--- Deref and AsRef

impl<Octets: ?Sized> ops::Deref for CharStr<Octets> {
    type Target = Octets;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<Octets: AsRef<U> + ?Sized, U: ?Sized> AsRef<U> for CharStr<Octets> {
    fn as_ref(&self) -> &U {
        self.0.as_ref()
    }
}

//--- PartialEq and Eq

impl<T, U> PartialEq<U> for CharStr<T>
where
    T: AsRef<[u8]> + ?Sized,
    U: AsRef<[u8]> + ?Sized,
{
    fn eq(&self, other: &U) -> bool {
        self.as_slice().eq(other.as_ref())
    }
}

impl<T: AsRef<[u8]> + ?Sized> Eq for CharStr<T> {}

//--- Display

impl<T: AsRef<[u8]> + ?Sized> fmt::Display for CharStr<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &ch in self.0.as_ref() {
            fmt::Display::fmt(&Symbol::from_octet(ch), f)?;
        }
        Ok(())
    }
}

//--- Debug

impl<T: AsRef<[u8]> + ?Sized> fmt::Debug for CharStr<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("CharStr")
            .field(&format_args!("{}", self))
            .finish()
    }
}

//--- Serialize and Deserialize

#[cfg(feature = "serde")]
impl<T: AsRef<[u8]> + ?Sized> serde::Serialize for CharStr<T> {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_newtype_struct(
                "CharStr",
                &format_args!("{}", self),
            )
        } else {
            serializer.serialize_newtype_struct(
                "CharStr",
                &SerializeOctets(self.as_slice()),
            )
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CharStr<Vec<u8>> {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        use core::str::FromStr;
        use serde::de;

        struct InnerVisitor;

        impl<'de> de::Visitor<'de> for InnerVisitor {
            type Value = CharStr<Vec<u8>>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a character string")
            }

            fn visit_str<E: de::Error>(
                self,
                value: &str,
            ) -> Result<Self::Value, E> {
                CharStr::from_str(value).map_err(E::custom)
            }

            fn visit_bytes<E: de::Error>(
                self,
                value: &[u8],
            ) -> Result<Self::Value, E> {
                CharStr::from_octets(value.to_vec()).map_err(E::custom)
            }

            fn visit_byte_buf<E: de::Error>(
                self,
                value: Vec<u8>,
            ) -> Result<Self::Value, E> {
                CharStr::from_octets(value).map_err(E::custom)
            }
        }

        struct NewtypeVisitor;

        impl<'de> de::Visitor<'de> for NewtypeVisitor {
            type Value = CharStr<Vec<u8>>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a character string")
            }

            fn visit_newtype_struct<D: serde::Deserializer<'de>>(
                self,
                deserializer: D,
            ) -> Result<Self::Value, D::Error> {
                if deserializer.is_human_readable() {
                    deserializer.deserialize_str(InnerVisitor)
                } else {
                    deserializer.deserialize_byte_buf(InnerVisitor)
                }
            }
        }

        deserializer.deserialize_newtype_struct("CharStr", NewtypeVisitor)
    }
}

/// Serializes an octets slice as bytes rather than a sequence.
#[cfg(feature = "serde")]
pub(crate) struct SerializeOctets<'a>(pub(crate) &'a [u8]);

#[cfg(feature = "serde")]
impl<'a> serde::Serialize for SerializeOctets<'a> {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.0)
    }
}

//------------ DisplayQuoted -------------------------------------------------

/// Helper struct for displaying a character string in double quotes.
#[derive(Clone, Copy, Debug)]
pub struct DisplayQuoted<'a>(&'a [u8]);

impl<'a> fmt::Display for DisplayQuoted<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("\"")?;
        for &ch in self.0 {
            fmt::Display::fmt(&Symbol::from_octet(ch), f)?;
        }
        f.write_str("\"")
    }
}

//============ Error Types ===================================================

//------------ CharStrError --------------------------------------------------

/// A byte sequence does not represent a valid character string.
///
/// This can only mean that the sequence is longer than 255 bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CharStrError;

impl fmt::Display for CharStrError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("illegal character string")
    }
}

impl std::error::Error for CharStrError {}

//------------ FromStrError --------------------------------------------------

/// An error happened when converting presentation format into a character
/// string.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum FromStrError {
    /// A character string has more than 255 octets.
    LongString,

    /// An escape sequence was malformed or cut short.
    BadEscape(SymbolOctetsError),
}

//--- From

impl From<SymbolOctetsError> for FromStrError {
    fn from(err: SymbolOctetsError) -> FromStrError {
        FromStrError::BadEscape(err)
    }
}

impl From<CharStrError> for FromStrError {
    fn from(_: CharStrError) -> FromStrError {
        FromStrError::LongString
    }
}

//--- Display and Error

impl fmt::Display for FromStrError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FromStrError::LongString => {
                f.write_str("character string with more than 255 octets")
            }
            FromStrError::BadEscape(ref err) => {
                fmt::Display::fmt(err, f)
            }
        }
    }
}

impl std::error::Error for FromStrError {}

//============ Testing ======================================================
