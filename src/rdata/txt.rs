//! Record data for the TXT record.
//!
//! This is a private module. Its content is re-exported by the parent.

use crate::base::charstr::CharStr;
use crate::zonefile::scan::ScanError;
use crate::zonefile::tokenizer::Tokenizer;
use core::{fmt, mem};

/// The maximum length of record data in octets.
pub const MAX_RDATA_LEN: usize = u16::MAX as usize;

//------------ Txt ----------------------------------------------------------

/// TXT record data.
///
/// TXT records hold descriptive text. While it may appear as a single text,
/// it internally consists of a sequence of one or more
/// [character strings][CharStr]. The type holds this sequence in its encoded
/// form, i.e., each character string is at most 255 octets long and preceded
/// by an octet with its length.
///
/// The TXT record type is defined in [RFC 1035, section 3.3.14].
///
/// # `Display`
///
/// The `Display` implementation prints the sequence of character strings in
/// their quoted presentation format separated by a single space. This is
/// the canonical presentation format of the record data.
///
/// [RFC 1035, section 3.3.14]: https://tools.ietf.org/html/rfc1035#section-3.3.14
#[derive(Clone)]
#[repr(transparent)]
pub struct Txt<Octs: ?Sized>(Octs);

impl<Octs> Txt<Octs> {
    /// Creates new TXT record data from its encoded content.
    ///
    /// The `octets` sequence must contain correctly encoded TXT record
    /// data. That is, it must contain a sequence of at least one character
    /// string of at most 255 octets each preceded by a length octet. An
    /// empty sequence is not allowed.
    ///
    /// Returns an error if `octets` does not contain correctly encoded TXT
    /// record data.
    pub fn from_octets(octets: Octs) -> Result<Self, TxtError>
    where
        Octs: AsRef<[u8]>,
    {
        Txt::check_slice(octets.as_ref())?;
        Ok(Txt(octets))
    }
}

impl Txt<[u8]> {
    /// Creates new TXT record data on an octets slice.
    ///
    /// The slice must contain correctly encoded TXT record data,
    /// that is a sequence of encoded character strings. See
    /// [`from_octets`][Txt::from_octets] for the required content.
    pub fn from_slice(slice: &[u8]) -> Result<&Self, TxtError> {
        Txt::check_slice(slice)?;
        // SAFETY: Txt has repr(transparent)
        Ok(unsafe { mem::transmute::<&[u8], &Self>(slice) })
    }

    /// Checks that a slice contains correctly encoded TXT data.
    fn check_slice(mut slice: &[u8]) -> Result<(), TxtError> {
        if slice.is_empty() {
            return Err(TxtError::Empty);
        }
        if slice.len() > MAX_RDATA_LEN {
            return Err(TxtError::LongRecordData);
        }
        while let Some(&len) = slice.first() {
            let len = usize::from(len);
            if slice.len() <= len {
                return Err(TxtError::ShortInput);
            }
            slice = &slice[len + 1..];
        }
        Ok(())
    }
}

impl Txt<Vec<u8>> {
    /// Scans TXT record data.
    ///
    /// Scans a sequence of character strings via
    /// [`Tokenizer::scan_charstrs`]. If there are no character strings at
    /// all, the record data will consist of a single empty string.
    pub fn scan(tokenizer: &mut Tokenizer) -> Result<Self, ScanError> {
        let mut builder = TxtBuilder::new();
        for charstr in tokenizer.scan_charstrs()? {
            builder
                .append_charstr(&charstr)
                .map_err(|_| ScanError::LongRecordData)?;
        }
        Ok(builder.finish())
    }
}

impl<Octs: AsRef<[u8]> + ?Sized> Txt<Octs> {
    /// Returns an iterator over the character strings as slices.
    ///
    /// The returned iterator will always return at least one octets slice.
    pub fn iter(&self) -> TxtIter {
        TxtIter(self.iter_charstrs())
    }

    /// Returns an iterator over the character strings.
    ///
    /// The returned iterator will always return at least one octets slice.
    pub fn iter_charstrs(&self) -> TxtCharStrIter {
        TxtCharStrIter(self.0.as_ref())
    }

    /// Returns the content if it consists of a single character string.
    pub fn as_flat_slice(&self) -> Option<&[u8]> {
        if usize::from(self.0.as_ref()[0]) == self.0.as_ref().len() - 1 {
            Some(&self.0.as_ref()[1..])
        } else {
            None
        }
    }

    /// Returns the length of the TXT record data.
    ///
    /// Note that this is the length of the encoded record data and therefore
    /// never the length of the text, not even if there is only a single
    /// character string – it is still preceded by a length octet.
    ///
    /// Note further that TXT record data is not allowed to be empty, so there
    /// is no `is_empty` method.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.as_ref().len()
    }

    /// Returns the encoded record data.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }
}

//--- PartialEq and Eq

impl<Octs, Other> PartialEq<Txt<Other>> for Txt<Octs>
where
    Octs: AsRef<[u8]>,
    Other: AsRef<[u8]>,
{
    fn eq(&self, other: &Txt<Other>) -> bool {
        self.iter_charstrs().eq(other.iter_charstrs())
    }
}

impl<Octs: AsRef<[u8]>> Eq for Txt<Octs> {}

//--- Display

impl<Octs: AsRef<[u8]> + ?Sized> fmt::Display for Txt<Octs> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for slice in self.iter_charstrs() {
            if !first {
                f.write_str(" ")?;
            } else {
                first = false;
            }
            write!(f, "{}", slice.display_quoted())?;
        }
        Ok(())
    }
}

//--- Debug

impl<Octs: AsRef<[u8]> + ?Sized> fmt::Debug for Txt<Octs> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Txt(")?;
        fmt::Display::fmt(self, f)?;
        f.write_str(")")
    }
}

//--- Serialize

#[cfg(feature = "serde")]
impl<Octs: AsRef<[u8]> + ?Sized> serde::Serialize for Txt<Octs> {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;

        struct TxtSeq<'a>(&'a [u8]);

        impl<'a> serde::Serialize for TxtSeq<'a> {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> Result<S::Ok, S::Error> {
                let mut serializer = serializer.serialize_seq(None)?;
                for item in TxtCharStrIter(self.0) {
                    serializer.serialize_element(item)?;
                }
                serializer.end()
            }
        }

        if serializer.is_human_readable() {
            serializer
                .serialize_newtype_struct("Txt", &TxtSeq(self.0.as_ref()))
        } else {
            serializer.serialize_newtype_struct(
                "Txt",
                &crate::base::charstr::SerializeOctets(self.0.as_ref()),
            )
        }
    }
}

//------------ TxtCharStrIter ------------------------------------------------

/// An iterator over the character strings of a Txt record.
#[derive(Clone)]
pub struct TxtCharStrIter<'a>(&'a [u8]);

impl<'a> Iterator for TxtCharStrIter<'a> {
    type Item = &'a CharStr<[u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        let (&len, tail) = self.0.split_first()?;
        let (res, tail) = tail.split_at(usize::from(len));
        self.0 = tail;
        Some(CharStr::<[u8]>::from_slice_unchecked(res))
    }
}

//------------ TxtIter -------------------------------------------------------

/// An iterator over the character strings of a Txt record.
#[derive(Clone)]
pub struct TxtIter<'a>(TxtCharStrIter<'a>);

impl<'a> Iterator for TxtIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(CharStr::as_slice)
    }
}

//------------ TxtBuilder ---------------------------------------------------

/// Iteratively build TXT record data.
///
/// This type allows building TXT record data by starting with empty data
/// and appending complete character strings.
#[derive(Clone, Debug, Default)]
pub struct TxtBuilder {
    /// The encoded data so far.
    builder: Vec<u8>,
}

impl TxtBuilder {
    /// Creates a new, empty TXT builder.
    #[must_use]
    pub fn new() -> Self {
        TxtBuilder {
            builder: Vec::new(),
        }
    }

    /// Appends a complete character string.
    ///
    /// The method will return an error if appending the character string
    /// would result in exceeding the record data length limit. The builder
    /// is left unchanged in this case.
    pub fn append_charstr<Octs: AsRef<[u8]> + ?Sized>(
        &mut self,
        s: &CharStr<Octs>,
    ) -> Result<(), TxtAppendError> {
        let s = s.as_slice();
        if self.builder.len() + s.len() + 1 > MAX_RDATA_LEN {
            return Err(TxtAppendError::LongRecordData);
        }
        // CharStr guarantees that the length fits into an octet.
        self.builder.push(s.len() as u8);
        self.builder.extend_from_slice(s);
        Ok(())
    }

    /// Finishes the builder and returns TXT record data.
    ///
    /// If the builder is empty, appends an empty character string before
    /// returning.
    pub fn finish(mut self) -> Txt<Vec<u8>> {
        if self.builder.is_empty() {
            self.builder.push(0);
        }
        Txt(self.builder)
    }
}

//============ Error Types ===================================================

//------------ TxtError ------------------------------------------------------

/// An octets sequence does not form valid TXT record data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TxtError {
    /// The record data is empty.
    Empty,

    /// The record data is longer than 65,535 octets.
    LongRecordData,

    /// A character string is longer than the remaining data.
    ShortInput,
}

impl TxtError {
    /// Returns a static string with the error reason.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TxtError::Empty => "empty TXT record",
            TxtError::LongRecordData => "record data too long",
            TxtError::ShortInput => "short input",
        }
    }
}

impl fmt::Display for TxtError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for TxtError {}

//------------ TxtAppendError ------------------------------------------------

/// An error occurred while append to TXT record data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TxtAppendError {
    /// Appending would have caused the record data to be too long.
    LongRecordData,
}

impl TxtAppendError {
    /// Returns a static string with the error reason.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TxtAppendError::LongRecordData => "record data too long",
        }
    }
}

impl fmt::Display for TxtAppendError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for TxtAppendError {}

//============ Testing =======================================================
