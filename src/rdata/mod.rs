//! Record data.
//!
//! Only TXT record data is currently provided. It is the record type whose
//! data consists of nothing but a sequence of character strings and thus
//! is the canonical target of normalizing free-form text.

pub use self::txt::{
    Txt, TxtAppendError, TxtBuilder, TxtCharStrIter, TxtError, TxtIter,
    MAX_RDATA_LEN,
};

mod txt;
