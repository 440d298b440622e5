//! Normalizing text into DNS TXT record presentation format.
//!
//! This crate turns free-form text, as it may have been entered as the
//! value of a TXT or SPF record, into the canonical presentation format of
//! TXT record data: a sequence of character strings, each in double quotes
//! with all unsafe octets escaped, separated by a single space. The result
//! is always syntactically valid presentation format.
//!
//! The main entry point is the [`normalize`] function:
//!
//! ```
//! assert_eq!(
//!     domain_txt::normalize("v=spf1 \"include:example.com\" -all").unwrap(),
//!     "\"v=spf1\" \"include:example.com\" \"-all\""
//! );
//! ```
//!
//! # Modules
//!
//! The building blocks used by the normalizer are available, too:
//!
//! * [base] contains the [`CharStr`][base::CharStr] type for character
//!   strings and the [`Symbol`][base::Symbol] type for escape sequences,
//! * [zonefile] contains a [`Tokenizer`][zonefile::Tokenizer] for
//!   presentation format text following the rules of zone files,
//! * [rdata] contains the [`Txt`][rdata::Txt] record data type, and
//! * [normalize][mod@normalize] contains the normalizer itself and its
//!   [`Config`][normalize::Config].
//!
//! # Reference of Feature Flags
//!
//! * `serde`: Enables serde serialization for a number of basic types.

#![allow(renamed_and_removed_lints)]
#![allow(clippy::unknown_clippy_lints)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod base;
pub mod normalize;
pub mod rdata;
pub mod utils;
pub mod zonefile;

pub use self::normalize::{
    normalize, normalize_octets, normalize_octets_with, normalize_with,
    NormalizeError,
};
