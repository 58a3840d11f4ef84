//! props - a typed, hierarchical property language
//!
//! Parses configuration text of the form `identifier : type = value`,
//! where the type keyword selects the value grammar. Values are integer,
//! real, boolean, and string scalars (and arrays of them), fixed-width
//! bit vectors written in binary or hex, and nested property sets, which
//! make documents hierarchical:
//!
//! ```text
//! # geometry of the detector cell
//! @description "cell dimensions in mm"
//! cell : pset = {
//!   size : real = [12.5, 12.5, 30.0],
//!   active : bool = true,
//!   channel_mask : bitset = 0xFF0F
//! }
//! ```
//!
//! Parsing yields a [`Document`]: an ordered list of [`Property`] entries
//! whose values are [`PropertyValue`] variants. Failures are returned as
//! positioned [`ParseError`] values, never panics.

pub mod error;
pub mod model;
pub mod parser;

pub use error::{LiteralRange, ParseError};
pub use model::{Bitset, Document, Property, PropertyValue};
pub use parser::{parse_document, parse_property, MAX_NESTING_DEPTH};
