//! relvalue - Values and equality for a relational data language
//!
//! This crate re-exports all layers of relvalue for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: relvalue_core       - Tagged values, symbolic collections, pool, equality
//! Layer 0: relvalue_foundation - Errors, kinds, configuration, scalar codecs
//! ```

pub use relvalue_core as values;
pub use relvalue_foundation as foundation;
