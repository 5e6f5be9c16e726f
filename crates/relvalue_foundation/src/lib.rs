//! Errors, kinds, configuration and scalar codecs for relvalue.
//!
//! This crate provides:
//! - [`Error`] - Programming-error reporting for value construction
//! - [`BaseKind`] / [`DerivedType`] - The closed kind discriminants
//! - [`PoolConfig`] - Interning limits for a memory pool
//! - Scalar codecs ([`Rational`], [`BitString`], [`ByteString`], [`Text`])
//!
//! Integers are [`BigInt`] directly; their canonical literal is plain
//! decimal.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bits;
pub mod config;
pub mod error;
pub mod kind;
pub mod rational;
pub mod text;

pub use bits::{BitString, ByteString};
pub use config::PoolConfig;
pub use error::{Error, ErrorKind, Result};
pub use kind::{BaseKind, DerivedType, Membership};
pub use num_bigint::BigInt;
pub use rational::{Decimal, Rational};
pub use text::Text;
