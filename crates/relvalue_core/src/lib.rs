//! Tagged values, symbolic collections and the equality engine for relvalue.
//!
//! This crate provides:
//! - [`Value`] - The universal tagged value handle
//! - [`Sequence`] / [`Bag`] - Symbolic collection trees with cached collapse
//! - [`Tuple`], [`Article`] and excuses - Attribute-bearing values
//! - [`MemoryPool`] - Flyweight interning of common values
//! - [`same`] - The structural equality relation
//! - [`render`] / [`identity_string`] - The canonical text codec

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod article;
pub mod bag;
pub mod equality;
pub mod excuse;
pub mod handle;
pub mod pool;
pub mod render;
pub mod sequence;
pub mod tuple;
pub mod value;

pub use article::Article;
pub use bag::{Bag, BagShape, Counted, Index};
pub use equality::same;
pub use excuse::{WellKnownExcuse, excuse_name};
pub use handle::{Handle, Variable};
pub use pool::{MemoryPool, PoolStats};
pub use render::{identity_string, render};
pub use sequence::{SeqShape, Sequence};
pub use tuple::Tuple;
pub use value::{Payload, Value};
