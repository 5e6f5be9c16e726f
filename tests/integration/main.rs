//! End-to-end tests across the foundation and value layers
//!
//! Tests the properties an interpreter relies on: interning soundness,
//! collapse associativity, multiset commutativity, canonical rendering and
//! cache transparency.

mod properties;
mod scenarios;
