//! Integration tests for Layer 0: Foundation
//!
//! Tests for scalar codecs, kinds, configuration and errors.

mod scalars;
