//! Hashing primitives for dep.
//!
//! Commit identity is computed through the [`HashFunction`] trait so tests
//! can substitute a deterministic function. Production code uses
//! [`ContentHasher`], a domain-separated BLAKE3 digest.

pub mod hasher;

pub use hasher::{ContentHasher, HashFunction, SequenceHasher};
