//!
//! lume-std-core - Core Runtime Types
//!
//! This crate provides the fundamental types shared across the lume runtime
//! crates:
//!
//! - `HeapHeader` and `HeapTag` for reference-counted heap objects
//!
//! Every object the compiler hands to generated code starts with a
//! `HeapHeader`, so the emitted refcount bookkeeping is uniform across all
//! object kinds. All headers use atomic reference counting for thread safety.
//!

pub mod value;

pub use value::*;
