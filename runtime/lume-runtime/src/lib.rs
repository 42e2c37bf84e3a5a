///
/// lume Runtime Static Library
///
/// Provides the runtime functions needed by AOT-compiled lume programs.
/// This crate produces a static library (liblume_runtime.a) that gets
/// linked with the compiled lume object file to produce a standalone binary.
///
/// Contains:
/// - Heap object headers and refcount machinery (via lume-std-core)
/// - Platform threading primitives: static TLS slots, locks, and the fused
///   release-reacquire operation (via lume-std-threads)
///

pub use lume_std_core::*;
pub use lume_std_threads::*;
