//!
//! lume-std-threads - Platform Threading Primitives
//!
//! The thread-platform layer linked into AOT-compiled lume programs.
//! Generated code never talks to pthreads or the Windows API directly; it
//! calls the uniform extern "C" surface exported here, and a single platform
//! backend selected at compile time supplies the implementation.
//!
//! ## Static TLS Slots
//!
//! - `lume_tls_create() -> slot` - Allocate a process-lifetime TLS slot
//! - `lume_tls_get(slot) -> value` - Read the calling thread's value
//! - `lume_tls_set(slot, value)` - Write the calling thread's value
//!
//! ## Locks
//!
//! - `lume_lock_new() -> lock` - Create a lock in the free state
//! - `lume_lock_acquire(lock, blocking) -> 1/0` - Acquire, blocking or not
//! - `lume_lock_release(lock)` - Release
//! - `lume_lock_fused_release_acquire(lock)` - Release and reacquire as one
//!   runtime call, opaque to the collector's pause protocol
//!
//! ## Platform Support
//!
//! Exactly one backend is compiled in: POSIX threads on Unix-family targets,
//! native Windows threads on Windows. Builds for any other target fail with
//! a compile-time error. The `thread-local` feature serves static TLS from
//! Rust's own per-thread variables instead of backend keys; locks always
//! come from the platform backend.
//!

pub mod platform;
pub mod tls;
pub mod lock;

pub use tls::*;
pub use lock::*;
