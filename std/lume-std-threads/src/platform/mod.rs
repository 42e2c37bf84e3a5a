//!
//! Platform Backend Selection
//!
//! Exactly one threading backend is compiled into any given build. The
//! `#[cfg]` arms below route the platform-neutral names (`TlsKey`, `RawLock`,
//! `tls_*`, `lock_*`) to the matching implementation:
//!
//! 1. Unix-family targets use POSIX threads (`posix.rs`)
//! 2. Windows targets use native Windows threads (`nt.rs`)
//!
//! Any other target fails the build: a target with no lock-capable backend
//! cannot link a working runtime, and that must surface at compile time, not
//! at the first acquire.
//!

#[cfg(unix)]
#[path = "posix.rs"]
mod imp;

#[cfg(windows)]
#[path = "nt.rs"]
mod imp;

#[cfg(not(any(unix, windows)))]
compile_error!("lume-std-threads requires POSIX threads or native Windows threads");

pub use imp::*;
