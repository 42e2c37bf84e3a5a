//!
//! Native Windows Threading Backend
//!
//! TLS indexes via `TlsAlloc` and locks via `CRITICAL_SECTION`.
//!

use std::ffi::c_void;

use winapi::shared::minwindef::{DWORD, LPVOID};
use winapi::um::minwinbase::CRITICAL_SECTION;
use winapi::um::processthreadsapi::{TlsAlloc, TlsGetValue, TlsSetValue, TLS_OUT_OF_INDEXES};
use winapi::um::synchapi::{
    DeleteCriticalSection, EnterCriticalSection, InitializeCriticalSection, LeaveCriticalSection,
    TryEnterCriticalSection,
};

/// Per-thread storage key. One pointer-sized value per thread.
pub type TlsKey = DWORD;

/// Platform lock object. Initialized in place and never moved afterwards.
pub type RawLock = CRITICAL_SECTION;

/// Allocate a fresh TLS index, or `None` if the process has run out.
pub unsafe fn tls_create() -> Option<TlsKey> {
    let slot = unsafe { TlsAlloc() };
    if slot == TLS_OUT_OF_INDEXES { None } else { Some(slot) }
}

/// Read the calling thread's value for `key`. Null if never set here.
pub unsafe fn tls_get(key: TlsKey) -> *mut c_void {
    unsafe { TlsGetValue(key) as *mut c_void }
}

/// Write the calling thread's value for `key`.
pub unsafe fn tls_set(key: TlsKey, value: *mut c_void) {
    unsafe { TlsSetValue(key, value as LPVOID) };
}

pub unsafe fn lock_init(raw: *mut RawLock) -> bool {
    unsafe { InitializeCriticalSection(raw) };
    true
}

/// Acquire the lock. With `blocking` this waits indefinitely and always
/// returns true; otherwise it reports immediately whether the lock was free.
pub unsafe fn lock_acquire(raw: *mut RawLock, blocking: bool) -> bool {
    if blocking {
        unsafe { EnterCriticalSection(raw) };
        true
    } else {
        unsafe { TryEnterCriticalSection(raw) != 0 }
    }
}

/// Release the lock. Which waiter proceeds next is the platform's choice.
pub unsafe fn lock_release(raw: *mut RawLock) {
    unsafe { LeaveCriticalSection(raw) };
}

pub unsafe fn lock_destroy(raw: *mut RawLock) {
    unsafe { DeleteCriticalSection(raw) };
}
