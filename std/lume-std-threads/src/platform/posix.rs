//!
//! POSIX Threading Backend
//!
//! TLS keys and locks on top of libc pthreads. Pthread-emulation libraries
//! present themselves as Unix-family targets, so this backend covers them
//! as well.
//!

use std::ffi::c_void;
use std::ptr;

/// Per-thread storage key. One pointer-sized value per thread.
pub type TlsKey = libc::pthread_key_t;

/// Platform lock object. Initialized in place and never moved afterwards.
pub type RawLock = libc::pthread_mutex_t;

/// Allocate a fresh TLS key, or `None` if the platform has run out of keys.
pub unsafe fn tls_create() -> Option<TlsKey> {
    let mut key: TlsKey = 0;
    let rc = unsafe { libc::pthread_key_create(&mut key, None) };
    if rc == 0 { Some(key) } else { None }
}

/// Read the calling thread's value for `key`. Null if never set here.
pub unsafe fn tls_get(key: TlsKey) -> *mut c_void {
    unsafe { libc::pthread_getspecific(key) }
}

/// Write the calling thread's value for `key`.
pub unsafe fn tls_set(key: TlsKey, value: *mut c_void) {
    let rc = unsafe { libc::pthread_setspecific(key, value) };
    debug_assert_eq!(rc, 0);
}

pub unsafe fn lock_init(raw: *mut RawLock) -> bool {
    unsafe { libc::pthread_mutex_init(raw, ptr::null()) == 0 }
}

/// Acquire the lock. With `blocking` this waits indefinitely and always
/// returns true; otherwise it reports immediately whether the lock was free.
pub unsafe fn lock_acquire(raw: *mut RawLock, blocking: bool) -> bool {
    if blocking {
        let rc = unsafe { libc::pthread_mutex_lock(raw) };
        debug_assert_eq!(rc, 0);
        true
    } else {
        unsafe { libc::pthread_mutex_trylock(raw) == 0 }
    }
}

/// Release the lock. Which waiter proceeds next is the platform's choice.
pub unsafe fn lock_release(raw: *mut RawLock) {
    let rc = unsafe { libc::pthread_mutex_unlock(raw) };
    debug_assert_eq!(rc, 0);
}

pub unsafe fn lock_destroy(raw: *mut RawLock) {
    let rc = unsafe { libc::pthread_mutex_destroy(raw) };
    debug_assert_eq!(rc, 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_lock_roundtrip() {
        unsafe {
            let mut raw: RawLock = std::mem::zeroed();
            assert!(lock_init(&mut raw));

            assert!(lock_acquire(&mut raw, false));
            lock_release(&mut raw);

            assert!(lock_acquire(&mut raw, true));
            lock_release(&mut raw);

            lock_destroy(&mut raw);
        }
    }

    #[test]
    fn test_raw_tls_key() {
        unsafe {
            let key = tls_create().unwrap();
            assert!(tls_get(key).is_null());

            tls_set(key, 0x1234 as *mut c_void);
            assert_eq!(tls_get(key) as usize, 0x1234);
        }
    }
}
