//!
//! Lock Primitives for lume
//!
//! A lock is a mutual-exclusion object held by at most one thread at a time.
//! Generated code creates locks, acquires them blocking or non-blocking, and
//! releases them; the platform backend supplies the actual primitive. The
//! runtime trusts the compiler's locking discipline: releasing a lock the
//! calling thread does not hold, or re-acquiring a held one, is out of
//! contract here just as it is for the platform primitive underneath.
//!
//! Usage in lume:
//! ```lume
//! var l: lock = lock();
//! l.acquire();
//! ...
//! l.release();
//! ```
//!

use std::alloc::{alloc, dealloc, Layout};

use lume_std_core::{HeapHeader, HeapTag};

use crate::platform;

#[repr(C)]
pub struct LumeLock {
    pub header: HeapHeader,
    raw: platform::RawLock,
}

/// Create a lock in the free state. Returns null if the platform lock
/// cannot be initialized.
#[unsafe(no_mangle)]
pub extern "C" fn lume_lock_new() -> *mut LumeLock {
    unsafe {
        let layout = Layout::new::<LumeLock>();
        let ptr = alloc(layout) as *mut LumeLock;
        if ptr.is_null() {
            panic!("Failed to allocate lock");
        }

        std::ptr::write(ptr, LumeLock {
            header: HeapHeader::new(HeapTag::Lock),
            raw: std::mem::zeroed(),
        });

        if !platform::lock_init(&mut (*ptr).raw) {
            dealloc(ptr as *mut u8, layout);
            return std::ptr::null_mut();
        }

        ptr
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn lume_lock_incref(lock: *mut LumeLock) {
    if !lock.is_null() {
        unsafe { (*lock).header.incref(); }
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn lume_lock_decref(lock: *mut LumeLock) {
    if !lock.is_null() {
        unsafe {
            if (*lock).header.decref() {
                platform::lock_destroy(&mut (*lock).raw);
                let layout = Layout::new::<LumeLock>();
                dealloc(lock as *mut u8, layout);
            }
        }
    }
}

/// Acquire `lock`. With `blocking` nonzero the call waits until the lock is
/// free and always returns 1; with `blocking` zero it returns immediately,
/// 1 if the lock was taken and 0 if another thread holds it.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lume_lock_acquire(lock: *mut LumeLock, blocking: i64) -> i64 {
    let acquired = unsafe { platform::lock_acquire(&mut (*lock).raw, blocking != 0) };
    if acquired { 1 } else { 0 }
}

/// Release `lock`. If threads are blocked on it, the platform picks which
/// one proceeds.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lume_lock_release(lock: *mut LumeLock) {
    unsafe { platform::lock_release(&mut (*lock).raw) };
}

/// Release `lock` and immediately reacquire it, as one opaque runtime call.
///
/// Generated code uses this instead of a release followed by a separate
/// acquire when it wants to give a waiting thread a turn while logically
/// keeping ownership. Both halves run inside this single function with no
/// call-outs between them, so the collector's pause protocol can never
/// observe the calling thread in the released-but-not-reacquired window.
/// The lock itself is briefly free to other threads; the reacquire blocks
/// exactly like a normal blocking acquire.
#[unsafe(no_mangle)]
#[inline(never)]
pub unsafe extern "C" fn lume_lock_fused_release_acquire(lock: *mut LumeLock) {
    unsafe {
        platform::lock_release(&mut (*lock).raw);
        platform::lock_acquire(&mut (*lock).raw, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_lock_basic() {
        unsafe {
            let l = lume_lock_new();
            assert!(!l.is_null());

            assert_eq!(lume_lock_acquire(l, 1), 1);
            lume_lock_release(l);

            lume_lock_decref(l);
        }
    }

    #[test]
    fn test_lock_try_acquire_on_free_lock() {
        unsafe {
            let l = lume_lock_new();

            assert_eq!(lume_lock_acquire(l, 0), 1);
            lume_lock_release(l);

            lume_lock_decref(l);
        }
    }

    #[test]
    fn test_lock_try_acquire_while_held() {
        unsafe {
            let l = lume_lock_new();
            assert_eq!(lume_lock_acquire(l, 0), 1);

            let l_ptr = l as usize;
            let handle = thread::spawn(move || unsafe {
                let l = l_ptr as *mut LumeLock;
                // held by the main thread, so the non-blocking attempt
                // reports failure immediately instead of waiting
                assert_eq!(lume_lock_acquire(l, 0), 0);
            });
            handle.join().unwrap();

            lume_lock_release(l);
            lume_lock_decref(l);
        }
    }

    #[test]
    fn test_lock_mutual_exclusion() {
        unsafe {
            let l = lume_lock_new();
            let counter = Box::into_raw(Box::new(0i64));

            let l_ptr = l as usize;
            let counter_ptr = counter as usize;
            let handles: Vec<_> = (0..10).map(|_| {
                thread::spawn(move || unsafe {
                    let l = l_ptr as *mut LumeLock;
                    let counter = counter_ptr as *mut i64;
                    for _ in 0..100 {
                        lume_lock_acquire(l, 1);
                        *counter += 1;
                        lume_lock_release(l);
                    }
                })
            }).collect();

            for h in handles {
                h.join().unwrap();
            }

            assert_eq!(*counter, 1000);
            drop(Box::from_raw(counter));
            lume_lock_decref(l);
        }
    }

    #[test]
    fn test_lock_fused_release_acquire_uncontended() {
        unsafe {
            let l = lume_lock_new();
            assert_eq!(lume_lock_acquire(l, 1), 1);

            // nobody is waiting; we must come back holding the lock
            lume_lock_fused_release_acquire(l);

            let l_ptr = l as usize;
            let handle = thread::spawn(move || unsafe {
                let l = l_ptr as *mut LumeLock;
                assert_eq!(lume_lock_acquire(l, 0), 0);
            });
            handle.join().unwrap();

            lume_lock_release(l);
            lume_lock_decref(l);
        }
    }

    #[test]
    fn test_lock_fused_release_acquire_lets_waiter_in() {
        unsafe {
            let l = lume_lock_new();
            let turn = Box::into_raw(Box::new(0i64));

            assert_eq!(lume_lock_acquire(l, 1), 1);

            let l_ptr = l as usize;
            let turn_ptr = turn as usize;
            let handle = thread::spawn(move || unsafe {
                let l = l_ptr as *mut LumeLock;
                let turn = turn_ptr as *mut i64;
                // blocks until a fused call on the main thread opens a window
                assert_eq!(lume_lock_acquire(l, 1), 1);
                *turn = 1;
                lume_lock_release(l);
            });

            // let the waiter reach its blocking acquire
            thread::sleep(Duration::from_millis(50));

            // bounce the lock until the waiter has taken its turn; every
            // fused call returns with the lock held by this thread again
            loop {
                lume_lock_fused_release_acquire(l);
                if *turn == 1 {
                    break;
                }
                thread::yield_now();
            }
            handle.join().unwrap();

            // still held exclusively after the fused call
            let handle = thread::spawn(move || unsafe {
                let l = l_ptr as *mut LumeLock;
                assert_eq!(lume_lock_acquire(l, 0), 0);
            });
            handle.join().unwrap();

            lume_lock_release(l);
            drop(Box::from_raw(turn));
            lume_lock_decref(l);
        }
    }
}
