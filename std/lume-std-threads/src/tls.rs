//!
//! Static TLS Slots for lume
//!
//! A TLS slot is a process-wide handle holding one pointer-sized value per
//! thread. The compiler allocates a slot once per runtime subsystem and
//! generated code reads and writes it freely; a thread that never wrote a
//! slot reads null. Slots live for the lifetime of the process, so there is
//! no destroy entry point.
//!
//! Two implementations sit behind the same surface. By default the slot
//! wraps a key from the platform backend (pthread keys or TlsAlloc indexes).
//! With the `thread-local` feature the slot is an index into a per-thread
//! value table kept in Rust's own thread-local storage; the two are
//! indistinguishable to generated code.
//!

use std::alloc::{alloc, Layout};
use std::ffi::c_void;

#[cfg(feature = "thread-local")]
use std::cell::RefCell;
#[cfg(feature = "thread-local")]
use std::sync::atomic::{AtomicUsize, Ordering};

use lume_std_core::{HeapHeader, HeapTag};

#[cfg(not(feature = "thread-local"))]
use crate::platform;

#[cfg(feature = "thread-local")]
static NEXT_SLOT_INDEX: AtomicUsize = AtomicUsize::new(0);

#[cfg(feature = "thread-local")]
thread_local! {
    static SLOT_VALUES: RefCell<Vec<*mut c_void>> = RefCell::new(Vec::new());
}

#[repr(C)]
pub struct LumeTlsSlot {
    pub header: HeapHeader,
    #[cfg(not(feature = "thread-local"))]
    key: platform::TlsKey,
    #[cfg(feature = "thread-local")]
    index: usize,
}

unsafe fn alloc_slot(slot: LumeTlsSlot) -> *mut LumeTlsSlot {
    unsafe {
        let layout = Layout::new::<LumeTlsSlot>();
        let ptr = alloc(layout) as *mut LumeTlsSlot;
        if ptr.is_null() {
            panic!("Failed to allocate TLS slot");
        }
        std::ptr::write(ptr, slot);
        ptr
    }
}

/// Allocate a fresh TLS slot. Returns null when the platform cannot supply
/// another key; the calling subsystem cannot run without its slot, so a null
/// return is fatal to it.
#[unsafe(no_mangle)]
pub extern "C" fn lume_tls_create() -> *mut LumeTlsSlot {
    #[cfg(not(feature = "thread-local"))]
    {
        match unsafe { platform::tls_create() } {
            Some(key) => unsafe {
                alloc_slot(LumeTlsSlot {
                    header: HeapHeader::new(HeapTag::TlsSlot),
                    key,
                })
            },
            None => std::ptr::null_mut(),
        }
    }

    #[cfg(feature = "thread-local")]
    {
        let index = NEXT_SLOT_INDEX.fetch_add(1, Ordering::Relaxed);
        unsafe {
            alloc_slot(LumeTlsSlot {
                header: HeapHeader::new(HeapTag::TlsSlot),
                index,
            })
        }
    }
}

/// Read the calling thread's value for `slot`. Null if this thread never
/// called set. Never blocks.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lume_tls_get(slot: *mut LumeTlsSlot) -> *mut c_void {
    #[cfg(not(feature = "thread-local"))]
    {
        unsafe { platform::tls_get((*slot).key) }
    }

    #[cfg(feature = "thread-local")]
    {
        let index = unsafe { (*slot).index };
        SLOT_VALUES.with(|values| {
            values
                .borrow()
                .get(index)
                .copied()
                .unwrap_or(std::ptr::null_mut())
        })
    }
}

/// Write the calling thread's value for `slot`. Other threads are
/// unaffected. Never blocks.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lume_tls_set(slot: *mut LumeTlsSlot, value: *mut c_void) {
    #[cfg(not(feature = "thread-local"))]
    {
        unsafe { platform::tls_set((*slot).key, value) };
    }

    #[cfg(feature = "thread-local")]
    {
        let index = unsafe { (*slot).index };
        SLOT_VALUES.with(|values| {
            let mut values = values.borrow_mut();
            if values.len() <= index {
                values.resize(index + 1, std::ptr::null_mut());
            }
            values[index] = value;
        });
    }
}
