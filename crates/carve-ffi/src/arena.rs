//! Arena lifecycle and allocation FFI.
//!
//! The C caller owns the backing block; `carve_arena_create` only borrows
//! it until `carve_arena_destroy`. Pointers handed out stay valid until the
//! next `carve_arena_reset`, `carve_arena_zero` or `carve_arena_destroy`
//! on the same handle.

use std::ffi::{c_char, CStr};
use std::ptr;
use std::sync::Mutex;

use carve_arena::{is_power_of_two, Arena};

use crate::handle::{HandleTable, NULL_HANDLE};
use crate::status::CarveStatus;

static ARENAS: Mutex<HandleTable<Arena<'static>>> = Mutex::new(HandleTable::new());

/// Write `value` through `out` if it is non-null.
#[allow(unsafe_code)]
fn store<T>(out: *mut T, value: T) {
    if !out.is_null() {
        // SAFETY: `out` is non-null and valid for writes per caller contract.
        unsafe { *out = value };
    }
}

/// Translate an allocation result into a status, writing the pointer (or
/// null) through `out`.
fn finish(result: Result<*mut u8, carve_arena::ArenaError>, out: *mut *mut u8) -> i32 {
    match result {
        Ok(p) => {
            store(out, p);
            CarveStatus::Ok as i32
        }
        Err(e) => {
            store(out, ptr::null_mut());
            CarveStatus::from(&e) as i32
        }
    }
}

/// Create an arena over `capacity` bytes at `memory`.
///
/// The block is not copied and not freed by the arena. It must stay valid
/// and untouched by the caller until `carve_arena_destroy`. `memory` may
/// be null only when `capacity` is 0. On success, writes the arena handle
/// to `handle_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn carve_arena_create(memory: *mut u8, capacity: usize, handle_out: *mut u64) -> i32 {
    ffi_guard!({
        if handle_out.is_null() {
            return CarveStatus::InvalidArgument as i32;
        }
        store(handle_out, NULL_HANDLE);
        if memory.is_null() && capacity != 0 {
            return CarveStatus::InvalidArgument as i32;
        }
        let block: &'static mut [u8] = if capacity == 0 {
            Default::default()
        } else {
            // SAFETY: the caller guarantees `memory` is valid for
            // `capacity` bytes and exclusively ours until destroy.
            unsafe { std::slice::from_raw_parts_mut(memory, capacity) }
        };
        let handle = ffi_lock!(ARENAS).insert(Arena::new(block));
        store(handle_out, handle);
        tracing::debug!(handle, capacity, "arena created over caller memory");
        CarveStatus::Ok as i32
    })
}

/// Deinitialize and destroy an arena. Live bytes are zeroed; the backing
/// block is handed back to the caller untouched otherwise.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn carve_arena_destroy(handle: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(ARENAS).remove(handle) {
            Some(mut arena) => {
                arena.deinitialize();
                CarveStatus::Ok as i32
            }
            None => CarveStatus::InvalidHandle as i32,
        }
    })
}

/// Allocate `size` zeroed bytes at the default alignment.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn carve_arena_alloc(handle: u64, size: usize, out: *mut *mut u8) -> i32 {
    carve_arena_aligned_alloc(handle, carve_arena::DEFAULT_ALIGNMENT, size, out)
}

/// Allocate `size` zeroed bytes aligned to `alignment` (a power of two).
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn carve_arena_aligned_alloc(
    handle: u64,
    alignment: usize,
    size: usize,
    out: *mut *mut u8,
) -> i32 {
    ffi_guard!({
        store(out, ptr::null_mut());
        if out.is_null() || !is_power_of_two(alignment) {
            return CarveStatus::InvalidArgument as i32;
        }
        let table = ffi_lock!(ARENAS);
        let Some(arena) = table.get(handle) else {
            return CarveStatus::InvalidHandle as i32;
        };
        finish(
            arena
                .allocate_aligned(alignment, size)
                .map(|span| span.as_mut_ptr()),
            out,
        )
    })
}

/// Resize an allocation at the default alignment.
///
/// See `carve_arena_aligned_realloc`.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn carve_arena_realloc(
    handle: u64,
    old: *mut u8,
    old_size: usize,
    new_size: usize,
    out: *mut *mut u8,
) -> i32 {
    carve_arena_aligned_realloc(
        handle,
        carve_arena::DEFAULT_ALIGNMENT,
        old,
        old_size,
        new_size,
        out,
    )
}

/// Resize `old` (of `old_size` bytes) to `new_size` bytes.
///
/// A null `old` or zero `old_size` behaves like an allocation. The most
/// recent allocation is resized in place and keeps its address; any other
/// allocation is copied to a new location and the old bytes are abandoned.
/// `old` must not be used after a successful call unless `*out == old`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn carve_arena_aligned_realloc(
    handle: u64,
    alignment: usize,
    old: *mut u8,
    old_size: usize,
    new_size: usize,
    out: *mut *mut u8,
) -> i32 {
    ffi_guard!({
        store(out, ptr::null_mut());
        if out.is_null() || !is_power_of_two(alignment) {
            return CarveStatus::InvalidArgument as i32;
        }
        let table = ffi_lock!(ARENAS);
        let Some(arena) = table.get(handle) else {
            return CarveStatus::InvalidHandle as i32;
        };
        // SAFETY: the C contract forbids touching `old` during the call
        // and after relocation.
        let result = unsafe { arena.reallocate_raw(alignment, old, old_size, new_size) };
        finish(result.map(|p| p.as_ptr()), out)
    })
}

/// Copy `size` bytes from `src` into a new allocation.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn carve_arena_memdup(
    handle: u64,
    src: *const u8,
    size: usize,
    out: *mut *mut u8,
) -> i32 {
    ffi_guard!({
        store(out, ptr::null_mut());
        if out.is_null() || (src.is_null() && size != 0) {
            return CarveStatus::InvalidArgument as i32;
        }
        let table = ffi_lock!(ARENAS);
        let Some(arena) = table.get(handle) else {
            return CarveStatus::InvalidHandle as i32;
        };
        let bytes: &[u8] = if size == 0 {
            &[]
        } else {
            // SAFETY: `src` is valid for `size` reads per caller contract.
            unsafe { std::slice::from_raw_parts(src, size) }
        };
        finish(
            arena.duplicate_bytes(bytes).map(|span| span.as_mut_ptr()),
            out,
        )
    })
}

/// Copy a NUL-terminated string, terminator included.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn carve_arena_strdup(handle: u64, src: *const c_char, out: *mut *mut c_char) -> i32 {
    ffi_guard!({
        store(out, ptr::null_mut());
        if out.is_null() || src.is_null() {
            return CarveStatus::InvalidArgument as i32;
        }
        let table = ffi_lock!(ARENAS);
        let Some(arena) = table.get(handle) else {
            return CarveStatus::InvalidHandle as i32;
        };
        // SAFETY: `src` is a valid NUL-terminated string per caller contract.
        let source = unsafe { CStr::from_ptr(src) };
        finish(
            arena
                .duplicate_c_str(source)
                .map(|s| s.as_ptr().cast_mut().cast()),
            out.cast(),
        )
    })
}

/// Copy at most `max_size` bytes of `src`, stopping at its terminator, and
/// terminate the copy. Never reads past `src + max_size`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn carve_arena_strndup(
    handle: u64,
    src: *const c_char,
    max_size: usize,
    out: *mut *mut c_char,
) -> i32 {
    ffi_guard!({
        store(out, ptr::null_mut());
        if out.is_null() || (src.is_null() && max_size != 0) {
            return CarveStatus::InvalidArgument as i32;
        }
        let table = ffi_lock!(ARENAS);
        let Some(arena) = table.get(handle) else {
            return CarveStatus::InvalidHandle as i32;
        };
        let src = src.cast::<u8>();
        let mut len = 0;
        // SAFETY: reads stay below `max_size` and stop at the first NUL,
        // which the caller guarantees is in bounds if it comes first.
        while len < max_size && unsafe { *src.add(len) } != 0 {
            len += 1;
        }
        let bytes: &[u8] = if len == 0 {
            &[]
        } else {
            // SAFETY: the first `len` bytes were just read successfully.
            unsafe { std::slice::from_raw_parts(src, len) }
        };
        finish(
            arena
                .duplicate_c_str_bounded(bytes, len)
                .map(|s| s.as_ptr().cast_mut().cast()),
            out.cast(),
        )
    })
}

/// Reclaim every allocation without zeroing.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn carve_arena_reset(handle: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(ARENAS).get_mut(handle) {
            Some(arena) => {
                arena.reset();
                CarveStatus::Ok as i32
            }
            None => CarveStatus::InvalidHandle as i32,
        }
    })
}

/// Zero every byte handed out so far, then reset.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn carve_arena_zero(handle: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(ARENAS).get_mut(handle) {
            Some(arena) => {
                arena.zero_reset();
                CarveStatus::Ok as i32
            }
            None => CarveStatus::InvalidHandle as i32,
        }
    })
}

/// Write the number of bytes consumed so far (current offset) to `out`.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn carve_arena_used(handle: u64, out: *mut usize) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return CarveStatus::InvalidArgument as i32;
        }
        match ffi_lock!(ARENAS).get(handle) {
            Some(arena) => {
                store(out, arena.used());
                CarveStatus::Ok as i32
            }
            None => CarveStatus::InvalidHandle as i32,
        }
    })
}

/// Write the arena's capacity to `out`.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn carve_arena_capacity(handle: u64, out: *mut usize) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return CarveStatus::InvalidArgument as i32;
        }
        match ffi_lock!(ARENAS).get(handle) {
            Some(arena) => {
                store(out, arena.capacity());
                CarveStatus::Ok as i32
            }
            None => CarveStatus::InvalidHandle as i32,
        }
    })
}
