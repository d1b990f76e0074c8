use crate::{AnyCache, CacheBuilder, CachePolicy, SharedCache};
use std::ffi::c_void;
use std::os::raw::c_int;

type Handle = SharedCache<AnyCache>;

fn create(capacity: usize, policy: CachePolicy) -> *mut c_void {
    match CacheBuilder::new(capacity).build_shared(policy) {
        Ok(cache) => Box::into_raw(Box::new(cache)) as *mut c_void,
        Err(err) => {
            log::warn!("cache_create rejected: {}", err);
            std::ptr::null_mut()
        }
    }
}

/// Returns null when `capacity` is zero.
#[no_mangle]
pub extern "C" fn lru_cache_create(capacity: usize) -> *mut c_void {
    create(capacity, CachePolicy::Lru)
}

/// Returns null when `capacity` is zero.
#[no_mangle]
pub extern "C" fn lfu_cache_create(capacity: usize) -> *mut c_void {
    create(capacity, CachePolicy::Lfu)
}

#[no_mangle]
pub extern "C" fn cache_destroy(ptr: *mut c_void) {
    if !ptr.is_null() {
        unsafe {
            let _ = Box::from_raw(ptr as *mut Handle);
        }
    }
}

#[no_mangle]
pub extern "C" fn cache_set(ptr: *mut c_void, key: i64, value: i64) -> c_int {
    if ptr.is_null() {
        return 0;
    }
    let cache = unsafe { &*(ptr as *const Handle) };
    cache.set(key, value);
    1
}

/// Writes the value to `out` and returns 1 on a hit, 0 on a miss and -1 on a
/// null argument.
#[no_mangle]
pub extern "C" fn cache_get(ptr: *mut c_void, key: i64, out: *mut i64) -> c_int {
    if ptr.is_null() || out.is_null() {
        return -1;
    }
    let cache = unsafe { &*(ptr as *const Handle) };
    match cache.get(key) {
        Ok(value) => {
            unsafe { *out = value };
            1
        }
        Err(_) => 0,
    }
}

#[no_mangle]
pub extern "C" fn cache_contains(ptr: *mut c_void, key: i64) -> c_int {
    if ptr.is_null() {
        return 0;
    }
    let cache = unsafe { &*(ptr as *const Handle) };
    c_int::from(cache.contains(key))
}

#[no_mangle]
pub extern "C" fn cache_len(ptr: *mut c_void) -> usize {
    if ptr.is_null() {
        return 0;
    }
    let cache = unsafe { &*(ptr as *const Handle) };
    cache.len()
}
