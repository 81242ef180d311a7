//! Stack growth for the recursive resolver.
//!
//! Dependency chains are as deep as the user's object graph. On native
//! targets the stack grows on demand; on WASM the closure runs directly.

/// Grow when less than this remains.
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 64 * 1024;

/// Size of each new stack segment.
#[cfg(not(target_arch = "wasm32"))]
const SEGMENT: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
