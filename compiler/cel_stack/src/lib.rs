//! Stack growth for recursive walks over expression trees.
//!
//! The checker visits the expression tree recursively and an untrusted
//! expression can nest arbitrarily deep (`((((x))))`, long `&&` chains built
//! by macros, nested comprehensions). Wrapping each recursive step in
//! [`ensure_sufficient_stack`] moves execution onto a freshly allocated stack
//! segment when the current one runs low.
//!
//! Callers are still expected to bound the size of untrusted input; this only
//! turns a stack overflow into ordinary heap growth.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than [`RED_ZONE`] bytes remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack; run `f` directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
