//! TensorFlow Lite Micro backend.
//!
//! Binds the C wrapper around the interpreter (`libtflm_wrapper.a`, linked by `build.rs`).
//! The wrapper keeps one global interpreter, model and arena, so exactly one
//! [`TflmEngine`] may exist; [`TflmEngine::take`] hands it out once.
//!
//! Wrapper ABI:
//!
//! ```c
//! int    tflm_init(void);                 // 0 ok, 1..6 see InitError
//! float* tflm_input_ptr(int* n_elems);    // NULL if not initialized
//! float* tflm_output_ptr(int* n_elems);   // NULL if not initialized
//! int    tflm_invoke(void);               // 0 ok
//! int    tflm_arena_used_bytes(void);
//! ```

use core::ffi::c_int;
use core::sync::atomic::{AtomicBool, Ordering};

use super::{InferenceEngine, InitError, InvokeError};

mod ffi {
    use core::ffi::c_int;

    unsafe extern "C" {
        pub fn tflm_init() -> c_int;
        pub fn tflm_input_ptr(n_elems: *mut c_int) -> *mut f32;
        pub fn tflm_output_ptr(n_elems: *mut c_int) -> *mut f32;
        pub fn tflm_invoke() -> c_int;
        pub fn tflm_arena_used_bytes() -> c_int;
    }
}

static TAKEN: AtomicBool = AtomicBool::new(false);

/// Handle to the wrapper's global interpreter.
pub struct TflmEngine {
    _private: (),
}

impl TflmEngine {
    /// Claim the interpreter. Returns `None` if it was already claimed.
    pub fn take() -> Option<Self> {
        if TAKEN.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self { _private: () })
        }
    }
}

/// Convert a wrapper (pointer, length) pair into a usable length.
fn tensor_len(
    ptr: *const f32,
    n_elems: c_int,
) -> Option<usize> {
    if ptr.is_null() {
        return None;
    }
    usize::try_from(n_elems).ok().filter(|n| *n > 0)
}

impl InferenceEngine for TflmEngine {
    fn init(&mut self) -> Result<(), InitError> {
        // SAFETY: no arguments; we hold the only handle to the wrapper's globals.
        let rc = unsafe { ffi::tflm_init() };
        InitError::from_code(rc)
    }

    fn input_buffer(&mut self) -> Option<&mut [f32]> {
        let mut n_elems: c_int = 0;
        // SAFETY: `n_elems` is a valid out-pointer for the duration of the call.
        let ptr = unsafe { ffi::tflm_input_ptr(&mut n_elems) };
        let len = tensor_len(ptr, n_elems)?;
        // SAFETY: the wrapper returns the interpreter's input tensor, `len` floats, valid until
        // the next `tflm_init`. `&mut self` is the only handle (see `take`), so no alias exists
        // for the lifetime of the returned slice.
        Some(unsafe { core::slice::from_raw_parts_mut(ptr, len) })
    }

    fn output_buffer(&self) -> Option<&[f32]> {
        let mut n_elems: c_int = 0;
        // SAFETY: `n_elems` is a valid out-pointer for the duration of the call.
        let ptr = unsafe { ffi::tflm_output_ptr(&mut n_elems) };
        let len = tensor_len(ptr, n_elems)?;
        // SAFETY: output tensor of `len` floats; it is only written by `tflm_invoke`, which needs
        // `&mut self` and therefore cannot run while this borrow is alive.
        Some(unsafe { core::slice::from_raw_parts(ptr, len) })
    }

    fn invoke(&mut self) -> Result<(), InvokeError> {
        // SAFETY: plain C call on the interpreter we own.
        match unsafe { ffi::tflm_invoke() } {
            0 => Ok(()),
            code => Err(InvokeError { code }),
        }
    }

    fn arena_used_bytes(&self) -> usize {
        // SAFETY: read-only query.
        let used = unsafe { ffi::tflm_arena_used_bytes() };
        usize::try_from(used).unwrap_or(0)
    }
}
