//! # Memory barriers
//!
//! Fence primitives shared by the lock implementations and by drivers that
//! need to order device and memory accesses by hand.
//!
//! On RISC-V targets with the `asm` feature enabled, every function emits the
//! corresponding `fence` instruction. The predecessor and successor sets are
//! listed per function; `i`/`o` are device input/output, `r`/`w` are memory
//! reads and writes.
//!
//! On every other target the functions fall back to
//! [`core::sync::atomic::fence`] with the closest matching [`Ordering`]. This
//! is what host-side tests run against.
//!
//! All variants also act as compiler barriers.
//!
//! ```
//! use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
//! use sbi_sync::barrier;
//!
//! let data = AtomicU32::new(0);
//! let ready = AtomicBool::new(false);
//!
//! // Producer
//! data.store(42, Ordering::Relaxed);
//! barrier::release_barrier();
//! ready.store(true, Ordering::Relaxed);
//!
//! // Consumer
//! if ready.load(Ordering::Relaxed) {
//!     barrier::acquire_barrier();
//!     assert_eq!(data.load(Ordering::Relaxed), 42);
//! }
//! ```

#[allow(unused_imports)]
use core::sync::atomic::{Ordering, fence};

#[cfg(all(feature = "asm", any(target_arch = "riscv32", target_arch = "riscv64")))]
macro_rules! riscv_fence {
    ($pred:literal, $succ:literal, $_fallback:expr) => {
        // No `nomem`: the fence must also stop the compiler from moving
        // memory accesses across it.
        // SAFETY: `fence` takes no operands and has no effect beyond ordering
        // memory accesses.
        unsafe {
            core::arch::asm!(
                concat!("fence ", $pred, ", ", $succ),
                options(nostack, preserves_flags)
            )
        }
    };
}

#[cfg(not(all(feature = "asm", any(target_arch = "riscv32", target_arch = "riscv64"))))]
macro_rules! riscv_fence {
    ($_pred:literal, $_succ:literal, $fallback:expr) => {
        fence($fallback)
    };
}

/// Full barrier over device I/O and memory (`fence iorw, iorw`).
#[inline]
pub fn mb() {
    riscv_fence!("iorw", "iorw", Ordering::SeqCst);
}

/// Read barrier over device input and memory reads (`fence ir, ir`).
#[inline]
pub fn rmb() {
    riscv_fence!("ir", "ir", Ordering::Acquire);
}

/// Write barrier over device output and memory writes (`fence ow, ow`).
#[inline]
pub fn wmb() {
    riscv_fence!("ow", "ow", Ordering::Release);
}

/// Full barrier between harts (`fence rw, rw`).
#[inline]
pub fn smp_mb() {
    riscv_fence!("rw", "rw", Ordering::SeqCst);
}

/// Orders prior reads before subsequent reads (`fence r, r`).
#[inline]
pub fn smp_rmb() {
    riscv_fence!("r", "r", Ordering::Acquire);
}

/// Orders prior writes before subsequent writes (`fence w, w`).
#[inline]
pub fn smp_wmb() {
    riscv_fence!("w", "w", Ordering::Release);
}

/// Acquire barrier (`fence r, rw`).
///
/// Prior reads are ordered before all subsequent reads and writes. Placed
/// after the load that observed a lock or flag, it turns that load into an
/// acquiring one.
#[inline]
pub fn acquire_barrier() {
    riscv_fence!("r", "rw", Ordering::Acquire);
}

/// Release barrier (`fence rw, w`).
///
/// Prior reads and writes are ordered before all subsequent writes. Placed
/// before the store that publishes a lock release or flag, it turns that
/// store into a releasing one.
#[inline]
pub fn release_barrier() {
    riscv_fence!("rw", "w", Ordering::Release);
}
