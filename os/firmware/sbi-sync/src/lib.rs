//! # Firmware synchronization primitives
//!
//! Locks for supervisor binary interface firmware, where every hart runs the
//! same code in parallel and there is no scheduler to park a waiter on.
//!
//! * [`TicketLock`] is the raw lock: one 32-bit word, FIFO hand-off,
//!   busy-waiting.
//! * [`Spinlock`] owns the data it protects and releases the lock when its
//!   guard drops.
//! * [`barrier`] provides the `fence` primitives the locks and drivers order
//!   memory with.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

pub mod barrier;
mod lock_word;
mod spinlock;
mod ticket;

pub use lock_word::LockWord;
pub use spinlock::{Spinlock, SpinlockGuard};
pub use ticket::TicketLock;

/// A non-blocking acquisition found the lock held.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("lock is held by another hart")]
pub struct WouldBlock;

/// Acquisition half of a raw lock, as driven by [`Spinlock`].
pub trait RawLock {
    /// Spins until the lock is held by the caller.
    fn raw_lock(&self);

    /// Acquires the lock only if that needs no waiting; `true` on success.
    fn raw_try_lock(&self) -> bool;
}

/// Release half of a raw lock.
pub trait RawUnlock {
    /// # Safety
    /// The caller must currently hold the lock.
    unsafe fn raw_unlock(&self);
}
