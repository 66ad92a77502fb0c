use crate::lock_word::{LockWord, NEXT_TICKET};
use crate::{RawLock, RawUnlock, barrier};
use core::fmt;
use core::hint::spin_loop;
use core::sync::atomic::{AtomicU32, Ordering};

/// A fair spinlock for harts sharing memory without a scheduler.
///
/// Every arrival draws a ticket from `next`; the lock serves tickets in
/// issuance order by advancing `owner` on each release. Waiters busy-wait and
/// never yield.
///
/// The lock is a single [`LockWord`] in an [`AtomicU32`] and has the same
/// size and alignment as a `u32`.
///
/// # Forward progress
///
/// [`try_lock`](Self::try_lock) and [`unlock`](Self::unlock) retry their
/// compare-and-swap until it commits. The retry count is not bounded here; the
/// platform is assumed to arbitrate the underlying LR/SC (or CAS) fairly so
/// that every hart eventually succeeds.
///
/// # Example
///
/// ```
/// use sbi_sync::TicketLock;
///
/// static LOCK: TicketLock = TicketLock::new();
///
/// LOCK.lock();
/// assert!(LOCK.is_locked());
/// assert!(!LOCK.try_lock());
/// unsafe { LOCK.unlock() };
/// assert!(!LOCK.is_locked());
/// ```
#[repr(transparent)]
pub struct TicketLock {
    word: AtomicU32,
}

impl Default for TicketLock {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketLock {
    /// Creates an unlocked lock (`owner == next == 0`).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            word: AtomicU32::new(0),
        }
    }

    /// Creates a lock whose word starts out as `word`.
    ///
    /// For restoring a lock word handed over from separately built firmware
    /// and for exercising the counter wrap.
    #[must_use]
    pub const fn from_word(word: LockWord) -> Self {
        Self {
            word: AtomicU32::new(word.into_bits()),
        }
    }

    /// Whether the lock is currently held.
    ///
    /// Diagnostics only: the answer may be stale by the time the caller acts
    /// on it.
    #[inline]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        let word = LockWord::from_bits(self.word.load(Ordering::Relaxed));
        barrier::acquire_barrier();
        word.is_locked()
    }

    /// A relaxed copy of the lock word.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> LockWord {
        LockWord::from_bits(self.word.load(Ordering::Relaxed))
    }

    /// Number of outstanding tickets, holder included. Diagnostics only.
    #[inline]
    #[must_use]
    pub fn queue_len(&self) -> u16 {
        self.snapshot().queue_len()
    }

    /// Acquires the lock, spinning until this hart's ticket is served.
    ///
    /// Tickets are served strictly in the order they were drawn. Calling this
    /// while already holding the lock deadlocks.
    #[inline]
    pub fn lock(&self) {
        // Draw a ticket. The returned word already tells us whether it is
        // being served.
        let mut word = LockWord::from_bits(self.word.fetch_add(NEXT_TICKET, Ordering::Acquire));
        let ticket = word.next();

        while word.owner() != ticket {
            spin_loop();
            word = LockWord::from_bits(self.word.load(Ordering::Acquire));
        }
    }

    /// Acquires the lock if it is free, without waiting.
    ///
    /// Returns `false` as soon as the lock is observed held. A `true` result
    /// means the caller now holds the lock and must [`unlock`](Self::unlock)
    /// it.
    #[inline]
    #[must_use]
    pub fn try_lock(&self) -> bool {
        let mut current = self.word.load(Ordering::Acquire);
        loop {
            let word = LockWord::from_bits(current);
            if word.is_locked() {
                return false;
            }

            // Free, so the ticket we draw is the one being served.
            match self.word.compare_exchange_weak(
                current,
                word.with_next_ticket().into_bits(),
                Ordering::Acquire,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
    }

    /// Releases the lock, serving the next ticket.
    ///
    /// # Safety
    ///
    /// The calling hart must hold the lock, acquired through exactly one
    /// successful [`lock`](Self::lock) or [`try_lock`](Self::try_lock) that
    /// has not been released yet. Anything else corrupts the ticket queue.
    #[inline]
    pub unsafe fn unlock(&self) {
        // Only the holder writes `owner`, but other harts keep drawing tickets
        // from the same word, hence the CAS. A plain `fetch_add(1)` would
        // carry into `next` when `owner` wraps.
        let mut current = self.word.load(Ordering::Relaxed);
        loop {
            let released = LockWord::from_bits(current).with_owner_advanced();
            match self.word.compare_exchange_weak(
                current,
                released.into_bits(),
                Ordering::Release,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }
}

impl fmt::Debug for TicketLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = self.snapshot();
        f.debug_struct("TicketLock")
            .field("owner", &word.owner())
            .field("next", &word.next())
            .finish()
    }
}

impl RawLock for TicketLock {
    fn raw_lock(&self) {
        self.lock();
    }

    fn raw_try_lock(&self) -> bool {
        self.try_lock()
    }
}

impl RawUnlock for TicketLock {
    unsafe fn raw_unlock(&self) {
        unsafe { self.unlock() }
    }
}
