use crate::{RawLock, RawUnlock, TicketLock, WouldBlock};
use core::cell::UnsafeCell;
use core::fmt;
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};

/// Data protected by a raw lock, handed out through RAII guards.
///
/// Defaults to a [`TicketLock`], so guards are handed out in the order the
/// harts asked for them.
///
/// ```
/// use sbi_sync::Spinlock;
///
/// static HART_MASK: Spinlock<u64> = Spinlock::new(0);
///
/// HART_MASK.with_lock(|mask| *mask |= 1 << 3);
/// assert_eq!(*HART_MASK.lock(), 0b1000);
/// ```
pub struct Spinlock<T, R = TicketLock> {
    raw: R,
    data: UnsafeCell<T>,
}

// SAFETY: the raw lock lets one hart at a time reach `data`, so sharing the
// lock only ever moves `T` between harts.
unsafe impl<T: Send, R: Sync> Sync for Spinlock<T, R> {}

impl<T> Spinlock<T> {
    /// Wraps `value` in an unlocked ticket lock.
    pub const fn new(value: T) -> Self {
        Self::from_raw(TicketLock::new(), value)
    }
}

impl<T, R> Spinlock<T, R> {
    /// Wraps `value` behind `raw`, which is taken in whatever state it is in.
    pub const fn from_raw(raw: R, value: T) -> Self {
        Self {
            raw,
            data: UnsafeCell::new(value),
        }
    }

    /// Mutable access when you have `&mut self` (no contention possible).
    #[inline]
    pub const fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    /// Consumes the lock and returns the protected value.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }

    /// The raw lock, for diagnostics.
    #[inline]
    #[must_use]
    pub const fn raw(&self) -> &R {
        &self.raw
    }
}

impl<T> Spinlock<T, TicketLock> {
    /// Whether the lock is currently held. Diagnostics only.
    #[inline]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.raw.is_locked()
    }
}

impl<T, R> Spinlock<T, R>
where
    R: RawLock + RawUnlock,
{
    /// Takes a ticket and spins until it is served.
    #[inline]
    pub fn lock(&self) -> SpinlockGuard<'_, T, R> {
        self.raw.raw_lock();
        SpinlockGuard::new(self)
    }

    /// Takes the lock only if nobody holds or waits for it.
    ///
    /// A failed attempt draws no ticket and leaves the queue as it was.
    ///
    /// # Errors
    ///
    /// [`WouldBlock`] if another hart holds the lock.
    #[inline]
    pub fn try_lock(&self) -> Result<SpinlockGuard<'_, T, R>, WouldBlock> {
        if self.raw.raw_try_lock() {
            Ok(SpinlockGuard::new(self))
        } else {
            Err(WouldBlock)
        }
    }

    /// Runs `f` on the protected value while holding the lock.
    #[inline]
    pub fn with_lock<U>(&self, f: impl FnOnce(&mut T) -> U) -> U {
        f(&mut self.lock())
    }
}

impl<T, R> fmt::Debug for Spinlock<T, R>
where
    T: fmt::Debug,
    R: RawLock + RawUnlock + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Spinlock");
        s.field("raw", &self.raw);
        match self.try_lock() {
            Ok(guard) => s.field("data", &&*guard),
            Err(WouldBlock) => s.field("data", &format_args!("<locked>")),
        };
        s.finish()
    }
}

/// Access to the value of a held [`Spinlock`].
///
/// The guard stands for the ticket being served. Dropping it releases the
/// lock and serves the next ticket.
#[must_use = "dropping the guard releases the lock and serves the next ticket"]
pub struct SpinlockGuard<'a, T, R>
where
    R: RawUnlock,
{
    lock: &'a Spinlock<T, R>,
    // Sharing the guard shares `&T`; sending it hands over `&mut T`.
    _value: PhantomData<&'a mut T>,
}

impl<'a, T, R> SpinlockGuard<'a, T, R>
where
    R: RawUnlock,
{
    const fn new(lock: &'a Spinlock<T, R>) -> Self {
        Self {
            lock,
            _value: PhantomData,
        }
    }
}

impl<T, R> Deref for SpinlockGuard<'_, T, R>
where
    R: RawUnlock,
{
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the guard's ticket is being served, so no other hart can
        // reach `data` until the guard drops.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T, R> DerefMut for SpinlockGuard<'_, T, R>
where
    R: RawUnlock,
{
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: as for `deref`; `&mut self` rules out other borrows taken
        // through this guard.
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T, R> Drop for SpinlockGuard<'_, T, R>
where
    R: RawUnlock,
{
    fn drop(&mut self) {
        // SAFETY: the guard only exists while its lock is held.
        unsafe { self.lock.raw.raw_unlock() }
    }
}

impl<T, R> fmt::Debug for SpinlockGuard<'_, T, R>
where
    T: fmt::Debug,
    R: RawUnlock + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinlockGuard")
            .field("raw", &self.lock.raw)
            .field("data", &**self)
            .finish()
    }
}

impl<T, R> fmt::Display for SpinlockGuard<'_, T, R>
where
    T: fmt::Display,
    R: RawUnlock,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&**self, f)
    }
}
