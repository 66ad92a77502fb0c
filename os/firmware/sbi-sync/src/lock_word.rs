use bitfield_struct::bitfield;

/// Adding this to the raw word issues one ticket (`next += 1`).
///
/// `next` occupies the top half of the word, so a carry out of it falls off
/// the end of the `u32` and the field wraps in place.
pub(crate) const NEXT_TICKET: u32 = 1 << 16;

/// The packed state of a [`TicketLock`](crate::TicketLock).
///
/// Both counters live in one 32-bit word so that a single atomic instruction
/// can observe or update them together. The layout is part of the firmware
/// ABI: any code sharing a lock across separately compiled units must agree
/// on it.
///
/// ```text
///  31              16 15               0
/// +------------------+------------------+
/// |       next       |      owner       |
/// +------------------+------------------+
/// ```
///
/// Both counters wrap modulo 2^16. Only equality and wrapping differences are
/// meaningful; never compare them with `<` or `>`.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct LockWord {
    /// Bits 0..16: the ticket currently being served.
    pub owner: u16,

    /// Bits 16..32: the ticket handed to the next arrival.
    pub next: u16,
}

impl LockWord {
    /// Whether some hart holds (or is queued for) the lock.
    #[inline]
    #[must_use]
    pub const fn is_locked(self) -> bool {
        self.owner() != self.next()
    }

    /// Number of outstanding tickets: the holder plus every queued waiter.
    ///
    /// `0` means free, `1` means held with no waiters.
    #[inline]
    #[must_use]
    pub const fn queue_len(self) -> u16 {
        self.next().wrapping_sub(self.owner())
    }

    /// The word after issuing one more ticket.
    #[inline]
    #[must_use]
    pub const fn with_next_ticket(self) -> Self {
        self.with_next(self.next().wrapping_add(1))
    }

    /// The word after the holder released the lock.
    ///
    /// `owner` wraps inside its own half and never carries into `next`.
    #[inline]
    #[must_use]
    pub const fn with_owner_advanced(self) -> Self {
        self.with_owner(self.owner().wrapping_add(1))
    }
}
