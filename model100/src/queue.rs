//! Single-producer single-consumer byte ring for the UART receive interrupt.
//!
//! Head and tail are free-running `u8` counters; the slot is the counter
//! masked by `N - 1`. The ring is full when `head - tail == N`, which is why
//! `N` may be at most 128. The interrupt is the only writer of `head`, the
//! main loop the only writer of `tail`.

use core::{
    cell::UnsafeCell,
    sync::atomic::{AtomicU8, Ordering},
};

use log::trace;

pub struct RxQueue<const N: usize> {
    head: AtomicU8,
    tail: AtomicU8,
    buf: UnsafeCell<[u8; N]>,
}

// One producer and one consumer, each touching only its own counter and the
// slots between them.
unsafe impl<const N: usize> Sync for RxQueue<N> {}

impl<const N: usize> Default for RxQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RxQueue<N> {
    const MASK: u8 = {
        assert!(N.is_power_of_two() && N <= 128, "capacity must be a power of two up to 128");
        (N - 1) as u8
    };

    pub const fn new() -> Self {
        let _ = Self::MASK;
        Self {
            head: AtomicU8::new(0),
            tail: AtomicU8::new(0),
            buf: UnsafeCell::new([0; N]),
        }
    }

    /// Producer side. A full ring drops `byte` and returns `false`.
    pub fn push(&self, byte: u8) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        if head.wrapping_sub(tail) as usize == N {
            trace!("rx overflow, dropped {:#04x}", byte);
            return false;
        }
        unsafe {
            (*self.buf.get())[(head & Self::MASK) as usize] = byte;
        }
        self.head.store(head.wrapping_add(1), Ordering::Release);
        true
    }

    /// Consumer side.
    pub fn pop(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        if head == tail {
            return None;
        }
        let byte = unsafe { (*self.buf.get())[(tail & Self::MASK) as usize] };
        self.tail.store(tail.wrapping_add(1), Ordering::Release);
        Some(byte)
    }

    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        head.wrapping_sub(tail) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}
