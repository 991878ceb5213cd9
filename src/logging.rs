//! Non-blocking log ring for the foreground loop.
//!
//! The foreground loop must never block, so it cannot print: it pushes
//! fixed-size entries into a lock-free ring instead, and whatever idle
//! shell the board provides drains them at leisure (UART, RTT, whatever).
//!
//! Rules:
//! - Push never blocks and never allocates; if the ring is full the entry
//!   is dropped and counted.
//! - Single producer (the foreground loop), single consumer (the drain).
//! - Entries are timestamped with the foreground iteration counter, not
//!   wall time; the core has no clock.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

/// Maximum formatted message length in bytes.
pub const MAX_MSG_LEN: usize = 48;

/// Default ring capacity (entries). Must be a power of two.
pub const LOG_RING_SIZE: usize = 64;

/// Log severity. Debug is the chatter (bound values), Info the mode
/// transitions, Warn the panic resets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Warn = 0,
    Info = 1,
    Debug = 2,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// One fixed-size log entry.
#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Foreground iteration the entry was produced on.
    pub iteration: u32,
    pub level: LogLevel,
    /// Used length of `msg`.
    pub len: u8,
    /// Message bytes, not null-terminated.
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        iteration: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message as UTF-8.
    pub fn text(&self) -> &str {
        core::str::from_utf8(&self.msg[..self.len as usize]).unwrap_or("<bad utf8>")
    }
}

/// Single-producer single-consumer log ring.
///
/// The producer owns `write_idx`, the consumer owns `read_idx`; each side
/// only loads the other's index. No index is ever shared for writing, so
/// plain Release/Acquire pairs are enough.
pub struct LogRing<const N: usize = LOG_RING_SIZE> {
    entries: UnsafeCell<[LogEntry; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: one producer, one consumer, indices coordinate slot ownership.
// A slot is written only before write_idx is released past it and read only
// after, so no slot is ever aliased mutably.
unsafe impl<const N: usize> Sync for LogRing<N> {}
unsafe impl<const N: usize> Send for LogRing<N> {}

impl<const N: usize> LogRing<N> {
    const MASK: usize = N - 1;

    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "log ring size must be a power of 2");
        Self {
            entries: UnsafeCell::new([LogEntry::EMPTY; N]),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push an entry. Returns `false` (and counts) if the ring was full.
    ///
    /// O(1), never blocks. Producer side only.
    #[inline]
    pub fn push(&self, iteration: u32, level: LogLevel, msg: &[u8]) -> bool {
        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let idx = (write as usize) & Self::MASK;
        let len = msg.len().min(MAX_MSG_LEN);

        // SAFETY: single producer; this slot is not visible to the consumer
        // until the Release store below.
        unsafe {
            let entry = &mut (*self.entries.get())[idx];
            entry.iteration = iteration;
            entry.level = level;
            entry.len = len as u8;
            entry.msg[..len].copy_from_slice(&msg[..len]);
        }

        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Pop the oldest entry, if any. Consumer side only.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let idx = (read as usize) & Self::MASK;
        // SAFETY: single consumer; the slot was published by the Release
        // store of write_idx.
        let entry = unsafe { (*self.entries.get())[idx] };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Entries waiting to be drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }

    /// Entries dropped because the ring was full.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<const N: usize> Default for LogRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format `args` into `buf`, truncating. Returns bytes written.
pub fn format_into(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    use core::fmt::Write;

    struct Cursor<'a>(&'a mut [u8], usize);

    impl Write for Cursor<'_> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let take = s.len().min(self.0.len() - self.1);
            self.0[self.1..self.1 + take].copy_from_slice(&s.as_bytes()[..take]);
            self.1 += take;
            Ok(())
        }
    }

    let mut cursor = Cursor(buf, 0);
    let _ = core::fmt::write(&mut cursor, args);
    cursor.1
}

/// Push a formatted entry into a [`LogRing`] without blocking.
#[macro_export]
macro_rules! siren_log {
    ($ring:expr, $level:expr, $iteration:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
        let len = $crate::logging::format_into(&mut buf, format_args!($($arg)*));
        $ring.push($iteration, $level, &buf[..len]);
    }};
}

#[macro_export]
macro_rules! siren_info {
    ($ring:expr, $iteration:expr, $($arg:tt)*) => {
        $crate::siren_log!($ring, $crate::logging::LogLevel::Info, $iteration, $($arg)*)
    };
}

#[macro_export]
macro_rules! siren_warn {
    ($ring:expr, $iteration:expr, $($arg:tt)*) => {
        $crate::siren_log!($ring, $crate::logging::LogLevel::Warn, $iteration, $($arg)*)
    };
}

#[macro_export]
macro_rules! siren_debug {
    ($ring:expr, $iteration:expr, $($arg:tt)*) => {
        $crate::siren_log!($ring, $crate::logging::LogLevel::Debug, $iteration, $($arg)*)
    };
}
