//! # Firmware console logging
//!
//! A [`log`] backend for firmware consoles shared by every hart.
//!
//! The console sink (a UART driver, a ring buffer, anything implementing
//! [`core::fmt::Write`]) sits behind a [`sbi_sync::Spinlock`]. Each record is
//! formatted while the lock is held, so lines from harts logging at the same
//! time come out whole and in the order the harts got the lock.
//!
//! ```rust
//! use log::{LevelFilter, info};
//! use sbi_console::ConsoleLogger;
//!
//! static LOGGER: ConsoleLogger<String> = ConsoleLogger::new(String::new(), LevelFilter::Info);
//!
//! LOGGER.init().expect("logger initialization");
//! info!(target: "sbi::init", "hart {} online", 0);
//!
//! assert_eq!(LOGGER.with_sink(|s| s.clone()), "[INFO] sbi::init: hart 0 online\n");
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]

mod logger;

pub use logger::ConsoleLogger;
