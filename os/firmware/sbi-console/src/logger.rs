use core::fmt::Write;
use core::sync::atomic::{AtomicU8, Ordering};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use sbi_sync::Spinlock;

pub struct ConsoleLogger<W> {
    sink: Spinlock<W>,
    max_level: AtomicU8,
}

impl<W> ConsoleLogger<W>
where
    W: Write + Send,
{
    #[must_use]
    pub const fn new(sink: W, max_level: LevelFilter) -> Self {
        Self {
            sink: Spinlock::new(sink),
            max_level: AtomicU8::new(level_to_u8(max_level)),
        }
    }

    /// Registers this logger as the global [`log`] backend.
    ///
    /// Call this once during early init, from the boot hart.
    ///
    /// # Errors
    ///
    /// Fails if a global logger has already been installed.
    pub fn init(&'static self) -> Result<(), SetLoggerError>
    where
        W: 'static,
    {
        log::set_logger(self)?;
        // Filtering happens in `enabled` so the level stays adjustable.
        log::set_max_level(LevelFilter::Trace);
        Ok(())
    }

    #[must_use]
    pub fn max_level(&self) -> LevelFilter {
        level_from_u8(self.max_level.load(Ordering::Relaxed))
    }

    pub fn set_max_level(&self, level: LevelFilter) {
        self.max_level.store(level_to_u8(level), Ordering::Relaxed);
    }

    /// Runs `f` with exclusive access to the console sink.
    ///
    /// Useful for banners and other raw output that must not interleave with
    /// log lines.
    pub fn with_sink<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        self.sink.with_lock(f)
    }

    #[must_use]
    pub fn into_sink(self) -> W {
        self.sink.into_inner()
    }
}

impl<W> Log for ConsoleLogger<W>
where
    W: Write + Send,
{
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // Format: "[LEVEL] target: message\n"
        self.sink.with_lock(|sink| {
            // Best-effort: a console that rejects writes has nowhere to report it.
            let _ = writeln!(
                sink,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
        });
    }

    fn flush(&self) {
        // writes go straight to the sink
    }
}

const fn level_to_u8(level: LevelFilter) -> u8 {
    match level {
        LevelFilter::Off => 0,
        LevelFilter::Error => 1,
        LevelFilter::Warn => 2,
        LevelFilter::Info => 3,
        LevelFilter::Debug => 4,
        LevelFilter::Trace => 5,
    }
}

const fn level_from_u8(raw: u8) -> LevelFilter {
    match raw {
        0 => LevelFilter::Off,
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
