use log::{Level, LevelFilter, Log, Metadata, Record};
use sbi_console::ConsoleLogger;
use std::fmt;
use std::sync::{Arc, Barrier};
use std::thread;

fn emit(logger: &impl Log, level: Level, target: &str, args: fmt::Arguments<'_>) {
    logger.log(
        &Record::builder()
            .level(level)
            .target(target)
            .args(args)
            .build(),
    );
}

#[test]
fn formats_level_target_and_message() {
    let logger = ConsoleLogger::new(String::new(), LevelFilter::Trace);
    emit(&logger, Level::Warn, "sbi::ipi", format_args!("hart {} not responding", 3));
    emit(&logger, Level::Debug, "sbi::tlb", format_args!("flush"));

    assert_eq!(
        logger.into_sink(),
        "[WARN] sbi::ipi: hart 3 not responding\n[DEBUG] sbi::tlb: flush\n"
    );
}

#[test]
fn drops_records_above_max_level() {
    let logger = ConsoleLogger::new(String::new(), LevelFilter::Info);
    assert!(!logger.enabled(&Metadata::builder().level(Level::Debug).build()));
    assert!(logger.enabled(&Metadata::builder().level(Level::Error).build()));

    emit(&logger, Level::Debug, "sbi", format_args!("hidden"));
    emit(&logger, Level::Info, "sbi", format_args!("shown"));

    assert_eq!(logger.into_sink(), "[INFO] sbi: shown\n");
}

#[test]
fn max_level_is_adjustable_at_runtime() {
    let logger = ConsoleLogger::new(String::new(), LevelFilter::Off);
    emit(&logger, Level::Error, "sbi", format_args!("silenced"));
    assert_eq!(logger.max_level(), LevelFilter::Off);

    logger.set_max_level(LevelFilter::Error);
    assert_eq!(logger.max_level(), LevelFilter::Error);
    emit(&logger, Level::Error, "sbi", format_args!("trap"));

    assert_eq!(logger.into_sink(), "[ERROR] sbi: trap\n");
}

#[test]
fn with_sink_writes_raw_output() {
    use std::fmt::Write;

    let logger = ConsoleLogger::new(String::new(), LevelFilter::Info);
    logger.with_sink(|s| s.write_str("OpenSBI\n")).unwrap();
    emit(&logger, Level::Info, "sbi", format_args!("boot"));

    assert_eq!(logger.with_sink(|s| s.clone()), "OpenSBI\n[INFO] sbi: boot\n");
}

#[test]
fn concurrent_harts_never_interleave_lines() {
    let harts = 4;
    let lines = 250;

    let logger = Arc::new(ConsoleLogger::new(String::new(), LevelFilter::Info));
    let start = Arc::new(Barrier::new(harts));

    let handles: Vec<_> = (0..harts)
        .map(|hart| {
            let logger = Arc::clone(&logger);
            let start = Arc::clone(&start);
            thread::spawn(move || {
                start.wait();
                for line in 0..lines {
                    emit(&*logger, Level::Info, "sbi::hart", format_args!("hart {hart} line {line}"));
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let output = logger.with_sink(|s| s.clone());
    let mut seen = vec![0usize; harts];
    for l in output.lines() {
        let rest = l
            .strip_prefix("[INFO] sbi::hart: hart ")
            .unwrap_or_else(|| panic!("mangled line: {l:?}"));
        let (hart, line) = rest.split_once(" line ").expect("mangled line");
        let hart: usize = hart.parse().unwrap();
        let line: usize = line.parse().unwrap();

        // Each hart's lines appear in the order it logged them.
        assert_eq!(line, seen[hart]);
        seen[hart] += 1;
    }
    assert_eq!(seen, vec![lines; harts]);
}
