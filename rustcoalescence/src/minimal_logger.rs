use colored::Colorize;
use log::{Level, LevelFilter, Metadata, Record};

pub struct MinimalLogger;

impl log::Log for MinimalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level_string = match record.level() {
            Level::Error => record.level().to_string().red(),
            Level::Warn => record.level().to_string().yellow(),
            Level::Info => record.level().to_string().cyan(),
            Level::Debug => record.level().to_string().purple(),
            Level::Trace => record.level().to_string().normal(),
        };

        if record.level() > LevelFilter::Error {
            println!("{:<5} {}", level_string, record.args());
        } else {
            eprintln!("{:<5} {}", level_string, record.args());
        }
    }

    fn flush(&self) {}
}
