//! Injectable logging capability
//!
//! Every [`Package`](crate::opc::Package) carries its own [`Logger`]; nothing in
//! the crate writes through the global `log` macros directly. The default
//! logger forwards to whatever backend the process installed (`env_logger`,
//! ...), while tests and embedders can hand in any [`log::Log`] implementation.

use log::{Level, Log, Metadata, Record};
use std::fmt;
use std::sync::Arc;

/// Target used for every record emitted by this crate
pub const TARGET: &str = "docx_parts_engine";

/// Logging handle injected at construction
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn Log>,
}

impl Logger {
    /// Forward to the process-wide `log` backend
    pub fn global() -> Self {
        Self {
            sink: Arc::new(GlobalSink),
        }
    }

    /// Use the given sink
    pub fn new(sink: Arc<dyn Log>) -> Self {
        Self { sink }
    }

    /// Discard everything
    pub fn silent() -> Self {
        Self {
            sink: Arc::new(SilentSink),
        }
    }

    /// Emit a record at `level`
    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        let metadata = Metadata::builder().level(level).target(TARGET).build();
        if !self.sink.enabled(&metadata) {
            return;
        }
        self.sink.log(
            &Record::builder()
                .metadata(metadata)
                .args(args)
                .module_path_static(Some(module_path!()))
                .build(),
        );
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::global()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

struct GlobalSink;

impl Log for GlobalSink {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level() && log::logger().enabled(metadata)
    }

    fn log(&self, record: &Record) {
        log::logger().log(record);
    }

    fn flush(&self) {
        log::logger().flush();
    }
}

struct SilentSink;

impl Log for SilentSink {
    fn enabled(&self, _: &Metadata) -> bool {
        false
    }

    fn log(&self, _: &Record) {}

    fn flush(&self) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Sink that keeps every record as "LEVEL message"
    #[derive(Default)]
    pub struct CaptureSink {
        pub lines: Mutex<Vec<String>>,
    }

    impl Log for CaptureSink {
        fn enabled(&self, _: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            self.lines
                .lock()
                .unwrap()
                .push(format!("{} {}", record.level(), record.args()));
        }

        fn flush(&self) {}
    }
}
