// `log` backend that writes to the browser console
//
// Only the wasm build installs a logger; native builds (unit tests) leave `log` silent.

use log::Record;

#[cfg(target_arch = "wasm32")]
pub use console::{init, ConsoleLogger};

pub fn format_record(record: &Record) -> String {
    format!("{} {}", record.level(), record.args())
}

#[cfg(target_arch = "wasm32")]
mod console {
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use wasm_bindgen::JsValue;

    use super::format_record;

    pub struct ConsoleLogger;

    static LOGGER: ConsoleLogger = ConsoleLogger;

    /// Install the console logger; later calls only adjust the level
    pub fn init(level: LevelFilter) {
        if log::set_logger(&LOGGER).is_err() {
            log::debug!("[Logging] Logger already installed");
        }
        log::set_max_level(level);
    }

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let line = JsValue::from_str(&format_record(record));
            match record.level() {
                Level::Error => web_sys::console::error_1(&line),
                Level::Warn => web_sys::console::warn_1(&line),
                Level::Info => web_sys::console::info_1(&line),
                Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
            }
        }

        fn flush(&self) {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn test_record_format() {
        let line = format_record(
            &Record::builder()
                .args(format_args!("[Coordinator] video#0 settled: loaded"))
                .level(Level::Info)
                .build(),
        );
        assert_eq!(line, "INFO [Coordinator] video#0 settled: loaded");
    }

    #[test]
    fn test_record_format_keeps_level_prefix() {
        let line = format_record(
            &Record::builder()
                .args(format_args!("[OfflineCache] Cache failed: {}", "addAll"))
                .level(Level::Warn)
                .build(),
        );
        assert!(line.starts_with("WARN [OfflineCache]"));
    }
}
