//! Integration tests for the global logging setup
//!
//! A process holds a single global subscriber, so installation, sink
//! delivery and the failing second install share one test.

use core_runtime::config::EngineConfig;
use core_runtime::logging::{init_logging, LogEntry, LogFormat, LogLevel, LogSink, LoggingConfig};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CollectingSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl LogSink for CollectingSink {
    fn record(&self, entry: LogEntry) {
        self.entries.lock().unwrap().push(entry);
    }

    fn min_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

#[test]
fn test_engine_config_carries_logging_options() {
    let logging = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_spans(true)
        .with_thread_info(true);
    let config = EngineConfig::builder().logging(logging).build().unwrap();

    assert_eq!(config.logging.format, LogFormat::Compact);
    assert_eq!(config.logging.level, LogLevel::Warn);
    assert!(config.logging.enable_spans);
    assert!(config.logging.display_thread_info);
    assert!(config.logging.display_target);
}

#[test]
fn test_init_logging_installs_once() {
    let sink = Arc::new(CollectingSink::default());
    let config = LoggingConfig::default()
        .with_format(LogFormat::Json)
        .with_filter("logging_integration=debug")
        .with_sink(sink.clone());

    init_logging(config.clone()).unwrap();
    tracing::debug!(rows = 12u64, "mix view recomputed");
    tracing::trace!("filtered out by the directive");

    {
        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "mix view recomputed");
        assert_eq!(entries[0].level, LogLevel::Debug);
        assert_eq!(entries[0].fields.get("rows").map(String::as_str), Some("12"));
    }

    assert!(init_logging(config).is_err());
}
