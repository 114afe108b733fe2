//! File logging example
//!
//! Demonstrates a JSON configuration with console and rotating file appenders, additive
//! loggers and an appender registered from code.
//!
//! Run with: cargo run --example file_logging

use rust_hierarchical_logger::prelude::*;
use std::sync::Arc;

const CONFIG: &str = r#"{
    "root": {"level": "info", "appenders": ["stdout"]},
    "appenders": {
        "stdout": {"type": "console"},
        "app-log": {"type": "file", "path": "logs/application.log", "maxBytes": 2048, "backup": true}
    },
    "loggers": {
        "app": {"level": "debug", "appenders": ["app-log"], "additive": true},
        "app.audit": {"level": "info", "appenders": ["audit-log"]}
    }
}"#;

fn main() -> Result<()> {
    println!("=== Rust Hierarchical Logger - File Logging Example ===\n");

    // Appenders not described by the configuration come from a registry
    let registry = AppenderRegistry::new();
    registry.register(Arc::new(ConsoleAppender::with_writer(
        "audit-log",
        std::io::stderr(),
    )))?;

    let config = Config::from_json_str(CONFIG)?;
    let handler = Handler::new(&config, &registry)?;

    println!("1. Logging to both console and file:");
    let logger = handler.logger("app.startup");
    logger.info("Application started", []);
    logger.debug("Loading configuration...", [Field::string("source", "inline")]);
    logger.warn("Using default settings for some options", []);

    println!("\n2. Rotating the file as it grows:");
    let worker = handler.logger("app.worker").with([Field::string("queue", "emails")]);
    for i in 1..=40u32 {
        worker.debug("Processing item", [Field::uint32("item", i), Field::uint32("total", 40)]);
    }

    println!("\n3. Audit records go to their own appender only:");
    handler
        .logger("app.audit.login")
        .info("User logged in", [Field::string("user", "alice")]);

    handler.close()?;
    println!("\nRecords written to logs/application.log (backups: logs/application.log.N)");
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
