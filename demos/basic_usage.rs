//! Basic logger usage example
//!
//! Demonstrates leveled JSON logging to the console, structured fields and contextual loggers.
//!
//! Run with: cargo run --example basic_usage

use rust_hierarchical_logger::prelude::*;
use rust_hierarchical_logger::{debug, info, warn};
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Hierarchical Logger - Basic Usage Example ===\n");

    // Root at debug, writing to standard output
    let config = Config::new()
        .with_appender("stdout", ConfigAppender::console())
        .with_root(ConfigLogger::new("debug").with_appenders(["stdout"]))
        .with_logger("app.db", ConfigLogger::new("warning"));
    let handler = Handler::new(&config, &AppenderRegistry::new())?;

    println!("1. Logging at different levels:");
    let logger = handler.logger("app.server");
    logger.debug("This is a debug message", []);
    logger.info("This is an info message", []);
    logger.warn("This is a warning message", []);
    logger.error("This is an error message", []);

    println!("\n2. Structured fields:");
    logger.info(
        "Request handled",
        [
            Field::string("method", "GET"),
            Field::uint16("status", 200),
            Field::duration("latency", Duration::from_micros(2523)),
            Field::strings("tags", ["api", "v1"]),
        ],
    );

    println!("\n3. Contextual logger:");
    let request_logger = logger.with([Field::string("request_id", "9f8e7d")]);
    info!(request_logger, "Fetching user {}", 42; Field::bool("cached", false));

    println!("\n4. Inherited level - app.db only lets warnings through:");
    let db = handler.logger("app.db.pool");
    debug!(db, "Connection acquired (hidden)");
    warn!(db, "Pool exhausted (visible)"; Field::uint("waiting", 7));

    handler.close()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
