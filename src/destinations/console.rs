//! Console destination

use crate::core::{AttrSet, Destination, Level, Result};
use chrono::Utc;
use colored::Colorize;
use std::io::Write;

pub struct ConsoleDestination {
    use_colors: bool,
    initialized: bool,
}

impl ConsoleDestination {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            initialized: false,
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            initialized: false,
        }
    }

    fn format_line(&self, level: Level, attrs: &AttrSet, message: &str) -> String {
        let level_str = if self.use_colors {
            format!("{:7}", level.to_str())
                .color(level.color_code())
                .to_string()
        } else {
            format!("{:7}", level.to_str())
        };

        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");
        let base = format!("[{}] [{}] {}", timestamp, level_str, message);

        if attrs.is_empty() {
            base
        } else {
            format!("{} {}", base, attrs.format_pairs())
        }
    }
}

impl Default for ConsoleDestination {
    fn default() -> Self {
        Self::new()
    }
}

impl Destination for ConsoleDestination {
    fn name(&self) -> &str {
        "console"
    }

    fn init(&mut self) -> Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        self.initialized = false;
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn send(&mut self, level: Level, attrs: &AttrSet, message: &str) -> Result<()> {
        let line = self.format_line(level, attrs, message);

        // Error and Fatal go to stderr, everything else to stdout
        match level {
            Level::Error | Level::Fatal => eprintln!("{}", line),
            _ => println!("{}", line),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut dest = ConsoleDestination::new();
        assert!(!dest.is_initialized());
        dest.init().unwrap();
        assert!(dest.is_initialized());
        dest.shutdown().unwrap();
        assert!(!dest.is_initialized());
    }

    #[test]
    fn test_format_line_plain() {
        let dest = ConsoleDestination::with_colors(false);
        let line = dest.format_line(Level::Info, &AttrSet::new(), "hello");
        assert!(line.contains("INFO"));
        assert!(line.ends_with("hello"));
    }

    #[test]
    fn test_format_line_with_attrs() {
        let dest = ConsoleDestination::with_colors(false);
        let attrs = AttrSet::new().with("user", "alice");
        let line = dest.format_line(Level::Warning, &attrs, "careful");
        assert!(line.contains("careful user=alice"));
    }
}
