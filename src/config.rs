//! Configuration and CLI argument handling

use clap::Parser;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "countdown-timer")]
#[command(about = "A countdown timer driven over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Initial countdown duration in seconds
    #[arg(short, long, default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
    pub duration: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["countdown-timer"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.duration, 5);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn verbose_and_duration() {
        let config = Config::try_parse_from(["countdown-timer", "-v", "-d", "90", "-p", "8080"]).unwrap();
        assert_eq!(config.duration, 90);
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn zero_duration_is_rejected() {
        assert!(Config::try_parse_from(["countdown-timer", "--duration", "0"]).is_err());
    }
}
