//! Configuration management for the barcode server.
//!
//! Settings come from command-line arguments via clap, with environment
//! variable fallbacks under the `BARCODE_` prefix.
//!
//! # Example
//!
//! ```ignore
//! use barcode_server::config::{Cli, Command};
//! use clap::Parser;
//!
//! match Cli::parse().into_command() {
//!     Command::Serve(config) => println!("Listening on {}", config.bind_address()),
//!     Command::Render(config) => println!("Rendering {}", config.code),
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `BARCODE_HOST` - Server bind address (default: 0.0.0.0)
//! - `BARCODE_PORT` - Server port (default: 3000)
//! - `BARCODE_CACHE_DIR` - Directory holding rendered PNGs (required)
//! - `BARCODE_FONT_BARCODE` - Barcode-style font file (required)
//! - `BARCODE_FONT_PLAIN` - Caption font file (required)
//! - `BARCODE_CACHE_MAX_AGE` - HTTP cache max-age seconds (default: 31536000)
//! - `BARCODE_CORS_ORIGINS` - Comma-separated allowed origins (default: any)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::cache::DEFAULT_CACHE_MAX_AGE;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Barcode Server - renders text barcodes as PNG and serves them with
/// conditional-GET caching.
#[derive(Parser, Debug, Clone)]
#[command(name = "barcode-server")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the HTTP server.
    Serve(ServeConfig),

    /// Render a single barcode to a file or to base64 on stdout.
    Render(RenderConfig),
}

/// Font files shared by both subcommands.
#[derive(Args, Debug, Clone)]
pub struct FontConfig {
    /// Font used for the barcode line (e.g. Free 3 of 9).
    #[arg(long, env = "BARCODE_FONT_BARCODE")]
    pub barcode_font: PathBuf,

    /// Font used for the human-readable caption.
    #[arg(long, env = "BARCODE_FONT_PLAIN")]
    pub plain_font: PathBuf,
}

impl FontConfig {
    fn validate(&self) -> Result<(), String> {
        if self.barcode_font.as_os_str().is_empty() {
            return Err(
                "Barcode font is required. Set --barcode-font or BARCODE_FONT_BARCODE".to_string(),
            );
        }
        if self.plain_font.as_os_str().is_empty() {
            return Err(
                "Plain font is required. Set --plain-font or BARCODE_FONT_PLAIN".to_string(),
            );
        }
        Ok(())
    }
}

/// Configuration for the `serve` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "BARCODE_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "BARCODE_PORT")]
    pub port: u16,

    // =========================================================================
    // Cache Configuration
    // =========================================================================
    /// Directory rendered barcodes are stored in. Created if missing.
    #[arg(long, env = "BARCODE_CACHE_DIR")]
    pub cache_dir: PathBuf,

    /// HTTP Cache-Control max-age in seconds.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "BARCODE_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    #[command(flatten)]
    pub fonts: FontConfig,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "BARCODE_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Host must not be empty. Set --host or BARCODE_HOST".to_string());
        }

        if self.cache_dir.as_os_str().is_empty() {
            return Err(
                "Cache directory is required. Set --cache-dir or BARCODE_CACHE_DIR".to_string(),
            );
        }

        if self.cache_max_age == 0 {
            return Err("cache_max_age must be greater than 0".to_string());
        }

        self.fonts.validate()
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration for the `render` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RenderConfig {
    /// Text to encode. Sanitized to A-Z and 0-9.
    pub code: String,

    /// Shrink to at most this width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Shrink to at most this height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Write the PNG to this file.
    #[arg(short, long, conflicts_with = "base64", required_unless_present = "base64")]
    pub output: Option<PathBuf>,

    /// Print the PNG as base64 instead of writing a file.
    #[arg(long, default_value_t = false)]
    pub base64: bool,

    #[command(flatten)]
    pub fonts: FontConfig,
}

impl RenderConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == Some(0) || self.height == Some(0) {
            return Err("width and height must be greater than 0".to_string());
        }

        if self.output.is_none() && !self.base64 {
            return Err("Either --output or --base64 is required".to_string());
        }

        self.fonts.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================
