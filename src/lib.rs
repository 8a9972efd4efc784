//! stubdns - An asynchronous stub DNS resolver in Rust
//!
//! This crate resolves hostnames to IPv4/IPv6 addresses by speaking a subset
//! of the DNS wire protocol (RFC 1035) directly over UDP.
//!
//! # Architecture
//!
//! The crate is organized into several main modules:
//!
//! - `dns`: DNS wire protocol implementation (query construction, message
//!   parsing, domain name compression)
//! - `resolver`: query session lifecycle and resolver orchestration
//! - `cache`: TTL-based answer cache consulted before issuing queries
//! - `config`: configuration loading and validation
//! - `error`: error types and handling
//!
//! # Example
//!
//! ```rust,no_run
//! use stubdns::config::Config;
//! use stubdns::dns::RecordType;
//! use stubdns::resolver::Resolver;
//!
//! # async fn example() -> stubdns::Result<()> {
//! let resolver = Resolver::new(Config::default())?;
//! let response = resolver.resolve("example.com", RecordType::A).await?;
//! for answer in &response.answers {
//!     println!("{}", answer);
//! }
//! # Ok(())
//! # }
//! ```

/// DNS wire protocol implementation
///
/// This module provides DNS message construction, parsing, and core DNS types.
pub mod dns;

/// Query session lifecycle and resolver orchestration
pub mod resolver;

/// TTL-based answer cache
pub mod cache;

/// Configuration loading and validation
pub mod config;

/// Command-line argument parsing for the `stubdns` binary
pub mod cli;

/// Error types and handling
///
/// Provides unified error types for the entire crate.
pub mod error {

    use std::net::SocketAddr;
    use std::time::Duration;
    use thiserror::Error;

    /// Main error type for stubdns
    #[derive(Error, Debug)]
    pub enum Error {
        // ============ Hostname Errors ============
        /// Hostname failed label-syntax validation
        #[error("Invalid hostname: {hostname}")]
        InvalidHostname {
            /// The rejected hostname
            hostname: String,
        },

        /// A domain name label exceeded the 63-byte wire limit
        #[error("Label too long ({len} bytes): {label}")]
        LabelTooLong {
            /// The offending label
            label: String,
            /// Its length in bytes
            len: usize,
        },

        // ============ Wire Format Errors ============
        /// Message shorter than the fixed DNS header
        #[error("Truncated message: need {expected} bytes, got {actual}")]
        Truncated {
            /// Bytes required
            expected: usize,
            /// Bytes available
            actual: usize,
        },

        /// Message failed to decode (bad offsets, pointer cycle, RDATA overrun)
        #[error("Malformed message: {0}")]
        MalformedMessage(String),

        // ============ Session Errors ============
        /// Socket bind/send/receive failure
        #[error("Socket error: {0}")]
        Io(#[from] std::io::Error),

        /// No reply arrived before the session deadline
        #[error("Query timed out: {upstream} ({timeout_ms}ms)")]
        TimedOut {
            /// The resolver address queried
            upstream: String,
            /// Deadline in milliseconds
            timeout_ms: u64,
        },

        /// The caller withdrew interest before a result was delivered
        #[error("Query cancelled")]
        Cancelled,

        // ============ Configuration Errors ============
        /// Configuration error
        #[error("Configuration error: {0}")]
        Config(String),
    }

    impl Error {
        /// Create a MalformedMessage error
        pub fn malformed(reason: impl Into<String>) -> Self {
            Self::MalformedMessage(reason.into())
        }

        /// Create a TimedOut error for a query against `upstream`
        pub fn timed_out(upstream: SocketAddr, timeout: Duration) -> Self {
            Self::TimedOut {
                upstream: upstream.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }
        }

        /// Create an InvalidHostname error
        pub fn invalid_hostname(hostname: impl Into<String>) -> Self {
            Self::InvalidHostname {
                hostname: hostname.into(),
            }
        }

        /// Check if this error is recoverable (the caller may retry)
        pub fn is_recoverable(&self) -> bool {
            matches!(self, Error::TimedOut { .. } | Error::Io(_))
        }

        /// Check if this error means the reply could not be decoded
        pub fn is_parse_error(&self) -> bool {
            matches!(self, Error::Truncated { .. } | Error::MalformedMessage(_))
        }
    }

    /// Result type for stubdns operations
    pub type Result<T> = std::result::Result<T, Error>;
}

// Re-export commonly used types
pub use error::{Error, Result};
