//! DNS wire protocol implementation module
//!
//! This module implements the subset of RFC 1035 the resolver speaks:
//! - Query message construction
//! - Response message parsing (header, question, answer sections)
//! - Domain name encoding and compression-pointer decoding
//! - Hostname syntax validation
//!
//! # Example
//!
//! ```rust
//! use stubdns::dns::{build_query, parse_response, RecordType};
//!
//! let (id, query) = build_query("example.com", RecordType::A)?;
//! assert_eq!(parse_response(&query)?.id, id);
//! # Ok::<(), stubdns::Error>(())
//! ```

pub mod message;
pub mod name;
pub mod question;
pub mod record;
pub mod types;

// Re-export commonly used types
pub use message::{build_query, parse_header, parse_question, parse_record, parse_response};
pub use message::{DnsResponse, Header, HEADER_LEN};
pub use name::{decode_name, encode_name, is_valid_hostname};
pub use question::Question;
pub use record::{RData, ResourceRecord};
pub use types::{RecordClass, RecordType, ResponseCode};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_accessible() {
        let _question = Question::new("example.com", RecordType::A, RecordClass::IN);
        assert_eq!(RecordType::A.to_u16(), 1);
        assert_eq!(RecordClass::IN.to_u16(), 1);
        assert_eq!(ResponseCode::NoError.to_u8(), 0);
        assert!(is_valid_hostname("example.com"));
    }

    #[test]
    fn test_build_and_parse_accessible() {
        let (id, query) = build_query("example.com", RecordType::A).unwrap();
        let header = parse_header(&query).unwrap();
        assert_eq!(header.id, id);
    }
}
