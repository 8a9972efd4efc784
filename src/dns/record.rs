//! DNS resource record implementation
//!
//! Defines resource records and their type-specific RDATA payloads as they
//! appear in the answer, authority, and additional sections of a reply.

use super::types::{RecordClass, RecordType};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

/// DNS resource record data
///
/// Only A, AAAA, CNAME and NS payloads are interpreted; anything else is
/// retained as raw bytes with no further structure imposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    /// IPv4 address (A record)
    A(Ipv4Addr),

    /// IPv6 address (AAAA record)
    AAAA(Ipv6Addr),

    /// Canonical name (CNAME record)
    CNAME(String),

    /// Name server (NS record)
    NS(String),

    /// Uninterpreted payload of any other record type
    Other(Vec<u8>),
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RData::A(addr) => write!(f, "{}", addr),
            RData::AAAA(addr) => write!(f, "{}", addr),
            RData::CNAME(name) => write!(f, "{}", name),
            RData::NS(name) => write!(f, "{}", name),
            RData::Other(bytes) => write!(f, "\\# {} bytes", bytes.len()),
        }
    }
}

/// DNS resource record
///
/// A complete record: name, type, class, TTL, and data. The TTL is signed
/// because that is how RFC 1035 lays it out on the wire.
///
/// # Example
///
/// ```
/// use stubdns::dns::{ResourceRecord, RecordType, RecordClass, RData};
/// use std::net::Ipv4Addr;
///
/// let record = ResourceRecord::new(
///     "example.com",
///     RecordType::A,
///     RecordClass::IN,
///     3600,
///     RData::A(Ipv4Addr::new(192, 0, 2, 1)),
/// );
/// assert_eq!(record.ttl(), 3600);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// Domain name (shared via Arc for cheap cloning)
    name: Arc<str>,
    /// Record type
    rtype: RecordType,
    /// Record class
    rclass: RecordClass,
    /// Time to live (seconds, signed per wire format)
    ttl: i32,
    /// Resource data
    rdata: RData,
}

impl ResourceRecord {
    /// Create a new resource record
    pub fn new(
        name: impl AsRef<str>,
        rtype: RecordType,
        rclass: RecordClass,
        ttl: i32,
        rdata: RData,
    ) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            rtype,
            rclass,
            ttl,
            rdata,
        }
    }

    /// Get the domain name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the record type
    pub fn rtype(&self) -> RecordType {
        self.rtype
    }

    /// Get the record class
    pub fn rclass(&self) -> RecordClass {
        self.rclass
    }

    /// Get the TTL
    pub fn ttl(&self) -> i32 {
        self.ttl
    }

    /// Get the resource data
    pub fn rdata(&self) -> &RData {
        &self.rdata
    }

    /// Get the record's address as text, if it carries one
    ///
    /// A and AAAA records yield their address in presentation form;
    /// CNAME and NS yield the nested name; other types yield `None`.
    pub fn address(&self) -> Option<String> {
        match &self.rdata {
            RData::A(addr) => Some(addr.to_string()),
            RData::AAAA(addr) => Some(addr.to_string()),
            RData::CNAME(name) | RData::NS(name) => Some(name.clone()),
            RData::Other(_) => None,
        }
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.name, self.ttl, self.rclass, self.rtype, self.rdata
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_record_creation() {
        let record = ResourceRecord::new(
            "example.com",
            RecordType::A,
            RecordClass::IN,
            3600,
            RData::A(Ipv4Addr::new(192, 0, 2, 1)),
        );

        assert_eq!(record.name(), "example.com");
        assert_eq!(record.rtype(), RecordType::A);
        assert_eq!(record.rclass(), RecordClass::IN);
        assert_eq!(record.ttl(), 3600);
        assert_eq!(record.rdata(), &RData::A(Ipv4Addr::new(192, 0, 2, 1)));
    }

    #[test]
    fn test_record_display() {
        let record = ResourceRecord::new(
            "example.com",
            RecordType::A,
            RecordClass::IN,
            3600,
            RData::A(Ipv4Addr::new(192, 0, 2, 1)),
        );

        let display = format!("{}", record);
        assert!(display.contains("example.com"));
        assert!(display.contains("3600"));
        assert!(display.contains("IN"));
        assert!(display.contains("192.0.2.1"));
    }

    #[test]
    fn test_address_presentation() {
        let a = ResourceRecord::new(
            "example.com",
            RecordType::A,
            RecordClass::IN,
            60,
            RData::A(Ipv4Addr::new(93, 184, 216, 34)),
        );
        assert_eq!(a.address().as_deref(), Some("93.184.216.34"));

        let aaaa = ResourceRecord::new(
            "example.com",
            RecordType::AAAA,
            RecordClass::IN,
            60,
            RData::AAAA(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1)),
        );
        assert_eq!(aaaa.address().as_deref(), Some("2001:db8::1"));

        let cname = ResourceRecord::new(
            "www.example.com",
            RecordType::CNAME,
            RecordClass::IN,
            60,
            RData::CNAME("example.com".to_string()),
        );
        assert_eq!(cname.address().as_deref(), Some("example.com"));

        let other = ResourceRecord::new(
            "example.com",
            RecordType::Unknown(16),
            RecordClass::IN,
            60,
            RData::Other(vec![1, 2, 3]),
        );
        assert_eq!(other.address(), None);
    }

    #[test]
    fn test_negative_ttl_is_representable() {
        // The wire format makes the TTL signed; keep whatever arrived.
        let record = ResourceRecord::new(
            "example.com",
            RecordType::A,
            RecordClass::IN,
            -1,
            RData::A(Ipv4Addr::LOCALHOST),
        );
        assert_eq!(record.ttl(), -1);
    }
}
