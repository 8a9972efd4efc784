//! DNS question section implementation
//!
//! Represents a single entry of the question section of a DNS message:
//! the domain name being queried plus the query type and class.

use super::types::{RecordClass, RecordType};
use std::fmt;
use std::sync::Arc;

/// DNS question
///
/// A question specifies what information is being requested from the DNS
/// server. The resolver always sends exactly one question per query;
/// replies may echo more.
///
/// # Example
///
/// ```
/// use stubdns::dns::{Question, RecordType, RecordClass};
///
/// let question = Question::new("example.com", RecordType::A, RecordClass::IN);
/// assert_eq!(question.qname(), "example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// The domain name being queried (shared via Arc for cheap cloning)
    qname: Arc<str>,
    /// The type of record being requested
    qtype: RecordType,
    /// The class of record being requested
    qclass: RecordClass,
}

impl Question {
    /// Create a new DNS question
    pub fn new(qname: impl AsRef<str>, qtype: RecordType, qclass: RecordClass) -> Self {
        Self {
            qname: Arc::from(qname.as_ref()),
            qtype,
            qclass,
        }
    }

    /// Get the domain name being queried
    pub fn qname(&self) -> &str {
        &self.qname
    }

    /// Get the query type
    pub fn qtype(&self) -> RecordType {
        self.qtype
    }

    /// Get the query class
    pub fn qclass(&self) -> RecordClass {
        self.qclass
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.qname, self.qclass, self.qtype)
    }
}
