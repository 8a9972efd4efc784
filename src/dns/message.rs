//! DNS message construction and parsing
//!
//! Implements the RFC 1035 wire format directly: query datagrams are built
//! byte by byte and reply datagrams are decoded section by section. The
//! header layout is:
//!
//! ```text
//!                                 1  1  1  1  1  1
//!   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! |                      ID                       |
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! |QR|   Opcode  |AA|TC|RD|RA|   Z    |   RCODE   |
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! |                    QDCOUNT                    |
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! |                    ANCOUNT                    |
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! |                    NSCOUNT                    |
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! |                    ARCOUNT                    |
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! ```

use super::name;
use super::question::Question;
use super::record::{RData, ResourceRecord};
use super::types::{RecordClass, RecordType, ResponseCode};
use crate::{Error, Result};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Size of the fixed DNS header
pub const HEADER_LEN: usize = 12;

/// Decoded DNS message header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Transaction id
    pub id: u16,
    /// Query (false) or response (true)
    pub qr: bool,
    /// Operation code (4 bits)
    pub opcode: u8,
    /// Authoritative answer
    pub aa: bool,
    /// Truncation
    pub tc: bool,
    /// Recursion desired
    pub rd: bool,
    /// Recursion available
    pub ra: bool,
    /// Response code
    pub rcode: ResponseCode,
    /// Question count
    pub qdcount: u16,
    /// Answer count
    pub ancount: u16,
    /// Authority count
    pub nscount: u16,
    /// Additional count
    pub arcount: u16,
}

/// Parsed DNS response
///
/// Aggregates one resolved hostname, the questions echoed by the server,
/// and the answer records. Authority and additional sections are parsed to
/// advance the offset but not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsResponse {
    /// Transaction id echoed by the server
    pub id: u16,
    /// DNS-level status (NXDOMAIN is still a parsed response)
    pub rcode: ResponseCode,
    /// Name of the first echoed question
    pub hostname: String,
    /// Echoed question section
    pub questions: Vec<Question>,
    /// Answer section
    pub answers: Vec<ResourceRecord>,
}

impl DnsResponse {
    /// Iterate the textual addresses of all A/AAAA/CNAME/NS answers
    pub fn addresses(&self) -> impl Iterator<Item = String> + '_ {
        self.answers.iter().filter_map(|rr| rr.address())
    }
}

impl fmt::Display for DnsResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ";; id {} status {}", self.id, self.rcode)?;
        for question in &self.questions {
            writeln!(f, ";{}", question)?;
        }
        for answer in &self.answers {
            writeln!(f, "{}", answer)?;
        }
        Ok(())
    }
}

/// Build a query datagram for `hostname` and `qtype`
///
/// Generates a random 16-bit transaction id and a fixed header (QR=0,
/// Opcode=0, QDCOUNT=1, all other counts 0), followed by the encoded
/// question name and `(qtype, IN)`. Returns the id alongside the bytes so
/// the session can match the reply.
///
/// # Errors
///
/// Fails with a hostname error if the name cannot be encoded.
pub fn build_query(hostname: &str, qtype: RecordType) -> Result<(u16, Vec<u8>)> {
    let qname = name::encode_name(hostname)?;
    let id: u16 = rand::random();

    let mut buf = Vec::with_capacity(HEADER_LEN + qname.len() + 4);
    buf.extend_from_slice(&id.to_be_bytes());
    buf.extend_from_slice(&[0x00, 0x00]); // QR=0, Opcode=0, flags clear
    buf.extend_from_slice(&1u16.to_be_bytes()); // QDCOUNT
    buf.extend_from_slice(&0u16.to_be_bytes()); // ANCOUNT
    buf.extend_from_slice(&0u16.to_be_bytes()); // NSCOUNT
    buf.extend_from_slice(&0u16.to_be_bytes()); // ARCOUNT
    buf.extend_from_slice(&qname);
    buf.extend_from_slice(&qtype.to_u16().to_be_bytes());
    buf.extend_from_slice(&RecordClass::IN.to_u16().to_be_bytes());

    Ok((id, buf))
}

/// Parse the fixed 12-byte header at the start of `buf`
///
/// # Errors
///
/// Returns [`Error::Truncated`] if `buf` is shorter than 12 bytes.
pub fn parse_header(buf: &[u8]) -> Result<Header> {
    if buf.len() < HEADER_LEN {
        return Err(Error::Truncated {
            expected: HEADER_LEN,
            actual: buf.len(),
        });
    }

    let flags_hi = buf[2];
    let flags_lo = buf[3];

    Ok(Header {
        id: u16::from_be_bytes([buf[0], buf[1]]),
        qr: flags_hi & 0x80 != 0,
        opcode: (flags_hi >> 3) & 0x0F,
        aa: flags_hi & 0x04 != 0,
        tc: flags_hi & 0x02 != 0,
        rd: flags_hi & 0x01 != 0,
        ra: flags_lo & 0x80 != 0,
        rcode: ResponseCode::from_u8(flags_lo & 0x0F),
        qdcount: u16::from_be_bytes([buf[4], buf[5]]),
        ancount: u16::from_be_bytes([buf[6], buf[7]]),
        nscount: u16::from_be_bytes([buf[8], buf[9]]),
        arcount: u16::from_be_bytes([buf[10], buf[11]]),
    })
}

/// Parse one question entry at `offset`
///
/// Returns the bytes consumed and the decoded [`Question`].
pub fn parse_question(buf: &[u8], offset: usize) -> Result<(usize, Question)> {
    let (nlen, qname) = name::decode_name(buf, offset)?;

    let fixed = buf
        .get(offset + nlen..offset + nlen + 4)
        .ok_or_else(|| Error::malformed("question runs past end of message"))?;
    let qtype = RecordType::from_u16(u16::from_be_bytes([fixed[0], fixed[1]]));
    let qclass = RecordClass::from_u16(u16::from_be_bytes([fixed[2], fixed[3]]));

    Ok((nlen + 4, Question::new(qname, qtype, qclass)))
}

/// Parse one resource record at `offset`
///
/// Decodes NAME, TYPE, CLASS, TTL (signed 32-bit), RDLENGTH and the RDATA
/// payload. Returns the bytes consumed and the decoded record.
///
/// # Errors
///
/// Fails with [`Error::MalformedMessage`] if the record header or RDATA
/// would read past the end of the buffer, or if an A/AAAA payload has the
/// wrong length.
pub fn parse_record(buf: &[u8], offset: usize) -> Result<(usize, ResourceRecord)> {
    let (nlen, rname) = name::decode_name(buf, offset)?;

    let fixed = buf
        .get(offset + nlen..offset + nlen + 10)
        .ok_or_else(|| Error::malformed("record header runs past end of message"))?;
    let rtype = RecordType::from_u16(u16::from_be_bytes([fixed[0], fixed[1]]));
    let rclass = RecordClass::from_u16(u16::from_be_bytes([fixed[2], fixed[3]]));
    let ttl = i32::from_be_bytes([fixed[4], fixed[5], fixed[6], fixed[7]]);
    let rdlength = u16::from_be_bytes([fixed[8], fixed[9]]) as usize;

    let rdata_offset = offset + nlen + 10;
    let rdata = buf
        .get(rdata_offset..rdata_offset + rdlength)
        .ok_or_else(|| Error::malformed("RDATA length overruns message"))?;
    let rdata = parse_rdata(rtype, buf, rdata_offset, rdata)?;

    Ok((
        nlen + 10 + rdlength,
        ResourceRecord::new(rname, rtype, rclass, ttl, rdata),
    ))
}

/// Interpret an RDATA payload according to the record type
///
/// `buf` is the whole message: CNAME/NS payloads are names and may contain
/// compression pointers into earlier parts of the message.
fn parse_rdata(rtype: RecordType, buf: &[u8], rdata_offset: usize, rdata: &[u8]) -> Result<RData> {
    match rtype {
        RecordType::A => {
            let octets: [u8; 4] = rdata
                .try_into()
                .map_err(|_| Error::malformed("A record RDATA is not 4 bytes"))?;
            Ok(RData::A(Ipv4Addr::from(octets)))
        }
        RecordType::AAAA => {
            let octets: [u8; 16] = rdata
                .try_into()
                .map_err(|_| Error::malformed("AAAA record RDATA is not 16 bytes"))?;
            Ok(RData::AAAA(Ipv6Addr::from(octets)))
        }
        RecordType::CNAME => {
            let (_, target) = name::decode_name(buf, rdata_offset)?;
            Ok(RData::CNAME(target))
        }
        RecordType::NS => {
            let (_, target) = name::decode_name(buf, rdata_offset)?;
            Ok(RData::NS(target))
        }
        _ => Ok(RData::Other(rdata.to_vec())),
    }
}

/// Parse a complete response datagram
///
/// Walks the header, QDCOUNT questions (the first supplies
/// [`DnsResponse::hostname`]), ANCOUNT answers, and then NSCOUNT + ARCOUNT
/// records solely to keep the offset honest. Any decode failure aborts the
/// whole parse; partial results are never returned.
pub fn parse_response(buf: &[u8]) -> Result<DnsResponse> {
    let header = parse_header(buf)?;
    let mut offset = HEADER_LEN;

    let mut questions = Vec::with_capacity(header.qdcount as usize);
    for _ in 0..header.qdcount {
        let (len, question) = parse_question(buf, offset)?;
        offset += len;
        questions.push(question);
    }

    let mut answers = Vec::with_capacity(header.ancount as usize);
    for _ in 0..header.ancount {
        let (len, record) = parse_record(buf, offset)?;
        offset += len;
        answers.push(record);
    }

    // Authority and additional records are discarded, but decoding them
    // still validates the tail of the message.
    for _ in 0..header.nscount as usize + header.arcount as usize {
        let (len, _) = parse_record(buf, offset)?;
        offset += len;
    }

    let hostname = questions
        .first()
        .map(|q| q.qname().to_string())
        .unwrap_or_default();

    Ok(DnsResponse {
        id: header.id,
        rcode: header.rcode,
        hostname,
        questions,
        answers,
    })
}
