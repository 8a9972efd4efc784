//! DNS domain name encoding and decoding
//!
//! Domain names on the wire are a sequence of length-prefixed labels
//! terminated by a zero byte (RFC 1035 section 3.1). Inside a message a name
//! may also end in a 2-byte compression pointer (section 4.1.4) referencing
//! an earlier occurrence; decoding follows those pointers.

use crate::{Error, Result};

/// Maximum encoded length of a domain name, terminator included
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length of a single label
pub const MAX_LABEL_LEN: usize = 63;

/// Bound on compression pointer chasing. Legitimate messages need a handful
/// of hops at most; a chain this deep is a cycle.
const MAX_POINTER_HOPS: usize = 16;

/// Encode a domain name into wire format
///
/// Splits `name` on `.`, stripping a single trailing dot, and emits each
/// label as a length byte followed by the label bytes, terminated by a zero
/// byte.
///
/// # Errors
///
/// Returns [`Error::LabelTooLong`] if any label exceeds 63 bytes and
/// [`Error::InvalidHostname`] if the encoded name exceeds 255 bytes.
///
/// # Example
///
/// ```
/// use stubdns::dns::name::encode_name;
///
/// let wire = encode_name("example.com").unwrap();
/// assert_eq!(wire, b"\x07example\x03com\x00");
/// ```
pub fn encode_name(name: &str) -> Result<Vec<u8>> {
    let name = name.strip_suffix('.').unwrap_or(name);
    let mut out = Vec::with_capacity(name.len() + 2);

    if !name.is_empty() {
        for label in name.split('.') {
            let bytes = label.as_bytes();
            if bytes.len() > MAX_LABEL_LEN {
                return Err(Error::LabelTooLong {
                    label: label.to_string(),
                    len: bytes.len(),
                });
            }
            out.push(bytes.len() as u8);
            out.extend_from_slice(bytes);
        }
    }
    out.push(0);

    if out.len() > MAX_NAME_LEN {
        return Err(Error::invalid_hostname(name));
    }
    Ok(out)
}

/// Decode a domain name at `offset` within a message buffer
///
/// Returns the number of bytes the name occupies *at* `offset` and the
/// decoded dotted name. A compression pointer consumes exactly 2 bytes at
/// its location, regardless of how long the pointed-to suffix is.
///
/// Pointer chains are depth-bounded; a chain that exceeds the bound (a
/// cycle) or any read past the end of the buffer fails with
/// [`Error::MalformedMessage`].
pub fn decode_name(buf: &[u8], offset: usize) -> Result<(usize, String)> {
    decode_at(buf, offset, 0)
}

fn decode_at(buf: &[u8], offset: usize, hops: usize) -> Result<(usize, String)> {
    if hops > MAX_POINTER_HOPS {
        return Err(Error::malformed("compression pointer chain too deep"));
    }

    let mut pos = offset;
    let mut labels: Vec<String> = Vec::new();
    let mut decoded_len = 0usize;

    loop {
        let len = *buf
            .get(pos)
            .ok_or_else(|| Error::malformed("name runs past end of message"))?
            as usize;

        if len == 0 {
            pos += 1;
            break;
        }

        if len & 0xC0 == 0xC0 {
            let low = *buf
                .get(pos + 1)
                .ok_or_else(|| Error::malformed("pointer runs past end of message"))?
                as usize;
            let target = ((len & 0x3F) << 8) | low;
            let (_, suffix) = decode_at(buf, target, hops + 1)?;
            if !suffix.is_empty() {
                labels.push(suffix);
            }
            // The pointer terminates the name at this location.
            pos += 2;
            return Ok((pos - offset, labels.join(".")));
        }

        let end = pos + 1 + len;
        let bytes = buf
            .get(pos + 1..end)
            .ok_or_else(|| Error::malformed("label runs past end of message"))?;
        decoded_len += len + 1;
        if decoded_len > MAX_NAME_LEN {
            return Err(Error::malformed("decoded name exceeds 255 bytes"));
        }
        labels.push(String::from_utf8_lossy(bytes).into_owned());
        pos = end;
    }

    Ok((pos - offset, labels.join(".")))
}

/// Check whether `hostname` is syntactically valid
///
/// A name longer than 255 bytes is invalid. A trailing dot is stripped
/// before checking. Each remaining label must be 1-63 bytes of
/// `[A-Za-z0-9-]` and must not start or end with `-`.
///
/// # Example
///
/// ```
/// use stubdns::dns::name::is_valid_hostname;
///
/// assert!(is_valid_hostname("example.com"));
/// assert!(!is_valid_hostname("-bad.com"));
/// ```
pub fn is_valid_hostname(hostname: &str) -> bool {
    if hostname.len() > MAX_NAME_LEN {
        return false;
    }
    let hostname = hostname.strip_suffix('.').unwrap_or(hostname);
    if hostname.is_empty() {
        return false;
    }
    hostname.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}
