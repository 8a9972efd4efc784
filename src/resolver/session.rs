//! Per-query UDP session
//!
//! A [`QuerySession`] owns one outstanding UDP exchange: it binds a fresh
//! socket on an ephemeral port, sends a single query datagram, and awaits
//! exactly one matching reply or the deadline. The socket is owned by the
//! session and released when the session future completes or is dropped,
//! which also makes cancellation safe: dropping the future at its one
//! suspension point closes the socket.
//!
//! A reply is accepted only if it arrives on the session's own socket. The
//! OS guarantees the ephemeral local port is distinct from every other
//! concurrently open socket, so no cross-session registry is needed to
//! route replies; the transaction id check below guards against stray
//! datagrams on this socket, not against other sessions.

use crate::dns::{build_query, parse_response, DnsResponse, RecordType};
use crate::{Error, Result};
use std::fmt;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tokio::time::{timeout_at, Duration, Instant};
use tracing::{debug, warn};

/// Largest reply datagram the session will accept (classic DNS over UDP)
const MAX_DATAGRAM: usize = 512;

/// Lifecycle of a query session
///
/// `Completed`, `Failed` and `TimedOut` are terminal; cancellation drops
/// the session future, so it never observes a terminal state itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed, nothing sent yet
    Created,
    /// Query datagram written to the socket
    Sent,
    /// Waiting for a reply or the deadline
    AwaitingReply,
    /// A reply was parsed and delivered
    Completed,
    /// Socket or parse failure
    Failed,
    /// Deadline elapsed without a matching reply
    TimedOut,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Created => "created",
            SessionState::Sent => "sent",
            SessionState::AwaitingReply => "awaiting-reply",
            SessionState::Completed => "completed",
            SessionState::Failed => "failed",
            SessionState::TimedOut => "timed-out",
        };
        f.write_str(name)
    }
}

/// One outstanding hostname query over UDP
pub struct QuerySession {
    id: u64,
    hostname: String,
    qtype: RecordType,
    server: SocketAddr,
    timeout: Duration,
    state: SessionState,
}

impl QuerySession {
    /// Create a session for one hostname query
    pub fn new(
        id: u64,
        hostname: impl Into<String>,
        qtype: RecordType,
        server: SocketAddr,
        timeout: Duration,
    ) -> Self {
        Self {
            id,
            hostname: hostname.into(),
            qtype,
            server,
            timeout,
            state: SessionState::Created,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run the session to its terminal state
    ///
    /// Sends the query and awaits one matching reply or the deadline.
    /// Replies whose transaction id does not match are discarded and the
    /// wait continues. The socket is released on every exit path.
    pub async fn run(mut self) -> Result<DnsResponse> {
        let outcome = self.exchange().await;

        self.state = match &outcome {
            Ok(_) => SessionState::Completed,
            Err(Error::TimedOut { .. }) => SessionState::TimedOut,
            Err(_) => SessionState::Failed,
        };
        match &outcome {
            Ok(response) => debug!(
                session = self.id,
                hostname = %self.hostname,
                state = %self.state,
                answers = response.answers.len(),
                rcode = %response.rcode,
                "session finished"
            ),
            Err(e) => warn!(
                session = self.id,
                hostname = %self.hostname,
                state = %self.state,
                error = %e,
                "session failed"
            ),
        }
        outcome
    }

    async fn exchange(&mut self) -> Result<DnsResponse> {
        // A fresh socket per session; the ephemeral port is the reply route.
        let bind_addr: SocketAddr = if self.server.is_ipv4() {
            "0.0.0.0:0".parse().expect("static address")
        } else {
            "[::]:0".parse().expect("static address")
        };
        let socket = UdpSocket::bind(bind_addr).await?;

        let (query_id, query) = build_query(&self.hostname, self.qtype)?;
        socket.send_to(&query, self.server).await?;
        self.state = SessionState::Sent;
        debug!(
            session = self.id,
            hostname = %self.hostname,
            qtype = %self.qtype,
            server = %self.server,
            query_id,
            "query sent"
        );

        self.state = SessionState::AwaitingReply;
        let deadline = Instant::now() + self.timeout;
        let mut buf = [0u8; MAX_DATAGRAM];

        loop {
            let (len, peer) = match timeout_at(deadline, socket.recv_from(&mut buf)).await {
                Ok(Ok(received)) => received,
                Ok(Err(e)) => return Err(Error::Io(e)),
                Err(_) => return Err(Error::timed_out(self.server, self.timeout)),
            };
            debug!(session = self.id, len, %peer, "datagram received");

            let response = parse_response(&buf[..len])?;
            if response.id != query_id {
                debug!(
                    session = self.id,
                    expected = query_id,
                    got = response.id,
                    "transaction id mismatch, discarding"
                );
                continue;
            }
            return Ok(response);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{encode_name, parse_header, HEADER_LEN};

    /// Spawn a UDP responder that transforms each incoming query with `f`.
    async fn spawn_responder<F>(f: F) -> SocketAddr
    where
        F: Fn(&[u8]) -> Option<Vec<u8>> + Send + 'static,
    {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        tokio::spawn(async move {
            let mut buf = [0u8; 512];
            while let Ok((len, peer)) = socket.recv_from(&mut buf).await {
                if let Some(reply) = f(&buf[..len]) {
                    let _ = socket.send_to(&reply, peer).await;
                }
            }
        });
        addr
    }

    /// Minimal reply: echo id and question, answer with one A record.
    fn echo_reply(query: &[u8], addr_octets: [u8; 4]) -> Option<Vec<u8>> {
        let header = parse_header(query).ok()?;
        let question = &query[HEADER_LEN..];

        let mut reply = Vec::new();
        reply.extend_from_slice(&header.id.to_be_bytes());
        reply.extend_from_slice(&[0x80, 0x00]);
        reply.extend_from_slice(&1u16.to_be_bytes());
        reply.extend_from_slice(&1u16.to_be_bytes());
        reply.extend_from_slice(&0u16.to_be_bytes());
        reply.extend_from_slice(&0u16.to_be_bytes());
        reply.extend_from_slice(question);
        reply.extend_from_slice(&[0xC0, 0x0C]); // name: pointer to the question
        reply.extend_from_slice(&1u16.to_be_bytes());
        reply.extend_from_slice(&1u16.to_be_bytes());
        reply.extend_from_slice(&60i32.to_be_bytes());
        reply.extend_from_slice(&4u16.to_be_bytes());
        reply.extend_from_slice(&addr_octets);
        Some(reply)
    }

    #[tokio::test]
    async fn test_session_completes() {
        let server = spawn_responder(|query| echo_reply(query, [192, 0, 2, 7])).await;

        let session = QuerySession::new(
            1,
            "example.com",
            RecordType::A,
            server,
            Duration::from_secs(2),
        );
        let response = session.run().await.unwrap();

        assert_eq!(response.hostname, "example.com");
        assert_eq!(
            response.addresses().collect::<Vec<_>>(),
            vec!["192.0.2.7"]
        );
    }

    #[tokio::test]
    async fn test_session_times_out() {
        // Responder that swallows everything.
        let server = spawn_responder(|_| None).await;

        let session = QuerySession::new(
            2,
            "example.com",
            RecordType::A,
            server,
            Duration::from_millis(100),
        );
        let err = session.run().await.unwrap_err();
        assert!(matches!(err, Error::TimedOut { .. }));
    }

    #[tokio::test]
    async fn test_session_rejects_malformed_reply() {
        // Header claims one answer that is not there.
        let server = spawn_responder(|query| {
            let header = parse_header(query).ok()?;
            let mut reply = Vec::new();
            reply.extend_from_slice(&header.id.to_be_bytes());
            reply.extend_from_slice(&[0x80, 0x00]);
            reply.extend_from_slice(&0u16.to_be_bytes());
            reply.extend_from_slice(&1u16.to_be_bytes());
            reply.extend_from_slice(&0u16.to_be_bytes());
            reply.extend_from_slice(&0u16.to_be_bytes());
            Some(reply)
        })
        .await;

        let session = QuerySession::new(
            3,
            "example.com",
            RecordType::A,
            server,
            Duration::from_secs(2),
        );
        let err = session.run().await.unwrap_err();
        assert!(matches!(err, Error::MalformedMessage(_)));
    }

    #[tokio::test]
    async fn test_session_discards_mismatched_id_then_times_out() {
        // Replies carry a flipped transaction id; the session must not
        // accept them and eventually hits its deadline.
        let server = spawn_responder(|query| {
            let header = parse_header(query).ok()?;
            let bad_id = header.id.wrapping_add(1);

            let mut reply = Vec::new();
            reply.extend_from_slice(&bad_id.to_be_bytes());
            reply.extend_from_slice(&[0x80, 0x00]);
            reply.extend_from_slice(&1u16.to_be_bytes());
            reply.extend_from_slice(&0u16.to_be_bytes());
            reply.extend_from_slice(&0u16.to_be_bytes());
            reply.extend_from_slice(&0u16.to_be_bytes());
            reply.extend_from_slice(&encode_name("example.com").unwrap());
            reply.extend_from_slice(&1u16.to_be_bytes());
            reply.extend_from_slice(&1u16.to_be_bytes());
            Some(reply)
        })
        .await;

        let session = QuerySession::new(
            4,
            "example.com",
            RecordType::A,
            server,
            Duration::from_millis(200),
        );
        let err = session.run().await.unwrap_err();
        assert!(matches!(err, Error::TimedOut { .. }));
    }

    #[tokio::test]
    async fn test_session_passes_nxdomain_through() {
        let server = spawn_responder(|query| {
            let header = parse_header(query).ok()?;
            let question = &query[HEADER_LEN..];

            let mut reply = Vec::new();
            reply.extend_from_slice(&header.id.to_be_bytes());
            reply.extend_from_slice(&[0x80, 0x03]); // RCODE=NXDOMAIN
            reply.extend_from_slice(&1u16.to_be_bytes());
            reply.extend_from_slice(&0u16.to_be_bytes());
            reply.extend_from_slice(&0u16.to_be_bytes());
            reply.extend_from_slice(&0u16.to_be_bytes());
            reply.extend_from_slice(question);
            Some(reply)
        })
        .await;

        let session = QuerySession::new(
            5,
            "nonexistent.example",
            RecordType::A,
            server,
            Duration::from_secs(2),
        );
        let response = session.run().await.unwrap();
        assert_eq!(response.rcode, crate::dns::ResponseCode::NXDomain);
        assert!(response.answers.is_empty());
    }

    #[test]
    fn test_initial_state() {
        let session = QuerySession::new(
            6,
            "example.com",
            RecordType::A,
            "127.0.0.1:53".parse().unwrap(),
            Duration::from_secs(1),
        );
        assert_eq!(session.state(), SessionState::Created);
    }
}
