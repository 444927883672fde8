//! Telnet adapter for the modem's diagnostic shell.
//!
//! Each call to [`TelnetSource::fetch`] opens a fresh connection, logs in,
//! drops into the root shell and runs the diagnostic and uptime commands.
//! Telnet option negotiation is refused, as a plain telnet client does, and
//! stripped from the data handed back.
//!
//! ## Example
//!
//! ```rust,no_run
//! use modemstats_adapters::telnet::TelnetSource;
//! use modemstats_adapters::StatsSource;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = TelnetSource::builder()
//!         .host("192.168.100.1")
//!         .credentials("admin", "admin")
//!         .timeout(Duration::from_secs(30))
//!         .build();
//!
//!     let raw = source.fetch().await?;
//!     println!("{} bytes of diagnostics", raw.diagnostics.len());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, trace};

use crate::{RawStats, StatsSource, TransportError};

const IAC: u8 = 255;
const DONT: u8 = 254;
const DO: u8 = 253;
const WONT: u8 = 252;
const WILL: u8 = 251;
const SB: u8 = 250;
const SE: u8 = 240;
const NUL: u8 = 0;
const XON: u8 = 0x11;

/// Prompts and commands of the modem's login sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionScript {
    pub login_prompt: String,
    pub password_prompt: String,
    /// Prompt of the vendor CLI reached after login.
    pub cli_prompt: String,
    /// Command that drops from the vendor CLI into a shell.
    pub shell_command: String,
    /// Prompt of that shell. Command output is read up to its next occurrence.
    pub shell_prompt: String,
    pub diagnostic_command: String,
    pub uptime_command: String,
}

impl Default for SessionScript {
    fn default() -> Self {
        Self {
            login_prompt: "Login:".to_string(),
            password_prompt: "Password:".to_string(),
            cli_prompt: "ATP>".to_string(),
            shell_command: "sh".to_string(),
            shell_prompt: "#".to_string(),
            diagnostic_command: "xdslcmd info --stats".to_string(),
            uptime_command: "cat /proc/uptime".to_string(),
        }
    }
}

/// Telnet adapter that fetches raw statistics from the modem.
#[derive(Debug, Clone)]
pub struct TelnetSource {
    addr: String,
    username: String,
    password: String,
    timeout: Option<Duration>,
    script: SessionScript,
    description: String,
}

impl TelnetSource {
    /// Create a new builder for configuring the source.
    pub fn builder() -> TelnetSourceBuilder {
        TelnetSourceBuilder::default()
    }

    /// The `host:port` this source connects to.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    async fn connect(&self) -> Result<TcpStream, TransportError> {
        let connect = TcpStream::connect(&self.addr);
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, connect).await.map_err(|_| {
                TransportError::Timeout {
                    waiting_for: format!("connection to {}", self.addr),
                }
            })?,
            None => connect.await,
        };

        result.map_err(|source| TransportError::Connect {
            addr: self.addr.clone(),
            source,
        })
    }
}

#[async_trait]
impl StatsSource for TelnetSource {
    async fn fetch(&self) -> Result<RawStats, TransportError> {
        debug!(addr = %self.addr, "opening telnet session");
        let stream = self.connect().await?;
        let mut session = TelnetSession::new(stream, self.timeout);
        let raw = session
            .run(&self.script, &self.username, &self.password)
            .await?;
        debug!(
            diagnostics = raw.diagnostics.len(),
            uptime = raw.uptime.len(),
            "telnet session complete"
        );
        Ok(raw)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for TelnetSource.
#[derive(Debug, Default)]
pub struct TelnetSourceBuilder {
    host: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    timeout: Option<Duration>,
    script: Option<SessionScript>,
}

impl TelnetSourceBuilder {
    /// Set the modem host (default: "192.168.100.1").
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the telnet port (default: 23).
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the login username and password.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Bound the connect and every prompt wait. Unset means wait forever.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace the prompts and commands of the login sequence.
    pub fn script(mut self, script: SessionScript) -> Self {
        self.script = Some(script);
        self
    }

    /// Build the source.
    pub fn build(self) -> TelnetSource {
        let host = self.host.unwrap_or_else(|| "192.168.100.1".to_string());
        let port = self.port.unwrap_or(23);
        let addr = format!("{}:{}", host, port);

        TelnetSource {
            description: format!("telnet://{}", addr),
            addr,
            username: self.username.unwrap_or_else(|| "admin".to_string()),
            password: self.password.unwrap_or_else(|| "admin".to_string()),
            timeout: self.timeout,
            script: self.script.unwrap_or_default(),
        }
    }
}

/// A telnet conversation over any byte stream.
#[derive(Debug)]
pub struct TelnetSession<S> {
    stream: S,
    decoder: TelnetDecoder,
    /// Decoded bytes not yet returned by a read.
    pending: Vec<u8>,
    timeout: Option<Duration>,
}

impl<S> TelnetSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap a connected stream.
    pub fn new(stream: S, timeout: Option<Duration>) -> Self {
        Self {
            stream,
            decoder: TelnetDecoder::default(),
            pending: Vec::new(),
            timeout,
        }
    }

    /// Log in and run both commands of the script.
    pub async fn run(
        &mut self,
        script: &SessionScript,
        username: &str,
        password: &str,
    ) -> Result<RawStats, TransportError> {
        self.read_until(&script.login_prompt).await?;
        self.write_line(username).await?;
        self.read_until(&script.password_prompt).await?;
        self.write_line(password).await?;

        let (matched, _) = self
            .read_until_any(&[&script.cli_prompt, &script.login_prompt])
            .await?;
        if matched == 1 {
            return Err(TransportError::LoginRejected {
                username: username.to_string(),
            });
        }

        self.write_line(&script.shell_command).await?;
        self.read_until(&script.shell_prompt).await?;

        self.write_line(&script.diagnostic_command).await?;
        let diagnostics = self.read_until(&script.shell_prompt).await?;

        self.write_line(&script.uptime_command).await?;
        let uptime = self.read_until(&script.shell_prompt).await?;

        Ok(RawStats {
            diagnostics,
            uptime,
        })
    }

    /// Send a line terminated by `\n`, doubling any IAC byte.
    pub async fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        let mut out = Vec::with_capacity(line.len() + 1);
        for &b in line.as_bytes() {
            out.push(b);
            if b == IAC {
                out.push(IAC);
            }
        }
        out.push(b'\n');
        self.stream.write_all(&out).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Read until `pattern` appears; returns everything up to and including it.
    pub async fn read_until(&mut self, pattern: &str) -> Result<Vec<u8>, TransportError> {
        let (_, data) = self.read_until_any(&[pattern]).await?;
        Ok(data)
    }

    /// Read until the first of `patterns` appears.
    ///
    /// Returns the index of the pattern that matched and everything up to and
    /// including it. Bytes after the match stay buffered for the next read.
    pub async fn read_until_any(
        &mut self,
        patterns: &[&str],
    ) -> Result<(usize, Vec<u8>), TransportError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.fill_until(patterns))
                .await
                .map_err(|_| TransportError::Timeout {
                    waiting_for: patterns.join(" | "),
                })?,
            None => self.fill_until(patterns).await,
        }
    }

    async fn fill_until(&mut self, patterns: &[&str]) -> Result<(usize, Vec<u8>), TransportError> {
        let mut chunk = [0u8; 1024];
        loop {
            if let Some((index, end)) = earliest_match(&self.pending, patterns) {
                let data: Vec<u8> = self.pending.drain(..end).collect();
                trace!(pattern = patterns[index], bytes = data.len(), "prompt matched");
                return Ok((index, data));
            }

            let n = self.stream.read(&mut chunk).await?;
            if n == 0 {
                return Err(TransportError::Closed {
                    waiting_for: patterns.join(" | "),
                });
            }

            let mut replies = Vec::new();
            self.decoder
                .feed(&chunk[..n], &mut self.pending, &mut replies);
            if !replies.is_empty() {
                self.stream.write_all(&replies).await?;
                self.stream.flush().await?;
            }
        }
    }
}

/// Find the pattern that ends first in `haystack`; returns its index and the
/// end offset of the match.
fn earliest_match(haystack: &[u8], patterns: &[&str]) -> Option<(usize, usize)> {
    patterns
        .iter()
        .enumerate()
        .filter_map(|(i, p)| find(haystack, p.as_bytes()).map(|pos| (i, pos + p.len())))
        .min_by_key(|&(_, end)| end)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum DecodeState {
    #[default]
    Data,
    Iac,
    Option(u8),
    Sub,
    SubIac,
}

/// Strips telnet commands out of the byte stream and refuses every option.
#[derive(Debug, Default)]
pub struct TelnetDecoder {
    state: DecodeState,
}

impl TelnetDecoder {
    /// Decode `input`, appending data bytes to `data` and negotiation
    /// replies to `replies`. State carries over between calls, so commands
    /// split across reads are handled.
    pub fn feed(&mut self, input: &[u8], data: &mut Vec<u8>, replies: &mut Vec<u8>) {
        for &b in input {
            self.state = match self.state {
                DecodeState::Data => match b {
                    IAC => DecodeState::Iac,
                    NUL | XON => DecodeState::Data,
                    _ => {
                        data.push(b);
                        DecodeState::Data
                    }
                },
                DecodeState::Iac => match b {
                    IAC => {
                        data.push(IAC);
                        DecodeState::Data
                    }
                    DO | DONT | WILL | WONT => DecodeState::Option(b),
                    SB => DecodeState::Sub,
                    _ => DecodeState::Data,
                },
                DecodeState::Option(cmd) => {
                    let reply = if cmd == DO || cmd == DONT { WONT } else { DONT };
                    replies.extend_from_slice(&[IAC, reply, b]);
                    DecodeState::Data
                }
                DecodeState::Sub => match b {
                    IAC => DecodeState::SubIac,
                    _ => DecodeState::Sub,
                },
                DecodeState::SubIac => match b {
                    SE => DecodeState::Data,
                    _ => DecodeState::Sub,
                },
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{link_up_dump, UPTIME};
    use tokio::io::{AsyncBufReadExt, BufReader, DuplexStream};

    const ECHO: u8 = 1;
    const SUPPRESS_GO_AHEAD: u8 = 3;

    fn decode(input: &[u8]) -> (Vec<u8>, Vec<u8>) {
        let mut decoder = TelnetDecoder::default();
        let mut data = Vec::new();
        let mut replies = Vec::new();
        decoder.feed(input, &mut data, &mut replies);
        (data, replies)
    }

    #[test]
    fn test_decoder_refuses_options() {
        let (data, replies) = decode(&[
            IAC, DO, ECHO, b'h', IAC, WILL, SUPPRESS_GO_AHEAD, b'i', IAC, DONT, ECHO, IAC, WONT,
            ECHO,
        ]);
        assert_eq!(data, b"hi");
        assert_eq!(
            replies,
            [IAC, WONT, ECHO, IAC, DONT, SUPPRESS_GO_AHEAD, IAC, WONT, ECHO, IAC, DONT, ECHO]
        );
    }

    #[test]
    fn test_decoder_skips_subnegotiation_and_nul() {
        let (data, replies) = decode(&[
            b'a', IAC, SB, 24, 1, IAC, IAC, 7, IAC, SE, b'b', b'\r', NUL, b'c',
        ]);
        assert_eq!(data, b"ab\rc");
        assert!(replies.is_empty());
    }

    #[test]
    fn test_decoder_unescapes_iac() {
        let (data, _) = decode(&[b'x', IAC, IAC, b'y']);
        assert_eq!(data, [b'x', IAC, b'y']);
    }

    #[test]
    fn test_decoder_handles_commands_split_across_reads() {
        let mut decoder = TelnetDecoder::default();
        let mut data = Vec::new();
        let mut replies = Vec::new();
        decoder.feed(&[b'a', IAC], &mut data, &mut replies);
        decoder.feed(&[DO], &mut data, &mut replies);
        decoder.feed(&[ECHO, b'b'], &mut data, &mut replies);
        assert_eq!(data, b"ab");
        assert_eq!(replies, [IAC, WONT, ECHO]);
    }

    #[test]
    fn test_earliest_match_prefers_first_to_end() {
        assert_eq!(earliest_match(b"xx Login: ATP>", &["ATP>", "Login:"]), Some((1, 9)));
        assert_eq!(earliest_match(b"ATP>", &["ATP>", "Login:"]), Some((0, 4)));
        assert_eq!(earliest_match(b"nothing", &["ATP>"]), None);
    }

    #[test]
    fn test_builder_defaults() {
        let source = TelnetSource::builder().build();
        assert_eq!(source.addr(), "192.168.100.1:23");
        assert_eq!(source.username, "admin");
        assert_eq!(source.password, "admin");
        assert_eq!(source.timeout, None);
        assert_eq!(source.script, SessionScript::default());
        assert_eq!(source.description(), "telnet://192.168.100.1:23");
    }

    #[test]
    fn test_builder_custom() {
        let source = TelnetSource::builder()
            .host("10.0.0.138")
            .port(2323)
            .credentials("root", "secret")
            .timeout(Duration::from_secs(5))
            .build();
        assert_eq!(source.addr(), "10.0.0.138:2323");
        assert_eq!(source.username, "root");
        assert_eq!(source.password, "secret");
        assert_eq!(source.timeout, Some(Duration::from_secs(5)));
    }

    async fn read_line(reader: &mut BufReader<tokio::io::ReadHalf<DuplexStream>>) -> Vec<u8> {
        let mut line = Vec::new();
        reader.read_until(b'\n', &mut line).await.unwrap();
        line
    }

    /// Plays the modem side of a successful session.
    async fn fake_modem(server: DuplexStream, diagnostics: Vec<u8>) -> Vec<Vec<u8>> {
        let (r, mut w) = tokio::io::split(server);
        let mut reader = BufReader::new(r);
        let mut received = Vec::new();

        w.write_all(&[IAC, DO, ECHO]).await.unwrap();
        w.write_all(b"\r\nLogin:").await.unwrap();
        received.push(read_line(&mut reader).await);
        w.write_all(b"Password:").await.unwrap();
        received.push(read_line(&mut reader).await);
        w.write_all(b"\r\nWAP>ATP>").await.unwrap();
        received.push(read_line(&mut reader).await);
        w.write_all(b"sh\r\n\r\nBusyBox v1.9.1 built-in shell (ash)\r\n\r\n#")
            .await
            .unwrap();
        received.push(read_line(&mut reader).await);
        w.write_all(&diagnostics).await.unwrap();
        received.push(read_line(&mut reader).await);
        w.write_all(UPTIME.as_bytes()).await.unwrap();
        received
    }

    #[tokio::test]
    async fn test_session_runs_script() {
        let (client, server) = tokio::io::duplex(64 * 1024);
        let modem = tokio::spawn(fake_modem(server, link_up_dump()));

        let mut session = TelnetSession::new(client, Some(Duration::from_secs(5)));
        let raw = session
            .run(&SessionScript::default(), "admin", "hunter2")
            .await
            .unwrap();

        assert_eq!(raw.diagnostics, link_up_dump());
        assert_eq!(raw.uptime, UPTIME.as_bytes());

        let received = modem.await.unwrap();
        assert_eq!(received[0], [IAC, WONT, ECHO, b'a', b'd', b'm', b'i', b'n', b'\n']);
        assert_eq!(received[1], b"hunter2\n");
        assert_eq!(received[2], b"sh\n");
        assert_eq!(received[3], b"xdslcmd info --stats\n");
        assert_eq!(received[4], b"cat /proc/uptime\n");
    }

    #[tokio::test]
    async fn test_session_reports_rejected_login() {
        let (client, server) = tokio::io::duplex(1024);
        tokio::spawn(async move {
            let (r, mut w) = tokio::io::split(server);
            let mut reader = BufReader::new(r);
            w.write_all(b"Login:").await.unwrap();
            read_line(&mut reader).await;
            w.write_all(b"Password:").await.unwrap();
            read_line(&mut reader).await;
            w.write_all(b"\r\nLogin incorrect\r\nLogin:").await.unwrap();
            // Hold the connection open until the client gives up.
            read_line(&mut reader).await;
        });

        let mut session = TelnetSession::new(client, None);
        let err = session
            .run(&SessionScript::default(), "admin", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::LoginRejected { username } if username == "admin"));
    }

    #[tokio::test]
    async fn test_session_reports_closed_connection() {
        let (client, server) = tokio::io::duplex(1024);
        tokio::spawn(async move {
            let (_r, mut w) = tokio::io::split(server);
            w.write_all(b"Welcome\r\n").await.unwrap();
        });

        let mut session = TelnetSession::new(client, None);
        let err = session.read_until("Login:").await.unwrap_err();
        assert!(matches!(err, TransportError::Closed { waiting_for } if waiting_for == "Login:"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_times_out_waiting_for_prompt() {
        let (client, _server) = tokio::io::duplex(1024);
        let mut session = TelnetSession::new(client, Some(Duration::from_secs(30)));
        let err = session.read_until("Login:").await.unwrap_err();
        assert!(matches!(err, TransportError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_leftover_bytes_are_kept_for_next_read() {
        let (client, mut server) = tokio::io::duplex(1024);
        server.write_all(b"one# two#").await.unwrap();

        let mut session = TelnetSession::new(client, None);
        assert_eq!(session.read_until("#").await.unwrap(), b"one#");
        assert_eq!(session.read_until("#").await.unwrap(), b" two#");
    }

    #[tokio::test]
    async fn test_write_line_escapes_iac() {
        let (client, mut server) = tokio::io::duplex(1024);
        let mut session = TelnetSession::new(client, None);
        session.write_line("a\u{ff}").await.unwrap();
        drop(session);

        let mut buf = Vec::new();
        server.read_to_end(&mut buf).await.unwrap();
        // U+00FF is two UTF-8 bytes, neither of which is IAC.
        assert_eq!(buf, "a\u{ff}\n".as_bytes());
    }

    #[tokio::test]
    async fn test_fetch_reports_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let source = TelnetSource::builder()
            .host("127.0.0.1")
            .port(port)
            .timeout(Duration::from_secs(5))
            .build();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, TransportError::Connect { .. }));
    }
}
