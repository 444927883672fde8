//! Readiness notification for a process supervisor.
//!
//! Sends `READY=1` to the datagram socket named by `$NOTIFY_SOCKET`, which is
//! how systemd `Type=notify` units learn that startup finished. Without the
//! variable, or off unix, this does nothing.

use std::io;

/// Environment variable naming the supervisor's socket.
pub const NOTIFY_SOCKET: &str = "NOTIFY_SOCKET";

/// Tell the supervisor the service is ready.
///
/// Returns `Ok(false)` when no supervisor is listening.
pub fn notify_ready() -> io::Result<bool> {
    match std::env::var_os(NOTIFY_SOCKET) {
        Some(socket) if !socket.is_empty() => {
            send_state(&socket, "READY=1")?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Send a state string to the socket at `socket`.
///
/// A leading `@` names a Linux abstract socket.
#[cfg(unix)]
pub fn send_state(socket: &std::ffi::OsStr, state: &str) -> io::Result<()> {
    use std::os::unix::ffi::OsStrExt;
    use std::os::unix::net::UnixDatagram;

    let sock = UnixDatagram::unbound()?;
    let bytes = socket.as_bytes();

    match bytes.split_first() {
        Some((b'@', name)) => send_abstract(&sock, name, state),
        _ => sock
            .send_to(state.as_bytes(), std::path::Path::new(socket))
            .map(|_| ()),
    }
}

#[cfg(not(unix))]
pub fn send_state(_socket: &std::ffi::OsStr, _state: &str) -> io::Result<()> {
    Ok(())
}

#[cfg(target_os = "linux")]
fn send_abstract(
    sock: &std::os::unix::net::UnixDatagram,
    name: &[u8],
    state: &str,
) -> io::Result<()> {
    use std::os::linux::net::SocketAddrExt;
    use std::os::unix::net::SocketAddr;

    let addr = SocketAddr::from_abstract_name(name)?;
    sock.send_to_addr(state.as_bytes(), &addr).map(|_| ())
}

#[cfg(all(unix, not(target_os = "linux")))]
fn send_abstract(
    _sock: &std::os::unix::net::UnixDatagram,
    _name: &[u8],
    _state: &str,
) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "abstract notify sockets are only available on Linux",
    ))
}
