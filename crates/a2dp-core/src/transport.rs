//! Packet transports
//!
//! The packetizer hands each finished packet to a [`PacketTransport`] in a
//! single call. Transports must not block: a full socket buffer is reported
//! as `io::ErrorKind::WouldBlock` and the caller retries later.

use std::io;
use std::net::UdpSocket;

use socket2::Socket;
use tracing::debug;

/// Sends whole packets without blocking
pub trait PacketTransport {
    /// Send one packet, returning the number of bytes the transport took
    fn send_packet(&mut self, packet: &[u8]) -> io::Result<usize>;
}

impl<T: PacketTransport + ?Sized> PacketTransport for &mut T {
    fn send_packet(&mut self, packet: &[u8]) -> io::Result<usize> {
        (**self).send_packet(packet)
    }
}

impl<T: PacketTransport + ?Sized> PacketTransport for Box<T> {
    fn send_packet(&mut self, packet: &[u8]) -> io::Result<usize> {
        (**self).send_packet(packet)
    }
}

/// Connected socket, typically the L2CAP media channel acquired from the
/// Bluetooth daemon. Sent with `MSG_DONTWAIT` so a blocking socket still
/// returns immediately.
impl PacketTransport for Socket {
    fn send_packet(&mut self, packet: &[u8]) -> io::Result<usize> {
        #[cfg(unix)]
        {
            self.send_with_flags(packet, libc::MSG_DONTWAIT)
        }
        #[cfg(not(unix))]
        {
            self.send(packet)
        }
    }
}

/// Connected UDP socket; the caller must have set it non-blocking
impl PacketTransport for UdpSocket {
    fn send_packet(&mut self, packet: &[u8]) -> io::Result<usize> {
        self.send(packet)
    }
}

#[cfg(unix)]
impl PacketTransport for std::os::unix::net::UnixDatagram {
    fn send_packet(&mut self, packet: &[u8]) -> io::Result<usize> {
        self.send(packet)
    }
}

/// Wrap a connected stream descriptor and switch it to non-blocking mode
#[cfg(unix)]
pub fn socket_from_fd(fd: std::os::fd::OwnedFd) -> io::Result<Socket> {
    let socket = Socket::from(fd);
    socket.set_nonblocking(true)?;
    debug!("Media transport socket ready, send buffer {:?}", socket.send_buffer_size());
    Ok(socket)
}

/// Create a connected, non-blocking `SOCK_SEQPACKET` pair
///
/// Sequenced packets keep message boundaries like an L2CAP media channel,
/// which makes the pair a stand-in for local loopback streaming.
#[cfg(unix)]
pub fn nonblocking_seqpacket_pair() -> io::Result<(Socket, Socket)> {
    use socket2::{Domain, Type};

    let (tx, rx) = Socket::pair(Domain::UNIX, Type::SEQPACKET, None)?;
    tx.set_nonblocking(true)?;
    rx.set_nonblocking(true)?;
    Ok((tx, rx))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::mem::MaybeUninit;

    #[test]
    fn test_seqpacket_pair_preserves_boundaries() {
        let (mut tx, rx) = nonblocking_seqpacket_pair().unwrap();
        assert_eq!(tx.send_packet(&[1, 2, 3]).unwrap(), 3);
        assert_eq!(tx.send_packet(&[4, 5]).unwrap(), 2);

        let mut buf = [MaybeUninit::<u8>::uninit(); 16];
        assert_eq!(rx.recv(&mut buf).unwrap(), 3);
        assert_eq!(rx.recv(&mut buf).unwrap(), 2);
    }

    #[test]
    fn test_empty_receive_would_block() {
        let (_tx, rx) = nonblocking_seqpacket_pair().unwrap();
        let mut buf = [MaybeUninit::<u8>::uninit(); 16];
        let err = rx.recv(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
    }

    #[test]
    fn test_socket_from_fd_switches_to_nonblocking() {
        use socket2::{Domain, Type};
        use std::os::fd::OwnedFd;

        let (tx, rx) = Socket::pair(Domain::UNIX, Type::SEQPACKET, None).unwrap();
        let rx = socket_from_fd(OwnedFd::from(rx)).unwrap();
        let mut tx = socket_from_fd(OwnedFd::from(tx)).unwrap();

        let mut buf = [MaybeUninit::<u8>::uninit(); 16];
        let err = rx.recv(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);

        assert_eq!(tx.send_packet(&[7, 8, 9]).unwrap(), 3);
        assert_eq!(rx.recv(&mut buf).unwrap(), 3);
    }

    #[test]
    fn test_unix_datagram_transport() {
        let (a, b) = std::os::unix::net::UnixDatagram::pair().unwrap();
        a.set_nonblocking(true).unwrap();
        let mut transport: Box<dyn PacketTransport> = Box::new(a);
        assert_eq!(transport.send_packet(b"packet").unwrap(), 6);

        let mut buf = [0u8; 16];
        assert_eq!(b.recv(&mut buf).unwrap(), 6);
        assert_eq!(&buf[..6], b"packet");
    }
}
