// Copyright (C) 2022-2025 Michael Herstine <sp1ff@pobox.com>
//
// This file is part of json-syslog.
//
// json-syslog is free software: you can redistribute it and/or modify it under the terms of the
// GNU General Public License as published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// json-syslog is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without
// even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with json-syslog.  If
// not, see <http://www.gnu.org/licenses/>.

//! The syslog transport layer.
//!
//! This module defines the [`Transport`] trait that the [`Layer`](crate::layer::Layer) writes
//! through, as well as [`ConnSyncer`]: a writer that owns a single connection to the daemon &
//! transparently re-establishes it when a write fails.
//!
//! # Examples
//!
//! To send syslog messages over UDP to a daemon listening on port 514 (the default) on localhost:
//!
//! ```rust
//! use json_syslog::transport::ConnSyncer;
//! let transpo = ConnSyncer::local().unwrap();
//! ```
//!
//! Over TCP, to a daemon on a non-standard port on another host:
//!
//! ```rust
//! use json_syslog::transport::{ConnSyncer, Network};
//! let transpo = ConnSyncer::new(Network::Tcp, "some-host.domain.io:5514");
//! assert!(transpo.is_err()); // no such host, after all
//! ```
//!
//! To a local Unix socket:
//!
//! ```rust
//! use json_syslog::transport::{ConnSyncer, Network};
//! let transpo = ConnSyncer::new("unixgram".parse().unwrap(), "/i/am/not/there.s");
//! assert!(transpo.is_err()); // no such socket, after all
//! ```

use crate::error::{Error, Result};

use backtrace::Backtrace;
use tracing::debug;

use std::{
    io::{self, Write},
    net::{Ipv4Addr, Ipv6Addr, Shutdown, SocketAddr, TcpStream, ToSocketAddrs, UdpSocket},
};

#[cfg(unix)]
use std::os::unix::net::{UnixDatagram, UnixStream};

type StdResult<T, E> = std::result::Result<T, E>;

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                      transport mechanisms                                      //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Operations all transport layers must support.
pub trait Transport {
    /// Send a complete, framed syslog message.
    ///
    /// UDP, TCP & Unix sockets all operate on a contiguous slice of `u8`, so we require that our
    /// caller assemble one.
    fn send(&mut self, buf: &[u8]) -> Result<usize>;
    /// Flush anything buffered
    fn sync(&mut self) -> Result<()> {
        Ok(())
    }
}

/// The kinds of endpoint a [`ConnSyncer`] can talk to
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Network {
    Tcp,
    Udp,
    /// Unix domain socket, stream flavor
    Unix,
    /// Unix domain socket, datagram flavor
    Unixgram,
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        let name = match self {
            Network::Tcp => "tcp",
            Network::Udp => "udp",
            Network::Unix => "unix",
            Network::Unixgram => "unixgram",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for Network {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tcp" => Ok(Network::Tcp),
            "udp" => Ok(Network::Udp),
            "unix" => Ok(Network::Unix),
            "unixgram" => Ok(Network::Unixgram),
            _ => Err(Error::UnknownNetwork {
                name: s.to_string(),
                back: Backtrace::new(),
            }),
        }
    }
}

/// A live outbound channel to a syslog daemon
pub trait Connection {
    /// Write all of `buf` (as a single datagram, for datagram transports)
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
    fn close(self) -> io::Result<()>;
}

/// Something that can open a [`Connection`] to `addr` over `network`
pub trait Dial {
    type Conn: Connection;
    fn dial(&self, network: Network, addr: &str) -> io::Result<Self::Conn>;
}

/// Dials real sockets
#[derive(Copy, Clone, Debug, Default)]
pub struct NetDialer;

/// A socket opened by [`NetDialer`]
#[derive(Debug)]
pub enum NetConn {
    Tcp(TcpStream),
    Udp(UdpSocket),
    #[cfg(unix)]
    Unix(UnixStream),
    #[cfg(unix)]
    Unixgram(UnixDatagram),
}

fn dial_udp(addr: &str) -> io::Result<UdpSocket> {
    let remote = addr.to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("no addresses found for {}", addr),
        )
    })?;
    // Bind to any available port on the matching unspecified address...
    let local: SocketAddr = if remote.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let socket = UdpSocket::bind(local)?;
    // and connect to the syslog daemon at `addr`:
    socket.connect(remote)?;
    Ok(socket)
}

impl Dial for NetDialer {
    type Conn = NetConn;
    fn dial(&self, network: Network, addr: &str) -> io::Result<NetConn> {
        match network {
            Network::Tcp => Ok(NetConn::Tcp(TcpStream::connect(addr)?)),
            Network::Udp => Ok(NetConn::Udp(dial_udp(addr)?)),
            #[cfg(unix)]
            Network::Unix => Ok(NetConn::Unix(UnixStream::connect(addr)?)),
            #[cfg(unix)]
            Network::Unixgram => {
                let sock = UnixDatagram::unbound()?;
                sock.connect(addr)?;
                Ok(NetConn::Unixgram(sock))
            }
            #[cfg(not(unix))]
            Network::Unix | Network::Unixgram => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("{} sockets are not available on this platform", network),
            )),
        }
    }
}

impl Connection for NetConn {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            NetConn::Tcp(stream) => {
                stream.write_all(buf)?;
                Ok(buf.len())
            }
            NetConn::Udp(socket) => socket.send(buf),
            #[cfg(unix)]
            NetConn::Unix(stream) => {
                stream.write_all(buf)?;
                Ok(buf.len())
            }
            #[cfg(unix)]
            NetConn::Unixgram(socket) => socket.send(buf),
        }
    }
    fn close(self) -> io::Result<()> {
        match self {
            NetConn::Tcp(stream) => stream.shutdown(Shutdown::Both),
            #[cfg(unix)]
            NetConn::Unix(stream) => stream.shutdown(Shutdown::Both),
            // datagram sockets are closed on drop
            _ => Ok(()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                        struct ConnSyncer                                       //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A writer that owns one connection to a syslog daemon & re-establishes it on failure.
///
/// Each [`write`](ConnSyncer::write) makes at most two attempts: one on the current connection
/// (if there is one) and, should that fail, one more on a freshly dialed connection. There's no
/// backoff & no timeout; calls block for as long as the underlying socket does.
///
/// Writes take `&mut self`; share a [`ConnSyncer`] between threads by putting it behind a lock.
pub struct ConnSyncer<D: Dial = NetDialer> {
    network: Network,
    addr: String,
    dialer: D,
    conn: Option<D::Conn>,
}

impl ConnSyncer<NetDialer> {
    /// Dial `addr` over `network` immediately; fails if the daemon can't be reached.
    pub fn new<A: Into<String>>(network: Network, addr: A) -> Result<ConnSyncer<NetDialer>> {
        ConnSyncer::with_dialer(NetDialer, network, addr)
    }
    /// Connect via UDP to localhost:514
    pub fn local() -> Result<ConnSyncer<NetDialer>> {
        ConnSyncer::new(Network::Udp, "localhost:514")
    }
}

impl<D: Dial> ConnSyncer<D> {
    /// Like [`ConnSyncer::new`], but opening connections through `dialer`
    pub fn with_dialer<A: Into<String>>(dialer: D, network: Network, addr: A) -> Result<Self> {
        let mut syncer = ConnSyncer {
            network,
            addr: addr.into(),
            dialer,
            conn: None,
        };
        if let Err(source) = syncer.reconnect() {
            return Err(Error::Dial {
                network,
                addr: syncer.addr,
                source,
                back: Backtrace::new(),
            });
        }
        Ok(syncer)
    }

    pub fn network(&self) -> Network {
        self.network
    }
    pub fn addr(&self) -> &str {
        &self.addr
    }
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Drop the current connection (if any) & dial a new one
    fn reconnect(&mut self) -> io::Result<&mut D::Conn> {
        if let Some(conn) = self.conn.take() {
            // it makes sense to carry on regardless
            if let Err(err) = conn.close() {
                debug!("ignoring error closing {} {}: {}", self.network, self.addr, err);
            }
        }
        let conn = self.dialer.dial(self.network, &self.addr)?;
        Ok(self.conn.insert(conn))
    }

    /// Write `buf` to the daemon, reconnecting & retrying once on failure.
    ///
    /// If the reconnect fails, the syncer is left without a connection; the next write will try
    /// to dial again before doing anything else.
    pub fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(conn) = self.conn.as_mut() {
            match conn.write(buf) {
                Ok(n) => return Ok(n),
                Err(err) => debug!(
                    "write to {} {} failed ({}); reconnecting",
                    self.network, self.addr, err
                ),
            }
        }
        self.reconnect()?.write(buf)
    }

    /// Nothing is buffered, so this always succeeds
    pub fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<D: Dial> std::fmt::Debug for ConnSyncer<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnSyncer")
            .field("network", &self.network)
            .field("addr", &self.addr)
            .field("connected", &self.conn.is_some())
            .finish()
    }
}

impl<D: Dial> io::Write for ConnSyncer<D> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        ConnSyncer::write(self, buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.sync()
    }
}

impl<D: Dial> Transport for ConnSyncer<D> {
    fn send(&mut self, buf: &[u8]) -> Result<usize> {
        ConnSyncer::write(self, buf).map_err(|source| Error::Transport {
            source,
            back: Backtrace::new(),
        })
    }
}
