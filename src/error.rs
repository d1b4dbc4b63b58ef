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

//! [json-syslog](crate) errors

use crate::transport::Network;

use backtrace::Backtrace;

/// [json-syslog](crate) error type
///
/// Like its sibling crates, [json-syslog](crate) eschews libraries like [thiserror] & [anyhow] in
/// favor of a straightforward enumeration with a few match arms chosen on the basis of what the
/// caller will need to respond.
///
/// [thiserror]: https://docs.rs/thiserror
/// [anyhow]: https://docs.rs/anyhow
#[non_exhaustive]
pub enum Error {
    /// The initial connection to the syslog daemon couldn't be established
    Dial {
        network: Network,
        addr: String,
        source: std::io::Error,
        back: Backtrace,
    },
    /// A write failed, and so did the single reconnect-and-retry that followed it
    Transport {
        source: std::io::Error,
        back: Backtrace,
    },
    /// An object or array marshaler (or a reflected value) failed to encode
    Marshal {
        key: String,
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        back: Backtrace,
    },
    /// A facility name not found in the facility table
    UnknownFacility { name: String, back: Backtrace },
    /// A network name other than "tcp", "udp", "unix" or "unixgram"
    UnknownNetwork { name: String, back: Backtrace },
}

impl Error {
    pub(crate) fn marshal<E>(key: &str, source: E) -> Error
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Error::Marshal {
            key: key.to_string(),
            source: source.into(),
            back: Backtrace::new(),
        }
    }
}

impl std::fmt::Display for Error {
    // `Error` is non-exhaustive so that adding variants won't be a breaking change to our
    // callers. That means the compiler won't catch us if we miss a variant here, so we
    // always include a `_` arm.
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Dial {
                network,
                addr,
                source,
                ..
            } => write!(f, "Failed to dial {} {}: {}", network, addr, source),
            Error::Transport { source, .. } => {
                write!(f, "While sending a syslog message, got {}", source)
            }
            Error::Marshal { key, source, .. } => {
                write!(f, "Failed to marshal field '{}': {}", key, source)
            }
            Error::UnknownFacility { name, .. } => write!(f, "invalid syslog facility: {}", name),
            Error::UnknownNetwork { name, .. } => write!(f, "unknown network: {}", name),
            _ => write!(f, "Other json-syslog error"),
        }
    }
}

impl std::fmt::Debug for Error {
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Dial { back, .. } => write!(f, "{}\n{:?}", self, back),
            Error::Transport { back, .. } => write!(f, "{}\n{:?}", self, back),
            Error::Marshal { back, .. } => write!(f, "{}\n{:?}", self, back),
            err => write!(f, "json-syslog error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Dial { source, .. } => Some(source),
            Error::Transport { source, .. } => Some(source),
            Error::Marshal { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
