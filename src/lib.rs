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

//! RFC [5424] [`syslog`] messages with structured JSON payloads, and a self-healing writer to
//! deliver them.
//!
//! [5424]: https://datatracker.ietf.org/doc/html/rfc5424
//! [`syslog`]: https://en.wikipedia.org/wiki/Syslog
//!
//! # Introduction
//!
//! A syslog daemon is a fine place to send logs, but the traditional free-text MSG field throws
//! away the structure modern applications put into their log events. This crate keeps it: each
//! message carries a standard RFC 5424 header (so the daemon can route & filter on facility,
//! severity, host & application as usual) followed by the event itself, encoded as a single JSON
//! object:
//!
//! ```text
//! <134>1 2017-01-02T03:04:05.123456Z bree.local frob 9876 - - {"level":"info","ts":1483326245.123,"msg":"Hello, world!","answer":42}
//! ```
//!
//! (there is a UTF-8 byte order mark just before the opening brace).
//!
//! The work is split three ways:
//!
//! 1. a [`PayloadEncoder`](formatter::PayloadEncoder) (by default [`JsonEncoder`](json::JsonEncoder))
//!    turns an [`Entry`](entry::Entry) & its fields into the payload
//!
//! 2. a [`SyslogEncoder`](rfc5424::SyslogEncoder) prepends the header & applies RFC [6587]
//!    framing (non-transparent or octet-counting)
//!
//! 3. a [`ConnSyncer`](transport::ConnSyncer) writes the result over TCP, UDP or a Unix socket,
//!    reconnecting once if the daemon has gone away
//!
//! [6587]: https://datatracker.ietf.org/doc/html/rfc6587
//!
//! # Usage
//!
//! The pieces may be used directly:
//!
//! ```no_run
//! use json_syslog::{
//!     entry::{Entry, Level},
//!     facility::Facility,
//!     field::{Field, ObjectEncoder},
//!     rfc5424::{Framing, SyslogEncoder},
//!     transport::{ConnSyncer, Network},
//! };
//!
//! let mut enc = SyslogEncoder::builder()
//!     .facility(Facility::LOG_LOCAL0)
//!     .app_name("frob")
//!     .framing(Framing::OctetCounting)
//!     .build();
//! // fields common to every message
//! enc.add_string("service", "frobnicator");
//!
//! let mut syncer = ConnSyncer::new(Network::Tcp, "localhost:6514").unwrap();
//! let (buf, _err) = enc.encode_entry(&Entry::now(Level::Info, "Hello, world!"), &[Field::i64("answer", 42)]);
//! syncer.write(&buf).unwrap();
//! ```
//!
//! or, more conveniently, through the [`tracing-subscriber`] [`Layer`](layer::Layer):
//!
//! [`tracing-subscriber`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/index.html
//!
//! ```rust
//! use tracing::info;
//! use json_syslog::layer::Layer;
//! use tracing_subscriber::registry::Registry;
//! use tracing_subscriber::layer::SubscriberExt; // Needed to get `with()`
//!
//! // The default configuration is to send messages with JSON payloads via UDP to port 514 on
//! // the localhost.
//! let subscriber = Registry::default().with(Layer::try_default().unwrap());
//! let _guard = tracing::subscriber::set_default(subscriber);
//!
//! info!(answer = 42, "Hello, world!");
//! ```
//!
//! # Configuration
//!
//! [`SyslogEncoderConfig`](rfc5424::SyslogEncoderConfig) may be deserialized from any [`serde`]
//! format; the JSON payload's settings sit alongside the header's:
//!
//! [`serde`]: https://serde.rs
//!
//! ```rust
//! use json_syslog::rfc5424::{SyslogEncoder, SyslogEncoderConfig};
//!
//! let cfg: SyslogEncoderConfig = serde_json::from_str(r#"{
//!     "facility": "local3",
//!     "framing": "octet_counting",
//!     "app": "frob",
//!     "timeKey": "time",
//!     "encodeTime": "rfc3339_nano"
//! }"#).unwrap();
//! let enc = SyslogEncoder::new(cfg);
//! assert_eq!(enc.app_name(), "frob");
//! ```

pub mod buffer;
pub mod entry;
pub mod error;
pub mod facility;
pub mod field;
pub mod formatter;
pub mod json;
pub mod layer;
pub mod priority;
pub mod rfc5424;
pub mod sanitize;
pub mod tracing;
pub mod transport;
