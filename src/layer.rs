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

//! [json-syslog](crate) [`Layer`] implementation.
//!
//! [`Layer`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html
//!
//! [`Layer`] is generic over its [`Transport`] & its [`PayloadEncoder`]; consumers of this crate
//! are free to implement either trait for themselves.

use crate::{
    error::Result,
    formatter::PayloadEncoder,
    json::JsonEncoder,
    rfc5424::SyslogEncoder,
    tracing::{record_event, to_entry},
    transport::{ConnSyncer, Transport},
};

use tracing::Event;
use tracing_subscriber::layer::Context;

use std::cell::Cell;
use std::sync::Mutex;

// When the tracing-log feature is enabled, use NormalizeEvent to extract file/line metadata
// from events that originated from the `log` crate, as tracing-subscriber's fmt layer does.
#[cfg(feature = "tracing-log")]
use tracing_log::NormalizeEvent;

thread_local! {
    /// Set while this thread is inside [`Layer::on_event`]
    static IN_EVENT: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as handling an event until dropped
struct EventGuard;

impl EventGuard {
    /// `None` if this thread is already handling an event
    fn enter() -> Option<EventGuard> {
        IN_EVENT.with(|flag| {
            if flag.replace(true) {
                None
            } else {
                Some(EventGuard)
            }
        })
    }
}

impl Drop for EventGuard {
    fn drop(&mut self) {
        IN_EVENT.with(|flag| flag.set(false));
    }
}

/// A [`tracing-subscriber`]-compliant [`Layer`] implementation that will send [`Event`]s to a
/// syslog daemon as RFC 5424 messages with JSON payloads.
///
/// [`tracing-subscriber`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/index.html
/// [`Layer`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html
/// [`Event`]: https://docs.rs/tracing/0.1.35/tracing/struct.Event.html
///
/// Each event is encoded by a fresh clone of the configured [`SyslogEncoder`], so fields added
/// to that encoder up front appear in every message. The transport sits behind a [`Mutex`];
/// writes from concurrent events are serialized.
///
/// Events raised on a thread while it is already handling one (the layer's own failure reports,
/// or the transport's reconnect diagnostics) are not sent; other layers still see them.
pub struct Layer<T: Transport, E: PayloadEncoder = JsonEncoder> {
    encoder: SyslogEncoder<E>,
    transport: Mutex<T>,
}

impl Layer<ConnSyncer> {
    /// Attempt to construct a [`Layer`] that will send syslog messages via UDP to port 514 on
    /// localhost
    pub fn try_default() -> Result<Self> {
        Ok(Layer::with_transport(ConnSyncer::local()?))
    }
}

impl<T: Transport> Layer<T> {
    /// Construct a [`Layer`] with the default encoder, sending via `transport`
    pub fn with_transport(transport: T) -> Self {
        Layer::new(SyslogEncoder::default(), transport)
    }
}

impl<T: Transport, E: PayloadEncoder> Layer<T, E> {
    pub fn new(encoder: SyslogEncoder<E>, transport: T) -> Self {
        Layer {
            encoder,
            transport: Mutex::new(transport),
        }
    }
    pub fn encoder(&self) -> &SyslogEncoder<E> {
        &self.encoder
    }
}

impl<S, T, E> tracing_subscriber::layer::Layer<S> for Layer<T, E>
where
    S: tracing::Subscriber,
    T: Transport + 'static,
    E: PayloadEncoder + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let _guard = match EventGuard::enter() {
            Some(guard) => guard,
            None => return,
        };

        // For events that originated from the `log` crate, normalized_metadata() carries the
        // file & line; for native tracing events it returns None.
        #[cfg(feature = "tracing-log")]
        let normalized_meta = event.normalized_metadata();
        #[cfg(feature = "tracing-log")]
        let meta = normalized_meta.as_ref().unwrap_or_else(|| event.metadata());
        #[cfg(not(feature = "tracing-log"))]
        let meta = event.metadata();

        let mut enc = self.encoder.clone();
        let message = record_event(event, &mut enc).unwrap_or_default();
        let (buf, err) = enc.encode_entry(&to_entry(meta, message), &[]);
        if let Some(err) = err {
            ::tracing::error!("json-syslog failed to encode a field: {}", err);
        }

        // A panic elsewhere while holding the lock doesn't make the transport unusable.
        let sent = match self.transport.lock() {
            Ok(mut transport) => transport.send(&buf),
            Err(poisoned) => poisoned.into_inner().send(&buf),
        };
        buf.free();
        if let Err(err) = sent {
            ::tracing::error!("json-syslog failed to send a message: {}", err);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::{
        facility::Facility,
        field::ObjectEncoder,
        rfc5424::Framing,
        transport::Network,
    };

    use serde_json::Value;
    use tracing::{debug, error, info, trace, warn};
    use tracing_subscriber::{layer::SubscriberExt, registry::Registry};

    use std::sync::Arc;

    /// Collects each message sent
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<Vec<u8>>>>);

    impl Transport for Capture {
        fn send(&mut self, buf: &[u8]) -> Result<usize> {
            self.0.lock().unwrap().push(buf.to_vec());
            Ok(buf.len())
        }
    }

    impl Capture {
        fn messages(&self) -> Vec<String> {
            self.0
                .lock()
                .unwrap()
                .iter()
                .map(|m| String::from_utf8(m.clone()).unwrap())
                .collect()
        }
    }

    fn encoder() -> SyslogEncoder {
        SyslogEncoder::builder()
            .facility(Facility::LOG_LOCAL0)
            .hostname("bree.local")
            .app_name("prototyping")
            .pid(123)
            .build()
    }

    /// Split a non-transparently framed message into its header & parsed payload
    fn split(msg: &str) -> (&str, Value) {
        let (header, payload) = msg.split_once('\u{feff}').unwrap();
        (header, serde_json::from_str(payload).unwrap())
    }

    #[test]
    fn events_become_syslog_messages() {
        let capture = Capture::default();
        let mut enc = encoder();
        enc.add_string("service", "frobnicator");
        let layer = Layer::new(enc, capture.clone());
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            info!(answer = 42, "Hello, 世界!");
        });

        let messages = capture.messages();
        assert_eq!(messages.len(), 1);
        let (header, payload) = split(&messages[0]);
        assert!(header.starts_with("<134>1 "), "{}", header);
        assert!(header.ends_with(" bree.local prototyping 123 - - "), "{}", header);
        assert_eq!(payload["msg"], "Hello, 世界!");
        assert_eq!(payload["level"], "info");
        assert_eq!(payload["logger"], module_path!());
        assert_eq!(payload["answer"], 42);
        assert_eq!(payload["service"], "frobnicator");
        assert!(payload["caller"].as_str().unwrap().starts_with("src/layer.rs:"));
        assert!(messages[0].ends_with("}\n"));
    }

    #[test]
    fn levels_map_to_severities() {
        let capture = Capture::default();
        let subscriber = Registry::default().with(Layer::new(encoder(), capture.clone()));

        tracing::subscriber::with_default(subscriber, || {
            trace!("t");
            debug!("d");
            info!("i");
            warn!("w");
            error!("e");
        });

        let pris: Vec<String> = capture
            .messages()
            .iter()
            .map(|m| m[..m.find(' ').unwrap()].to_string())
            .collect();
        assert_eq!(pris, vec!["<135>1", "<135>1", "<134>1", "<132>1", "<131>1"]);
    }

    #[test]
    fn each_event_gets_its_own_fields() {
        let capture = Capture::default();
        let subscriber = Registry::default().with(Layer::new(encoder(), capture.clone()));

        tracing::subscriber::with_default(subscriber, || {
            info!(first = true, "one");
            info!("two");
        });

        let messages = capture.messages();
        let (_, one) = split(&messages[0]);
        let (_, two) = split(&messages[1]);
        assert_eq!(one["first"], true);
        assert!(two.get("first").is_none());
    }

    #[test]
    fn octet_counted_over_udp() {
        let server = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap().to_string();

        let enc = SyslogEncoder::builder()
            .hostname("bree.local")
            .app_name("udp-test")
            .framing(Framing::OctetCounting)
            .build();
        let layer = Layer::new(enc, ConnSyncer::new(Network::Udp, addr).unwrap());
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            warn!("你好, UDP socket.");
        });

        let mut buf = [0u8; 4096];
        let n = server.recv(&mut buf).unwrap();
        let text = std::str::from_utf8(&buf[..n]).unwrap();
        let (len, msg) = text.split_once(' ').unwrap();
        assert_eq!(len.parse::<usize>().unwrap(), msg.len());
        assert!(msg.starts_with("<12>1 "));
        assert!(!msg.ends_with('\n'));
        let (_, payload) = split(msg);
        assert_eq!(payload["msg"], "你好, UDP socket.");
    }

    #[test]
    fn transport_failures_are_swallowed() {
        struct Broken;
        impl Transport for Broken {
            fn send(&mut self, _buf: &[u8]) -> Result<usize> {
                Err(crate::error::Error::Transport {
                    source: std::io::Error::from(std::io::ErrorKind::BrokenPipe),
                    back: backtrace::Backtrace::new(),
                })
            }
        }
        let subscriber = Registry::default().with(Layer::new(encoder(), Broken));
        tracing::subscriber::with_default(subscriber, || {
            error!("nobody is listening");
        });
    }

    #[cfg(feature = "rsyslogd")]
    #[test]
    fn rsyslogd() {
        for network in [Network::Udp, Network::Tcp] {
            let layer = Layer::new(
                SyslogEncoder::builder().app_name("json-syslog-test").build(),
                ConnSyncer::new(network, "127.0.0.1:5514").unwrap(),
            );
            let subscriber = Registry::default().with(layer);
            tracing::subscriber::with_default(subscriber, || {
                info!(network = %network, "你好, rsyslogd.");
            });
        }
    }
}
