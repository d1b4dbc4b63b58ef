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

//! The [`Layer`] installed as the process-wide subscriber. This lives in its own binary since
//! the global default can only be set once.

use json_syslog::{
    error::{Error, Result},
    layer::Layer,
    rfc5424::SyslogEncoder,
    transport::Transport,
};

use tracing_subscriber::{layer::SubscriberExt, registry::Registry};

use std::sync::atomic::{AtomicUsize, Ordering};

static SENDS: AtomicUsize = AtomicUsize::new(0);

/// A daemon that is never there
struct Down;

impl Transport for Down {
    fn send(&mut self, _buf: &[u8]) -> Result<usize> {
        SENDS.fetch_add(1, Ordering::SeqCst);
        // a transport that logs while sending, as `ConnSyncer` does on reconnect
        tracing::debug!("reconnecting");
        Err(Error::Transport {
            source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
            back: backtrace::Backtrace::new(),
        })
    }
}

#[test]
fn unreachable_daemon_under_global_default() {
    let enc = SyslogEncoder::builder()
        .hostname("bree.local")
        .app_name("global-test")
        .build();
    let subscriber = Registry::default().with(Layer::new(enc, Down));
    tracing::subscriber::set_global_default(subscriber).unwrap();

    tracing::info!("nobody is listening");
    assert_eq!(SENDS.load(Ordering::SeqCst), 1);

    // the guard is released after each event
    tracing::warn!("still nobody");
    assert_eq!(SENDS.load(Ordering::SeqCst), 2);
}
