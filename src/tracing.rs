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

//! Primitives for mapping [`tracing`] events onto [`Entry`]s & payload fields.
//!
//! [`tracing`]: https://docs.rs/tracing/latest/tracing/index.html
//!
//! An [`Event`] carries its message as just another field, named "message"; [`record_event`]
//! pulls that one out & hands every other field to an [`ObjectEncoder`] under its own name, with
//! its own type. [`to_entry`] fills in the rest from the event's [`Metadata`].
//!
//! [`Event`]: https://docs.rs/tracing/0.1.35/tracing/struct.Event.html
//! [`Metadata`]: https://docs.rs/tracing/0.1.35/tracing/struct.Metadata.html

use crate::{
    entry::{Caller, Entry, Level},
    field::ObjectEncoder,
};

use chrono::prelude::*;

const MESSAGE: &str = "message";

struct EventVisitor<'a> {
    enc: &'a mut dyn ObjectEncoder,
    message: Option<String>,
}

impl EventVisitor<'_> {
    /// Fields added by `tracing-log` duplicate what normalized metadata already tells us
    fn skip(field: &tracing::field::Field) -> bool {
        cfg!(feature = "tracing-log") && field.name().starts_with("log.")
    }
}

impl tracing::field::Visit for EventVisitor<'_> {
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        if !Self::skip(field) {
            self.enc.add_f64(field.name(), value)
        }
    }
    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        if !Self::skip(field) {
            self.enc.add_i64(field.name(), value)
        }
    }
    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        if !Self::skip(field) {
            self.enc.add_u64(field.name(), value)
        }
    }
    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        if !Self::skip(field) {
            self.enc.add_bool(field.name(), value)
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == MESSAGE {
            self.message = Some(value.to_string());
        } else if !Self::skip(field) {
            self.enc.add_string(field.name(), value)
        }
    }
    fn record_error(
        &mut self,
        field: &tracing::field::Field,
        value: &(dyn std::error::Error + 'static),
    ) {
        if !Self::skip(field) {
            self.enc.add_string(field.name(), &value.to_string())
        }
    }
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == MESSAGE {
            // The tracing macros "pre-format" the `message` field, so `value` is really a
            // `std::fmt::Arguments` instance & will print without enclosing double-quotes.
            self.message = Some(format!("{:?}", value));
        } else if !Self::skip(field) {
            self.enc.add_string(field.name(), &format!("{:?}", value))
        }
    }
}

/// Add every field of `event` but its message to `enc`; return the message, if any
pub fn record_event(event: &tracing::Event<'_>, enc: &mut dyn ObjectEncoder) -> Option<String> {
    let mut visitor = EventVisitor { enc, message: None };
    event.record(&mut visitor);
    visitor.message
}

/// Build an [`Entry`] stamped with the current time from an event's metadata.
///
/// The target becomes the logger name & the module path stands in for the function name.
pub fn to_entry(meta: &tracing::Metadata<'_>, message: String) -> Entry {
    Entry {
        level: Level::from(meta.level()),
        time: Some(Utc::now()),
        logger_name: meta.target().to_string(),
        message,
        caller: meta.file().map(|file| Caller {
            file: file.to_string(),
            line: meta.line().unwrap_or(0),
            function: meta.module_path().map(str::to_string),
        }),
        stack: String::new(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::{formatter::PayloadEncoder, json::JsonEncoder};

    use serde_json::Value;
    use tracing_subscriber::{layer::SubscriberExt, registry::Registry};

    use std::sync::{Arc, Mutex};

    /// Encodes each event as JSON, keeping the results
    struct Recorder(Arc<Mutex<Vec<Value>>>);

    impl<S: tracing::Subscriber> tracing_subscriber::layer::Layer<S> for Recorder {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let mut enc = JsonEncoder::default();
            let message = record_event(event, &mut enc).unwrap_or_default();
            let entry = to_entry(event.metadata(), message);
            let (buf, _) = enc.encode_entry(&entry, &[]);
            self.0
                .lock()
                .unwrap()
                .push(serde_json::from_slice(&buf).unwrap());
        }
    }

    fn record<F: FnOnce()>(f: F) -> Vec<Value> {
        let out = Arc::new(Mutex::new(Vec::new()));
        let subscriber = Registry::default().with(Recorder(out.clone()));
        tracing::subscriber::with_default(subscriber, f);
        let values = out.lock().unwrap().clone();
        values
    }

    #[test]
    fn message_and_typed_fields() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let values = record(|| {
            tracing::warn!(
                count = 3u64,
                delta = -2i64,
                ratio = 0.5,
                ok = false,
                name = "frob",
                list = ?vec![1, 2],
                error = &err as &(dyn std::error::Error + 'static),
                "Hello, {}!",
                "world"
            );
        });
        assert_eq!(values.len(), 1);
        let v = &values[0];
        assert_eq!(v["msg"], "Hello, world!");
        assert_eq!(v["level"], "warn");
        assert_eq!(v["logger"], module_path!());
        assert_eq!(v["count"], 3);
        assert_eq!(v["delta"], -2);
        assert_eq!(v["ratio"], 0.5);
        assert_eq!(v["ok"], false);
        assert_eq!(v["name"], "frob");
        assert_eq!(v["list"], "[1, 2]");
        assert_eq!(v["error"], "disk on fire");
        assert!(v["caller"].as_str().unwrap().starts_with("src/tracing.rs:"));
        assert!(v.get("message").is_none());
    }

    struct TestCallsite {
        metadata: &'static tracing::Metadata<'static>,
    }
    impl tracing_core::callsite::Callsite for TestCallsite {
        fn set_interest(&self, _interest: tracing_core::subscriber::Interest) {}
        fn metadata(&self) -> &tracing::Metadata<'static> {
            self.metadata
        }
    }

    static CALLSITE: TestCallsite = {
        static METADATA: tracing::Metadata = tracing::Metadata::new(
            "test event metadata",
            "frob-target",
            tracing::Level::ERROR,
            Some("/build/frob/src/cmd/main.rs"),
            Some(42),
            Some("frob::cmd"),
            tracing::field::FieldSet::new(
                &["message"],
                tracing_core::callsite::Identifier(&CALLSITE),
            ),
            tracing_core::metadata::Kind::EVENT,
        );
        TestCallsite {
            metadata: &METADATA,
        }
    };

    #[test]
    fn entries_from_metadata() {
        use tracing_core::callsite::Callsite;

        let entry = to_entry(CALLSITE.metadata(), "boom".to_string());
        assert_eq!(entry.level, Level::Error);
        assert_eq!(entry.logger_name, "frob-target");
        assert_eq!(entry.message, "boom");
        assert!(entry.time.is_some());
        assert_eq!(
            entry.caller,
            Some(Caller {
                file: "/build/frob/src/cmd/main.rs".to_string(),
                line: 42,
                function: Some("frob::cmd".to_string()),
            })
        );

        let enc = JsonEncoder::new(crate::json::JsonEncoderConfig {
            function_key: "func".to_string(),
            ..Default::default()
        });
        let (buf, _) = enc.encode_entry(&entry, &[]);
        let v: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v["caller"], "src/cmd/main.rs:42");
        assert_eq!(v["func"], "frob::cmd");
        assert_eq!(v["level"], "error");
    }

    #[cfg(feature = "tracing-log")]
    #[test]
    fn bridged_log_records() {
        use tracing_log::log;

        let values = record(|| {
            tracing_log::format_trace(
                &log::Record::builder()
                    .args(format_args!("from log"))
                    .level(log::Level::Info)
                    .target("frob")
                    .module_path(Some("frob::cmd"))
                    .file(Some("src/cmd/main.rs"))
                    .line(Some(7))
                    .build(),
            )
            .unwrap();
        });
        assert_eq!(values.len(), 1);
        let v = values[0].as_object().unwrap();
        assert_eq!(v["msg"], "from log");
        assert_eq!(v["level"], "info");
        assert!(v.keys().all(|k| !k.starts_with("log.")), "{:?}", v);
    }

    #[test]
    fn events_without_a_message() {
        let values = record(|| tracing::info!(answer = 42));
        assert_eq!(values[0]["msg"], "");
        assert_eq!(values[0]["answer"], 42);
    }
}
