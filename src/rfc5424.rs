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

//! RFC [5424]-compliant syslog envelopes around structured payloads
//!
//! [5424]: https://datatracker.ietf.org/doc/html/rfc5424
//!
//! [`SyslogEncoder`] wraps a [`PayloadEncoder`] (by default, [`JsonEncoder`]) & produces complete
//! syslog messages, framed per RFC [6587] for stream transports:
//!
//! ```text
//! <PRI>1 TIMESTAMP HOSTNAME APP-NAME PROCID - - BOM PAYLOAD
//! ```
//!
//! [6587]: https://datatracker.ietf.org/doc/html/rfc6587
//!
//! MSGID & STRUCTURED-DATA are always the NILVALUE; everything structured about the event lives in
//! the payload.
//!
//! # Examples
//!
//! ```rust
//! use json_syslog::{
//!     entry::{Entry, Level},
//!     facility::Facility,
//!     field::{Field, ObjectEncoder},
//!     rfc5424::{Framing, SyslogEncoder},
//! };
//!
//! let mut enc = SyslogEncoder::builder()
//!     .facility(Facility::LOG_LOCAL0)
//!     .hostname("bree.local")
//!     .app_name("prototyping")
//!     .pid(123)
//!     .framing(Framing::OctetCounting)
//!     .build();
//! enc.add_string("service", "frobnicator");
//!
//! let (buf, err) = enc.encode_entry(&Entry::now(Level::Info, "Hello, world!"), &[Field::u64("n", 1)]);
//! assert!(err.is_none());
//! assert!(std::str::from_utf8(&buf).unwrap().contains(" <134>1 "));
//! ```

use crate::{
    buffer::{self, Buffer},
    entry::Entry,
    error::Error,
    facility::Facility,
    field::{ArrayEncoder, ArrayMarshaler, Field, MarshalResult, ObjectEncoder, ObjectMarshaler},
    formatter::PayloadEncoder,
    json::{JsonEncoder, JsonEncoderConfig},
    priority::priority,
    sanitize::{self, NIL_VALUE},
};

use bytes::BufMut;
use chrono::prelude::*;

use std::sync::Arc;
use std::time::Duration;

const VERSION: u8 = 1;
/// RFC 3339 in UTC, with the fractional seconds truncated to microseconds
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";
/// The UTF-8 byte order mark
const BOM: &[u8] = b"\xef\xbb\xbf";

/// RFC [6587] transport framing
///
/// [6587]: https://datatracker.ietf.org/doc/html/rfc6587
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Framing {
    /// Each message is terminated by a line feed (supplied by the payload encoder)
    #[default]
    NonTransparent,
    /// Each message is prefixed with its length in octets, in decimal, & a space
    OctetCounting,
}

/// Everything needed to build a [`SyslogEncoder`].
///
/// The payload encoder's settings are inlined, so one flat configuration document covers both:
///
/// ```rust
/// use json_syslog::{facility::Facility, rfc5424::{Framing, SyslogEncoderConfig}};
///
/// let cfg: SyslogEncoderConfig = serde_json::from_str(
///     r#"{"facility": "local0", "framing": "octet_counting", "app": "frob", "messageKey": "m"}"#,
/// ).unwrap();
/// assert_eq!(cfg.facility, Facility::LOG_LOCAL0);
/// assert_eq!(cfg.framing, Framing::OctetCounting);
/// assert_eq!(cfg.json.message_key, "m");
/// ```
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct SyslogEncoderConfig {
    #[serde(flatten)]
    pub json: JsonEncoderConfig,
    pub framing: Framing,
    pub facility: Facility,
    /// Empty means "look it up"
    pub hostname: String,
    /// Zero means "this process"
    pub pid: u32,
    pub app: String,
}

/// The fixed part of every message, normalized once & shared by all clones
#[derive(Debug)]
struct Header {
    facility: Facility,
    hostname: String,
    app_name: String,
    pid: u32,
    framing: Framing,
}

impl Header {
    fn new(facility: Facility, hostname: &str, app: &str, pid: u32, framing: Framing) -> Header {
        let hostname = if hostname.is_empty() {
            sanitize::hostname(&local_hostname())
        } else {
            sanitize::hostname(hostname)
        };
        Header {
            facility,
            hostname,
            app_name: sanitize::app_name(app),
            pid: if pid == 0 { std::process::id() } else { pid },
            framing,
        }
    }
}

/// Attempt to figure-out a HOSTNAME for this machine.
///
/// RFC [5424] prefers, in order: FQDN, static IP address, hostname, dynamic IP address, the
/// NILVALUE. This is rather less ambitious; it asks [gethostname()], then falls back to the
/// address of the interface over which the default route runs. If neither is available, it
/// returns the empty string (which the sanitizer will turn into the NILVALUE).
///
/// [5424]: https://datatracker.ietf.org/doc/html/rfc5424
/// [gethostname()]: https://man7.org/linux/man-pages/man2/gethostname.2.html
fn local_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .filter(|name| !name.is_empty())
        .or_else(|| local_ip_address::local_ip().ok().map(|ip| ip.to_string()))
        .unwrap_or_default()
}

/// An encoder producing RFC [5424]-conformant syslog messages.
///
/// [5424]: https://datatracker.ietf.org/doc/html/rfc5424
///
/// Fields added to a [`SyslogEncoder`] (through [`ObjectEncoder`]) accumulate in its payload
/// encoder & appear in every message it subsequently encodes. Cloning is cheap-ish: the header is
/// shared, the accumulated fields are copied.
#[derive(Clone, Debug)]
pub struct SyslogEncoder<E: PayloadEncoder = JsonEncoder> {
    header: Arc<Header>,
    payload: E,
}

impl SyslogEncoder<JsonEncoder> {
    /// Build a [`SyslogEncoder`] from `cfg`, normalizing the header fields once.
    ///
    /// The JSON payload's line ending is forced to `"\n"`, whatever `cfg` says.
    pub fn new(cfg: SyslogEncoderConfig) -> SyslogEncoder<JsonEncoder> {
        let SyslogEncoderConfig {
            json,
            framing,
            facility,
            hostname,
            pid,
            app,
        } = cfg;
        SyslogEncoder {
            header: Arc::new(Header::new(facility, &hostname, &app, pid, framing)),
            payload: json_payload(json),
        }
    }

    pub fn builder() -> SyslogEncoderBuilder<JsonEncoder> {
        SyslogEncoderBuilder {
            facility: Facility::default(),
            hostname: String::new(),
            app_name: String::new(),
            pid: 0,
            framing: Framing::default(),
            payload: json_payload(JsonEncoderConfig::default()),
        }
    }
}

fn json_payload(mut cfg: JsonEncoderConfig) -> JsonEncoder {
    cfg.line_ending = "\n".to_string();
    JsonEncoder::new(cfg)
}

impl std::default::Default for SyslogEncoder<JsonEncoder> {
    fn default() -> Self {
        SyslogEncoder::new(SyslogEncoderConfig::default())
    }
}

/// Incremental construction of a [`SyslogEncoder`]
pub struct SyslogEncoderBuilder<E: PayloadEncoder> {
    facility: Facility,
    hostname: String,
    app_name: String,
    pid: u32,
    framing: Framing,
    payload: E,
}

impl<E: PayloadEncoder> SyslogEncoderBuilder<E> {
    pub fn facility(mut self, facility: Facility) -> Self {
        self.facility = facility;
        self
    }
    /// Leave unset (or empty) to use this machine's hostname
    pub fn hostname<S: Into<String>>(mut self, hostname: S) -> Self {
        self.hostname = hostname.into();
        self
    }
    pub fn app_name<S: Into<String>>(mut self, app_name: S) -> Self {
        self.app_name = app_name.into();
        self
    }
    /// Leave unset (or zero) to use the current process ID
    pub fn pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }
    pub fn framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }
    /// Substitute a different payload encoder.
    ///
    /// Octet-counting framing strips a single trailing line feed from the payload, if there is
    /// one; `payload` is otherwise used as-is.
    pub fn payload_encoder<E2: PayloadEncoder>(self, payload: E2) -> SyslogEncoderBuilder<E2> {
        SyslogEncoderBuilder {
            facility: self.facility,
            hostname: self.hostname,
            app_name: self.app_name,
            pid: self.pid,
            framing: self.framing,
            payload,
        }
    }
    pub fn build(self) -> SyslogEncoder<E> {
        SyslogEncoder {
            header: Arc::new(Header::new(
                self.facility,
                &self.hostname,
                &self.app_name,
                self.pid,
                self.framing,
            )),
            payload: self.payload,
        }
    }
}

impl SyslogEncoderBuilder<JsonEncoder> {
    /// Configure the JSON payload (the line ending will still be `"\n"`)
    pub fn json(mut self, cfg: JsonEncoderConfig) -> Self {
        self.payload = json_payload(cfg);
        self
    }
}

impl<E: PayloadEncoder> SyslogEncoder<E> {
    pub fn facility(&self) -> Facility {
        self.header.facility
    }
    /// The sanitized HOSTNAME
    pub fn hostname(&self) -> &str {
        &self.header.hostname
    }
    /// The sanitized APP-NAME
    pub fn app_name(&self) -> &str {
        &self.header.app_name
    }
    pub fn pid(&self) -> u32 {
        self.header.pid
    }
    pub fn framing(&self) -> Framing {
        self.header.framing
    }
    pub fn payload(&self) -> &E {
        &self.payload
    }

    /// Encode `entry`, along with every field accumulated so far & `fields`, as one complete,
    /// framed syslog message.
    ///
    /// This never fails outright: if the payload encoder reports an error, the (best-effort)
    /// message is returned along with it.
    pub fn encode_entry(&self, entry: &Entry, fields: &[Field]) -> (Buffer, Option<Error>) {
        let header = &*self.header;
        let mut msg = buffer::get();

        // <PRI>VERSION SP TIMESTAMP
        msg.put_slice(
            format!("<{}>{} ", priority(entry.level, header.facility), VERSION).as_bytes(),
        );
        match entry.time {
            Some(time) => msg.put_slice(time.format(TIMESTAMP_FORMAT).to_string().as_bytes()),
            None => msg.put_slice(NIL_VALUE.as_bytes()),
        }
        // SP HOSTNAME SP APP-NAME SP PROCID SP MSGID SP STRUCTURED-DATA
        msg.put_slice(
            format!(
                " {} {} {} - -",
                header.hostname, header.app_name, header.pid
            )
            .as_bytes(),
        );

        // From the RFC: "If a syslog application encodes MSG in UTF-8, the string MUST start with
        // the Unicode byte order mask (BOM)..."
        let (payload, err) = self.payload.encode_entry(entry, fields);
        if !payload.is_empty() {
            msg.put_u8(b' ');
            msg.put_slice(BOM);
            let mut bytes: &[u8] = &payload;
            if header.framing == Framing::OctetCounting {
                bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
            }
            msg.put_slice(bytes);
        }
        payload.free();

        match header.framing {
            Framing::NonTransparent => (msg, err),
            Framing::OctetCounting => {
                // SYSLOG-FRAME = MSG-LEN SP SYSLOG-MSG
                let mut out = buffer::get();
                out.put_slice(format!("{} ", msg.len()).as_bytes());
                out.put_slice(&msg);
                msg.free();
                (out, err)
            }
        }
    }
}

impl<E: PayloadEncoder> ObjectEncoder for SyslogEncoder<E> {
    fn add_string(&mut self, key: &str, val: &str) {
        self.payload.add_string(key, val)
    }
    fn add_bool(&mut self, key: &str, val: bool) {
        self.payload.add_bool(key, val)
    }
    fn add_i64(&mut self, key: &str, val: i64) {
        self.payload.add_i64(key, val)
    }
    fn add_u64(&mut self, key: &str, val: u64) {
        self.payload.add_u64(key, val)
    }
    fn add_f64(&mut self, key: &str, val: f64) {
        self.payload.add_f64(key, val)
    }
    fn add_f32(&mut self, key: &str, val: f32) {
        self.payload.add_f32(key, val)
    }
    fn add_duration(&mut self, key: &str, val: Duration) {
        self.payload.add_duration(key, val)
    }
    fn add_time(&mut self, key: &str, val: DateTime<Utc>) {
        self.payload.add_time(key, val)
    }
    fn add_binary(&mut self, key: &str, val: &[u8]) {
        self.payload.add_binary(key, val)
    }
    fn add_byte_string(&mut self, key: &str, val: &[u8]) {
        self.payload.add_byte_string(key, val)
    }
    fn add_complex(&mut self, key: &str, re: f64, im: f64) {
        self.payload.add_complex(key, re, im)
    }
    fn add_object(&mut self, key: &str, obj: &dyn ObjectMarshaler) -> MarshalResult {
        self.payload.add_object(key, obj)
    }
    fn add_array(&mut self, key: &str, arr: &dyn ArrayMarshaler) -> MarshalResult {
        self.payload.add_array(key, arr)
    }
    fn add_value(&mut self, key: &str, val: &serde_json::Value) {
        self.payload.add_value(key, val)
    }
    fn open_namespace(&mut self, key: &str) {
        self.payload.open_namespace(key)
    }
}

impl<E: PayloadEncoder + ArrayEncoder> ArrayEncoder for SyslogEncoder<E> {
    fn append_string(&mut self, val: &str) {
        self.payload.append_string(val)
    }
    fn append_bool(&mut self, val: bool) {
        self.payload.append_bool(val)
    }
    fn append_i64(&mut self, val: i64) {
        self.payload.append_i64(val)
    }
    fn append_u64(&mut self, val: u64) {
        self.payload.append_u64(val)
    }
    fn append_f64(&mut self, val: f64) {
        self.payload.append_f64(val)
    }
    fn append_f32(&mut self, val: f32) {
        self.payload.append_f32(val)
    }
    fn append_duration(&mut self, val: Duration) {
        self.payload.append_duration(val)
    }
    fn append_time(&mut self, val: DateTime<Utc>) {
        self.payload.append_time(val)
    }
    fn append_byte_string(&mut self, val: &[u8]) {
        self.payload.append_byte_string(val)
    }
    fn append_complex(&mut self, re: f64, im: f64) {
        self.payload.append_complex(re, im)
    }
    fn append_object(&mut self, obj: &dyn ObjectMarshaler) -> MarshalResult {
        self.payload.append_object(obj)
    }
    fn append_array(&mut self, arr: &dyn ArrayMarshaler) -> MarshalResult {
        self.payload.append_array(arr)
    }
    fn append_value(&mut self, val: &serde_json::Value) {
        self.payload.append_value(val)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::entry::Level;

    use serde_json::Value;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::nanoseconds(123_456_789)
    }

    fn test_entry() -> Entry {
        Entry {
            level: Level::Debug,
            time: Some(test_time()),
            message: "fake".to_string(),
            ..Default::default()
        }
    }

    fn test_encoder(framing: Framing) -> SyslogEncoder {
        let mut enc = SyslogEncoder::builder()
            .facility(Facility::LOG_LOCAL0)
            .hostname("localhost")
            .app_name("encoder_test")
            .pid(9876)
            .framing(framing)
            .build();
        enc.add_string("str", "foo");
        enc.add_i64("int64-1", 1);
        enc.add_f64("float64", 1.0);
        enc.add_bool("bool", true);
        enc
    }

    const HEADER: &str =
        "<135>1 2017-01-02T03:04:05.123456Z localhost encoder_test 9876 - - \u{feff}";

    #[test]
    fn header_and_json_payload() {
        let enc = test_encoder(Framing::NonTransparent);
        let (buf, err) = enc.encode_entry(&test_entry(), &[]);
        assert!(err.is_none());
        let text = std::str::from_utf8(&buf).unwrap();
        assert!(text.starts_with(HEADER), "{}", text);
        assert!(text.ends_with('\n'));

        let v: Value = serde_json::from_str(&text[HEADER.len()..]).unwrap();
        assert_eq!(v["level"], "debug");
        assert_eq!(v["msg"], "fake");
        assert_eq!(v["str"], "foo");
        assert_eq!(v["int64-1"], 1);
        assert_eq!(v["float64"], 1.0);
        assert_eq!(v["bool"], true);
    }

    #[test]
    fn octet_counting() {
        let (plain, _) = test_encoder(Framing::NonTransparent).encode_entry(&test_entry(), &[]);
        let (framed, _) = test_encoder(Framing::OctetCounting).encode_entry(&test_entry(), &[]);

        let plain = std::str::from_utf8(&plain).unwrap();
        let framed = std::str::from_utf8(&framed).unwrap();
        let stripped = &plain[..plain.len() - 1];
        assert_eq!(framed, format!("{} {}", stripped.len(), stripped));
        assert!(!framed.ends_with('\n'));
    }

    #[test]
    fn nil_timestamp() {
        let enc = test_encoder(Framing::NonTransparent);
        let entry = Entry {
            level: Level::Error,
            message: "no time".to_string(),
            ..Default::default()
        };
        let (buf, _) = enc.encode_entry(&entry, &[]);
        let text = std::str::from_utf8(&buf).unwrap();
        assert!(text.starts_with("<131>1 - localhost encoder_test 9876 - - \u{feff}{"));
    }

    /// A payload encoder that never produces anything
    #[derive(Clone)]
    struct Silent;

    impl ObjectEncoder for Silent {
        fn add_string(&mut self, _: &str, _: &str) {}
        fn add_bool(&mut self, _: &str, _: bool) {}
        fn add_i64(&mut self, _: &str, _: i64) {}
        fn add_u64(&mut self, _: &str, _: u64) {}
        fn add_f64(&mut self, _: &str, _: f64) {}
        fn add_f32(&mut self, _: &str, _: f32) {}
        fn add_duration(&mut self, _: &str, _: Duration) {}
        fn add_time(&mut self, _: &str, _: DateTime<Utc>) {}
        fn add_binary(&mut self, _: &str, _: &[u8]) {}
        fn add_byte_string(&mut self, _: &str, _: &[u8]) {}
        fn add_complex(&mut self, _: &str, _: f64, _: f64) {}
        fn add_object(&mut self, _: &str, _: &dyn ObjectMarshaler) -> MarshalResult {
            Ok(())
        }
        fn add_array(&mut self, _: &str, _: &dyn ArrayMarshaler) -> MarshalResult {
            Ok(())
        }
        fn add_value(&mut self, _: &str, _: &Value) {}
        fn open_namespace(&mut self, _: &str) {}
    }

    impl PayloadEncoder for Silent {
        fn encode_entry(&self, _: &Entry, _: &[Field]) -> (Buffer, Option<Error>) {
            (buffer::get(), None)
        }
    }

    #[test]
    fn empty_payload() {
        let builder = SyslogEncoder::builder()
            .hostname("host")
            .app_name("app")
            .pid(1)
            .payload_encoder(Silent);
        let enc = builder.build();
        let entry = Entry {
            level: Level::Info,
            ..Default::default()
        };
        let (buf, _) = enc.encode_entry(&entry, &[]);
        assert_eq!(&buf[..], b"<14>1 - host app 1 - -");

        let enc = SyslogEncoder::builder()
            .hostname("host")
            .app_name("app")
            .pid(1)
            .framing(Framing::OctetCounting)
            .payload_encoder(Silent)
            .build();
        let (buf, _) = enc.encode_entry(&entry, &[]);
        assert_eq!(&buf[..], b"22 <14>1 - host app 1 - -");
    }

    #[test]
    fn header_fields_are_normalized() {
        let long_path = format!("/opt/{}/bin/my daemon", "d".repeat(60));
        let enc = SyslogEncoder::builder()
            .hostname("my host\u{e9}")
            .app_name(long_path)
            .build();
        assert_eq!(enc.hostname(), "my_host_");
        assert_eq!(enc.app_name(), "my_daemon");
        assert_eq!(enc.pid(), std::process::id());
        assert_eq!(enc.facility(), Facility::LOG_USER);
        assert_eq!(enc.framing(), Framing::NonTransparent);

        let enc = SyslogEncoder::builder().build();
        assert_eq!(enc.app_name(), "-");
        assert!(!enc.hostname().is_empty());
        assert!(enc.hostname().bytes().all(|b| (33..=126).contains(&b)));
    }

    #[test]
    fn clones_accumulate_independently() {
        let base = test_encoder(Framing::NonTransparent);
        let mut child = base.clone();
        child.add_string("child", "only");

        let (buf, _) = base.encode_entry(&test_entry(), &[]);
        let text = std::str::from_utf8(&buf).unwrap();
        let v: Value = serde_json::from_str(&text[HEADER.len()..]).unwrap();
        assert!(v.get("child").is_none());

        let (buf, _) = child.encode_entry(&test_entry(), &[]);
        let text = std::str::from_utf8(&buf).unwrap();
        let v: Value = serde_json::from_str(&text[HEADER.len()..]).unwrap();
        assert_eq!(v["child"], "only");
        assert_eq!(child.hostname(), base.hostname());
    }

    #[test]
    fn marshal_errors_still_produce_a_message() {
        let enc = test_encoder(Framing::OctetCounting);
        let bad = Field::object("obj", |_: &mut dyn ObjectEncoder| -> MarshalResult {
            Err("can't".into())
        });
        let (buf, err) = enc.encode_entry(&test_entry(), &[bad]);
        assert!(matches!(err, Some(Error::Marshal { .. })));

        let text = std::str::from_utf8(&buf).unwrap();
        let (len, msg) = text.split_once(' ').unwrap();
        assert_eq!(len.parse::<usize>().unwrap(), msg.len());
        let v: Value = serde_json::from_str(&msg[HEADER.len()..]).unwrap();
        assert_eq!(v["obj"], serde_json::json!({}));
        assert!(v["objError"].is_string());
    }

    #[test]
    fn parses_as_rfc5424() {
        let enc = test_encoder(Framing::NonTransparent);
        let (buf, _) = enc.encode_entry(&test_entry(), &[Field::string("k", "v")]);
        let text = std::str::from_utf8(&buf).unwrap();

        let msg = syslog_rfc5424::parse_message(text).unwrap();
        assert_eq!(msg.facility, syslog_rfc5424::SyslogFacility::LOG_LOCAL0);
        assert_eq!(msg.severity, syslog_rfc5424::SyslogSeverity::SEV_DEBUG);
        assert_eq!(msg.hostname.as_deref(), Some("localhost"));
        assert_eq!(msg.appname.as_deref(), Some("encoder_test"));
        assert_eq!(msg.procid, Some(syslog_rfc5424::message::ProcId::PID(9876)));
        let v: Value = serde_json::from_str(msg.msg.trim_start_matches('\u{feff}')).unwrap();
        assert_eq!(v["k"], "v");
    }

    #[test]
    fn appends_reach_the_payload() {
        let mut enc = test_encoder(Framing::NonTransparent);
        let mut json = enc.payload().clone();
        let encoders: [&mut dyn ArrayEncoder; 2] = [&mut enc, &mut json];
        for arr in encoders {
            arr.append_string("a");
            arr.append_u32(2);
            arr.append_value(&serde_json::json!({"k": "v"}));
        }

        let (buf, _) = enc.encode_entry(&test_entry(), &[]);
        let (payload, _) = json.encode_entry(&test_entry(), &[]);
        let text = std::str::from_utf8(&buf).unwrap();
        assert!(text.starts_with(HEADER), "{}", text);
        assert_eq!(&text[HEADER.len()..], std::str::from_utf8(&payload).unwrap());
        assert!(text.contains(r#""bool":true,"a",2,{"k":"v"}"#), "{}", text);
    }

    #[test]
    fn from_config() {
        let cfg: SyslogEncoderConfig = serde_json::from_str(
            r#"{
                 "facility": "LOG_LOCAL0",
                 "framing": "octet_counting",
                 "hostname": "localhost",
                 "pid": 9876,
                 "app": "encoder_test",
                 "messageKey": "message",
                 "lineEnding": "\r\n"
               }"#,
        )
        .unwrap();
        let enc = SyslogEncoder::new(cfg);
        assert_eq!(enc.framing(), Framing::OctetCounting);
        assert_eq!(enc.payload().config().line_ending, "\n");

        let (buf, _) = enc.encode_entry(&test_entry(), &[]);
        let text = std::str::from_utf8(&buf).unwrap();
        let (_, msg) = text.split_once(' ').unwrap();
        assert!(msg.starts_with(HEADER));
        let v: Value = serde_json::from_str(&msg[HEADER.len()..]).unwrap();
        assert_eq!(v["message"], "fake");
    }
}
