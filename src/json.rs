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

//! A [`PayloadEncoder`] producing one JSON object per event.
//!
//! [`JsonEncoder`] writes JSON text directly into a pooled [`Buffer`] as fields are added, rather
//! than building a tree & serializing it at the end; encoding an entry is then mostly a matter of
//! copying bytes. String escaping & number formatting are delegated to [`serde_json`].

use crate::{
    buffer::{self, Buffer},
    entry::{Caller, Entry, Level},
    error::Error,
    field::{ArrayEncoder, ArrayMarshaler, Field, MarshalResult, ObjectEncoder, ObjectMarshaler},
    formatter::PayloadEncoder,
};

use base64::Engine;
use chrono::{prelude::*, SecondsFormat};

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                         configuration                                          //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// How to render an entry's [`Level`]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelEncoder {
    /// "info"
    #[default]
    Lowercase,
    /// "INFO"
    #[serde(alias = "uppercase")]
    Capital,
}

/// How to render timestamps
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeEncoder {
    /// floating-point seconds since the Unix epoch
    #[default]
    Epoch,
    /// floating-point milliseconds since the Unix epoch
    EpochMillis,
    /// integral nanoseconds since the Unix epoch
    EpochNanos,
    /// ISO 8601 with millisecond precision
    Iso8601,
    /// RFC 3339, whole seconds
    Rfc3339,
    /// RFC 3339, with as many fractional digits as needed
    Rfc3339Nano,
}

/// How to render [`Duration`]s
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationEncoder {
    /// floating-point seconds
    #[default]
    Seconds,
    /// floating-point milliseconds
    Millis,
    /// integral nanoseconds
    Nanos,
    /// human-readable, e.g. "1.5s"
    String,
}

/// How to render a [`Caller`]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerEncoder {
    /// final directory & file name only: "pkg/file.rs:42"
    #[default]
    Short,
    /// the full path
    Full,
}

/// Key names & formatters for [`JsonEncoder`]. A key set to the empty string is omitted.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JsonEncoderConfig {
    pub message_key: String,
    pub level_key: String,
    pub time_key: String,
    pub name_key: String,
    pub caller_key: String,
    pub function_key: String,
    pub stacktrace_key: String,
    pub line_ending: String,
    pub encode_level: LevelEncoder,
    pub encode_time: TimeEncoder,
    pub encode_duration: DurationEncoder,
    pub encode_caller: CallerEncoder,
}

impl std::default::Default for JsonEncoderConfig {
    fn default() -> Self {
        JsonEncoderConfig {
            message_key: "msg".to_string(),
            level_key: "level".to_string(),
            time_key: "ts".to_string(),
            name_key: "logger".to_string(),
            caller_key: "caller".to_string(),
            function_key: String::new(),
            stacktrace_key: "stacktrace".to_string(),
            line_ending: "\n".to_string(),
            encode_level: LevelEncoder::default(),
            encode_time: TimeEncoder::default(),
            encode_duration: DurationEncoder::default(),
            encode_caller: CallerEncoder::default(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                       struct JsonEncoder                                       //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Accumulates fields as JSON text; see the [module documentation](self)
pub struct JsonEncoder {
    config: Arc<JsonEncoderConfig>,
    /// The fields added so far, comma-separated, without enclosing braces
    buf: Buffer,
    open_namespaces: usize,
}

impl Clone for JsonEncoder {
    fn clone(&self) -> Self {
        JsonEncoder {
            config: self.config.clone(),
            buf: self.buf.clone(),
            open_namespaces: self.open_namespaces,
        }
    }
}

impl std::fmt::Debug for JsonEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonEncoder")
            .field("config", &self.config)
            .field("open_namespaces", &self.open_namespaces)
            .finish_non_exhaustive()
    }
}

impl std::default::Default for JsonEncoder {
    fn default() -> Self {
        JsonEncoder::new(JsonEncoderConfig::default())
    }
}

impl JsonEncoder {
    pub fn new(config: JsonEncoderConfig) -> JsonEncoder {
        JsonEncoder {
            config: Arc::new(config),
            buf: buffer::get(),
            open_namespaces: 0,
        }
    }

    pub fn config(&self) -> &JsonEncoderConfig {
        &self.config
    }

    fn add_element_separator(&mut self) {
        match self.buf.last() {
            None | Some(b'{') | Some(b'[') | Some(b':') | Some(b',') | Some(b' ') => (),
            Some(_) => self.buf.push(b','),
        }
    }

    fn add_key(&mut self, key: &str) {
        self.add_element_separator();
        self.write_str(key);
        self.buf.push(b':');
    }

    fn write_str(&mut self, s: &str) {
        // Writes into a `Vec` can't fail.
        let _ = serde_json::to_writer(&mut *self.buf, s);
    }

    fn write_display<T: std::fmt::Display>(&mut self, val: T) {
        let _ = write!(&mut *self.buf, "{}", val);
    }

    fn write_f64(&mut self, val: f64) {
        if val.is_nan() {
            self.write_str("NaN");
        } else if val.is_infinite() {
            self.write_str(if val > 0.0 { "+Inf" } else { "-Inf" });
        } else {
            let _ = serde_json::to_writer(&mut *self.buf, &val);
        }
    }

    fn write_f32(&mut self, val: f32) {
        if !val.is_finite() {
            self.write_f64(val as f64);
        } else {
            let _ = serde_json::to_writer(&mut *self.buf, &val);
        }
    }

    fn write_value(&mut self, val: &serde_json::Value) {
        let _ = serde_json::to_writer(&mut *self.buf, val);
    }

    fn write_level(&mut self, level: Level) {
        match self.config.encode_level {
            LevelEncoder::Lowercase => self.write_str(level.as_str()),
            LevelEncoder::Capital => self.write_str(&level.as_str().to_ascii_uppercase()),
        }
    }

    fn write_time(&mut self, val: DateTime<Utc>) {
        match self.config.encode_time {
            TimeEncoder::Epoch => {
                self.write_f64(val.timestamp() as f64 + val.timestamp_subsec_nanos() as f64 / 1e9)
            }
            TimeEncoder::EpochMillis => self.write_f64(
                val.timestamp_millis() as f64
                    + (val.timestamp_subsec_nanos() % 1_000_000) as f64 / 1e6,
            ),
            TimeEncoder::EpochNanos => match val.timestamp_nanos_opt() {
                Some(nanos) => self.write_display(nanos),
                // out of range for an i64; fall back to something lossless
                None => self.write_str(&val.to_rfc3339_opts(SecondsFormat::Nanos, true)),
            },
            TimeEncoder::Iso8601 => {
                self.write_str(&val.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
            }
            TimeEncoder::Rfc3339 => self.write_str(&val.to_rfc3339_opts(SecondsFormat::Secs, true)),
            TimeEncoder::Rfc3339Nano => {
                self.write_str(&val.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }

    fn write_duration(&mut self, val: Duration) {
        match self.config.encode_duration {
            DurationEncoder::Seconds => self.write_f64(val.as_secs_f64()),
            DurationEncoder::Millis => self.write_f64(val.as_secs_f64() * 1e3),
            DurationEncoder::Nanos => self.write_display(val.as_nanos()),
            DurationEncoder::String => self.write_str(&format!("{:?}", val)),
        }
    }

    fn write_caller(&mut self, caller: &Caller) {
        let file = match self.config.encode_caller {
            CallerEncoder::Full => caller.file.as_str(),
            CallerEncoder::Short => short_path(&caller.file),
        };
        self.write_str(&format!("{}:{}", file, caller.line));
    }

    fn write_complex(&mut self, re: f64, im: f64) {
        self.write_str(&format!("{}{:+}i", re, im));
    }

    fn close_open_namespaces(&mut self) {
        for _ in 0..self.open_namespaces {
            self.buf.push(b'}');
        }
        self.open_namespaces = 0;
    }

    /// Marshal a nested object; on failure the object is left empty. Namespaces opened by the
    /// marshaler are closed along with the object.
    fn nested_object(&mut self, obj: &dyn ObjectMarshaler) -> MarshalResult {
        let outer = std::mem::replace(&mut self.open_namespaces, 0);
        self.buf.push(b'{');
        let start = self.buf.len();
        let res = obj.marshal_object(self);
        match res {
            Ok(()) => self.close_open_namespaces(),
            Err(_) => self.buf.truncate(start),
        }
        self.open_namespaces = outer;
        self.buf.push(b'}');
        res
    }

    fn nested_array(&mut self, arr: &dyn ArrayMarshaler) -> MarshalResult {
        self.buf.push(b'[');
        let start = self.buf.len();
        let res = arr.marshal_array(self);
        if res.is_err() {
            self.buf.truncate(start);
        }
        self.buf.push(b']');
        res
    }
}

/// Trim a path to its final directory & file name
fn short_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(last) => match path[..last].rfind('/') {
            Some(prev) => &path[prev + 1..],
            None => path,
        },
        None => path,
    }
}

impl ObjectEncoder for JsonEncoder {
    fn add_string(&mut self, key: &str, val: &str) {
        self.add_key(key);
        self.write_str(val);
    }
    fn add_bool(&mut self, key: &str, val: bool) {
        self.add_key(key);
        self.write_display(val);
    }
    fn add_i64(&mut self, key: &str, val: i64) {
        self.add_key(key);
        self.write_display(val);
    }
    fn add_u64(&mut self, key: &str, val: u64) {
        self.add_key(key);
        self.write_display(val);
    }
    fn add_f64(&mut self, key: &str, val: f64) {
        self.add_key(key);
        self.write_f64(val);
    }
    fn add_f32(&mut self, key: &str, val: f32) {
        self.add_key(key);
        self.write_f32(val);
    }
    fn add_duration(&mut self, key: &str, val: Duration) {
        self.add_key(key);
        self.write_duration(val);
    }
    fn add_time(&mut self, key: &str, val: DateTime<Utc>) {
        self.add_key(key);
        self.write_time(val);
    }
    fn add_binary(&mut self, key: &str, val: &[u8]) {
        self.add_key(key);
        self.write_str(&base64::engine::general_purpose::STANDARD.encode(val));
    }
    fn add_byte_string(&mut self, key: &str, val: &[u8]) {
        self.add_key(key);
        self.write_str(&String::from_utf8_lossy(val));
    }
    fn add_complex(&mut self, key: &str, re: f64, im: f64) {
        self.add_key(key);
        self.write_complex(re, im);
    }
    fn add_object(&mut self, key: &str, obj: &dyn ObjectMarshaler) -> MarshalResult {
        self.add_key(key);
        self.nested_object(obj)
    }
    fn add_array(&mut self, key: &str, arr: &dyn ArrayMarshaler) -> MarshalResult {
        self.add_key(key);
        self.nested_array(arr)
    }
    fn add_value(&mut self, key: &str, val: &serde_json::Value) {
        self.add_key(key);
        self.write_value(val);
    }
    fn open_namespace(&mut self, key: &str) {
        self.add_key(key);
        self.buf.push(b'{');
        self.open_namespaces += 1;
    }
}

impl ArrayEncoder for JsonEncoder {
    fn append_string(&mut self, val: &str) {
        self.add_element_separator();
        self.write_str(val);
    }
    fn append_bool(&mut self, val: bool) {
        self.add_element_separator();
        self.write_display(val);
    }
    fn append_i64(&mut self, val: i64) {
        self.add_element_separator();
        self.write_display(val);
    }
    fn append_u64(&mut self, val: u64) {
        self.add_element_separator();
        self.write_display(val);
    }
    fn append_f64(&mut self, val: f64) {
        self.add_element_separator();
        self.write_f64(val);
    }
    fn append_f32(&mut self, val: f32) {
        self.add_element_separator();
        self.write_f32(val);
    }
    fn append_duration(&mut self, val: Duration) {
        self.add_element_separator();
        self.write_duration(val);
    }
    fn append_time(&mut self, val: DateTime<Utc>) {
        self.add_element_separator();
        self.write_time(val);
    }
    fn append_byte_string(&mut self, val: &[u8]) {
        self.add_element_separator();
        self.write_str(&String::from_utf8_lossy(val));
    }
    fn append_complex(&mut self, re: f64, im: f64) {
        self.add_element_separator();
        self.write_complex(re, im);
    }
    fn append_object(&mut self, obj: &dyn ObjectMarshaler) -> MarshalResult {
        self.add_element_separator();
        self.nested_object(obj)
    }
    fn append_array(&mut self, arr: &dyn ArrayMarshaler) -> MarshalResult {
        self.add_element_separator();
        self.nested_array(arr)
    }
    fn append_value(&mut self, val: &serde_json::Value) {
        self.add_element_separator();
        self.write_value(val);
    }
}

impl PayloadEncoder for JsonEncoder {
    fn encode_entry(&self, entry: &Entry, fields: &[Field]) -> (Buffer, Option<Error>) {
        let config = self.config.clone();
        let mut fin = JsonEncoder {
            config: config.clone(),
            buf: buffer::get(),
            open_namespaces: 0,
        };
        fin.buf.push(b'{');

        if !config.level_key.is_empty() {
            fin.add_key(&config.level_key);
            fin.write_level(entry.level);
        }
        if let (false, Some(time)) = (config.time_key.is_empty(), entry.time) {
            fin.add_time(&config.time_key, time);
        }
        if !config.name_key.is_empty() && !entry.logger_name.is_empty() {
            fin.add_string(&config.name_key, &entry.logger_name);
        }
        if let Some(caller) = &entry.caller {
            if !config.caller_key.is_empty() {
                fin.add_key(&config.caller_key);
                fin.write_caller(caller);
            }
            if let (false, Some(function)) = (config.function_key.is_empty(), &caller.function) {
                fin.add_string(&config.function_key, function);
            }
        }
        if !config.message_key.is_empty() {
            fin.add_string(&config.message_key, &entry.message);
        }

        if !self.buf.is_empty() {
            fin.add_element_separator();
            fin.buf.extend_from_slice(&self.buf);
        }
        fin.open_namespaces = self.open_namespaces;

        let mut error = None;
        for field in fields {
            if let Err(err) = field.add_to(&mut fin) {
                fin.add_string(&format!("{}Error", field.key()), &err.to_string());
                error.get_or_insert(err);
            }
        }
        fin.close_open_namespaces();

        if !entry.stack.is_empty() && !config.stacktrace_key.is_empty() {
            fin.add_string(&config.stacktrace_key, &entry.stack);
        }
        fin.buf.push(b'}');
        fin.buf.extend_from_slice(config.line_ending.as_bytes());
        (fin.buf, error)
    }
}
