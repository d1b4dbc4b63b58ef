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

//! Structured fields & the encoders that accept them.
//!
//! [`ObjectEncoder`] and [`ArrayEncoder`] are the capabilities a payload encoder must offer:
//! typed setters for scalars, nested objects & arrays produced by caller-supplied marshalers, and
//! namespaces. They're object-safe, so marshalers can be written against `&mut dyn ObjectEncoder`
//! and work with any implementation.
//!
//! A marshaler that fails doesn't abort anything: the encoder writes an empty object (or array)
//! in its place and hands the error back.

use crate::error::{Error, Result};

use chrono::prelude::*;

use std::sync::Arc;
use std::time::Duration;

/// What marshalers return
pub type MarshalResult =
    std::result::Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;

/// Something that knows how to write itself as a nested object
pub trait ObjectMarshaler {
    fn marshal_object(&self, enc: &mut dyn ObjectEncoder) -> MarshalResult;
}

/// Something that knows how to write itself as a nested array
pub trait ArrayMarshaler {
    fn marshal_array(&self, enc: &mut dyn ArrayEncoder) -> MarshalResult;
}

impl<F> ObjectMarshaler for F
where
    F: Fn(&mut dyn ObjectEncoder) -> MarshalResult,
{
    fn marshal_object(&self, enc: &mut dyn ObjectEncoder) -> MarshalResult {
        self(enc)
    }
}

impl<F> ArrayMarshaler for F
where
    F: Fn(&mut dyn ArrayEncoder) -> MarshalResult,
{
    fn marshal_array(&self, enc: &mut dyn ArrayEncoder) -> MarshalResult {
        self(enc)
    }
}

/// Key/value operations all payload encoders must support
pub trait ObjectEncoder {
    fn add_string(&mut self, key: &str, val: &str);
    fn add_bool(&mut self, key: &str, val: bool);
    fn add_i64(&mut self, key: &str, val: i64);
    fn add_u64(&mut self, key: &str, val: u64);
    fn add_f64(&mut self, key: &str, val: f64);
    fn add_f32(&mut self, key: &str, val: f32);
    fn add_duration(&mut self, key: &str, val: Duration);
    fn add_time(&mut self, key: &str, val: DateTime<Utc>);
    /// Opaque bytes (base64-encoded by the JSON encoder)
    fn add_binary(&mut self, key: &str, val: &[u8]);
    /// UTF-8 text that happens to live in a byte slice
    fn add_byte_string(&mut self, key: &str, val: &[u8]);
    fn add_complex(&mut self, key: &str, re: f64, im: f64);
    fn add_object(&mut self, key: &str, obj: &dyn ObjectMarshaler) -> MarshalResult;
    fn add_array(&mut self, key: &str, arr: &dyn ArrayMarshaler) -> MarshalResult;
    /// An arbitrary, already-serialized value
    fn add_value(&mut self, key: &str, val: &serde_json::Value);
    /// Every field added after this call (up to the end of the enclosing object) is nested under
    /// `key`.
    fn open_namespace(&mut self, key: &str);

    fn add_i32(&mut self, key: &str, val: i32) {
        self.add_i64(key, val as i64)
    }
    fn add_i16(&mut self, key: &str, val: i16) {
        self.add_i64(key, val as i64)
    }
    fn add_i8(&mut self, key: &str, val: i8) {
        self.add_i64(key, val as i64)
    }
    fn add_u32(&mut self, key: &str, val: u32) {
        self.add_u64(key, val as u64)
    }
    fn add_u16(&mut self, key: &str, val: u16) {
        self.add_u64(key, val as u64)
    }
    fn add_u8(&mut self, key: &str, val: u8) {
        self.add_u64(key, val as u64)
    }
    fn add_usize(&mut self, key: &str, val: usize) {
        self.add_u64(key, val as u64)
    }
}

/// Element operations all payload encoders must support
pub trait ArrayEncoder {
    fn append_string(&mut self, val: &str);
    fn append_bool(&mut self, val: bool);
    fn append_i64(&mut self, val: i64);
    fn append_u64(&mut self, val: u64);
    fn append_f64(&mut self, val: f64);
    fn append_f32(&mut self, val: f32);
    fn append_duration(&mut self, val: Duration);
    fn append_time(&mut self, val: DateTime<Utc>);
    fn append_byte_string(&mut self, val: &[u8]);
    fn append_complex(&mut self, re: f64, im: f64);
    fn append_object(&mut self, obj: &dyn ObjectMarshaler) -> MarshalResult;
    fn append_array(&mut self, arr: &dyn ArrayMarshaler) -> MarshalResult;
    fn append_value(&mut self, val: &serde_json::Value);

    fn append_i32(&mut self, val: i32) {
        self.append_i64(val as i64)
    }
    fn append_u32(&mut self, val: u32) {
        self.append_u64(val as u64)
    }
}

/// The typed payload of a [`Field`]
#[derive(Clone)]
pub enum FieldValue {
    String(String),
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    F32(f32),
    Duration(Duration),
    Time(DateTime<Utc>),
    Binary(Vec<u8>),
    ByteString(Vec<u8>),
    Complex(f64, f64),
    Object(Arc<dyn ObjectMarshaler + Send + Sync>),
    Array(Arc<dyn ArrayMarshaler + Send + Sync>),
    /// A value run through serde ahead of time; serialization failures surface at encode time
    Reflected(std::result::Result<serde_json::Value, String>),
    Namespace,
}

/// A key/value pair to be added to a payload, typically passed alongside an [`Entry`] when
/// encoding it.
///
/// [`Entry`]: crate::entry::Entry
#[derive(Clone)]
pub struct Field {
    key: String,
    value: FieldValue,
}

impl Field {
    pub fn new<K: Into<String>>(key: K, value: FieldValue) -> Field {
        Field {
            key: key.into(),
            value,
        }
    }
    pub fn string<K: Into<String>, V: Into<String>>(key: K, val: V) -> Field {
        Field::new(key, FieldValue::String(val.into()))
    }
    pub fn bool<K: Into<String>>(key: K, val: bool) -> Field {
        Field::new(key, FieldValue::Bool(val))
    }
    pub fn i64<K: Into<String>>(key: K, val: i64) -> Field {
        Field::new(key, FieldValue::I64(val))
    }
    pub fn u64<K: Into<String>>(key: K, val: u64) -> Field {
        Field::new(key, FieldValue::U64(val))
    }
    pub fn f64<K: Into<String>>(key: K, val: f64) -> Field {
        Field::new(key, FieldValue::F64(val))
    }
    pub fn f32<K: Into<String>>(key: K, val: f32) -> Field {
        Field::new(key, FieldValue::F32(val))
    }
    pub fn duration<K: Into<String>>(key: K, val: Duration) -> Field {
        Field::new(key, FieldValue::Duration(val))
    }
    pub fn time<K: Into<String>>(key: K, val: DateTime<Utc>) -> Field {
        Field::new(key, FieldValue::Time(val))
    }
    pub fn binary<K: Into<String>>(key: K, val: Vec<u8>) -> Field {
        Field::new(key, FieldValue::Binary(val))
    }
    pub fn byte_string<K: Into<String>>(key: K, val: Vec<u8>) -> Field {
        Field::new(key, FieldValue::ByteString(val))
    }
    pub fn complex<K: Into<String>>(key: K, re: f64, im: f64) -> Field {
        Field::new(key, FieldValue::Complex(re, im))
    }
    pub fn object<K, M>(key: K, obj: M) -> Field
    where
        K: Into<String>,
        M: ObjectMarshaler + Send + Sync + 'static,
    {
        Field::new(key, FieldValue::Object(Arc::new(obj)))
    }
    pub fn array<K, M>(key: K, arr: M) -> Field
    where
        K: Into<String>,
        M: ArrayMarshaler + Send + Sync + 'static,
    {
        Field::new(key, FieldValue::Array(Arc::new(arr)))
    }
    /// Anything [`serde::Serialize`]
    pub fn reflected<K: Into<String>, T: serde::Serialize + ?Sized>(key: K, val: &T) -> Field {
        Field::new(
            key,
            FieldValue::Reflected(serde_json::to_value(val).map_err(|err| err.to_string())),
        )
    }
    pub fn namespace<K: Into<String>>(key: K) -> Field {
        Field::new(key, FieldValue::Namespace)
    }

    pub fn key(&self) -> &str {
        &self.key
    }
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Write this field into `enc`.
    ///
    /// A marshaling failure still leaves a well-formed (if empty) value behind; the failure is
    /// returned so the caller can decide what to make of it.
    pub fn add_to(&self, enc: &mut dyn ObjectEncoder) -> Result<()> {
        let key = self.key.as_str();
        let res: MarshalResult = match &self.value {
            FieldValue::Object(obj) => enc.add_object(key, obj.as_ref()),
            FieldValue::Array(arr) => enc.add_array(key, arr.as_ref()),
            FieldValue::Reflected(Err(msg)) => Err(msg.clone().into()),
            scalar => {
                add_scalar(enc, key, scalar);
                Ok(())
            }
        };
        res.map_err(|err| Error::marshal(key, err))
    }
}

fn add_scalar(enc: &mut dyn ObjectEncoder, key: &str, value: &FieldValue) {
    match value {
        FieldValue::String(val) => enc.add_string(key, val),
        FieldValue::Bool(val) => enc.add_bool(key, *val),
        FieldValue::I64(val) => enc.add_i64(key, *val),
        FieldValue::U64(val) => enc.add_u64(key, *val),
        FieldValue::F64(val) => enc.add_f64(key, *val),
        FieldValue::F32(val) => enc.add_f32(key, *val),
        FieldValue::Duration(val) => enc.add_duration(key, *val),
        FieldValue::Time(val) => enc.add_time(key, *val),
        FieldValue::Binary(val) => enc.add_binary(key, val),
        FieldValue::ByteString(val) => enc.add_byte_string(key, val),
        FieldValue::Complex(re, im) => enc.add_complex(key, *re, *im),
        FieldValue::Reflected(Ok(val)) => enc.add_value(key, val),
        FieldValue::Namespace => enc.open_namespace(key),
        FieldValue::Object(_) | FieldValue::Array(_) | FieldValue::Reflected(Err(_)) => (),
    }
}
