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

//! Payload formatting primitives.
//!
//! This module defines the [`PayloadEncoder`] trait.

use crate::{buffer::Buffer, entry::Entry, error::Error, field::Field, field::ObjectEncoder};

/// Operations all payload encoders must support
/// =============================================
///
/// # Introduction
///
/// The translation from a log event to a syslog message occurs in three parts:
///
/// 1. encoding the event, along with any fields accumulated beforehand, to a payload
///
/// 2. wrapping that payload in an RFC 5424 envelope & framing it for transport
///
/// 3. transporting the framed message to the daemon
///
/// [`PayloadEncoder`] implements step 1. [`SyslogEncoder`] handles step 2 & is generic over
/// [`PayloadEncoder`], so any implementation may be substituted for the [`JsonEncoder`] that
/// ships with this crate.
///
/// # Design
///
/// Fields accumulate in the encoder itself (through the [`ObjectEncoder`] supertrait), so
/// [`Clone`] carries a stronger requirement than usual: a clone must own an *independent* copy of
/// every field added so far. Adding a field to a clone must never show up in the original. The
/// idiom is to set up an encoder once, with the fields common to every event, and clone it per
/// event.
///
/// `encode_entry` doesn't fail outright: an error marshaling one of the fields still produces a
/// complete (best-effort) payload, and the error is returned next to it.
///
/// [`SyslogEncoder`]: crate::rfc5424::SyslogEncoder
/// [`JsonEncoder`]: crate::json::JsonEncoder
pub trait PayloadEncoder: ObjectEncoder + Clone {
    /// Encode `entry`, every field accumulated so far, and then `fields`. The returned buffer
    /// is terminated with the encoder's line ending.
    fn encode_entry(&self, entry: &Entry, fields: &[Field]) -> (Buffer, Option<Error>);
}
