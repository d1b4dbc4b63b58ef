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

//! Coercing names into RFC [5424] header fields.
//!
//! [5424]: https://datatracker.ietf.org/doc/html/rfc5424
//!
//! Rather than rejecting a hostname or application name that isn't legal in a syslog header, we
//! map it into one that is. HOSTNAME & APP-NAME are restricted to PRINTUSASCII (%d33-126); every
//! codepoint outside that range becomes a single `_`.

/// The NILVALUE
pub const NIL_VALUE: &str = "-";

pub const MAX_HOSTNAME_LEN: usize = 255;
pub const MAX_APP_NAME_LEN: usize = 48;

fn printable_ascii(c: char) -> char {
    // PRINTUSASCII = %d33-126
    if (c as u32) < 33 || (c as u32) > 126 {
        '_'
    } else {
        c
    }
}

/// Replace every codepoint outside PRINTUSASCII with `_`
pub fn to_printable_ascii(s: &str) -> String {
    s.chars().map(printable_ascii).collect()
}

/// Produce an RFC 5424-compliant HOSTNAME: sanitized, at most 255 characters, or the NILVALUE if
/// `name` is empty.
pub fn hostname(name: &str) -> String {
    if name.is_empty() {
        return NIL_VALUE.to_string();
    }
    let mut hostname = to_printable_ascii(name);
    // all ASCII now, so bytes & characters coincide
    hostname.truncate(MAX_HOSTNAME_LEN);
    hostname
}

/// Produce an RFC 5424-compliant APP-NAME: at most 48 characters, sanitized, or the NILVALUE if
/// `name` is empty.
///
/// An over-long name is assumed to be a path to the executable, and so is first reduced to its
/// final path segment; if that's *still* too long, it's truncated.
pub fn app_name(name: &str) -> String {
    if name.is_empty() {
        return NIL_VALUE.to_string();
    }
    let mut app = name;
    if app.chars().count() > MAX_APP_NAME_LEN {
        app = base_name(app);
    }
    let truncated: String = app.chars().take(MAX_APP_NAME_LEN).collect();
    to_printable_ascii(&truncated)
}

/// The last element of a `/`-separated path, ignoring trailing slashes
fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.is_empty() { "." } else { "/" };
    }
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}
