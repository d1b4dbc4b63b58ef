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

//! Log events, as handed to the encoders.

use chrono::prelude::*;

type StdResult<T, E> = std::result::Result<T, E>;

/// The level at which an event was logged.
///
/// These are the application's notion of urgency; [`priority`](crate::priority) maps them onto
/// syslog [`Severity`](crate::facility::Severity)s.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    /// "development panic": a panic in development builds, an error in production
    DPanic,
    Panic,
    Fatal,
}

impl Level {
    /// Map a raw, numeric level onto [`Level`]
    ///
    /// The conventional numbering runs from -1 (debug) through 5 (fatal); anything else yields
    /// `None`.
    pub fn from_raw(raw: i8) -> Option<Level> {
        match raw {
            -1 => Some(Level::Debug),
            0 => Some(Level::Info),
            1 => Some(Level::Warn),
            2 => Some(Level::Error),
            3 => Some(Level::DPanic),
            4 => Some(Level::Panic),
            5 => Some(Level::Fatal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::DPanic => "dpanic",
            Level::Panic => "panic",
            Level::Fatal => "fatal",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}

impl From<&tracing::Level> for Level {
    fn from(level: &tracing::Level) -> Self {
        match level {
            &tracing::Level::TRACE | &tracing::Level::DEBUG => Level::Debug,
            &tracing::Level::INFO => Level::Info,
            &tracing::Level::WARN => Level::Warn,
            &tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Where, in the source, an event was logged
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Caller {
    pub file: String,
    pub line: u32,
    pub function: Option<String>,
}

impl Caller {
    pub fn new<S: Into<String>>(file: S, line: u32) -> Caller {
        Caller {
            file: file.into(),
            line,
            function: None,
        }
    }
}

/// A single log event
///
/// `time` of `None` plays the role of the "zero" timestamp; the syslog header will carry the
/// NILVALUE in its place.
#[derive(Clone, Debug, Default)]
pub struct Entry {
    pub level: Level,
    pub time: Option<DateTime<Utc>>,
    pub logger_name: String,
    pub message: String,
    pub caller: Option<Caller>,
    pub stack: String,
}

impl Entry {
    /// An [`Entry`] at `level`, carrying `message` & stamped with the current time.
    pub fn now<S: Into<String>>(level: Level, message: S) -> Entry {
        Entry {
            level,
            time: Some(Utc::now()),
            message: message.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn raw_levels() {
        assert_eq!(Level::from_raw(-1), Some(Level::Debug));
        assert_eq!(Level::from_raw(5), Some(Level::Fatal));
        assert_eq!(Level::from_raw(6), None);
        assert_eq!(Level::from_raw(-2), None);
    }

    #[test]
    fn tracing_levels() {
        assert_eq!(Level::from(&tracing::Level::TRACE), Level::Debug);
        assert_eq!(Level::from(&tracing::Level::WARN), Level::Warn);
        assert_eq!(format!("{}", Level::DPanic), "dpanic");
    }
}
