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

//! Mapping log levels & facilities onto the syslog PRI field.

use crate::{
    entry::Level,
    facility::{Facility, Severity},
};

const SEVERITY_MASK: u8 = 0x07;
const FACILITY_MASK: u8 = 0xf8;

/// The PRI part of a syslog header; always in [0, 191].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Priority(u8);

impl Priority {
    pub fn new(facility: Facility, severity: Severity) -> Priority {
        Priority((facility as u8 & FACILITY_MASK) | (severity as u8 & SEVERITY_MASK))
    }
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Fatal => Severity::LOG_EMERG,
            Level::Panic | Level::DPanic => Severity::LOG_CRIT,
            Level::Error => Severity::LOG_ERR,
            Level::Warn => Severity::LOG_WARNING,
            Level::Info => Severity::LOG_INFO,
            Level::Debug => Severity::LOG_DEBUG,
        }
    }
}

impl Severity {
    /// Map a raw numeric level (see [`Level::from_raw`]) to a severity.
    ///
    /// Unrecognized levels fall back to [`Severity::LOG_EMERG`], the zero value of the severity
    /// bits; that way an event logged at a level we don't know about still reaches the daemon,
    /// and at an urgency that will get it noticed.
    pub fn from_raw_level(raw: i8) -> Severity {
        Level::from_raw(raw)
            .map(Severity::from)
            .unwrap_or(Severity::LOG_EMERG)
    }
}

/// Compute the syslog priority for an event logged at `level` under `facility`
pub fn priority(level: Level, facility: Facility) -> Priority {
    Priority::new(facility, level.into())
}

#[cfg(test)]
mod test {
    use super::*;

    const LEVELS: [Level; 7] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::DPanic,
        Level::Panic,
        Level::Fatal,
    ];

    #[test]
    fn test_pri() {
        assert_eq!(14, Priority::new(Facility::LOG_USER, Severity::LOG_INFO).value());
        assert_eq!(135, priority(Level::Debug, Facility::LOG_LOCAL0).value());
        assert_eq!(0, priority(Level::Fatal, Facility::LOG_KERN).value());
        assert_eq!(186, priority(Level::Panic, Facility::LOG_LOCAL7).value());
        assert_eq!("186", format!("{}", priority(Level::DPanic, Facility::LOG_LOCAL7)));
    }

    #[test]
    fn test_severity_table() {
        assert_eq!(Severity::from(Level::Fatal), Severity::LOG_EMERG);
        assert_eq!(Severity::from(Level::Panic), Severity::LOG_CRIT);
        assert_eq!(Severity::from(Level::DPanic), Severity::LOG_CRIT);
        assert_eq!(Severity::from(Level::Error), Severity::LOG_ERR);
        assert_eq!(Severity::from(Level::Warn), Severity::LOG_WARNING);
        assert_eq!(Severity::from(Level::Info), Severity::LOG_INFO);
        assert_eq!(Severity::from(Level::Debug), Severity::LOG_DEBUG);
    }

    #[test]
    fn test_every_pair_composes() {
        for name in [
            "kern", "user", "mail", "daemon", "auth", "syslog", "lpr", "news", "uucp", "cron",
            "authpriv", "ftp", "ntp", "audit", "alert", "clock", "local0", "local1", "local2",
            "local3", "local4", "local5", "local6", "local7",
        ] {
            let facility: Facility = name.parse().unwrap();
            for level in LEVELS {
                let pri = priority(level, facility).value();
                let expected = (facility as u8 & 0xf8) | (Severity::from(level) as u8 & 0x07);
                assert_eq!(pri, expected);
                assert!(pri <= 191);
            }
        }
    }

    #[test]
    fn test_unknown_raw_level_is_emergency() {
        assert_eq!(Severity::from_raw_level(-1), Severity::LOG_DEBUG);
        assert_eq!(Severity::from_raw_level(4), Severity::LOG_CRIT);
        assert_eq!(Severity::from_raw_level(42), Severity::LOG_EMERG);
        assert_eq!(Severity::from_raw_level(i8::MIN), Severity::LOG_EMERG);
        assert_eq!(
            8,
            Priority::new(Facility::LOG_USER, Severity::from_raw_level(99)).value()
        );
    }
}
