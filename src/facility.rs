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

//! syslog facility & severity defintions.
//!
//! [`Facility`] and [`Severity`] replicate the names used in `<syslog.h>`. Facilities may also be
//! looked-up by name (see [`facility_priority`]), which is handy when they come from a
//! configuration file.

use crate::error::{Error, Result};

use backtrace::Backtrace;

type StdResult<T, E> = std::result::Result<T, E>;

/// RFC [5424] defines twenty-four "facilities" for messages. The enumeration values duplicate the
/// constants defined in `<syslog.h>`, multiplied by 8 so they may be or'd directly with a
/// [`Severity`] to form the PRI header field.
///
/// [5424]: https://datatracker.ietf.org/doc/html/rfc5424
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(try_from = "String")]
#[repr(u8)]
pub enum Facility {
    /// kernel messages
    LOG_KERN = 0 << 3,
    /// random user-level messages
    #[default]
    LOG_USER = 1 << 3,
    /// mail system
    LOG_MAIL = 2 << 3,
    /// system daemons
    LOG_DAEMON = 3 << 3,
    /// security/authorization messages
    LOG_AUTH = 4 << 3,
    /// messages generated internally by syslogd
    LOG_SYSLOG = 5 << 3,
    /// line printer subsystem
    LOG_LPR = 6 << 3,
    /// network news subsystem
    LOG_NEWS = 7 << 3,
    /// UUCP subsystem
    LOG_UUCP = 8 << 3,
    /// clock daemon
    LOG_CRON = 9 << 3,
    /// security/authorization messages (private)
    LOG_AUTHPRIV = 10 << 3,
    /// ftp daemon
    LOG_FTP = 11 << 3,
    /// NTP subsystem
    LOG_NTP = 12 << 3,
    /// log audit
    LOG_AUDIT = 13 << 3,
    /// log alert
    LOG_ALERT = 14 << 3,
    /// clock daemon (note 2)
    LOG_CLOCK = 15 << 3,
    /// reserved for local use
    LOG_LOCAL0 = 16 << 3,
    /// reserved for local use
    LOG_LOCAL1 = 17 << 3,
    /// reserved for local use
    LOG_LOCAL2 = 18 << 3,
    /// reserved for local use
    LOG_LOCAL3 = 19 << 3,
    /// reserved for local use
    LOG_LOCAL4 = 20 << 3,
    /// reserved for local use
    LOG_LOCAL5 = 21 << 3,
    /// reserved for local use
    LOG_LOCAL6 = 22 << 3,
    /// reserved for local use
    LOG_LOCAL7 = 23 << 3,
}

/// Every facility, paired with its name sans the `LOG_` prefix.
const FACILITIES: [(&str, Facility); 24] = [
    ("KERN", Facility::LOG_KERN),
    ("USER", Facility::LOG_USER),
    ("MAIL", Facility::LOG_MAIL),
    ("DAEMON", Facility::LOG_DAEMON),
    ("AUTH", Facility::LOG_AUTH),
    ("SYSLOG", Facility::LOG_SYSLOG),
    ("LPR", Facility::LOG_LPR),
    ("NEWS", Facility::LOG_NEWS),
    ("UUCP", Facility::LOG_UUCP),
    ("CRON", Facility::LOG_CRON),
    ("AUTHPRIV", Facility::LOG_AUTHPRIV),
    ("FTP", Facility::LOG_FTP),
    ("NTP", Facility::LOG_NTP),
    ("AUDIT", Facility::LOG_AUDIT),
    ("ALERT", Facility::LOG_ALERT),
    ("CLOCK", Facility::LOG_CLOCK),
    ("LOCAL0", Facility::LOG_LOCAL0),
    ("LOCAL1", Facility::LOG_LOCAL1),
    ("LOCAL2", Facility::LOG_LOCAL2),
    ("LOCAL3", Facility::LOG_LOCAL3),
    ("LOCAL4", Facility::LOG_LOCAL4),
    ("LOCAL5", Facility::LOG_LOCAL5),
    ("LOCAL6", Facility::LOG_LOCAL6),
    ("LOCAL7", Facility::LOG_LOCAL7),
];

impl Facility {
    /// The facility's name, without the `LOG_` prefix.
    pub fn name(&self) -> &'static str {
        FACILITIES
            .iter()
            .find(|(_, facility)| facility == self)
            .map(|(name, _)| *name)
            .unwrap_or("USER")
    }
}

impl std::fmt::Display for Facility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(f, "LOG_{}", self.name())
    }
}

impl std::str::FromStr for Facility {
    type Err = Error;
    /// Look a facility up by name, case-insensitively; "local0", "LOCAL0" & "LOG_LOCAL0" all
    /// name the same facility.
    fn from_str(s: &str) -> Result<Self> {
        let upper = s.to_ascii_uppercase();
        let name = upper.strip_prefix("LOG_").unwrap_or(&upper);
        FACILITIES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, facility)| *facility)
            .ok_or_else(|| Error::UnknownFacility {
                name: upper.clone(),
                back: Backtrace::new(),
            })
    }
}

impl std::convert::TryFrom<String> for Facility {
    type Error = Error;
    fn try_from(x: String) -> Result<Self> {
        x.parse()
    }
}

/// Convert a facility name into the corresponding priority base (the facility code shifted left
/// by three bits).
pub fn facility_priority(name: &str) -> Result<u8> {
    name.parse::<Facility>().map(|facility| facility as u8)
}

/// RFC [5424] defines eight severity levels for messages. The enumeration values duplicate the
/// constants documented as per the `syslog()` manual [page] & defined in `<syslog.h>`.
///
/// [5424]: https://datatracker.ietf.org/doc/html/rfc5424
/// [page]: https://man7.org/linux/man-pages/man3/syslog.3.html
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Severity {
    /// system is unusable
    LOG_EMERG = 0,
    /// action must be take immediately
    LOG_ALERT = 1,
    /// critical conditions
    LOG_CRIT = 2,
    /// error conditions
    LOG_ERR = 3,
    /// warning conditions
    LOG_WARNING = 4,
    /// normal, but significant condition
    LOG_NOTICE = 5,
    /// informational message
    LOG_INFO = 6,
    /// debug-level message
    LOG_DEBUG = 7,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(
            f,
            "{}",
            match self {
                Severity::LOG_EMERG => "LOG_EMERG",
                Severity::LOG_ALERT => "LOG_ALERT",
                Severity::LOG_CRIT => "LOG_CRIT",
                Severity::LOG_ERR => "LOG_ERR",
                Severity::LOG_WARNING => "LOG_WARNING",
                Severity::LOG_NOTICE => "LOG_NOTICE",
                Severity::LOG_INFO => "LOG_INFO",
                Severity::LOG_DEBUG => "LOG_DEBUG",
            }
        )
    }
}
