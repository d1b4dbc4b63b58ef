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

//! Pooled byte buffers.
//!
//! Every encoded message is assembled in a [`Buffer`] drawn from a process-wide pool. Hand it
//! back with [`Buffer::free`] (or just let it drop) once the bytes have been written; a buffer
//! that's never returned costs the pool an allocation, nothing more.

use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

const INITIAL_CAPACITY: usize = 1024;
/// Buffers that grew beyond this aren't worth keeping around
const MAX_POOLED_CAPACITY: usize = 64 * 1024;
const MAX_POOLED_BUFFERS: usize = 64;

/// A free-list of byte vectors
pub struct Pool {
    free: Mutex<Vec<Vec<u8>>>,
}

static POOL: Pool = Pool::new();

impl Pool {
    pub const fn new() -> Pool {
        Pool {
            free: Mutex::new(Vec::new()),
        }
    }

    /// Take an empty [`Buffer`] from this pool, allocating a fresh one if the pool is dry
    pub fn get(&'static self) -> Buffer {
        let bytes = self
            .free
            .lock()
            .ok()
            .and_then(|mut free| free.pop())
            .unwrap_or_else(|| Vec::with_capacity(INITIAL_CAPACITY));
        Buffer { bytes, pool: self }
    }

    fn put(&self, mut bytes: Vec<u8>) {
        if bytes.capacity() > MAX_POOLED_CAPACITY {
            return;
        }
        bytes.clear();
        // A poisoned lock just means we stop recycling.
        if let Ok(mut free) = self.free.lock() {
            if free.len() < MAX_POOLED_BUFFERS {
                free.push(bytes);
            }
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.free.lock().map(|free| free.len()).unwrap_or(0)
    }
}

/// Take an empty [`Buffer`] from the global pool
pub fn get() -> Buffer {
    POOL.get()
}

/// A growable byte buffer on loan from a [`Pool`]
pub struct Buffer {
    bytes: Vec<u8>,
    pool: &'static Pool,
}

impl Buffer {
    /// Return this buffer to its pool. Equivalent to dropping it, but says what it means.
    pub fn free(self) {}
}

impl Deref for Buffer {
    type Target = Vec<u8>;
    fn deref(&self) -> &Vec<u8> {
        &self.bytes
    }
}

impl DerefMut for Buffer {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.bytes
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Clone for Buffer {
    fn clone(&self) -> Self {
        let mut clone = self.pool.get();
        clone.extend_from_slice(&self.bytes);
        clone
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Buffer({:?})", String::from_utf8_lossy(&self.bytes))
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.pool.put(std::mem::take(&mut self.bytes));
    }
}
