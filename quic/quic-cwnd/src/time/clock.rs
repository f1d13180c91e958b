// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::time::timestamp::Timestamp;
use core::time::Duration;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// A `Clock` is a monotonic source of [`Timestamp`]s.
///
/// Consecutive calls to `get_time` must never return a decreasing value.
pub trait Clock {
    /// Returns the current [`Timestamp`]
    fn get_time(&self) -> Timestamp;
}

/// A clock which always returns a Timestamp of value 1us
#[derive(Clone, Copy, Debug)]
pub struct NoopClock;

impl Clock for NoopClock {
    fn get_time(&self) -> Timestamp {
        unsafe { Timestamp::from_duration(Duration::from_micros(1)) }
    }
}

impl Clock for Timestamp {
    #[inline]
    fn get_time(&self) -> Timestamp {
        *self
    }
}

/// A clock that caches the time query for the inner clock
///
/// Useful when processing a batch of acknowledgements that should all observe
/// the same instant.
pub struct Cached<'a, C: Clock + ?Sized> {
    clock: &'a C,
    cached_value: core::cell::Cell<Option<Timestamp>>,
}

impl<'a, C: Clock + ?Sized> Cached<'a, C> {
    #[inline]
    pub fn new(clock: &'a C) -> Self {
        Self {
            clock,
            cached_value: Default::default(),
        }
    }
}

impl<C: Clock + ?Sized> Clock for Cached<'_, C> {
    #[inline]
    fn get_time(&self) -> Timestamp {
        if let Some(time) = self.cached_value.get() {
            return time;
        }

        let now = self.clock.get_time();
        self.cached_value.set(Some(now));
        now
    }
}
