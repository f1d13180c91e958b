// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use core::{fmt, num::NonZeroU64, time::Duration};

/// An absolute point in time, measured in microseconds since the epoch of the
/// [`Clock`](crate::time::Clock) that produced it.
///
/// Timestamps are only comparable with other timestamps from the same clock.
/// The inner value is never zero so `Option<Timestamp>` stays the size of a `u64`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NonZeroU64);

impl Timestamp {
    /// Creates a `Timestamp` from a duration since the clock epoch.
    ///
    /// A zero duration is rounded up to 1us after the epoch.
    ///
    /// # Safety
    ///
    /// Callers must ensure the duration is measured from the same epoch as
    /// every other timestamp it will be compared against.
    #[inline]
    pub unsafe fn from_duration(duration: Duration) -> Self {
        Self::from_duration_impl(duration)
    }

    #[inline]
    const fn from_duration_impl(duration: Duration) -> Self {
        let micros = duration.as_micros();
        let micros = if micros == 0 {
            1
        } else if micros > u64::MAX as u128 {
            u64::MAX
        } else {
            micros as u64
        };
        // Safety: the value was checked above to be non-zero
        Self(unsafe { NonZeroU64::new_unchecked(micros) })
    }

    /// Returns the amount of time elapsed from `earlier` to `self`, or zero if
    /// `earlier` is later than `self`
    #[inline]
    pub fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration::from_micros(self.0.get().saturating_sub(earlier.0.get()))
    }

    #[inline]
    pub fn checked_add(self, duration: Duration) -> Option<Self> {
        let micros = u64::try_from(duration.as_micros()).ok()?;
        let value = self.0.get().checked_add(micros)?;
        Some(Self(NonZeroU64::new(value)?))
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let micros = self.0.get();
        write!(f, "{}.{:06}s", micros / 1_000_000, micros % 1_000_000)
    }
}

impl core::ops::Add<Duration> for Timestamp {
    type Output = Timestamp;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self.checked_add(rhs)
            .expect("timestamp overflow while adding duration")
    }
}

impl core::ops::AddAssign<Duration> for Timestamp {
    #[inline]
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}
