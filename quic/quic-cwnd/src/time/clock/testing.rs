// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! A manually driven clock for tests.
//!
//! Time is kept per thread as the offset from [`NoopClock`](super::NoopClock), so
//! every test thread starts at the same instant and tests can run in parallel.

use super::{Clock as _, NoopClock};
use crate::time::{Duration, Timestamp};
use core::cell::Cell;

thread_local! {
    static ELAPSED: Cell<Duration> = const { Cell::new(Duration::ZERO) };
}

/// Moves the current thread's time forward by `duration`
pub fn advance(duration: Duration) {
    ELAPSED.with(|elapsed| elapsed.set(elapsed.get() + duration));
}

/// Reads the current thread's time. Every instance observes the same value.
#[derive(Clone, Copy, Debug, Default)]
pub struct Clock(());

impl super::Clock for Clock {
    fn get_time(&self) -> Timestamp {
        NoopClock.get_time() + ELAPSED.with(Cell::get)
    }
}

impl Clock {
    pub fn inc_by(&mut self, duration: Duration) {
        advance(duration);
    }
}
