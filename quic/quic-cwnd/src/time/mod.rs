// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Monotonic time as observed by the window controller

mod clock;
mod timestamp;

pub use clock::*;
pub use core::time::Duration;
pub use timestamp::Timestamp;
