// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Fixed-point evaluation of the cubic curve.
//!
//! Curve time is tracked in ticks of 2^-10 seconds so the cubed offset carries a
//! 2^30 scale. Together with the 2^10 denominator of [`C`] the cubic term is
//! scaled by 2^40 and divided out with a single arithmetic shift. Working in
//! integers keeps results identical across platforms.

use super::C;
use core::time::Duration;
use num_integer::Roots;

/// Number of bits in a tick fraction of a second
const TICK_SHIFT: u32 = 10;

/// Scale of `C * ticks^3`, i.e. `3 * TICK_SHIFT` plus the bits of `C`'s denominator
pub(super) const CUBE_SCALE: u32 = 40;

/// Largest offset, in ticks, whose cube multiplied by `C` fits in an `i128`.
/// This is roughly two years.
const MAX_OFFSET: i128 = 1 << 36;

const MICROS_PER_SECOND: u128 = 1_000_000;

/// Converts a duration to 2^-10 second ticks, truncating any remainder
#[inline]
pub(super) fn to_ticks(duration: Duration) -> i64 {
    let ticks = (duration.as_micros() << TICK_SHIFT) / MICROS_PER_SECOND;
    ticks.min(i64::MAX as u128) as i64
}

/// Converts 2^-10 second ticks back to a duration, truncated to the microsecond
#[inline]
pub(super) fn from_ticks(ticks: i64) -> Duration {
    let micros = (ticks.max(0) as u128 * MICROS_PER_SECOND) >> TICK_SHIFT;
    Duration::from_micros(micros as u64)
}

/// Returns the time, in ticks, the curve takes to climb `window_deficit` segments
/// from its inflection point, i.e. `K = cbrt(window_deficit / C)`
///
/// The root is the exact integer floor, so K does not depend on the platform's
/// floating point behavior.
#[inline]
pub(super) fn time_to_origin(window_deficit: u32) -> i64 {
    let cube_factor = (1u64 << CUBE_SCALE) / *C.numer();
    cube_factor.saturating_mul(window_deficit as u64).cbrt() as i64
}

/// Evaluates `W(t) = origin + C * (t - K)^3`
///
/// The shift rounds toward negative infinity so the curve is truncated toward
/// the origin while below it, and rounded up once past it.
#[inline]
pub(super) fn cubic_window(origin_point_window: u32, time_to_origin: i64, elapsed: Duration) -> u32 {
    let offset = (time_to_origin as i128 - to_ticks(elapsed) as i128).clamp(-MAX_OFFSET, MAX_OFFSET);
    let delta = (*C.numer() as i128 * offset * offset * offset) >> CUBE_SCALE;
    (origin_point_window as i128 - delta).clamp(0, u32::MAX as i128) as u32
}
