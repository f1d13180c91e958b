// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    recovery::congestion_controller::{self, WindowController},
    time::{Clock, Timestamp},
};
use core::time::Duration;
use num_rational::Ratio;

mod fixed;

/// Scaling constant of the cubic curve, in segments per second cubed.
///
/// This is slightly above the 0.4 commonly recommended for CUBIC; the exact ratio
/// is kept so window growth matches deployed senders.
pub const C: Ratio<u64> = Ratio::new_raw(410, 1024);

/// Multiplicative decrease applied to the congestion window on loss.
///
/// Reduces the window by roughly 1/12th, which is less than both Reno's halving and
/// the 0.7 recommended for CUBIC.
pub const BETA: Ratio<u64> = Ratio::new_raw(939, 1024);

/// Additional backoff applied to the remembered maximum window when loss occurs
/// before the previous maximum was reached again.
pub const BETA_LAST_MAX: Ratio<u64> = Ratio::new_raw(871, 1024);

crate::probe::define!(
    extern "probe" {
        /// Emitted when an acknowledgement starts a new growth epoch
        #[link_name = quic_cwnd__cubic__epoch_start]
        fn on_epoch_start(
            origin_point_window: u32,
            time_to_origin: Duration,
            last_max_window: u32,
        );

        /// Emitted when an acknowledgement within an epoch computes a window
        #[link_name = quic_cwnd__cubic__window_update]
        fn on_window_update(window: u32, cubic_window: u32, estimated_tcp_window: f64);

        /// Emitted when the window is reduced in response to loss
        #[link_name = quic_cwnd__cubic__loss]
        fn on_loss(
            current_window: u32,
            last_max_window: u32,
            reduced_window: u32,
            fast_convergence: bool,
        );

        /// Emitted when the sender stopped using the full window
        #[link_name = quic_cwnd__cubic__app_limited]
        fn on_app_limited(last_window: u32);

        /// Emitted when the controller is returned to its initial state
        #[link_name = quic_cwnd__cubic__reset]
        fn on_reset(last_max_window: u32);
    }
);

//= https://www.rfc-editor.org/rfc/rfc8312#section-4.1
//# t is the elapsed time from the beginning of the current congestion avoidance
// An epoch runs from the first acknowledgement after a loss (or after the
// controller was created, reset or application limited) until the next loss.
#[derive(Clone, Debug, Default, PartialEq)]
enum Epoch {
    #[default]
    Uninitialized,
    Active(ActiveEpoch),
}

#[derive(Clone, Debug, PartialEq)]
struct ActiveEpoch {
    // The time the first acknowledgement of the epoch was processed
    start: Timestamp,
    // The window at the inflection point of the curve
    origin_point_window: u32,
    // K, the time from `start` to the inflection point, in 2^-10 second ticks
    time_to_origin: i64,
    // Reno-equivalent window, grown by one segment per round trip
    estimated_tcp_window: f64,
    // The last time `estimated_tcp_window` was advanced
    last_update: Timestamp,
}

impl ActiveEpoch {
    fn new(start: Timestamp, current_window: u32, last_max_window: u32) -> Self {
        let (origin_point_window, time_to_origin) = if last_max_window <= current_window {
            // The previous maximum has been reached, so growth starts in the
            // convex region of the curve
            (current_window, 0)
        } else {
            // Climb back toward the previous maximum along the concave region
            (
                last_max_window,
                fixed::time_to_origin(last_max_window - current_window),
            )
        };

        Self {
            start,
            origin_point_window,
            time_to_origin,
            estimated_tcp_window: current_window as f64,
            last_update: start,
        }
    }

    //= https://www.rfc-editor.org/rfc/rfc8312#section-4.1
    //# W_cubic(t) = C*(t-K)^3 + W_max (Eq. 1)
    #[inline]
    fn cubic_window(&self, now: Timestamp, rtt_min: Duration) -> u32 {
        // The window set now takes effect one round trip later
        let t = now.saturating_duration_since(self.start).saturating_add(rtt_min);
        fixed::cubic_window(self.origin_point_window, self.time_to_origin, t)
    }

    //= https://www.rfc-editor.org/rfc/rfc8312#section-4.2
    //# If so, CUBIC is in the TCP-friendly region and cwnd SHOULD
    //# be set to W_est(t) at each reception of an ACK.
    // Reno grows by 1/W for each of the W acknowledgements in a round trip. That
    // is applied here as one segment per `rtt_min` of elapsed time, so repeated
    // calls at the same instant leave the estimate unchanged.
    #[inline]
    fn update_estimated_tcp_window(&mut self, now: Timestamp, rtt_min: Duration) -> f64 {
        let elapsed = now.saturating_duration_since(self.last_update);
        self.estimated_tcp_window += elapsed.as_secs_f64() / rtt_min.as_secs_f64();
        self.last_update = now;
        self.estimated_tcp_window
    }
}

/// Computes congestion windows following the CUBIC growth curve.
///
/// Windows are measured in segments. The controller holds no reference to the
/// transport: the caller reports acknowledgements and losses and applies the
/// returned window, including any minimum window policy.
///
/// ```
/// use quic_cwnd::{recovery::Cubic, time::{Clock, NoopClock}};
/// use core::time::Duration;
///
/// let mut cubic = Cubic::new();
/// let rtt_min = Duration::from_millis(100);
/// let now = NoopClock.get_time();
///
/// // the first acknowledgement starts an epoch
/// assert_eq!(cubic.window_after_ack(10, rtt_min, &now), 11);
///
/// // loss reduces the window by BETA
/// assert_eq!(cubic.window_after_loss(11), 10);
/// assert_eq!(cubic.last_max_window(), 11);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Cubic {
    epoch: Epoch,
    //= https://www.rfc-editor.org/rfc/rfc8312#section-4.1
    //# W_max is the window size just before the window is
    //# reduced in the last congestion event.
    last_max_window: u32,
    last_window: u32,
}

impl Cubic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the congestion window after an acknowledgement.
    ///
    /// `current_window` must be positive and `rtt_min` is the minimum observed round
    /// trip time, which must also be positive. The current time is read once from
    /// `clock`; a [`Timestamp`] may be passed directly.
    #[inline]
    pub fn window_after_ack<C: Clock + ?Sized>(
        &mut self,
        current_window: u32,
        rtt_min: Duration,
        clock: &C,
    ) -> u32 {
        debug_assert!(current_window > 0, "current_window must be positive");
        debug_assert!(rtt_min > Duration::ZERO, "rtt_min must be positive");

        let now = clock.get_time();

        let epoch = match &mut self.epoch {
            Epoch::Active(epoch) => epoch,
            Epoch::Uninitialized => return self.start_epoch(current_window, now),
        };

        debug_assert!(
            now >= epoch.last_update,
            "timestamp must be monotonically increasing"
        );

        let cubic_window = epoch.cubic_window(now, rtt_min);
        let estimated_tcp_window = epoch.update_estimated_tcp_window(now, rtt_min);

        // the larger of the two windows is used; the estimate is truncated toward zero
        let window = cubic_window.max(estimated_tcp_window as u32);

        on_window_update(window, cubic_window, estimated_tcp_window);

        self.last_window = window;
        window
    }

    /// Returns the congestion window after a loss event and ends the current epoch.
    #[inline]
    pub fn window_after_loss(&mut self, current_window: u32) -> u32 {
        //= https://www.rfc-editor.org/rfc/rfc8312#section-4.6
        //# With fast convergence, when a congestion event occurs, before the
        //# window reduction of the congestion window, a flow remembers the last
        //# value of W_max before it updates W_max for the current congestion
        //# event.
        let fast_convergence = current_window < self.last_max_window;

        self.last_max_window = if fast_convergence {
            // The previous maximum was never reached again, so another flow is likely
            // competing for the bottleneck. Back off further to make room for it.
            (BETA_LAST_MAX * current_window as u64).to_integer() as u32
        } else {
            current_window
        };

        self.epoch = Epoch::Uninitialized;

        let window = (BETA * current_window as u64).to_integer() as u32;

        on_loss(
            current_window,
            self.last_max_window,
            window,
            fast_convergence,
        );

        self.last_window = window;
        window
    }

    /// Called when the sender is not using the full congestion window.
    ///
    /// Ends the current epoch so the time spent application limited is not counted
    /// as growth time once sending resumes. The remembered maximum is kept.
    #[inline]
    pub fn on_app_limited(&mut self) {
        //= https://www.rfc-editor.org/rfc/rfc8312#section-5.8
        //# In case of long periods when cwnd has not been updated due
        //# to the application rate limit, such as idle periods, t in Eq. 1 MUST
        //# NOT include these periods; otherwise, W_cubic(t) might be very high
        //# after restarting from these periods.
        self.epoch = Epoch::Uninitialized;
        on_app_limited(self.last_window);
    }

    /// Returns the controller to its initial state, forgetting the remembered maximum
    #[inline]
    pub fn reset(&mut self) {
        on_reset(self.last_max_window);
        *self = Self::default();
    }

    /// The window recorded at the most recent loss event
    #[inline]
    pub fn last_max_window(&self) -> u32 {
        self.last_max_window
    }

    /// The most recently returned window, or zero if no window was computed yet
    #[inline]
    pub fn last_window(&self) -> u32 {
        self.last_window
    }

    /// The start of the current epoch, if one is active
    #[inline]
    pub fn epoch_start(&self) -> Option<Timestamp> {
        match &self.epoch {
            Epoch::Active(epoch) => Some(epoch.start),
            Epoch::Uninitialized => None,
        }
    }

    /// The window at the inflection point of the current curve, if an epoch is active
    #[inline]
    pub fn origin_point_window(&self) -> Option<u32> {
        match &self.epoch {
            Epoch::Active(epoch) => Some(epoch.origin_point_window),
            Epoch::Uninitialized => None,
        }
    }

    /// The time from the start of the epoch to the inflection point of the curve,
    /// truncated to the microsecond, if an epoch is active
    #[inline]
    pub fn time_to_origin(&self) -> Option<Duration> {
        match &self.epoch {
            Epoch::Active(epoch) => Some(fixed::from_ticks(epoch.time_to_origin)),
            Epoch::Uninitialized => None,
        }
    }

    #[inline]
    fn start_epoch(&mut self, current_window: u32, now: Timestamp) -> u32 {
        let epoch = ActiveEpoch::new(now, current_window, self.last_max_window);

        on_epoch_start(
            epoch.origin_point_window,
            fixed::from_ticks(epoch.time_to_origin),
            self.last_max_window,
        );

        self.epoch = Epoch::Active(epoch);

        // The first acknowledgement only establishes the origin, growing by one segment
        self.last_window = current_window.saturating_add(1);
        self.last_window
    }
}

impl WindowController for Cubic {
    #[inline]
    fn window_after_ack<C: Clock + ?Sized>(
        &mut self,
        current_window: u32,
        rtt_min: Duration,
        clock: &C,
    ) -> u32 {
        Cubic::window_after_ack(self, current_window, rtt_min, clock)
    }

    #[inline]
    fn window_after_loss(&mut self, current_window: u32) -> u32 {
        Cubic::window_after_loss(self, current_window)
    }

    #[inline]
    fn on_app_limited(&mut self) {
        Cubic::on_app_limited(self)
    }

    #[inline]
    fn reset(&mut self) {
        Cubic::reset(self)
    }

    #[inline]
    fn last_window(&self) -> u32 {
        Cubic::last_window(self)
    }
}

#[derive(Debug, Default)]
pub struct Endpoint {}

impl congestion_controller::Endpoint for Endpoint {
    type WindowController = Cubic;

    fn new_window_controller(&mut self) -> Self::WindowController {
        Cubic::new()
    }
}
