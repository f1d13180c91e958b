// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::time::Clock;
use core::time::Duration;


/// Creates a window controller for each new connection
pub trait Endpoint: 'static {
    type WindowController: WindowController;

    fn new_window_controller(&mut self) -> Self::WindowController;
}

/// Decides how many segments may be in flight, given acknowledgement and loss feedback.
///
/// Calls for a connection must be serialized by the caller. Loss detection, round
/// trip estimation and conversion between segments and bytes are left to the caller.
pub trait WindowController: 'static + Clone + Send {
    /// Returns the new window after an acknowledgement was received while the window
    /// was `current_window`
    fn window_after_ack<C: Clock + ?Sized>(
        &mut self,
        current_window: u32,
        rtt_min: Duration,
        clock: &C,
    ) -> u32;

    /// Returns the new window after a loss event occurred while the window was
    /// `current_window`
    fn window_after_loss(&mut self, current_window: u32) -> u32;

    /// Called when the sender is not fully using the window
    fn on_app_limited(&mut self);

    /// Returns the controller to its initial state, e.g. after an idle period
    fn reset(&mut self);

    /// The most recently returned window
    fn last_window(&self) -> u32;
}
