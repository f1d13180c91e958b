// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    recovery::{congestion_controller::Endpoint as _, cubic, WindowController},
    time::{Cached, Clock, NoopClock},
};
use core::{fmt, ops::Range, time::Duration};
use insta::assert_debug_snapshot;
use plotters::prelude::*;
use std::{env, path::Path};

const CHART_DIMENSIONS: (u32, u32) = (1024, 768);
const RTT: Duration = Duration::from_millis(100);

fn type_name<T>() -> &'static str {
    core::any::type_name::<T>().split("::").last().unwrap()
}

fn new_controller() -> cubic::Cubic {
    cubic::Endpoint::default().new_window_controller()
}

// These simulations are too slow for Miri
#[test]
#[cfg_attr(miri, ignore)]
fn unlimited_growth_test() {
    unlimited_growth(new_controller(), 100).finish();
}

#[test]
#[cfg_attr(miri, ignore)]
fn loss_at_422_test() {
    loss_at_422(new_controller(), 120).finish();
}

#[test]
#[cfg_attr(miri, ignore)]
fn loss_at_422_and_410_test() {
    loss_at_422_and_410(new_controller(), 150).finish();
}

#[test]
#[cfg_attr(miri, ignore)]
fn app_limited_idle_test() {
    app_limited_idle(new_controller(), 60).finish();
}

#[derive(Debug)]
struct Simulation {
    name: &'static str,
    description: &'static str,
    cc: &'static str,
    rounds: Vec<Round>,
}

struct Round {
    number: usize,
    window: u32,
}

impl fmt::Debug for Round {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:>3}: pkts: {}", self.number, self.window)
    }
}

impl Simulation {
    /// Renders the rounds to an SVG under `RECOVERY_SIM_DIR` if it is set, otherwise
    /// compares them against the stored snapshot
    fn finish(&self) {
        let title = format!("{} - {}", self.name, self.cc);
        // Snapshot and chart file names drop the whitespace from the title
        let filename: String = title.split_whitespace().collect();

        match env::var_os("RECOVERY_SIM_DIR") {
            Some(dir) => self.plot(&title, &Path::new(&dir).join(filename).with_extension("svg")),
            None => assert_debug_snapshot!(filename, self),
        }
    }

    fn plot(&self, title: &str, path: &Path) {
        let max_window = self.rounds.iter().map(|r| r.window).max().unwrap_or(0);

        let root_area = SVGBackend::new(path, CHART_DIMENSIONS).into_drawing_area();
        root_area.fill(&WHITE).expect("Could not fill chart");

        let mut chart = ChartBuilder::on(&root_area)
            .caption(format!("{title}: {}", self.description), ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0..self.rounds.len() as u32, 0..max_window + max_window / 20)
            .expect("Could not build chart");

        chart
            .configure_mesh()
            .x_desc("Round trip")
            .y_desc("Congestion window (segments)")
            .draw()
            .expect("Could not configure mesh");

        chart
            .draw_series(LineSeries::new(
                self.rounds.iter().map(|r| (r.number as u32, r.window)),
                GREEN,
            ))
            .expect("Could not draw series");
    }
}

/// Simulates a network with no congestion experienced
fn unlimited_growth<W: WindowController>(mut controller: W, num_rounds: usize) -> Simulation {
    Simulation {
        name: "Unlimited Growth",
        description: "Full congestion window utilization with no loss encountered",
        cc: type_name::<W>(),
        rounds: simulate_constant_rtt(&mut controller, 10, &[], None, num_rounds),
    }
}

/// Simulates a network that experienced loss once the window reached 422 segments
fn loss_at_422<W: WindowController>(mut controller: W, num_rounds: usize) -> Simulation {
    Simulation {
        name: "Loss at 422",
        description: "Full congestion window utilization with loss encountered at 422 segments",
        cc: type_name::<W>(),
        rounds: simulate_constant_rtt(&mut controller, 300, &[422], None, num_rounds),
    }
}

/// Simulates a network that experienced loss at 422 segments and again at 410 segments,
/// before the window recovered to its previous maximum
///
/// With Cubic this will exercise the fast convergence algorithm
fn loss_at_422_and_410<W: WindowController>(mut controller: W, num_rounds: usize) -> Simulation {
    Simulation {
        name: "Loss at 422 and 410",
        description: "Loss encountered at 422 and 410 segments",
        cc: type_name::<W>(),
        rounds: simulate_constant_rtt(&mut controller, 300, &[422, 410], None, num_rounds),
    }
}

/// Simulates an application that stops sending for 10 rounds
fn app_limited_idle<W: WindowController>(mut controller: W, num_rounds: usize) -> Simulation {
    Simulation {
        name: "App Limited Idle",
        description: "Application idle for 10 round trips starting at round 20",
        cc: type_name::<W>(),
        rounds: simulate_constant_rtt(&mut controller, 100, &[], Some(20..30), num_rounds),
    }
}

/// Simulate the given number of rounds with drops occurring at the given window sizes and
/// the application idle for the given range of rounds
fn simulate_constant_rtt<W: WindowController>(
    controller: &mut W,
    initial_window: u32,
    drops: &[u32],
    idle: Option<Range<usize>>,
    num_rounds: usize,
) -> Vec<Round> {
    let mut round_start = NoopClock.get_time() + Duration::from_millis(1);
    let mut window = initial_window;
    let mut rounds = Vec::with_capacity(num_rounds);
    let mut drop_index = 0;

    for round in 0..num_rounds {
        rounds.push(Round {
            number: round,
            window,
        });

        round_start += RTT;

        if let Some(idle) = idle.as_ref().filter(|idle| idle.contains(&round)) {
            if round == idle.start {
                controller.on_app_limited();
            }
            continue;
        }

        if drop_index < drops.len() && window >= drops[drop_index] {
            window = controller.window_after_loss(window);
            drop_index += 1;
        } else {
            window = ack_window(controller, window, &round_start);
        }
    }

    rounds
}

/// Acknowledge a full window of segments, all arriving within the same instant
fn ack_window<W: WindowController, C: Clock>(controller: &mut W, window: u32, clock: &C) -> u32 {
    let clock = Cached::new(clock);
    let mut current_window = window;

    for _ in 0..window {
        current_window = controller.window_after_ack(current_window, RTT, &clock);
    }

    current_window
}
