// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub use congestion_controller::WindowController;
pub use cubic::Cubic;

pub mod congestion_controller;
pub mod cubic;

#[cfg(test)]
mod simulation;
