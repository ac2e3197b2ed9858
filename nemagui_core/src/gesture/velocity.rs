// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Smoothed swipe velocity.

/// Exponential moving average of swipe velocity, in screens per second.
///
/// Unlike a warm-started average, the first sample is blended from zero:
/// a single jerk at the start of a swipe should not count as a fling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SwipeVelocity {
    value: f32,
    alpha: f32,
}

impl SwipeVelocity {
    pub(crate) const fn new(alpha: f32) -> Self {
        Self { value: 0.0, alpha }
    }

    pub(crate) fn update(&mut self, sample: f32) {
        self.value = self.alpha * sample + (1.0 - self.alpha) * self.value;
    }

    pub(crate) const fn get(&self) -> f32 {
        self.value
    }

    pub(crate) fn reset(&mut self) {
        self.value = 0.0;
    }
}
