// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.

use kurbo::Size;

/// Static configuration for an [`Engine`](crate::engine::Engine).
///
/// All values are fixed at build time for a given board; the presets below
/// match the displays the toolkit ships with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Display resolution in pixels.
    pub resolution: Size,
    /// Period of the shared animation timer in milliseconds.
    pub timer_period_ms: u32,
    /// Distance in pixels a press must travel before it becomes a swipe on
    /// nodes that are not drag-capable.
    pub swipe_margin: f64,
    /// Weight of a new sample in the smoothed swipe velocity (0.0–1.0).
    pub velocity_alpha: f32,
    /// Duration in seconds of a full screen transition.
    pub screen_transition_duration: f64,
    /// Progress below which a released swipe transition is aborted.
    pub abort_threshold: f32,
    /// Number of off-screen animation buffers available for transitions.
    pub animation_buffers: usize,
}

impl EngineConfig {
    /// Default configuration for a display of the given resolution, with no
    /// animation buffers.
    #[must_use]
    pub const fn new(resolution: Size) -> Self {
        Self {
            resolution,
            timer_period_ms: 16,
            swipe_margin: 5.0,
            velocity_alpha: 0.2,
            screen_transition_duration: 0.3,
            abort_threshold: 1.0 / 3.0,
            animation_buffers: 0,
        }
    }

    /// 390x390 round watch panel with two animation buffers.
    #[must_use]
    pub const fn watch_390() -> Self {
        let mut config = Self::new(Size::new(390.0, 390.0));
        config.animation_buffers = 2;
        config
    }

    /// 456x456 round panel, direct-draw transitions only.
    #[must_use]
    pub const fn panel_456() -> Self {
        Self::new(Size::new(456.0, 456.0))
    }

    /// Returns a copy with the given number of animation buffers.
    #[must_use]
    pub const fn with_animation_buffers(mut self, count: usize) -> Self {
        self.animation_buffers = count;
        self
    }

    /// Returns a copy with the given timer period.
    #[must_use]
    pub const fn with_timer_period_ms(mut self, period_ms: u32) -> Self {
        self.timer_period_ms = period_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        let c = EngineConfig::watch_390();
        assert_eq!(c.animation_buffers, 2);
        assert_eq!(c.timer_period_ms, 16);
        assert_eq!(EngineConfig::panel_456().animation_buffers, 0);
        assert_eq!(c.with_animation_buffers(0).animation_buffers, 0);
    }
}
