// Copyright 2026 the NemaGUI Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graphics item payloads and their built-in gesture behaviour.
//!
//! Every node carries exactly one [`GraphicsItem`]. Variants that react to
//! gestures on their own (sliders, windows, swipe windows) carry a payload
//! type implementing [`Widget`]; the gesture dispatcher calls into it before
//! any user handler runs. Checkbox and radio behaviour touches node flags and
//! siblings, so it lives on [`SceneTree`](super::SceneTree) instead.

use kurbo::{Point, Size, Vec2};

/// Axis along which screens of a group, slider tracks or swipe-window pages
/// are laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Left to right.
    #[default]
    Horizontal,
    /// Top to bottom.
    Vertical,
}

impl Layout {
    /// Picks the component of `v` along this axis.
    #[inline]
    #[must_use]
    pub fn along(self, v: Vec2) -> f64 {
        match self {
            Self::Horizontal => v.x,
            Self::Vertical => v.y,
        }
    }

    /// Picks the extent of `size` along this axis.
    #[inline]
    #[must_use]
    pub fn extent(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Builds a vector with `amount` along this axis and zero across it.
    #[inline]
    #[must_use]
    pub fn vec(self, amount: f64) -> Vec2 {
        match self {
            Self::Horizontal => Vec2::new(amount, 0.0),
            Self::Vertical => Vec2::new(0.0, amount),
        }
    }
}

/// Discriminant of a [`GraphicsItem`], used for type checks without
/// borrowing the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A full screen (also used as the bare background inside windows).
    Screen,
    /// A push button.
    Button,
    /// A text label.
    Label,
    /// A dial gauge.
    Gauge,
    /// A rotating needle.
    Needle,
    /// A value slider.
    Slider,
    /// A progress bar.
    ProgressBar,
    /// A checkbox.
    Checkbox,
    /// A radio button.
    RadioButton,
    /// A plain grouping container.
    Container,
    /// A scrollable window.
    Window,
    /// A paged window.
    SwipeWindow,
    /// A bitmap image.
    Image,
    /// A filled rectangle.
    Rectangle,
}

/// Result of a built-in widget behaviour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Response {
    /// The widget's value changed; `ValueChanged` events should fire.
    pub value_changed: bool,
    /// The widget needs to be redrawn.
    pub redraw: bool,
}

impl Response {
    /// Nothing happened.
    pub const NONE: Self = Self {
        value_changed: false,
        redraw: false,
    };

    /// The value changed (implies a redraw).
    pub const CHANGED: Self = Self {
        value_changed: true,
        redraw: true,
    };

    /// Only a redraw is needed.
    pub const REDRAW: Self = Self {
        value_changed: false,
        redraw: true,
    };
}

/// Built-in gesture behaviour of an item payload.
///
/// `local` is the gesture point relative to the node origin and `size` is
/// the node's size. All methods default to doing nothing.
pub trait Widget {
    /// A press landed on the widget.
    fn press(&mut self, local: Point, size: Size) -> Response {
        _ = (local, size);
        Response::NONE
    }

    /// The widget is being dragged by `delta` pixels; `local` is the
    /// current point.
    fn drag(&mut self, local: Point, delta: Vec2, size: Size) -> Response {
        _ = (local, delta, size);
        Response::NONE
    }

    /// The press on the widget ended.
    fn release(&mut self, size: Size) -> Response {
        _ = size;
        Response::NONE
    }
}

/// Clamps a value to `[0, 1]`, mapping NaN to zero.
#[inline]
pub(crate) fn unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// A dial gauge showing a value within `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gauge {
    /// Current value.
    pub value: f32,
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl Gauge {
    /// Creates a gauge over `[min, max]` showing `min`.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self {
            value: min,
            min,
            max,
        }
    }

    /// Value mapped to `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            0.0
        } else {
            unit((self.value - self.min) / span)
        }
    }
}

/// A needle rotated between two angles (degrees).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Needle {
    /// Current angle in degrees.
    pub angle: f32,
    /// Angle at value 0.
    pub min_angle: f32,
    /// Angle at value 1.
    pub max_angle: f32,
}

/// A slider whose value tracks the pointer along its axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Slider {
    /// Current value in `[0, 1]`.
    pub value: f32,
    /// Track direction.
    pub layout: Layout,
}

impl Slider {
    fn track(&mut self, local: Point, size: Size) -> Response {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "slider values are stored as f32"
        )]
        let v = match self.layout {
            Layout::Horizontal if size.width > 0.0 => (local.x / size.width) as f32,
            // Vertical sliders grow upwards.
            Layout::Vertical if size.height > 0.0 => 1.0 - (local.y / size.height) as f32,
            _ => 0.0,
        };
        let v = unit(v);
        if v == self.value {
            Response::NONE
        } else {
            self.value = v;
            Response::CHANGED
        }
    }
}

impl Widget for Slider {
    fn press(&mut self, local: Point, size: Size) -> Response {
        self.track(local, size)
    }

    fn drag(&mut self, local: Point, _delta: Vec2, size: Size) -> Response {
        self.track(local, size)
    }
}

/// A progress bar.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProgressBar {
    /// Current value in `[0, 1]`.
    pub value: f32,
}

/// A window that scrolls its children.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Window {
    /// Offset applied to children, always in `[-(content - size), 0]`.
    pub scroll: Vec2,
    /// Total size of the scrollable content.
    pub content: Size,
}

impl Window {
    /// Creates a window over content of the given size.
    #[must_use]
    pub const fn new(content: Size) -> Self {
        Self {
            scroll: Vec2::ZERO,
            content,
        }
    }
}

impl Widget for Window {
    fn drag(&mut self, _local: Point, delta: Vec2, size: Size) -> Response {
        let min_x = (size.width - self.content.width).min(0.0);
        let min_y = (size.height - self.content.height).min(0.0);
        let next = Vec2::new(
            (self.scroll.x + delta.x).clamp(min_x, 0.0),
            (self.scroll.y + delta.y).clamp(min_y, 0.0),
        );
        if next == self.scroll {
            Response::NONE
        } else {
            self.scroll = next;
            Response::REDRAW
        }
    }
}

/// A window showing one full-size child page at a time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeWindow {
    /// Index of the page shown when at rest.
    pub page: usize,
    /// Number of pages (children).
    pub page_count: usize,
    /// Current offset along the layout axis (zero or negative).
    pub offset: f64,
    /// Direction pages are laid out in.
    pub layout: Layout,
}

impl SwipeWindow {
    /// Creates a paged window with `page_count` pages.
    #[must_use]
    pub const fn new(page_count: usize, layout: Layout) -> Self {
        Self {
            page: 0,
            page_count,
            offset: 0.0,
            layout,
        }
    }

    fn min_offset(&self, size: Size) -> f64 {
        -(self.page_count.saturating_sub(1) as f64) * self.layout.extent(size)
    }
}

impl Widget for SwipeWindow {
    fn drag(&mut self, _local: Point, delta: Vec2, size: Size) -> Response {
        let next = (self.offset + self.layout.along(delta)).clamp(self.min_offset(size), 0.0);
        if next == self.offset {
            Response::NONE
        } else {
            self.offset = next;
            Response::REDRAW
        }
    }

    fn release(&mut self, size: Size) -> Response {
        let extent = self.layout.extent(size);
        if extent <= 0.0 {
            return Response::NONE;
        }
        // offset <= 0, so the rounding below works on a non-negative value.
        #[expect(
            clippy::cast_possible_truncation,
            reason = "page position is non-negative and bounded by page_count"
        )]
        let nearest = ((-self.offset / extent) + 0.5) as usize;
        let nearest = nearest.min(self.page_count.saturating_sub(1));
        self.offset = -(nearest as f64) * extent;
        if nearest == self.page {
            Response::REDRAW
        } else {
            self.page = nearest;
            Response::CHANGED
        }
    }
}

/// Typed widget payload attached to a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GraphicsItem {
    /// A full screen.
    Screen,
    /// A push button.
    Button,
    /// A text label.
    Label,
    /// A dial gauge.
    Gauge(Gauge),
    /// A rotating needle.
    Needle(Needle),
    /// A value slider.
    Slider(Slider),
    /// A progress bar.
    ProgressBar(ProgressBar),
    /// A checkbox.
    Checkbox,
    /// A radio button.
    RadioButton,
    /// A plain grouping container.
    Container,
    /// A scrollable window.
    Window(Window),
    /// A paged window.
    SwipeWindow(SwipeWindow),
    /// A bitmap image drawn with the given opacity.
    Image {
        /// Opacity in `[0, 1]`.
        opacity: f32,
    },
    /// A filled rectangle drawn with the given opacity.
    Rectangle {
        /// Opacity in `[0, 1]`.
        opacity: f32,
    },
}

impl GraphicsItem {
    /// Returns the discriminant.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Screen => ItemKind::Screen,
            Self::Button => ItemKind::Button,
            Self::Label => ItemKind::Label,
            Self::Gauge(_) => ItemKind::Gauge,
            Self::Needle(_) => ItemKind::Needle,
            Self::Slider(_) => ItemKind::Slider,
            Self::ProgressBar(_) => ItemKind::ProgressBar,
            Self::Checkbox => ItemKind::Checkbox,
            Self::RadioButton => ItemKind::RadioButton,
            Self::Container => ItemKind::Container,
            Self::Window(_) => ItemKind::Window,
            Self::SwipeWindow(_) => ItemKind::SwipeWindow,
            Self::Image { .. } => ItemKind::Image,
            Self::Rectangle { .. } => ItemKind::Rectangle,
        }
    }

    /// Whether this item is a window or swipe window.
    #[must_use]
    pub const fn is_window(&self) -> bool {
        matches!(self, Self::Window(_) | Self::SwipeWindow(_))
    }

    /// Returns the built-in behaviour of this item, if it has one.
    pub fn widget_mut(&mut self) -> Option<&mut dyn Widget> {
        match self {
            Self::Slider(s) => Some(s),
            Self::Window(w) => Some(w),
            Self::SwipeWindow(w) => Some(w),
            _ => None,
        }
    }

    /// Offset applied to this node's children when drawing and hit-testing.
    #[must_use]
    pub fn content_offset(&self) -> Vec2 {
        match self {
            Self::Window(w) => w.scroll,
            Self::SwipeWindow(w) => w.layout.vec(w.offset),
            _ => Vec2::ZERO,
        }
    }

    /// Returns the item's value as a fraction in `[0, 1]`, for items that
    /// carry one.
    #[must_use]
    pub fn value(&self) -> Option<f32> {
        match self {
            Self::Gauge(g) => Some(g.fraction()),
            Self::Needle(n) => {
                let span = n.max_angle - n.min_angle;
                Some(if span == 0.0 {
                    0.0
                } else {
                    unit((n.angle - n.min_angle) / span)
                })
            }
            Self::Slider(s) => Some(s.value),
            Self::ProgressBar(p) => Some(p.value),
            Self::Image { opacity } | Self::Rectangle { opacity } => Some(*opacity),
            _ => None,
        }
    }

    /// Sets the item's value from a fraction in `[0, 1]`.
    ///
    /// Returns `false` if the item has no value or it did not change.
    pub fn set_value(&mut self, fraction: f32) -> bool {
        let f = unit(fraction);
        let changed = self.value().is_some_and(|old| old != f);
        match self {
            Self::Gauge(g) => g.value = g.min + (g.max - g.min) * f,
            Self::Needle(n) => n.angle = n.min_angle + (n.max_angle - n.min_angle) * f,
            Self::Slider(s) => s.value = f,
            Self::ProgressBar(p) => p.value = f,
            Self::Image { opacity } | Self::Rectangle { opacity } => *opacity = f,
            _ => return false,
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_tracks_pointer() {
        let mut s = Slider::default();
        let size = Size::new(200.0, 20.0);
        assert_eq!(s.press(Point::new(50.0, 10.0), size), Response::CHANGED);
        assert_eq!(s.value, 0.25);
        // Past the end clamps.
        let _ = s.drag(Point::new(400.0, 10.0), Vec2::new(350.0, 0.0), size);
        assert_eq!(s.value, 1.0);
        assert_eq!(
            s.drag(Point::new(300.0, 10.0), Vec2::new(-100.0, 0.0), size),
            Response::NONE,
            "still clamped at 1"
        );
    }

    #[test]
    fn vertical_slider_grows_upwards() {
        let mut s = Slider {
            value: 0.0,
            layout: Layout::Vertical,
        };
        let _ = s.press(Point::new(5.0, 25.0), Size::new(10.0, 100.0));
        assert_eq!(s.value, 0.75);
    }

    #[test]
    fn window_scroll_is_clamped() {
        let mut w = Window::new(Size::new(100.0, 300.0));
        let size = Size::new(100.0, 100.0);
        assert_eq!(
            w.drag(Point::ZERO, Vec2::new(0.0, 50.0), size),
            Response::NONE,
            "cannot scroll past the top"
        );
        let _ = w.drag(Point::ZERO, Vec2::new(0.0, -500.0), size);
        assert_eq!(w.scroll, Vec2::new(0.0, -200.0));
    }

    #[test]
    fn swipe_window_snaps_to_nearest_page() {
        let mut w = SwipeWindow::new(3, Layout::Horizontal);
        let size = Size::new(100.0, 100.0);
        let _ = w.drag(Point::ZERO, Vec2::new(-140.0, 0.0), size);
        assert_eq!(w.offset, -140.0);
        assert_eq!(w.release(size), Response::CHANGED);
        assert_eq!(w.page, 1);
        assert_eq!(w.offset, -100.0);

        let _ = w.drag(Point::ZERO, Vec2::new(-1000.0, 0.0), size);
        assert_eq!(w.offset, -200.0, "clamped at the last page");
        let _ = w.release(size);
        assert_eq!(w.page, 2);
    }

    #[test]
    fn set_value_maps_ranges() {
        let mut g = GraphicsItem::Gauge(Gauge::new(0.0, 200.0));
        assert!(g.set_value(0.5));
        assert_eq!(g, GraphicsItem::Gauge(Gauge { value: 100.0, min: 0.0, max: 200.0 }));
        assert!(!g.set_value(0.5), "unchanged");
        assert!(!GraphicsItem::Button.set_value(1.0));
        let mut r = GraphicsItem::Rectangle { opacity: 1.0 };
        assert!(r.set_value(f32::NAN));
        assert_eq!(r.value(), Some(0.0));
    }

    #[test]
    fn content_offset_follows_layout() {
        let mut w = SwipeWindow::new(2, Layout::Vertical);
        w.offset = -40.0;
        assert_eq!(GraphicsItem::SwipeWindow(w).content_offset(), Vec2::new(0.0, -40.0));
        assert_eq!(GraphicsItem::Screen.content_offset(), Vec2::ZERO);
    }
}
