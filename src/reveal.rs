//! Progress tweening and the diagonal clip mask of the icon area.
//!
//! The reveal is a single scalar `progress` in `[0, 1]`. Each frame the icon
//! area is clipped to a five point polygon whose bottom edge is skewed by an
//! amount that shrinks to zero as the panel becomes fully open.

use std::time::{Duration, Instant};

const SNAP_EPSILON: f64 = 0.01;

/// Cubic ease-out: fast start, slow settle.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Rounds progress values that are visually indistinguishable from the ends.
pub fn snap_progress(progress: f64) -> f64 {
    if progress <= SNAP_EPSILON {
        0.0
    } else if progress >= 1.0 - SNAP_EPSILON {
        1.0
    } else {
        progress
    }
}

/// Height of the panel body for a given progress, growing from the
/// collapsed (trigger) height to the expanded height.
pub fn displayed_height(progress: f64, collapsed: f32, expanded: f32) -> f32 {
    let p = snap_progress(progress);
    let travel = f64::from((expanded - collapsed).max(0.0));
    collapsed + (travel * p).floor() as f32
}

/// A time based interpolation between two values.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: f64,
    to: f64,
    start: Instant,
    duration: Duration,
}

impl Tween {
    pub fn new(from: f64, to: f64, start: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            start,
            duration,
        }
    }

    /// Returns the eased value at `now` and whether the tween is finished.
    /// A finished tween yields exactly `to`.
    pub fn sample(&self, now: Instant) -> (f64, bool) {
        let elapsed = now.saturating_duration_since(self.start);
        if elapsed >= self.duration {
            return (self.to, true);
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (self.from + (self.to - self.from) * ease_out_cubic(t), false)
    }

    pub fn target(&self) -> f64 {
        self.to
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealDirection {
    Opening,
    Closing,
}

impl RevealDirection {
    fn endpoints(self) -> (f64, f64) {
        match self {
            RevealDirection::Opening => (0.0, 1.0),
            RevealDirection::Closing => (1.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    pub progress: f64,
    pub direction: RevealDirection,
    pub running: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskPoint {
    pub x: i32,
    pub y: i32,
}

impl MaskPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One horizontal slice of a [`ClipPolygon`]: rows `top..bottom` are visible
/// from `x = 0` up to `right`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipBand {
    pub top: f32,
    pub bottom: f32,
    pub right: f32,
}

/// The visible region of the icon area, in icon-area local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipPolygon {
    points: [MaskPoint; 5],
}

impl ClipPolygon {
    #[cfg(test)]
    pub fn points(&self) -> &[MaskPoint; 5] {
        &self.points
    }

    fn width(&self) -> i32 {
        self.points[1].x
    }

    fn visible_height(&self) -> i32 {
        self.points[4].y
    }

    // Where the right edge starts bending inwards.
    fn skew_top(&self) -> i32 {
        self.points[2].y
    }

    fn skew_bottom_x(&self) -> i32 {
        self.points[3].x
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.visible_height() <= 0
    }

    /// Right edge of the visible region on row `y`, if the row is visible.
    pub fn right_edge_at(&self, y: f32) -> Option<f32> {
        let bottom = self.visible_height() as f32;
        if self.is_empty() || y < 0.0 || y > bottom {
            return None;
        }
        let width = self.width() as f32;
        let skew_top = self.skew_top() as f32;
        if y <= skew_top || bottom <= skew_top {
            return Some(width);
        }
        let t = (y - skew_top) / (bottom - skew_top);
        let skew_x = self.skew_bottom_x() as f32;
        Some(width + (skew_x - width) * t)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && self.right_edge_at(y).is_some_and(|right| x <= right)
    }

    /// Decomposes the polygon into bands no taller than `step` in the skewed
    /// part. Each band uses the right edge at its bottom row, so no band
    /// reaches outside the polygon.
    pub fn bands(&self, step: f32) -> Vec<ClipBand> {
        if self.is_empty() {
            return Vec::new();
        }
        let step = step.max(1.0);
        let width = self.width() as f32;
        let skew_top = self.skew_top() as f32;
        let bottom = self.visible_height() as f32;

        let mut bands = Vec::new();
        if skew_top > 0.0 {
            bands.push(ClipBand {
                top: 0.0,
                bottom: skew_top,
                right: width,
            });
        }
        let mut top = skew_top;
        while top < bottom {
            let band_bottom = (top + step).min(bottom);
            let right = self.right_edge_at(band_bottom).unwrap_or(0.0);
            bands.push(ClipBand {
                top,
                bottom: band_bottom,
                right,
            });
            top = band_bottom;
        }
        bands
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconAreaMask {
    /// Fully closed: not drawn, not interactive.
    Hidden,
    /// Drawn and interactive inside the polygon only.
    Clipped(ClipPolygon),
}

impl IconAreaMask {
    #[cfg(test)]
    pub fn is_hidden(&self) -> bool {
        matches!(self, IconAreaMask::Hidden)
    }

    pub fn polygon(&self) -> Option<&ClipPolygon> {
        match self {
            IconAreaMask::Hidden => None,
            IconAreaMask::Clipped(polygon) => Some(polygon),
        }
    }
}

/// Computes the icon-area mask for `progress` over a `width` x `height` area.
pub fn reveal_mask(progress: f64, width: i32, height: i32, diagonal_factor: f64) -> IconAreaMask {
    let p = snap_progress(progress);
    if p == 0.0 {
        return IconAreaMask::Hidden;
    }

    let w = width.max(0);
    let h = height.max(0);
    let visible_height = (f64::from(h) * p).floor() as i32;
    let max_diagonal = (f64::from(w) * diagonal_factor).floor() as i32;
    let diagonal_offset = (f64::from(max_diagonal) * (1.0 - p)).floor() as i32;

    IconAreaMask::Clipped(ClipPolygon {
        points: [
            MaskPoint::new(0, 0),
            MaskPoint::new(w, 0),
            MaskPoint::new(w, (visible_height - diagonal_offset).max(0)),
            MaskPoint::new((w - diagonal_offset).max(0), visible_height),
            MaskPoint::new(0, visible_height),
        ],
    })
}

/// Owns the reveal progress and its tween.
#[derive(Debug, Clone)]
pub struct RevealAnimator {
    state: AnimationState,
    tween: Option<Tween>,
    duration: Duration,
    diagonal_factor: f64,
}

impl RevealAnimator {
    pub fn new(duration: Duration, diagonal_factor: f64) -> Self {
        Self {
            state: AnimationState {
                progress: 0.0,
                direction: RevealDirection::Closing,
                running: false,
            },
            tween: None,
            duration,
            diagonal_factor,
        }
    }

    pub fn progress(&self) -> f64 {
        self.state.progress
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Drops any running tween and parks progress at the closed end.
    pub fn reset_closed(&mut self) {
        self.tween = None;
        self.state = AnimationState {
            progress: 0.0,
            direction: RevealDirection::Closing,
            running: false,
        };
    }

    pub fn start(&mut self, direction: RevealDirection, now: Instant) {
        let (from, to) = direction.endpoints();
        self.tween = Some(Tween::new(from, to, now, self.duration));
        self.state = AnimationState {
            progress: from,
            direction,
            running: true,
        };
    }

    /// Advances the tween to `now`. Returns `true` on the frame the run
    /// completes.
    pub fn advance(&mut self, now: Instant) -> bool {
        let Some(tween) = self.tween else {
            return false;
        };
        let (value, finished) = tween.sample(now);
        // Keep progress monotonic even if frames arrive out of order.
        self.state.progress = match self.state.direction {
            RevealDirection::Opening => value.max(self.state.progress),
            RevealDirection::Closing => value.min(self.state.progress),
        };
        if finished {
            self.state.progress = tween.target();
            self.state.running = false;
            self.tween = None;
        }
        finished
    }

    pub fn mask(&self, width: i32, height: i32) -> IconAreaMask {
        reveal_mask(self.state.progress, width, height, self.diagonal_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(mask: IconAreaMask) -> Vec<(i32, i32)> {
        mask.polygon()
            .expect("mask should be clipped")
            .points()
            .iter()
            .map(|p| (p.x, p.y))
            .collect()
    }

    #[test]
    fn fully_open_is_a_rectangle() {
        let mask = reveal_mask(1.0, 300, 200, 0.25);
        assert_eq!(
            points(mask),
            vec![(0, 0), (300, 0), (300, 200), (300, 200), (0, 200)]
        );
    }

    #[test]
    fn half_open_has_floored_diagonal() {
        let mask = reveal_mask(0.5, 300, 200, 0.25);
        assert_eq!(
            points(mask),
            vec![(0, 0), (300, 0), (300, 63), (263, 100), (0, 100)]
        );
    }

    #[test]
    fn decimal_progress_floors_in_double_precision() {
        // 0.7 is not exact in binary; 100 * 0.7 must still floor to 70.
        let mask = reveal_mask(0.7, 100, 100, 0.25);
        assert_eq!(
            points(mask),
            vec![(0, 0), (100, 0), (100, 63), (93, 70), (0, 70)]
        );
        assert_eq!(displayed_height(0.7, 0.0, 100.0), 70.0);
    }

    #[test]
    fn near_ends_snap_to_the_ends() {
        let closed = reveal_mask(0.0, 300, 200, 0.25);
        let open = reveal_mask(1.0, 300, 200, 0.25);
        assert!(closed.is_hidden());

        for p in [-0.5, 0.0, 0.001, 0.005, 0.01] {
            assert_eq!(reveal_mask(p, 300, 200, 0.25), closed, "p = {p}");
        }
        for p in [0.99, 0.995, 0.9999, 1.0, 1.2] {
            assert_eq!(reveal_mask(p, 300, 200, 0.25), open, "p = {p}");
        }
    }

    #[test]
    fn zero_sized_area_gives_empty_polygon() {
        for (w, h) in [(0, 200), (300, 0), (0, 0), (-4, -4)] {
            let mask = reveal_mask(0.5, w, h, 0.25);
            let polygon = mask.polygon().expect("progress > 0 keeps the area shown");
            assert!(polygon.is_empty());
            assert!(polygon.bands(4.0).is_empty());
            assert!(!polygon.contains(0.0, 0.0));
        }
    }

    #[test]
    fn early_frames_clamp_skew_to_the_top() {
        // visible height 20 is smaller than the offset 67, so the right edge
        // starts bending at y = 0.
        let mask = reveal_mask(0.1, 300, 200, 0.25);
        assert_eq!(
            points(mask),
            vec![(0, 0), (300, 0), (300, 0), (233, 20), (0, 20)]
        );
    }

    #[test]
    fn contains_follows_the_diagonal_edge() {
        let mask = reveal_mask(0.5, 300, 200, 0.25);
        let polygon = mask.polygon().unwrap();

        assert!(polygon.contains(299.0, 10.0));
        assert!(polygon.contains(10.0, 99.0));
        assert!(!polygon.contains(10.0, 101.0));
        // Bottom right corner is cut: edge runs (300,63) -> (263,100).
        assert!(!polygon.contains(290.0, 99.0));
        assert!(polygon.contains(260.0, 99.0));
        assert!(!polygon.contains(-1.0, 50.0));
    }

    #[test]
    fn bands_stay_inside_the_polygon_and_cover_it() {
        let mask = reveal_mask(0.5, 300, 200, 0.25);
        let polygon = mask.polygon().unwrap();
        let bands = polygon.bands(4.0);

        assert_eq!(
            bands.first(),
            Some(&ClipBand {
                top: 0.0,
                bottom: 63.0,
                right: 300.0
            })
        );
        assert_eq!(bands.last().map(|b| b.bottom), Some(100.0));
        for pair in bands.windows(2) {
            assert_eq!(pair[0].bottom, pair[1].top);
        }
        for band in &bands {
            assert!(band.bottom - band.top <= 63.0);
            assert!(polygon.contains(band.right - 0.01, band.top));
            assert!(polygon.contains(band.right - 0.01, band.bottom));
        }
    }

    #[test]
    fn easing_is_fast_then_slow() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!(ease_out_cubic(0.25) > 0.25);
        let first_half = ease_out_cubic(0.5) - ease_out_cubic(0.25);
        let second_half = ease_out_cubic(0.75) - ease_out_cubic(0.5);
        assert!(first_half > second_half);
    }

    #[test]
    fn panel_height_grows_from_trigger_height() {
        assert_eq!(displayed_height(0.0, 64.0, 380.0), 64.0);
        assert_eq!(displayed_height(0.5, 64.0, 380.0), 222.0);
        assert_eq!(displayed_height(0.995, 64.0, 380.0), 380.0);
    }

    #[test]
    fn animator_lands_exactly_on_the_target() {
        let start = Instant::now();
        let mut animator = RevealAnimator::new(Duration::from_millis(400), 0.25);

        animator.start(RevealDirection::Opening, start);
        assert!(animator.is_running());
        assert!(!animator.advance(start + Duration::from_millis(100)));
        let mid = animator.progress();
        assert!(mid > 0.0 && mid < 1.0);

        assert!(animator.advance(start + Duration::from_millis(400)));
        assert_eq!(animator.progress(), 1.0);
        assert!(!animator.is_running());

        animator.start(RevealDirection::Closing, start);
        animator.advance(start + Duration::from_secs(1));
        assert_eq!(animator.progress(), 0.0);
        assert!(animator.mask(300, 200).is_hidden());
    }

    #[test]
    fn progress_never_moves_against_the_direction() {
        let start = Instant::now();
        let mut animator = RevealAnimator::new(Duration::from_millis(400), 0.25);
        animator.start(RevealDirection::Opening, start);

        animator.advance(start + Duration::from_millis(200));
        let later = animator.progress();
        animator.advance(start + Duration::from_millis(50));
        assert_eq!(animator.progress(), later);
    }

    #[test]
    fn zero_duration_finishes_on_first_frame() {
        let start = Instant::now();
        let mut animator = RevealAnimator::new(Duration::ZERO, 0.25);
        animator.start(RevealDirection::Opening, start);
        assert!(animator.advance(start));
        assert_eq!(animator.progress(), 1.0);
    }
}
