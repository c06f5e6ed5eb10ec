//! Open/close orchestration of the trigger, the panel and the back button.

use crate::anchor::{AnchorGeometry, AnchorPositioner};
use crate::reveal::{IconAreaMask, RevealAnimator, RevealDirection, Tween};
use eframe::egui::Rect;
use log::debug;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelVisibility {
    Closed,
    Opening,
    Open,
    Closing,
}

impl PanelVisibility {
    pub fn is_transitioning(self) -> bool {
        matches!(self, PanelVisibility::Opening | PanelVisibility::Closing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Started(RevealDirection),
    /// A transition is already running; the request was dropped.
    Ignored,
}

/// Visibility of the individual surfaces, as the renderer should show them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surfaces {
    pub trigger_visible: bool,
    pub trigger_opacity: f32,
    pub panel_visible: bool,
    pub back_visible: bool,
}

impl Surfaces {
    fn closed() -> Self {
        Self {
            trigger_visible: true,
            trigger_opacity: 1.0,
            panel_visible: false,
            back_visible: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Timings {
    pub reveal: Duration,
    pub fade: Duration,
}

// Both halves of one transition. The transition ends when both are done,
// whichever of the configured durations is longer.
#[derive(Debug, Clone, Copy)]
struct Transition {
    direction: RevealDirection,
    fade: Tween,
    fade_done: bool,
    reveal_done: bool,
}

#[derive(Debug, Clone)]
pub struct PanelStateMachine {
    visibility: PanelVisibility,
    surfaces: Surfaces,
    animator: RevealAnimator,
    positioner: AnchorPositioner,
    geometry: AnchorGeometry,
    transition: Option<Transition>,
    fade_duration: Duration,
}

impl PanelStateMachine {
    pub fn new(
        timings: Timings,
        diagonal_factor: f64,
        positioner: AnchorPositioner,
        screen: Rect,
    ) -> Self {
        Self {
            visibility: PanelVisibility::Closed,
            surfaces: Surfaces::closed(),
            animator: RevealAnimator::new(timings.reveal, diagonal_factor),
            geometry: positioner.compute(screen),
            positioner,
            transition: None,
            fade_duration: timings.fade,
        }
    }

    pub fn visibility(&self) -> PanelVisibility {
        self.visibility
    }

    pub fn surfaces(&self) -> Surfaces {
        self.surfaces
    }

    pub fn geometry(&self) -> AnchorGeometry {
        self.geometry
    }

    pub fn progress(&self) -> f64 {
        self.animator.progress()
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    pub fn icon_area_mask(&self, width: i32, height: i32) -> IconAreaMask {
        self.animator.mask(width, height)
    }

    /// Recomputes the anchors, e.g. after the screen size changed.
    pub fn relayout(&mut self, screen: Rect) {
        self.geometry = self.positioner.compute(screen);
    }

    pub fn toggle(&mut self, now: Instant, screen: Rect) -> ToggleOutcome {
        let direction = match self.visibility {
            PanelVisibility::Opening | PanelVisibility::Closing => {
                debug!("toggle ignored while {:?}", self.visibility);
                return ToggleOutcome::Ignored;
            }
            PanelVisibility::Closed => RevealDirection::Opening,
            PanelVisibility::Open => RevealDirection::Closing,
        };

        self.relayout(screen);

        let fade = match direction {
            RevealDirection::Opening => {
                self.surfaces.panel_visible = true;
                self.surfaces.back_visible = false;
                self.surfaces.trigger_opacity = 1.0;
                // Start from an empty mask so no fully open frame leaks out.
                self.animator.reset_closed();
                self.visibility = PanelVisibility::Opening;
                Tween::new(1.0, 0.0, now, self.fade_duration)
            }
            RevealDirection::Closing => {
                self.surfaces.back_visible = false;
                self.surfaces.trigger_visible = true;
                self.surfaces.trigger_opacity = 0.0;
                self.visibility = PanelVisibility::Closing;
                Tween::new(0.0, 1.0, now, self.fade_duration)
            }
        };

        self.animator.start(direction, now);
        self.transition = Some(Transition {
            direction,
            fade,
            fade_done: false,
            reveal_done: false,
        });
        ToggleOutcome::Started(direction)
    }

    /// Drives the running transition to `now`. Completion effects are applied
    /// once, on the frame their tween finishes.
    pub fn advance(&mut self, now: Instant) {
        let Some(mut transition) = self.transition.take() else {
            return;
        };

        if !transition.fade_done {
            let (opacity, finished) = transition.fade.sample(now);
            self.surfaces.trigger_opacity = opacity as f32;
            if finished {
                transition.fade_done = true;
                if transition.direction == RevealDirection::Opening {
                    self.surfaces.trigger_visible = false;
                }
            }
        }

        if !transition.reveal_done && self.animator.advance(now) {
            transition.reveal_done = true;
            match transition.direction {
                RevealDirection::Opening => self.surfaces.back_visible = true,
                RevealDirection::Closing => self.surfaces.panel_visible = false,
            }
        }

        if transition.fade_done && transition.reveal_done {
            self.visibility = match transition.direction {
                RevealDirection::Opening => PanelVisibility::Open,
                RevealDirection::Closing => PanelVisibility::Closed,
            };
            debug!("panel transition finished: {:?}", self.visibility);
        } else {
            self.transition = Some(transition);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2, Pos2};

    const REVEAL: Duration = Duration::from_millis(700);
    const FADE: Duration = Duration::from_millis(350);

    fn screen() -> Rect {
        Rect::from_min_size(Pos2::ZERO, vec2(1920.0, 1080.0))
    }

    fn positioner() -> AnchorPositioner {
        AnchorPositioner {
            anchor_fraction: 0.85,
            top_margin: 8.0,
            trigger_size: vec2(300.0, 64.0),
            panel_size: vec2(300.0, 380.0),
        }
    }

    fn machine(reveal: Duration, fade: Duration) -> PanelStateMachine {
        PanelStateMachine::new(Timings { reveal, fade }, 0.25, positioner(), screen())
    }

    #[test]
    fn starts_closed_with_only_the_trigger() {
        let panel = machine(REVEAL, FADE);
        assert_eq!(panel.visibility(), PanelVisibility::Closed);
        assert_eq!(panel.surfaces(), Surfaces::closed());
        assert!(panel.icon_area_mask(300, 200).is_hidden());
    }

    #[test]
    fn opening_shows_panel_and_starts_from_empty_mask() {
        let start = Instant::now();
        let mut panel = machine(REVEAL, FADE);

        assert_eq!(
            panel.toggle(start, screen()),
            ToggleOutcome::Started(RevealDirection::Opening)
        );
        assert_eq!(panel.visibility(), PanelVisibility::Opening);
        let surfaces = panel.surfaces();
        assert!(surfaces.panel_visible);
        assert!(!surfaces.back_visible);
        assert!(surfaces.trigger_visible);
        assert_eq!(panel.progress(), 0.0);
        assert!(panel.icon_area_mask(300, 200).is_hidden());
    }

    #[test]
    fn toggle_spam_mid_flight_changes_state_once() {
        let start = Instant::now();
        let mut panel = machine(REVEAL, FADE);

        panel.toggle(start, screen());
        panel.advance(start + Duration::from_millis(100));
        let before = (panel.visibility(), panel.surfaces(), panel.progress());

        assert_eq!(
            panel.toggle(start + Duration::from_millis(101), screen()),
            ToggleOutcome::Ignored
        );
        assert_eq!(
            panel.toggle(start + Duration::from_millis(102), screen()),
            ToggleOutcome::Ignored
        );
        assert_eq!((panel.visibility(), panel.surfaces(), panel.progress()), before);

        panel.advance(start + REVEAL);
        assert_eq!(panel.visibility(), PanelVisibility::Open);
    }

    #[test]
    fn completion_effects_follow_their_own_tween() {
        let start = Instant::now();
        let mut panel = machine(REVEAL, FADE);
        panel.toggle(start, screen());

        panel.advance(start + FADE);
        let surfaces = panel.surfaces();
        assert!(!surfaces.trigger_visible);
        assert_eq!(surfaces.trigger_opacity, 0.0);
        assert!(!surfaces.back_visible);
        assert_eq!(panel.visibility(), PanelVisibility::Opening);

        panel.advance(start + REVEAL);
        let surfaces = panel.surfaces();
        assert!(surfaces.back_visible);
        assert!(surfaces.panel_visible);
        assert_eq!(panel.progress(), 1.0);
        assert_eq!(panel.visibility(), PanelVisibility::Open);
        assert!(!panel.is_animating());
    }

    #[test]
    fn slower_fade_still_gates_the_open_state() {
        let start = Instant::now();
        let mut panel = machine(Duration::from_millis(200), Duration::from_millis(500));
        panel.toggle(start, screen());

        panel.advance(start + Duration::from_millis(200));
        assert!(panel.surfaces().back_visible);
        assert!(panel.surfaces().trigger_visible);
        assert_eq!(panel.visibility(), PanelVisibility::Opening);

        panel.advance(start + Duration::from_millis(500));
        assert!(!panel.surfaces().trigger_visible);
        assert_eq!(panel.visibility(), PanelVisibility::Open);
    }

    #[test]
    fn full_cycle_returns_to_closed_and_empty() {
        let start = Instant::now();
        let mut panel = machine(REVEAL, FADE);

        panel.toggle(start, screen());
        panel.advance(start + Duration::from_millis(300));
        panel.advance(start + REVEAL);
        assert_eq!(panel.visibility(), PanelVisibility::Open);

        let close_at = start + Duration::from_secs(2);
        assert_eq!(
            panel.toggle(close_at, screen()),
            ToggleOutcome::Started(RevealDirection::Closing)
        );
        let surfaces = panel.surfaces();
        assert!(!surfaces.back_visible);
        assert!(surfaces.trigger_visible);
        assert_eq!(surfaces.trigger_opacity, 0.0);

        panel.advance(close_at + Duration::from_millis(350));
        assert_eq!(panel.surfaces().trigger_opacity, 1.0);
        assert!(panel.surfaces().panel_visible);

        panel.advance(close_at + REVEAL);
        assert_eq!(panel.visibility(), PanelVisibility::Closed);
        assert_eq!(panel.progress(), 0.0);
        assert!(panel.icon_area_mask(300, 200).is_hidden());
        assert_eq!(panel.surfaces(), Surfaces::closed());
    }

    #[test]
    fn mask_is_recomputed_every_frame() {
        let start = Instant::now();
        let mut panel = machine(REVEAL, FADE);
        panel.toggle(start, screen());

        let mut last_height = 0;
        for ms in [50, 150, 300, 500] {
            panel.advance(start + Duration::from_millis(ms));
            let mask = panel.icon_area_mask(300, 200);
            let height = mask.polygon().map(|p| p.points()[4].y).unwrap_or(0);
            assert!(height > last_height, "frame at {ms}ms did not grow");
            last_height = height;
        }
    }

    #[test]
    fn toggle_recomputes_anchors_from_the_current_screen() {
        let start = Instant::now();
        let mut panel = machine(REVEAL, FADE);
        let smaller = Rect::from_min_size(Pos2::ZERO, vec2(1000.0, 700.0));

        panel.toggle(start, smaller);
        assert_eq!(panel.geometry().trigger.min, pos2(850.0 - 150.0, 8.0));
        assert_eq!(panel.geometry().panel.min, pos2(700.0, 8.0));
    }

    #[test]
    fn advance_without_transition_is_a_no_op() {
        let mut panel = machine(REVEAL, FADE);
        panel.advance(Instant::now());
        assert_eq!(panel.visibility(), PanelVisibility::Closed);
        assert!(!panel.is_animating());
    }
}
