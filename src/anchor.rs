use eframe::egui::{pos2, Pos2, Rect, Vec2};

/// Placement rule for the trigger and the panel hanging under it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPositioner {
    /// Horizontal position of the trigger centre as a fraction of the screen
    /// width.
    pub anchor_fraction: f32,
    pub top_margin: f32,
    pub trigger_size: Vec2,
    pub panel_size: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorGeometry {
    pub trigger: Rect,
    pub panel: Rect,
}

impl AnchorGeometry {
    /// Area the native window has to cover.
    pub fn window_rect(&self, panel_visible: bool) -> Rect {
        if panel_visible {
            self.trigger.union(self.panel)
        } else {
            self.trigger
        }
    }
}

impl AnchorPositioner {
    pub fn trigger_anchor(&self, screen: Rect) -> Pos2 {
        let x = screen.min.x + (screen.width() * self.anchor_fraction).floor()
            - half(self.trigger_size.x);
        pos2(x, screen.min.y + self.top_margin)
    }

    pub fn panel_anchor(&self, screen: Rect, trigger_top_left: Pos2) -> Pos2 {
        let x = trigger_top_left.x + half(self.trigger_size.x) - half(self.panel_size.x);
        pos2(x, screen.min.y + self.top_margin)
    }

    pub fn compute(&self, screen: Rect) -> AnchorGeometry {
        let trigger_min = self.trigger_anchor(screen);
        let panel_min = self.panel_anchor(screen, trigger_min);
        AnchorGeometry {
            trigger: Rect::from_min_size(trigger_min, self.trigger_size),
            panel: Rect::from_min_size(panel_min, self.panel_size),
        }
    }
}

fn half(length: f32) -> f32 {
    (length / 2.0).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::vec2;

    fn positioner() -> AnchorPositioner {
        AnchorPositioner {
            anchor_fraction: 0.85,
            top_margin: 8.0,
            trigger_size: vec2(301.0, 64.0),
            panel_size: vec2(301.0, 380.0),
        }
    }

    #[test]
    fn trigger_sits_at_85_percent_of_the_screen() {
        let screen = Rect::from_min_size(Pos2::ZERO, vec2(1920.0, 1080.0));
        let anchor = positioner().trigger_anchor(screen);
        // floor(1920 * 0.85) = 1632, minus floor(301 / 2) = 150
        assert_eq!(anchor, pos2(1482.0, 8.0));
    }

    #[test]
    fn panel_is_centred_under_the_trigger() {
        let positioner = AnchorPositioner {
            panel_size: vec2(200.0, 380.0),
            ..positioner()
        };
        let screen = Rect::from_min_size(Pos2::ZERO, vec2(1920.0, 1080.0));
        let geometry = positioner.compute(screen);

        assert_eq!(geometry.panel.min, pos2(1482.0 + 150.0 - 100.0, 8.0));
        assert_eq!(geometry.panel.center().x.floor(), geometry.trigger.center().x.floor());
    }

    #[test]
    fn anchors_follow_a_screen_offset() {
        let screen = Rect::from_min_size(pos2(100.0, 40.0), vec2(1000.0, 800.0));
        let geometry = positioner().compute(screen);

        assert_eq!(geometry.trigger.min, pos2(100.0 + 850.0 - 150.0, 48.0));
        assert_eq!(geometry.panel.min.y, 48.0);
    }

    #[test]
    fn window_covers_panel_only_when_visible() {
        let screen = Rect::from_min_size(Pos2::ZERO, vec2(1920.0, 1080.0));
        let geometry = positioner().compute(screen);

        assert_eq!(geometry.window_rect(false), geometry.trigger);
        let open = geometry.window_rect(true);
        assert!(open.contains_rect(geometry.trigger));
        assert!(open.contains_rect(geometry.panel));
    }
}
