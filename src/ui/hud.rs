/// Transient presentation state: the success banner and the hint box.
///
/// Lives outside `Session` so that showing a hint never touches game
/// state. Both overlays disappear on the next change, the way a redraw
/// would wipe them; the banner also fades after `banner_duration` ticks.

use crate::domain::combination::Coefficients;
use crate::sim::event::SessionEvent;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HintDisplay {
    Solution(Coefficients),
    NotRepresentable,
}

impl HintDisplay {
    pub fn text(&self) -> String {
        match self {
            HintDisplay::Solution(c) => format!("Hint: coefficients ≈ ({:.1}, {:.1})", c.a1, c.a2),
            HintDisplay::NotRepresentable => "Hint: this basis cannot represent the target!".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Hud {
    banner_duration: u32,
    banner_timer: u32,
    last_award: u32,
    hint: Option<HintDisplay>,
}

impl Hud {
    pub fn new(banner_duration: u32) -> Self {
        Hud {
            banner_duration,
            banner_timer: 0,
            last_award: 0,
            hint: None,
        }
    }

    /// Fold the events of one processed action into the overlays.
    pub fn absorb(&mut self, events: &[SessionEvent]) {
        for event in events {
            match event {
                SessionEvent::CombinationChanged { .. }
                | SessionEvent::LevelAdvanced { .. }
                | SessionEvent::LevelReset => {
                    self.banner_timer = 0;
                    self.hint = None;
                }
                SessionEvent::Success { award, .. } => {
                    self.banner_timer = self.banner_duration.max(1);
                    self.last_award = *award;
                }
                SessionEvent::HintReady(c) => self.hint = Some(HintDisplay::Solution(*c)),
                SessionEvent::HintUnavailable => self.hint = Some(HintDisplay::NotRepresentable),
            }
        }
    }

    /// Advance one display tick.
    pub fn tick(&mut self) {
        self.banner_timer = self.banner_timer.saturating_sub(1);
    }

    pub fn banner(&self) -> Option<String> {
        if self.banner_timer > 0 {
            Some(format!("SUCCESS! +{}", self.last_award))
        } else {
            None
        }
    }

    pub fn hint(&self) -> Option<HintDisplay> {
        self.hint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_shows_banner_until_timeout() {
        let mut hud = Hud::new(3);
        hud.absorb(&[
            SessionEvent::CombinationChanged { distance: 0.0 },
            SessionEvent::Success { distance: 0.0, award: 100 },
        ]);
        assert_eq!(hud.banner().as_deref(), Some("SUCCESS! +100"));
        hud.tick();
        hud.tick();
        assert!(hud.banner().is_some());
        hud.tick();
        assert!(hud.banner().is_none());
    }

    #[test]
    fn next_change_clears_overlays() {
        let mut hud = Hud::new(10);
        hud.absorb(&[SessionEvent::Success { distance: 0.1, award: 90 }]);
        hud.absorb(&[SessionEvent::HintUnavailable]);
        assert!(hud.banner().is_some());
        assert_eq!(hud.hint(), Some(HintDisplay::NotRepresentable));

        hud.absorb(&[SessionEvent::CombinationChanged { distance: 1.0 }]);
        assert!(hud.banner().is_none());
        assert!(hud.hint().is_none());
    }

    #[test]
    fn level_change_clears_hint() {
        let mut hud = Hud::new(10);
        hud.absorb(&[SessionEvent::HintReady(Coefficients::new(2.0, 3.0))]);
        hud.absorb(&[SessionEvent::LevelAdvanced { level: 2 }]);
        assert!(hud.hint().is_none());
    }

    #[test]
    fn hint_text_formats_one_decimal() {
        let h = HintDisplay::Solution(Coefficients::new(2.0, -1.04));
        assert_eq!(h.text(), "Hint: coefficients ≈ (2.0, -1.0)");
        assert!(HintDisplay::NotRepresentable.text().contains("cannot represent"));
    }

    #[test]
    fn zero_duration_still_flashes() {
        let mut hud = Hud::new(0);
        hud.absorb(&[SessionEvent::Success { distance: 0.0, award: 100 }]);
        assert!(hud.banner().is_some());
    }
}
