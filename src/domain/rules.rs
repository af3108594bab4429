/// Success rules — pure functions, no side effects.
///
/// These decide "did the player hit the target, and for how much"
/// without touching the session.
///
/// ## Scoring Table
///
/// ┌──────────────────────────┬───────────────────────────────┐
/// │ Condition                 │ Award                         │
/// ├──────────────────────────┼───────────────────────────────┤
/// │ distance >= 0.2           │ none (miss)                   │
/// │ distance < 0.2            │ max(100 - floor(d*100), 50)   │
/// │ distance == 0.0           │ 100                           │
/// └──────────────────────────┴───────────────────────────────┘
///
/// There is no "already solved" state: every evaluation that lands in the
/// success band awards again. Wiggling a slider inside the band farms
/// points, and that is the intended game behavior.

use glam::DVec2;

/// Strict upper bound on distance for a match.
pub const SUCCESS_RADIUS: f64 = 0.2;
pub const MAX_AWARD: u32 = 100;
pub const MIN_AWARD: u32 = 50;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Verdict {
    Success { distance: f64, award: u32 },
    Miss { distance: f64 },
}

impl Verdict {
    pub fn distance(&self) -> f64 {
        match *self {
            Verdict::Success { distance, .. } | Verdict::Miss { distance } => distance,
        }
    }

    pub fn award(&self) -> u32 {
        match *self {
            Verdict::Success { award, .. } => award,
            Verdict::Miss { .. } => 0,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Success { .. })
    }
}

/// Euclidean distance between player and target.
#[inline]
pub fn distance(player: DVec2, target: DVec2) -> f64 {
    (player - target).length()
}

/// Points for a successful match at `distance`.
pub fn award_for(distance: f64) -> u32 {
    let penalty = (distance * 100.0).floor().max(0.0) as u32;
    MAX_AWARD.saturating_sub(penalty).max(MIN_AWARD)
}

pub fn check(player: DVec2, target: DVec2) -> Verdict {
    let d = distance(player, target);
    if d < SUCCESS_RADIUS {
        Verdict::Success { distance: d, award: award_for(d) }
    } else {
        Verdict::Miss { distance: d }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_hit_awards_full() {
        let v = check(DVec2::new(2.0, 3.0), DVec2::new(2.0, 3.0));
        assert_eq!(v, Verdict::Success { distance: 0.0, award: 100 });
    }

    #[test]
    fn near_hit_awards_scaled() {
        let v = check(DVec2::new(0.19, 0.0), DVec2::ZERO);
        assert!(v.is_success());
        assert_eq!(v.award(), 81);
        assert!((v.distance() - 0.19).abs() < 1e-12);
    }

    #[test]
    fn miss_outside_band() {
        let v = check(DVec2::new(0.25, 0.0), DVec2::ZERO);
        assert!(!v.is_success());
        assert_eq!(v.award(), 0);

        let v = check(DVec2::new(0.0, 0.6), DVec2::ZERO);
        assert_eq!(v, Verdict::Miss { distance: 0.6 });
    }

    #[test]
    fn band_edge_is_exclusive() {
        let v = check(DVec2::new(0.2, 0.0), DVec2::ZERO);
        assert!(!v.is_success());
    }

    #[test]
    fn award_never_below_floor() {
        // not reachable through check(), but the floor must hold regardless
        assert_eq!(award_for(0.75), 50);
        assert_eq!(award_for(3.0), 50);
        assert_eq!(award_for(0.199), 81);
        assert_eq!(award_for(0.005), 100);
    }

    #[test]
    fn diagonal_distance() {
        let d = distance(DVec2::new(3.0, 4.0), DVec2::ZERO);
        assert!((d - 5.0).abs() < 1e-12);
    }
}
