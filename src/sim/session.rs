/// Session: the complete state of a running game.
///
/// ## Derived player vector
///
/// `player` is never written directly. Every path that changes the basis
/// or the coefficients ends in `recompute()`, so
///
///   player == a1 * b1 + a2 * b2
///
/// holds whenever a `Session` is observable.
///
/// ## Transitions
///
/// The only state is "playing (level, score)":
///   - `advance_level` — level + 1, fresh target/basis, coefficients (1, 1)
///   - `reset_level`   — coefficients (1, 1), everything else kept
///
/// Neither transition touches the score. Both report whether the
/// coefficients actually moved; the step function then runs `check()`
/// as it would for any other slider change. There is no terminal state.

use glam::DVec2;
use rand::Rng;

use crate::domain::combination::{Basis, CoefficientRange, Coefficients};
use crate::domain::hint::{self, HintError};
use crate::domain::rules::{self, Verdict};
use crate::sim::level::{self, LevelDef};

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    level: u32,
    score: u32,
    basis: Basis,
    target: DVec2,
    description: String,
    coefficients: Coefficients,
    player: DVec2,
    range: CoefficientRange,
}

impl Session {
    /// Start a play-through at level 1 with score 0.
    pub fn new<R: Rng + ?Sized>(range: CoefficientRange, rng: &mut R) -> Self {
        Self::from_level(1, level::generate_level(1, rng), range)
    }

    /// Start at an arbitrary level with a prebuilt definition, score 0.
    pub fn from_level(level: u32, def: LevelDef, range: CoefficientRange) -> Self {
        let mut session = Session {
            level: level.max(1),
            score: 0,
            basis: Basis::STANDARD,
            target: DVec2::ZERO,
            description: String::new(),
            coefficients: Coefficients::DEFAULT,
            player: DVec2::ZERO,
            range,
        };
        session.load(def);
        session
    }

    // ── Read accessors ──

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn basis(&self) -> Basis {
        self.basis
    }

    pub fn target(&self) -> DVec2 {
        self.target
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn coefficients(&self) -> Coefficients {
        self.coefficients
    }

    pub fn player(&self) -> DVec2 {
        self.player
    }

    pub fn range(&self) -> CoefficientRange {
        self.range
    }

    /// Current distance from player to target.
    pub fn distance(&self) -> f64 {
        rules::distance(self.player, self.target)
    }

    /// Exact coefficients for the current target. Read-only.
    pub fn hint(&self) -> Result<Coefficients, HintError> {
        hint::solve(&self.basis, self.target)
    }

    // ── Mutations ──

    /// Apply new coefficients (clamped), recompute the player vector, and
    /// score if the result lands in the success band.
    pub fn set_coefficients(&mut self, c: Coefficients) -> Verdict {
        self.coefficients = self.range.clamp_pair(c);
        self.recompute();
        self.check()
    }

    /// Run the success check at the current coefficients; awards on a hit.
    pub fn check(&mut self) -> Verdict {
        let verdict = rules::check(self.player, self.target);
        if let Verdict::Success { award, .. } = verdict {
            self.score = self.score.saturating_add(award);
        }
        verdict
    }

    /// Next level: regenerate target/basis, coefficients back to default.
    /// Returns true when the coefficients moved.
    pub fn advance_level<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let before = self.coefficients;
        let next = self.level.saturating_add(1);
        let def = level::generate_level(next, rng);
        self.level = next;
        self.load(def);
        self.coefficients != before
    }

    /// Coefficients back to default. Level, score, basis, target kept.
    /// Returns true when the coefficients moved.
    pub fn reset_level(&mut self) -> bool {
        let before = self.coefficients;
        self.coefficients = self.range.clamp_pair(Coefficients::DEFAULT);
        self.recompute();
        self.coefficients != before
    }

    // ── Internal ──

    fn load(&mut self, def: LevelDef) {
        self.target = def.target;
        self.basis = def.basis;
        self.description = def.description;
        self.coefficients = self.range.clamp_pair(Coefficients::DEFAULT);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.player = self.basis.combine(self.coefficients);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn session(seed: u64) -> (Session, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let s = Session::new(CoefficientRange::DEFAULT, &mut rng);
        (s, rng)
    }

    #[test]
    fn starts_at_level_one() {
        let (s, _) = session(1);
        assert_eq!(s.level, 1);
        assert_eq!(s.score, 0);
        assert_eq!(s.target, DVec2::new(2.0, 3.0));
        assert_eq!(s.coefficients(), Coefficients::new(1.0, 1.0));
        assert_eq!(s.player(), DVec2::new(1.0, 1.0));
    }

    #[test]
    fn level_one_exact_solution_scores_full() {
        let (mut s, _) = session(1);
        let v = s.set_coefficients(Coefficients::new(2.0, 3.0));
        assert_eq!(s.player(), DVec2::new(2.0, 3.0));
        assert_eq!(s.distance(), 0.0);
        assert_eq!(v, Verdict::Success { distance: 0.0, award: 100 });
        assert_eq!(s.score, 100);
    }

    #[test]
    fn miss_leaves_score_alone() {
        let (mut s, _) = session(1);
        let v = s.set_coefficients(Coefficients::new(2.0, 2.4));
        assert!(!v.is_success());
        assert_eq!(s.score, 0);
    }

    #[test]
    fn repeated_success_awards_every_time() {
        let (mut s, _) = session(1);
        s.set_coefficients(Coefficients::new(2.0, 3.0));
        s.set_coefficients(Coefficients::new(2.0, 3.0));
        assert_eq!(s.score, 200);

        // leave the band and come back
        s.set_coefficients(Coefficients::new(1.0, 1.0));
        assert_eq!(s.score, 200);
        s.set_coefficients(Coefficients::new(2.1, 3.0));
        assert_eq!(s.score, 290);
    }

    #[test]
    fn coefficients_are_clamped() {
        let (mut s, _) = session(1);
        s.set_coefficients(Coefficients::new(9.0, -9.0));
        assert_eq!(s.coefficients(), Coefficients::new(5.0, -5.0));
        assert_eq!(s.player(), DVec2::new(5.0, -5.0));
    }

    #[test]
    fn reset_keeps_level_score_basis_target() {
        let (mut s, mut rng) = session(3);
        s.set_coefficients(Coefficients::new(2.0, 3.0));
        s.advance_level(&mut rng);
        s.set_coefficients(Coefficients::new(-3.0, 4.2));
        let before = s.clone();

        assert!(s.reset_level());
        assert_eq!(s.coefficients(), Coefficients::new(1.0, 1.0));
        assert_eq!(s.level, before.level);
        assert_eq!(s.score, before.score);
        assert_eq!(s.basis, before.basis);
        assert_eq!(s.target, before.target);
        assert_eq!(s.player(), s.basis.combine(Coefficients::new(1.0, 1.0)));
    }

    #[test]
    fn advance_walks_presets_then_random() {
        let (mut s, mut rng) = session(5);
        s.set_coefficients(Coefficients::new(2.0, 3.0));
        let score = s.score;

        s.advance_level(&mut rng);
        assert_eq!(s.level, 2);
        assert_eq!(s.target, DVec2::new(1.0, 3.0));
        s.advance_level(&mut rng);
        assert_eq!(s.level, 3);
        assert_eq!(s.target, DVec2::new(4.0, 2.0));

        for expected in 4..20 {
            s.set_coefficients(Coefficients::new(-2.0, 0.5));
            s.advance_level(&mut rng);
            assert_eq!(s.level, expected);
            assert_eq!(s.coefficients(), Coefficients::new(1.0, 1.0));
            assert!((s.basis.b1.length() - 2.0).abs() < 1e-9);
            assert!((s.basis.b2.length() - 2.0).abs() < 1e-9);
            assert_eq!(s.player(), s.basis.b1 + s.basis.b2);
        }
        assert!(s.score >= score);
    }

    fn on_target_at_default() -> Session {
        let def = LevelDef {
            target: DVec2::new(1.0, 1.0),
            basis: Basis::STANDARD,
            description: "default hits".into(),
        };
        Session::from_level(1, def, CoefficientRange::DEFAULT)
    }

    #[test]
    fn reset_onto_target_then_check_scores() {
        let mut s = on_target_at_default();
        s.set_coefficients(Coefficients::new(3.0, 3.0));
        assert_eq!(s.score, 0);

        assert!(s.reset_level());
        assert_eq!(s.score, 0);
        assert_eq!(s.distance(), 0.0);
        assert_eq!(s.check(), Verdict::Success { distance: 0.0, award: 100 });
        assert_eq!(s.score, 100);
    }

    #[test]
    fn reset_reports_no_movement_at_default() {
        let mut s = on_target_at_default();
        assert!(!s.reset_level());
        assert_eq!(s.score, 0);
    }

    #[test]
    fn advance_reports_movement() {
        let (mut s, mut rng) = session(1);
        assert!(!s.advance_level(&mut rng));
        assert_eq!(s.level, 2);

        s.set_coefficients(Coefficients::new(0.5, 2.5));
        assert!(s.advance_level(&mut rng));
        assert_eq!(s.level, 3);
        // level 3 default (1,1) -> player (3,3), target (4,2)
        assert!((s.distance() - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn hint_does_not_mutate() {
        let (mut s, mut rng) = session(11);
        s.advance_level(&mut rng);
        s.set_coefficients(Coefficients::new(0.3, -0.7));
        let before = s.clone();
        let c = s.hint().unwrap();
        assert_eq!(s, before);
        assert!((c.a1 - 2.0).abs() < 1e-9);
        assert!((c.a2 + 1.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_basis_hint_fails_but_play_continues() {
        let mut rng = Pcg32::seed_from_u64(1);
        let def = LevelDef {
            target: DVec2::new(2.0, 3.0),
            basis: Basis::new(DVec2::new(1.0, 1.0), DVec2::new(2.0, 2.0)),
            description: "degenerate".into(),
        };
        let mut s = Session::from_level(1, def, CoefficientRange::DEFAULT);
        assert_eq!(s.player(), DVec2::new(3.0, 3.0));
        assert_eq!(s.hint(), Err(HintError::NotRepresentable));
        s.set_coefficients(Coefficients::new(1.0, 0.0));
        assert_eq!(s.player(), DVec2::new(1.0, 1.0));
        s.advance_level(&mut rng);
        assert_eq!(s.level, 2);
    }

    proptest! {
        #[test]
        fn prop_player_tracks_coefficients(
            seed in any::<u64>(),
            advances in 0u32..8,
            a1 in -8.0f64..8.0,
            a2 in -8.0f64..8.0,
        ) {
            let (mut s, mut rng) = session(seed);
            for _ in 0..advances {
                s.advance_level(&mut rng);
            }
            let score = s.score;
            s.set_coefficients(Coefficients::new(a1, a2));
            let c = s.coefficients();
            prop_assert!(c.a1.abs() <= 5.0 && c.a2.abs() <= 5.0);
            prop_assert_eq!(s.player(), s.basis.combine(c));
            prop_assert!(s.score >= score);

            s.reset_level();
            prop_assert_eq!(s.coefficients(), Coefficients::DEFAULT);
            prop_assert_eq!(s.player(), s.basis.combine(Coefficients::DEFAULT));
        }
    }
}
