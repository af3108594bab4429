/// Linear combinations: basis pairs, coefficient pairs, and the evaluator.
///
/// Pure value types — no session state lives here.
///
///   player = a1 * b1 + a2 * b2
///
/// Coefficients are always finite and bounded by a `CoefficientRange`,
/// which doubles as the slider model (bounds + step granularity).

use glam::DVec2;

/// Value both coefficients return to on level start and reset.
pub const DEFAULT_COEFFICIENT: f64 = 1.0;

/// Ordered pair of basis vectors. Linear independence is NOT required.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Basis {
    pub b1: DVec2,
    pub b2: DVec2,
}

impl Basis {
    pub const STANDARD: Basis = Basis { b1: DVec2::X, b2: DVec2::Y };

    pub fn new(b1: DVec2, b2: DVec2) -> Self {
        Basis { b1, b2 }
    }

    /// The basis vector for a given slot.
    pub fn vector(&self, slot: Slot) -> DVec2 {
        match slot {
            Slot::First => self.b1,
            Slot::Second => self.b2,
        }
    }

    /// a1 * b1 + a2 * b2.
    #[inline]
    pub fn combine(&self, c: Coefficients) -> DVec2 {
        c.a1 * self.b1 + c.a2 * self.b2
    }

    /// The two scaled components (a1 * b1, a2 * b2), drawn as the
    /// parallelogram sides.
    #[inline]
    pub fn components(&self, c: Coefficients) -> (DVec2, DVec2) {
        (c.a1 * self.b1, c.a2 * self.b2)
    }
}

/// Which of the two coefficients / basis vectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    First,
    Second,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coefficients {
    pub a1: f64,
    pub a2: f64,
}

impl Coefficients {
    pub const DEFAULT: Coefficients = Coefficients {
        a1: DEFAULT_COEFFICIENT,
        a2: DEFAULT_COEFFICIENT,
    };

    pub fn new(a1: f64, a2: f64) -> Self {
        Coefficients { a1, a2 }
    }

    pub fn get(&self, slot: Slot) -> f64 {
        match slot {
            Slot::First => self.a1,
            Slot::Second => self.a2,
        }
    }

    pub fn with(self, slot: Slot, value: f64) -> Self {
        match slot {
            Slot::First => Coefficients { a1: value, ..self },
            Slot::Second => Coefficients { a2: value, ..self },
        }
    }
}

impl Default for Coefficients {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Bounds and step of a coefficient input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoefficientRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl CoefficientRange {
    pub const DEFAULT: CoefficientRange = CoefficientRange { min: -5.0, max: 5.0, step: 0.1 };

    /// Bound a single value. NaN maps to 0 before clamping.
    pub fn clamp(&self, v: f64) -> f64 {
        let v = if v.is_nan() { 0.0 } else { v };
        v.clamp(self.min, self.max)
    }

    /// Bound both coefficients independently.
    pub fn clamp_pair(&self, c: Coefficients) -> Coefficients {
        Coefficients::new(self.clamp(c.a1), self.clamp(c.a2))
    }

    /// Snap to the nearest multiple of `step`, then bound.
    pub fn snap(&self, v: f64) -> f64 {
        if self.step <= 0.0 || !v.is_finite() {
            return self.clamp(v);
        }
        let snapped = (v / self.step).round() * self.step;
        // multiples of 0.1 are not exact in binary; trim the noise
        self.clamp((snapped * 1e9).round() / 1e9)
    }

    /// Move a value by `steps` increments, landing on the step grid.
    pub fn nudge(&self, v: f64, steps: i32) -> f64 {
        self.snap(v + steps as f64 * self.step)
    }

    /// Position of `v` within the range as 0.0..=1.0 (for gauges).
    pub fn fraction(&self, v: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((self.clamp(v) - self.min) / span).clamp(0.0, 1.0)
    }
}

impl Default for CoefficientRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn standard_basis_reproduces_coefficients() {
        let p = Basis::STANDARD.combine(Coefficients::new(2.0, 3.0));
        assert_eq!(p, DVec2::new(2.0, 3.0));
    }

    #[test]
    fn components_sum_to_combination() {
        let basis = Basis::new(DVec2::new(2.0, 1.0), DVec2::new(1.0, 2.0));
        let c = Coefficients::new(-1.5, 0.5);
        let (s1, s2) = basis.components(c);
        assert_eq!(s1 + s2, basis.combine(c));
    }

    #[test]
    fn degenerate_basis_still_combines() {
        let basis = Basis::new(DVec2::new(1.0, 1.0), DVec2::new(2.0, 2.0));
        let p = basis.combine(Coefficients::new(1.0, 1.0));
        assert_eq!(p, DVec2::new(3.0, 3.0));
    }

    #[test]
    fn clamp_bounds_each_coefficient() {
        let r = CoefficientRange::DEFAULT;
        let c = r.clamp_pair(Coefficients::new(7.5, -12.0));
        assert_eq!(c, Coefficients::new(5.0, -5.0));
        assert_eq!(r.clamp(f64::NAN), 0.0);
        assert_eq!(r.clamp(f64::INFINITY), 5.0);
    }

    #[test]
    fn nudge_lands_on_grid() {
        let r = CoefficientRange::DEFAULT;
        let mut v = 1.0;
        for _ in 0..10 {
            v = r.nudge(v, 1);
        }
        assert_eq!(v, 2.0);
        for _ in 0..13 {
            v = r.nudge(v, -1);
        }
        assert!((v - 0.7).abs() < 1e-12);
    }

    #[test]
    fn nudge_stops_at_bounds() {
        let r = CoefficientRange::DEFAULT;
        assert_eq!(r.nudge(4.95, 10), 5.0);
        assert_eq!(r.nudge(-5.0, -1), -5.0);
    }

    #[test]
    fn fraction_maps_range() {
        let r = CoefficientRange::DEFAULT;
        assert_eq!(r.fraction(-5.0), 0.0);
        assert_eq!(r.fraction(0.0), 0.5);
        assert_eq!(r.fraction(5.0), 1.0);
    }

    #[test]
    fn slot_accessors() {
        let c = Coefficients::DEFAULT.with(Slot::Second, -2.0);
        assert_eq!(c.get(Slot::First), 1.0);
        assert_eq!(c.get(Slot::Second), -2.0);
        assert_eq!(Basis::STANDARD.vector(Slot::Second), DVec2::Y);
    }

    proptest! {
        #[test]
        fn prop_combine_is_componentwise(
            a1 in -5.0f64..=5.0, a2 in -5.0f64..=5.0,
            x1 in -10.0f64..10.0, y1 in -10.0f64..10.0,
            x2 in -10.0f64..10.0, y2 in -10.0f64..10.0,
        ) {
            let basis = Basis::new(DVec2::new(x1, y1), DVec2::new(x2, y2));
            let p = basis.combine(Coefficients::new(a1, a2));
            prop_assert!((p.x - (a1 * x1 + a2 * x2)).abs() < 1e-9);
            prop_assert!((p.y - (a1 * y1 + a2 * y2)).abs() < 1e-9);
        }

        #[test]
        fn prop_clamp_stays_in_range(v in proptest::num::f64::ANY) {
            let r = CoefficientRange::DEFAULT;
            let c = r.clamp(v);
            prop_assert!(c.is_finite());
            prop_assert!((r.min..=r.max).contains(&c));
        }
    }
}
