/// Events emitted while processing one input action.
/// The presentation layer consumes these for the banner and hint box.

use crate::domain::combination::Coefficients;

#[derive(Clone, Debug, PartialEq)]
#[allow(dead_code)]
pub enum SessionEvent {
    CombinationChanged { distance: f64 },
    Success { distance: f64, award: u32 },
    LevelAdvanced { level: u32 },
    LevelReset,
    HintReady(Coefficients),
    HintUnavailable,
}
