/// The step function: processes one input action to completion.
///
/// Processing order for coefficient actions:
///   1. Clamp the new coefficients (nudges land on the step grid first)
///   2. Recompute the player vector
///   3. Success check (may award score)
///   4. Emit events for the presentation layer
///
/// Next Level and Reset put the coefficients back to (1, 1); when that
/// moves them, steps 2-4 follow the transition event. Hints never touch
/// the session at all.

use rand::Rng;

use crate::domain::combination::{Coefficients, Slot};
use crate::domain::rules::Verdict;
use super::event::SessionEvent;
use super::level;
use super::session::Session;

/// Everything the presentation layer can ask of a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    SetCoefficients(Coefficients),
    /// Move one coefficient by `steps` slider increments.
    Nudge { slot: Slot, steps: i32 },
    NextLevel,
    Reset,
    Hint,
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn apply<R: Rng + ?Sized>(session: &mut Session, action: Action, rng: &mut R) -> Vec<SessionEvent> {
    let mut events: Vec<SessionEvent> = Vec::new();

    match action {
        Action::SetCoefficients(c) => {
            let verdict = session.set_coefficients(c);
            report(session, verdict, &mut events);
        }
        Action::Nudge { slot, steps } => {
            let current = session.coefficients();
            let value = session.range().nudge(current.get(slot), steps);
            // pinned at a bound: the slider did not move
            if value == current.get(slot) {
                return events;
            }
            let verdict = session.set_coefficients(current.with(slot, value));
            report(session, verdict, &mut events);
        }
        Action::NextLevel => {
            let moved = session.advance_level(rng);
            log::info!(
                "level {} ({}) target=({:.2}, {:.2})",
                session.level(),
                if level::is_preset(session.level()) { "preset" } else { "random" },
                session.target().x,
                session.target().y,
            );
            events.push(SessionEvent::LevelAdvanced { level: session.level() });
            if moved {
                let verdict = session.check();
                report(session, verdict, &mut events);
            }
        }
        Action::Reset => {
            let moved = session.reset_level();
            events.push(SessionEvent::LevelReset);
            if moved {
                let verdict = session.check();
                report(session, verdict, &mut events);
            }
        }
        Action::Hint => match session.hint() {
            Ok(c) => {
                log::debug!("hint for level {}: ({:.3}, {:.3})", session.level(), c.a1, c.a2);
                events.push(SessionEvent::HintReady(c));
            }
            Err(e) => {
                log::debug!("hint for level {}: {}", session.level(), e);
                events.push(SessionEvent::HintUnavailable);
            }
        },
    }

    events
}

// ══════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════

fn report(session: &Session, verdict: Verdict, events: &mut Vec<SessionEvent>) {
    let distance = verdict.distance();
    events.push(SessionEvent::CombinationChanged { distance });
    if verdict.is_success() {
        let award = verdict.award();
        log::debug!(
            "match on level {} at distance {:.3}: +{} (score {})",
            session.level(),
            distance,
            award,
            session.score(),
        );
        events.push(SessionEvent::Success { distance, award });
    }
}
