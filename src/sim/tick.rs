//! Countdown tick
//!
//! One tick formats the remaining time, rebuilds the slots that changed,
//! advances physics one step and drives the retiring digits.

use super::digit::Digit;
use super::matrix::{DigitMatrix, Glyph};
use super::state::{CountdownPhase, CountdownState, Retiree};
use crate::consts::*;
use crate::error::CountdownError;
use crate::renderer::Surface;

/// What a tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Digits constructed this tick
    pub built: usize,
    /// Slots whose digit was kept as is
    pub reused: usize,
    /// Retiring digits still pending after the tick
    pub retiring: usize,
    /// Dots in flight after the tick
    pub particles: usize,
}

/// `DDD:HH:MM:SS` for the remaining time, zero-padded to `day_digits` days.
/// Past the target reads all zeros; beyond what the days field can show
/// reads all nines.
pub fn format_remaining(remaining_ms: f64, day_digits: usize) -> String {
    let total = if remaining_ms.is_finite() && remaining_ms > 0.0 {
        (remaining_ms / 1000.0).floor() as u64
    } else {
        0
    };
    let max_days = 10u64.saturating_pow(day_digits as u32) - 1;

    let (days, hours, minutes, seconds) = if total / 86_400 > max_days {
        (max_days, 23, 59, 59)
    } else {
        (total / 86_400, total / 3600 % 24, total / 60 % 60, total % 60)
    };
    format!("{days:0day_digits$}:{hours:02}:{minutes:02}:{seconds:02}")
}

/// Glyphs shown for the remaining time
pub fn glyph_sequence(remaining_ms: f64, day_digits: usize) -> Result<Vec<Glyph>, CountdownError> {
    format_remaining(remaining_ms, day_digits)
        .chars()
        .map(Glyph::from_char)
        .collect()
}

/// Advance the countdown to `now_ms`
pub fn tick(state: &mut CountdownState, now_ms: f64, surface: &mut dyn Surface) -> TickSummary {
    let text = format_remaining(
        state.settings.target_timestamp_ms - now_ms,
        state.settings.day_digits,
    );
    tick_sequence(state, &text, surface)
}

/// Advance the countdown showing `text`, one glyph per slot
pub fn tick_sequence(state: &mut CountdownState, text: &str, surface: &mut dyn Surface) -> TickSummary {
    if state.phase == CountdownPhase::TornDown {
        log::debug!("Tick ignored after teardown");
        return TickSummary::default();
    }
    state.time_ticks += 1;

    let mut summary = TickSummary::default();
    let mut previous: Vec<Option<Digit>> = std::mem::take(&mut state.slots);
    let mut current: Vec<Option<Digit>> = Vec::with_capacity(text.len());
    let mut cursor = state.settings.origin;

    for (slot, c) in text.chars().enumerate() {
        let old = previous.get_mut(slot).and_then(Option::take);

        let glyph = match Glyph::from_char(c) {
            Ok(glyph) => glyph,
            Err(e) => {
                // The slot keeps whatever it showed before
                log::error!("Slot {}: {}", slot, e);
                cursor.x += old.as_ref().map_or(DIGIT_ADVANCE, |d| d.glyph().advance());
                current.push(old);
                continue;
            }
        };

        match old {
            Some(digit) if digit.glyph() == glyph => {
                summary.reused += 1;
                current.push(Some(digit));
            }
            old => {
                let scheme = state.next_scheme();
                let mut digit = Digit::new(glyph, cursor, scheme);
                digit.render(&mut state.ctx, surface);
                if let Some(old) = old {
                    state.retiring.push(Retiree {
                        successor: *digit.matrix(),
                        digit: old,
                    });
                }
                state.digits_built += 1;
                summary.built += 1;
                current.push(Some(digit));
            }
        }
        cursor.x += glyph.advance();
    }

    // Slots past the end of the new text fade into nothing
    for old in previous.into_iter().flatten() {
        let successor = DigitMatrix::blank(old.glyph());
        state.retiring.push(Retiree { digit: old, successor });
    }
    state.slots = current;

    let dt = state.step_dt();
    state.ctx.physics.step(dt, SOLVER_ITERATIONS);

    // Release everything first so the cull below purges the oldest particles
    for retiree in &mut state.retiring {
        retiree.digit.retire(&retiree.successor, &mut state.ctx, surface);
        retiree.digit.release_dots(&mut state.ctx, surface);
    }

    let mut pending = Vec::with_capacity(state.retiring.len());
    for mut retiree in std::mem::take(&mut state.retiring) {
        retiree.digit.render(&mut state.ctx, surface);
        if !retiree.digit.is_done() {
            pending.push(retiree);
        }
    }
    state.retiring = pending;

    summary.retiring = state.retiring.len();
    summary.particles = state.particles();
    if summary.built > 0 {
        log::trace!(
            "Tick {}: {:?} (bodies {})",
            state.time_ticks,
            summary,
            state.ctx.physics.body_count()
        );
    }
    summary
}
