//! A glyph on screen, made of dots
//!
//! Lifecycle: `Live` (static dots) -> `Retired` (dots diffed against the
//! successor glyph; the rest fly off through physics) -> `Done` (every dot reaped).
//! A live digit never touches the physics world.

use glam::Vec2;

use super::context::SimContext;
use super::dot::{Dot, DotColor, DotFate, RenderMode};
use super::matrix::{Cell, DigitMatrix, Glyph, matrix_for};
use crate::cell_offset;
use crate::renderer::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitPhase {
    Live,
    Retired,
    Done,
}

/// Colors used for a digit's lit and unlit dots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub lit: DotColor,
    pub unlit: DotColor,
}

impl ColorScheme {
    pub fn new(lit: DotColor) -> Self {
        Self {
            lit,
            unlit: DotColor::Blank,
        }
    }
}

#[derive(Debug)]
pub struct Digit {
    matrix: DigitMatrix,
    origin: Vec2,
    scheme: ColorScheme,
    /// Row-major matrix order
    dots: Vec<Dot>,
    phase: DigitPhase,
    release_speed: f32,
    /// Whether the release pass (the only one that creates bodies) ran
    counted: bool,
    /// Dots currently counted against the global particle budget
    held: usize,
}

impl Digit {
    pub fn new(glyph: Glyph, origin: Vec2, scheme: ColorScheme) -> Self {
        Self::with_matrix(matrix_for(glyph), origin, scheme)
    }

    /// Build from an explicit matrix instead of the built-in font
    pub fn with_matrix(matrix: DigitMatrix, origin: Vec2, scheme: ColorScheme) -> Self {
        let dots = matrix
            .iter()
            .map(|(row, col, cell)| {
                let (mode, active) = match cell {
                    Cell::Lit => (RenderMode::Static, true),
                    Cell::Unlit => (RenderMode::Static, false),
                    Cell::Absent => (RenderMode::Hidden, false),
                };
                let color = if active { scheme.lit } else { scheme.unlit };
                Dot::new(origin + cell_offset(row, col), color, mode, active, (row, col))
            })
            .collect();

        Self {
            matrix,
            origin,
            scheme,
            dots,
            phase: DigitPhase::Live,
            release_speed: 0.0,
            counted: false,
            held: 0,
        }
    }

    pub fn glyph(&self) -> Glyph {
        self.matrix.glyph()
    }

    pub fn matrix(&self) -> &DigitMatrix {
        &self.matrix
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn scheme(&self) -> ColorScheme {
        self.scheme
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn phase(&self) -> DigitPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == DigitPhase::Done
    }

    pub fn release_speed(&self) -> f32 {
        self.release_speed
    }

    /// Dots this digit currently holds against the particle budget
    pub fn held_particles(&self) -> usize {
        self.held
    }

    /// Give up the slot to `successor`. Dots whose cell looks the same in both
    /// glyphs are removed at once; the rest become release candidates.
    /// Does nothing unless the digit is live.
    pub fn retire(&mut self, successor: &DigitMatrix, ctx: &mut SimContext, surface: &mut dyn Surface) {
        if self.phase != DigitPhase::Live {
            return;
        }
        self.phase = DigitPhase::Retired;
        self.release_speed = ctx.tuning.speed_for(self.glyph(), successor.glyph());

        let mut candidates = Vec::with_capacity(self.dots.len());
        for dot in std::mem::take(&mut self.dots) {
            let (row, col) = dot.cell();
            if self.matrix.is_release_candidate(row, col, successor) {
                candidates.push(dot);
            } else {
                dot.destroy(&mut ctx.physics, surface);
            }
        }
        self.dots = candidates;

        log::debug!(
            "Digit {} retiring into {} with {} candidates at speed {}",
            self.glyph(),
            successor.glyph(),
            self.dots.len(),
            self.release_speed
        );
    }

    pub fn render(&mut self, ctx: &mut SimContext, surface: &mut dyn Surface) {
        if self.phase == DigitPhase::Done {
            return;
        }
        if self.dots.is_empty() {
            self.finish(ctx);
            return;
        }

        match self.phase {
            DigitPhase::Live => {
                for dot in &mut self.dots {
                    dot.render_static(surface);
                }
            }
            DigitPhase::Retired => self.render_retired(ctx, surface),
            DigitPhase::Done => {}
        }
    }

    /// First retired pass: drop the placeholders and hand every active dot to
    /// physics. All of them count against the budget at once; an oversubscribed
    /// budget is brought back under its cap by the cull, oldest digits first.
    /// Runs once per digit.
    pub fn release_dots(&mut self, ctx: &mut SimContext, surface: &mut dyn Surface) {
        if self.phase != DigitPhase::Retired || self.counted {
            return;
        }
        self.counted = true;

        let mut released = Vec::with_capacity(self.dots.len());
        for mut dot in std::mem::take(&mut self.dots) {
            if dot.release_to_physics(&mut ctx.physics, self.release_speed, &mut ctx.rng) {
                released.push(dot);
            } else {
                dot.destroy(&mut ctx.physics, surface);
            }
        }
        self.held += released.len();
        ctx.budget.acquire(released.len());
        self.dots = released;

        log::debug!(
            "Digit {} released {} dots (budget {}/{})",
            self.glyph(),
            self.held,
            ctx.budget.count(),
            ctx.budget.threshold()
        );
    }

    fn render_retired(&mut self, ctx: &mut SimContext, surface: &mut dyn Surface) {
        self.release_dots(ctx, surface);

        let mut kept = Vec::with_capacity(self.dots.len());
        let mut culled = 0usize;
        for mut dot in std::mem::take(&mut self.dots) {
            match dot.render(ctx, surface) {
                DotFate::Kept => kept.push(dot),
                DotFate::Culled => {
                    dot.destroy(&mut ctx.physics, surface);
                    ctx.budget.release(1);
                    self.held -= 1;
                    culled += 1;
                }
            }
        }
        self.dots = kept;

        if culled > 0 {
            log::trace!("Digit {} culled {} dots", self.glyph(), culled);
        }
    }

    fn finish(&mut self, ctx: &mut SimContext) {
        ctx.budget.release(self.held);
        self.held = 0;
        self.phase = DigitPhase::Done;
        log::debug!("Digit {} done", self.glyph());
    }

    /// Destroy every dot and return any budget share; the digit ends `Done`
    pub fn teardown(&mut self, ctx: &mut SimContext, surface: &mut dyn Surface) {
        for dot in std::mem::take(&mut self.dots) {
            dot.destroy(&mut ctx.physics, surface);
        }
        self.finish(ctx);
    }
}
