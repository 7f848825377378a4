//! Countdown simulation
//!
//! Everything that decides what is on screen lives here:
//! - Glyph matrices and the cell diff between two glyphs
//! - Dots, digits and their lifecycle
//! - The rigid-body world released dots fall through
//! - The scheduler tick
//!
//! Rendering goes through the `Surface` trait only; time comes in as a plain
//! timestamp, and all randomness flows from the seeded RNG in `SimContext`.

pub mod budget;
pub mod context;
pub mod digit;
pub mod dot;
pub mod matrix;
pub mod physics;
pub mod state;
pub mod tick;

pub use budget::ParticleBudget;
pub use context::{CullBounds, ReleaseTuning, SimContext};
pub use digit::{ColorScheme, Digit, DigitPhase};
pub use dot::{Dot, DotColor, DotFate, RenderMode};
pub use matrix::{Cell, DigitMatrix, Glyph, matrix_for};
pub use physics::{BodyHandle, PhysicsWorld, WorldBounds};
pub use state::{CountdownPhase, CountdownState, Retiree};
pub use tick::{TickSummary, format_remaining, glyph_sequence, tick, tick_sequence};
