//! Per-agent pseudo-random wiggle.
//!
//! Each agent carries a `u64` state. Drawing a value seeds a ChaCha8
//! generator from that state, takes one `f32` in `[0, 1)`, and replaces
//! the state with the generator's next `u64`. Agents with equal states
//! therefore draw equal sequences.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// State given to every agent when per-agent seeding is disabled.
pub const FIXED_AGENT_STATE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Draw one value in `[0, 1)` and advance `state`.
pub fn next_unit(state: &mut u64) -> f32 {
    let mut rng = ChaCha8Rng::seed_from_u64(*state);
    let value: f32 = rng.random();
    *state = rng.next_u64();
    value
}
