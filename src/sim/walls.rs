//! Procedural ring generation
//!
//! A ring blocks every segment except its gaps. Gaps avoid sitting next to
//! each other so the open path stays reachable; the search gives up on that
//! rule after `max_gap_attempts` samples and may then emit an adjacent pair.

use rand::Rng;

use super::state::Wall;
use crate::consts::SEGMENTS;
use crate::tuning::Tuning;

/// Number of open segments for a ring spawned at `elapsed` seconds
pub fn gap_count<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning, elapsed: f32) -> usize {
    let (min, max) = tuning.gap_range(elapsed);
    rng.random_range(min..=max)
}

/// True if `candidate` is already a gap or touches one
fn is_blocked(gaps: &[u8], candidate: u8) -> bool {
    gaps.iter().any(|&gap| {
        gap == candidate
            || (candidate + 1) % SEGMENTS == gap
            || (candidate + SEGMENTS - 1) % SEGMENTS == gap
    })
}

/// Pick up to `num_gaps` distinct gap segments
///
/// Always returns at least one gap. A gap is dropped (not retried) when the
/// last sample after the attempt limit is a duplicate.
pub fn choose_gaps<R: Rng + ?Sized>(rng: &mut R, num_gaps: usize, max_attempts: u32) -> Vec<u8> {
    let mut gaps = Vec::with_capacity(num_gaps.max(1));
    gaps.push(rng.random_range(0..SEGMENTS));

    for _ in 1..num_gaps {
        let mut attempts = 0;
        let position = loop {
            let candidate = rng.random_range(0..SEGMENTS);
            attempts += 1;
            if attempts > max_attempts || !is_blocked(&gaps, candidate) {
                break candidate;
            }
        };

        if !gaps.contains(&position) {
            gaps.push(position);
        }
    }

    gaps
}

/// Build the walls for one ring: every non-gap segment, in segment order
pub fn generate_ring<R: Rng + ?Sized>(
    rng: &mut R,
    tuning: &Tuning,
    elapsed: f32,
    color: u8,
) -> Vec<Wall> {
    let num_gaps = gap_count(rng, tuning, elapsed);
    let gaps = choose_gaps(rng, num_gaps, tuning.max_gap_attempts);

    (0..SEGMENTS)
        .filter(|segment| !gaps.contains(segment))
        .map(|segment| Wall {
            segment,
            radius: tuning.spawn_radius,
            color,
        })
        .collect()
}
