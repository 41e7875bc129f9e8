//! Tiered arithmetic problem generation.
//!
//! Problems are tiered by level and always have single-digit answers in
//! [1, 9], matching the keypad. Generation is pure apart from drawing from
//! the caller's RNG.

use rand::Rng;

use crate::consts::PROBLEM_RETRY_CAP;

/// A displayed arithmetic challenge and its expected answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub text: String,
    pub answer: u8,
}

/// Generate a problem for the given level.
///
/// - Level < 3: addition, `a + (r-a) = r` with `r` in [2, 6]
/// - Level < 6: subtraction, `a - (a-r) = r` with `r` in [1, 9]
/// - Level >= 6: `a*b - c`, resampled until the result lands in (0, 10);
///   capped resampling falls back to an addition problem
pub fn generate(level: u32, rng: &mut impl Rng) -> Problem {
    match level {
        0..3 => {
            let r = rng.random_range(2..=6u8);
            let a = rng.random_range(1..r);
            addition(r, a)
        }
        3..6 => {
            let r = rng.random_range(1..=8u8);
            let a = rng.random_range(r + 1..=9);
            subtraction(a, r)
        }
        _ => {
            for _ in 0..PROBLEM_RETRY_CAP {
                let a = rng.random_range(2..=5i32);
                let b = rng.random_range(1..=4i32);
                let c = rng.random_range(1..=5i32);
                let r = a * b - c;
                if r > 0 && r < 10 {
                    return Problem {
                        text: format!("{a} × {b} - {c}"),
                        answer: r as u8,
                    };
                }
            }
            // Ranges would have to be misconfigured to get here
            log::warn!("problem resample cap hit at level {level}, falling back");
            let r = rng.random_range(2..=6u8);
            let a = rng.random_range(1..r);
            addition(r, a)
        }
    }
}

/// `a + (r-a) = r`, the tier-1 shape
fn addition(r: u8, a: u8) -> Problem {
    Problem {
        text: format!("{} + {}", a, r - a),
        answer: r,
    }
}

/// `a - (a-r) = r`, the tier-2 shape
fn subtraction(a: u8, r: u8) -> Problem {
    Problem {
        text: format!("{} - {}", a, a - r),
        answer: r,
    }
}
