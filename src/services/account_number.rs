//! Account number generation.
//!
//! An account number is 5 uppercase letters and 4 digits, drawn uniformly and
//! then shuffled into a random order (`26^5 * 10^4` possible values). Draws
//! that collide with an existing number are retried a bounded number of times.

use rand::{Rng, seq::SliceRandom};

use crate::error::AppError;

pub const LETTERS: usize = 5;
pub const DIGITS: usize = 4;
pub const LEN: usize = LETTERS + DIGITS;

/// Outcome of a single draw against the set of taken numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draw {
    Generated(String),
    CollisionRetry { attempt: u32, number: String },
}

/// Draw one candidate number. Uniqueness is not checked here.
pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut chars = Vec::with_capacity(LEN);
    for _ in 0..LETTERS {
        chars.push(char::from(rng.random_range(b'A'..=b'Z')));
    }
    for _ in 0..DIGITS {
        chars.push(char::from(rng.random_range(b'0'..=b'9')));
    }
    chars.shuffle(rng);
    chars.into_iter().collect()
}

/// Draw one candidate and classify it against the numbers already `taken`.
pub fn attempt<R, F>(rng: &mut R, attempt: u32, taken: F) -> Draw
where
    R: Rng + ?Sized,
    F: Fn(&str) -> bool,
{
    let number = draw(rng);
    if taken(&number) {
        Draw::CollisionRetry { attempt, number }
    } else {
        Draw::Generated(number)
    }
}

/// Draw until a number not reported by `taken` turns up.
///
/// # Errors
///
/// `AccountNumbersExhausted` once `max_attempts` draws have all collided.
pub fn generate_unique<R, F>(rng: &mut R, max_attempts: u32, taken: F) -> Result<String, AppError>
where
    R: Rng + ?Sized,
    F: Fn(&str) -> bool,
{
    for n in 1..=max_attempts {
        match attempt(rng, n, &taken) {
            Draw::Generated(number) => return Ok(number),
            Draw::CollisionRetry { attempt, number } => {
                tracing::warn!(attempt, %number, "account number collision, drawing again");
            }
        }
    }

    Err(AppError::AccountNumbersExhausted {
        attempts: max_attempts,
    })
}

/// True for 9 characters made of exactly 5 uppercase ASCII letters and 4 ASCII digits.
pub fn is_well_formed(number: &str) -> bool {
    number.len() == LEN
        && number.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        && number.bytes().filter(u8::is_ascii_digit).count() == DIGITS
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashSet;

    #[test]
    fn draws_are_well_formed() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let number = draw(&mut rng);
            assert!(is_well_formed(&number), "{number}");
        }
    }

    #[test]
    fn draws_vary_letter_positions() {
        let mut rng = StdRng::seed_from_u64(11);
        let patterns: HashSet<Vec<bool>> = (0..200)
            .map(|_| draw(&mut rng).bytes().map(|b| b.is_ascii_digit()).collect())
            .collect();
        assert!(patterns.len() > 1);
    }

    #[test]
    fn retries_past_a_collision() {
        let seeded = StdRng::seed_from_u64(42);
        let first = draw(&mut seeded.clone());

        let mut rng = seeded;
        let number = generate_unique(&mut rng, 4, |candidate| candidate == first).unwrap();

        assert_ne!(number, first);
        assert!(is_well_formed(&number));
    }

    #[test]
    fn attempt_tags_collisions() {
        let seeded = StdRng::seed_from_u64(5);
        let first = draw(&mut seeded.clone());

        let outcome = attempt(&mut seeded.clone(), 3, |candidate| candidate == first);
        assert_eq!(outcome, Draw::CollisionRetry { attempt: 3, number: first.clone() });

        let outcome = attempt(&mut seeded.clone(), 1, |_| false);
        assert_eq!(outcome, Draw::Generated(first));
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate_unique(&mut rng, 3, |_| true).unwrap_err();

        assert!(matches!(err, AppError::AccountNumbersExhausted { attempts: 3 }));
    }

    #[test]
    fn well_formed_check() {
        assert!(is_well_formed("AB1CD2E34"));
        assert!(!is_well_formed("AB1CD2E3"));
        assert!(!is_well_formed("ABCDEF123"));
        assert!(!is_well_formed("ab1cd2e34"));
        assert!(!is_well_formed("AB1CD2E3-"));
    }
}
