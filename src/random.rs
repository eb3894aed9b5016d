use rand::{Rng, SeedableRng, rngs::{StdRng, ThreadRng}};


/// Produces uniformly distributed integers for the dice of a tree.
///
/// Implement this to script rolls in tests or to plug in another generator.
pub trait RandomSource {
    /// Returns an integer in `min..=max`. Callers guarantee `min <= max`.
    fn between(&mut self, min: i64, max: i64) -> i64;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn between(&mut self, min: i64, max: i64) -> i64 {
        (**self).between(min, max)
    }
}

impl<S: RandomSource + ?Sized> RandomSource for Box<S> {
    fn between(&mut self, min: i64, max: i64) -> i64 {
        (**self).between(min, max)
    }
}


/// A [`RandomSource`] backed by any [`rand::Rng`].
///
/// # Examples
/// ```
/// use dice_cup::{RandomSource, RngSource};
///
/// let mut first = RngSource::seeded(42);
/// let mut second = RngSource::seeded(42);
/// assert_eq!(first.between(1, 100), second.between(1, 100));
/// ```
#[derive(Debug, Clone)]
pub struct RngSource<R>(R);

impl<R: Rng> RngSource<R> {
    /// Wraps an existing generator.
    pub fn new(rng: R) -> Self {
        Self(rng)
    }

    /// Gives access to the wrapped generator.
    pub fn rng(&mut self) -> &mut R {
        &mut self.0
    }
}

impl RngSource<ThreadRng> {
    /// Uses the lazily initialized thread local generator of `rand`.
    pub fn thread() -> Self {
        Self(rand::rng())
    }
}

impl RngSource<StdRng> {
    /// A deterministic generator, identical seeds produce identical rolls.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn between(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }

        self.0.random_range(min..=max)
    }
}
