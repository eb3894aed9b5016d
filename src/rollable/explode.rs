use std::fmt::Display;
use crate::{Context, Error, Method, Pool, Rollable, Roller};
use super::modified_notation;
use super::pool::{join, sum};


/// Comparison deciding whether an exploding member rolls again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Comparator {
    /// Rolls again while the result equals the threshold.
    Equals,
    /// Rolls again while the result is above the threshold.
    GreaterThan,
    /// Rolls again while the result is below the threshold.
    LessThan
}

impl Comparator {
    /// Returns `true` if `value` triggers another roll.
    pub fn compare(&self, value: i64, threshold: i64) -> bool {
        match self {
            Comparator::Equals => value == threshold,
            Comparator::GreaterThan => value > threshold,
            Comparator::LessThan => value < threshold
        }
    }

    /// Threshold used when none is given: the maximum for `=`, and the value
    /// next to the maximum or minimum for `>` and `<`.
    ///
    /// On a two-valued member the `>` and `<` defaults land on the minimum and
    /// the maximum, so `D2!>` and `D2!<` never stop and are rejected.
    fn default_threshold(&self, min: i64, max: i64) -> i64 {
        match self {
            Comparator::Equals => max,
            Comparator::GreaterThan => max.saturating_sub(1),
            Comparator::LessThan => min.saturating_add(1)
        }
    }

    /// Whether rolling a member bounded by `min..=max` against `threshold`
    /// is certain to go on forever.
    fn never_stops(&self, min: i64, max: i64, threshold: i64) -> bool {
        match self {
            Comparator::Equals => min == max && threshold == max,
            Comparator::GreaterThan => threshold <= min,
            Comparator::LessThan => threshold >= max
        }
    }

    /// Whether a negative result can trigger another roll, making the
    /// accumulated total unbounded below.
    fn rerolls_negative(&self, min: i64, threshold: i64) -> bool {
        if min >= 0 {
            return false;
        }

        match self {
            Comparator::Equals => threshold < 0 && threshold >= min,
            Comparator::GreaterThan => threshold < -1,
            Comparator::LessThan => min < threshold
        }
    }
}

impl Display for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Comparator::Equals => write!(f, "="),
            Comparator::GreaterThan => write!(f, ">"),
            Comparator::LessThan => write!(f, "<")
        }
    }
}


/// Rolls every member of a pool again, adding up the results, for as long as
/// the last result satisfies the comparison.
///
/// The maximum is unbounded and reported as [`i64::MAX`]. The minimum is the
/// pool's minimum, a single roll per member, unless a negative result can
/// trigger another roll.
///
/// # Examples
/// ```
/// use dice_cup::{Comparator, Die, Error, Explode, Pool, Rollable};
///
/// let explode = Explode::new(Pool::repeat(Die::sided(3).unwrap(), 2), Comparator::Equals, None).unwrap();
/// let rollable = Rollable::from(explode);
///
/// assert_eq!(rollable.notation(), "2D3!");
/// assert_eq!((rollable.minimum(), rollable.maximum()), (2, i64::MAX));
///
/// // every roll of a d6 is above 0
/// let endless = Explode::new(Die::sided(6).unwrap(), Comparator::GreaterThan, Some(0));
/// assert!(matches!(endless, Err(Error::InfiniteLoop(_))));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Explode {
    pool: Pool,
    comparator: Comparator,
    threshold: Option<i64>,
    // (threshold, minimum) per member of the pool
    limits: Vec<(i64, i64)>
}

impl Explode {
    /// Explodes the members of `rollable`, a rollable that is not a pool
    /// becomes a pool of one.
    ///
    /// Without a `threshold` each member uses a default derived from its own
    /// bounds, see [`Comparator`].
    ///
    /// # Errors
    /// Returns [`Error::InfiniteLoop`] if any member would be certain to roll
    /// again forever.
    pub fn new(rollable: impl Into<Rollable>, comparator: Comparator, threshold: Option<i64>) -> Result<Self, Error> {
        let pool = Pool::from(rollable.into());
        let mut limits = Vec::with_capacity(pool.len());

        for rollable in &pool {
            let min = rollable.minimum();
            let max = rollable.maximum();
            let limit = threshold.unwrap_or_else(|| comparator.default_threshold(min, max));

            if comparator.never_stops(min, max, limit) {
                return Err(Error::InfiniteLoop(format!("{rollable}!{comparator}{limit}")));
            }

            limits.push((limit, min));
        }

        Ok(Self { pool, comparator, threshold, limits })
    }

    /// The wrapped pool.
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// The comparison triggering another roll.
    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    /// The explicit threshold, if one was given.
    pub fn threshold(&self) -> Option<i64> {
        self.threshold
    }

    pub(crate) fn evaluate(&self, method: Method, roller: &mut Roller<'_>, context: &mut Context) -> (i64, String) {
        match method {
            Method::Maximum => (i64::MAX, i64::MAX.to_string()),
            Method::Minimum => self.minimum(roller),
            Method::Roll => self.roll(roller, context)
        }
    }

    fn minimum(&self, roller: &mut Roller<'_>) -> (i64, String) {
        let unbounded = self.limits.iter()
            .any(|&(limit, min)| self.comparator.rerolls_negative(min, limit));

        if unbounded {
            return (i64::MIN, i64::MIN.to_string());
        }

        self.pool.evaluate(Method::Minimum, roller)
    }

    fn roll(&self, roller: &mut Roller<'_>, context: &mut Context) -> (i64, String) {
        let mut totals = Vec::with_capacity(self.pool.len());
        let mut chains = Vec::with_capacity(self.pool.len());
        let mut rerolls = 0usize;

        for (rollable, &(limit, _)) in self.pool.iter().zip(&self.limits) {
            let mut total = 0i64;
            let mut chain = Vec::new();

            loop {
                let toss = rollable.evaluate(Method::Roll, roller);
                total = total.saturating_add(toss.value());
                chain.push(toss.grouped_operation());

                if !self.comparator.compare(toss.value(), limit) {
                    break;
                }

                rerolls += 1;
            }

            totals.push(total);
            chains.push(match chain.len() {
                1 => chain.join(""),
                _ => format!("({})", chain.join(" + "))
            });
        }

        context.insert("rerolls", rerolls.to_string());
        (sum(totals.into_iter()), join(chains.into_iter()))
    }
}

impl Display for Explode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}!", modified_notation(&self.pool))?;

        match (self.comparator, self.threshold) {
            (Comparator::Equals, None) => Ok(()),
            (comparator, None) => write!(f, "{comparator}"),
            (comparator, Some(threshold)) => write!(f, "{comparator}{threshold}")
        }
    }
}


#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use super::*;
    use crate::Die;
    use crate::rollable_test_strategies::{Scripted, comparator_strategy};


    fn sided(sides: i64) -> Die {
        Die::sided(sides).unwrap()
    }

    proptest! {
        #[test]
        fn test_greater_than_validation(sides in 2i64..20, threshold in -5i64..25) {
            let result = Explode::new(sided(sides), Comparator::GreaterThan, Some(threshold));

            if threshold <= 1 {
                prop_assert!(matches!(result, Err(Error::InfiniteLoop(_))));
            } else {
                prop_assert!(result.is_ok());
            }
        }

        #[test]
        fn test_less_than_validation(sides in 2i64..20, threshold in -5i64..25) {
            let result = Explode::new(sided(sides), Comparator::LessThan, Some(threshold));

            if threshold >= sides {
                prop_assert!(matches!(result, Err(Error::InfiniteLoop(_))));
            } else {
                prop_assert!(result.is_ok());
            }
        }

        #[test]
        fn test_default_thresholds_terminate(sides in 3i64..20, comparator in comparator_strategy(), seed: u64) {
            let rollable: Rollable = Explode::new(Pool::repeat(sided(sides), 3), comparator, None).unwrap().into();
            let mut roller = Roller::builder().seed(seed).build();

            prop_assert_eq!(roller.minimum(&rollable), 3);
            prop_assert_eq!(roller.maximum(&rollable), i64::MAX);
            prop_assert!(roller.roll(&rollable).value() >= 3);
        }
    }

    #[test]
    fn test_equals_validation() {
        let constant = Die::custom(vec![2, 2]).unwrap();

        assert!(matches!(Explode::new(constant.clone(), Comparator::Equals, None), Err(Error::InfiniteLoop(_))));
        assert!(Explode::new(constant, Comparator::Equals, Some(3)).is_ok());
        assert!(Explode::new(sided(2), Comparator::Equals, None).is_ok());
    }

    #[test]
    fn test_two_sided_defaults() {
        let d2 = Pool::repeat(sided(2), 2);

        assert!(Explode::new(d2.clone(), Comparator::Equals, None).is_ok());
        assert!(matches!(Explode::new(d2.clone(), Comparator::GreaterThan, None), Err(Error::InfiniteLoop(_))));
        assert!(matches!(Explode::new(d2, Comparator::LessThan, None), Err(Error::InfiniteLoop(_))));
    }

    #[test]
    fn test_bounds() {
        let rollable: Rollable = Explode::new(Pool::repeat(sided(3), 2), Comparator::Equals, None).unwrap().into();

        assert_eq!(rollable.minimum(), 2);
        assert_eq!(rollable.maximum(), i64::MAX);
    }

    #[test]
    fn test_roll_accumulates() {
        let rollable: Rollable = Explode::new(Pool::repeat(sided(6), 2), Comparator::Equals, None).unwrap().into();

        let toss = Roller::builder()
            .random_source(Scripted::new([6, 6, 2, 4]))
            .build()
            .roll(&rollable);

        assert_eq!(toss.value(), 18);
        assert_eq!(toss.operation(), "(6 + 6 + 2) + 4");
        assert_eq!(toss.context().unwrap().get("rerolls"), Some("2"));
    }

    #[test]
    fn test_roll_below_threshold() {
        let rollable: Rollable = Explode::new(sided(10), Comparator::LessThan, Some(3)).unwrap().into();

        let toss = Roller::builder()
            .random_source(Scripted::new([1, 2, 7]))
            .build()
            .roll(&rollable);

        assert_eq!(toss.value(), 10);
        assert_eq!(toss.context().unwrap().get("rerolls"), Some("2"));
    }

    #[test]
    fn test_negative_rerolls_are_unbounded() {
        let rollable: Rollable = Explode::new(Die::fudge(), Comparator::LessThan, Some(0)).unwrap().into();
        assert_eq!(rollable.minimum(), i64::MIN);

        let rollable: Rollable = Explode::new(Die::fudge(), Comparator::Equals, None).unwrap().into();
        assert_eq!(rollable.minimum(), -1);
    }

    #[test]
    fn test_notation() {
        let d6 = sided(6);

        let explode = Explode::new(d6.clone(), Comparator::Equals, None).unwrap();
        assert_eq!(explode.to_string(), "D6!");

        let explode = Explode::new(d6.clone(), Comparator::Equals, Some(5)).unwrap();
        assert_eq!(explode.to_string(), "D6!=5");

        let explode = Explode::new(d6.clone(), Comparator::GreaterThan, Some(4)).unwrap();
        assert_eq!(explode.to_string(), "D6!>4");

        let explode = Explode::new(Pool::repeat(d6, 3), Comparator::LessThan, None).unwrap();
        assert_eq!(explode.to_string(), "3D6!<");
    }
}
