mod die;
mod pool;
mod arithmetic;
mod drop_keep;
mod explode;

use std::fmt::Display;
use crate::{Context, Method, Roller, Toss};

pub use die::Die;
pub use pool::Pool;
pub use arithmetic::{Arithmetic, Operator};
pub use drop_keep::{Algorithm, DropKeep};
pub use explode::{Comparator, Explode};


/// A node of a dice tree: a die, a pool of nodes, or a modifier wrapping a node.
///
/// Trees are usually built with [`crate::parse()`], but every variant can be
/// constructed directly. Nodes are immutable, for every node
/// `minimum() <= maximum()` holds and every roll lies between the two.
///
/// # Examples
/// ```
/// use dice_cup::{Algorithm, Die, DropKeep, Pool, Rollable};
///
/// let pool = Pool::repeat(Die::sided(6).unwrap(), 4);
/// let rollable: Rollable = DropKeep::new(pool, Algorithm::DropLowest, 1).unwrap().into();
///
/// assert_eq!(rollable.notation(), "4D6DL1");
/// assert_eq!(rollable.minimum(), 3);
/// assert_eq!(rollable.maximum(), 18);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Rollable {
    /// A single die.
    Die(Die),
    /// A sum of nodes.
    Pool(Pool),
    /// A node combined with a constant.
    Arithmetic(Arithmetic),
    /// A selection of the highest or lowest results of a pool.
    DropKeep(DropKeep),
    /// A pool whose members roll again while a comparison holds.
    Explode(Explode)
}

impl Rollable {
    /// Rolls the node with the thread generator.
    ///
    /// Use a [`Roller`] to pick the random source or trace the evaluation.
    pub fn roll(&self) -> Toss {
        Roller::default().roll(self)
    }

    /// The smallest value the node can produce.
    pub fn minimum(&self) -> i64 {
        Roller::bounds().minimum(self)
    }

    /// The largest value the node can produce, [`i64::MAX`] when unbounded.
    pub fn maximum(&self) -> i64 {
        Roller::bounds().maximum(self)
    }

    /// Canonical notation of the node, e.g. `"2D3+D4"`.
    pub fn notation(&self) -> String {
        self.to_string()
    }

    /// Returns `true` for a pool without members.
    pub fn is_empty(&self) -> bool {
        matches!(self, Rollable::Pool(pool) if pool.is_empty())
    }

    /// Returns `true` for a bare die.
    pub fn is_die(&self) -> bool {
        matches!(self, Rollable::Die(_))
    }

    pub(crate) fn evaluate(&self, method: Method, roller: &mut Roller<'_>) -> Toss {
        let mut context = Context::new(self.notation(), method);

        let (value, operation) = match self {
            Rollable::Die(die) => die.evaluate(method, roller),
            Rollable::Pool(pool) => pool.evaluate(method, roller),
            Rollable::Arithmetic(arithmetic) => arithmetic.evaluate(method, roller),
            Rollable::DropKeep(drop_keep) => drop_keep.evaluate(method, roller, &mut context),
            Rollable::Explode(explode) => explode.evaluate(method, roller, &mut context)
        };

        let toss = Toss::new(value, operation).with_context(context);
        roller.trace(&toss);
        toss
    }

    /// Notation wrapped in parenthesis when it holds a `+` outside of any.
    pub(crate) fn grouped_notation(&self) -> String {
        let notation = self.notation();

        if has_top_level_plus(&notation) {
            format!("({notation})")
        } else {
            notation
        }
    }
}

pub(crate) fn has_top_level_plus(notation: &str) -> bool {
    let mut depth = 0usize;

    notation.chars().any(|ch| {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }

        ch == '+' && depth == 0
    })
}

/// Notation of a pool wrapped by a drop/keep or explode. A plain run of
/// identical dice keeps its `ND` form, any other pool lists each member so the
/// modifier sees the same members when parsed back.
pub(crate) fn modified_notation(pool: &Pool) -> String {
    if pool.is_uniform() {
        pool.to_string()
    } else {
        format!("({})", pool.members_notation())
    }
}

impl Display for Rollable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rollable::Die(die) => write!(f, "{die}"),
            Rollable::Pool(pool) => write!(f, "{pool}"),
            Rollable::Arithmetic(arithmetic) => write!(f, "{arithmetic}"),
            Rollable::DropKeep(drop_keep) => write!(f, "{drop_keep}"),
            Rollable::Explode(explode) => write!(f, "{explode}")
        }
    }
}

impl From<Die> for Rollable {
    fn from(value: Die) -> Self {
        Self::Die(value)
    }
}

impl From<Pool> for Rollable {
    fn from(value: Pool) -> Self {
        Self::Pool(value)
    }
}

impl From<Arithmetic> for Rollable {
    fn from(value: Arithmetic) -> Self {
        Self::Arithmetic(value)
    }
}

impl From<DropKeep> for Rollable {
    fn from(value: DropKeep) -> Self {
        Self::DropKeep(value)
    }
}

impl From<Explode> for Rollable {
    fn from(value: Explode) -> Self {
        Self::Explode(value)
    }
}


#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use super::*;
    use crate::Recorder;
    use crate::rollable_test_strategies::rollable_strategy;


    proptest! {
        #[test]
        fn test_bounds_are_ordered(rollable in rollable_strategy()) {
            prop_assert!(rollable.minimum() <= rollable.maximum());
        }

        #[test]
        fn test_roll_within_bounds(rollable in rollable_strategy(), seed: u64) {
            let mut roller = Roller::builder().seed(seed).build();
            let min = roller.minimum(&rollable);
            let max = roller.maximum(&rollable);

            for _ in 0..20 {
                let value = roller.roll(&rollable).value();
                prop_assert!(value >= min && value <= max, "{rollable}: {value} not in {min}..={max}");
            }
        }

        #[test]
        fn test_root_toss_is_traced_last(rollable in rollable_strategy(), seed: u64) {
            let mut recorder = Recorder::default();
            let toss = Roller::builder()
                .seed(seed)
                .tracer(&mut recorder)
                .build()
                .roll(&rollable);

            prop_assert_eq!(recorder.tosses().last(), Some(&toss));

            let context = toss.context().unwrap();
            prop_assert_eq!(context.notation(), rollable.notation());
            prop_assert_eq!(context.method(), Method::Roll);
        }
    }

    #[test]
    fn test_from_conversions() {
        let die = Die::sided(6).unwrap();

        assert!(Rollable::from(die.clone()).is_die());
        assert!(Rollable::from(Pool::empty()).is_empty());
        assert!(!Rollable::from(Pool::new(vec![die.into()])).is_empty());
    }

    #[test]
    fn test_grouped_notation() {
        let single: Rollable = Die::fudge().into();
        let pool: Rollable = Pool::new(vec![Die::sided(4).unwrap().into(), Die::percentile().into()]).into();

        assert_eq!(single.grouped_notation(), "DF");
        assert_eq!(pool.grouped_notation(), "(D4+D%)");
    }

    #[test]
    fn test_top_level_plus() {
        assert!(has_top_level_plus("D6+D4"));
        assert!(has_top_level_plus("(D6+D4)+2"));
        assert!(!has_top_level_plus("(D6+D4)KH1"));
        assert!(!has_top_level_plus("D6-1"));
    }
}
