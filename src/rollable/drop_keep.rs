use std::{fmt::Display, str::FromStr};
use crate::{Context, Error, Method, Pool, Rollable, Roller};
use super::modified_notation;
use super::pool::{join, sum};


/// Which results of a pool a [`DropKeep`] sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// Drops the `n` highest results.
    DropHighest,
    /// Drops the `n` lowest results.
    DropLowest,
    /// Keeps the `n` highest results.
    KeepHighest,
    /// Keeps the `n` lowest results.
    KeepLowest
}

impl Algorithm {
    /// Range of the ascending ranking that is summed, for `count` results.
    fn kept(&self, count: usize, threshold: usize) -> std::ops::Range<usize> {
        let threshold = threshold.min(count);

        match self {
            Algorithm::DropHighest => 0..count - threshold,
            Algorithm::DropLowest => threshold..count,
            Algorithm::KeepHighest => count - threshold..count,
            Algorithm::KeepLowest => 0..threshold
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    /// Parses `dh`, `dl`, `kh` or `kl`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dh" => Ok(Algorithm::DropHighest),
            "dl" => Ok(Algorithm::DropLowest),
            "kh" => Ok(Algorithm::KeepHighest),
            "kl" => Ok(Algorithm::KeepLowest),
            _ => Err(Error::UnknownAlgorithm(s.into()))
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            Algorithm::DropHighest => "DH",
            Algorithm::DropLowest => "DL",
            Algorithm::KeepHighest => "KH",
            Algorithm::KeepLowest => "KL"
        };

        write!(f, "{token}")
    }
}


/// Sums only the highest or lowest results of a pool.
///
/// Each member of the pool is evaluated once, the results are ranked with a
/// stable ascending sort and a contiguous slice of the ranking is summed.
/// Equal results keep their pool order, so among ties the earlier members
/// rank lower.
///
/// # Examples
/// ```
/// use dice_cup::{Algorithm, Die, DropKeep, Pool, Rollable};
///
/// let drop_keep = DropKeep::new(Pool::repeat(Die::sided(20).unwrap(), 2), Algorithm::KeepHighest, 1).unwrap();
/// let rollable = Rollable::from(drop_keep);
///
/// assert_eq!(rollable.notation(), "2D20KH1");
/// assert_eq!((rollable.minimum(), rollable.maximum()), (1, 20));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DropKeep {
    pool: Pool,
    algorithm: Algorithm,
    threshold: usize
}

impl DropKeep {
    /// Selects `threshold` results of `rollable` according to `algorithm`.
    ///
    /// A rollable that is not a pool becomes a pool of one.
    ///
    /// # Errors
    /// Returns [`Error::ThresholdOutOfRange`] if `threshold` exceeds the
    /// number of members in the pool.
    pub fn new(rollable: impl Into<Rollable>, algorithm: Algorithm, threshold: usize) -> Result<Self, Error> {
        let pool = Pool::from(rollable.into());

        if threshold > pool.len() {
            return Err(Error::ThresholdOutOfRange { threshold, count: pool.len() });
        }

        Ok(Self { pool, algorithm, threshold })
    }

    /// The wrapped pool.
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// The selection algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Number of results dropped or kept.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Indexes into `values` of the results that count, in pool order.
    pub fn select(&self, values: &[i64]) -> Vec<usize> {
        let mut ranked: Vec<usize> = (0..values.len()).collect();
        ranked.sort_by_key(|&i| values[i]);

        let mut kept = ranked[self.algorithm.kept(values.len(), self.threshold)].to_vec();
        kept.sort_unstable();
        kept
    }

    pub(crate) fn evaluate(&self, method: Method, roller: &mut Roller<'_>, context: &mut Context) -> (i64, String) {
        let tosses = self.pool.tosses(method, roller);
        let values: Vec<i64> = tosses.iter().map(|toss| toss.value()).collect();
        let kept = self.select(&values);

        let (kept_values, dropped_values): (Vec<_>, Vec<_>) = values.iter()
            .enumerate()
            .partition(|(i, _)| kept.contains(i));

        context.insert("kept", listing(kept_values.into_iter().map(|(_, v)| *v)));
        context.insert("dropped", listing(dropped_values.into_iter().map(|(_, v)| *v)));

        let value = sum(kept.iter().map(|&i| values[i]));
        let operation = join(kept.iter().map(|&i| tosses[i].grouped_operation()));

        (value, operation)
    }
}

impl Display for DropKeep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", modified_notation(&self.pool), self.algorithm, self.threshold)
    }
}


fn listing(values: impl Iterator<Item = i64>) -> String {
    values.map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}
