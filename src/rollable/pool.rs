use std::fmt::Display;
use crate::{Method, Rollable, Roller, Toss};


/// An ordered collection of rollables whose results are summed.
///
/// Empty sub-pools are dropped on construction, so a pool made only of empty
/// pools is itself empty. An empty pool renders as `"0"` and always sums to 0.
///
/// # Examples
/// ```
/// use dice_cup::{Die, Pool, Rollable};
///
/// let pool = Pool::new(vec![
///     Pool::repeat(Die::sided(3).unwrap(), 2),
///     Die::sided(4).unwrap().into(),
/// ]);
///
/// assert_eq!(pool.to_string(), "2D3+D4");
/// assert_eq!(Rollable::from(pool).maximum(), 10);
/// assert_eq!(Pool::empty().to_string(), "0");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pool(Vec<Rollable>);

impl Pool {
    /// Creates a pool of `rollables`, leaving out empty pools.
    ///
    /// A pool whose only member is itself a pool sums the same, so the inner
    /// pool is used directly.
    pub fn new(rollables: Vec<Rollable>) -> Self {
        let members: Vec<Rollable> = rollables.into_iter()
            .filter(|rollable| !rollable.is_empty())
            .collect();

        match <[Rollable; 1]>::try_from(members) {
            Ok([Rollable::Pool(inner)]) => inner,
            Ok([single]) => Self(vec![single]),
            Err(members) => Self(members)
        }
    }

    /// A pool without members.
    pub fn empty() -> Self {
        Self::default()
    }

    /// `quantity` independent copies of `rollable`.
    ///
    /// A quantity of 0 or 1 yields the rollable itself rather than a pool of one.
    pub fn repeat(rollable: impl Into<Rollable>, quantity: u16) -> Rollable {
        let rollable = rollable.into();

        if quantity <= 1 {
            return rollable;
        }

        Self::new(vec![rollable; quantity as usize]).into()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the pool has no members.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if every member is a bare die with the same faces,
    /// i.e. the pool renders as plain `ND<size>`.
    pub fn is_uniform(&self) -> bool {
        match self.0.split_first() {
            Some((Rollable::Die(first), rest)) => rest.iter().all(|rollable| matches!(rollable, Rollable::Die(die) if die == first)),
            _ => false
        }
    }

    /// Notation of every member on its own, joined with `+` and never grouped.
    pub(crate) fn members_notation(&self) -> String {
        let parts: Vec<String> = self.iter().map(Rollable::grouped_notation).collect();

        if parts.is_empty() {
            "0".into()
        } else {
            parts.join("+")
        }
    }

    /// Members in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rollable> {
        self.0.iter()
    }

    pub(crate) fn tosses(&self, method: Method, roller: &mut Roller<'_>) -> Vec<Toss> {
        self.iter()
            .map(|rollable| rollable.evaluate(method, roller))
            .collect()
    }

    pub(crate) fn evaluate(&self, method: Method, roller: &mut Roller<'_>) -> (i64, String) {
        let tosses = self.tosses(method, roller);
        (sum(tosses.iter().map(Toss::value)), join(tosses.iter().map(Toss::grouped_operation)))
    }
}

impl From<Rollable> for Pool {
    /// Uses a pool as is, any other rollable becomes the single member of a new pool.
    fn from(value: Rollable) -> Self {
        match value {
            Rollable::Pool(pool) => pool,
            other => Self::new(vec![other])
        }
    }
}

impl<'a> IntoIterator for &'a Pool {
    type Item = &'a Rollable;
    type IntoIter = std::slice::Iter<'a, Rollable>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "0");
        }

        // only bare dice are grouped, so the output parses back
        let mut groups: Vec<(String, usize, bool)> = Vec::new();

        for rollable in self {
            let notation = rollable.grouped_notation();
            let is_die = rollable.is_die();

            let group = groups.iter_mut()
                .find(|(existing, _, grouped)| is_die && *grouped && *existing == notation);

            match group {
                Some((_, count, _)) => *count += 1,
                None => groups.push((notation, 1, is_die))
            }
        }

        let parts: Vec<String> = groups.into_iter()
            .map(|(notation, count, _)| match count {
                1 => notation,
                n => format!("{n}{notation}")
            })
            .collect();

        write!(f, "{}", parts.join("+"))
    }
}


pub(crate) fn sum(values: impl Iterator<Item = i64>) -> i64 {
    values.fold(0, i64::saturating_add)
}

pub(crate) fn join(operations: impl Iterator<Item = String>) -> String {
    let operations: Vec<String> = operations.collect();

    if operations.is_empty() {
        "0".into()
    } else {
        operations.join(" + ")
    }
}
