use std::fmt::Display;
use crate::{Error, Method, Roller};


#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
enum Faces {
    Sided(i64),
    Fudge,
    Percentile,
    Custom(Vec<i64>)
}


/// A single die.
///
/// Dice render their own notation regardless of the modifiers wrapping them:
/// `D6`, `DF`, `D%` or `D[1,2,3]`.
///
/// # Examples
/// ```
/// use dice_cup::Die;
///
/// let d6 = Die::sided(6).unwrap();
/// assert_eq!((d6.min(), d6.max()), (1, 6));
/// assert_eq!(d6.to_string(), "D6");
///
/// let fudge = Die::fudge();
/// assert_eq!((fudge.min(), fudge.max()), (-1, 1));
///
/// let custom = Die::custom(vec![2, 3, 5, 7]).unwrap();
/// assert_eq!((custom.min(), custom.max()), (2, 7));
/// assert_eq!(custom.to_string(), "D[2,3,5,7]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Die(Faces);

impl Die {
    /// A die numbered `1..=sides`.
    ///
    /// # Errors
    /// Returns [`Error::TooFewSides`] if `sides < 2`.
    pub fn sided(sides: i64) -> Result<Self, Error> {
        if sides < 2 {
            return Err(Error::TooFewSides(sides));
        }

        Ok(Self(Faces::Sided(sides)))
    }

    /// A fudge die, with faces `-1`, `0` and `1`.
    pub fn fudge() -> Self {
        Self(Faces::Fudge)
    }

    /// A percentile die, numbered `1..=100`.
    pub fn percentile() -> Self {
        Self(Faces::Percentile)
    }

    /// A die showing one of `values`, each face equally likely.
    ///
    /// # Errors
    /// Returns [`Error::TooFewValues`] if fewer than 2 values are given.
    pub fn custom(values: Vec<i64>) -> Result<Self, Error> {
        if values.len() < 2 {
            return Err(Error::TooFewValues(values.len()));
        }

        Ok(Self(Faces::Custom(values)))
    }

    /// Lowest face.
    pub fn min(&self) -> i64 {
        match &self.0 {
            Faces::Sided(_) | Faces::Percentile => 1,
            Faces::Fudge => -1,
            Faces::Custom(values) => values.iter().copied().min().unwrap_or_default()
        }
    }

    /// Highest face.
    pub fn max(&self) -> i64 {
        match &self.0 {
            Faces::Sided(sides) => *sides,
            Faces::Fudge => 1,
            Faces::Percentile => 100,
            Faces::Custom(values) => values.iter().copied().max().unwrap_or_default()
        }
    }

    fn toss(&self, roller: &mut Roller<'_>) -> i64 {
        match &self.0 {
            Faces::Custom(values) => {
                let last = values.len().saturating_sub(1) as i64;
                let index = roller.between(0, last).clamp(0, last) as usize;
                values[index]
            },
            _ => roller.between(self.min(), self.max()).clamp(self.min(), self.max())
        }
    }

    pub(crate) fn evaluate(&self, method: Method, roller: &mut Roller<'_>) -> (i64, String) {
        let value = match method {
            Method::Roll => self.toss(roller),
            Method::Minimum => self.min(),
            Method::Maximum => self.max()
        };

        (value, value.to_string())
    }
}

impl Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Faces::Sided(sides) => write!(f, "D{sides}"),
            Faces::Fudge => write!(f, "DF"),
            Faces::Percentile => write!(f, "D%"),
            Faces::Custom(values) => {
                let values: Vec<String> = values.iter().map(i64::to_string).collect();
                write!(f, "D[{}]", values.join(","))
            }
        }
    }
}
