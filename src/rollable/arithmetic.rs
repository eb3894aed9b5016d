use std::fmt::Display;
use crate::{Error, Method, Rollable, Roller};
use super::has_top_level_plus;


/// Operation applied between a result and a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`, truncating toward zero.
    Divide,
    /// `^`, keeping the sign of the base.
    Power
}

impl Operator {
    /// Maps a notation symbol to its operator.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            '^' => Some(Operator::Power),
            _ => None
        }
    }

    /// Applies the operator, saturating at the bounds of `i64`.
    ///
    /// A negative base raised to a power keeps its sign: `-2 ^ 2 == -4`.
    /// Division by zero yields 0, [`Arithmetic::new()`] never lets it happen.
    pub fn op(&self, value: i64, operand: u32) -> i64 {
        use Operator as Op;
        match self {
            Op::Add => value.saturating_add(operand.into()),
            Op::Subtract => value.saturating_sub(operand.into()),
            Op::Multiply => value.saturating_mul(operand.into()),
            Op::Divide => value.checked_div(operand.into()).unwrap_or(0),
            Op::Power if value >= 0 => value.saturating_pow(operand),
            Op::Power => value.saturating_abs().saturating_pow(operand).saturating_neg()
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Add => write!(f, "+"),
            Operator::Subtract => write!(f, "-"),
            Operator::Multiply => write!(f, "*"),
            Operator::Divide => write!(f, "/"),
            Operator::Power => write!(f, "^")
        }
    }
}


/// Combines the result of a rollable with a constant, e.g. `2D6+3`.
///
/// Every operator is monotonic in the wrapped value, so the minimum and
/// maximum come straight from the wrapped node's minimum and maximum.
///
/// # Examples
/// ```
/// use dice_cup::{Arithmetic, Die, Operator, Pool, Rollable};
///
/// let arithmetic = Arithmetic::new(Pool::repeat(Die::sided(6).unwrap(), 2), Operator::Multiply, 10).unwrap();
/// let rollable = Rollable::from(arithmetic);
///
/// assert_eq!(rollable.notation(), "2D6*10");
/// assert_eq!((rollable.minimum(), rollable.maximum()), (20, 120));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Arithmetic {
    rollable: Box<Rollable>,
    operator: Operator,
    operand: u32
}

impl Arithmetic {
    /// Wraps `rollable` with `operator` and the constant `operand`.
    ///
    /// # Errors
    /// Returns [`Error::DivisionByZero`] when dividing by 0.
    pub fn new(rollable: impl Into<Rollable>, operator: Operator, operand: u32) -> Result<Self, Error> {
        if operator == Operator::Divide && operand == 0 {
            return Err(Error::DivisionByZero);
        }

        Ok(Self {
            rollable: Box::new(rollable.into()),
            operator,
            operand
        })
    }

    /// The wrapped rollable.
    pub fn rollable(&self) -> &Rollable {
        &self.rollable
    }

    /// The operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The constant.
    pub fn operand(&self) -> u32 {
        self.operand
    }

    /// Applies this node's operation to `value`.
    pub fn calculate(&self, value: i64) -> i64 {
        self.operator.op(value, self.operand)
    }

    pub(crate) fn evaluate(&self, method: Method, roller: &mut Roller<'_>) -> (i64, String) {
        let toss = self.rollable.evaluate(method, roller);
        let operation = format!("{} {} {}", toss.grouped_operation(), self.operator, self.operand);

        (self.calculate(toss.value()), operation)
    }
}

impl Display for Arithmetic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let notation = self.rollable.notation();
        let chained = matches!(self.rollable.as_ref(), Rollable::Arithmetic(inner) if matches!(inner.rollable(), Rollable::Arithmetic(_)));
        let open_comparison = notation.ends_with(|c| matches!(c, '<' | '>' | '='));

        if chained || open_comparison || has_top_level_plus(&notation) {
            write!(f, "({notation}){}{}", self.operator, self.operand)
        } else {
            write!(f, "{notation}{}{}", self.operator, self.operand)
        }
    }
}
