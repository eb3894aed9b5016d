use std::{collections::BTreeMap, fmt::Display};


/// The evaluation that produced a [`Toss`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Method {
    /// A random roll of the node.
    Roll,
    /// The smallest value the node can produce.
    Minimum,
    /// The largest value the node can produce.
    Maximum
}

impl Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Method::Roll => "roll",
            Method::Minimum => "minimum",
            Method::Maximum => "maximum"
        };

        write!(f, "{name}")
    }
}


/// Provenance of a [`Toss`]: which node produced it and how.
///
/// Modifiers store extra details as free-form extensions, for example the
/// values a drop/keep kept and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Context {
    notation: String,
    method: Method,
    extensions: BTreeMap<String, String>
}

impl Context {
    /// Creates a context for the node rendered as `notation`.
    pub fn new(notation: impl Into<String>, method: Method) -> Self {
        Self {
            notation: notation.into(),
            method,
            extensions: BTreeMap::new()
        }
    }

    /// Canonical notation of the node that produced the toss.
    pub fn notation(&self) -> &str {
        &self.notation
    }

    /// The evaluation that produced the toss.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Looks up an extension value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.extensions.get(key).map(String::as_str)
    }

    /// All extensions, ordered by key.
    pub fn extensions(&self) -> &BTreeMap<String, String> {
        &self.extensions
    }

    /// Sets an extension, replacing any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.extensions.insert(key.into(), value.into());
    }
}


/// The result of evaluating a node once.
///
/// `operation` is a human readable formula of how the value came to be,
/// e.g. `"3 + 4"` for a pool of two dice.
///
/// # Examples
/// ```
/// use dice_cup::{Context, Method, Toss};
///
/// let toss = Toss::new(7, "3 + 4").with_context(Context::new("2D6", Method::Roll));
/// assert_eq!(toss.value(), 7);
/// assert_eq!(toss.to_string(), "3 + 4 = 7");
/// assert_eq!(toss.context().map(|c| c.notation()), Some("2D6"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Toss {
    value: i64,
    operation: String,
    context: Option<Context>
}

impl Toss {
    /// Creates a toss without provenance.
    pub fn new(value: i64, operation: impl Into<String>) -> Self {
        Self {
            value,
            operation: operation.into(),
            context: None
        }
    }

    /// Attaches provenance to the toss.
    pub fn with_context(self, context: Context) -> Self {
        Self { context: Some(context), ..self }
    }

    /// The numeric result.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// The formula that produced [`Toss::value()`].
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Provenance, present on every toss produced by evaluating a tree.
    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    /// The operation, parenthesized when it is a compound formula.
    pub(crate) fn grouped_operation(&self) -> String {
        if self.operation.contains(' ') {
            format!("({})", self.operation)
        } else {
            self.operation.clone()
        }
    }
}

impl Display for Toss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.operation == self.value.to_string() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} = {}", self.operation, self.value)
        }
    }
}
