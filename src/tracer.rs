use crate::Toss;


/// Receives every [`Toss`] produced while a tree is evaluated.
///
/// Tosses arrive children first, the root's toss comes last.
pub trait Tracer {
    /// Records one evaluation step.
    fn append(&mut self, toss: &Toss);
}

impl<T: Tracer + ?Sized> Tracer for &mut T {
    fn append(&mut self, toss: &Toss) {
        (**self).append(toss)
    }
}

impl<T: Tracer + ?Sized> Tracer for Box<T> {
    fn append(&mut self, toss: &Toss) {
        (**self).append(toss)
    }
}


/// Discards every toss.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn append(&mut self, _toss: &Toss) {}
}


/// Forwards every toss to [`tracing`] at the `TRACE` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn append(&mut self, toss: &Toss) {
        match toss.context() {
            Some(context) => tracing::trace!(
                notation = context.notation(),
                method = %context.method(),
                value = toss.value(),
                operation = toss.operation(),
                "toss"
            ),
            None => tracing::trace!(value = toss.value(), operation = toss.operation(), "toss")
        }
    }
}


/// Keeps every toss in arrival order.
///
/// # Examples
/// ```
/// use dice_cup::{Recorder, Roller};
///
/// let rollable = dice_cup::parse("2d6").unwrap();
/// let mut recorder = Recorder::default();
///
/// let toss = Roller::builder().tracer(&mut recorder).build().roll(&rollable);
///
/// // two dice then the pool holding them
/// assert_eq!(recorder.len(), 3);
/// assert_eq!(recorder.tosses().last(), Some(&toss));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Recorder(Vec<Toss>);

impl Recorder {
    /// Recorded tosses, oldest first.
    pub fn tosses(&self) -> &[Toss] {
        &self.0
    }

    /// Number of recorded tosses.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Removes and returns every recorded toss.
    pub fn drain(&mut self) -> Vec<Toss> {
        std::mem::take(&mut self.0)
    }
}

impl Tracer for Recorder {
    fn append(&mut self, toss: &Toss) {
        self.0.push(toss.clone());
    }
}
