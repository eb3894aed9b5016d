use crate::{Method, NoopTracer, RandomSource, RngSource, Rollable, Toss, Tracer};


/// An evaluation session: the random source and the tracer a tree is
/// evaluated with.
///
/// Created with [`Roller::builder()`], or [`Roller::default()`] for the thread
/// generator and no tracing.
///
/// # Examples
/// ```
/// use dice_cup::Roller;
///
/// let rollable = dice_cup::parse("3d6+2").unwrap();
///
/// let mut first = Roller::builder().seed(7).build();
/// let mut second = Roller::builder().seed(7).build();
///
/// assert_eq!(first.roll(&rollable), second.roll(&rollable));
/// assert_eq!(first.minimum(&rollable), 5);
/// assert_eq!(first.maximum(&rollable), 20);
/// ```
pub struct Roller<'a> {
    source: Box<dyn RandomSource + 'a>,
    tracer: Box<dyn Tracer + 'a>
}

impl<'a> Roller<'a> {
    /// Creates a new [`RollerBuilder`].
    pub fn builder() -> RollerBuilder<'a> {
        RollerBuilder::default()
    }

    /// Rolls `rollable` once.
    pub fn roll(&mut self, rollable: &Rollable) -> Toss {
        rollable.evaluate(Method::Roll, self)
    }

    /// The smallest value `rollable` can produce.
    pub fn minimum(&mut self, rollable: &Rollable) -> i64 {
        rollable.evaluate(Method::Minimum, self).value()
    }

    /// The largest value `rollable` can produce.
    pub fn maximum(&mut self, rollable: &Rollable) -> i64 {
        rollable.evaluate(Method::Maximum, self).value()
    }

    pub(crate) fn between(&mut self, min: i64, max: i64) -> i64 {
        self.source.between(min, max)
    }

    pub(crate) fn trace(&mut self, toss: &Toss) {
        self.tracer.append(toss);
    }
}

impl Roller<'static> {
    /// A session for bounds only: its source never touches a generator.
    pub(crate) fn bounds() -> Self {
        Self {
            source: Box::new(LowerBound),
            tracer: Box::new(NoopTracer)
        }
    }
}

impl Default for Roller<'_> {
    fn default() -> Self {
        Self {
            source: Box::new(RngSource::thread()),
            tracer: Box::new(NoopTracer)
        }
    }
}

struct LowerBound;

impl RandomSource for LowerBound {
    fn between(&mut self, min: i64, _max: i64) -> i64 {
        min
    }
}

impl std::fmt::Debug for Roller<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Roller").finish_non_exhaustive()
    }
}


/// A builder for [`Roller`] sessions.
///
/// Without configuration the thread generator of `rand` and a
/// [`NoopTracer`] are used.
#[derive(Default)]
pub struct RollerBuilder<'a> {
    source: Option<Box<dyn RandomSource + 'a>>,
    tracer: Option<Box<dyn Tracer + 'a>>
}

impl<'a> RollerBuilder<'a> {
    /// Rolls with a deterministic generator seeded with `seed`.
    pub fn seed(self, seed: u64) -> Self {
        self.random_source(RngSource::seeded(seed))
    }

    /// Rolls with the given source.
    pub fn random_source(mut self, source: impl RandomSource + 'a) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Sends every toss to `tracer`.
    ///
    /// Pass `&mut tracer` to keep access to it once the session ends.
    pub fn tracer(mut self, tracer: impl Tracer + 'a) -> Self {
        self.tracer = Some(Box::new(tracer));
        self
    }

    /// Finalizes the session.
    pub fn build(self) -> Roller<'a> {
        Roller {
            source: self.source.unwrap_or_else(|| Box::new(RngSource::thread())),
            tracer: self.tracer.unwrap_or_else(|| Box::new(NoopTracer))
        }
    }
}

impl std::fmt::Debug for RollerBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollerBuilder")
            .field("seeded", &self.source.is_some())
            .field("traced", &self.tracer.is_some())
            .finish()
    }
}
