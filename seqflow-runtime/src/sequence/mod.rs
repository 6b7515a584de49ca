use chrono::NaiveDate;
use seqflow_api::function::{
    Element, FilterFunction, MapFunction, ReduceFunction, StepFunction, TryMapFunction,
};
use seqflow_api::sequence::PSequence;
use seqflow_common::error::{SeqError, SeqResult};
use seqflow_common::types::Bound;
use std::fmt;

use crate::generator::{CalendarDays, Fibonacci, NaturalCounter};

mod stages;
mod terminal;

/// Elements travel as results so a failing stage function surfaces at the
/// terminal instead of being dropped.
pub type Source<T> = Box<dyn Iterator<Item = SeqResult<T>> + Send>;

/// Single-use lazy sequence. Nothing runs until a terminal operation pulls.
pub struct LazySequence<T> {
    source: Source<T>,
    bound: Bound,
}

impl<T> fmt::Debug for LazySequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySequence")
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}

impl<T: Element> LazySequence<T> {
    pub(crate) fn from_source(source: Source<T>, bound: Bound) -> Self {
        Self { source, bound }
    }

    pub fn from_values(values: Vec<T>) -> Self {
        Self::from_collection(values)
    }

    /// Iterates `container` in its natural order. The container must be finite.
    pub fn from_collection<C>(container: C) -> Self
    where
        C: IntoIterator<Item = T>,
        C::IntoIter: Send + 'static,
    {
        Self::from_source(
            Box::new(container.into_iter().map(Ok::<T, SeqError>)),
            Bound::Bounded,
        )
    }

    /// Unbounded sequence driven by `step`. Exhausting terminals reject it
    /// until a `limit` is attached.
    pub fn from_generator<S>(mut step: S) -> Self
    where
        S: StepFunction<T>,
    {
        Self::from_source(
            Box::new(std::iter::repeat_with(move || {
                Ok::<T, SeqError>(step.next_value())
            })),
            Bound::Unbounded,
        )
    }

    pub fn empty() -> Self {
        Self::from_source(Box::new(std::iter::empty::<SeqResult<T>>()), Bound::Bounded)
    }

    /// All of `first`, then all of `second`.
    pub fn concat(first: Self, second: Self) -> Self {
        let bound = first.bound.join(second.bound);
        Self::from_source(Box::new(first.source.chain(second.source)), bound)
    }

    fn require_bounded(&self, op: &str) -> SeqResult<()> {
        if self.bound.is_bounded() {
            Ok(())
        } else {
            Err(SeqError::unbounded(op))
        }
    }

    fn stage<R, I>(self, bound: Bound, build: impl FnOnce(Source<T>) -> I) -> LazySequence<R>
    where
        R: Element,
        I: Iterator<Item = SeqResult<R>> + Send + 'static,
    {
        LazySequence::from_source(Box::new(build(self.source)), bound)
    }
}

impl LazySequence<u64> {
    /// 1, 2, 3, ...
    pub fn naturals() -> Self {
        let mut counter = NaturalCounter::new();
        Self::from_generator(move || counter.step())
    }

    /// 1, 1, 2, 3, 5, 8, ...
    pub fn fibonacci() -> Self {
        let mut fib = Fibonacci::new();
        Self::from_generator(move || fib.step())
    }
}

impl LazySequence<NaiveDate> {
    /// `start`, `start + 1 day`, ... Fails once the days run past the
    /// supported date range.
    pub fn calendar_days(start: NaiveDate) -> Self {
        Self::from_source(Box::new(CalendarDays::new(start)), Bound::Unbounded)
    }
}

impl LazySequence<String> {
    /// Pieces of `text` between matches of the regular expression `pattern`.
    pub fn split(text: &str, pattern: &str) -> SeqResult<Self> {
        let re = regex::Regex::new(pattern)
            .map_err(|e| SeqError::InvalidArgument(format!("split pattern {pattern:?}: {e}")))?;
        let pieces: Vec<String> = re.split(text).map(str::to_string).collect();
        Ok(Self::from_values(pieces))
    }
}

impl<T: Element> PSequence<T> for LazySequence<T> {
    type Output<R: Element> = LazySequence<R>;

    fn bound(&self) -> Bound {
        self.bound
    }

    fn map<R, F>(self, func: F) -> Self::Output<R>
    where
        R: Element,
        F: MapFunction<T, R>,
    {
        let bound = self.bound;
        self.stage(bound, move |source| {
            source.map(move |item| item.map(|value| func.map(value)))
        })
    }

    fn try_map<R, F>(self, func: F) -> Self::Output<R>
    where
        R: Element,
        F: TryMapFunction<T, R>,
    {
        let bound = self.bound;
        self.stage(bound, move |source| {
            source.map(move |item| item.and_then(|value| func.try_map(value)))
        })
    }

    fn filter<F>(self, func: F) -> Self
    where
        F: FilterFunction<T>,
    {
        let bound = self.bound;
        self.stage(bound, move |source| {
            source.filter(move |item| match item {
                Ok(value) => func.filter(value),
                Err(_) => true,
            })
        })
    }

    /// Drops the first `n` elements by position. A failed element counts
    /// toward `n` but is still forwarded, so a failure never vanishes.
    fn skip(self, n: usize) -> Self {
        let bound = self.bound;
        self.stage(bound, move |source| {
            let mut remaining = n;
            source.filter(move |item| {
                if remaining == 0 {
                    return true;
                }
                remaining -= 1;
                item.is_err()
            })
        })
    }

    fn limit(self, n: usize) -> Self {
        self.stage(Bound::Bounded, move |source| source.take(n))
    }

    fn for_each<A>(self, mut action: A) -> SeqResult<()>
    where
        A: FnMut(T),
    {
        self.require_bounded("for_each")?;
        for item in self.source {
            action(item?);
        }
        Ok(())
    }

    fn reduce<F>(self, identity: T, accumulator: F) -> SeqResult<T>
    where
        F: ReduceFunction<T>,
    {
        self.require_bounded("reduce")?;
        let mut result = identity;
        for item in self.source {
            result = accumulator.reduce(result, item?);
        }
        Ok(result)
    }

    fn collect(self) -> SeqResult<Vec<T>> {
        self.require_bounded("collect")?;
        self.source.collect()
    }

    fn count(self) -> SeqResult<usize> {
        self.require_bounded("count")?;
        let mut n = 0;
        for item in self.source {
            item?;
            n += 1;
        }
        Ok(n)
    }
}

/// Raw pull access. Bypasses the bound check, so an unlimited generator
/// yields forever.
impl<T: Element> IntoIterator for LazySequence<T> {
    type Item = SeqResult<T>;
    type IntoIter = Source<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.source
    }
}
