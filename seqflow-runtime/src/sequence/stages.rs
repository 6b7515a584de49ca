use seqflow_api::function::{CompareFunction, Element, KeyFunction, MapFunction};
use seqflow_common::error::{SeqError, SeqResult};
use seqflow_common::types::Bound;
use std::collections::HashSet;
use std::hash::Hash;

use super::{LazySequence, Source};

impl<T: Element> LazySequence<T> {
    /// Replaces every element with the sub-sequence `func(element)`, draining
    /// each sub-sequence before moving to the next source element. Failures
    /// inside a sub-sequence reach the terminal like any other failure.
    ///
    /// Sub-sequences of a bounded sequence must be bounded too: an unbounded
    /// one turns into a single usage error when it is reached. Limit it
    /// inside `func`.
    pub fn flat_map<R, F>(self, func: F) -> LazySequence<R>
    where
        R: Element,
        F: MapFunction<T, LazySequence<R>>,
    {
        let bound = self.bound;
        self.stage(bound, move |source| {
            source.flat_map(move |item| -> Source<R> {
                let inner = match item {
                    Ok(value) => func.map(value),
                    Err(e) => return Box::new(std::iter::once(Err::<R, SeqError>(e))),
                };
                if bound.is_bounded() && !inner.bound.is_bounded() {
                    return Box::new(std::iter::once(Err::<R, SeqError>(SeqError::unbounded(
                        "flat_map sub-sequence",
                    ))));
                }
                inner.source
            })
        })
    }

    /// Drops elements equal to one already yielded. Remembers every distinct
    /// element seen so far.
    pub fn distinct(self) -> Self
    where
        T: Eq + Hash + Clone,
    {
        let bound = self.bound;
        self.stage(bound, move |source| {
            let mut seen = HashSet::new();
            source.filter(move |item| match item {
                Ok(value) => seen.insert(value.clone()),
                Err(_) => true,
            })
        })
    }

    pub fn sorted(self) -> Self
    where
        T: Ord,
    {
        self.sorted_by(|a: &T, b: &T| a.cmp(b))
    }

    pub fn sorted_by_key<K, F>(self, key: F) -> Self
    where
        K: Ord,
        F: KeyFunction<T, K>,
    {
        self.sorted_by(move |a: &T, b: &T| key.key(a).cmp(&key.key(b)))
    }

    /// Stable sort. The source is drained on the first pull, so it must be
    /// bounded; an unbounded source turns into a single usage error.
    pub fn sorted_by<C>(self, compare: C) -> Self
    where
        C: CompareFunction<T>,
    {
        if !self.bound.is_bounded() {
            return Self::from_source(
                Box::new(std::iter::once(Err::<T, SeqError>(SeqError::unbounded(
                    "sorted",
                )))),
                Bound::Bounded,
            );
        }
        self.stage(Bound::Bounded, move |source| SortedIter {
            source: Some(source),
            compare,
            sorted: Vec::new().into_iter(),
        })
    }

    /// Calls `action` on each element as it is pulled.
    pub fn peek<A>(self, mut action: A) -> Self
    where
        A: FnMut(&T) + Send + 'static,
    {
        let bound = self.bound;
        self.stage(bound, move |source| {
            source.inspect(move |item| {
                if let Ok(value) = item {
                    action(value);
                }
            })
        })
    }

    /// Opt-in recovery: elements whose stage function failed are logged and
    /// dropped instead of aborting the terminal operation.
    pub fn skip_errors(self) -> Self {
        let bound = self.bound;
        self.stage(bound, |source| {
            source.filter(|item| match item {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "dropping failed element");
                    false
                }
            })
        })
    }
}

struct SortedIter<T, C> {
    source: Option<Source<T>>,
    compare: C,
    sorted: std::vec::IntoIter<T>,
}

impl<T, C> Iterator for SortedIter<T, C>
where
    C: CompareFunction<T>,
{
    type Item = SeqResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(source) = self.source.take() {
            let mut buffer = match source.collect::<SeqResult<Vec<T>>>() {
                Ok(buffer) => buffer,
                Err(e) => return Some(Err(e)),
            };
            tracing::debug!(elements = buffer.len(), "sorting materialized sequence");
            buffer.sort_by(|a, b| self.compare.compare(a, b));
            self.sorted = buffer.into_iter();
        }
        self.sorted.next().map(Ok)
    }
}
