use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use seqflow_api::function::{
    CompareFunction, Element, FilterFunction, MapFunction, ReduceFunction, TryMapFunction,
};
use seqflow_api::sequence::PSequence;
use seqflow_common::error::{SeqError, SeqResult};
use std::iter::Sum;
use std::sync::Arc;

use crate::env::{ensure_parallel, Environment};
use crate::sequence::LazySequence;

/// A materialized, bounded sequence evaluated on rayon workers.
///
/// Every stage keeps element order, so ordered terminals give the same
/// answer as the sequential pipeline. Only `for_each` visits elements in an
/// unspecified order.
pub struct ParSequence<T> {
    items: Vec<T>,
    pool: Option<Arc<ThreadPool>>,
}

fn install<R, OP>(pool: &Option<Arc<ThreadPool>>, op: OP) -> R
where
    R: Send,
    OP: FnOnce() -> R + Send,
{
    match pool {
        Some(pool) => pool.install(op),
        None => op(),
    }
}

impl<T: Element> ParSequence<T> {
    pub fn from_vec(items: Vec<T>) -> Self {
        Self { items, pool: None }
    }

    /// Runs on a dedicated pool of `threads` workers; 0 keeps rayon's
    /// global pool.
    pub fn with_threads(mut self, threads: usize) -> SeqResult<Self> {
        if threads == 0 {
            self.pool = None;
            return Ok(self);
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| SeqError::Internal(format!("build thread pool: {e}")))?;
        self.pool = Some(Arc::new(pool));
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<R, F>(self, func: F) -> ParSequence<R>
    where
        R: Element,
        F: MapFunction<T, R>,
    {
        let ParSequence { items, pool } = self;
        let items = install(&pool, move || {
            items
                .into_par_iter()
                .map(|value| func.map(value))
                .collect::<Vec<R>>()
        });
        ParSequence { items, pool }
    }

    /// Fails if any element fails. Which failure is reported is unspecified
    /// when several elements fail.
    pub fn try_map<R, F>(self, func: F) -> SeqResult<ParSequence<R>>
    where
        R: Element,
        F: TryMapFunction<T, R>,
    {
        let ParSequence { items, pool } = self;
        let items = install(&pool, move || {
            items
                .into_par_iter()
                .map(|value| func.try_map(value))
                .collect::<SeqResult<Vec<R>>>()
        })?;
        Ok(ParSequence { items, pool })
    }

    pub fn filter<F>(self, func: F) -> Self
    where
        F: FilterFunction<T>,
    {
        let ParSequence { items, pool } = self;
        let items = install(&pool, move || {
            items
                .into_par_iter()
                .filter(|value| func.filter(value))
                .collect::<Vec<T>>()
        });
        ParSequence { items, pool }
    }

    pub fn sorted(self) -> Self
    where
        T: Ord,
    {
        self.sorted_by(|a: &T, b: &T| a.cmp(b))
    }

    /// Stable parallel sort.
    pub fn sorted_by<C>(self, compare: C) -> Self
    where
        C: CompareFunction<T>,
    {
        let ParSequence { mut items, pool } = self;
        tracing::debug!(elements = items.len(), "parallel sort");
        let items = install(&pool, move || {
            items.par_sort_by(|a, b| compare.compare(a, b));
            items
        });
        ParSequence { items, pool }
    }

    /// Each element is visited exactly once, in no particular order.
    pub fn for_each<A>(self, action: A)
    where
        A: Fn(T) + Send + Sync,
    {
        let ParSequence { items, pool } = self;
        install(&pool, move || items.into_par_iter().for_each(action));
    }

    /// Per-worker partial results merged at the end. `op` must be
    /// associative and `identity` a true identity for it.
    pub fn reduce<F>(self, identity: T, op: F) -> T
    where
        T: Clone,
        F: ReduceFunction<T>,
    {
        let ParSequence { items, pool } = self;
        install(&pool, move || {
            items
                .into_par_iter()
                .reduce(|| identity.clone(), |acc, value| op.reduce(acc, value))
        })
    }

    pub fn count(self) -> usize {
        self.items.len()
    }

    pub fn sum(self) -> T
    where
        T: Sum<T>,
    {
        let ParSequence { items, pool } = self;
        install(&pool, move || items.into_par_iter().sum::<T>())
    }

    pub fn collect(self) -> Vec<T> {
        self.items
    }

    /// Back to a lazy sequence over the current elements, in order.
    pub fn sequential(self) -> LazySequence<T> {
        LazySequence::from_values(self.items)
    }
}

impl<T: Element> LazySequence<T> {
    /// Materializes the sequence for parallel evaluation on rayon's global pool.
    pub fn parallel(self) -> SeqResult<ParSequence<T>> {
        let items = self.collect()?;
        tracing::debug!(elements = items.len(), "handing sequence to parallel mode");
        Ok(ParSequence::from_vec(items))
    }

    /// Like [`parallel`](Self::parallel), sized by `seqflow.parallelism`.
    pub fn parallel_in(self, env: &Environment) -> SeqResult<ParSequence<T>> {
        ensure_parallel(env)?;
        let threads = env.parallelism()?;
        self.parallel()?.with_threads(threads)
    }
}
