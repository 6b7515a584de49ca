use crate::function::{Element, FilterFunction, MapFunction, ReduceFunction, TryMapFunction};
use seqflow_common::error::SeqResult;
use seqflow_common::types::Bound;

/// A lazy, pull-based sequence. Stages return a new sequence without
/// evaluating anything; terminals take `self` and drive the whole chain.
pub trait PSequence<T: Element>: Sized {
    type Output<R: Element>: PSequence<R>;

    fn bound(&self) -> Bound;

    fn map<R, F>(self, func: F) -> Self::Output<R>
    where
        R: Element,
        F: MapFunction<T, R>;

    fn try_map<R, F>(self, func: F) -> Self::Output<R>
    where
        R: Element,
        F: TryMapFunction<T, R>;

    fn filter<F>(self, func: F) -> Self
    where
        F: FilterFunction<T>;

    fn skip(self, n: usize) -> Self;

    fn limit(self, n: usize) -> Self;

    fn for_each<A>(self, action: A) -> SeqResult<()>
    where
        A: FnMut(T);

    fn reduce<F>(self, identity: T, accumulator: F) -> SeqResult<T>
    where
        F: ReduceFunction<T>;

    fn collect(self) -> SeqResult<Vec<T>>;

    fn count(self) -> SeqResult<usize>;
}
