use seqflow_common::error::SeqResult;
use std::cmp::Ordering;

/// Marker for values a pipeline can move between stages and, in parallel
/// mode, between worker threads.
pub trait Element: Send + Sync + 'static {}

impl<T> Element for T where T: Send + Sync + 'static {}

pub trait Function: Send + Sync + 'static {}

impl<F> Function for F where F: Send + Sync + 'static {}

pub trait MapFunction<T, R>: Function {
    fn map(&self, value: T) -> R;
}

impl<T, R, F> MapFunction<T, R> for F
where
    F: Fn(T) -> R + Send + Sync + 'static,
{
    fn map(&self, value: T) -> R {
        (self)(value)
    }
}

/// A map whose failure aborts the terminal operation that pulled the element.
pub trait TryMapFunction<T, R>: Function {
    fn try_map(&self, value: T) -> SeqResult<R>;
}

impl<T, R, F> TryMapFunction<T, R> for F
where
    F: Fn(T) -> SeqResult<R> + Send + Sync + 'static,
{
    fn try_map(&self, value: T) -> SeqResult<R> {
        (self)(value)
    }
}

pub trait FilterFunction<T>: Function {
    fn filter(&self, value: &T) -> bool;
}

impl<T, F> FilterFunction<T> for F
where
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    fn filter(&self, value: &T) -> bool {
        (self)(value)
    }
}

pub trait ReduceFunction<T>: Function {
    fn reduce(&self, acc: T, value: T) -> T;
}

impl<T, F> ReduceFunction<T> for F
where
    F: Fn(T, T) -> T + Send + Sync + 'static,
{
    fn reduce(&self, acc: T, value: T) -> T {
        (self)(acc, value)
    }
}

/// Comparator used by sorting and min/max. Must be a total preorder.
pub trait CompareFunction<T>: Function {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, F> CompareFunction<T> for F
where
    F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self)(a, b)
    }
}

pub trait KeyFunction<T, K>: Function {
    fn key(&self, value: &T) -> K;
}

impl<T, K, F> KeyFunction<T, K> for F
where
    F: Fn(&T) -> K + Send + Sync + 'static,
{
    fn key(&self, value: &T) -> K {
        (self)(value)
    }
}

/// Zero-argument producer behind a generative sequence. Each call returns
/// the next element and advances state owned by the implementor alone.
pub trait StepFunction<T>: Send + 'static {
    fn next_value(&mut self) -> T;
}

impl<T, F> StepFunction<T> for F
where
    F: FnMut() -> T + Send + 'static,
{
    fn next_value(&mut self) -> T {
        (self)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply<F: MapFunction<i32, i32>>(func: F, value: i32) -> i32 {
        func.map(value)
    }

    fn keep<F: FilterFunction<i32>>(func: F, value: i32) -> bool {
        func.filter(&value)
    }

    #[test]
    fn test_closures_satisfy_function_traits() {
        assert_eq!(apply(|x: i32| x * x, 7), 49);
        assert!(keep(|x: &i32| *x % 2 != 0, 3));
        assert!(!keep(|x: &i32| *x % 2 != 0, 4));
    }

    #[test]
    fn test_comparator_and_key_functions() {
        let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
        assert_eq!(by_len.compare(&"ab", &"c"), Ordering::Greater);
        let first = |s: &&str| s.chars().next();
        assert_eq!(first.key(&"seq"), Some('s'));
        let sum = |a: i32, b: i32| a + b;
        assert_eq!(sum.reduce(2, 3), 5);
    }

    #[test]
    fn test_step_function_owns_its_state() {
        let mut n = 0;
        let mut step = move || {
            n += 1;
            n
        };
        assert_eq!(step.next_value(), 1);
        assert_eq!(step.next_value(), 2);
    }
}
