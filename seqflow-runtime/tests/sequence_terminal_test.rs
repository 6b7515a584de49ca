use seqflow_api::sequence::PSequence;
use seqflow_common::error::{SeqError, SeqResult};
use seqflow_runtime::sequence::LazySequence;
use std::collections::{BTreeSet, HashMap};

fn split_entry(entry: &str) -> SeqResult<(String, String)> {
    entry
        .split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| SeqError::Parse(format!("no '=' in {entry:?}")))
}

#[test]
fn test_for_each_visits_in_order() {
    let mut seen = Vec::new();
    LazySequence::from_values(vec!["A", "B", "C"])
        .for_each(|s| seen.push(s))
        .unwrap();
    assert_eq!(seen, vec!["A", "B", "C"]);
}

#[test]
fn test_reduce_sum_and_product() {
    let sum = LazySequence::from_values(vec![1, 2, 3, 4, 5])
        .reduce(0, |acc: i32, n: i32| acc + n)
        .unwrap();
    assert_eq!(sum, 15);

    let product = LazySequence::from_values(vec![1, 2, 3, 4, 5])
        .reduce(1, |acc: i32, n: i32| acc * n)
        .unwrap();
    assert_eq!(product, 120);
}

#[test]
fn test_reduce_empty_returns_identity() {
    let out = LazySequence::<i32>::empty()
        .reduce(42, |acc: i32, n: i32| acc + n)
        .unwrap();
    assert_eq!(out, 42);
}

#[test]
fn test_fold_key_values_into_map() {
    let map = LazySequence::from_values(vec!["profile=native", "debug=true"])
        .try_map(split_entry)
        .fold(HashMap::new(), |mut map, (k, v)| {
            map.insert(k, v);
            map
        })
        .unwrap();

    let mut expected = HashMap::new();
    expected.insert("profile".to_string(), "native".to_string());
    expected.insert("debug".to_string(), "true".to_string());
    assert_eq!(map, expected);
}

#[test]
fn test_split_on_first_equals_only() {
    let map = LazySequence::from_values(vec!["url=a=b", "interval=500"])
        .try_map(split_entry)
        .collect_to_map(|kv: &(String, String)| kv.0.clone(), |kv: (String, String)| kv.1)
        .unwrap();
    assert_eq!(map["url"], "a=b");
    assert_eq!(map["interval"], "500");
}

#[test]
fn test_collect_to_map_by_prefix() {
    let map = LazySequence::from_values(vec!["APPL:Apple", "MSFT:Microsoft"])
        .collect_to_map(
            |s: &&str| s[..s.find(':').unwrap()].to_string(),
            |s: &str| s[s.find(':').unwrap() + 1..].to_string(),
        )
        .unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map["APPL"], "Apple");
    assert_eq!(map["MSFT"], "Microsoft");
}

#[test]
fn test_collect_to_map_rejects_duplicate_keys() {
    let err = LazySequence::from_values(vec!["a=1", "b=2", "a=3"])
        .try_map(split_entry)
        .collect_to_map(|kv: &(String, String)| kv.0.clone(), |kv: (String, String)| kv.1)
        .unwrap_err();
    match err {
        SeqError::DuplicateKey(key) => assert_eq!(key, "\"a\""),
        other => panic!("expected duplicate key, got {other:?}"),
    }
}

#[test]
fn test_collect_to_map_with_last_write_wins() {
    let map = LazySequence::from_values(vec!["a=1", "b=2", "a=3"])
        .try_map(split_entry)
        .collect_to_map_with(
            |kv: &(String, String)| kv.0.clone(),
            |kv: (String, String)| kv.1,
            |_, incoming| incoming,
        )
        .unwrap();
    assert_eq!(map["a"], "3");
    assert_eq!(map["b"], "2");
}

#[test]
fn test_group_by_first_letter_keeps_first_seen_order() {
    let groups = LazySequence::from_values(vec![
        "Apple",
        "Banana",
        "Blackberry",
        "Coconut",
        "Avocado",
        "Cherry",
        "Apricots",
    ])
    .group_by(|s: &&str| s[..1].to_string())
    .unwrap();

    let keys: Vec<&String> = groups.keys().collect();
    assert_eq!(keys, vec!["A", "B", "C"]);
    assert_eq!(groups["A"], vec!["Apple", "Avocado", "Apricots"]);
    assert_eq!(groups["B"], vec!["Banana", "Blackberry"]);
    assert_eq!(groups["C"], vec!["Coconut", "Cherry"]);
}

#[test]
fn test_collect_to_other_containers() {
    let set: BTreeSet<i32> = LazySequence::from_values(vec![3, 1, 3, 2])
        .collect_to()
        .unwrap();
    assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);

    let joined: String = LazySequence::from_values(vec!['a', 'b', 'c'])
        .collect_to()
        .unwrap();
    assert_eq!(joined, "abc");
}

#[test]
fn test_count_sum_min_max() {
    let values = vec![4, 9, 1, 7, 1];
    assert_eq!(LazySequence::from_values(values.clone()).count().unwrap(), 5);
    assert_eq!(LazySequence::from_values(values.clone()).sum().unwrap(), 22);
    assert_eq!(LazySequence::from_values(values.clone()).min().unwrap(), Some(1));
    assert_eq!(LazySequence::from_values(values).max().unwrap(), Some(9));
    assert_eq!(LazySequence::<i32>::empty().max().unwrap(), None);
}

#[test]
fn test_min_max_by_comparator_keep_first_tie() {
    let words = vec!["pear", "fig", "plum", "kiwi", "date"];
    let shortest = LazySequence::from_values(words.clone())
        .min_by(|a: &&str, b: &&str| a.len().cmp(&b.len()))
        .unwrap();
    assert_eq!(shortest, Some("fig"));

    let longest = LazySequence::from_values(words)
        .max_by(|a: &&str, b: &&str| a.len().cmp(&b.len()))
        .unwrap();
    assert_eq!(longest, Some("pear"));
}

#[test]
fn test_average_by() {
    let avg = LazySequence::from_values(vec![1, 2, 3, 4])
        .average_by(|n: &i32| f64::from(*n))
        .unwrap();
    assert_eq!(avg, Some(2.5));
    assert_eq!(
        LazySequence::<i32>::empty()
            .average_by(|n: &i32| f64::from(*n))
            .unwrap(),
        None
    );
}

#[test]
fn test_match_terminals_short_circuit_on_generator() {
    assert!(LazySequence::naturals().any_match(|n: &u64| *n > 10).unwrap());
    assert!(!LazySequence::naturals().all_match(|n: &u64| *n < 10).unwrap());
    assert!(LazySequence::from_values(vec![1, 3, 5])
        .none_match(|n: &i32| n % 2 == 0)
        .unwrap());
}

#[test]
fn test_find_first() {
    let first = LazySequence::fibonacci()
        .filter(|n: &u64| *n > 20)
        .find_first()
        .unwrap();
    assert_eq!(first, Some(21));
    assert_eq!(LazySequence::<i32>::empty().find_first().unwrap(), None);
}

#[test]
fn test_unbounded_aggregations_fail_fast() {
    assert!(matches!(
        LazySequence::naturals().sum(),
        Err(SeqError::Usage(_))
    ));
    assert!(matches!(
        LazySequence::naturals().group_by(|n: &u64| n % 2),
        Err(SeqError::Usage(_))
    ));
    assert!(matches!(
        LazySequence::naturals().reduce(0, |a: u64, b: u64| a + b),
        Err(SeqError::Usage(_))
    ));
}

#[test]
fn test_raw_iteration_yields_results() {
    let mut it = LazySequence::from_values(vec!["7", "x"])
        .try_map(|s: &str| -> SeqResult<i32> { Ok(s.parse::<i32>()?) })
        .into_iter();
    assert_eq!(it.next().unwrap().unwrap(), 7);
    assert!(it.next().unwrap().is_err());
    assert!(it.next().is_none());
}
