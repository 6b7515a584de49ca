use chrono::{Datelike, NaiveDate, Weekday};
use clap::{Parser, Subcommand};
use seqflow_api::sequence::PSequence;
use seqflow_common::config::{Configuration, MODE_KEY, PARALLELISM_KEY};
use seqflow_common::error::{SeqError, SeqResult};
use seqflow_runtime::env::Environment;
use seqflow_runtime::observability::init_tracing;
use seqflow_runtime::sequence::LazySequence;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Debug;

#[derive(Debug, Parser)]
#[command(name = "seqflow", about = "Run lazy sequence pipelines")]
struct Args {
    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Worker threads for the parallel sort; 0 keeps it sequential.
    #[arg(long, global = true, default_value_t = 0)]
    parallelism: usize,

    #[arg(long, global = true, default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// First natural numbers, starting at 1.
    Naturals {
        #[arg(long, default_value_t = 20)]
        count: usize,
    },
    /// First Fibonacci numbers, starting at 1, 1.
    Fibonacci {
        #[arg(long, default_value_t = 10)]
        count: usize,
    },
    /// Saturdays and Sundays among the days following a start date.
    Weekends {
        #[arg(long, default_value = "2021-01-01")]
        start: String,
        #[arg(long, default_value_t = 31)]
        days: usize,
    },
    /// Parse yyyy-MM-dd dates, ignoring any spaces inside them.
    Dates { inputs: Vec<String> },
    /// Group words by their first letter.
    Group { words: Vec<String> },
    /// Fold key=value entries into one map; later keys win.
    Config { entries: Vec<String> },
    /// Sort words, optionally ignoring case.
    Sort {
        words: Vec<String>,
        #[arg(long)]
        ignore_case: bool,
    },
    /// Split text on a regular expression.
    Split {
        text: String,
        #[arg(long, default_value = r"\s+")]
        pattern: String,
    },
}

fn emit<S: Serialize + Debug>(json: bool, value: &S) -> SeqResult<()> {
    if json {
        let out = serde_json::to_string(value)
            .map_err(|e| SeqError::Internal(format!("encode json: {e}")))?;
        println!("{out}");
    } else {
        println!("{value:?}");
    }
    Ok(())
}

fn parse_date(text: &str) -> SeqResult<NaiveDate> {
    Ok(NaiveDate::parse_from_str(text, "%Y-%m-%d")?)
}

fn split_entry(entry: String) -> SeqResult<(String, String)> {
    entry
        .split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| SeqError::Parse(format!("expected key=value, got {entry:?}")))
}

fn environment(parallelism: usize) -> SeqResult<Environment> {
    let mut config = Configuration::new();
    if parallelism > 0 {
        config.put(MODE_KEY, "parallel");
        config.put(PARALLELISM_KEY, parallelism.to_string());
    }
    Environment::from_config(config)
}

fn sort_words(words: Vec<String>, ignore_case: bool, env: &Environment) -> SeqResult<Vec<String>> {
    let compare = move |a: &String, b: &String| {
        if ignore_case {
            a.to_lowercase().cmp(&b.to_lowercase())
        } else {
            a.cmp(b)
        }
    };
    let words = LazySequence::from_values(words);
    if env.parallelism()? > 0 {
        Ok(words.parallel_in(env)?.sorted_by(compare).collect())
    } else {
        words.sorted_by(compare).collect()
    }
}

fn run(args: Args) -> SeqResult<()> {
    let env = environment(args.parallelism)?;
    tracing::debug!(mode = %env.mode, "environment ready");

    match args.command {
        Command::Naturals { count } => {
            let values = LazySequence::naturals().limit(count).collect()?;
            emit(args.json, &values)
        }
        Command::Fibonacci { count } => {
            let values = LazySequence::fibonacci().limit(count).collect()?;
            emit(args.json, &values)
        }
        Command::Weekends { start, days } => {
            let start = parse_date(start.trim())?;
            let weekends = LazySequence::calendar_days(start)
                .limit(days)
                .filter(|d: &NaiveDate| matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
                .collect()?;
            emit(args.json, &weekends)
        }
        Command::Dates { inputs } => {
            let dates = LazySequence::from_values(inputs)
                .map(|s: String| s.replace(' ', ""))
                .try_map(|s: String| parse_date(&s))
                .collect()?;
            emit(args.json, &dates)
        }
        Command::Group { words } => {
            let groups = LazySequence::from_values(words)
                .filter(|w: &String| !w.trim().is_empty())
                .group_by(|w: &String| w.chars().take(1).collect::<String>())?;
            emit(args.json, &groups)
        }
        Command::Config { entries } => {
            let map = LazySequence::from_values(entries)
                .try_map(split_entry)
                .fold(BTreeMap::new(), |mut map, (k, v)| {
                    map.insert(k, v);
                    map
                })?;
            emit(args.json, &map)
        }
        Command::Sort { words, ignore_case } => {
            let sorted = sort_words(words, ignore_case, &env)?;
            emit(args.json, &sorted)
        }
        Command::Split { text, pattern } => {
            let pieces = LazySequence::split(&text, &pattern)?.collect()?;
            emit(args.json, &pieces)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(&args.log);
    run(args)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_entry_splits_on_first_equals() {
        assert_eq!(
            split_entry("url=a=b".to_string()).unwrap(),
            ("url".to_string(), "a=b".to_string())
        );
        assert!(split_entry("debug".to_string()).unwrap_err().is_parse());
    }

    #[test]
    fn test_sort_words_same_in_both_modes() {
        let words: Vec<String> = ["Orange", "apple", "Banana"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let sequential = sort_words(words.clone(), true, &environment(0).unwrap()).unwrap();
        let parallel = sort_words(words, true, &environment(2).unwrap()).unwrap();
        assert_eq!(sequential, vec!["apple", "Banana", "Orange"]);
        assert_eq!(parallel, sequential);
    }
}
