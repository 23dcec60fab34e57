use anyhow::Result;
use jresults::{aggregate, ResultStore, Sample, StatsError};
use std::thread;
use tempfile::TempDir;

fn run_starting_at(base_ms: i64, labels: &[&str]) -> jresults::RunResult {
    let samples: Vec<Sample> = (0..120)
        .map(|i| {
            let label = labels[i % labels.len()];
            Sample::new(base_ms + i as i64 * 25, (i as u64 * 13) % 97 + 5, label, i % 11 != 0)
        })
        .collect();
    aggregate(&samples).expect("non-empty input")
}

/// Several runs are kept side by side and listed chronologically.
#[test]
fn history_of_runs() -> Result<()> {
    let dir = TempDir::new()?;
    let store = ResultStore::open(&dir.path().join("history.db"))?;

    let runs = vec![
        run_starting_at(1_709_373_600_000, &["Home", "Search"]),
        run_starting_at(1_709_287_200_000, &["Home", "Login", "Checkout"]),
        run_starting_at(1_709_460_000_000, &["Login"]),
    ];
    for run in &runs {
        store.upsert(run)?;
    }

    let keys = store.list_keys()?;
    assert_eq!(
        keys,
        vec![
            "2024-03-01T10:00:00Z",
            "2024-03-02T10:00:00Z",
            "2024-03-03T10:00:00Z",
        ]
    );
    for run in &runs {
        assert_eq!(&store.get(&run.key())?, run);
    }
    Ok(())
}

/// Readers on other threads always see a complete record.
#[test]
fn concurrent_readers_see_whole_records() -> Result<()> {
    let dir = TempDir::new()?;
    let store = ResultStore::open(&dir.path().join("readers.db"))?;

    let first = run_starting_at(1_709_287_200_000, &["Home"]);
    let second = run_starting_at(1_709_287_200_400, &["Home", "Login"]);
    assert_eq!(first.key(), second.key());
    store.upsert(&first)?;

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            let key = first.key();
            let (first, second) = (first.clone(), second.clone());
            thread::spawn(move || {
                for _ in 0..50 {
                    let seen = store.get(&key).expect("stored run decodes");
                    assert!(seen == first || seen == second);
                }
            })
        })
        .collect();

    for _ in 0..10 {
        store.upsert(&second)?;
        store.upsert(&first)?;
    }
    for reader in readers {
        reader.join().expect("reader thread");
    }
    Ok(())
}

#[test]
fn missing_key_is_not_found() -> Result<()> {
    let dir = TempDir::new()?;
    let store = ResultStore::open(&dir.path().join("empty.db"))?;
    assert!(matches!(
        store.get("1999-12-31T23:59:59Z"),
        Err(StatsError::NotFound(_))
    ));
    assert!(store.list_keys()?.is_empty());
    Ok(())
}
