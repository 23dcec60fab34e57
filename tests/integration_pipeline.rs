use anyhow::Result;
use jresults::{aggregate, sample, ResultStore, RunResult, StatsError};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const JTL: &str = "\
timeStamp,elapsed,label,responseCode,responseMessage,threadName,dataType,success,bytes,Latency
1709287200123,100,Home,200,OK,Thread Group 1-1,text,true,5120,40
1709287200456,200,Home,500,Internal Server Error,Thread Group 1-1,text,false,312,180
1709287201001,50,Login,200,OK,Thread Group 1-2,text,true,870,20
";

/// Decode a JTL file, aggregate it, persist it and read it back.
#[test]
fn jtl_to_store_and_back() -> Result<()> {
    let mut jtl = NamedTempFile::new()?;
    jtl.write_all(JTL.as_bytes())?;

    let samples = sample::read_samples(jtl.path())?;
    let result = aggregate(&samples)?;

    assert_eq!(result.key(), "2024-03-01T10:00:00Z");
    let labels: Vec<&str> = result.groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["Home", "Login"]);
    assert_eq!(result.totals.samples, 3);

    let dir = TempDir::new()?;
    let store = ResultStore::open(&dir.path().join("jresults.db"))?;
    store.upsert(&result)?;

    assert_eq!(store.list_keys()?, vec![result.key()]);
    assert_eq!(store.get(&result.key())?, result);
    Ok(())
}

/// The JSON export decodes to the same run that was stored.
#[test]
fn json_export_matches_store() -> Result<()> {
    let samples = sample::parse_samples(JTL.as_bytes())?;
    let result = aggregate(&samples)?;

    let export = NamedTempFile::new()?;
    result.write_json(export.path())?;
    let exported = RunResult::decode(&std::fs::read(export.path())?)?;

    let dir = TempDir::new()?;
    let store = ResultStore::open(&dir.path().join("jresults.db"))?;
    store.upsert(&result)?;

    assert_eq!(exported, store.get(&result.key())?);
    Ok(())
}

/// A header-only file has no samples and must not reach the store.
#[test]
fn empty_jtl_is_rejected() -> Result<()> {
    let samples = sample::parse_samples("timeStamp,elapsed,label,success\n".as_bytes())?;
    assert!(samples.is_empty());
    assert!(matches!(aggregate(&samples), Err(StatsError::EmptyInput)));
    Ok(())
}
