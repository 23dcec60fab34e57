//! # jresults - Main Entry Point
//!
//! The binary runs one synchronous pipeline per invocation:
//!
//! 1. **Initialize logging**: coloured stderr output, optionally mirrored to a file
//! 2. **Parse arguments**: flags and `JRES_*` environment variables
//! 3. **Dispatch**: `ingest` decodes, aggregates, reports and saves a run;
//!    `list` and `show` read the stored history
//!
//! Store open failures are fatal and reported; nothing is retried.

use anyhow::{Context, Result};
use clap::Parser;
use jresults::{
    aggregate,
    cli::{Args, Command},
    logging,
    report::{KeyListing, ReportTable},
    sample, ResultStore, BUILD_STAMP, GIT_HASH, VERSION,
};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

fn main() -> Result<()> {
    let args = Args::parse();

    // Held until exit so the file writer can flush.
    let _log_guard = logging::init(args.verbose, args.log_file.as_deref())?;
    debug!("Configuration: {:?}", args);

    match &args.command {
        Command::Ingest {
            csv,
            json_output,
            quiet,
        } => ingest(
            &args.db_path(),
            csv,
            json_output.as_deref(),
            *quiet,
            &mut std::io::stdout().lock(),
        ),
        Command::List => list(&args.db_path()),
        Command::Show { key } => show(&args.db_path(), key),
        Command::Version => {
            println!("    Version: {}", VERSION);
            println!("Build Stamp: {}", BUILD_STAMP);
            println!("   Git Hash: {}", GIT_HASH);
            Ok(())
        }
    }
}

fn open_store(db: &Path) -> Result<ResultStore> {
    ResultStore::open(db).with_context(|| format!("Failed to open result store {:?}", db))
}

/// Decode, aggregate and save one run. The report is written to `out` only
/// once the run is stored.
fn ingest<W: Write>(
    db: &Path,
    csv: &Path,
    json_output: Option<&Path>,
    quiet: bool,
    out: &mut W,
) -> Result<()> {
    info!("Reading samples from {:?}", csv);
    let samples =
        sample::read_samples(csv).with_context(|| format!("Failed to read samples from {:?}", csv))?;

    let result = aggregate(&samples).context("Failed to aggregate samples")?;
    info!(
        "Aggregated {} samples into {} labels",
        result.totals.samples,
        result.groups.len()
    );
    if tracing::enabled!(tracing::Level::DEBUG) {
        debug!("json:\n{}", result.groups_json()?);
    }

    if let Some(path) = json_output {
        result
            .write_json(path)
            .with_context(|| format!("Failed to write {:?}", path))?;
    }

    let store = open_store(db)?;
    store
        .upsert(&result)
        .with_context(|| format!("Failed to save run {}", result.key()))?;

    info!("Run {} saved to {:?}", result.key(), db);

    if !quiet {
        write!(out, "{}", ReportTable::new(&result))?;
    }
    Ok(())
}

fn list(db: &Path) -> Result<()> {
    let store = open_store(db)?;
    let keys = store.list_keys().context("Failed to list stored runs")?;
    print!("{}", KeyListing::new(&keys));
    Ok(())
}

fn show(db: &Path, key: &str) -> Result<()> {
    let store = open_store(db)?;
    let result = store
        .get(key)
        .with_context(|| format!("Failed to load run {}", key))?;
    print!("{}", ReportTable::new(&result));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    const JTL: &str = "timeStamp,elapsed,label,success\n1709287200123,100,Home,true\n1709287201001,50,Login,false\n";

    fn jtl_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(JTL.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_ingest_reports_after_save() {
        let jtl = jtl_file();
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("jresults.db");
        let mut out = Vec::new();

        ingest(&db, jtl.path(), None, false, &mut out).unwrap();

        let report = String::from_utf8(out).unwrap();
        assert!(report.contains("2024-03-01T10:00:00Z"));
        assert!(report.contains("Login"));
        let store = ResultStore::open(&db).unwrap();
        assert_eq!(store.list_keys().unwrap(), vec!["2024-03-01T10:00:00Z"]);
    }

    #[test]
    fn test_ingest_failed_save_prints_nothing() {
        let jtl = jtl_file();
        // A regular file cannot hold a database directory.
        let blocker = NamedTempFile::new().unwrap();
        let db = blocker.path().join("jresults.db");
        let mut out = Vec::new();

        assert!(ingest(&db, jtl.path(), None, false, &mut out).is_err());
        assert!(out.is_empty());
    }
}
