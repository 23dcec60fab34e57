use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// jresults - aggregate JMeter results and keep a history of runs
#[derive(Parser, Debug, Clone)]
#[clap(version, about, long_about = None)]
pub struct Args {
    /// Result store location ("~" expands to the home directory)
    #[clap(long, env = "JRES_DB", default_value = crate::defaults::DB_FILE, global = true)]
    pub db: PathBuf,

    /// Turn on debugging output
    #[clap(short = 'v', long, env = "JRES_VERBOSE", default_value_t = false, global = true)]
    pub verbose: bool,

    /// Also write logs to this file (uncoloured)
    #[clap(long, env = "JRES_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Aggregate a JTL (CSV) file, print the report and save the run
    Ingest {
        /// JTL file (CSV) with the results to parse
        #[clap(long, env = "JRES_CSV")]
        csv: PathBuf,

        /// Also write the aggregated run as JSON to this file
        #[clap(long)]
        json_output: Option<PathBuf>,

        /// Skip printing the report table
        #[clap(short = 'q', long, default_value_t = false)]
        quiet: bool,
    },

    /// List the keys of every stored run
    List,

    /// Print a stored run
    Show {
        /// Run key, e.g. 2024-03-01T10:00:00Z
        key: String,
    },

    /// Provide build information
    Version,
}

impl Args {
    /// Store path with a leading `~` replaced by `$HOME`.
    pub fn db_path(&self) -> PathBuf {
        expand_tilde(&self.db, std::env::var_os("HOME").map(PathBuf::from))
    }
}

/// Replace a leading `~` component with `home`. Paths without one, or with no
/// home directory available, are returned unchanged.
pub fn expand_tilde(path: &Path, home: Option<PathBuf>) -> PathBuf {
    let Some(home) = home else {
        return path.to_path_buf();
    };
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
