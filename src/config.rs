use std::time::Duration;

use clap::ArgEnum;

use crate::common::consts::DEFAULT_MYSQL_PORT;

/// Value a status row is ordered by. Rows are displayed highest-first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ArgEnum)]
pub enum SortKey {
    Count,
    Max,
    Avg,
    #[clap(name = "maxbytes")]
    MaxBytes,
    #[clap(name = "avgbytes")]
    AvgBytes,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub interface: String,
    /// Emit raw (escaped) query bytes as the QUERY token instead of the
    /// canonicalized form.
    pub unsanitized: bool,
    pub period: Duration,
    pub display_rows: usize,
    /// Print every request inline and disable periodic reports.
    pub verbose: bool,
    /// Leave inline-printed queries uncanonicalized.
    pub no_clean: bool,
    pub key_format: String,
    pub sort: SortKey,
    /// Rows below this many queries per second are left out of reports.
    pub min_qps: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_MYSQL_PORT,
            interface: "eth0".to_string(),
            unsanitized: false,
            period: Duration::from_secs(10),
            display_rows: 15,
            verbose: false,
            no_clean: false,
            key_format: "#s:#q".to_string(),
            sort: SortKey::Count,
            min_qps: 0,
        }
    }
}
