use std::error::Error;
use std::io::Write;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use signal_hook::consts::TERM_SIGNALS;

use ::mysql_sniffer::{Config, Dispatcher, SortKey};

#[derive(Parser)]
#[clap(name = "mysql-sniffer", about = "Passive MySQL query sniffer")]
struct Opts {
    /// MySQL TCP port
    #[clap(short = 'P', default_value_t = 3306)]
    port: u16,

    /// Interface to sniff
    #[clap(short = 'i', default_value = "eth0")]
    interface: String,

    /// Unsanitized -- do not canonicalize queries
    #[clap(short = 'u')]
    unsanitized: bool,

    /// Seconds between status reports
    #[clap(short = 't', default_value_t = 10)]
    period: u64,

    /// Rows per status report
    #[clap(short = 'd', default_value_t = 15)]
    display: usize,

    /// Print every request inline (spammy)
    #[clap(short = 'v')]
    verbose: bool,

    /// Leave queries printed with -v uncanonicalized
    #[clap(short = 'n')]
    no_clean: bool,

    /// Aggregation key format; #s source, #i source ip, #r route, #q query
    #[clap(short = 'f', default_value = "#s:#q")]
    format: String,

    /// Sort status rows by this value
    #[clap(short = 's', arg_enum, default_value = "count")]
    sort: SortKey,

    /// Minimum queries per second to include a row
    #[clap(short = 'c', default_value_t = 0)]
    cutoff: u64,
}

fn main() -> Result<(), Box<dyn Error>> {
    let opts = Opts::parse();
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")?
        .log_to_stderr()
        .format(|w, _now, record| write!(w, "{}", record.args()))
        .start()?;

    let terminated = Arc::new(AtomicBool::new(false));
    for signal in TERM_SIGNALS {
        signal_hook::flag::register(*signal, terminated.clone())?;
    }

    let config = Config {
        port: opts.port,
        interface: opts.interface,
        unsanitized: opts.unsanitized,
        period: Duration::from_secs(opts.period),
        display_rows: opts.display,
        verbose: opts.verbose,
        no_clean: opts.no_clean,
        key_format: opts.format,
        sort: opts.sort,
        min_qps: opts.cutoff,
    };
    Dispatcher::new(config)?.run(terminated)?;
    Ok(())
}
