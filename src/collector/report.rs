use std::time::Duration;

use chrono::Local;

use super::{AggEntry, LatencyStats};
use crate::config::{Config, SortKey};
use crate::flow_generator::FlowContext;

const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_CYAN: &str = "\x1b[36m";
const ANSI_RESET: &str = "\x1b[0m";

/// Renders one status block: a header with process-wide totals followed
/// by the top rows ordered by the configured sort key, highest first.
pub fn status_report(
    ctx: &FlowContext,
    streams: usize,
    elapsed: Duration,
    config: &Config,
) -> Vec<String> {
    let elapsed_secs = elapsed.as_secs_f64().max(1.0);
    let counter = &ctx.counter;
    let global = ctx.global_times.stats().unwrap_or(LatencyStats::ZERO);

    let mut lines = vec![
        String::new(),
        format!(
            "{}{}{} {} total queries, {:.2} per second{}",
            ANSI_BOLD,
            ANSI_CYAN,
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            counter.queries,
            counter.queries as f64 / elapsed_secs,
            ANSI_RESET,
        ),
        format!(
            "{} packets, {} on sync ({:.1}%), {} desyncs, {} streams",
            counter.rx,
            counter.rx_on_sync,
            counter.sync_ratio() * 100.0,
            counter.desyncs,
            streams,
        ),
        format!(
            "latency {} over {} samples, {} unique keys",
            global,
            global.samples,
            ctx.agg.len(),
        ),
    ];

    let mut rows: Vec<(f64, String)> = Vec::new();
    for entry in ctx.agg.iter() {
        let qps = entry.count as f64 / elapsed_secs;
        if qps < config.min_qps as f64 {
            continue;
        }
        let stats = entry.times.stats().unwrap_or(LatencyStats::ZERO);
        rows.push((
            sort_value(config.sort, entry, &stats),
            format!(
                "{:6}  {:6.2}/s  {}  {}B  {}",
                entry.count,
                qps,
                stats,
                entry.bytes / entry.count.max(1),
                entry.key,
            ),
        ));
    }
    rows.sort_by(|a, b| a.0.total_cmp(&b.0));
    lines.extend(
        rows.into_iter()
            .rev()
            .take(config.display_rows)
            .map(|(_, line)| line),
    );
    lines
}

fn sort_value(sort: SortKey, entry: &AggEntry, stats: &LatencyStats) -> f64 {
    match sort {
        SortKey::Count => entry.count as f64,
        SortKey::Avg => stats.avg as f64,
        SortKey::Max => stats.max as f64,
        SortKey::MaxBytes => entry.bytes as f64,
        SortKey::AvgBytes => (entry.bytes / entry.count.max(1)) as f64,
    }
}
