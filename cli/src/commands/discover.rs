use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{Instrument, debug, warn};

use crate::mprint;
use crate::terminal::{print, spinner};
use srvsearch_common::config::Config;
use srvsearch_common::network::range::AddressSet;
use srvsearch_common::network::{interface, target::{self, AddressRangeSpec}};
use srvsearch_core::discovery::{ScanPipeline, ScanReport};
use srvsearch_core::network::{http::HttpHeaderReader, tcp::HandshakePinger};
use srvsearch_core::scanner::{IcmpPinger, Pinger};

pub async fn discover(specs: &[AddressRangeSpec], cfg: &Config) -> anyhow::Result<()> {
    let candidates: AddressSet = if specs.is_empty() {
        interface::local_candidates()?
    } else {
        target::expand(specs)
    };

    let pipeline = ScanPipeline::new(
        select_pinger(cfg),
        Arc::new(HttpHeaderReader::new(cfg.http_port, cfg.timeout)),
        cfg,
    );

    let start_time: Instant = Instant::now();
    let report: ScanReport = pipeline
        .run(&candidates)
        .instrument(spinner::discovery_span(candidates.len()))
        .await;

    discovery_ends(&report, start_time.elapsed(), cfg);
    Ok(())
}

/// ICMP needs a raw or ping socket; without one, fall back to connecting
/// to the HTTP port.
fn select_pinger(cfg: &Config) -> Arc<dyn Pinger> {
    match IcmpPinger::new() {
        Ok(pinger) => Arc::new(pinger),
        Err(e) => {
            let hint: &str = if is_root::is_root() { "" } else { " (not running as root)" };
            warn!("ICMP unavailable{hint}: {e}");
            warn!("Falling back to TCP handshake on port {}", cfg.http_port);
            Arc::new(HandshakePinger::new(cfg.http_port))
        }
    }
}

fn discovery_ends(report: &ScanReport, total_time: Duration, cfg: &Config) {
    if cfg.verbose {
        print_failures(report);
    }

    mprint!();
    print::header("Results");
    let mut lines = report_lines(report, total_time).into_iter();
    if let Some(summary) = lines.next() {
        print::centerln(&summary);
    }
    print::fat_separator();
    for line in lines {
        print::print(&line);
    }
}

/// The summary line, then one `http://` line per listed server.
fn report_lines(report: &ScanReport, total_time: Duration) -> Vec<String> {
    let mut lines: Vec<String> = vec![print::summary_line(
        report.total,
        report.reachable,
        report.responded,
        total_time,
    )];
    lines.extend(
        report
            .servers
            .iter()
            .map(|(addr, server)| print::server_line(*addr, server)),
    );
    lines
}

fn print_failures(report: &ScanReport) {
    let unreachable: usize = report.probes.iter().filter(|probe| !probe.reachable).count();
    debug!("{unreachable} addresses did not answer the ping");

    let mut by_kind: BTreeMap<&'static str, usize> = BTreeMap::new();
    for (_, result) in &report.headers {
        if let Err(e) = result {
            *by_kind.entry(e.kind().as_str()).or_default() += 1;
        }
    }
    for (kind, count) in by_kind {
        debug!("{count} header reads failed: {kind}");
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
