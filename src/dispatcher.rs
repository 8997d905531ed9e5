use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{info, warn};
use pcap::{Active, Capture};

use crate::collector::report;
use crate::common::consts::CAPTURE_SNAP_LEN;
use crate::common::meta_packet::MetaPacket;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::flow_generator::{FlowContext, FlowMap};

const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Owns the capture handle and drives the single-threaded loop:
/// capture, decode, inject into the flow table, and report on a
/// wall-clock cadence in between packets.
pub struct Dispatcher {
    config: Config,
    capture: Capture<Active>,
    flow_map: FlowMap,
    ctx: FlowContext,
    start: Instant,
    last_report: Instant,
}

impl Dispatcher {
    pub fn new(config: Config) -> Result<Self> {
        info!(
            "Initializing MySQL sniffing on {}:{}...",
            config.interface, config.port
        );
        let mut capture = Capture::from_device(config.interface.as_str())?
            .promisc(true)
            .snaplen(CAPTURE_SNAP_LEN as i32)
            .timeout(POLL_TIMEOUT.as_millis() as i32)
            .open()?;
        capture.filter(&format!("tcp port {}", config.port), true)?;

        let flow_map = FlowMap::new(config.port);
        let ctx = FlowContext::new(&config);
        let now = Instant::now();
        Ok(Dispatcher {
            config,
            capture,
            flow_map,
            ctx,
            start: now,
            last_report: now,
        })
    }

    /// Consumes packets until `terminated` is set. Only the capture
    /// source blocks; everything else runs inline between packets.
    pub fn run(&mut self, terminated: Arc<AtomicBool>) -> Result<()> {
        while !terminated.load(Ordering::Relaxed) {
            let packet = match self.capture.next() {
                Ok(packet) => packet,
                Err(pcap::Error::TimeoutExpired) => continue,
                Err(e) => return Err(e.into()),
            };
            let timestamp = Duration::new(
                packet.header.ts.tv_sec as u64,
                packet.header.ts.tv_usec as u32 * 1000,
            );
            match MetaPacket::from_ethernet(packet.data, timestamp, self.config.port) {
                Ok(Some(meta)) => self.flow_map.inject_meta_packet(&meta, &mut self.ctx),
                Ok(None) => (),
                Err(e @ Error::PortMismatch(..)) => return Err(e),
                Err(e) => {
                    warn!("dropping undecodable frame: {}", e);
                    continue;
                }
            }
            self.maybe_report();
        }
        Ok(())
    }

    /// Reports are checked opportunistically at request-count boundaries
    /// so idle flows cost nothing.
    fn maybe_report(&mut self) {
        if self.config.verbose {
            return;
        }
        if self.ctx.counter.queries % 1000 != 0 {
            return;
        }
        if self.last_report.elapsed() < self.config.period {
            return;
        }
        self.last_report = Instant::now();
        for line in report::status_report(
            &self.ctx,
            self.flow_map.len(),
            self.start.elapsed(),
            &self.config,
        ) {
            info!("{}", line);
        }
    }
}
