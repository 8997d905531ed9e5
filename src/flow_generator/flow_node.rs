use std::time::Duration;

use log::{debug, info};

use super::FlowContext;
use crate::collector::Reservoir;
use crate::common::{FlowKey, PacketDirection};
use crate::mysql::consts::MysqlCommand;
use crate::mysql::{self, obfuscate, MysqlFrame};

/// Per-flow stream state. A flow starts unsynced and locks onto the MySQL
/// framing at the first complete query request it observes; from then on
/// requests are paired with the first following response packet to
/// measure latency.
pub struct FlowNode {
    key: FlowKey,
    synced: bool,
    req_buffer: Vec<u8>,
    res_buffer: Vec<u8>,
    req_sent_at: Option<Duration>,
    cur_key: Option<String>,
    cur_bytes: u64,
    cur_agg: Option<usize>,
    pub times: Reservoir,
}

impl FlowNode {
    pub fn new(key: FlowKey) -> Self {
        FlowNode {
            key,
            synced: false,
            req_buffer: Vec::new(),
            res_buffer: Vec::new(),
            req_sent_at: None,
            cur_key: None,
            cur_bytes: 0,
            cur_agg: None,
            times: Reservoir::new(),
        }
    }

    pub fn handle(
        &mut self,
        direction: PacketDirection,
        payload: &[u8],
        timestamp: Duration,
        ctx: &mut FlowContext,
    ) {
        ctx.counter.rx += 1;
        if self.synced {
            ctx.counter.rx_on_sync += 1;
        }
        match direction {
            PacketDirection::ClientToServer => self.handle_request(payload, timestamp, ctx),
            PacketDirection::ServerToClient => self.handle_response(payload, timestamp, ctx),
        }
    }

    fn handle_request(&mut self, payload: &[u8], timestamp: Duration, ctx: &mut FlowContext) {
        if !self.res_buffer.is_empty() {
            // pipelined or lost response, the framing assumption is gone
            debug!("[{}] stale response bytes on a new request, resetting", self.key);
            ctx.counter.desyncs += 1;
            self.req_buffer.clear();
            self.res_buffer.clear();
            self.synced = false;
        }
        self.req_buffer.clear();
        self.req_buffer.extend_from_slice(payload);
        let frame = mysql::carve_frame(&mut self.req_buffer);

        if !self.synced {
            match &frame {
                Some(frame) if frame.command == MysqlCommand::Query => self.synced = true,
                _ => {
                    if let Some(frame) = &frame {
                        debug!(
                            "[{}] ignoring {} while waiting for a query to sync on",
                            self.key,
                            MysqlCommand::name(frame.command),
                        );
                    }
                    self.req_buffer.clear();
                    self.res_buffer.clear();
                    return;
                }
            }
        }
        match frame {
            Some(frame) => self.on_request_frame(frame, timestamp, ctx),
            None => (), // need more bytes
        }
    }

    fn handle_response(&mut self, payload: &[u8], timestamp: Duration, ctx: &mut FlowContext) {
        // no reassembly of multi-packet responses; the whole payload is
        // the response event
        self.res_buffer.clear();
        if !self.synced {
            self.req_buffer.clear();
            return;
        }
        match self.req_sent_at.take() {
            Some(sent_at) => {
                let latency = timestamp.saturating_sub(sent_at).as_nanos() as u64;
                let slot = ctx.random_slot();
                self.times.record(slot, latency);
                ctx.global_times.record(slot, latency);
                if let Some(index) = self.cur_agg {
                    let entry = ctx.agg.get_mut(index);
                    entry.times.record(slot, latency);
                    entry.bytes += payload.len() as u64;
                }
            }
            None => {
                // late bytes still belong to the last request's bucket
                if let Some(index) = self.cur_agg {
                    ctx.agg.get_mut(index).bytes += payload.len() as u64;
                }
            }
        }
    }

    fn on_request_frame(&mut self, frame: MysqlFrame, timestamp: Duration, ctx: &mut FlowContext) {
        if self.req_sent_at.is_some() {
            debug!(
                "[{}] two requests with no response in between, losing timing of {:?}",
                self.key, self.cur_key,
            );
        }
        self.req_sent_at = Some(timestamp);
        ctx.counter.queries += 1;

        let query = if ctx.unsanitized {
            obfuscate::escape_raw(&frame.payload)
        } else {
            obfuscate::canonicalize(&frame.payload)
        };
        self.cur_bytes = frame.payload.len() as u64;
        if ctx.verbose {
            let display = if ctx.no_clean && !ctx.unsanitized {
                obfuscate::escape_raw(&frame.payload)
            } else {
                query.clone()
            };
            info!("{} {}B: {}", self.key, self.cur_bytes, display);
        }

        let key = ctx.key_format.build_key(&self.key, &frame.payload, &query);
        let index = ctx.agg.lookup_or_create(&key);
        let entry = ctx.agg.get_mut(index);
        entry.count += 1;
        entry.bytes += frame.payload.len() as u64;
        self.cur_key = Some(key);
        self.cur_agg = Some(index);
    }
}
