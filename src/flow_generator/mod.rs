pub mod flow_map;
pub mod flow_node;

pub use flow_map::FlowMap;
pub use flow_node::FlowNode;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::collector::format::KeyFormat;
use crate::collector::{Aggregator, PacketCounter, Reservoir, RESERVOIR_SIZE};
use crate::config::Config;

/// Process-wide mutable state threaded through the single-threaded packet
/// loop: the aggregation buckets, packet accounting, the global latency
/// reservoir and the slot RNG. Tests build a fresh context per scenario.
pub struct FlowContext {
    pub agg: Aggregator,
    pub counter: PacketCounter,
    pub global_times: Reservoir,
    pub key_format: KeyFormat,
    pub unsanitized: bool,
    pub verbose: bool,
    pub no_clean: bool,
    rng: SmallRng,
}

impl FlowContext {
    pub fn new(config: &Config) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// Deterministic variant for tests.
    pub fn with_rng(config: &Config, rng: SmallRng) -> Self {
        FlowContext {
            agg: Aggregator::new(),
            counter: PacketCounter::default(),
            global_times: Reservoir::new(),
            key_format: KeyFormat::compile(&config.key_format),
            unsanitized: config.unsanitized,
            verbose: config.verbose,
            no_clean: config.no_clean,
            rng,
        }
    }

    /// Uniform slot for the next latency sample. One draw is shared by
    /// the per-flow, per-key and global reservoirs so they stay mirrored.
    pub fn random_slot(&mut self) -> usize {
        self.rng.gen_range(0..RESERVOIR_SIZE)
    }
}
