use std::collections::HashMap;

use super::flow_node::FlowNode;
use super::FlowContext;
use crate::common::meta_packet::MetaPacket;
use crate::common::FlowKey;

/// Keyed table of per-connection stream state. Streams are created on
/// first sight of their remote endpoint and live until process exit;
/// operators restart the sniffer periodically rather than rely on
/// eviction.
pub struct FlowMap {
    nodes: HashMap<FlowKey, FlowNode>,
    server_port: u16,
}

impl FlowMap {
    pub fn new(server_port: u16) -> Self {
        FlowMap {
            nodes: HashMap::new(),
            server_port,
        }
    }

    pub fn inject_meta_packet(&mut self, packet: &MetaPacket, ctx: &mut FlowContext) {
        let direction = packet.direction(self.server_port);
        let key = packet.flow_key(self.server_port);
        let node = self.nodes.entry(key).or_insert_with(|| FlowNode::new(key));
        node.handle(direction, packet.payload, packet.timestamp, ctx);
    }

    pub fn get(&self, key: &FlowKey) -> Option<&FlowNode> {
        self.nodes.get(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
