pub mod consts;
pub mod meta_packet;

use std::fmt;
use std::net::Ipv4Addr;

/// Identifies a client connection by its remote endpoint, i.e. the side
/// whose port is not the MySQL server port. Both directions of a
/// connection map to the same key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FlowKey {
    pub ip: Ipv4Addr,
    pub port: u16,
}

impl fmt::Display for FlowKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketDirection {
    ClientToServer,
    ServerToClient,
}
