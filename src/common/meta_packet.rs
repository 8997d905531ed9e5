use std::net::Ipv4Addr;
use std::time::Duration;

use super::consts::*;
use super::FlowKey;
use crate::error::{Error, Result};
use crate::utils::bytes::read_u16_be;

/// The slice of a captured Ethernet II frame that the sniffer cares about:
/// IPv4 endpoints, TCP ports and the TCP payload.
#[derive(Debug)]
pub struct MetaPacket<'a> {
    pub src_ip: Ipv4Addr,
    pub dst_ip: Ipv4Addr,
    pub src_port: u16,
    pub dst_port: u16,
    pub timestamp: Duration,
    pub payload: &'a [u8],
}

impl<'a> MetaPacket<'a> {
    /// Decodes a raw frame as delivered by the capture source.
    ///
    /// Returns `Ok(None)` for frames without TCP payload. A frame whose
    /// ports both differ from `server_port` is a capture configuration
    /// error (the BPF filter should have excluded it) and is fatal.
    pub fn from_ethernet(
        frame: &'a [u8],
        timestamp: Duration,
        server_port: u16,
    ) -> Result<Option<Self>> {
        if frame.len() < ETH_HEADER_SIZE + IPV4_HEADER_SIZE_MIN + TCP_HEADER_SIZE_MIN {
            return Err(Error::TruncatedFrame(frame.len()));
        }
        let ip = &frame[ETH_HEADER_SIZE..];
        let ihl = ((ip[FIELD_OFFSET_IHL] & 0x0f) as usize) * 4;
        if ip.len() < ihl + TCP_HEADER_SIZE_MIN {
            return Err(Error::TruncatedFrame(frame.len()));
        }
        let src_ip = Ipv4Addr::new(
            ip[FIELD_OFFSET_SIP],
            ip[FIELD_OFFSET_SIP + 1],
            ip[FIELD_OFFSET_SIP + 2],
            ip[FIELD_OFFSET_SIP + 3],
        );
        let dst_ip = Ipv4Addr::new(
            ip[FIELD_OFFSET_DIP],
            ip[FIELD_OFFSET_DIP + 1],
            ip[FIELD_OFFSET_DIP + 2],
            ip[FIELD_OFFSET_DIP + 3],
        );

        let tcp = &ip[ihl..];
        let src_port = read_u16_be(&tcp[FIELD_OFFSET_SPORT..]);
        let dst_port = read_u16_be(&tcp[FIELD_OFFSET_DPORT..]);
        let data_offset = ((tcp[FIELD_OFFSET_TCP_DATAOFF] >> 4) as usize) * 4;
        if tcp.len() < data_offset {
            return Err(Error::TruncatedFrame(frame.len()));
        }
        if src_port != server_port && dst_port != server_port {
            return Err(Error::PortMismatch(src_port, dst_port));
        }

        let payload = &tcp[data_offset..];
        if payload.is_empty() {
            return Ok(None);
        }
        Ok(Some(MetaPacket {
            src_ip,
            dst_ip,
            src_port,
            dst_port,
            timestamp,
            payload,
        }))
    }

    pub fn direction(&self, server_port: u16) -> super::PacketDirection {
        if self.dst_port == server_port {
            super::PacketDirection::ClientToServer
        } else {
            super::PacketDirection::ServerToClient
        }
    }

    /// The remote endpoint, shared by both directions of a connection.
    pub fn flow_key(&self, server_port: u16) -> FlowKey {
        if self.dst_port == server_port {
            FlowKey {
                ip: self.src_ip,
                port: self.src_port,
            }
        } else {
            FlowKey {
                ip: self.dst_ip,
                port: self.dst_port,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PacketDirection;

    fn build_frame(
        src_ip: [u8; 4],
        src_port: u16,
        dst_ip: [u8; 4],
        dst_port: u16,
        payload: &[u8],
    ) -> Vec<u8> {
        let mut frame = vec![0u8; ETH_HEADER_SIZE];
        frame[12] = 0x08; // EtherType IPv4

        let mut ip = vec![0u8; IPV4_HEADER_SIZE_MIN];
        ip[0] = 0x45;
        ip[FIELD_OFFSET_SIP..FIELD_OFFSET_SIP + 4].copy_from_slice(&src_ip);
        ip[FIELD_OFFSET_DIP..FIELD_OFFSET_DIP + 4].copy_from_slice(&dst_ip);
        frame.extend_from_slice(&ip);

        let mut tcp = vec![0u8; TCP_HEADER_SIZE_MIN];
        tcp[FIELD_OFFSET_SPORT..FIELD_OFFSET_SPORT + 2].copy_from_slice(&src_port.to_be_bytes());
        tcp[FIELD_OFFSET_DPORT..FIELD_OFFSET_DPORT + 2].copy_from_slice(&dst_port.to_be_bytes());
        tcp[FIELD_OFFSET_TCP_DATAOFF] = 0x50;
        frame.extend_from_slice(&tcp);

        frame.extend_from_slice(payload);
        frame
    }

    #[test]
    fn decode_request_frame() {
        let frame = build_frame([10, 0, 0, 5], 44321, [192, 168, 1, 1], 3306, b"hello");
        let meta = MetaPacket::from_ethernet(&frame, Duration::from_secs(1), 3306)
            .unwrap()
            .unwrap();
        assert_eq!(meta.src_ip, Ipv4Addr::new(10, 0, 0, 5));
        assert_eq!(meta.dst_ip, Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(meta.src_port, 44321);
        assert_eq!(meta.dst_port, 3306);
        assert_eq!(meta.payload, b"hello");
        assert_eq!(meta.direction(3306), PacketDirection::ClientToServer);
        assert_eq!(
            meta.flow_key(3306),
            FlowKey {
                ip: Ipv4Addr::new(10, 0, 0, 5),
                port: 44321,
            }
        );
    }

    #[test]
    fn response_shares_flow_key() {
        let frame = build_frame([192, 168, 1, 1], 3306, [10, 0, 0, 5], 44321, b"\x01");
        let meta = MetaPacket::from_ethernet(&frame, Duration::from_secs(1), 3306)
            .unwrap()
            .unwrap();
        assert_eq!(meta.direction(3306), PacketDirection::ServerToClient);
        assert_eq!(
            meta.flow_key(3306),
            FlowKey {
                ip: Ipv4Addr::new(10, 0, 0, 5),
                port: 44321,
            }
        );
    }

    #[test]
    fn empty_payload_is_not_interesting() {
        let frame = build_frame([10, 0, 0, 5], 44321, [192, 168, 1, 1], 3306, b"");
        assert!(MetaPacket::from_ethernet(&frame, Duration::ZERO, 3306)
            .unwrap()
            .is_none());
    }

    #[test]
    fn foreign_ports_are_fatal() {
        let frame = build_frame([10, 0, 0, 5], 44321, [192, 168, 1, 1], 8080, b"x");
        assert!(matches!(
            MetaPacket::from_ethernet(&frame, Duration::ZERO, 3306),
            Err(Error::PortMismatch(44321, 8080))
        ));
    }

    #[test]
    fn runt_frame_is_an_error() {
        assert!(matches!(
            MetaPacket::from_ethernet(&[0u8; 20], Duration::ZERO, 3306),
            Err(Error::TruncatedFrame(20))
        ));
    }
}
