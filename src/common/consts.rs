pub const ETH_HEADER_SIZE: usize = 14;
pub const IPV4_HEADER_SIZE_MIN: usize = 20;
pub const TCP_HEADER_SIZE_MIN: usize = 20;

pub const FIELD_OFFSET_IHL: usize = 0;
pub const FIELD_OFFSET_SIP: usize = 12;
pub const FIELD_OFFSET_DIP: usize = 16;
pub const FIELD_OFFSET_SPORT: usize = 0;
pub const FIELD_OFFSET_DPORT: usize = 2;
pub const FIELD_OFFSET_TCP_DATAOFF: usize = 12;

pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Whole frames for MTU-sized packets; larger requests never carve a full
/// MySQL frame and are dropped by the stream state machine.
pub const CAPTURE_SNAP_LEN: usize = 1600;
