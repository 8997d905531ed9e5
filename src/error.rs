use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("pcap: {0}")]
    Capture(#[from] pcap::Error),
    #[error("frame truncated at {0} bytes")]
    TruncatedFrame(usize),
    #[error("ports {0}/{1} do not match the MySQL port, check the capture filter")]
    PortMismatch(u16, u16),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
