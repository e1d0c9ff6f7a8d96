use net::ProtoError;

/// Failure of a single client session. Never escapes to other sessions;
/// every variant converges on removal of the offending player.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("unsupported protocol version {0} (se::pv)")]
    WrongProtocolVersion(i32),
    #[error("protocol error - {0} (se::pe)")]
    Protocol(#[from] ProtoError),
    #[error("networking error - {0:?} (se::ne)")]
    Io(#[from] std::io::Error),
}
