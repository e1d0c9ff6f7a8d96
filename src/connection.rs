use std::io::{self, ErrorKind};

use net::{PacketDecoder, PacketEncode, PacketEncoder, PacketFrame};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::tcp::{OwnedReadHalf, OwnedWriteHalf},
};

const MAX_CHUNK_SIZE: usize = 1024;

/// Framed read half of a client socket. Owned by the session's reader task;
/// reads are single-consumer by construction.
pub struct PacketReader {
    read: OwnedReadHalf,
    dec: PacketDecoder,
}

impl PacketReader {
    pub fn new(read: OwnedReadHalf) -> Self {
        Self {
            read,
            dec: PacketDecoder::new(),
        }
    }

    pub async fn next_frame(&mut self) -> anyhow::Result<PacketFrame> {
        loop {
            if let Some(frame) = self.dec.try_next_packet()? {
                return Ok(frame);
            }

            let mut buf = [0u8; MAX_CHUNK_SIZE];
            let n = self.read.read(&mut buf).await?;
            if n == 0 {
                return Err(io::Error::from(ErrorKind::UnexpectedEof).into());
            }
            self.dec.queue_slice(&buf[..n]);
        }
    }
}

/// Framed write half of a client socket. Broadcasters on other sessions'
/// tasks write here too, so the owner keeps it behind a lock.
pub struct PacketWriter {
    write: OwnedWriteHalf,
    enc: PacketEncoder,
}

impl PacketWriter {
    pub fn new(write: OwnedWriteHalf) -> Self {
        Self {
            write,
            enc: PacketEncoder::new(),
        }
    }

    /// Encodes and flushes one packet as a single contiguous write.
    pub async fn send<P: PacketEncode>(&mut self, pkt: &P) -> anyhow::Result<()> {
        self.enc.write_packet(pkt)?;
        let bytes = self.enc.take();
        self.write.write_all(&bytes).await?;
        self.write.flush().await?;
        Ok(())
    }

    /// Half-closes the socket. The peer observes EOF; errors are moot here.
    pub async fn shutdown(&mut self) {
        let _ = self.write.shutdown().await;
    }
}
