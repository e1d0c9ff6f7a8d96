use std::fmt::Display;

use super::{
    error::{ProtoError, Result, debug_log_error},
    varint::{read_varint, read_varint_partial, varint_len, write_varint},
};

/// Maximum packet length in bytes (protocol limit).
pub const MAX_PACKET_SIZE: usize = 2_097_152;

/// UUID stored as 16 raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uuid([u8; 16]);

impl Uuid {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn from_u64s(msb: u64, lsb: u64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&msb.to_be_bytes());
        bytes[8..].copy_from_slice(&lsb.to_be_bytes());
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    #[must_use]
    pub fn as_u64s(&self) -> (u64, u64) {
        let msb = u64::from_be_bytes(self.0[..8].try_into().unwrap());
        let lsb = u64::from_be_bytes(self.0[8..].try_into().unwrap());
        (msb, lsb)
    }

    /// The entity id clients use for this player's avatar: the first four
    /// bytes, big-endian.
    #[must_use]
    pub fn entity_id(&self) -> i32 {
        i32::from_be_bytes(self.0[..4].try_into().unwrap())
    }
}

impl Display for Uuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let b = &self.0;
        let part1 = u32::from_be_bytes(b[0..4].try_into().unwrap());
        let part2 = u16::from_be_bytes(b[4..6].try_into().unwrap());
        let part3 = u16::from_be_bytes(b[6..8].try_into().unwrap());
        let part4 = u16::from_be_bytes(b[8..10].try_into().unwrap());

        let mut last_bytes = [0u8; 8];
        last_bytes[2..].copy_from_slice(&b[10..16]);
        let part5 = u64::from_be_bytes(last_bytes) & 0xFFFF_FFFF_FFFF_u64;

        write!(
            f,
            "{part1:08x}-{part2:04x}-{part3:04x}-{part4:04x}-{part5:012x}"
        )
    }
}

/// Rotation in 1/256-turn steps, one byte on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Angle(u8);

impl Angle {
    pub const ZERO: Angle = Angle(0);

    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    /// `floor(deg / 360 * 256)`, wrapped into the byte range.
    #[must_use]
    pub fn from_degrees(degrees: f32) -> Self {
        Self((f64::from(degrees) / 360.0 * 256.0).floor() as i64 as u8)
    }

    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn to_degrees(self) -> f32 {
        f32::from(self.0) * 360.0 / 256.0
    }
}

/// Block position packed as x:26 | z:26 | y:12 into a big-endian u64,
/// x in the high bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i16,
    pub z: i32,
}

impl Position {
    const X_Z_BITS: u32 = 26;
    const Y_BITS: u32 = 12;

    #[must_use]
    pub fn pack(self) -> u64 {
        let x = (self.x as u64) & ((1 << Self::X_Z_BITS) - 1);
        let z = (self.z as u64) & ((1 << Self::X_Z_BITS) - 1);
        let y = (self.y as u64) & ((1 << Self::Y_BITS) - 1);
        (x << (Self::X_Z_BITS + Self::Y_BITS)) | (z << Self::Y_BITS) | y
    }

    #[must_use]
    pub fn unpack(value: u64) -> Self {
        Self {
            x: sign_extend(value >> (Self::X_Z_BITS + Self::Y_BITS), Self::X_Z_BITS) as i32,
            y: sign_extend(value, Self::Y_BITS) as i16,
            z: sign_extend(value >> Self::Y_BITS, Self::X_Z_BITS) as i32,
        }
    }
}

fn sign_extend(raw: u64, bits: u32) -> i64 {
    let value = (raw & ((1 << bits) - 1)) as i64;
    if value >= 1 << (bits - 1) {
        value - (1 << bits)
    } else {
        value
    }
}

/// Clientbound or serverbound packet body encoding.
pub trait PacketEncode {
    const ID: i32;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()>;
}

/// Clientbound or serverbound packet body decoding.
pub trait PacketDecode<'a>: Sized {
    const ID: i32;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self>;
}

/// Decoded packet frame with the raw body (without ID).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketFrame {
    pub id: i32,
    pub body: Vec<u8>,
}

impl PacketFrame {
    /// Decodes the body as packet `P`, rejecting leftover bytes. The caller
    /// is expected to have matched `self.id` against `P::ID` already.
    pub fn decode<'a, P: PacketDecode<'a>>(&'a self) -> Result<P> {
        let mut input = self.body.as_slice();
        let packet = P::decode_body(&mut input)?;
        if !input.is_empty() {
            return Err(ProtoError::TrailingBytes(input.len()));
        }
        Ok(packet)
    }
}

/// Packet decoder for length-prefixed frames. Bytes are queued as they
/// arrive off the socket; frames come out once complete.
#[derive(Default)]
pub struct PacketDecoder {
    buf: Vec<u8>,
}

impl PacketDecoder {
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn queue_slice(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn try_next_packet(&mut self) -> Result<Option<PacketFrame>> {
        let data = self.buf.as_slice();
        let (packet_len, len_len) = match read_varint_partial(data) {
            Ok(Some(value)) => value,
            Ok(None) => return Ok(None),
            Err(err) => {
                debug_log_error("packet length varint decode failed", &err);
                return Err(err);
            }
        };

        if packet_len < 1 {
            let err = ProtoError::InvalidLength(packet_len);
            debug_log_error("packet length too small", &err);
            return Err(err);
        }

        let packet_len = packet_len as usize;
        if packet_len > MAX_PACKET_SIZE {
            let err = ProtoError::PacketTooLarge { len: packet_len };
            debug_log_error("packet too large", &err);
            return Err(err);
        }

        let total_len = len_len + packet_len;
        if data.len() < total_len {
            return Ok(None);
        }

        let mut body = &data[len_len..total_len];
        let id = match read_varint(&mut body) {
            Ok(value) => value,
            Err(err) => {
                debug_log_error("packet id varint decode failed", &err);
                return Err(err);
            }
        };
        let body_vec = body.to_vec();

        self.buf.drain(..total_len);

        Ok(Some(PacketFrame { id, body: body_vec }))
    }
}

/// Packet encoder for length-prefixed frames.
#[derive(Default)]
pub struct PacketEncoder {
    buf: Vec<u8>,
    scratch: Vec<u8>,
}

impl PacketEncoder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            scratch: Vec::new(),
        }
    }

    pub fn write_packet<P: PacketEncode>(&mut self, pkt: &P) -> Result<()> {
        self.scratch.clear();
        pkt.encode_body(&mut self.scratch)?;
        encode_raw_packet(&mut self.buf, P::ID, &self.scratch)
    }

    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }
}

pub fn encode_packet<P: PacketEncode>(out: &mut Vec<u8>, pkt: &P) -> Result<()> {
    let mut body = Vec::new();
    pkt.encode_body(&mut body)?;
    encode_raw_packet(out, P::ID, &body)
}

pub fn encode_raw_packet(out: &mut Vec<u8>, id: i32, body: &[u8]) -> Result<()> {
    let packet_len = varint_len(id) + body.len();
    if packet_len > MAX_PACKET_SIZE {
        return Err(ProtoError::PacketTooLarge { len: packet_len });
    }

    write_varint(out, packet_len as i32);
    write_varint(out, id);
    out.extend_from_slice(body);
    Ok(())
}
