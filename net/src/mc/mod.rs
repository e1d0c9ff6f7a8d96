//! Minecraft Java Edition protocol 754 (1.16.5), cleartext, uncompressed.

pub mod error;
pub mod io;
pub mod packets;
pub mod state;
#[cfg(test)]
mod tests;
pub mod types;
pub mod varint;

pub use error::ProtoError;
pub use packets::{
    AnimationC2s, ChatMessageC2s, ChatMessageS2c, ChunkDataS2c, DestroyEntitiesS2c,
    EntityActionC2s, EntityAnimationS2c, EntityHeadLookS2c, EntityMetadataS2c, EntityRotationS2c,
    EntityTeleportS2c, HandshakeC2s, JoinGameS2c, KeepAliveResponseC2s, KeepAliveS2c,
    LoginStartC2s, LoginSuccessS2c, PROTOCOL_VERSION, PlayerInfoAddS2c, PlayerInfoEntry,
    PlayerInfoRemoveS2c, PlayerPositionAndLookS2c, PlayerPositionC2s, PlayerPositionRotationC2s,
    PlayerRotationC2s, ServerDifficultyS2c, ServerboundPacket, SpawnPlayerS2c, StatusPingC2s,
    StatusPongS2c, StatusRequestC2s, StatusResponseS2c, TeleportConfirmC2s, UpdateViewPositionS2c,
};
pub use state::{HandshakeNextState, PacketState};
pub use types::{
    Angle, MAX_PACKET_SIZE, PacketDecode, PacketDecoder, PacketEncode, PacketEncoder, PacketFrame,
    Position, Uuid, encode_packet,
};
