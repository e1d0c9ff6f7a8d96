//! # `net`-code
//! A minimal netcode for a Minecraft Java Edition 1.16.5 server.
//! Implements the protocol-754 field types, the length-prefixed packet
//! framing, and every packet the server speaks, with nothing heavier than
//! `log` underneath.
pub mod mc;

pub use mc::{
    Angle, AnimationC2s, ChatMessageC2s, ChatMessageS2c, ChunkDataS2c, DestroyEntitiesS2c,
    EntityActionC2s, EntityAnimationS2c, EntityHeadLookS2c, EntityMetadataS2c, EntityRotationS2c,
    EntityTeleportS2c, HandshakeC2s, HandshakeNextState, JoinGameS2c, KeepAliveResponseC2s,
    KeepAliveS2c, LoginStartC2s, LoginSuccessS2c, MAX_PACKET_SIZE, PROTOCOL_VERSION, PacketDecode,
    PacketDecoder, PacketEncode, PacketEncoder, PacketFrame, PacketState, PlayerInfoAddS2c,
    PlayerInfoEntry, PlayerInfoRemoveS2c, PlayerPositionAndLookS2c, PlayerPositionC2s,
    PlayerPositionRotationC2s, PlayerRotationC2s, Position, ProtoError, ServerDifficultyS2c,
    ServerboundPacket, SpawnPlayerS2c, StatusPingC2s, StatusPongS2c, StatusRequestC2s,
    StatusResponseS2c, TeleportConfirmC2s, UpdateViewPositionS2c, Uuid, encode_packet,
};
