use super::{
    error::{ProtoError, Result, debug_log_error},
    io::{
        read_angle, read_bool, read_f32_be, read_f64_be, read_i8, read_i64_be,
        read_string_bounded, read_u8, read_u16_be, read_uuid, write_angle, write_bool,
        write_f32_be, write_f64_be, write_i8, write_i16_be, write_i32_be, write_i64_be,
        write_string_bounded, write_u8, write_u16_be, write_uuid,
    },
    state::{HandshakeNextState, PacketState},
    types::{Angle, PacketDecode, PacketEncode, PacketFrame, Uuid},
    varint::{read_varint, varint_len, write_varint},
};

/// The only protocol version this crate speaks (Minecraft 1.16.5).
pub const PROTOCOL_VERSION: i32 = 754;

// ---------------------------------------------------------------------------
// Serverbound
// ---------------------------------------------------------------------------

/// Handshake (C2S) packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandshakeC2s<'a> {
    pub protocol_version: i32,
    pub server_address: &'a str,
    pub server_port: u16,
    pub next_state: HandshakeNextState,
}

/// Status request (C2S) packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRequestC2s;

/// Status ping (C2S) packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPingC2s {
    pub payload: i64,
}

/// Login start (C2S) packet. Protocol 754 carries only the username.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginStartC2s<'a> {
    pub username: &'a str,
}

/// Teleport confirm (C2S) packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeleportConfirmC2s {
    pub teleport_id: i32,
}

/// Chat message (C2S) packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatMessageC2s<'a> {
    pub message: &'a str,
}

/// Keep-alive answer (C2S) packet echoing the server's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepAliveResponseC2s {
    pub id: i64,
}

/// Player position (C2S) packet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPositionC2s {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub on_ground: bool,
}

/// Player position and rotation (C2S) packet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPositionRotationC2s {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
}

/// Player rotation (C2S) packet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerRotationC2s {
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
}

/// Entity action (C2S) packet. The entity id and jump boost are read so the
/// frame is fully consumed, then ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityActionC2s {
    pub entity_id: i32,
    pub action: i32,
    pub jump_boost: i32,
}

/// Swing-arm animation (C2S) packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationC2s {
    pub hand: i32,
}

/// Any serverbound packet the server reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ServerboundPacket<'a> {
    Handshake(HandshakeC2s<'a>),
    StatusRequest(StatusRequestC2s),
    StatusPing(StatusPingC2s),
    LoginStart(LoginStartC2s<'a>),
    TeleportConfirm(TeleportConfirmC2s),
    ChatMessage(ChatMessageC2s<'a>),
    KeepAliveResponse(KeepAliveResponseC2s),
    PlayerPosition(PlayerPositionC2s),
    PlayerPositionRotation(PlayerPositionRotationC2s),
    PlayerRotation(PlayerRotationC2s),
    EntityAction(EntityActionC2s),
    Animation(AnimationC2s),
    /// A Play-state id this server does not manage. Not an error.
    Ignored { id: i32 },
}

impl PacketFrame {
    pub fn decode_serverbound<'a>(&'a self, state: PacketState) -> Result<ServerboundPacket<'a>> {
        ServerboundPacket::decode(state, self)
    }
}

impl<'a> ServerboundPacket<'a> {
    pub fn decode(state: PacketState, frame: &'a PacketFrame) -> Result<Self> {
        let mut input = frame.body.as_slice();
        let packet = match state {
            PacketState::Handshaking => {
                if frame.id != HandshakeC2s::ID {
                    return Err(ProtoError::InvalidPacketId {
                        state,
                        id: frame.id,
                    });
                }
                HandshakeC2s::decode_body(&mut input).map(ServerboundPacket::Handshake)
            }
            PacketState::Status => match frame.id {
                StatusRequestC2s::ID => {
                    StatusRequestC2s::decode_body(&mut input).map(ServerboundPacket::StatusRequest)
                }
                StatusPingC2s::ID => {
                    StatusPingC2s::decode_body(&mut input).map(ServerboundPacket::StatusPing)
                }
                _ => Err(ProtoError::InvalidPacketId {
                    state,
                    id: frame.id,
                }),
            },
            PacketState::Login => match frame.id {
                LoginStartC2s::ID => {
                    LoginStartC2s::decode_body(&mut input).map(ServerboundPacket::LoginStart)
                }
                _ => Err(ProtoError::InvalidPacketId {
                    state,
                    id: frame.id,
                }),
            },
            PacketState::Play => match frame.id {
                TeleportConfirmC2s::ID => TeleportConfirmC2s::decode_body(&mut input)
                    .map(ServerboundPacket::TeleportConfirm),
                ChatMessageC2s::ID => {
                    ChatMessageC2s::decode_body(&mut input).map(ServerboundPacket::ChatMessage)
                }
                KeepAliveResponseC2s::ID => KeepAliveResponseC2s::decode_body(&mut input)
                    .map(ServerboundPacket::KeepAliveResponse),
                PlayerPositionC2s::ID => PlayerPositionC2s::decode_body(&mut input)
                    .map(ServerboundPacket::PlayerPosition),
                PlayerPositionRotationC2s::ID => PlayerPositionRotationC2s::decode_body(&mut input)
                    .map(ServerboundPacket::PlayerPositionRotation),
                PlayerRotationC2s::ID => PlayerRotationC2s::decode_body(&mut input)
                    .map(ServerboundPacket::PlayerRotation),
                EntityActionC2s::ID => {
                    EntityActionC2s::decode_body(&mut input).map(ServerboundPacket::EntityAction)
                }
                AnimationC2s::ID => {
                    AnimationC2s::decode_body(&mut input).map(ServerboundPacket::Animation)
                }
                id => return Ok(ServerboundPacket::Ignored { id }),
            },
        };

        let packet = match packet {
            Ok(value) => value,
            Err(err) => {
                debug_log_error("packet body decode failed", &err);
                return Err(err);
            }
        };

        if !input.is_empty() {
            let err = ProtoError::TrailingBytes(input.len());
            debug_log_error("packet had trailing bytes", &err);
            return Err(err);
        }

        Ok(packet)
    }
}

impl<'a> HandshakeC2s<'a> {
    pub const ID: i32 = 0x00;
}

impl<'a> PacketDecode<'a> for HandshakeC2s<'a> {
    const ID: i32 = HandshakeC2s::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        let protocol_version = read_varint(input)?;
        let server_address = read_string_bounded(input, 255)?;
        let server_port = read_u16_be(input)?;
        let next_state = match read_varint(input)? {
            1 => HandshakeNextState::Status,
            2 => HandshakeNextState::Login,
            other => return Err(ProtoError::InvalidHandshakeState(other)),
        };

        Ok(Self {
            protocol_version,
            server_address,
            server_port,
            next_state,
        })
    }
}

impl<'a> PacketEncode for HandshakeC2s<'a> {
    const ID: i32 = HandshakeC2s::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_varint(out, self.protocol_version);
        write_string_bounded(out, self.server_address, 255)?;
        write_u16_be(out, self.server_port);
        let next = match self.next_state {
            HandshakeNextState::Status => 1,
            HandshakeNextState::Login => 2,
        };
        write_varint(out, next);
        Ok(())
    }
}

impl StatusRequestC2s {
    pub const ID: i32 = 0x00;
}

impl<'a> PacketDecode<'a> for StatusRequestC2s {
    const ID: i32 = StatusRequestC2s::ID;

    fn decode_body(_input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self)
    }
}

impl PacketEncode for StatusRequestC2s {
    const ID: i32 = StatusRequestC2s::ID;

    fn encode_body(&self, _out: &mut Vec<u8>) -> Result<()> {
        Ok(())
    }
}

impl StatusPingC2s {
    pub const ID: i32 = 0x01;
}

impl<'a> PacketDecode<'a> for StatusPingC2s {
    const ID: i32 = StatusPingC2s::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            payload: read_i64_be(input)?,
        })
    }
}

impl PacketEncode for StatusPingC2s {
    const ID: i32 = StatusPingC2s::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_i64_be(out, self.payload);
        Ok(())
    }
}

impl<'a> LoginStartC2s<'a> {
    pub const ID: i32 = 0x00;
}

impl<'a> PacketDecode<'a> for LoginStartC2s<'a> {
    const ID: i32 = LoginStartC2s::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            username: read_string_bounded(input, 16)?,
        })
    }
}

impl<'a> PacketEncode for LoginStartC2s<'a> {
    const ID: i32 = LoginStartC2s::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_string_bounded(out, self.username, 16)
    }
}

impl TeleportConfirmC2s {
    pub const ID: i32 = 0x00;
}

impl<'a> PacketDecode<'a> for TeleportConfirmC2s {
    const ID: i32 = TeleportConfirmC2s::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            teleport_id: read_varint(input)?,
        })
    }
}

impl PacketEncode for TeleportConfirmC2s {
    const ID: i32 = TeleportConfirmC2s::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_varint(out, self.teleport_id);
        Ok(())
    }
}

impl<'a> ChatMessageC2s<'a> {
    pub const ID: i32 = 0x03;
}

impl<'a> PacketDecode<'a> for ChatMessageC2s<'a> {
    const ID: i32 = ChatMessageC2s::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            message: read_string_bounded(input, 256)?,
        })
    }
}

impl<'a> PacketEncode for ChatMessageC2s<'a> {
    const ID: i32 = ChatMessageC2s::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_string_bounded(out, self.message, 256)
    }
}

impl KeepAliveResponseC2s {
    pub const ID: i32 = 0x10;
}

impl<'a> PacketDecode<'a> for KeepAliveResponseC2s {
    const ID: i32 = KeepAliveResponseC2s::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            id: read_i64_be(input)?,
        })
    }
}

impl PacketEncode for KeepAliveResponseC2s {
    const ID: i32 = KeepAliveResponseC2s::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_i64_be(out, self.id);
        Ok(())
    }
}

impl PlayerPositionC2s {
    pub const ID: i32 = 0x12;
}

impl<'a> PacketDecode<'a> for PlayerPositionC2s {
    const ID: i32 = PlayerPositionC2s::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            x: read_f64_be(input)?,
            y: read_f64_be(input)?,
            z: read_f64_be(input)?,
            on_ground: read_bool(input)?,
        })
    }
}

impl PacketEncode for PlayerPositionC2s {
    const ID: i32 = PlayerPositionC2s::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_f64_be(out, self.x);
        write_f64_be(out, self.y);
        write_f64_be(out, self.z);
        write_bool(out, self.on_ground);
        Ok(())
    }
}

impl PlayerPositionRotationC2s {
    pub const ID: i32 = 0x13;
}

impl<'a> PacketDecode<'a> for PlayerPositionRotationC2s {
    const ID: i32 = PlayerPositionRotationC2s::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            x: read_f64_be(input)?,
            y: read_f64_be(input)?,
            z: read_f64_be(input)?,
            yaw: read_f32_be(input)?,
            pitch: read_f32_be(input)?,
            on_ground: read_bool(input)?,
        })
    }
}

impl PacketEncode for PlayerPositionRotationC2s {
    const ID: i32 = PlayerPositionRotationC2s::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_f64_be(out, self.x);
        write_f64_be(out, self.y);
        write_f64_be(out, self.z);
        write_f32_be(out, self.yaw);
        write_f32_be(out, self.pitch);
        write_bool(out, self.on_ground);
        Ok(())
    }
}

impl PlayerRotationC2s {
    pub const ID: i32 = 0x14;
}

impl<'a> PacketDecode<'a> for PlayerRotationC2s {
    const ID: i32 = PlayerRotationC2s::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            yaw: read_f32_be(input)?,
            pitch: read_f32_be(input)?,
            on_ground: read_bool(input)?,
        })
    }
}

impl PacketEncode for PlayerRotationC2s {
    const ID: i32 = PlayerRotationC2s::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_f32_be(out, self.yaw);
        write_f32_be(out, self.pitch);
        write_bool(out, self.on_ground);
        Ok(())
    }
}

impl EntityActionC2s {
    pub const ID: i32 = 0x1C;
}

impl<'a> PacketDecode<'a> for EntityActionC2s {
    const ID: i32 = EntityActionC2s::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            entity_id: read_varint(input)?,
            action: read_varint(input)?,
            jump_boost: read_varint(input)?,
        })
    }
}

impl PacketEncode for EntityActionC2s {
    const ID: i32 = EntityActionC2s::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_varint(out, self.entity_id);
        write_varint(out, self.action);
        write_varint(out, self.jump_boost);
        Ok(())
    }
}

impl AnimationC2s {
    pub const ID: i32 = 0x2C;
}

impl<'a> PacketDecode<'a> for AnimationC2s {
    const ID: i32 = AnimationC2s::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            hand: read_varint(input)?,
        })
    }
}

impl PacketEncode for AnimationC2s {
    const ID: i32 = AnimationC2s::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_varint(out, self.hand);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Clientbound
// ---------------------------------------------------------------------------

/// Status response (S2C) packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusResponseS2c<'a> {
    pub json: &'a str,
}

/// Status pong (S2C) packet echoing the ping payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPongS2c {
    pub payload: i64,
}

/// Login success (S2C) packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginSuccessS2c<'a> {
    pub uuid: Uuid,
    pub username: &'a str,
}

/// Spawn player (S2C) packet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlayerS2c {
    pub entity_id: i32,
    pub uuid: Uuid,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: Angle,
    pub pitch: Angle,
}

/// Entity animation (S2C) packet. Swings carry a trailing arm byte
/// (0 = main hand, 3 = off hand); other animation values carry nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityAnimationS2c {
    pub entity_id: i32,
    pub animation: i32,
}

/// Server difficulty (S2C) packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerDifficultyS2c {
    pub difficulty: u8,
    pub locked: bool,
}

/// Chat message (S2C) packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatMessageS2c<'a> {
    pub json: &'a str,
    pub position: i8,
    pub sender: Uuid,
}

/// Keep alive (S2C) packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepAliveS2c {
    pub id: i64,
}

/// Chunk data (S2C) packet for the fixed flat chunk this server serves.
///
/// The height map, palette and block array are opaque blobs; the packet
/// carries them in the 1.16.5 full-chunk layout with a single section,
/// 1024 void biomes, and no block entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkDataS2c<'a> {
    pub chunk_x: i32,
    pub chunk_z: i32,
    pub height_map: &'a [u8],
    pub palette: &'a [u8],
    pub blocks: &'a [u8],
}

/// Join game (S2C) packet for the constant overworld configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinGameS2c<'a> {
    pub entity_id: i32,
    pub hardcore: bool,
    pub gamemode: u8,
    pub previous_gamemode: i8,
    pub world_name: &'a str,
    pub dimension_codec: &'a [u8],
    pub dimension: &'a [u8],
    pub hashed_seed: i64,
    pub max_players: i32,
    pub view_distance: i32,
    pub reduced_debug_info: bool,
    pub enable_respawn_screen: bool,
    pub is_debug: bool,
    pub is_flat: bool,
}

/// Entity rotation (S2C) packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRotationS2c {
    pub entity_id: i32,
    pub yaw: Angle,
    pub pitch: Angle,
    pub on_ground: bool,
}

/// One tab-list entry in a player info add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerInfoEntry<'a> {
    pub uuid: Uuid,
    pub username: &'a str,
}

/// Player info (S2C) packet, action 0: add players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfoAddS2c<'a> {
    pub entries: Vec<PlayerInfoEntry<'a>>,
}

/// Player info (S2C) packet, action 4: remove one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerInfoRemoveS2c {
    pub uuid: Uuid,
}

/// Player position and look (S2C) packet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPositionAndLookS2c {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
    pub flags: i8,
    pub teleport_id: i32,
}

/// Destroy entities (S2C) packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestroyEntitiesS2c {
    pub entity_ids: Vec<i32>,
}

/// Entity head look (S2C) packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityHeadLookS2c {
    pub entity_id: i32,
    pub yaw: Angle,
}

/// Update view position (S2C) packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateViewPositionS2c {
    pub chunk_x: i32,
    pub chunk_z: i32,
}

/// Entity metadata (S2C) packet carrying a single field triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityMetadataS2c {
    pub entity_id: i32,
    pub index: u8,
    pub kind: i32,
    pub value: i32,
}

/// Entity teleport (S2C) packet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityTeleportS2c {
    pub entity_id: i32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: Angle,
    pub pitch: Angle,
    pub on_ground: bool,
}

impl<'a> StatusResponseS2c<'a> {
    pub const ID: i32 = 0x00;
}

impl<'a> PacketEncode for StatusResponseS2c<'a> {
    const ID: i32 = StatusResponseS2c::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_string_bounded(out, self.json, 32_767)
    }
}

impl<'a> PacketDecode<'a> for StatusResponseS2c<'a> {
    const ID: i32 = StatusResponseS2c::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            json: read_string_bounded(input, 32_767)?,
        })
    }
}

impl StatusPongS2c {
    pub const ID: i32 = 0x01;
}

impl PacketEncode for StatusPongS2c {
    const ID: i32 = StatusPongS2c::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_i64_be(out, self.payload);
        Ok(())
    }
}

impl<'a> PacketDecode<'a> for StatusPongS2c {
    const ID: i32 = StatusPongS2c::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            payload: read_i64_be(input)?,
        })
    }
}

impl<'a> LoginSuccessS2c<'a> {
    pub const ID: i32 = 0x02;
}

impl<'a> PacketEncode for LoginSuccessS2c<'a> {
    const ID: i32 = LoginSuccessS2c::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_uuid(out, &self.uuid);
        write_string_bounded(out, self.username, 16)
    }
}

impl<'a> PacketDecode<'a> for LoginSuccessS2c<'a> {
    const ID: i32 = LoginSuccessS2c::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            uuid: read_uuid(input)?,
            username: read_string_bounded(input, 16)?,
        })
    }
}

impl SpawnPlayerS2c {
    pub const ID: i32 = 0x04;
}

impl PacketEncode for SpawnPlayerS2c {
    const ID: i32 = SpawnPlayerS2c::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_varint(out, self.entity_id);
        write_uuid(out, &self.uuid);
        write_f64_be(out, self.x);
        write_f64_be(out, self.y);
        write_f64_be(out, self.z);
        write_angle(out, self.yaw);
        write_angle(out, self.pitch);
        Ok(())
    }
}

impl<'a> PacketDecode<'a> for SpawnPlayerS2c {
    const ID: i32 = SpawnPlayerS2c::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            entity_id: read_varint(input)?,
            uuid: read_uuid(input)?,
            x: read_f64_be(input)?,
            y: read_f64_be(input)?,
            z: read_f64_be(input)?,
            yaw: read_angle(input)?,
            pitch: read_angle(input)?,
        })
    }
}

impl EntityAnimationS2c {
    pub const ID: i32 = 0x05;
}

impl PacketEncode for EntityAnimationS2c {
    const ID: i32 = EntityAnimationS2c::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_varint(out, self.entity_id);
        match self.animation {
            0 => write_u8(out, 0),
            1 => write_u8(out, 3),
            _ => {}
        }
        Ok(())
    }
}

impl ServerDifficultyS2c {
    pub const ID: i32 = 0x0D;
}

impl PacketEncode for ServerDifficultyS2c {
    const ID: i32 = ServerDifficultyS2c::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_u8(out, self.difficulty);
        write_bool(out, self.locked);
        Ok(())
    }
}

impl<'a> PacketDecode<'a> for ServerDifficultyS2c {
    const ID: i32 = ServerDifficultyS2c::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            difficulty: read_u8(input)?,
            locked: read_bool(input)?,
        })
    }
}

impl<'a> ChatMessageS2c<'a> {
    pub const ID: i32 = 0x0E;
}

impl<'a> PacketEncode for ChatMessageS2c<'a> {
    const ID: i32 = ChatMessageS2c::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_string_bounded(out, self.json, 32_767)?;
        write_i8(out, self.position);
        write_uuid(out, &self.sender);
        Ok(())
    }
}

impl<'a> PacketDecode<'a> for ChatMessageS2c<'a> {
    const ID: i32 = ChatMessageS2c::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            json: read_string_bounded(input, 32_767)?,
            position: read_i8(input)?,
            sender: read_uuid(input)?,
        })
    }
}

impl KeepAliveS2c {
    pub const ID: i32 = 0x1F;
}

impl PacketEncode for KeepAliveS2c {
    const ID: i32 = KeepAliveS2c::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_i64_be(out, self.id);
        Ok(())
    }
}

impl<'a> PacketDecode<'a> for KeepAliveS2c {
    const ID: i32 = KeepAliveS2c::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            id: read_i64_be(input)?,
        })
    }
}

const CHUNK_PALETTE_ENTRIES: i32 = 256;
const CHUNK_LONG_COUNT: i32 = 512;
const CHUNK_NON_AIR: i16 = 256;
const CHUNK_BITS_PER_BLOCK: u8 = 8;
const BIOME_ENTRIES: i32 = 1024;
const VOID_BIOME: i32 = 127;

impl<'a> ChunkDataS2c<'a> {
    pub const ID: i32 = 0x20;
}

impl<'a> PacketEncode for ChunkDataS2c<'a> {
    const ID: i32 = ChunkDataS2c::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_i32_be(out, self.chunk_x);
        write_i32_be(out, self.chunk_z);
        write_bool(out, true); // full chunk
        write_varint(out, 0x01); // section bit mask
        out.extend_from_slice(self.height_map);
        write_varint(out, BIOME_ENTRIES);
        for _ in 0..BIOME_ENTRIES {
            write_varint(out, VOID_BIOME);
        }

        let data_len = 2
            + 1
            + varint_len(CHUNK_PALETTE_ENTRIES)
            + self.palette.len()
            + varint_len(CHUNK_LONG_COUNT)
            + self.blocks.len();
        write_varint(out, data_len as i32);
        write_i16_be(out, CHUNK_NON_AIR);
        write_u8(out, CHUNK_BITS_PER_BLOCK);
        write_varint(out, CHUNK_PALETTE_ENTRIES);
        out.extend_from_slice(self.palette);
        write_varint(out, CHUNK_LONG_COUNT);
        out.extend_from_slice(self.blocks);

        write_varint(out, 0); // block entities
        Ok(())
    }
}

impl<'a> JoinGameS2c<'a> {
    pub const ID: i32 = 0x24;
}

impl<'a> PacketEncode for JoinGameS2c<'a> {
    const ID: i32 = JoinGameS2c::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_i32_be(out, self.entity_id);
        write_bool(out, self.hardcore);
        write_u8(out, self.gamemode);
        write_i8(out, self.previous_gamemode);
        write_varint(out, 1); // world count
        write_string_bounded(out, self.world_name, 32_767)?;
        out.extend_from_slice(self.dimension_codec);
        out.extend_from_slice(self.dimension);
        write_string_bounded(out, self.world_name, 32_767)?;
        write_i64_be(out, self.hashed_seed);
        write_varint(out, self.max_players);
        write_varint(out, self.view_distance);
        write_bool(out, self.reduced_debug_info);
        write_bool(out, self.enable_respawn_screen);
        write_bool(out, self.is_debug);
        write_bool(out, self.is_flat);
        Ok(())
    }
}

impl EntityRotationS2c {
    pub const ID: i32 = 0x29;
}

impl PacketEncode for EntityRotationS2c {
    const ID: i32 = EntityRotationS2c::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_varint(out, self.entity_id);
        write_angle(out, self.yaw);
        write_angle(out, self.pitch);
        write_bool(out, self.on_ground);
        Ok(())
    }
}

impl<'a> PacketDecode<'a> for EntityRotationS2c {
    const ID: i32 = EntityRotationS2c::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            entity_id: read_varint(input)?,
            yaw: read_angle(input)?,
            pitch: read_angle(input)?,
            on_ground: read_bool(input)?,
        })
    }
}

impl<'a> PlayerInfoAddS2c<'a> {
    pub const ID: i32 = 0x32;
}

impl<'a> PacketEncode for PlayerInfoAddS2c<'a> {
    const ID: i32 = PlayerInfoAddS2c::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_varint(out, 0); // action: add player
        write_varint(out, self.entries.len() as i32);
        for entry in &self.entries {
            write_uuid(out, &entry.uuid);
            write_string_bounded(out, entry.username, 16)?;
            write_varint(out, 0); // no properties
            write_varint(out, 0); // gamemode 0 (survival)
            write_varint(out, 123); // hardcoded ping
            write_bool(out, false); // has display name
        }
        Ok(())
    }
}

impl<'a> PacketDecode<'a> for PlayerInfoAddS2c<'a> {
    const ID: i32 = PlayerInfoAddS2c::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        let action = read_varint(input)?;
        if action != 0 {
            return Err(ProtoError::InvalidValue(action));
        }
        let count = read_varint(input)?;
        if count < 0 {
            return Err(ProtoError::InvalidLength(count));
        }

        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let uuid = read_uuid(input)?;
            let username = read_string_bounded(input, 16)?;
            let _properties = read_varint(input)?;
            let _gamemode = read_varint(input)?;
            let _ping = read_varint(input)?;
            let _has_display_name = read_bool(input)?;
            entries.push(PlayerInfoEntry { uuid, username });
        }
        Ok(Self { entries })
    }
}

impl PlayerInfoRemoveS2c {
    pub const ID: i32 = 0x32;
}

impl PacketEncode for PlayerInfoRemoveS2c {
    const ID: i32 = PlayerInfoRemoveS2c::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_varint(out, 4); // action: remove player
        write_varint(out, 1);
        write_uuid(out, &self.uuid);
        Ok(())
    }
}

impl<'a> PacketDecode<'a> for PlayerInfoRemoveS2c {
    const ID: i32 = PlayerInfoRemoveS2c::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        let action = read_varint(input)?;
        if action != 4 {
            return Err(ProtoError::InvalidValue(action));
        }
        let count = read_varint(input)?;
        if count != 1 {
            return Err(ProtoError::InvalidLength(count));
        }
        Ok(Self {
            uuid: read_uuid(input)?,
        })
    }
}

impl PlayerPositionAndLookS2c {
    pub const ID: i32 = 0x34;
}

impl PacketEncode for PlayerPositionAndLookS2c {
    const ID: i32 = PlayerPositionAndLookS2c::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_f64_be(out, self.x);
        write_f64_be(out, self.y);
        write_f64_be(out, self.z);
        write_f32_be(out, self.yaw);
        write_f32_be(out, self.pitch);
        write_i8(out, self.flags);
        write_varint(out, self.teleport_id);
        Ok(())
    }
}

impl<'a> PacketDecode<'a> for PlayerPositionAndLookS2c {
    const ID: i32 = PlayerPositionAndLookS2c::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            x: read_f64_be(input)?,
            y: read_f64_be(input)?,
            z: read_f64_be(input)?,
            yaw: read_f32_be(input)?,
            pitch: read_f32_be(input)?,
            flags: read_i8(input)?,
            teleport_id: read_varint(input)?,
        })
    }
}

impl DestroyEntitiesS2c {
    pub const ID: i32 = 0x36;
}

impl PacketEncode for DestroyEntitiesS2c {
    const ID: i32 = DestroyEntitiesS2c::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_varint(out, self.entity_ids.len() as i32);
        for id in &self.entity_ids {
            write_varint(out, *id);
        }
        Ok(())
    }
}

impl<'a> PacketDecode<'a> for DestroyEntitiesS2c {
    const ID: i32 = DestroyEntitiesS2c::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        let count = read_varint(input)?;
        if count < 0 {
            return Err(ProtoError::InvalidLength(count));
        }
        let mut entity_ids = Vec::with_capacity(count as usize);
        for _ in 0..count {
            entity_ids.push(read_varint(input)?);
        }
        Ok(Self { entity_ids })
    }
}

impl EntityHeadLookS2c {
    pub const ID: i32 = 0x3A;
}

impl PacketEncode for EntityHeadLookS2c {
    const ID: i32 = EntityHeadLookS2c::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_varint(out, self.entity_id);
        write_angle(out, self.yaw);
        Ok(())
    }
}

impl<'a> PacketDecode<'a> for EntityHeadLookS2c {
    const ID: i32 = EntityHeadLookS2c::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            entity_id: read_varint(input)?,
            yaw: read_angle(input)?,
        })
    }
}

impl UpdateViewPositionS2c {
    pub const ID: i32 = 0x40;
}

impl PacketEncode for UpdateViewPositionS2c {
    const ID: i32 = UpdateViewPositionS2c::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_varint(out, self.chunk_x);
        write_varint(out, self.chunk_z);
        Ok(())
    }
}

impl<'a> PacketDecode<'a> for UpdateViewPositionS2c {
    const ID: i32 = UpdateViewPositionS2c::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            chunk_x: read_varint(input)?,
            chunk_z: read_varint(input)?,
        })
    }
}

const METADATA_TERMINATOR: u8 = 0xFF;

impl EntityMetadataS2c {
    pub const ID: i32 = 0x44;
}

impl PacketEncode for EntityMetadataS2c {
    const ID: i32 = EntityMetadataS2c::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_varint(out, self.entity_id);
        write_u8(out, self.index);
        write_varint(out, self.kind);
        write_varint(out, self.value);
        write_u8(out, METADATA_TERMINATOR);
        Ok(())
    }
}

impl<'a> PacketDecode<'a> for EntityMetadataS2c {
    const ID: i32 = EntityMetadataS2c::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        let packet = Self {
            entity_id: read_varint(input)?,
            index: read_u8(input)?,
            kind: read_varint(input)?,
            value: read_varint(input)?,
        };
        let terminator = read_u8(input)?;
        if terminator != METADATA_TERMINATOR {
            return Err(ProtoError::InvalidValue(i32::from(terminator)));
        }
        Ok(packet)
    }
}

impl EntityTeleportS2c {
    pub const ID: i32 = 0x56;
}

impl PacketEncode for EntityTeleportS2c {
    const ID: i32 = EntityTeleportS2c::ID;

    fn encode_body(&self, out: &mut Vec<u8>) -> Result<()> {
        write_varint(out, self.entity_id);
        write_f64_be(out, self.x);
        write_f64_be(out, self.y);
        write_f64_be(out, self.z);
        write_angle(out, self.yaw);
        write_angle(out, self.pitch);
        write_bool(out, self.on_ground);
        Ok(())
    }
}

impl<'a> PacketDecode<'a> for EntityTeleportS2c {
    const ID: i32 = EntityTeleportS2c::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self {
            entity_id: read_varint(input)?,
            x: read_f64_be(input)?,
            y: read_f64_be(input)?,
            z: read_f64_be(input)?,
            yaw: read_angle(input)?,
            pitch: read_angle(input)?,
            on_ground: read_bool(input)?,
        })
    }
}
