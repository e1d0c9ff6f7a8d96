use std::{net::SocketAddr, sync::Arc};

use net::{
    HandshakeNextState, LoginSuccessS2c, PROTOCOL_VERSION, PacketState, ServerboundPacket,
    StatusPongS2c, StatusResponseS2c, Uuid,
};
use tokio::net::TcpStream;

use crate::{
    connection::{PacketReader, PacketWriter},
    error::SessionError,
    logging::EmberLogger,
    player::{Player, Pose},
    server::Server,
    world,
};

/// The literal status document. Player counts are advertised as-is, not
/// read from the registry.
const STATUS_JSON: &str = "{\"version\": {\"name\": \"1.16.5\",\"protocol\": 754},\"players\": {\"max\": 10,\"online\": 5},\"description\": {\"text\": \"Minecraft Light Server Go\"}}";

/// Drives one accepted connection through Handshake and into Status or
/// Login/Play. Every exit path of a registered player funnels through
/// `Server::remove_player`.
pub async fn handle_connection(
    server: &'static Server,
    stream: TcpStream,
    address: SocketAddr,
) -> anyhow::Result<()> {
    EmberLogger::new_connection(&address);

    let (read, write) = stream.into_split();
    let mut reader = PacketReader::new(read);
    let mut writer = PacketWriter::new(write);

    let frame = reader.next_frame().await?;
    let (protocol_version, next_state) = {
        let ServerboundPacket::Handshake(handshake) =
            frame.decode_serverbound(PacketState::Handshaking)?
        else {
            anyhow::bail!("expected handshake");
        };
        (handshake.protocol_version, handshake.next_state)
    };

    if protocol_version != PROTOCOL_VERSION {
        return Err(SessionError::WrongProtocolVersion(protocol_version).into());
    }

    match next_state {
        HandshakeNextState::Status => {
            handle_status(&mut reader, &mut writer).await?;
            EmberLogger::status_served(&address);
            Ok(())
        }
        HandshakeNextState::Login => handle_login(server, reader, writer, address).await,
    }
}

/// Status exchange: request/response, ping/pong, close. Never registered.
async fn handle_status(
    reader: &mut PacketReader,
    writer: &mut PacketWriter,
) -> anyhow::Result<()> {
    let frame = reader.next_frame().await?;
    let ServerboundPacket::StatusRequest(_) = frame.decode_serverbound(PacketState::Status)? else {
        anyhow::bail!("expected status request");
    };
    writer.send(&StatusResponseS2c { json: STATUS_JSON }).await?;

    let frame = reader.next_frame().await?;
    let ServerboundPacket::StatusPing(ping) = frame.decode_serverbound(PacketState::Status)? else {
        anyhow::bail!("expected status ping");
    };
    writer.send(&StatusPongS2c {
        payload: ping.payload,
    })
    .await?;

    Ok(())
}

async fn handle_login(
    server: &'static Server,
    mut reader: PacketReader,
    mut writer: PacketWriter,
    address: SocketAddr,
) -> anyhow::Result<()> {
    let frame = reader.next_frame().await?;
    let username = {
        let ServerboundPacket::LoginStart(login) = frame.decode_serverbound(PacketState::Login)?
        else {
            anyhow::bail!("expected login start");
        };
        login.username.to_owned()
    };

    let uuid = random_uuid();
    writer.send(&LoginSuccessS2c {
        uuid,
        username: &username,
    })
    .await?;

    let player = Arc::new(Player::new(address, uuid, username, writer));
    server.add_player(player.clone()).await;
    EmberLogger::player_joined(&player.username, &address);

    if let Err(err) = enter_play(server, &player).await {
        server.remove_player(&player, &err.to_string()).await;
        return Err(err);
    }
    server.spawn_keep_alive(player.clone());

    let result = play_loop(server, &player, &mut reader).await;
    if let Err(ref err) = result {
        server.remove_player(&player, &err.to_string()).await;
    }
    result
}

/// The fixed packet train that lands a fresh login in the world, followed
/// by the join broadcasts.
async fn enter_play(server: &Server, player: &Arc<Player>) -> anyhow::Result<()> {
    player.join_game().await?;

    let pose = player.pose();
    player
        .position_and_look(pose.x, pose.y, pose.z, pose.yaw, pose.pitch, 0, player.entity_id())
        .await?;
    player.server_difficulty().await?;
    for (chunk_x, chunk_z) in world::SPAWN_CHUNKS {
        player.chunk_data(chunk_x, chunk_z).await?;
    }

    server.broadcast_player_info().await;
    server
        .broadcast_chat_message(&format!("{} joined the server", player.username), "Server")
        .await;
    server.broadcast_spawn_player().await;
    Ok(())
}

/// Reads Play packets until the socket dies or the session is retired, and
/// turns each into pose updates and broadcasts.
async fn play_loop(
    server: &Server,
    player: &Arc<Player>,
    reader: &mut PacketReader,
) -> anyhow::Result<()> {
    loop {
        let frame = tokio::select! {
            _ = player.wait_closed() => return Ok(()),
            frame = reader.next_frame() => frame?,
        };
        if player.is_gone() {
            return Ok(());
        }

        let entity_id = player.entity_id();
        match frame.decode_serverbound(PacketState::Play)? {
            ServerboundPacket::TeleportConfirm(_) | ServerboundPacket::KeepAliveResponse(_) => {}
            ServerboundPacket::ChatMessage(chat) => {
                server
                    .broadcast_chat_message(chat.message, &player.username)
                    .await;
            }
            ServerboundPacket::PlayerPosition(pos) => {
                let previous = player.pose();
                player.set_position(pos.x, pos.y, pos.z, pos.on_ground);
                sync_view_position(player, &previous).await?;

                let pose = player.pose();
                server
                    .broadcast_player_pos_and_look(
                        entity_id,
                        pos.x,
                        pos.y,
                        pos.z,
                        pose.yaw_angle,
                        pose.pitch_angle,
                        pos.on_ground,
                    )
                    .await;
            }
            ServerboundPacket::PlayerPositionRotation(pos) => {
                let previous = player.pose();
                player.set_position_rotation(pos.x, pos.y, pos.z, pos.yaw, pos.pitch, pos.on_ground);
                sync_view_position(player, &previous).await?;

                let pose = player.pose();
                server
                    .broadcast_player_pos_and_look(
                        entity_id,
                        pos.x,
                        pos.y,
                        pos.z,
                        pose.yaw_angle,
                        pose.pitch_angle,
                        pos.on_ground,
                    )
                    .await;
            }
            ServerboundPacket::PlayerRotation(rot) => {
                player.set_rotation(rot.yaw, rot.pitch, rot.on_ground);
                let pose = player.pose();
                server
                    .broadcast_player_rotation(
                        entity_id,
                        pose.yaw_angle,
                        pose.pitch_angle,
                        rot.on_ground,
                    )
                    .await;
            }
            ServerboundPacket::EntityAction(action) => {
                server.broadcast_entity_action(entity_id, action.action).await;
            }
            ServerboundPacket::Animation(animation) => {
                server
                    .broadcast_entity_animation(entity_id, animation.hand)
                    .await;
            }
            ServerboundPacket::Ignored { id } => EmberLogger::unmanaged_packet(id),
            // Pre-play packets cannot come out of a Play-state dispatch.
            _ => {}
        }
    }
}

/// Tells the client its new view center when the move crossed a chunk
/// border on either axis. Chunk-vs-chunk on both axes, nothing else.
async fn sync_view_position(player: &Player, previous: &Pose) -> anyhow::Result<()> {
    let pose = player.pose();
    let chunk_x = world::coordinate_to_chunk(pose.x);
    let chunk_z = world::coordinate_to_chunk(pose.z);
    if chunk_x != world::coordinate_to_chunk(previous.x)
        || chunk_z != world::coordinate_to_chunk(previous.z)
    {
        player.update_view_position(chunk_x, chunk_z).await?;
    }
    Ok(())
}

/// Server-assigned login identity: 16 random bytes stamped as a version-4
/// RFC 4122 UUID.
fn random_uuid() -> Uuid {
    let mut bytes: [u8; 16] = rand::random();
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    Uuid::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::random_uuid;

    #[test]
    fn random_uuid_is_version_4() {
        for _ in 0..32 {
            let uuid = random_uuid();
            let bytes = uuid.as_bytes();
            assert_eq!(bytes[6] >> 4, 4);
            assert_eq!(bytes[8] >> 6, 0b10);
        }
    }
}
