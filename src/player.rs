use std::{
    net::SocketAddr,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use net::{
    Angle, ChatMessageS2c, ChunkDataS2c, DestroyEntitiesS2c, EntityAnimationS2c, EntityHeadLookS2c,
    EntityMetadataS2c, EntityRotationS2c, EntityTeleportS2c, JoinGameS2c, KeepAliveS2c,
    PacketEncode, PlayerInfoAddS2c, PlayerInfoEntry, PlayerInfoRemoveS2c,
    PlayerPositionAndLookS2c, ServerDifficultyS2c, SpawnPlayerS2c, UpdateViewPositionS2c, Uuid,
};
use tokio::sync::watch;

use crate::{connection::PacketWriter, world};

/// Where a player stands and looks. The compact angles are recomputed with
/// every absolute rotation change, never on their own.
#[derive(Debug, Clone, Copy)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
    pub yaw_angle: Angle,
    pub pitch_angle: Angle,
    pub on_ground: bool,
}

impl Pose {
    fn spawn() -> Self {
        Self {
            x: world::SPAWN_X,
            y: world::SPAWN_Y,
            z: world::SPAWN_Z,
            yaw: 0.0,
            pitch: 0.0,
            yaw_angle: Angle::ZERO,
            pitch_angle: Angle::ZERO,
            on_ground: false,
        }
    }
}

/// One live connection's registered identity and socket.
///
/// The write half is behind an async lock: broadcasters running on other
/// sessions' tasks write here concurrently with the owner's reader and
/// keep-alive tasks, and packet bytes must never interleave. The pose is
/// behind a brief std lock, never held across an await.
pub struct Player {
    pub address: SocketAddr,
    pub uuid: Uuid,
    pub username: String,
    writer: tokio::sync::Mutex<PacketWriter>,
    pose: Mutex<Pose>,
    gone: AtomicBool,
    closed_tx: watch::Sender<bool>,
}

impl Player {
    pub fn new(address: SocketAddr, uuid: Uuid, username: String, writer: PacketWriter) -> Self {
        let (closed_tx, _) = watch::channel(false);
        Self {
            address,
            uuid,
            username,
            writer: tokio::sync::Mutex::new(writer),
            pose: Mutex::new(Pose::spawn()),
            gone: AtomicBool::new(false),
            closed_tx,
        }
    }

    /// The in-protocol entity identifier: the UUID's first four bytes.
    pub fn entity_id(&self) -> i32 {
        self.uuid.entity_id()
    }

    pub fn is_gone(&self) -> bool {
        self.gone.load(Ordering::SeqCst)
    }

    /// Marks the tombstone. Returns true exactly once; the winner owns the
    /// rest of the teardown.
    pub fn retire(&self) -> bool {
        let first = !self.gone.swap(true, Ordering::SeqCst);
        if first {
            self.closed_tx.send_replace(true);
        }
        first
    }

    /// Resolves once the session is retired. Unblocks the reader and
    /// keep-alive loops without cancelling them mid-write.
    pub async fn wait_closed(&self) {
        let mut rx = self.closed_tx.subscribe();
        if *rx.borrow() {
            return;
        }
        let _ = rx.changed().await;
    }

    pub async fn shutdown_socket(&self) {
        self.writer.lock().await.shutdown().await;
    }

    pub fn pose(&self) -> Pose {
        *self.pose.lock().expect("player pose poisoned")
    }

    pub fn set_position(&self, x: f64, y: f64, z: f64, on_ground: bool) {
        let mut pose = self.pose.lock().expect("player pose poisoned");
        pose.x = x;
        pose.y = y;
        pose.z = z;
        pose.on_ground = on_ground;
    }

    pub fn set_rotation(&self, yaw: f32, pitch: f32, on_ground: bool) {
        let mut pose = self.pose.lock().expect("player pose poisoned");
        pose.yaw = yaw;
        pose.pitch = pitch;
        pose.yaw_angle = Angle::from_degrees(yaw);
        pose.pitch_angle = Angle::from_degrees(pitch);
        pose.on_ground = on_ground;
    }

    pub fn set_position_rotation(
        &self,
        x: f64,
        y: f64,
        z: f64,
        yaw: f32,
        pitch: f32,
        on_ground: bool,
    ) {
        let mut pose = self.pose.lock().expect("player pose poisoned");
        pose.x = x;
        pose.y = y;
        pose.z = z;
        pose.yaw = yaw;
        pose.pitch = pitch;
        pose.yaw_angle = Angle::from_degrees(yaw);
        pose.pitch_angle = Angle::from_degrees(pitch);
        pose.on_ground = on_ground;
    }

    /// Writes one packet to this player's socket. A tombstoned player takes
    /// no further writes.
    pub async fn send<P: PacketEncode>(&self, pkt: &P) -> anyhow::Result<()> {
        if self.is_gone() {
            anyhow::bail!("session retired");
        }
        self.writer.lock().await.send(pkt).await
    }

    // ── Outbound helpers, one per clientbound packet ────────────────────

    pub async fn join_game(&self) -> anyhow::Result<()> {
        self.send(&JoinGameS2c {
            entity_id: self.entity_id(),
            hardcore: false,
            gamemode: 0, // survival
            previous_gamemode: -1,
            world_name: world::WORLD_NAME,
            dimension_codec: world::DIMENSION_CODEC,
            dimension: world::DIMENSION,
            hashed_seed: world::HASHED_SEED,
            max_players: world::MAX_PLAYERS,
            view_distance: world::VIEW_DISTANCE,
            reduced_debug_info: false,
            enable_respawn_screen: false,
            is_debug: false,
            is_flat: true,
        })
        .await
    }

    pub async fn position_and_look(
        &self,
        x: f64,
        y: f64,
        z: f64,
        yaw: f32,
        pitch: f32,
        flags: i8,
        teleport_id: i32,
    ) -> anyhow::Result<()> {
        self.send(&PlayerPositionAndLookS2c {
            x,
            y,
            z,
            yaw,
            pitch,
            flags,
            teleport_id,
        })
        .await
    }

    pub async fn server_difficulty(&self) -> anyhow::Result<()> {
        // Locked peaceful mode.
        self.send(&ServerDifficultyS2c {
            difficulty: 0,
            locked: true,
        })
        .await
    }

    pub async fn chunk_data(&self, chunk_x: i32, chunk_z: i32) -> anyhow::Result<()> {
        self.send(&ChunkDataS2c {
            chunk_x,
            chunk_z,
            height_map: world::HEIGHT_MAP,
            palette: world::PALETTE,
            blocks: world::BLOCKS,
        })
        .await
    }

    pub async fn chat(&self, msg: &str, username: &str) -> anyhow::Result<()> {
        let body = serde_json::json!({
            "text": format!("<{username}> {msg}"),
            "bold": "false",
        })
        .to_string();
        self.send(&ChatMessageS2c {
            json: &body,
            position: 0, // chat box
            sender: self.uuid,
        })
        .await
    }

    pub async fn keep_alive(&self, id: i64) -> anyhow::Result<()> {
        self.send(&KeepAliveS2c { id }).await
    }

    pub async fn spawn_player(
        &self,
        id: i32,
        uuid: Uuid,
        x: f64,
        y: f64,
        z: f64,
        yaw: Angle,
        pitch: Angle,
    ) -> anyhow::Result<()> {
        self.send(&SpawnPlayerS2c {
            entity_id: id,
            uuid,
            x,
            y,
            z,
            yaw,
            pitch,
        })
        .await
    }

    pub async fn head_look(&self, id: i32, yaw: Angle) -> anyhow::Result<()> {
        self.send(&EntityHeadLookS2c { entity_id: id, yaw }).await
    }

    pub async fn teleport(
        &self,
        id: i32,
        x: f64,
        y: f64,
        z: f64,
        yaw: Angle,
        pitch: Angle,
        on_ground: bool,
    ) -> anyhow::Result<()> {
        self.send(&EntityTeleportS2c {
            entity_id: id,
            x,
            y,
            z,
            yaw,
            pitch,
            on_ground,
        })
        .await
    }

    pub async fn rotation(
        &self,
        id: i32,
        yaw: Angle,
        pitch: Angle,
        on_ground: bool,
    ) -> anyhow::Result<()> {
        self.send(&EntityRotationS2c {
            entity_id: id,
            yaw,
            pitch,
            on_ground,
        })
        .await
    }

    /// Relays an entity action as a metadata update. Actions outside the
    /// table emit nothing.
    pub async fn entity_action(&self, id: i32, action: i32) -> anyhow::Result<()> {
        let Some((index, kind, value)) = entity_action_metadata(action) else {
            return Ok(());
        };
        self.send(&EntityMetadataS2c {
            entity_id: id,
            index,
            kind,
            value,
        })
        .await
    }

    pub async fn entity_animation(&self, id: i32, animation: i32) -> anyhow::Result<()> {
        self.send(&EntityAnimationS2c {
            entity_id: id,
            animation,
        })
        .await
    }

    pub async fn player_info_add(&self, entries: &[PlayerInfoEntry<'_>]) -> anyhow::Result<()> {
        self.send(&PlayerInfoAddS2c {
            entries: entries.to_vec(),
        })
        .await
    }

    pub async fn player_info_remove(&self, uuid: Uuid) -> anyhow::Result<()> {
        self.send(&PlayerInfoRemoveS2c { uuid }).await
    }

    pub async fn destroy_entity(&self, id: i32) -> anyhow::Result<()> {
        self.send(&DestroyEntitiesS2c {
            entity_ids: vec![id],
        })
        .await
    }

    pub async fn update_view_position(&self, chunk_x: i32, chunk_z: i32) -> anyhow::Result<()> {
        self.send(&UpdateViewPositionS2c { chunk_x, chunk_z }).await
    }
}

/// Metadata field triple for a relayed entity action: sneaking toggles the
/// pose field, sprinting the status bit mask.
fn entity_action_metadata(action: i32) -> Option<(u8, i32, i32)> {
    match action {
        0 => Some((6, 18, 5)), // start sneaking
        1 => Some((6, 18, 0)), // stop sneaking
        3 => Some((0, 0, 8)),  // start sprinting
        4 => Some((0, 0, 0)),  // stop sprinting
        _ => None,
    }
}
