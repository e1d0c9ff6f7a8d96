use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use dashmap::DashMap;
use net::{Angle, PlayerInfoEntry};
use tokio::{
    net::TcpListener,
    sync::{Notify, mpsc, oneshot},
};

use crate::{config::EmberConfig, logging::EmberLogger, player::Player, session};

/// Heartbeat cadence. The stock client gives up after ~20 seconds.
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(18);

struct PortChange {
    port: String,
    reply: oneshot::Sender<anyhow::Result<()>>,
}

/// The running server: the accept loop, the registry of online players
/// keyed by username, and every fan-out broadcast.
pub struct Server {
    config: EmberConfig,
    players: DashMap<String, Arc<Player>>,
    counter: Mutex<i32>,
    port_tx: mpsc::Sender<PortChange>,
    port_rx: Mutex<Option<mpsc::Receiver<PortChange>>>,
    shutdown: Notify,
}

impl Server {
    pub fn new(config: EmberConfig) -> Self {
        let (port_tx, port_rx) = mpsc::channel(1);
        Self {
            config,
            players: DashMap::new(),
            counter: Mutex::new(0),
            port_tx,
            port_rx: Mutex::new(Some(port_rx)),
            shutdown: Notify::new(),
        }
    }

    /// Binds the configured address and runs the accept loop. A bind
    /// failure surfaces here; accept failures are logged and swallowed.
    pub async fn start(&'static self) -> anyhow::Result<()> {
        EmberLogger::preparing_socket(&self.config.bind);
        let listener = TcpListener::bind(&self.config.bind).await?;
        self.serve(listener).await
    }

    /// Runs the accept loop on an already-bound listener.
    pub async fn serve(&'static self, mut listener: TcpListener) -> anyhow::Result<()> {
        EmberLogger::listening(&listener.local_addr()?);
        let mut port_rx = self
            .port_rx
            .lock()
            .expect("port channel poisoned")
            .take()
            .ok_or_else(|| anyhow::anyhow!("server already started"))?;

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, address)) => {
                        if dotenvy::var("NO_NODELAY").is_err() {
                            if let Err(e) = stream.set_nodelay(true) {
                                EmberLogger::tcp_nodelay_failed(&e);
                            }
                        }
                        tokio::spawn(async move {
                            if let Err(e) = session::handle_connection(self, stream, address).await {
                                EmberLogger::connection_closed(&address, &e);
                            }
                        });
                    }
                    Err(e) => EmberLogger::accept_failed(&e),
                },
                change = port_rx.recv() => {
                    let Some(change) = change else { break };
                    let bind = format!("0.0.0.0:{}", change.port);
                    match TcpListener::bind(&bind).await {
                        Ok(rebound) => {
                            listener = rebound;
                            EmberLogger::port_changed(&change.port);
                            let _ = change.reply.send(Ok(()));
                        }
                        Err(e) => {
                            EmberLogger::port_change_failed(&change.port, &e.into());
                            let _ = change.reply.send(Err(anyhow::anyhow!(
                                "failed to bind {bind}"
                            )));
                        }
                    }
                },
                _ = self.shutdown.notified() => break,
            }
        }
        Ok(())
    }

    /// Moves the listener to another port while the server is running. The
    /// old listener stays if the new bind fails.
    pub async fn set_port(&self, port: &str) -> anyhow::Result<()> {
        let (reply, response) = oneshot::channel();
        self.port_tx
            .send(PortChange {
                port: port.to_string(),
                reply,
            })
            .await
            .map_err(|_| anyhow::anyhow!("server is not running"))?;
        response.await?
    }

    /// Closes the acceptor and disconnects every player.
    pub async fn close(&self) {
        EmberLogger::server_closing();
        self.shutdown.notify_one();
        for session in self.sessions() {
            self.remove_player(&session, "server closed").await;
        }
    }

    pub fn online_count(&self) -> i32 {
        *self.counter.lock().expect("player counter poisoned")
    }

    pub fn is_online(&self, username: &str) -> bool {
        self.players.contains_key(username)
    }

    /// Snapshot of the live sessions. Iterating a snapshot keeps shard
    /// locks out of the broadcast awaits; entries joining or leaving
    /// mid-broadcast may be missed or included.
    fn sessions(&self) -> Vec<Arc<Player>> {
        self.players.iter().map(|e| e.value().clone()).collect()
    }

    // ── Registry ────────────────────────────────────────────────────────

    /// Installs a freshly logged-in player. A prior holder of the username
    /// is disconnected first; the count only moves when the population
    /// actually grew.
    pub async fn add_player(&self, player: Arc<Player>) {
        let prior = self
            .players
            .remove(player.username.as_str())
            .map(|(_, p)| p);
        match prior {
            Some(prior) => self.finish_removal(&prior, "replaced by new login").await,
            None => *self.counter.lock().expect("player counter poisoned") += 1,
        }
        self.players.insert(player.username.clone(), player);
    }

    /// Removes a player. Idempotent: every failure path of a session funnels
    /// here, and only the first call tears anything down.
    pub async fn remove_player(&self, player: &Arc<Player>, reason: &str) {
        self.unregister(player);
        self.finish_removal(player, reason).await;
    }

    /// Drops the map entry and the count, but only while the entry still
    /// points at this very session; a same-name replacement stays put.
    fn unregister(&self, player: &Arc<Player>) {
        let removed = self
            .players
            .remove_if(player.username.as_str(), |_, current| {
                Arc::ptr_eq(current, player)
            });
        if removed.is_some() {
            *self.counter.lock().expect("player counter poisoned") -= 1;
        }
    }

    /// Tombstones and closes the session, then tells everyone else. The
    /// departure notices can themselves expose dead recipients; those leave
    /// through the same gate until the roster is quiet.
    async fn finish_removal(&self, player: &Arc<Player>, reason: &str) {
        if !player.retire() {
            return;
        }
        player.shutdown_socket().await;
        EmberLogger::player_removed(&player.username, reason);

        let mut departed = vec![(player.uuid, player.entity_id())];
        while let Some((uuid, entity_id)) = departed.pop() {
            for session in self.sessions() {
                let sent = async {
                    session.player_info_remove(uuid).await?;
                    session.destroy_entity(entity_id).await
                }
                .await;

                if let Err(err) = sent {
                    self.unregister(&session);
                    if session.retire() {
                        session.shutdown_socket().await;
                        EmberLogger::player_removed(&session.username, &err.to_string());
                        departed.push((session.uuid, session.entity_id()));
                    }
                }
            }
        }
    }

    // ── Keep-alive ──────────────────────────────────────────────────────

    /// One heartbeat loop per session, a fresh random payload each tick.
    /// A failed send removes the session and ends the loop.
    pub fn spawn_keep_alive(&'static self, player: Arc<Player>) {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(KEEP_ALIVE_INTERVAL);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if player.is_gone() {
                            break;
                        }
                        if let Err(err) = player.keep_alive(rand::random::<i64>()).await {
                            EmberLogger::keep_alive_failed(&player.username, &err);
                            self.remove_player(&player, &err.to_string()).await;
                            break;
                        }
                    }
                    _ = player.wait_closed() => break,
                }
            }
        });
    }

    // ── Broadcasts ──────────────────────────────────────────────────────

    /// Sends every session the full current roster.
    pub async fn broadcast_player_info(&self) {
        let sessions = self.sessions();
        let entries: Vec<PlayerInfoEntry<'_>> = sessions
            .iter()
            .map(|p| PlayerInfoEntry {
                uuid: p.uuid,
                username: p.username.as_str(),
            })
            .collect();

        for session in &sessions {
            if let Err(err) = session.player_info_add(&entries).await {
                self.remove_player(session, &err.to_string()).await;
            }
        }
    }

    /// Sends every session a spawn + head look for every other session.
    pub async fn broadcast_spawn_player(&self) {
        let sessions = self.sessions();
        for current in &sessions {
            for other in &sessions {
                if current.uuid == other.uuid {
                    continue;
                }
                let pose = other.pose();
                let sent = async {
                    current
                        .spawn_player(
                            other.entity_id(),
                            other.uuid,
                            pose.x,
                            pose.y,
                            pose.z,
                            pose.yaw_angle,
                            pose.pitch_angle,
                        )
                        .await?;
                    current.head_look(other.entity_id(), pose.yaw_angle).await
                }
                .await;

                if let Err(err) = sent {
                    self.remove_player(current, &err.to_string()).await;
                    break;
                }
            }
        }
    }

    pub async fn broadcast_chat_message(&self, msg: &str, username: &str) {
        for session in self.sessions() {
            if let Err(err) = session.chat(msg, username).await {
                self.remove_player(&session, &err.to_string()).await;
            }
        }
        EmberLogger::broadcast_chat(username, msg);
    }

    /// Relays a movement to everyone but the mover: teleport, then head look.
    #[allow(clippy::too_many_arguments)]
    pub async fn broadcast_player_pos_and_look(
        &self,
        id: i32,
        x: f64,
        y: f64,
        z: f64,
        yaw: Angle,
        pitch: Angle,
        on_ground: bool,
    ) {
        for session in self.sessions() {
            if session.entity_id() == id {
                continue;
            }
            let sent = async {
                session.teleport(id, x, y, z, yaw, pitch, on_ground).await?;
                session.head_look(id, yaw).await
            }
            .await;
            if let Err(err) = sent {
                self.remove_player(&session, &err.to_string()).await;
            }
        }
    }

    /// Relays a look change to everyone but the mover: rotation, then
    /// head look.
    pub async fn broadcast_player_rotation(
        &self,
        id: i32,
        yaw: Angle,
        pitch: Angle,
        on_ground: bool,
    ) {
        for session in self.sessions() {
            if session.entity_id() == id {
                continue;
            }
            let sent = async {
                session.rotation(id, yaw, pitch, on_ground).await?;
                session.head_look(id, yaw).await
            }
            .await;
            if let Err(err) = sent {
                self.remove_player(&session, &err.to_string()).await;
            }
        }
    }

    pub async fn broadcast_entity_action(&self, id: i32, action: i32) {
        for session in self.sessions() {
            if session.entity_id() == id {
                continue;
            }
            if let Err(err) = session.entity_action(id, action).await {
                self.remove_player(&session, &err.to_string()).await;
            }
        }
    }

    pub async fn broadcast_entity_animation(&self, id: i32, animation: i32) {
        for session in self.sessions() {
            if session.entity_id() == id {
                continue;
            }
            if let Err(err) = session.entity_animation(id, animation).await {
                self.remove_player(&session, &err.to_string()).await;
            }
        }
    }
}
