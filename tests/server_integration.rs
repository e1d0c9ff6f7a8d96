//! End-to-end tests driving a live server over localhost sockets with a
//! minimal hand-rolled client.

use std::{net::SocketAddr, time::Duration};

use ember::{config::EmberConfig, server::Server, utils::leak};
use net::{
    ChatMessageS2c, EntityHeadLookS2c, EntityTeleportS2c, HandshakeC2s, HandshakeNextState,
    LoginStartC2s, LoginSuccessS2c, PROTOCOL_VERSION, PacketDecoder, PacketEncode, PacketFrame,
    PlayerInfoAddS2c, PlayerPositionAndLookS2c, PlayerPositionC2s, ServerDifficultyS2c,
    StatusPingC2s, StatusPongS2c, StatusRequestC2s, StatusResponseS2c, Uuid, encode_packet,
    mc::io::read_i32_be,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    time::timeout,
};

const STATUS_JSON: &str = "{\"version\": {\"name\": \"1.16.5\",\"protocol\": 754},\"players\": {\"max\": 10,\"online\": 5},\"description\": {\"text\": \"Minecraft Light Server Go\"}}";

async fn start_server() -> (&'static Server, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let server = leak(Server::new(EmberConfig::with_port(address.port())));
    tokio::spawn(server.serve(listener));
    (server, address)
}

struct Client {
    stream: TcpStream,
    dec: PacketDecoder,
}

impl Client {
    async fn connect(address: SocketAddr) -> Self {
        let stream = timeout(Duration::from_secs(5), TcpStream::connect(address))
            .await
            .expect("connect timed out")
            .expect("connect failed");
        Self {
            stream,
            dec: PacketDecoder::new(),
        }
    }

    async fn send<P: PacketEncode>(&mut self, pkt: &P) {
        let mut bytes = Vec::new();
        encode_packet(&mut bytes, pkt).unwrap();
        self.stream.write_all(&bytes).await.unwrap();
    }

    async fn next_frame(&mut self) -> anyhow::Result<PacketFrame> {
        let deadline = Duration::from_secs(5);
        timeout(deadline, async {
            loop {
                if let Some(frame) = self.dec.try_next_packet()? {
                    return Ok(frame);
                }
                let mut buf = [0u8; 1024];
                let n = self.stream.read(&mut buf).await?;
                if n == 0 {
                    anyhow::bail!("connection closed");
                }
                self.dec.queue_slice(&buf[..n]);
            }
        })
        .await
        .expect("read timed out")
    }

    async fn expect_frame(&mut self, id: i32) -> PacketFrame {
        let frame = self.next_frame().await.expect("expected a frame");
        assert_eq!(frame.id, id, "expected packet 0x{id:02X}, got 0x{:02X}", frame.id);
        frame
    }

    /// Reads frames until one with `id` shows up, returning it and every
    /// frame skipped along the way.
    async fn read_until(&mut self, id: i32) -> (PacketFrame, Vec<PacketFrame>) {
        let mut skipped = Vec::new();
        loop {
            let frame = self.next_frame().await.expect("expected a frame");
            if frame.id == id {
                return (frame, skipped);
            }
            skipped.push(frame);
        }
    }

    async fn handshake(&mut self, protocol_version: i32, next_state: HandshakeNextState) {
        self.send(&HandshakeC2s {
            protocol_version,
            server_address: "localhost",
            server_port: 25565,
            next_state,
        })
        .await;
    }

    /// Full login: returns the server-assigned UUID.
    async fn login(address: SocketAddr, username: &str) -> (Self, Uuid) {
        let mut client = Self::connect(address).await;
        client
            .handshake(PROTOCOL_VERSION, HandshakeNextState::Login)
            .await;
        client.send(&LoginStartC2s { username }).await;

        let frame = client.expect_frame(0x02).await;
        let success: LoginSuccessS2c = frame.decode().unwrap();
        assert_eq!(success.username, username);
        (client, success.uuid)
    }

    /// Login and drain the whole join sequence up to the join chat line.
    async fn join(address: SocketAddr, username: &str) -> (Self, Uuid) {
        let (mut client, uuid) = Self::login(address, username).await;
        let expected = format!("<Server> {username} joined the server");
        loop {
            let frame = client.next_frame().await.expect("expected a frame");
            if frame.id == 0x0E {
                let chat: ChatMessageS2c = frame.decode().unwrap();
                if chat.json.contains(&expected) {
                    return (client, uuid);
                }
            }
        }
    }
}

async fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("timed out waiting for {what}");
}

#[tokio::test]
async fn status_ping() {
    let (_server, address) = start_server().await;
    let mut client = Client::connect(address).await;

    client
        .handshake(PROTOCOL_VERSION, HandshakeNextState::Status)
        .await;
    client.send(&StatusRequestC2s).await;

    let frame = client.expect_frame(0x00).await;
    let response: StatusResponseS2c = frame.decode().unwrap();
    assert_eq!(response.json, STATUS_JSON);

    client
        .send(&StatusPingC2s {
            payload: 0x0102_0304_0506_0708,
        })
        .await;
    let frame = client.expect_frame(0x01).await;
    let pong: StatusPongS2c = frame.decode().unwrap();
    assert_eq!(pong.payload, 0x0102_0304_0506_0708);

    // The server hangs up after the pong.
    assert!(client.next_frame().await.is_err());
}

#[tokio::test]
async fn wrong_protocol_version_is_rejected() {
    let (server, address) = start_server().await;
    let mut client = Client::connect(address).await;

    client.handshake(753, HandshakeNextState::Login).await;

    // No login success; the connection just dies.
    assert!(client.next_frame().await.is_err());
    assert_eq!(server.online_count(), 0);
}

#[tokio::test]
async fn login_and_join_sequence() {
    let (server, address) = start_server().await;
    let (mut client, uuid) = Client::login(address, "alice").await;

    client.expect_frame(0x24).await; // join game

    let frame = client.expect_frame(0x34).await;
    let look: PlayerPositionAndLookS2c = frame.decode().unwrap();
    assert_eq!((look.x, look.y, look.z), (0.0, 5.0, 0.0));
    assert_eq!(look.teleport_id, uuid.entity_id());

    let frame = client.expect_frame(0x0D).await;
    let difficulty: ServerDifficultyS2c = frame.decode().unwrap();
    assert_eq!(difficulty.difficulty, 0);
    assert!(difficulty.locked);

    for expected in [(-1, 0), (0, 0), (-1, -1), (0, -1)] {
        let frame = client.expect_frame(0x20).await;
        let mut body = frame.body.as_slice();
        let chunk_x = read_i32_be(&mut body).unwrap();
        let chunk_z = read_i32_be(&mut body).unwrap();
        assert_eq!((chunk_x, chunk_z), expected);
    }

    let frame = client.expect_frame(0x32).await;
    let info: PlayerInfoAddS2c = frame.decode().unwrap();
    assert_eq!(info.entries.len(), 1);
    assert_eq!(info.entries[0].username, "alice");
    assert_eq!(info.entries[0].uuid, uuid);

    let frame = client.expect_frame(0x0E).await;
    let chat: ChatMessageS2c = frame.decode().unwrap();
    assert!(chat.json.contains("<Server> alice joined the server"));

    assert_eq!(server.online_count(), 1);
    assert!(server.is_online("alice"));
}

#[tokio::test]
async fn duplicate_username_evicts_prior_session() {
    let (server, address) = start_server().await;

    let (mut first, _) = Client::join(address, "bob").await;
    assert_eq!(server.online_count(), 1);

    let (_second, _) = Client::join(address, "bob").await;

    // The first session's socket is closed; draining it ends in an error.
    let evicted: anyhow::Result<()> = async {
        loop {
            first.next_frame().await?;
        }
    }
    .await;
    assert!(evicted.is_err());

    // Exactly one "bob" remains and the count never moved.
    wait_until("registry to settle", || server.online_count() == 1).await;
    assert!(server.is_online("bob"));
}

#[tokio::test]
async fn movement_is_broadcast_to_others_only() {
    let (_server, address) = start_server().await;

    let (mut a, a_uuid) = Client::join(address, "a").await;
    let (mut b, _b_uuid) = Client::join(address, "b").await;

    // Let "b" finish hearing about "a" (spawn + head look) so the movement
    // packets below are the only thing in flight.
    b.read_until(0x04).await;
    b.expect_frame(0x3A).await;

    a.send(&PlayerPositionC2s {
        x: 10.0,
        y: 5.0,
        z: 10.0,
        on_ground: true,
    })
    .await;

    // "b" sees the teleport and then the head look, in that order.
    let (frame, _skipped) = b.read_until(0x56).await;
    let teleport: EntityTeleportS2c = frame.decode().unwrap();
    assert_eq!(teleport.entity_id, a_uuid.entity_id());
    assert_eq!((teleport.x, teleport.y, teleport.z), (10.0, 5.0, 10.0));
    assert!(teleport.on_ground);

    let frame = b.expect_frame(0x3A).await;
    let look: EntityHeadLookS2c = frame.decode().unwrap();
    assert_eq!(look.entity_id, a_uuid.entity_id());

    // "a" must not hear about its own movement. Flush with a chat line from
    // "b" and check everything that arrived before it.
    b.send(&net::ChatMessageC2s { message: "flush" }).await;
    let mut seen = Vec::new();
    loop {
        let frame = a.next_frame().await.expect("expected a frame");
        if frame.id == 0x0E {
            let chat: ChatMessageS2c = frame.decode().unwrap();
            if chat.json.contains("<b> flush") {
                break;
            }
        }
        seen.push(frame);
    }
    for frame in seen {
        assert_ne!(frame.id, 0x56, "mover received its own teleport");
        if frame.id == 0x3A {
            let look: EntityHeadLookS2c = frame.decode().unwrap();
            assert_ne!(look.entity_id, a_uuid.entity_id());
        }
    }
}

#[tokio::test]
async fn chat_reaches_everyone() {
    let (_server, address) = start_server().await;

    let (mut a, _) = Client::join(address, "a").await;
    let (mut b, _) = Client::join(address, "b").await;

    a.send(&net::ChatMessageC2s { message: "hi" }).await;

    for client in [&mut a, &mut b] {
        loop {
            let frame = client.next_frame().await.expect("expected a frame");
            if frame.id == 0x0E {
                let chat: ChatMessageS2c = frame.decode().unwrap();
                if chat.json.contains("<a> hi") {
                    break;
                }
            }
        }
    }
}

#[tokio::test]
async fn parallel_joins_and_disconnects_converge() {
    let (server, address) = start_server().await;

    let names: Vec<String> = (0..8).map(|i| format!("player{i}")).collect();
    let mut handles = Vec::new();
    for name in &names {
        let name = name.clone();
        handles.push(tokio::spawn(async move {
            Client::join(address, &name).await.0
        }));
    }
    let mut clients: Vec<Client> = {
        let mut joined = Vec::new();
        for handle in handles {
            joined.push(handle.await.unwrap());
        }
        joined
    };

    wait_until("all players online", || server.online_count() == 8).await;
    for name in &names {
        assert!(server.is_online(name));
    }

    clients.clear(); // drops every socket

    wait_until("registry to drain", || server.online_count() == 0).await;
    for name in &names {
        assert!(!server.is_online(name));
    }
}

#[tokio::test]
async fn listener_moves_to_new_port() {
    let (server, old_address) = start_server().await;

    // Grab a free port, then hand it to the server.
    let probe = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let new_port = probe.local_addr().unwrap().port();
    drop(probe);

    server.set_port(&new_port.to_string()).await.unwrap();

    let new_address: SocketAddr = format!("127.0.0.1:{new_port}").parse().unwrap();
    let mut client = Client::connect(new_address).await;
    client
        .handshake(PROTOCOL_VERSION, HandshakeNextState::Status)
        .await;
    client.send(&StatusRequestC2s).await;
    let frame = client.expect_frame(0x00).await;
    let response: StatusResponseS2c = frame.decode().unwrap();
    assert_eq!(response.json, STATUS_JSON);

    // The old listener is gone.
    assert!(TcpStream::connect(old_address).await.is_err());
}
