use super::{
    error::ProtoError,
    io::{
        read_bool, read_f32_be, read_f64_be, read_i16_be, read_i64_be, read_string_bounded,
        read_u16_be, read_u64_be, read_uuid, write_bool, write_f32_be, write_f64_be, write_i16_be,
        write_i64_be, write_string_bounded, write_u16_be, write_u64_be, write_uuid,
    },
    packets::{
        AnimationC2s, ChatMessageC2s, ChatMessageS2c, ChunkDataS2c, DestroyEntitiesS2c,
        EntityActionC2s, EntityAnimationS2c, EntityHeadLookS2c, EntityMetadataS2c,
        EntityTeleportS2c, HandshakeC2s, LoginStartC2s, LoginSuccessS2c, PROTOCOL_VERSION,
        PlayerInfoAddS2c, PlayerInfoEntry, PlayerInfoRemoveS2c, PlayerPositionAndLookS2c,
        PlayerPositionC2s, ServerboundPacket, StatusPingC2s,
    },
    state::{HandshakeNextState, PacketState},
    types::{Angle, PacketDecoder, PacketEncode, PacketEncoder, Position, Uuid, encode_raw_packet},
    varint::{read_varint, read_varlong, varint_len, write_varint, write_varlong},
};

fn roundtrip_frame<P: PacketEncode>(pkt: &P) -> super::types::PacketFrame {
    let mut enc = PacketEncoder::new();
    enc.write_packet(pkt).unwrap();
    let bytes = enc.take();

    let mut dec = PacketDecoder::new();
    dec.queue_slice(&bytes);
    let frame = dec.try_next_packet().unwrap().unwrap();
    assert_eq!(frame.id, P::ID);
    frame
}

#[test]
fn varint_roundtrip() {
    let values = [0, 1, 2, 127, 128, 255, 25565, 2_147_483_647, -1, -2_147_483_648];
    for value in values {
        let mut buf = Vec::new();
        write_varint(&mut buf, value);
        assert!((1..=5).contains(&buf.len()));
        assert_eq!(buf.len(), varint_len(value));

        let mut slice = buf.as_slice();
        let decoded = read_varint(&mut slice).unwrap();
        assert_eq!(decoded, value);
        assert!(slice.is_empty());
    }
}

#[test]
fn varint_negative_uses_five_bytes() {
    let mut buf = Vec::new();
    write_varint(&mut buf, -1);
    assert_eq!(buf, [0xff, 0xff, 0xff, 0xff, 0x0f]);
}

#[test]
fn varint_sixth_continuation_byte_rejected() {
    let bytes = [0x80u8, 0x80, 0x80, 0x80, 0x80, 0x01];
    let mut slice = bytes.as_slice();
    assert_eq!(read_varint(&mut slice), Err(ProtoError::VarIntTooLarge));
}

#[test]
fn varint_short_input_is_eof() {
    let bytes = [0x80u8, 0x80];
    let mut slice = bytes.as_slice();
    assert_eq!(read_varint(&mut slice), Err(ProtoError::UnexpectedEof));
}

#[test]
fn varlong_roundtrip() {
    let values = [
        0i64,
        1,
        127,
        128,
        0x0102_0304_0506_0708,
        i64::MAX,
        -1,
        i64::MIN,
    ];
    for value in values {
        let mut buf = Vec::new();
        write_varlong(&mut buf, value);
        assert!((1..=10).contains(&buf.len()));

        let mut slice = buf.as_slice();
        let decoded = read_varlong(&mut slice).unwrap();
        assert_eq!(decoded, value);
        assert!(slice.is_empty());
    }
}

#[test]
fn varlong_eleventh_continuation_byte_rejected() {
    let bytes = [0x80u8; 11];
    let mut slice = bytes.as_slice();
    assert_eq!(read_varlong(&mut slice), Err(ProtoError::VarLongTooLarge));
}

#[test]
fn bool_accepts_any_nonzero_byte() {
    for byte in [0x01u8, 0x02, 0x7f, 0xff] {
        let bytes = [byte];
        let mut slice = bytes.as_slice();
        assert!(read_bool(&mut slice).unwrap());
    }
    let bytes = [0x00u8];
    let mut slice = bytes.as_slice();
    assert!(!read_bool(&mut slice).unwrap());

    let mut buf = Vec::new();
    write_bool(&mut buf, true);
    write_bool(&mut buf, false);
    assert_eq!(buf, [0x01, 0x00]);
}

#[test]
fn integer_roundtrips() {
    let mut buf = Vec::new();
    write_u16_be(&mut buf, 25565);
    write_i16_be(&mut buf, -12345);
    write_i64_be(&mut buf, 0x0102_0304_0506_0708);
    write_u64_be(&mut buf, u64::MAX);

    let mut slice = buf.as_slice();
    assert_eq!(read_u16_be(&mut slice).unwrap(), 25565);
    assert_eq!(read_i16_be(&mut slice).unwrap(), -12345);
    assert_eq!(read_i64_be(&mut slice).unwrap(), 0x0102_0304_0506_0708);
    assert_eq!(read_u64_be(&mut slice).unwrap(), u64::MAX);
    assert!(slice.is_empty());
}

#[test]
fn integers_are_big_endian() {
    let mut buf = Vec::new();
    write_u16_be(&mut buf, 25565); // 0x63DD
    assert_eq!(buf, [0x63, 0xDD]);

    buf.clear();
    write_i64_be(&mut buf, 0x0102_0304_0506_0708);
    assert_eq!(buf, [1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn float_roundtrips() {
    for value in [0.0f32, 1.5, -90.0, 360.0, f32::MIN, f32::MAX, f32::INFINITY] {
        let mut buf = Vec::new();
        write_f32_be(&mut buf, value);
        let mut slice = buf.as_slice();
        assert_eq!(read_f32_be(&mut slice).unwrap(), value);
    }
    for value in [0.0f64, 5.0, -10.25, 1e300, f64::MIN_POSITIVE, f64::NEG_INFINITY] {
        let mut buf = Vec::new();
        write_f64_be(&mut buf, value);
        let mut slice = buf.as_slice();
        assert_eq!(read_f64_be(&mut slice).unwrap(), value);
    }
}

#[test]
fn string_roundtrip() {
    for value in ["", "alice", "Ｍｉｎｅｃｒａｆｔ", "ünïcödé"] {
        let mut buf = Vec::new();
        write_string_bounded(&mut buf, value, 255).unwrap();
        let mut slice = buf.as_slice();
        assert_eq!(read_string_bounded(&mut slice, 255).unwrap(), value);
        assert!(slice.is_empty());
    }
}

#[test]
fn string_over_bound_rejected() {
    let long = "x".repeat(17);
    let mut buf = Vec::new();
    assert!(write_string_bounded(&mut buf, &long, 16).is_err());

    buf.clear();
    write_string_bounded(&mut buf, &long, 255).unwrap();
    let mut slice = buf.as_slice();
    assert!(matches!(
        read_string_bounded(&mut slice, 16),
        Err(ProtoError::StringTooLong { max: 16, .. }) | Err(ProtoError::LengthTooLarge { .. })
    ));
}

#[test]
fn string_truncated_is_eof() {
    let mut buf = Vec::new();
    write_string_bounded(&mut buf, "steve", 16).unwrap();
    buf.truncate(buf.len() - 2);
    let mut slice = buf.as_slice();
    assert_eq!(
        read_string_bounded(&mut slice, 16),
        Err(ProtoError::UnexpectedEof)
    );
}

#[test]
fn uuid_roundtrip_and_display() {
    let uuid = Uuid::from_u64s(0x0102_0304_0506_0708, 0x090a_0b0c_0d0e_0f10);
    let mut buf = Vec::new();
    write_uuid(&mut buf, &uuid);
    assert_eq!(buf.len(), 16);

    let mut slice = buf.as_slice();
    assert_eq!(read_uuid(&mut slice).unwrap(), uuid);
    assert_eq!(uuid.to_string(), "01020304-0506-0708-090a-0b0c0d0e0f10");
}

#[test]
fn uuid_entity_id_is_first_four_bytes() {
    let uuid = Uuid::from_u64s(0x1122_3344_5566_7788, 0);
    assert_eq!(uuid.entity_id(), 0x1122_3344);

    let uuid = Uuid::from_u64s(0xfffe_fdfc_0000_0000, 0);
    assert_eq!(uuid.entity_id(), i32::from_be_bytes([0xff, 0xfe, 0xfd, 0xfc]));
}

#[test]
fn angle_from_degrees() {
    assert_eq!(Angle::from_degrees(0.0).as_byte(), 0);
    assert_eq!(Angle::from_degrees(90.0).as_byte(), 64);
    assert_eq!(Angle::from_degrees(180.0).as_byte(), 128);
    assert_eq!(Angle::from_degrees(359.0).as_byte(), 255);
    // Out-of-range degrees wrap into the byte.
    assert_eq!(Angle::from_degrees(360.0).as_byte(), 0);
    assert_eq!(Angle::from_degrees(-90.0).as_byte(), 192);
}

#[test]
fn angle_roundtrip_within_one_step() {
    const STEP: f32 = 360.0 / 256.0;
    for deg in [0.0f32, 0.7, 45.0, 89.9, 180.0, 255.3, 359.9] {
        let back = Angle::from_degrees(deg).to_degrees();
        let wrapped = deg.rem_euclid(360.0);
        assert!(
            (back - wrapped).abs() < STEP,
            "{deg} -> {back}, expected within {STEP} of {wrapped}"
        );
    }
}

#[test]
fn position_roundtrip() {
    let xs = [-(1 << 25), (1 << 25) - 1, -1, 0, 1, 123_456, -30_000_000 / 16];
    let ys = [-(1 << 11), (1 << 11) - 1, -1, 0, 64];
    for &x in &xs {
        for &y in &ys {
            let pos = Position { x, y, z: -x }; // z shares the x range
            let back = Position::unpack(pos.pack());
            assert_eq!(back, pos);
        }
    }
}

#[test]
fn position_known_packing() {
    // x in the high 26 bits, z in the middle, y in the low 12.
    let pos = Position { x: 1, y: 2, z: 3 };
    assert_eq!(pos.pack(), (1u64 << 38) | (3u64 << 12) | 2);
}

#[test]
fn frame_roundtrip_arbitrary_id_and_body() {
    let bodies: [&[u8]; 3] = [&[], &[0xde, 0xad, 0xbe, 0xef], &[0x00; 300]];
    for id in [0x00, 0x44, 0x56, 0x7fff_ffff] {
        for body in bodies {
            let mut bytes = Vec::new();
            encode_raw_packet(&mut bytes, id, body).unwrap();

            let mut dec = PacketDecoder::new();
            dec.queue_slice(&bytes);
            let frame = dec.try_next_packet().unwrap().unwrap();
            assert_eq!(frame.id, id);
            assert_eq!(frame.body, body);
            assert!(dec.try_next_packet().unwrap().is_none());
        }
    }
}

#[test]
fn decoder_waits_for_complete_frame() {
    let mut bytes = Vec::new();
    encode_raw_packet(&mut bytes, 0x03, b"hello").unwrap();

    let mut dec = PacketDecoder::new();
    for &byte in &bytes[..bytes.len() - 1] {
        dec.queue_slice(&[byte]);
        assert!(dec.try_next_packet().unwrap().is_none());
    }
    dec.queue_slice(&bytes[bytes.len() - 1..]);
    let frame = dec.try_next_packet().unwrap().unwrap();
    assert_eq!(frame.id, 0x03);
    assert_eq!(frame.body, b"hello");
}

#[test]
fn decoder_handles_back_to_back_frames() {
    let mut bytes = Vec::new();
    encode_raw_packet(&mut bytes, 0x01, &[1, 2, 3]).unwrap();
    encode_raw_packet(&mut bytes, 0x02, &[4]).unwrap();

    let mut dec = PacketDecoder::new();
    dec.queue_slice(&bytes);
    assert_eq!(dec.try_next_packet().unwrap().unwrap().id, 0x01);
    assert_eq!(dec.try_next_packet().unwrap().unwrap().id, 0x02);
    assert!(dec.try_next_packet().unwrap().is_none());
}

#[test]
fn decoder_rejects_zero_length() {
    let mut dec = PacketDecoder::new();
    dec.queue_slice(&[0x00]);
    assert_eq!(
        dec.try_next_packet(),
        Err(ProtoError::InvalidLength(0))
    );
}

#[test]
fn handshake_roundtrip() {
    let packet = HandshakeC2s {
        protocol_version: PROTOCOL_VERSION,
        server_address: "localhost",
        server_port: 25565,
        next_state: HandshakeNextState::Login,
    };

    let frame = roundtrip_frame(&packet);
    let decoded = frame.decode_serverbound(PacketState::Handshaking).unwrap();
    match decoded {
        ServerboundPacket::Handshake(actual) => assert_eq!(actual, packet),
        _ => panic!("unexpected packet"),
    }
}

#[test]
fn handshake_bad_next_state_rejected() {
    let packet = HandshakeC2s {
        protocol_version: PROTOCOL_VERSION,
        server_address: "localhost",
        server_port: 25565,
        next_state: HandshakeNextState::Status,
    };
    let mut enc = PacketEncoder::new();
    enc.write_packet(&packet).unwrap();
    let mut bytes = enc.take();
    // Rewrite the trailing next_state varint (1) to 3.
    *bytes.last_mut().unwrap() = 3;

    let mut dec = PacketDecoder::new();
    dec.queue_slice(&bytes);
    let frame = dec.try_next_packet().unwrap().unwrap();
    assert_eq!(
        frame.decode_serverbound(PacketState::Handshaking),
        Err(ProtoError::InvalidHandshakeState(3))
    );
}

#[test]
fn login_start_roundtrip() {
    let packet = LoginStartC2s { username: "alice" };
    let frame = roundtrip_frame(&packet);
    let decoded = frame.decode_serverbound(PacketState::Login).unwrap();
    match decoded {
        ServerboundPacket::LoginStart(actual) => assert_eq!(actual, packet),
        _ => panic!("unexpected packet"),
    }
}

#[test]
fn status_ping_roundtrip() {
    let packet = StatusPingC2s {
        payload: 0x0102_0304_0506_0708,
    };
    let frame = roundtrip_frame(&packet);
    let decoded = frame.decode_serverbound(PacketState::Status).unwrap();
    match decoded {
        ServerboundPacket::StatusPing(actual) => assert_eq!(actual, packet),
        _ => panic!("unexpected packet"),
    }
}

#[test]
fn wrong_id_for_state_rejected() {
    let packet = StatusPingC2s { payload: 7 };
    let frame = roundtrip_frame(&packet);
    // 0x01 is not a valid login-state packet.
    assert_eq!(
        frame.decode_serverbound(PacketState::Login),
        Err(ProtoError::InvalidPacketId {
            state: PacketState::Login,
            id: 0x01,
        })
    );
}

#[test]
fn trailing_bytes_rejected_in_login() {
    let packet = LoginStartC2s { username: "bob" };
    let mut enc = PacketEncoder::new();
    enc.write_packet(&packet).unwrap();
    let mut bytes = enc.take();
    bytes[0] += 1; // length
    bytes.push(0xAA);

    let mut dec = PacketDecoder::new();
    dec.queue_slice(&bytes);
    let frame = dec.try_next_packet().unwrap().unwrap();
    assert_eq!(
        frame.decode_serverbound(PacketState::Login),
        Err(ProtoError::TrailingBytes(1))
    );
}

#[test]
fn play_movement_roundtrip() {
    let packet = PlayerPositionC2s {
        x: 10.0,
        y: 5.0,
        z: 10.0,
        on_ground: true,
    };
    let frame = roundtrip_frame(&packet);
    let decoded = frame.decode_serverbound(PacketState::Play).unwrap();
    match decoded {
        ServerboundPacket::PlayerPosition(actual) => assert_eq!(actual, packet),
        _ => panic!("unexpected packet"),
    }
}

#[test]
fn play_chat_roundtrip() {
    let packet = ChatMessageC2s { message: "hi" };
    let frame = roundtrip_frame(&packet);
    let decoded = frame.decode_serverbound(PacketState::Play).unwrap();
    match decoded {
        ServerboundPacket::ChatMessage(actual) => assert_eq!(actual, packet),
        _ => panic!("unexpected packet"),
    }
}

#[test]
fn play_entity_action_consumes_jump_boost() {
    let packet = EntityActionC2s {
        entity_id: 99,
        action: 1,
        jump_boost: 0,
    };
    let frame = roundtrip_frame(&packet);
    let decoded = frame.decode_serverbound(PacketState::Play).unwrap();
    match decoded {
        ServerboundPacket::EntityAction(actual) => assert_eq!(actual, packet),
        _ => panic!("unexpected packet"),
    }
}

#[test]
fn play_unknown_id_is_ignored_not_error() {
    let mut bytes = Vec::new();
    encode_raw_packet(&mut bytes, 0x2B, &[1, 2, 3]).unwrap();

    let mut dec = PacketDecoder::new();
    dec.queue_slice(&bytes);
    let frame = dec.try_next_packet().unwrap().unwrap();
    assert_eq!(
        frame.decode_serverbound(PacketState::Play).unwrap(),
        ServerboundPacket::Ignored { id: 0x2B }
    );
}

#[test]
fn animation_roundtrip() {
    let packet = AnimationC2s { hand: 0 };
    let frame = roundtrip_frame(&packet);
    let decoded = frame.decode_serverbound(PacketState::Play).unwrap();
    match decoded {
        ServerboundPacket::Animation(actual) => assert_eq!(actual, packet),
        _ => panic!("unexpected packet"),
    }
}

#[test]
fn login_success_roundtrip() {
    let packet = LoginSuccessS2c {
        uuid: Uuid::from_u64s(1, 2),
        username: "alice",
    };
    let frame = roundtrip_frame(&packet);
    let decoded: LoginSuccessS2c = frame.decode().unwrap();
    assert_eq!(decoded, packet);
}

#[test]
fn entity_teleport_roundtrip() {
    let packet = EntityTeleportS2c {
        entity_id: 0x1234,
        x: 10.0,
        y: 5.0,
        z: 10.0,
        yaw: Angle::from_degrees(90.0),
        pitch: Angle::from_degrees(-10.0),
        on_ground: true,
    };
    let frame = roundtrip_frame(&packet);
    let decoded: EntityTeleportS2c = frame.decode().unwrap();
    assert_eq!(decoded, packet);
}

#[test]
fn head_look_roundtrip() {
    let packet = EntityHeadLookS2c {
        entity_id: 7,
        yaw: Angle::from_byte(200),
    };
    let frame = roundtrip_frame(&packet);
    let decoded: EntityHeadLookS2c = frame.decode().unwrap();
    assert_eq!(decoded, packet);
}

#[test]
fn player_info_add_roundtrip() {
    let packet = PlayerInfoAddS2c {
        entries: vec![
            PlayerInfoEntry {
                uuid: Uuid::from_u64s(1, 1),
                username: "alice",
            },
            PlayerInfoEntry {
                uuid: Uuid::from_u64s(2, 2),
                username: "bob",
            },
        ],
    };
    let frame = roundtrip_frame(&packet);
    let decoded: PlayerInfoAddS2c = frame.decode().unwrap();
    assert_eq!(decoded, packet);
}

#[test]
fn player_info_remove_roundtrip() {
    let packet = PlayerInfoRemoveS2c {
        uuid: Uuid::from_u64s(3, 4),
    };
    let frame = roundtrip_frame(&packet);
    let decoded: PlayerInfoRemoveS2c = frame.decode().unwrap();
    assert_eq!(decoded, packet);
}

#[test]
fn destroy_entities_roundtrip() {
    let packet = DestroyEntitiesS2c {
        entity_ids: vec![1, -1, 0x7fff_ffff],
    };
    let frame = roundtrip_frame(&packet);
    let decoded: DestroyEntitiesS2c = frame.decode().unwrap();
    assert_eq!(decoded, packet);
}

#[test]
fn position_and_look_roundtrip() {
    let packet = PlayerPositionAndLookS2c {
        x: 0.0,
        y: 5.0,
        z: 0.0,
        yaw: 0.0,
        pitch: 0.0,
        flags: 0,
        teleport_id: 0x0102_0304,
    };
    let frame = roundtrip_frame(&packet);
    let decoded: PlayerPositionAndLookS2c = frame.decode().unwrap();
    assert_eq!(decoded, packet);
}

#[test]
fn chat_s2c_roundtrip() {
    let packet = ChatMessageS2c {
        json: "{\"text\":\"<a> hi\",\"bold\":\"false\"}",
        position: 0,
        sender: Uuid::from_u64s(9, 9),
    };
    let frame = roundtrip_frame(&packet);
    let decoded: ChatMessageS2c = frame.decode().unwrap();
    assert_eq!(decoded, packet);
}

#[test]
fn entity_metadata_terminated() {
    let packet = EntityMetadataS2c {
        entity_id: 5,
        index: 6,
        kind: 18,
        value: 5,
    };
    let mut body = Vec::new();
    packet.encode_body(&mut body).unwrap();
    assert_eq!(*body.last().unwrap(), 0xFF);

    let frame = roundtrip_frame(&packet);
    let decoded: EntityMetadataS2c = frame.decode().unwrap();
    assert_eq!(decoded, packet);
}

#[test]
fn entity_animation_arm_byte() {
    // Swing main hand carries a trailing 0, off hand a trailing 3,
    // anything else has no trailing byte.
    let cases = [(0, Some(0u8)), (1, Some(3u8)), (2, None)];
    for (animation, trailing) in cases {
        let packet = EntityAnimationS2c {
            entity_id: 1,
            animation,
        };
        let mut body = Vec::new();
        packet.encode_body(&mut body).unwrap();
        match trailing {
            Some(byte) => {
                assert_eq!(body.len(), 2);
                assert_eq!(body[1], byte);
            }
            None => assert_eq!(body.len(), 1),
        }
    }
}

#[test]
fn chunk_data_body_layout() {
    let height_map = [0u8; 16];
    let palette = [0u8; 384];
    let blocks = [0u8; 4096];
    let packet = ChunkDataS2c {
        chunk_x: -1,
        chunk_z: 0,
        height_map: &height_map,
        palette: &palette,
        blocks: &blocks,
    };

    let mut body = Vec::new();
    packet.encode_body(&mut body).unwrap();

    // Short + UnsignedByte + VarInt(256) + palette + VarInt(512) + blocks.
    let data_len = 2 + 1 + 2 + palette.len() + 2 + blocks.len();
    assert_eq!(data_len, 4487);

    // Int x | Int z | full | mask | height map | VarInt(1024) | 1024 biome
    // varints | VarInt(data_len) | data | VarInt(0) block entities.
    let expected = 4 + 4 + 1 + 1 + height_map.len() + 2 + 1024 + 2 + data_len + 1;
    assert_eq!(body.len(), expected);

    // Chunk coordinates lead the body, big-endian.
    assert_eq!(&body[..8], &[0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0]);
}
