//! The one world this server publishes: constant payloads for the join and
//! chunk packets, bundled as build inputs and never parsed.

/// NBT dimension codec registry sent in Join Game.
pub const DIMENSION_CODEC: &[u8] = include_bytes!("../assets/dimension_codec.nbt");

/// NBT dimension type of the current dimension.
pub const DIMENSION: &[u8] = include_bytes!("../assets/dimension.nbt");

/// NBT height map for the flat chunk.
pub const HEIGHT_MAP: &[u8] = include_bytes!("../assets/heightmap.nbt");

/// 256-entry block-state palette, pre-encoded as VarInts.
pub const PALETTE: &[u8] = include_bytes!("../assets/palette.bin");

/// One 16x16x16 section of palette indices, 8 bits per block, packed into
/// 512 big-endian longs.
pub const BLOCKS: &[u8] = include_bytes!("../assets/chunk.bin");

pub const WORLD_NAME: &str = "minecraft:overworld";
pub const HASHED_SEED: i64 = 0x123456789abcdef0;
pub const MAX_PLAYERS: i32 = 10;
pub const VIEW_DISTANCE: i32 = 10;

/// Spawn is at (0, 5, 0); these four chunks cover the area around it.
pub const SPAWN_CHUNKS: [(i32, i32); 4] = [(-1, 0), (0, 0), (-1, -1), (0, -1)];

pub const SPAWN_X: f64 = 0.0;
pub const SPAWN_Y: f64 = 5.0;
pub const SPAWN_Z: f64 = 0.0;

/// World-space coordinate to chunk coordinate: `floor(coord / 16)`.
pub fn coordinate_to_chunk(coordinate: f64) -> i32 {
    (coordinate / 16.0).floor() as i32
}
