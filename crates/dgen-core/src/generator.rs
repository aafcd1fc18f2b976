//! Generation pipeline
//!
//! `generate` runs every stage in order from a fresh `DungeonRng`:
//! partition, carve, assign types, stamp rooms, connect, stamp corridors,
//! check connectivity, then build the wall and floor meshes.

use dgen_rng::{DungeonRng, random_seed};
use serde::{Deserialize, Serialize};

use crate::dungeon::{
    Area, CarveSettings, Corridor, DungeonGrid, GridCell, PartitionTree, Position, Room, RoomId,
    RoomType, assign_room_types, carve_rooms, connect, partition, room_by_type, rooms_by_type,
};
use crate::mesh::{GeometryBuffer, WallMeshBuilder, WallSettings, WallStats, build_floor};
use crate::{DungeonConfig, GenerationError};

/// Everything produced by one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonResult {
    pub seed: u64,
    pub config: DungeonConfig,
    pub tree: PartitionTree,
    pub rooms: Vec<Room>,
    pub corridors: Vec<Corridor>,
    pub grid: DungeonGrid,
    pub walls: GeometryBuffer,
    pub floor: GeometryBuffer,
    pub wall_stats: WallStats,
}

impl DungeonResult {
    /// First room of the given type
    pub fn room_by_type(&self, room_type: RoomType) -> Option<&Room> {
        room_by_type(&self.rooms, room_type)
    }

    /// All rooms of the given type
    pub fn rooms_by_type(&self, room_type: RoomType) -> Vec<&Room> {
        rooms_by_type(&self.rooms, room_type)
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.0)
    }

    pub fn cell(&self, pos: Position) -> Option<&GridCell> {
        self.grid.cell(pos)
    }

    pub fn available_cells_in_room(&self, room: &Room) -> Vec<Position> {
        self.grid.available_cells_in_room(room)
    }

    pub fn start_room(&self) -> Option<&Room> {
        self.room_by_type(RoomType::Start)
    }

    pub fn boss_room(&self) -> Option<&Room> {
        self.room_by_type(RoomType::Boss)
    }

    /// Rooms followed by corridors
    pub fn areas(&self) -> Vec<Area<'_>> {
        self.rooms
            .iter()
            .map(Area::Room)
            .chain(self.corridors.iter().map(Area::Corridor))
            .collect()
    }

    /// Floor cells that cannot be walked to from the start room's centre
    pub fn unreachable_floor(&self) -> Vec<Position> {
        match self.start_room() {
            Some(start) => self.grid.unreachable_floor(start.center()),
            None => Vec::new(),
        }
    }
}

/// Generate a dungeon from `seed`.
///
/// The same seed and config always give the same result.
pub fn generate(seed: u64, config: &DungeonConfig) -> Result<DungeonResult, GenerationError> {
    config.validate()?;
    let mut rng = DungeonRng::new(seed);

    let mut tree = partition(
        config.dungeon_width,
        config.dungeon_length,
        config.max_iterations,
        config.room_width_min,
        config.room_length_min,
        &mut rng,
    );
    let mut rooms = carve_rooms(&mut tree, &CarveSettings::from(config), &mut rng);
    assign_room_types(&mut rooms, config.room_types.as_ref(), &mut rng);

    let mut grid = DungeonGrid::new(config.dungeon_width, config.dungeon_length);
    grid.stamp_rooms(&rooms);
    let corridors = connect(&tree, &rooms, config.corridor_width);
    grid.stamp_corridors(&corridors);

    let (walls, wall_stats) = WallMeshBuilder::new(WallSettings::from(config)).build(&grid);
    let floor = build_floor(
        rooms
            .iter()
            .map(Area::Room)
            .chain(corridors.iter().map(Area::Corridor)),
    );

    let result = DungeonResult {
        seed,
        config: config.clone(),
        tree,
        rooms,
        corridors,
        grid,
        walls,
        floor,
        wall_stats,
    };

    let unreachable = result.unreachable_floor();
    if !unreachable.is_empty() {
        log::warn!(
            "seed {}: {} floor cells unreachable from the start room",
            seed,
            unreachable.len()
        );
    }

    log::info!(
        "generated dungeon {}x{} from seed {}: {} rooms, {} corridors, {} wall segments, {} vertices",
        config.dungeon_width,
        config.dungeon_length,
        seed,
        result.rooms.len(),
        result.corridors.len(),
        result.wall_stats.segments(),
        result.walls.vertex_count() + result.floor.vertex_count()
    );

    Ok(result)
}

/// Stateful holder that rebuilds its dungeon on demand
#[derive(Debug, Clone, Default)]
pub struct Dungeon {
    config: DungeonConfig,
    result: Option<DungeonResult>,
}

impl Dungeon {
    pub fn new(config: DungeonConfig) -> Self {
        Self {
            config,
            result: None,
        }
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    /// Replace the config; the current dungeon is kept until the next rebuild
    pub fn set_config(&mut self, config: DungeonConfig) {
        self.config = config;
    }

    /// Current dungeon, if one was generated
    pub fn result(&self) -> Option<&DungeonResult> {
        self.result.as_ref()
    }

    /// Mutable access for hosts recording spawned objects on the grid
    pub fn result_mut(&mut self) -> Option<&mut DungeonResult> {
        self.result.as_mut()
    }

    /// Seed of the current dungeon
    pub fn seed(&self) -> Option<u64> {
        self.result.as_ref().map(|r| r.seed)
    }

    /// Drop all generated state
    pub fn clear(&mut self) {
        self.result = None;
    }

    /// Discard the current dungeon and build a new one from `seed`.
    ///
    /// On error nothing is kept.
    pub fn regenerate(&mut self, seed: u64) -> Result<&DungeonResult, GenerationError> {
        self.clear();
        let result = generate(seed, &self.config)?;
        Ok(&*self.result.insert(result))
    }

    /// Rebuild from a fresh random seed
    pub fn regenerate_random(&mut self) -> Result<&DungeonResult, GenerationError> {
        self.regenerate(random_seed())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::dungeon::{CellType, ObjectHandle, ObjectSpawner, place_object};

    fn small_config() -> DungeonConfig {
        DungeonConfig {
            dungeon_width: 48,
            dungeon_length: 40,
            room_width_min: 6,
            room_length_min: 6,
            max_iterations: 4,
            ..DungeonConfig::default()
        }
    }

    #[test]
    fn test_generate_rejects_invalid_config() {
        let config = DungeonConfig {
            corridor_width: 0,
            ..small_config()
        };
        assert_eq!(
            generate(1, &config),
            Err(GenerationError::InvalidCorridorWidth(0))
        );
    }

    #[test]
    fn test_result_queries() {
        let result = generate(7, &small_config()).unwrap();
        let start = result.start_room().unwrap();
        assert_eq!(start.id, RoomId(0));
        assert!(result.boss_room().is_some());
        assert_eq!(result.room(RoomId(0)), Some(start));
        assert!(result.room(RoomId(999)).is_none());

        assert_eq!(
            result.cell(start.center()).map(|c| c.cell_type),
            Some(CellType::Floor)
        );
        assert_eq!(
            result.available_cells_in_room(start).len() as i64,
            start.rect.area()
        );
        assert_eq!(
            result.areas().len(),
            result.rooms.len() + result.corridors.len()
        );
        assert!(result.areas()[0].is_room());
    }

    #[test]
    fn test_result_is_connected() {
        for seed in 0..10 {
            let result = generate(seed, &small_config()).unwrap();
            assert!(result.unreachable_floor().is_empty(), "seed {seed}");
        }
    }

    #[test]
    fn test_meshes_are_built() {
        let result = generate(3, &small_config()).unwrap();
        assert!(!result.walls.is_empty());
        assert_eq!(result.wall_stats.vertices, result.walls.vertex_count());

        // floor quads cover every area cell exactly once
        assert_eq!(result.floor.vertex_count() % 4, 0);
        let quad_area: f32 = result
            .floor
            .positions
            .chunks(4)
            .map(|q| (q[2].x - q[0].x) * (q[2].z - q[0].z))
            .sum();
        let cells: HashSet<Position> = result
            .areas()
            .iter()
            .flat_map(|a| a.rects())
            .flat_map(|r| r.cells().collect::<Vec<_>>())
            .collect();
        assert_eq!(quad_area as usize, cells.len());
    }

    #[test]
    fn test_generate_rejects_oversized_corridor() {
        let config = DungeonConfig {
            dungeon_width: 40,
            dungeon_length: 40,
            room_width_min: 6,
            room_length_min: 6,
            max_iterations: 3,
            corridor_width: u32::MAX,
            ..DungeonConfig::default()
        };
        assert_eq!(
            generate(1, &config),
            Err(GenerationError::InvalidCorridorWidth(u32::MAX))
        );
        let widest = DungeonConfig {
            corridor_width: 40,
            ..config
        };
        assert!(generate(1, &widest).is_ok());
    }

    #[test]
    fn test_result_mut_records_spawned_objects() {
        struct Torches(u64);
        impl ObjectSpawner for Torches {
            fn spawn(&mut self, _object: &str, _pos: Position, _room: &Room) -> Option<ObjectHandle> {
                self.0 += 1;
                Some(ObjectHandle(self.0))
            }
        }

        let mut dungeon = Dungeon::new(small_config());
        assert!(dungeon.result_mut().is_none());
        dungeon.regenerate(9).unwrap();

        let result = dungeon.result_mut().unwrap();
        let room = result.start_room().cloned().unwrap();
        let pos = room.center();
        let handle = place_object(&mut result.grid, &mut Torches(0), "torch", pos, &room);
        assert_eq!(handle, Some(ObjectHandle(1)));

        let result = dungeon.result().unwrap();
        assert_eq!(result.cell(pos).and_then(|c| c.object), handle);
        assert_eq!(
            result.available_cells_in_room(result.start_room().unwrap()).len() as i64,
            room.rect.area() - 1
        );
    }

    #[test]
    fn test_regenerate_replaces_state() {
        let mut dungeon = Dungeon::new(small_config());
        assert!(dungeon.result().is_none());

        let first = dungeon.regenerate(1).unwrap().clone();
        let second = dungeon.regenerate(2).unwrap().clone();
        assert_eq!(dungeon.seed(), Some(2));
        assert_ne!(first.rooms, second.rooms);

        let again = dungeon.regenerate(1).unwrap();
        assert_eq!(*again, first);
    }

    #[test]
    fn test_failed_regenerate_keeps_nothing() {
        let mut dungeon = Dungeon::new(small_config());
        dungeon.regenerate(5).unwrap();
        dungeon.set_config(DungeonConfig {
            wall_height: -1.0,
            ..small_config()
        });
        assert!(dungeon.regenerate(5).is_err());
        assert!(dungeon.result().is_none());
    }

    #[test]
    fn test_regenerate_random_records_seed() {
        let mut dungeon = Dungeon::new(small_config());
        let seed = dungeon.regenerate_random().unwrap().seed;
        assert_eq!(dungeon.seed(), Some(seed));
    }
}
