use dgen_core::dungeon::{CellType, RoomType, RoomTypeConfig, RoomTypeData};
use dgen_core::{Dungeon, DungeonConfig, generate};

fn small_config() -> DungeonConfig {
    DungeonConfig {
        dungeon_width: 20,
        dungeon_length: 20,
        room_width_min: 4,
        room_length_min: 4,
        max_iterations: 3,
        corridor_width: 2,
        ..DungeonConfig::default()
    }
}

#[test]
fn test_small_dungeon_seed_42() {
    let result = generate(42, &small_config()).unwrap();

    assert!(
        (2..=8).contains(&result.rooms.len()),
        "got {} rooms",
        result.rooms.len()
    );
    assert_eq!(result.rooms_by_type(RoomType::Start).len(), 1);
    assert_eq!(result.rooms_by_type(RoomType::Boss).len(), 1);
    assert!(result.unreachable_floor().is_empty());
}

#[test]
fn test_same_seed_same_dungeon() {
    let config = DungeonConfig::default();
    let a = generate(0, &config).unwrap();
    let b = generate(0, &config).unwrap();

    assert_eq!(a.rooms.len(), b.rooms.len());
    assert_eq!(a.rooms[0].rect, b.rooms[0].rect);
    assert_eq!(a, b);
}

#[test]
fn test_unique_shop_appears_at_most_once() {
    let config = DungeonConfig {
        dungeon_width: 100,
        dungeon_length: 100,
        room_width_min: 10,
        room_length_min: 10,
        max_iterations: 4,
        room_types: Some(RoomTypeConfig::new(vec![
            RoomTypeData::new(RoomType::Shop).unique(),
        ])),
        ..DungeonConfig::default()
    };

    for seed in 0..8 {
        let result = generate(seed, &config).unwrap();
        assert!(result.rooms_by_type(RoomType::Shop).len() <= 1, "seed {seed}");
        assert_eq!(
            result.rooms_by_type(RoomType::Start).len()
                + result.rooms_by_type(RoomType::Boss).len()
                + result.rooms_by_type(RoomType::Shop).len()
                + result.rooms_by_type(RoomType::Normal).len(),
            result.rooms.len()
        );
    }
}

#[test]
fn test_without_config_rooms_are_start_boss_or_normal() {
    let result = generate(11, &DungeonConfig::default()).unwrap();
    for room in &result.rooms {
        assert!(matches!(
            room.room_type,
            RoomType::Start | RoomType::Boss | RoomType::Normal
        ));
        assert!(room.type_data.is_none() || room.room_type.is_fixed());
    }
}

#[test]
fn test_one_room_dungeon() {
    let config = DungeonConfig {
        max_iterations: 0,
        ..small_config()
    };
    let result = generate(9, &config).unwrap();

    assert_eq!(result.rooms.len(), 1);
    assert!(result.corridors.is_empty());
    assert!(result.start_room().is_some());
    assert!(result.boss_room().is_none());
}

#[test]
fn test_grid_matches_rooms_and_corridors() {
    let result = generate(123, &small_config()).unwrap();

    let floor: usize = result.rooms.iter().map(|r| r.rect.area() as usize).sum();
    assert_eq!(result.grid.count(CellType::Floor), floor);

    for corridor in &result.corridors {
        for pos in corridor.cells() {
            let cell = result.grid.cell_type(pos);
            assert!(
                matches!(cell, Some(CellType::Floor | CellType::Corridor)),
                "{pos:?} is {cell:?}"
            );
        }
    }
}

#[test]
fn test_regenerate_from_json_config() {
    let config: DungeonConfig = serde_json::from_str(
        r#"{
            "dungeon_width": 40,
            "dungeon_length": 30,
            "room_width_min": 6,
            "room_length_min": 6,
            "max_iterations": 3,
            "use_corner_pillars": false
        }"#,
    )
    .unwrap();

    let mut dungeon = Dungeon::new(config);
    let result = dungeon.regenerate(77).unwrap();
    assert_eq!(result.wall_stats.pillars, 0);
    assert_eq!(result.grid.width(), 40);
    assert_eq!(result.grid.length(), 30);
}

#[test]
fn test_result_survives_json() {
    let result = generate(5, &small_config()).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    let back: dgen_core::DungeonResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.rooms, result.rooms);
    assert_eq!(back.grid, result.grid);
}
