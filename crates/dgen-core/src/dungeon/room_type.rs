//! Room type assignment
//!
//! The first room becomes Start and the room whose centre is furthest from it
//! becomes Boss. Every other room draws a type from the configured table,
//! weighted by `spawn_weight`; unique types are handed out at most once.

use std::collections::BTreeSet;

use dgen_rng::RandomSource;

use super::{Room, RoomType, RoomTypeConfig, RoomTypeData};

/// Index of the room furthest from `rooms[0]`, first one on ties
fn furthest_from_start(rooms: &[Room]) -> Option<usize> {
    let start = rooms.first()?.center();
    let mut best: Option<(usize, f32)> = None;
    for (i, room) in rooms.iter().enumerate().skip(1) {
        let dist = start.distance(room.center());
        if best.is_none_or(|(_, d)| dist > d) {
            best = Some((i, dist));
        }
    }
    best.map(|(i, _)| i)
}

/// Weighted pick among the entries still available
fn pick_weighted<'a, R: RandomSource>(
    config: &'a RoomTypeConfig,
    used_unique: &BTreeSet<RoomType>,
    rng: &mut R,
) -> Option<&'a RoomTypeData> {
    let candidates: Vec<&RoomTypeData> = config
        .room_types
        .iter()
        .filter(|d| !d.room_type.is_fixed())
        .filter(|d| !(d.is_unique && used_unique.contains(&d.room_type)))
        .collect();

    let total: f32 = candidates.iter().map(|d| d.weight()).sum();
    if candidates.is_empty() || total <= 0.0 {
        return None;
    }

    let roll = rng.range_f32(total);
    let mut cumulative = 0.0;
    for data in candidates {
        let weight = data.weight();
        if weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        if roll <= cumulative {
            return Some(data);
        }
    }

    None
}

/// Assign a type to every room.
///
/// An absent config behaves like an empty one: Start and Boss are still
/// placed and every other room is Normal.
pub fn assign_room_types<R: RandomSource>(
    rooms: &mut [Room],
    config: Option<&RoomTypeConfig>,
    rng: &mut R,
) {
    if rooms.is_empty() {
        return;
    }
    let empty = RoomTypeConfig::default();
    let config = config.unwrap_or(&empty);
    let mut used_unique = BTreeSet::new();

    let mut assign_fixed = |room: &mut Room, room_type: RoomType| {
        let data = config.get(room_type).cloned();
        if data.as_ref().is_some_and(|d| d.is_unique) {
            used_unique.insert(room_type);
        }
        room.set_type(room_type, data);
    };

    let boss = furthest_from_start(rooms);
    assign_fixed(&mut rooms[0], RoomType::Start);
    if let Some(boss) = boss {
        assign_fixed(&mut rooms[boss], RoomType::Boss);
    }

    for (i, room) in rooms.iter_mut().enumerate() {
        if i == 0 || Some(i) == boss {
            continue;
        }
        match pick_weighted(config, &used_unique, rng) {
            Some(data) => {
                if data.is_unique {
                    used_unique.insert(data.room_type);
                }
                room.set_type(data.room_type, Some(data.clone()));
            }
            None => room.set_type(RoomType::Normal, None),
        }
    }

    log::debug!(
        "assigned room types: {}",
        rooms
            .iter()
            .map(|r| r.label())
            .collect::<Vec<_>>()
            .join(", ")
    );
}

/// First room of the given type
pub fn room_by_type(rooms: &[Room], room_type: RoomType) -> Option<&Room> {
    rooms.iter().find(|r| r.room_type == room_type)
}

/// All rooms of the given type
pub fn rooms_by_type(rooms: &[Room], room_type: RoomType) -> Vec<&Room> {
    rooms.iter().filter(|r| r.room_type == room_type).collect()
}
