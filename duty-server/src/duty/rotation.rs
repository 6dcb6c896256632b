//! Rotation arithmetic
//!
//! A floor's duty sequence lists every room number `duty_weight` times in
//! ascending room order. The room on duty for a date is
//! `seq[(ordinal(date) + (floor - lowest_floor) * 3) mod len]`.

use chrono::{Datelike, NaiveDate};
use shared::models::{MAX_DUTY_WEIGHT, Room};

/// Index positions each floor is shifted by, relative to the floor below
pub const FLOOR_STRIDE: i64 = 3;

/// In-floor room indexes that do the general cleaning
const GENERAL_CLEANING_INDEXES: [i64; 4] = [1, 6, 7, 12];

/// Derived rotation order of one floor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DutySequence {
    slots: Vec<i64>,
}

impl DutySequence {
    /// Build from a registry snapshot; input order does not matter
    ///
    /// Weights are clamped to `1..=MAX_DUTY_WEIGHT`.
    pub fn build(rooms: &[Room]) -> Self {
        let mut sorted: Vec<&Room> = rooms.iter().collect();
        sorted.sort_by_key(|r| r.number);

        let slots = sorted
            .into_iter()
            .flat_map(|r| {
                let weight = r.duty_weight.clamp(1, MAX_DUTY_WEIGHT) as usize;
                std::iter::repeat_n(r.number, weight)
            })
            .collect();
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[i64] {
        &self.slots
    }

    /// Position in the sequence for `date` on `floor`
    pub fn index_for(&self, date: NaiveDate, floor: i64, lowest_floor: i64) -> Option<usize> {
        if self.slots.is_empty() {
            return None;
        }
        let day = date.ordinal() as i64;
        let offset = floor_offset(floor, lowest_floor);
        Some((day + offset).rem_euclid(self.slots.len() as i64) as usize)
    }

    /// Room on duty for `date` on `floor`, `None` for an empty floor
    pub fn room_for(&self, date: NaiveDate, floor: i64, lowest_floor: i64) -> Option<i64> {
        self.index_for(date, floor, lowest_floor)
            .map(|index| self.slots[index])
    }
}

pub fn floor_offset(floor: i64, lowest_floor: i64) -> i64 {
    (floor - lowest_floor) * FLOOR_STRIDE
}

/// Circular successor of `room_number` among the floor's rooms
///
/// Unknown rooms fall back to the lowest room. `None` only for an empty floor.
pub fn next_room(rooms: &[Room], room_number: i64) -> Option<i64> {
    let mut numbers: Vec<i64> = rooms.iter().map(|r| r.number).collect();
    numbers.sort_unstable();
    numbers.dedup();

    let lowest = *numbers.first()?;
    match numbers.iter().position(|n| *n == room_number) {
        Some(pos) => Some(numbers.get(pos + 1).copied().unwrap_or(lowest)),
        None => Some(lowest),
    }
}

pub fn is_general_cleaning_room(room_number: i64) -> bool {
    GENERAL_CLEANING_INDEXES.contains(&room_number.rem_euclid(100))
}
