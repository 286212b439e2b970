// src/engine/rotation.rs

use crate::engine::position::Side;

/// Index fell → hold the inverse instrument tomorrow; rose or flat → long.
pub fn next_position(index_today: f64, index_yesterday: f64) -> Side {
    if index_today < index_yesterday {
        Side::Short
    } else {
        Side::Long
    }
}
