use crate::chord::ChordGroup;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub value: f64,
    /// Diagram angle (radians, clockwise from 12 o'clock).
    pub angle: f64,
}

/// Lazy tick sequence along one group's arc. Clones iterate independently.
#[derive(Debug, Clone)]
pub struct GroupTicks {
    start_angle: f64,
    angle_per_unit: f64,
    step: f64,
    next: usize,
    len: usize,
}

/// Upper bound on the ticks one group may carry.
pub const MAX_TICKS_PER_GROUP: usize = 10_000;

/// Ticks at `0, step, 2 * step, ...` below `group.value`, each mapped linearly onto the group's
/// angular span.
///
/// A group with zero (or non-finite) value has no ticks. A step that is not a finite positive
/// number is rejected, since the sequence would never end, and so is a step that would place
/// more than [`MAX_TICKS_PER_GROUP`] ticks on the group.
pub fn group_ticks(group: &ChordGroup, step: f64) -> Result<GroupTicks> {
    let len = tick_count(group.value, step)?;
    Ok(GroupTicks {
        start_angle: group.start_angle,
        angle_per_unit: (group.end_angle - group.start_angle) / group.value,
        step,
        next: 0,
        len,
    })
}

/// Number of ticks [`group_ticks`] yields for a group of `value` with the given `step`.
pub fn tick_count(value: f64, step: f64) -> Result<usize> {
    if !(step.is_finite() && step > 0.0) {
        return Err(Error::InvalidTickStep { step });
    }
    if !(value.is_finite() && value > 0.0) {
        return Ok(0);
    }
    let count = (value / step).ceil();
    if count > MAX_TICKS_PER_GROUP as f64 {
        return Err(Error::TooManyTicks {
            value,
            step,
            limit: MAX_TICKS_PER_GROUP,
        });
    }
    Ok(count as usize)
}

impl Iterator for GroupTicks {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        if self.next >= self.len {
            return None;
        }
        let value = self.next as f64 * self.step;
        self.next += 1;
        Some(Tick {
            value,
            angle: value * self.angle_per_unit + self.start_angle,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.next;
        (n, Some(n))
    }
}

impl ExactSizeIterator for GroupTicks {}

impl FusedIterator for GroupTicks {}
