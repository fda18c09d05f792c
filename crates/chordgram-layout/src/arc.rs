use crate::chord::ChordGroup;
use crate::geom::{path_angle, polar};
use crate::path::PathBuilder;
use crate::{Error, Result};
use std::f64::consts::TAU;

const EPSILON: f64 = 1e-12;

/// Fractional digits kept in emitted path data, as d3-shape does by default.
const DIGITS: u32 = 3;

/// Annular sector generator (d3-shape `arc()` without corner radius or padding).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGenerator {
    inner_radius: f64,
    outer_radius: f64,
}

impl ArcGenerator {
    pub fn new(inner_radius: f64, outer_radius: f64) -> Result<Self> {
        let ok = |r: f64| r.is_finite() && r >= 0.0;
        if !(ok(inner_radius) && ok(outer_radius)) {
            return Err(Error::InvalidRadius {
                inner: inner_radius,
                outer: outer_radius,
            });
        }
        Ok(Self {
            inner_radius,
            outer_radius,
        })
    }

    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    pub fn group_path(&self, group: &ChordGroup) -> String {
        self.path(group.start_angle, group.end_angle)
    }

    /// Path data for the sector spanning `[start_angle, end_angle]` (radians, clockwise from
    /// 12 o'clock).
    pub fn path(&self, start_angle: f64, end_angle: f64) -> String {
        let (mut r0, mut r1) = (self.inner_radius, self.outer_radius);
        if r1 < r0 {
            std::mem::swap(&mut r0, &mut r1);
        }
        let a0 = path_angle(start_angle);
        let a1 = path_angle(end_angle);
        let da = (a1 - a0).abs();
        let cw = a1 > a0;

        let mut p = PathBuilder::with_digits(Some(DIGITS));
        if !(r1 > EPSILON) {
            p.move_to(0.0, 0.0);
        } else if da > TAU - EPSILON {
            let outer_start = polar(r1, a0);
            p.move_to(outer_start.x, outer_start.y);
            p.arc(0.0, 0.0, r1, a0, a1, !cw);
            if r0 > EPSILON {
                let inner_start = polar(r0, a1);
                p.move_to(inner_start.x, inner_start.y);
                p.arc(0.0, 0.0, r0, a1, a0, cw);
            }
        } else {
            let outer_start = polar(r1, a0);
            p.move_to(outer_start.x, outer_start.y);
            if da > EPSILON {
                p.arc(0.0, 0.0, r1, a0, a1, !cw);
            }
            if !(r0 > EPSILON) || !(da > EPSILON) {
                let inner_end = polar(r0, a1);
                p.line_to(inner_end.x, inner_end.y);
            } else {
                p.arc(0.0, 0.0, r0, a1, a0, cw);
            }
        }
        p.close_path();
        p.finish()
    }
}
