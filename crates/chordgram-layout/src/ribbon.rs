use crate::chord::{Chord, ChordSubgroup};
use crate::geom::{path_angle, polar};
use crate::path::PathBuilder;
use crate::{Error, Result};

const EPSILON: f64 = 1e-12;

/// Ribbon generator (d3-chord `ribbon()`): two arcs on the circle joined by quadratic curves
/// through the center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RibbonGenerator {
    source_radius: f64,
    target_radius: f64,
    pad_angle: f64,
}

impl RibbonGenerator {
    pub fn new(radius: f64) -> Result<Self> {
        Self::with_radii(radius, radius)
    }

    pub fn with_radii(source_radius: f64, target_radius: f64) -> Result<Self> {
        let ok = |r: f64| r.is_finite() && r >= 0.0;
        if !(ok(source_radius) && ok(target_radius)) {
            return Err(Error::InvalidRadius {
                inner: source_radius,
                outer: target_radius,
            });
        }
        Ok(Self {
            source_radius,
            target_radius,
            pad_angle: 0.0,
        })
    }

    /// Angle trimmed from both sides of each ribbon end.
    pub fn pad_angle(mut self, pad_angle: f64) -> Self {
        self.pad_angle = pad_angle;
        self
    }

    pub fn source_radius(&self) -> f64 {
        self.source_radius
    }

    pub fn target_radius(&self) -> f64 {
        self.target_radius
    }

    pub fn path(&self, chord: &Chord) -> String {
        self.path_between(&chord.source, &chord.target)
    }

    pub fn path_between(&self, source: &ChordSubgroup, target: &ChordSubgroup) -> String {
        let sr = self.source_radius;
        let tr = self.target_radius;
        let mut sa0 = path_angle(source.start_angle);
        let mut sa1 = path_angle(source.end_angle);
        let mut ta0 = path_angle(target.start_angle);
        let mut ta1 = path_angle(target.end_angle);

        let ap = self.pad_angle / 2.0;
        if ap > EPSILON {
            (sa0, sa1) = shrink(sa0, sa1, ap);
            (ta0, ta1) = shrink(ta0, ta1, ap);
        }

        let mut p = PathBuilder::new();
        let s0 = polar(sr, sa0);
        p.move_to(s0.x, s0.y);
        p.arc(0.0, 0.0, sr, sa0, sa1, false);
        if sa0 != ta0 || sa1 != ta1 {
            let t0 = polar(tr, ta0);
            p.quadratic_curve_to(0.0, 0.0, t0.x, t0.y);
            p.arc(0.0, 0.0, tr, ta0, ta1, false);
        }
        p.quadratic_curve_to(0.0, 0.0, s0.x, s0.y);
        p.close_path();
        p.finish()
    }
}

fn shrink(a0: f64, a1: f64, ap: f64) -> (f64, f64) {
    if (a1 - a0).abs() > ap * 2.0 + EPSILON {
        if a1 > a0 {
            (a0 + ap, a1 - ap)
        } else {
            (a0 - ap, a1 + ap)
        }
    } else {
        let mid = (a0 + a1) / 2.0;
        (mid, mid)
    }
}
