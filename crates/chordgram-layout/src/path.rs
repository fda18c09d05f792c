//! SVG path data builder with d3-path semantics.
//!
//! Numbers are stringified the way JavaScript's `Number#toString()` does, optionally after
//! rounding to a fixed number of fractional digits (`Math.round(x * 10^d) / 10^d`), which is
//! what d3-shape generators do by default.

use std::f64::consts::{PI, TAU};

const EPSILON: f64 = 1e-6;
const TAU_EPSILON: f64 = TAU - EPSILON;

#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    out: String,
    digits: Option<u32>,
    start: Option<(f64, f64)>,
    current: Option<(f64, f64)>,
}

impl PathBuilder {
    /// Full-precision builder (d3-chord ribbons).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder that rounds every emitted number to `digits` fractional digits.
    pub fn with_digits(digits: Option<u32>) -> Self {
        Self {
            digits,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.out.push('M');
        self.push_pair(x, y);
        self.start = Some((x, y));
        self.current = Some((x, y));
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.out.push('L');
        self.push_pair(x, y);
        self.current = Some((x, y));
    }

    pub fn quadratic_curve_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        self.out.push('Q');
        self.push_pair(x1, y1);
        self.out.push(',');
        self.push_pair(x, y);
        self.current = Some((x, y));
    }

    /// Circular arc around `(x, y)` from angle `a0` to `a1` (radians, path space).
    ///
    /// Connects to the arc start with a line when the current point differs from it. Sweeps of a
    /// full turn or more are drawn as two half arcs. Negative radii are treated as zero.
    pub fn arc(&mut self, x: f64, y: f64, r: f64, a0: f64, a1: f64, ccw: bool) {
        let r = r.max(0.0);
        let dx = r * a0.cos();
        let dy = r * a0.sin();
        let x0 = x + dx;
        let y0 = y + dy;
        let cw = if ccw { 0.0 } else { 1.0 };
        let mut da = if ccw { a0 - a1 } else { a1 - a0 };

        match self.current {
            None => {
                self.out.push('M');
                self.push_pair(x0, y0);
                self.start = Some((x0, y0));
            }
            Some((cx, cy)) if (cx - x0).abs() > EPSILON || (cy - y0).abs() > EPSILON => {
                self.out.push('L');
                self.push_pair(x0, y0);
            }
            Some(_) => {}
        }
        self.current = Some((x0, y0));

        if r == 0.0 {
            return;
        }

        if da < 0.0 {
            da = da % TAU + TAU;
        }

        if da > TAU_EPSILON {
            self.push_arc_segment(r, 1.0, cw, x - dx, y - dy);
            self.push_arc_segment(r, 1.0, cw, x0, y0);
            self.current = Some((x0, y0));
        } else if da > EPSILON {
            let large = if da >= PI { 1.0 } else { 0.0 };
            let x1 = x + r * a1.cos();
            let y1 = y + r * a1.sin();
            self.push_arc_segment(r, large, cw, x1, y1);
            self.current = Some((x1, y1));
        }
    }

    pub fn close_path(&mut self) {
        if self.current.is_some() {
            self.current = self.start;
            self.out.push('Z');
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn push_arc_segment(&mut self, r: f64, large: f64, sweep: f64, x: f64, y: f64) {
        self.out.push('A');
        self.push_pair(r, r);
        self.out.push_str(",0,");
        self.push_number(large);
        self.out.push(',');
        self.push_number(sweep);
        self.out.push(',');
        self.push_pair(x, y);
    }

    fn push_pair(&mut self, x: f64, y: f64) {
        self.push_number(x);
        self.out.push(',');
        self.push_number(y);
    }

    fn push_number(&mut self, v: f64) {
        let v = match self.digits {
            Some(d) => {
                let k = 10f64.powi(d as i32);
                js_round(v * k) / k
            }
            None => v,
        };
        push_js_number(&mut self.out, v);
    }
}

/// JavaScript `Math.round`: ties go towards positive infinity.
pub fn js_round(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Appends `v` formatted like JavaScript's `String(v)`.
pub fn push_js_number(out: &mut String, v: f64) {
    if v.is_nan() {
        out.push_str("NaN");
    } else if v.is_infinite() {
        out.push_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
    } else if v == 0.0 {
        out.push('0');
    } else {
        let mut buf = ryu_js::Buffer::new();
        out.push_str(buf.format_finite(v));
    }
}

pub fn js_number(v: f64) -> String {
    let mut out = String::new();
    push_js_number(&mut out, v);
    out
}
