//! Chord layout (port of d3-chord's undirected `chord()`).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::f64::consts::TAU;
use std::str::FromStr;

/// Comparator selection mirroring `d3.ascending` / `d3.descending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    None,
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "ascending" | "asc" => Ok(Self::Ascending),
            "descending" | "desc" => Ok(Self::Descending),
            _ => Err(()),
        }
    }
}

impl SortOrder {
    pub fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Incomparable values (NaN) compare equal, which keeps the sort stable for them.
    fn compare(self, a: f64, b: f64) -> Ordering {
        match self {
            Self::None => Ordering::Equal,
            Self::Ascending => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            Self::Descending => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        }
    }
}

/// One entity's arc on the circle. `value` is the entity's total weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordGroup {
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub value: f64,
}

/// The slice of a group's arc occupied by one end of a chord.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordSubgroup {
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    pub source: ChordSubgroup,
    pub target: ChordSubgroup,
}

impl Chord {
    pub fn is_self_loop(&self) -> bool {
        self.source.index == self.target.index
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChordLayout {
    pub groups: Vec<ChordGroup>,
    pub chords: Vec<Chord>,
}

impl ChordLayout {
    pub fn iter(&self) -> std::slice::Iter<'_, Chord> {
        self.chords.iter()
    }
}

impl IntoIterator for ChordLayout {
    type Item = Chord;
    type IntoIter = std::vec::IntoIter<Chord>;

    fn into_iter(self) -> Self::IntoIter {
        self.chords.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChordLayout {
    type Item = &'a Chord;
    type IntoIter = std::slice::Iter<'a, Chord>;

    fn into_iter(self) -> Self::IntoIter {
        self.chords.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChordGenerator {
    pad_angle: f64,
    sort_groups: SortOrder,
    sort_subgroups: SortOrder,
    sort_chords: SortOrder,
}

#[derive(Debug, Clone, Copy, Default)]
struct PartialChord {
    source: Option<ChordSubgroup>,
    target: Option<ChordSubgroup>,
}

fn truthy(v: f64) -> bool {
    v != 0.0 && !v.is_nan()
}

impl ChordGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gap (radians) left between adjacent groups.
    pub fn pad_angle(mut self, pad_angle: f64) -> Self {
        self.pad_angle = pad_angle;
        self
    }

    pub fn sort_groups(mut self, order: SortOrder) -> Self {
        self.sort_groups = order;
        self
    }

    pub fn sort_subgroups(mut self, order: SortOrder) -> Self {
        self.sort_subgroups = order;
        self
    }

    pub fn sort_chords(mut self, order: SortOrder) -> Self {
        self.sort_chords = order;
        self
    }

    pub fn get_pad_angle(&self) -> f64 {
        self.pad_angle
    }

    /// Lays out a square matrix. Missing cells of ragged rows read as zero.
    pub fn layout(&self, matrix: &[Vec<f64>]) -> ChordLayout {
        let n = matrix.len();
        let m = |i: usize, j: usize| matrix[i].get(j).copied().unwrap_or(0.0);

        let group_sums: Vec<f64> = (0..n).map(|i| (0..n).map(|j| m(i, j)).sum()).collect();
        let total: f64 = group_sums.iter().sum();

        // Same arithmetic as d3: an all-zero matrix yields an infinite (or NaN) scale.
        let k = (TAU - self.pad_angle * n as f64).max(0.0) / total;
        let dx = if truthy(k) {
            self.pad_angle
        } else {
            TAU / n as f64
        };

        let mut group_index: Vec<usize> = (0..n).collect();
        if !self.sort_groups.is_none() {
            group_index.sort_by(|&a, &b| self.sort_groups.compare(group_sums[a], group_sums[b]));
        }

        let mut partial = vec![PartialChord::default(); n * n];
        let mut groups: Vec<Option<ChordGroup>> = vec![None; n];
        let mut x = 0.0;

        for &i in &group_index {
            let x0 = x;
            let mut subgroup_index: Vec<usize> =
                (0..n).filter(|&j| truthy(m(i, j)) || truthy(m(j, i))).collect();
            if !self.sort_subgroups.is_none() {
                subgroup_index.sort_by(|&a, &b| self.sort_subgroups.compare(m(i, a), m(i, b)));
            }

            for j in subgroup_index {
                let value = m(i, j);
                let start_angle = x;
                x += value * k;
                let sub = ChordSubgroup {
                    index: i,
                    start_angle,
                    end_angle: x,
                    value,
                };
                let slot = if i < j {
                    let slot = &mut partial[i * n + j];
                    slot.source = Some(sub);
                    slot
                } else {
                    let slot = &mut partial[j * n + i];
                    slot.target = Some(sub);
                    if i == j {
                        slot.source = Some(sub);
                    }
                    slot
                };
                if let (Some(s), Some(t)) = (slot.source, slot.target) {
                    if s.value < t.value {
                        slot.source = Some(t);
                        slot.target = Some(s);
                    }
                }
            }

            groups[i] = Some(ChordGroup {
                index: i,
                start_angle: x0,
                end_angle: x,
                value: group_sums[i],
            });
            x += dx;
        }

        let mut chords: Vec<Chord> = partial
            .into_iter()
            .filter_map(|c| {
                Some(Chord {
                    source: c.source?,
                    target: c.target?,
                })
            })
            .collect();
        if !self.sort_chords.is_none() {
            chords.sort_by(|a, b| {
                self.sort_chords.compare(
                    a.source.value + a.target.value,
                    b.source.value + b.target.value,
                )
            });
        }

        let groups: Vec<ChordGroup> = groups.into_iter().flatten().collect();
        tracing::trace!(
            groups = groups.len(),
            chords = chords.len(),
            scale = k,
            "chord layout"
        );
        ChordLayout { groups, chords }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn two_by_two_without_padding() {
        let layout = ChordGenerator::new().layout(&[vec![0.0, 1.0], vec![3.0, 0.0]]);
        assert_eq!(layout.groups.len(), 2);
        assert_eq!(layout.chords.len(), 1);

        let g0 = layout.groups[0];
        let g1 = layout.groups[1];
        assert!(close(g0.start_angle, 0.0) && close(g0.end_angle, TAU / 4.0));
        assert!(close(g1.start_angle, TAU / 4.0) && close(g1.end_angle, TAU));
        assert_eq!(g0.value, 1.0);
        assert_eq!(g1.value, 3.0);

        // The heavier end becomes the source.
        let c = layout.chords[0];
        assert_eq!(c.source.index, 1);
        assert_eq!(c.source.value, 3.0);
        assert_eq!(c.target.index, 0);
        assert_eq!(c.target.value, 1.0);
    }

    #[test]
    fn one_directional_flow_still_reserves_a_zero_width_end() {
        let layout = ChordGenerator::new().layout(&[vec![0.0, 5.0], vec![0.0, 0.0]]);
        assert_eq!(layout.chords.len(), 1);
        let c = layout.chords[0];
        assert_eq!(c.source.index, 0);
        assert_eq!(c.target.index, 1);
        assert_eq!(c.target.value, 0.0);
        assert!(close(c.target.start_angle, c.target.end_angle));
        assert_eq!(layout.groups[1].value, 0.0);
    }

    #[test]
    fn diagonal_entries_become_self_loops() {
        let layout = ChordGenerator::new().layout(&[vec![2.0, 0.0], vec![0.0, 2.0]]);
        assert_eq!(layout.chords.len(), 2);
        assert!(layout.chords.iter().all(Chord::is_self_loop));
        assert_eq!(layout.chords[0].source, layout.chords[0].target);
    }

    #[test]
    fn padding_is_spread_between_groups() {
        let pad = 0.1;
        let layout = ChordGenerator::new()
            .pad_angle(pad)
            .layout(&[vec![1.0, 1.0], vec![1.0, 1.0]]);
        let g = &layout.groups;
        assert!(close(g[1].start_angle - g[0].end_angle, pad));
        assert!(close(g[1].end_angle + pad, TAU));
    }

    #[test]
    fn all_zero_matrix_spaces_empty_groups_by_pad_angle() {
        let layout = ChordGenerator::new()
            .pad_angle(0.05)
            .layout(&[vec![0.0; 3], vec![0.0; 3], vec![0.0; 3]]);
        assert!(layout.chords.is_empty());
        assert_eq!(layout.groups.len(), 3);
        for (i, g) in layout.groups.iter().enumerate() {
            assert!(close(g.start_angle, 0.05 * i as f64));
            assert_eq!(g.start_angle, g.end_angle);
        }
    }

    #[test]
    fn descending_subgroups_put_the_largest_flow_first() {
        let layout = ChordGenerator::new()
            .sort_subgroups(SortOrder::Descending)
            .layout(&[vec![1.0, 5.0, 3.0], vec![1.0, 0.0, 0.0], vec![1.0, 0.0, 0.0]]);
        let group0_subgroups: Vec<ChordSubgroup> = layout
            .iter()
            .flat_map(|c| [c.source, c.target])
            .filter(|s| s.index == 0)
            .collect();
        let first = group0_subgroups
            .iter()
            .min_by(|a, b| a.start_angle.total_cmp(&b.start_angle))
            .unwrap();
        assert_eq!(first.value, 5.0);
    }

    #[test]
    fn sorted_groups_keep_index_order_in_output() {
        let layout = ChordGenerator::new()
            .sort_groups(SortOrder::Descending)
            .layout(&[vec![1.0, 0.0], vec![0.0, 3.0]]);
        assert_eq!(layout.groups[0].index, 0);
        assert_eq!(layout.groups[1].index, 1);
        // Group 1 is heavier and is therefore placed first on the circle.
        assert_eq!(layout.groups[1].start_angle, 0.0);
    }

    #[test]
    fn sort_chords_orders_by_combined_value() {
        let layout = ChordGenerator::new()
            .sort_chords(SortOrder::Ascending)
            .layout(&[vec![9.0, 1.0], vec![1.0, 0.0]]);
        let values: Vec<f64> = layout
            .iter()
            .map(|c| c.source.value + c.target.value)
            .collect();
        assert_eq!(values, vec![2.0, 18.0]);
    }

    #[test]
    fn empty_matrix_lays_out_nothing() {
        let layout = ChordGenerator::new().pad_angle(0.05).layout(&[]);
        assert!(layout.groups.is_empty());
        assert!(layout.chords.is_empty());
    }
}
