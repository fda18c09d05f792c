use chordgram_layout::ChordSubgroup;
use serde::{Deserialize, Serialize};

/// Everything drawn by the last diagram update, in serializable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordDiagramLayout {
    pub width: f64,
    pub height: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub groups: Vec<GroupLayout>,
    pub ribbons: Vec<RibbonLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupLayout {
    pub index: usize,
    pub name: String,
    pub start_angle: f64,
    pub end_angle: f64,
    pub value: f64,
    /// Formatted `value`, as shown in the tooltip.
    pub label: String,
    pub fill: String,
    pub stroke: String,
    pub path: String,
    pub ticks: Vec<TickLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickLayout {
    pub value: f64,
    pub angle: f64,
    pub label: String,
    /// Labels on the left half are rotated to stay upright.
    pub flipped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RibbonLayout {
    pub source: ChordSubgroup,
    pub target: ChordSubgroup,
    pub fill: String,
    pub stroke: String,
    pub path: String,
}

impl ChordDiagramLayout {
    pub fn tick_count(&self) -> usize {
        self.groups.iter().map(|g| g.ticks.len()).sum()
    }
}
