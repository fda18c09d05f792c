use crate::settings::{DiagramSettings, Radii};
use crate::{Result, Viewport};
use chordgram_layout::{
    ArcGenerator, Chord, ChordGenerator, ChordGroup, ChordLayout, RibbonGenerator,
};

/// Geometry provider used by [`crate::DiagramRenderer`].
///
/// Implementations turn a weight matrix into groups and chords and produce SVG path data for
/// them. Tests substitute a fake to exercise the binding logic without real geometry.
pub trait LayoutEngine {
    fn chord_layout(&self, matrix: &[Vec<f64>]) -> ChordLayout;
    fn arc_path(&self, group: &ChordGroup) -> String;
    fn ribbon_path(&self, chord: &Chord) -> String;
}

/// d3-compatible geometry: `d3.chord()`, `d3.arc()` and `d3.ribbon()`.
#[derive(Debug, Clone, PartialEq)]
pub struct D3LayoutEngine {
    chord: ChordGenerator,
    arc: ArcGenerator,
    ribbon: RibbonGenerator,
}

impl D3LayoutEngine {
    pub fn new(chord: ChordGenerator, arc: ArcGenerator, ribbon: RibbonGenerator) -> Self {
        Self { chord, arc, ribbon }
    }

    /// Arcs span `[inner, outer]`; ribbons end on the inner radius.
    pub fn from_settings(viewport: &Viewport, settings: &DiagramSettings) -> Result<Self> {
        let Radii { inner, outer } = settings.radii(viewport);
        let chord = ChordGenerator::new()
            .pad_angle(settings.pad_angle)
            .sort_groups(settings.sort_groups)
            .sort_subgroups(settings.sort_subgroups)
            .sort_chords(settings.sort_chords);
        let arc = ArcGenerator::new(inner, outer)?;
        let ribbon = RibbonGenerator::new(inner)?.pad_angle(settings.ribbon_pad_angle);
        Ok(Self::new(chord, arc, ribbon))
    }

    pub fn chord_generator(&self) -> &ChordGenerator {
        &self.chord
    }

    pub fn arc_generator(&self) -> &ArcGenerator {
        &self.arc
    }

    pub fn ribbon_generator(&self) -> &RibbonGenerator {
        &self.ribbon
    }
}

impl LayoutEngine for D3LayoutEngine {
    fn chord_layout(&self, matrix: &[Vec<f64>]) -> ChordLayout {
        self.chord.layout(matrix)
    }

    fn arc_path(&self, group: &ChordGroup) -> String {
        self.arc.group_path(group)
    }

    fn ribbon_path(&self, chord: &Chord) -> String {
        self.ribbon.path(chord)
    }
}

impl<E: LayoutEngine + ?Sized> LayoutEngine for &E {
    fn chord_layout(&self, matrix: &[Vec<f64>]) -> ChordLayout {
        (**self).chord_layout(matrix)
    }

    fn arc_path(&self, group: &ChordGroup) -> String {
        (**self).arc_path(group)
    }

    fn ribbon_path(&self, chord: &Chord) -> String {
        (**self).ribbon_path(chord)
    }
}

impl<E: LayoutEngine + ?Sized> LayoutEngine for Box<E> {
    fn chord_layout(&self, matrix: &[Vec<f64>]) -> ChordLayout {
        (**self).chord_layout(matrix)
    }

    fn arc_path(&self, group: &ChordGroup) -> String {
        (**self).arc_path(group)
    }

    fn ribbon_path(&self, chord: &Chord) -> String {
        (**self).ribbon_path(chord)
    }
}
