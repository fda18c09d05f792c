use crate::color::{OrdinalScale, Rgb};
use crate::engine::{D3LayoutEngine, LayoutEngine};
use crate::format::PrefixFormat;
use crate::model::{ChordDiagramLayout, GroupLayout, RibbonLayout, TickLayout};
use crate::settings::{DiagramSettings, Radii};
use crate::surface::{Element, Surface};
use crate::{Error, Result, Viewport};
use chordgram_core::{ChordConfig, ChordData, EntityTable};
use chordgram_layout::path::js_number;
use chordgram_layout::{ChordGroup, ChordLayout, Error as LayoutError, group_ticks};
use std::f64::consts::PI;

/// Chord diagram bound to a persistent SVG [`Surface`].
///
/// Radii, sort orders, colors and label format are fixed at construction. Every
/// [`update_diagram`](Self::update_diagram) replaces the whole picture, so the surface always
/// reflects exactly the last accepted input.
#[derive(Debug, Clone)]
pub struct DiagramRenderer<E = D3LayoutEngine> {
    engine: E,
    viewport: Viewport,
    settings: DiagramSettings,
    radii: Radii,
    label_format: PrefixFormat,
    surface: Surface,
    layout: Option<ChordDiagramLayout>,
}

impl DiagramRenderer<D3LayoutEngine> {
    pub fn new(viewport: Viewport, settings: DiagramSettings) -> Result<Self> {
        settings.validate()?;
        let engine = D3LayoutEngine::from_settings(&viewport, &settings)?;
        Self::with_engine(viewport, settings, engine)
    }

    pub fn from_config(viewport: Viewport, config: &ChordConfig) -> Result<Self> {
        Self::new(viewport, DiagramSettings::from_config(config)?)
    }
}

impl<E: LayoutEngine> DiagramRenderer<E> {
    pub fn with_engine(viewport: Viewport, settings: DiagramSettings, engine: E) -> Result<Self> {
        settings.validate()?;
        let label_format = PrefixFormat::new(&settings.tick_format, settings.tick_format_scale)?;
        let radii = settings.radii(&viewport);
        let surface = Surface::new(viewport, &settings.font);
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            inner_radius = radii.inner,
            outer_radius = radii.outer,
            "chord renderer created"
        );
        Ok(Self {
            engine,
            viewport,
            settings,
            radii,
            label_format,
            surface,
            layout: None,
        })
    }

    /// Validates `data` and redraws the surface from it. On error the previous picture is kept.
    ///
    /// Returns the geometry that was drawn.
    pub fn update_diagram(&mut self, data: &ChordData) -> Result<&ChordDiagramLayout> {
        data.validate()?;
        let names: Vec<&str> = data.names.iter().map(String::as_str).collect();
        self.draw(&names, &data.matrix)
    }

    pub fn update_entities(&mut self, table: &EntityTable) -> Result<&ChordDiagramLayout> {
        self.draw(&table.names(), &table.matrix())
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn to_svg(&self) -> String {
        self.surface.to_svg_string()
    }

    /// Geometry of the last successful update.
    pub fn layout(&self) -> Option<&ChordDiagramLayout> {
        self.layout.as_ref()
    }

    pub fn clear(&mut self) {
        self.surface.clear();
        self.layout = None;
    }

    pub fn set_diagram_id(&mut self, id: Option<&str>) {
        self.surface.set_id(id);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn settings(&self) -> &DiagramSettings {
        &self.settings
    }

    pub fn radii(&self) -> Radii {
        self.radii
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn draw(&mut self, names: &[&str], matrix: &[Vec<f64>]) -> Result<&ChordDiagramLayout> {
        let total: f64 = matrix.iter().flatten().sum();
        if !matrix.is_empty() && !(total > 0.0) {
            tracing::warn!(
                groups = matrix.len(),
                "chord input has no positive weight; every group collapses to a point"
            );
        }

        let chords = self.engine.chord_layout(matrix);
        let layout = self.build_layout(names, &chords)?;
        let children = self.build_elements(&layout);
        self.surface.replace_children(children);

        tracing::debug!(
            groups = layout.groups.len(),
            ribbons = layout.ribbons.len(),
            ticks = layout.tick_count(),
            "chord diagram updated"
        );
        Ok(self.layout.insert(layout))
    }

    fn build_layout(&self, names: &[&str], chords: &ChordLayout) -> Result<ChordDiagramLayout> {
        let mut colors = OrdinalScale::new(self.settings.palette.clone());
        let mut paint = |index: usize| -> Result<(String, String)> {
            let fill = colors
                .get(index)
                .ok_or_else(|| Error::InvalidSetting {
                    key: "palette".to_string(),
                    message: "must contain at least one color".to_string(),
                })?
                .to_string();
            let stroke = Rgb::parse(&fill)?.darker(1.0).to_string();
            Ok((fill, stroke))
        };

        let mut groups = Vec::with_capacity(chords.groups.len());
        for group in &chords.groups {
            let (fill, stroke) = paint(group.index)?;
            let ticks = if self.settings.show_ticks {
                self.group_tick_layouts(group)?
            } else {
                Vec::new()
            };
            groups.push(GroupLayout {
                index: group.index,
                name: names.get(group.index).copied().unwrap_or_default().to_string(),
                start_angle: group.start_angle,
                end_angle: group.end_angle,
                value: group.value,
                label: self.label_format.format(group.value),
                fill,
                stroke,
                path: self.engine.arc_path(group),
                ticks,
            });
        }

        let mut ribbons = Vec::with_capacity(chords.chords.len());
        for chord in chords {
            let (fill, stroke) = paint(chord.target.index)?;
            ribbons.push(RibbonLayout {
                source: chord.source,
                target: chord.target,
                fill,
                stroke,
                path: self.engine.ribbon_path(chord),
            });
        }

        Ok(ChordDiagramLayout {
            width: self.viewport.width,
            height: self.viewport.height,
            inner_radius: self.radii.inner,
            outer_radius: self.radii.outer,
            groups,
            ribbons,
        })
    }

    /// A group too large for the tick step is drawn without ticks.
    fn group_tick_layouts(&self, group: &ChordGroup) -> Result<Vec<TickLayout>> {
        let ticks = match group_ticks(group, self.settings.tick_step) {
            Ok(ticks) => ticks,
            Err(err @ LayoutError::TooManyTicks { .. }) => {
                tracing::warn!(group = group.index, error = %err, "skipping group ticks");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(ticks
            .map(|t| TickLayout {
                value: t.value,
                angle: t.angle,
                label: self.label_format.format(t.value),
                flipped: t.angle > PI,
            })
            .collect())
    }

    fn build_elements(&self, layout: &ChordDiagramLayout) -> Vec<Element> {
        let outer = js_number(self.radii.outer);

        let mut arcs = Element::new("g");
        for group in &layout.groups {
            let mut g = Element::new("g")
                .with_child(
                    Element::new("path")
                        .with_attr("fill", group.fill.as_str())
                        .with_attr("stroke", group.stroke.as_str())
                        .with_attr("d", group.path.as_str()),
                )
                .with_child(
                    Element::new("title").with_text(format!("{}\n{}", group.name, group.label)),
                );
            for tick in &group.ticks {
                let rotate = js_number(tick.angle * 180.0 / PI - 90.0);
                let mut text = Element::new("text")
                    .with_attr("x", "8")
                    .with_attr("dy", "0.35em");
                if tick.flipped {
                    text.set_attr("transform", "rotate(180) translate(-16)");
                    text.set_attr("text-anchor", "end");
                }
                g.append(
                    Element::new("g")
                        .with_attr("transform", format!("rotate({rotate}) translate({outer},0)"))
                        .with_child(
                            Element::new("line")
                                .with_attr("stroke", "currentColor")
                                .with_attr("x2", "6"),
                        )
                        .with_child(text.with_text(tick.label.as_str())),
                );
            }
            arcs.append(g);
        }

        let mut ribbons =
            Element::new("g").with_attr("fill-opacity", js_number(self.settings.ribbon_opacity));
        for ribbon in &layout.ribbons {
            ribbons.append(
                Element::new("path")
                    .with_attr("d", ribbon.path.as_str())
                    .with_attr("fill", ribbon.fill.as_str())
                    .with_attr("stroke", ribbon.stroke.as_str()),
            );
        }

        vec![arcs, ribbons]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> DiagramRenderer {
        DiagramRenderer::new(Viewport::default(), DiagramSettings::default()).unwrap()
    }

    #[test]
    fn sample_draws_four_arcs_and_ten_ribbons() {
        let mut r = renderer();
        r.update_diagram(&ChordData::sample()).unwrap();
        let layout = r.layout().unwrap();
        assert_eq!(layout.groups.len(), 4);
        assert_eq!(layout.ribbons.len(), 10);
        assert_eq!(layout.groups[0].fill, "#1f77b4");
        assert_eq!(layout.groups[0].stroke, "rgb(22, 83, 126)");
        assert_eq!(layout.groups[0].label, "30k");
        assert_eq!(r.surface().count("title"), 4);
    }

    #[test]
    fn ribbons_take_the_target_color() {
        let mut r = renderer();
        r.update_diagram(&ChordData::new(
            vec![vec![0.0, 9.0], vec![1.0, 0.0]],
            vec!["a".to_string(), "b".to_string()],
        ))
        .unwrap();
        let ribbon = &r.layout().unwrap().ribbons[0];
        assert_eq!(ribbon.source.index, 0);
        assert_eq!(ribbon.target.index, 1);
        assert_eq!(ribbon.fill, "#ff7f0e");
    }

    #[test]
    fn hidden_ticks_produce_no_tick_groups() {
        let settings = DiagramSettings {
            show_ticks: false,
            ..DiagramSettings::default()
        };
        let mut r = DiagramRenderer::new(Viewport::default(), settings).unwrap();
        r.update_diagram(&ChordData::sample()).unwrap();
        assert_eq!(r.layout().unwrap().tick_count(), 0);
        assert_eq!(r.surface().count("line"), 0);
    }

    #[test]
    fn huge_weights_draw_without_ticks() {
        for weight in [1e12, 1e300] {
            let data = ChordData::new(vec![vec![weight]], vec!["a".to_string()]);
            data.validate().unwrap();
            let mut r = renderer();
            let layout = r.update_diagram(&data).unwrap();
            assert_eq!(layout.groups.len(), 1);
            assert_eq!(layout.ribbons.len(), 1);
            assert_eq!(layout.tick_count(), 0);
            assert_eq!(r.surface().count("line"), 0);
            assert_eq!(r.surface().count("title"), 1);
        }
    }

    #[test]
    fn clear_drops_picture_and_layout() {
        let mut r = renderer();
        r.update_diagram(&ChordData::sample()).unwrap();
        r.clear();
        assert!(r.surface().is_empty());
        assert!(r.layout().is_none());
    }

    #[test]
    fn invalid_label_format_fails_construction() {
        let settings = DiagramSettings {
            tick_format: "??".to_string(),
            ..DiagramSettings::default()
        };
        assert!(matches!(
            DiagramRenderer::new(Viewport::default(), settings),
            Err(Error::InvalidFormatSpecifier { .. })
        ));
    }
}
