#![forbid(unsafe_code)]

//! `chordgram` renders chord diagrams headlessly.
//!
//! Input is a square weight matrix with one label per row (or the equivalent list of entities);
//! output is an SVG document whose geometry matches d3-chord.
//!
//! # Features
//!
//! - `render`: enable layout + SVG rendering (`chordgram::render`)
//! - `raster`: enable PNG/JPG/PDF output via pure-Rust SVG rasterization/conversion

pub use chordgram_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use chordgram_render::{
        ChordDiagramLayout, D3LayoutEngine, DiagramRenderer, DiagramSettings, LayoutEngine,
        PrefixFormat, Surface, Viewport,
    };

    #[cfg(feature = "raster")]
    pub mod raster;

    use chordgram_core::{ChordConfig, EntityTable, InputFormat, parse_entity_table};

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Parse(#[from] chordgram_core::Error),
        #[error(transparent)]
        Render(#[from] chordgram_render::Error),
        #[error("layout JSON error: {0}")]
        Json(#[from] serde_json::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Converts an arbitrary string into a conservative SVG `id` token.
    ///
    /// Unsupported characters become `-`, runs of `-` collapse, and the result always starts
    /// with an ASCII letter (`c-` is prefixed when needed).
    pub fn sanitize_svg_id(raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return "c-untitled".to_string();
        }

        let mut out = String::with_capacity(raw.len() + 4);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | ':' | '.');
            out.push(if ok { ch } else { '-' });
        }
        if !out.starts_with(|c: char| c.is_ascii_alphabetic()) {
            out.insert_str(0, "c-");
        }
        while out.contains("--") {
            out = out.replace("--", "-");
        }
        let out = out.trim_matches('-');
        if out.is_empty() || out == "c" {
            return "c-untitled".to_string();
        }
        out.to_string()
    }

    /// Renders `table` once on a fresh renderer and returns the SVG.
    pub fn render_svg(
        table: &EntityTable,
        viewport: Viewport,
        settings: DiagramSettings,
    ) -> Result<String> {
        let mut renderer = DiagramRenderer::new(viewport, settings)?;
        renderer.update_entities(table)?;
        Ok(renderer.to_svg())
    }

    /// Bundles input format, config, viewport and diagram id for one-shot text-to-SVG rendering.
    ///
    /// Every call builds a fresh [`DiagramRenderer`]; use that type directly to redraw one
    /// surface repeatedly.
    #[derive(Debug, Clone, Default)]
    pub struct HeadlessRenderer {
        pub input_format: InputFormat,
        pub config: ChordConfig,
        pub viewport: Viewport,
        pub diagram_id: Option<String>,
    }

    impl HeadlessRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        /// Layers `config` on top of the current configuration.
        pub fn with_config(mut self, config: &ChordConfig) -> Self {
            self.config.deep_merge(config.as_value());
            self
        }

        pub fn with_input_format(mut self, format: InputFormat) -> Self {
            self.input_format = format;
            self
        }

        pub fn with_viewport(mut self, viewport: Viewport) -> Self {
            self.viewport = viewport;
            self
        }

        pub fn with_diagram_id(mut self, id: &str) -> Self {
            self.diagram_id = Some(sanitize_svg_id(id));
            self
        }

        pub fn settings(&self) -> Result<DiagramSettings> {
            Ok(DiagramSettings::from_config(&self.config)?)
        }

        pub fn parse_sync(&self, text: &str) -> Result<EntityTable> {
            Ok(parse_entity_table(text, self.input_format)?)
        }

        pub fn renderer(&self) -> Result<DiagramRenderer> {
            let mut renderer = DiagramRenderer::new(self.viewport, self.settings()?)?;
            renderer.set_diagram_id(self.diagram_id.as_deref());
            Ok(renderer)
        }

        pub fn layout_sync(&self, text: &str) -> Result<ChordDiagramLayout> {
            let table = self.parse_sync(text)?;
            let mut renderer = self.renderer()?;
            Ok(renderer.update_entities(&table)?.clone())
        }

        pub fn layout_json_sync(&self, text: &str, pretty: bool) -> Result<String> {
            let layout = self.layout_sync(text)?;
            Ok(if pretty {
                serde_json::to_string_pretty(&layout)?
            } else {
                serde_json::to_string(&layout)?
            })
        }

        pub fn render_svg_sync(&self, text: &str) -> Result<String> {
            let table = self.parse_sync(text)?;
            let mut renderer = self.renderer()?;
            renderer.update_entities(&table)?;
            Ok(renderer.to_svg())
        }

        #[cfg(feature = "raster")]
        pub fn render_png_sync(
            &self,
            text: &str,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            raster::svg_to_png(&self.render_svg_sync(text)?, raster)
        }

        #[cfg(feature = "raster")]
        pub fn render_jpeg_sync(
            &self,
            text: &str,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            raster::svg_to_jpeg(&self.render_svg_sync(text)?, raster)
        }

        #[cfg(feature = "raster")]
        pub fn render_pdf_sync(&self, text: &str) -> raster::Result<Vec<u8>> {
            raster::svg_to_pdf(&self.render_svg_sync(text)?)
        }
    }

}
