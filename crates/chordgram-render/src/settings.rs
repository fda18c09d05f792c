use crate::color::{Rgb, scheme};
use crate::{Error, Result, Viewport};
use chordgram_core::ChordConfig;
use chordgram_layout::SortOrder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Typed rendering settings, read from a [`ChordConfig`] with [`DiagramSettings::from_config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramSettings {
    /// Space kept between the outer radius and the nearest viewport edge.
    pub margin: f64,
    /// Thickness of the group arcs; ribbons end at `outer_radius - band_width`.
    pub band_width: f64,
    pub pad_angle: f64,
    pub sort_groups: SortOrder,
    pub sort_subgroups: SortOrder,
    pub sort_chords: SortOrder,
    /// Fill colors, assigned to groups by index.
    pub palette: Vec<String>,
    pub font: String,
    pub show_ticks: bool,
    pub tick_step: f64,
    pub tick_format: String,
    pub tick_format_scale: f64,
    pub ribbon_opacity: f64,
    pub ribbon_pad_angle: f64,
}

impl Default for DiagramSettings {
    fn default() -> Self {
        Self {
            margin: 40.0,
            band_width: 30.0,
            pad_angle: 0.05,
            sort_groups: SortOrder::None,
            sort_subgroups: SortOrder::Descending,
            sort_chords: SortOrder::None,
            palette: scheme("category10").unwrap_or_default(),
            font: "10px sans-serif".to_string(),
            show_ticks: true,
            tick_step: 1000.0,
            tick_format: ",.0".to_string(),
            tick_format_scale: 1000.0,
            ribbon_opacity: 0.67,
            ribbon_pad_angle: 0.0,
        }
    }
}

/// Radii derived from a viewport: `outer = min(width, height) / 2 - margin`,
/// `inner = outer - band_width`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Radii {
    pub inner: f64,
    pub outer: f64,
}

impl DiagramSettings {
    pub fn from_config(config: &ChordConfig) -> Result<Self> {
        let d = Self::default();
        let settings = Self {
            margin: read_f64(config, "margin", d.margin)?,
            band_width: read_f64(config, "bandWidth", d.band_width)?,
            pad_angle: read_f64(config, "padAngle", d.pad_angle)?,
            sort_groups: read_sort(config, "sortGroups", d.sort_groups)?,
            sort_subgroups: read_sort(config, "sortSubgroups", d.sort_subgroups)?,
            sort_chords: read_sort(config, "sortChords", d.sort_chords)?,
            palette: read_palette(config, "palette")?.unwrap_or(d.palette),
            font: read_str(config, "font")?.unwrap_or(d.font),
            show_ticks: read_bool(config, "ticks.show", d.show_ticks)?,
            tick_step: read_f64(config, "ticks.step", d.tick_step)?,
            tick_format: read_str(config, "ticks.format")?.unwrap_or(d.tick_format),
            tick_format_scale: read_f64(config, "ticks.scale", d.tick_format_scale)?,
            ribbon_opacity: read_f64(config, "ribbons.opacity", d.ribbon_opacity)?,
            ribbon_pad_angle: read_f64(config, "ribbons.padAngle", d.ribbon_pad_angle)?,
        };
        settings.validate()?;
        tracing::debug!(?settings, "resolved diagram settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        non_negative("margin", self.margin)?;
        non_negative("bandWidth", self.band_width)?;
        non_negative("padAngle", self.pad_angle)?;
        non_negative("ribbons.padAngle", self.ribbon_pad_angle)?;
        if !(self.tick_step.is_finite() && self.tick_step > 0.0) {
            return Err(invalid("ticks.step", "must be a finite number greater than zero"));
        }
        if !(0.0..=1.0).contains(&self.ribbon_opacity) {
            return Err(invalid("ribbons.opacity", "must be between 0 and 1"));
        }
        if self.palette.is_empty() {
            return Err(invalid("palette", "must contain at least one color"));
        }
        for color in &self.palette {
            Rgb::parse(color)?;
        }
        Ok(())
    }

    pub fn radii(&self, viewport: &Viewport) -> Radii {
        let outer = viewport.min_side() * 0.5 - self.margin;
        Radii {
            inner: outer - self.band_width,
            outer,
        }
    }
}

fn invalid(key: &str, message: impl Into<String>) -> Error {
    Error::InvalidSetting {
        key: key.to_string(),
        message: message.into(),
    }
}

fn non_negative(key: &str, v: f64) -> Result<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(invalid(key, format!("must be a finite non-negative number, got {v}")))
    }
}

fn is_unset(config: &ChordConfig, key: &str) -> bool {
    matches!(config.get(key), None | Some(Value::Null))
}

fn read_f64(config: &ChordConfig, key: &str, default: f64) -> Result<f64> {
    if is_unset(config, key) {
        return Ok(default);
    }
    config
        .get_f64(key)
        .ok_or_else(|| invalid(key, "expected a number"))
}

fn read_bool(config: &ChordConfig, key: &str, default: bool) -> Result<bool> {
    if is_unset(config, key) {
        return Ok(default);
    }
    config
        .get_bool(key)
        .ok_or_else(|| invalid(key, "expected true or false"))
}

fn read_str(config: &ChordConfig, key: &str) -> Result<Option<String>> {
    if is_unset(config, key) {
        return Ok(None);
    }
    config
        .get_str(key)
        .map(|s| Some(s.to_string()))
        .ok_or_else(|| invalid(key, "expected a string"))
}

fn read_sort(config: &ChordConfig, key: &str, default: SortOrder) -> Result<SortOrder> {
    match read_str(config, key)? {
        None => Ok(default),
        Some(s) => s.parse().map_err(|_| {
            invalid(
                key,
                format!("expected `ascending`, `descending` or `none`, got {s:?}"),
            )
        }),
    }
}

/// A scheme name or an explicit list of colors.
fn read_palette(config: &ChordConfig, key: &str) -> Result<Option<Vec<String>>> {
    match config.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(name)) => scheme(name).map(Some),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid(key, "palette entries must be color strings"))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
        Some(_) => Err(invalid(key, "expected a scheme name or a list of colors")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_config_gives_defaults() {
        let s = DiagramSettings::from_config(&ChordConfig::empty_object()).unwrap();
        assert_eq!(s, DiagramSettings::default());
        assert_eq!(s.palette.len(), 10);
        assert_eq!(s.sort_subgroups, SortOrder::Descending);
    }

    #[test]
    fn nested_keys_override_defaults() {
        let cfg = ChordConfig::from_value(json!({
            "margin": 10,
            "palette": ["#000", "rgb(1, 2, 3)"],
            "sortChords": "ascending",
            "ticks": {"show": false, "step": 250, "format": ",.1", "scale": 1e6},
            "ribbons": {"opacity": 0.5, "padAngle": 0.01}
        }));
        let s = DiagramSettings::from_config(&cfg).unwrap();
        assert_eq!(s.margin, 10.0);
        assert_eq!(s.palette, vec!["#000".to_string(), "rgb(1, 2, 3)".to_string()]);
        assert_eq!(s.sort_chords, SortOrder::Ascending);
        assert!(!s.show_ticks);
        assert_eq!(s.tick_step, 250.0);
        assert_eq!(s.tick_format, ",.1");
        assert_eq!(s.tick_format_scale, 1e6);
        assert_eq!(s.ribbon_opacity, 0.5);
        assert_eq!(s.ribbon_pad_angle, 0.01);
    }

    #[test]
    fn palette_by_scheme_name() {
        let cfg = ChordConfig::from_value(json!({"palette": "tableau10"}));
        let s = DiagramSettings::from_config(&cfg).unwrap();
        assert_eq!(s.palette[0], "#4e79a7");
    }

    #[test]
    fn invalid_values_are_reported_with_their_key() {
        let cases = [
            json!({"margin": "wide"}),
            json!({"ticks": {"step": 0}}),
            json!({"ribbons": {"opacity": 2}}),
            json!({"sortGroups": "sideways"}),
            json!({"palette": [1, 2]}),
            json!({"palette": []}),
            json!({"ticks": {"show": "yes"}}),
        ];
        for value in cases {
            let err = DiagramSettings::from_config(&ChordConfig::from_value(value.clone()))
                .unwrap_err();
            assert!(matches!(err, Error::InvalidSetting { .. }), "{value}: {err}");
        }
        let err = DiagramSettings::from_config(&ChordConfig::from_value(json!({"palette": "nope"})))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownPalette { .. }));
        let err =
            DiagramSettings::from_config(&ChordConfig::from_value(json!({"palette": ["teal"]})))
                .unwrap_err();
        assert!(matches!(err, Error::InvalidColor { .. }));
    }

    #[test]
    fn radii_follow_the_smaller_side() {
        let s = DiagramSettings::default();
        let r = s.radii(&Viewport::new(960.0, 800.0).unwrap());
        assert_eq!(r.outer, 360.0);
        assert_eq!(r.inner, 330.0);
    }
}
