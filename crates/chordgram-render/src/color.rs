use crate::{Error, Result};
use chordgram_layout::path::js_round;
use regex::Regex;
use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::OnceLock;

const CATEGORY10: &str = "1f77b4ff7f0e2ca02cd627289467bd8c564be377c27f7f7fbcbd2217becf";
const ACCENT: &str = "7fc97fbeaed4fdc086ffff99386cb0f0027fbf5b17666666";
const DARK2: &str = "1b9e77d95f027570b3e7298a66a61ee6ab02a6761d666666";
const PAIRED: &str = "a6cee31f78b4b2df8a33a02cfb9a99e31a1cfdbf6fff7f00cab2d66a3d9affff99b15928";
const SET1: &str = "e41a1c377eb84daf4a984ea3ff7f00ffff33a65628f781bf999999";
const SET2: &str = "66c2a5fc8d628da0cbe78ac3a6d854ffd92fe5c494b3b3b3";
const TABLEAU10: &str = "4e79a7f28e2ce1575976b7b259a14fedc949af7aa1ff9da79c755fbab0ab";

pub const SCHEME_NAMES: &[&str] = &[
    "category10",
    "accent",
    "dark2",
    "paired",
    "set1",
    "set2",
    "tableau10",
];

/// A d3 categorical scheme as `#rrggbb` strings. Names are matched case-insensitively, with or
/// without the `scheme` prefix (`"schemeCategory10"`).
pub fn scheme(name: &str) -> Result<Vec<String>> {
    let key = name.trim().to_ascii_lowercase();
    let key = key.strip_prefix("scheme").unwrap_or(&key);
    let packed = match key {
        "category10" => CATEGORY10,
        "accent" => ACCENT,
        "dark2" => DARK2,
        "paired" => PAIRED,
        "set1" => SET1,
        "set2" => SET2,
        "tableau10" => TABLEAU10,
        _ => {
            return Err(Error::UnknownPalette {
                name: name.to_string(),
            });
        }
    };
    Ok(packed
        .as_bytes()
        .chunks(6)
        .map(|c| format!("#{}", String::from_utf8_lossy(c)))
        .collect())
}

/// RGB color with unclamped floating channels, like `d3.rgb`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Accepts `#rgb`, `#rrggbb` and `rgb(r, g, b)`.
    pub fn parse(text: &str) -> Result<Self> {
        parse_hex(text)
            .or_else(|| parse_rgb_function(text))
            .ok_or_else(|| Error::InvalidColor {
                color: text.to_string(),
            })
    }

    pub fn darker(self, k: f64) -> Self {
        let f = 0.7f64.powf(k);
        Self::new(self.r * f, self.g * f, self.b * f)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgb({}, {}, {})",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

fn channel(v: f64) -> u8 {
    let v = js_round(v);
    if v.is_nan() { 0 } else { v.clamp(0.0, 255.0) as u8 }
}

fn parse_hex(text: &str) -> Option<Rgb> {
    let hex = text.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let (r, g, b) = match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            (r, g, b)
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            (r, g, b)
        }
        _ => return None,
    };
    Some(Rgb::new(r as f64, g as f64, b as f64))
}

fn parse_rgb_function(text: &str) -> Option<Rgb> {
    static RE: OnceLock<Regex> = OnceLock::new();

    let re = RE.get_or_init(|| {
        Regex::new(r"^rgb\(\s*([-+]?[\d.]+)\s*,\s*([-+]?[\d.]+)\s*,\s*([-+]?[\d.]+)\s*\)$")
            .expect("static rgb() pattern")
    });
    let caps = re.captures(text.trim())?;
    let num = |i: usize| caps.get(i)?.as_str().parse::<f64>().ok();
    Some(Rgb::new(num(1)?, num(2)?, num(3)?))
}

/// Ordinal scale with an implicit domain (`d3.scaleOrdinal(range)`): each new key takes the next
/// range entry, wrapping around.
#[derive(Debug, Clone)]
pub struct OrdinalScale<K = usize> {
    range: Vec<String>,
    index: FxHashMap<K, usize>,
}

impl<K: Eq + Hash> OrdinalScale<K> {
    pub fn new(range: Vec<String>) -> Self {
        Self {
            range,
            index: FxHashMap::default(),
        }
    }

    /// Returns `None` only when the range is empty.
    pub fn get(&mut self, key: K) -> Option<&str> {
        if self.range.is_empty() {
            return None;
        }
        let next = self.index.len();
        let idx = *self.index.entry(key).or_insert(next);
        Some(&self.range[idx % self.range.len()])
    }

    pub fn domain_len(&self) -> usize {
        self.index.len()
    }

    pub fn range(&self) -> &[String] {
        &self.range
    }
}
