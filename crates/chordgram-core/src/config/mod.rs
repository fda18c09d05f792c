use crate::input::{InputFormat, deserialize_text};
use crate::{Error, Result};
use serde_json::{Map, Value};

/// Untyped diagram configuration addressed with dotted paths (`"ticks.step"`).
///
/// Site defaults and per-diagram overrides are layered with [`ChordConfig::deep_merge`]; typed
/// settings are read from the merged value by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordConfig(Value);

impl Default for ChordConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl ChordConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Loads a config document. The top level must be an object.
    pub fn from_text(text: &str, format: InputFormat) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::empty_object());
        }
        let value: Value = deserialize_text(text, format)?;
        match value {
            Value::Object(_) => Ok(Self(value)),
            Value::Null => Ok(Self::empty_object()),
            other => Err(Error::InvalidConfig {
                message: format!("expected a mapping at the top level, found {}", kind(&other)),
            }),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        dotted_path
            .split('.')
            .try_fold(&self.0, |cur, segment| cur.as_object()?.get(segment))
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.get(dotted_path)?.as_bool()
    }

    /// Numbers are also accepted when written as strings (`"0.05"`), which YAML front-ends tend
    /// to produce.
    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        match self.get(dotted_path)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Merges `other` on top of `self`: objects merge key by key, everything else replaces.
    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dotted_paths_read_nested_values() {
        let cfg = ChordConfig::from_value(json!({"ticks": {"step": 500, "format": ",.1"}}));
        assert_eq!(cfg.get_f64("ticks.step"), Some(500.0));
        assert_eq!(cfg.get_str("ticks.format"), Some(",.1"));
        assert_eq!(cfg.get_f64("ticks.missing"), None);
        assert_eq!(cfg.get_f64("ticks.step.deeper"), None);
    }

    #[test]
    fn string_numbers_are_accepted() {
        let cfg = ChordConfig::from_value(json!({"padAngle": " 0.1 "}));
        assert_eq!(cfg.get_f64("padAngle"), Some(0.1));
    }

    #[test]
    fn deep_merge_layers_objects() {
        let mut cfg = ChordConfig::from_value(json!({"ticks": {"step": 1000, "show": true}, "palette": "category10"}));
        cfg.deep_merge(&json!({"ticks": {"step": 10}, "palette": ["#000", "#fff"]}));
        assert_eq!(
            cfg.as_value(),
            &json!({"ticks": {"step": 10, "show": true}, "palette": ["#000", "#fff"]})
        );
    }

    #[test]
    fn from_text_requires_a_mapping() {
        let cfg = ChordConfig::from_text("margin: 12\n", InputFormat::Auto).unwrap();
        assert_eq!(cfg.get_f64("margin"), Some(12.0));
        assert!(ChordConfig::from_text("", InputFormat::Auto).unwrap().as_value().is_object());
        let err = ChordConfig::from_text("[1, 2]", InputFormat::Auto).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }
}
