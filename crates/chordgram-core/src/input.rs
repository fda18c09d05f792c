use crate::model::{ChordData, Entity, EntityTable};
use crate::{Error, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::str::FromStr;

/// Text formats accepted for chord data and config files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputFormat {
    /// JSON when the text starts with `{` or `[` (retried as JSON5), YAML otherwise.
    #[default]
    Auto,
    Json,
    Json5,
    Yaml,
}

impl FromStr for InputFormat {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "json" => Ok(Self::Json),
            "json5" => Ok(Self::Json5),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(()),
        }
    }
}

impl InputFormat {
    /// Picks a format from a file extension, falling back to [`InputFormat::Auto`].
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
            .unwrap_or_default()
    }
}

pub(crate) fn deserialize_text<T: DeserializeOwned>(text: &str, format: InputFormat) -> Result<T> {
    match format {
        InputFormat::Json => Ok(serde_json::from_str(text)?),
        InputFormat::Json5 => Ok(json5::from_str(text)?),
        InputFormat::Yaml => Ok(serde_yaml::from_str(text)?),
        InputFormat::Auto => {
            let trimmed = text.trim_start();
            if trimmed.starts_with('{') || trimmed.starts_with('[') {
                match serde_json::from_str(text) {
                    Ok(v) => Ok(v),
                    Err(json_err) => {
                        tracing::trace!(error = %json_err, "input is not strict JSON, retrying as JSON5");
                        json5::from_str(text).map_err(|_| Error::Json(json_err))
                    }
                }
            } else {
                Ok(serde_yaml::from_str(text)?)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChordInput {
    Matrix(ChordData),
    Entities { entities: Vec<Entity> },
}

/// Parses chord data in either the `{matrix, names}` or the `{entities: [{name, weights}]}`
/// shape. The result is not validated; see [`parse_entity_table`].
pub fn parse_chord_data(text: &str, format: InputFormat) -> Result<ChordData> {
    let input: ChordInput = deserialize_text(text, format)?;
    Ok(match input {
        ChordInput::Matrix(data) => data,
        ChordInput::Entities { entities } => {
            let (names, matrix) = entities.into_iter().map(|e| (e.name, e.weights)).unzip();
            ChordData { matrix, names }
        }
    })
}

/// Parses and validates chord data.
pub fn parse_entity_table(text: &str, format: InputFormat) -> Result<EntityTable> {
    let data = parse_chord_data(text, format)?;
    tracing::debug!(entities = data.len(), "parsed chord data");
    EntityTable::from_data(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_reads_strict_json() {
        let data = parse_chord_data(
            r#"{"matrix": [[0, 1], [2, 0]], "names": ["x", "y"]}"#,
            InputFormat::Auto,
        )
        .unwrap();
        assert_eq!(data.matrix, vec![vec![0.0, 1.0], vec![2.0, 0.0]]);
        assert_eq!(data.names, vec!["x", "y"]);
    }

    #[test]
    fn auto_falls_back_to_json5() {
        let data = parse_chord_data(
            "{ matrix: [[0, 1,], [2, 0]], names: ['x', 'y'], // trailing\n}",
            InputFormat::Auto,
        )
        .unwrap();
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn auto_reads_yaml_entities() {
        let text = "entities:\n  - name: a\n    weights: [0, 3]\n  - name: b\n    outgoingWeights: [1, 0]\n";
        let table = parse_entity_table(text, InputFormat::Auto).unwrap();
        assert_eq!(table.names(), vec!["a", "b"]);
        assert_eq!(table.weight(0, 1), Some(3.0));
        assert_eq!(table.weight(1, 0), Some(1.0));
    }

    #[test]
    fn broken_json_reports_the_json_error() {
        let err = parse_chord_data("{\"matrix\": [", InputFormat::Auto).unwrap_err();
        assert!(matches!(err, Error::Json(_)), "{err}");
    }

    #[test]
    fn parse_entity_table_validates() {
        let err = parse_entity_table(
            r#"{"matrix": [[0, 1]], "names": ["x"]}"#,
            InputFormat::Json,
        )
        .unwrap_err();
        assert!(matches!(err, Error::NotSquare { .. }));
    }

    #[test]
    fn format_from_path_uses_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a/b.yml")), InputFormat::Yaml);
        assert_eq!(InputFormat::from_path(Path::new("b.json5")), InputFormat::Json5);
        assert_eq!(InputFormat::from_path(Path::new("b.txt")), InputFormat::Auto);
        assert_eq!(InputFormat::from_path(Path::new("-")), InputFormat::Auto);
    }
}
