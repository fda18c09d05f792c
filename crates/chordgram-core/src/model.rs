use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Wire shape of a chord diagram: a square adjacency matrix plus one label per row.
///
/// `matrix[i][j]` is the flow weight from entity `i` to entity `j`, and `names[i]` labels
/// entity `i`. Nothing ties the two sequences together except their position, so consumers
/// should go through [`ChordData::validate`] or [`EntityTable::from_data`] before rendering.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChordData {
    pub matrix: Vec<Vec<f64>>,
    pub names: Vec<String>,
}

impl ChordData {
    pub fn new(matrix: Vec<Vec<f64>>, names: Vec<String>) -> Self {
        Self { matrix, names }
    }

    /// The four-entity dataset the diagram was originally prototyped with.
    pub fn sample() -> Self {
        Self {
            names: ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect(),
            matrix: vec![
                vec![11975.0, 5871.0, 8916.0, 2868.0],
                vec![1951.0, 10048.0, 2060.0, 6171.0],
                vec![8010.0, 16145.0, 8090.0, 8045.0],
                vec![1013.0, 990.0, 940.0, 6907.0],
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    /// Checks that the matrix is square, that there is one name per row and that every weight
    /// is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        validate_rows(self.matrix.iter().map(Vec::as_slice), self.matrix.len())?;
        if self.names.len() != self.matrix.len() {
            return Err(Error::NameCountMismatch {
                names: self.names.len(),
                rows: self.matrix.len(),
            });
        }
        Ok(())
    }
}

fn validate_rows<'a>(rows: impl Iterator<Item = &'a [f64]>, n: usize) -> Result<()> {
    for (row, weights) in rows.enumerate() {
        if weights.len() != n {
            return Err(Error::NotSquare {
                row,
                expected: n,
                actual: weights.len(),
            });
        }
        if let Some((column, &value)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !(w.is_finite() && **w >= 0.0))
        {
            return Err(Error::InvalidWeight { row, column, value });
        }
    }
    Ok(())
}

/// One labelled row of the adjacency matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    /// Outgoing weights, indexed by target entity.
    #[serde(alias = "outgoingWeights")]
    pub weights: Vec<f64>,
}

impl Entity {
    pub fn new(name: impl Into<String>, weights: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            weights,
        }
    }

    pub fn outgoing_total(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Validated, name-carrying form of [`ChordData`].
///
/// Every entity holds exactly `len()` non-negative finite weights, so index `i` always refers
/// to the same entity in both the label and the weight view.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EntityTable {
    entities: Vec<Entity>,
}

impl EntityTable {
    pub fn new(entities: Vec<Entity>) -> Result<Self> {
        validate_rows(entities.iter().map(|e| e.weights.as_slice()), entities.len())?;
        Ok(Self { entities })
    }

    pub fn from_data(data: ChordData) -> Result<Self> {
        data.validate()?;
        let ChordData { matrix, names } = data;
        let entities = names
            .into_iter()
            .zip(matrix)
            .map(|(name, weights)| Entity { name, weights })
            .collect();
        Ok(Self { entities })
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.entities.get(index).map(|e| e.name.as_str())
    }

    pub fn names(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn weight(&self, source: usize, target: usize) -> Option<f64> {
        self.entities.get(source)?.weights.get(target).copied()
    }

    pub fn matrix(&self) -> Vec<Vec<f64>> {
        self.entities.iter().map(|e| e.weights.clone()).collect()
    }

    pub fn incoming_total(&self, index: usize) -> f64 {
        self.entities
            .iter()
            .filter_map(|e| e.weights.get(index))
            .sum()
    }

    /// Sum of every weight in the table.
    pub fn total(&self) -> f64 {
        self.entities.iter().map(Entity::outgoing_total).sum()
    }

    pub fn into_data(self) -> ChordData {
        let (names, matrix) = self
            .entities
            .into_iter()
            .map(|e| (e.name, e.weights))
            .unzip();
        ChordData { matrix, names }
    }
}

impl TryFrom<ChordData> for EntityTable {
    type Error = Error;

    fn try_from(value: ChordData) -> Result<Self> {
        Self::from_data(value)
    }
}

impl From<EntityTable> for ChordData {
    fn from(value: EntityTable) -> Self {
        value.into_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_valid() {
        let data = ChordData::sample();
        data.validate().unwrap();
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn ragged_matrix_is_rejected() {
        let data = ChordData::new(
            vec![vec![1.0, 2.0], vec![3.0]],
            vec!["a".to_string(), "b".to_string()],
        );
        let err = data.validate().unwrap_err();
        assert!(matches!(
            err,
            Error::NotSquare {
                row: 1,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn name_count_mismatch_is_rejected() {
        let data = ChordData::new(vec![vec![1.0]], vec![]);
        assert!(matches!(
            data.validate().unwrap_err(),
            Error::NameCountMismatch { names: 0, rows: 1 }
        ));
    }

    #[test]
    fn negative_and_nan_weights_are_rejected() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let data = ChordData::new(
                vec![vec![0.0, 1.0], vec![bad, 0.0]],
                vec!["a".to_string(), "b".to_string()],
            );
            match data.validate().unwrap_err() {
                Error::InvalidWeight { row, column, .. } => assert_eq!((row, column), (1, 0)),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn entity_table_keeps_rows_and_names_paired() {
        let table = EntityTable::from_data(ChordData::sample()).unwrap();
        assert_eq!(table.names(), vec!["A", "B", "C", "D"]);
        assert_eq!(table.weight(2, 1), Some(16145.0));
        assert_eq!(table.entities()[3].outgoing_total(), 1013.0 + 990.0 + 940.0 + 6907.0);
        assert_eq!(table.incoming_total(0), 11975.0 + 1951.0 + 8010.0 + 1013.0);
        assert_eq!(table.clone().into_data(), ChordData::sample());
    }

    #[test]
    fn empty_table_is_valid() {
        let table = EntityTable::new(Vec::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.total(), 0.0);
    }
}
