//! Provenance record types: fact-id projections and restored output rows

use crate::compose::Role;
use crate::graph::{Fact, FactId};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Role -> fact id projection of one path; the deduplication key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FactTuple(pub(crate) Vec<(Role, FactId)>);

impl FactTuple {
    pub fn roles(&self) -> &[(Role, FactId)] {
        &self.0
    }

    /// Fact id for a role, if the shape has it
    pub fn get(&self, role: Role) -> Option<FactId> {
        self.0.iter().find(|(r, _)| *r == role).map(|(_, id)| *id)
    }
}

/// One output row: each role mapped to the corpus record it came from
///
/// Serializes as a JSON object keyed by role column (`question_head`, ...),
/// in role order.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredRecord<'c> {
    pub(crate) fields: Vec<(Role, &'c Value)>,
}

impl<'c> RestoredRecord<'c> {
    pub fn get(&self, role: Role) -> Option<&'c Value> {
        self.fields.iter().find(|(r, _)| *r == role).map(|(_, v)| *v)
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.fields.iter().map(|(role, _)| *role)
    }
}

impl Serialize for RestoredRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (role, record) in &self.fields {
            map.serialize_entry(role.column(), record)?;
        }
        map.end()
    }
}

/// One pre-restoration row for debug dumps: role label -> fact record
///
/// A role holding more than one row repeats with a numbered label: `mid`,
/// `mid_2`, `mid_3`.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugRow<'t> {
    pub(crate) fields: Vec<(Role, &'t Fact)>,
}

impl DebugRow<'_> {
    /// Field labels in serialization order
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::with_capacity(self.fields.len());
        for (i, (role, _)) in self.fields.iter().enumerate() {
            let seen = self.fields[..i].iter().filter(|(r, _)| r == role).count();
            labels.push(match seen {
                0 => role.label().to_string(),
                n => format!("{}_{}", role.label(), n + 1),
            });
        }
        labels
    }
}

impl Serialize for DebugRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (label, (_, fact)) in self.labels().iter().zip(&self.fields) {
            map.serialize_entry(label, fact)?;
        }
        map.end()
    }
}
