use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// File-level information: format version, meta-information and sample names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Source {
    version: String,
    meta: Vec<MetaEntry>,
    samples: Vec<String>,
}

impl Source {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_version(&mut self, version: String) {
        self.version = version;
    }

    pub fn meta(&self) -> &[MetaEntry] {
        &self.meta
    }

    pub fn add_meta(&mut self, entry: MetaEntry) {
        self.meta.push(entry);
    }

    /// Sample names in header order. The order gives the meaning of each
    /// sample column of every record.
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn set_samples(&mut self, samples: Vec<String>) {
        self.samples = samples;
    }
}

/// One meta-information line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum MetaEntry {
    /// `##value`
    Plain { value: String },
    /// `##ID=value`
    KeyValue { id: String, value: String },
    /// `##ID=<key=value,...>`, fields in declaration order.
    Structured {
        id: String,
        fields: Vec<(String, String)>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{n_tokens} tokens (type-id present: {has_type_id}) do not form a meta-information entry")]
pub struct MetaShapeError {
    pub has_type_id: bool,
    pub n_tokens: usize,
}

impl MetaEntry {
    /// Picks the entry shape from the line's type-id and the tokens that
    /// follow it.
    pub fn from_tokens(
        type_id: Option<String>,
        mut tokens: Vec<String>,
    ) -> Result<MetaEntry, MetaShapeError> {
        let n_tokens = tokens.len();
        match type_id {
            None if n_tokens == 1 => Ok(MetaEntry::Plain {
                value: tokens.remove(0),
            }),
            Some(id) if n_tokens == 1 => Ok(MetaEntry::KeyValue {
                id,
                value: tokens.remove(0),
            }),
            Some(id) if n_tokens >= 2 && n_tokens % 2 == 0 => {
                let mut fields = Vec::with_capacity(n_tokens / 2);
                let mut tokens = tokens.into_iter();
                while let (Some(key), Some(value)) = (tokens.next(), tokens.next()) {
                    fields.push((key, value));
                }
                Ok(MetaEntry::Structured { id, fields })
            }
            type_id => Err(MetaShapeError {
                has_type_id: type_id.is_some(),
                n_tokens,
            }),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            MetaEntry::Plain { .. } => None,
            MetaEntry::KeyValue { id, .. } | MetaEntry::Structured { id, .. } => Some(id),
        }
    }

    /// Looks up a field of a structured entry.
    pub fn field(&self, key: &str) -> Option<&str> {
        match self {
            MetaEntry::Structured { fields, .. } => fields
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}

/// One data line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub chromosome: String,
    /// 1-based.
    pub position: u64,
    pub ids: Vec<String>,
    pub reference: String,
    pub alternates: Vec<String>,
    /// 0.0 when the QUAL column is not a number.
    pub quality: f64,
    pub filters: Vec<String>,
    /// Flags (keys without `=`) map to `None`.
    pub info: BTreeMap<String, Option<String>>,
    pub format: Vec<String>,
    /// Raw sample columns, in header order.
    pub samples: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|&t| String::from(t)).collect()
    }

    #[test]
    fn test_plain_entry() {
        let entry = MetaEntry::from_tokens(None, strings(&["free text"])).unwrap();
        assert_eq!(
            entry,
            MetaEntry::Plain {
                value: String::from("free text")
            }
        );
        assert_eq!(entry.id(), None);
    }

    #[test]
    fn test_key_value_entry() {
        let entry =
            MetaEntry::from_tokens(Some(String::from("fileDate")), strings(&["20090805"])).unwrap();
        assert_eq!(
            entry,
            MetaEntry::KeyValue {
                id: String::from("fileDate"),
                value: String::from("20090805"),
            }
        );
        assert_eq!(entry.id(), Some("fileDate"));
    }

    #[test]
    fn test_structured_entry() {
        let entry = MetaEntry::from_tokens(
            Some(String::from("INFO")),
            strings(&["ID", "DP", "Number", "1", "Type", "Integer"]),
        )
        .unwrap();
        assert_eq!(
            entry,
            MetaEntry::Structured {
                id: String::from("INFO"),
                fields: vec![
                    (String::from("ID"), String::from("DP")),
                    (String::from("Number"), String::from("1")),
                    (String::from("Type"), String::from("Integer")),
                ],
            }
        );
        assert_eq!(entry.field("Type"), Some("Integer"));
        assert_eq!(entry.field("Description"), None);
    }

    #[test]
    fn test_bad_shapes() {
        assert_eq!(
            MetaEntry::from_tokens(Some(String::from("INFO")), strings(&["ID", "DP", "Number"])),
            Err(MetaShapeError {
                has_type_id: true,
                n_tokens: 3
            })
        );
        assert_eq!(
            MetaEntry::from_tokens(Some(String::from("INFO")), vec![]),
            Err(MetaShapeError {
                has_type_id: true,
                n_tokens: 0
            })
        );
        assert_eq!(
            MetaEntry::from_tokens(None, strings(&["a", "b"])),
            Err(MetaShapeError {
                has_type_id: false,
                n_tokens: 2
            })
        );
    }

    #[test]
    fn test_source_setters() {
        let mut source = Source::new();
        source.set_version(String::from("VCFv4.2"));
        source.set_samples(strings(&["S1", "S2"]));
        source.add_meta(MetaEntry::Plain {
            value: String::from("x"),
        });
        assert_eq!(source.version(), "VCFv4.2");
        assert_eq!(source.samples(), &["S1", "S2"]);
        assert_eq!(source.meta().len(), 1);
    }
}
