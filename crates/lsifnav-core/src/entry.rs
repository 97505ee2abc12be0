//! Typed graph entries.
//!
//! The outer reader splits a dump into `(label, payload)` pairs. This
//! module turns the pairs that matter for range navigation into [`Entry`]
//! values; every other label decodes to `None`.

use crate::error::DecodeError;
use crate::id::Id;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const RANGE: &str = "range";
pub const RESULT_SET: &str = "resultSet";
pub const DEFINITION_RESULT: &str = "definitionResult";
pub const REFERENCE_RESULT: &str = "referenceResult";
pub const DEFINITION_LINK: &str = "textDocument/definition";
pub const REFERENCE_LINK: &str = "textDocument/references";
pub const ITEM: &str = "item";

/// One graph entry relevant to range navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// An occurrence vertex.
    Range { id: Id, line: u32, character: u32 },

    /// A result-set vertex. Carries no payload beyond its id.
    ResultSet { id: Id },

    DefinitionResult { id: Id },

    ReferenceResult { id: Id },

    /// Result set `out_v` points to definition result `in_v`.
    DefinitionLink { out_v: Id, in_v: Id },

    /// Result set `out_v` points to reference result `in_v`.
    ReferenceLink { out_v: Id, in_v: Id },

    /// Ranges `in_vs`, located in `document`, belong to result `out_v`.
    Item {
        out_v: Id,
        in_vs: Vec<Id>,
        document: Id,
    },
}

#[derive(Deserialize)]
struct Position {
    line: u32,
    character: u32,
}

#[derive(Deserialize)]
struct RangeVertex {
    id: Id,
    start: Position,
}

#[derive(Deserialize)]
struct Vertex {
    id: Id,
}

#[derive(Deserialize)]
struct LinkEdge {
    #[serde(rename = "outV")]
    out_v: Id,
    #[serde(rename = "inV")]
    in_v: Id,
}

#[derive(Deserialize)]
struct ItemEdge {
    #[serde(rename = "outV")]
    out_v: Id,
    #[serde(rename = "inVs")]
    in_vs: Vec<Id>,
    document: Id,
}

fn parse<T: DeserializeOwned>(label: &str, payload: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(payload).map_err(|e| DecodeError::json(label, e))
}

impl Entry {
    /// Decodes a payload according to its label.
    ///
    /// Returns `Ok(None)` for labels range navigation does not track.
    pub fn decode(label: &str, payload: &[u8]) -> Result<Option<Self>, DecodeError> {
        let entry = match label {
            RANGE => {
                let v: RangeVertex = parse(label, payload)?;
                Entry::Range {
                    id: v.id,
                    line: v.start.line,
                    character: v.start.character,
                }
            }
            RESULT_SET => Entry::ResultSet {
                id: parse::<Vertex>(label, payload)?.id,
            },
            DEFINITION_RESULT => Entry::DefinitionResult {
                id: parse::<Vertex>(label, payload)?.id,
            },
            REFERENCE_RESULT => Entry::ReferenceResult {
                id: parse::<Vertex>(label, payload)?.id,
            },
            DEFINITION_LINK => {
                let e: LinkEdge = parse(label, payload)?;
                Entry::DefinitionLink {
                    out_v: e.out_v,
                    in_v: e.in_v,
                }
            }
            REFERENCE_LINK => {
                let e: LinkEdge = parse(label, payload)?;
                Entry::ReferenceLink {
                    out_v: e.out_v,
                    in_v: e.in_v,
                }
            }
            ITEM => {
                let e: ItemEdge = parse(label, payload)?;
                Entry::Item {
                    out_v: e.out_v,
                    in_vs: e.in_vs,
                    document: e.document,
                }
            }
            _ => return Ok(None),
        };

        Ok(Some(entry))
    }

    /// The dump label this entry was decoded from.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Range { .. } => RANGE,
            Self::ResultSet { .. } => RESULT_SET,
            Self::DefinitionResult { .. } => DEFINITION_RESULT,
            Self::ReferenceResult { .. } => REFERENCE_RESULT,
            Self::DefinitionLink { .. } => DEFINITION_LINK,
            Self::ReferenceLink { .. } => REFERENCE_LINK,
            Self::Item { .. } => ITEM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_range() {
        let entry = Entry::decode(
            RANGE,
            br#"{"id":"2","label":"range","start":{"line":5,"character":4},"end":{"line":5,"character":9}}"#,
        )
        .unwrap();

        assert_eq!(
            entry,
            Some(Entry::Range {
                id: Id::new(2),
                line: 5,
                character: 4
            })
        );
    }

    #[test]
    fn test_decode_mixed_id_encodings() {
        let entry = Entry::decode(
            ITEM,
            br#"{"id":"12","label":"item","outV":5,"inVs":["2",3],"document":"7"}"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(
            entry,
            Entry::Item {
                out_v: Id::new(5),
                in_vs: vec![Id::new(2), Id::new(3)],
                document: Id::new(7),
            }
        );
        assert_eq!(entry.label(), ITEM);
    }

    #[test]
    fn test_decode_links() {
        let definition = Entry::decode(
            DEFINITION_LINK,
            br#"{"id":8,"label":"textDocument/definition","outV":"4","inV":6}"#,
        )
        .unwrap();
        assert_eq!(
            definition,
            Some(Entry::DefinitionLink {
                out_v: Id::new(4),
                in_v: Id::new(6)
            })
        );

        let references = Entry::decode(
            REFERENCE_LINK,
            br#"{"id":7,"label":"textDocument/references","outV":"4","inV":5}"#,
        )
        .unwrap();
        assert_eq!(
            references,
            Some(Entry::ReferenceLink {
                out_v: Id::new(4),
                in_v: Id::new(5)
            })
        );
    }

    #[test]
    fn test_unknown_label_is_ignored() {
        let entry = Entry::decode("hoverResult", br#"{"id":9,"label":"hoverResult"}"#).unwrap();
        assert!(entry.is_none());
    }

    #[test]
    fn test_malformed_id_fails() {
        let err = Entry::decode(RESULT_SET, br#"{"id":"four","label":"resultSet"}"#).unwrap_err();
        assert!(err.to_string().contains("resultSet"));

        assert!(Entry::decode(RANGE, br#"{"id":-1,"start":{"line":0,"character":0}}"#).is_err());
        assert!(Entry::decode(ITEM, br#"{"outV":5,"inVs":[1]}"#).is_err());
    }
}
