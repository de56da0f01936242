//! Document codec
//!
//! Encodes a FAQ document as pretty-printed JSON with a fixed field order and
//! decodes it back with full validation. Encoding is deterministic, so an
//! unmodified document always produces byte-identical output.
//!
//! On-disk shape:
//!
//! ```json
//! {
//!   "environment": "stunting",
//!   "faqs": [
//!     { "id": "…", "questions": ["…"], "answer": "…", "category": "…", "links": … }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::models::{Environment, FaqDocument, FaqEntry, FaqId};

#[derive(Serialize)]
struct WireDocumentRef<'a> {
    environment: &'a Environment,
    faqs: &'a [FaqEntry],
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WireDocument {
    environment: Environment,
    faqs: Vec<WireEntry>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WireEntry {
    #[serde(default)]
    id: Option<WireId>,
    #[serde(default)]
    questions: Option<Vec<String>>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    links: Option<serde_json::Value>,
}

/// Ids written by older tooling are bare numbers
#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(serde_json::Number),
}

impl WireId {
    fn into_id(self) -> FaqId {
        match self {
            WireId::Text(s) => FaqId::from_string(s),
            WireId::Number(n) => FaqId::from_string(n.to_string()),
        }
    }
}

/// Serialize a document to its file representation
pub fn encode(document: &FaqDocument) -> Vec<u8> {
    let wire = WireDocumentRef {
        environment: &document.environment,
        faqs: &document.entries,
    };
    // Plain structs, strings and JSON values cannot fail to serialize.
    let mut bytes = serde_json::to_vec_pretty(&wire).unwrap_or_default();
    bytes.push(b'\n');
    bytes
}

/// Parse and validate a document from its file representation
pub fn decode(bytes: &[u8]) -> Result<FaqDocument, DecodeError> {
    let wire: WireDocument =
        serde_json::from_slice(bytes).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let mut entries = Vec::with_capacity(wire.faqs.len());
    for (index, raw) in wire.faqs.into_iter().enumerate() {
        let id = raw.id.ok_or_else(|| {
            DecodeError::SchemaViolation(format!("entry {}: missing id", index + 1))
        })?;
        let questions = raw.questions.ok_or_else(|| {
            DecodeError::SchemaViolation(format!("entry {}: missing questions", index + 1))
        })?;
        let answer = raw.answer.ok_or_else(|| {
            DecodeError::SchemaViolation(format!("entry {}: missing answer", index + 1))
        })?;

        entries.push(FaqEntry {
            id: id.into_id(),
            questions,
            answer,
            category: raw.category,
            links: raw.links,
        });
    }

    let document = FaqDocument {
        environment: wire.environment,
        entries,
    };

    document
        .validate()
        .map_err(|e| DecodeError::SchemaViolation(e.to_string()))?;

    Ok(document)
}
