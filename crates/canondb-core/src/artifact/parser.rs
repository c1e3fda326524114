//! Structural-recognition parser for the two artifact shapes.

use serde_json::{Map, Value};

use super::{
    canonical_identity, canonical_scope, ArtifactEncoding, ParseError, ParsedArtifact,
};

/// Header key declaring the lifecycle epoch.
pub const HEADER_LIFECYCLE_KEY: &str = "LIFECYCLE_ID";
/// Header key declaring the decision kind.
pub const HEADER_KIND_KEY: &str = "DECISION_KIND";
/// Header key holding the embedded scope record.
pub const HEADER_SCOPE_KEY: &str = "DECISION_SCOPE_JSON";
/// Header key holding the embedded identity record.
pub const HEADER_IDENTITY_KEY: &str = "DECISION_IDENTITY_FIELDS_JSON";

const RECORD_KIND_KEY: &str = "artifact_kind";
const RECORD_SCOPE_KEY: &str = "decision_scope";
const RECORD_IDENTITY_KEY: &str = "identity_fields";
const RECORD_LIFECYCLE_KEY: &str = "lifecycle_id";

/// Fallback scope and identity records, typically sourced from the run
/// manifest, merged under an artifact's own declarations.
///
/// Merging never substitutes for the four required scope keys or the four
/// identity fields themselves; after the merge, anything still missing is
/// a hard failure.
#[derive(Debug, Clone, Default)]
pub struct ArtifactDefaults {
    /// Default scope record, used when an artifact omits its scope block.
    pub scope: Option<Map<String, Value>>,
    /// Default identity fields, merged under artifact-declared ones.
    pub identity_fields: Map<String, Value>,
}

/// Parses a raw artifact with no fallback records.
///
/// # Errors
///
/// Returns [`ParseError`] when the shape is unrecognized or required
/// fields are absent or malformed.
pub fn parse(raw: &str) -> Result<ParsedArtifact, ParseError> {
    parse_with_defaults(raw, &ArtifactDefaults::default())
}

/// Parses a raw artifact, filling omitted scope/identity records from
/// `defaults`.
///
/// Dispatch is by structural recognition: a leading `<!-- ... -->` block
/// carrying [`HEADER_LIFECYCLE_KEY`] and [`HEADER_KIND_KEY`] marks a
/// headered text document; a JSON object carrying all four record keys
/// marks a structured record. Anything else is
/// [`ParseError::UnrecognizedShape`].
///
/// # Errors
///
/// Returns [`ParseError`] when required fields are absent or malformed.
pub fn parse_with_defaults(
    raw: &str,
    defaults: &ArtifactDefaults,
) -> Result<ParsedArtifact, ParseError> {
    if let Some(header) = extract_header_block(raw) {
        if header.iter().any(|(k, _)| k == HEADER_LIFECYCLE_KEY)
            && header.iter().any(|(k, _)| k == HEADER_KIND_KEY)
        {
            return parse_headered(&header, defaults);
        }
    }

    if let Ok(Value::Object(record)) = serde_json::from_str::<Value>(raw) {
        let self_describing = record.contains_key(RECORD_KIND_KEY)
            && record.contains_key(RECORD_SCOPE_KEY)
            && record.contains_key(RECORD_IDENTITY_KEY)
            && record.contains_key(RECORD_LIFECYCLE_KEY);
        if self_describing {
            return parse_structured(&record, defaults);
        }
    }

    Err(ParseError::UnrecognizedShape)
}

/// Extracts `KEY: value` pairs from a leading HTML-comment block, if one
/// is present.
fn extract_header_block(raw: &str) -> Option<Vec<(String, String)>> {
    if !raw.trim_start().starts_with("<!--") {
        return None;
    }
    let start = raw.find("<!--")?;
    let end = raw[start + 4..].find("-->")? + start + 4;

    let mut pairs = Vec::new();
    for line in raw[start + 4..end].lines() {
        let line = line.trim();
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        pairs.push((key.trim().to_string(), value.trim().to_string()));
    }
    Some(pairs)
}

fn header_value<'a>(header: &'a [(String, String)], key: &str) -> Option<&'a str> {
    header
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn parse_headered(
    header: &[(String, String)],
    defaults: &ArtifactDefaults,
) -> Result<ParsedArtifact, ParseError> {
    let lifecycle_id = header_value(header, HEADER_LIFECYCLE_KEY)
        .ok_or_else(|| ParseError::MissingHeaderKey {
            key: HEADER_LIFECYCLE_KEY.to_string(),
        })?
        .to_string();
    let kind = header_value(header, HEADER_KIND_KEY)
        .ok_or_else(|| ParseError::MissingHeaderKey {
            key: HEADER_KIND_KEY.to_string(),
        })?
        .to_string();

    let raw_scope = match header_value(header, HEADER_SCOPE_KEY) {
        Some(embedded) => embedded_object(HEADER_SCOPE_KEY, embedded)?,
        None => defaults.scope.clone().unwrap_or_default(),
    };
    let raw_identity = match header_value(header, HEADER_IDENTITY_KEY) {
        Some(embedded) => merge_defaults(
            &defaults.identity_fields,
            embedded_object(HEADER_IDENTITY_KEY, embedded)?,
        ),
        None => defaults.identity_fields.clone(),
    };

    Ok(ParsedArtifact {
        kind,
        scope: canonical_scope(&raw_scope, &lifecycle_id)?,
        identity_fields: canonical_identity(&raw_identity)?,
        lifecycle_id,
        encoding: ArtifactEncoding::HeaderedText,
    })
}

fn parse_structured(
    record: &Map<String, Value>,
    defaults: &ArtifactDefaults,
) -> Result<ParsedArtifact, ParseError> {
    let kind = record
        .get(RECORD_KIND_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| ParseError::MissingRecordKey {
            key: RECORD_KIND_KEY.to_string(),
        })?
        .to_string();
    let lifecycle_id = record
        .get(RECORD_LIFECYCLE_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| ParseError::MissingRecordKey {
            key: RECORD_LIFECYCLE_KEY.to_string(),
        })?
        .to_string();

    let raw_scope = match record.get(RECORD_SCOPE_KEY) {
        Some(Value::Object(scope)) => scope.clone(),
        Some(_) => {
            return Err(ParseError::NotAnObject {
                field: RECORD_SCOPE_KEY.to_string(),
            })
        },
        None => defaults.scope.clone().unwrap_or_default(),
    };
    let raw_identity = match record.get(RECORD_IDENTITY_KEY) {
        Some(Value::Object(identity)) => merge_defaults(&defaults.identity_fields, identity.clone()),
        Some(_) => {
            return Err(ParseError::NotAnObject {
                field: RECORD_IDENTITY_KEY.to_string(),
            })
        },
        None => defaults.identity_fields.clone(),
    };

    Ok(ParsedArtifact {
        kind,
        scope: canonical_scope(&raw_scope, &lifecycle_id)?,
        identity_fields: canonical_identity(&raw_identity)?,
        lifecycle_id,
        encoding: ArtifactEncoding::StructuredRecord,
    })
}

fn embedded_object(key: &str, embedded: &str) -> Result<Map<String, Value>, ParseError> {
    match serde_json::from_str::<Value>(embedded) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ParseError::NotAnObject {
            field: key.to_string(),
        }),
        Err(e) => Err(ParseError::MalformedEmbeddedJson {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

/// Layers artifact-declared fields over default fields.
fn merge_defaults(
    defaults: &Map<String, Value>,
    declared: Map<String, Value>,
) -> Map<String, Value> {
    let mut merged = defaults.clone();
    for (key, value) in declared {
        merged.insert(key, value);
    }
    merged
}
