//! Conversion between drawings and their persisted form: a JSON array of
//! flat records tagged by `type`.
//!
//! Decoding never fails. Records with an unknown tag or broken structure are
//! skipped with a warning; a top-level value that is not an array decodes to
//! nothing.
//!
//! A record id may be any JSON string or number. Unsigned integers become the
//! drawing's `DrawingId`; anything else is kept as a `ForeignId` under the
//! placeholder `FOREIGN_PLACEHOLDER_ID` until the store assigns a real one.

use serde::Deserialize;
use serde_json::Value;

use crate::drawing::{Drawing, DrawingId, DrawingKind, ForeignId, Shape};

pub const FOREIGN_PLACEHOLDER_ID: DrawingId = DrawingId::new(0);

pub fn encode(drawings: &[Drawing]) -> Value {
    Value::Array(
        drawings
            .iter()
            .filter_map(|drawing| match serde_json::to_value(drawing) {
                Ok(mut record) => {
                    if let (Some(foreign_id), Some(fields)) =
                        (&drawing.foreign_id, record.as_object_mut())
                    {
                        let id = match foreign_id {
                            ForeignId::Number(number) => Value::Number(number.clone()),
                            ForeignId::Text(text) => Value::String(text.clone()),
                        };
                        fields.insert("id".to_string(), id);
                    }
                    Some(record)
                }
                Err(err) => {
                    tracing::warn!(?err, id = %drawing.id, "failed to encode drawing; skipping");
                    None
                }
            })
            .collect(),
    )
}

pub fn encode_to_string(drawings: &[Drawing]) -> String {
    encode(drawings).to_string()
}

pub fn decode(value: &Value) -> Vec<Drawing> {
    let Some(records) = value.as_array() else {
        tracing::warn!(kind = value_kind(value), "persisted drawings are not an array; ignoring");
        return Vec::new();
    };

    let drawings: Vec<Drawing> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| decode_record(index, record))
        .collect();
    tracing::debug!(
        decoded = drawings.len(),
        skipped = records.len() - drawings.len(),
        "drawings decoded"
    );
    drawings
}

pub fn decode_str(text: &str) -> Vec<Drawing> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => decode(&value),
        Err(err) => {
            tracing::warn!(?err, "persisted drawings are not valid JSON; ignoring");
            Vec::new()
        }
    }
}

fn decode_record(index: usize, record: &Value) -> Option<Drawing> {
    let tag = record.get("type").and_then(Value::as_str);
    if tag.and_then(DrawingKind::from_tag).is_none() {
        tracing::warn!(index, ?tag, "skipping drawing with unknown type");
        return None;
    }

    let (id, foreign_id) = match record.get("id") {
        Some(Value::Number(number)) => match number.as_u64() {
            Some(raw) => (DrawingId::new(raw), None),
            None => (FOREIGN_PLACEHOLDER_ID, Some(ForeignId::Number(number.clone()))),
        },
        Some(Value::String(text)) => (FOREIGN_PLACEHOLDER_ID, Some(ForeignId::Text(text.clone()))),
        other => {
            tracing::warn!(index, ?tag, id = ?other, "skipping drawing without a usable id");
            return None;
        }
    };

    let shape = match Shape::deserialize(record) {
        Ok(shape) => shape,
        Err(err) => {
            tracing::warn!(index, ?tag, %err, "skipping malformed drawing");
            return None;
        }
    };
    if !shape.is_valid() {
        tracing::warn!(index, %id, "skipping drawing with invalid geometry");
        return None;
    }
    let drawing = Drawing::new(id, shape);
    Some(match foreign_id {
        Some(foreign_id) => drawing.with_foreign_id(foreign_id),
        None => drawing,
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
