use serde_json::{Map, Value};

use crate::error::PerimeterError;

use super::spec::{FieldShape, ProjectionSpec};

/// Build a nested wire document from a flat map, the inverse of
/// [`extract`](super::extract).
///
/// Only fields named by `spec` are written. Null and missing flat entries are
/// skipped rather than written as wire nulls; materializing nulls is the
/// extract side's job. `SingletonList` fields must carry exactly one element,
/// which is unwrapped back to the bare object the wire expects.
pub fn inject(flat: &Map<String, Value>, spec: &ProjectionSpec) -> Result<Value, PerimeterError> {
    let mut document = Map::new();

    for field in spec.fields {
        let Some(value) = flat.get(field.name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }

        let wire = match field.shape {
            FieldShape::Scalar => value.clone(),
            FieldShape::SingletonList => match value {
                Value::Array(items) if items.len() == 1 => items[0].clone(),
                Value::Array(items) => {
                    return Err(PerimeterError::SingletonCardinality {
                        path: field.name.to_string(),
                        len: items.len(),
                    });
                }
                _ => {
                    return Err(PerimeterError::MalformedWire {
                        path: field.name.to_string(),
                        reason: "expected a single-element list".to_string(),
                    });
                }
            },
        };

        document.insert(field.name.to_string(), wire);
    }

    log::debug!("injected {} fields into wire form", document.len());
    Ok(Value::Object(document))
}
