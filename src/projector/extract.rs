use serde_json::{Map, Value};

use super::spec::{FieldShape, ProjectionSpec};

/// Project an allow-listed set of fields out of a wire document into a flat
/// map.
///
/// Every field named by `spec` appears in the output: present non-null values
/// are copied verbatim, while missing or null keys produce an explicit
/// `Value::Null` entry. Downstream consumers rely on the difference between
/// "key absent from the allow-list" and "key present but null", so absent
/// keys are never silently omitted.
///
/// `SingletonList` fields are wrapped into a one-element array on the way
/// out; the wire carries them as bare objects.
///
/// # Examples
/// ```
/// use serde_json::{Value, json};
/// use perimeter::projector::{FieldSpec, ProjectionSpec, extract};
///
/// static SPEC: ProjectionSpec = ProjectionSpec::new(&[FieldSpec::scalar("description")]);
///
/// let flat = extract(&json!({"name": "web"}), &SPEC);
/// assert_eq!(flat["description"], Value::Null);
/// ```
pub fn extract(document: &Value, spec: &ProjectionSpec) -> Map<String, Value> {
    let object = document.as_object();
    let mut flat = Map::new();

    for field in spec.fields {
        let value = object
            .and_then(|o| o.get(field.name))
            .cloned()
            .unwrap_or(Value::Null);

        let value = match field.shape {
            FieldShape::Scalar => value,
            FieldShape::SingletonList => match value {
                Value::Null => Value::Null,
                present => Value::Array(vec![present]),
            },
        };

        flat.insert(field.name.to_string(), value);
    }

    log::debug!("extracted {} fields into flat form", flat.len());
    flat
}
