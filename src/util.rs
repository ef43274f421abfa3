use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Shallow-merge `updates` over `entity`: every top-level key of `updates`
/// replaces the entity's key, untouched keys keep their values. Nested
/// objects are replaced wholesale, not merged.
///
/// Fails when the merged object no longer deserialises as `T`, e.g. an
/// unknown enum value or a `null` in a required field.
pub fn merge_fields<T>(entity: &T, updates: &Value) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = serde_json::to_value(entity)?;
    if let (Value::Object(target), Value::Object(fields)) = (&mut merged, updates) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
    serde_json::from_value(merged)
}

/// Like [`merge_fields`] but keeps `id` pinned to `id`, whatever the update says.
pub fn merge_fields_keep_id<T>(entity: &T, updates: &Value, id: &str) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    let mut updates = updates.clone();
    if let Value::Object(fields) = &mut updates {
        fields.insert("id".to_string(), Value::String(id.to_string()));
    }
    merge_fields(entity, &updates)
}
