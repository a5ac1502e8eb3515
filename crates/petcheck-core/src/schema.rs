//! Structural schema validation for JSON response bodies
//!
//! A [`Schema`] names required/optional fields and their primitive types.
//! Validation walks the value in declaration order and stops at the first
//! mismatch. No coercion: `"1"` is not an integer and neither is `1.0`.

use serde_json::{Map, Value, json};

/// Primitive kind of a JSON value, used in violation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl std::fmt::Display for JsonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named property of an object schema
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub schema: Schema,
    pub required: bool,
}

/// Structural description of a JSON value
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Any,
    Boolean,
    Integer,
    /// Integer or floating point
    Number,
    String,
    Array(Box<Schema>),
    /// Object with arbitrary keys, every value matching the inner schema
    Map(Box<Schema>),
    Object(Vec<Field>),
}

impl Schema {
    /// Empty object schema; add fields with [`Schema::required`] / [`Schema::optional`].
    #[must_use]
    pub fn object() -> Self {
        Self::Object(Vec::new())
    }

    #[must_use]
    pub fn array_of(items: Self) -> Self {
        Self::Array(Box::new(items))
    }

    #[must_use]
    pub fn map_of(values: Self) -> Self {
        Self::Map(Box::new(values))
    }

    #[must_use]
    pub fn required(self, name: &'static str, schema: Self) -> Self {
        self.with_field(name, schema, true)
    }

    #[must_use]
    pub fn optional(self, name: &'static str, schema: Self) -> Self {
        self.with_field(name, schema, false)
    }

    fn with_field(self, name: &'static str, schema: Self, required: bool) -> Self {
        match self {
            Self::Object(mut fields) => {
                fields.push(Field {
                    name,
                    schema,
                    required,
                });
                Self::Object(fields)
            }
            // Fields only make sense on objects; other schemas are left untouched.
            other => other,
        }
    }

    /// Validate `value`, returning the first violation found.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaViolation`] naming the offending field path.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        self.validate_at(value, &FieldPath::root())
    }

    fn validate_at(&self, value: &Value, path: &FieldPath) -> Result<(), SchemaViolation> {
        let found = JsonKind::of(value);
        match self {
            Self::Any => Ok(()),
            Self::Boolean => expect_kind(found, JsonKind::Boolean, path),
            Self::Integer => expect_kind(found, JsonKind::Integer, path),
            Self::Number => match found {
                JsonKind::Integer | JsonKind::Number => Ok(()),
                _ => Err(SchemaViolation::mismatch(path, "number", found)),
            },
            Self::String => expect_kind(found, JsonKind::String, path),
            Self::Array(items) => {
                let Value::Array(elements) = value else {
                    return Err(SchemaViolation::mismatch(path, "array", found));
                };
                for (index, element) in elements.iter().enumerate() {
                    items.validate_at(element, &path.index(index))?;
                }
                Ok(())
            }
            Self::Map(values) => {
                let Value::Object(entries) = value else {
                    return Err(SchemaViolation::mismatch(path, "object", found));
                };
                for (key, entry) in entries {
                    values.validate_at(entry, &path.field(key))?;
                }
                Ok(())
            }
            Self::Object(fields) => {
                let Value::Object(entries) = value else {
                    return Err(SchemaViolation::mismatch(path, "object", found));
                };
                validate_fields(fields, entries, path)
            }
        }
    }

    /// Equivalent JSON Schema (draft 2020-12 subset) document.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        match self {
            Self::Any => json!({}),
            Self::Boolean => json!({"type": "boolean"}),
            Self::Integer => json!({"type": "integer"}),
            Self::Number => json!({"type": "number"}),
            Self::String => json!({"type": "string"}),
            Self::Array(items) => json!({"type": "array", "items": items.to_json_schema()}),
            Self::Map(values) => json!({
                "type": "object",
                "additionalProperties": values.to_json_schema()
            }),
            Self::Object(fields) => {
                let properties: Map<String, Value> = fields
                    .iter()
                    .map(|f| (f.name.to_string(), f.schema.to_json_schema()))
                    .collect();
                let required: Vec<&str> = fields
                    .iter()
                    .filter(|f| f.required)
                    .map(|f| f.name)
                    .collect();
                json!({
                    "type": "object",
                    "properties": properties,
                    "required": required
                })
            }
        }
    }
}

fn expect_kind(found: JsonKind, expected: JsonKind, path: &FieldPath) -> Result<(), SchemaViolation> {
    if found == expected {
        Ok(())
    } else {
        Err(SchemaViolation::mismatch(path, expected.as_str(), found))
    }
}

fn validate_fields(
    fields: &[Field],
    entries: &Map<String, Value>,
    path: &FieldPath,
) -> Result<(), SchemaViolation> {
    for field in fields {
        let field_path = path.field(field.name);
        match entries.get(field.name) {
            Some(value) => field.schema.validate_at(value, &field_path)?,
            None if field.required => {
                return Err(SchemaViolation {
                    path: field_path.to_string(),
                    kind: ViolationKind::MissingField,
                });
            }
            None => {}
        }
    }
    Ok(())
}

/// Dotted path into a JSON document: `$`, `category.id`, `tags[0].name`.
#[derive(Debug, Clone)]
struct FieldPath(String);

impl FieldPath {
    fn root() -> Self {
        Self(String::new())
    }

    fn field(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{}.{name}", self.0))
        }
    }

    fn index(&self, index: usize) -> Self {
        if self.0.is_empty() {
            Self(format!("$[{index}]"))
        } else {
            Self(format!("{}[{index}]", self.0))
        }
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            f.write_str("$")
        } else {
            f.write_str(&self.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    MissingField,
    TypeMismatch {
        expected: &'static str,
        found: JsonKind,
    },
}

/// First mismatch between a value and its schema
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("schema violation at `{path}`: {}", describe(.kind))]
pub struct SchemaViolation {
    pub path: String,
    pub kind: ViolationKind,
}

impl SchemaViolation {
    fn mismatch(path: &FieldPath, expected: &'static str, found: JsonKind) -> Self {
        Self {
            path: path.to_string(),
            kind: ViolationKind::TypeMismatch { expected, found },
        }
    }
}

fn describe(kind: &ViolationKind) -> String {
    match kind {
        ViolationKind::MissingField => "required field is missing".to_string(),
        ViolationKind::TypeMismatch { expected, found } => {
            format!("expected {expected}, found {found}")
        }
    }
}

fn category_schema() -> Schema {
    Schema::object()
        .required("id", Schema::Integer)
        .required("name", Schema::String)
}

/// Pet body as returned by create, read and update.
#[must_use]
pub fn pet_schema() -> Schema {
    Schema::object()
        .required("id", Schema::Integer)
        .required("name", Schema::String)
        .required("category", category_schema())
        .required("status", Schema::String)
        .optional("photoUrls", Schema::array_of(Schema::String))
        .optional("tags", Schema::array_of(category_schema()))
}

/// Body of `findByStatus`. Entries are only checked for an integer id: the
/// shared server holds records created by other clients.
#[must_use]
pub fn pet_list_schema() -> Schema {
    Schema::array_of(Schema::object().required("id", Schema::Integer))
}

#[must_use]
pub fn user_schema() -> Schema {
    Schema::object()
        .required("id", Schema::Integer)
        .required("username", Schema::String)
        .optional("firstName", Schema::String)
        .optional("lastName", Schema::String)
        .optional("email", Schema::String)
        .optional("password", Schema::String)
        .optional("phone", Schema::String)
        .optional("userStatus", Schema::Integer)
}

#[must_use]
pub fn order_schema() -> Schema {
    Schema::object()
        .required("id", Schema::Integer)
        .required("petId", Schema::Integer)
        .required("quantity", Schema::Integer)
        .required("status", Schema::String)
        .optional("shipDate", Schema::String)
        .optional("complete", Schema::Boolean)
}

/// Status name → count.
#[must_use]
pub fn inventory_schema() -> Schema {
    Schema::map_of(Schema::Integer)
}

#[must_use]
pub fn api_response_schema() -> Schema {
    Schema::object()
        .required("code", Schema::Integer)
        .required("type", Schema::String)
        .required("message", Schema::String)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pet() -> Value {
        json!({"id": 1, "name": "x", "category": {"id": 1, "name": "y"}, "status": "available"})
    }

    #[test]
    fn valid_pet_passes() {
        assert_eq!(pet_schema().validate(&sample_pet()), Ok(()));
    }

    #[test]
    fn string_id_is_rejected() {
        let mut pet = sample_pet();
        pet["id"] = json!("1");
        let err = pet_schema().validate(&pet).unwrap_err();
        assert_eq!(err.path, "id");
        assert_eq!(
            err.kind,
            ViolationKind::TypeMismatch {
                expected: "integer",
                found: JsonKind::String
            }
        );
        assert!(err.to_string().contains("`id`"));
    }

    #[test]
    fn float_is_not_integer() {
        let mut pet = sample_pet();
        pet["id"] = json!(1.0);
        let err = pet_schema().validate(&pet).unwrap_err();
        assert_eq!(
            err.kind,
            ViolationKind::TypeMismatch {
                expected: "integer",
                found: JsonKind::Number
            }
        );
    }

    #[test]
    fn nested_field_path() {
        let mut pet = sample_pet();
        pet["category"]["name"] = json!(5);
        let err = pet_schema().validate(&pet).unwrap_err();
        assert_eq!(err.path, "category.name");
    }

    #[test]
    fn missing_required_field() {
        let mut pet = sample_pet();
        pet.as_object_mut().unwrap().remove("status");
        let err = pet_schema().validate(&pet).unwrap_err();
        assert_eq!(err.path, "status");
        assert_eq!(err.kind, ViolationKind::MissingField);
        assert_eq!(
            err.to_string(),
            "schema violation at `status`: required field is missing"
        );
    }

    #[test]
    fn first_violation_in_declaration_order() {
        let body = json!({"id": "x", "name": 3, "category": {}, "status": "sold"});
        let err = pet_schema().validate(&body).unwrap_err();
        assert_eq!(err.path, "id");
    }

    #[test]
    fn optional_fields_checked_when_present() {
        let mut pet = sample_pet();
        pet["tags"] = json!([{"id": 1, "name": "ok"}, {"id": "2", "name": "bad"}]);
        let err = pet_schema().validate(&pet).unwrap_err();
        assert_eq!(err.path, "tags[1].id");
    }

    #[test]
    fn root_type_mismatch() {
        let err = pet_schema().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(err.path, "$");
        assert_eq!(
            err.kind,
            ViolationKind::TypeMismatch {
                expected: "object",
                found: JsonKind::Array
            }
        );
    }

    #[test]
    fn array_root_index_path() {
        let err = pet_list_schema()
            .validate(&json!([{"id": 1}, {"id": null}]))
            .unwrap_err();
        assert_eq!(err.path, "$[1].id");
    }

    #[test]
    fn inventory_map_values() {
        assert!(
            inventory_schema()
                .validate(&json!({"available": 3, "sold": 1}))
                .is_ok()
        );
        let err = inventory_schema()
            .validate(&json!({"available": "3"}))
            .unwrap_err();
        assert_eq!(err.path, "available");
    }

    #[test]
    fn number_accepts_integers() {
        assert!(Schema::Number.validate(&json!(3)).is_ok());
        assert!(Schema::Number.validate(&json!(3.5)).is_ok());
        assert!(Schema::Number.validate(&json!("3")).is_err());
    }

    #[test]
    fn fields_on_scalar_schema_are_ignored() {
        assert_eq!(Schema::String.required("id", Schema::Integer), Schema::String);
    }

    #[test]
    fn json_schema_export_shape() {
        let exported = pet_schema().to_json_schema();
        assert_eq!(exported["type"], "object");
        assert_eq!(exported["properties"]["id"]["type"], "integer");
        assert_eq!(
            exported["required"],
            json!(["id", "name", "category", "status"])
        );
        assert_eq!(
            exported["properties"]["category"]["required"],
            json!(["id", "name"])
        );
    }

    #[test]
    fn exported_schema_agrees_with_jsonschema() {
        let validator = jsonschema::validator_for(&pet_schema().to_json_schema()).unwrap();
        assert_eq!(validator.iter_errors(&sample_pet()).count(), 0);

        let mut bad = sample_pet();
        bad["id"] = json!("1");
        assert!(validator.iter_errors(&bad).next().is_some());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_integer_id_is_valid(id in any::<i64>(), cat in any::<i64>()) {
                let body = json!({"id": id, "name": "p", "category": {"id": cat, "name": "c"}, "status": "sold"});
                prop_assert!(pet_schema().validate(&body).is_ok());
            }

            #[test]
            fn stringified_ids_never_coerce(id in any::<i64>()) {
                let body = json!({"id": id.to_string(), "name": "p", "category": {"id": 1, "name": "c"}, "status": "sold"});
                let err = pet_schema().validate(&body).unwrap_err();
                prop_assert_eq!(err.path, "id");
            }
        }
    }
}
