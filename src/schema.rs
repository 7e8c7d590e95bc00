//! Shape-directed validation of JSON payloads.
//!
//! External payloads are never read as-is: [`Schema::cast`] checks a raw
//! `serde_json::Value` against a declared [`Shape`] and produces a
//! conforming [`Typed`] value, or fails with a [`CastError`] naming the
//! offending field. [`Schema::uncast`] is the inverse projection, back to
//! plain JSON.

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Number, Value};
use std::{collections::BTreeMap, fmt};

/// Declarative description of an expected JSON value.
#[derive(Debug, Clone)]
pub enum Shape {
    /// Anything goes, the value is kept verbatim.
    Any,
    /// JSON null.
    Null,
    /// A field missing from the input record.
    Absent,
    /// Matches nothing (policy to reject undeclared record fields).
    Never,
    /// JSON boolean.
    Bool,
    /// JSON number without fractional part.
    Int,
    /// Any JSON number.
    Double,
    /// JSON string.
    Str,
    /// RFC 3339 date-time string, stored parsed.
    Date,
    /// One of a fixed set of string literals.
    Enum(Vec<&'static str>),
    /// Sequence whose elements all share one shape.
    List(Box<Shape>),
    /// Members are tried in declared order, first match wins.
    Union(Vec<Shape>),
    /// Keyed record with a fixed field list.
    ///
    /// `extra` is the shape applied to input keys not declared in
    /// `fields`.
    Record {
        /// Declared fields.
        fields: Vec<Field>,
        /// Policy for undeclared fields.
        extra: Box<Shape>,
    },
    /// Named shape, resolved through the enclosing [`Schema`].
    Ref(&'static str),
}

impl Shape {
    /// Shorthand for a list shape.
    pub fn list(element: Self) -> Self {
        Self::List(Box::new(element))
    }

    /// A value that can be `null`.
    pub fn nullable(inner: Self) -> Self {
        Self::Union(vec![Self::Null, inner])
    }

    /// A record field that can be missing from the input.
    pub fn optional(inner: Self) -> Self {
        Self::Union(vec![Self::Absent, inner])
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "anything"),
            Self::Null => write!(f, "null"),
            Self::Absent => write!(f, "no value"),
            Self::Never => write!(f, "no such field"),
            Self::Bool => write!(f, "a boolean"),
            Self::Int => write!(f, "an integer"),
            Self::Double => write!(f, "a number"),
            Self::Str => write!(f, "a string"),
            Self::Date => write!(f, "a date"),
            Self::Enum(cases) => {
                let cases = cases
                    .iter()
                    .map(|case| format!("\"{case}\""))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "one of [{cases}]")
            },
            Self::List(element) => write!(f, "a list of {element}"),
            Self::Union(members) => {
                let members = members
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "one of [{members}]")
            },
            Self::Record { .. } => write!(f, "a record"),
            Self::Ref(name) => write!(f, "{name}"),
        }
    }
}

/// A declared record field.
#[derive(Debug, Clone)]
pub struct Field {
    /// Field name on the wire.
    pub name: &'static str,
    /// Expected shape of the field value.
    pub shape: Shape,
}

/// Shorthand to declare a record field.
pub fn field(name: &'static str, shape: Shape) -> Field {
    Field { name, shape }
}

/// A JSON value that passed validation against a [`Shape`].
#[derive(Debug, Clone, PartialEq)]
pub enum Typed {
    /// JSON null.
    Null,
    /// Declared-but-missing field (admitted by `Shape::Absent`).
    Absent,
    /// Boolean.
    Bool(bool),
    /// Whole number.
    Int(i64),
    /// Number, kept as-is for exact re-serialization.
    Double(Number),
    /// String (also enum cases).
    Str(String),
    /// Parsed timestamp, plus the verbatim wire string.
    Date {
        /// Parsed value.
        stamp: DateTime<FixedOffset>,
        /// Wire string, re-emitted verbatim by `uncast`.
        raw: String,
    },
    /// Sequence.
    List(Vec<Typed>),
    /// Keyed record.
    Record(BTreeMap<String, Typed>),
    /// Verbatim value admitted by `Shape::Any`.
    Any(Value),
}

impl Typed {
    /// Returns the value of a record field.
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Record(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Returns the element at `index` of a list.
    pub fn index(&self, index: usize) -> Option<&Self> {
        match self {
            Self::List(elements) => elements.get(index),
            _ => None,
        }
    }

    /// Returns the inner string, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the parsed timestamp, if any.
    pub fn as_date(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Self::Date { stamp, .. } => Some(stamp),
            _ => None,
        }
    }
}

/// Validation failure: where it happened, what was expected, what was
/// found instead.
#[derive(Debug, Clone)]
pub struct CastError {
    /// Field key, when the failure is inside a record.
    key: Option<String>,
    /// Name of the enclosing record, if any.
    record: Option<String>,
    /// Description of the expected shape.
    expected: String,
    /// Rendering of the offending value (`None` for an absent field).
    found: Option<String>,
}

impl CastError {
    fn new(at: Site<'_>, expected: String, found: Option<String>) -> Self {
        Self {
            key: at.key.map(ToOwned::to_owned),
            record: at.record.map(ToOwned::to_owned),
            expected,
            found,
        }
    }

    /// Field key at the failure site, if any.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Enclosing record name at the failure site, if any.
    pub fn record(&self) -> Option<&str> {
        self.record.as_deref()
    }

    /// Description of the expected shape.
    pub fn expected(&self) -> &str {
        &self.expected
    }
}

impl fmt::Display for CastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value")?;
        if let Some(key) = &self.key {
            write!(f, " for key \"{key}\"")?;
        }
        if let Some(record) = &self.record {
            write!(f, " on {record}")?;
        }
        write!(f, ": expected {}, got ", self.expected)?;
        match &self.found {
            Some(found) => write!(f, "{found}"),
            None => write!(f, "nothing"),
        }
    }
}

impl std::error::Error for CastError {}

/// Where in the payload the caster currently is, for error reporting.
#[derive(Clone, Copy, Default)]
struct Site<'a> {
    key: Option<&'a str>,
    record: Option<&'a str>,
}

/// A record field value: present in the input, or missing.
#[derive(Clone, Copy)]
enum Input<'a> {
    Present(&'a Value),
    Missing,
}

impl Input<'_> {
    fn render(self) -> Option<String> {
        match self {
            Self::Present(value) => Some(value.to_string()),
            Self::Missing => None,
        }
    }
}

/// The error message names the `Ref` a shape was reached through, when
/// there is one.
fn describe(shape: &Shape, name: Option<&str>) -> String {
    name.map_or_else(|| shape.to_string(), ToOwned::to_owned)
}

/// Registry of named shapes.
#[derive(Debug, Default)]
pub struct Schema {
    shapes: BTreeMap<&'static str, Shape>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a shape under `name`, for [`Shape::Ref`] resolution.
    pub fn define(&mut self, name: &'static str, shape: Shape) {
        self.shapes.insert(name, shape);
    }

    /// Validates `value` against `shape` and produces the typed value.
    pub fn cast(
        &self,
        value: &Value,
        shape: &Shape,
    ) -> Result<Typed, CastError> {
        self.cast_at(Input::Present(value), shape, None, Site::default())
    }

    /// Validates `value` against `shape` and projects it back to JSON.
    pub fn uncast(
        &self,
        value: &Typed,
        shape: &Shape,
    ) -> Result<Value, CastError> {
        match self.uncast_at(value, shape, None, Site::default())? {
            Some(json) => Ok(json),
            None => Err(CastError::new(
                Site::default(),
                shape.to_string(),
                Some(format!("{value:?}")),
            )),
        }
    }

    fn cast_at(
        &self,
        input: Input<'_>,
        shape: &Shape,
        name: Option<&'static str>,
        at: Site<'_>,
    ) -> Result<Typed, CastError> {
        let fail = || CastError::new(at, describe(shape, name), input.render());

        match shape {
            Shape::Ref(target) => {
                let resolved = match self.shapes.get(target) {
                    Some(resolved) => resolved,
                    None => {
                        return Err(CastError::new(
                            at,
                            format!("known shape \"{target}\""),
                            input.render(),
                        ))
                    },
                };
                self.cast_at(input, resolved, Some(target), at)
            },
            Shape::Any => Ok(match input {
                Input::Present(value) => Typed::Any(value.clone()),
                Input::Missing => Typed::Absent,
            }),
            Shape::Null => match input {
                Input::Present(Value::Null) => Ok(Typed::Null),
                _ => Err(fail()),
            },
            Shape::Absent => match input {
                Input::Missing => Ok(Typed::Absent),
                Input::Present(_) => Err(fail()),
            },
            Shape::Never => Err(fail()),
            Shape::Bool => match input {
                Input::Present(Value::Bool(value)) => Ok(Typed::Bool(*value)),
                _ => Err(fail()),
            },
            Shape::Int => match input {
                Input::Present(Value::Number(number)) => {
                    number.as_i64().map(Typed::Int).ok_or_else(fail)
                },
                _ => Err(fail()),
            },
            Shape::Double => match input {
                Input::Present(Value::Number(number)) => {
                    Ok(Typed::Double(number.clone()))
                },
                _ => Err(fail()),
            },
            Shape::Str => match input {
                Input::Present(Value::String(value)) => {
                    Ok(Typed::Str(value.clone()))
                },
                _ => Err(fail()),
            },
            Shape::Date => match input {
                // A number is never interpreted as an epoch.
                Input::Present(Value::String(raw)) => {
                    DateTime::parse_from_rfc3339(raw)
                        .map(|stamp| Typed::Date { stamp, raw: raw.clone() })
                        .map_err(|_| fail())
                },
                _ => Err(fail()),
            },
            Shape::Enum(cases) => match input {
                Input::Present(Value::String(value))
                    if cases.contains(&value.as_str()) =>
                {
                    Ok(Typed::Str(value.clone()))
                },
                _ => Err(fail()),
            },
            Shape::List(element) => match input {
                Input::Present(Value::Array(values)) => values
                    .iter()
                    .map(|value| {
                        self.cast_at(Input::Present(value), element, None, at)
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Typed::List),
                _ => Err(fail()),
            },
            Shape::Union(members) => members
                .iter()
                .find_map(|member| self.cast_at(input, member, None, at).ok())
                .ok_or_else(fail),
            Shape::Record { fields, extra } => {
                let object = match input {
                    Input::Present(Value::Object(object)) => object,
                    _ => return Err(fail()),
                };
                let mut record = BTreeMap::new();

                for declared in fields {
                    let site = Site { key: Some(declared.name), record: name };
                    let value = object
                        .get(declared.name)
                        .map_or(Input::Missing, Input::Present);
                    record.insert(
                        declared.name.to_owned(),
                        self.cast_at(value, &declared.shape, None, site)?,
                    );
                }

                // Undeclared fields go through the record's policy.
                for (key, value) in object {
                    if fields.iter().any(|declared| declared.name == key) {
                        continue;
                    }
                    let site = Site { key: Some(key), record: name };
                    record.insert(
                        key.clone(),
                        self.cast_at(Input::Present(value), extra, None, site)?,
                    );
                }

                Ok(Typed::Record(record))
            },
        }
    }

    fn uncast_at(
        &self,
        value: &Typed,
        shape: &Shape,
        name: Option<&'static str>,
        at: Site<'_>,
    ) -> Result<Option<Value>, CastError> {
        let fail = || {
            CastError::new(
                at,
                describe(shape, name),
                Some(format!("{value:?}")),
            )
        };

        match shape {
            Shape::Ref(target) => {
                let resolved = match self.shapes.get(target) {
                    Some(resolved) => resolved,
                    None => {
                        return Err(CastError::new(
                            at,
                            format!("known shape \"{target}\""),
                            Some(format!("{value:?}")),
                        ))
                    },
                };
                self.uncast_at(value, resolved, Some(target), at)
            },
            Shape::Any => match value {
                Typed::Any(inner) => Ok(Some(inner.clone())),
                Typed::Absent => Ok(None),
                _ => Err(fail()),
            },
            Shape::Null => match value {
                Typed::Null => Ok(Some(Value::Null)),
                _ => Err(fail()),
            },
            Shape::Absent => match value {
                Typed::Absent => Ok(None),
                _ => Err(fail()),
            },
            Shape::Never => Err(fail()),
            Shape::Bool => match value {
                Typed::Bool(inner) => Ok(Some(Value::Bool(*inner))),
                _ => Err(fail()),
            },
            Shape::Int => match value {
                Typed::Int(inner) => {
                    Ok(Some(Value::Number((*inner).into())))
                },
                _ => Err(fail()),
            },
            Shape::Double => match value {
                Typed::Double(inner) => {
                    Ok(Some(Value::Number(inner.clone())))
                },
                _ => Err(fail()),
            },
            Shape::Str => match value {
                Typed::Str(inner) => Ok(Some(Value::String(inner.clone()))),
                _ => Err(fail()),
            },
            Shape::Date => match value {
                Typed::Date { raw, .. } => {
                    Ok(Some(Value::String(raw.clone())))
                },
                _ => Err(fail()),
            },
            Shape::Enum(cases) => match value {
                Typed::Str(inner) if cases.contains(&inner.as_str()) => {
                    Ok(Some(Value::String(inner.clone())))
                },
                _ => Err(fail()),
            },
            Shape::List(element) => match value {
                Typed::List(elements) => {
                    let mut out = Vec::with_capacity(elements.len());
                    for elem in elements {
                        match self.uncast_at(elem, element, None, at)? {
                            Some(projected) => out.push(projected),
                            None => return Err(fail()),
                        }
                    }
                    Ok(Some(Value::Array(out)))
                },
                _ => Err(fail()),
            },
            Shape::Union(members) => members
                .iter()
                .find_map(|member| {
                    self.uncast_at(value, member, None, at).ok()
                })
                .ok_or_else(fail),
            Shape::Record { fields, extra } => {
                let entries = match value {
                    Typed::Record(entries) => entries,
                    _ => return Err(fail()),
                };
                let mut object = Map::new();

                for declared in fields {
                    let site = Site { key: Some(declared.name), record: name };
                    // A missing entry is projected as an absent value, so
                    // the declared shape decides whether that is legal.
                    let entry =
                        entries.get(declared.name).unwrap_or(&Typed::Absent);
                    if let Some(projected) =
                        self.uncast_at(entry, &declared.shape, None, site)?
                    {
                        object.insert(declared.name.to_owned(), projected);
                    }
                }

                for (key, entry) in entries {
                    if fields.iter().any(|declared| declared.name == key) {
                        continue;
                    }
                    let site = Site { key: Some(key), record: name };
                    if let Some(projected) =
                        self.uncast_at(entry, extra, None, site)?
                    {
                        object.insert(key.clone(), projected);
                    }
                }

                Ok(Some(Value::Object(object)))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        let mut schema = Schema::new();
        schema.define(
            "Gig",
            Shape::Record {
                fields: vec![
                    field("name", Shape::Str),
                    field("seats", Shape::Int),
                    field("rating", Shape::Double),
                    field("live", Shape::Bool),
                    field("tag", Shape::Enum(vec!["quiet", "loud"])),
                    field("starts_at", Shape::Date),
                    field("ends_at", Shape::nullable(Shape::Date)),
                    field("venue", Shape::optional(Shape::Ref("Venue"))),
                    field("notes", Shape::list(Shape::Str)),
                    field("misc", Shape::Any),
                ],
                extra: Box::new(Shape::Never),
            },
        );
        schema.define(
            "Venue",
            Shape::Record {
                fields: vec![field("city", Shape::Str)],
                extra: Box::new(Shape::Never),
            },
        );
        schema
    }

    fn gig() -> Value {
        json!({
            "name": "jam session",
            "seats": 12,
            "rating": 4.5,
            "live": true,
            "tag": "loud",
            "starts_at": "2023-04-01T20:00:00+02:00",
            "ends_at": null,
            "notes": ["bring earplugs"],
            "misc": {"whatever": [1, 2]},
        })
    }

    #[test]
    fn cast_accepts_conforming_payload() {
        let typed = schema()
            .cast(&gig(), &Shape::Ref("Gig"))
            .expect("conforming payload");

        assert_eq!(
            typed.get("name").and_then(Typed::as_str),
            Some("jam session")
        );
        assert_eq!(typed.get("seats"), Some(&Typed::Int(12)));
        assert!(typed.get("starts_at").and_then(Typed::as_date).is_some());
        assert_eq!(typed.get("ends_at"), Some(&Typed::Null));
        // Optional field, absent from the input.
        assert_eq!(typed.get("venue"), Some(&Typed::Absent));
    }

    #[test]
    fn cast_rejects_primitive_mismatch() {
        let mut payload = gig();
        payload["seats"] = json!("12");

        let err = schema()
            .cast(&payload, &Shape::Ref("Gig"))
            .expect_err("string is not an integer");

        assert_eq!(err.key(), Some("seats"));
        assert_eq!(err.record(), Some("Gig"));
        assert_eq!(err.expected(), "an integer");
    }

    #[test]
    fn cast_rejects_fractional_integer() {
        let mut payload = gig();
        payload["seats"] = json!(12.5);

        assert!(schema().cast(&payload, &Shape::Ref("Gig")).is_err());
    }

    #[test]
    fn cast_reports_missing_required_field() {
        let mut payload = gig();
        payload
            .as_object_mut()
            .expect("object payload")
            .remove("name");

        let err = schema()
            .cast(&payload, &Shape::Ref("Gig"))
            .expect_err("name is required");

        assert_eq!(err.key(), Some("name"));
        assert!(err.to_string().contains("got nothing"));
    }

    #[test]
    fn cast_union_reports_all_candidates() {
        let mut payload = gig();
        payload["ends_at"] = json!(42);

        let err = schema()
            .cast(&payload, &Shape::Ref("Gig"))
            .expect_err("number is neither null nor a date");

        assert_eq!(err.expected(), "one of [null, a date]");
    }

    #[test]
    fn cast_rejects_unknown_enum_case() {
        let mut payload = gig();
        payload["tag"] = json!("silent");

        let err = schema()
            .cast(&payload, &Shape::Ref("Gig"))
            .expect_err("silent is not a declared case");

        assert_eq!(err.key(), Some("tag"));
        assert!(err.expected().contains("\"quiet\""));
    }

    #[test]
    fn cast_rejects_bad_list_element() {
        let mut payload = gig();
        payload["notes"] = json!(["ok", 7]);

        let err = schema()
            .cast(&payload, &Shape::Ref("Gig"))
            .expect_err("7 is not a string");

        assert_eq!(err.key(), Some("notes"));
    }

    #[test]
    fn cast_never_interprets_numbers_as_dates() {
        let mut payload = gig();
        payload["starts_at"] = json!(1_680_000_000);

        assert!(schema().cast(&payload, &Shape::Ref("Gig")).is_err());
    }

    #[test]
    fn cast_rejects_unparseable_date() {
        let mut payload = gig();
        payload["starts_at"] = json!("yesterday evening");

        assert!(schema().cast(&payload, &Shape::Ref("Gig")).is_err());
    }

    #[test]
    fn cast_rejects_undeclared_field() {
        let mut payload = gig();
        payload["vip"] = json!(true);

        let err = schema()
            .cast(&payload, &Shape::Ref("Gig"))
            .expect_err("vip is not declared");

        assert_eq!(err.key(), Some("vip"));
        assert_eq!(err.expected(), "no such field");
    }

    #[test]
    fn cast_names_nested_record() {
        let mut payload = gig();
        payload["venue"] = json!({"city": 3});

        let err = schema()
            .cast(&payload, &Shape::Ref("Gig"))
            .expect_err("city must be a string");

        assert_eq!(err.key(), Some("city"));
        assert_eq!(err.record(), Some("Venue"));
    }

    #[test]
    fn cast_fails_on_unknown_ref() {
        let err = schema()
            .cast(&gig(), &Shape::Ref("Nope"))
            .expect_err("Nope is not registered");

        assert!(err.expected().contains("known shape"));
    }

    #[test]
    fn uncast_round_trips_conforming_payloads() {
        let schema = schema();
        let shape = Shape::Ref("Gig");

        let mut payload = gig();
        let typed = schema.cast(&payload, &shape).expect("cast");
        assert_eq!(schema.uncast(&typed, &shape).expect("uncast"), payload);

        // Same with the optional record present and a real end date.
        payload["venue"] = json!({"city": "Lyon"});
        payload["ends_at"] = json!("2023-04-01T23:30:00+02:00");
        let typed = schema.cast(&payload, &shape).expect("cast");
        assert_eq!(schema.uncast(&typed, &shape).expect("uncast"), payload);
    }

    #[test]
    fn uncast_rejects_missing_required_field() {
        let schema = schema();
        let shape = Shape::Ref("Venue");

        let typed = Typed::Record(BTreeMap::new());

        assert!(schema.uncast(&typed, &shape).is_err());
    }
}
