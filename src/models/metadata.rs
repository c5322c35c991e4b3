//! `app.yaml` document model.
//!
//! Metadata is kept as a loose YAML mapping rather than a typed struct so
//! that missing keys, wrong value kinds, and unknown keys can all be reported
//! (or ignored) by the checks instead of failing deserialization.

use crate::error::YamlLoadError;
use serde::de::{self, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde::Deserialize;
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Number, Value};
use std::fmt;
use std::fs;
use std::path::Path;

/// Deployment flavor of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppType {
    Helm,
    Kustomize,
}

impl AppType {
    pub fn as_str(self) -> &'static str {
        match self {
            AppType::Helm => "helm",
            AppType::Kustomize => "kustomize",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Parsed top-level mapping of an `app.yaml` file.
pub struct AppMetadata {
    map: Mapping,
    wave_written: Option<String>,
}

impl AppMetadata {
    /// Parse a YAML document. An empty document is an empty mapping; any
    /// other non-mapping top level is rejected.
    pub fn parse(src: &str) -> Result<Self, YamlLoadError> {
        if is_blank_document(src) {
            return Ok(Self::default());
        }
        let LooseValue(value) = serde_yaml::from_str(src)?;
        let map = match value {
            Value::Mapping(map) => map,
            Value::Null => return Ok(Self::default()),
            other => return Err(YamlLoadError::NotAMapping(kind_of(&other))),
        };
        // A second pass keeps scalars exactly as written; it only succeeds
        // when `wave` is a scalar (or absent).
        let wave_written = serde_yaml::from_str::<WrittenScalars>(src)
            .ok()
            .and_then(|w| w.wave)
            .map(|w| w.0);
        Ok(Self { map, wave_written })
    }

    /// Read and parse the metadata file at `path`.
    pub fn load(path: &Path) -> Result<Self, YamlLoadError> {
        let src = fs::read_to_string(path)?;
        Self::parse(&src)
    }

    /// Whether `key` is present, even with a null value.
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    /// Effective deployment type: `helm` only when spelled exactly so.
    pub fn app_type(&self) -> AppType {
        match self.get("type") {
            Some(Value::String(s)) if s == "helm" => AppType::Helm,
            _ => AppType::Kustomize,
        }
    }

    /// Textual value of a key, or `None` when it is missing or empty.
    ///
    /// Null, empty strings, `false`, zero, and collections count as empty.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) if is_zero(n) => None,
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(true) => Some("True".to_string()),
            Value::Tagged(t) => scalar_repr(&t.value).filter(|s| !s.is_empty()),
            _ => None,
        }
    }

    /// Source text of a scalar `wave`, before YAML type resolution
    /// (`1e3` stays `1e3`).
    pub fn wave_as_written(&self) -> Option<&str> {
        self.wave_written.as_deref()
    }

    /// Display form of any present value, as used in finding messages.
    pub fn display(&self, key: &str) -> Option<String> {
        self.get(key).map(display_value)
    }
}

/// Render a value the way messages quote it: strings verbatim, booleans as
/// `True`/`False`, null as `None`, collections in flow form (`[1, 2]`,
/// `{x: 1}`). The result is always a single line.
pub fn display_value(v: &Value) -> String {
    let mut out = String::new();
    write_flow(v, &mut out);
    out.replace('\r', "\\r").replace('\n', "\\n")
}

fn write_flow(v: &Value, out: &mut String) {
    match v {
        Value::Sequence(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_flow(item, out);
            }
            out.push(']');
        }
        Value::Mapping(map) => {
            out.push('{');
            for (i, (k, val)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_flow(k, out);
                out.push_str(": ");
                write_flow(val, out);
            }
            out.push('}');
        }
        Value::Tagged(t) => write_flow(&t.value, out),
        scalar => out.push_str(&scalar_repr(scalar).unwrap_or_default()),
    }
}

fn is_zero(n: &Number) -> bool {
    n.as_f64() == Some(0.0)
}

fn scalar_repr(v: &Value) -> Option<String> {
    match v {
        Value::Null => Some("None".to_string()),
        Value::Bool(true) => Some("True".to_string()),
        Value::Bool(false) => Some("False".to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Tagged(t) => scalar_repr(&t.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

// Whitespace, comments, and document markers only.
fn is_blank_document(src: &str) -> bool {
    src.lines().all(|l| {
        let t = l.trim();
        t.is_empty() || t.starts_with('#') || t == "---" || t == "..."
    })
}

/// YAML value that tolerates what `serde_yaml::Value` rejects: integers
/// beyond 64 bits become their decimal string, and a repeated key keeps its
/// last value.
struct LooseValue(Value);

impl<'de> Deserialize<'de> for LooseValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LooseVisitor).map(LooseValue)
    }
}

struct LooseVisitor;

impl<'de> Visitor<'de> for LooseVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any YAML value")
    }

    fn visit_bool<E>(self, b: bool) -> Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E>(self, i: i64) -> Result<Value, E> {
        Ok(Value::Number(i.into()))
    }

    fn visit_u64<E>(self, u: u64) -> Result<Value, E> {
        Ok(Value::Number(u.into()))
    }

    fn visit_i128<E>(self, i: i128) -> Result<Value, E> {
        Ok(Value::String(i.to_string()))
    }

    fn visit_u128<E>(self, u: u128) -> Result<Value, E> {
        Ok(Value::String(u.to_string()))
    }

    fn visit_f64<E>(self, f: f64) -> Result<Value, E> {
        Ok(Value::Number(f.into()))
    }

    fn visit_str<E>(self, s: &str) -> Result<Value, E> {
        Ok(Value::String(s.to_owned()))
    }

    fn visit_string<E>(self, s: String) -> Result<Value, E> {
        Ok(Value::String(s))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        LooseValue::deserialize(deserializer).map(|v| v.0)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::new();
        while let Some(LooseValue(v)) = seq.next_element()? {
            items.push(v);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut out = Mapping::new();
        while let Some((LooseValue(k), LooseValue(v))) = map.next_entry()? {
            out.insert(k, v);
        }
        Ok(Value::Mapping(out))
    }

    fn visit_enum<A>(self, data: A) -> Result<Value, A::Error>
    where
        A: EnumAccess<'de>,
    {
        let (tag, contents): (String, _) = data.variant()?;
        let LooseValue(value) = contents.newtype_variant()?;
        if tag.is_empty() {
            return Ok(value);
        }
        Ok(Value::Tagged(Box::new(TaggedValue {
            tag: Tag::new(tag),
            value,
        })))
    }
}

#[derive(Deserialize)]
struct WrittenScalars {
    #[serde(default)]
    wave: Option<WrittenText>,
}

/// A scalar's source text, whatever type YAML would resolve it to.
struct WrittenText(String);

impl<'de> Deserialize<'de> for WrittenText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TextVisitor;

        impl<'de> Visitor<'de> for TextVisitor {
            type Value = WrittenText;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a scalar")
            }

            fn visit_str<E: de::Error>(self, s: &str) -> Result<WrittenText, E> {
                Ok(WrittenText(s.to_owned()))
            }
        }

        deserializer.deserialize_str(TextVisitor)
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
