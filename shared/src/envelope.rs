use crate::error::SerializationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Error body returned by the error constructors.
///
/// Extensions are free-form members added next to `title`, `detail` and
/// `type`. A known field that is set always takes precedence over an
/// extension with the same key; the extension is dropped without error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorEnvelope {
    pub title: String,
    pub detail: String,
    pub kind: Option<String>,
    pub extensions: BTreeMap<String, Value>,
}

impl ErrorEnvelope {
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_extension(
        mut self,
        key: impl Into<String>,
        value: &impl Serialize,
    ) -> Result<Self, SerializationError> {
        self.extensions
            .insert(key.into(), serde_json::to_value(value)?);
        Ok(self)
    }

    pub fn insert_extension(&mut self, key: impl Into<String>, value: Value) {
        self.extensions.insert(key.into(), value);
    }

    pub fn to_json(&self) -> Result<String, SerializationError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum Member<'a> {
    Text(&'a str),
    Json(&'a Value),
}

impl Serialize for ErrorEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut members: BTreeMap<&str, Member<'_>> = BTreeMap::new();
        if !self.title.is_empty() {
            members.insert("title", Member::Text(&self.title));
        }
        if !self.detail.is_empty() {
            members.insert("detail", Member::Text(&self.detail));
        }
        if let Some(kind) = self.kind.as_deref().filter(|kind| !kind.is_empty()) {
            members.insert("type", Member::Text(kind));
        }
        for (key, value) in &self.extensions {
            members.entry(key.as_str()).or_insert(Member::Json(value));
        }
        members.serialize(serializer)
    }
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    title: String,
    #[serde(default)]
    detail: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(flatten)]
    extensions: BTreeMap<String, Value>,
}

impl<'de> Deserialize<'de> for ErrorEnvelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEnvelope::deserialize(deserializer)?;
        Ok(Self {
            title: raw.title,
            detail: raw.detail,
            kind: raw.kind,
            extensions: raw.extensions,
        })
    }
}
