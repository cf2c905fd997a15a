//! Repair guide documents.
//!
//! Documents are loaded without schema validation: the root must be a JSON
//! object, and every nested field is read defensively. Missing or wrong-typed
//! fields degrade to defaults instead of failing the load.

use std::path::Path;
use std::time::SystemTime;

use serde_json::{Map, Value};

use crate::{ContentError, ResolvedPath};

/// A language-code-to-text mapping attached to a content field.
///
/// Entry order follows the source document. Scalar values are kept as text;
/// `null`, arrays and objects are dropped since they can never be displayed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalizedString {
    entries: Vec<(String, String)>,
}

impl LocalizedString {
    /// Build from a JSON value. Returns `None` unless the value is an object.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let entries = map
            .iter()
            .filter_map(|(code, text)| scalar_text(text).map(|text| (code.clone(), text)))
            .collect();
        Some(Self { entries })
    }

    /// Text for `code`, if present and non-empty.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, text)| text.as_str())
            .filter(|text| !text.is_empty())
    }

    /// First non-empty text in document order.
    #[must_use]
    pub fn first_non_empty(&self) -> Option<&str> {
        self.entries
            .iter()
            .map(|(_, text)| text.as_str())
            .find(|text| !text.is_empty())
    }

    /// Whether no entries are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocalizedString {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A part or tool required by a repair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartEntry {
    pub name: Option<LocalizedString>,
    /// Raw, untrusted image reference.
    pub image: Option<String>,
    pub alt: Option<LocalizedString>,
    pub sku: Option<String>,
}

/// One step of a repair. Position in [`ContentDocument::steps`] is the display order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepEntry {
    pub title: Option<LocalizedString>,
    pub description: Option<LocalizedString>,
    /// Raw, untrusted image reference.
    pub image: Option<String>,
    pub image_alt: Option<LocalizedString>,
}

/// A parsed repair guide.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentDocument {
    /// Metadata fields such as `title_tag` or `tempo_estimado`.
    pub meta: Vec<(String, LocalizedString)>,
    /// The guide's own heading.
    pub title: Option<LocalizedString>,
    pub parts: Vec<PartEntry>,
    pub steps: Vec<StepEntry>,
    /// Footer fields such as copyright or back-link label.
    pub footer: Vec<(String, LocalizedString)>,
}

impl ContentDocument {
    /// Build a document from a parsed JSON object.
    #[must_use]
    pub fn from_map(root: &Map<String, Value>) -> Self {
        Self {
            meta: localized_map(root.get("meta")),
            title: localized(root.get("title")).or_else(|| localized(root.get("idconteudo"))),
            parts: array(root.get("parts")).map(part_entry).collect(),
            steps: array(root.get("steps")).map(step_entry).collect(),
            footer: localized_map(root.get("footer")),
        }
    }

    /// Metadata field by key.
    #[must_use]
    pub fn meta(&self, key: &str) -> Option<&LocalizedString> {
        lookup(&self.meta, key)
    }

    /// Footer field by key.
    #[must_use]
    pub fn footer(&self, key: &str) -> Option<&LocalizedString> {
        lookup(&self.footer, key)
    }
}

/// A document together with where it came from.
#[derive(Clone, Debug)]
pub struct LoadedDocument {
    pub path: ResolvedPath,
    pub document: ContentDocument,
    /// File modification time, when the platform reports one.
    pub modified: Option<SystemTime>,
}

/// Read and parse a resolved document.
///
/// Malformed JSON and non-object roots both yield [`ContentError::Parse`].
pub fn load_document(path: &ResolvedPath) -> Result<LoadedDocument, ContentError> {
    let root = read_json_object(path.as_path())?;
    let modified = std::fs::metadata(path.as_path())
        .and_then(|m| m.modified())
        .ok();

    Ok(LoadedDocument {
        path: path.clone(),
        document: ContentDocument::from_map(&root),
        modified,
    })
}

/// Read a file and parse it as a JSON object.
pub(crate) fn read_json_object(path: &Path) -> Result<Map<String, Value>, ContentError> {
    let parse_error = |message: String| ContentError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let bytes = std::fs::read(path).map_err(|e| parse_error(e.to_string()))?;
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(parse_error("document root is not an object".to_owned())),
        Err(e) => Err(parse_error(e.to_string())),
    }
}

fn part_entry(value: &Value) -> PartEntry {
    PartEntry {
        name: localized(value.get("name")),
        image: string(value.get("image")),
        alt: localized(value.get("alt")),
        sku: string(value.get("sku")),
    }
}

fn step_entry(value: &Value) -> StepEntry {
    StepEntry {
        title: localized(value.get("title")),
        description: localized(value.get("description")),
        image: string(value.get("image")),
        image_alt: localized(value.get("imageAlt")).or_else(|| localized(value.get("image_alt"))),
    }
}

fn lookup<'a>(fields: &'a [(String, LocalizedString)], key: &str) -> Option<&'a LocalizedString> {
    fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

pub(crate) fn localized(value: Option<&Value>) -> Option<LocalizedString> {
    value.and_then(LocalizedString::from_value)
}

fn localized_map(value: Option<&Value>) -> Vec<(String, LocalizedString)> {
    value
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
        .filter_map(|(k, v)| LocalizedString::from_value(v).map(|s| (k.clone(), s)))
        .collect()
}

pub(crate) fn array(value: Option<&Value>) -> impl Iterator<Item = &Value> {
    value.and_then(Value::as_array).into_iter().flatten()
}

pub(crate) fn string(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_owned)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{ContentRoot, DocumentId};

    fn write_and_resolve(content: &str) -> (tempfile::TempDir, ResolvedPath) {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("doc.json"), content).unwrap();
        let root = ContentRoot::new(temp.path()).unwrap();
        let path = root.resolve(&DocumentId::parse("doc.json").unwrap()).unwrap();
        (temp, path)
    }

    #[test]
    fn test_localized_string_preserves_order() {
        let s = LocalizedString::from_value(&json!({"es": "Hola", "en": "Hello"})).unwrap();
        assert_eq!(s.first_non_empty(), Some("Hola"));
    }

    #[test]
    fn test_localized_string_skips_empty_and_structured_values() {
        let s = LocalizedString::from_value(&json!({"fr": "", "de": null, "it": [1], "en": "Hi"}))
            .unwrap();
        assert_eq!(s.get("fr"), None);
        assert_eq!(s.get("de"), None);
        assert_eq!(s.first_non_empty(), Some("Hi"));
    }

    #[test]
    fn test_localized_string_requires_object() {
        assert!(LocalizedString::from_value(&json!("plain")).is_none());
        assert!(LocalizedString::from_value(&json!(["a"])).is_none());
    }

    #[test]
    fn test_from_map_full_document() {
        let root = json!({
            "meta": {"title_tag": {"en": "Tag"}, "tempo_estimado": {"pt": "10 min"}},
            "title": {"en": "Power supply"},
            "parts": [{"name": {"en": "24V PSU"}, "image": "img/psu.webp", "sku": "PSU-24"}],
            "steps": [
                {"title": {"en": "Unplug"}, "image": "img/1.webp", "imageAlt": {"en": "plug"}},
                {"title": {"en": "Open"}, "image_alt": {"en": "cover"}}
            ],
            "footer": {"copyright": {"en": "Nexled"}}
        });

        let doc = ContentDocument::from_map(root.as_object().unwrap());

        assert_eq!(doc.meta("title_tag").unwrap().get("en"), Some("Tag"));
        assert_eq!(doc.meta("tempo_estimado").unwrap().get("pt"), Some("10 min"));
        assert_eq!(doc.title.as_ref().unwrap().get("en"), Some("Power supply"));
        assert_eq!(doc.parts.len(), 1);
        assert_eq!(doc.parts[0].sku.as_deref(), Some("PSU-24"));
        assert_eq!(doc.steps.len(), 2);
        assert_eq!(doc.steps[0].image.as_deref(), Some("img/1.webp"));
        assert_eq!(doc.steps[0].image_alt.as_ref().unwrap().get("en"), Some("plug"));
        assert_eq!(doc.steps[1].image_alt.as_ref().unwrap().get("en"), Some("cover"));
        assert_eq!(doc.footer("copyright").unwrap().get("en"), Some("Nexled"));
    }

    #[test]
    fn test_from_map_legacy_title_key() {
        let root = json!({"idconteudo": {"pt": "Substituir fonte"}});
        let doc = ContentDocument::from_map(root.as_object().unwrap());
        assert_eq!(doc.title.unwrap().get("pt"), Some("Substituir fonte"));
    }

    #[test]
    fn test_from_map_wrong_types_degrade_to_defaults() {
        let root = json!({
            "meta": "nope",
            "title": 5,
            "parts": {"not": "an array"},
            "steps": [42, {"title": "plain", "image": 7}],
            "footer": null
        });

        let doc = ContentDocument::from_map(root.as_object().unwrap());

        assert!(doc.meta.is_empty());
        assert!(doc.title.is_none());
        assert!(doc.parts.is_empty());
        assert_eq!(doc.steps, vec![StepEntry::default(), StepEntry::default()]);
        assert!(doc.footer.is_empty());
    }

    #[test]
    fn test_load_document() {
        let (_temp, path) = write_and_resolve(r#"{"steps": [{"title": {"en": "Unplug device"}}]}"#);

        let loaded = load_document(&path).unwrap();

        assert_eq!(loaded.path, path);
        assert_eq!(loaded.document.steps.len(), 1);
        assert!(loaded.modified.is_some());
    }

    #[test]
    fn test_load_is_idempotent() {
        let (_temp, path) = write_and_resolve(r#"{"title": {"pt": "Olá", "en": "Hello"}}"#);

        let first = load_document(&path).unwrap();
        let second = load_document(&path).unwrap();

        assert_eq!(first.document, second.document);
    }

    #[test]
    fn test_load_rejects_non_object_root() {
        for content in ["[]", "\"text\"", "42", "null"] {
            let (_temp, path) = write_and_resolve(content);
            assert!(
                matches!(load_document(&path), Err(ContentError::Parse { .. })),
                "{content}"
            );
        }
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let (_temp, path) = write_and_resolve("{\"title\": ");
        assert!(matches!(
            load_document(&path),
            Err(ContentError::Parse { .. })
        ));
    }
}
