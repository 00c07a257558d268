use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use indexmap::IndexMap;
use serde::Deserialize;
use tempfile::NamedTempFile;
use toml_edit::{Array, DocumentMut, InlineTable, Item, Table, Value};
use tracing::{debug, error};

use crate::editor::EditorError;
use crate::io::lock::{FileLock, LockError};
use crate::model::{FieldKind, FieldValue, Record};

/// Error type for record file operations
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not parse {path}: {message}")]
    ParseError { path: PathBuf, message: String },
    #[error("field {field}: {source}")]
    Field { field: String, source: EditorError },
    #[error("field {field} has malformed items: {message}")]
    InvalidItems { field: String, message: String },
    #[error("no such field: {0}")]
    UnknownField(String),
    #[error("field already exists: {0}")]
    DuplicateField(String),
    #[error("record has no fields")]
    NoFields,
    #[error("record file already exists: {0}")]
    AlreadyExists(PathBuf),
    #[error(transparent)]
    Lock(#[from] LockError),
}

#[derive(Deserialize)]
struct RawRecord {
    record: RawHeader,
    #[serde(default)]
    fields: IndexMap<String, RawField>,
}

#[derive(Deserialize)]
struct RawHeader {
    name: String,
    #[serde(default)]
    updated: Option<String>,
}

#[derive(Deserialize)]
struct RawField {
    kind: String,
    #[serde(default)]
    items: Option<toml::Value>,
}

/// A loaded record plus the document it came from, so writes only touch
/// the items that changed and keep the user's comments and layout.
#[derive(Debug, Clone)]
pub struct RecordFile {
    pub path: PathBuf,
    pub record: Record,
    doc: DocumentMut,
}

impl RecordFile {
    pub fn load(path: &Path) -> Result<Self, RecordError> {
        let text = fs::read_to_string(path).map_err(|e| RecordError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let (record, doc) = parse_record(&text, path)?;
        Ok(RecordFile {
            path: path.to_path_buf(),
            record,
            doc,
        })
    }

    /// Re-read the file after an external change
    pub fn reload(&mut self) -> Result<(), RecordError> {
        *self = RecordFile::load(&self.path)?;
        Ok(())
    }

    pub fn value(&self, field: &str) -> Result<&FieldValue, RecordError> {
        self.record
            .field(field)
            .ok_or_else(|| RecordError::UnknownField(field.to_string()))
    }

    /// Replace a field's items in memory; call [`save`](Self::save) to write.
    pub fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), RecordError> {
        let existing = self.value(name)?.kind();
        if existing != value.kind() {
            return Err(RecordError::Field {
                field: name.to_string(),
                source: EditorError::KindMismatch {
                    expected: existing,
                    found: value.kind(),
                },
            });
        }

        write_field_items(&mut self.doc, name, &value)?;
        // whole seconds, as written to disk, so a reload compares equal
        let now = Utc::now().trunc_subsecs(0);
        stamp_updated(&mut self.doc, now);
        self.record.updated = Some(now);
        self.record.fields.insert(name.to_string(), value);
        Ok(())
    }

    /// Add an empty field at the end of the record.
    pub fn add_field(&mut self, name: &str, kind: FieldKind) -> Result<(), RecordError> {
        if self.record.fields.contains_key(name) {
            return Err(RecordError::DuplicateField(name.to_string()));
        }
        insert_field_table(&mut self.doc, name, kind);
        self.record
            .fields
            .insert(name.to_string(), FieldValue::empty(kind));
        Ok(())
    }

    /// Replace a field's items and write the record. Nothing changes in
    /// memory unless the write succeeds.
    pub fn save_field(&mut self, name: &str, value: FieldValue) -> Result<(), RecordError> {
        let mut next = self.clone();
        next.set_field(name, value)?;
        next.save()?;
        *self = next;
        Ok(())
    }

    /// Write the document atomically under the record's lock.
    pub fn save(&self) -> Result<(), RecordError> {
        save_document(&self.path, &self.doc)
    }

    pub fn to_toml_string(&self) -> String {
        self.doc.to_string()
    }
}

pub fn load_record(path: &Path) -> Result<RecordFile, RecordError> {
    RecordFile::load(path)
}

/// Atomically replace `path` with `doc`, holding the record lock.
pub fn save_document(path: &Path, doc: &DocumentMut) -> Result<(), RecordError> {
    let _lock = FileLock::acquire_default(path)?;
    let content = doc.to_string();
    atomic_write(path, content.as_bytes()).map_err(|e| {
        error!(path = %path.display(), error = %e, "record write failed");
        RecordError::WriteError {
            path: path.to_path_buf(),
            source: e,
        }
    })?;
    debug!(path = %path.display(), bytes = content.len(), "record saved");
    Ok(())
}

/// Create a new record file with empty emails, phones and links fields.
pub fn init_record(path: &Path, name: &str) -> Result<RecordFile, RecordError> {
    if path.exists() {
        return Err(RecordError::AlreadyExists(path.to_path_buf()));
    }

    let mut doc = DocumentMut::new();
    let mut header = Table::new();
    header.insert("name", toml_edit::value(name));
    doc.insert("record", Item::Table(header));

    let mut file = RecordFile {
        path: path.to_path_buf(),
        record: Record::new(name.to_string()),
        doc,
    };
    for kind in [FieldKind::Emails, FieldKind::Phones, FieldKind::Links] {
        file.add_field(kind.as_str(), kind)?;
    }
    file.save()?;
    Ok(file)
}

/// Parse record text into the typed record and its editable document.
pub fn parse_record(text: &str, path: &Path) -> Result<(Record, DocumentMut), RecordError> {
    let parse_error = |message: String| RecordError::ParseError {
        path: path.to_path_buf(),
        message,
    };
    let doc: DocumentMut = text.parse().map_err(|e: toml_edit::TomlError| parse_error(e.to_string()))?;
    let raw: RawRecord = toml::from_str(text).map_err(|e| parse_error(e.message().to_string()))?;

    let mut fields = IndexMap::new();
    for (name, field) in raw.fields {
        let value = field_from_raw(&name, field)?;
        fields.insert(name, value);
    }

    let updated = raw
        .record
        .updated
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|d| d.with_timezone(&Utc));

    Ok((
        Record {
            name: raw.record.name,
            updated,
            fields,
        },
        doc,
    ))
}

fn field_from_raw(name: &str, raw: RawField) -> Result<FieldValue, RecordError> {
    let kind: FieldKind = raw.kind.parse().map_err(|e| RecordError::Field {
        field: name.to_string(),
        source: e,
    })?;
    let items = raw
        .items
        .unwrap_or_else(|| toml::Value::Array(Vec::new()));
    let malformed = |e: toml::de::Error| RecordError::InvalidItems {
        field: name.to_string(),
        message: e.message().to_string(),
    };

    Ok(match kind {
        FieldKind::Emails => FieldValue::Emails(items.try_into().map_err(malformed)?),
        FieldKind::Phones => FieldValue::Phones(items.try_into().map_err(malformed)?),
        FieldKind::Links => FieldValue::Links(items.try_into().map_err(malformed)?),
        FieldKind::Array => FieldValue::Array(items.try_into().map_err(malformed)?),
    })
}

fn items_array(value: &FieldValue) -> Array {
    let mut array = Array::new();
    match value {
        FieldValue::Emails(items) | FieldValue::Array(items) => {
            for item in items {
                array.push(item.as_str());
            }
        }
        FieldValue::Phones(items) => {
            for phone in items {
                let mut table = InlineTable::new();
                table.insert("calling_code", Value::from(phone.calling_code.as_str()));
                table.insert("number", Value::from(phone.number.as_str()));
                array.push(table);
            }
        }
        FieldValue::Links(items) => {
            for link in items {
                let mut table = InlineTable::new();
                table.insert("label", Value::from(link.label.as_str()));
                table.insert("url", Value::from(link.url.as_str()));
                array.push(table);
            }
        }
    }
    array
}

/// Replace `fields.<name>.items`, leaving the rest of the document alone.
pub fn write_field_items(
    doc: &mut DocumentMut,
    name: &str,
    value: &FieldValue,
) -> Result<(), RecordError> {
    let field = doc
        .get_mut("fields")
        .and_then(|fields| fields.get_mut(name))
        .and_then(|field| field.as_table_like_mut())
        .ok_or_else(|| RecordError::UnknownField(name.to_string()))?;
    let items = toml_edit::value(items_array(value));
    // assign in place so a comment above `items` stays attached
    match field.get_mut("items") {
        Some(existing) => *existing = items,
        None => {
            field.insert("items", items);
        }
    }
    Ok(())
}

fn stamp_updated(doc: &mut DocumentMut, now: DateTime<Utc>) {
    if let Some(header) = doc
        .get_mut("record")
        .and_then(|header| header.as_table_like_mut())
    {
        header.insert(
            "updated",
            toml_edit::value(now.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
    }
}

fn insert_field_table(doc: &mut DocumentMut, name: &str, kind: FieldKind) {
    if !doc.contains_key("fields") {
        let mut fields = Table::new();
        fields.set_implicit(true);
        doc.insert("fields", Item::Table(fields));
    }
    let mut table = Table::new();
    table.insert("kind", toml_edit::value(kind.as_str()));
    table.insert("items", toml_edit::value(Array::new()));
    if let Some(fields) = doc
        .get_mut("fields")
        .and_then(|fields| fields.as_table_like_mut())
    {
        fields.insert(name, Item::Table(table));
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
