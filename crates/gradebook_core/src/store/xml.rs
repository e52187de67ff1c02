//! Whole-file XML persistence.
//!
//! # Responsibility
//! - Materialize records from one XML document per repository.
//! - Rewrite the entire document after every successful mutation.
//!
//! # Invariants
//! - The document has one root element wrapping zero or more record
//!   elements. The root name found on load is kept on rewrite.
//! - Records are written with fields as attributes; on load, fields may be
//!   attributes or child text elements. Values are taken verbatim either
//!   way; only whitespace-only text between elements is skipped.
//! - Any malformed document or record fails the whole load; there is no
//!   partial recovery.

use super::{RecordStore, Snapshot, StoreError, StoreResult};
use crate::model::assignment::Assignment;
use crate::model::grade::{Grade, GradeId};
use crate::model::student::Student;
use crate::model::Entity;
use log::{error, info};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs::File;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DEFAULT_ROOT: &str = "entities";
const INDENT_WIDTH: usize = 2;

/// Field values of one record element, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFields {
    values: BTreeMap<String, String>,
}

impl RecordFields {
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Appends to a field, creating it when absent.
    pub fn append(&mut self, name: &str, value: &str) {
        self.values.entry(name.to_string()).or_default().push_str(value);
    }

    /// Returns a required text field.
    pub fn text(&self, name: &str) -> Result<String, String> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| format!("missing field `{name}`"))
    }

    /// Returns an optional text field, empty when absent.
    pub fn text_or_default(&self, name: &str) -> String {
        self.values.get(name).cloned().unwrap_or_default()
    }

    /// Parses a required field with `FromStr`.
    pub fn parse<T>(&self, name: &str) -> Result<T, String>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.text(name)?;
        raw.trim()
            .parse::<T>()
            .map_err(|err| format!("field `{name}` has invalid value `{raw}`: {err}"))
    }
}

/// Record type that can live in an XML document.
pub trait XmlRecord: Entity + Sized {
    /// Element name of one record under the root.
    const ELEMENT: &'static str;

    /// Field name/value pairs in output order.
    fn to_fields(&self) -> Vec<(&'static str, String)>;

    fn from_fields(fields: &RecordFields) -> Result<Self, String>;
}

impl XmlRecord for Student {
    const ELEMENT: &'static str = "student";

    fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.clone()),
            ("name", self.name.clone()),
            ("group", self.group.to_string()),
        ]
    }

    fn from_fields(fields: &RecordFields) -> Result<Self, String> {
        Ok(Self {
            id: fields.text("id")?,
            name: fields.text("name")?,
            group: fields.parse("group")?,
        })
    }
}

impl XmlRecord for Assignment {
    const ELEMENT: &'static str = "assignment";

    fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.clone()),
            ("description", self.description.clone()),
            ("deadlineWeek", self.deadline_week.to_string()),
            ("startWeek", self.start_week.to_string()),
        ]
    }

    fn from_fields(fields: &RecordFields) -> Result<Self, String> {
        Ok(Self {
            id: fields.text("id")?,
            description: fields.text("description")?,
            deadline_week: fields.parse("deadlineWeek")?,
            start_week: fields.parse("startWeek")?,
        })
    }
}

impl XmlRecord for Grade {
    const ELEMENT: &'static str = "grade";

    fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.encode()),
            ("studentId", self.id.first.clone()),
            ("assignmentId", self.id.second.clone()),
            ("value", self.value.to_string()),
            ("submissionWeek", self.submission_week.to_string()),
            ("feedback", self.feedback.clone()),
        ]
    }

    /// Reads the key from `studentId`/`assignmentId`, or from the encoded
    /// `id` when only that is present.
    fn from_fields(fields: &RecordFields) -> Result<Self, String> {
        let id = match (fields.text("studentId"), fields.text("assignmentId")) {
            (Ok(student_id), Ok(assignment_id)) => GradeId::new(student_id, assignment_id),
            (student_id, assignment_id) => {
                let encoded = fields.text("id").map_err(|_| {
                    student_id
                        .and(assignment_id)
                        .err()
                        .unwrap_or_else(|| "missing field `id`".to_string())
                })?;
                GradeId::decode(&encoded)
                    .ok_or_else(|| format!("field `id` has invalid value `{encoded}`"))?
            }
        };
        Ok(Self {
            id,
            value: fields.parse("value")?,
            submission_week: fields.parse("submissionWeek")?,
            feedback: fields.text_or_default("feedback"),
        })
    }
}

/// One XML file holding every record of type `E`.
#[derive(Debug)]
pub struct XmlFileStore<E> {
    path: PathBuf,
    root: String,
    _records: PhantomData<fn() -> E>,
}

impl<E: XmlRecord> XmlFileStore<E> {
    /// Opens the store at `path`, creating an empty document when the file
    /// does not exist yet.
    ///
    /// # Errors
    /// - Returns `StoreError::Io` when the empty document cannot be written.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = Self {
            path: path.into(),
            root: DEFAULT_ROOT.to_string(),
            _records: PhantomData,
        };

        if !store.path.exists() {
            store.write_snapshot(&Snapshot::<E>::new())?;
            info!(
                "event=store_init module=store status=ok kind={} path={}",
                E::KIND,
                store.path.display()
            );
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Root element name used for the next rewrite.
    pub fn root_element(&self) -> &str {
        &self.root
    }

    fn write_snapshot(&self, records: &Snapshot<E>) -> StoreResult<()> {
        let bytes = render_document(&self.root, records).map_err(|err| StoreError::Encode {
            path: self.path.clone(),
            message: err.to_string(),
        })?;

        let io_error = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let mut file = File::create(&self.path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;
        Ok(())
    }
}

impl<E: XmlRecord> RecordStore<E> for XmlFileStore<E> {
    fn load(&mut self) -> StoreResult<Vec<E>> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let document =
            parse_document(&text, E::ELEMENT).map_err(|message| StoreError::Malformed {
                path: self.path.clone(),
                message,
            })?;
        self.root = document.root;

        document
            .records
            .iter()
            .map(|fields| {
                E::from_fields(fields).map_err(|message| StoreError::InvalidRecord {
                    path: self.path.clone(),
                    element: E::ELEMENT,
                    message,
                })
            })
            .collect()
    }

    fn persist(&mut self, records: &Snapshot<E>) -> StoreResult<()> {
        self.write_snapshot(records).inspect_err(|err| {
            error!(
                "event=store_write module=store status=error kind={} path={} error={}",
                E::KIND,
                self.path.display(),
                err
            );
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

struct ParsedDocument {
    root: String,
    records: Vec<RecordFields>,
}

fn parse_document(text: &str, element: &str) -> Result<ParsedDocument, String> {
    let mut reader = Reader::from_str(text);

    let mut root: Option<String> = None;
    let mut records = Vec::new();
    let mut depth = 0usize;
    let mut current: Option<RecordFields> = None;
    let mut child: Option<String> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => return Err(format!("at byte {}: {err}", reader.buffer_position())),
        };

        match event {
            Event::Start(start) => {
                let name = element_name(&start)?;
                match depth {
                    0 => set_root(&mut root, name)?,
                    1 if name == element => current = Some(read_attributes(&start)?),
                    2 => {
                        if let Some(fields) = current.as_mut() {
                            fields.insert(name.clone(), String::new());
                            child = Some(name);
                        }
                    }
                    _ => {}
                }
                depth += 1;
            }
            Event::Empty(start) => {
                let name = element_name(&start)?;
                match depth {
                    0 => set_root(&mut root, name)?,
                    1 if name == element => records.push(read_attributes(&start)?),
                    2 => {
                        if let Some(fields) = current.as_mut() {
                            fields.insert(name, String::new());
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(content) => {
                if content.iter().all(u8::is_ascii_whitespace) {
                    continue;
                }
                if depth == 0 {
                    return Err("text outside the root element".to_string());
                }
                if depth == 3 {
                    if let (Some(fields), Some(name)) = (current.as_mut(), child.as_ref()) {
                        let value = content.unescape().map_err(|err| err.to_string())?;
                        fields.append(name, &value);
                    }
                }
            }
            Event::CData(content) => {
                if depth == 3 {
                    if let (Some(fields), Some(name)) = (current.as_mut(), child.as_ref()) {
                        let value = std::str::from_utf8(&content).map_err(|err| err.to_string())?;
                        fields.append(name, value);
                    }
                }
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unexpected closing tag".to_string())?;
                match depth {
                    1 => {
                        if let Some(fields) = current.take() {
                            records.push(fields);
                        }
                    }
                    2 => child = None,
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err("unexpected end of document: unclosed element".to_string());
    }
    let root = root.ok_or_else(|| "missing root element".to_string())?;
    Ok(ParsedDocument { root, records })
}

fn set_root(root: &mut Option<String>, name: String) -> Result<(), String> {
    if let Some(existing) = root {
        return Err(format!("second root element `{name}` after `{existing}`"));
    }
    *root = Some(name);
    Ok(())
}

fn element_name(start: &BytesStart<'_>) -> Result<String, String> {
    std::str::from_utf8(start.name().as_ref())
        .map(str::to_string)
        .map_err(|err| format!("element name is not UTF-8: {err}"))
}

fn read_attributes(start: &BytesStart<'_>) -> Result<RecordFields, String> {
    let mut fields = RecordFields::default();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| err.to_string())?;
        let name = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|err| format!("attribute name is not UTF-8: {err}"))?
            .to_string();
        let value = attribute.unescape_value().map_err(|err| err.to_string())?;
        fields.insert(name, value.into_owned());
    }
    Ok(fields)
}

fn render_document<E: XmlRecord>(root: &str, records: &Snapshot<E>) -> quick_xml::Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;
    writer.write_event(Event::Start(BytesStart::new(root)))?;
    for record in records.values() {
        let fields = record.to_fields();
        let element = BytesStart::new(E::ELEMENT)
            .with_attributes(fields.iter().map(|(name, value)| (*name, value.as_str())));
        writer.write_event(Event::Empty(element))?;
    }
    writer.write_event(Event::End(BytesEnd::new(root)))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::{parse_document, render_document, RecordFields};
    use crate::model::student::Student;
    use crate::store::Snapshot;

    #[test]
    fn parses_attribute_and_child_element_records() {
        let text = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<Entitati>
  <student id="1" name="IONEL" group="935"/>
  <student id="2">
    <name>Ana &amp; Maria</name>
    <group>936</group>
  </student>
  <note>ignored</note>
</Entitati>"#;

        let document = parse_document(text, "student").expect("document should parse");
        assert_eq!(document.root, "Entitati");
        assert_eq!(document.records.len(), 2);
        assert_eq!(document.records[1].text("name").as_deref(), Ok("Ana & Maria"));
        assert_eq!(document.records[1].parse::<i32>("group"), Ok(936));
    }

    #[test]
    fn child_element_values_keep_surrounding_spaces() {
        let text = r#"<entities>
  <student id="1" name="  Ana  " group="935"/>
  <student id="2">
    <name>  Ana  </name>
    <group>936</group>
  </student>
</entities>"#;

        let document = parse_document(text, "student").expect("document should parse");
        assert_eq!(document.records[0].text("name").as_deref(), Ok("  Ana  "));
        assert_eq!(document.records[1].text("name").as_deref(), Ok("  Ana  "));
    }

    #[test]
    fn rejects_unclosed_root() {
        let result = parse_document("<entities><student id=\"1\"/>", "student");
        assert!(result.is_err(), "unclosed root must fail");
    }

    #[test]
    fn missing_field_reports_its_name() {
        let fields = RecordFields::default();
        let err = fields.parse::<i32>("group").unwrap_err();
        assert_eq!(err, "missing field `group`");
    }

    #[test]
    fn render_escapes_attribute_values() {
        let mut records = Snapshot::<Student>::new();
        let student = Student::new("1", "A \"quoted\" <name>", 935);
        records.insert(student.id.clone(), student);

        let bytes = render_document("entities", &records).expect("render should succeed");
        let text = String::from_utf8(bytes).expect("output should be UTF-8");
        assert!(text.contains("&quot;quoted&quot;"));
        assert!(text.contains("&lt;name&gt;"));

        let document = parse_document(&text, "student").expect("rendered output should parse");
        assert_eq!(
            document.records[0].text("name").as_deref(),
            Ok("A \"quoted\" <name>")
        );
    }
}
