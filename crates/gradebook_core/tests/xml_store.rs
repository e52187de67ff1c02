use gradebook_core::{
    AcceptAll, Assignment, AssignmentValidator, CrudRepository, Grade, GradeId, GradeValidator,
    RecordStore, RepoError, Repository, StoreError, Student, StudentValidator, XmlFileStore,
};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const LEGACY_EMPTY_DOCUMENT: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n<Entitati>\n</Entitati>";

type StudentRepo = Repository<Student, StudentValidator, XmlFileStore<Student>>;

fn open_students(path: &Path) -> Result<StudentRepo, RepoError> {
    Repository::open(StudentValidator::default(), XmlFileStore::open(path)?)
}

#[test]
fn missing_file_is_initialized_with_empty_root() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.xml");

    let repo = open_students(&path).unwrap();
    assert!(repo.is_empty());

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("<entities>"), "unexpected document: {text}");
    assert!(text.contains("</entities>"), "unexpected document: {text}");
    assert!(!text.contains("<student"));
}

#[test]
fn empty_file_loads_as_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.xml");
    fs::write(&path, "").unwrap();

    let repo = open_students(&path).unwrap();
    assert_eq!(repo.len(), 0);
}

#[test]
fn students_round_trip_through_fresh_repository() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.xml");
    let written = vec![
        Student::new("1", "IONEL", 935),
        Student::new("2", "Ana & <Maria>", 111),
        Student::new("10", "Banel", 937),
    ];

    let mut repo = open_students(&path).unwrap();
    for student in &written {
        repo.save(student.clone()).unwrap();
    }
    drop(repo);

    let reloaded = open_students(&path).unwrap();
    let expected: HashSet<String> = written.iter().map(|s| format!("{s:?}")).collect();
    let actual: HashSet<String> = reloaded.find_all().map(|s| format!("{s:?}")).collect();
    assert_eq!(actual, expected);
}

#[test]
fn grade_composite_key_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grades.xml");

    let mut repo: Repository<Grade, _, _> =
        Repository::open(GradeValidator::default(), XmlFileStore::open(&path).unwrap()).unwrap();
    repo.save(Grade::new("1:a", "1", 8.5, 11, "SLAB")).unwrap();
    repo.save(Grade::new("1", "a:1", 9.0, 10, "")).unwrap();
    drop(repo);

    let reloaded: Repository<Grade, _, _> =
        Repository::open(GradeValidator::default(), XmlFileStore::open(&path).unwrap()).unwrap();
    assert_eq!(reloaded.len(), 2);

    let grade = reloaded
        .find_one(&GradeId::new("1:a".to_string(), "1".to_string()))
        .expect("grade should reload by composite key");
    assert_eq!(grade.value, 8.5);
    assert_eq!(grade.submission_week, 11);
    assert_eq!(grade.feedback, "SLAB");
    assert!(reloaded
        .find_one(&GradeId::new("1".to_string(), "a:1".to_string()))
        .is_some());
}

#[test]
fn grade_written_with_encoded_key_and_loaded_from_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grades.xml");

    let mut repo: Repository<Grade, _, _> =
        Repository::open(GradeValidator::default(), XmlFileStore::open(&path).unwrap()).unwrap();
    repo.save(Grade::new("1:a", "1", 8.5, 11, "SLAB")).unwrap();
    drop(repo);
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains(r#"id="1\:a:1""#), "unexpected document: {text}");

    fs::write(
        &path,
        r#"<entities><grade id="s\:1:lab" value="7" submissionWeek="5"/></entities>"#,
    )
    .unwrap();
    let reloaded: Repository<Grade, _, _> =
        Repository::open(GradeValidator::default(), XmlFileStore::open(&path).unwrap()).unwrap();
    let grade = reloaded
        .find_one(&GradeId::new("s:1".to_string(), "lab".to_string()))
        .expect("grade should load from its encoded key");
    assert_eq!(grade.value, 7.0);
    assert_eq!(grade.feedback, "");
}

#[test]
fn legacy_root_element_is_preserved_on_rewrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("assignments.xml");
    fs::write(&path, LEGACY_EMPTY_DOCUMENT).unwrap();

    let mut repo: Repository<Assignment, _, _> =
        Repository::open(AssignmentValidator::default(), XmlFileStore::open(&path).unwrap())
            .unwrap();
    assert_eq!(repo.store().root_element(), "Entitati");
    repo.save(Assignment::new("1", "DESCRIPTION", 12, 1)).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("<Entitati>"), "unexpected document: {text}");
    assert!(text.contains("deadlineWeek=\"12\""), "unexpected document: {text}");
    assert!(text.contains("startWeek=\"1\""), "unexpected document: {text}");
}

#[test]
fn child_element_records_are_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.xml");
    fs::write(
        &path,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Entitati>
  <student id="7">
    <name>Banel</name>
    <group>936</group>
  </student>
</Entitati>"#,
    )
    .unwrap();

    let repo = open_students(&path).unwrap();
    assert_eq!(
        repo.find_one(&"7".to_string()),
        Some(&Student::new("7", "Banel", 936))
    );
}

#[test]
fn malformed_document_fails_construction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.xml");
    fs::write(&path, "<entities><student id=\"1\" name=\"a\" group=\"935\"></entities>").unwrap();

    let err = open_students(&path).unwrap_err();
    assert!(matches!(err, RepoError::Store(StoreError::Malformed { .. })));
}

#[test]
fn unparsable_field_fails_construction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.xml");
    fs::write(
        &path,
        "<entities><student id=\"1\" name=\"a\" group=\"nine\"/></entities>",
    )
    .unwrap();

    let err = open_students(&path).unwrap_err();
    match err {
        RepoError::Store(StoreError::InvalidRecord {
            element, message, ..
        }) => {
            assert_eq!(element, "student");
            assert!(message.contains("group"), "unexpected message: {message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_persisted_record_fails_construction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.xml");
    fs::write(
        &path,
        "<entities><student id=\"1\" name=\"a\" group=\"5\"/></entities>",
    )
    .unwrap();

    assert!(matches!(
        open_students(&path).unwrap_err(),
        RepoError::InvalidData(_)
    ));

    let lenient = Repository::open(AcceptAll, XmlFileStore::<Student>::open(&path).unwrap());
    assert_eq!(lenient.unwrap().len(), 1);
}

#[test]
fn persist_rewrites_whole_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.xml");

    let mut repo = open_students(&path).unwrap();
    repo.save(Student::new("1", "a", 935)).unwrap();
    repo.save(Student::new("2", "b", 935)).unwrap();
    repo.delete(&"1".to_string()).unwrap();

    let mut store = XmlFileStore::<Student>::open(&path).unwrap();
    let stored = store.load().unwrap();
    assert_eq!(stored, vec![Student::new("2", "b", 935)]);
}

#[test]
fn unwritable_location_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("students.xml");

    let err = XmlFileStore::<Student>::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
}
