use agenda_core::db::open_db_in_memory;
use agenda_core::{
    parse_selected_id, AgendaError, AgendaService, Record, RecordId, RecordRepository,
    RecordValidationError, RepoError, RepoResult, SqliteRecordRepository, WriteOutcome,
};
use std::cell::RefCell;
use std::error::Error;

fn render_chain(err: &dyn Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

/// Delegates to SQLite but fails deletes for chosen ids.
struct FailingDeletes<'conn> {
    inner: SqliteRecordRepository<'conn>,
    fail_ids: Vec<RecordId>,
    attempted: RefCell<Vec<RecordId>>,
}

impl RecordRepository for FailingDeletes<'_> {
    fn insert(&self, record: &Record) -> RepoResult<RecordId> {
        self.inner.insert(record)
    }

    fn get_all(&self) -> RepoResult<Vec<Record>> {
        self.inner.get_all()
    }

    fn update(&self, record: &Record) -> RepoResult<WriteOutcome> {
        self.inner.update(record)
    }

    fn delete(&self, record: &Record) -> RepoResult<WriteOutcome> {
        self.attempted.borrow_mut().push(record.id);
        if self.fail_ids.contains(&record.id) {
            return Err(RepoError::InvalidData(format!("injected failure {}", record.id)));
        }
        self.inner.delete(record)
    }
}

#[test]
fn add_update_remove_scenario() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    let created = service.add_contact("Ana Lopez", "612345678").unwrap();
    assert_eq!(created, Record::with_id(1, "Ana Lopez", "612345678"));
    assert_eq!(service.list_contacts().unwrap(), vec![created.clone()]);

    let outcome = service.update_contact("1", "Ana Lopez", "600000000").unwrap();
    assert_eq!(outcome, WriteOutcome::Applied);
    assert_eq!(
        service.list_contacts().unwrap(),
        vec![Record::with_id(1, "Ana Lopez", "600000000")]
    );

    let outcome = service.remove_contact("1").unwrap();
    assert_eq!(outcome, WriteOutcome::Applied);
    assert!(service.list_contacts().unwrap().is_empty());
}

#[test]
fn invalid_input_never_reaches_storage() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    let err = service.add_contact("Al", "612345678").unwrap_err();
    assert!(matches!(
        err,
        AgendaError::Validation(RecordValidationError::NameTooShort)
    ));
    assert!(err.to_string().contains("minimum length"));

    let err = service.add_contact("Ana", "12345").unwrap_err();
    assert!(matches!(
        err,
        AgendaError::Validation(RecordValidationError::NumberWrongLength)
    ));

    assert!(service.list_contacts().unwrap().is_empty());
}

#[test]
fn add_record_replaces_caller_supplied_id() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    let stored = service
        .add_record(Record::with_id(99, "Ana Lopez", "612345678"))
        .unwrap();
    assert_eq!(stored.id, 1);
}

#[test]
fn update_validates_before_checking_selection() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    service.add_contact("Ana Lopez", "612345678").unwrap();

    let err = service.update_contact("", "Al", "612345678").unwrap_err();
    assert!(matches!(err, AgendaError::Validation(_)));

    let err = service.update_contact("", "Ana Lopez", "600000000").unwrap_err();
    assert!(matches!(err, AgendaError::NoSelection(_)));
    assert_eq!(err.to_string(), "no record selected");

    let err = service.update_contact("1", "Ana", "6000").unwrap_err();
    assert!(matches!(err, AgendaError::Validation(_)));
    assert_eq!(
        service.list_contacts().unwrap()[0].number,
        "612345678",
        "rejected update must not touch storage"
    );
}

#[test]
fn update_and_remove_of_missing_id_report_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    let kept = service.add_contact("Ana Lopez", "612345678").unwrap();

    assert_eq!(
        service.update_contact("5", "Luis Perez", "699999999").unwrap(),
        WriteOutcome::NotFound(5)
    );
    assert_eq!(service.remove_contact("5").unwrap(), WriteOutcome::NotFound(5));
    assert_eq!(service.list_contacts().unwrap(), vec![kept]);
}

#[test]
fn remove_requires_a_numeric_selection() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    for raw in ["", "  ", "abc", "-1", "0", "1.5"] {
        let err = service.remove_contact(raw).unwrap_err();
        assert!(
            matches!(err, AgendaError::NoSelection(_)),
            "`{raw}` should be rejected"
        );
    }
}

#[test]
fn parse_selected_id_accepts_padded_positive_integers() {
    assert_eq!(parse_selected_id(" 12 ").unwrap(), 12);
    assert!(parse_selected_id("99999999999999999999").is_err());
}

#[test]
fn remove_all_empties_the_agenda() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    for (name, number) in [("Ana", "612345678"), ("Luis", "699999999"), ("Eva", "600000001")] {
        service.add_contact(name, number).unwrap();
    }

    let report = service.remove_all().unwrap();

    assert_eq!(report.removed, 3);
    assert_eq!(report.not_found, 0);
    assert!(report.is_complete());
    assert!(service.list_contacts().unwrap().is_empty());
}

#[test]
fn remove_all_on_empty_agenda_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    let report = service.remove_all().unwrap();
    assert_eq!(report.removed, 0);
    assert!(report.is_complete());
}

#[test]
fn remove_all_is_best_effort_when_a_row_fails() {
    let conn = open_db_in_memory().unwrap();
    let repo = FailingDeletes {
        inner: SqliteRecordRepository::try_new(&conn).unwrap(),
        fail_ids: vec![2],
        attempted: RefCell::new(Vec::new()),
    };
    let service = AgendaService::new(&repo);
    for (name, number) in [("Ana", "612345678"), ("Luis", "699999999"), ("Eva", "600000001")] {
        service.add_contact(name, number).unwrap();
    }

    let report = service.remove_all().unwrap();

    assert_eq!(*repo.attempted.borrow(), vec![1, 2, 3]);
    assert_eq!(report.removed, 2);
    assert!(!report.is_complete());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, 2);
    assert!(report.failed[0].1.contains("injected failure"));
    assert_eq!(
        service.list_contacts().unwrap(),
        vec![Record::with_id(2, "Luis", "699999999")]
    );
}

#[test]
fn records_serialize_as_flat_key_value_structures() {
    let record = Record::with_id(1, "Ana Lopez", "612345678");

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "id": 1, "name": "Ana Lopez", "number": "612345678" })
    );
}

#[test]
fn error_chain_names_each_cause_once() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    let rejected = service.add_contact("Al", "612345678").unwrap_err();
    assert_eq!(
        render_chain(&rejected),
        "name too short; minimum length is 3 characters"
    );

    conn.execute_batch(
        "CREATE TRIGGER reject_insert BEFORE INSERT ON agenda
         BEGIN SELECT RAISE(ABORT, 'agenda is read-only'); END;",
    )
    .unwrap();
    let failed = service.add_contact("Ana Lopez", "612345678").unwrap_err();
    assert!(matches!(failed, AgendaError::Repo(_)));
    let rendered = render_chain(&failed);
    assert!(rendered.starts_with("agenda is read-only"), "{rendered}");
    assert_eq!(rendered.matches("agenda is read-only").count(), 1, "{rendered}");
}
