use agenda_core::db::open_db_in_memory;
use agenda_core::{
    export_csv, export_csv_file, import_csv, import_csv_file, AgendaService, ImportError, Record,
    SqliteRecordRepository,
};
use std::fs;

#[test]
fn import_inserts_valid_rows_and_reports_invalid_ones() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    let data = "NOMBRE,TELEFONO\n\
                Ana Lopez,612345678\n\
                Al,612345678\n\
                Luis Perez,699999999\n\
                Eva,12345\n";

    let report = import_csv(data.as_bytes(), &service).unwrap();

    assert_eq!(
        report.inserted,
        vec![
            Record::with_id(1, "Ana Lopez", "612345678"),
            Record::with_id(2, "Luis Perez", "699999999"),
        ]
    );
    let rejected_lines: Vec<_> = report.rejected.iter().map(|row| row.line).collect();
    assert_eq!(rejected_lines, vec![3, 5]);
    assert!(report.rejected[0].reason.contains("minimum length"));
    assert!(report.rejected[1].reason.contains("9 digits"));
    assert_eq!(service.list_contacts().unwrap(), report.inserted);
}

#[test]
fn import_tolerates_extra_columns_in_any_order() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    let data = "EMAIL,TELEFONO,NOMBRE\nana@example.com,612345678,Ana Lopez\n";

    let report = import_csv(data.as_bytes(), &service).unwrap();

    assert_eq!(
        report.inserted,
        vec![Record::with_id(1, "Ana Lopez", "612345678")]
    );
}

#[test]
fn header_mismatch_aborts_without_inserting() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    let data = "name,number\nAna Lopez,612345678\n";

    let err = import_csv(data.as_bytes(), &service).unwrap_err();

    match &err {
        ImportError::Format { found } => assert_eq!(found, &vec!["name", "number"]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("NOMBRE,TELEFONO"));
    assert!(service.list_contacts().unwrap().is_empty());
}

#[test]
fn header_names_are_case_sensitive() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    let err = import_csv("Nombre,Telefono\nAna,612345678\n".as_bytes(), &service).unwrap_err();
    assert!(matches!(err, ImportError::Format { .. }));
}

#[test]
fn empty_input_is_a_format_error() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    let err = import_csv("".as_bytes(), &service).unwrap_err();
    assert!(matches!(err, ImportError::Format { .. }));
}

#[test]
fn malformed_row_aborts_before_any_insert() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    let data = "NOMBRE,TELEFONO\nAna Lopez,612345678\nLuis Perez\n";

    let err = import_csv(data.as_bytes(), &service).unwrap_err();

    assert!(matches!(err, ImportError::Csv(_)));
    assert!(service.list_contacts().unwrap().is_empty());
}

#[test]
fn export_writes_header_and_rows() {
    let records = vec![
        Record::with_id(1, "Ana Lopez", "612345678"),
        Record::with_id(3, "Luis Perez", "699999999"),
    ];
    let mut out = Vec::new();

    let written = export_csv(&mut out, &records).unwrap();

    assert_eq!(written, 2);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "id,name,number\n1,Ana Lopez,612345678\n3,Luis Perez,699999999\n"
    );
}

#[test]
fn export_of_empty_agenda_still_writes_header() {
    let mut out = Vec::new();

    assert_eq!(export_csv(&mut out, &[]).unwrap(), 0);
    assert_eq!(String::from_utf8(out).unwrap(), "id,name,number\n");
}

#[test]
fn export_file_overwrites_previous_content() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    service.add_contact("Ana Lopez", "612345678").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output.csv");
    fs::write(&path, "stale content that is longer than the export\n".repeat(10)).unwrap();

    let written = export_csv_file(&path, &service).unwrap();

    assert_eq!(written, 1);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "id,name,number\n1,Ana Lopez,612345678\n"
    );
}

#[test]
fn exported_file_feeds_nothing_back_without_import_headers() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    service.add_contact("Ana Lopez", "612345678").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output.csv");
    export_csv_file(&path, &service).unwrap();

    let err = import_csv_file(&path, &service).unwrap_err();

    assert!(matches!(err, ImportError::Format { .. }));
    assert_eq!(service.list_contacts().unwrap().len(), 1);
}

#[test]
fn import_file_reads_from_disk() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.csv");
    fs::write(&path, "NOMBRE,TELEFONO\nAna Lopez,612345678\n").unwrap();

    let report = import_csv_file(&path, &service).unwrap();
    assert_eq!(report.inserted.len(), 1);
    assert!(report.rejected.is_empty());

    let missing = import_csv_file(dir.path().join("missing.csv"), &service).unwrap_err();
    assert!(matches!(missing, ImportError::Io(_)));
}
