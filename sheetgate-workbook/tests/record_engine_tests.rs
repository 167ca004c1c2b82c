use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use sheetgate_workbook::{
    RecordEngine, RecordFilter, RecordInput, Sheet, Spreadsheet, WorkbookError, WorkbookStore,
    DATA_HEADERS,
};

const SHEET_ID: &str = "1AbCdEfGhIjKlMnOpQrStUvWxYz_0123456789";
const ADMIN: &str = "admin@example.com";

fn setup() -> (Spreadsheet, Sheet, RecordEngine) {
    let store = WorkbookStore::open_in_memory().unwrap();
    let spreadsheet = store.create_spreadsheet(SHEET_ID, "Records").unwrap();
    let sheet = spreadsheet.insert_sheet("Data").unwrap();
    let headers: Vec<Value> = DATA_HEADERS.iter().map(|h| Value::from(*h)).collect();
    sheet.append_row(&headers).unwrap();
    let engine = RecordEngine::new(spreadsheet.clone());
    (spreadsheet, sheet, engine)
}

fn input(name: &str, description: &str, category: &str, value: Value) -> RecordInput {
    RecordInput {
        name: Some(name.to_string()),
        description: Some(description.to_string()),
        category: Some(category.to_string()),
        value: Some(value),
        ..Default::default()
    }
}

fn ids(sheet: &Sheet) -> Vec<Value> {
    sheet.values().unwrap().into_iter().skip(1).map(|row| row[0].clone()).collect()
}

fn names(engine: &RecordEngine, filter: &RecordFilter) -> Vec<String> {
    engine
        .list(filter)
        .unwrap()
        .records
        .iter()
        .map(|r| r.text("Name"))
        .collect()
}

// ── Create ───────────────────────────────────────────────────────

#[test]
fn first_records_get_ids_one_and_two() {
    let (_, sheet, engine) = setup();

    let first = engine
        .create(&input("Server A", "Primary host", "Infrastructure", json!(100)), ADMIN)
        .unwrap();
    let second = engine
        .create(&input("Laptop", "Dev machine", "Hardware", json!(50)), ADMIN)
        .unwrap();

    assert_eq!(first, 1);
    assert_eq!(second, 2);
    assert_eq!(ids(&sheet), vec![json!(1), json!(2)]);

    let row = sheet.row_values(2).unwrap();
    assert_eq!(row[1], json!("Server A"));
    assert_eq!(row[4], json!(100));
    assert_eq!(row[6], json!(ADMIN));
    assert!(!row[5].as_str().unwrap_or_default().is_empty());
}

#[test]
fn create_provisions_header_on_empty_sheet() {
    let store = WorkbookStore::open_in_memory().unwrap();
    let spreadsheet = store.create_spreadsheet(SHEET_ID, "Records").unwrap();
    let sheet = spreadsheet.insert_sheet("Data").unwrap();
    let engine = RecordEngine::new(spreadsheet);

    let id = engine.create(&input("Only", "", "Misc", json!("")), ADMIN).unwrap();
    assert_eq!(id, 1);

    let header: Vec<String> = sheet
        .row_values(1)
        .unwrap()
        .iter()
        .map(sheetgate_workbook::cell_text)
        .collect();
    assert_eq!(header, DATA_HEADERS.to_vec());
    assert_eq!(sheet.last_row().unwrap(), 2);
}

#[test]
fn create_without_data_sheet_fails() {
    let store = WorkbookStore::open_in_memory().unwrap();
    let spreadsheet = store.create_spreadsheet(SHEET_ID, "Records").unwrap();
    let engine = RecordEngine::new(spreadsheet);

    let err = engine.create(&RecordInput::default(), ADMIN).unwrap_err();
    assert!(matches!(err, WorkbookError::SheetNotFound(_)));
    assert_eq!(err.to_string(), "Data sheet not found");
}

// ── Update ───────────────────────────────────────────────────────

#[test]
fn update_replaces_full_row() {
    let (_, sheet, engine) = setup();
    engine
        .create(&input("Server A", "Primary host", "Infrastructure", json!(100)), ADMIN)
        .unwrap();

    let edit = RecordInput {
        id: Some(json!(1)),
        name: Some("Server A2".to_string()),
        description: None,
        category: Some("Infrastructure".to_string()),
        value: Some(json!(150)),
        created_date: Some(json!("2024-01-01")),
        modified_by: None,
    };
    engine.update(2, &edit, "editor@example.com").unwrap();

    assert_eq!(
        sheet.row_values(2).unwrap(),
        vec![
            json!(1),
            json!("Server A2"),
            json!(""),
            json!("Infrastructure"),
            json!(150),
            json!("2024-01-01"),
            json!("editor@example.com"),
        ]
    );
}

#[test]
fn update_prefers_explicit_modified_by() {
    let (_, sheet, engine) = setup();
    engine.create(&input("A", "", "X", json!(1)), ADMIN).unwrap();

    let edit = RecordInput {
        name: Some("A".to_string()),
        modified_by: Some("someone@example.com".to_string()),
        ..Default::default()
    };
    engine.update(2, &edit, ADMIN).unwrap();
    assert_eq!(sheet.row_values(2).unwrap()[6], json!("someone@example.com"));
}

#[test]
fn update_rejects_header_and_missing_rows() {
    let (_, _, engine) = setup();
    engine.create(&input("A", "", "X", json!(1)), ADMIN).unwrap();

    assert!(matches!(
        engine.update(1, &RecordInput::default(), ADMIN),
        Err(WorkbookError::InvalidRow(_))
    ));
    assert!(matches!(
        engine.update(9, &RecordInput::default(), ADMIN),
        Err(WorkbookError::RowNotFound(9))
    ));
}

#[test]
fn update_renumbers_ids() {
    let (_, sheet, engine) = setup();
    engine.create(&input("A", "", "X", json!(1)), ADMIN).unwrap();
    engine.create(&input("B", "", "X", json!(2)), ADMIN).unwrap();

    let edit = RecordInput {
        id: Some(json!(99)),
        name: Some("B".to_string()),
        ..Default::default()
    };
    engine.update(3, &edit, ADMIN).unwrap();
    assert_eq!(ids(&sheet), vec![json!(1), json!(2)]);
}

// ── Delete ───────────────────────────────────────────────────────

#[test]
fn delete_unsorted_rows_removes_the_right_records() {
    let (_, sheet, engine) = setup();
    for name in ["A", "B", "C"] {
        engine.create(&input(name, "", "X", json!(0)), ADMIN).unwrap();
    }

    assert_eq!(engine.delete(&[3, 2]).unwrap(), 2);

    assert_eq!(names(&engine, &RecordFilter::default()), vec!["C"]);
    assert_eq!(ids(&sheet), vec![json!(1)]);
}

#[test]
fn delete_ignores_duplicate_rows() {
    let (_, _, engine) = setup();
    for name in ["A", "B", "C"] {
        engine.create(&input(name, "", "X", json!(0)), ADMIN).unwrap();
    }

    assert_eq!(engine.delete(&[3, 3]).unwrap(), 1);
    assert_eq!(names(&engine, &RecordFilter::default()), vec!["A", "C"]);
}

#[test]
fn delete_validates_before_removing_anything() {
    let (_, _, engine) = setup();
    engine.create(&input("A", "", "X", json!(0)), ADMIN).unwrap();

    assert!(matches!(engine.delete(&[2, 7]), Err(WorkbookError::RowNotFound(7))));
    assert!(matches!(engine.delete(&[1]), Err(WorkbookError::InvalidRow(_))));
    assert!(matches!(engine.delete(&[]), Err(WorkbookError::InvalidRow(_))));
    assert_eq!(names(&engine, &RecordFilter::default()), vec!["A"]);
}

// ── Compaction ───────────────────────────────────────────────────

#[test]
fn compaction_drops_blank_rows_and_renumbers() {
    let (_, sheet, engine) = setup();
    sheet.append_row(&[json!(7), json!("A")]).unwrap();
    sheet.append_row(&[json!(""), json!(" ")]).unwrap();
    sheet.set_row_values(3, &[json!(""), json!("")]).unwrap();
    sheet.set_row_values(4, &[json!(42), json!("B")]).unwrap();

    let report = engine.compact("Data").unwrap();
    assert_eq!(report.removed_rows, 1);
    assert_eq!(report.renumbered_rows, 2);
    assert_eq!(ids(&sheet), vec![json!(1), json!(2)]);
    assert_eq!(names(&engine, &RecordFilter::default()), vec!["A", "B"]);
}

#[test]
fn compaction_of_missing_sheet_is_a_no_op() {
    let (_, _, engine) = setup();
    let report = engine.compact("Archive").unwrap();
    assert_eq!(report.removed_rows, 0);
    assert_eq!(report.renumbered_rows, 0);
}

#[test]
fn deleting_the_first_of_many_rows_renumbers_all() {
    let (_, sheet, engine) = setup();
    for i in 1..=250 {
        sheet.append_row(&[json!(i), json!(format!("R{i}"))]).unwrap();
    }

    engine.delete(&[2]).unwrap();

    let expected: Vec<Value> = (1..=249).map(|i| json!(i)).collect();
    assert_eq!(ids(&sheet), expected);
    assert_eq!(sheet.row_values(2).unwrap()[1], json!("R2"));
}

#[test]
fn ids_stay_dense_across_mixed_mutations() {
    let (_, sheet, engine) = setup();
    for i in 0..5 {
        engine.create(&input(&format!("R{i}"), "", "X", json!(i)), ADMIN).unwrap();
    }
    engine.delete(&[4]).unwrap();
    engine.create(&input("R5", "", "X", json!(5)), ADMIN).unwrap();
    engine.delete(&[2, 6]).unwrap();

    let expected: Vec<Value> = (1..=3).map(|i| json!(i)).collect();
    assert_eq!(ids(&sheet), expected);
}

// ── List ─────────────────────────────────────────────────────────

fn seed(engine: &RecordEngine) {
    engine
        .create(&input("Server A", "Primary host", "Infrastructure", json!(100)), ADMIN)
        .unwrap();
    engine
        .create(&input("Laptop", "Dev machine", "Hardware", json!(50)), ADMIN)
        .unwrap();
    engine
        .create(&input("Backup", "Offsite server copy", " Infrastructure ", json!(10)), ADMIN)
        .unwrap();
}

#[test]
fn list_all_returns_every_record_with_row_locators() {
    let (_, _, engine) = setup();
    seed(&engine);

    let list = engine.list(&RecordFilter::default()).unwrap();
    let rows: Vec<usize> = list.records.iter().map(|r| r.sheet_row).collect();
    assert_eq!(rows, vec![2, 3, 4]);
    assert_eq!(list.categories, vec!["Hardware", "Infrastructure"]);
}

#[test]
fn list_filters_by_exact_category() {
    let (_, _, engine) = setup();
    seed(&engine);

    assert_eq!(
        names(&engine, &RecordFilter::category("Infrastructure")),
        vec!["Server A"]
    );
    assert!(names(&engine, &RecordFilter::category("infrastructure")).is_empty());
}

#[test]
fn list_keyword_matches_name_or_description_case_insensitively() {
    let (_, _, engine) = setup();
    seed(&engine);

    assert_eq!(
        names(&engine, &RecordFilter::search("SERVER")),
        vec!["Server A", "Backup"]
    );
    assert_eq!(
        names(&engine, &RecordFilter::new("Hardware", "dev")),
        vec!["Laptop"]
    );
    assert!(names(&engine, &RecordFilter::search("nothing")).is_empty());
}

#[test]
fn list_reads_reordered_headers() {
    let store = WorkbookStore::open_in_memory().unwrap();
    let spreadsheet = store.create_spreadsheet(SHEET_ID, "Records").unwrap();
    let sheet = spreadsheet.insert_sheet("Data").unwrap();
    sheet
        .append_row(&[json!("Category"), json!("ID"), json!(""), json!("Name")])
        .unwrap();
    sheet
        .append_row(&[json!("Tools"), json!(1), json!("ignored"), json!("Hammer")])
        .unwrap();
    let engine = RecordEngine::new(spreadsheet);

    let list = engine.list(&RecordFilter::category("Tools")).unwrap();
    assert_eq!(list.records.len(), 1);
    let record = &list.records[0];
    assert_eq!(record.text("Name"), "Hammer");
    assert_eq!(record.text("ID"), "1");
    assert_eq!(record.fields.len(), 3);
}

#[test]
fn list_on_empty_sheet_is_empty() {
    let store = WorkbookStore::open_in_memory().unwrap();
    let spreadsheet = store.create_spreadsheet(SHEET_ID, "Records").unwrap();
    spreadsheet.insert_sheet("Data").unwrap();
    let engine = RecordEngine::new(spreadsheet);

    let list = engine.list(&RecordFilter::default()).unwrap();
    assert!(list.records.is_empty());
    assert!(list.categories.is_empty());
}

#[test]
fn record_serializes_with_sheet_row_and_headers() {
    let (_, _, engine) = setup();
    engine.create(&input("A", "d", "X", json!(3)), ADMIN).unwrap();

    let record = engine.list(&RecordFilter::default()).unwrap().records.remove(0);
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["sheetRow"], json!(2));
    assert_eq!(json["Name"], json!("A"));
    assert_eq!(json["Value"], json!(3));
}

// ── Export ───────────────────────────────────────────────────────

#[test]
fn export_renders_header_and_quotes_commas() {
    let (_, _, engine) = setup();
    engine
        .create(&input("Widget", "Small, blue", "Parts", json!(5)), ADMIN)
        .unwrap();

    let export = engine.export_csv(&RecordFilter::default()).unwrap();
    assert!(export.success);
    assert!(export.filename.starts_with("data_export_"));
    assert!(export.filename.ends_with(".csv"));

    let mut lines = export.content.lines();
    assert_eq!(lines.next(), Some(DATA_HEADERS.join(",").as_str()));
    let row = lines.next().unwrap();
    assert!(row.starts_with("1,Widget,\"Small, blue\",Parts,5,"));
    assert!(row.ends_with(ADMIN));
    assert_eq!(lines.next(), None);
}

#[test]
fn export_honours_filter() {
    let (_, _, engine) = setup();
    seed(&engine);

    let export = engine.export_csv(&RecordFilter::category("Hardware")).unwrap();
    assert_eq!(export.content.lines().count(), 2);
    assert!(export.content.contains("Laptop"));
}

#[test]
fn export_with_no_matches_is_no_data() {
    let (_, _, engine) = setup();
    seed(&engine);

    let err = engine.export_csv(&RecordFilter::category("Nope")).unwrap_err();
    assert!(matches!(err, WorkbookError::NoData));
    assert_eq!(err.to_string(), "No data to export");
}
