mod common;

use std::fs;

use common::{create_test_store, level};
use mastery_core::{import_file, ImportError, SkipReason};
use rust_xlsxwriter::Workbook;

#[test]
fn csv_import_skips_row_with_empty_target() {
    let (dir, store) = create_test_store();
    let path = dir.path().join("words.csv");
    fs::write(&path, "apple,تفاحة\nbook,\ncat,قطة\n").unwrap();

    let report = import_file(&store, &path, level(1)).unwrap();
    assert_eq!(report.inserted, 2);
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.skipped[0].row, 2);
    assert_eq!(report.skipped[0].reason, SkipReason::EmptyTarget);

    let words = store.get_words_by_level(level(1)).unwrap();
    let sources: Vec<_> = words.iter().map(|w| w.source_text.as_str()).collect();
    assert_eq!(sources, ["apple", "cat"]);
}

#[test]
fn csv_import_honours_header_and_level_column() {
    let (dir, store) = create_test_store();
    let path = dir.path().join("levels.CSV");
    fs::write(
        &path,
        "Level,English,Arabic\n2,ask,يسأل\n5,stand,يقف\n8,bad,سيء\n,fallback,احتياط\n",
    )
    .unwrap();

    let report = import_file(&store, &path, level(3)).unwrap();
    assert_eq!(report.inserted, 3);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].row, 4);
    assert_eq!(report.skipped[0].reason, SkipReason::InvalidLevel("8".into()));

    let counts = store.get_word_count_by_level().unwrap();
    assert_eq!(counts.get(&2), Some(&1));
    assert_eq!(counts.get(&3), Some(&1));
    assert_eq!(counts.get(&5), Some(&1));
}

#[test]
fn missing_file_is_an_open_error() {
    let (dir, store) = create_test_store();
    let err = import_file(&store, &dir.path().join("absent.xlsx"), level(1)).unwrap_err();
    assert!(matches!(err, ImportError::Open(_)));
    assert_eq!(store.count_words().unwrap(), 0);
}

#[test]
fn csv_import_skips_line_with_invalid_utf8() {
    let (dir, store) = create_test_store();
    let path = dir.path().join("mixed.csv");
    fs::write(&path, b"apple,x\nbad\xff\xfe,y\ncat,z\n").unwrap();

    let report = import_file(&store, &path, level(1)).unwrap();
    assert_eq!(report.inserted, 2);
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.skipped[0].row, 2);
    assert_eq!(report.skipped[0].reason, SkipReason::InvalidEncoding);
    assert_eq!(store.count_words().unwrap(), 2);
}

#[test]
fn xlsx_import_reads_first_sheet() {
    let (dir, store) = create_test_store();
    let path = dir.path().join("words.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Level").unwrap();
    sheet.write_string(0, 1, "English").unwrap();
    sheet.write_string(0, 2, "Arabic").unwrap();
    sheet.write_number(1, 0, 2.0).unwrap();
    sheet.write_string(1, 1, "ask").unwrap();
    sheet.write_string(1, 2, "يسأل").unwrap();
    sheet.write_number(2, 0, 2.0).unwrap();
    sheet.write_string(2, 1, "orphan").unwrap();
    sheet.write_string(3, 1, "stand").unwrap();
    sheet.write_string(3, 2, "يقف").unwrap();
    workbook.save(&path).unwrap();

    let report = import_file(&store, &path, level(4)).unwrap();
    assert_eq!(report.inserted, 2);
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.skipped[0].row, 3);
    assert_eq!(report.skipped[0].reason, SkipReason::EmptyTarget);

    let level_two = store.get_words_by_level(level(2)).unwrap();
    assert_eq!(level_two.len(), 1);
    assert_eq!(level_two[0].source_text, "ask");
    assert_eq!(level_two[0].target_text, "يسأل");

    let level_four = store.get_words_by_level(level(4)).unwrap();
    assert_eq!(level_four.len(), 1);
    assert_eq!(level_four[0].source_text, "stand");
}
