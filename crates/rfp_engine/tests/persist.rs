use std::fs;

use chrono::NaiveDate;
use rfp_engine::{ensure_output_dir, save_brief, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_download_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("downloads");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("doc.md", b"hello").unwrap();
    assert_eq!(first.file_name().unwrap(), "doc.md");
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");

    let second = writer.write("doc.md", b"world").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "world");
}

#[test]
fn no_partial_file_when_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("doc.md", b"data").is_err());
    assert!(!file_path.with_file_name("doc.md").exists());
}

#[test]
fn saved_brief_is_byte_identical() {
    let temp = TempDir::new().unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    let report = "# Brief\r\n\u{1b}[31m<b>émphasis</b>\n\ttabbed\n";

    let path = save_brief(temp.path(), date, report).unwrap();

    assert_eq!(path.file_name().unwrap(), "marketing-brief-2026-10-18.md");
    assert_eq!(fs::read(&path).unwrap(), report.as_bytes());
}
