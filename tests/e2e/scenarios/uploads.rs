use crate::harness::{fast_context, test_fixtures_dir, FixtureDir};
use tat_core::{Scenario, TatError, Target};

fn upload() -> Target {
    Target::css("#file-upload")
}

#[test]
fn test_select_file_from_bundled_fixtures() {
    let ctx = fast_context().unwrap();
    Scenario::new("select_file")
        .assert_no_value(upload())
        .select_file(upload(), "example.json")
        .assert_file_name(upload(), "example.json")
        .assert_value(upload(), "C:\\fakepath\\example.json")
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_drag_drop_file() {
    let ctx = fast_context().unwrap();
    Scenario::new("drag_drop")
        .drag_file(upload(), "example.json")
        .assert_file_name(upload(), "example.json")
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_alias_resolves_fixture() {
    let ctx = fast_context().unwrap();
    Scenario::new("alias")
        .fixture_alias("example.json", "sampleFile")
        .select_file(upload(), "@sampleFile")
        .assert_file_name(upload(), "example.json")
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_alias_must_be_defined_first() {
    let ctx = fast_context().unwrap();
    let result = Scenario::new("alias_first")
        .select_file(upload(), "@sampleFile")
        .fixture_alias("example.json", "sampleFile")
        .run_with(&ctx)
        .unwrap_err();
    assert_eq!(result.failure_step, Some(0));
    assert!(result.hint.is_some());
}

#[test]
fn test_missing_fixture_fails() {
    let ctx = fast_context().unwrap();
    let result = Scenario::new("missing_fixture")
        .select_file(upload(), "nope.json")
        .run_with(&ctx)
        .unwrap_err();
    assert!(result.error.unwrap().contains("nope.json"));
}

#[test]
fn test_file_metadata_from_custom_root() {
    let dir = FixtureDir::with_files(&[
        ("docs/report.pdf", b"%PDF-1.4 tiny".as_slice()),
        ("photo.png", b"\x89PNG".as_slice()),
    ])
    .unwrap();
    let ctx = fast_context().unwrap().with_fixture_root(dir.path());

    Scenario::new("custom_root")
        .select_file(upload(), "docs/report.pdf")
        .assert_file_name(upload(), "report.pdf")
        .assert_that(|b| {
            let input = b
                .document()
                .by_id("file-upload")
                .ok_or_else(|| TatError::SelectorNotFound("#file-upload".into()))?;
            let file = &b.document().get(input).files[0];
            if file.size == 13 && file.mime_type == "application/pdf" && file.digest.len() == 64 {
                Ok(())
            } else {
                Err(TatError::Custom(format!("unexpected metadata {:?}", file)))
            }
        })
        .drag_file(upload(), "photo.png")
        .assert_file_name(upload(), "photo.png")
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_plain_text_fixture_from_test_dir() {
    let ctx = fast_context()
        .unwrap()
        .with_fixture_root(test_fixtures_dir().join("uploads"));
    Scenario::new("notes")
        .fixture_alias("notes.txt", "notes")
        .select_file(upload(), "@notes")
        .assert_file_name(upload(), "notes.txt")
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_select_file_on_text_input_fails() {
    let ctx = fast_context().unwrap();
    let result = Scenario::new("wrong_input")
        .select_file(Target::css("#firstName"), "example.json")
        .run_with(&ctx)
        .unwrap_err();
    assert!(result.error.unwrap().contains("not a file input"));
}
