use std::io::{Cursor, Read};

use class_codes_lib::RenderFailurePolicy;
use class_codes_lib::archive::build_archive;
use class_codes_lib::export::render_all;
use class_codes_lib::ExportError;
use code_render::{CodeKind, CodeRenderer};
use roster::records_from_rows;

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

fn roster_rows() -> Vec<Vec<String>> {
    vec![
        row(&["ID", "Name", "Class"]),
        row(&["1001", "Sara Ali", "07/1"]),
        row(&["1002", "Omar: Y", "07/1"]),
        row(&["1003", "Lina", "07/2"]),
        // same id and class as the first row
        row(&["1001", "Sara Ali", "07/1"]),
        // incomplete
        row(&["1004", "", "07/2"]),
    ]
}

#[test]
fn qr_archive_has_one_folder_per_class() {
    let records = records_from_rows(roster_rows());
    assert_eq!(records.len(), 3);

    let renderer = CodeRenderer::new(CodeKind::Qr);
    let (items, skipped) = render_all(&renderer, &records, RenderFailurePolicy::Abort, false).unwrap();
    assert!(skipped.is_empty());

    let bytes = build_archive(&items).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "07-1/",
            "07-1/Omar_ Y - 1002.png",
            "07-1/Sara Ali - 1001.png",
            "07-2/",
            "07-2/Lina - 1003.png",
        ]
    );

    let mut png = Vec::new();
    archive
        .by_name("07-2/Lina - 1003.png")
        .unwrap()
        .read_to_end(&mut png)
        .unwrap();
    assert_eq!(png, items[2].bitmap.png);
    assert_eq!(&png[1..4], b"PNG");
}

#[test]
fn duplicate_display_names_do_not_overwrite() {
    let records = records_from_rows(vec![
        row(&["ID", "Name", "Class"]),
        row(&["7", "Sam", "A"]),
        row(&["7", "Sam", "A "]),
        row(&["7/", "Sam", "A"]),
        row(&["7:", "Sam", "A"]),
    ]);
    // "7/" and "7:" both become "7_" in the file name
    assert_eq!(records.len(), 3);

    let renderer = CodeRenderer::new(CodeKind::Qr);
    let (items, _) = render_all(&renderer, &records, RenderFailurePolicy::Abort, false).unwrap();
    let bytes = build_archive(&items).unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort();
    assert_eq!(
        names,
        vec!["A/", "A/Sam - 7.png", "A/Sam - 7_ (2).png", "A/Sam - 7_.png"]
    );
}

#[test]
fn parallel_rendering_keeps_input_order() {
    let mut rows = vec![row(&["ID", "Name", "Class"])];
    for i in 0..50 {
        rows.push(vec![format!("{i:05}"), format!("Student {i}"), format!("{}", i % 4)]);
    }
    let records = records_from_rows(rows);

    let renderer = CodeRenderer::new(CodeKind::Barcode);
    let (items, _) = render_all(&renderer, &records, RenderFailurePolicy::Abort, true).unwrap();
    let ids: Vec<&str> = items.iter().map(|i| i.record.id.as_str()).collect();
    let expected: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, expected);
}

#[test]
fn unencodable_records_follow_the_failure_policy() {
    let records = records_from_rows(vec![
        row(&["ID", "Name", "Class"]),
        row(&["2001", "Huda", "8"]),
        row(&["٢٠٠٢", "Yusuf", "8"]),
        row(&["2003", "Mona", "8"]),
    ]);
    let renderer = CodeRenderer::new(CodeKind::Barcode);

    let err = render_all(&renderer, &records, RenderFailurePolicy::Abort, false).unwrap_err();
    assert!(matches!(err, ExportError::Render(_)));

    let (items, skipped) = render_all(&renderer, &records, RenderFailurePolicy::Skip, true).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].id, "٢٠٠٢");
}
