/*!
 * Tests for workbook reading, writing and grid operations
 */

use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use zip::{ZipArchive, ZipWriter};
use zip::write::SimpleFileOptions;
use xlsx_translator::spreadsheet::{
    CellValue, apply_translations, build_output, derive_output_name, extract_unique_texts,
    read_workbook, write_workbook,
};
use crate::common;

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
    r#"<Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
    r#"<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#,
    r#"</Types>"#,
);

const ROOT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    r#"</Relationships>"#,
);

// Sheet order in the workbook differs from part numbering on purpose
const WORKBOOK: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    r#"<sheets><sheet name="Выписка" sheetId="2" r:id="rId2"/><sheet name="Итоги" sheetId="1" r:id="rId1"/></sheets>"#,
    r#"</workbook>"#,
);

const WORKBOOK_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet2.xml"/>"#,
    r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
    r#"</Relationships>"#,
);

const SHARED_STRINGS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="3" uniqueCount="3">"#,
    r#"<si><t>Commission</t></si><si><t>Payment order 9</t></si><si><t>Итого</t></si>"#,
    r#"</sst>"#,
);

// First sheet: data starts at B3 with two blank leading rows
const STATEMENT_SHEET: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    r#"<dimension ref="B3:C4"/>"#,
    r#"<cols><col min="2" max="2" width="40" customWidth="1"/></cols>"#,
    r#"<sheetData>"#,
    r#"<row r="3" ht="22.5" customHeight="1"><c r="B3" t="s"><v>0</v></c><c r="C3"><v>150</v></c></row>"#,
    r#"<row r="4"><c r="B4" t="s"><v>1</v></c><c r="C4" t="b"><v>1</v></c></row>"#,
    r#"</sheetData></worksheet>"#,
);

const TOTALS_SHEET: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    r#"<dimension ref="A1"/>"#,
    r#"<sheetData><row r="1"><c r="A1" t="s"><v>2</v></c></row></sheetData></worksheet>"#,
);

// Formula and custom-styled cells on the first sheet
const FORMULA_SHEET: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    r#"<dimension ref="A1:B2"/>"#,
    r#"<sheetData>"#,
    r#"<row r="1"><c r="A1" s="3" t="s"><v>0</v></c><c r="B1" s="3"><v>100</v></c></row>"#,
    r#"<row r="2"><c r="A2" t="s"><v>1</v></c><c r="B2"><f>B1*2</f><v>200</v></c></row>"#,
    r#"</sheetData></worksheet>"#,
);

/// Package an xlsx document as a spreadsheet application would
fn foreign_workbook_bytes() -> Vec<u8> {
    package_with_first_sheet(STATEMENT_SHEET)
}

fn package_with_first_sheet(first_sheet: &str) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("xl/workbook.xml", WORKBOOK),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
        ("xl/sharedStrings.xml", SHARED_STRINGS),
        ("xl/worksheets/sheet1.xml", TOTALS_SHEET),
        ("xl/worksheets/sheet2.xml", first_sheet),
    ];
    for (name, content) in parts {
        zip.start_file(name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// The first sheet in workbook order is read with its offset and layout
#[test]
fn test_readWorkbook_withForeignPackage_shouldReadFirstSheetInOrder() {
    let workbook = read_workbook(&foreign_workbook_bytes()).unwrap();

    assert_eq!(workbook.sheets.len(), 1);
    let sheet = workbook.first_sheet().unwrap();
    assert_eq!(sheet.name, "Выписка");
    assert_eq!(sheet.origin, (2, 1));
    assert_eq!(sheet.layout.range.unwrap().to_string(), "B3:C4");

    assert_eq!(sheet.grid[0][0], common::text("Commission"));
    assert_eq!(sheet.grid[0][1], CellValue::Number(150.0));
    assert_eq!(sheet.grid[1][0], common::text("Payment order 9"));
    assert_eq!(sheet.grid[1][1], CellValue::Boolean(true));

    let columns = sheet.layout.columns.as_ref().unwrap();
    assert_eq!(columns[0].min, 2);
    assert_eq!(columns[0].width, Some(40.0));
    let rows = sheet.layout.rows.as_ref().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].index, 3);
    assert_eq!(rows[0].height, Some(22.5));
}

/// Translating and rewriting keeps the cells where they were
#[test]
fn test_translateAndWrite_withOffsetSheet_shouldKeepPositions() {
    let workbook = read_workbook(&foreign_workbook_bytes()).unwrap();
    let sheet = workbook.first_sheet().unwrap();

    let texts = extract_unique_texts(&sheet.grid);
    assert_eq!(texts.len(), 2);

    let translations = HashMap::from([
        ("Commission".to_string(), "Комиссия".to_string()),
        ("Payment order 9".to_string(), "Платежное поручение 9".to_string()),
    ]);
    let grid = apply_translations(&sheet.grid, &translations);
    let output = build_output(&workbook, &sheet.name, grid);

    let reread = read_workbook(&write_workbook(&output).unwrap()).unwrap();
    let translated = reread.first_sheet().unwrap();

    assert_eq!(translated.origin, (2, 1));
    assert_eq!(translated.layout, sheet.layout);
    assert_eq!(translated.grid[0][0], common::text("Комиссия"));
    assert_eq!(translated.grid[1][0], common::text("Платежное поручение 9"));
    assert_eq!(translated.grid[0][1], CellValue::Number(150.0));
}

/// Only cached values survive: formulas and custom styles are dropped
#[test]
fn test_translateAndWrite_withFormulaAndStyledCells_shouldKeepCachedValuesOnly() {
    let workbook = read_workbook(&package_with_first_sheet(FORMULA_SHEET)).unwrap();
    let sheet = workbook.first_sheet().unwrap();
    assert_eq!(sheet.grid[1][1], CellValue::Number(200.0));

    let translations = HashMap::from([("Commission".to_string(), "Комиссия".to_string())]);
    let grid = apply_translations(&sheet.grid, &translations);
    let bytes = write_workbook(&build_output(&workbook, &sheet.name, grid)).unwrap();

    let mut archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
    let mut sheet_xml = String::new();
    archive
        .by_name("xl/worksheets/sheet1.xml")
        .unwrap()
        .read_to_string(&mut sheet_xml)
        .unwrap();
    assert!(!sheet_xml.contains("<f>"));
    assert!(!sheet_xml.contains(r#"s="3""#));
    assert!(sheet_xml.contains("<v>200</v>"));

    let reread = read_workbook(&bytes).unwrap();
    let translated = reread.first_sheet().unwrap();
    assert_eq!(translated.grid[0][0], common::text("Комиссия"));
    assert_eq!(translated.grid[0][1], CellValue::Number(100.0));
    assert_eq!(translated.grid[1][1], CellValue::Number(200.0));
}

/// Garbage input is rejected
#[test]
fn test_readWorkbook_withNonZipBytes_shouldFail() {
    assert!(read_workbook(b"PK\x03\x04 but not really").is_err());
    assert!(read_workbook(&[]).is_err());
}

/// Output names always end with the Russian marker
#[test]
fn test_deriveOutputName_shouldReplaceExtension() {
    assert_eq!(derive_output_name("statement.xlsx"), "statement на русском.xlsx");
    assert_eq!(derive_output_name("Q1.report.XLSX"), "Q1.report на русском.xlsx");
    assert_eq!(derive_output_name("noext"), "noext на русском.xlsx");
}
