/*!
 * xlsx writing.
 *
 * Emits a minimal SpreadsheetML package: one worksheet part per sheet with
 * inline strings, plus the declared dimension, column widths and row
 * heights from each sheet's layout.
 */

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use log::debug;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::errors::SpreadsheetError;
use crate::spreadsheet::model::{CellValue, RowInfo, Sheet, Workbook, cell_ref};

/// Style index applied to temporal cells (built-in number format 22, `m/d/yy h:mm`)
const TEMPORAL_STYLE: usize = 1;

const RELS_DOT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    r#"</Relationships>"#,
);

const STYLES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    r#"<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>"#,
    r#"<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>"#,
    r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#,
    r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#,
    r#"<cellXfs count="2">"#,
    r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#,
    r#"<xf numFmtId="22" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>"#,
    r#"</cellXfs>"#,
    r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#,
    r#"</styleSheet>"#,
);

fn workbook_xml(sheets: &[Sheet]) -> String {
    let mut entries = String::new();
    for (i, sheet) in sheets.iter().enumerate() {
        let _ = write!(
            entries,
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            xml_escape(&sheet.name),
            i + 1,
            i + 1
        );
    }

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
            r#"<bookViews><workbookView activeTab="0"/></bookViews>"#,
            r#"<sheets>{}</sheets>"#,
            r#"</workbook>"#,
        ),
        entries
    )
}

fn workbook_rels_xml(sheet_count: usize) -> String {
    let mut rels = String::new();
    for i in 1..=sheet_count {
        let _ = write!(
            rels,
            r#"<Relationship Id="rId{i}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{i}.xml"/>"#
        );
    }
    let styles_id = sheet_count + 1;
    let _ = write!(
        rels,
        r#"<Relationship Id="rId{styles_id}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#
    );

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            r#"{}"#,
            r#"</Relationships>"#,
        ),
        rels
    )
}

fn content_types_xml(sheet_count: usize) -> String {
    let mut overrides = String::new();
    for i in 1..=sheet_count {
        let _ = write!(
            overrides,
            r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        );
    }

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
            r#"<Default Extension="xml" ContentType="application/xml"/>"#,
            r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
            r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
            r#"{}"#,
            r#"</Types>"#,
        ),
        overrides
    )
}

pub(crate) fn xml_escape(s: &str) -> String {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn write_cell(out: &mut String, reference: &str, value: &CellValue) {
    let _ = match value {
        CellValue::Empty => Ok(()),
        CellValue::Number(n) => write!(out, r#"<c r="{reference}"><v>{n}</v></c>"#),
        CellValue::Temporal(n) => write!(out, r#"<c r="{reference}" s="{TEMPORAL_STYLE}"><v>{n}</v></c>"#),
        CellValue::Boolean(b) => write!(out, r#"<c r="{reference}" t="b"><v>{}</v></c>"#, u8::from(*b)),
        CellValue::Text(text) => {
            let space = if text.trim() != text { r#" xml:space="preserve""# } else { "" };
            write!(
                out,
                r#"<c r="{reference}" t="inlineStr"><is><t{space}>{}</t></is></c>"#,
                xml_escape(text)
            )
        }
    };
}

fn write_row_open(out: &mut String, index: u32, info: Option<&RowInfo>) {
    let _ = write!(out, r#"<row r="{index}""#);
    if let Some(info) = info {
        if let Some(height) = info.height {
            let _ = write!(out, r#" ht="{height}""#);
        }
        if info.custom_height {
            out.push_str(r#" customHeight="1""#);
        }
        if info.hidden {
            out.push_str(r#" hidden="1""#);
        }
    }
}

/// Serialise one worksheet part
fn sheet_xml(sheet: &Sheet) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    ));

    if let Some(range) = sheet.layout.range.or_else(|| sheet.grid_range()) {
        let _ = write!(out, r#"<dimension ref="{}"/>"#, range);
    }

    if let Some(columns) = sheet.layout.columns.as_ref().filter(|c| !c.is_empty()) {
        out.push_str("<cols>");
        for col in columns {
            let _ = write!(out, r#"<col min="{}" max="{}""#, col.min, col.max);
            if let Some(width) = col.width {
                let _ = write!(out, r#" width="{width}""#);
            }
            if col.custom_width {
                out.push_str(r#" customWidth="1""#);
            }
            if col.hidden {
                out.push_str(r#" hidden="1""#);
            }
            out.push_str("/>");
        }
        out.push_str("</cols>");
    }

    // 1-based row number -> (grid row, row settings)
    let mut rows: BTreeMap<u32, (Option<&Vec<CellValue>>, Option<&RowInfo>)> = BTreeMap::new();
    for (i, row) in sheet.grid.iter().enumerate() {
        if row.iter().any(|c| !c.is_empty()) {
            rows.entry(sheet.origin.0 + i as u32 + 1).or_default().0 = Some(row);
        }
    }
    for info in sheet.layout.rows.iter().flatten() {
        rows.entry(info.index).or_default().1 = Some(info);
    }

    out.push_str("<sheetData>");
    for (index, (cells, info)) in rows {
        write_row_open(&mut out, index, info);
        match cells {
            Some(cells) => {
                out.push('>');
                for (c, value) in cells.iter().enumerate() {
                    write_cell(&mut out, &cell_ref(index - 1, sheet.origin.1 + c as u32), value);
                }
                out.push_str("</row>");
            }
            None => out.push_str("/>"),
        }
    }
    out.push_str("</sheetData></worksheet>");
    out
}

fn zip_write_str<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    path: &str,
    content: &str,
    options: SimpleFileOptions,
) -> Result<(), SpreadsheetError> {
    zip.start_file(path, options)?;
    zip.write_all(content.as_bytes())
        .map_err(|e| SpreadsheetError::Write(format!("'{}': {}", path, e)))
}

/// Serialise a workbook to xlsx bytes
pub fn write_workbook(workbook: &Workbook) -> Result<Vec<u8>, SpreadsheetError> {
    if workbook.sheets.is_empty() {
        return Err(SpreadsheetError::NoSheets);
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let sheet_count = workbook.sheets.len();

    zip_write_str(&mut zip, "[Content_Types].xml", &content_types_xml(sheet_count), options)?;
    zip_write_str(&mut zip, "_rels/.rels", RELS_DOT_RELS, options)?;
    zip_write_str(&mut zip, "xl/workbook.xml", &workbook_xml(&workbook.sheets), options)?;
    zip_write_str(&mut zip, "xl/_rels/workbook.xml.rels", &workbook_rels_xml(sheet_count), options)?;
    zip_write_str(&mut zip, "xl/styles.xml", STYLES_XML, options)?;

    for (i, sheet) in workbook.sheets.iter().enumerate() {
        let path = format!("xl/worksheets/sheet{}.xml", i + 1);
        zip_write_str(&mut zip, &path, &sheet_xml(sheet), options)?;
    }

    let cursor = zip.finish()?;
    let bytes = cursor.into_inner();
    debug!("Wrote workbook with {} sheet(s), {} bytes", sheet_count, bytes.len());
    Ok(bytes)
}

/// Serialise a workbook to an xlsx file
pub fn write_workbook_file(workbook: &Workbook, path: impl AsRef<Path>) -> Result<(), SpreadsheetError> {
    let path = path.as_ref();
    let bytes = write_workbook(workbook)?;
    std::fs::write(path, bytes)
        .map_err(|e| SpreadsheetError::Write(format!("{}: {}", path.display(), e)))
}
