/*!
 * Layout metadata extraction from the xlsx package.
 *
 * The cell reader does not expose column widths, row heights or the declared
 * dimension, so the sheet part is scanned directly with quick-xml.
 */

use std::collections::HashMap;
use std::io::{Read, Seek};

use quick_xml::Reader as XmlReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::events::attributes::Attribute;
use zip::ZipArchive;

use crate::errors::SpreadsheetError;
use crate::spreadsheet::model::{CellRange, ColumnInfo, RowInfo, SheetLayout};

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";

#[inline]
fn attr_val(attr: &Attribute) -> String {
    let raw = std::str::from_utf8(attr.value.as_ref()).unwrap_or("");
    quick_xml::escape::unescape(raw)
        .unwrap_or_default()
        .into_owned()
}

fn xml_error(part: &str, error: impl std::fmt::Display) -> SpreadsheetError {
    SpreadsheetError::Xml {
        part: part.to_string(),
        message: error.to_string(),
    }
}

/// Read a whole package part into memory
pub(crate) fn slurp_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<Vec<u8>, SpreadsheetError> {
    let mut entry = archive
        .by_name(path)
        .map_err(|e| SpreadsheetError::Zip(format!("'{}': {}", path, e)))?;
    let mut buf = Vec::with_capacity(entry.size() as usize);
    std::io::copy(&mut entry, &mut buf)
        .map_err(|e| SpreadsheetError::Zip(format!("'{}': {}", path, e)))?;
    Ok(buf)
}

/// Resolve a relationship target to a package path
fn normalize_path(target: &str) -> String {
    let t = target.trim_start_matches('/');
    if t.starts_with("xl/") {
        t.to_string()
    } else {
        format!("xl/{}", t)
    }
}

/// Name and relationship id of every sheet, in workbook order
fn parse_workbook_sheets(xml_bytes: &[u8]) -> Result<Vec<(String, String)>, SpreadsheetError> {
    let mut xml = XmlReader::from_reader(xml_bytes);
    xml.config_mut().trim_text(true);

    let mut sheets = Vec::new();
    let mut buf = Vec::new();
    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) if e.name().as_ref() == b"sheet" => {
                let (mut name, mut rid) = (String::new(), String::new());
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"name" => name = attr_val(&attr),
                        b"r:id" => rid = attr_val(&attr),
                        _ => {}
                    }
                }
                if !name.is_empty() && !rid.is_empty() {
                    sheets.push((name, rid));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(WORKBOOK_PART, e)),
            _ => {}
        }
        buf.clear();
    }
    Ok(sheets)
}

/// Worksheet relationship id -> part path
fn parse_workbook_rels(xml_bytes: &[u8]) -> Result<HashMap<String, String>, SpreadsheetError> {
    let mut xml = XmlReader::from_reader(xml_bytes);
    xml.config_mut().trim_text(true);

    let mut map = HashMap::new();
    let mut buf = Vec::new();
    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let (mut id, mut target, mut is_sheet) = (String::new(), String::new(), false);
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = attr_val(&attr),
                        b"Target" => target = attr_val(&attr),
                        b"Type" => is_sheet = attr_val(&attr).ends_with("/worksheet"),
                        _ => {}
                    }
                }
                if is_sheet && !id.is_empty() {
                    map.insert(id, normalize_path(&target));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(WORKBOOK_RELS_PART, e)),
            _ => {}
        }
        buf.clear();
    }
    Ok(map)
}

/// Package path of the named sheet's part
pub(crate) fn sheet_part_path<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    sheet_name: &str,
) -> Result<String, SpreadsheetError> {
    let sheets = parse_workbook_sheets(&slurp_entry(archive, WORKBOOK_PART)?)?;
    let rels = parse_workbook_rels(&slurp_entry(archive, WORKBOOK_RELS_PART)?)?;

    sheets
        .into_iter()
        .find(|(name, _)| name == sheet_name)
        .and_then(|(_, rid)| rels.get(&rid).cloned())
        .ok_or_else(|| SpreadsheetError::Read(format!("no worksheet part for sheet '{}'", sheet_name)))
}

fn parse_flag(value: &str) -> bool {
    matches!(value, "1" | "true")
}

fn parse_col(e: &BytesStart) -> Option<ColumnInfo> {
    let mut info = ColumnInfo {
        min: 0,
        max: 0,
        width: None,
        custom_width: false,
        hidden: false,
    };
    for attr in e.attributes().flatten() {
        let value = attr_val(&attr);
        match attr.key.as_ref() {
            b"min" => info.min = value.parse().ok()?,
            b"max" => info.max = value.parse().ok()?,
            b"width" => info.width = value.parse().ok(),
            b"customWidth" => info.custom_width = parse_flag(&value),
            b"hidden" => info.hidden = parse_flag(&value),
            _ => {}
        }
    }
    (info.min > 0 && info.max >= info.min).then_some(info)
}

/// Row settings, only for rows that carry a height or are hidden
fn parse_row(e: &BytesStart) -> Option<RowInfo> {
    let mut info = RowInfo {
        index: 0,
        height: None,
        custom_height: false,
        hidden: false,
    };
    for attr in e.attributes().flatten() {
        let value = attr_val(&attr);
        match attr.key.as_ref() {
            b"r" => info.index = value.parse().ok()?,
            b"ht" => info.height = value.parse().ok(),
            b"customHeight" => info.custom_height = parse_flag(&value),
            b"hidden" => info.hidden = parse_flag(&value),
            _ => {}
        }
    }
    (info.index > 0 && (info.height.is_some() || info.hidden)).then_some(info)
}

/// Extract the dimension, column widths and row heights from a worksheet part
pub fn parse_sheet_layout(xml_bytes: &[u8], part: &str) -> Result<SheetLayout, SpreadsheetError> {
    let mut xml = XmlReader::from_reader(xml_bytes);
    xml.config_mut().trim_text(true);

    let mut layout = SheetLayout::default();
    let mut columns = Vec::new();
    let mut rows = Vec::new();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"dimension" => {
                    layout.range = e
                        .attributes()
                        .flatten()
                        .find(|a| a.key.as_ref() == b"ref")
                        .and_then(|a| CellRange::parse(&attr_val(&a)));
                }
                b"col" => columns.extend(parse_col(e)),
                b"row" => rows.extend(parse_row(e)),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(part, e)),
            _ => {}
        }
        buf.clear();
    }

    if !columns.is_empty() {
        layout.columns = Some(columns);
    }
    if !rows.is_empty() {
        layout.rows = Some(rows);
    }
    Ok(layout)
}

/// Read the layout metadata of the named sheet
pub fn read_sheet_layout<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    sheet_name: &str,
) -> Result<SheetLayout, SpreadsheetError> {
    let part = sheet_part_path(archive, sheet_name)?;
    let bytes = slurp_entry(archive, &part)?;
    parse_sheet_layout(&bytes, &part)
}
