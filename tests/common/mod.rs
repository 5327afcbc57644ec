#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Cell payloads a fixture can hold.
#[derive(Clone, Debug)]
pub enum Cell {
    Text(&'static str),
    Number(f64),
    /// Serial date shown with the built-in `m/d/yyyy` format
    Date(f64),
    Bool(bool),
    Error(&'static str),
}

enum SheetBody {
    Cells(BTreeMap<(usize, usize), Cell>),
    Raw(String),
}

/// Builds `.xlsx` packages cell by cell.
pub struct WorkbookBuilder {
    sheets: Vec<(String, SheetBody)>,
}

impl WorkbookBuilder {
    pub fn new() -> Self {
        Self { sheets: Vec::new() }
    }

    pub fn sheet(mut self, name: &str, cells: &[(&str, Cell)]) -> Self {
        let cells = cells
            .iter()
            .map(|(reference, cell)| (parse_reference(reference), cell.clone()))
            .collect();
        self.sheets.push((name.to_owned(), SheetBody::Cells(cells)));
        self
    }

    /// Adds a sheet whose part holds `xml` verbatim.
    pub fn raw_sheet(mut self, name: &str, xml: &str) -> Self {
        self.sheets.push((name.to_owned(), SheetBody::Raw(xml.to_owned())));
        self
    }

    /// Removes a sheet by name, keeping the others in order.
    pub fn without(mut self, name: &str) -> Self {
        self.sheets.retain(|(sheet, _)| sheet != name);
        self
    }

    /// Replaces or clears cells of an existing sheet.
    pub fn edit(mut self, name: &str, cells: &[(&str, Option<Cell>)]) -> Self {
        for (sheet, body) in &mut self.sheets {
            if let (true, SheetBody::Cells(existing)) = (sheet == name, body) {
                for (reference, cell) in cells {
                    let position = parse_reference(reference);
                    match cell {
                        Some(cell) => existing.insert(position, cell.clone()),
                        None => existing.remove(&position),
                    };
                }
            }
        }
        self
    }

    pub fn write(&self, path: &Path) -> PathBuf {
        let file = std::fs::File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        let mut shared = Vec::<String>::new();

        let mut parts = vec![
            ("[Content_Types].xml".to_owned(), content_types(self.sheets.len())),
            ("_rels/.rels".to_owned(), ROOT_RELS.to_owned()),
            ("xl/workbook.xml".to_owned(), self.workbook_xml()),
            ("xl/_rels/workbook.xml.rels".to_owned(), self.workbook_rels()),
            ("xl/styles.xml".to_owned(), STYLES.to_owned()),
        ];
        for (index, (_, body)) in self.sheets.iter().enumerate() {
            let xml = match body {
                SheetBody::Cells(cells) => sheet_xml(cells, &mut shared),
                SheetBody::Raw(xml) => xml.to_owned(),
            };
            parts.push((format!("xl/worksheets/sheet{}.xml", index + 1), xml));
        }
        parts.push(("xl/sharedStrings.xml".to_owned(), shared_strings_xml(&shared)));

        for (name, content) in parts {
            zip.start_file(name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        path.to_owned()
    }

    fn workbook_xml(&self) -> String {
        let sheets: String = self
            .sheets
            .iter()
            .enumerate()
            .map(|(index, (name, _))| {
                format!(r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#, escape(name), index + 1, index + 1)
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><workbookPr/><sheets>{sheets}</sheets></workbook>"#
        )
    }

    fn workbook_rels(&self) -> String {
        let mut relationships: String = (1..=self.sheets.len())
            .map(|index| {
                format!(r#"<Relationship Id="rId{index}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{index}.xml"/>"#)
            })
            .collect();
        relationships.push_str(r#"<Relationship Id="rIdStyles" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#);
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{relationships}</Relationships>"#
        )
    }
}

fn parse_reference(reference: &str) -> (usize, usize) {
    let split = reference.find(|c: char| c.is_ascii_digit()).unwrap();
    let (letters, digits) = reference.split_at(split);
    let col = letters.bytes().fold(0usize, |acc, b| acc * 26 + (b - b'A') as usize + 1) - 1;
    (digits.parse::<usize>().unwrap() - 1, col)
}

fn column_letters(col: usize) -> String {
    let mut col = col + 1;
    let mut letters = Vec::new();
    while col > 0 {
        col -= 1;
        letters.push(b'A' + (col % 26) as u8);
        col /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

fn sheet_xml(cells: &BTreeMap<(usize, usize), Cell>, shared: &mut Vec<String>) -> String {
    let mut rows = String::new();
    let mut current = None;
    for ((row, col), cell) in cells {
        if current != Some(*row) {
            if current.is_some() {
                rows.push_str("</row>");
            }
            rows.push_str(&format!(r#"<row r="{}">"#, row + 1));
            current = Some(*row);
        }
        let reference = format!("{}{}", column_letters(*col), row + 1);
        let xml = match cell {
            Cell::Text(text) => {
                let index = shared.iter().position(|known| known == text).unwrap_or_else(|| {
                    shared.push(text.to_string());
                    shared.len() - 1
                });
                format!(r#"<c r="{reference}" t="s"><v>{index}</v></c>"#)
            }
            Cell::Number(number) => format!(r#"<c r="{reference}"><v>{number}</v></c>"#),
            Cell::Date(serial) => format!(r#"<c r="{reference}" s="1"><v>{serial}</v></c>"#),
            Cell::Bool(flag) => format!(r#"<c r="{reference}" t="b"><v>{}</v></c>"#, u8::from(*flag)),
            Cell::Error(code) => format!(r#"<c r="{reference}" t="e"><v>{}</v></c>"#, escape(code)),
        };
        rows.push_str(&xml);
    }
    if current.is_some() {
        rows.push_str("</row>");
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{rows}</sheetData></worksheet>"#
    )
}

fn shared_strings_xml(shared: &[String]) -> String {
    let items: String = shared
        .iter()
        .map(|text| format!("<si><t>{}</t></si>", escape(text)))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">{items}</sst>"#,
        shared.len()
    )
}

fn content_types(sheets: usize) -> String {
    let overrides: String = (1..=sheets)
        .map(|index| format!(r#"<Override PartName="/xl/worksheets/sheet{index}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>{overrides}</Types>"#
    )
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

/// Style 0 is general, style 1 the built-in short date format.
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/></cellXfs></styleSheet>"#;

/// A complete credit-application workbook.
pub fn template() -> WorkbookBuilder {
    use Cell::*;
    WorkbookBuilder::new()
        .sheet("Kupac", &[
            // basic info, E5:F16
            ("E5", Text("Datum zahteva")),
            ("F5", Date(45352.0)),
            ("E6", Text("Naziv klijenta")),
            ("F6", Text("Mlekara Šabac d.o.o.")),
            ("E7", Text("PIB")),
            ("F7", Number(101234567.0)),
            ("E8", Text("Rejting agencije")),
            ("F8", Error("#N/A")),
            ("E10", Text("Napomena")),
            ("F10", Text("-")),
            ("E11", Text("Izvoznik")),
            ("F11", Bool(true)),
            // turnover, E19:F47
            ("E19", Text("Promet 2022")),
            ("F19", Number(1000.5)),
            ("E21", Text("Promet 2023")),
            ("F21", Number(2000.0)),
            // risk assessment, I10:J19
            ("I10", Text("Rizik")),
            ("J10", Text("Nizak")),
            ("I11", Text("Kolateral")),
            ("J11", Text("-")),
            // creditworthiness, L9:O10 plus label cells L11:M12
            ("L9", Text("Bonitet")),
            ("M9", Text("2022")),
            ("N9", Text("2023")),
            ("O9", Text("2024")),
            ("L10", Text("Ocena")),
            ("M10", Text("A")),
            ("N10", Text("B")),
            ("O10", Text("A")),
            ("L11", Text("Blokade")),
            ("M11", Text("-")),
            ("L12", Text("Limit")),
            ("M12", Number(250000.0)),
            // financial analysis, I27:N48
            ("J27", Number(2022.0)),
            ("K27", Number(2023.0)),
            ("I28", Text("Poslovni prihodi")),
            ("J28", Number(100.0)),
            ("K28", Number(120.25)),
            ("I29", Text("Neto dobitak")),
            ("J29", Error("#DIV/0!")),
            ("K29", Number(7.0)),
            // proposal, E51:F56
            ("E51", Text("Iznos kredita")),
            ("F51", Number(5000000.0)),
            ("E52", Text("Rok")),
            ("F52", Text("36 meseci")),
            // credit history, I53 onwards
            ("I53", Text("Banka")),
            ("J53", Text("Iznos")),
            ("K53", Text("Status")),
            ("I54", Text("Banka Intesa")),
            ("J54", Number(1000000.0)),
            ("K54", Text("aktivan")),
            ("I56", Text("OTP banka")),
            ("J56", Number(250000.0)),
            ("K56", Text("zatvoren")),
        ])
        .sheet("Povezana lica", &[
            ("A1", Text("Naziv")),
            ("B1", Text("PIB")),
            ("C1", Text("Odnos")),
            ("D1", Text("Udeo")),
            ("A2", Text("Farma Mačva d.o.o.")),
            ("B2", Number(109876543.0)),
            ("C2", Text("vlasnik")),
            ("D2", Number(0.51)),
        ])
        .sheet("Sudski sporovi", &[
            ("A1", Text("Sud")),
            ("B1", Text("Iznos spora")),
            ("A2", Text("Privredni sud u Beogradu")),
            ("B2", Number(150000.0)),
        ])
        .sheet("Rezime", &[
            ("B4", Text("Pozicija")),
            ("C4", Text("2022")),
            ("E4", Text("2023")),
            ("B5", Text("Kapital")),
            ("C5", Number(10.0)),
            ("E5", Number(12.5)),
        ])
        .sheet("Istorija blokada", &[
            ("A1", Text("Datum")),
            ("B1", Text("Broj dana")),
            ("A2", Date(44927.0)),
            ("B2", Number(3.0)),
        ])
}

/// In-memory sink for captured log output.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a subscriber that writes plain-text logs into the returned buffer.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.contents())
}
