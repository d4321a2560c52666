//! Document exporter: renders the ledger into the printable text layout and
//! assembles it into a PDF.
//!
//! Rendering and assembly are split so the layout is testable without
//! touching a file: [`render_document`] is a pure function of the ledger and
//! a timestamp line, and [`write_pdf`] captures the timestamp at export time
//! (not at entry-creation time), paginates the rendered lines, and writes
//! the document. Repeated exports of an unchanged ledger differ only in the
//! timestamp line.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Local, Timelike};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use thiserror::Error;
use tracing::info;

use crate::ledger::Ledger;

/// Fixed base name of the exported artifact.
pub const EXPORT_FILE_NAME: &str = "Geeps_Keeper.pdf";

/// Fixed title line (trailing space included).
pub const DOCUMENT_TITLE: &str = "The Geeps Super Knowledge Machine Results: ";

// A4 geometry and type sizes, in points.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const LEADING: i64 = 14;
const HEADING_SIZE: i64 = 12;
const BODY_SIZE: i64 = 10;

#[derive(Debug, Error)]
pub enum ExportError {
    /// The export boundary withholds the affordance for an empty ledger;
    /// this variant makes the contract explicit at the library seam too.
    #[error("nothing to export: the ledger is empty")]
    EmptyLedger,

    #[error("could not assemble the document: {0}")]
    Assembly(String),

    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Render the full document text: title line, timestamp line, then one
/// three-line block per entry in ledger order, blocks separated by a blank
/// line.
///
/// The block layout (including the missing space after `RESPONSE:`) is part
/// of the artifact's observed format and is preserved verbatim.
pub fn render_document(ledger: &Ledger, timestamp: &str) -> String {
    let mut out = String::new();
    out.push_str(DOCUMENT_TITLE);
    out.push('\n');
    out.push_str(timestamp);
    out.push('\n');
    out.push('\n');
    for entry in ledger.entries() {
        out.push_str(&format!(
            "PROMPT: {}\nTEMPERATURE: {}\nRESPONSE:{}\n\n",
            entry.prompt, entry.temperature, entry.text
        ));
    }
    out
}

/// Format an export timestamp as `Month Day(ordinal) Year, h:mm:ss am/pm`,
/// e.g. `August 28th 2026, 3:07:09 pm`.
pub fn export_timestamp(now: DateTime<Local>) -> String {
    let day = now.day();
    let (is_pm, hour) = now.hour12();
    format!(
        "{} {}{} {}, {}:{:02}:{:02} {}",
        now.format("%B"),
        day,
        ordinal_suffix(day),
        now.year(),
        hour,
        now.minute(),
        now.second(),
        if is_pm { "pm" } else { "am" },
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match day % 100 {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

/// Render the ledger with a timestamp captured now and write the PDF to
/// `path`. Returns the path written.
pub fn write_pdf(ledger: &Ledger, path: &Path) -> Result<PathBuf, ExportError> {
    if ledger.is_empty() {
        return Err(ExportError::EmptyLedger);
    }

    let rendered = render_document(ledger, &export_timestamp(Local::now()));
    let mut doc = assemble_pdf(&rendered)?;

    let mut file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    doc.save_to(&mut file)
        .map_err(|e| ExportError::Assembly(e.to_string()))?;

    info!(path = %path.display(), entries = ledger.len(), "exported ledger");
    Ok(path.to_path_buf())
}

/// Typeface selection for one rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    /// `F1`, Helvetica.
    Regular(i64),
    /// `F2`, Helvetica-Bold.
    Bold(i64),
}

impl Face {
    fn tag(self) -> &'static str {
        match self {
            Face::Regular(_) => "F1",
            Face::Bold(_) => "F2",
        }
    }

    fn size(self) -> i64 {
        match self {
            Face::Regular(size) | Face::Bold(size) => size,
        }
    }
}

/// Title in bold, timestamp regular, entry blocks bold at body size.
fn faced_lines(rendered: &str) -> Vec<(Face, &str)> {
    rendered
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let face = match i {
                0 => Face::Bold(HEADING_SIZE),
                1 => Face::Regular(HEADING_SIZE),
                _ => Face::Bold(BODY_SIZE),
            };
            (face, line)
        })
        .collect()
}

fn assemble_pdf(rendered: &str) -> Result<Document, ExportError> {
    let lines = faced_lines(rendered);
    let lines_per_page = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page_lines in lines.chunks(lines_per_page.max(1)) {
        let content = Content {
            operations: page_operations(page_lines),
        };
        let encoded = content
            .encode()
            .map_err(|e| ExportError::Assembly(e.to_string()))?;
        let stream_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => stream_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

/// One text object per page, advancing a line at a time with `T*` and
/// switching the typeface only when it changes.
fn page_operations(page_lines: &[(Face, &str)]) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new("TL", vec![LEADING.into()]),
        Operation::new(
            "Td",
            vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN).into()],
        ),
    ];

    let mut current: Option<Face> = None;
    for (face, line) in page_lines {
        if current != Some(*face) {
            ops.push(Operation::new(
                "Tf",
                vec![face.tag().into(), face.size().into()],
            ));
            current = Some(*face);
        }
        if !line.is_empty() {
            ops.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        }
        ops.push(Operation::new("T*", vec![]));
    }

    ops.push(Operation::new("ET", vec![]));
    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ResultEntry;
    use chrono::TimeZone;

    fn ledger_of(entries: &[(&str, f64, &str)]) -> Ledger {
        let mut ledger = Ledger::new();
        for (prompt, temperature, text) in entries {
            ledger.append(ResultEntry::new(*prompt, *temperature, *text));
        }
        ledger
    }

    #[test]
    fn rendered_blocks_follow_ledger_order() {
        let ledger = ledger_of(&[("q1", 0.1, "a1"), ("q2", 0.2, "a2"), ("q3", 0.3, "a3")]);
        let doc = render_document(&ledger, "stamp");

        let p1 = doc.find("PROMPT: q1").unwrap();
        let p2 = doc.find("PROMPT: q2").unwrap();
        let p3 = doc.find("PROMPT: q3").unwrap();
        assert!(p1 < p2 && p2 < p3);
    }

    #[test]
    fn block_layout_matches_the_artifact_format() {
        let ledger = ledger_of(&[("What is 2+2?", 0.2, "4")]);
        let doc = render_document(&ledger, "stamp");

        assert_eq!(
            doc,
            format!("{DOCUMENT_TITLE}\nstamp\n\nPROMPT: What is 2+2?\nTEMPERATURE: 0.2\nRESPONSE:4\n\n")
        );
    }

    #[test]
    fn appending_does_not_disturb_earlier_blocks() {
        let mut ledger = ledger_of(&[("q1", 0.1, "a1")]);
        let first = render_document(&ledger, "stamp");

        ledger.append(ResultEntry::new("q2", 0.2, "a2"));
        let second = render_document(&ledger, "stamp");

        assert!(second.starts_with(&first));
        assert!(second[first.len()..].contains("PROMPT: q2"));
    }

    #[test]
    fn removed_entries_never_appear_in_the_output() {
        let mut ledger = ledger_of(&[("keep me", 0.1, "kept"), ("drop me", 0.9, "dropped")]);
        let dropped_id = ledger.entries()[1].id;
        ledger.remove_by_id(dropped_id);

        let doc = render_document(&ledger, "stamp");
        assert!(doc.contains("PROMPT: keep me"));
        assert!(!doc.contains("drop me"));
        assert!(!doc.contains("dropped"));
    }

    #[test]
    fn timestamp_format_matches_observed_layout() {
        let at = Local.with_ymd_and_hms(2026, 8, 28, 15, 7, 9).unwrap();
        assert_eq!(export_timestamp(at), "August 28th 2026, 3:07:09 pm");

        let morning = Local.with_ymd_and_hms(2026, 3, 1, 0, 0, 5).unwrap();
        assert_eq!(export_timestamp(morning), "March 1st 2026, 12:00:05 am");
    }

    #[test]
    fn ordinal_suffixes_cover_the_teens() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(12), "th");
        assert_eq!(ordinal_suffix(13), "th");
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(22), "nd");
    }

    #[test]
    fn export_of_an_empty_ledger_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_pdf(&Ledger::new(), &dir.path().join(EXPORT_FILE_NAME)).unwrap_err();
        assert!(matches!(err, ExportError::EmptyLedger));
    }

    #[test]
    fn written_file_is_a_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE_NAME);
        let ledger = ledger_of(&[("q", 0.5, "a")]);

        let written = write_pdf(&ledger, &path).unwrap();

        assert_eq!(written, path);
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_ledgers_paginate() {
        let mut ledger = Ledger::new();
        for i in 0..100 {
            ledger.append(ResultEntry::new(format!("q{i}"), 0.5, format!("a{i}")));
        }
        let rendered = render_document(&ledger, "stamp");
        let doc = assemble_pdf(&rendered).unwrap();

        let pages = doc.get_pages();
        assert!(pages.len() > 1, "expected more than one page, got {}", pages.len());
    }
}
