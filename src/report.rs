//! Session report export as a minimal paginated PDF.
//!
//! The exporter writes the small fixed PDF object graph directly:
//! uncompressed text streams, one Helvetica font with WinAnsiEncoding, one
//! content stream per page. One logical line per turn (`ROLE: text`, model
//! turns run through the annotation parser first so raw markers never appear
//! in the export), followed by a grammar-notes appendix.
//!
//! Lossy-encoding policy: text operators are limited to Latin-1. A line
//! containing characters outside that range is replaced wholesale by a
//! placeholder line rather than failing the export. Output is deterministic
//! for identical session content — no timestamps enter the byte stream.

use crate::annotation;
use crate::session::{Role, Session};

/// Fixed download filename for the exported report.
pub const REPORT_FILENAME: &str = "informe_clase_dele.pdf";

const TITLE: &str = "Informe de Sesión - DELE Tutor AI";
const NOTES_HEADING: &str = "Pizarra Gramatical";
const UNSUPPORTED_LINE: &str = "[Contenido con caracteres no soportados en el PDF básico]";

// Letter pages, 50pt margins, 14pt leading.
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 50.0;
const LEADING: u32 = 14;
const LINES_PER_PAGE: usize = 48;
const WRAP_COLUMNS: usize = 88;

/// Generates the PDF report for one session.
pub struct ReportPdf<'a> {
    session: &'a Session,
}

impl<'a> ReportPdf<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Serialize the session into PDF bytes.
    pub fn generate(&self) -> Vec<u8> {
        let lines = self.logical_lines();
        let rows: Vec<String> = lines.iter().flat_map(|l| wrap_line(l)).collect();

        // logical_lines always emits the title, so there is at least one page
        let pages: Vec<&[String]> = rows.chunks(LINES_PER_PAGE).collect();

        assemble_pdf(&pages)
    }

    /// The report's logical lines, before wrapping: title, one line per
    /// turn, then the notes appendix. Every returned line is Latin-1 safe;
    /// unrepresentable lines have already been substituted.
    fn logical_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push(TITLE.to_string());
        lines.push(String::new());

        for turn in self.session.history() {
            let (role, text) = match turn.role {
                Role::User => ("USER", turn.raw_text.clone()),
                Role::Model => ("MODEL", annotation::parse(&turn.raw_text).display_text),
            };
            // One logical line per turn; embedded newlines become spaces so
            // the role prefix stays attached to the whole turn.
            let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
            let line = format!("{role}: {flat}");
            lines.push(ensure_latin1(line, || format!("{role}: {UNSUPPORTED_LINE}")));
        }

        if !self.session.notes().is_empty() {
            lines.push(String::new());
            lines.push(format!("{NOTES_HEADING}:"));
            for note in self.session.notes() {
                let flat = note.split_whitespace().collect::<Vec<_>>().join(" ");
                let line = format!("- {flat}");
                lines.push(ensure_latin1(line, || format!("- {UNSUPPORTED_LINE}")));
            }
        }

        lines
    }
}

/// Keep `line` if every character fits in Latin-1, else substitute.
fn ensure_latin1(line: String, placeholder: impl FnOnce() -> String) -> String {
    if line.chars().all(|c| (c as u32) <= 0xFF) {
        line
    } else {
        placeholder()
    }
}

/// Wrap at word boundaries to the page column width. Always yields at least
/// one row so empty logical lines survive as spacing.
fn wrap_line(line: &str) -> Vec<String> {
    if line.chars().count() <= WRAP_COLUMNS {
        return vec![line.to_string()];
    }

    let mut rows = Vec::new();
    let mut current = String::new();
    for word in line.split(' ') {
        let candidate_len = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if candidate_len > WRAP_COLUMNS && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        rows.push(current);
    }
    rows
}

/// Escape a Latin-1 line for a PDF string literal and encode it as bytes.
fn encode_pdf_string(line: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(line.len() + 2);
    for c in line.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push(b'\\');
                out.push(c as u8);
            }
            c if (c as u32) <= 0xFF => {
                // Checked by ensure_latin1; anything else would have been
                // substituted already.
                #[allow(clippy::cast_possible_truncation)]
                out.push(c as u32 as u8);
            }
            _ => out.push(b'?'),
        }
    }
    out
}

fn page_content_stream(rows: &[String]) -> Vec<u8> {
    let mut stream = Vec::new();
    let start_y = PAGE_HEIGHT - MARGIN;
    stream.extend_from_slice(
        format!("BT\n/F1 11 Tf\n{LEADING} TL\n{MARGIN} {start_y} Td\n").as_bytes(),
    );
    for row in rows {
        stream.extend_from_slice(b"(");
        stream.extend_from_slice(&encode_pdf_string(row));
        stream.extend_from_slice(b") Tj\nT*\n");
    }
    stream.extend_from_slice(b"ET\n");
    stream
}

/// Emit the object graph: catalog, page tree, font, then a page and content
/// stream pair per page, followed by the xref table and trailer.
fn assemble_pdf(pages: &[&[String]]) -> Vec<u8> {
    let page_count = pages.len();
    let total_objects = 3 + 2 * page_count;

    let mut buf: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = vec![0; total_objects + 1];

    buf.extend_from_slice(b"%PDF-1.4\n");

    let push_object = |buf: &mut Vec<u8>, offsets: &mut Vec<usize>, num: usize, body: &[u8]| {
        offsets[num] = buf.len();
        buf.extend_from_slice(format!("{num} 0 obj\n").as_bytes());
        buf.extend_from_slice(body);
        buf.extend_from_slice(b"\nendobj\n");
    };

    push_object(
        &mut buf,
        &mut offsets,
        1,
        b"<< /Type /Catalog /Pages 2 0 R >>",
    );

    let kids = (0..page_count)
        .map(|i| format!("{} 0 R", 4 + 2 * i))
        .collect::<Vec<_>>()
        .join(" ");
    push_object(
        &mut buf,
        &mut offsets,
        2,
        format!("<< /Type /Pages /Kids [{kids}] /Count {page_count} >>").as_bytes(),
    );

    push_object(
        &mut buf,
        &mut offsets,
        3,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );

    for (i, rows) in pages.iter().enumerate() {
        let page_num = 4 + 2 * i;
        let content_num = page_num + 1;

        push_object(
            &mut buf,
            &mut offsets,
            page_num,
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {content_num} 0 R >>"
            )
            .as_bytes(),
        );

        let stream = page_content_stream(rows);
        let mut body = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        body.extend_from_slice(&stream);
        body.extend_from_slice(b"endstream");
        push_object(&mut buf, &mut offsets, content_num, &body);
    }

    let xref_offset = buf.len();
    buf.extend_from_slice(format!("xref\n0 {}\n", total_objects + 1).as_bytes());
    buf.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets.iter().skip(1) {
        buf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    buf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            total_objects + 1
        )
        .as_bytes(),
    );

    buf
}
