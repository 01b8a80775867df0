//! Minimal PDF writer
//!
//! Produces single-page PDF 1.4 documents containing left-aligned lines of
//! text in the standard Helvetica fonts. That is all a report needs, and it
//! keeps the output byte-for-byte reproducible for a given input.

use std::fmt::Write as _;

/// A4 in PostScript points
const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;

/// 10 mm
const MARGIN: f32 = 28.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

#[derive(Debug, Clone)]
struct Line {
    font: Font,
    size: f32,
    /// Distance below the previous line's baseline
    advance: f32,
    text: String,
}

/// A one-page document built line by line from the top of the page
#[derive(Debug, Clone, Default)]
pub struct PdfPage {
    lines: Vec<Line>,
}

impl PdfPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line of text `advance` points below the previous one
    pub fn line(mut self, font: Font, size: f32, advance: f32, text: impl Into<String>) -> Self {
        self.lines.push(Line {
            font,
            size,
            advance,
            text: text.into(),
        });
        self
    }

    fn content_stream(&self) -> String {
        let mut content = String::new();
        let mut y = PAGE_HEIGHT - MARGIN;

        for line in &self.lines {
            y -= line.advance;
            // Writing to a String cannot fail
            let _ = writeln!(
                content,
                "BT /{} {:.0} Tf {:.2} {:.2} Td ({}) Tj ET",
                line.font.resource(),
                line.size,
                MARGIN,
                y,
                escape(&line.text)
            );
        }

        content
    }

    /// Serialize the page as a complete PDF file
    pub fn to_bytes(&self) -> Vec<u8> {
        let content = self.content_stream();

        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Resources << /Font << /F1 4 0 R /F2 5 0 R >> >> /Contents 6 0 R >>",
                PAGE_WIDTH, PAGE_HEIGHT
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{}endstream",
                content.len(),
                content
            ),
        ];

        let mut out = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());

        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            let _ = write!(out, "{} 0 obj\n{}\nendobj\n", i + 1, body);
        }

        let xref_offset = out.len();
        let _ = writeln!(out, "xref\n0 {}", objects.len() + 1);
        out.push_str("0000000000 65535 f \n");
        for offset in offsets {
            let _ = writeln!(out, "{:010} 00000 n ", offset);
        }
        let _ = write!(
            out,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        );

        out.into_bytes()
    }
}

/// WinAnsi code for a character, if the standard fonts can show it
fn win_ansi(c: char) -> Option<u8> {
    match c {
        ' '..='~' => Some(c as u8),
        '\u{a0}'..='\u{ff}' => Some(c as u32 as u8),
        '€' => Some(0x80),
        '‚' => Some(0x82),
        '„' => Some(0x84),
        '…' => Some(0x85),
        '‘' => Some(0x91),
        '’' => Some(0x92),
        '“' => Some(0x93),
        '”' => Some(0x94),
        '–' => Some(0x96),
        '—' => Some(0x97),
        _ => None,
    }
}

/// Escape a string for a PDF literal
///
/// Bytes above ASCII are written as octal escapes so the content stream stays
/// 7-bit. Characters outside WinAnsi become '?'.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match (c, win_ansi(c)) {
            ('(' | ')' | '\\', _) => {
                escaped.push('\\');
                escaped.push(c);
            }
            (_, Some(code)) if code.is_ascii() => escaped.push(code as char),
            (_, Some(code)) => {
                let _ = write!(escaped, "\\{:03o}", code);
            }
            (_, None) => escaped.push('?'),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PdfPage {
        PdfPage::new()
            .line(Font::Bold, 16.0, 16.0, "Expense Report")
            .line(Font::Regular, 12.0, 34.0, "Total expenses: 100.02")
    }

    #[test]
    fn test_document_structure() {
        let bytes = sample().to_bytes();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("%PDF-1.4\n"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("(Expense Report) Tj"));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
        assert!(text.contains("xref\n0 7\n"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let text = String::from_utf8(sample().to_bytes()).unwrap();

        let xref_start = text.find("xref\n").unwrap();
        let entries: Vec<usize> = text[xref_start..]
            .lines()
            .skip(3)
            .take(6)
            .map(|l| l[..10].parse().unwrap())
            .collect();

        for (i, offset) in entries.iter().enumerate() {
            assert!(text[*offset..].starts_with(&format!("{} 0 obj", i + 1)));
        }

        let startxref: usize = text
            .lines()
            .skip_while(|l| *l != "startxref")
            .nth(1)
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(startxref, xref_start);
    }

    #[test]
    fn test_stream_length_matches_content() {
        let page = sample();
        let content = page.content_stream();
        let text = String::from_utf8(page.to_bytes()).unwrap();
        assert!(text.contains(&format!("<< /Length {} >>\nstream\n{}endstream", content.len(), content)));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a (b) \\ c"), "a \\(b\\) \\\\ c");
        assert_eq!(escape("tab\there"), "tab?here");
    }

    #[test]
    fn test_escape_win_ansi() {
        assert_eq!(escape("£5"), "\\2435");
        assert_eq!(escape("Café"), "Caf\\351");
        assert_eq!(escape("€12"), "\\20012");
        // No WinAnsi code for ł
        assert_eq!(escape("zł"), "z?");
    }

    #[test]
    fn test_non_ascii_keeps_stream_ascii() {
        let page = PdfPage::new().line(Font::Regular, 12.0, 20.0, "Total: 12.00 €");
        let bytes = page.to_bytes();
        assert!(bytes.is_ascii());
        assert!(String::from_utf8(bytes).unwrap().contains("(Total: 12.00 \\200) Tj"));
    }

    #[test]
    fn test_output_is_deterministic() {
        assert_eq!(sample().to_bytes(), sample().to_bytes());
    }
}
