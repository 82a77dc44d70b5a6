//! WordprocessingML writers for paragraphs and runs.
//!
//! Output is appended to a `String`; element order inside `w:pPr`/`w:rPr`
//! follows the schema sequence so Word does not flag the file as corrupt.

use super::common::{escape_xml, Twips};
use super::template::{Align, TextStyle};

#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub style: TextStyle,
}

impl Run {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParagraphProps {
    pub style_id: Option<&'static str>,
    pub align: Option<Align>,
    pub space_after: Option<Twips>,
}

impl ParagraphProps {
    pub fn aligned(align: Align) -> Self {
        Self {
            align: Some(align),
            ..Self::default()
        }
    }

    pub fn styled(style_id: &'static str) -> Self {
        Self {
            style_id: Some(style_id),
            ..Self::default()
        }
    }

    pub fn space_after(mut self, space: Twips) -> Self {
        self.space_after = Some(space);
        self
    }
}

pub fn write_paragraph(out: &mut String, props: &ParagraphProps, runs: &[Run]) {
    out.push_str("<w:p>");
    write_paragraph_props(out, props);
    for run in runs {
        write_run(out, run);
    }
    out.push_str("</w:p>");
}

/// An empty paragraph, used as a blank line.
pub fn write_blank_line(out: &mut String) {
    out.push_str("<w:p/>");
}

/// A tight empty paragraph that keeps two consecutive tables apart.
pub fn write_table_spacer(out: &mut String) {
    out.push_str(
        r#"<w:p><w:pPr><w:spacing w:before="0" w:after="0" w:line="120" w:lineRule="exact"/></w:pPr></w:p>"#,
    );
}

fn write_paragraph_props(out: &mut String, props: &ParagraphProps) {
    if *props == ParagraphProps::default() {
        return;
    }
    out.push_str("<w:pPr>");
    if let Some(style_id) = props.style_id {
        out.push_str(&format!(r#"<w:pStyle w:val="{}"/>"#, style_id));
    }
    if let Some(space) = props.space_after {
        out.push_str(&format!(r#"<w:spacing w:after="{}"/>"#, space));
    }
    if let Some(align) = props.align {
        out.push_str(&format!(r#"<w:jc w:val="{}"/>"#, align.as_str()));
    }
    out.push_str("</w:pPr>");
}

fn write_run(out: &mut String, run: &Run) {
    let font = escape_xml(run.style.font);
    out.push_str("<w:r><w:rPr>");
    out.push_str(&format!(
        r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:cs="{0}"/>"#,
        font
    ));
    if run.style.bold {
        out.push_str("<w:b/><w:bCs/>");
    }
    out.push_str(&format!(
        r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#,
        run.style.size
    ));
    out.push_str("</w:rPr>");
    write_text(out, &run.text);
    out.push_str("</w:r>");
}

/// Text content of a run. Newlines become line breaks and tabs become tab
/// stops, so multi-line form input keeps its shape.
fn write_text(out: &mut String, text: &str) {
    let normalized = text.replace("\r\n", "\n");
    for (line_index, line) in normalized.split('\n').enumerate() {
        if line_index > 0 {
            out.push_str("<w:br/>");
        }
        for (segment_index, segment) in line.split('\t').enumerate() {
            if segment_index > 0 {
                out.push_str("<w:tab/>");
            }
            if !segment.is_empty() {
                out.push_str(r#"<w:t xml:space="preserve">"#);
                out.push_str(&escape_xml(segment));
                out.push_str("</w:t>");
            }
        }
    }
}
