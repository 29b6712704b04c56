//! Upload payloads.

use axum_test::multipart::{MultipartForm, Part};

pub const DOCUMENT_FIELD: &str = "document";

pub fn text_form(filename: &str, text: &str) -> MultipartForm {
    file_form(filename, text.as_bytes().to_vec(), "text/plain")
}

pub fn file_form(filename: &str, bytes: Vec<u8>, mime: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        DOCUMENT_FIELD,
        Part::bytes(bytes).file_name(filename).mime_type(mime),
    )
}

/// Form with a text field but no document.
pub fn form_without_document() -> MultipartForm {
    MultipartForm::new().add_text("note", "no file here")
}

/// Single-page PDF showing `phrase` in Helvetica.
pub fn pdf_with_text(phrase: &str) -> Vec<u8> {
    let content = format!("BT /F1 12 Tf 72 712 Td ({}) Tj ET", phrase);
    let mut out = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");
    let mut offsets = Vec::new();
    let objects = [
        "1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n".to_string(),
        "2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj\n".to_string(),
        "3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >> endobj\n".to_string(),
        format!(
            "4 0 obj << /Length {} >> stream\n{}\nendstream endobj\n",
            content.len(),
            content
        ),
        "5 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> endobj\n".to_string(),
    ];
    for object in &objects {
        offsets.push(out.len());
        out.extend_from_slice(object.as_bytes());
    }
    let xref_start = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer << /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_start
        )
        .as_bytes(),
    );
    out
}
