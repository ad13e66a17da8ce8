// src/rendering/text.rs
//! Plain-text certificate document.

use chrono::Datelike;

use crate::error::CertificateError;
use crate::rendering::{split_text_into_lines, CertificateRenderer, ColorScheme, RenderInput};

const COURSE_LINE_WIDTH: usize = 50;
const SKILL_SEPARATOR: &str = " • ";

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Renders a UTF-8 text certificate, one element per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }
}

/// Long Spanish date, e.g. `7 de noviembre de 2025`.
fn long_date_es(date: chrono::NaiveDate) -> String {
    let month = MONTHS_ES[date.month0() as usize];
    format!("{} de {} de {}", date.day(), month, date.year())
}

impl CertificateRenderer for TextRenderer {
    fn render(&self, input: &RenderInput<'_>) -> Result<Vec<u8>, CertificateError> {
        let facts = input.facts;
        let scheme = ColorScheme::pick(input.color_index);
        let mut lines: Vec<String> = Vec::new();

        lines.push(format!("[tema: {}]", scheme.name));
        lines.push("Certificado de Finalización".to_string());
        lines.push(String::new());
        lines.push("Se certifica que".to_string());
        lines.push(facts.student_name.to_uppercase());
        lines.push("ha completado exitosamente el curso:".to_string());
        lines.extend(split_text_into_lines(&facts.course_name, COURSE_LINE_WIDTH));
        lines.push(format!(
            "Emitido el {}",
            long_date_es(facts.issued_at.date_naive())
        ));

        if let Some(skills) = facts.skills.as_ref().filter(|s| !s.is_empty()) {
            lines.push(String::new());
            lines.push("Habilidades Adquiridas:".to_string());
            lines.push(skills.join(SKILL_SEPARATOR));
        }

        lines.push(String::new());
        lines.push(input.professor_name.to_string());
        lines.push("Emisor".to_string());
        lines.push(String::new());
        lines.push(format!("Verificar certificado: {}", input.verification_url));

        let uuid = input.certificate_id.to_string();
        lines.push(format!(
            "Código: {} | UUID: {}...",
            input.readable_code,
            &uuid[..8]
        ));

        let mut document = lines.join("\n");
        document.push('\n');
        Ok(document.into_bytes())
    }

    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}
