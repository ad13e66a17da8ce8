// src/rendering/mod.rs
//! Certificate document rendering.
//!
//! Renderers turn signed facts plus display-only details (readable code,
//! professor name, verification link) into the document handed to students.
//! Nothing produced here feeds back into the signed payload.

use uuid::Uuid;

use crate::error::CertificateError;
use crate::models::certificate::CertificateFacts;

pub mod text;

pub use text::TextRenderer;

/// Everything a renderer may print.
#[derive(Debug, Clone)]
pub struct RenderInput<'a> {
    pub facts: &'a CertificateFacts,
    pub certificate_id: Uuid,
    pub readable_code: &'a str,
    pub professor_name: &'a str,
    pub verification_url: String,
    /// Index into [`ColorScheme::ALL`]; reduced modulo its length.
    pub color_index: usize,
}

pub trait CertificateRenderer: Send + Sync {
    fn render(&self, input: &RenderInput<'_>) -> Result<Vec<u8>, CertificateError>;

    /// MIME type of the rendered bytes.
    fn content_type(&self) -> &'static str;

    /// File extension used when uploading, without the dot.
    fn extension(&self) -> &'static str;
}

/// Named theme a renderer decorates the certificate with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub name: &'static str,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 3] = [
        ColorScheme { name: "navy" },
        ColorScheme { name: "teal" },
        ColorScheme { name: "violet" },
    ];

    /// Deterministic choice; callers wanting variety pass a random index.
    pub fn pick(index: usize) -> &'static ColorScheme {
        &Self::ALL[index % Self::ALL.len()]
    }
}

/// Greedy word wrap: words are never split, a word longer than
/// `max_chars` gets a line of its own.
pub fn split_text_into_lines(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed <= max_chars || current.is_empty() {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
