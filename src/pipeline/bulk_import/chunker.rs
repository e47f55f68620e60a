/// Hard ceiling for one chunk, in characters.
pub const MAX_CHUNK_CHARS: usize = 1500;

/// Lines starting with one of these open a new section.
const BOUNDARY_KEYWORDS: &[&str] = &[
    "tratamento",
    "indicação",
    "indicacao",
    "protocolo",
    "fórmula",
    "formula",
];

#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    pub index: usize,
    pub content: String,
    /// Heading of the first section in the chunk, if any.
    pub title: Option<String>,
}

/// Splits prescription documents by section headings first, then packs
/// consecutive sections up to the ceiling. Oversized sections are split
/// on line boundaries, then mechanically.
pub struct PrescriptionChunker {
    max_chunk_chars: usize,
}

impl PrescriptionChunker {
    pub fn new(max_chunk_chars: usize) -> Self {
        Self {
            max_chunk_chars: max_chunk_chars.max(1),
        }
    }

    pub fn chunk(&self, text: &str) -> Vec<TextChunk> {
        let max = self.max_chunk_chars;

        let mut pieces: Vec<(Option<String>, String)> = Vec::new();
        for section in split_by_boundaries(text) {
            if char_len(&section.content) <= max {
                pieces.push((section.title, section.content));
            } else {
                let mut title = section.title;
                for part in split_by_lines(&section.content, max) {
                    pieces.push((title.take(), part));
                }
            }
        }

        let mut chunks: Vec<TextChunk> = Vec::new();
        let mut current: Option<TextChunk> = None;

        for (title, content) in pieces {
            match current.as_mut() {
                Some(chunk) if char_len(&chunk.content) + 1 + char_len(&content) <= max => {
                    chunk.content.push('\n');
                    chunk.content.push_str(&content);
                }
                _ => {
                    if let Some(done) = current.take() {
                        chunks.push(done);
                    }
                    current = Some(TextChunk {
                        index: chunks.len(),
                        content,
                        title,
                    });
                }
            }
        }
        if let Some(done) = current {
            chunks.push(done);
        }

        chunks
    }
}

impl Default for PrescriptionChunker {
    fn default() -> Self {
        Self::new(MAX_CHUNK_CHARS)
    }
}

pub(super) struct Section {
    pub(super) title: Option<String>,
    pub(super) content: String,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// A heading line: markdown `#`, or a treatment/indication keyword after
/// optional list numbering ("2) Fórmula para queda capilar").
pub(super) fn is_boundary(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.starts_with('#') {
        return true;
    }
    let lower = trimmed
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ')' || c == '-')
        .trim_start()
        .to_lowercase();
    BOUNDARY_KEYWORDS.iter().any(|k| lower.starts_with(k))
}

pub(super) fn split_by_boundaries(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut title: Option<String> = None;
    let mut content = String::new();

    for line in text.lines() {
        if is_boundary(line) && !content.trim().is_empty() {
            sections.push(Section {
                title: title.take(),
                content: content.trim().to_string(),
            });
            content = String::new();
        }
        if is_boundary(line) {
            title = Some(line.trim().trim_start_matches('#').trim().to_string());
        }
        content.push_str(line);
        content.push('\n');
    }

    if !content.trim().is_empty() {
        sections.push(Section {
            title,
            content: content.trim().to_string(),
        });
    }

    sections
}

fn split_by_lines(content: &str, max: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();

    for line in content.lines() {
        if char_len(line) > max {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            parts.extend(split_mechanically(line, max));
            continue;
        }
        let extra = if current.is_empty() { 0 } else { 1 };
        if char_len(&current) + extra + char_len(line) > max {
            parts.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    if !current.trim().is_empty() {
        parts.push(current);
    }

    parts
}

/// Split on char boundaries, never inside a UTF-8 sequence.
fn split_mechanically(line: &str, max: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    chars.chunks(max).map(|c| c.iter().collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(PrescriptionChunker::default().chunk("").is_empty());
        assert!(PrescriptionChunker::default().chunk("  \n\n ").is_empty());
    }

    #[test]
    fn small_sections_packed_together() {
        let text = "Fórmula 1\n• Berberina 500mg\nFórmula 2\n• Zinco 30mg";
        let chunks = PrescriptionChunker::default().chunk(text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].title.as_deref(), Some("Fórmula 1"));
        assert!(chunks[0].content.contains("Zinco"));
    }

    #[test]
    fn sections_split_when_ceiling_reached() {
        let body = "• Ativo 100mg\n".repeat(8);
        let text = format!("Tratamento A\n{body}Tratamento B\n{body}");
        let chunks = PrescriptionChunker::new(150).chunk(&text);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].content.starts_with("Tratamento A"));
        assert!(chunks[1].content.starts_with("Tratamento B"));
        assert_eq!(chunks[1].index, 1);
    }

    #[test]
    fn boundary_detection() {
        assert!(is_boundary("## Protocolo emagrecimento"));
        assert!(is_boundary("2) Fórmula para queda capilar"));
        assert!(is_boundary("INDICAÇÃO: acne"));
        assert!(!is_boundary("• Berberina 500mg"));
    }

    #[test]
    fn every_chunk_respects_ceiling_with_multibyte_text() {
        let long_line = "ação ".repeat(700);
        let text = format!("# Título\n{long_line}\n• Cafeína 200mg");
        let chunks = PrescriptionChunker::default().chunk(&text);
        assert!(chunks.len() >= 3);
        for chunk in &chunks {
            assert!(chunk.content.chars().count() <= MAX_CHUNK_CHARS);
        }
        let rejoined: String = chunks.iter().map(|c| c.content.as_str()).collect();
        assert!(rejoined.contains("Cafeína"));
    }

    #[test]
    fn chunk_order_follows_document() {
        let text = (0..30)
            .map(|i| format!("Fórmula {i}\n• Ativo {i} 100mg\n{}", "x".repeat(90)))
            .collect::<Vec<_>>()
            .join("\n");
        let chunks = PrescriptionChunker::new(400).chunk(&text);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
        assert!(chunks[0].content.starts_with("Fórmula 0"));
        assert!(chunks.last().unwrap().content.contains("Ativo 29"));
    }
}
