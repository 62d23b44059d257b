pub mod blocks;
pub mod inline;
pub mod rope;

#[cfg(test)]
mod tests;

use xi_rope::Rope;

use blocks::{FenceScanner, StructureCache};
use inline::Token;
use rope::paragraphs_with_spans;

/// Block structure and tokens of a whole document, computed from scratch.
#[derive(Debug)]
pub struct ParsedDoc {
    pub paragraphs: Vec<String>,
    pub structure: StructureCache,
}

/// Convenience: split a rope into paragraphs and scan it in one go.
pub fn parse_document(rope: &Rope, scanner: &FenceScanner) -> ParsedDoc {
    let paragraphs: Vec<String> = paragraphs_with_spans(rope).map(|p| p.text).collect();
    let structure = StructureCache::scan(scanner, &paragraphs);
    ParsedDoc {
        paragraphs,
        structure,
    }
}

impl ParsedDoc {
    /// Tokens of paragraph `ordinal`; empty for unknown ordinals.
    pub fn tokens(&self, ordinal: usize) -> Vec<Token> {
        self.paragraphs
            .get(ordinal)
            .map(|text| inline::tokenize(self.structure.status(ordinal), text))
            .unwrap_or_default()
    }
}
