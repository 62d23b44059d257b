pub mod editing;
pub mod io;
pub mod parsing;

// Re-export key types for easier usage
pub use editing::{
    ActiveParagraphTracker, ActiveTransition, Cmd, DocumentError, LiveDocument, Pane, PaneId,
    PaneUpdate, ParagraphEdit, ParagraphIndex, Patch, TokenCache,
};
pub use io::*;
pub use parsing::blocks::{
    BlockStructure, FenceKind, FenceMatching, FenceScanner, FencedBlock, ParagraphStatus,
    ScanOptions, StructureCache,
};
pub use parsing::inline::Token;
