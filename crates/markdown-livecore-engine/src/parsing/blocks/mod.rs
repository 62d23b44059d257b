//! # Block Structure
//!
//! Multi-paragraph constructs (fenced code) and their per-paragraph status.
//!
//! ## Modules
//!
//! - **`kinds`**: `CodeFence` owns the fence delimiters and the matching rule
//! - **`types`**: `FencedBlock`, `FenceRole`, `ParagraphStatus`
//! - **`scanner`**: `FenceScanner` full and incremental toggle scans
//! - **`structure`**: `BlockStructure` (sorted block list) and `StructureCache`
//!   (block list + O(1) status lookup + snapshot diffs)
//!
//! ## Key Invariants
//!
//! - Blocks are sorted by `start` and never overlap; fences do not nest
//! - Only the last block may be unclosed, and it runs to the last paragraph
//! - The status lookup is derived from the block list, never edited directly
//! - Incremental updates agree with a full scan of the same text

pub mod kinds;
pub mod scanner;
pub mod structure;
pub mod types;

pub use kinds::{CodeFence, FenceKind, FenceMatching, FenceSig};
pub use scanner::{FenceScanner, ScanOptions};
pub use structure::{BlockStructure, StructureCache};
pub use types::{FenceRole, FencedBlock, ParagraphStatus};
