/*!
 * # Editing Core Module
 *
 * Keeps a live-preview document's derived state in step with its text, so a
 * keystroke costs work proportional to what it changed rather than to the
 * size of the document.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: xi-rope Buffer
 * - The document is stored in one **`xi_rope::Rope`** buffer
 * - Edits are **Commands** (`Cmd`) compiled to xi-rope **Deltas**
 * - Saving writes the rope bytes verbatim
 *
 * ### 2. Paragraph Coordinates
 * - A paragraph is one newline-terminated line, addressed by ordinal
 * - **`ParagraphIndex`** maps byte offsets to ordinals by binary search
 * - Every edit is first reduced to a **`ParagraphEdit`**: which ordinals were
 *   replaced and by how many new ones
 *
 * ### 3. Edit Pipeline
 * `LiveDocument::apply` runs, in order and before returning:
 * 1. index shift (`ParagraphIndex::apply_edit`)
 * 2. fence structure rescan around the edit (`StructureCache::apply_edit`)
 * 3. status diff against the previous structure
 * 4. token cache invalidation (`TokenCache::invalidate_edit`)
 *
 * The resulting **`Patch`** names every paragraph the renderer must lay out
 * again: the edited ones plus every paragraph whose fence status flipped.
 *
 * ### 4. Active Paragraph
 * - Each **`Pane`** shows one paragraph raw: the one under the caret
 * - `ActiveParagraphTracker` reports the two paragraphs that flip on a move
 *
 * ## Usage Pattern
 *
 * ```rust
 * use markdown_livecore_engine::editing::*;
 * use markdown_livecore_engine::parsing::blocks::{ParagraphStatus, ScanOptions};
 *
 * let mut doc = LiveDocument::from_bytes(b"hello\nworld\n", ScanOptions::default()).unwrap();
 *
 * let patch = doc
 *     .apply(&Cmd::InsertText { at: 0, text: "```\n".to_string() })
 *     .unwrap();
 *
 * assert_eq!(doc.status(1), ParagraphStatus::Inside(None));
 * assert!(patch.relayout.contains(&2));
 * ```
 */

pub mod active;
pub mod commands;
pub mod document;
pub mod edit;
pub mod error;
pub mod index;
pub mod pane;
pub mod patch;
pub mod tokens;

pub use active::{ActiveParagraphTracker, ActiveTransition};
pub use commands::Cmd;
pub use document::LiveDocument;
pub use edit::ParagraphEdit;
pub use error::DocumentError;
pub use index::ParagraphIndex;
pub use pane::{Pane, PaneId, PaneUpdate};
pub use patch::Patch;
pub use tokens::{CacheEntry, CacheStats, TokenCache};
