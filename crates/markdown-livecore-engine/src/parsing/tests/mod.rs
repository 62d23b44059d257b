//! Property tests for the incremental pipeline.
//!
//! Random documents are built from fence-heavy lines and then edited with
//! random insertions, deletions and replacements. After every edit the live
//! state must equal what a from-scratch scan of the same text computes.

use std::collections::BTreeSet;

use proptest::prelude::*;

use crate::editing::{Cmd, LiveDocument, ParagraphIndex};
use crate::parsing::{
    blocks::{FenceMatching, FenceScanner, ScanOptions, StructureCache},
    inline::{Token, tokenize},
    rope::split_paragraphs,
};

const LINES: &[&str] = &[
    "```",
    "```rust",
    "````",
    "``",
    "~~~",
    "~~~~ sh",
    "  ```",
    "text",
    "",
    "`code` and [[Page|alias]]",
];

/// Generates a document of fence lines, prose and blanks.
fn arb_document() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(prop::sample::select(LINES), 0..14),
        any::<bool>(),
    )
        .prop_map(|(lines, trailing_newline)| {
            let mut text = lines.join("\n");
            if trailing_newline && !text.is_empty() {
                text.push('\n');
            }
            text
        })
}

fn arb_inserted_text() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[`~a \n]{0,6}",
        1 => Just("```\n".to_string()),
        1 => Just("~~~\n".to_string()),
        1 => Just("\n```rust\n".to_string()),
        1 => Just(String::new()),
    ]
}

fn arb_options() -> impl Strategy<Value = ScanOptions> {
    (
        prop_oneof![
            Just(FenceMatching::SameCharacter),
            Just(FenceMatching::AnyFence)
        ],
        0..4usize,
    )
        .prop_map(|(fence_matching, lookback)| ScanOptions {
            fence_matching,
            lookback,
        })
}

/// An edit drawn independently of the document it is applied to.
#[derive(Debug, Clone)]
struct RandomEdit {
    at: usize,
    removed: usize,
    text: String,
}

impl RandomEdit {
    fn resolve(&self, len: usize) -> Cmd {
        let start = self.at % (len + 1);
        let end = (start + self.removed).min(len);
        match (start == end, self.text.is_empty()) {
            (true, _) => Cmd::InsertText {
                at: start,
                text: self.text.clone(),
            },
            (false, true) => Cmd::DeleteRange { range: start..end },
            (false, false) => Cmd::ReplaceRange {
                range: start..end,
                text: self.text.clone(),
            },
        }
    }
}

fn arb_edit() -> impl Strategy<Value = RandomEdit> {
    (
        any::<usize>(),
        prop_oneof![3 => 0..3usize, 1 => 0..40usize],
        arb_inserted_text(),
    )
        .prop_map(|(at, removed, text)| RandomEdit { at, removed, text })
}

proptest! {
    /// Every edit leaves the live document equal to a full rescan, and the
    /// rescan-to-EOF variant agrees with it too.
    #[test]
    fn prop_incremental_matches_full_scan(
        doc in arb_document(),
        edits in prop::collection::vec(arb_edit(), 1..16),
        options in arb_options(),
    ) {
        let scanner = FenceScanner::new(options);
        let mut live = LiveDocument::from_text(&doc, options);
        let mut to_eof = live.structure().clone();
        let mut shadow = doc.clone();

        for edit in &edits {
            let cmd = edit.resolve(live.len());
            shadow.replace_range(cmd.range(), cmd.text());

            let before = live.structure().clone();
            let patch = live.apply(&cmd).unwrap();
            to_eof.update_incremental(&scanner, patch.edit.ordinal, live.paragraphs());
            let full = StructureCache::scan(&scanner, live.paragraphs());

            let expected_paragraphs = split_paragraphs(&shadow);
            let expected_index = ParagraphIndex::from_text(&shadow);
            prop_assert_eq!(live.text(), shadow.as_str());
            prop_assert_eq!(live.paragraphs(), expected_paragraphs.as_slice());
            prop_assert_eq!(live.index(), &expected_index);
            prop_assert_eq!(live.blocks(), full.blocks());
            prop_assert_eq!(to_eof.blocks(), full.blocks());

            for p in 0..live.paragraph_count() {
                prop_assert_eq!(live.status(p), full.status(p));
                let flipped = match patch.edit.to_old(p) {
                    Some(old) => before.status(old) != live.status(p),
                    None => true,
                };
                if flipped {
                    prop_assert!(
                        patch.relayout.contains(&p),
                        "paragraph {} changed but is missing from {:?}",
                        p,
                        patch.relayout
                    );
                }
            }
        }
    }

    /// Cached tokens always equal a fresh tokenization under the current status.
    #[test]
    fn prop_token_cache_never_serves_stale_tokens(
        doc in arb_document(),
        edits in prop::collection::vec(arb_edit(), 1..10),
    ) {
        let mut live = LiveDocument::from_text(&doc, ScanOptions::default());
        for edit in &edits {
            // Fill the cache so the next edit has something to invalidate.
            for p in 0..live.paragraph_count() {
                live.tokens(p);
            }
            let cmd = edit.resolve(live.len());
            live.apply(&cmd).unwrap();

            for p in 0..live.paragraph_count() {
                let expected: Vec<Token> = tokenize(live.status(p), &live.paragraphs()[p]);
                let cached = live.tokens(p).map(<[Token]>::to_vec);
                prop_assert_eq!(cached, Some(expected));
            }
        }
    }

    /// `changed_paragraphs` is the symmetric difference of "is in any block".
    #[test]
    fn prop_changed_paragraphs_is_symmetric_difference(
        a in arb_document(),
        b in arb_document(),
        options in arb_options(),
    ) {
        let scanner = FenceScanner::new(options);
        let pa = split_paragraphs(&a);
        let pb = split_paragraphs(&b);
        let ca = StructureCache::scan(&scanner, &pa);
        let cb = StructureCache::scan(&scanner, &pb);

        let expected: BTreeSet<usize> = (0..pa.len().max(pb.len()))
            .filter(|&p| ca.is_in_block(p) != cb.is_in_block(p))
            .collect();
        prop_assert_eq!(ca.changed_paragraphs(&cb), expected);
        prop_assert!(ca.changed_paragraphs(&ca).is_empty());
        let rescanned = StructureCache::scan(&scanner, &pa);
        prop_assert_eq!(ca.structure(), rescanned.structure());
    }
}
