use crate::parsing::{
    blocks::{CodeFence, ParagraphStatus},
    rope::{span::Span, strip_terminator},
};

use super::{
    cursor::Cursor,
    kinds::{CodeSpan, WikiLink},
    types::Token,
};

/// Tokenizes one paragraph given its structural status.
///
/// Fence lines become a single [`Token::FenceDelimiter`], block content a
/// single [`Token::CodeLine`], and ordinary paragraphs go through
/// [`parse_inline`]. The line terminator is never part of a token.
pub fn tokenize(status: ParagraphStatus<'_>, paragraph: &str) -> Vec<Token> {
    let line = strip_terminator(paragraph);
    let full = Span::new(0, line.len());
    match status {
        ParagraphStatus::OpeningFence(_) | ParagraphStatus::ClosingFence => {
            vec![Token::FenceDelimiter {
                full,
                language: fence_language_span(line),
            }]
        }
        ParagraphStatus::Inside(_) if line.is_empty() => vec![],
        ParagraphStatus::Inside(_) => vec![Token::CodeLine(full)],
        ParagraphStatus::None => parse_inline(line),
    }
}

/// Splits ordinary text into text, code span and wiki link tokens.
///
/// Code spans are tried first and suppress all other parsing inside them.
/// Unclosed constructs are left as text.
pub fn parse_inline(s: &str) -> Vec<Token> {
    let mut cur = Cursor::new(s);
    let mut out = vec![];
    let mut text_start = 0;

    while !cur.eof() {
        let at = cur.pos();
        let token = try_parse_code_span(&mut cur).or_else(|| try_parse_wikilink(&mut cur));
        match token {
            Some(token) => {
                if at > text_start {
                    out.push(Token::Text(Span::new(text_start, at)));
                }
                text_start = token.span().end;
                out.push(token);
            }
            None if cur.peek() == Some(CodeSpan::TICK) => {
                // An unmatched run stays text as a whole; a shorter closer
                // later on must not pair with its tail.
                cur.eat_run(CodeSpan::TICK);
            }
            None => {
                cur.bump();
            }
        }
    }

    if cur.pos() > text_start {
        out.push(Token::Text(Span::new(text_start, cur.pos())));
    }
    out
}

fn fence_language_span(line: &str) -> Option<Span> {
    let sig = CodeFence::sig(line)?;
    let language = sig.language?;
    let lead = line.len() - line.trim_start().len();
    let after_run = lead + sig.run;
    let start = after_run + line[after_run..].find(language)?;
    Some(Span::new(start, start + language.len()))
}

/// Parses a code span opened by a backtick run at the cursor.
///
/// The closer is the next backtick run of exactly the same length. On
/// failure the cursor is left where it was.
fn try_parse_code_span(cur: &mut Cursor<'_>) -> Option<Token> {
    if cur.peek() != Some(CodeSpan::TICK) {
        return None;
    }

    let saved = cur.clone();
    let start = cur.pos();
    let open = cur.eat_run(CodeSpan::TICK);
    let inner_start = cur.pos();

    while !cur.eof() {
        if cur.peek() == Some(CodeSpan::TICK) {
            let inner_end = cur.pos();
            if cur.eat_run(CodeSpan::TICK) == open {
                return Some(Token::CodeSpan {
                    full: Span::new(start, cur.pos()),
                    inner: Span::new(inner_start, inner_end),
                });
            }
        } else {
            cur.bump();
        }
    }

    *cur = saved;
    None
}

/// Parses `[[target]]` or `[[target|alias]]` at the cursor.
///
/// On failure the cursor is left where it was.
fn try_parse_wikilink(cur: &mut Cursor<'_>) -> Option<Token> {
    if !cur.starts_with(WikiLink::OPEN) {
        return None;
    }

    let saved = cur.clone();
    let start = cur.pos();
    cur.bump_n(WikiLink::OPEN.len());
    let target_start = cur.pos();

    while !cur.eof() && cur.peek() != Some(WikiLink::ALIAS) && !cur.starts_with(WikiLink::CLOSE)
    {
        cur.bump();
    }
    let target = Span::new(target_start, cur.pos());

    let mut alias = None;
    if cur.peek() == Some(WikiLink::ALIAS) {
        cur.bump();
        let alias_start = cur.pos();
        while !cur.eof() && !cur.starts_with(WikiLink::CLOSE) {
            cur.bump();
        }
        alias = Some(Span::new(alias_start, cur.pos()));
    }

    if !cur.starts_with(WikiLink::CLOSE) {
        *cur = saved;
        return None;
    }
    cur.bump_n(WikiLink::CLOSE.len());

    Some(Token::WikiLink {
        full: Span::new(start, cur.pos()),
        target,
        alias,
    })
}
