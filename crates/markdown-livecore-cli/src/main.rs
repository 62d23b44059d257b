use anyhow::{Context, Result, bail};
use markdown_livecore_config::Config;
use markdown_livecore_engine::{
    Cmd, LiveDocument, ParagraphStatus, StructureCache, Token, io,
    parsing::rope::strip_terminator,
};
use std::{env, path::PathBuf, process, time::Instant};

const USAGE: &str = "Usage: markdown-livecore-cli <inspect|check|config> [FILE]";

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(command) = args.get(1) else {
        eprintln!("{USAGE}");
        process::exit(1);
    };

    let config = Config::load_or_default()?;
    match command.as_str() {
        "inspect" => inspect(&config, document_path(&config, args.get(2))?),
        "check" => check(&config, document_path(&config, args.get(2))?),
        "config" => show_config(&config),
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    }
}

/// The file named on the command line, else the configured default document.
fn document_path(config: &Config, arg: Option<&String>) -> Result<PathBuf> {
    match (arg, &config.default_document) {
        (Some(path), _) => Ok(PathBuf::from(path)),
        (None, Some(path)) => Ok(path.clone()),
        (None, None) => bail!(
            "No file given and no default_document in {}",
            Config::config_path().display()
        ),
    }
}

/// Prints every paragraph with its fence status and tokens.
fn inspect(config: &Config, path: PathBuf) -> Result<()> {
    let mut doc = io::read_document(&path, config.scan)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    println!(
        "{}: {} paragraphs, {} fenced blocks",
        path.display(),
        doc.paragraph_count(),
        doc.blocks().len()
    );
    for block in doc.blocks() {
        println!(
            "  block {}..={} {:?} {}{}",
            block.start,
            block.end,
            block.kind,
            block.language.as_deref().unwrap_or("-"),
            if block.is_closed { "" } else { " (unclosed)" }
        );
    }

    for ordinal in 0..doc.paragraph_count() {
        let line = doc
            .paragraph(ordinal)
            .map(strip_terminator)
            .unwrap_or_default()
            .to_string();
        let status = describe_status(doc.status(ordinal));
        let tokens = doc.tokens(ordinal).map(describe_tokens).unwrap_or_default();
        println!("{ordinal:>5} {status:<16} {line:?} {tokens}");
    }
    Ok(())
}

fn describe_status(status: ParagraphStatus<'_>) -> String {
    match status {
        ParagraphStatus::OpeningFence(lang) => format!("open({})", lang.unwrap_or("-")),
        ParagraphStatus::ClosingFence => "close".to_string(),
        ParagraphStatus::Inside(lang) => format!("inside({})", lang.unwrap_or("-")),
        ParagraphStatus::None => String::new(),
    }
}

fn describe_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| match t {
            Token::Text(_) => "text",
            Token::CodeSpan { .. } => "code",
            Token::WikiLink { .. } => "link",
            Token::FenceDelimiter { .. } => "fence",
            Token::CodeLine(_) => "line",
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Types the file into an empty document one character at a time and checks
/// the incremental structure against a full scan after every keystroke.
fn check(config: &Config, path: PathBuf) -> Result<()> {
    let source = io::read_document(&path, config.scan)
        .with_context(|| format!("Failed to open {}", path.display()))?
        .text();

    let mut doc = LiveDocument::new(config.scan);
    let started = Instant::now();
    let mut keystrokes = 0usize;
    let mut relaid_out = 0usize;

    for (at, ch) in source.char_indices() {
        let patch = doc.apply(&Cmd::InsertText {
            at,
            text: ch.to_string(),
        })?;
        keystrokes += 1;
        relaid_out += patch.relayout.len();

        let full = StructureCache::scan(doc.scanner(), doc.paragraphs());
        if full.structure() != doc.structure().structure() {
            bail!(
                "Structure diverged after keystroke {keystrokes} (offset {at}): incremental {:?}, full {:?}",
                doc.blocks(),
                full.blocks()
            );
        }
        for ordinal in patch.relayout {
            doc.tokens(ordinal);
        }
    }

    let elapsed = started.elapsed();
    let stats = doc.token_stats();
    log::info!(
        "{}: {keystrokes} keystrokes replayed in {elapsed:?} (including verification)",
        path.display()
    );
    println!(
        "ok: {} paragraphs, {} blocks, {:.2} paragraphs re-laid out per keystroke",
        doc.paragraph_count(),
        doc.blocks().len(),
        relaid_out as f64 / keystrokes.max(1) as f64
    );
    println!(
        "token cache: {} hits, {} misses ({:.1}% hit rate)",
        stats.hits,
        stats.misses,
        stats.hit_rate()
    );
    Ok(())
}

fn show_config(config: &Config) -> Result<()> {
    println!("# {}", Config::config_path().display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
