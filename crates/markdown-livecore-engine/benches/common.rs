// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with `code` and a [[Link|alias]].\n\n- Bullet point\n  - Nested item\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n~~~\nplain block\n~~~\n\n";
    base.repeat(size)
}

/// Byte offset of the start of the paragraph that is `fraction` of the way
/// into `content`.
#[allow(dead_code)]
pub fn paragraph_start_near(content: &str, fraction: f64) -> usize {
    let target = (content.len() as f64 * fraction) as usize;
    content[..target].rfind('\n').map_or(0, |i| i + 1)
}
