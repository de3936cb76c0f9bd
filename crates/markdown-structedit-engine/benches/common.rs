// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with **some** content.\n\n- Bullet point\n  - Nested item\n- Another item\n\n1. First\n2. Second\n3. Third\n\n> Quoted\n> - quoted item\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}

/// A long ordered list, so inserting near the top renumbers every item
#[allow(dead_code)]
pub fn generate_ordered_list(items: usize) -> String {
    (1..=items).map(|i| format!("{i}. Item {i}\n")).collect()
}

/// Plain lines for the line-based toggles
#[allow(dead_code)]
pub fn generate_lines(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("Line {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}
