//! Enter and Backspace through the public `Editor` API.

mod common;

use common::{editor, editor_with_config, render};
use markdown_structedit_config::{EditorConfig, LineBreak};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn enter(marked: &str) -> Option<String> {
    let mut editor = editor(marked);
    editor.insert_newline_continue_markup()?;
    Some(render(&editor))
}

fn backspace(marked: &str) -> Option<String> {
    let mut editor = editor(marked);
    editor.delete_markup_backward()?;
    Some(render(&editor))
}

#[rstest]
#[case("- item|", "- item\n- |")]
#[case("- |", "|")]
#[case("> \n> |", "\n|")]
#[case("1. a|\n2. b\n4. c", "1. a\n2. |\n3. b\n4. c")]
#[case("> 1. a|", "> 1. a\n> 2. |")]
fn test_enter(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(enter(input).as_deref(), Some(expected));
}

#[test]
fn test_backspace_twice_removes_marker() {
    let mut editor = editor("- one\n- |two");
    editor.delete_markup_backward().unwrap();
    assert_eq!(render(&editor), "- one\n  |two");
    editor.delete_markup_backward().unwrap();
    assert_eq!(render(&editor), "- one\n|two");
    assert!(editor.delete_markup_backward().is_none());
}

#[test]
fn test_backspace_twice_on_empty_item() {
    let mut editor = editor("- |");
    editor.delete_markup_backward().unwrap();
    assert_eq!(render(&editor), "  |");
    editor.delete_markup_backward().unwrap();
    assert_eq!(render(&editor), "|");
}

#[rstest]
#[case("plain text|")]
#[case("- a|\n\nplain|")]
#[case("```rust\n- a|\n```")]
#[case("<- a>")]
fn test_enter_declines(#[case] input: &str) {
    let mut editor = editor(input);
    let before = editor.text().to_string();
    assert!(editor.insert_newline_continue_markup().is_none());
    assert_eq!(editor.text(), before);
    assert_eq!(editor.version(), 0);
}

#[test]
fn test_backspace_declines_mid_text() {
    assert_eq!(backspace("- it|em"), None);
}

#[test]
fn test_list_session() {
    let mut editor = editor("- a|");
    let patch = editor.insert_newline_continue_markup().unwrap();
    insta::assert_debug_snapshot!(patch, @r"
    Patch {
        changed: [
            3..6,
        ],
        new_selection: 6..6,
        version: 1,
    }
    ");

    editor.replace_selections("b", None).unwrap();
    editor.insert_newline_continue_markup().unwrap();
    assert_eq!(render(&editor), "- a\n- b\n- |");

    // Enter on the empty item ends the list
    editor.insert_newline_continue_markup().unwrap();
    assert_eq!(render(&editor), "- a\n- b\n\n|");
    assert_eq!(editor.version(), 4);
}

#[test]
fn test_crlf_documents_keep_crlf() {
    let config = EditorConfig {
        line_break: LineBreak::CrLf,
        ..EditorConfig::default()
    };
    let mut editor = editor_with_config("- a\r\n- b|", config);
    editor.insert_newline_continue_markup().unwrap();
    assert_eq!(render(&editor), "- a\r\n- b\r\n- |");
}
