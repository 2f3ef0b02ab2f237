//! Integration tests for the command-driven editing session.

mod common;

use common::{compact, parse};
use listquill::config::Config;
use listquill::editor::command::{Command, CommandError};
use listquill::editor::state::EditorState;

fn editor(markup: &str) -> EditorState {
    EditorState::new(parse(markup), Config::default())
}

fn run(state: &mut EditorState, commands: &[&str]) {
    for line in commands {
        state
            .apply_str(line)
            .unwrap_or_else(|err| panic!("'{line}' failed: {err:#}"));
    }
}

#[test]
fn test_bullet_indent_scenario() {
    let mut state = editor("<ul><li>a</li><li>b</li></ul>");
    run(&mut state, &["indent 0.1"]);
    assert_eq!(
        compact(state.document()),
        r#"<ul><li>a</li><ul data-level="1"><li>b</li></ul></ul>"#
    );
}

#[test]
fn test_indent_then_outdent() {
    let mut state = editor("<ul><li>a</li><li>b</li><li>c</li></ul>");
    let original = state.document().outline();
    run(&mut state, &["indent 0.1", "indent 0.1.0", "outdent 0.1.0.0.0", "outdent 0.1.0"]);
    assert_eq!(state.document().outline(), original);
}

#[test]
fn test_checklist_commands() {
    let mut state = editor("<p>milk</p><p>eggs</p>");
    run(&mut state, &["list unchecked 0", "list unchecked 1", "toggle 0.1"]);
    assert_eq!(
        compact(state.document()),
        concat!(
            r#"<ul data-checked="false"><li>milk</li></ul>"#,
            r#"<ul data-checked="true"><li>eggs</li></ul>"#
        )
    );

    run(&mut state, &["toggle 1.0"]);
    assert_eq!(
        compact(state.document()),
        r#"<ul data-checked="false"><li>milk</li><li>eggs</li></ul>"#
    );
}

#[test]
fn test_unlist_nested_line_outdents_first() {
    let mut state = editor(concat!(
        r#"<ul><li>a</li><ul data-level="1">"#,
        r#"<li><ul data-level="2"><li>deep</li></ul></li>"#,
        r#"</ul></ul>"#
    ));
    run(&mut state, &["unlist 0.1.0.0.0"]);
    assert_eq!(compact(state.document()), "<ul><li>a</li></ul><p>deep</p>");
}

#[test]
fn test_change_kind_of_nested_line() {
    let mut state = editor(r#"<ul><li>a</li><ul data-level="1"><li>b</li></ul></ul>"#);
    run(&mut state, &["list ordered 0.1.0"]);
    assert_eq!(
        compact(state.document()),
        "<ul><li>a</li></ul><ol><li>b</li></ol>"
    );
}

#[test]
fn test_change_kind_of_deeply_nested_line() {
    let mut state = editor(concat!(
        r#"<ul><li>a</li><ul data-level="1">"#,
        r#"<li><ul data-level="2"><li>deep</li></ul></li>"#,
        r#"</ul></ul>"#
    ));
    run(&mut state, &["list checked 0.1.0.0.0"]);
    assert_eq!(
        compact(state.document()),
        r#"<ul><li>a</li></ul><ul data-checked="true"><li>deep</li></ul>"#
    );
}

#[test]
fn test_unlisting_wrapper_line_is_rolled_back() {
    let mut state = editor(concat!(
        r#"<ul><li>a</li><ul data-level="1">"#,
        r#"<li><ul data-level="2"><li>deep</li></ul></li>"#,
        r#"</ul></ul>"#
    ));
    let before = state.document().outline();
    let err = state.apply_str("unlist 0.1.0").unwrap_err();
    assert!(format!("{err:#}").contains("Command 'unlist 0.1.0' failed"));
    assert_eq!(state.document().outline(), before);
    assert!(!state.is_dirty());
}

#[test]
fn test_remove_command() {
    let mut state = editor("<ol><li>a</li><li>b</li></ol><p>end</p>");
    run(&mut state, &["remove 0.0", "remove 0.0"]);
    assert_eq!(compact(state.document()), "<p>end</p>");
}

#[test]
fn test_bad_command_lines() {
    let mut state = editor("<p>a</p>");
    let err = state.apply_str("shuffle 0").unwrap_err();
    let cause = err.downcast_ref::<CommandError>();
    assert_eq!(cause, Some(&CommandError::Unknown("shuffle".to_string())));

    assert!(state.apply_str("indent 7").is_err());
    assert!(state.apply_str("indent 0").is_err());
    assert!(!state.is_dirty());
}

#[test]
fn test_commands_display_as_they_parse() {
    let cmd = Command::parse("outdent 0.1.0").unwrap();
    assert_eq!(cmd.to_string(), "outdent 0.1.0");
    assert_eq!(cmd.path(), &[0, 1, 0]);
}
