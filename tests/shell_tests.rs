//! Tests for the query shell
//!
//! These tests verify:
//! - Command parsing, including the original error strings
//! - Session execution end to end against a real store file
//! - Commit-through-the-shell surviving a new session

use cordkv::shell::{Command, Reply, Session, TextStore};
use cordkv::CordError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_session() -> (TempDir, Session) {
    let temp_dir = TempDir::new().unwrap();
    let store = TextStore::open_path(temp_dir.path().join("shell.db")).unwrap();
    (temp_dir, Session::new(store))
}

fn output(reply: Reply) -> String {
    match reply {
        Reply::Output(s) => s,
        Reply::Exit => panic!("expected output, got exit"),
    }
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn test_parse_set() {
    assert_eq!(
        Command::parse("set name=ada").unwrap(),
        Command::Set {
            key: "name".to_string(),
            value: "ada".to_string()
        }
    );
}

#[test]
fn test_parse_set_trims_around_equals() {
    assert_eq!(
        Command::parse("set name = ada lovelace").unwrap(),
        Command::Set {
            key: "name".to_string(),
            value: "ada lovelace".to_string()
        }
    );
}

#[test]
fn test_parse_get_and_pop() {
    assert_eq!(
        Command::parse("get name").unwrap(),
        Command::Get {
            key: "name".to_string()
        }
    );
    assert_eq!(
        Command::parse("pop name").unwrap(),
        Command::Pop {
            key: "name".to_string()
        }
    );
}

#[test]
fn test_parse_bare_commands() {
    assert_eq!(Command::parse("commit").unwrap(), Command::Commit);
    assert_eq!(Command::parse("help").unwrap(), Command::Help);
    assert_eq!(Command::parse("exit").unwrap(), Command::Exit);
    assert_eq!(Command::parse("quit").unwrap(), Command::Exit);
}

#[test]
fn test_parse_unknown_command() {
    let err = Command::parse("drop everything").unwrap_err();
    match err {
        CordError::Query(msg) => {
            assert_eq!(msg, "Invalid query. drop is not a cordkv command.")
        }
        other => panic!("expected query error, got {:?}", other),
    }
}

#[test]
fn test_parse_bad_set_syntax() {
    for line in ["set noequals", "set a=b=c", "set =value"] {
        let err = Command::parse(line).unwrap_err();
        match err {
            CordError::Query(msg) => assert_eq!(msg, "Invalid set syntax."),
            other => panic!("expected query error, got {:?}", other),
        }
    }
}

#[test]
fn test_parse_missing_key() {
    assert!(matches!(
        Command::parse("get").unwrap_err(),
        CordError::Query(_)
    ));
}

// =============================================================================
// Session Execution
// =============================================================================

#[test]
fn test_session_set_get_pop_flow() {
    let (_temp, mut session) = setup_session();

    assert_eq!(output(session.execute("set greeting=hello")), "  set greeting: hello");
    assert_eq!(output(session.execute("get greeting")), "hello");
    assert_eq!(output(session.execute("pop greeting")), "hello");
    assert_eq!(output(session.execute("get greeting")), "Not found: greeting");
    assert_eq!(output(session.execute("pop greeting")), "Not found: greeting");
}

#[test]
fn test_session_reports_parse_errors_as_output() {
    let (_temp, mut session) = setup_session();

    assert_eq!(
        output(session.execute("frobnicate x")),
        "Invalid query. frobnicate is not a cordkv command."
    );
    assert_eq!(output(session.execute("set oops")), "Invalid set syntax.");
}

#[test]
fn test_session_exit() {
    let (_temp, mut session) = setup_session();
    assert!(matches!(session.execute("exit"), Reply::Exit));
}

#[test]
fn test_session_commit_survives_new_session() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("shell.db");

    {
        let store = TextStore::open_path(&db_path).unwrap();
        let mut session = Session::new(store);
        session.execute("set color=teal");
        assert_eq!(output(session.execute("commit")), "committed");
        assert!(!session.store().is_dirty());
    }

    let store = TextStore::open_path(&db_path).unwrap();
    let mut session = Session::new(store);
    assert_eq!(output(session.execute("get color")), "teal");
}

#[test]
fn test_session_without_commit_loses_changes() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("shell.db");

    {
        let store = TextStore::open_path(&db_path).unwrap();
        let mut session = Session::new(store);
        session.execute("set color=teal");
        assert!(session.store().is_dirty());
    }

    let store = TextStore::open_path(&db_path).unwrap();
    let mut session = Session::new(store);
    assert_eq!(output(session.execute("get color")), "Not found: color");
}
