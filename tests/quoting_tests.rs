use std::io;
use std::sync::Arc;
use tempfile::TempDir;
use tush::{Builtins, Runtime, ShellError};

fn run(line: &str, temp: &TempDir) -> Result<String, ShellError> {
    let mut runtime = Runtime::with_cwd(temp.path());
    let mut out = Vec::new();
    tush::eval(line, Arc::new(Builtins::new()), &mut runtime, &mut io::empty(), &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_unquoted_words_pass_through() {
    let temp = TempDir::new().unwrap();
    assert_eq!(run("echo hello-world_1.txt", &temp).unwrap(), "hello-world_1.txt\n");
}

#[test]
fn test_single_quotes_keep_spaces() {
    let temp = TempDir::new().unwrap();
    assert_eq!(run("echo 'a   b'", &temp).unwrap(), "a   b\n");
}

#[test]
fn test_double_quotes_keep_spaces() {
    let temp = TempDir::new().unwrap();
    assert_eq!(run("echo \"a   b\"", &temp).unwrap(), "a   b\n");
}

#[test]
fn test_operators_inside_quotes_are_literal() {
    let temp = TempDir::new().unwrap();
    assert_eq!(run("echo 'a | b ; c < d > e'", &temp).unwrap(), "a | b ; c < d > e\n");
    assert_eq!(run("echo \"x|y;z\"", &temp).unwrap(), "x|y;z\n");
    assert!(!temp.path().join("e").exists());
}

#[test]
fn test_backquote_in_single_quotes_is_not_evaluated() {
    let temp = TempDir::new().unwrap();
    assert_eq!(run("echo '`echo hi`'", &temp).unwrap(), "`echo hi`\n");
}

#[test]
fn test_backquote_in_double_quotes_is_evaluated() {
    let temp = TempDir::new().unwrap();
    assert_eq!(run("echo \"say `echo hi`\"", &temp).unwrap(), "say hi\n");
}

#[test]
fn test_adjacent_quoted_parts_join() {
    let temp = TempDir::new().unwrap();
    assert_eq!(run("echo a'b'\"c\"d", &temp).unwrap(), "abcd\n");
}

#[test]
fn test_each_quote_kind_protects_the_other() {
    let temp = TempDir::new().unwrap();
    assert_eq!(run("echo \"it's\" 'say \"hi\"'", &temp).unwrap(), "it's say \"hi\"\n");
}

#[test]
fn test_empty_quotes_are_an_argument() {
    let temp = TempDir::new().unwrap();
    assert_eq!(run("echo a '' b", &temp).unwrap(), "a  b\n");
}

#[test]
fn test_unterminated_quotes_are_syntax_errors() {
    let temp = TempDir::new().unwrap();
    for line in ["echo 'abc", "echo \"abc", "echo `echo"] {
        assert!(
            matches!(run(line, &temp), Err(ShellError::Syntax(_))),
            "{line}"
        );
    }
}
