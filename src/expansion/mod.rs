//! Argument resolution: quote removal, backtick substitution and globbing.
//!
//! Quoting rules for one raw word:
//!
//! - outside quotes, `'` and `"` open a quoted span, a backtick opens a
//!   substitution, `*` is a wildcard, anything else is literal
//! - inside single quotes everything is literal up to the closing `'`
//! - inside double quotes only backticks stay special
//!
//! Substituted output loses its trailing newlines. Outside quotes it is
//! then split on whitespace and `*` in a field still globs. Fields glue
//! onto the surrounding text unless the output begins or ends with
//! whitespace there, which separates words the same way a space would.
//! Inside double quotes the output is kept as one piece with its newlines
//! turned into spaces.

use crate::builtins::Builtins;
use crate::error::{Result, ShellError};
use crate::executor::CommandBuilder;
use crate::glob_expansion::GlobPattern;
use crate::runtime::Runtime;
use std::io;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Quote {
    None,
    Single,
    Double,
}

/// Turns raw words into final argument strings.
#[derive(Clone)]
pub struct ArgumentResolver {
    builtins: Arc<Builtins>,
}

impl ArgumentResolver {
    pub fn new(builtins: Arc<Builtins>) -> Self {
        Self { builtins }
    }

    /// Resolve every word in order and flatten the results.
    pub fn resolve_arguments(&self, raw: &[String], runtime: &Runtime) -> Result<Vec<String>> {
        let mut resolved = Vec::new();
        for word in raw {
            resolved.extend(self.resolve_one(word, runtime)?);
        }
        Ok(resolved)
    }

    /// Resolve one raw word into zero or more arguments.
    ///
    /// A word made only of a substitution that printed nothing vanishes;
    /// a quoted empty string (`''`, `""`) stays as one empty argument.
    pub fn resolve_one(&self, raw: &str, runtime: &Runtime) -> Result<Vec<String>> {
        let mut words: Vec<GlobPattern> = Vec::new();
        let mut current = GlobPattern::new();
        let mut has_content = false;
        // Set when substituted output ended in whitespace: whatever comes
        // next starts a new word.
        let mut split_pending = false;
        let mut quote = Quote::None;

        let mut chars = raw.char_indices();
        while let Some((index, ch)) = chars.next() {
            if split_pending && ch != '`' {
                words.push(std::mem::take(&mut current));
                split_pending = false;
            }

            match (quote, ch) {
                (Quote::None, '\'') => {
                    quote = Quote::Single;
                    has_content = true;
                }
                (Quote::None, '"') => {
                    quote = Quote::Double;
                    has_content = true;
                }
                (Quote::Single, '\'') | (Quote::Double, '"') => quote = Quote::None,
                (Quote::None, '`') | (Quote::Double, '`') => {
                    let start = index + 1;
                    let length = raw[start..]
                        .find('`')
                        .ok_or_else(|| ShellError::syntax("unterminated backquote"))?;
                    let command = &raw[start..start + length];
                    // Skip past the closing backtick.
                    for _ in command.chars() {
                        chars.next();
                    }
                    chars.next();

                    let output = self.substitute(command, runtime)?;
                    if quote == Quote::Double {
                        if split_pending {
                            words.push(std::mem::take(&mut current));
                            split_pending = false;
                        }
                        current.push_str(&output.replace('\n', " "));
                        continue;
                    }

                    let fields: Vec<&str> = output.split_whitespace().collect();
                    if fields.is_empty() {
                        split_pending |= has_content && !output.is_empty();
                        continue;
                    }

                    let leading = output.starts_with(char::is_whitespace);
                    for (n, field) in fields.into_iter().enumerate() {
                        if n > 0 || split_pending || (leading && has_content) {
                            words.push(std::mem::take(&mut current));
                            split_pending = false;
                        }
                        current.merge(unquoted(field));
                        has_content = true;
                    }
                    split_pending = output.ends_with(char::is_whitespace);
                }
                (Quote::None, '*') => {
                    current.push_wildcard();
                    has_content = true;
                }
                (_, ch) => {
                    current.push(ch);
                    has_content = true;
                }
            }
        }

        match quote {
            Quote::None => {}
            Quote::Single => return Err(ShellError::syntax("unterminated single quote")),
            Quote::Double => return Err(ShellError::syntax("unterminated double quote")),
        }

        if has_content {
            words.push(current);
        }

        let mut resolved = Vec::new();
        for word in words {
            resolved.extend(word.glob_files(runtime)?);
        }
        Ok(resolved)
    }

    /// Evaluate a backquoted command and capture what it prints.
    fn substitute(&self, command: &str, runtime: &Runtime) -> Result<String> {
        if command.trim().is_empty() {
            return Ok(String::new());
        }

        let mut child = runtime.substitution()?;
        tracing::debug!(%command, depth = child.substitution_depth(), "command substitution");

        let mut root = CommandBuilder::new(self.builtins.clone()).build(command)?;
        let mut output = Vec::new();
        match root.evaluate(&mut child, &mut io::empty(), &mut output) {
            // `exit` inside backticks only ends the substitution.
            Ok(()) | Err(ShellError::Exit(_)) => {}
            Err(e) => return Err(e),
        }

        let text = String::from_utf8_lossy(&output);
        Ok(text.trim_end_matches(['\n', '\r']).to_string())
    }
}

/// Quote `text` so that resolving the result yields exactly `text`.
pub fn quote_literal(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('\'');
    for ch in text.chars() {
        if ch == '\'' {
            quoted.push_str("'\"'\"'");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('\'');
    quoted
}

/// A substituted field, with `*` still acting as a wildcard.
fn unquoted(field: &str) -> GlobPattern {
    let mut pattern = GlobPattern::new();
    for ch in field.chars() {
        if ch == '*' {
            pattern.push_wildcard();
        } else {
            pattern.push(ch);
        }
    }
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn resolver() -> ArgumentResolver {
        ArgumentResolver::new(Arc::new(Builtins::new()))
    }

    fn resolve(raw: &str) -> Vec<String> {
        let runtime = Runtime::with_cwd("/");
        resolver().resolve_one(raw, &runtime).unwrap()
    }

    #[test]
    fn test_plain_word_round_trips() {
        assert_eq!(resolve("hello-world_1.txt"), vec!["hello-world_1.txt"]);
    }

    #[test]
    fn test_quote_removal() {
        assert_eq!(resolve("'a b'"), vec!["a b"]);
        assert_eq!(resolve("\"a b\""), vec!["a b"]);
        assert_eq!(resolve("x'y'\"z\""), vec!["xyz"]);
    }

    #[test]
    fn test_empty_quotes_keep_an_argument() {
        assert_eq!(resolve("''"), vec![""]);
        assert_eq!(resolve("\"\""), vec![""]);
    }

    #[test]
    fn test_single_quotes_are_fully_literal() {
        assert_eq!(resolve("'`echo hi` \"x\" *'"), vec!["`echo hi` \"x\" *"]);
    }

    #[test]
    fn test_double_quotes_keep_single_quote_and_asterisk() {
        assert_eq!(resolve("\"it's *\""), vec!["it's *"]);
    }

    #[test]
    fn test_backquote_substitution() {
        assert_eq!(resolve("`echo hello`"), vec!["hello"]);
    }

    #[test]
    fn test_substitution_is_word_split() {
        assert_eq!(resolve("`echo a b c`"), vec!["a", "b", "c"]);
        assert_eq!(resolve("x`echo a b`y"), vec!["xa", "by"]);
    }

    #[test]
    fn test_whitespace_at_substitution_edges_separates_words() {
        assert_eq!(resolve("x`echo \"  b\"`"), vec!["x", "b"]);
        assert_eq!(resolve("`echo \"a  \"`y"), vec!["a", "y"]);
        assert_eq!(resolve("x`echo \" \"`y"), vec!["x", "y"]);
        assert_eq!(resolve("x`echo \" b \"`y"), vec!["x", "b", "y"]);
        assert_eq!(resolve("`echo \"a \"`"), vec!["a"]);
    }

    #[test]
    fn test_substitution_in_double_quotes_is_one_argument() {
        assert_eq!(resolve("\"x `echo a b` y\""), vec!["x a b y"]);
    }

    #[test]
    fn test_double_quotes_inside_substitution() {
        assert_eq!(resolve("\"`echo \"q\"`\""), vec!["q"]);
    }

    #[test]
    fn test_empty_substitution_vanishes() {
        assert!(resolve("`echo`").is_empty());
        assert_eq!(resolve("\"`echo`\""), vec![""]);
    }

    #[test]
    fn test_unterminated_quotes_are_syntax_errors() {
        let runtime = Runtime::with_cwd("/");
        for raw in ["'abc", "\"abc", "`echo"] {
            assert!(matches!(
                resolver().resolve_one(raw, &runtime),
                Err(ShellError::Syntax(_))
            ));
        }
    }

    #[test]
    fn test_glob_and_quoted_asterisk() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "").unwrap();
        fs::write(temp.path().join("b.txt"), "").unwrap();
        let runtime = Runtime::with_cwd(temp.path());

        assert_eq!(
            resolver().resolve_one("*.txt", &runtime).unwrap(),
            vec!["a.txt", "b.txt"]
        );
        assert_eq!(resolver().resolve_one("'*'.txt", &runtime).unwrap(), vec!["*.txt"]);
        assert_eq!(resolver().resolve_one("\"*.txt\"", &runtime).unwrap(), vec!["*.txt"]);
    }

    #[test]
    fn test_quote_literal_resolves_to_itself() {
        for text in ["plain", "with space", "it's", "*.txt", "`x`", ""] {
            assert_eq!(resolve(&quote_literal(text)), vec![text]);
        }
    }

    #[test]
    fn test_resolve_arguments_keeps_order() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b1"), "").unwrap();
        fs::write(temp.path().join("b2"), "").unwrap();
        fs::write(temp.path().join("a1"), "").unwrap();
        let runtime = Runtime::with_cwd(temp.path());

        let raw = vec!["b*".to_string(), "z".to_string(), "a*".to_string()];
        assert_eq!(
            resolver().resolve_arguments(&raw, &runtime).unwrap(),
            vec!["b1", "b2", "z", "a1"]
        );
    }
}
