//! Escaping for the two micro-languages commands pass through on their way
//! into Vim.
//!
//! Expressions are embedded in a single-quoted Vim string literal on the
//! remote-expr command line; filenames are typed as literal keystrokes into
//! Vim's own command line, which understands backslash escapes rather than
//! shell quoting. The two transforms are not interchangeable.

/// Escape a string for embedding inside a single-quoted Vim string literal.
///
/// Inside `'...'` Vim treats `''` as a literal single quote and nothing else
/// specially, so doubling every quote is the entire transform.
pub fn escape_expression(expression: &str) -> String {
    expression.replace('\'', "''")
}

/// Escape a path for use on Vim's command line (`:edit`, `:source`, ...).
///
/// Every character outside `[A-Za-z0-9_\-.,:/@\n]` is prefixed with a
/// backslash, matching what Vim itself accepts for special characters in
/// filenames.
pub fn escape_filename(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        if !is_filename_safe(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn is_filename_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ',' | ':' | '/' | '@' | '\n')
}
