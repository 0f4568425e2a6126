//! Tokenization of prompt lines.
//!
//! A line is split on runs of whitespace; there is no quoting or escaping. The resulting
//! tokens are then divided into a command path and the arguments handed to the handler.
//!
//! Path/argument splitting uses the *fixed-width* policy: the first [`PATH_WIDTH`] tokens
//! form the path and everything after them is passed as arguments. Handlers are therefore
//! addressed by a two-level `group name` pair (or a single word when the line has only one
//! token). Capitalization carries no routing meaning.

/// Number of leading tokens that make up the command path.
pub const PATH_WIDTH: usize = 2;

/// Split a raw line into whitespace-separated tokens, preserving order.
///
/// Empty segments are discarded, so a blank or whitespace-only line yields no tokens.
pub fn split_into_tokens(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

/// Separate a token sequence into `(path, args)` using the fixed-width policy.
pub fn split_path_and_args(tokens: &[String]) -> (&[String], &[String]) {
    let split = tokens.len().min(PATH_WIDTH);
    tokens.split_at(split)
}
