//! Parsing of migration file text into executable statements.
//!
//! A migration file holds a forward body and an optional rollback block. The
//! block opens on a comment line containing `-- rollback` (case-insensitive)
//! and closes on a comment line containing `end rollback`, or at end of file.
//! A marker trailing a statement on the same line is an ordinary comment.
//! Everything before the first opening marker is the forward body.
//!
//! Splitting is line based: blank lines and `--` comment lines are dropped,
//! and a statement ends on a line whose code, ignoring any trailing comment,
//! ends with `;`. Text left over at the end becomes a final statement.

const ROLLBACK_MARKER: &str = "-- rollback";
const END_ROLLBACK_MARKER: &str = "end rollback";

fn is_comment_line(line: &str) -> bool {
    line.trim_start().starts_with("--")
}

fn is_rollback_marker(line: &str) -> bool {
    is_comment_line(line) && line.to_lowercase().contains(ROLLBACK_MARKER)
}

fn is_end_rollback_marker(line: &str) -> bool {
    is_comment_line(line) && line.to_lowercase().contains(END_ROLLBACK_MARKER)
}

/// `line` without a trailing `--` comment. Dashes inside single-quoted
/// literals are kept.
fn without_trailing_comment(line: &str) -> &str {
    let mut quoted = false;
    let mut previous_dash = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '\'' => {
                quoted = !quoted;
                previous_dash = false;
            }
            '-' if !quoted && previous_dash => {
                return line.get(..index.saturating_sub(1)).unwrap_or(line);
            }
            '-' if !quoted => previous_dash = true,
            _ => previous_dash = false,
        }
    }
    line
}

/// Split SQL text into statements.
///
/// # Examples
///
/// ```
/// use fleetify::domain::split_statements;
///
/// let sql = "-- header\nCREATE TABLE a (\n  id INT\n);\n\nINSERT INTO a VALUES (1)";
/// assert_eq!(
///     split_statements(sql),
///     vec!["CREATE TABLE a (\n  id INT\n);", "INSERT INTO a VALUES (1)"]
/// );
/// ```
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }
        current.push_str(line);
        current.push('\n');

        if without_trailing_comment(trimmed).trim_end().ends_with(';') {
            push_statement(&mut statements, &current);
            current.clear();
        }
    }
    push_statement(&mut statements, &current);
    statements
}

fn push_statement(statements: &mut Vec<String>, buffer: &str) {
    let statement = buffer.trim();
    if !statement.is_empty() {
        statements.push(statement.to_owned());
    }
}

/// Text of the migration before the first rollback marker.
pub fn forward_body(contents: &str) -> String {
    contents
        .lines()
        .take_while(|line| !is_rollback_marker(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Raw text of the rollback block, or `None` when the file has no marker.
pub fn rollback_block(contents: &str) -> Option<String> {
    let mut lines = contents.lines().skip_while(|line| !is_rollback_marker(line));
    lines.next()?;

    let mut block = Vec::new();
    for line in lines {
        if is_rollback_marker(line) {
            continue;
        }
        if is_end_rollback_marker(line) {
            break;
        }
        block.push(line);
    }
    Some(block.join("\n"))
}

/// Forward statements of a migration file.
pub fn forward_statements(contents: &str) -> Vec<String> {
    split_statements(&forward_body(contents))
}

/// Executable rollback statements of a migration file.
///
/// Empty when the file has no rollback block or the block holds only
/// comments.
pub fn rollback_statements(contents: &str) -> Vec<String> {
    rollback_block(contents)
        .map(|block| split_statements(&block))
        .unwrap_or_default()
}
