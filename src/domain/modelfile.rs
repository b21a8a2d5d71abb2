//! Modelfile `FROM` line substitution.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::DomainError;

/// Instruction naming the checkpoint a Modelfile builds from.
pub const FROM_MARKER: &str = "FROM";

/// Well-known Modelfile name in the working directory.
pub const MODELFILE_NAME: &str = "Modelfile";

// `FROM` as a whole token: "FROMAGE" is not an instruction
static FROM_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^FROM(\s|$)").expect("constant FROM pattern"));

/// Replace the single `FROM` line with `FROM <checkpoint>`.
///
/// Every other byte, including line terminators and a missing final newline,
/// is preserved. Exactly one line must start with the `FROM` token, and the
/// checkpoint must fit on that line.
pub fn replace_from_line(content: &str, checkpoint: &str) -> Result<String, DomainError> {
    validate_checkpoint(checkpoint)?;

    let count = content.lines().filter(|l| is_from_line(l)).count();
    match count {
        0 => {
            return Err(DomainError::MarkerNotFound {
                marker: FROM_MARKER,
            })
        }
        1 => {}
        n => {
            return Err(DomainError::MultipleMarkers {
                marker: FROM_MARKER,
                count: n,
            })
        }
    }

    let mut out = String::with_capacity(content.len() + checkpoint.len());
    for line in content.split_inclusive('\n') {
        let (body, terminator) = split_terminator(line);
        if is_from_line(body) {
            out.push_str(FROM_MARKER);
            out.push(' ');
            out.push_str(checkpoint);
            out.push_str(terminator);
        } else {
            out.push_str(line);
        }
    }
    Ok(out)
}

/// A checkpoint must be non-blank and stay on the `FROM` line.
pub fn validate_checkpoint(checkpoint: &str) -> Result<(), DomainError> {
    if checkpoint.trim().is_empty() || checkpoint.contains(['\n', '\r']) {
        return Err(DomainError::InvalidCheckpoint {
            checkpoint: checkpoint.escape_debug().to_string(),
        });
    }
    Ok(())
}

fn is_from_line(line: &str) -> bool {
    FROM_LINE.is_match(line)
}

fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}
