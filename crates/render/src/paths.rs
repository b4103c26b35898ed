use procsight_core::PipelineError;

/// Validate a caller-supplied artifact filename.
///
/// Artifact names must be a single path component; separators and parent
/// references are rejected so a filename can never escape the output
/// directory.
pub fn checked_filename(filename: &str) -> Result<&str, PipelineError> {
    let trimmed = filename.trim();

    if trimmed.is_empty() {
        return Err(PipelineError::Render("artifact filename must not be empty".to_string()));
    }

    if trimmed.contains('/') || trimmed.contains('\\') || trimmed.contains("..") {
        return Err(PipelineError::Render(format!(
            "artifact filename `{trimmed}` must be a bare file name"
        )));
    }

    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::checked_filename;

    #[test]
    fn bare_names_pass() {
        assert_eq!(checked_filename("deck.html").expect("bare name"), "deck.html");
        assert_eq!(checked_filename("  narration.mp3 ").expect("trimmed"), "narration.mp3");
    }

    #[test]
    fn separators_and_parent_references_are_rejected() {
        for candidate in ["../etc/passwd", "a/b.html", "a\\b.mp3", ""] {
            assert!(checked_filename(candidate).is_err(), "accepted `{candidate}`");
        }
    }
}
