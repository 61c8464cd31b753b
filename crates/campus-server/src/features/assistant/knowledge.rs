//! Assistant knowledge base
//!
//! A JSON array of question/answer pairs, read from disk exactly once at
//! startup and immutable for the life of the process.

use serde::Deserialize;
use std::path::Path;

use campus_common::CampusError;

/// One curated Q/A pair
#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeEntry {
    pub question: String,
    pub answer: String,
}

/// Load the knowledge base from a JSON file
pub fn load(path: &Path) -> Result<Vec<KnowledgeEntry>, CampusError> {
    let raw = std::fs::read_to_string(path)?;
    let entries: Vec<KnowledgeEntry> = serde_json::from_str(&raw)?;
    Ok(entries)
}

/// Render the knowledge base into prompt context
pub fn render(entries: &[KnowledgeEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str("Q: ");
        out.push_str(&entry.question);
        out.push_str("\nA: ");
        out.push_str(&entry.answer);
        out.push_str("\n\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_and_render() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"question": "When is the term exam?", "answer": "In June."}}]"#
        )
        .unwrap();

        let entries = load(file.path()).unwrap();
        assert_eq!(entries.len(), 1);
        let rendered = render(&entries);
        assert!(rendered.contains("Q: When is the term exam?"));
        assert!(rendered.contains("A: In June."));
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(load(Path::new("/nonexistent/kb.json")).is_err());
    }
}
