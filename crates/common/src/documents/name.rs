use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::DocumentError;

/// Longest file name most filesystems accept, in bytes
pub const MAX_NAME_LEN: usize = 255;

/// The kinds of document we know how to store and render.
///
/// The kind is derived from the file extension and is the only
/// thing that decides how a document is shown to a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentKind {
    /// `.txt`, served verbatim
    Text,
    /// `.md`, rendered to HTML
    Markdown,
}

impl DocumentKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "txt" => Some(Self::Text),
            "md" => Some(Self::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Markdown => "md",
        }
    }
}

/// A validated document file name.
///
/// Parsing is the root-confinement check for the document store:
/// a `DocumentName` is always a single, non-hidden path segment with
/// a supported extension, so joining it onto the store root can
/// never escape that directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentName {
    raw: String,
    kind: DocumentKind,
}

impl DocumentName {
    pub fn parse(raw: &str) -> Result<Self, DocumentError> {
        if raw.is_empty() {
            return Err(DocumentError::EmptyName);
        }

        if raw.len() > MAX_NAME_LEN
            || raw.starts_with('.')
            || raw.contains(['/', '\\', '\0'])
            || raw.chars().any(char::is_control)
        {
            return Err(DocumentError::InvalidName(raw.to_string()));
        }

        let kind = Path::new(raw)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(DocumentKind::from_extension)
            .ok_or_else(|| DocumentError::UnsupportedType(raw.to_string()))?;

        Ok(Self {
            raw: raw.to_string(),
            kind,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }
}

impl fmt::Display for DocumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for DocumentName {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for DocumentName {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_and_markdown() {
        let name = DocumentName::parse("about.txt").unwrap();
        assert_eq!(name.kind(), DocumentKind::Text);
        assert_eq!(name.as_str(), "about.txt");

        let name = DocumentName::parse("changes.md").unwrap();
        assert_eq!(name.kind(), DocumentKind::Markdown);
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(
            DocumentName::parse(""),
            Err(DocumentError::EmptyName)
        ));
    }

    #[test]
    fn test_parse_rejects_unsupported_extensions() {
        for raw in ["notes", "notes.rb", "notes.TXT", "archive.md.gz"] {
            assert!(
                matches!(
                    DocumentName::parse(raw),
                    Err(DocumentError::UnsupportedType(_))
                ),
                "{raw} should be unsupported"
            );
        }
    }

    #[test]
    fn test_parse_rejects_traversal() {
        for raw in [
            "../secret.txt",
            "../../etc/passwd.md",
            "nested/notes.md",
            "..\\notes.txt",
            ".hidden.txt",
            "..",
            "nul\0.txt",
        ] {
            assert!(
                matches!(DocumentName::parse(raw), Err(DocumentError::InvalidName(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_overlong_names() {
        let longest = format!("{}.md", "a".repeat(MAX_NAME_LEN - 3));
        assert!(DocumentName::parse(&longest).is_ok());

        let too_long = format!("{}.md", "a".repeat(MAX_NAME_LEN));
        assert!(matches!(
            DocumentName::parse(&too_long),
            Err(DocumentError::InvalidName(_))
        ));
    }

    #[test]
    fn test_kind_extension_roundtrip() {
        for kind in [DocumentKind::Text, DocumentKind::Markdown] {
            assert_eq!(DocumentKind::from_extension(kind.extension()), Some(kind));
        }
    }
}
