use std::fmt;

/// Extensions accepted by the extraction engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Pdf,
    Txt,
    Docx,
    Doc,
    Pptx,
    Ppt,
}

/// Document family a loader is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Pdf,
    Text,
    WordProcessing,
    Presentation,
}

impl FileType {
    pub const ALL: [FileType; 6] = [
        FileType::Pdf,
        FileType::Txt,
        FileType::Docx,
        FileType::Doc,
        FileType::Pptx,
        FileType::Ppt,
    ];

    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|file_type| file_type.extension() == extension)
    }

    pub fn from_file_name(file_name: &str) -> Option<Self> {
        Self::from_extension(&extension_of(file_name))
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => ".pdf",
            Self::Txt => ".txt",
            Self::Docx => ".docx",
            Self::Doc => ".doc",
            Self::Pptx => ".pptx",
            Self::Ppt => ".ppt",
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Pdf => ContentType::Pdf,
            Self::Txt => ContentType::Text,
            Self::Docx | Self::Doc => ContentType::WordProcessing,
            Self::Pptx | Self::Ppt => ContentType::Presentation,
        }
    }

    pub fn supported_extensions() -> Vec<&'static str> {
        Self::ALL.iter().map(FileType::extension).collect()
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Lower-cased extension derived from the final dot-separated segment,
/// dot included. A name without any dot yields the whole name.
pub fn extension_of(file_name: &str) -> String {
    let last = file_name.rsplit('.').next().unwrap_or(file_name);
    format!(".{}", last.to_lowercase())
}
