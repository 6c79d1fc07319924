use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document, Metadata};

type Decoder = fn(&[u8]) -> Option<String>;

const DECODERS: [(&str, Decoder); 3] = [
    ("utf-8", decode_utf8),
    ("latin-1", decode_latin1),
    ("cp1252", decode_windows_1252),
];

pub struct PlainTextAdapter;

impl PlainTextAdapter {
    /// Tries UTF-8, then Latin-1, then Windows-1252, stopping at the first
    /// decoder that accepts every byte. Latin-1 maps all 256 byte values, so
    /// in practice only the first two are ever reached.
    pub fn decode(data: &[u8]) -> Result<String, FileLoaderError> {
        for (encoding, decoder) in DECODERS {
            if let Some(text) = decoder(data) {
                tracing::debug!(encoding, "Decoded plain text");
                return Ok(text);
            }
        }

        let tried: Vec<&str> = DECODERS.iter().map(|(name, _)| *name).collect();
        Err(FileLoaderError::DecodeFailed(tried.join(", ")))
    }
}

fn decode_utf8(data: &[u8]) -> Option<String> {
    std::str::from_utf8(data).ok().map(str::to_string)
}

/// ISO-8859-1: every byte is the code point of the same value, C1 controls included.
fn decode_latin1(data: &[u8]) -> Option<String> {
    Some(data.iter().map(|&b| char::from(b)).collect())
}

fn decode_windows_1252(data: &[u8]) -> Option<String> {
    data.iter()
        .map(|&b| match b {
            0x80..=0x9F => CP1252_HIGH[usize::from(b - 0x80)],
            _ => Some(char::from(b)),
        })
        .collect()
}

const CP1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

#[async_trait]
impl FileLoader for PlainTextAdapter {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        if document.file_type.content_type() != ContentType::Text {
            return Err(FileLoaderError::UnsupportedContentType(
                document.file_type.to_string(),
            ));
        }

        Self::decode(data)
    }

    async fn extract_metadata(
        &self,
        _data: &[u8],
        _document: &Document,
    ) -> Result<Metadata, FileLoaderError> {
        Ok(Metadata::new())
    }
}
