/// Bytes fetched by the source reader, paired with the name they were found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    pub content: Vec<u8>,
    pub name: String,
}

impl RawFile {
    pub fn new(content: Vec<u8>, name: impl Into<String>) -> Self {
        Self {
            content,
            name: name.into(),
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.content.len() as u64
    }
}
