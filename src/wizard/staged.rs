use bytes::Bytes;

use super::preview::{PreviewHandle, PreviewRegistry};
use crate::utils::get_extension;

pub const ACCEPTED_EXTENSIONS: [&str; 7] = ["pdf", "doc", "docx", "txt", "jpg", "jpeg", "png"];

pub fn is_accepted(file_name: &str) -> bool {
    ACCEPTED_EXTENSIONS.contains(&get_extension(file_name).as_str())
}

/// MIME type for the accepted extensions.
pub fn mime_for(file_name: &str) -> Option<&'static str> {
    let mime = match get_extension(file_name).as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => return None,
    };
    Some(mime)
}

/// A file picked by the user, before staging.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub name: String,
    pub mime: Option<String>,
    pub data: Bytes,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let name = name.into();
        let mime = mime_for(&name).map(str::to_string);
        Self {
            name,
            mime,
            data: data.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn is_image(&self) -> bool {
        self.mime.as_deref().is_some_and(|m| m.starts_with("image/"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StagedFileId(pub(crate) u64);

/// A local file waiting to be uploaded.
#[derive(Debug)]
pub struct StagedFile {
    id: StagedFileId,
    file: LocalFile,
    preview: Option<PreviewHandle>,
}

impl StagedFile {
    pub(crate) fn new(id: StagedFileId, file: LocalFile, previews: &PreviewRegistry) -> Self {
        let preview = file.is_image().then(|| previews.create());
        Self { id, file, preview }
    }

    pub fn id(&self) -> StagedFileId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.file.name
    }

    pub fn mime(&self) -> Option<&str> {
        self.file.mime.as_deref()
    }

    pub fn size(&self) -> u64 {
        self.file.size()
    }

    pub fn data(&self) -> &Bytes {
        &self.file.data
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.preview.as_ref().map(PreviewHandle::url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_document_and_image_types_only() {
        assert!(is_accepted("brief.PDF"));
        assert!(is_accepted("photo.jpeg"));
        assert!(!is_accepted("archive.zip"));
        assert!(!is_accepted("noext"));
    }

    #[test]
    fn only_images_get_previews() {
        let previews = PreviewRegistry::new();
        let pdf = StagedFile::new(StagedFileId(1), LocalFile::new("a.pdf", vec![0u8; 4]), &previews);
        let png = StagedFile::new(StagedFileId(2), LocalFile::new("b.png", vec![0u8; 4]), &previews);

        assert!(pdf.preview_url().is_none());
        assert!(png.preview_url().is_some());
        assert_eq!(previews.live_count(), 1);
    }
}
