//! Uploaded files.

use bytes::Bytes;

/// One file part of a `multipart/form-data` request.
///
/// The file converter passes it through untouched, so handlers receive the
/// same handle the multipart reader produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    field: Option<String>,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

impl UploadedFile {
    /// Creates a file handle from its form field, client file name, MIME type and content.
    #[must_use]
    pub fn new(
        field: Option<String>,
        file_name: Option<String>,
        content_type: Option<String>,
        data: Bytes,
    ) -> Self {
        Self {
            field,
            file_name,
            content_type,
            data,
        }
    }

    /// Form field the file was sent under.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// File name as sent by the client.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Declared MIME type.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Content.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True for a zero-byte upload.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Extension of the client file name, without the dot.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        let (stem, ext) = self.file_name()?.rsplit_once('.')?;
        (!stem.is_empty() && !ext.is_empty()).then_some(ext)
    }
}
