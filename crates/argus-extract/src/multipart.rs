//! `multipart/form-data` bodies.
//!
//! [`read_multipart`] drains the whole body with `multer`; the builder then
//! merges the result into the context via
//! [`ExtractionContextBuilder::multipart`].
//!
//! [`ExtractionContextBuilder::multipart`]: crate::ExtractionContextBuilder::multipart

use std::convert::Infallible;

use argus_core::{ExtractionError, UploadedFile};
use bytes::Bytes;
use http::{header, HeaderMap};
use indexmap::IndexMap;

/// Whole-body limit: 50 MiB.
pub const DEFAULT_MAX_BODY_SIZE: usize = 50 << 20;

/// Per-part limit: 10 MiB.
pub const DEFAULT_MAX_FIELD_SIZE: usize = 10 << 20;

/// Limits applied while reading a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartConfig {
    /// Bytes allowed for the entire body.
    pub max_body_size: usize,
    /// Bytes allowed for any one part.
    pub max_field_size: usize,
    /// Parts allowed, files included.
    pub max_fields: usize,
}

impl Default for MultipartConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_field_size: DEFAULT_MAX_FIELD_SIZE,
            max_fields: 100,
        }
    }
}

impl MultipartConfig {
    #[allow(missing_docs)]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn max_body_size(self, max_body_size: usize) -> Self {
        Self { max_body_size, ..self }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn max_field_size(self, max_field_size: usize) -> Self {
        Self { max_field_size, ..self }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn max_fields(self, max_fields: usize) -> Self {
        Self { max_fields, ..self }
    }
}

/// Parts of a form, grouped by field name in arrival order.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    /// Parts without a file name.
    pub fields: IndexMap<String, Vec<Bytes>>,
    /// Parts with a file name.
    pub files: IndexMap<String, Vec<UploadedFile>>,
}

impl MultipartForm {
    fn add(&mut self, name: String, file_name: Option<String>, content_type: Option<String>, data: Bytes) {
        match file_name {
            Some(file_name) => {
                let file = UploadedFile::new(Some(name.clone()), Some(file_name), content_type, data);
                self.files.entry(name).or_default().push(file);
            }
            None => self.fields.entry(name).or_default().push(data),
        }
    }
}

fn form_data_type(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    let parsed: mime::Mime = raw.parse().ok()?;
    (parsed.type_() == mime::MULTIPART && parsed.subtype() == mime::FORM_DATA).then_some(raw)
}

/// True when the Content-Type is `multipart/form-data`.
#[must_use]
pub fn is_multipart(headers: &HeaderMap) -> bool {
    form_data_type(headers).is_some()
}

/// Reads every part of a `multipart/form-data` body.
///
/// # Errors
///
/// [`ExtractionError::UnsupportedMediaType`] without a usable boundary,
/// [`ExtractionError::PayloadTooLarge`] when the body or a part is over its
/// limit, [`ExtractionError::TooManyFields`], or
/// [`ExtractionError::MalformedBody`] for a broken stream.
pub async fn read_multipart(
    headers: &HeaderMap,
    body: Bytes,
    config: &MultipartConfig,
) -> Result<MultipartForm, ExtractionError> {
    let content_type = form_data_type(headers)
        .ok_or_else(|| ExtractionError::unsupported_media_type("expected multipart/form-data"))?;
    let boundary = multer::parse_boundary(content_type)
        .map_err(|e| ExtractionError::unsupported_media_type(e.to_string()))?;
    if body.len() > config.max_body_size {
        return Err(ExtractionError::payload_too_large(config.max_body_size, body.len()));
    }

    let chunks = futures_util::stream::iter([Ok::<_, Infallible>(body)]);
    let mut reader = multer::Multipart::new(chunks, boundary);
    let broken = |e: multer::Error| ExtractionError::malformed_body(e.to_string());

    let mut form = MultipartForm::default();
    let mut parts = 0usize;
    while let Some(part) = reader.next_field().await.map_err(broken)? {
        parts += 1;
        if parts > config.max_fields {
            return Err(ExtractionError::too_many_fields(config.max_fields));
        }
        let name = part.name().unwrap_or_default().to_owned();
        let file_name = part.file_name().map(str::to_owned);
        let content_type = part.content_type().map(|m| m.essence_str().to_owned());
        let data = part.bytes().await.map_err(broken)?;
        if data.len() > config.max_field_size {
            return Err(ExtractionError::payload_too_large(config.max_field_size, data.len()));
        }
        form.add(name, file_name, content_type, data);
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = "X-ARGUS-BOUNDARY";

    fn multipart_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}")
                .parse()
                .unwrap(),
        );
        headers
    }

    fn sample_body() -> Bytes {
        Bytes::from(format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"title\"\r\n\r\n\
             holiday\r\n\
             --{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"photo\"; filename=\"a.png\"\r\n\
             Content-Type: image/png\r\n\r\n\
             PNGDATA\r\n\
             --{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"photo\"; filename=\"b.png\"\r\n\
             Content-Type: image/png\r\n\r\n\
             MOREPNG\r\n\
             --{BOUNDARY}--\r\n"
        ))
    }

    #[test]
    fn test_is_multipart() {
        assert!(is_multipart(&multipart_headers()));

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert!(!is_multipart(&headers));
        assert!(!is_multipart(&HeaderMap::new()));
    }

    #[tokio::test]
    async fn test_read_fields_and_files() {
        let form = read_multipart(&multipart_headers(), sample_body(), &MultipartConfig::default())
            .await
            .unwrap();

        assert_eq!(form.fields["title"], vec![Bytes::from_static(b"holiday")]);

        let photos = &form.files["photo"];
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].file_name(), Some("a.png"));
        assert_eq!(photos[0].content_type(), Some("image/png"));
        assert_eq!(photos[1].data(), &Bytes::from_static(b"MOREPNG"));
    }

    #[tokio::test]
    async fn test_missing_boundary() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "multipart/form-data".parse().unwrap());

        let err = read_multipart(&headers, Bytes::new(), &MultipartConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_MEDIA_TYPE");
    }

    #[tokio::test]
    async fn test_body_limit() {
        let config = MultipartConfig::new().max_body_size(8);
        let err = read_multipart(&multipart_headers(), sample_body(), &config)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_field_limit() {
        let config = MultipartConfig::new().max_fields(2);
        let err = read_multipart(&multipart_headers(), sample_body(), &config)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "TOO_MANY_FIELDS");
    }
}
