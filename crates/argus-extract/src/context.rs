//! The request as lookups see it.

use argus_core::{ExtractionError, UploadedFile};
use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method, Request, Uri};
use indexmap::IndexMap;
use tracing::warn;

use crate::multipart::{is_multipart, read_multipart, MultipartConfig, MultipartForm};
use crate::params::PathParams;

/// Form fields by name, every submitted value kept as raw bytes.
pub type BodyArguments = IndexMap<String, Vec<Bytes>>;

/// Uploads by form field name.
pub type Files = IndexMap<String, Vec<UploadedFile>>;

/// Read-only view of one request.
///
/// The query string and a url-encoded body are decoded up front. Multipart
/// fields and files arrive through [`ExtractionContextBuilder::multipart`] or
/// [`ExtractionContextBuilder::build_async`]. A JSON body stays raw until a
/// body lookup asks for it.
///
/// ```rust
/// use argus_extract::{ExtractionContext, PathParams};
/// use bytes::Bytes;
/// use http::Request;
///
/// let request = Request::get("/users/123?tag=a&tag=b").body(Bytes::new()).unwrap();
/// let params: PathParams = [("id", "123")].into_iter().collect();
/// let ctx = ExtractionContext::from_request(request, params);
///
/// assert_eq!(ctx.query_argument("tag"), Some("b"));
/// assert_eq!(ctx.path_params().get("id"), Some("123"));
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    path_params: PathParams,
    query: Vec<(String, String)>,
    form: BodyArguments,
    files: Files,
}

impl ExtractionContext {
    /// Context over the given request parts.
    #[must_use]
    pub fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
        path_params: PathParams,
    ) -> Self {
        let query = uri.query().map(decode_query).unwrap_or_default();
        let form = if is_urlencoded(&headers) {
            decode_form(&body)
        } else {
            BodyArguments::new()
        };
        Self {
            method,
            uri,
            headers,
            body,
            path_params,
            query,
            form,
            files: Files::new(),
        }
    }

    /// Context over a buffered `http::Request`.
    #[must_use]
    pub fn from_request(request: Request<Bytes>, path_params: PathParams) -> Self {
        let (head, body) = request.into_parts();
        Self::new(head.method, head.uri, head.headers, body, path_params)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// URI path without the query.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Last value sent for a query key.
    #[must_use]
    pub fn query_argument(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value sent for a query key, in order.
    pub fn query_arguments<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.query
            .iter()
            .filter_map(move |(k, v)| (k == key).then_some(v.as_str()))
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, if it is visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    /// Unparsed body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Url-encoded or multipart text fields.
    #[must_use]
    pub fn body_arguments(&self) -> &BodyArguments {
        &self.form
    }

    /// Multipart uploads.
    #[must_use]
    pub fn files(&self) -> &Files {
        &self.files
    }

    /// Segments captured by the router.
    #[must_use]
    pub fn path_params(&self) -> &PathParams {
        &self.path_params
    }
}

fn is_urlencoded(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<mime::Mime>().ok())
        .is_some_and(|m| m.type_() == mime::APPLICATION && m.subtype() == mime::WWW_FORM_URLENCODED)
}

fn decode_query(raw: &str) -> Vec<(String, String)> {
    serde_urlencoded::from_str(raw).unwrap_or_else(|error| {
        warn!(%error, "query string dropped");
        Vec::new()
    })
}

fn decode_form(body: &[u8]) -> BodyArguments {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body).unwrap_or_else(|error| {
        warn!(%error, "url-encoded body dropped");
        Vec::new()
    });
    let mut form = BodyArguments::new();
    for (name, value) in pairs {
        form.entry(name).or_default().push(value.into());
    }
    form
}

/// Assembles an [`ExtractionContext`] piece by piece. Defaults to `GET /`.
///
/// Mostly useful in tests and for hosts whose request type is not
/// `http::Request`.
#[derive(Debug, Default)]
pub struct ExtractionContextBuilder {
    method: Method,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
    path_params: PathParams,
    extra: MultipartForm,
}

impl ExtractionContextBuilder {
    #[allow(missing_docs)]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    /// Replaces all headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Appends a header. A value that is not valid header text is skipped.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.append(name, value);
        }
        self
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Url-encodes `pairs` as the body.
    #[must_use]
    pub fn form<K: AsRef<str>, V: AsRef<str>>(mut self, pairs: &[(K, V)]) -> Self {
        let encoded = serde_urlencoded::to_string(
            pairs
                .iter()
                .map(|(k, v)| (k.as_ref(), v.as_ref()))
                .collect::<Vec<_>>(),
        );
        self.body = encoded.map(Bytes::from).unwrap_or_default();
        self.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        self
    }

    /// Serializes `value` as a JSON body.
    #[must_use]
    pub fn json(mut self, value: &serde_json::Value) -> Self {
        self.body = value.to_string().into();
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self
    }

    /// Adds a text field as if it came from a form.
    #[must_use]
    pub fn body_argument(mut self, name: impl Into<String>, value: impl Into<Bytes>) -> Self {
        self.extra
            .fields
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Adds an upload under its field name, or `""` when it has none.
    #[must_use]
    pub fn file(mut self, file: UploadedFile) -> Self {
        let field = file.name().unwrap_or_default().to_owned();
        self.extra.files.entry(field).or_default().push(file);
        self
    }

    /// Merges the fields and files of a parsed form.
    #[must_use]
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        for (name, values) in form.fields {
            self.extra.fields.entry(name).or_default().extend(values);
        }
        for (name, files) in form.files {
            self.extra.files.entry(name).or_default().extend(files);
        }
        self
    }

    /// Replaces the route arguments.
    #[must_use]
    pub fn path_params(mut self, params: PathParams) -> Self {
        self.path_params = params;
        self
    }

    /// Adds one route argument.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name, value);
        self
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn build(self) -> ExtractionContext {
        let uri = self.uri.unwrap_or_else(|| Uri::from_static("/"));
        let mut ctx =
            ExtractionContext::new(self.method, uri, self.headers, self.body, self.path_params);
        for (name, values) in self.extra.fields {
            ctx.form.entry(name).or_default().extend(values);
        }
        ctx.files = self.extra.files;
        ctx
    }

    /// Like [`build`](Self::build), but a `multipart/form-data` body is read first.
    ///
    /// # Errors
    ///
    /// Any failure of [`read_multipart`].
    pub async fn build_async(
        self,
        config: &MultipartConfig,
    ) -> Result<ExtractionContext, ExtractionError> {
        if is_multipart(&self.headers) {
            let form = read_multipart(&self.headers, self.body.clone(), config).await?;
            Ok(self.multipart(form).build())
        } else {
            Ok(self.build())
        }
    }
}
