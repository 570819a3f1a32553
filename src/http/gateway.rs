//! Request gateway: picks the wire encoding for each verb.
//!
//! # Encoding Rules
//! ```text
//! GET / DELETE  → ParamBag encoded into the query string, no body
//! POST          → has_files ? multipart : JSON
//! PUT           → has_files ? multipart + `_method=PUT`, sent as POST
//!                           : JSON, sent as PUT
//! ```
//!
//! Method tunneling is invisible to the caller: both PUT branches resolve to
//! the same result type.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::config::ApiConfig;
use crate::encoding::{encode_form, encode_params, has_files, Fields, ParamBag, QueryParams, METHOD_OVERRIDE_FIELD};
use crate::http::request::{ApiRequest, Method, RequestBody, RequestOptions};
use crate::http::transport::{HttpTransport, Transport, TransportResult};

/// Thin facade over a [`Transport`] rooted at a base API URL.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl ApiClient {
    /// Create a client that prefixes every endpoint with `base_url`.
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Create a client over [`HttpTransport`] from configuration.
    pub fn from_config(config: &ApiConfig) -> TransportResult<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(config.base_url.clone(), Arc::new(transport)))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint. Endpoints start with `/`.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    pub async fn get(&self, endpoint: &str, params: &ParamBag, options: RequestOptions) -> TransportResult<Value> {
        self.dispatch(Method::Get, endpoint, encode_params(params), RequestBody::Empty, options)
            .await
    }

    pub async fn delete(&self, endpoint: &str, params: &ParamBag, options: RequestOptions) -> TransportResult<Value> {
        self.dispatch(Method::Delete, endpoint, encode_params(params), RequestBody::Empty, options)
            .await
    }

    pub async fn post(&self, endpoint: &str, data: &Fields, options: RequestOptions) -> TransportResult<Value> {
        let body = if has_files(data) {
            RequestBody::Multipart(encode_form(data, false))
        } else {
            RequestBody::Json(data.to_json())
        };

        self.dispatch(Method::Post, endpoint, Vec::new(), body, options).await
    }

    pub async fn put(&self, endpoint: &str, data: &Fields, options: RequestOptions) -> TransportResult<Value> {
        if has_files(data) {
            let mut form = encode_form(data, false);
            form.append_text(METHOD_OVERRIDE_FIELD, Method::Put.as_str());

            self.dispatch(Method::Post, endpoint, Vec::new(), RequestBody::Multipart(form), options)
                .await
        } else {
            self.dispatch(Method::Put, endpoint, Vec::new(), RequestBody::Json(data.to_json()), options)
                .await
        }
    }

    async fn dispatch(
        &self,
        method: Method,
        endpoint: &str,
        query: QueryParams,
        body: RequestBody,
        options: RequestOptions,
    ) -> TransportResult<Value> {
        let mut request = ApiRequest::new(method, self.url(endpoint));
        request.query = query;
        request.query.extend(options.query);
        request.headers = options.headers;
        request.timeout = options.timeout;
        request.body = body;

        tracing::debug!(
            request_id = %request.id,
            method = %method,
            url = %request.url,
            body = request.body.kind(),
            "Dispatching API request"
        );

        self.transport.send(request).await
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::FilePart;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingTransport {
        seen: Mutex<Vec<ApiRequest>>,
    }

    impl CapturingTransport {
        fn last(&self) -> ApiRequest {
            self.seen.lock().unwrap().last().cloned().expect("no request sent")
        }
    }

    #[async_trait]
    impl Transport for CapturingTransport {
        async fn send(&self, request: ApiRequest) -> TransportResult<Value> {
            self.seen.lock().unwrap().push(request);
            Ok(json!({"ok": true}))
        }
    }

    fn client() -> (ApiClient, Arc<CapturingTransport>) {
        let transport = Arc::new(CapturingTransport::default());
        (ApiClient::new("https://api.test/v1", transport.clone()), transport)
    }

    #[tokio::test]
    async fn test_get_encodes_query_and_merges_options() {
        let (api, transport) = client();
        let params = ParamBag::new()
            .with("active", true)
            .with("with", vec!["roles"])
            .with("q", None::<&str>);
        let options = RequestOptions::new().query("page", "2").header("X-Locale", "en");

        let body = api.get("/users", &params, options).await.unwrap();
        assert_eq!(body, json!({"ok": true}));

        let request = transport.last();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.url, "https://api.test/v1/users");
        assert_eq!(
            request.query,
            vec![
                ("active".to_string(), "1".to_string()),
                ("with[]".to_string(), "roles".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
        assert_eq!(request.headers, vec![("X-Locale".to_string(), "en".to_string())]);
        assert_eq!(request.body, RequestBody::Empty);
    }

    #[tokio::test]
    async fn test_delete_never_sends_a_body() {
        let (api, transport) = client();
        api.delete("/sessions/1", &ParamBag::new().with_null("reason"), RequestOptions::new())
            .await
            .unwrap();

        let request = transport.last();
        assert_eq!(request.method, Method::Delete);
        assert_eq!(request.query_value("reason"), Some(""));
        assert_eq!(request.body, RequestBody::Empty);
    }

    #[tokio::test]
    async fn test_post_without_files_is_json() {
        let (api, transport) = client();
        let data = Fields::new().with("title", "Hello").with("meta", Fields::new().with("draft", true));

        api.post("/posts", &data, RequestOptions::new()).await.unwrap();

        let request = transport.last();
        assert_eq!(request.method, Method::Post);
        assert_eq!(
            request.body,
            RequestBody::Json(json!({"title": "Hello", "meta": {"draft": true}}))
        );
    }

    #[tokio::test]
    async fn test_post_with_files_is_multipart_without_override() {
        let (api, transport) = client();
        let data = Fields::new().with("file", FilePart::new("report.pdf", "%PDF"));

        api.post("/uploads", &data, RequestOptions::new()).await.unwrap();

        let request = transport.last();
        assert_eq!(request.method, Method::Post);
        let form = request.body.as_multipart().expect("multipart body");
        assert_eq!(form.file("file").map(FilePart::file_name), Some("report.pdf"));
        assert_eq!(form.text(METHOD_OVERRIDE_FIELD), None);
    }

    #[tokio::test]
    async fn test_put_without_files_uses_put() {
        let (api, transport) = client();
        let data = Fields::new().with("name", "Ada");

        api.put("/profile", &data, RequestOptions::new()).await.unwrap();

        let request = transport.last();
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.body.as_json(), Some(&json!({"name": "Ada"})));
    }

    #[tokio::test]
    async fn test_put_with_files_is_tunneled_through_post() {
        let (api, transport) = client();
        let data = Fields::new()
            .with("name", "Ada")
            .with("files", vec![FilePart::new("a.png", "a")]);

        api.put("/profile", &data, RequestOptions::new()).await.unwrap();

        let request = transport.last();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "https://api.test/v1/profile");
        let form = request.body.as_multipart().expect("multipart body");
        let names: Vec<_> = form.names().collect();
        assert_eq!(names, vec!["name", "files[0]", "_method"]);
        assert_eq!(form.text("_method"), Some("PUT"));
    }
}
