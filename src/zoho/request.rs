//! Turns a logical API call into an authenticated, encoded HTTP request.
//!
//! Zoho Sheet mixes two addressing styles: REST sub-resource paths
//! (`workbooks/{id}/sheets/{id}/rows/{n}`) and single-endpoint RPC calls
//! selected by a `method` query parameter (`{resource_id}?method=table.list`).
//! Identifiers always go in as whole, percent-encoded path segments.
//! [`ApiCall`] covers both, and [`ApiCall::build`] always fetches the access
//! token before anything else is assembled.

use crate::error::Result;
use crate::zoho::auth::TokenSource;
use reqwest::Method;
use serde::Serialize;
use url::Url;

/// Authorization scheme Zoho expects in front of the access token.
pub const OAUTH_TOKEN_SCHEME: &str = "Zoho-oauthtoken";

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Ordered form parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormParams(Vec<(String, String)>);

impl FormParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.push((key.to_string(), value.into()));
        self
    }

    /// Adds the parameter only when a non-empty value is given.
    pub fn text_opt(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.text(key, v),
            _ => self,
        }
    }

    pub fn int(self, key: &str, value: u64) -> Self {
        self.text(key, value.to_string())
    }

    /// Booleans go over the wire as lowercase `true`/`false`.
    pub fn flag(self, key: &str, value: bool) -> Self {
        self.text(key, if value { "true" } else { "false" })
    }

    /// Embeds a structured value as a JSON string inside the form field.
    pub fn json<T: Serialize + ?Sized>(self, key: &str, value: &T) -> Result<Self> {
        let encoded = serde_json::to_string(value)?;
        Ok(self.text(key, encoded))
    }

    /// Comma-joined list; omitted when empty.
    pub fn joined(self, key: &str, values: &[String]) -> Self {
        if values.is_empty() {
            return self;
        }
        self.text(key, values.join(","))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Form(FormParams),
    Json(serde_json::Value),
}

impl RequestBody {
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Form(_) => Some(FORM_CONTENT_TYPE),
            RequestBody::Json(_) => Some(JSON_CONTENT_TYPE),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            RequestBody::Empty => Ok(Vec::new()),
            RequestBody::Form(params) => Ok(params.encode().into_bytes()),
            RequestBody::Json(value) => Ok(serde_json::to_vec(value)?),
        }
    }

    pub fn form(&self) -> Option<&FormParams> {
        match self {
            RequestBody::Form(params) => Some(params),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Target {
    /// Path segments below the API root, each percent-encoded on its own.
    Path(Vec<String>),
    /// `{resource_id}?method={method}` addressing.
    Rpc {
        resource_id: String,
        method: &'static str,
    },
}

/// A logical API operation, not yet authenticated.
#[derive(Debug, Clone)]
pub struct ApiCall {
    method: Method,
    target: Target,
    body: RequestBody,
}

impl ApiCall {
    /// Identifiers are passed as whole segments, so `0#` or `a/b` stay part
    /// of the path.
    pub fn rest<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            target: Target::Path(segments.into_iter().map(Into::into).collect()),
            body: RequestBody::Empty,
        }
    }

    /// RPC calls are always form-encoded POSTs.
    pub fn rpc(resource_id: impl Into<String>, method_name: &'static str) -> Self {
        Self {
            method: Method::POST,
            target: Target::Rpc {
                resource_id: resource_id.into(),
                method: method_name,
            },
            body: RequestBody::Form(FormParams::new()),
        }
    }

    pub fn form(mut self, params: FormParams) -> Self {
        self.body = RequestBody::Form(params);
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn url(&self, api_base: &Url) -> Result<Url> {
        let mut url = api_base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
            path.pop_if_empty();
            match &self.target {
                Target::Path(segments) => {
                    path.extend(segments);
                }
                Target::Rpc { resource_id, .. } => {
                    path.push(resource_id);
                }
            }
        }

        if let Target::Rpc { method, .. } = &self.target {
            url.query_pairs_mut().append_pair("method", method);
        }
        Ok(url)
    }

    /// Fetch a valid token, then assemble the request around it.
    pub async fn build(self, api_base: &Url, tokens: &dyn TokenSource) -> Result<ApiRequest> {
        let token = tokens.access_token().await?;
        let url = self.url(api_base)?;

        Ok(ApiRequest {
            method: self.method,
            url,
            authorization: Some(format!("{} {}", OAUTH_TOKEN_SCHEME, token)),
            body: self.body,
        })
    }
}

/// A request ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub authorization: Option<String>,
    pub body: RequestBody,
}

impl ApiRequest {
    /// Unauthenticated form POST to an OAuth endpoint.
    pub fn token_exchange(url: &str, params: FormParams) -> Result<Self> {
        Ok(Self {
            method: Method::POST,
            url: Url::parse(url)?,
            authorization: None,
            body: RequestBody::Form(params),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zoho::auth::StaticToken;
    use serde_json::json;

    fn api_base() -> Url {
        Url::parse("https://sheet.zoho.com/api/v2/").unwrap()
    }

    #[test]
    fn test_form_encoding_preserves_order() {
        let params = FormParams::new()
            .text("table_name", "Sales Q1")
            .int("count", 50)
            .flag("is_case_sensitive", true)
            .flag("clear_format", false);

        assert_eq!(
            params.encode(),
            "table_name=Sales+Q1&count=50&is_case_sensitive=true&clear_format=false"
        );
    }

    #[test]
    fn test_json_in_form_field() {
        let params = FormParams::new()
            .json("column_names", &["Phone", "Email"])
            .unwrap();

        assert_eq!(params.get("column_names"), Some(r#"["Phone","Email"]"#));
        assert_eq!(
            params.encode(),
            "column_names=%5B%22Phone%22%2C%22Email%22%5D"
        );
    }

    #[test]
    fn test_text_opt_skips_missing_values() {
        let params = FormParams::new()
            .text_opt("criteria", None)
            .text_opt("criteria", Some(""))
            .text_opt("row_array", Some("[1,2]"));

        assert_eq!(params.pairs().len(), 1);
        assert_eq!(params.get("row_array"), Some("[1,2]"));
    }

    #[test]
    fn test_joined_list() {
        let params = FormParams::new()
            .joined("column_names", &["Month".to_string(), "Amount".to_string()])
            .joined("skipped", &[]);

        assert_eq!(params.encode(), "column_names=Month%2CAmount");
    }

    #[test]
    fn test_rest_url() {
        let call = ApiCall::rest(
            Method::DELETE,
            ["workbooks", "wb1", "sheets", "s1", "rows", "4"],
        );
        assert_eq!(
            call.url(&api_base()).unwrap().as_str(),
            "https://sheet.zoho.com/api/v2/workbooks/wb1/sheets/s1/rows/4"
        );
    }

    #[test]
    fn test_identifiers_are_encoded_as_single_segments() {
        let call = ApiCall::rest(
            Method::POST,
            ["workbooks", "wb1", "sheets", "1#", "columns"],
        );
        let url = call.url(&api_base()).unwrap();

        assert_eq!(
            url.as_str(),
            "https://sheet.zoho.com/api/v2/workbooks/wb1/sheets/1%23/columns"
        );
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_rpc_resource_id_cannot_escape_the_api_root() {
        let url = ApiCall::rpc("mailto:x/y", "table.list")
            .url(&api_base())
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://sheet.zoho.com/api/v2/mailto:x%2Fy?method=table.list"
        );
    }

    #[test]
    fn test_base_without_trailing_slash() {
        let base = Url::parse("http://127.0.0.1:9001/api/v2").unwrap();
        let call = ApiCall::rest(Method::GET, ["workbooks", "wb1", "sheets"]);

        assert_eq!(
            call.url(&base).unwrap().as_str(),
            "http://127.0.0.1:9001/api/v2/workbooks/wb1/sheets"
        );
    }

    #[test]
    fn test_rpc_url() {
        let call = ApiCall::rpc("abc123", "worksheet.records.fetch");
        assert_eq!(
            call.url(&api_base()).unwrap().as_str(),
            "https://sheet.zoho.com/api/v2/abc123?method=worksheet.records.fetch"
        );
    }

    #[tokio::test]
    async fn test_build_attaches_token_and_content_type() {
        let request = ApiCall::rpc("abc123", "table.list")
            .form(FormParams::new().text("table_name", "Orders"))
            .build(&api_base(), &StaticToken::new("tok"))
            .await
            .unwrap();

        assert_eq!(request.method, Method::POST);
        assert_eq!(
            request.authorization.as_deref(),
            Some("Zoho-oauthtoken tok")
        );
        assert_eq!(request.body.content_type(), Some(FORM_CONTENT_TYPE));
    }

    #[tokio::test]
    async fn test_json_body() {
        let request = ApiCall::rest(Method::POST, ["workbooks", "wb1", "sheets", "s1", "columns"])
            .json(json!({ "columns": ["A", "B"] }))
            .build(&api_base(), &StaticToken::new("tok"))
            .await
            .unwrap();

        assert_eq!(request.body.content_type(), Some(JSON_CONTENT_TYPE));
        assert_eq!(
            request.body.to_bytes().unwrap(),
            br#"{"columns":["A","B"]}"#.to_vec()
        );
    }

    #[test]
    fn test_empty_body_has_no_content_type() {
        assert_eq!(RequestBody::Empty.content_type(), None);
    }
}
