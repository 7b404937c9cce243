use crate::models::{
    AccountInfo, ContentBlock, MenuRecord, NavigationMenu, SavedMedia, StatusMessage,
};
use crate::storage::{TOKEN_KEY, USER_KEY};
use crate::util::console_warn;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: "Unauthorized".to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Tunnel hosts (ngrok) interpose a browser warning page unless this header
/// is present; the backend contract requires it on every request.
const TUNNEL_SKIP_HEADER: (&str, &str) = ("ngrok-skip-browser-warning", "true");

/// Fixed client-side deadline; past it the call fails as a network error.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let default_api_url = "http://localhost:8080".to_string();

        // We support BOTH `window.ENV.API_URL` (documented in README) and
        // `window.ENV.api_url` (legacy/implementation detail) for compatibility.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    // 1) Prefer README style: API_URL
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"API_URL".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self { api_url: url_str };
                        }
                    }

                    // 2) Fallback: api_url
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"api_url".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self { api_url: url_str };
                        }
                    }
                }
            }
        }

        Self {
            api_url: default_api_url,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn get_api_url() -> String {
    EnvConfig::new().api_url
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginResponse {
    pub token: String,
    pub user: AccountInfo,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct CreateMenuRequest {
    /// Owning named menu (header/sidebar row id).
    pub menu_id: i64,

    /// None creates a root node.
    pub parent_id: Option<i64>,

    pub title: String,
    pub url: String,
}

/// Partial update; `None` fields are omitted from the body so the server
/// leaves them unchanged.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub(crate) struct UpdateMenuRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct UpdateSectionData {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub content_blocks: Vec<ContentBlock>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct UpdateSectionRequest {
    #[serde(rename = "updateData")]
    pub update_data: UpdateSectionData,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct SectionAck {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub message: String,
}

#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            token: None,
        }
    }

    pub fn load_from_storage() -> Self {
        let base_url = get_api_url();
        let token = leptos::web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(TOKEN_KEY).ok().flatten());

        Self { base_url, token }
    }

    pub fn save_to_storage(&self) {
        if let Some(storage) =
            leptos::web_sys::window().and_then(|w| w.local_storage().ok().flatten())
        {
            if let Some(token) = &self.token {
                let _ = storage.set_item(TOKEN_KEY, token);
            }
        }
    }

    pub fn clear_storage() {
        if let Some(storage) =
            leptos::web_sys::window().and_then(|w| w.local_storage().ok().flatten())
        {
            let _ = storage.remove_item(TOKEN_KEY);
            let _ = storage.remove_item(USER_KEY);
        }
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub(crate) fn get_auth_token(&self) -> Option<String> {
        self.token.clone()
    }

    pub fn logout(&mut self) {
        self.token = None;
        Self::clear_storage();
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn with_common_headers(
        mut req: reqwest::RequestBuilder,
        token: Option<String>,
    ) -> reqwest::RequestBuilder {
        req = req.header(TUNNEL_SKIP_HEADER.0, TUNNEL_SKIP_HEADER.1);
        if let Some(token) = token {
            req = req.header("Authorization", token);
        }
        req
    }

    async fn request_api<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
    ) -> ApiResult<T> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let mut req = client.request(method, url).timeout(REQUEST_TIMEOUT);
        req = Self::with_common_headers(req, self.get_auth_token());

        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(ApiError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else if res.status().as_u16() == 401 {
            Err(ApiError::unauthorized())
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "Request failed"))
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        self.request_api(
            reqwest::Method::POST,
            "/admin/login",
            Some(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            }),
        )
        .await
    }

    /// All named menus (header placement) with their full item trees.
    pub async fn list_menus(&self) -> ApiResult<Vec<NavigationMenu>> {
        let data: serde_json::Value = self
            .request_api(
                reqwest::Method::GET,
                "/navigation/admin/menu",
                None::<&()>,
            )
            .await?;
        Ok(Self::parse_menu_list_response(data))
    }

    pub async fn list_sidebar_menus(&self) -> ApiResult<Vec<NavigationMenu>> {
        let data: serde_json::Value = self
            .request_api(
                reqwest::Method::GET,
                "/navigation/admin/sidebar/menu",
                None::<&()>,
            )
            .await?;
        Ok(Self::parse_menu_list_response(data))
    }

    /// One node plus its full descendant subtree in a single round trip
    /// (the backend performs the recursive fetch).
    pub async fn get_menu_by_id(&self, id: i64) -> ApiResult<MenuRecord> {
        let data: serde_json::Value = self
            .request_api(
                reqwest::Method::GET,
                &format!("/navigation/admin/menu/{id}"),
                None::<&()>,
            )
            .await?;

        // Accept both `{data: {...}}` and a bare record.
        let rec = data.get("data").cloned().unwrap_or(data);
        serde_json::from_value(rec).map_err(ApiError::parse)
    }

    pub async fn create_menu(&self, req_body: CreateMenuRequest) -> ApiResult<MenuRecord> {
        let data: serde_json::Value = self
            .request_api(reqwest::Method::POST, "/navigation/menu", Some(&req_body))
            .await?;

        let rec = data.get("data").cloned().unwrap_or(data);
        serde_json::from_value(rec).map_err(ApiError::parse)
    }

    pub async fn update_menu(&self, id: i64, patch: UpdateMenuRequest) -> ApiResult<MenuRecord> {
        let data: serde_json::Value = self
            .request_api(
                reqwest::Method::PUT,
                &format!("/navigation/admin/menu/{id}"),
                Some(&patch),
            )
            .await?;

        let rec = data.get("data").cloned().unwrap_or(data);
        serde_json::from_value(rec).map_err(ApiError::parse)
    }

    pub async fn delete_menu(&self, id: i64) -> ApiResult<StatusMessage> {
        self.request_api(
            reqwest::Method::DELETE,
            &format!("/navigation/menu/{id}"),
            None::<&()>,
        )
        .await
    }

    pub async fn delete_admin_menu(&self, id: i64) -> ApiResult<StatusMessage> {
        self.request_api(
            reqwest::Method::DELETE,
            &format!("/navigation/admin/menu/{id}"),
            None::<&()>,
        )
        .await
    }

    pub async fn get_home_content(&self) -> ApiResult<Vec<ContentBlock>> {
        let data: serde_json::Value = self
            .request_api(reqwest::Method::GET, "/admin/home", None::<&()>)
            .await?;
        Ok(Self::parse_content_blocks_response(data))
    }

    pub async fn update_home_section(
        &self,
        section_id: i64,
        req_body: UpdateSectionRequest,
    ) -> ApiResult<SectionAck> {
        self.request_api(
            reqwest::Method::PUT,
            &format!("/home/section/{section_id}"),
            Some(&req_body),
        )
        .await
    }

    /// Opaque upload collaborator: bytes in, saved-media reference out.
    pub async fn upload_site_media(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> ApiResult<SavedMedia> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime)
            .map_err(ApiError::parse)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let client = reqwest::Client::new();
        let url = format!("{}/site/settings/upload", self.base_url);
        let mut req = client.post(url).timeout(REQUEST_TIMEOUT).multipart(form);
        req = Self::with_common_headers(req, self.get_auth_token());

        let res = req.send().await.map_err(ApiError::network)?;

        if res.status().is_success() {
            let data: serde_json::Value = res.json().await.map_err(ApiError::parse)?;
            let saved = data
                .get("data")
                .and_then(|d| d.get("savedMedia"))
                .cloned()
                .ok_or_else(|| ApiError::parse("upload response is missing data.savedMedia"))?;
            serde_json::from_value(saved).map_err(ApiError::parse)
        } else if res.status().as_u16() == 401 {
            Err(ApiError::unauthorized())
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "Upload failed"))
        }
    }

    /// Defensive parse of `{data: NavigationMenu[]}`.
    ///
    /// Malformed payloads (`data` missing, null, or not a list) yield an
    /// empty list; callers fall back to a static default tree.
    pub(crate) fn parse_menu_list_response(data: serde_json::Value) -> Vec<NavigationMenu> {
        let list = data
            .get("data")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        let mut out: Vec<NavigationMenu> = Vec::with_capacity(list.len());
        for item in list {
            match serde_json::from_value::<NavigationMenu>(item) {
                Ok(menu) => out.push(menu),
                Err(e) => {
                    console_warn(&format!("skipping malformed menu: {e}"));
                }
            }
        }

        out
    }

    /// Defensive parse of home-page blocks. The backend has been observed
    /// nesting them as `data.content_blocks`, as `content_blocks`, and as a
    /// bare array.
    pub(crate) fn parse_content_blocks_response(data: serde_json::Value) -> Vec<ContentBlock> {
        let list = data
            .get("data")
            .and_then(|d| d.get("content_blocks"))
            .or_else(|| data.get("content_blocks"))
            .and_then(|v| v.as_array())
            .cloned()
            .or_else(|| data.as_array().cloned())
            .unwrap_or_default();

        let mut out: Vec<ContentBlock> = Vec::with_capacity(list.len());
        for item in list {
            match serde_json::from_value::<ContentBlock>(item) {
                Ok(block) => out.push(block),
                Err(e) => {
                    console_warn(&format!("skipping malformed block: {e}"));
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MenuLocation;

    #[test]
    fn test_api_client_new() {
        let client = ApiClient::new("http://localhost:8080".to_string());
        assert_eq!(client.base_url, "http://localhost:8080");
        assert!(client.token.is_none());
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_api_client_set_token() {
        let mut client = ApiClient::new("http://localhost:8080".to_string());
        client.set_token("test-token".to_string());
        assert_eq!(client.get_auth_token().as_deref(), Some("test-token"));
        assert!(client.is_authenticated());
    }

    #[test]
    fn test_parse_menu_list_response_ok() {
        let data = serde_json::json!({
            "data": [
                {
                    "id": 1,
                    "location": "header",
                    "items": [
                        {"id": 10, "title": "Home", "url": "/", "children": []},
                        {"id": 11, "title": "About Us", "url": "/about"}
                    ]
                },
                {"id": 2, "location": "sidebar", "items": []}
            ]
        });
        let menus = ApiClient::parse_menu_list_response(data);
        assert_eq!(menus.len(), 2);
        assert_eq!(menus[0].location, MenuLocation::Header);
        assert_eq!(menus[0].items.len(), 2);
    }

    #[test]
    fn test_parse_menu_list_response_null_data_is_empty() {
        // Malformed sidebar response must not become an error.
        let menus = ApiClient::parse_menu_list_response(serde_json::json!({ "data": null }));
        assert!(menus.is_empty());

        let menus = ApiClient::parse_menu_list_response(serde_json::json!({}));
        assert!(menus.is_empty());

        let menus = ApiClient::parse_menu_list_response(serde_json::json!({ "data": "nope" }));
        assert!(menus.is_empty());
    }

    #[test]
    fn test_parse_content_blocks_response_shapes() {
        let nested = serde_json::json!({
            "data": {
                "content_blocks": [
                    {"id": 1, "block_type": "text", "title": "Heading", "content": "Hi"}
                ]
            }
        });
        assert_eq!(ApiClient::parse_content_blocks_response(nested).len(), 1);

        let flat = serde_json::json!({
            "content_blocks": [
                {"id": 1, "block_type": "video", "content": ""}
            ]
        });
        assert_eq!(ApiClient::parse_content_blocks_response(flat).len(), 1);

        let bare = serde_json::json!([
            {"id": 1, "block_type": "image", "content": ""}
        ]);
        assert_eq!(ApiClient::parse_content_blocks_response(bare).len(), 1);

        let broken = serde_json::json!({"data": null});
        assert!(ApiClient::parse_content_blocks_response(broken).is_empty());
    }

    #[test]
    fn test_update_menu_request_skips_unset_fields() {
        let patch = UpdateMenuRequest {
            title: Some("Careers".to_string()),
            ..Default::default()
        };
        let v = serde_json::to_value(&patch).expect("should serialize");
        assert_eq!(v["title"], "Careers");
        // Unspecified fields must not appear in the body at all, so the
        // server leaves them unchanged.
        assert!(v.get("url").is_none());
        assert!(v.get("parent_id").is_none());
        assert!(v.get("display_order").is_none());
        assert!(v.get("is_active").is_none());
    }

    #[test]
    fn test_update_section_request_wire_shape() {
        let req = UpdateSectionRequest {
            update_data: UpdateSectionData {
                id: 3,
                name: "hero".to_string(),
                title: "Hero".to_string(),
                content_blocks: vec![],
            },
        };
        let v = serde_json::to_value(&req).expect("should serialize");
        assert!(v.get("updateData").is_some());
        assert_eq!(v["updateData"]["name"], "hero");
    }

    #[test]
    fn test_login_response_contract_deserialize() {
        let json = r#"{
            "token": "jwt-token",
            "user": {"id": 1, "email": "admin@example.com"}
        }"#;
        let parsed: LoginResponse = serde_json::from_str(json).expect("login response should parse");
        assert_eq!(parsed.token, "jwt-token");
        assert!(parsed.user.extra.is_object());
    }
}
