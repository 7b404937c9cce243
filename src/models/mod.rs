use serde::{Deserialize, Serialize};

/// Backend admin-account object.
///
/// The CMS backend returns this under the `user` field of the login response.
/// We keep it flexible to avoid breaking when backend fields evolve.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct AccountInfo {
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// Named menu placement on the public site.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum MenuLocation {
    Header,
    Sidebar,
}

/// One navigation entry as the backend sends it.
///
/// `children` arrives pre-nested (the backend performs the recursive fetch);
/// sibling order in the array is authoritative.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct MenuRecord {
    pub id: i64,

    #[serde(default)]
    pub parent_id: Option<i64>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub display_order: i64,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub children: Vec<MenuRecord>,
}

fn default_true() -> bool {
    true
}

/// A named menu (`location` + its root items).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct NavigationMenu {
    pub id: i64,
    pub location: MenuLocation,

    #[serde(default)]
    pub items: Vec<MenuRecord>,
}

/// Content-block discriminator.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum BlockType {
    Text,
    Image,
    Video,
    Custom,
}

/// One media reference attached to a content block.
///
/// `media_type` tags the role of the file within the block; the single
/// "primary" entry is the block's main asset.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct MediaFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub media_type: String,

    #[serde(default)]
    pub url: String,
}

pub(crate) const PRIMARY_MEDIA_TYPE: &str = "primary";

impl MediaFile {
    pub fn primary(url: &str) -> Self {
        Self {
            id: None,
            media_type: PRIMARY_MEDIA_TYPE.to_string(),
            url: url.to_string(),
        }
    }

    pub fn is_primary(&self) -> bool {
        self.media_type == PRIMARY_MEDIA_TYPE
    }
}

/// One editable unit of page content, owned by a numbered page section.
///
/// `id` is absent on create instructions (the server assigns it).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct ContentBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<i64>,

    pub block_type: BlockType,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub display_order: i64,

    /// Explicit semantic role, when the backend has one recorded.
    /// Older rows lack it; role detection then falls back to a
    /// block_type/title shim (see `content::BlockRole`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default)]
    pub media_files: Vec<MediaFile>,
}

/// `{status, message}` acknowledgment for deletes and similar writes.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct StatusMessage {
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub message: String,
}

/// Uploaded-file reference returned by the site-settings upload endpoint.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct SavedMedia {
    pub id: i64,

    #[serde(default)]
    pub original_filename: String,

    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl SavedMedia {
    /// Public URL of the stored file. The backend reports it as `url` or
    /// `file_path` depending on the route version; older responses carry
    /// neither and are addressed by id.
    pub fn public_url(&self) -> String {
        self.extra
            .get("url")
            .and_then(|v| v.as_str())
            .or_else(|| self.extra.get("file_path").and_then(|v| v.as_str()))
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("/site/media/{}", self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_record_contract_deserialize() {
        // Contract based on GET /navigation/admin/menu/:id
        let json = r#"{
            "id": 7,
            "parent_id": 2,
            "title": "Cardiology",
            "url": "/specialties/cardiology",
            "display_order": 3,
            "is_active": true,
            "children": [
                {"id": 9, "parent_id": 7, "title": "Team", "url": "/specialties/cardiology/team"}
            ]
        }"#;
        let rec: MenuRecord = serde_json::from_str(json).expect("menu record should parse");
        assert_eq!(rec.id, 7);
        assert_eq!(rec.parent_id, Some(2));
        assert_eq!(rec.children.len(), 1);
        assert_eq!(rec.children[0].parent_id, Some(7));
        // Omitted fields fall back to defaults.
        assert!(rec.children[0].is_active);
        assert_eq!(rec.children[0].display_order, 0);
    }

    #[test]
    fn test_menu_location_tags() {
        let m: NavigationMenu =
            serde_json::from_str(r#"{"id": 1, "location": "header", "items": []}"#)
                .expect("menu should parse");
        assert_eq!(m.location, MenuLocation::Header);
        assert_eq!(MenuLocation::Sidebar.to_string(), "sidebar");
    }

    #[test]
    fn test_content_block_serializes_without_id_on_create() {
        let block = ContentBlock {
            id: None,
            section_id: Some(4),
            block_type: BlockType::Text,
            title: "Heading".to_string(),
            content: "Welcome".to_string(),
            display_order: 1,
            role: None,
            media_files: vec![],
        };
        let v = serde_json::to_value(&block).expect("should serialize");
        assert!(v.get("id").is_none());
        assert_eq!(v["block_type"], "text");
    }

    #[test]
    fn test_media_file_primary_tag() {
        let m = MediaFile::primary("/uploads/tour.mp4");
        assert!(m.is_primary());
        let v = serde_json::to_value(&m).expect("should serialize");
        assert_eq!(v["media_type"], "primary");
        assert!(v.get("id").is_none());
    }

    #[test]
    fn test_saved_media_public_url_fallbacks() {
        let with_url: SavedMedia = serde_json::from_str(
            r#"{"id": 5, "original_filename": "tour.mp4", "url": "/uploads/tour.mp4"}"#,
        )
        .expect("should parse");
        assert_eq!(with_url.public_url(), "/uploads/tour.mp4");

        let bare: SavedMedia =
            serde_json::from_str(r#"{"id": 5}"#).expect("should parse");
        assert_eq!(bare.public_url(), "/site/media/5");
    }

    #[test]
    fn test_status_message_tolerates_missing_fields() {
        let s: StatusMessage = serde_json::from_str("{}").expect("should parse");
        assert!(s.status.is_empty());
        assert!(s.message.is_empty());
    }
}
