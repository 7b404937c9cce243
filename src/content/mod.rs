use crate::models::{BlockType, ContentBlock, MediaFile};

/// Logical fields the home-section form edits.
///
/// Captured once when the section data first loads (the snapshot) and again
/// from live form state on save; the reconciler diffs the two.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SectionForm {
    pub heading: String,
    pub body: String,
    pub video_url: String,
}

impl SectionForm {
    /// Capture field values from the blocks the server sent.
    pub fn from_blocks(blocks: &[ContentBlock]) -> Self {
        let field = |role: BlockRole| -> Option<&ContentBlock> {
            blocks.iter().find(|b| role.matches(b))
        };

        Self {
            heading: field(BlockRole::Heading)
                .map(|b| b.content.clone())
                .unwrap_or_default(),
            body: field(BlockRole::Body)
                .map(|b| b.content.clone())
                .unwrap_or_default(),
            video_url: field(BlockRole::Video)
                .and_then(|b| b.media_files.iter().find(|m| m.is_primary()))
                .map(|m| m.url.clone())
                .unwrap_or_default(),
        }
    }
}

/// Stable semantic role of a block within its section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub(crate) enum BlockRole {
    Heading,
    Body,
    Video,
}

impl BlockRole {
    fn block_type(self) -> BlockType {
        match self {
            BlockRole::Heading | BlockRole::Body => BlockType::Text,
            BlockRole::Video => BlockType::Video,
        }
    }

    /// Whether `block` fills this role.
    ///
    /// An explicit `role` tag from the backend wins. Rows predating the tag
    /// fall back to a block_type/title-substring shim; that shim is fragile
    /// (renaming a title breaks detection) and is kept only until the
    /// backend backfills roles.
    pub fn matches(self, block: &ContentBlock) -> bool {
        if let Some(tag) = &block.role {
            return tag == self.as_ref();
        }

        if block.block_type != self.block_type() {
            return false;
        }

        let title = block.title.to_lowercase();
        match self {
            BlockRole::Heading => title.contains("head") || title.contains("title"),
            BlockRole::Body => !title.contains("head") && !title.contains("title"),
            BlockRole::Video => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ReconcileError {
    /// The initial snapshot was never captured (section query still
    /// loading); submitting would mean guessing a diff.
    SnapshotMissing,
}

impl std::fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileError::SnapshotMissing => {
                write!(f, "Section data is not loaded yet. Reload the page and try again.")
            }
        }
    }
}

fn next_display_order(existing: &[ContentBlock]) -> i64 {
    existing
        .iter()
        .map(|b| b.display_order)
        .max()
        .map(|m| m + 1)
        .unwrap_or(0)
}

/// Write instruction for one changed text field.
fn text_write(
    role: BlockRole,
    value: &str,
    existing: &[ContentBlock],
) -> ContentBlock {
    match existing.iter().find(|b| role.matches(b)) {
        Some(block) => {
            // Update: keep id, display_order and unrelated attributes.
            let mut out = block.clone();
            out.content = value.to_string();
            out
        }
        None => ContentBlock {
            id: None,
            section_id: None,
            block_type: role.block_type(),
            title: role.to_string(),
            content: value.to_string(),
            display_order: next_display_order(existing),
            role: Some(role.to_string()),
            media_files: vec![],
        },
    }
}

/// Write instruction for the changed video slot.
///
/// The primary media entry is replaced; pre-existing non-primary entries
/// are carried forward so an update never silently drops them.
fn video_write(url: &str, existing: &[ContentBlock]) -> ContentBlock {
    match existing.iter().find(|b| BlockRole::Video.matches(b)) {
        Some(block) => {
            let mut media: Vec<MediaFile> = vec![MediaFile::primary(url)];
            media.extend(
                block
                    .media_files
                    .iter()
                    .filter(|m| !m.is_primary())
                    .cloned(),
            );

            let mut out = block.clone();
            out.media_files = media;
            out
        }
        None => ContentBlock {
            id: None,
            section_id: None,
            block_type: BlockType::Video,
            title: BlockRole::Video.to_string(),
            content: String::new(),
            display_order: next_display_order(existing),
            role: Some(BlockRole::Video.to_string()),
            media_files: vec![MediaFile::primary(url)],
        },
    }
}

/// Compute the minimal set of content-block write instructions.
///
/// Unchanged fields emit nothing. Changed fields emit an update carrying the
/// matched block's id, or a create (`id: None`) when no block fills the role
/// yet. Calling again after the caller advances the snapshot to
/// `current` yields an empty diff (idempotence).
pub(crate) fn reconcile_section(
    initial: Option<&SectionForm>,
    current: &SectionForm,
    existing: &[ContentBlock],
) -> Result<Vec<ContentBlock>, ReconcileError> {
    let initial = initial.ok_or(ReconcileError::SnapshotMissing)?;

    let mut writes: Vec<ContentBlock> = Vec::new();

    if current.heading != initial.heading {
        writes.push(text_write(BlockRole::Heading, &current.heading, existing));
    }

    if current.body != initial.body {
        writes.push(text_write(BlockRole::Body, &current.body, existing));
    }

    if current.video_url != initial.video_url {
        writes.push(video_write(&current.video_url, existing));
    }

    Ok(writes)
}
