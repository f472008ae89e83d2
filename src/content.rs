//! The lesson content model: a tagged sum type over the block kinds a lesson
//! can contain, plus the ordered rendering dispatch consumers drive.
//!
//! Blocks are authored as JSON objects carrying a `type` tag. A tag this
//! crate does not recognize deserializes to [`ContentBlock::Unknown`], which
//! every consumer skips, so content produced by a newer admin tool degrades
//! gracefully instead of failing.

use serde::{Deserialize, Serialize};

/// Placeholder body given to a freshly scaffolded text block.
pub const NEW_TEXT_PLACEHOLDER: &str = "Gali qoraalka halkan...";

// --- Block Payloads ---

/// One image of a gallery block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub url: String,
    pub caption: String,
}

/// One multiple-choice question of a quiz block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options` of the right answer.
    pub correct: usize,
}

impl QuizQuestion {
    /// Whether the chosen option index answers the question correctly.
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct
    }
}

/// An embedded video with optional quality variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoBlock {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub resolutions: Vec<String>,
}

/// A prose passage, optionally styled as a highlighted note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub body: String,
    #[serde(default)]
    pub is_note: bool,
}

/// A captioned image gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryBlock {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub images: Vec<GalleryImage>,
}

/// A downloadable attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileBlock {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub file_url: String,
    pub file_name: String,
    pub file_size: String,
    pub file_type: String,
}

/// An inline multiple-choice quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizBlock {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
}

// --- The Block Sum Type ---

/// One unit of lesson content, tagged by rendering kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "lowercase")]
pub enum ContentBlock {
    Video(VideoBlock),
    Text(TextBlock),
    Gallery(GalleryBlock),
    File(FileBlock),
    Quiz(QuizBlock),
    /// Catch-all for tags introduced after this build shipped.
    #[serde(other)]
    Unknown,
}

/// The authorable block kinds, as offered by the admin builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Video,
    Text,
    Gallery,
    File,
    Quiz,
}

impl BlockKind {
    /// The lowercase tag string, as it appears on the wire.
    pub fn label(&self) -> &'static str {
        match self {
            BlockKind::Video => "video",
            BlockKind::Text => "text",
            BlockKind::Gallery => "gallery",
            BlockKind::File => "file",
            BlockKind::Quiz => "quiz",
        }
    }
}

impl ContentBlock {
    /// The block's identifier; `None` for [`ContentBlock::Unknown`].
    pub fn id(&self) -> Option<&str> {
        match self {
            ContentBlock::Video(b) => Some(&b.id),
            ContentBlock::Text(b) => Some(&b.id),
            ContentBlock::Gallery(b) => Some(&b.id),
            ContentBlock::File(b) => Some(&b.id),
            ContentBlock::Quiz(b) => Some(&b.id),
            ContentBlock::Unknown => None,
        }
    }

    /// The block's display title, when one was authored.
    pub fn title(&self) -> Option<&str> {
        match self {
            ContentBlock::Video(b) => b.title.as_deref(),
            ContentBlock::Text(b) => b.title.as_deref(),
            ContentBlock::Gallery(b) => b.title.as_deref(),
            ContentBlock::File(b) => b.title.as_deref(),
            ContentBlock::Quiz(b) => b.title.as_deref(),
            ContentBlock::Unknown => None,
        }
    }

    /// The block's kind; `None` for [`ContentBlock::Unknown`].
    pub fn kind(&self) -> Option<BlockKind> {
        match self {
            ContentBlock::Video(_) => Some(BlockKind::Video),
            ContentBlock::Text(_) => Some(BlockKind::Text),
            ContentBlock::Gallery(_) => Some(BlockKind::Gallery),
            ContentBlock::File(_) => Some(BlockKind::File),
            ContentBlock::Quiz(_) => Some(BlockKind::Quiz),
            ContentBlock::Unknown => None,
        }
    }

    /// Builds the empty block the admin builder inserts for a chosen kind:
    /// title `New {kind}`, and for text blocks a Somali placeholder body.
    pub fn scaffold(kind: BlockKind, id: String) -> ContentBlock {
        let title = Some(format!("New {}", kind.label()));
        match kind {
            BlockKind::Video => ContentBlock::Video(VideoBlock {
                id,
                title,
                video_url: String::new(),
                thumbnail: None,
                resolutions: Vec::new(),
            }),
            BlockKind::Text => ContentBlock::Text(TextBlock {
                id,
                title,
                body: NEW_TEXT_PLACEHOLDER.to_string(),
                is_note: false,
            }),
            BlockKind::Gallery => ContentBlock::Gallery(GalleryBlock {
                id,
                title,
                images: Vec::new(),
            }),
            BlockKind::File => ContentBlock::File(FileBlock {
                id,
                title,
                file_url: String::new(),
                file_name: String::new(),
                file_size: String::new(),
                file_type: String::new(),
            }),
            BlockKind::Quiz => ContentBlock::Quiz(QuizBlock {
                id,
                title,
                questions: Vec::new(),
            }),
        }
    }

    /// Dispatches this block to the matching visitor hook. Unknown blocks
    /// are skipped.
    pub fn accept<V: BlockVisitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            ContentBlock::Video(b) => visitor.video(b),
            ContentBlock::Text(b) => visitor.text(b),
            ContentBlock::Gallery(b) => visitor.gallery(b),
            ContentBlock::File(b) => visitor.file(b),
            ContentBlock::Quiz(b) => visitor.quiz(b),
            ContentBlock::Unknown => {}
        }
    }
}

// --- Rendering Dispatch ---

/// Receiver for the ordered block walk.
///
/// Every hook has an empty default body, so a consumer implements only the
/// kinds it cares about. There is deliberately no hook for unknown blocks.
pub trait BlockVisitor {
    fn video(&mut self, _block: &VideoBlock) {}
    fn text(&mut self, _block: &TextBlock) {}
    fn gallery(&mut self, _block: &GalleryBlock) {}
    fn file(&mut self, _block: &FileBlock) {}
    fn quiz(&mut self, _block: &QuizBlock) {}
}

/// Walks `blocks` in sequence order, dispatching each to `visitor`.
pub fn walk_blocks<V: BlockVisitor + ?Sized>(blocks: &[ContentBlock], visitor: &mut V) {
    for block in blocks {
        block.accept(visitor);
    }
}
