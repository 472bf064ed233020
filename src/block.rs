use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::style::BlockStyle;

/// Generates the id for a newly created block.
pub fn new_block_id() -> String {
    Uuid::new_v4().to_string()
}

/// A single element of the email layout. Serializes as
/// `{id, type, content, style}`; the `type`/`content` pair comes from
/// [`BlockKind`] and the style is omitted when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(flatten)]
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "BlockStyle::is_empty")]
    pub style: BlockStyle,
}

impl Block {
    /// Creates a block of the given type with its default content and a
    /// fresh id.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            id: new_block_id(),
            kind: block_type.default_kind(),
            style: BlockStyle::default(),
        }
    }

    /// Reassigns the id of this block and every descendant. Used when a
    /// subtree is duplicated so the copy shares no id with the original.
    pub fn with_fresh_ids(mut self) -> Self {
        self.reassign_ids();
        self
    }

    fn reassign_ids(&mut self) {
        self.id = new_block_id();
        if let BlockKind::Strip(strip) = &mut self.kind {
            for child in &mut strip.blocks {
                child.reassign_ids();
            }
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, BlockKind::Strip(_))
    }

    pub fn children(&self) -> Option<&[Block]> {
        match &self.kind {
            BlockKind::Strip(strip) => Some(&strip.blocks),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Block>> {
        match &mut self.kind {
            BlockKind::Strip(strip) => Some(&mut strip.blocks),
            _ => None,
        }
    }
}

/// The closed set of block types and their payloads. Only `Strip` carries
/// children; the type system rules out nesting anywhere else. Unrecognized
/// tags in stored documents deserialize as `Unknown` and render as nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "kebab-case")]
pub enum BlockKind {
    #[serde(alias = "container")]
    Strip(StripContent),
    Text(TextContent),
    BoxedText(BoxedTextContent),
    Image(ImageContent),
    ImageGroup(ImageGroupContent),
    ImageCard(ImageCardContent),
    Button(ButtonContent),
    Divider(DividerContent),
    Spacer(SpacerContent),
    Social(SocialContent),
    Video(VideoContent),
    Code(CodeContent),
    Product(ProductContent),
    ShowList(ShowListContent),
    Urgency(UrgencyContent),
    #[serde(other)]
    Unknown,
}

impl BlockKind {
    /// Human-readable type name used in logs and error reports.
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockKind::Strip(_) => "strip",
            BlockKind::Text(_) => "text",
            BlockKind::BoxedText(_) => "boxed-text",
            BlockKind::Image(_) => "image",
            BlockKind::ImageGroup(_) => "image-group",
            BlockKind::ImageCard(_) => "image-card",
            BlockKind::Button(_) => "button",
            BlockKind::Divider(_) => "divider",
            BlockKind::Spacer(_) => "spacer",
            BlockKind::Social(_) => "social",
            BlockKind::Video(_) => "video",
            BlockKind::Code(_) => "code",
            BlockKind::Product(_) => "product",
            BlockKind::ShowList(_) => "show-list",
            BlockKind::Urgency(_) => "urgency",
            BlockKind::Unknown => "unknown",
        }
    }
}

/// The palette of insertable block types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Strip,
    Text,
    BoxedText,
    Image,
    ImageGroup,
    ImageCard,
    Button,
    Divider,
    Spacer,
    Social,
    Video,
    Code,
    Product,
    ShowList,
    Urgency,
}

impl BlockType {
    pub const ALL: [BlockType; 15] = [
        BlockType::Strip,
        BlockType::Text,
        BlockType::BoxedText,
        BlockType::Image,
        BlockType::ImageGroup,
        BlockType::ImageCard,
        BlockType::Button,
        BlockType::Divider,
        BlockType::Spacer,
        BlockType::Social,
        BlockType::Video,
        BlockType::Code,
        BlockType::Product,
        BlockType::ShowList,
        BlockType::Urgency,
    ];

    /// Display name shown in the editor palette.
    pub fn label(&self) -> &'static str {
        match self {
            BlockType::Strip => "Layout",
            BlockType::Text => "Text",
            BlockType::BoxedText => "Boxed Text",
            BlockType::Image => "Image",
            BlockType::ImageGroup => "Image Group",
            BlockType::ImageCard => "Image Card",
            BlockType::Button => "Button",
            BlockType::Divider => "Divider",
            BlockType::Spacer => "Spacer",
            BlockType::Social => "Social Follow",
            BlockType::Video => "Video",
            BlockType::Code => "Code",
            BlockType::Product => "Product",
            BlockType::ShowList => "Show List",
            BlockType::Urgency => "Urgency Banner",
        }
    }

    /// The default content a freshly inserted block of this type carries.
    pub fn default_kind(self) -> BlockKind {
        match self {
            BlockType::Strip => BlockKind::Strip(StripContent::default()),
            BlockType::Text => BlockKind::Text(TextContent::default()),
            BlockType::BoxedText => BlockKind::BoxedText(BoxedTextContent::default()),
            BlockType::Image => BlockKind::Image(ImageContent::default()),
            BlockType::ImageGroup => BlockKind::ImageGroup(ImageGroupContent::default()),
            BlockType::ImageCard => BlockKind::ImageCard(ImageCardContent::default()),
            BlockType::Button => BlockKind::Button(ButtonContent::default()),
            BlockType::Divider => BlockKind::Divider(DividerContent::default()),
            BlockType::Spacer => BlockKind::Spacer(SpacerContent::default()),
            BlockType::Social => BlockKind::Social(SocialContent::default()),
            BlockType::Video => BlockKind::Video(VideoContent::default()),
            BlockType::Code => BlockKind::Code(CodeContent::default()),
            BlockType::Product => BlockKind::Product(ProductContent::default()),
            BlockType::ShowList => BlockKind::ShowList(ShowListContent::default()),
            BlockType::Urgency => BlockKind::Urgency(UrgencyContent::default()),
        }
    }
}

/// Strip content - the only block payload that holds children
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripContent {
    pub blocks: Vec<Block>,
}

/// Text content - author rich text, emitted as-is after token resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextContent {
    pub html: String,
}

impl Default for TextContent {
    fn default() -> Self {
        TextContent {
            html: "<p>Add your text here.</p>".to_string(),
        }
    }
}

/// Boxed text content - rich text inside a filled box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxedTextContent {
    pub html: String,
}

impl Default for BoxedTextContent {
    fn default() -> Self {
        BoxedTextContent {
            html: "<p>Add your text here.</p>".to_string(),
        }
    }
}

/// Image content - single image with optional link and caption
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageContent {
    pub url: String,
    pub alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// One image inside a group or card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupImage {
    pub url: String,
    pub alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Image group content - images laid out two per row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageGroupContent {
    pub images: Vec<GroupImage>,
}

impl Default for ImageGroupContent {
    fn default() -> Self {
        ImageGroupContent {
            images: vec![GroupImage::default(), GroupImage::default()],
        }
    }
}

/// Image card content - image with a title and body beneath it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageCardContent {
    pub image: GroupImage,
    pub title: String,
    pub body: String,
}

/// Button content - call-to-action link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonContent {
    pub label: String,
    pub url: String,
}

impl Default for ButtonContent {
    fn default() -> Self {
        ButtonContent {
            label: "Get Tickets".to_string(),
            url: String::new(),
        }
    }
}

/// Divider content - the line itself is configured through style
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DividerContent {}

/// Spacer content - fixed vertical gap in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacerContent {
    pub height: f64,
}

impl Default for SpacerContent {
    fn default() -> Self {
        SpacerContent { height: 24.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Facebook,
    Instagram,
    Twitter,
    Tiktok,
    Youtube,
    Website,
}

impl SocialPlatform {
    pub fn label(&self) -> &'static str {
        match self {
            SocialPlatform::Facebook => "Facebook",
            SocialPlatform::Instagram => "Instagram",
            SocialPlatform::Twitter => "Twitter",
            SocialPlatform::Tiktok => "TikTok",
            SocialPlatform::Youtube => "YouTube",
            SocialPlatform::Website => "Website",
        }
    }
}

/// One entry in a social follow row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    pub platform: SocialPlatform,
    pub url: String,
}

impl Default for SocialLink {
    fn default() -> Self {
        SocialLink {
            platform: SocialPlatform::Website,
            url: String::new(),
        }
    }
}

/// Social content - row of follow links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialContent {
    pub links: Vec<SocialLink>,
}

impl Default for SocialContent {
    fn default() -> Self {
        SocialContent {
            links: vec![
                SocialLink {
                    platform: SocialPlatform::Facebook,
                    url: String::new(),
                },
                SocialLink {
                    platform: SocialPlatform::Instagram,
                    url: String::new(),
                },
                SocialLink {
                    platform: SocialPlatform::Twitter,
                    url: String::new(),
                },
            ],
        }
    }
}

/// Video content - linked thumbnail; email clients cannot embed playback
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoContent {
    pub video_url: String,
    pub thumbnail_url: String,
    pub caption: String,
}

/// Code content - raw HTML pass-through
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeContent {
    pub html: String,
}

/// Product content - single product card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductContent {
    pub name: String,
    pub image_url: String,
    pub price: String,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShowListSource {
    Upcoming,
    Recommended,
    BecauseYouLiked,
}

/// Show list content - a dynamic listing filled from render-time context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShowListContent {
    pub source: ShowListSource,
    pub limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    pub show_image: bool,
}

impl Default for ShowListContent {
    fn default() -> Self {
        ShowListContent {
            source: ShowListSource::Upcoming,
            limit: 4,
            heading: None,
            show_image: true,
        }
    }
}

/// Urgency content - scarcity banner shown only under its threshold.
/// `{count}` in the message is replaced with the live remaining count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyContent {
    pub threshold: u32,
    pub message: String,
}

impl Default for UrgencyContent {
    fn default() -> Self {
        UrgencyContent {
            threshold: 10,
            message: "Only {count} tickets left!".to_string(),
        }
    }
}
