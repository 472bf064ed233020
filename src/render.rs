//! Compiles a document plus render-time context into email-client-safe
//! HTML: fixed-width table layout, inline styles, no scripts. Author rich
//! text (`text`, `boxed-text`, `code` bodies) passes through unescaped;
//! every other string field is escaped after token resolution.

use std::fmt::Write;

use crate::block::{
    Block, BlockKind, BoxedTextContent, ButtonContent, CodeContent, GroupImage, ImageCardContent,
    ImageContent, ImageGroupContent, ProductContent, ShowListContent, ShowListSource,
    SocialContent, SpacerContent, StripContent, TextContent, UrgencyContent, VideoContent,
};
use crate::context::{RenderOptions, Show};
use crate::document::{Document, Footer};
use crate::personalize::TokenTable;
use crate::recommend;
use crate::style::{
    BlockStyle, FontFamily, FontFamilyNamed, LineStyle, StylesState, TextAlign,
    STYLE_CONTENT_BACKGROUND, STYLE_FONT_FAMILY, STYLE_LINK_COLOR, STYLE_PAGE_BACKGROUND,
};

/// Fixed content width. Email clients do not honor fluid layouts
/// reliably, so the canvas is a centered fixed-width table.
pub const EMAIL_WIDTH: u32 = 600;

const DEFAULT_FONT_STACK: &str = "Helvetica, Arial, sans-serif";
const DEFAULT_PAGE_BACKGROUND: &str = "#f4f4f4";
const DEFAULT_CONTENT_BACKGROUND: &str = "#ffffff";
const DEFAULT_LINK_COLOR: &str = "#2f7bd9";
const DEFAULT_TEXT_COLOR: &str = "#333333";
const MUTED_TEXT_COLOR: &str = "#777777";

/// Per-block cell padding inside the content column.
const CELL_PADDING: &str = "12px 24px";

/// The only stylesheet rule the output carries: below 480px the
/// two-column cells stack. Everything else is inline.
const RESPONSIVE_CSS: &str =
    "@media only screen and (max-width:480px){.mc-col{display:block!important;width:100%!important;box-sizing:border-box;}}";

struct RenderContext<'a> {
    tokens: TokenTable,
    options: &'a RenderOptions,
    font_stack: String,
    link_color: String,
}

/// Renders a document with the default chrome. Never fails: broken
/// references degrade to placeholders and unknown blocks render as
/// nothing, so one bad block cannot take down the email.
pub fn render(document: &Document, options: &RenderOptions) -> String {
    render_with_styles(document, &StylesState::new(), options)
}

/// Renders a document with template-level styles applied to the chrome.
/// Pure and deterministic: identical inputs produce byte-identical HTML.
pub fn render_with_styles(
    document: &Document,
    styles: &StylesState,
    options: &RenderOptions,
) -> String {
    let ctx = RenderContext {
        tokens: TokenTable::build(options),
        options,
        font_stack: styles
            .get(STYLE_FONT_FAMILY)
            .cloned()
            .unwrap_or_else(|| DEFAULT_FONT_STACK.to_string()),
        link_color: styles
            .get(STYLE_LINK_COLOR)
            .cloned()
            .unwrap_or_else(|| DEFAULT_LINK_COLOR.to_string()),
    };
    let page_background = styles
        .get(STYLE_PAGE_BACKGROUND)
        .map(String::as_str)
        .unwrap_or(DEFAULT_PAGE_BACKGROUND);
    let content_background = styles
        .get(STYLE_CONTENT_BACKGROUND)
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONTENT_BACKGROUND);

    log::debug!(
        "rendering document: {} blocks, {} tokens",
        document.block_count(),
        ctx.tokens.len()
    );

    let mut html = String::with_capacity(4096);
    // Writing into a String cannot fail; the guard keeps render total.
    if render_document(
        document,
        &ctx,
        page_background,
        content_background,
        &mut html,
    )
    .is_err()
    {
        log::error!("render aborted mid-document");
    }
    html
}

fn render_document(
    document: &Document,
    ctx: &RenderContext,
    page_background: &str,
    content_background: &str,
    out: &mut String,
) -> std::fmt::Result {
    let title = if document.footer.org_name.is_empty() {
        "Email".to_string()
    } else {
        escape_html(&document.footer.org_name)
    };
    write!(
        out,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<style>{}</style>
</head>
<body style="margin:0;padding:0;background-color:{};">
<table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="background-color:{};"><tr><td align="center" style="padding:24px 8px;">
<table role="presentation" width="{}" cellpadding="0" cellspacing="0" style="width:{}px;max-width:100%;background-color:{};font-family:{};">
"#,
        title,
        RESPONSIVE_CSS,
        escape_html(page_background),
        escape_html(page_background),
        EMAIL_WIDTH,
        EMAIL_WIDTH,
        escape_html(content_background),
        escape_html(&ctx.font_stack),
    )?;

    for block in &document.blocks {
        let full_bleed = block.is_container() && block.style.full_width.unwrap_or(false);
        let padding = if full_bleed { "0" } else { CELL_PADDING };
        write!(out, "<tr><td style=\"padding:{};\">", padding)?;
        block_to_html(block, out, ctx)?;
        write!(out, "</td></tr>\n")?;
    }

    footer_to_html(&document.footer, out, ctx)?;
    write!(
        out,
        "</table>\n</td></tr></table>\n</body>\n</html>\n"
    )?;
    Ok(())
}

// ─── Block dispatch ──────────────────────────────────────────────────────────

fn block_to_html(block: &Block, out: &mut String, ctx: &RenderContext) -> std::fmt::Result {
    match &block.kind {
        BlockKind::Strip(content) => strip_to_html(content, &block.style, out, ctx),
        BlockKind::Text(content) => text_to_html(content, &block.style, out, ctx),
        BlockKind::BoxedText(content) => boxed_text_to_html(content, &block.style, out, ctx),
        BlockKind::Image(content) => image_to_html(content, &block.style, out, ctx),
        BlockKind::ImageGroup(content) => image_group_to_html(content, out, ctx),
        BlockKind::ImageCard(content) => image_card_to_html(content, &block.style, out, ctx),
        BlockKind::Button(content) => button_to_html(content, &block.style, out, ctx),
        BlockKind::Divider(_) => divider_to_html(&block.style, out),
        BlockKind::Spacer(content) => spacer_to_html(content, out),
        BlockKind::Social(content) => social_to_html(content, &block.style, out, ctx),
        BlockKind::Video(content) => video_to_html(content, &block.style, out, ctx),
        BlockKind::Code(content) => code_to_html(content, out, ctx),
        BlockKind::Product(content) => product_to_html(content, &block.style, out, ctx),
        BlockKind::ShowList(content) => show_list_to_html(content, &block.style, out, ctx),
        BlockKind::Urgency(content) => urgency_to_html(content, &block.style, out, ctx),
        BlockKind::Unknown => {
            log::trace!("skipping unknown block '{}'", block.id);
            Ok(())
        }
    }
}

// ─── Containers ──────────────────────────────────────────────────────────────

fn strip_to_html(
    content: &StripContent,
    style: &BlockStyle,
    out: &mut String,
    ctx: &RenderContext,
) -> std::fmt::Result {
    let paint = strip_paint_css(style);
    let inset = style.inset.unwrap_or(false);
    if inset {
        write!(
            out,
            "<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\"><tr><td style=\"padding:0 16px;\">"
        )?;
    }
    write!(
        out,
        "<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\"><tr><td style=\"{}\">",
        escape_html(&paint)
    )?;
    write!(
        out,
        "<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\">"
    )?;
    for child in &content.blocks {
        write!(out, "<tr><td style=\"padding:{};\">", CELL_PADDING)?;
        block_to_html(child, out, ctx)?;
        write!(out, "</td></tr>")?;
    }
    write!(out, "</table></td></tr></table>")?;
    if inset {
        write!(out, "</td></tr></table>")?;
    }
    Ok(())
}

fn strip_paint_css(style: &BlockStyle) -> String {
    let mut css = String::new();
    let transparent = style.transparent.unwrap_or(false);
    // Transparency wins over any paint; full-width is handled by the
    // enclosing cell and stays independent.
    if !transparent {
        if let Some(gradient) = &style.gradient {
            // Solid fallback first for clients without gradient support.
            css.push_str(&format!("background-color:{};", gradient.from));
            css.push_str(&format!(
                "background-image:linear-gradient({}deg,{},{});",
                gradient.angle.unwrap_or(180.0),
                gradient.from,
                gradient.to
            ));
        } else if let Some(bg) = &style.background_color {
            css.push_str(&format!("background-color:{};", bg));
        }
    }
    if let Some(radius) = style.border_radius {
        css.push_str(&format!("border-radius:{}px;", radius));
    }
    if let Some(padding) = style.padding {
        css.push_str(&format!("padding:{}px;", padding));
    } else {
        if let Some(v) = style.padding_vertical {
            css.push_str(&format!("padding-top:{}px;padding-bottom:{}px;", v, v));
        }
        if let Some(h) = style.padding_horizontal {
            css.push_str(&format!("padding-left:{}px;padding-right:{}px;", h, h));
        }
    }
    css
}

// ─── Text blocks ─────────────────────────────────────────────────────────────

fn text_to_html(
    content: &TextContent,
    style: &BlockStyle,
    out: &mut String,
    ctx: &RenderContext,
) -> std::fmt::Result {
    write!(
        out,
        "<div style=\"{}\">{}</div>",
        escape_html(&text_css(style, ctx)),
        ctx.tokens.resolve(&content.html)
    )
}

fn boxed_text_to_html(
    content: &BoxedTextContent,
    style: &BlockStyle,
    out: &mut String,
    ctx: &RenderContext,
) -> std::fmt::Result {
    let background = style.background_color.as_deref().unwrap_or("#f5f5f5");
    let padding = style.padding.unwrap_or(20.0);
    let radius = style.border_radius.unwrap_or(4.0);
    write!(
        out,
        "<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\"><tr><td style=\"background-color:{};padding:{}px;border-radius:{}px;\"><div style=\"{}\">{}</div></td></tr></table>",
        escape_html(background),
        padding,
        radius,
        escape_html(&text_css(style, ctx)),
        ctx.tokens.resolve(&content.html)
    )
}

fn text_css(style: &BlockStyle, ctx: &RenderContext) -> String {
    let mut css = String::new();
    let stack = style
        .font_family
        .as_ref()
        .map(font_family_css)
        .unwrap_or_else(|| ctx.font_stack.clone());
    css.push_str(&format!("font-family:{};", stack));
    css.push_str(&format!("font-size:{}px;", style.font_size.unwrap_or(16.0)));
    css.push_str(&format!(
        "line-height:{};",
        style.line_height.unwrap_or(1.6)
    ));
    css.push_str(&format!(
        "color:{};",
        style.text_color.as_deref().unwrap_or(DEFAULT_TEXT_COLOR)
    ));
    if let Some(align) = style.text_align {
        css.push_str(&format!("text-align:{};", align_to_css(align)));
    }
    css
}

// ─── Images ──────────────────────────────────────────────────────────────────

fn image_to_html(
    content: &ImageContent,
    style: &BlockStyle,
    out: &mut String,
    ctx: &RenderContext,
) -> std::fmt::Result {
    let radius = style
        .border_radius
        .map(|r| format!("border-radius:{}px;", r))
        .unwrap_or_default();
    let link = content
        .link
        .as_deref()
        .filter(|l| !l.is_empty())
        .map(|l| resolve_url(ctx, l));
    if let Some(href) = &link {
        write!(out, "<a href=\"{}\">", escape_html(href))?;
    }
    img_or_placeholder(&content.url, &content.alt, &radius, "Image", out, ctx)?;
    if link.is_some() {
        write!(out, "</a>")?;
    }
    if let Some(caption) = content.caption.as_deref().filter(|c| !c.is_empty()) {
        write!(
            out,
            "<div style=\"font-family:{};font-size:12px;color:{};padding-top:8px;text-align:center;\">{}</div>",
            escape_html(&ctx.font_stack),
            MUTED_TEXT_COLOR,
            resolve_plain(ctx, caption)
        )?;
    }
    Ok(())
}

fn img_or_placeholder(
    url: &str,
    alt: &str,
    extra_css: &str,
    placeholder_label: &str,
    out: &mut String,
    ctx: &RenderContext,
) -> std::fmt::Result {
    let resolved = resolve_url(ctx, url);
    if resolved == "#" {
        // Broken or missing reference: a neutral placeholder keeps the
        // layout intact instead of a broken-image glyph.
        return write!(
            out,
            "<div style=\"background-color:#e9e9e9;color:#999999;font-family:{};font-size:13px;text-align:center;padding:48px 0;{}\">{}</div>",
            escape_html(&ctx.font_stack),
            extra_css,
            escape_html(placeholder_label)
        );
    }
    write!(
        out,
        "<img src=\"{}\" alt=\"{}\" style=\"display:block;width:100%;height:auto;border:0;{}\">",
        escape_html(&resolved),
        resolve_plain(ctx, alt),
        extra_css
    )
}

fn image_group_to_html(
    content: &ImageGroupContent,
    out: &mut String,
    ctx: &RenderContext,
) -> std::fmt::Result {
    if content.images.is_empty() {
        return Ok(());
    }
    write!(
        out,
        "<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\">"
    )?;
    for pair in content.images.chunks(2) {
        write!(out, "<tr>")?;
        for image in pair {
            write!(
                out,
                "<td class=\"mc-col\" width=\"50%\" style=\"padding:4px;vertical-align:top;\">"
            )?;
            group_image_to_html(image, out, ctx)?;
            write!(out, "</td>")?;
        }
        if pair.len() == 1 {
            write!(
                out,
                "<td class=\"mc-col\" width=\"50%\" style=\"padding:4px;\">&nbsp;</td>"
            )?;
        }
        write!(out, "</tr>")?;
    }
    write!(out, "</table>")
}

fn group_image_to_html(
    image: &GroupImage,
    out: &mut String,
    ctx: &RenderContext,
) -> std::fmt::Result {
    let link = image
        .link
        .as_deref()
        .filter(|l| !l.is_empty())
        .map(|l| resolve_url(ctx, l));
    if let Some(href) = &link {
        write!(out, "<a href=\"{}\">", escape_html(href))?;
    }
    img_or_placeholder(&image.url, &image.alt, "", "Image", out, ctx)?;
    if link.is_some() {
        write!(out, "</a>")?;
    }
    Ok(())
}

fn image_card_to_html(
    content: &ImageCardContent,
    style: &BlockStyle,
    out: &mut String,
    ctx: &RenderContext,
) -> std::fmt::Result {
    let background = style.background_color.as_deref().unwrap_or("#fafafa");
    let radius = style.border_radius.unwrap_or(4.0);
    write!(
        out,
        "<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\"><tr><td style=\"background-color:{};border-radius:{}px;\">",
        escape_html(background),
        radius
    )?;
    group_image_to_html(&content.image, out, ctx)?;
    write!(out, "<div style=\"padding:16px;\">")?;
    if !content.title.is_empty() {
        write!(
            out,
            "<div style=\"font-family:{};font-size:18px;font-weight:bold;color:{};padding-bottom:8px;\">{}</div>",
            escape_html(&ctx.font_stack),
            style.text_color.as_deref().map(|c| escape_html(c)).unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
            resolve_plain(ctx, &content.title)
        )?;
    }
    if !content.body.is_empty() {
        write!(
            out,
            "<div style=\"font-family:{};font-size:14px;line-height:1.6;color:{};\">{}</div>",
            escape_html(&ctx.font_stack),
            MUTED_TEXT_COLOR,
            resolve_plain(ctx, &content.body)
        )?;
    }
    write!(out, "</div></td></tr></table>")
}

// ─── Buttons and rules ───────────────────────────────────────────────────────

fn button_to_html(
    content: &ButtonContent,
    style: &BlockStyle,
    out: &mut String,
    ctx: &RenderContext,
) -> std::fmt::Result {
    let background = style
        .background_color
        .as_deref()
        .unwrap_or(ctx.link_color.as_str());
    let text_color = style.text_color.as_deref().unwrap_or("#ffffff");
    let radius = style.border_radius.unwrap_or(4.0);
    let size = style.font_size.unwrap_or(16.0);
    let full_width = style.full_width.unwrap_or(false);
    let align = style
        .text_align
        .map(align_to_css)
        .unwrap_or("center");
    let href = resolve_url(ctx, &content.url);
    let display = if full_width {
        "display:block;"
    } else {
        "display:inline-block;"
    };
    let table_width = if full_width { "100%" } else { "auto" };
    write!(
        out,
        "<table role=\"presentation\" width=\"{}\" align=\"{}\" cellpadding=\"0\" cellspacing=\"0\"><tr><td style=\"background-color:{};border-radius:{}px;text-align:center;\"><a href=\"{}\" style=\"{}padding:12px 24px;font-family:{};font-size:{}px;font-weight:bold;color:{};text-decoration:none;\">{}</a></td></tr></table>",
        table_width,
        align,
        escape_html(background),
        radius,
        escape_html(&href),
        display,
        escape_html(&ctx.font_stack),
        size,
        escape_html(text_color),
        resolve_plain(ctx, &content.label)
    )
}

fn divider_to_html(style: &BlockStyle, out: &mut String) -> std::fmt::Result {
    let color = style.line_color.as_deref().unwrap_or("#dddddd");
    let thickness = style.line_thickness.unwrap_or(1.0);
    let line_style = style
        .line_style
        .map(line_style_to_css)
        .unwrap_or("solid");
    write!(
        out,
        "<div style=\"border-top:{}px {} {};font-size:0;line-height:0;\">&nbsp;</div>",
        thickness,
        line_style,
        escape_html(color)
    )
}

fn spacer_to_html(content: &SpacerContent, out: &mut String) -> std::fmt::Result {
    let height = content.height.max(0.0);
    write!(
        out,
        "<div style=\"height:{}px;line-height:{}px;font-size:0;\">&nbsp;</div>",
        height, height
    )
}

// ─── Social and video ────────────────────────────────────────────────────────

fn social_to_html(
    content: &SocialContent,
    style: &BlockStyle,
    out: &mut String,
    ctx: &RenderContext,
) -> std::fmt::Result {
    if content.links.is_empty() {
        return Ok(());
    }
    let align = style.text_align.map(align_to_css).unwrap_or("center");
    write!(
        out,
        "<table role=\"presentation\" align=\"{}\" cellpadding=\"0\" cellspacing=\"0\"><tr>",
        align
    )?;
    for link in &content.links {
        let href = resolve_url(ctx, &link.url);
        write!(
            out,
            "<td style=\"padding:0 8px;\"><a href=\"{}\" style=\"font-family:{};font-size:13px;color:{};text-decoration:none;\">{}</a></td>",
            escape_html(&href),
            escape_html(&ctx.font_stack),
            escape_html(&ctx.link_color),
            link.platform.label()
        )?;
    }
    write!(out, "</tr></table>")
}

fn video_to_html(
    content: &VideoContent,
    style: &BlockStyle,
    out: &mut String,
    ctx: &RenderContext,
) -> std::fmt::Result {
    let href = resolve_url(ctx, &content.video_url);
    let radius = style
        .border_radius
        .map(|r| format!("border-radius:{}px;", r))
        .unwrap_or_default();
    write!(out, "<a href=\"{}\">", escape_html(&href))?;
    img_or_placeholder(
        &content.thumbnail_url,
        &content.caption,
        &radius,
        "Watch video",
        out,
        ctx,
    )?;
    write!(out, "</a>")?;
    if !content.caption.is_empty() {
        write!(
            out,
            "<div style=\"font-family:{};font-size:12px;color:{};padding-top:8px;text-align:center;\">{}</div>",
            escape_html(&ctx.font_stack),
            MUTED_TEXT_COLOR,
            resolve_plain(ctx, &content.caption)
        )?;
    }
    Ok(())
}

fn code_to_html(content: &CodeContent, out: &mut String, ctx: &RenderContext) -> std::fmt::Result {
    // Raw pass-through by design: the author owns this fragment.
    out.push_str(&ctx.tokens.resolve(&content.html));
    Ok(())
}

// ─── Commerce blocks ─────────────────────────────────────────────────────────

fn product_to_html(
    content: &ProductContent,
    style: &BlockStyle,
    out: &mut String,
    ctx: &RenderContext,
) -> std::fmt::Result {
    let radius = style.border_radius.unwrap_or(4.0);
    write!(
        out,
        "<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\"><tr><td style=\"border:1px solid #e5e5e5;border-radius:{}px;\">",
        radius
    )?;
    img_or_placeholder(&content.image_url, &content.name, "", "Product", out, ctx)?;
    write!(out, "<div style=\"padding:16px;\">")?;
    let name = resolve_plain(ctx, &content.name);
    let url = resolve_url(ctx, &content.url);
    if url == "#" {
        write!(
            out,
            "<div style=\"font-family:{};font-size:16px;font-weight:bold;color:{};\">{}</div>",
            escape_html(&ctx.font_stack),
            DEFAULT_TEXT_COLOR,
            name
        )?;
    } else {
        write!(
            out,
            "<div style=\"font-family:{};font-size:16px;font-weight:bold;\"><a href=\"{}\" style=\"color:{};text-decoration:none;\">{}</a></div>",
            escape_html(&ctx.font_stack),
            escape_html(&url),
            escape_html(&ctx.link_color),
            name
        )?;
    }
    if !content.price.is_empty() {
        write!(
            out,
            "<div style=\"font-family:{};font-size:15px;font-weight:bold;color:{};padding-top:4px;\">{}</div>",
            escape_html(&ctx.font_stack),
            escape_html(&ctx.link_color),
            resolve_plain(ctx, &content.price)
        )?;
    }
    if !content.description.is_empty() {
        write!(
            out,
            "<div style=\"font-family:{};font-size:13px;line-height:1.5;color:{};padding-top:8px;\">{}</div>",
            escape_html(&ctx.font_stack),
            MUTED_TEXT_COLOR,
            resolve_plain(ctx, &content.description)
        )?;
    }
    write!(out, "</div></td></tr></table>")
}

fn show_list_to_html(
    content: &ShowListContent,
    style: &BlockStyle,
    out: &mut String,
    ctx: &RenderContext,
) -> std::fmt::Result {
    let limit = if content.limit == 0 {
        recommend::DEFAULT_RECOMMENDATION_COUNT
    } else {
        content.limit
    };
    let affinity = ctx.options.affinity.as_ref().filter(|a| !a.is_empty());
    let shows: Vec<&Show> = match (content.source, affinity) {
        (ShowListSource::Upcoming, _) => {
            ctx.options.upcoming_shows.iter().take(limit).collect()
        }
        (ShowListSource::Recommended, Some(affinity)) => {
            recommend::top(&ctx.options.upcoming_shows, affinity, limit)
        }
        // Without a signal, "recommended" degrades to the plain upcoming
        // order rather than guessing.
        (ShowListSource::Recommended, None) => {
            ctx.options.upcoming_shows.iter().take(limit).collect()
        }
        (ShowListSource::BecauseYouLiked, Some(affinity)) => {
            recommend::top(&ctx.options.upcoming_shows, affinity, limit)
        }
        // "Because you liked" is meaningless without the signal; the block
        // disappears entirely.
        (ShowListSource::BecauseYouLiked, None) => {
            log::trace!("because-you-liked suppressed: no affinity");
            return Ok(());
        }
    };
    if shows.is_empty() {
        log::trace!("show list suppressed: no shows available");
        return Ok(());
    }

    let heading = match (&content.heading, content.source) {
        (Some(heading), _) => Some(resolve_plain(ctx, heading)),
        (None, ShowListSource::BecauseYouLiked) => ctx
            .options
            .affinity
            .as_ref()
            .and_then(|a| a.category.as_deref())
            .map(|category| format!("Because you liked {}", escape_html(category))),
        (None, _) => None,
    };
    if let Some(heading) = heading {
        write!(
            out,
            "<div style=\"font-family:{};font-size:20px;font-weight:bold;color:{};padding-bottom:12px;\">{}</div>",
            escape_html(&ctx.font_stack),
            style.text_color.as_deref().map(|c| escape_html(c)).unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
            heading
        )?;
    }
    write!(
        out,
        "<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\">"
    )?;
    for show in shows {
        show_row_to_html(show, content.show_image, out, ctx)?;
    }
    write!(out, "</table>")
}

fn show_row_to_html(
    show: &Show,
    with_image: bool,
    out: &mut String,
    ctx: &RenderContext,
) -> std::fmt::Result {
    write!(out, "<tr>")?;
    if with_image {
        if let Some(image_url) = show.image_url.as_deref().filter(|u| !u.is_empty()) {
            write!(
                out,
                "<td class=\"mc-col\" width=\"120\" style=\"padding:8px 12px 8px 0;vertical-align:top;\"><img src=\"{}\" alt=\"{}\" width=\"120\" style=\"display:block;width:120px;height:auto;border:0;border-radius:4px;\"></td>",
                escape_html(&resolve_url(ctx, image_url)),
                escape_html(&show.name)
            )?;
        }
    }
    write!(out, "<td class=\"mc-col\" style=\"padding:8px 0;vertical-align:top;\">")?;
    let name = escape_html(&show.name);
    match show.url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => write!(
            out,
            "<div style=\"font-family:{};font-size:16px;font-weight:bold;\"><a href=\"{}\" style=\"color:{};text-decoration:none;\">{}</a></div>",
            escape_html(&ctx.font_stack),
            escape_html(&resolve_url(ctx, url)),
            escape_html(&ctx.link_color),
            name
        )?,
        None => write!(
            out,
            "<div style=\"font-family:{};font-size:16px;font-weight:bold;color:{};\">{}</div>",
            escape_html(&ctx.font_stack),
            DEFAULT_TEXT_COLOR,
            name
        )?,
    }
    let mut venue_line = escape_html(&show.venue);
    if let Some(city) = show.city.as_deref().filter(|c| !c.is_empty()) {
        if !venue_line.is_empty() {
            venue_line.push_str(", ");
        }
        venue_line.push_str(&escape_html(city));
    }
    if !venue_line.is_empty() {
        write!(
            out,
            "<div style=\"font-family:{};font-size:13px;color:{};padding-top:2px;\">{}</div>",
            escape_html(&ctx.font_stack),
            MUTED_TEXT_COLOR,
            venue_line
        )?;
    }
    if let Some(date) = show.date_label() {
        write!(
            out,
            "<div style=\"font-family:{};font-size:13px;color:{};padding-top:2px;\">{}</div>",
            escape_html(&ctx.font_stack),
            MUTED_TEXT_COLOR,
            escape_html(&date)
        )?;
    }
    if let Some(price) = show.price.as_deref().filter(|p| !p.is_empty()) {
        write!(
            out,
            "<div style=\"font-family:{};font-size:13px;font-weight:bold;color:{};padding-top:2px;\">{}</div>",
            escape_html(&ctx.font_stack),
            DEFAULT_TEXT_COLOR,
            escape_html(price)
        )?;
    }
    write!(out, "</td></tr>")
}

fn urgency_to_html(
    content: &UrgencyContent,
    style: &BlockStyle,
    out: &mut String,
    ctx: &RenderContext,
) -> std::fmt::Result {
    let remaining = ctx.options.show.as_ref().and_then(|s| s.tickets_remaining);
    let remaining = match remaining {
        Some(n) if n <= content.threshold => n,
        _ => {
            log::trace!("urgency suppressed: above threshold or no count");
            return Ok(());
        }
    };
    let message = content.message.replace("{count}", &remaining.to_string());
    let background = style.background_color.as_deref().unwrap_or("#fff3cd");
    let text_color = style.text_color.as_deref().unwrap_or("#856404");
    write!(
        out,
        "<div style=\"background-color:{};color:{};font-family:{};font-size:15px;font-weight:bold;text-align:center;padding:12px;border-radius:4px;\">{}</div>",
        escape_html(background),
        escape_html(text_color),
        escape_html(&ctx.font_stack),
        resolve_plain(ctx, &message)
    )
}

// ─── Footer ──────────────────────────────────────────────────────────────────

fn footer_to_html(footer: &Footer, out: &mut String, ctx: &RenderContext) -> std::fmt::Result {
    let background = footer.style.background.as_deref().unwrap_or("#f4f4f4");
    let text_color = footer.style.text_color.as_deref().unwrap_or("#999999");
    write!(
        out,
        "<tr><td style=\"background-color:{};color:{};font-family:{};font-size:12px;line-height:1.7;text-align:center;padding:24px;\">",
        escape_html(background),
        escape_html(text_color),
        escape_html(&ctx.font_stack)
    )?;
    if !footer.org_name.is_empty() {
        write!(
            out,
            "<div style=\"font-weight:bold;\">{}</div>",
            resolve_plain(ctx, &footer.org_name)
        )?;
    }
    if !footer.mailing_address.is_empty() {
        write!(out, "<div>{}</div>", resolve_plain(ctx, &footer.mailing_address))?;
    }
    if !footer.permission_reminder.is_empty() {
        write!(
            out,
            "<div>{}</div>",
            resolve_plain(ctx, &footer.permission_reminder)
        )?;
    }
    // The two compliance links are part of the footer's structure; with no
    // base url the tokens pass through verbatim for a downstream merge.
    write!(
        out,
        "<div style=\"padding-top:8px;\"><a href=\"{}\" style=\"color:inherit;\">Unsubscribe</a> | <a href=\"{}\" style=\"color:inherit;\">Update preferences</a></div>",
        escape_html(&ctx.tokens.resolve("{{links.unsubscribeLink}}")),
        escape_html(&ctx.tokens.resolve("{{links.preferencesLink}}"))
    )?;
    write!(out, "</td></tr>\n")
}

// ─── Shared helpers ──────────────────────────────────────────────────────────

/// Resolves tokens in a plain string field and escapes it for HTML.
fn resolve_plain(ctx: &RenderContext, input: &str) -> String {
    escape_html(&ctx.tokens.resolve(input))
}

/// Resolves tokens in a URL field and normalizes it: empty URLs become a
/// dead anchor, relative paths join the base url, and absolute URLs and
/// unresolved tokens pass through.
fn resolve_url(ctx: &RenderContext, url: &str) -> String {
    let resolved = ctx.tokens.resolve(url.trim());
    if resolved.is_empty() {
        return "#".to_string();
    }
    if resolved.starts_with("http://")
        || resolved.starts_with("https://")
        || resolved.starts_with("mailto:")
        || resolved.contains("{{")
    {
        return resolved;
    }
    match ctx.options.base_url.as_deref() {
        Some(base) => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            resolved.trim_start_matches('/')
        ),
        None => resolved,
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn align_to_css(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "left",
        TextAlign::Center => "center",
        TextAlign::Right => "right",
    }
}

fn line_style_to_css(line_style: LineStyle) -> &'static str {
    match line_style {
        LineStyle::Solid => "solid",
        LineStyle::Dashed => "dashed",
        LineStyle::Dotted => "dotted",
    }
}

fn font_family_css(family: &FontFamily) -> String {
    match family {
        FontFamily::Named(FontFamilyNamed::Sans) => DEFAULT_FONT_STACK.to_string(),
        FontFamily::Named(FontFamilyNamed::Serif) => {
            "Georgia, 'Times New Roman', serif".to_string()
        }
        FontFamily::Named(FontFamilyNamed::Monospace) => "'Courier New', monospace".to_string(),
        FontFamily::Custom(stack) => stack.clone(),
    }
}
