//! Static HTML rendering of the card list.
//!
//! One `<article>` per tip, one block per placed story, one link per related
//! tip. Cards are grouped in an exclusive `<details name>` set so a browser
//! keeps at most one open. Reference links point at the story instance the
//! resolver picks, so following one lands on (and `:target`-highlights) the
//! right copy.

use crate::core::{resolve, Reference, Resolution};
use crate::domain::{Story, StoryKey, Tip};

const STYLESHEET: &str = r#"
.tips-grid { display: grid; gap: 1.5rem; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); }
.tip-card { border: 1px solid #e3e6e8; border-radius: 8px; background: #fff; }
.tip-card:target { outline: 2px solid #007acc; }
.tip-card__header { padding: 1.5rem 1.5rem 0.5rem 1.5rem; }
.tip-card__number { font-weight: 700; color: #2d7a4f; }
.tip-card__expand-btn { cursor: pointer; padding: 0.5rem 1.5rem; }
.tip-card__story { padding: 0.75rem 1.5rem; border-top: 1px solid #eef0f1; }
.tip-card__story:target { outline: 2px solid #007acc; }
.tip-card__story--xref { border-left: 3px solid #2d7a4f; background-color: #f0f8f3; }
.tip-card__story-source { font-size: 0.8rem; margin-bottom: 0.5rem; font-style: italic; }
.tip-card__tag, .tip-card__source-link { margin-right: 0.5rem; text-decoration: none; }
.tip-card__no-stories-text { padding: 1rem 1.5rem 0.5rem 1.5rem; text-align: center; }
.tip-card__contribute-text { font-size: 0.9rem; margin: 0; }
.tip-card__contribute-section { padding: 1rem 1.5rem 1.5rem 1.5rem; text-align: center; border-top: 1px solid #eef0f1; }
.tip-card__contribute-link { display: inline-block; padding: 0.5rem 1rem; color: white; background-color: #e67e22; border-radius: 6px; text-decoration: none; }
.error { display: flex; justify-content: center; align-items: center; height: 200px; color: #e74c3c; text-align: center; }
"#;

/// Page-level rendering options
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Document title
    pub title: String,

    /// Target of the "Share your experience!" links
    pub contribute_href: String,

    /// Inline the default stylesheet
    pub inline_styles: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            title: "Pragmatic Programmer Tips".to_string(),
            contribute_href: "#contribute".to_string(),
            inline_styles: true,
        }
    }
}

/// Escape text for HTML element content and quoted attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Anchor id of one placed story instance
pub fn story_anchor(key: &StoryKey, tip: u32) -> String {
    format!("story-{}-tip-{}", key, tip)
}

/// Render the full page for the expanded view
pub fn render_page(tips: &[Tip], options: &PageOptions) -> String {
    let cards: String = tips
        .iter()
        .map(|tip| render_card(tips, tip, options))
        .collect();
    render_shell(options, &cards)
}

/// Render the page shown when loading failed; no cards are rendered
pub fn render_error_page(message: &str, options: &PageOptions) -> String {
    let body = format!(
        "<div class=\"error\">\n<p>{}</p>\n</div>\n",
        escape_html(message)
    );
    render_shell(options, &body)
}

fn render_shell(options: &PageOptions, grid: &str) -> String {
    let style = if options.inline_styles {
        format!("<style>{}</style>\n", STYLESHEET)
    } else {
        String::new()
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n{style}</head>\n<body>\n<main id=\"tips-grid\" class=\"tips-grid\">\n{grid}</main>\n</body>\n</html>\n",
        title = escape_html(&options.title),
        style = style,
        grid = grid,
    )
}

/// Render one tip card
pub fn render_card(tips: &[Tip], tip: &Tip, options: &PageOptions) -> String {
    let status = if tip.has_stories() {
        "tip-card--has-stories"
    } else {
        "tip-card--no-stories"
    };

    let mut html = format!(
        "<article class=\"tip-card {status}\" id=\"tip-{n}\" data-tip-id=\"{n}\">\n\
         <div class=\"tip-card__header\">\n\
         <div class=\"tip-card__number\">#{n}</div>\n\
         <h2 class=\"tip-card__title\">{title}</h2>\n\
         <p class=\"tip-card__description\">{description}</p>\n\
         </div>\n",
        status = status,
        n = tip.number,
        title = escape_html(&tip.title),
        description = escape_html(&tip.description),
    );

    if tip.has_stories() {
        let stories: String = tip
            .stories
            .iter()
            .map(|story| render_story(tips, tip.number, story))
            .collect();

        html.push_str(&format!(
            "<details class=\"tip-card__actions\" name=\"tips\">\n\
             <summary class=\"tip-card__expand-btn\" aria-controls=\"stories-{n}\">{label}</summary>\n\
             <div class=\"tip-card__stories\" id=\"stories-{n}\">\n{stories}</div>\n\
             </details>\n",
            n = tip.number,
            label = escape_html(&tip.expand_label()),
            stories = stories,
        ));
    } else {
        html.push_str(
            "<div class=\"tip-card__no-stories-text\">\n\
             <p class=\"tip-card__contribute-text\">No stories yet</p>\n\
             </div>\n",
        );
    }

    html.push_str(&format!(
        "<div class=\"tip-card__contribute-section\">\n\
         <a href=\"{href}\" class=\"tip-card__contribute-link\">Share your experience!</a>\n\
         </div>\n</article>\n",
        href = escape_html(&options.contribute_href),
    ));

    html
}

/// Render one placed story on card `on_tip`
pub fn render_story(tips: &[Tip], on_tip: u32, story: &Story) -> String {
    let class = if story.is_xref() {
        "tip-card__story tip-card__story--xref"
    } else {
        "tip-card__story"
    };

    let mut html = format!(
        "<div class=\"{class}\" id=\"{id}\" data-story=\"{key}\" data-source-tip=\"{source}\">\n",
        class = class,
        id = story_anchor(&story.key, on_tip),
        key = story.key,
        source = story.source_tip,
    );

    if story.is_xref() {
        html.push_str(&format!(
            "<div class=\"tip-card__story-source\">Story from {}</div>\n",
            reference_link(tips, on_tip, story, story.source_tip, "tip-card__source-link"),
        ));
    }

    html.push_str(&format!(
        "<div class=\"tip-card__story-content\">{}</div>\n",
        escape_html(&story.content)
    ));

    if !story.related_tips.is_empty() {
        let tags: String = story
            .related_tips
            .iter()
            .map(|&n| reference_link(tips, on_tip, story, n, "tip-card__tag"))
            .collect();
        html.push_str(&format!(
            "<div class=\"tip-card__story-tags\">Related: {}</div>\n",
            tags
        ));
    }

    html.push_str("</div>\n");
    html
}

fn reference_link(tips: &[Tip], on_tip: u32, story: &Story, target: u32, class: &str) -> String {
    let reference = Reference::new(target, on_tip).with_story(story.key.clone());
    let href = match resolve(tips, &reference) {
        Resolution::Story { tip, index } => tips
            .iter()
            .find(|t| t.number == tip)
            .and_then(|t| t.stories.get(index))
            .map(|s| format!("#{}", story_anchor(&s.key, tip)))
            .unwrap_or_else(|| format!("#tip-{}", tip)),
        Resolution::CardOnly { tip } | Resolution::TipNotFound { tip } => format!("#tip-{}", tip),
    };

    format!(
        "<a href=\"{href}\" class=\"{class}\" data-tip=\"{target}\" data-origin=\"{origin}\" data-story=\"{key}\">Tip #{target}</a>",
        href = href,
        class = class,
        target = target,
        origin = on_tip,
        key = story.key,
    )
}
