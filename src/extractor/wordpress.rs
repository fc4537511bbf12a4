use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

use crate::extractor::{
    ExtractError, Extracted, Fragment, SiteExtractor, images::image_url, noise, recipe::RecipeCard,
    text_of,
};

pub const DEFAULT_TITLE_SELECTORS: &[&str] = &["h1.entry-title", "h1.post-title"];
pub const DEFAULT_CONTENT_SELECTORS: &[&str] = &["div.entry-content", ".post-content", "article"];

static OG_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[property='og:title']").expect("og:title selector"));
static DOCUMENT_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("title selector"));
static FIGCAPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("figcaption").expect("figcaption selector"));
static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img").expect("img selector"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPressOptions {
    /// Tried in order; first non-empty match wins before the meta fallbacks.
    pub title_selectors: Vec<String>,
    /// Tried in order; the first matching element is the article body.
    pub content_selectors: Vec<String>,
    pub noise_selectors: Vec<String>,
    /// Lowercase substrings that mark a fragment as boilerplate.
    pub noise_phrases: Vec<String>,
}

impl Default for WordPressOptions {
    fn default() -> Self {
        Self {
            title_selectors: to_owned(DEFAULT_TITLE_SELECTORS),
            content_selectors: to_owned(DEFAULT_CONTENT_SELECTORS),
            noise_selectors: noise::NOISE_SELECTORS
                .iter()
                .chain(noise::RECIPE_NOISE_SELECTORS)
                .map(|s| s.to_string())
                .collect(),
            noise_phrases: noise::default_phrases(),
        }
    }
}

fn to_owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Extractor for WordPress themes: an `entry-title` heading over an
/// `entry-content` body, optionally carrying a recipe plugin card.
#[derive(Debug)]
pub struct WordPressExtractor {
    title: Vec<Selector>,
    content: Vec<Selector>,
    noise: Vec<Selector>,
    phrases: Vec<String>,
}

impl WordPressExtractor {
    pub fn new(options: WordPressOptions) -> Result<Self, ExtractError> {
        Ok(Self {
            title: compile(&options.title_selectors)?,
            content: compile(&options.content_selectors)?,
            noise: compile(&options.noise_selectors)?,
            phrases: options
                .noise_phrases
                .iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        })
    }

    fn strip_noise(&self, document: &mut Html) {
        let ids: Vec<_> = self
            .noise
            .iter()
            .flat_map(|sel| document.select(sel).map(|el| el.id()))
            .collect();
        for id in ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }

    fn title(&self, document: &Html) -> Option<String> {
        self.title
            .iter()
            .filter_map(|sel| document.select(sel).next())
            .map(text_of)
            .find(|t| !t.is_empty())
            .or_else(|| {
                document
                    .select(&OG_TITLE)
                    .filter_map(|meta| meta.value().attr("content"))
                    .map(|c| c.trim().to_string())
                    .find(|c| !c.is_empty())
            })
            .or_else(|| {
                document
                    .select(&DOCUMENT_TITLE)
                    .map(text_of)
                    .find(|t| !t.is_empty())
            })
    }
}

fn compile(list: &[String]) -> Result<Vec<Selector>, ExtractError> {
    list.iter()
        .map(|css| Selector::parse(css).map_err(|_| ExtractError::Selector(css.clone())))
        .collect()
}

impl SiteExtractor for WordPressExtractor {
    fn name(&self) -> &'static str {
        "wordpress"
    }

    fn extract(&self, html: &str, base: &Url) -> Result<Extracted, ExtractError> {
        let mut document = Html::parse_document(html);
        self.strip_noise(&mut document);

        let title = self.title(&document).ok_or(ExtractError::MissingTitle)?;
        let container = self
            .content
            .iter()
            .find_map(|sel| document.select(sel).next())
            .ok_or(ExtractError::MissingContainer)?;

        let mut walk = Walk {
            base,
            phrases: &self.phrases,
            fragments: Vec::new(),
            recipes: Vec::new(),
            seen_images: HashSet::new(),
        };
        walk.children(container);

        debug!(
            fragments = walk.fragments.len(),
            recipes = walk.recipes.len(),
            "walked content container"
        );

        Ok(Extracted {
            title,
            fragments: walk.fragments,
            recipe: (!walk.recipes.is_empty()).then(|| walk.recipes.join("\n")),
        })
    }
}

/// Document-order traversal of the content container.
struct Walk<'a> {
    base: &'a Url,
    phrases: &'a [String],
    fragments: Vec<Fragment>,
    recipes: Vec<String>,
    seen_images: HashSet<String>,
}

impl Walk<'_> {
    fn children(&mut self, element: ElementRef<'_>) {
        for child in element.children().filter_map(ElementRef::wrap) {
            self.visit(child);
        }
    }

    fn visit(&mut self, element: ElementRef<'_>) {
        if let Some(card) = RecipeCard::detect(element) {
            let text = card.parse(element);
            if !text.is_empty() {
                self.recipes.push(text);
            }
            return;
        }

        match element.value().name() {
            "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.text(text_of(element));
                self.images_within(element);
            }
            "ul" | "ol" => {
                for item in element
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|c| c.value().name() == "li")
                {
                    let text = text_of(item);
                    if !text.is_empty() {
                        self.text(format!("- {text}"));
                    }
                    self.images_within(item);
                }
            }
            "figure" => {
                self.images_within(element);
                if let Some(caption) = element.select(&FIGCAPTION).next() {
                    self.caption(caption);
                }
            }
            "figcaption" => self.caption(element),
            "img" => self.image(element),
            _ => self.children(element),
        }
    }

    fn images_within(&mut self, element: ElementRef<'_>) {
        for img in element.select(&IMG) {
            self.image(img);
        }
    }

    fn image(&mut self, img: ElementRef<'_>) {
        if let Some(url) = image_url(img, self.base)
            && self.seen_images.insert(url.clone())
        {
            self.fragments.push(Fragment::Image(url));
        }
    }

    fn caption(&mut self, caption: ElementRef<'_>) {
        let text = text_of(caption);
        if !text.is_empty() {
            self.text(format!("Caption: {text}"));
        }
    }

    fn text(&mut self, text: String) {
        if text.is_empty() || noise::is_noise_text(&text, self.phrases) {
            return;
        }
        self.fragments.push(Fragment::Text(text));
    }
}
