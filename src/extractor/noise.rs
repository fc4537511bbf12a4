/// Elements dropped from the page before the body is walked: ads, share
/// and pin buttons, comment threads, author boxes, jump links, related posts.
pub const NOISE_SELECTORS: &[&str] = &[
    "script",
    "style",
    "noscript",
    "iframe",
    "form",
    "nav",
    "aside",
    "footer",
    "button",
    "svg",
    ".adthrive",
    "[class*='adthrive-']",
    "ins.adsbygoogle",
    ".google-auto-placed",
    ".ap_container",
    ".ad-container",
    ".sabox",
    ".sabox-authors",
    ".author-bio",
    ".comments-area",
    "#comments",
    ".jp-relatedposts",
    ".entry-meta",
    ".share-before",
    ".share-after",
    ".dpsp-pin-it-button",
    ".dpsp-post-pinterest-image-hidden",
    "#dpsp-post-content-markup",
    ".ml-form-embedContainer",
    "#feast-advanced-jump-to",
    ".feast-ai-buttons-block",
    ".feast-category-index",
    ".wprm-recipe-snippet",
];

/// Controls inside recipe cards that carry no recipe text.
pub const RECIPE_NOISE_SELECTORS: &[&str] = &[
    ".wprm-recipe-buttons",
    ".wprm-template-chic-buttons",
    ".wprm-recipe-print",
    ".wprm-recipe-pin",
    ".wprm-recipe-jump",
    ".wprm-recipe-adjustable-servings-container",
    ".wprm-recipe-shop-instacart",
    ".wprm-nutrition-label-container",
    ".wprm-call-to-action",
    ".wprm-recipe-user-rating",
    ".tasty-recipes-buttons",
    ".tasty-recipes-rating",
    ".tasty-recipes-entry-footer",
];

/// Text that marks a paragraph as boilerplate rather than article body.
pub const NOISE_PHRASES: &[&str] = &[
    "leave a reply",
    "post comment",
    "required fields are marked",
    "subscribe to",
    "never miss",
    "email inbox",
    "you might also enjoy my",
    "don't miss my",
    "want even more delicious recipes?",
    "this post may contain affiliate links",
];

pub fn is_noise_text(text: &str, phrases: &[String]) -> bool {
    let lower = text.to_lowercase();
    phrases.iter().any(|phrase| lower.contains(phrase.as_str()))
}

pub fn default_phrases() -> Vec<String> {
    NOISE_PHRASES.iter().map(|p| p.to_string()).collect()
}
