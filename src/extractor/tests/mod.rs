use std::fs;
use url::Url;

use crate::extractor::{
    ExtractError, ExtractorKind, Fragment, ReadableExtractor, SiteExtractor, WordPressExtractor,
    WordPressOptions,
};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

fn wordpress() -> WordPressExtractor {
    WordPressExtractor::new(WordPressOptions::default()).unwrap()
}

#[test]
fn test_extract_recipe_post() {
    let base = Url::parse("https://example.com/crispy-chickpeas/").unwrap();
    let extracted = wordpress().extract(&fixture("recipe_post.html"), &base).unwrap();

    assert_eq!(extracted.title, "Crispy Roasted Chickpeas");
    assert_eq!(
        extracted.fragments,
        vec![
            Fragment::Text(
                "Roasted chickpeas are the snack I reach for when the pantry looks bare. They take one can, a little oil and a hot oven."
                    .to_string()
            ),
            Fragment::Image("https://example.com/wp-content/uploads/chickpeas.jpg".to_string()),
            Fragment::Text("Caption: Golden chickpeas fresh from the oven".to_string()),
            Fragment::Text("Why dry them first?".to_string()),
            Fragment::Text(
                "Moisture is the enemy of crunch. Pat them dry with a towel and let them sit for ten minutes."
                    .to_string()
            ),
            Fragment::Text("- Use a hot oven".to_string()),
            Fragment::Text("- Do not crowd the pan".to_string()),
        ]
    );

    assert!(extracted.has_recipe());
    let recipe = extracted.recipe.as_deref().unwrap();
    assert!(recipe.starts_with("ROASTED CHICKPEAS\nA crunchy pantry snack."));
    assert!(recipe.contains("Prep Time: 5 mins, Cook Time: 25 mins"));
    assert!(recipe.contains("- 1 can chickpeas"));
    assert!(recipe.ends_with("1. Heat oven to 425F.\n2. Roast until crisp."));
    assert!(!recipe.contains("Print"));
}

#[test]
fn test_body_places_recipe_after_fragments() {
    let base = Url::parse("https://example.com/crispy-chickpeas/").unwrap();
    let extracted = wordpress().extract(&fixture("recipe_post.html"), &base).unwrap();
    let body = extracted.body();

    let image = body
        .find("[image: https://example.com/wp-content/uploads/chickpeas.jpg]")
        .unwrap();
    let list = body.find("- Do not crowd the pan").unwrap();
    let recipe = body.find("ROASTED CHICKPEAS").unwrap();
    assert!(image < list && list < recipe);

    assert!(!body.contains("Jump to Recipe"));
    assert!(!body.contains("Advertisement"));
    assert!(!body.contains("never miss"));
    assert!(!body.contains("Leave a Reply"));
    assert!(!body.contains("pixel.gif"));
}

#[test]
fn test_falls_back_to_document_title_and_post_content() {
    let base = Url::parse("https://example.com/storing-herbs/").unwrap();
    let extracted = wordpress().extract(&fixture("plain_post.html"), &base).unwrap();

    assert_eq!(extracted.title, "Storing Fresh Herbs | Weeknight Kitchen");
    assert!(!extracted.has_recipe());
    assert_eq!(extracted.fragments.len(), 5);
    assert_eq!(
        extracted.fragments[3],
        Fragment::Text("- Chop the leaves finely.".to_string())
    );
}

#[test]
fn test_missing_container() {
    let base = Url::parse("https://example.com/category/snacks/").unwrap();
    let result = wordpress().extract(&fixture("no_content.html"), &base);
    assert!(matches!(result, Err(ExtractError::MissingContainer)));
}

#[test]
fn test_missing_title() {
    let base = Url::parse("https://example.com/").unwrap();
    let html = r#"<html><body><div class="entry-content"><p>Body only.</p></div></body></html>"#;
    let result = wordpress().extract(html, &base);
    assert!(matches!(result, Err(ExtractError::MissingTitle)));
}

#[test]
fn test_custom_selectors() {
    let options = WordPressOptions {
        title_selectors: vec!["h2.headline".to_string()],
        content_selectors: vec!["section.story".to_string()],
        ..WordPressOptions::default()
    };
    let extractor = WordPressExtractor::new(options).unwrap();
    let html = r#"<html><body><h2 class="headline">Custom</h2>
        <section class="story"><p>First.</p><blockquote><p>Quoted.</p></blockquote></section></body></html>"#;

    let extracted = extractor
        .extract(html, &Url::parse("https://example.com/").unwrap())
        .unwrap();
    assert_eq!(extracted.title, "Custom");
    assert_eq!(extracted.body(), "First.\nQuoted.");
}

#[test]
fn test_inline_images_follow_their_text() {
    let base = Url::parse("https://example.com/open-shelving/").unwrap();
    let extracted = wordpress().extract(&fixture("inline_images.html"), &base).unwrap();

    assert_eq!(
        extracted.fragments,
        vec![
            Fragment::Text("We swapped the upper cabinets for two oak shelves.".to_string()),
            Fragment::Image("https://example.com/uploads/shelves.jpg".to_string()),
            Fragment::Text("- Brackets from the hardware store".to_string()),
            Fragment::Image("https://example.com/uploads/brackets.jpg".to_string()),
            Fragment::Text("- Two coats of matte varnish".to_string()),
            Fragment::Text("Before the shelves went up.".to_string()),
            Fragment::Image("https://example.com/uploads/before.jpg".to_string()),
        ]
    );
}

#[test]
fn test_invalid_selector_is_rejected() {
    let options = WordPressOptions {
        content_selectors: vec!["div[".to_string()],
        ..WordPressOptions::default()
    };
    assert!(matches!(
        WordPressExtractor::new(options),
        Err(ExtractError::Selector(_))
    ));
}

#[test]
fn test_readable_extractor() {
    let base = Url::parse("https://example.com/storing-herbs/").unwrap();
    let extracted = ReadableExtractor::default()
        .extract(&fixture("plain_post.html"), &base)
        .unwrap();

    assert!(extracted.title.contains("Storing Fresh Herbs"));
    assert!(extracted.recipe.is_none());
    assert!(!extracted.fragments.is_empty());
}

#[test]
fn test_extractor_kind() {
    assert_eq!("WordPress".parse::<ExtractorKind>().unwrap(), ExtractorKind::WordPress);
    assert_eq!("readable".parse::<ExtractorKind>().unwrap(), ExtractorKind::Readable);
    assert!("scrapy".parse::<ExtractorKind>().is_err());

    let built = ExtractorKind::Readable
        .build(WordPressOptions::default())
        .unwrap();
    assert_eq!(built.name(), "readable");
}

#[test]
fn test_malformed_html() {
    let html = "<html><head><title>Broken</title><body><div class=\"entry-content\"><p>Unclosed tags<div>More content";
    let extracted = wordpress()
        .extract(html, &Url::parse("https://example.com/broken").unwrap())
        .unwrap();

    assert_eq!(extracted.title, "Broken");
    assert!(extracted.body().contains("Unclosed tags"));
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(
            html in ".*",
            path in "[a-z/]{0,20}"
        ) {
            let base = Url::parse(&format!("https://example.com/{path}")).unwrap();
            let _ = wordpress().extract(&html, &base);
        }

        #[test]
        fn test_image_markers_are_well_formed(
            src in "[a-z0-9/\\]\\[._-]{1,30}"
        ) {
            let html = format!(
                r#"<html><head><title>T</title></head><body><div class="entry-content"><img src="/{src}"></div></body></html>"#
            );
            let base = Url::parse("https://example.com/").unwrap();
            let extracted = wordpress().extract(&html, &base).unwrap();
            for fragment in extracted.fragments {
                if let Fragment::Image(url) = fragment {
                    prop_assert!(!url.contains(']'));
                }
            }
        }
    }
}
