//! Structured recipe cards (WP Recipe Maker and Tasty Recipes) flattened
//! into plain text sections.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

use crate::extractor::text_of;

const CHECKBOX: char = '\u{25A2}';

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static recipe selector")
}

/// Which plugin rendered a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeCard {
    WpRecipeMaker,
    TastyRecipes,
}

impl RecipeCard {
    pub fn detect(element: ElementRef<'_>) -> Option<Self> {
        let value = element.value();
        if value.classes().any(|c| c == "wprm-recipe-container")
            || value
                .id()
                .is_some_and(|id| id.starts_with("wprm-recipe-container-"))
        {
            return Some(RecipeCard::WpRecipeMaker);
        }
        if value.classes().any(|c| c == "tasty-recipes") {
            return Some(RecipeCard::TastyRecipes);
        }
        None
    }

    pub fn parse(self, card: ElementRef<'_>) -> String {
        let parts = match self {
            RecipeCard::WpRecipeMaker => parse_wprm(card),
            RecipeCard::TastyRecipes => parse_tasty(card),
        };
        parts.join("\n")
    }
}

struct WprmSelectors {
    name: Selector,
    summary: Selector,
    times: [(&'static str, Selector); 3],
    equipment: Selector,
    ingredients: Selector,
    ingredient_rows: Selector,
    amount: Selector,
    unit: Selector,
    ingredient_name: Selector,
    ingredient_notes: Selector,
    instructions: Selector,
    instruction_rows: Selector,
    instruction_text: Selector,
    notes: Selector,
}

static WPRM: Lazy<WprmSelectors> = Lazy::new(|| WprmSelectors {
    name: selector(".wprm-recipe-name"),
    summary: selector(".wprm-recipe-summary"),
    times: [
        ("Prep Time", selector(".wprm-recipe-prep-time-container .wprm-recipe-time")),
        ("Cook Time", selector(".wprm-recipe-cook-time-container .wprm-recipe-time")),
        ("Total Time", selector(".wprm-recipe-total-time-container .wprm-recipe-time")),
    ],
    equipment: selector(".wprm-recipe-equipment-name"),
    ingredients: selector(".wprm-recipe-ingredients-container"),
    ingredient_rows: selector(".wprm-recipe-group-name, li.wprm-recipe-ingredient"),
    amount: selector(".wprm-recipe-ingredient-amount"),
    unit: selector(".wprm-recipe-ingredient-unit"),
    ingredient_name: selector(".wprm-recipe-ingredient-name"),
    ingredient_notes: selector(".wprm-recipe-ingredient-notes"),
    instructions: selector(".wprm-recipe-instructions-container"),
    instruction_rows: selector(".wprm-recipe-group-name, li.wprm-recipe-instruction"),
    instruction_text: selector(".wprm-recipe-instruction-text"),
    notes: selector(".wprm-recipe-notes"),
});

fn parse_wprm(card: ElementRef<'_>) -> Vec<String> {
    let s = &*WPRM;
    let mut parts = Vec::new();

    if let Some(name) = first_text(card, &s.name) {
        parts.push(name.to_uppercase());
    }
    if let Some(summary) = first_text(card, &s.summary) {
        parts.push(summary);
    }

    let times: Vec<String> = s
        .times
        .iter()
        .filter_map(|(label, sel)| first_text(card, sel).map(|t| format!("{label}: {t}")))
        .collect();
    if !times.is_empty() {
        parts.push(times.join(", "));
    }

    let equipment: Vec<String> = card
        .select(&s.equipment)
        .map(text_of)
        .filter(|t| !t.is_empty())
        .map(|t| format!("- {t}"))
        .collect();
    if !equipment.is_empty() {
        parts.push("Equipment".to_string());
        parts.extend(equipment);
    }

    if let Some(container) = card.select(&s.ingredients).next() {
        parts.push("Ingredients".to_string());
        for row in container.select(&s.ingredient_rows) {
            if is_group_name(row) {
                push_non_empty(&mut parts, text_of(row));
            } else if let Some(line) = wprm_ingredient_line(row) {
                parts.push(line);
            }
        }
    }

    if let Some(container) = card.select(&s.instructions).next() {
        parts.push("Instructions".to_string());
        let mut step = 0;
        for row in container.select(&s.instruction_rows) {
            if is_group_name(row) {
                step = 0;
                push_non_empty(&mut parts, text_of(row));
                continue;
            }
            let text = first_text(row, &s.instruction_text).unwrap_or_else(|| text_of(row));
            if !text.is_empty() {
                step += 1;
                parts.push(format!("{step}. {text}"));
            }
        }
    }

    if let Some(notes) = first_text(card, &s.notes) {
        parts.push("Notes".to_string());
        parts.push(notes);
    }

    parts
}

fn wprm_ingredient_line(li: ElementRef<'_>) -> Option<String> {
    let s = &*WPRM;
    let structured: Vec<String> = [&s.amount, &s.unit, &s.ingredient_name]
        .into_iter()
        .filter_map(|sel| first_text(li, sel))
        .collect();

    let mut line = if structured.is_empty() {
        text_of(li)
    } else {
        let mut line = structured.join(" ");
        if let Some(notes) = first_text(li, &s.ingredient_notes) {
            line.push_str(&format!(" ({notes})"));
        }
        line
    };
    line = line.replace(CHECKBOX, "").trim().to_string();

    (!line.is_empty()).then(|| format!("- {line}"))
}

fn is_group_name(element: ElementRef<'_>) -> bool {
    element.value().classes().any(|c| c == "wprm-recipe-group-name")
}

struct TastySelectors {
    title: Selector,
    description: Selector,
    description_rows: Selector,
    details: [(&'static str, Selector); 4],
    ingredients: Selector,
    instructions: Selector,
    rows: Selector,
    notes: Selector,
}

static TASTY: Lazy<TastySelectors> = Lazy::new(|| TastySelectors {
    title: selector(".tasty-recipes-title"),
    description: selector(".tasty-recipes-description-body"),
    description_rows: selector("p, li, h4"),
    details: [
        ("Prep Time", selector(".tasty-recipes-prep-time")),
        ("Cook Time", selector(".tasty-recipes-cook-time")),
        ("Total Time", selector(".tasty-recipes-total-time")),
        ("Yield", selector(".tasty-recipes-yield")),
    ],
    ingredients: selector(".tasty-recipes-ingredients-body, .tasty-recipes-ingredients"),
    instructions: selector(".tasty-recipes-instructions-body, .tasty-recipes-instructions"),
    rows: selector("h4, li"),
    notes: selector(".tasty-recipes-notes-body, .tasty-recipes-notes"),
});

fn parse_tasty(card: ElementRef<'_>) -> Vec<String> {
    let s = &*TASTY;
    let mut parts = Vec::new();

    if let Some(title) = first_text(card, &s.title) {
        parts.push(title.to_uppercase());
    }

    if let Some(description) = card.select(&s.description).next() {
        for row in description.select(&s.description_rows) {
            let text = text_of(row);
            match row.value().name() {
                "li" if !text.is_empty() => parts.push(format!("- {text}")),
                _ => push_non_empty(&mut parts, text),
            }
        }
    }

    let details: Vec<String> = s
        .details
        .iter()
        .filter_map(|(label, sel)| first_text(card, sel).map(|t| format!("{label}: {t}")))
        .collect();
    if !details.is_empty() {
        parts.push(details.join(", "));
    }

    if let Some(container) = card.select(&s.ingredients).next() {
        parts.push("Ingredients".to_string());
        for row in container.select(&s.rows) {
            let text = text_of(row).replace(CHECKBOX, "").trim().to_string();
            match row.value().name() {
                "h4" => push_non_empty(&mut parts, text),
                _ if !text.is_empty() => parts.push(format!("- {text}")),
                _ => {}
            }
        }
    }

    if let Some(container) = card.select(&s.instructions).next() {
        parts.push("Instructions".to_string());
        let mut step = 0;
        for row in container.select(&s.rows) {
            let text = text_of(row);
            if row.value().name() == "h4" {
                step = 0;
                push_non_empty(&mut parts, text);
            } else if !text.is_empty() {
                step += 1;
                parts.push(format!("{step}. {text}"));
            }
        }
    }

    if let Some(notes) = first_text(card, &s.notes) {
        parts.push("Notes".to_string());
        parts.push(notes);
    }

    parts
}

fn first_text(scope: ElementRef<'_>, sel: &Selector) -> Option<String> {
    scope
        .select(sel)
        .next()
        .map(text_of)
        .filter(|t| !t.is_empty())
}

fn push_non_empty(parts: &mut Vec<String>, text: String) {
    if !text.is_empty() {
        parts.push(text);
    }
}
