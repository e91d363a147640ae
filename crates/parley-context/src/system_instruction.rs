// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System instruction assembly.
//!
//! Sections appear in a fixed order: brand, tone, language, optional
//! ask-for-name, tool policy, optional rich content policy, custom
//! instruction, Q&A pairs. The output depends only on the settings and the
//! budget.

use parley_config::BudgetConfig;
use parley_core::{AppSettings, Language};

use crate::truncate::truncate;

pub const LANGUAGE_DIRECTIVE_EN: &str =
    "Always reply in English, whatever language the visitor writes in.";
pub const LANGUAGE_DIRECTIVE_FR: &str =
    "Always reply in French (français), whatever language the visitor writes in.";

const ASK_NAME_LINE: &str =
    "Before anything else, politely ask the visitor for their name and use it afterwards.";

const DEFAULT_CONTACT_RULE: &str = "Submit the contact form when the visitor wants the team to \
get back to them and has given their name, email address and message.";

const DEFAULT_QUOTE_RULE: &str = "Submit a quote request when the visitor asks for a price on a \
custom need and has given their name, email address and project details.";

const RICH_CONTENT_POLICY: &str = "addRichContent: show a card when it helps the visitor. Use a \
personCard (name required, optional avatarUrl, email, phone, whatsapp) to introduce a contact \
person, and a productCard (title and url required, optional imageUrl, description) to present a \
product. Never repeat card details in your text.";

/// The fixed language directive for a bot language.
pub fn language_directive(language: Language) -> &'static str {
    match language {
        Language::En => LANGUAGE_DIRECTIVE_EN,
        Language::Fr => LANGUAGE_DIRECTIVE_FR,
    }
}

fn tool_policy(settings: &AppSettings) -> String {
    let rule = |custom: &Option<String>, default: &'static str| -> String {
        custom
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(default)
            .to_string()
    };
    let behavior = &settings.behavior;
    [
        "Tool usage policy:".to_string(),
        "getProducts: call it whenever the visitor asks about products, prices or availability, \
         and base product answers only on its result."
            .to_string(),
        format!(
            "submitContactForm: {} Never invent the visitor's details; ask for anything missing.",
            rule(&behavior.contact_rule, DEFAULT_CONTACT_RULE)
        ),
        format!(
            "submitQuoteRequest: {} Never invent the visitor's details; ask for anything missing.",
            rule(&behavior.quote_rule, DEFAULT_QUOTE_RULE)
        ),
        "searchKnowledgeBase: call it when the question needs company information that is not \
         already in this conversation."
            .to_string(),
    ]
    .join("\n\n")
}

fn qna_block(settings: &AppSettings, budget: &BudgetConfig) -> Option<String> {
    if settings.qna.is_empty() || budget.max_qna_pairs == 0 {
        return None;
    }
    let pairs: Vec<String> = settings
        .qna
        .iter()
        .take(budget.max_qna_pairs)
        .map(|pair| {
            format!(
                "Q: {}\nA: {}",
                pair.name,
                truncate(&pair.content, budget.max_characters_per_qna_answer)
            )
        })
        .collect();
    Some(format!(
        "Frequently asked questions. These answers take priority over any document:\n\n{}",
        pairs.join("\n\n")
    ))
}

/// Build the system instruction for a bot.
pub fn build_system_instruction(settings: &AppSettings, budget: &BudgetConfig) -> String {
    let brand = settings.appearance.brand_name.trim();
    let mut sections = vec![
        if brand.is_empty() {
            "You are a customer-support assistant.".to_string()
        } else {
            format!("You are the customer-support assistant for {brand}.")
        },
        format!(
            "Your tone is {}: {}.",
            settings.personality.tone,
            settings.personality.tone.style()
        ),
        language_directive(settings.behavior.language).to_string(),
    ];

    if settings.behavior.ask_for_name {
        sections.push(ASK_NAME_LINE.to_string());
    }

    sections.push(tool_policy(settings));

    if settings.behavior.rich_content_enabled {
        sections.push(RICH_CONTENT_POLICY.to_string());
    }

    let custom = settings.personality.custom_instruction.trim();
    if !custom.is_empty() {
        sections.push(format!(
            "Additional instructions:\n{}",
            truncate(custom, budget.max_characters_in_custom_instruction)
        ));
    }

    if let Some(qna) = qna_block(settings, budget) {
        sections.push(qna);
    }

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::settings::Tone;
    use parley_test_utils::fixtures;

    fn build(settings: &AppSettings) -> String {
        build_system_instruction(settings, &BudgetConfig::default())
    }

    #[test]
    fn sections_follow_fixed_order() {
        let mut settings = fixtures::settings();
        settings.behavior.ask_for_name = true;
        settings.behavior.rich_content_enabled = true;
        settings.qna = vec![fixtures::qna_pair("Opening hours?", "9 to 5.")];
        let text = build(&settings);

        let positions: Vec<usize> = [
            "assistant for Acme",
            "Your tone is",
            LANGUAGE_DIRECTIVE_EN,
            ASK_NAME_LINE,
            "Tool usage policy:",
            "addRichContent:",
            "Additional instructions:",
            "Q: Opening hours?\nA: 9 to 5.",
        ]
        .iter()
        .map(|needle| text.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn language_directive_is_exactly_one_fixed_string() {
        let mut settings = fixtures::settings();
        settings.behavior.language = Language::Fr;
        let text = build(&settings);
        assert!(text.contains(LANGUAGE_DIRECTIVE_FR));
        assert!(!text.contains(LANGUAGE_DIRECTIVE_EN));
    }

    #[test]
    fn optional_sections_are_omitted() {
        let text = build(&fixtures::settings());
        assert!(!text.contains(ASK_NAME_LINE));
        assert!(!text.contains("addRichContent"));
        assert!(!text.contains("Frequently asked questions"));
    }

    #[test]
    fn custom_rules_replace_defaults() {
        let mut settings = fixtures::settings();
        settings.behavior.contact_rule = Some("Only submit after the visitor confirms.".into());
        let text = build(&settings);
        assert!(text.contains("submitContactForm: Only submit after the visitor confirms."));
        assert!(!text.contains(DEFAULT_CONTACT_RULE));
        assert!(text.contains(DEFAULT_QUOTE_RULE));
    }

    #[test]
    fn blank_custom_rule_falls_back_to_default() {
        let mut settings = fixtures::settings();
        settings.behavior.quote_rule = Some("   ".into());
        assert!(build(&settings).contains(DEFAULT_QUOTE_RULE));
    }

    #[test]
    fn custom_instruction_is_truncated_with_marker() {
        let mut settings = fixtures::settings();
        settings.personality.custom_instruction = "x".repeat(2500);
        let text = build(&settings);
        assert!(text.contains(&format!("{}...", "x".repeat(2000))));
        assert!(!text.contains(&"x".repeat(2001)));
    }

    #[test]
    fn qna_pairs_are_capped_and_answers_truncated() {
        let mut settings = fixtures::settings();
        settings.qna = (0..25)
            .map(|i| fixtures::qna_pair(&format!("question {i:02}?"), &"a".repeat(600)))
            .collect();
        let text = build(&settings);
        assert!(text.contains("Q: question 19?"));
        assert!(!text.contains("Q: question 20?"));
        assert!(text.contains(&format!("A: {}...", "a".repeat(500))));
    }

    #[test]
    fn tone_is_described() {
        let mut settings = fixtures::settings();
        settings.personality.tone = Tone::Formal;
        assert!(build(&settings).contains("Your tone is formal: polite and formal"));
    }
}
