// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `addRichContent`: validated cards surfaced next to the reply text.

use async_trait::async_trait;
use parley_core::ParleyError;
use parley_core::types::{PersonCard, ProductCard, RichContent};
use serde_json::{Value, json};

use crate::args::{ADD_RICH_CONTENT, RichContentArgs, ToolCall};
use crate::tool::{Tool, ToolContext, ToolOutcome, mismatched};

fn present(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Build a card, or the error message the model should see.
pub fn build_card(args: &RichContentArgs) -> Result<RichContent, String> {
    match args.kind.as_str() {
        "personCard" => {
            let name = present(&args.name).ok_or("Name is required for a person card")?;
            Ok(RichContent::PersonCard(PersonCard {
                name,
                avatar_url: present(&args.avatar_url),
                email: present(&args.email),
                phone: present(&args.phone),
                whatsapp: present(&args.whatsapp),
            }))
        }
        "productCard" => match (present(&args.title), present(&args.url)) {
            (Some(title), Some(url)) => Ok(RichContent::ProductCard(ProductCard {
                title,
                url,
                image_url: present(&args.image_url),
                description: present(&args.description),
            })),
            _ => Err("Title and URL are required for a product card".to_string()),
        },
        other => Err(format!("Unknown rich content type: {other}")),
    }
}

pub struct AddRichContentTool;

#[async_trait]
impl Tool for AddRichContentTool {
    fn name(&self) -> &str {
        ADD_RICH_CONTENT
    }

    fn description(&self) -> &str {
        "Attach a card to the reply: a personCard to introduce someone, or a productCard to present a product."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "type": { "type": "string", "enum": ["personCard", "productCard"] },
                "name": { "type": "string", "description": "personCard: person's name" },
                "avatarUrl": { "type": "string", "description": "personCard: photo URL" },
                "email": { "type": "string", "description": "personCard: email address" },
                "phone": { "type": "string", "description": "personCard: phone number" },
                "whatsapp": { "type": "string", "description": "personCard: WhatsApp number" },
                "title": { "type": "string", "description": "productCard: product name" },
                "url": { "type": "string", "description": "productCard: product page URL" },
                "imageUrl": { "type": "string", "description": "productCard: image URL" },
                "description": { "type": "string", "description": "productCard: short description" }
            },
            "required": ["type"]
        })
    }

    async fn invoke(&self, call: ToolCall, _ctx: &ToolContext<'_>) -> Result<ToolOutcome, ParleyError> {
        let ToolCall::AddRichContent(args) = call else {
            return Err(mismatched(self.name(), &call));
        };
        Ok(match build_card(&args) {
            Ok(card) => ToolOutcome::RichContent(card),
            Err(error) => ToolOutcome::failure(error),
        })
    }
}
