// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `getProducts`: lookup against a built-in demo catalog.
//!
//! Stands in for a real product API. The response shape is what matters: it
//! always succeeds and is small enough to fit any sane response budget.

use async_trait::async_trait;
use parley_core::ParleyError;
use serde::Serialize;
use serde_json::{Value, json};

use crate::args::{GET_PRODUCTS, ToolCall};
use crate::tool::{Tool, ToolContext, ToolOutcome, mismatched};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub price: f64,
    pub currency: &'static str,
    pub description: &'static str,
    pub in_stock: bool,
}

pub const CATALOG: &[Product] = &[
    Product {
        id: "tv-oled-55",
        name: "OLED TV 55\"",
        category: "televisions",
        price: 1299.0,
        currency: "USD",
        description: "55-inch 4K OLED television with HDR and a 120 Hz panel.",
        in_stock: true,
    },
    Product {
        id: "tv-led-43",
        name: "LED TV 43\"",
        category: "televisions",
        price: 449.0,
        currency: "USD",
        description: "43-inch Full HD LED television for smaller rooms.",
        in_stock: true,
    },
    Product {
        id: "soundbar-300",
        name: "Soundbar 300",
        category: "audio",
        price: 249.0,
        currency: "USD",
        description: "Compact 2.1 soundbar with wireless subwoofer.",
        in_stock: true,
    },
    Product {
        id: "headphones-nc",
        name: "Noise-Cancelling Headphones",
        category: "audio",
        price: 199.0,
        currency: "USD",
        description: "Over-ear headphones with 30 hours of battery life.",
        in_stock: false,
    },
    Product {
        id: "laptop-14",
        name: "Ultrabook 14",
        category: "computers",
        price: 999.0,
        currency: "USD",
        description: "14-inch laptop, 16 GB RAM, 512 GB SSD.",
        in_stock: true,
    },
];

fn matches(product: &Product, category: Option<&str>, term: Option<&str>) -> bool {
    let category_ok = category.is_none_or(|c| product.category.eq_ignore_ascii_case(c));
    let term_ok = term.is_none_or(|t| {
        let t = t.to_lowercase();
        product.name.to_lowercase().contains(&t) || product.description.to_lowercase().contains(&t)
    });
    category_ok && term_ok
}

/// Filter the catalog; when nothing matches, the whole catalog is returned.
pub fn lookup(category: Option<&str>, search_term: Option<&str>) -> Vec<&'static Product> {
    fn clean(s: Option<&str>) -> Option<&str> {
        s.map(str::trim).filter(|s| !s.is_empty())
    }
    let (category, term) = (clean(category), clean(search_term));
    let found: Vec<&Product> = CATALOG.iter().filter(|p| matches(p, category, term)).collect();
    if found.is_empty() {
        CATALOG.iter().collect()
    } else {
        found
    }
}

pub struct GetProductsTool;

#[async_trait]
impl Tool for GetProductsTool {
    fn name(&self) -> &str {
        GET_PRODUCTS
    }

    fn description(&self) -> &str {
        "List products from the catalog with prices and availability, optionally filtered by category or search term."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "description": "Product category, e.g. televisions, audio, computers"
                },
                "searchTerm": {
                    "type": "string",
                    "description": "Words to look for in product names and descriptions"
                }
            }
        })
    }

    async fn invoke(&self, call: ToolCall, _ctx: &ToolContext<'_>) -> Result<ToolOutcome, ParleyError> {
        let ToolCall::GetProducts(args) = call else {
            return Err(mismatched(self.name(), &call));
        };
        let products = lookup(args.category.as_deref(), args.search_term.as_deref());
        Ok(ToolOutcome::Result(json!({
            "success": true,
            "total": products.len(),
            "products": products,
        })))
    }
}
