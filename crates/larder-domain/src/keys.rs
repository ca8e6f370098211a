//! Deterministic cache key generation
//!
//! Every key is `namespace:part[:part...]`. The namespaces used here match the
//! prefixes of the built-in pattern table, so keys produced by these helpers
//! always pick up their namespace policy.

use std::fmt::Display;

use sha2::{Digest, Sha256};

use crate::constants::{KEY_DIGEST_BYTES, KEY_SEPARATOR, MAX_KEY_LENGTH};
use crate::error::{Error, Result};

/// Namespace names shared with the pattern table
pub mod namespace {
    pub const RECIPE: &str = "recipe";
    pub const RECIPE_SEARCH: &str = "recipe_search";
    pub const MEAL_PLAN: &str = "meal_plan";
    pub const SHOPPING_LIST: &str = "shopping_list";
    pub const PRICE: &str = "price";
    pub const NUTRITION: &str = "nutrition";
    pub const AI: &str = "ai";
    pub const USER: &str = "user";
}

/// Cache key utilities
pub struct CacheKey;

impl CacheKey {
    /// Join a namespace and identifier parts with the key separator
    pub fn build<I, P>(namespace: &str, parts: I) -> String
    where
        I: IntoIterator<Item = P>,
        P: Display,
    {
        let mut key = namespace.to_string();
        for part in parts {
            key.push(KEY_SEPARATOR);
            key.push_str(&part.to_string());
        }
        key
    }

    /// Key for a single recipe
    pub fn recipe(recipe_id: impl Display) -> String {
        Self::build(namespace::RECIPE, [recipe_id])
    }

    /// Key for a recipe search; the query text is normalized and hashed
    pub fn recipe_search(query: &str) -> String {
        Self::build(namespace::RECIPE_SEARCH, [Self::digest(query)])
    }

    /// Key for a user's meal plan of a given week
    pub fn meal_plan(user_id: impl Display, week: impl Display) -> String {
        Self::build(
            namespace::MEAL_PLAN,
            [user_id.to_string(), week.to_string()],
        )
    }

    /// Key for the shopping list derived from a meal plan
    pub fn shopping_list(user_id: impl Display, plan_id: impl Display) -> String {
        Self::build(
            namespace::SHOPPING_LIST,
            [user_id.to_string(), plan_id.to_string()],
        )
    }

    /// Key for an ingredient price at a store
    pub fn ingredient_price(ingredient: &str, store: &str) -> String {
        Self::build(
            namespace::PRICE,
            [Self::segment(store), Self::segment(ingredient)],
        )
    }

    /// Key for the nutrition facts of a recipe
    pub fn nutrition(recipe_id: impl Display) -> String {
        Self::build(namespace::NUTRITION, [recipe_id])
    }

    /// Key for generated content; the prompt is normalized and hashed
    pub fn ai_content(kind: &str, prompt: &str) -> String {
        Self::build(namespace::AI, [Self::segment(kind), Self::digest(prompt)])
    }

    /// Key for a user's stored preferences
    pub fn user_preferences(user_id: impl Display) -> String {
        Self::build(
            namespace::USER,
            [user_id.to_string(), "preferences".to_string()],
        )
    }

    /// Glob covering every key of a namespace
    pub fn namespace_glob(namespace: &str) -> String {
        format!("{namespace}{KEY_SEPARATOR}*")
    }

    /// Text before the first separator, or `None` for unnamespaced keys
    pub fn namespace_of(key: &str) -> Option<&str> {
        key.split_once(KEY_SEPARATOR).map(|(ns, _)| ns)
    }

    /// Validate cache key format
    pub fn validate(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(Error::invalid_key("cache key cannot be empty"));
        }

        let length = key.chars().count();
        if length > MAX_KEY_LENGTH {
            return Err(Error::invalid_key(format!(
                "cache key too long ({length} characters, max {MAX_KEY_LENGTH})"
            )));
        }

        if key.chars().any(char::is_control) {
            return Err(Error::invalid_key(
                "cache key contains control characters",
            ));
        }

        Ok(())
    }

    /// Stable short hash of free text: trimmed, lowercased, whitespace collapsed
    pub fn digest(text: &str) -> String {
        let normalized = text
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");
        let hash = Sha256::digest(normalized.as_bytes());
        hex::encode(&hash[..KEY_DIGEST_BYTES])
    }

    /// Lowercase an identifier and replace separators and whitespace with `-`
    fn segment(text: &str) -> String {
        text.trim()
            .chars()
            .map(|c| {
                if c.is_whitespace() || c == KEY_SEPARATOR {
                    '-'
                } else {
                    c
                }
            })
            .collect::<String>()
            .to_lowercase()
    }
}
