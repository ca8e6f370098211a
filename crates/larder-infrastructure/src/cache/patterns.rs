//! Namespace policy registry
//!
//! Patterns are compiled to glob matchers once and never change afterwards.
//! Lookups walk the table in registration order and the first match wins.

use std::collections::BTreeSet;
use std::time::Duration;

use globset::{GlobBuilder, GlobMatcher};
use larder_domain::constants::DEFAULT_TTL;
use larder_domain::error::{Error, Result};
use larder_domain::keys::{CacheKey, namespace};
use larder_domain::value_objects::CachePattern;

const HOUR: u64 = 3600;
const MINUTE: u64 = 60;

/// Compile a key glob; `*` spans separators
///
/// Only the syntax the cold backend's `KEYS` understands identically is
/// accepted: `*`, `?`, `[abc]`, `[a-z]`, `[^a]` and `\` escapes. Brace
/// alternation and `[!a]` negation are rejected.
pub fn compile_glob(glob: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(&globset_syntax(glob)?)
        .literal_separator(false)
        .backslash_escape(true)
        .build()
        .map(|g| g.compile_matcher())
        .map_err(|e| Error::invalid_key(format!("invalid glob '{glob}': {e}")))
}

/// Rewrite `[^` negation for globset, rejecting syntax `KEYS` reads literally
fn globset_syntax(glob: &str) -> Result<String> {
    let mut translated = String::with_capacity(glob.len());
    let mut chars = glob.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                translated.push(c);
                if let Some(escaped) = chars.next() {
                    translated.push(escaped);
                }
            }
            '{' | '}' => {
                return Err(Error::invalid_key(format!(
                    "invalid glob '{glob}': brace alternation is not supported"
                )));
            }
            '[' => {
                translated.push(c);
                match chars.peek() {
                    Some('!') => {
                        return Err(Error::invalid_key(format!(
                            "invalid glob '{glob}': negate a class with '[^', not '[!'"
                        )));
                    }
                    Some('^') => {
                        chars.next();
                        translated.push('!');
                    }
                    _ => {}
                }
            }
            _ => translated.push(c),
        }
    }
    Ok(translated)
}

/// Built-in policy table
pub fn builtin_patterns() -> Vec<CachePattern> {
    let glob = CacheKey::namespace_glob;
    vec![
        CachePattern::new(glob(namespace::RECIPE), Duration::from_secs(2 * HOUR))
            .with_compression()
            .with_link(glob(namespace::RECIPE_SEARCH))
            .with_link(glob(namespace::NUTRITION)),
        CachePattern::new(glob(namespace::RECIPE_SEARCH), Duration::from_secs(30 * MINUTE))
            .with_compression(),
        CachePattern::new(glob(namespace::MEAL_PLAN), Duration::from_secs(HOUR))
            .with_compression()
            .with_link(glob(namespace::SHOPPING_LIST)),
        CachePattern::new(glob(namespace::SHOPPING_LIST), Duration::from_secs(30 * MINUTE)),
        CachePattern::new(glob(namespace::PRICE), Duration::from_secs(6 * HOUR)),
        CachePattern::new(glob(namespace::NUTRITION), Duration::from_secs(24 * HOUR)),
        CachePattern::new(glob(namespace::AI), Duration::from_secs(24 * HOUR)).with_compression(),
        CachePattern::new(glob(namespace::USER), Duration::from_secs(15 * MINUTE))
            .with_link(glob(namespace::MEAL_PLAN)),
    ]
}

/// Policy that applies to one key
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPolicy<'a> {
    pub ttl: Duration,
    pub compression: bool,
    /// The matching pattern, `None` when the defaults applied
    pub pattern: Option<&'a CachePattern>,
}

#[derive(Debug)]
struct CompiledPattern {
    pattern: CachePattern,
    matcher: GlobMatcher,
}

/// Immutable, ordered table of namespace policies
#[derive(Debug)]
pub struct PatternRegistry {
    patterns: Vec<CompiledPattern>,
    default_ttl: Duration,
}

impl PatternRegistry {
    /// Compile `patterns` in order; keys matching none of them get `default_ttl`
    ///
    /// A zero TTL, default or per pattern, is a configuration error.
    pub fn new(patterns: Vec<CachePattern>, default_ttl: Duration) -> Result<Self> {
        if default_ttl.is_zero() {
            return Err(Error::configuration("Default cache TTL cannot be 0"));
        }
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                if pattern.ttl_secs == 0 {
                    return Err(Error::configuration(format!(
                        "Pattern '{}' has a TTL of 0",
                        pattern.prefix
                    )));
                }
                let matcher = compile_glob(&pattern.prefix)?;
                Ok(CompiledPattern { pattern, matcher })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            patterns,
            default_ttl,
        })
    }

    /// Registry over the built-in table with the standard default TTL
    pub fn builtin() -> Self {
        let patterns = builtin_patterns()
            .into_iter()
            .filter_map(|pattern| {
                let matcher = compile_glob(&pattern.prefix).ok()?;
                Some(CompiledPattern { pattern, matcher })
            })
            .collect();
        Self {
            patterns,
            default_ttl: DEFAULT_TTL,
        }
    }

    /// Policy for `key`: first registered match, else defaults
    pub fn resolve(&self, key: &str) -> ResolvedPolicy<'_> {
        match self.patterns.iter().find(|p| p.matcher.is_match(key)) {
            Some(compiled) => ResolvedPolicy {
                ttl: compiled.pattern.ttl(),
                compression: compiled.pattern.compression,
                pattern: Some(&compiled.pattern),
            },
            None => ResolvedPolicy {
                ttl: self.default_ttl,
                compression: false,
                pattern: None,
            },
        }
    }

    pub fn resolve_ttl(&self, key: &str) -> Duration {
        self.resolve(key).ttl
    }

    pub fn resolve_compression(&self, key: &str) -> bool {
        self.resolve(key).compression
    }

    /// Invalidation links of the pattern registered exactly as `glob`
    pub fn links_for(&self, glob: &str) -> Option<&BTreeSet<String>> {
        self.patterns
            .iter()
            .find(|p| p.pattern.prefix == glob)
            .map(|p| &p.pattern.invalidation_links)
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn patterns(&self) -> impl Iterator<Item = &CachePattern> {
        self.patterns.iter().map(|p| &p.pattern)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
