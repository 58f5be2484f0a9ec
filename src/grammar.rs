//! Grammar derivation and formatting.
//!
//! A [`Grammar`] maps each type tag to its ordered alternatives. Entries are
//! write-once: an expression registers its own alternatives before visiting
//! the expressions it references, and returns immediately if its tag is
//! already present. That ordering is what makes self-referential and
//! mutually recursive languages terminate.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::trace;
use unicode_width::UnicodeWidthStr;

/// One symbol of a grammar alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum Sym {
    /// Reference to another type: `<tag>`.
    Type(String),
    /// Zero or more of a type: `<tag> *`.
    Repeat(String),
    /// A literal keyword: `"kw"`.
    Exact(String),
    /// End of input.
    Eoi,
}

impl fmt::Display for Sym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sym::Type(tag) => write!(f, "<{tag}>"),
            Sym::Repeat(tag) => write!(f, "<{tag}> *"),
            Sym::Exact(keyword) => write!(f, "\"{keyword}\""),
            Sym::Eoi => f.write_str("EOI"),
        }
    }
}

pub type Alternative = Vec<Sym>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub tag: String,
    pub alternatives: Vec<Alternative>,
}

/// Ordered, write-once mapping from type tag to alternatives.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Grammar {
    rules: Vec<Rule>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.index.contains_key(tag)
    }

    /// Registers a tag. Returns `false`, leaving the grammar untouched, if the
    /// tag already has an entry.
    pub fn insert(&mut self, tag: impl Into<String>, alternatives: Vec<Alternative>) -> bool {
        let tag = tag.into();
        if self.index.contains_key(&tag) {
            return false;
        }
        trace!(tag = %tag, alternatives = alternatives.len(), "grammar rule registered");
        self.index.insert(tag.clone(), self.rules.len());
        self.rules.push(Rule { tag, alternatives });
        true
    }

    pub fn get(&self, tag: &str) -> Option<&[Alternative]> {
        self.index
            .get(tag)
            .map(|&i| self.rules[i].alternatives.as_slice())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Renders one block per tag with the alternatives' columns aligned.
    pub fn format(&self) -> String {
        let mut lines = Vec::new();
        for rule in &self.rules {
            lines.push(format!("{}:", rule.tag));
            let rendered: Vec<Vec<String>> = rule
                .alternatives
                .iter()
                .map(|alt| alt.iter().map(Sym::to_string).collect())
                .collect();

            let mut widths: Vec<usize> = Vec::new();
            for alt in &rendered {
                for (i, sym) in alt.iter().enumerate() {
                    let width = sym.width();
                    match widths.get_mut(i) {
                        Some(w) if *w < width => *w = width,
                        Some(_) => {}
                        None => widths.push(width),
                    }
                }
            }

            for alt in &rendered {
                let mut line = String::from(" |");
                for (i, sym) in alt.iter().enumerate() {
                    line.push(' ');
                    line.push_str(sym);
                    if i + 1 < alt.len() {
                        line.push_str(&" ".repeat(widths[i] - sym.width()));
                    }
                }
                lines.push(line);
            }
            lines.push(String::new());
        }
        lines.join("\n")
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}
