use crate::ast::*;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Names considered defined for one render.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolSet {
    symbols: HashSet<String>,
}

impl SymbolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Symbols taken from the keys of a map; values are ignored.
    pub fn from_keys<'m, K, V, I>(keys: I) -> Self
    where
        K: AsRef<str> + 'm,
        V: 'm,
        I: IntoIterator<Item = (&'m K, &'m V)>,
    {
        keys.into_iter().map(|(k, _)| k.as_ref().to_string()).collect()
    }

    pub fn insert(&mut self, symbol: impl Into<String>) -> bool {
        self.symbols.insert(symbol.into())
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SymbolSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for SymbolSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.symbols.extend(iter.into_iter().map(Into::into));
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for SymbolSet {
    fn from(symbols: [S; N]) -> Self {
        symbols.into_iter().collect()
    }
}

impl<S: Into<String>> From<Vec<S>> for SymbolSet {
    fn from(symbols: Vec<S>) -> Self {
        symbols.into_iter().collect()
    }
}

impl From<HashSet<String>> for SymbolSet {
    fn from(symbols: HashSet<String>) -> Self {
        Self { symbols }
    }
}

impl<S: AsRef<str>> From<&HashSet<S>> for SymbolSet {
    fn from(symbols: &HashSet<S>) -> Self {
        symbols.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

impl<K: AsRef<str>, V> From<&HashMap<K, V>> for SymbolSet {
    fn from(map: &HashMap<K, V>) -> Self {
        Self::from_keys(map)
    }
}

impl<K: AsRef<str>, V> From<&BTreeMap<K, V>> for SymbolSet {
    fn from(map: &BTreeMap<K, V>) -> Self {
        Self::from_keys(map)
    }
}

impl Expr {
    /// Truth value against `symbols`. An `Id` is true iff it is defined.
    pub fn eval(&self, symbols: &SymbolSet) -> bool {
        match self {
            Expr::Id(name) => symbols.contains(name),
            Expr::Not(inner) => !inner.eval(symbols),
            Expr::And(l, r) => l.eval(symbols) && r.eval(symbols),
            Expr::Or(l, r) => l.eval(symbols) || r.eval(symbols),
        }
    }
}

/// Walks a block tree and selects branches against one symbol set.
pub struct Renderer<'s> {
    symbols: &'s SymbolSet,
}

impl<'s> Renderer<'s> {
    pub fn new(symbols: &'s SymbolSet) -> Self {
        Self { symbols }
    }

    /// Concatenated output of `blocks`, trailing `\n` included.
    pub fn render(&self, blocks: &[Block]) -> String {
        let mut output = String::new();
        self.render_into(blocks, &mut output);
        output
    }

    fn render_into(&self, blocks: &[Block], output: &mut String) {
        for block in blocks {
            match block {
                Block::Text(text) => output.push_str(text),
                Block::If {
                    branches,
                    else_body,
                } => {
                    // First true branch wins; later guards are not evaluated.
                    let chosen = branches
                        .iter()
                        .find(|branch| branch.condition.eval(self.symbols))
                        .map(|branch| &branch.body)
                        .or(else_body.as_ref());
                    if let Some(body) = chosen {
                        self.render_into(body, output);
                    }
                }
            }
        }
    }
}
