//! ppd: line-oriented preprocessor directives for plain-text templates.
//!
//! A template is ordinary text in which whole lines may be conditional
//! directives:
//!
//! ```text
//! shared line
//! #if linux and not musl
//! glibc only
//! #elif windows
//! windows only
//! #else
//! everything else
//! #endif
//! ```
//!
//! Compile once, then render against any number of symbol sets. A symbol is
//! an opaque flag: it is either defined for a render or it is not.
//!
//! Supported subset:
//! - `#if`, `#elif` (any number), `#else` (at most one, last) and `#endif`,
//!   nested to any depth up to the configured limit.
//! - Guard expressions with identifiers, `not`, `and`, `or` and parentheses.
//!   Keywords are case-insensitive, identifiers are not.
//!
//! Not supported:
//! - Values, comparisons or arithmetic on symbols.
//! - Macro expansion or substitution inside text lines.
//!
//! Newline semantics:
//! - Output lines are joined with `\n`; a trailing `\r` on an input line is
//!   dropped.
//! - Rendering a template with no directives returns the input unchanged.
//!
//! ```
//! use ppd::SymbolSet;
//!
//! let template = ppd::compile_str("a\n#if x\nb\n#else\nc\n#endif\nd").unwrap();
//! assert_eq!(template.render(&SymbolSet::from(["x"])), "a\nb\nd");
//! assert_eq!(template.render(&SymbolSet::new()), "a\nc\nd");
//! ```

pub mod ast;
pub mod config;
pub mod cursor;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod scanner;

pub use ast::{Block, Branch, Expr};
pub use config::{Directive, DirectiveConfig, DEFAULT_MAX_DEPTH, DEFAULT_PREFIX, MAX_EXPR_DEPTH};
pub use error::{Error, Result};
pub use eval::{Renderer, SymbolSet};

use log::debug;
use parser::ExprParser;
use scanner::Scanner;
use std::io::BufRead;

/// A compiled template. Immutable; render it as often as needed.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    blocks: Vec<Block>,
}

impl Template {
    /// Top-level blocks in source order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Select branches against `symbols` and return the text.
    ///
    /// Every stored line ends in `\n`; the final one is dropped so that the
    /// output matches the input's own trailing-newline convention.
    pub fn render(&self, symbols: &SymbolSet) -> String {
        let mut output = Renderer::new(symbols).render(&self.blocks);
        if output.ends_with('\n') {
            output.pop();
        }
        output
    }
}

/// Compile template lines with the default `#` prefix.
pub fn compile<I, S>(lines: I) -> Result<Template>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    compile_with(lines, &DirectiveConfig::default())
}

/// Compile template lines. Trailing `\r`/`\n` characters are removed from
/// each line first.
pub fn compile_with<I, S>(lines: I, config: &DirectiveConfig) -> Result<Template>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let owned: Vec<S> = lines.into_iter().collect();
    let lines: Vec<&str> = owned
        .iter()
        .map(|line| line.as_ref().trim_end_matches(['\r', '\n']))
        .collect();

    let blocks = Scanner::new(config).scan(&lines)?;
    debug!(
        "compiled template: {} lines, {} top-level blocks",
        lines.len(),
        blocks.len()
    );
    Ok(Template { blocks })
}

/// Compile a template held in one string, split on `\n`.
pub fn compile_str(text: &str) -> Result<Template> {
    compile_str_with(text, &DirectiveConfig::default())
}

pub fn compile_str_with(text: &str, config: &DirectiveConfig) -> Result<Template> {
    compile_with(text.split('\n'), config)
}

/// Compile from a reader, e.g. a `BufReader<File>`.
///
/// Lines follow `BufRead::lines`: a final newline does not produce an extra
/// empty line, so the rendered output never ends in `\n`.
pub fn compile_reader<R: BufRead>(reader: R, config: &DirectiveConfig) -> Result<Template> {
    let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
    compile_with(lines, config)
}

/// Compile and render in one step.
pub fn render_str(text: &str, symbols: impl Into<SymbolSet>) -> Result<String> {
    Ok(compile_str(text)?.render(&symbols.into()))
}

/// Parse a standalone guard expression such as `a and (b or not c)`.
pub fn parse_expression(text: &str) -> Result<Expr> {
    parse_expression_with(text, DEFAULT_MAX_DEPTH)
}

/// `max_depth` bounds parenthesis nesting and must be at least 1.
pub fn parse_expression_with(text: &str, max_depth: usize) -> Result<Expr> {
    if max_depth == 0 {
        return Err(Error::InvalidConfig("max depth must be at least 1".to_string()));
    }
    ExprParser::new(max_depth).parse(&lexer::lex(text))
}
