//! Directive scanner
//!
//! Builds the block tree from template lines. A line is a directive when its
//! trimmed content starts with the configured prefix; everything else is
//! literal text and is kept exactly as written.

use crate::ast::{Block, Branch, Expr};
use crate::config::{Directive, DirectiveConfig};
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::lexer::lex;
use crate::parser::ExprParser;
use log::{trace, warn};

type Lines<'l> = Cursor<'l, &'l str>;

/// A recognized directive line.
struct DirectiveLine<'l> {
    directive: Directive,
    /// Whitespace-separated words after the keyword.
    args: Vec<&'l str>,
    /// 1-based
    line: usize,
}

/// Blocks scanned up to a terminating directive (or end of input).
struct Run<'l> {
    blocks: Vec<Block>,
    end: Option<DirectiveLine<'l>>,
    rest: Lines<'l>,
}

const BRANCH_END: &[Directive] = &[Directive::Elif, Directive::Else, Directive::EndIf];
const ELSE_END: &[Directive] = &[Directive::EndIf];

pub struct Scanner<'c> {
    config: &'c DirectiveConfig,
    exprs: ExprParser,
}

impl<'c> Scanner<'c> {
    pub fn new(config: &'c DirectiveConfig) -> Self {
        Self {
            config,
            exprs: ExprParser::new(config.max_depth()),
        }
    }

    /// Scan a whole template. Lines must not carry their terminators.
    pub fn scan(&self, lines: &[&str]) -> Result<Vec<Block>> {
        let run = self.scan_until(Cursor::new(lines), &[], 0)?;
        // With no terminators a run only stops at end of input.
        debug_assert!(run.end.is_none() && run.rest.is_empty());
        Ok(run.blocks)
    }

    fn scan_until<'l>(
        &self,
        mut lines: Lines<'l>,
        terminators: &[Directive],
        depth: usize,
    ) -> Result<Run<'l>> {
        let mut blocks = Vec::new();
        let mut text = String::new();

        while let Some((&raw, tail)) = lines.walk() {
            let line = lines.position() + 1;
            lines = tail;

            let Some(found) = self.classify(raw, line)? else {
                text.push_str(raw);
                text.push('\n');
                continue;
            };
            trace!("line {}: {}", line, self.config.keyword(found.directive));

            if terminators.contains(&found.directive) {
                flush(&mut blocks, &mut text);
                return Ok(Run {
                    blocks,
                    end: Some(found),
                    rest: lines,
                });
            }

            if found.directive != Directive::If {
                return Err(Error::directive(
                    line,
                    format!(
                        "unexpected `{}` without a matching `{}`",
                        self.config.keyword(found.directive),
                        self.config.keyword(Directive::If)
                    ),
                ));
            }

            flush(&mut blocks, &mut text);
            let (block, rest) = self.scan_if(found, lines, depth + 1)?;
            blocks.push(block);
            lines = rest;
        }

        flush(&mut blocks, &mut text);
        Ok(Run {
            blocks,
            end: None,
            rest: lines,
        })
    }

    /// Everything after an `#if` line up to and including its `#endif`.
    fn scan_if<'l>(
        &self,
        opening: DirectiveLine<'l>,
        mut lines: Lines<'l>,
        depth: usize,
    ) -> Result<(Block, Lines<'l>)> {
        if depth > self.config.max_depth() {
            return Err(Error::NestingTooDeep {
                limit: self.config.max_depth(),
                line: Some(opening.line),
            });
        }

        let opened_at = opening.line;
        let mut branches = Vec::new();
        let mut guard = opening;

        loop {
            let condition = self.parse_condition(&guard)?;
            let run = self.scan_until(lines, BRANCH_END, depth)?;
            branches.push(Branch {
                condition,
                body: run.blocks,
            });
            lines = run.rest;

            let end = run.end.ok_or_else(|| self.unterminated(opened_at))?;
            match end.directive {
                Directive::Elif => guard = end,
                Directive::Else => {
                    self.ignore_args(&end);
                    let run = self.scan_until(lines, ELSE_END, depth)?;
                    let end = run.end.ok_or_else(|| self.unterminated(opened_at))?;
                    self.ignore_args(&end);
                    return Ok((
                        Block::If {
                            branches,
                            else_body: Some(run.blocks),
                        },
                        run.rest,
                    ));
                }
                // Only `#endif` is left in BRANCH_END.
                Directive::If | Directive::EndIf => {
                    self.ignore_args(&end);
                    return Ok((
                        Block::If {
                            branches,
                            else_body: None,
                        },
                        lines,
                    ));
                }
            }
        }
    }

    /// Recognize a directive line, or `None` for literal text.
    fn classify<'l>(&self, raw: &'l str, line: usize) -> Result<Option<DirectiveLine<'l>>> {
        let trimmed = raw.trim();
        if !trimmed.starts_with(self.config.prefix()) {
            return Ok(None);
        }

        let mut words = trimmed.split_whitespace();
        let head = words.next().unwrap_or_default();
        let name = head.strip_prefix(self.config.prefix()).unwrap_or_default();
        let directive = Directive::from_name(name)
            .ok_or_else(|| Error::directive(line, format!("unknown directive `{}`", head)))?;

        Ok(Some(DirectiveLine {
            directive,
            args: words.collect(),
            line,
        }))
    }

    fn parse_condition(&self, guard: &DirectiveLine<'_>) -> Result<Expr> {
        if guard.args.is_empty() {
            return Err(Error::directive(
                guard.line,
                format!(
                    "`{}` requires an expression",
                    self.config.keyword(guard.directive)
                ),
            ));
        }
        let text = guard.args.join(" ");
        self.exprs
            .parse(&lex(&text))
            .map_err(|err| err.at_line(guard.line))
    }

    fn ignore_args(&self, end: &DirectiveLine<'_>) {
        if !end.args.is_empty() {
            warn!(
                "line {}: ignoring text after `{}`: {}",
                end.line,
                self.config.keyword(end.directive),
                end.args.join(" ")
            );
        }
    }

    fn unterminated(&self, opened_at: usize) -> Error {
        Error::directive(
            opened_at,
            format!(
                "`{}` is never closed by `{}`",
                self.config.keyword(Directive::If),
                self.config.keyword(Directive::EndIf)
            ),
        )
    }
}

fn flush(blocks: &mut Vec<Block>, text: &mut String) {
    if !text.is_empty() {
        blocks.push(Block::Text(std::mem::take(text)));
    }
}
