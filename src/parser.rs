use crate::ast::Expr;
use crate::config::{DEFAULT_MAX_DEPTH, MAX_EXPR_DEPTH};
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::lexer::Token;

type Tokens<'a> = Cursor<'a, Token>;

/// A sub-expression, its tree depth, and the tokens left after it.
struct Parsed<'a> {
    expr: Expr,
    depth: usize,
    rest: Tokens<'a>,
}

/// Recursive-descent parser for guard expressions.
///
/// Precedence, high to low: `not`, `and`, `or`. `not` applies to a single
/// operand only. `and` chains group to the left, `or` chains to the right:
/// `a and b and c` is `And(And(a, b), c)` while `a or b or c` is
/// `Or(a, Or(b, c))`.
pub struct ExprParser {
    max_depth: usize,
    max_tree_depth: usize,
}

impl Default for ExprParser {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl ExprParser {
    /// `max_depth` bounds parenthesis nesting. Flat `and`/`or` chains only
    /// count against the separate tree depth limit, `MAX_EXPR_DEPTH`.
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            max_tree_depth: MAX_EXPR_DEPTH,
        }
    }

    pub fn with_max_tree_depth(mut self, max_tree_depth: usize) -> Self {
        self.max_tree_depth = max_tree_depth;
        self
    }

    pub fn parse(&self, tokens: &[Token]) -> Result<Expr> {
        if tokens.is_empty() {
            return Err(Error::expression("empty expression"));
        }

        let parsed = self.parse_or(Cursor::new(tokens), 0)?;
        if parsed.rest.is_empty() {
            return Ok(parsed.expr);
        }
        let trailing: Vec<String> = parsed.rest.as_slice().iter().map(Token::to_string).collect();
        Err(Error::expression(format!(
            "unexpected `{}` after complete expression",
            trailing.join(" ")
        )))
    }

    fn parse_or<'a>(&self, tokens: Tokens<'a>, nesting: usize) -> Result<Parsed<'a>> {
        let mut operands = Vec::new();
        let mut tokens = tokens;
        let rest = loop {
            let operand = self.parse_and(tokens, nesting)?;
            let rest = operand.rest;
            operands.push((operand.expr, operand.depth));
            match rest.walk() {
                Some((Token::Or, tail)) => tokens = tail,
                _ => break rest,
            }
        };

        // Fold from the right so the chain nests as Or(a, Or(b, c)).
        let mut operands = operands.into_iter().rev();
        let (mut expr, mut depth) = operands
            .next()
            .ok_or_else(|| Error::expression("empty expression"))?;
        for (left, left_depth) in operands {
            depth = 1 + depth.max(left_depth);
            self.check_depth(depth)?;
            expr = Expr::or(left, expr);
        }

        Ok(Parsed { expr, depth, rest })
    }

    fn parse_and<'a>(&self, tokens: Tokens<'a>, nesting: usize) -> Result<Parsed<'a>> {
        let mut left = self.parse_unary(tokens, nesting)?;
        loop {
            let rest = left.rest;
            match rest.walk() {
                Some((Token::And, tail)) => {
                    let right = self.parse_unary(tail, nesting)?;
                    let depth = 1 + left.depth.max(right.depth);
                    self.check_depth(depth)?;
                    left = Parsed {
                        expr: Expr::and(left.expr, right.expr),
                        depth,
                        rest: right.rest,
                    };
                }
                // `or` and `)` belong to an enclosing rule.
                None | Some((Token::Or, _)) | Some((Token::RParen, _)) => return Ok(left),
                Some((token, _)) => {
                    return Err(Error::expression(format!(
                        "expected `and`, `or` or `)`, found `{}`",
                        token
                    )))
                }
            }
        }
    }

    fn parse_unary<'a>(&self, tokens: Tokens<'a>, nesting: usize) -> Result<Parsed<'a>> {
        match tokens.walk() {
            Some((Token::Not, tail)) => {
                let inner = self.parse_operand(tail, nesting)?;
                let depth = inner.depth + 1;
                self.check_depth(depth)?;
                Ok(Parsed {
                    expr: Expr::not(inner.expr),
                    depth,
                    rest: inner.rest,
                })
            }
            _ => self.parse_operand(tokens, nesting),
        }
    }

    /// Identifier or parenthesised sub-expression.
    fn parse_operand<'a>(&self, tokens: Tokens<'a>, nesting: usize) -> Result<Parsed<'a>> {
        match tokens.walk() {
            Some((Token::Ident(name), rest)) => Ok(Parsed {
                expr: Expr::id(name.clone()),
                depth: 1,
                rest,
            }),
            Some((Token::LParen, rest)) => {
                if nesting >= self.max_depth {
                    return Err(Error::NestingTooDeep {
                        limit: self.max_depth,
                        line: None,
                    });
                }
                let inner = self.parse_or(rest, nesting + 1)?;
                match inner.rest.walk() {
                    Some((Token::RParen, rest)) => Ok(Parsed { rest, ..inner }),
                    Some((token, _)) => Err(Error::expression(format!(
                        "expected `)`, found `{}`",
                        token
                    ))),
                    None => Err(Error::expression("missing `)`")),
                }
            }
            Some((token, _)) => Err(Error::expression(format!(
                "expected identifier or `(`, found `{}`",
                token
            ))),
            None => Err(Error::expression("unexpected end of expression")),
        }
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_tree_depth {
            return Err(Error::NestingTooDeep {
                limit: self.max_tree_depth,
                line: None,
            });
        }
        Ok(())
    }
}
