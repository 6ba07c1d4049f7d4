use std::fmt;

/// Boolean expression over opaque symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Id(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn id(name: impl Into<String>) -> Self {
        Expr::Id(name.into())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Expr) -> Self {
        Expr::Not(Box::new(inner))
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Or(Box::new(left), Box::new(right))
    }
}

/// Fully parenthesised form, e.g. `((a and b) or not c)`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Id(name) => f.write_str(name),
            Expr::Not(inner) => write!(f, "not {}", inner),
            Expr::And(l, r) => write!(f, "({} and {})", l, r),
            Expr::Or(l, r) => write!(f, "({} or {})", l, r),
        }
    }
}

/// One guarded alternative: `#if`/`#elif` expression and its body.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub condition: Expr,
    pub body: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Literal lines, each followed by `\n`.
    Text(String),
    If {
        branches: Vec<Branch>, // `#if` first, then `#elif`s in order. Never empty.
        else_body: Option<Vec<Block>>,
    },
}
