//! Precedence-climbing parser: `!` binds tighter than `&&`, which binds tighter than `||`.

use crate::ParseError;
use crate::expr::Expr;
use crate::lexer::{Token, TokenKind, tokenize};

/// Limit on parenthesis nesting and on the height of the parsed tree.
///
/// Long `,`/`||`/`&&` chains fold into a left-leaning tree one level per
/// operator, so they count against this limit too.
pub const MAX_DEPTH: usize = 128;

const BP_OR: (u8, u8) = (1, 2);
const BP_AND: (u8, u8) = (3, 4);

pub fn parse(src: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(src)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser {
        tokens,
        idx: 0,
        depth: 0,
        end: src.len(),
    };
    let (expr, _) = parser.expr(0)?;
    match parser.peek() {
        None => Ok(expr),
        Some(tok) => Err(unexpected(tok)),
    }
}

struct Parser {
    tokens: Vec<Token>,
    idx: usize,
    depth: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.idx)
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.idx).cloned();
        if tok.is_some() {
            self.idx += 1;
        }
        tok
    }

    /// Parses a binary expression and returns it with its tree height.
    fn expr(&mut self, min_bp: u8) -> Result<(Expr, usize), ParseError> {
        let (mut lhs, mut height) = self.operand()?;

        loop {
            let (l_bp, r_bp, is_and, pos) = match self.peek() {
                Some(Token {
                    kind: TokenKind::And,
                    pos,
                }) => (BP_AND.0, BP_AND.1, true, *pos),
                Some(Token {
                    kind: TokenKind::Or,
                    pos,
                }) => (BP_OR.0, BP_OR.1, false, *pos),
                _ => break,
            };
            if l_bp < min_bp {
                break;
            }
            self.bump();

            let (rhs, rhs_height) = self.expr(r_bp)?;
            height = height.max(rhs_height) + 1;
            if height > MAX_DEPTH {
                return Err(ParseError::TooDeep { pos });
            }
            lhs = if is_and {
                Expr::And(Box::new(lhs), Box::new(rhs))
            } else {
                Expr::Or(Box::new(lhs), Box::new(rhs))
            };
        }

        Ok((lhs, height))
    }

    fn operand(&mut self) -> Result<(Expr, usize), ParseError> {
        let tok = self.bump().ok_or(ParseError::UnexpectedEnd { pos: self.end })?;
        match tok.kind {
            TokenKind::Ident(name) => Ok((Expr::Ident(name), 0)),
            TokenKind::Not => {
                let (inner, height) = self.nested(tok.pos, |p| p.operand())?;
                if height + 1 > MAX_DEPTH {
                    return Err(ParseError::TooDeep { pos: tok.pos });
                }
                Ok((Expr::Not(Box::new(inner)), height + 1))
            }
            TokenKind::LParen => {
                let inner = self.nested(tok.pos, |p| p.expr(0))?;
                match self.bump() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(unexpected(&other)),
                    None => Err(ParseError::UnclosedParen { pos: tok.pos }),
                }
            }
            _ => Err(unexpected(&tok)),
        }
    }

    fn nested<T>(
        &mut self,
        pos: usize,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep { pos });
        }
        self.depth += 1;
        let out = f(self);
        self.depth -= 1;
        out
    }
}

fn unexpected(tok: &Token) -> ParseError {
    let found = match &tok.kind {
        TokenKind::Ident(name) => name.clone(),
        TokenKind::Not => "!".to_string(),
        TokenKind::And => "&&".to_string(),
        TokenKind::Or => "||".to_string(),
        TokenKind::LParen => "(".to_string(),
        TokenKind::RParen => ")".to_string(),
    };
    ParseError::UnexpectedToken {
        found,
        pos: tok.pos,
    }
}
