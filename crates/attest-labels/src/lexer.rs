use crate::ParseError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Normalized label token (`-` already mapped to `_`).
    Ident(String),
    Not,
    And,
    Or,
    LParen,
    RParen,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset in the source expression.
    pub pos: usize,
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Split an expression into tokens.
///
/// `,` lexes to the same token as `||`.
pub(crate) fn tokenize(src: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        let kind = match c {
            c if c.is_whitespace() => continue,
            '!' => TokenKind::Not,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Or,
            '&' | '|' => match chars.peek() {
                Some(&(_, next)) if next == c => {
                    chars.next();
                    if c == '&' { TokenKind::And } else { TokenKind::Or }
                }
                _ => return Err(ParseError::UnexpectedChar { ch: c, pos }),
            },
            c if is_ident_char(c) => {
                let mut ident = String::new();
                ident.push(if c == '-' { '_' } else { c });
                while let Some(&(_, next)) = chars.peek() {
                    if !is_ident_char(next) {
                        break;
                    }
                    ident.push(if next == '-' { '_' } else { next });
                    chars.next();
                }
                TokenKind::Ident(ident)
            }
            _ => return Err(ParseError::UnexpectedChar { ch: c, pos }),
        };
        tokens.push(Token { kind, pos });
    }

    Ok(tokens)
}
