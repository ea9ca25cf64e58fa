//! Minimal lexer for generated dialect expressions.
//!
//! The fragment reorder engine has to find string literals inside text that
//! is itself source code — fragments may contain `+`, quotes or parens as
//! literal content, so naive splitting would corrupt them. The lexer
//! understands the dialect's string grammar: doubled-quote escapes in both
//! quote kinds, backtick escapes inside double quotes.

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Quoted string literal, quotes included.
    Str,
    LParen,
    RParen,
    Plus,
    /// Any other run of non-whitespace characters.
    Word,
}

/// One token with its byte span in the source.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Scan past a string literal starting at `chars[start]` (the opening
/// quote). Returns the index one past the closing quote.
fn scan_string(chars: &[(usize, char)], start: usize, quote: char) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i].1;
        if c == '`' && quote == '"' {
            // backtick escapes the next character inside double quotes
            i += 2;
            continue;
        }
        if c == quote {
            if i + 1 < chars.len() && chars[i + 1].1 == quote {
                // doubled quote is an escaped quote, not a terminator
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    // unterminated literal: consume the rest
    chars.len()
}

fn byte_at(chars: &[(usize, char)], i: usize, src_len: usize) -> usize {
    chars.get(i).map_or(src_len, |&(pos, _)| pos)
}

/// Tokenize `src` into string literals, parens, `+`, and word runs.
/// Whitespace separates tokens and is not emitted.
pub fn tokenize(src: &str) -> Vec<Token> {
    let chars: Vec<(usize, char)> = src.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let (pos, c) = chars[i];
        let (kind, next) = match c {
            '\'' | '"' => (TokenKind::Str, scan_string(&chars, i, c)),
            '(' => (TokenKind::LParen, i + 1),
            ')' => (TokenKind::RParen, i + 1),
            '+' => (TokenKind::Plus, i + 1),
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            _ => {
                let mut j = i + 1;
                while j < chars.len()
                    && !matches!(chars[j].1, '\'' | '"' | '(' | ')' | '+')
                    && !chars[j].1.is_whitespace()
                {
                    j += 1;
                }
                (TokenKind::Word, j)
            }
        };
        let end = byte_at(&chars, next, src.len());
        tokens.push(Token {
            kind,
            text: src[pos..end].to_string(),
            start: pos,
            end,
        });
        i = next;
    }
    tokens
}

/// Decode a raw quoted literal (as produced by the lexer) back to its
/// string value.
pub fn literal_value(raw: &str) -> String {
    let mut chars: Vec<char> = raw.chars().collect();
    if chars.len() < 2 {
        return raw.to_string();
    }
    let quote = chars[0];
    if chars[chars.len() - 1] == quote {
        chars.pop();
    }
    chars.remove(0);

    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == quote && i + 1 < chars.len() && chars[i + 1] == quote {
            out.push(quote);
            i += 2;
        } else if c == '`' && quote == '"' && i + 1 < chars.len() {
            out.push(unescape(chars[i + 1]));
            i += 2;
        } else {
            out.push(c);
            i += 1;
        }
    }
    out
}

/// Resolve a backtick escape to the character it denotes.
fn unescape(c: char) -> char {
    match c {
        '0' => '\0',
        'a' => '\x07',
        'b' => '\x08',
        'f' => '\x0c',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\x0b',
        other => other,
    }
}
