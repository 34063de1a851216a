// Tokenizer for the value literal notation, with position tracking for errors
use std::fmt;

use thiserror::Error;

// RUST CONCEPT: Source position for rich error messages
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePos {
    pub line: usize,
    pub column: usize,
    pub offset: usize, // Byte offset from start of input
}

impl SourcePos {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TokenizeError {
    #[error("unterminated string starting at {0}")]
    UnterminatedString(SourcePos),
    #[error("malformed `{text}` at {pos}")]
    MalformedHash { text: String, pos: SourcePos },
}

// RUST CONCEPT: Token with embedded source position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: SourcePos,
    pub end_pos: SourcePos,
}

impl Token {
    pub fn new(kind: TokenKind, pos: SourcePos, end_pos: SourcePos) -> Self {
        Self { kind, pos, end_pos }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),            // Any numeric literal, including NaN and the infinities
    BigInt(String),         // Integer digits of a literal with the `n` suffix
    String(String),
    Atom(String),           // Bare word: record keys and function names
    Boolean(bool),
    Null,
    Undefined,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Colon,
    Pipe,                   // Separates items from extra properties: [1 2 | {tag: 3}]
    TaggedBracket(String),  // `#set[` and friends; holds the tag name
    LabelDef(u32),          // `#1=`
    LabelRef(u32),          // `#1#`
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::BigInt(s) => write!(f, "{}n", s),
            TokenKind::String(s) => write!(f, "{:?}", s),
            TokenKind::Atom(s) => write!(f, "{}", s),
            TokenKind::Boolean(b) => write!(f, "{}", b),
            TokenKind::Null => write!(f, "null"),
            TokenKind::Undefined => write!(f, "undefined"),
            TokenKind::LeftBracket => write!(f, "["),
            TokenKind::RightBracket => write!(f, "]"),
            TokenKind::LeftBrace => write!(f, "{{"),
            TokenKind::RightBrace => write!(f, "}}"),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::TaggedBracket(tag) => write!(f, "#{}[", tag),
            TokenKind::LabelDef(n) => write!(f, "#{}=", n),
            TokenKind::LabelRef(n) => write!(f, "#{}#", n),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

// Characters that end a bare word
fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || "[]{}|:,\"\\#".contains(ch)
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut line = 1;
    let mut column = 1;
    let mut offset = 0;

    // Helper function to advance position tracking
    fn advance_pos(ch: char, line: &mut usize, column: &mut usize, offset: &mut usize) {
        if ch == '\n' {
            *line += 1;
            *column = 1;
        } else {
            *column += 1;
        }
        *offset += ch.len_utf8();
    }

    // Helper function to classify bare words into literal tokens
    fn classify_atom(s: String) -> TokenKind {
        match s.as_str() {
            "true" => return TokenKind::Boolean(true),
            "false" => return TokenKind::Boolean(false),
            "null" => return TokenKind::Null,
            "undefined" => return TokenKind::Undefined,
            "NaN" => return TokenKind::Number(f64::NAN),
            "Infinity" | "+Infinity" => return TokenKind::Number(f64::INFINITY),
            "-Infinity" => return TokenKind::Number(f64::NEG_INFINITY),
            _ => {}
        }

        let unsigned = s.strip_prefix(['-', '+']).unwrap_or(&s);

        // BigInt suffix (e.g., 123n, -456n)
        if let Some(digits) = unsigned.strip_suffix('n')
            && !digits.is_empty()
            && digits.chars().all(|c| c.is_ascii_digit())
        {
            let sign = if s.starts_with('-') { "-" } else { "" };
            return TokenKind::BigInt(format!("{}{}", sign, digits));
        }

        // Only words that start like a number may become one; Rust's float
        // parser would otherwise accept words such as "inf"
        let numeric_start = unsigned
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c == '.');
        if numeric_start && let Ok(n) = s.parse::<f64>() {
            return TokenKind::Number(n);
        }

        TokenKind::Atom(s)
    }

    while let Some(&ch) = chars.peek() {
        let start = SourcePos::new(line, column, offset);

        // RUST CONCEPT: Single-character tokens
        let single = match ch {
            '[' => Some(TokenKind::LeftBracket),
            ']' => Some(TokenKind::RightBracket),
            '{' => Some(TokenKind::LeftBrace),
            '}' => Some(TokenKind::RightBrace),
            ':' => Some(TokenKind::Colon),
            '|' => Some(TokenKind::Pipe),
            _ => None,
        };
        if let Some(kind) = single {
            chars.next();
            advance_pos(ch, &mut line, &mut column, &mut offset);
            tokens.push(Token::new(kind, start, SourcePos::new(line, column, offset)));
            continue;
        }

        match ch {
            // Commas are whitespace
            c if c.is_whitespace() || c == ',' => {
                chars.next();
                advance_pos(ch, &mut line, &mut column, &mut offset);
            }

            '\\' => {
                // Skip comments - consume everything until newline
                for ch in chars.by_ref() {
                    advance_pos(ch, &mut line, &mut column, &mut offset);
                    if ch == '\n' {
                        break;
                    }
                }
            }

            '"' => {
                chars.next();
                advance_pos(ch, &mut line, &mut column, &mut offset);
                let mut string = String::new();
                let mut escaped = false;
                let mut terminated = false;

                for ch in chars.by_ref() {
                    advance_pos(ch, &mut line, &mut column, &mut offset);
                    if escaped {
                        match ch {
                            'n' => string.push('\n'),
                            't' => string.push('\t'),
                            'r' => string.push('\r'),
                            '0' => string.push('\0'),
                            '\\' => string.push('\\'),
                            '"' => string.push('"'),
                            _ => {
                                string.push('\\');
                                string.push(ch);
                            }
                        }
                        escaped = false;
                    } else if ch == '\\' {
                        escaped = true;
                    } else if ch == '"' {
                        terminated = true;
                        break;
                    } else {
                        string.push(ch);
                    }
                }

                if !terminated {
                    return Err(TokenizeError::UnterminatedString(start));
                }
                tokens.push(Token::new(
                    TokenKind::String(string),
                    start,
                    SourcePos::new(line, column, offset),
                ));
            }

            '#' => {
                chars.next();
                advance_pos(ch, &mut line, &mut column, &mut offset);

                // RUST CONCEPT: Three forms share the `#` prefix
                // #12= and #12# are datum labels, #name[ opens a tagged form
                let mut word = String::new();
                while let Some(&next) = chars.peek() {
                    if !next.is_ascii_alphanumeric() {
                        break;
                    }
                    word.push(next);
                    chars.next();
                    advance_pos(next, &mut line, &mut column, &mut offset);
                }

                let terminator = chars.peek().copied();
                let kind = match (word.parse::<u32>(), terminator) {
                    (Ok(label), Some('=')) => Some(TokenKind::LabelDef(label)),
                    (Ok(label), Some('#')) => Some(TokenKind::LabelRef(label)),
                    (Err(_), Some('[')) if !word.is_empty() => Some(TokenKind::TaggedBracket(word.clone())),
                    _ => None,
                };

                match (kind, terminator) {
                    (Some(kind), Some(end)) => {
                        chars.next();
                        advance_pos(end, &mut line, &mut column, &mut offset);
                        tokens.push(Token::new(kind, start, SourcePos::new(line, column, offset)));
                    }
                    _ => {
                        let mut text = format!("#{}", word);
                        if let Some(end) = terminator {
                            text.push(end);
                        }
                        return Err(TokenizeError::MalformedHash { text, pos: start });
                    }
                }
            }

            _ => {
                let mut atom = String::new();
                while let Some(&ch) = chars.peek() {
                    if is_delimiter(ch) {
                        break;
                    }
                    atom.push(ch);
                    chars.next();
                    advance_pos(ch, &mut line, &mut column, &mut offset);
                }
                tokens.push(Token::new(
                    classify_atom(atom),
                    start,
                    SourcePos::new(line, column, offset),
                ));
            }
        }
    }

    Ok(tokens)
}
