use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use lazy_static::lazy_static;
use crate::compiler::error::{Error, LangResult};
use crate::util;


lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = HashMap::from([
        ("var", TokenType::Var),
        ("and", TokenType::And),
        ("or", TokenType::Or),
        ("not", TokenType::Not),
        ("exclor", TokenType::Exclor),
        ("if", TokenType::If),
        ("then", TokenType::Then),
        ("elif", TokenType::Elif),
        ("else", TokenType::Else),
        ("for", TokenType::For),
        ("to", TokenType::To),
        ("step", TokenType::Step),
        ("while", TokenType::While),
        ("def", TokenType::Def),
    ]);
}

/// A named piece of source text. Shared by every position that points into it.
#[derive(Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Rc<SourceFile> {
        Rc::new(SourceFile { name: name.into(), text: text.into() })
    }
}

/// A location in a [`SourceFile`]. `index` counts characters; `line` and `column`
/// are zero-based.
///
/// Positions are immutable: [`Position::advance`] returns the next position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub index: usize,
    pub line: usize,
    pub column: usize,
    pub source: Rc<SourceFile>,
}

impl Position {
    pub fn begin(source: &Rc<SourceFile>) -> Position {
        Position { index: 0, line: 0, column: 0, source: Rc::clone(source) }
    }

    /// The position after `current_char`, the character at this position.
    pub fn advance(&self, current_char: char) -> Position {
        let (line, column) = if current_char == '\n' {
            (self.line + 1, 0)
        } else {
            (self.line, self.column + 1)
        };

        Position { index: self.index + 1, line, column, source: Rc::clone(&self.source) }
    }

    pub fn file_name(&self) -> &str {
        &self.source.name
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {} column {}]", self.line + 1, self.column + 1)
    }
}

/// A `start..end` range of source, `end` exclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Span {
        Span { start, end }
    }

    /// From the start of `self` to the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span { start: self.start.clone(), end: other.end.clone() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenType {
    Int, Float,
    Identifier,

    Plus, Minus,
    Multiply, Divide,
    Power,

    ParenthesisLeft, ParenthesisRight,
    Comma, Arrow,

    Assign, Equal,
    NotEqual,
    Less, LessEqual,
    Greater, GreaterEqual,

    // Keywords
    Var,
    And, Or, Not, Exclor,
    If, Then, Elif, Else,
    For, To, Step,
    While,
    Def,

    // EOF
    Eof,
}

impl TokenType {
    pub fn is_keyword(&self) -> bool {
        matches!(self, TokenType::Var
            | TokenType::And | TokenType::Or | TokenType::Not | TokenType::Exclor
            | TokenType::If | TokenType::Then | TokenType::Elif | TokenType::Else
            | TokenType::For | TokenType::To | TokenType::Step
            | TokenType::While | TokenType::Def)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    token_type: TokenType,
    source: String,
    start: Position, end: Position,
}

impl Token {
    pub fn new(token_type: TokenType, source: String, start: Position, end: Position) -> Token {
        Token {
            token_type, source,
            start, end
        }
    }

    /// A token that covers the single character at `start`.
    pub fn single(token_type: TokenType, source: String, start: Position) -> Token {
        let end = start.advance(source.chars().next().unwrap_or('\0'));
        Token::new(token_type, source, start, end)
    }

    pub fn token_type(&self) -> TokenType { self.token_type }
    pub fn source(&self) -> &str { &self.source }
    pub fn start(&self) -> &Position { &self.start }
    pub fn end(&self) -> &Position { &self.end }

    pub fn span(&self) -> Span {
        Span::new(self.start.clone(), self.end.clone())
    }

    /// The literal text of number and identifier tokens.
    pub fn value(&self) -> Option<&str> {
        match self.token_type {
            TokenType::Int | TokenType::Float | TokenType::Identifier => Some(&self.source),
            _ => None,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.token_type {
            TokenType::Eof => f.write_str("Eof"),
            _ => write!(f, "`{}`", self.source),
        }
    }
}

pub struct Lexer {
    chars: Vec<char>,
    current_char: Option<char>,

    start_pos: Position,
    current_pos: Position,
}

impl Lexer {
    pub fn new(source: Rc<SourceFile>) -> Lexer {
        let chars: Vec<char> = source.text.chars().collect();
        let current_pos = Position::begin(&source);

        Lexer {
            current_char: chars.first().copied(),
            chars,

            start_pos: current_pos.clone(),
            current_pos,
        }
    }

    /// Scans the whole input. The returned tokens always end with [`TokenType::Eof`];
    /// the first lexical error aborts the scan.
    pub fn make_tokens(mut self) -> LangResult<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.scan_token()?;
            let is_eof = token.token_type() == TokenType::Eof;
            tokens.push(token);

            if is_eof {
                break;
            }
        }

        tracing::debug!(count = tokens.len(), "scanned tokens");
        Ok(tokens)
    }

    pub fn scan_token(&mut self) -> LangResult<Token> {
        self.skip_whitespace();
        self.start_pos = self.current_pos.clone();

        let c = match self.current_char {
            Some(c) => c,
            None => return Ok(Token::single(TokenType::Eof, String::new(), self.current_pos.clone())),
        };

        match c {
            '0'..='9' => return self.scan_number(),
            c if util::is_alphabetic(c) => return Ok(self.scan_identifier()),
            _ => {},
        }

        self.consume();

        match c {
            '+' => Ok(self.make_token(TokenType::Plus)),
            '*' => Ok(self.make_token(TokenType::Multiply)),
            '/' => Ok(self.make_token(TokenType::Divide)),
            '^' => Ok(self.make_token(TokenType::Power)),
            '(' => Ok(self.make_token(TokenType::ParenthesisLeft)),
            ')' => Ok(self.make_token(TokenType::ParenthesisRight)),
            ',' => Ok(self.make_token(TokenType::Comma)),

            '-' => Ok(if self.expect('>') { self.make_token(TokenType::Arrow) } else {
                self.make_token(TokenType::Minus)
            }),
            '=' => Ok(if self.expect('=') { self.make_token(TokenType::Equal) } else {
                self.make_token(TokenType::Assign)
            }),
            '<' => Ok(if self.expect('=') { self.make_token(TokenType::LessEqual) } else {
                self.make_token(TokenType::Less)
            }),
            '>' => Ok(if self.expect('=') { self.make_token(TokenType::GreaterEqual) } else {
                self.make_token(TokenType::Greater)
            }),
            // `!` only exists as part of `!=`
            '!' => if self.expect('=') { Ok(self.make_token(TokenType::NotEqual)) } else {
                Err(Error::expected_character(self.current_span(), "'=' (after '!')"))
            },

            _ => Err(Error::illegal_character(self.current_span(), format!("'{}'", c))),
        }
    }

    fn scan_number(&mut self) -> LangResult<Token> {
        let mut dot_count = 0;

        while let Some(c) = self.current_char {
            if c == '.' {
                if dot_count == 1 {
                    let dot_pos = self.current_pos.clone();
                    self.consume();

                    return Err(Error::invalid_syntax(Span::new(dot_pos, self.current_pos.clone()),
                        "Unexpected second '.' in number literal"));
                }

                dot_count += 1;
            } else if !util::is_numeric(c) {
                break;
            }

            self.consume();
        }

        Ok(self.make_token(if dot_count == 0 { TokenType::Int } else { TokenType::Float }))
    }

    fn scan_identifier(&mut self) -> Token {
        while let Some(c) = self.current_char {
            if !util::is_alphanumeric(c) {
                break;
            }

            self.consume();
        }

        let token = self.make_token(TokenType::Identifier);

        match KEYWORDS.get(token.source()) {
            Some(keyword) => Token { token_type: *keyword, ..token },
            None => token,
        }
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        Token {
            token_type,
            source: self.chars[self.start_pos.index..self.current_pos.index].iter().collect(),

            start: self.start_pos.clone(), end: self.current_pos.clone(),
        }
    }

    fn current_span(&self) -> Span {
        Span::new(self.start_pos.clone(), self.current_pos.clone())
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.current_char?;

        self.current_pos = self.current_pos.advance(c);
        self.current_char = self.chars.get(self.current_pos.index).copied();

        Some(c)
    }

    fn expect(&mut self, expected: char) -> bool {
        if self.current_char == Some(expected) {
            self.consume();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current_char {
            if !c.is_whitespace() {
                return;
            }

            self.consume();
        }
    }
}
