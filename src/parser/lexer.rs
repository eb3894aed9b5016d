use crate::parser::error::*;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    Number(i64),
    Dice,
    Fudge,
    Percent,
    LeftBracket,
    RightBracket,
    Comma,
    Plus,
    Minus,
    Multiply,
    Divide,
    Power,
    Explode,
    Greater,
    Less,
    Equals,
    KeepHighest,
    KeepLowest,
    DropHighest,
    DropLowest,
    Eof,
}


/// Splits a single dice segment into tokens.
#[derive(Debug)]
pub(crate) struct Lexer {
    input: Vec<char>,
    pub position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let Some(&ch) = self.input.get(self.position) else {
            return Ok(Token::Eof);
        };

        let token = match ch {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Multiply,
            '/' => Token::Divide,
            '^' => Token::Power,
            '!' => Token::Explode,
            '>' => Token::Greater,
            '<' => Token::Less,
            '=' => Token::Equals,
            '%' => Token::Percent,
            '[' => Token::LeftBracket,
            ']' => Token::RightBracket,
            ',' => Token::Comma,
            '0'..='9' => return self.read_number(),
            'a'..='z' | 'A'..='Z' => return self.read_identifier(),
            _ => return Err(ParserError::Token(ch))
        };

        self.position += 1;
        Ok(token)
    }

    fn skip_whitespace(&mut self) {
        while self.position < self.input.len() && self.input[self.position].is_whitespace() {
            self.position += 1;
        }
    }

    fn read_number(&mut self) -> Result<Token> {
        let start = self.position;
        while self.position < self.input.len() && self.input[self.position].is_ascii_digit() {
            self.position += 1;
        }

        let number_str: String = self.input[start..self.position].iter().collect();
        Ok(Token::Number(number_str.parse()?))
    }

    fn lowercase_at(&self, position: usize) -> Option<char> {
        self.input.get(position).map(char::to_ascii_lowercase)
    }

    // `d` is the dice marker unless it starts `dh` or `dl`
    fn read_identifier(&mut self) -> Result<Token> {
        let (token, length) = match (self.lowercase_at(self.position), self.lowercase_at(self.position + 1)) {
            (Some('d'), Some('h')) => (Token::DropHighest, 2),
            (Some('d'), Some('l')) => (Token::DropLowest, 2),
            (Some('k'), Some('h')) => (Token::KeepHighest, 2),
            (Some('k'), Some('l')) => (Token::KeepLowest, 2),
            (Some('d'), _) => (Token::Dice, 1),
            (Some('f'), _) => (Token::Fudge, 1),
            _ => return Err(unknown_word(self.read_word()))
        };

        self.position += length;
        Ok(token)
    }

    fn read_word(&mut self) -> String {
        let start = self.position;
        while self.position < self.input.len() && self.input[self.position].is_alphabetic() {
            self.position += 1;
        }

        self.input[start..self.position].iter().collect()
    }
}

// two letters shaped like `kh` or `dl` name a sort algorithm, any other word
// is plain syntax
fn unknown_word(word: String) -> ParserError {
    let lowercase = word.to_ascii_lowercase();
    let sort_shaped = match lowercase.as_bytes() {
        &[first, second] => matches!(first, b'd' | b'k') || matches!(second, b'h' | b'l'),
        _ => false
    };

    if sort_shaped {
        ParserError::UnknownAlgorithm(word)
    } else {
        ParserError::UnexpectedToken(word)
    }
}
