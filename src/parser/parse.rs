use crate::{Algorithm, Arithmetic, Comparator, Die, DropKeep, Explode, Operator, Pool, Rollable, Toss};
use crate::parser::error::*;
use crate::parser::{Lexer, Token};


/// Compiles dice notation into a [`Rollable`] tree.
///
/// The notation is first split into segments on every `+` that is outside
/// of parenthesis and followed by another dice expression, so `2d3+4` stays a
/// single segment while `2d3+1d4` becomes two. Each segment is then either a
/// simple pool (`4d6kh3-1`) or a parenthesized expression followed by
/// modifiers (`(2d6+1d4)!*2`), parsed recursively.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a> {
    notation: &'a str
}

impl<'a> Parser<'a> {
    /// Creates a new `Parser` for `notation`.
    pub fn new(notation: &'a str) -> Self {
        Self { notation }
    }

    /// The top-level segments of the notation, in order.
    ///
    /// # Errors
    /// Returns [`ParserError::UnexpectedParenthesis`] or
    /// [`ParserError::UnclosedParenthesis`] for unbalanced parenthesis.
    ///
    /// # Examples
    /// ```
    /// use dice_cup::Parser;
    ///
    /// let parser = Parser::new("2d3+4+3dF!>1/4^3");
    /// assert_eq!(parser.segments().unwrap(), vec!["2d3+4", "3dF!>1/4^3"]);
    /// ```
    pub fn segments(&self) -> Result<Vec<&'a str>> {
        Ok(split_segments(self.notation, 0)?.into_iter().map(|(_, segment)| segment).collect())
    }

    /// Parses the whole notation.
    ///
    /// An empty notation yields an empty [`Pool`], a single segment yields its
    /// rollable directly and several segments are summed in a [`Pool`].
    ///
    /// # Errors
    /// Syntax errors are wrapped with [`ParserError::AtPosition`], use
    /// [`ParserError::err()`] to get the underlying error and
    /// [`ParserError::kind()`] for its category.
    ///
    /// # Examples
    /// ```
    /// use dice_cup::{ErrorKind, Parser, ParserError};
    ///
    /// let rollable = Parser::new("4d6dl").parse().unwrap();
    /// assert_eq!(rollable.notation(), "4D6DL1");
    ///
    /// let err = Parser::new("2d6 + (1d4").parse().unwrap_err();
    /// assert_eq!(err.err(), &ParserError::UnclosedParenthesis);
    /// assert_eq!(err.kind(), ErrorKind::Syntax);
    /// ```
    pub fn parse(&self) -> Result<Rollable> {
        let rollable = parse_expression(self.notation, 0, 0)?;
        tracing::debug!(notation = self.notation, compiled = %rollable, "compiled dice notation");

        Ok(rollable)
    }
}


/// Deepest parenthesis nesting accepted in a notation.
const MAX_NESTING: usize = 128;

fn parse_expression(text: &str, offset: usize, depth: usize) -> Result<Rollable> {
    if text.trim().is_empty() {
        return Ok(Pool::empty().into());
    }

    let mut rollables = split_segments(text, offset)?
        .into_iter()
        .map(|(start, segment)| parse_segment(segment, offset + start, depth))
        .collect::<Result<Vec<_>>>()?;

    match rollables.len() {
        1 => Ok(rollables.remove(0)),
        _ => Ok(Pool::new(rollables).into())
    }
}

// `offset` only shifts the reported error positions
fn split_segments(text: &str, offset: usize) -> Result<Vec<(usize, &str)>> {
    let pluses = top_level_pluses(text, offset)?;
    let mut segments = Vec::new();
    let mut start = 0;

    // a `+` splits when the fragment up to the next top-level `+` has dice
    for (n, &plus) in pluses.iter().enumerate() {
        let end = pluses.get(n + 1).copied().unwrap_or(text.len());

        if has_dice(&text[plus + 1..end]) {
            segments.push((start, &text[start..plus]));
            start = plus + 1;
        }
    }

    segments.push((start, &text[start..]));
    Ok(segments)
}

fn top_level_pluses(text: &str, offset: usize) -> Result<Vec<usize>> {
    let mut pluses = Vec::new();
    let mut depth = 0usize;

    for (i, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)
                    .ok_or_else(|| ParserError::UnexpectedParenthesis.at_pos(offset + i))?;
            },
            '+' if depth == 0 => pluses.push(i),
            _ => {}
        }
    }

    if depth > 0 {
        return Err(ParserError::UnclosedParenthesis.at_pos(offset + text.len()));
    }

    Ok(pluses)
}

fn has_dice(fragment: &str) -> bool {
    fragment.chars().any(|ch| ch.eq_ignore_ascii_case(&'d'))
}

// index of the `)` closing a parenthesis already opened before `text`
fn closing_parenthesis(text: &str) -> Option<usize> {
    let mut depth = 0usize;

    for (i, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(i),
            ')' => depth -= 1,
            _ => {}
        }
    }

    None
}

fn parse_segment(segment: &str, offset: usize, depth: usize) -> Result<Rollable> {
    let trimmed = segment.trim_start();
    let offset = offset + segment.len() - trimmed.len();
    let trimmed = trimmed.trim_end();

    tracing::trace!(segment = trimmed, offset, "parsing dice segment");

    if trimmed.is_empty() {
        return Err(ParserError::EmptySegment.at_pos(offset));
    }

    let Some(interior) = trimmed.strip_prefix('(') else {
        let mut parser = SegmentParser::new(trimmed, offset)?;
        return parser.parse(None);
    };

    if depth >= MAX_NESTING {
        return Err(ParserError::OutOfRange(format!("nesting deeper than {MAX_NESTING}")).at_pos(offset));
    }

    let close = closing_parenthesis(interior)
        .ok_or_else(|| ParserError::UnclosedParenthesis.at_pos(offset))?;

    if interior[..close].trim().is_empty() {
        return Err(ParserError::EmptySegment.at_pos(offset + 1));
    }

    let inner = parse_expression(&interior[..close], offset + 1, depth + 1)?;
    let mut parser = SegmentParser::new(&interior[close + 1..], offset + close + 2)?;
    parser.parse(Some(inner))
}


// Token parser for one segment, `inner` is set when the pool was already
// parsed from a parenthesized expression and only modifiers remain.
#[derive(Debug)]
struct SegmentParser {
    lexer: Lexer,
    current: Token,
    peek: Token,
    offset: usize
}

impl SegmentParser {
    fn new(input: &str, offset: usize) -> Result<Self> {
        let mut lexer = Lexer::new(input);

        let tokens = lexer.next_token()
            .and_then(|current| Ok((current, lexer.next_token()?)));

        match tokens {
            Ok((current, peek)) => Ok(Self { lexer, current, peek, offset }),
            Err(err) => Err(err.at_pos(offset + lexer.position))
        }
    }

    fn parse(&mut self, inner: Option<Rollable>) -> Result<Rollable> {
        let result = match inner {
            Some(inner) => self.parse_modifiers(inner),
            None => self.parse_pool().and_then(|pool| self.parse_modifiers(pool))
        };

        result.map_err(|err| err.at_pos(self.offset + self.lexer.position))
    }

    fn next_token(&mut self) -> Result<()> {
        self.current = self.peek;
        self.peek = self.lexer.next_token()?;

        Ok(())
    }

    fn parse_pool(&mut self) -> Result<Rollable> {
        let quantity = match self.current {
            Token::Number(quantity) => {
                self.next_token()?;
                quantity
            },
            _ => 1
        };

        if self.current != Token::Dice {
            return Err(ParserError::MissingDice(format!("{:?}", self.current)));
        }

        self.next_token()?;
        let die = self.parse_size()?;

        let quantity = u16::try_from(quantity.max(1))
            .map_err(|_| ParserError::OutOfRange(format!("quantity {quantity}")))?;

        Ok(Pool::repeat(die, quantity))
    }

    fn parse_size(&mut self) -> Result<Die> {
        let die = match self.current {
            Token::Number(sides) => Die::sided(sides)?,
            Token::Fudge => Die::fudge(),
            Token::Percent => Die::percentile(),
            Token::LeftBracket => return self.parse_custom(),
            _ => return Ok(Die::sided(6)?)
        };

        self.next_token()?;
        Ok(die)
    }

    fn parse_custom(&mut self) -> Result<Die> {
        let mut values = Vec::new();
        self.next_token()?;

        while self.current != Token::RightBracket {
            values.push(self.parse_signed()?);

            match self.current {
                Token::Comma => self.next_token()?,
                Token::RightBracket => {},
                other => return Err(ParserError::UnexpectedToken(format!("{other:?}")))
            }
        }

        self.next_token()?;
        Ok(Die::custom(values)?)
    }

    fn parse_signed(&mut self) -> Result<i64> {
        let negative = self.current == Token::Minus;
        if negative {
            self.next_token()?;
        }

        match self.current {
            Token::Number(n) => {
                self.next_token()?;
                Ok(if negative { -n } else { n })
            },
            other => Err(ParserError::UnexpectedToken(format!("{other:?}")))
        }
    }

    fn parse_modifiers(&mut self, rollable: Rollable) -> Result<Rollable> {
        let mut rollable = if let Some(algorithm) = sort_algorithm(self.current) {
            self.parse_drop_keep(rollable, algorithm)?
        } else if self.current == Token::Explode {
            self.parse_explode(rollable)?
        } else {
            rollable
        };

        for _ in 0..2 {
            let Some(operator) = arithmetic_operator(self.current) else {
                break;
            };

            self.next_token()?;

            let operand = match self.current {
                Token::Number(operand) => operand,
                other => return Err(ParserError::MissingOperand(format!("{other:?}")))
            };

            self.next_token()?;

            let operand = u32::try_from(operand)
                .map_err(|_| ParserError::OutOfRange(format!("operand {operand}")))?;

            rollable = Arithmetic::new(rollable, operator, operand)?.into();
        }

        match self.current {
            Token::Eof => Ok(rollable),
            other => Err(ParserError::UnexpectedToken(format!("{other:?}")))
        }
    }

    fn parse_drop_keep(&mut self, rollable: Rollable, algorithm: Algorithm) -> Result<Rollable> {
        self.next_token()?;

        let threshold = match self.current {
            Token::Number(threshold) => {
                self.next_token()?;
                usize::try_from(threshold)
                    .map_err(|_| ParserError::OutOfRange(format!("threshold {threshold}")))?
            },
            _ => 1
        };

        Ok(DropKeep::new(rollable, algorithm, threshold)?.into())
    }

    fn parse_explode(&mut self, rollable: Rollable) -> Result<Rollable> {
        self.next_token()?;

        let comparator = match self.current {
            Token::Greater => Some(Comparator::GreaterThan),
            Token::Less => Some(Comparator::LessThan),
            Token::Equals => Some(Comparator::Equals),
            _ => None
        };

        if comparator.is_some() {
            self.next_token()?;
        }

        // a `-` without a comparator starts an arithmetic suffix
        let threshold = match (comparator, self.current) {
            (_, Token::Number(_)) | (Some(_), Token::Minus) => Some(self.parse_signed()?),
            _ => None
        };

        let explode = Explode::new(rollable, comparator.unwrap_or(Comparator::Equals), threshold)?;
        Ok(explode.into())
    }
}


fn sort_algorithm(token: Token) -> Option<Algorithm> {
    match token {
        Token::KeepHighest => Some(Algorithm::KeepHighest),
        Token::KeepLowest => Some(Algorithm::KeepLowest),
        Token::DropHighest => Some(Algorithm::DropHighest),
        Token::DropLowest => Some(Algorithm::DropLowest),
        _ => None
    }
}

fn arithmetic_operator(token: Token) -> Option<Operator> {
    match token {
        Token::Plus => Some(Operator::Add),
        Token::Minus => Some(Operator::Subtract),
        Token::Multiply => Some(Operator::Multiply),
        Token::Divide => Some(Operator::Divide),
        Token::Power => Some(Operator::Power),
        _ => None
    }
}


/// Parses dice notation into a [`Rollable`] tree.
///
/// Shorthand for [`Parser::new()`] followed by [`Parser::parse()`].
///
/// # Errors
/// Returns a [`ParserError`] wrapped with the position at which it was found.
/// [`ParserError::kind()`] tells apart malformed notation, unknown modifiers
/// and explosions that would never stop.
///
/// # Examples
/// ```
/// use dice_cup::{parse, ErrorKind};
///
/// let rollable = parse("2d3+1d4").unwrap();
/// assert_eq!(rollable.notation(), "2D3+D4");
/// assert_eq!((rollable.minimum(), rollable.maximum()), (3, 10));
///
/// assert_eq!(parse("4d6kx1").unwrap_err().kind(), ErrorKind::UnknownAlgorithm);
/// assert_eq!(parse("d6!>0").unwrap_err().kind(), ErrorKind::IllegalValue);
/// ```
pub fn parse(notation: &str) -> Result<Rollable> {
    Parser::new(notation).parse()
}


/// Parses dice notation and rolls it once with the thread generator.
///
/// # Errors
/// Same as [`parse()`], rolling itself never fails.
///
/// # Examples
/// ```
/// let toss = dice_cup::roll("2d6+3").unwrap();
/// assert!((5..=15).contains(&toss.value()));
/// ```
pub fn roll(notation: &str) -> Result<Toss> {
    Ok(parse(notation)?.roll())
}
