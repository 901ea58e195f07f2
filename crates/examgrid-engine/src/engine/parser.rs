//! Formula tokenizer and recursive-descent parser.
//!
//! A formula body (text after the leading '=') is tokenized once and parsed
//! into an [`Expr`] tree with typed number, cell reference and aggregate
//! nodes. Evaluation walks the tree directly; nothing is ever re-stringified.
//!
//! Grammar:
//!
//! ```text
//! expr      := term (('+' | '-') term)*
//! term      := factor (('*' | '/') factor)*
//! factor    := number | cell | aggregate | '(' expr ')' | '-' factor
//! aggregate := FUNC '(' cell ':' cell ')'     (no whitespace inside)
//! number    := digits ('.' digits)?
//! ```
//!
//! An aggregate call is recognized whole by the tokenizer. Anything that is
//! not arithmetic once calls and references are taken out (a stray ':', a
//! function name without a well-formed range, an unknown word or character)
//! is [`EvalError::Syntax`]. A malformed arithmetic shape such as `2+` or `(2`
//! is [`EvalError::Evaluation`].

use regex::Regex;
use std::sync::OnceLock;

use super::cell_ref::{CellRef, RangeRef};
use super::error::EvalError;
use crate::builtins::Aggregate;

/// Parenthesis / unary minus nesting limit, keeps the parser off the end of the stack.
const MAX_NESTING: usize = 256;

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

/// Parsed formula tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Cell(CellRef),
    Aggregate { func: Aggregate, range: RangeRef },
    Neg(Box<Expr>),
    Binary {
        op: Op,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Visit every cell reference and aggregate range in the tree.
    pub fn walk_refs(&self, visit: &mut dyn FnMut(RefNode<'_>)) {
        match self {
            Expr::Number(_) => {}
            Expr::Cell(cell) => visit(RefNode::Cell(cell)),
            Expr::Aggregate { range, .. } => visit(RefNode::Range(range)),
            Expr::Neg(inner) => inner.walk_refs(visit),
            Expr::Binary { left, right, .. } => {
                left.walk_refs(visit);
                right.walk_refs(visit);
            }
        }
    }
}

/// A reference encountered while walking an [`Expr`].
#[derive(Debug, Clone, Copy)]
pub enum RefNode<'a> {
    Cell(&'a CellRef),
    Range(&'a RangeRef),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Cell(CellRef),
    Aggregate { func: Aggregate, range: RangeRef },
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Colon,
    Dot,
}

/// The `(ref:ref)` argument that must follow an aggregate name directly.
fn range_arg_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\((?<start>[A-Za-z]+[0-9]+):(?<end>[A-Za-z]+[0-9]+)\)")
            .expect("range argument regex must compile")
    })
}

/// Parse a formula body (without the leading '=').
pub fn parse(input: &str) -> Result<Expr, EvalError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvalError::evaluation("empty formula"));
    }
    let (expr, pos) = parse_expr(&tokens, 0, 0)?;
    if let Some(token) = tokens.get(pos) {
        return Err(unexpected(token, format!("unexpected {} after expression", describe(token))));
    }
    Ok(expr)
}

fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        let (token, len) = match c {
            c if c.is_whitespace() => {
                rest = &rest[c.len_utf8()..];
                continue;
            }
            '+' => (Token::Plus, 1),
            '-' => (Token::Minus, 1),
            '*' => (Token::Star, 1),
            '/' => (Token::Slash, 1),
            '(' => (Token::LParen, 1),
            ')' => (Token::RParen, 1),
            ':' => (Token::Colon, 1),
            '.' => (Token::Dot, 1),
            '0'..='9' => lex_number(rest)?,
            c if c.is_ascii_alphabetic() => lex_word(rest)?,
            other => {
                return Err(EvalError::syntax(format!("unexpected character '{}'", other)));
            }
        };
        tokens.push(token);
        rest = &rest[len..];
    }

    Ok(tokens)
}

fn digits_len(text: &str) -> usize {
    text.bytes().take_while(u8::is_ascii_digit).count()
}

fn lex_number(rest: &str) -> Result<(Token, usize), EvalError> {
    let mut len = digits_len(rest);
    // Fraction only when a digit follows the dot; a stray '.' is its own token.
    if rest[len..].starts_with('.') {
        let fraction = digits_len(&rest[len + 1..]);
        if fraction > 0 {
            len += 1 + fraction;
        }
    }
    let text = &rest[..len];
    let n = text
        .parse::<f64>()
        .map_err(|_| EvalError::evaluation(format!("invalid number '{}'", text)))?;
    Ok((Token::Number(n), len))
}

fn lex_word(rest: &str) -> Result<(Token, usize), EvalError> {
    let len = rest.bytes().take_while(u8::is_ascii_alphanumeric).count();
    let word = rest[..len].to_ascii_uppercase();

    if let Some(cell) = CellRef::parse(&word) {
        return Ok((Token::Cell(cell), len));
    }
    let Some(func) = Aggregate::from_name(&word) else {
        return Err(EvalError::syntax(format!("unknown name '{}'", word)));
    };

    let bad_call = || EvalError::syntax(format!("{} expects a range like {}(A1:A5)", word, word));
    let caps = range_arg_re().captures(&rest[len..]).ok_or_else(bad_call)?;
    let start = CellRef::parse(&caps["start"]).ok_or_else(bad_call)?;
    let end = CellRef::parse(&caps["end"]).ok_or_else(bad_call)?;
    let call_len = len + caps[0].len();
    Ok((
        Token::Aggregate {
            func,
            range: RangeRef::new(start, end),
        },
        call_len,
    ))
}

fn describe(token: &Token) -> String {
    match token {
        Token::Number(n) => format!("number {}", n),
        Token::Cell(cell) => format!("reference {}", cell),
        Token::Aggregate { func, range } => format!("{}({})", func.name(), range),
        Token::Plus => "'+'".to_string(),
        Token::Minus => "'-'".to_string(),
        Token::Star => "'*'".to_string(),
        Token::Slash => "'/'".to_string(),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::Colon => "':'".to_string(),
        Token::Dot => "'.'".to_string(),
    }
}

/// A ':' can only appear inside an aggregate call, so one left over is a syntax fault.
fn unexpected(token: &Token, message: String) -> EvalError {
    match token {
        Token::Colon => EvalError::syntax(message),
        _ => EvalError::evaluation(message),
    }
}

fn parse_expr(tokens: &[Token], pos: usize, nesting: usize) -> Result<(Expr, usize), EvalError> {
    let (mut left, mut pos) = parse_term(tokens, pos, nesting)?;

    while pos < tokens.len() {
        let op = match &tokens[pos] {
            Token::Plus => Op::Add,
            Token::Minus => Op::Sub,
            _ => break,
        };
        let (right, new_pos) = parse_term(tokens, pos + 1, nesting)?;
        left = Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
        pos = new_pos;
    }

    Ok((left, pos))
}

fn parse_term(tokens: &[Token], pos: usize, nesting: usize) -> Result<(Expr, usize), EvalError> {
    let (mut left, mut pos) = parse_factor(tokens, pos, nesting)?;

    while pos < tokens.len() {
        let op = match &tokens[pos] {
            Token::Star => Op::Mul,
            Token::Slash => Op::Div,
            _ => break,
        };
        let (right, new_pos) = parse_factor(tokens, pos + 1, nesting)?;
        left = Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
        pos = new_pos;
    }

    Ok((left, pos))
}

fn parse_factor(tokens: &[Token], pos: usize, nesting: usize) -> Result<(Expr, usize), EvalError> {
    if nesting > MAX_NESTING {
        return Err(EvalError::evaluation("expression nested too deeply"));
    }
    let Some(token) = tokens.get(pos) else {
        return Err(EvalError::evaluation("unexpected end of expression"));
    };

    match token {
        Token::Number(n) => Ok((Expr::Number(*n), pos + 1)),
        Token::Cell(cell) => Ok((Expr::Cell(*cell), pos + 1)),
        Token::Aggregate { func, range } => Ok((
            Expr::Aggregate {
                func: *func,
                range: *range,
            },
            pos + 1,
        )),
        Token::Minus => {
            let (inner, pos) = parse_factor(tokens, pos + 1, nesting + 1)?;
            Ok((Expr::Neg(Box::new(inner)), pos))
        }
        Token::LParen => {
            let (inner, pos) = parse_expr(tokens, pos + 1, nesting + 1)?;
            expect(tokens, pos, &Token::RParen)?;
            Ok((inner, pos + 1))
        }
        other => Err(unexpected(other, format!("unexpected {}", describe(other)))),
    }
}

fn expect(tokens: &[Token], pos: usize, want: &Token) -> Result<(), EvalError> {
    match tokens.get(pos) {
        Some(token) if token == want => Ok(()),
        Some(token) => Err(unexpected(
            token,
            format!("expected {}, found {}", describe(want), describe(token)),
        )),
        None => Err(EvalError::evaluation(format!(
            "expected {}, found end of expression",
            describe(want)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Box<Expr> {
        Box::new(Expr::Number(n))
    }

    #[test]
    fn test_precedence_builds_mul_under_add() {
        let expr = parse("2+3*4").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: Op::Add,
                left: num(2.0),
                right: Box::new(Expr::Binary {
                    op: Op::Mul,
                    left: num(3.0),
                    right: num(4.0),
                }),
            }
        );
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let expr = parse("8-4-2").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: Op::Sub,
                left: Box::new(Expr::Binary {
                    op: Op::Sub,
                    left: num(8.0),
                    right: num(4.0),
                }),
                right: num(2.0),
            }
        );
    }

    #[test]
    fn test_aggregate_and_refs_are_case_insensitive() {
        let expr = parse("sum(c1:c3) + b2").unwrap();
        let Expr::Binary { left, right, .. } = expr else {
            panic!("expected binary expression");
        };
        assert_eq!(
            *left,
            Expr::Aggregate {
                func: Aggregate::Sum,
                range: RangeRef::parse("C1:C3").unwrap(),
            }
        );
        assert_eq!(*right, Expr::Cell(CellRef::new(1, 1)));
    }

    #[test]
    fn test_decimal_numbers() {
        assert_eq!(parse("1.25").unwrap(), Expr::Number(1.25));
        assert!(matches!(parse("1."), Err(EvalError::Evaluation(_))));
        assert!(matches!(parse(".5"), Err(EvalError::Evaluation(_))));
        assert!(matches!(parse("1.2.3"), Err(EvalError::Evaluation(_))));
    }

    #[test]
    fn test_disallowed_characters_are_syntax_errors() {
        assert!(matches!(parse("A1+B1; DROP TABLE"), Err(EvalError::Syntax(_))));
        assert!(matches!(parse("2^3"), Err(EvalError::Syntax(_))));
        assert!(matches!(parse("\"text\""), Err(EvalError::Syntax(_))));
    }

    #[test]
    fn test_unknown_words_are_syntax_errors() {
        assert!(matches!(parse("F1+1"), Err(EvalError::Syntax(_))));
        assert!(matches!(parse("MEDIAN(A1:A3)"), Err(EvalError::Syntax(_))));
        assert!(matches!(parse("A1B2"), Err(EvalError::Syntax(_))));
    }

    #[test]
    fn test_arithmetic_shape_errors_are_evaluation_errors() {
        for input in ["", "2+", "(2", "2)", "+2", "2 3", "A1 B1"] {
            assert!(
                matches!(parse(input), Err(EvalError::Evaluation(_))),
                "input {:?} should fail as malformed arithmetic",
                input
            );
        }
    }

    #[test]
    fn test_stray_ranges_and_bad_calls_are_syntax_errors() {
        let inputs = [
            "A1:B2",
            "1:2",
            "(2:3)",
            "2+A1:",
            "SUM(A1)",
            "SUM A1:A2",
            "SUM(A1:B1",
            "SUM(A1:F2)",
            "SUM(1:2)",
            "SUM(A1:A2):A3",
        ];
        for input in inputs {
            assert!(
                matches!(parse(input), Err(EvalError::Syntax(_))),
                "input {:?} should be a syntax error",
                input
            );
        }
    }

    #[test]
    fn test_aggregate_call_must_be_contiguous() {
        assert!(parse("SUM(A1:A3)").is_ok());
        assert!(matches!(parse("SUM (A1:A3)"), Err(EvalError::Syntax(_))));
        assert!(matches!(parse("SUM( A1 : A3 )"), Err(EvalError::Syntax(_))));
        assert!(matches!(parse("sum(a1 :a3)"), Err(EvalError::Syntax(_))));
        // Whitespace around the call is fine.
        assert!(parse(" 1 + sum(a1:a3) ").is_ok());
    }

    #[test]
    fn test_deep_nesting_is_rejected_without_overflow() {
        let input = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(matches!(parse(&input), Err(EvalError::Evaluation(_))));
        let negations = format!("{}1", "-".repeat(10_000));
        assert!(matches!(parse(&negations), Err(EvalError::Evaluation(_))));
    }

    #[test]
    fn test_walk_refs_visits_cells_and_ranges() {
        let expr = parse("A1 + MAX(B1:B4) * -C2").unwrap();
        let mut seen = Vec::new();
        expr.walk_refs(&mut |node| match node {
            RefNode::Cell(c) => seen.push(c.to_string()),
            RefNode::Range(r) => seen.push(r.to_string()),
        });
        assert_eq!(seen, vec!["A1", "B1:B4", "C2"]);
    }
}
