use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map, map_res, opt},
    multi::many0,
    sequence::{delimited, pair, preceded},
    IResult,
};

use super::{QueryItem, QueryOperand, QueryOperator, TsQuery};
use crate::error::{RankError, RankResult, SyntaxKind};
use crate::tsvector::parse::quoted_lexeme;
use crate::tsvector::WeightClass;

// Infix grammar, loosest to tightest: `|`, `&`, `<->`/`<N>`, `!`. Each rule
// emits postfix items directly, so the parse result is the storage order.

fn or_expr(input: &str) -> IResult<&str, Vec<QueryItem>> {
    let (input, mut acc) = and_expr(input)?;
    let (input, rest) = many0(preceded(ws(char('|')), and_expr))(input)?;
    for rhs in rest {
        acc.extend(rhs);
        acc.push(QueryItem::Operator(QueryOperator::Or));
    }
    Ok((input, acc))
}

fn and_expr(input: &str) -> IResult<&str, Vec<QueryItem>> {
    let (input, mut acc) = phrase_expr(input)?;
    let (input, rest) = many0(preceded(ws(char('&')), phrase_expr))(input)?;
    for rhs in rest {
        acc.extend(rhs);
        acc.push(QueryItem::Operator(QueryOperator::And));
    }
    Ok((input, acc))
}

fn phrase_expr(input: &str) -> IResult<&str, Vec<QueryItem>> {
    let (input, mut acc) = unary(input)?;
    let (input, rest) = many0(pair(ws(phrase_operator), unary))(input)?;
    for (distance, rhs) in rest {
        acc.extend(rhs);
        acc.push(QueryItem::Operator(QueryOperator::Phrase(distance)));
    }
    Ok((input, acc))
}

fn phrase_operator(input: &str) -> IResult<&str, u16> {
    alt((
        map(tag("<->"), |_| 1),
        delimited(char('<'), map_res(digit1, str::parse::<u16>), char('>')),
    ))(input)
}

fn unary(input: &str) -> IResult<&str, Vec<QueryItem>> {
    preceded(
        multispace0,
        alt((
            map(preceded(char('!'), unary), |mut items| {
                items.push(QueryItem::Operator(QueryOperator::Not));
                items
            }),
            delimited(char('('), or_expr, ws(char(')'))),
            operand,
        )),
    )(input)
}

fn operand(input: &str) -> IResult<&str, Vec<QueryItem>> {
    let (input, lexeme) = alt((quoted_lexeme, bare_word))(input)?;
    let (input, flags) = opt(preceded(
        char(':'),
        take_while1(|c: char| c == '*' || WeightClass::from_char(c).is_some()),
    ))(input)?;

    let mut op = QueryOperand::new(lexeme);
    for c in flags.unwrap_or_default().chars() {
        if c == '*' {
            op.prefix = true;
        } else if let Some(w) = WeightClass::from_char(c) {
            op.weights |= 1 << (w as u8);
        }
    }
    Ok((input, vec![QueryItem::Operand(op)]))
}

fn bare_word(input: &str) -> IResult<&str, String> {
    map(
        take_while1(|c: char| !c.is_whitespace() && !"!&|()<>':".contains(c)),
        |s: &str| s.to_string(),
    )(input)
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    preceded(multispace0, inner)
}

pub(crate) fn tsquery(input: &str) -> RankResult<TsQuery> {
    if input.trim().is_empty() {
        return TsQuery::new(vec![]);
    }
    match all_consuming(delimited(multispace0, or_expr, multispace0))(input) {
        Ok((_, items)) => {
            if items.iter().any(|item| match item {
                QueryItem::Operand(op) => op.lexeme.is_empty(),
                QueryItem::Operator(_) => false,
            }) {
                return Err(syntax_error(input, input, "empty lexeme"));
            }
            TsQuery::new(items)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(syntax_error(input, e.input, "unexpected input"))
        }
        Err(nom::Err::Incomplete(_)) => Err(syntax_error(input, "", "truncated input")),
    }
}

fn syntax_error(full: &str, remaining: &str, message: &str) -> RankError {
    RankError::SyntaxError {
        kind: SyntaxKind::TsQuery,
        position: full.len() - remaining.len(),
        message: message.to_string(),
    }
}

const PREC_OR: u8 = 1;
const PREC_AND: u8 = 2;
const PREC_PHRASE: u8 = 3;
const PREC_NOT: u8 = 4;
const PREC_LEAF: u8 = 5;

impl std::fmt::Display for TsQuery {
    /// Renders the postfix sequence back to infix, parenthesizing where the
    /// stored tree shape would otherwise be lost to precedence.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut stack: Vec<(String, u8)> = Vec::new();
        for item in self.items() {
            match item {
                QueryItem::Operand(op) => {
                    let mut s = format!("'{}'", op.lexeme.replace('\'', "''"));
                    if op.weights != 0 || op.prefix {
                        s.push(':');
                        for w in [
                            WeightClass::A,
                            WeightClass::B,
                            WeightClass::C,
                            WeightClass::D,
                        ] {
                            if op.weights & (1 << (w as u8)) != 0 {
                                s.push(w.as_char());
                            }
                        }
                        if op.prefix {
                            s.push('*');
                        }
                    }
                    stack.push((s, PREC_LEAF));
                }
                QueryItem::Operator(QueryOperator::Not) => {
                    let Some((a, prec)) = stack.pop() else {
                        return Err(std::fmt::Error);
                    };
                    let rendered = if prec < PREC_NOT {
                        format!("!( {a} )")
                    } else {
                        format!("!{a}")
                    };
                    stack.push((rendered, PREC_NOT));
                }
                QueryItem::Operator(op) => {
                    let (Some((b, bp)), Some((a, ap))) = (stack.pop(), stack.pop()) else {
                        return Err(std::fmt::Error);
                    };
                    let (sym, prec) = match op {
                        QueryOperator::Or => ("|".to_string(), PREC_OR),
                        QueryOperator::And => ("&".to_string(), PREC_AND),
                        QueryOperator::Phrase(1) => ("<->".to_string(), PREC_PHRASE),
                        QueryOperator::Phrase(d) => (format!("<{d}>"), PREC_PHRASE),
                        QueryOperator::Not => return Err(std::fmt::Error),
                    };
                    let left = if ap < prec { format!("( {a} )") } else { a };
                    let right = if bp <= prec { format!("( {b} )") } else { b };
                    stack.push((format!("{left} {sym} {right}"), prec));
                }
            }
        }
        match stack.pop() {
            Some((s, _)) => write!(f, "{s}"),
            None => Ok(()),
        }
    }
}
