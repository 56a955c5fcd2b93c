use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while1},
    character::complete::{char, digit1, multispace0, multispace1, one_of},
    combinator::{all_consuming, map, map_res, opt},
    multi::{fold_many0, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded},
    IResult,
};

use super::{Position, TsVector, WeightClass, WordEntry};
use crate::error::{RankError, RankResult, SyntaxKind};

pub(crate) fn quoted_lexeme(input: &str) -> IResult<&str, String> {
    delimited(
        char('\''),
        fold_many0(
            alt((
                map(is_not("'"), |s: &str| s.to_string()),
                map(tag("''"), |_| "'".to_string()),
            )),
            String::new,
            |mut acc, piece| {
                acc.push_str(&piece);
                acc
            },
        ),
        char('\''),
    )(input)
}

fn bare_lexeme(input: &str) -> IResult<&str, String> {
    map(
        take_while1(|c: char| !c.is_whitespace() && c != '\'' && c != ':'),
        |s: &str| s.to_string(),
    )(input)
}

fn position(input: &str) -> IResult<&str, Position> {
    let (input, pos) = map_res(digit1, str::parse::<u16>)(input)?;
    let (input, weight) = opt(one_of("ABCDabcd"))(input)?;
    let weight = weight
        .and_then(WeightClass::from_char)
        .unwrap_or(WeightClass::D);
    Ok((input, Position::new(pos, weight)))
}

fn word_entry(input: &str) -> IResult<&str, WordEntry> {
    map(
        pair(
            alt((quoted_lexeme, bare_lexeme)),
            opt(preceded(char(':'), separated_list1(char(','), position))),
        ),
        |(lexeme, positions)| WordEntry::new(lexeme, positions.unwrap_or_default()),
    )(input)
}

fn entry_list(input: &str) -> IResult<&str, Vec<WordEntry>> {
    delimited(
        multispace0,
        separated_list0(multispace1, word_entry),
        multispace0,
    )(input)
}

pub(crate) fn tsvector(input: &str) -> RankResult<TsVector> {
    match all_consuming(entry_list)(input) {
        Ok((_, entries)) => {
            if entries.iter().any(|e| e.lexeme.is_empty()) {
                return Err(syntax_error(input, input, "empty lexeme"));
            }
            Ok(TsVector::new(entries))
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(syntax_error(input, e.input, "unexpected input"))
        }
        Err(nom::Err::Incomplete(_)) => Err(syntax_error(input, "", "truncated input")),
    }
}

fn syntax_error(full: &str, remaining: &str, message: &str) -> RankError {
    RankError::SyntaxError {
        kind: SyntaxKind::TsVector,
        position: full.len() - remaining.len(),
        message: message.to_string(),
    }
}

impl std::fmt::Display for TsVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, entry) in self.entries().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "'{}'", entry.lexeme.replace('\'', "''"))?;
            for (j, p) in entry.positions.iter().enumerate() {
                write!(f, "{}{}", if j == 0 { ':' } else { ',' }, p.pos)?;
                if p.weight != WeightClass::D {
                    write!(f, "{}", p.weight.as_char())?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let v = TsVector::parse("'cat':3 'dog':5").unwrap();
        assert_eq!(v.size(), 2);
        assert_eq!(v.entries()[0].lexeme, "cat");
        assert_eq!(v.entries()[0].positions[0].pos, 3);
        assert_eq!(v.entries()[0].positions[0].weight, WeightClass::D);
    }

    #[test]
    fn test_parse_bare_and_weights() {
        let v = TsVector::parse("cat:1A,3b dog").unwrap();
        let cat = &v.entries()[0];
        assert_eq!(cat.positions.len(), 2);
        assert_eq!(cat.positions[0].weight, WeightClass::A);
        assert_eq!(cat.positions[1].weight, WeightClass::B);
        assert!(v.entries()[1].positions.is_empty());
    }

    #[test]
    fn test_parse_quoted_escape() {
        let v = TsVector::parse("'o''clock':7").unwrap();
        assert_eq!(v.entries()[0].lexeme, "o'clock");
    }

    #[test]
    fn test_parse_sorts_and_merges() {
        let v = TsVector::parse("'dog':5 'cat':3 'cat':1").unwrap();
        assert_eq!(v.size(), 2);
        assert_eq!(v.entries()[0].lexeme, "cat");
        let positions: Vec<u16> = v.entries()[0].positions.iter().map(|p| p.pos).collect();
        assert_eq!(positions, vec![1, 3]);
    }

    #[test]
    fn test_parse_empty_input() {
        let v = TsVector::parse("   ").unwrap();
        assert!(v.is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TsVector::parse("'cat':x").is_err());
        assert!(TsVector::parse("'unterminated").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for input in ["'cat':3 'dog':5B", "'a' 'b':1,2A", "'o''clock':7"] {
            let v = TsVector::parse(input).unwrap();
            let shown = v.to_string();
            assert_eq!(TsVector::parse(&shown).unwrap(), v, "round-trip of {input}");
        }
    }
}
