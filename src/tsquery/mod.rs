pub mod evaluator;
pub mod parse;

use serde::{Deserialize, Serialize};

use crate::error::{RankError, RankResult, SyntaxKind};

/// A query leaf: the lexeme to look up, whether it matches by prefix, and a
/// weight-class restriction mask (bit `1 << class`). The mask is parsed and
/// carried but not consulted by the ranking kernels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOperand {
    pub lexeme: String,
    pub prefix: bool,
    pub weights: u8,
}

impl QueryOperand {
    pub fn new(lexeme: impl Into<String>) -> Self {
        QueryOperand {
            lexeme: lexeme.into(),
            prefix: false,
            weights: 0,
        }
    }

    pub fn prefix(lexeme: impl Into<String>) -> Self {
        QueryOperand {
            lexeme: lexeme.into(),
            prefix: true,
            weights: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryOperator {
    Not,
    And,
    Or,
    /// Ordered conjunction with a lexeme distance; `<->` is `Phrase(1)`.
    Phrase(u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryItem {
    Operand(QueryOperand),
    Operator(QueryOperator),
}

/// A parsed boolean query in postfix order: operands precede the operators
/// that combine them, and the last item is the root of the expression tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TsQuery {
    items: Vec<QueryItem>,
}

impl TsQuery {
    /// Accepts a postfix item sequence after checking stack discipline, so
    /// downstream evaluation never has to re-validate. The empty query is
    /// legal and matches nothing.
    pub fn new(items: Vec<QueryItem>) -> RankResult<Self> {
        let mut depth = 0usize;
        for (i, item) in items.iter().enumerate() {
            let needed = match item {
                QueryItem::Operand(_) => 0,
                QueryItem::Operator(QueryOperator::Not) => 1,
                QueryItem::Operator(_) => 2,
            };
            if depth < needed {
                return Err(RankError::SyntaxError {
                    kind: SyntaxKind::TsQuery,
                    position: i,
                    message: "operator lacks operands in postfix sequence".to_string(),
                });
            }
            depth = depth - needed + 1;
        }
        if !items.is_empty() && depth != 1 {
            return Err(RankError::SyntaxError {
                kind: SyntaxKind::TsQuery,
                position: items.len(),
                message: "postfix sequence does not reduce to a single root".to_string(),
            });
        }
        Ok(TsQuery { items })
    }

    pub fn parse(input: &str) -> RankResult<Self> {
        parse::tsquery(input)
    }

    pub fn items(&self) -> &[QueryItem] {
        &self.items
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The root of the expression tree, if any.
    pub fn root(&self) -> Option<&QueryItem> {
        self.items.last()
    }

    /// The unique leaf operands, sorted byte-wise by lexeme. Operands whose
    /// lexeme bytes coincide collapse to the first occurrence; prefix flags
    /// and weight masks do not participate in equality.
    pub fn operands(&self) -> Vec<&QueryOperand> {
        let mut ops: Vec<&QueryOperand> = self
            .items
            .iter()
            .filter_map(|item| match item {
                QueryItem::Operand(op) => Some(op),
                QueryItem::Operator(_) => None,
            })
            .collect();
        ops.sort_by(|a, b| a.lexeme.as_bytes().cmp(b.lexeme.as_bytes()));
        ops.dedup_by(|a, b| a.lexeme == b.lexeme);
        ops
    }
}

impl std::str::FromStr for TsQuery {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TsQuery::parse(s)
    }
}
