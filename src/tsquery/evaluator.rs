use super::{QueryItem, QueryOperand, QueryOperator, TsQuery};
use crate::tsvector::TsVector;

/// Evaluates the postfix query bottom-up, asking `present` whether each leaf
/// holds. `present` receives the item index alongside the operand so callers
/// can key existence off the query position.
///
/// With `calc_not` false every NOT sub-expression counts as true, which makes
/// the result monotone in the set of present operands; the cover scanner
/// relies on this for its forward pass. Phrase operators degrade to AND here:
/// existence evaluation has no position data to check distances against.
pub fn evaluate<F>(query: &TsQuery, calc_not: bool, mut present: F) -> bool
where
    F: FnMut(usize, &QueryOperand) -> bool,
{
    let mut stack: Vec<bool> = Vec::with_capacity(query.size());
    for (i, item) in query.items().iter().enumerate() {
        match item {
            QueryItem::Operand(op) => stack.push(present(i, op)),
            QueryItem::Operator(QueryOperator::Not) => {
                let Some(a) = stack.pop() else { return false };
                stack.push(if calc_not { !a } else { true });
            }
            QueryItem::Operator(op) => {
                let (Some(b), Some(a)) = (stack.pop(), stack.pop()) else {
                    return false;
                };
                stack.push(match op {
                    QueryOperator::Or => a || b,
                    _ => a && b,
                });
            }
        }
    }
    stack.pop().unwrap_or(false)
}

/// Existence-level match of a document against a query, the `@@` operator:
/// a leaf holds when the vector has at least one entry for its lexeme.
pub fn ts_match(vector: &TsVector, query: &TsQuery) -> bool {
    evaluate(query, true, |_, op| {
        vector.find(&op.lexeme, op.prefix).is_some()
    })
}
