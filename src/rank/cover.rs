use tracing::trace;

use super::normalize::{self, ExtentStats};
use super::positions_or_sentinel;
use super::weights::Weights;
use crate::tsquery::evaluator::evaluate;
use crate::tsquery::{QueryItem, TsQuery};
use crate::tsvector::{TsVector, WeightClass};

/// One document occurrence relevant to the query: its position, weight
/// class, and the group of query operands it satisfies.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DocToken {
    pub pos: u16,
    pub weight: WeightClass,
    pub group: usize,
}

/// The document flattened to the tokens the query can see, sorted by
/// position. Operand groups are stored once and shared by every token the
/// same lookup emitted.
#[derive(Debug)]
pub(crate) struct DocRepresentation {
    pub tokens: Vec<DocToken>,
    groups: Vec<Vec<usize>>,
}

impl DocRepresentation {
    /// Walks the unique query operands, looks each up in the vector and
    /// emits one token per matched position (or the sentinel for
    /// position-less entries). Byte-identical operands elsewhere in the
    /// query are folded into the same group up front, so their tokens are
    /// emitted exactly once. Returns `None` when nothing matched.
    pub(crate) fn build(vector: &TsVector, query: &TsQuery) -> Option<Self> {
        let items = query.items();
        let mut processed = vec![false; items.len()];
        let mut tokens: Vec<DocToken> = Vec::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();

        for i in 0..items.len() {
            let QueryItem::Operand(operand) = &items[i] else {
                continue;
            };
            if processed[i] {
                continue;
            }
            let Some(run) = vector.find(&operand.lexeme, operand.prefix) else {
                continue;
            };

            let members: Vec<usize> = items
                .iter()
                .enumerate()
                .filter(|(k, item)| {
                    *k == i
                        || matches!(item, QueryItem::Operand(other) if other.lexeme == operand.lexeme)
                })
                .map(|(k, _)| k)
                .collect();
            for &k in &members {
                processed[k] = true;
            }
            groups.push(members);
            let group = groups.len() - 1;

            for entry in &vector.entries()[run] {
                let (positions, _) = positions_or_sentinel(entry);
                for p in positions {
                    tokens.push(DocToken {
                        pos: p.pos,
                        weight: p.weight,
                        group,
                    });
                }
            }
        }

        if tokens.is_empty() {
            return None;
        }
        tokens.sort_by_key(|t| t.pos);
        trace!(tokens = tokens.len(), "built document representation");
        Some(DocRepresentation { tokens, groups })
    }

    /// The query-item indices a token satisfies.
    pub(crate) fn operand_indices(&self, token: &DocToken) -> &[usize] {
        &self.groups[token.group]
    }
}

/// A minimal span of document tokens satisfying the query. `begin`/`end`
/// index the token list; `p`/`q` are the corresponding positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cover {
    pub begin: usize,
    pub end: usize,
    pub p: u16,
    pub q: u16,
}

/// Enumerates successive minimal covers. Each scan extends right under the
/// monotone (NOT-blind) evaluation until the query first holds, then walks
/// back with NOT honoured to find the latest satisfying start.
pub(crate) struct CoverScanner<'a> {
    doc: &'a DocRepresentation,
    query: &'a TsQuery,
    cursor: usize,
    exists: Vec<bool>,
}

impl<'a> CoverScanner<'a> {
    pub(crate) fn new(doc: &'a DocRepresentation, query: &'a TsQuery) -> Self {
        CoverScanner {
            doc,
            query,
            cursor: 0,
            exists: vec![false; query.size()],
        }
    }

    fn reset(&mut self) {
        self.exists.iter_mut().for_each(|e| *e = false);
    }

    fn admit(&mut self, token: &DocToken) {
        let doc = self.doc;
        for &k in doc.operand_indices(token) {
            self.exists[k] = true;
        }
    }

    fn satisfied(&self, calc_not: bool) -> bool {
        evaluate(self.query, calc_not, |idx, _| self.exists[idx])
    }

    pub(crate) fn next_cover(&mut self) -> Option<Cover> {
        let doc = self.doc;
        loop {
            if self.cursor >= doc.tokens.len() {
                return None;
            }

            // upper bound: first token whose inclusion satisfies the query
            self.reset();
            let mut last = None;
            for idx in self.cursor..doc.tokens.len() {
                self.admit(&doc.tokens[idx]);
                if self.satisfied(false) {
                    last = Some(idx);
                    break;
                }
            }
            let last = last?;
            let q = doc.tokens[last].pos;

            // lower bound: scan back toward the cursor with NOT honoured
            self.reset();
            let mut begin = None;
            for idx in (self.cursor..=last).rev() {
                self.admit(&doc.tokens[idx]);
                if self.satisfied(true) {
                    begin = Some(idx);
                    break;
                }
            }

            if let Some(begin) = begin {
                let p = doc.tokens[begin].pos;
                if p <= q {
                    self.cursor = begin + 1;
                    trace!(begin, end = last, p, q, "cover found");
                    return Some(Cover {
                        begin,
                        end: last,
                        p,
                        q,
                    });
                }
            }
            // the backward pass could not close a cover here (a NOT clause
            // vetoed every start); try again one token further right
            self.cursor += 1;
        }
    }
}

impl Iterator for CoverScanner<'_> {
    type Item = Cover;

    fn next(&mut self) -> Option<Cover> {
        self.next_cover()
    }
}

/// Cover-density scoring: each cover contributes its weight-harmonic density
/// damped by the noise between its endpoints, with extent statistics kept
/// for the distance normalization.
pub(crate) fn rank_cd(weights: &Weights, vector: &TsVector, query: &TsQuery, method: u32) -> f32 {
    let Some(doc) = DocRepresentation::build(vector, query) else {
        return 0.0;
    };

    let mut wdoc = 0.0f64;
    let mut sum_dist = 0.0f64;
    let mut prev_ext_pos = 0.0f64;
    let mut n_extent = 0usize;

    let mut scanner = CoverScanner::new(&doc, query);
    while let Some(cover) = scanner.next_cover() {
        let ntokens = cover.end - cover.begin + 1;
        let inv_sum: f64 = doc.tokens[cover.begin..=cover.end]
            .iter()
            .map(|t| 1.0 / weights.get(t.weight) as f64)
            .sum();
        let cpos = ntokens as f64 / inv_sum;

        // lexemes sharing a position can make the positional spread smaller
        // than the token count; approximate the noise as half the cover then
        let spread = (cover.q - cover.p) as usize;
        let n_noise = if spread < ntokens - 1 {
            (ntokens - 1) / 2
        } else {
            spread - (ntokens - 1)
        };
        wdoc += cpos / (1 + n_noise) as f64;

        let cur_ext_pos = (cover.p as f64 + cover.q as f64) / 2.0;
        if n_extent > 0 && cur_ext_pos > prev_ext_pos {
            sum_dist += 1.0 / (cur_ext_pos - prev_ext_pos);
        }
        prev_ext_pos = cur_ext_pos;
        n_extent += 1;
    }

    let extents = ExtentStats { n_extent, sum_dist };
    trace!(covers = n_extent, raw = wdoc, "cover-density accumulation done");
    normalize::apply(method, wdoc, vector, Some(&extents)) as f32
}
