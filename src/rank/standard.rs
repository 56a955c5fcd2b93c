use super::weights::Weights;
use super::positions_or_sentinel;
use crate::tsquery::TsQuery;
use crate::tsvector::{TsVector, MAX_POS};

// limit of sum(1/i^2), i = 1..inf (pi^2/6)
const INV_SQUARE_SUM_LIMIT: f64 = 1.64493406685;

/// Attenuation of a lexeme-pair contribution by position distance: near 1.0
/// for adjacent hits, vanishing past 100 positions.
fn word_distance(dist: i32) -> f64 {
    if dist > 100 {
        return 1e-30;
    }
    1.0 / (1.005 + 0.05 * (dist as f64 / 1.5 - 2.0).exp())
}

/// OR kernel: every matched entry contributes a decayed sum over its
/// occurrences, the result averaged over the unique operands.
pub(crate) fn rank_or(weights: &Weights, vector: &TsVector, query: &TsQuery) -> f32 {
    let operands = query.operands();
    let mut res = 0.0f32;

    for operand in &operands {
        let Some(run) = vector.find(&operand.lexeme, operand.prefix) else {
            continue;
        };
        for entry in &vector.entries()[run] {
            let (positions, _) = positions_or_sentinel(entry);

            let mut resj = 0.0f64;
            let mut wjm = -1.0f64;
            let mut jm = 0usize;
            for (j, p) in positions.iter().enumerate() {
                let w = weights.get(p.weight) as f64;
                resj += w / ((j + 1) * (j + 1)) as f64;
                if w > wjm {
                    wjm = w;
                    jm = j;
                }
            }

            // occurrences are taken in stored order, not weight-descending;
            // the maximum term is pulled out of the decayed sum and re-added
            // undamped
            res += ((wjm + resj - wjm / ((jm + 1) * (jm + 1)) as f64) / INV_SQUARE_SUM_LIMIT)
                as f32;
        }
    }

    if !operands.is_empty() {
        res /= operands.len() as f32;
    }
    res
}

/// AND kernel: pairwise position-distance attenuation over the operands'
/// occurrence vectors, combined by probabilistic OR. Returns -1.0 when no
/// pair contributed; the dispatcher clamps that to a floor score.
pub(crate) fn rank_and(weights: &Weights, vector: &TsVector, query: &TsQuery) -> f32 {
    let operands = query.operands();
    if operands.len() < 2 {
        return rank_or(weights, vector, query);
    }

    // Slot i holds the positions of the entry most recently visited for
    // operand i, so prefix operands matching several entries pair each of
    // their entries against the latest entry seen for earlier operands.
    let mut pos: Vec<Option<(&[crate::tsvector::Position], bool)>> = vec![None; operands.len()];
    let mut res = -1.0f32;

    for i in 0..operands.len() {
        let Some(run) = vector.find(&operands[i].lexeme, operands[i].prefix) else {
            continue;
        };
        for entry in &vector.entries()[run] {
            let (post, post_is_sentinel) = positions_or_sentinel(entry);
            pos[i] = Some((post, post_is_sentinel));

            for k in 0..i {
                let Some((ct, ct_is_sentinel)) = pos[k] else {
                    continue;
                };
                for lp in post {
                    for cp in ct {
                        let mut dist = (lp.pos as i32 - cp.pos as i32).abs();
                        if dist == 0 {
                            if !(post_is_sentinel || ct_is_sentinel) {
                                // co-located real hits cannot form a bi-gram
                                // with themselves
                                continue;
                            }
                            dist = MAX_POS as i32;
                        }
                        let curw = (weights.get(lp.weight) as f64
                            * weights.get(cp.weight) as f64
                            * word_distance(dist))
                        .sqrt() as f32;
                        res = if res < 0.0 {
                            curw
                        } else {
                            1.0 - (1.0 - res) * (1.0 - curw)
                        };
                    }
                }
            }
        }
    }

    res
}
