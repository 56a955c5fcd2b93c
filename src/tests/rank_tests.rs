use crate::{
    ts_rank, ts_rank_normalized, ts_rank_weighted, ts_rank_weighted_normalized, Normalization,
    TsQuery, TsVector, Weights,
};

fn word_distance(dist: f64) -> f64 {
    1.0 / (1.005 + 0.05 * (dist / 1.5 - 2.0).exp())
}

#[test]
fn test_single_lexeme_default_weight() {
    let v = TsVector::parse("'cat':1").unwrap();
    let q = TsQuery::parse("cat").unwrap();
    let expected = 0.1 / 1.64493406685;
    assert!((ts_rank(&v, &q) as f64 - expected).abs() < 1e-7);
}

#[test]
fn test_and_pair_distance_four() {
    let v = TsVector::parse("'cat':1A 'dog':5A").unwrap();
    let q = TsQuery::parse("cat & dog").unwrap();
    let expected = word_distance(4.0).sqrt();
    assert!((ts_rank(&v, &q) as f64 - expected).abs() < 1e-6);
}

#[test]
fn test_and_pair_adjacent() {
    let v = TsVector::parse("'cat':1A 'dog':2A").unwrap();
    let q = TsQuery::parse("cat & dog").unwrap();
    let expected = word_distance(1.0).sqrt();
    assert!((ts_rank(&v, &q) as f64 - expected).abs() < 1e-6);
    // sanity against the hand-computed value
    assert!((ts_rank(&v, &q) - 0.9910).abs() < 1e-3);
}

#[test]
fn test_uniq_normalization_halves_two_word_doc() {
    let v = TsVector::parse("'cat':1A 'dog':5A").unwrap();
    let q = TsQuery::parse("cat & dog").unwrap();
    let raw = ts_rank(&v, &q);
    let normalized = ts_rank_normalized(&v, &q, Normalization::Uniq as u32);
    assert!((normalized - raw / 2.0).abs() < 1e-7);
}

#[test]
fn test_empty_query_scores_zero() {
    let v = TsVector::parse("'cat':1").unwrap();
    let q = TsQuery::parse("").unwrap();
    assert_eq!(q.size(), 0);
    assert_eq!(ts_rank(&v, &q), 0.0);
}

#[test]
fn test_scores_are_non_negative() {
    let v = TsVector::parse("'cat':1 'dog':2,5B 'rat':7").unwrap();
    for query in ["cat", "cat & dog", "cat | rat", "!cat", "cat & !dog", "mouse"] {
        let q = TsQuery::parse(query).unwrap();
        for method in [0u32, 0x01, 0x02, 0x08, 0x10, 0x20, 0x3f] {
            let res = ts_rank_normalized(&v, &q, method);
            assert!(res >= 0.0, "rank({query}, {method:#x}) = {res}");
        }
    }
}

#[test]
fn test_doubling_weights_does_not_decrease_raw_score() {
    let half = Weights::new([0.05, 0.1, 0.2, 0.5]).unwrap();
    let full = Weights::new([0.1, 0.2, 0.4, 1.0]).unwrap();
    let v = TsVector::parse("'cat':1A 'dog':3B 'rat':9D").unwrap();
    for query in ["cat", "cat & dog", "cat | dog | rat", "cat & dog & rat"] {
        let q = TsQuery::parse(query).unwrap();
        assert!(
            ts_rank_weighted(&full, &v, &q) >= ts_rank_weighted(&half, &v, &q),
            "weight doubling decreased {query}"
        );
    }
}

#[test]
fn test_operand_order_does_not_matter() {
    let v = TsVector::parse("'cat':2A 'dog':5B 'rat':9").unwrap();
    let pairs = [
        ("cat | dog | rat", "rat | cat | dog"),
        ("cat & dog & rat", "dog & rat & cat"),
    ];
    for (a, b) in pairs {
        let qa = TsQuery::parse(a).unwrap();
        let qb = TsQuery::parse(b).unwrap();
        assert!((ts_rank(&v, &qa) - ts_rank(&v, &qb)).abs() < 1e-6);
    }
}

#[test]
fn test_prefix_operand_scores_at_least_exact() {
    let v = TsVector::parse("'cat':1 'catalog':4 'category':9").unwrap();
    let exact = ts_rank(&v, &TsQuery::parse("cat").unwrap());
    let prefixed = ts_rank(&v, &TsQuery::parse("cat:*").unwrap());
    assert!(prefixed >= exact);
    assert!(prefixed > exact); // the prefix run really matched more entries
}

#[test]
fn test_weight_validation_before_scoring() {
    assert!(Weights::from_array(&[0.1, 0.2, 0.4]).is_err());
    assert!(Weights::new([0.1, 0.2, 0.4, 2.0]).is_err());
    assert!(Weights::from_nullable_array(&[None, Some(0.2), Some(0.4), Some(1.0)]).is_err());
}

#[test]
fn test_weighted_normalized_combination() {
    let v = TsVector::parse("'cat':1A 'dog':5A").unwrap();
    let q = TsQuery::parse("cat & dog").unwrap();
    let w = Weights::new([0.2, 0.4, 0.8, 1.0]).unwrap();
    let raw = ts_rank_weighted(&w, &v, &q);
    let combined = ts_rank_weighted_normalized(
        &w,
        &v,
        &q,
        Normalization::Uniq as u32 | Normalization::RDivRPlus1 as u32,
    );
    let expected = (raw / 2.0) / (raw / 2.0 + 1.0);
    assert!((combined - expected).abs() < 1e-7);
}

#[test]
fn test_or_rank_sums_occurrences_with_decay() {
    // two occurrences decay the second by 1/4; a lone occurrence scores less
    let twice = TsVector::parse("'cat':1,2").unwrap();
    let once = TsVector::parse("'cat':1").unwrap();
    let q = TsQuery::parse("cat").unwrap();
    assert!(ts_rank(&twice, &q) > ts_rank(&once, &q));
    let expected = (0.1 + 0.1 + 0.1 / 4.0 - 0.1) / 1.64493406685;
    assert!((ts_rank(&twice, &q) as f64 - expected).abs() < 1e-7);
}

#[test]
fn test_serde_round_trip() {
    let v = TsVector::parse("'cat':1A 'dog':5B 'rat':9").unwrap();
    let q = TsQuery::parse("cat & ( dog | !rat:* )").unwrap();
    let v2: TsVector = serde_json::from_str(&serde_json::to_string(&v).unwrap()).unwrap();
    let q2: TsQuery = serde_json::from_str(&serde_json::to_string(&q).unwrap()).unwrap();
    assert_eq!(v, v2);
    assert_eq!(q, q2);
    assert_eq!(ts_rank(&v, &q), ts_rank(&v2, &q2));
}
