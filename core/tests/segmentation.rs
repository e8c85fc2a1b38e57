//! Segmenter tests: quantile bins over the composite distribution.

use rfm_core::{
    segment::{segment_all, Segment},
    CustomerId, RfmError,
};
use std::collections::BTreeMap;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn composites(values: &[u32]) -> BTreeMap<CustomerId, u32> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (CustomerId::Numeric(i as i64), *v))
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Nine evenly spaced composites: the edges are the observations
/// themselves, the lowest bin takes both of the two smallest values.
#[test]
fn evenly_spaced_composites_fill_every_bin() {
    let input = composites(&[10, 15, 20, 25, 30, 35, 40, 45, 50]);
    let seg = segment_all(&input, &Segment::ALL).unwrap();

    assert_eq!(seg.edges, vec![10, 15, 20, 25, 30, 35, 40, 45, 50]);
    assert_eq!(seg.get(&CustomerId::Numeric(0)), Some(Segment::Churned));
    assert_eq!(seg.get(&CustomerId::Numeric(1)), Some(Segment::Churned));
    assert_eq!(seg.get(&CustomerId::Numeric(2)), Some(Segment::GenerallyRetained));
    assert_eq!(seg.get(&CustomerId::Numeric(3)), Some(Segment::New));
    assert_eq!(seg.get(&CustomerId::Numeric(4)), Some(Segment::Potential));
    assert_eq!(seg.get(&CustomerId::Numeric(5)), Some(Segment::KeyRetentionNeeded));
    assert_eq!(seg.get(&CustomerId::Numeric(6)), Some(Segment::KeyDeepening));
    assert_eq!(seg.get(&CustomerId::Numeric(7)), Some(Segment::KeyReactivation));
    assert_eq!(seg.get(&CustomerId::Numeric(8)), Some(Segment::KeyValue));
}

/// Edges never invent composite scores nobody has.
#[test]
fn edges_are_observed_composites() {
    let values = [10, 13, 13, 16, 20, 23, 26, 27, 30, 33, 36, 37, 40, 43, 46, 50, 50];
    let seg = segment_all(&composites(&values), &Segment::ALL).unwrap();
    for edge in &seg.edges {
        assert!(values.contains(edge), "edge {edge} not observed");
    }
    assert!(seg.edges.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn too_few_distinct_composites_are_degenerate() {
    let input = composites(&[10, 10, 20, 20, 30, 30, 40, 40, 50, 50]);
    let err = segment_all(&input, &Segment::ALL).unwrap_err();
    match err {
        RfmError::DegenerateDistribution { stage, requested, .. } => {
            assert_eq!(stage, "segmentation");
            assert_eq!(requested, 8);
        }
        other => panic!("expected DegenerateDistribution, got {other:?}"),
    }
}

/// Higher composite never lands in a lower bin.
#[test]
fn segment_assignment_is_monotonic_in_composite() {
    let values: Vec<u32> = (0..200).map(|i| 10 + (i * 7 % 41) as u32).collect();
    let input = composites(&values);
    let seg = segment_all(&input, &Segment::ALL).unwrap();

    let mut pairs: Vec<(u32, Segment)> = input
        .iter()
        .map(|(id, c)| (*c, seg.get(id).unwrap()))
        .collect();
    pairs.sort();
    for w in pairs.windows(2) {
        assert!(
            w[0].1 <= w[1].1,
            "composite {} → {:?} but composite {} → {:?}",
            w[0].0, w[0].1, w[1].0, w[1].1
        );
    }

    assert_eq!(seg.assignments.len(), input.len());
}

/// The label list decides the bin count: four labels, four bins.
#[test]
fn shorter_label_lists_give_fewer_bins() {
    let labels = [Segment::Churned, Segment::New, Segment::KeyRetentionNeeded, Segment::KeyValue];
    let input = composites(&[10, 20, 30, 40, 50]);
    let seg = segment_all(&input, &labels).unwrap();

    assert_eq!(seg.edges, vec![10, 20, 30, 40, 50]);
    assert_eq!(seg.get(&CustomerId::Numeric(0)), Some(Segment::Churned));
    assert_eq!(seg.get(&CustomerId::Numeric(1)), Some(Segment::Churned));
    assert_eq!(seg.get(&CustomerId::Numeric(4)), Some(Segment::KeyValue));
}

#[test]
fn segment_labels_serialize_as_display_text() {
    let json = serde_json::to_string(&Segment::KeyRetentionNeeded).unwrap();
    assert_eq!(json, "\"Key-Retention-Needed\"");
    assert_eq!(Segment::GenerallyRetained.to_string(), "Generally-Retained");
}
