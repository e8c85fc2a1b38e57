//! Reporting aggregator and render payload tests.

use chrono::NaiveDate;
use rfm_core::{
    metrics::{CustomerMetrics, MetricsTable},
    report::{build_report, monetary_ranking, segment_counts, RenderPayload},
    segment::{Segment, Segmentation},
    CustomerId, RfmError,
};
use std::collections::BTreeMap;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// (customer, segment, monetary)
fn fixture(rows: &[(i64, Segment, f64)]) -> (Segmentation, MetricsTable) {
    let reference = NaiveDate::from_ymd_opt(2011, 12, 9)
        .unwrap()
        .and_hms_opt(12, 50, 0)
        .unwrap();
    let mut assignments = BTreeMap::new();
    let mut customers = BTreeMap::new();
    for (id, segment, monetary) in rows {
        let customer_id = CustomerId::Numeric(*id);
        assignments.insert(customer_id.clone(), *segment);
        customers.insert(
            customer_id.clone(),
            CustomerMetrics { customer_id, recency: 0, frequency: 1, monetary: *monetary },
        );
    }
    (
        Segmentation { edges: vec![], assignments },
        MetricsTable { reference, customers },
    )
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn counts_cover_every_segment_including_empty_ones() {
    let (seg, _) = fixture(&[
        (1, Segment::Churned, 1.0),
        (2, Segment::Churned, 1.0),
        (3, Segment::KeyValue, 1.0),
    ]);
    let counts = segment_counts(&seg, &Segment::ALL);

    assert_eq!(counts.len(), 8);
    assert_eq!(counts[0].segment, Segment::Churned);
    assert_eq!(counts[0].customers, 2);
    assert_eq!(counts[7].segment, Segment::KeyValue);
    assert_eq!(counts[7].customers, 1);
    assert_eq!(counts.iter().map(|c| c.customers).sum::<u64>(), 3);
}

/// Generally-Retained is counted but never ranked; the ranking ascends.
#[test]
fn ranking_excludes_generally_retained_and_ascends() {
    let (seg, metrics) = fixture(&[
        (1, Segment::KeyValue, 900.0),
        (2, Segment::KeyValue, 600.0),
        (3, Segment::GenerallyRetained, 50_000.0),
        (4, Segment::Churned, 20.0),
        (5, Segment::Potential, 300.0),
        (6, Segment::New, -5.0),
    ]);
    let ranking = monetary_ranking(&seg, &metrics, &[Segment::GenerallyRetained]).unwrap();

    let order: Vec<Segment> = ranking.iter().map(|r| r.segment).collect();
    assert_eq!(
        order,
        vec![Segment::New, Segment::Churned, Segment::Potential, Segment::KeyValue]
    );
    assert_eq!(ranking[3].monetary, 1500.0);
    assert!(ranking.windows(2).all(|w| w[0].monetary <= w[1].monetary));

    let counts = segment_counts(&seg, &Segment::ALL);
    let retained = counts.iter().find(|c| c.segment == Segment::GenerallyRetained).unwrap();
    assert_eq!(retained.customers, 1);
}

#[test]
fn segmented_customer_without_metrics_breaks_integrity() {
    let (mut seg, metrics) = fixture(&[(1, Segment::Churned, 1.0)]);
    seg.assignments.insert(CustomerId::Numeric(99), Segment::KeyValue);

    let err = monetary_ranking(&seg, &metrics, &[]).unwrap_err();
    match err {
        RfmError::PipelineIntegrity { customer_id, .. } => {
            assert_eq!(customer_id, CustomerId::Numeric(99));
        }
        other => panic!("expected PipelineIntegrity, got {other:?}"),
    }
}

#[test]
fn empty_input_gives_empty_views() {
    let (seg, metrics) = fixture(&[]);
    let report = build_report(&seg, &metrics, &Segment::ALL, &[Segment::GenerallyRetained]).unwrap();
    assert!(report.counts.iter().all(|c| c.customers == 0));
    assert!(report.ranking.is_empty());

    let payload = RenderPayload::from(&report);
    assert!(payload.composition.is_empty());
    assert!(payload.ranking.is_empty());
}

/// The payload drops empty slices and truncates totals to whole units.
#[test]
fn payload_truncates_monetary_at_the_boundary() {
    let (seg, metrics) = fixture(&[
        (1, Segment::KeyValue, 100.99),
        (2, Segment::KeyValue, 0.75),
        (3, Segment::Churned, 10.5),
        (4, Segment::GenerallyRetained, 3.0),
    ]);
    let report = build_report(&seg, &metrics, &Segment::ALL, &[Segment::GenerallyRetained]).unwrap();
    assert!((report.ranking[1].monetary - 101.74).abs() < 1e-9);

    let payload = RenderPayload::from(&report);
    let slices: Vec<(&str, u64)> = payload
        .composition
        .iter()
        .map(|s| (s.segment.as_str(), s.customers))
        .collect();
    assert_eq!(
        slices,
        vec![("Churned", 1), ("Generally-Retained", 1), ("Key-Value", 2)]
    );

    let bars: Vec<(&str, i64)> = payload
        .ranking
        .iter()
        .map(|b| (b.segment.as_str(), b.total_monetary))
        .collect();
    assert_eq!(bars, vec![("Churned", 10), ("Key-Value", 101)]);

    let json = payload.to_json().unwrap();
    let back: RenderPayload = serde_json::from_str(&json).unwrap();
    assert_eq!(back, payload);
}
