use itertools::Itertools;
use lib_valgebra::{LcsGraph, Relation, Variant, compare, edit_distance, patch};
use util::CASES;

mod util;

#[test]
fn canonical_reproduces_the_observed_sequence() {
    for &(reference, observed) in CASES {
        let graph = LcsGraph::new(reference, observed);
        let canonical = graph.canonical();
        assert_eq!(
            patch(reference, &canonical).unwrap(),
            observed,
            "canonical of {} -> {} does not round-trip",
            String::from_utf8_lossy(reference),
            String::from_utf8_lossy(observed),
        );
    }
}

#[test]
fn local_supremal_reproduces_the_observed_sequence() {
    for &(reference, observed) in CASES {
        let graph = LcsGraph::new(reference, observed);
        assert_eq!(
            patch(reference, graph.local_supremal()).unwrap(),
            observed,
            "local supremal of {} -> {} does not round-trip",
            String::from_utf8_lossy(reference),
            String::from_utf8_lossy(observed),
        );
    }
}

#[test]
fn graph_distance_matches_the_edit_distance() {
    for &(reference, observed) in CASES {
        assert_eq!(
            LcsGraph::new(reference, observed).distance(),
            edit_distance(reference, observed)
        );
    }
}

#[test]
fn local_supremal_pieces_partition_the_supremal() {
    for &(reference, observed) in CASES {
        let graph = LcsGraph::new(reference, observed);
        let pieces = graph.local_supremal();
        if pieces.is_empty() {
            assert!(graph.supremal().is_empty());
            continue;
        }
        assert_eq!(pieces.first().unwrap().start, graph.supremal().start);
        assert_eq!(pieces.last().unwrap().end, graph.supremal().end);
        for (lhs, rhs) in pieces.iter().tuple_windows() {
            assert!(lhs.end < rhs.start);
        }
    }
}

#[test]
fn canonical_variants_stay_within_local_supremal_pieces() {
    for &(reference, observed) in CASES {
        let graph = LcsGraph::new(reference, observed);
        let pieces = graph.local_supremal();
        for variant in graph.canonical() {
            assert!(
                pieces
                    .iter()
                    .any(|piece| piece.start <= variant.start && variant.end <= piece.end)
            );
        }
    }
}

#[test]
fn no_result_is_identical_to_no_variant() {
    let graph = LcsGraph::new(b"ACGT", b"ACGT");
    assert_eq!(graph.distance(), 0);
    assert!(graph.canonical().is_empty());
    assert!(graph.local_supremal().is_empty());
}

#[test]
fn extending_a_homopolymer_run_spans_the_run() {
    // The inserted symbol fits at every offset of the run; the canonical
    // description covers the whole run.
    let graph = LcsGraph::new(b"AAAA", b"AAAAA");
    let placements: usize = graph
        .edge_variants()
        .iter()
        .map(|(_, count)| count)
        .sum();
    assert_eq!(placements, 5);
    assert_eq!(graph.canonical(), [Variant::new(0, 4, "AAAAA")]);
}

#[test]
fn relations_are_symmetric() {
    let reference = b"AAAAAAAA";
    let pairs = [
        (Variant::new(0, 1, ""), Variant::new(5, 6, "")),
        (Variant::new(1, 2, "T"), Variant::new(2, 2, "T")),
        (Variant::new(0, 2, "T"), Variant::new(1, 3, "T")),
        (Variant::new(2, 3, "G"), Variant::new(2, 3, "G")),
    ];
    for (lhs, rhs) in &pairs {
        let forward = compare(reference, lhs, rhs).unwrap();
        let backward = compare(reference, rhs, lhs).unwrap();
        assert_eq!(forward.inverse(), backward);
    }
}

#[test]
fn relation_scenarios() {
    let reference = b"AAAAAAAA";
    assert_eq!(
        compare(reference, &Variant::new(0, 1, ""), &Variant::new(0, 2, "A")).unwrap(),
        Relation::Contains
    );
    assert_eq!(
        compare(reference, &Variant::new(0, 1, ""), &Variant::new(5, 6, "")).unwrap(),
        Relation::Disjoint
    );
    assert_eq!(
        compare(reference, &Variant::new(0, 2, "T"), &Variant::new(1, 3, "T")).unwrap(),
        Relation::Overlap
    );
    assert_eq!(
        compare(reference, &Variant::new(3, 3, "C"), &Variant::new(3, 3, "C")).unwrap(),
        Relation::Equivalent
    );
}
