use crate::align::{LcsTable, align, edit_distance};

fn buckets(table: &LcsTable) -> Vec<Vec<(usize, usize, usize)>> {
    (0..table.lcs_len())
        .map(|index| {
            table
                .bucket(index)
                .map(|run| (run.row, run.col, run.length))
                .collect()
        })
        .collect()
}

#[test]
fn empty_sequences_give_an_empty_table() {
    let table = align(b"", b"");
    assert_eq!(table.lcs_len(), 0);
    assert_eq!(table.distance(), 0);
}

#[test]
fn single_insertion() {
    let table = align(b"AA", b"ACA");
    assert_eq!(table.distance(), 1);
    assert_eq!(buckets(&table), [vec![(0, 0, 1)], vec![(1, 2, 1)]]);
}

#[test]
fn single_deletion() {
    let table = align(b"ACA", b"AA");
    assert_eq!(table.distance(), 1);
    assert_eq!(buckets(&table), [vec![(0, 0, 1)], vec![(2, 1, 1)]]);
}

#[test]
fn repeated_runs_share_buckets() {
    let table = align(b"TTT", b"TTTTAT");
    assert_eq!(table.distance(), 3);
    assert_eq!(
        buckets(&table),
        [
            vec![(0, 3, 1)],
            vec![(0, 2, 2)],
            vec![(0, 0, 3), (0, 1, 3), (2, 5, 1)],
        ]
    );
}

#[test]
fn distance_counts_insertions_and_deletions() {
    assert_eq!(edit_distance(b"ACGT", b"ACGT"), 0);
    assert_eq!(edit_distance(b"ACGT", b"AGT"), 1);
    assert_eq!(edit_distance(b"AGT", b"ACGT"), 1);
    assert_eq!(edit_distance(b"AAA", b""), 3);
    assert_eq!(edit_distance(b"", b"AAA"), 3);
    assert_eq!(edit_distance(b"CTCGGCATTA", b"GGCTGGCTGT"), 6);
    assert_eq!(edit_distance(b"A", b"T"), 2);
}

#[test]
fn distance_matches_the_table() {
    for (reference, observed) in [
        (b"CTAA".as_slice(), b"TTA".as_slice()),
        (b"CATC", b"GATG"),
        (b"AAAA", b"AAAAA"),
        (b"GAAAT", b"GAAT"),
    ] {
        assert_eq!(
            align(reference, observed).distance(),
            edit_distance(reference, observed)
        );
    }
}
