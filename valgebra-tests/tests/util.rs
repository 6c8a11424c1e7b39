/// Reference/observed pairs covering the interesting graph shapes: identity,
/// plain indels, independent regions, interleaved rewrites, periodic runs
/// and shared factors entered at several depths.
pub const CASES: &[(&[u8], &[u8])] = &[
    (b"", b""),
    (b"", b"C"),
    (b"C", b""),
    (b"ACGT", b"ACGT"),
    (b"ACGT", b"AGT"),
    (b"A", b"AA"),
    (b"AAAA", b"AAAAA"),
    (b"AAAA", b"AAA"),
    (b"AAA", b"TT"),
    (b"ACG", b"CAG"),
    (b"CATC", b"GATG"),
    (b"CTAA", b"TTA"),
    (b"GAAAT", b"GAAT"),
    (b"TTT", b"TTTTAT"),
    (b"AGAATTGCTTGAA", b"AGGGTTAAA"),
];
