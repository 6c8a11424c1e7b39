use log::debug;

use crate::NONE;
use crate::align::edit_distance;
use crate::bitset::Bitset;
use crate::error::Result;
use crate::graph::{LcsGraph, edge_window};
use crate::relation::Relation;
use crate::variant::Variant;

const NUC_A: u8 = 0x1;
const NUC_C: u8 = 0x2;
const NUC_G: u8 = 0x4;
const NUC_T: u8 = 0x8;
const UNIVERSE: u8 = 0xF;

fn nucleotides(sequence: &[u8]) -> u8 {
    let mut mask = 0;
    for &symbol in sequence {
        mask |= match symbol {
            b'A' => NUC_A,
            b'C' => NUC_C,
            b'G' => NUC_G,
            b'T' => NUC_T,
            _ => 0,
        };
        if mask == UNIVERSE {
            break;
        }
    }
    mask
}

/// Per-position effect sets of one variant over a comparison window:
/// deleted reference positions and, per nucleotide, the positions an
/// insertion of that nucleotide can touch in some minimal alignment.
struct Footprint {
    deletions: Bitset,
    insertions: [Bitset; 4],
}

impl Footprint {
    fn new(capacity: usize) -> Self {
        Self {
            deletions: Bitset::new(capacity),
            insertions: std::array::from_fn(|_| Bitset::new(capacity)),
        }
    }

    /// Fills the sets from every graph edge whose span meets
    /// `[start, end]`; bit positions are relative to `offset`.
    fn fill(&mut self, graph: &LcsGraph<'_>, offset: usize, start: usize, end: usize) {
        for (head, node) in graph.nodes.iter().enumerate() {
            if node.row > end {
                continue;
            }
            let mut edge = node.edges;
            while edge != NONE {
                let tail = graph.edges[edge].tail;
                let tail_node = graph.nodes[tail];
                edge = graph.edges[edge].next;
                if tail_node.row + tail_node.length < start {
                    continue;
                }

                let window = edge_window(
                    *node,
                    tail_node,
                    head == graph.source,
                    tail_node.edges == NONE,
                );
                if window.end > window.start {
                    self.deletions
                        .set_range(window.start - offset, window.end + window.count - 1 - offset);
                }
                let mask = nucleotides(&graph.observed()[window.obs_start..window.obs_end]);
                for (bitset, nucleotide) in self
                    .insertions
                    .iter_mut()
                    .zip([NUC_A, NUC_C, NUC_G, NUC_T])
                {
                    if mask & nucleotide != 0 {
                        bitset.set_range(window.start - offset, window.end + window.count - offset);
                    }
                }
            }
        }
    }

    fn intersection_count(&self, other: &Self) -> usize {
        self.deletions.intersection_count(&other.deletions)
            + self
                .insertions
                .iter()
                .zip(&other.insertions)
                .map(|(lhs, rhs)| lhs.intersection_count(rhs))
                .sum::<usize>()
    }
}

fn window_observed(reference: &[u8], start: usize, end: usize, variant: &Variant) -> Vec<u8> {
    let mut observed =
        Vec::with_capacity(variant.start - start + variant.sequence.len() + end - variant.end);
    observed.extend_from_slice(&reference[start..variant.start]);
    observed.extend_from_slice(&variant.sequence);
    observed.extend_from_slice(&reference[variant.end..end]);
    observed
}

/// Determines the relation between two variants on a shared reference.
///
/// Independence and nesting are resolved by edit-distance arithmetic over
/// the common window; only interleaved edits fall back to intersecting the
/// nucleotide footprints of the two alignment graphs.
pub fn compare(reference: &[u8], lhs: &Variant, rhs: &Variant) -> Result<Relation> {
    lhs.check(reference.len())?;
    rhs.check(reference.len())?;

    if lhs == rhs {
        return Ok(Relation::Equivalent);
    }
    if lhs.start > rhs.end || rhs.start > lhs.end {
        return Ok(Relation::Disjoint);
    }

    let start = lhs.start.min(rhs.start);
    let end = lhs.end.max(rhs.end);

    let lhs_observed = window_observed(reference, start, end, lhs);
    let rhs_observed = window_observed(reference, start, end, rhs);

    let lhs_distance = edit_distance(&reference[lhs.start..lhs.end], &lhs.sequence) as isize;
    let rhs_distance = edit_distance(&reference[rhs.start..rhs.end], &rhs.sequence) as isize;
    let distance = edit_distance(&lhs_observed, &rhs_observed) as isize;

    if lhs_distance + rhs_distance == distance {
        return Ok(Relation::Disjoint);
    }
    if lhs_distance - rhs_distance == distance {
        return Ok(Relation::Contains);
    }
    if rhs_distance - lhs_distance == distance {
        return Ok(Relation::IsContained);
    }

    debug!("interleaved edits, intersecting footprints over {start}..{end}");

    let window = &reference[start..end];
    let lhs_graph = LcsGraph::with_shift(window, &lhs_observed, start);
    let rhs_graph = LcsGraph::with_shift(window, &rhs_observed, start);

    let capacity = end - start + 1;
    let mut lhs_footprint = Footprint::new(capacity);
    let mut rhs_footprint = Footprint::new(capacity);

    let overlap_start = lhs.start.max(rhs.start);
    let overlap_end = lhs.end.min(rhs.end);
    lhs_footprint.fill(&lhs_graph, start, overlap_start, overlap_end);
    rhs_footprint.fill(&rhs_graph, start, overlap_start, overlap_end);

    if lhs_footprint.intersection_count(&rhs_footprint) > 0 {
        Ok(Relation::Overlap)
    } else {
        Ok(Relation::Disjoint)
    }
}
