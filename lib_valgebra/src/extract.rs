use itertools::Itertools;
use log::trace;

use crate::NONE;
use crate::graph::{LcsGraph, edge_window};
use crate::variant::Variant;

/// Per-node entry of the canonical traversal: the merged ancestor candidate
/// (`lca`), its discovery rank, the traversal depth in variants, the
/// tightest variant span over the in-edges at that depth, and the intrusive
/// queue links.
#[derive(Debug, Clone, Copy)]
struct LcaEntry {
    lca: usize,
    rank: usize,
    depth: usize,
    start: usize,
    end: usize,
    prev: usize,
    next: usize,
}

const UNSEEN: LcaEntry = LcaEntry {
    lca: NONE,
    rank: NONE,
    depth: NONE,
    start: NONE,
    end: NONE,
    prev: NONE,
    next: NONE,
};

/// Merges two ancestor candidates by rank hopping: the later-discovered side
/// repeatedly follows its own ancestor pointer until both coincide. `start`
/// accumulates the smallest variant start seen along either chain.
fn merge(entries: &[LcaEntry], start: &mut usize, mut lhs: usize, mut rhs: usize) -> usize {
    let mut lhs_start = *start;
    let mut rhs_start = *start;
    while lhs != rhs {
        while entries[lhs].rank > entries[rhs].rank {
            lhs_start = entries[lhs].start;
            lhs = entries[lhs].lca;
        }
        while entries[rhs].rank > entries[lhs].rank {
            rhs_start = entries[rhs].start;
            rhs = entries[rhs].lca;
        }
    }
    *start = lhs_start.min(rhs_start);
    lhs
}

/// Extracts the canonical variant list: the minimal number of separate
/// variants whose composition reproduces the observed sequence, each with
/// the tightest span over the alignments realizing that minimum. Returned in
/// source-to-sink order.
pub fn canonical(graph: &LcsGraph<'_>) -> Vec<Variant> {
    let mut entries = vec![UNSEEN; graph.nodes.len()];
    let mut sink = NONE;

    entries[graph.source] = LcaEntry {
        lca: NONE,
        rank: 0,
        depth: 0,
        start: NONE,
        end: NONE,
        prev: NONE,
        next: NONE,
    };
    let mut rank = 1;
    let mut tail = graph.source;

    let mut head = graph.source;
    while head != NONE {
        if graph.is_sink(head) {
            sink = head;
            head = entries[head].next;
            continue;
        }

        let lambda = graph.nodes[head].lambda;
        if lambda != NONE {
            if entries[lambda].depth == NONE {
                // Enter the lambda sibling right after the current node, in
                // stack order, at the same depth.
                trace!("push lambda {lambda} at depth {}", entries[head].depth);
                let after = entries[head].next;
                entries[lambda] = LcaEntry {
                    lca: head,
                    rank,
                    depth: entries[head].depth,
                    start: NONE,
                    end: NONE,
                    prev: head,
                    next: after,
                };
                rank += 1;
                if after != NONE {
                    entries[after].prev = lambda;
                } else {
                    tail = lambda;
                }
                entries[head].next = lambda;
            } else if entries[lambda].depth == entries[head].depth {
                let mut start = entries[lambda].start;
                let lca = merge(&entries, &mut start, entries[lambda].lca, head);
                entries[lambda].start = start;
                entries[lambda].lca = lca;
            } else if entries[head].next == lambda {
                // A shallower route through the sibling appeared: re-parent
                // in place.
                entries[lambda].lca = head;
                entries[lambda].depth = entries[head].depth;
                entries[lambda].start = NONE;
                entries[lambda].end = NONE;
            } else {
                // Re-parent and re-queue right after the current node.
                trace!("requeue lambda {lambda} at depth {}", entries[head].depth);
                if lambda == tail {
                    tail = entries[lambda].prev;
                } else {
                    let next = entries[lambda].next;
                    entries[next].prev = entries[lambda].prev;
                }
                let prev = entries[lambda].prev;
                entries[prev].next = entries[lambda].next;

                let after = entries[head].next;
                entries[lambda] = LcaEntry {
                    lca: head,
                    rank: entries[lambda].rank,
                    depth: entries[head].depth,
                    start: NONE,
                    end: NONE,
                    prev: head,
                    next: after,
                };
                if after != NONE {
                    entries[after].prev = lambda;
                } else {
                    tail = lambda;
                }
                entries[head].next = lambda;
            }
        }

        let mut edge = graph.nodes[head].edges;
        while edge != NONE {
            let target = graph.edges[edge].tail;
            if entries[target].depth == NONE {
                let window = edge_window(
                    graph.nodes[head],
                    graph.nodes[target],
                    head == graph.source,
                    graph.is_sink(target),
                );
                entries[target] = LcaEntry {
                    lca: head,
                    rank,
                    depth: entries[head].depth + 1,
                    start: window.start,
                    end: window.end + window.count - 1,
                    prev: tail,
                    next: NONE,
                };
                rank += 1;
                entries[tail].next = target;
                tail = target;
            } else if entries[target].depth == entries[head].depth + 1 {
                let window = edge_window(
                    graph.nodes[head],
                    graph.nodes[target],
                    head == graph.source,
                    graph.is_sink(target),
                );
                entries[target].start = entries[target].start.min(window.start);
                let mut start = entries[target].start;
                let lca = merge(&entries, &mut start, entries[target].lca, head);
                entries[target].start = start;
                entries[target].lca = lca;
                let end = window.end + window.count - 1;
                entries[target].end = if entries[target].end == NONE {
                    end
                } else {
                    entries[target].end.max(end)
                };
            }
            // Deeper arrivals represent splits into more variants than
            // necessary and are skipped.
            edge = graph.edges[edge].next;
        }

        head = entries[head].next;
    }

    let mut variants = Vec::new();
    let mut node = sink;
    while node != NONE {
        let lca = entries[node].lca;
        if lca != NONE && entries[node].start != NONE && entries[node].end != NONE {
            let start_offset = entries[node].start - graph.nodes[lca].row;
            let end_offset = entries[node].end - graph.nodes[node].row;
            let obs_start = graph.nodes[lca].col + start_offset;
            let obs_end = graph.nodes[node].col + end_offset;
            variants.push(Variant::new(
                entries[node].start,
                entries[node].end,
                &graph.observed[obs_start..obs_end],
            ));
        }
        node = lca;
    }
    variants.reverse();
    variants
}

/// The stored local-supremal decomposition: the unique partition of the
/// supremal variant into maximal independent sub-variants.
pub fn local_supremal(graph: &LcsGraph<'_>) -> Vec<Variant> {
    graph.local_supremal().to_vec()
}

/// Computes the local-supremal decomposition and the supremal span of a
/// freshly folded graph, then trims the source and sink nodes to the
/// tightest window any edge actually uses.
///
/// Works on the post-dominator structure of the DAG: every node's `post`
/// pointer is the nearest node all its outgoing paths reconverge on,
/// obtained in reverse topological order by rank-hopping intersection over
/// the successors (lambda edges included). Walking the source's pointer
/// chain yields the articulation sequence; each consecutive pair spans one
/// maximal independent variant.
pub(crate) fn decompose(graph: &mut LcsGraph<'_>) {
    let nodes = &graph.nodes;

    // Topological order of the reachable part (lambda edges included):
    // reversed depth-first finishing order from the source.
    let mut order = Vec::new();
    let mut seen = vec![false; nodes.len()];
    let mut stack = vec![(graph.source, false)];
    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            order.push(node);
            continue;
        }
        if seen[node] {
            continue;
        }
        seen[node] = true;
        stack.push((node, true));
        let lambda = nodes[node].lambda;
        if lambda != NONE && !seen[lambda] {
            stack.push((lambda, false));
        }
        let mut edge = nodes[node].edges;
        while edge != NONE {
            let tail = graph.edges[edge].tail;
            if !seen[tail] {
                stack.push((tail, false));
            }
            edge = graph.edges[edge].next;
        }
    }
    order.reverse();
    let mut rank = vec![NONE; nodes.len()];
    for (position, &node) in order.iter().enumerate() {
        rank[node] = position;
    }

    // Tightest edge endpoints per node: the first position any outgoing
    // variant touches, the last position any incoming placement reaches.
    let mut outgoing = vec![NONE; nodes.len()];
    let mut incoming = vec![NONE; nodes.len()];
    for &head in &order {
        let mut edge = nodes[head].edges;
        while edge != NONE {
            let tail = graph.edges[edge].tail;
            let window = edge_window(
                nodes[head],
                nodes[tail],
                head == graph.source,
                nodes[tail].edges == NONE,
            );
            outgoing[head] = outgoing[head].min(window.start);
            let end = window.end + window.count - 1;
            incoming[tail] = if incoming[tail] == NONE {
                end
            } else {
                incoming[tail].max(end)
            };
            edge = graph.edges[edge].next;
        }
    }

    let sink = *order.last().expect("a folded graph has a sink");
    debug_assert!(nodes[sink].edges == NONE);

    let mut post = vec![NONE; nodes.len()];
    post[sink] = sink;
    for &node in order.iter().rev().skip(1) {
        let mut candidate = NONE;
        let follow = |successor: usize, candidate: &mut usize| {
            if *candidate == NONE {
                *candidate = successor;
                return;
            }
            let mut lhs = *candidate;
            let mut rhs = successor;
            while lhs != rhs {
                if rank[lhs] < rank[rhs] {
                    lhs = post[lhs];
                } else {
                    rhs = post[rhs];
                }
            }
            *candidate = lhs;
        };
        if nodes[node].lambda != NONE {
            follow(nodes[node].lambda, &mut candidate);
        }
        let mut edge = nodes[node].edges;
        while edge != NONE {
            follow(graph.edges[edge].tail, &mut candidate);
            edge = graph.edges[edge].next;
        }
        post[node] = candidate;
    }

    let mut articulations = vec![graph.source];
    let mut node = graph.source;
    while node != sink {
        node = post[node];
        articulations.push(node);
    }

    let mut pieces = Vec::new();
    for (&head, &tail) in articulations.iter().tuple_windows() {
        let (start, end) = (outgoing[head], incoming[tail]);
        if start == NONE || end == NONE {
            continue;
        }
        let obs_start = nodes[head].col + (start - nodes[head].row);
        let obs_end = nodes[tail].col + (end - nodes[tail].row);
        pieces.push(Variant::new(
            start,
            end,
            &graph.observed[obs_start..obs_end],
        ));
    }

    if let (Some(first), Some(last)) = (pieces.first(), pieces.last()) {
        let source = graph.source;
        let obs_start = nodes[source].col + (first.start - nodes[source].row);
        let obs_end = nodes[sink].col + (last.end - nodes[sink].row);
        graph.supremal = Variant::new(first.start, last.end, &graph.observed[obs_start..obs_end]);

        // Trim the source and sink matches to the window the variants use.
        let advance = first.start - graph.nodes[source].row;
        graph.nodes[source].row += advance;
        graph.nodes[source].col += advance;
        graph.nodes[source].length -= advance;
        let length = last.end - graph.nodes[sink].row;
        graph.nodes[sink].length = graph.nodes[sink].length.min(length);
    }

    graph.local_supremal = pieces;
}
