use std::borrow::Cow;
use std::fmt::Write as _;

use log::debug;

use crate::NONE;
use crate::align::{LcsTable, align};
use crate::error::Result;
use crate::extract;
use crate::variant::{Variant, trim};

/// A maximal common factor of reference and observed, anchored at reference
/// offset `row` and observed offset `col`. `edges` heads the node's singly
/// linked edge list; `lambda` optionally points to the sibling node covering
/// the same factor truncated to a shorter prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub row: usize,
    pub col: usize,
    pub length: usize,
    pub(crate) edges: usize,
    pub(crate) lambda: usize,
}

/// An edge of the graph. The implied variants between head and tail are not
/// stored; they are recomputed on demand from the node geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Edge {
    pub(crate) tail: usize,
    pub(crate) next: usize,
}

/// The window of shifted-equivalent variants implied by one edge: the
/// leftmost variant plus the number of equally valid placements. Periodic
/// regions legitimately admit several placements for one stored edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EdgeWindow {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) obs_start: usize,
    pub(crate) obs_end: usize,
    pub(crate) count: usize,
}

/// A DAG compactly encoding every minimal-cost alignment between a reference
/// window and an observed sequence. Node 0 is the sink; rows carry the
/// window shift while columns index the observed sequence directly.
#[derive(Debug, Clone)]
pub struct LcsGraph<'a> {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) source: usize,
    pub(crate) observed: Cow<'a, [u8]>,
    pub(crate) distance: usize,
    pub(crate) supremal: Variant,
    pub(crate) local_supremal: Vec<Variant>,
}

pub(crate) fn edge_window(head: Node, tail: Node, is_source: bool, is_sink: bool) -> EdgeWindow {
    let row = head.row as isize - is_source as isize;
    let col = head.col as isize - is_source as isize;
    let head_length = (head.length + is_source as usize) as isize;
    let tail_length = (tail.length + is_sink as usize) as isize;

    let offset = (tail.row as isize - row).min(tail.col as isize - col) - 1;

    let head_offset = if offset > 0 {
        head_length.min(offset + 1)
    } else {
        1
    };
    let tail_offset = if offset < 0 {
        tail_length.min(-offset)
    } else {
        0
    };

    let count = (head_length - head_offset).min(tail_length - tail_offset - 1) + 1;
    debug_assert!(count >= 1);

    EdgeWindow {
        start: (row + head_offset) as usize,
        end: (tail.row as isize + tail_offset) as usize,
        obs_start: (col + head_offset) as usize,
        obs_end: (tail.col as isize + tail_offset) as usize,
        count: count as usize,
    }
}

impl<'a> LcsGraph<'a> {
    /// The graph of all minimal alignments between `reference` and
    /// `observed`.
    pub fn new(reference: &[u8], observed: &'a [u8]) -> Self {
        Self::with_shift(reference, observed, 0)
    }

    /// As [`LcsGraph::new`], for a sub-window of a larger sequence starting
    /// at reference position `shift`. Variants come out in absolute
    /// coordinates.
    pub fn with_shift(reference: &[u8], observed: &'a [u8], shift: usize) -> Self {
        Self::from_table(align(reference, observed), observed, shift)
    }

    /// Folds an alignment table into the graph.
    pub fn from_table(table: LcsTable, observed: &'a [u8], shift: usize) -> Self {
        Self::fold(table, Cow::Borrowed(observed), shift)
    }

    /// The graph for an allele given as a sorted, non-overlapping variant
    /// list, built over an iteratively widened window of influence around
    /// the variants.
    pub fn from_variants(reference: &[u8], variants: &[Variant]) -> Result<LcsGraph<'static>> {
        if variants.is_empty() {
            return Ok(LcsGraph::fold(align(b"", b""), Cow::Owned(Vec::new()), 0));
        }
        let variant = Variant::spanning(reference, variants)?;

        let mut offset = 10.max(variant.len() / 2).max(1);
        loop {
            let start = variant.start.saturating_sub(offset);
            let end = (variant.end + offset).min(reference.len());

            let capacity = variant.start - start + variant.sequence.len() + end - variant.end;
            let mut observed = Vec::with_capacity(capacity);
            observed.extend_from_slice(&reference[start..variant.start]);
            observed.extend_from_slice(&variant.sequence);
            observed.extend_from_slice(&reference[variant.end..end]);

            let graph = LcsGraph::fold(
                align(&reference[start..end], &observed),
                Cow::Owned(observed),
                start,
            );

            if graph.distance == 0 {
                return Ok(graph);
            }
            if (graph.supremal.start > start || graph.supremal.start == 0)
                && (graph.supremal.end < end || graph.supremal.end == reference.len())
            {
                return Ok(graph);
            }

            offset *= 2;
        }
    }

    /// The graph for a full observed sequence, built over the window of
    /// influence only (common prefix and suffix are trimmed first).
    pub fn from_observed(reference: &[u8], observed: &[u8]) -> Result<LcsGraph<'static>> {
        if reference == observed {
            return Ok(LcsGraph::fold(align(b"", b""), Cow::Owned(Vec::new()), 0));
        }
        let (prefix, suffix) = trim(reference, observed);
        let variant = Variant::new(
            prefix,
            reference.len() - suffix,
            &observed[prefix..observed.len() - suffix],
        );
        Self::from_variants(reference, std::slice::from_ref(&variant))
    }

    fn fold(mut table: LcsTable, observed: Cow<'a, [u8]>, shift: usize) -> Self {
        let len_ref = table.len_ref;
        let len_obs = table.len_obs;
        let distance = table.distance();

        let mut graph = LcsGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            source: NONE,
            observed,
            distance,
            supremal: Variant::new(shift, shift, Vec::new()),
            local_supremal: Vec::new(),
        };

        for run in &mut table.runs {
            run.row += shift;
        }

        if table.runs.is_empty() || distance == 0 {
            if distance == 0 {
                graph.source = graph.add_node(shift, 0, 0);
                return graph;
            }
            let sink = graph.add_node(shift + len_ref, len_obs, 0);
            let source = graph.add_node(shift, 0, 0);
            graph.push_edge(source, sink);
            graph.source = source;
            extract::decompose(&mut graph);
            return graph;
        }

        let runs = &mut table.runs;
        let buckets = table.buckets.len();

        // Sink: promote the corner-touching run, or synthesize one.
        let last = table.buckets[buckets - 1].tail;
        let tail_stop;
        if runs[last].row + runs[last].length == len_ref + shift
            && runs[last].col + runs[last].length == len_obs
        {
            runs[last].node = graph.add_node(runs[last].row, runs[last].col, runs[last].length);
            runs[last].moved = true;
            tail_stop = last;
        } else {
            graph.add_node(shift + len_ref, len_obs, 0);
            tail_stop = NONE;
        }
        let sink = 0;

        let mut i = table.buckets[buckets - 1].head;
        while i != tail_stop {
            let node = graph.add_node(runs[i].row, runs[i].col, runs[i].length);
            graph.push_edge(node, sink);
            runs[i].node = node;
            i = runs[i].next;
        }

        for i in (1..buckets).rev() {
            let mut j = table.buckets[i].head;
            while j != NONE {
                let next = runs[j].next;
                if runs[j].node == NONE {
                    j = next;
                    continue;
                }

                let mut here = NONE;
                let mut k = table.buckets[i - 1].head;
                while k != NONE {
                    if k >= j
                        || runs[k].row + runs[k].length >= runs[j].row + runs[j].length
                        || runs[k].col + runs[k].length >= runs[j].col + runs[j].length
                    {
                        k = runs[k].next;
                        continue;
                    }

                    here = k;
                    if runs[k].incoming == i {
                        // The head already feeds a deeper level at its full
                        // length: split off the prefix and share the suffix
                        // through a lambda edge.
                        let suffix = runs[k].node;
                        let node = graph.add_node(runs[k].row, runs[k].col, runs[k].length);
                        graph.push_edge(node, runs[j].node);
                        graph.nodes[node].lambda = suffix;
                        runs[k].node = node;
                        runs[k].moved = false;
                        runs[k].incoming = 0;

                        graph.nodes[suffix].row += runs[k].length;
                        graph.nodes[suffix].col += runs[k].length;
                        graph.nodes[suffix].length -= runs[k].length;
                    } else if runs[k].node == NONE {
                        let node = graph.add_node(runs[k].row, runs[k].col, runs[k].length);
                        graph.push_edge(node, runs[j].node);
                        runs[k].node = node;
                    } else if !runs[k].moved || !runs[j].moved {
                        graph.push_edge(runs[k].node, runs[j].node);
                    }
                    k = runs[k].next;
                }

                if runs[j].length > 1 {
                    runs[j].length -= 1;
                    runs[j].moved = true;
                    if here != NONE {
                        runs[j].incoming = i;
                        runs[j].next = runs[here].next;
                        runs[here].next = j;
                    } else {
                        runs[j].next = table.buckets[i - 1].head;
                        table.buckets[i - 1].head = j;
                    }
                }
                j = next;
            }
        }

        // Source: reuse the run anchored at the window origin, or synthesize.
        let mut head = table.buckets[0].head;
        let source;
        if head != NONE
            && runs[head].row == shift
            && runs[head].col == 0
            && runs[head].node != NONE
        {
            source = runs[head].node;
            head = runs[head].next;
        } else {
            source = graph.add_node(shift, 0, 0);
        }
        let source_is_run = graph.nodes[source].length > 0;
        let mut i = head;
        while i != NONE {
            if runs[i].node != NONE && (!source_is_run || !runs[i].moved) {
                graph.push_edge(source, runs[i].node);
            }
            i = runs[i].next;
        }
        graph.source = source;

        debug!(
            "lcs graph: {} nodes, {} edges, distance {}",
            graph.nodes.len(),
            graph.edges.len(),
            graph.distance
        );

        extract::decompose(&mut graph);
        graph
    }

    fn add_node(&mut self, row: usize, col: usize, length: usize) -> usize {
        self.nodes.push(Node {
            row,
            col,
            length,
            edges: NONE,
            lambda: NONE,
        });
        self.nodes.len() - 1
    }

    fn push_edge(&mut self, head: usize, tail: usize) {
        self.edges.push(Edge {
            tail,
            next: self.nodes[head].edges,
        });
        self.nodes[head].edges = self.edges.len() - 1;
    }

    /// The simple edit distance between the aligned sequences.
    pub fn distance(&self) -> usize {
        self.distance
    }

    /// The single variant spanning the union of positions touched by any
    /// minimal alignment. Empty when the sequences agree.
    pub fn supremal(&self) -> &Variant {
        &self.supremal
    }

    /// The unique decomposition of the supremal variant into maximal
    /// independent sub-variants, in reference order.
    pub fn local_supremal(&self) -> &[Variant] {
        &self.local_supremal
    }

    /// The minimal, leftmost-ordered variant list describing the difference.
    pub fn canonical(&self) -> Vec<Variant> {
        extract::canonical(self)
    }

    pub fn observed(&self) -> &[u8] {
        &self.observed
    }

    pub fn source(&self) -> usize {
        self.source
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn is_sink(&self, node: usize) -> bool {
        self.nodes[node].edges == NONE
    }

    pub(crate) fn window_variant(&self, window: EdgeWindow) -> Variant {
        Variant::new(
            window.start,
            window.end,
            &self.observed[window.obs_start..window.obs_end],
        )
    }

    /// Every stored edge with its leftmost implied variant and the number of
    /// equally valid shifted placements.
    pub fn edge_variants(&self) -> Vec<(Variant, usize)> {
        let mut variants = Vec::with_capacity(self.edges.len());
        for (head, node) in self.nodes.iter().enumerate() {
            let mut edge = node.edges;
            while edge != NONE {
                let tail = self.edges[edge].tail;
                let window = edge_window(
                    *node,
                    self.nodes[tail],
                    head == self.source,
                    self.is_sink(tail),
                );
                variants.push((self.window_variant(window), window.count));
                edge = self.edges[edge].next;
            }
        }
        variants
    }

    /// A Graphviz rendering of the graph, for debugging.
    pub fn to_dot(&self) -> String {
        let mut dot = String::new();
        let _ = writeln!(dot, "digraph {{");
        let _ = writeln!(dot, "rankdir=LR");
        let _ = writeln!(dot, "si[label=\"\",shape=none,width=0]");
        let _ = writeln!(dot, "si->s{}", self.source);
        for (index, node) in self.nodes.iter().enumerate() {
            let _ = writeln!(
                dot,
                "s{index}[label=\"({}, {}, {})\"{}]",
                node.row,
                node.col,
                node.length,
                if self.is_sink(index) {
                    ",peripheries=2"
                } else {
                    ""
                }
            );
            if node.lambda != NONE {
                let _ = writeln!(dot, "s{index}->s{}[label=\"&lambda;\",style=dashed]", node.lambda);
            }
            let mut edge = node.edges;
            while edge != NONE {
                let tail = self.edges[edge].tail;
                let window = edge_window(
                    *node,
                    self.nodes[tail],
                    index == self.source,
                    self.is_sink(tail),
                );
                let _ = writeln!(
                    dot,
                    "s{index}->s{tail}[label=\"{}\"]",
                    self.window_variant(window)
                );
                edge = self.edges[edge].next;
            }
        }
        let _ = writeln!(dot, "}}");
        dot
    }
}
