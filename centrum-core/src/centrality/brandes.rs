//! Brandes dependency accumulation from a single source.
//!
//! The forward pass is a breadth-first search counting shortest paths. The
//! backward pass walks vertices in non-increasing distance and pushes
//! dependencies to their shortest-path predecessors, taken either from lists
//! recorded during the forward pass or from a transposed adjacency.

use std::collections::VecDeque;

use crate::csr::Adjacency;

const UNREACHED: usize = usize::MAX;

/// Per-source scratch buffers, reused across sources to avoid reallocating.
#[derive(Debug)]
pub(crate) struct Workspace {
    distance: Vec<usize>,
    sigma: Vec<f64>,
    delta: Vec<f64>,
    order: Vec<usize>,
    queue: VecDeque<usize>,
    predecessors: Vec<Vec<usize>>,
}

impl Workspace {
    pub(crate) fn new(vertex_count: usize) -> Self {
        Self {
            distance: vec![UNREACHED; vertex_count],
            sigma: vec![0.0; vertex_count],
            delta: vec![0.0; vertex_count],
            order: Vec::with_capacity(vertex_count),
            queue: VecDeque::with_capacity(vertex_count),
            predecessors: vec![Vec::new(); vertex_count],
        }
    }

    /// Clears only the entries touched by the previous source.
    fn reset(&mut self) {
        for &vertex in &self.order {
            self.distance[vertex] = UNREACHED;
            self.sigma[vertex] = 0.0;
            self.delta[vertex] = 0.0;
            self.predecessors[vertex].clear();
        }
        self.order.clear();
        self.queue.clear();
    }
}

/// Adds the dependencies of `source` to `scores`.
///
/// With `endpoints`, the source is credited with every vertex it reaches and
/// each reached vertex counts itself once.
pub(crate) fn accumulate<A: Adjacency + ?Sized>(
    graph: &A,
    source: usize,
    endpoints: bool,
    workspace: &mut Workspace,
    scores: &mut [f64],
) {
    workspace.reset();
    let pull = graph.has_transposed();
    let Workspace {
        distance,
        sigma,
        delta,
        order,
        queue,
        predecessors,
    } = workspace;

    distance[source] = 0;
    sigma[source] = 1.0;
    queue.push_back(source);
    while let Some(vertex) = queue.pop_front() {
        order.push(vertex);
        let next = distance[vertex] + 1;
        for &target in graph.successors(vertex) {
            if distance[target] == UNREACHED {
                distance[target] = next;
                queue.push_back(target);
            }
            if distance[target] == next {
                sigma[target] += sigma[vertex];
                if !pull {
                    predecessors[target].push(vertex);
                }
            }
        }
    }

    for &vertex in order.iter().rev() {
        let coefficient = (1.0 + delta[vertex]) / sigma[vertex];
        if pull {
            let level = distance[vertex];
            for &pred in graph.predecessors(vertex) {
                if distance[pred] != UNREACHED && distance[pred] + 1 == level {
                    delta[pred] += sigma[pred] * coefficient;
                }
            }
        } else {
            for &pred in &predecessors[vertex] {
                delta[pred] += sigma[pred] * coefficient;
            }
        }
        if vertex != source {
            scores[vertex] += if endpoints {
                delta[vertex] + 1.0
            } else {
                delta[vertex]
            };
        }
    }

    if endpoints {
        scores[source] += (order.len() - 1) as f64;
    }
}
