//! Compressed sparse row adjacency shared by both engines.

/// Read access to a dense-indexed adjacency structure.
pub(crate) trait Adjacency: Sync {
    /// Number of vertices in the dense index range.
    fn vertex_count(&self) -> usize;

    /// Out-neighbours of `vertex`.
    fn successors(&self, vertex: usize) -> &[usize];

    /// Whether [`Adjacency::predecessors`] is backed by a transposed
    /// adjacency.
    fn has_transposed(&self) -> bool {
        false
    }

    /// In-neighbours of `vertex`; empty unless a transposed adjacency is
    /// stored.
    fn predecessors(&self, _vertex: usize) -> &[usize] {
        &[]
    }
}

/// Rows `row_start..row_start + rows` of an adjacency matrix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Csr {
    row_start: usize,
    offsets: Vec<usize>,
    targets: Vec<usize>,
}

impl Csr {
    /// Builds the rows covering `row_start..row_start + rows` from `arcs`.
    ///
    /// Arcs whose source falls outside the covered rows are ignored. Targets
    /// within a row are sorted and deduplicated.
    pub(crate) fn build(row_start: usize, rows: usize, mut arcs: Vec<(usize, usize)>) -> Self {
        let row_end = row_start + rows;
        arcs.retain(|&(source, _)| source >= row_start && source < row_end);
        arcs.sort_unstable();
        arcs.dedup();

        let mut offsets = vec![0_usize; rows + 1];
        for &(source, _) in &arcs {
            offsets[source - row_start + 1] += 1;
        }
        for row in 0..rows {
            offsets[row + 1] += offsets[row];
        }
        let targets = arcs.into_iter().map(|(_, target)| target).collect();
        Self {
            row_start,
            offsets,
            targets,
        }
    }

    /// Targets of the global row `vertex`; empty when the row is not covered.
    pub(crate) fn row(&self, vertex: usize) -> &[usize] {
        let Some(local) = vertex.checked_sub(self.row_start) else {
            return &[];
        };
        match (self.offsets.get(local), self.offsets.get(local + 1)) {
            (Some(&start), Some(&end)) => self.targets.get(start..end).unwrap_or(&[]),
            _ => &[],
        }
    }

    pub(crate) fn arc_count(&self) -> usize {
        self.targets.len()
    }
}
