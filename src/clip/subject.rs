//! The subject sequence: the input geometry's vertices as a circular list,
//! augmented in place with the boundary-crossing vertices the clipper
//! discovers. Lives for exactly one clip call.

use super::list::CircularList;
use crate::maths::Pt;

#[derive(Debug, Clone, Copy)]
pub(crate) enum VertexKind {
    /// A vertex of the original input geometry.
    Original,
    /// A synthetic vertex where the subject crosses the region boundary.
    /// `twin` is the index of its counterpart in the boundary sequence.
    Crossing {
        twin: usize,
        entry: bool,
        visited: bool,
    },
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Vertex {
    pub pt: Pt,
    pub kind: VertexKind,
}

pub(crate) struct Subject {
    list: CircularList<Vertex>,
}

impl Subject {
    /// Seeds the sequence with the original vertices, in order. The vertex at
    /// input position `i` receives list index `i`.
    pub fn from_points(points: &[Pt]) -> Subject {
        let mut list = CircularList::new();
        for &pt in points {
            list.push_back(Vertex {
                pt,
                kind: VertexKind::Original,
            });
        }
        Subject { list }
    }

    /// Splices a crossing vertex in directly after `after`. The boundary twin
    /// is linked up later, once the boundary sequence exists.
    pub fn insert_crossing_after(&mut self, after: usize, pt: Pt, entry: bool) -> usize {
        self.list.insert_after(
            after,
            Vertex {
                pt,
                kind: VertexKind::Crossing {
                    twin: usize::MAX,
                    entry,
                    visited: false,
                },
            },
        )
    }

    pub fn set_twin(&mut self, idx: usize, twin_idx: usize) {
        if let VertexKind::Crossing { twin, .. } = &mut self.list.get_mut(idx).kind {
            *twin = twin_idx;
        }
    }

    pub fn vertex(&self, idx: usize) -> &Vertex {
        self.list.get(idx)
    }

    pub fn next(&self, idx: usize) -> usize {
        self.list.next(idx)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn sequence(&self) -> Vec<usize> {
        self.list.sequence()
    }

    pub fn mark_visited(&mut self, idx: usize) {
        if let VertexKind::Crossing { visited, .. } = &mut self.list.get_mut(idx).kind {
            *visited = true;
        }
    }

    pub fn is_unvisited_entry(&self, idx: usize) -> bool {
        matches!(
            self.list.get(idx).kind,
            VertexKind::Crossing {
                entry: true,
                visited: false,
                ..
            }
        )
    }
}
