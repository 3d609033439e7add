//! Index-arena circular list backing the clip sequences.
//!
//! Nodes live in a `Vec` and link to each other by index, so splicing a new
//! vertex after an existing one is O(1) and there is no pointer-based
//! ownership cycle to manage. The list is circular: the tail links back to
//! the first node pushed.

pub(crate) struct CircularList<T> {
    nodes: Vec<Node<T>>,
    tail: usize,
}

struct Node<T> {
    value: T,
    next: usize,
}

impl<T> CircularList<T> {
    pub fn new() -> Self {
        CircularList {
            nodes: Vec::new(),
            tail: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Appends a node at the end of the sequence and returns its index.
    pub fn push_back(&mut self, value: T) -> usize {
        let idx = self.nodes.len();
        if idx == 0 {
            self.nodes.push(Node { value, next: 0 });
        } else {
            // New tail wraps around to the head.
            self.nodes.push(Node { value, next: 0 });
            self.nodes[self.tail].next = idx;
        }
        self.tail = idx;
        idx
    }

    /// Splices a node in immediately after `after`, preserving the relative
    /// order of everything else. Returns the new node's index.
    pub fn insert_after(&mut self, after: usize, value: T) -> usize {
        let idx = self.nodes.len();
        let next = self.nodes[after].next;
        self.nodes.push(Node { value, next });
        self.nodes[after].next = idx;
        if after == self.tail {
            self.tail = idx;
        }
        idx
    }

    pub fn get(&self, idx: usize) -> &T {
        &self.nodes[idx].value
    }

    pub fn get_mut(&mut self, idx: usize) -> &mut T {
        &mut self.nodes[idx].value
    }

    /// The index following `idx`, wrapping from the tail to the head.
    pub fn next(&self, idx: usize) -> usize {
        self.nodes[idx].next
    }

    /// Snapshot of the current sequence order, head first. Nodes inserted
    /// after the snapshot is taken are not part of it, which is what lets a
    /// single pass insert ahead of itself without revisiting its insertions.
    pub fn sequence(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        if self.nodes.is_empty() {
            return order;
        }
        let mut idx = 0;
        for _ in 0..self.nodes.len() {
            order.push(idx);
            idx = self.nodes[idx].next;
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_wrap() {
        let mut list = CircularList::new();
        let a = list.push_back('a');
        let b = list.push_back('b');
        let c = list.push_back('c');
        assert_eq!(list.next(a), b);
        assert_eq!(list.next(b), c);
        assert_eq!(list.next(c), a);
        assert_eq!(list.sequence(), vec![a, b, c]);
    }

    #[test]
    fn insert_after_preserves_order() {
        let mut list = CircularList::new();
        let a = list.push_back('a');
        let b = list.push_back('b');
        let x = list.insert_after(a, 'x');
        assert_eq!(list.next(a), x);
        assert_eq!(list.next(x), b);
        let order: Vec<char> = list.sequence().iter().map(|&i| *list.get(i)).collect();
        assert_eq!(order, vec!['a', 'x', 'b']);
    }

    #[test]
    fn insert_after_tail_keeps_wraparound() {
        let mut list = CircularList::new();
        let a = list.push_back('a');
        let b = list.push_back('b');
        let x = list.insert_after(b, 'x');
        assert_eq!(list.next(x), a);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn snapshot_skips_later_insertions() {
        let mut list = CircularList::new();
        let a = list.push_back('a');
        list.push_back('b');
        let snapshot = list.sequence();
        list.insert_after(a, 'x');
        assert_eq!(snapshot.len(), 2);
    }
}
