//! RecencyList: intrusive doubly-linked list over slot indices.
//!
//! The list owns only `head` and `tail`. The prev/next links live inside
//! the slots themselves and are reached through the `Links` trait, so no
//! node is ever allocated or freed: a slot index is the node handle.
//!
//! Order is most recent at `head`, least recent at `tail`.

/// Access to the per-slot prev/next fields the list threads through.
pub(crate) trait Links {
    fn prev(&self, idx: usize) -> Option<usize>;
    fn next(&self, idx: usize) -> Option<usize>;
    fn set_prev(&mut self, idx: usize, to: Option<usize>);
    fn set_next(&mut self, idx: usize, to: Option<usize>);
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RecencyList {
    head: Option<usize>,
    tail: Option<usize>,
}

impl RecencyList {
    pub(crate) const fn new() -> Self {
        Self {
            head: None,
            tail: None,
        }
    }

    #[inline]
    pub(crate) fn peek_head(&self) -> Option<usize> {
        self.head
    }

    #[inline]
    pub(crate) fn peek_tail(&self) -> Option<usize> {
        self.tail
    }

    /// Link a node that is not currently in the list at the head.
    pub(crate) fn push_front<L: Links + ?Sized>(&mut self, links: &mut L, idx: usize) {
        links.set_prev(idx, None);
        links.set_next(idx, self.head);
        match self.head {
            Some(old) => links.set_prev(old, Some(idx)),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    /// Detach `idx`, patching its neighbours and the ends of the list.
    pub(crate) fn unlink<L: Links + ?Sized>(&mut self, links: &mut L, idx: usize) {
        let p = links.prev(idx);
        let n = links.next(idx);
        match p {
            Some(p) => links.set_next(p, n),
            None => self.head = n,
        }
        match n {
            Some(n) => links.set_prev(n, p),
            None => self.tail = p,
        }
        links.set_prev(idx, None);
        links.set_next(idx, None);
    }

    pub(crate) fn move_to_front<L: Links + ?Sized>(&mut self, links: &mut L, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(links, idx);
        self.push_front(links, idx);
    }

    /// Walk from head to tail.
    pub(crate) fn iter<'a, L: Links + ?Sized>(&self, links: &'a L) -> Walk<'a, L> {
        Walk {
            links,
            cursor: self.head,
        }
    }
}

/// Iterator over slot indices from most to least recent.
pub(crate) struct Walk<'a, L: ?Sized> {
    links: &'a L,
    cursor: Option<usize>,
}

impl<'a, L: Links + ?Sized> Iterator for Walk<'a, L> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        let idx = self.cursor?;
        self.cursor = self.links.next(idx);
        Some(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Plain link storage so the list can be tested without a slot array.
    struct VecLinks {
        prev: Vec<Option<usize>>,
        next: Vec<Option<usize>>,
    }

    impl VecLinks {
        fn new(n: usize) -> Self {
            Self {
                prev: vec![None; n],
                next: vec![None; n],
            }
        }
    }

    impl Links for VecLinks {
        fn prev(&self, idx: usize) -> Option<usize> {
            self.prev[idx]
        }
        fn next(&self, idx: usize) -> Option<usize> {
            self.next[idx]
        }
        fn set_prev(&mut self, idx: usize, to: Option<usize>) {
            self.prev[idx] = to;
        }
        fn set_next(&mut self, idx: usize, to: Option<usize>) {
            self.next[idx] = to;
        }
    }

    fn order(list: &RecencyList, links: &VecLinks) -> Vec<usize> {
        list.iter(links).collect()
    }

    /// Reverse walk from tail must mirror the forward walk.
    fn assert_symmetric(list: &RecencyList, links: &VecLinks) {
        let fwd = order(list, links);
        let mut back = Vec::new();
        let mut cur = list.peek_tail();
        while let Some(i) = cur {
            back.push(i);
            cur = links.prev(i);
        }
        back.reverse();
        assert_eq!(fwd, back);
    }

    #[test]
    fn empty_list_has_no_ends() {
        let list = RecencyList::new();
        let links = VecLinks::new(4);
        assert_eq!(list.peek_head(), None);
        assert_eq!(list.peek_tail(), None);
        assert!(order(&list, &links).is_empty());
    }

    /// Invariant: a single pushed node is both head and tail.
    #[test]
    fn push_into_empty_sets_both_ends() {
        let mut list = RecencyList::new();
        let mut links = VecLinks::new(4);
        list.push_front(&mut links, 2);
        assert_eq!(list.peek_head(), Some(2));
        assert_eq!(list.peek_tail(), Some(2));
    }

    #[test]
    fn push_front_orders_most_recent_first() {
        let mut list = RecencyList::new();
        let mut links = VecLinks::new(4);
        for i in [0, 1, 2, 3] {
            list.push_front(&mut links, i);
        }
        assert_eq!(order(&list, &links), vec![3, 2, 1, 0]);
        assert_eq!(list.peek_tail(), Some(0));
        assert_symmetric(&list, &links);
    }

    /// Invariant: moving the tail to the front advances the tail to its
    /// neighbour; moving the head is a no-op.
    #[test]
    fn move_to_front_from_tail_middle_and_head() {
        let mut list = RecencyList::new();
        let mut links = VecLinks::new(4);
        for i in [0, 1, 2, 3] {
            list.push_front(&mut links, i);
        }
        list.move_to_front(&mut links, 0);
        assert_eq!(order(&list, &links), vec![0, 3, 2, 1]);
        assert_eq!(list.peek_tail(), Some(1));

        list.move_to_front(&mut links, 2);
        assert_eq!(order(&list, &links), vec![2, 0, 3, 1]);

        list.move_to_front(&mut links, 2);
        assert_eq!(order(&list, &links), vec![2, 0, 3, 1]);
        assert_symmetric(&list, &links);
    }

    #[test]
    fn unlink_head_tail_and_middle() {
        let mut list = RecencyList::new();
        let mut links = VecLinks::new(5);
        for i in [0, 1, 2, 3, 4] {
            list.push_front(&mut links, i);
        }
        list.unlink(&mut links, 4);
        assert_eq!(list.peek_head(), Some(3));
        list.unlink(&mut links, 0);
        assert_eq!(list.peek_tail(), Some(1));
        list.unlink(&mut links, 2);
        assert_eq!(order(&list, &links), vec![3, 1]);
        assert_symmetric(&list, &links);
        assert_eq!(links.prev(2), None);
        assert_eq!(links.next(2), None);
    }

    /// Invariant: unlinking the only node empties the list.
    #[test]
    fn unlink_sole_node_empties_list() {
        let mut list = RecencyList::new();
        let mut links = VecLinks::new(2);
        list.push_front(&mut links, 1);
        list.unlink(&mut links, 1);
        assert_eq!(list, RecencyList::new());

        // And it can be reused afterwards.
        list.push_front(&mut links, 0);
        assert_eq!(order(&list, &links), vec![0]);
    }
}
