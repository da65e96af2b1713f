//! Red-black tree maintenance for the beach line.
//!
//! Arcs are never compared: positions are given by a neighbouring
//! arc, so insertion attaches the new node as the in-order
//! predecessor or successor and rebalances.
use super::{ArcKey, BeachLine, Color, NIL};

impl BeachLine {
    pub(super) fn minimum(&self, mut node: ArcKey) -> ArcKey {
        while self.arcs[node].left != NIL {
            node = self.arcs[node].left;
        }
        node
    }

    fn maximum(&self, mut node: ArcKey) -> ArcKey {
        while self.arcs[node].right != NIL {
            node = self.arcs[node].right;
        }
        node
    }

    fn is_red(&self, node: ArcKey) -> bool {
        self.arcs[node].color == Color::Red
    }

    /// Put `new` in place of `old`, in the tree as well as in beach
    /// order. `old` is left detached.
    pub(super) fn replace(&mut self, old: ArcKey, new: ArcKey) {
        self.transplant(old, new);
        let old_arc = &self.arcs[old];
        let (left, right, prev, next, color) =
            (old_arc.left, old_arc.right, old_arc.prev, old_arc.next, old_arc.color);

        let arc = &mut self.arcs[new];
        arc.left = left;
        arc.right = right;
        arc.prev = prev;
        arc.next = next;
        arc.color = color;

        if left != NIL {
            self.arcs[left].parent = new;
        }
        if right != NIL {
            self.arcs[right].parent = new;
        }
        if prev != NIL {
            self.arcs[prev].next = new;
        }
        if next != NIL {
            self.arcs[next].prev = new;
        }
    }

    /// Insert `new` immediately left of `node`.
    pub(super) fn insert_before(&mut self, node: ArcKey, new: ArcKey) {
        if self.arcs[node].left == NIL {
            self.arcs[node].left = new;
            self.arcs[new].parent = node;
        } else {
            let pred = self.maximum(self.arcs[node].left);
            self.arcs[pred].right = new;
            self.arcs[new].parent = pred;
        }

        let prev = self.arcs[node].prev;
        self.arcs[new].prev = prev;
        self.arcs[new].next = node;
        if prev != NIL {
            self.arcs[prev].next = new;
        }
        self.arcs[node].prev = new;

        self.insert_fixup(new);
    }

    /// Insert `new` immediately right of `node`.
    pub(super) fn insert_after(&mut self, node: ArcKey, new: ArcKey) {
        if self.arcs[node].right == NIL {
            self.arcs[node].right = new;
            self.arcs[new].parent = node;
        } else {
            let succ = self.minimum(self.arcs[node].right);
            self.arcs[succ].left = new;
            self.arcs[new].parent = succ;
        }

        let next = self.arcs[node].next;
        self.arcs[new].prev = node;
        self.arcs[new].next = next;
        if next != NIL {
            self.arcs[next].prev = new;
        }
        self.arcs[node].next = new;

        self.insert_fixup(new);
    }

    /// Unlink `z` from the tree and from beach order.
    pub(super) fn remove_node(&mut self, z: ArcKey) {
        let mut y = z;
        let mut y_color = self.arcs[y].color;
        let x;
        if self.arcs[z].left == NIL {
            x = self.arcs[z].right;
            self.transplant(z, x);
        } else if self.arcs[z].right == NIL {
            x = self.arcs[z].left;
            self.transplant(z, x);
        } else {
            y = self.minimum(self.arcs[z].right);
            y_color = self.arcs[y].color;
            x = self.arcs[y].right;
            if self.arcs[y].parent == z {
                // `x` may be the sentinel; the fixup needs its parent.
                self.arcs[x].parent = y;
            } else {
                self.transplant(y, x);
                let right = self.arcs[z].right;
                self.arcs[y].right = right;
                self.arcs[right].parent = y;
            }
            self.transplant(z, y);
            let left = self.arcs[z].left;
            self.arcs[y].left = left;
            self.arcs[left].parent = y;
            self.arcs[y].color = self.arcs[z].color;
        }
        if y_color == Color::Black {
            self.remove_fixup(x);
        }

        let (prev, next) = (self.arcs[z].prev, self.arcs[z].next);
        if prev != NIL {
            self.arcs[prev].next = next;
        }
        if next != NIL {
            self.arcs[next].prev = prev;
        }
        self.arcs[NIL].parent = NIL;
    }

    /// Replace the subtree at `u` by the one at `v` in `u`'s parent.
    fn transplant(&mut self, u: ArcKey, v: ArcKey) {
        let parent = self.arcs[u].parent;
        if parent == NIL {
            self.root = v;
        } else if self.arcs[parent].left == u {
            self.arcs[parent].left = v;
        } else {
            self.arcs[parent].right = v;
        }
        self.arcs[v].parent = parent;
    }

    fn insert_fixup(&mut self, mut z: ArcKey) {
        while self.is_red(self.arcs[z].parent) {
            let parent = self.arcs[z].parent;
            let grand = self.arcs[parent].parent;
            if parent == self.arcs[grand].left {
                let uncle = self.arcs[grand].right;
                if self.is_red(uncle) {
                    self.arcs[parent].color = Color::Black;
                    self.arcs[uncle].color = Color::Black;
                    self.arcs[grand].color = Color::Red;
                    z = grand;
                } else {
                    if z == self.arcs[parent].right {
                        z = parent;
                        self.rotate_left(z);
                    }
                    let parent = self.arcs[z].parent;
                    let grand = self.arcs[parent].parent;
                    self.arcs[parent].color = Color::Black;
                    self.arcs[grand].color = Color::Red;
                    self.rotate_right(grand);
                }
            } else {
                let uncle = self.arcs[grand].left;
                if self.is_red(uncle) {
                    self.arcs[parent].color = Color::Black;
                    self.arcs[uncle].color = Color::Black;
                    self.arcs[grand].color = Color::Red;
                    z = grand;
                } else {
                    if z == self.arcs[parent].left {
                        z = parent;
                        self.rotate_right(z);
                    }
                    let parent = self.arcs[z].parent;
                    let grand = self.arcs[parent].parent;
                    self.arcs[parent].color = Color::Black;
                    self.arcs[grand].color = Color::Red;
                    self.rotate_left(grand);
                }
            }
        }
        let root = self.root;
        self.arcs[root].color = Color::Black;
    }

    fn remove_fixup(&mut self, mut x: ArcKey) {
        while x != self.root && !self.is_red(x) {
            let parent = self.arcs[x].parent;
            if x == self.arcs[parent].left {
                let mut w = self.arcs[parent].right;
                if self.is_red(w) {
                    self.arcs[w].color = Color::Black;
                    self.arcs[parent].color = Color::Red;
                    self.rotate_left(parent);
                    w = self.arcs[parent].right;
                }
                if !self.is_red(self.arcs[w].left) && !self.is_red(self.arcs[w].right) {
                    self.arcs[w].color = Color::Red;
                    x = parent;
                } else {
                    if !self.is_red(self.arcs[w].right) {
                        let wl = self.arcs[w].left;
                        self.arcs[wl].color = Color::Black;
                        self.arcs[w].color = Color::Red;
                        self.rotate_right(w);
                        w = self.arcs[parent].right;
                    }
                    self.arcs[w].color = self.arcs[parent].color;
                    self.arcs[parent].color = Color::Black;
                    let wr = self.arcs[w].right;
                    self.arcs[wr].color = Color::Black;
                    self.rotate_left(parent);
                    x = self.root;
                }
            } else {
                let mut w = self.arcs[parent].left;
                if self.is_red(w) {
                    self.arcs[w].color = Color::Black;
                    self.arcs[parent].color = Color::Red;
                    self.rotate_right(parent);
                    w = self.arcs[parent].left;
                }
                if !self.is_red(self.arcs[w].left) && !self.is_red(self.arcs[w].right) {
                    self.arcs[w].color = Color::Red;
                    x = parent;
                } else {
                    if !self.is_red(self.arcs[w].left) {
                        let wr = self.arcs[w].right;
                        self.arcs[wr].color = Color::Black;
                        self.arcs[w].color = Color::Red;
                        self.rotate_left(w);
                        w = self.arcs[parent].left;
                    }
                    self.arcs[w].color = self.arcs[parent].color;
                    self.arcs[parent].color = Color::Black;
                    let wl = self.arcs[w].left;
                    self.arcs[wl].color = Color::Black;
                    self.rotate_right(parent);
                    x = self.root;
                }
            }
        }
        self.arcs[x].color = Color::Black;
    }

    fn rotate_left(&mut self, x: ArcKey) {
        let y = self.arcs[x].right;
        let yl = self.arcs[y].left;
        self.arcs[x].right = yl;
        if yl != NIL {
            self.arcs[yl].parent = x;
        }
        self.transplant(x, y);
        self.arcs[y].left = x;
        self.arcs[x].parent = y;
    }

    fn rotate_right(&mut self, x: ArcKey) {
        let y = self.arcs[x].left;
        let yr = self.arcs[y].right;
        self.arcs[x].left = yr;
        if yr != NIL {
            self.arcs[yr].parent = x;
        }
        self.transplant(x, y);
        self.arcs[y].right = x;
        self.arcs[x].parent = y;
    }

    /// Check the red-black properties and that in-order traversal
    /// agrees with the beach order links. Returns the arcs in order.
    #[cfg(test)]
    pub(super) fn check_invariants(&self) -> Vec<ArcKey> {
        fn walk(tree: &BeachLine, node: ArcKey, out: &mut Vec<ArcKey>) -> usize {
            if node == NIL {
                return 1;
            }
            let arc = &tree.arcs[node];
            for child in [arc.left, arc.right] {
                if child != NIL {
                    assert_eq!(tree.arcs[child].parent, node);
                    if arc.color == Color::Red {
                        assert!(!tree.is_red(child), "red node {} has a red child", node);
                    }
                }
            }
            let left = walk(tree, arc.left, out);
            out.push(node);
            let right = walk(tree, arc.right, out);
            assert_eq!(left, right, "unequal black heights below {}", node);
            left + usize::from(arc.color == Color::Black)
        }

        assert_eq!(self.arcs[NIL].color, Color::Black);
        assert!(!self.is_red(self.root));
        let mut in_order = vec![];
        walk(self, self.root, &mut in_order);
        let listed: Vec<_> = self.iter().collect();
        assert_eq!(in_order, listed);
        for pair in listed.windows(2) {
            assert_eq!(self.arcs[pair[1]].prev, pair[0]);
        }
        assert_eq!(listed.len(), self.len());
        in_order
    }
}
