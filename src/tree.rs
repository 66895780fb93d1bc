//! # Search Tree
//!
//! The tree is an arena: nodes live in one `Vec` and refer to each other by
//! [`NodeId`]. A node owns its children through the `children` list, while
//! `parent` is only a back-reference used for backpropagation and for the
//! expansion precondition. Ids stay valid for the lifetime of a tree since
//! nodes are only ever appended during a search. Promoting a child to root
//! builds a new, compact tree from that child's subtree and leaves the old
//! tree to be dropped as a whole.

use std::collections::VecDeque;
use std::fmt::Debug;

/// Index of a node inside its [`SearchTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One position in the tree, reached from its parent by `mv`.
#[derive(Debug, Clone)]
pub struct SearchNode<M> {
    /// The move leading here. `None` only for a root that was never a child.
    pub(crate) mv: Option<M>,
    /// The player who made `mv`.
    pub(crate) player: Option<i32>,
    /// Rollouts that passed through or started at this node.
    pub(crate) visits: u64,
    /// Rollouts among `visits` won by `player`.
    pub(crate) wins: u64,
    /// Whether `children` has been filled. Never reverts.
    pub(crate) expanded: bool,
    /// Playing `mv` wins at once or leaves the opponent without a reply.
    pub(crate) terminal_win: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl<M> SearchNode<M> {
    fn root() -> Self {
        SearchNode {
            mv: None,
            player: None,
            visits: 0,
            wins: 0,
            expanded: false,
            terminal_win: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn mv(&self) -> Option<&M> {
        self.mv.as_ref()
    }

    pub fn player(&self) -> Option<i32> {
        self.player
    }

    pub fn visits(&self) -> u64 {
        self.visits
    }

    pub fn wins(&self) -> u64 {
        self.wins
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_terminal_win(&self) -> bool {
        self.terminal_win
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Fraction of rollouts through this node won by its mover.
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins as f64 / self.visits as f64
        }
    }
}

impl<M: Debug> SearchNode<M> {
    pub fn debug_string(&self) -> String {
        match (&self.mv, self.player) {
            (Some(mv), Some(player)) => format!(
                "p:{}, ({:.3} {}/{}), {} children, {:?}",
                player,
                self.win_rate(),
                self.wins,
                self.visits,
                self.children.len(),
                mv
            ),
            _ => format!(
                "root, ({}/{}), {} children",
                self.wins,
                self.visits,
                self.children.len()
            ),
        }
    }
}

/// Arena-backed MCTS tree.
#[derive(Debug, Clone)]
pub struct SearchTree<M> {
    nodes: Vec<SearchNode<M>>,
    root: NodeId,
}

impl<M> Default for SearchTree<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> SearchTree<M> {
    /// Creates a tree holding a single, unexpanded root.
    pub fn new() -> Self {
        SearchTree {
            nodes: vec![SearchNode::root()],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &SearchNode<M> {
        self.node(self.root)
    }

    pub fn node(&self, id: NodeId) -> &SearchNode<M> {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut SearchNode<M> {
        &mut self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends a child of `parent` reached by `mv`, made by `player`.
    pub(crate) fn add_child(&mut self, parent: NodeId, mv: M, player: i32, terminal_win: bool) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SearchNode {
            mv: Some(mv),
            player: Some(player),
            visits: 0,
            wins: 0,
            expanded: false,
            terminal_win,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Records the result of one rollout on `leaf` and every ancestor up to
    /// and including the root.
    pub fn backpropagate(&mut self, leaf: NodeId, winner: i32) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = &mut self.nodes[id.0];
            node.visits += 1;
            if node.player == Some(winner) {
                node.wins += 1;
            }
            current = node.parent;
        }
    }

    /// Child of `id` with the strictly highest visit count. Ties keep the
    /// earliest child; with no visits at all the first child is returned.
    pub fn most_visited_child(&self, id: NodeId) -> Option<NodeId> {
        let children = self.children(id);
        let mut best = *children.first()?;
        for &child in &children[1..] {
            if self.nodes[child.0].visits > self.nodes[best.0].visits {
                best = child;
            }
        }
        Some(best)
    }

    /// Number of nodes reachable from `id`, `id` included.
    pub fn subtree_size(&self, id: NodeId) -> usize {
        let mut count = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            count += 1;
            stack.extend_from_slice(&self.nodes[current.0].children);
        }
        count
    }

    /// Checks the structural and statistical invariants of every node.
    pub fn validate_invariants(&self) -> Result<(), String> {
        for (index, node) in self.nodes.iter().enumerate() {
            if node.wins > node.visits {
                return Err(format!("node {} has {} wins but {} visits", index, node.wins, node.visits));
            }
            if !node.expanded && !node.children.is_empty() {
                return Err(format!("node {} has children but is not expanded", index));
            }
            for &child in &node.children {
                if self.nodes[child.0].parent != Some(NodeId(index)) {
                    return Err(format!("child {} does not point back to parent {}", child.0, index));
                }
            }
        }
        if self.nodes[self.root.0].parent.is_some() {
            return Err("root has a parent".to_string());
        }
        Ok(())
    }
}

impl<M: Clone + PartialEq> SearchTree<M> {
    /// Child of `id` reached by `mv`.
    pub fn find_child(&self, id: NodeId, mv: &M) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.nodes[child.0].mv.as_ref() == Some(mv))
    }

    /// Builds a new tree rooted at `new_root`, keeping its statistics and its
    /// whole subtree. Everything else stays behind in `self`.
    pub fn promote(&self, new_root: NodeId) -> SearchTree<M> {
        let mut nodes: Vec<SearchNode<M>> = Vec::with_capacity(self.subtree_size(new_root));
        let mut queue = VecDeque::from([(new_root, None)]);

        // Breadth-first keeps every parent's children in their original order.
        while let Some((old_id, parent)) = queue.pop_front() {
            let old = &self.nodes[old_id.0];
            let new_id = NodeId(nodes.len());
            nodes.push(SearchNode {
                mv: old.mv.clone(),
                player: old.player,
                visits: old.visits,
                wins: old.wins,
                expanded: old.expanded,
                terminal_win: old.terminal_win,
                parent,
                children: Vec::with_capacity(old.children.len()),
            });
            if let Some(parent) = parent {
                let parent_node: &mut SearchNode<M> = &mut nodes[parent.0];
                parent_node.children.push(new_id);
            }
            for &child in &old.children {
                queue.push_back((child, Some(new_id)));
            }
        }

        SearchTree { nodes, root: NodeId(0) }
    }
}

impl<M: Debug> SearchTree<M> {
    /// One line per node below `id`, indented by depth, down to `max_depth`.
    pub fn dump(&self, id: NodeId, max_depth: usize) -> String {
        let mut out = String::new();
        let mut stack = vec![(id, 0usize)];
        while let Some((current, depth)) = stack.pop() {
            out.push_str(&"  ".repeat(depth));
            out.push_str(&self.nodes[current.0].debug_string());
            out.push('\n');
            if depth < max_depth {
                for &child in self.nodes[current.0].children.iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }
        out
    }
}
