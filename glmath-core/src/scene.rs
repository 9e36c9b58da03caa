/// Hierarchical scene transforms.
///
/// Nodes live in a flat arena and refer to their parent by index, so there
/// are no reference cycles and no `Rc`. A child can only be added after its
/// parent, which keeps the arena in topological order: one forward pass over
/// the nodes recomputes every world matrix top-down.
///
/// World matrices compose as `child_world = parent_world * child_local`.

use crate::error::{Error, Result};
use crate::matrix::Mat4;
use crate::transform::Transform;
use tracing::trace;

/// Index of a node inside a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    local: Transform,
    world: Mat4,
}

/// Arena of transform nodes with cached world matrices.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_root(&mut self, local: Transform) -> NodeId {
        self.push(None, local)
    }

    /// Adds a node under `parent`. Its world matrix is valid immediately.
    pub fn add_child(&mut self, parent: NodeId, local: Transform) -> Result<NodeId> {
        self.node(parent)?;
        Ok(self.push(Some(parent), local))
    }

    fn push(&mut self, parent: Option<NodeId>, local: Transform) -> NodeId {
        let parent_world = parent.map_or(Mat4::IDENTITY, |p| self.nodes[p.0].world);
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            local,
            world: parent_world * local.matrix(),
        });
        id
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id.0)
            .ok_or(Error::UnknownNode { index: id.0 })
    }

    /// Replaces a node's local transform.
    ///
    /// World matrices of the node and its descendants are stale until the
    /// next [`SceneGraph::update`].
    pub fn set_local(&mut self, id: NodeId, local: Transform) -> Result<()> {
        let node = self
            .nodes
            .get_mut(id.0)
            .ok_or(Error::UnknownNode { index: id.0 })?;
        node.local = local;
        Ok(())
    }

    pub fn local(&self, id: NodeId) -> Result<Transform> {
        Ok(self.node(id)?.local)
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.parent == Some(id))
            .map(|(i, _)| NodeId(i))
    }

    /// World matrix as of the last [`SceneGraph::update`].
    pub fn world(&self, id: NodeId) -> Result<Mat4> {
        Ok(self.node(id)?.world)
    }

    /// Recomputes every world matrix, parents before children.
    pub fn update(&mut self) {
        for i in 0..self.nodes.len() {
            let parent_world = match self.nodes[i].parent {
                Some(p) => self.nodes[p.0].world,
                None => Mat4::IDENTITY,
            };
            let node = &mut self.nodes[i];
            node.world = parent_world * node.local.matrix();
        }
        trace!(nodes = self.nodes.len(), "scene world matrices updated");
    }

    /// Inverse-transpose of the node's world matrix, computed fresh.
    pub fn normal_matrix(&self, id: NodeId) -> Result<Mat4> {
        self.world(id)?.normal_matrix()
    }

    /// Nodes in update order with their world matrices.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Mat4)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i), &n.world))
    }
}
