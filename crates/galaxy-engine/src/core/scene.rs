use glam::{EulerRot, Mat4, Quat, Vec3};
use crate::components::mesh::{Color, MeshComponent};

/// Index of a node in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// What a node contributes to the frame.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Invisible transform, used for orbital pivots.
    Group,
    Mesh(MeshComponent),
    /// The galaxy point cloud. Points live in the renderer-side buffer.
    Points,
    AmbientLight { color: Color, intensity: f32 },
    PointLight { color: Color, intensity: f32, range: f32, decay: f32 },
}

/// A scene node: local transform plus hierarchy links.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    /// Name for lookups and resource labels.
    pub tag: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    pub scale: Vec3,
    pub kind: NodeKind,
    pub visible: bool,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: NodeId(0),
            tag: String::new(),
            parent: None,
            children: Vec::new(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            kind,
            visible: true,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn local_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }

    pub fn mesh(&self) -> Option<&MeshComponent> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn mesh_mut(&mut self) -> Option<&mut MeshComponent> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }
}

/// Flat node storage with parent/child links.
/// Node ids are dense indices; nodes are never removed individually,
/// the whole graph is dropped on unmount.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self { nodes: Vec::with_capacity(16) }
    }

    /// Add a root node.
    pub fn spawn(&mut self, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        node.id = id;
        node.parent = None;
        self.nodes.push(node);
        id
    }

    /// Add a node under `parent`. Falls back to a root if the parent is unknown.
    pub fn spawn_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.spawn(node);
        if let Some(p) = self.nodes.get_mut(parent.0 as usize) {
            p.children.push(id);
            self.nodes[id.0 as usize].parent = Some(parent);
        }
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Find the first node with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.tag == tag).map(|n| n.id)
    }

    /// Compose local matrices from the root down to `id`.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut cursor = self.get(id);
        while let Some(node) = cursor {
            matrix = node.local_matrix() * matrix;
            cursor = node.parent.and_then(|p| self.get(p));
        }
        matrix
    }

    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).transform_point3(Vec3::ZERO)
    }

    /// Largest world-space scale factor on any axis.
    pub fn world_max_scale(&self, id: NodeId) -> f32 {
        let (scale, _, _) = self.world_matrix(id).to_scale_rotation_translation();
        scale.max_element()
    }

    /// Visible only if the node and all its ancestors are.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut cursor = self.get(id);
        while let Some(node) = cursor {
            if !node.visible {
                return false;
            }
            cursor = node.parent.and_then(|p| self.get(p));
        }
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}
