//! Scene graph: a declarative description and its realized tree
//!
//! Assembly code only records `(name, parent, primitive, material, transform)`
//! through [`SceneBuilder`]. [`SceneGraph::realize`] validates every record and
//! tessellates the meshes, so a malformed description fails before anything is
//! drawn and the assembly can be tested without a renderer.

use nalgebra::Matrix4;
use std::collections::HashSet;
use tracing::debug;

use crate::error::{Result, SceneError};
use crate::geometry::Mesh;
use crate::material::{Material, MaterialId};
use crate::primitives::Primitive;

/// Index of a node inside a description or a realized graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// One entry of a scene description
#[derive(Debug, Clone)]
pub struct NodeRecord {
    pub name: String,
    pub parent: Option<NodeId>,
    /// Geometry and material for mesh nodes, `None` for groups
    pub mesh: Option<(Primitive, MaterialId)>,
    /// Placement relative to the parent
    pub transform: Matrix4<f32>,
}

/// Flat, renderer-free description of a scene
#[derive(Debug, Clone, Default)]
pub struct SceneDescription {
    pub materials: Vec<Material>,
    pub records: Vec<NodeRecord>,
}

/// Records nodes in dependency order; ids are handed out as nodes are added
pub struct SceneBuilder {
    description: SceneDescription,
}

impl SceneBuilder {
    /// Start a description whose first record is the root group
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = NodeRecord {
            name: root_name.into(),
            parent: None,
            mesh: None,
            transform: Matrix4::identity(),
        };
        Self {
            description: SceneDescription {
                materials: Vec::new(),
                records: vec![root],
            },
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn material(&mut self, material: Material) -> MaterialId {
        self.description.materials.push(material);
        MaterialId(self.description.materials.len() - 1)
    }

    /// Add an empty group node
    pub fn group(
        &mut self,
        name: impl Into<String>,
        parent: NodeId,
        transform: Matrix4<f32>,
    ) -> NodeId {
        self.push(NodeRecord {
            name: name.into(),
            parent: Some(parent),
            mesh: None,
            transform,
        })
    }

    /// Add a node carrying geometry
    pub fn mesh(
        &mut self,
        name: impl Into<String>,
        parent: NodeId,
        primitive: Primitive,
        material: MaterialId,
        transform: Matrix4<f32>,
    ) -> NodeId {
        self.push(NodeRecord {
            name: name.into(),
            parent: Some(parent),
            mesh: Some((primitive, material)),
            transform,
        })
    }

    pub fn build(self) -> SceneDescription {
        self.description
    }

    fn push(&mut self, record: NodeRecord) -> NodeId {
        self.description.records.push(record);
        NodeId(self.description.records.len() - 1)
    }
}

/// Geometry attached to a realized node
#[derive(Debug, Clone)]
pub struct MeshInstance {
    pub primitive: Primitive,
    pub mesh: Mesh,
    pub material: MaterialId,
}

/// A realized scene node
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Transform relative to the parent
    pub local: Matrix4<f32>,
    pub mesh: Option<MeshInstance>,
}

/// Tree of nodes; parents always precede their children
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    materials: Vec<Material>,
}

impl SceneGraph {
    /// Validate a description and tessellate its meshes
    pub fn realize(description: &SceneDescription) -> Result<Self> {
        let mut nodes: Vec<Node> = Vec::with_capacity(description.records.len());
        let mut names = HashSet::new();

        for (index, record) in description.records.iter().enumerate() {
            if !names.insert(record.name.as_str()) {
                return Err(SceneError::DuplicateName(record.name.clone()));
            }

            match record.parent {
                None if index != 0 => return Err(SceneError::DetachedNode(record.name.clone())),
                Some(NodeId(parent)) if index == 0 || parent >= index => {
                    return Err(SceneError::UnknownParent {
                        node: record.name.clone(),
                        parent,
                    })
                }
                _ => {}
            }

            let mesh = match &record.mesh {
                Some((primitive, material)) => {
                    if material.0 >= description.materials.len() {
                        return Err(SceneError::UnknownMaterial {
                            node: record.name.clone(),
                            material: material.0,
                        });
                    }
                    Some(MeshInstance {
                        primitive: primitive.clone(),
                        mesh: primitive.tessellate()?,
                        material: *material,
                    })
                }
                None => None,
            };

            if let Some(parent) = record.parent {
                nodes[parent.0].children.push(NodeId(index));
            }
            nodes.push(Node {
                name: record.name.clone(),
                parent: record.parent,
                children: Vec::new(),
                local: record.transform,
                mesh,
            });
        }

        let graph = Self {
            nodes,
            materials: description.materials.clone(),
        };
        debug!(
            nodes = graph.len(),
            meshes = graph.mesh_count(),
            triangles = graph.triangle_count(),
            "realized scene graph"
        );
        Ok(graph)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    /// Like [`find`](Self::find), for nodes the assembler guarantees
    pub fn require(&self, name: &str) -> Result<NodeId> {
        self.find(name)
            .ok_or_else(|| SceneError::MissingNode(name.to_string()))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn local(&self, id: NodeId) -> &Matrix4<f32> {
        &self.nodes[id.0].local
    }

    /// Transform in the node's own frame: `local * transform`
    pub fn apply_local(&mut self, id: NodeId, transform: &Matrix4<f32>) {
        let node = &mut self.nodes[id.0];
        node.local = node.local * transform;
    }

    /// Transform in the parent's frame: `transform * local`
    pub fn apply_parent(&mut self, id: NodeId, transform: &Matrix4<f32>) {
        let node = &mut self.nodes[id.0];
        node.local = transform * node.local;
    }

    /// Product of the local transforms from the root down to `id`
    pub fn world_transform(&self, id: NodeId) -> Matrix4<f32> {
        let mut world = self.nodes[id.0].local;
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            world = self.nodes[parent.0].local * world;
            current = self.nodes[parent.0].parent;
        }
        world
    }

    /// World transform of every node, indexed like the nodes
    pub fn world_transforms(&self) -> Vec<Matrix4<f32>> {
        let mut worlds: Vec<Matrix4<f32>> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let world = match node.parent {
                Some(parent) => worlds[parent.0] * node.local,
                None => node.local,
            };
            worlds.push(world);
        }
        worlds
    }

    /// Mesh nodes with their world transforms
    pub fn mesh_instances(
        &self,
    ) -> impl Iterator<Item = (NodeId, &MeshInstance, Matrix4<f32>)> + '_ {
        let worlds = self.world_transforms();
        self.nodes.iter().enumerate().filter_map(move |(i, node)| {
            node.mesh.as_ref().map(|mesh| (NodeId(i), mesh, worlds[i]))
        })
    }

    pub fn mesh_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.mesh.is_some()).count()
    }

    pub fn triangle_count(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(|n| n.mesh.as_ref())
            .map(|m| m.mesh.triangle_count())
            .sum()
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }

    pub fn set_wireframe(&mut self, enabled: bool) {
        for material in &mut self.materials {
            material.wireframe = enabled;
        }
    }
}
