//! Scene graph: an arena of spatial nodes plus the geometry and material tables
//! those nodes reference.
//!
//! Node kinds are a closed enum so traversals (rendering, disposal) match on the
//! variant they care about instead of probing types at runtime. World matrices
//! are only recomputed on request via [`SceneGraph::update_world`].

use crate::bounds::Aabb;
use crate::color::hex_to_linear;
use fnv::FnvHashMap;
use glam::{EulerRot, Mat4, Quat, Vec3};
use smallvec::{smallvec, SmallVec};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(u32);

/// Local translation, rotation and scale, composed as `T * R * S`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn with_euler(mut self, euler: Vec3) -> Self {
        self.set_euler(euler);
        self
    }

    /// Set rotation from XYZ Euler angles (radians).
    pub fn set_euler(&mut self, euler: Vec3) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z);
    }

    pub fn euler(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Index range of a geometry drawn with one entry of the mesh's material list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawGroup {
    pub start: u32,
    pub count: u32,
    pub material_index: u32,
}

#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    /// Empty means a single range over all indices using material 0.
    pub groups: SmallVec<[DrawGroup; 1]>,
}

impl Geometry {
    /// `width` x `height` plane in the XY plane, facing +Z, centred on the origin.
    pub fn plane(width: f32, height: f32) -> Self {
        let (hw, hh) = (width * 0.5, height * 0.5);
        Self {
            positions: vec![
                [-hw, -hh, 0.0],
                [hw, -hh, 0.0],
                [hw, hh, 0.0],
                [-hw, hh, 0.0],
            ],
            normals: vec![[0.0, 0.0, 1.0]; 4],
            indices: vec![0, 1, 2, 0, 2, 3],
            groups: SmallVec::new(),
        }
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.positions.iter().map(|p| Vec3::from_array(*p)))
    }

    pub fn draw_groups(&self) -> SmallVec<[DrawGroup; 1]> {
        if self.groups.is_empty() {
            smallvec![DrawGroup {
                start: 0,
                count: self.indices.len() as u32,
                material_index: 0,
            }]
        } else {
            self.groups.clone()
        }
    }

    /// Area-weighted vertex normals from the triangle list.
    pub fn compute_normals(&mut self) {
        let n_verts = self.positions.len();
        let mut acc = vec![Vec3::ZERO; n_verts];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            if a >= n_verts || b >= n_verts || c >= n_verts {
                continue;
            }
            let pa = Vec3::from_array(self.positions[a]);
            let pb = Vec3::from_array(self.positions[b]);
            let pc = Vec3::from_array(self.positions[c]);
            let n = (pb - pa).cross(pc - pa);
            acc[a] += n;
            acc[b] += n;
            acc[c] += n;
        }
        self.normals = acc
            .into_iter()
            .map(|n| n.normalize_or_zero().to_array())
            .collect();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: Option<String>,
    /// Linear RGB.
    pub color: Vec3,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: None,
            color: Vec3::ONE,
            roughness: 1.0,
            metalness: 0.0,
            opacity: 1.0,
            transparent: false,
            double_sided: false,
        }
    }
}

impl Material {
    pub fn standard(hex: u32, roughness: f32, metalness: f32) -> Self {
        Self {
            color: hex_to_linear(hex),
            roughness,
            metalness,
            ..Self::default()
        }
    }

    pub fn translucent(mut self, opacity: f32) -> Self {
        self.transparent = true;
        self.opacity = opacity;
        self
    }
}

/// A mesh's material: one for the whole geometry, or one per draw group.
#[derive(Clone, Debug, PartialEq)]
pub enum Materials {
    Single(MaterialId),
    Multi(SmallVec<[MaterialId; 4]>),
}

impl Materials {
    pub fn iter(&self) -> impl Iterator<Item = MaterialId> + '_ {
        let slice: &[MaterialId] = match self {
            Materials::Single(id) => std::slice::from_ref(id),
            Materials::Multi(ids) => ids.as_slice(),
        };
        slice.iter().copied()
    }

    pub fn get(&self, index: u32) -> Option<MaterialId> {
        match self {
            Materials::Single(id) => Some(*id),
            Materials::Multi(ids) => ids.get(index as usize).copied(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Materials::Single(_) => 1,
            Materials::Multi(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug)]
pub struct Mesh {
    pub geometry: GeometryId,
    pub materials: Materials,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

#[derive(Clone, Debug)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowParams {
    pub map_size: u32,
    pub radius: f32,
    pub bias: f32,
    pub normal_bias: f32,
    pub near: f32,
    pub far: f32,
}

/// Cone light aimed at a separate `Target` node.
#[derive(Clone, Debug)]
pub struct SpotLight {
    pub color: Vec3,
    pub intensity: f32,
    /// Half-angle of the cone, radians.
    pub angle: f32,
    pub penumbra: f32,
    pub decay: f32,
    /// Range cut-off; 0 means unbounded.
    pub distance: f32,
    pub cast_shadow: bool,
    pub shadow: ShadowParams,
    pub target: NodeId,
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Group,
    Mesh(Mesh),
    Ambient(AmbientLight),
    Spot(SpotLight),
    /// Aim point for a spotlight.
    Target,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: Option<String>,
    pub kind: NodeKind,
    pub transform: Transform,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
    world: Mat4,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: None,
            kind,
            transform: Transform::IDENTITY,
            parent: None,
            children: SmallVec::new(),
            world: Mat4::IDENTITY,
        }
    }

    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn world(&self) -> Mat4 {
        self.world
    }

    pub fn world_position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(m) => Some(m),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Option<Node>>,
    roots: Vec<NodeId>,
    geometries: FnvHashMap<GeometryId, Geometry>,
    materials: FnvHashMap<MaterialId, Material>,
    next_geometry: u32,
    next_material: u32,
    /// Linear RGB clear color.
    pub background: Vec3,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------- resource tables ----------------

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        let id = GeometryId(self.next_geometry);
        self.next_geometry += 1;
        self.geometries.insert(id, geometry);
        id
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(&id)
    }

    pub fn remove_geometry(&mut self, id: GeometryId) -> Option<Geometry> {
        self.geometries.remove(&id)
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.next_material);
        self.next_material += 1;
        self.materials.insert(id, material);
        id
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(&id)
    }

    pub fn remove_material(&mut self, id: MaterialId) -> Option<Material> {
        self.materials.remove(&id)
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    // ---------------- nodes ----------------

    /// Insert a detached node into the arena.
    pub fn create(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(|n| n.as_ref())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).and_then(|n| n.as_mut())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Attach `child` under `parent`, detaching it from wherever it was.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return;
        }
        self.detach(child);
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
    }

    /// Attach `id` directly to the scene root.
    pub fn attach(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        self.detach(id);
        self.roots.push(id);
    }

    /// Unlink `id` from its parent (or the root); the subtree stays in the arena.
    pub fn detach(&mut self, id: NodeId) {
        match self.node(id).and_then(|n| n.parent) {
            Some(p) => {
                if let Some(pn) = self.node_mut(p) {
                    pn.children.retain(|c| *c != id);
                }
                if let Some(n) = self.node_mut(id) {
                    n.parent = None;
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
    }

    /// Whether `id` is reachable from the scene root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cur = id;
        loop {
            match self.node(cur) {
                None => return false,
                Some(n) => match n.parent {
                    Some(p) => cur = p,
                    None => return self.roots.contains(&cur),
                },
            }
        }
    }

    /// Recompute world matrices of `id` and its descendants against the
    /// parent's current world matrix.
    pub fn update_world(&mut self, id: NodeId) {
        let parent_world = self
            .node(id)
            .and_then(|n| n.parent)
            .and_then(|p| self.node(p))
            .map(|p| p.world)
            .unwrap_or(Mat4::IDENTITY);
        self.propagate(id, parent_world);
    }

    pub fn update_world_all(&mut self) {
        let roots = self.roots.clone();
        for r in roots {
            self.propagate(r, Mat4::IDENTITY);
        }
    }

    fn propagate(&mut self, id: NodeId, parent_world: Mat4) {
        let mut stack = vec![(id, parent_world)];
        while let Some((cur, pw)) = stack.pop() {
            let Some(node) = self.node_mut(cur) else {
                continue;
            };
            node.world = pw * node.transform.matrix();
            let world = node.world;
            stack.extend(node.children.iter().map(|c| (*c, world)));
        }
    }

    /// Depth-first, pre-order walk of `id`'s subtree.
    pub fn traverse(&self, id: NodeId, mut visit: impl FnMut(NodeId, &Node)) {
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let Some(node) = self.node(cur) else {
                continue;
            };
            visit(cur, node);
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// Walk every node reachable from the scene root.
    pub fn walk(&self, mut visit: impl FnMut(NodeId, &Node)) {
        for r in &self.roots {
            self.traverse(*r, &mut visit);
        }
    }

    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.traverse(id, |n, _| out.push(n));
        out
    }

    pub fn set_cast_shadow(&mut self, id: NodeId, cast: bool) {
        for n in self.descendants(id) {
            if let Some(NodeKind::Mesh(mesh)) = self.node_mut(n).map(|n| &mut n.kind) {
                mesh.cast_shadow = cast;
            }
        }
    }

    /// Bounds of every mesh below `id`, in the frame of `id`'s parent (so the
    /// node's own transform is applied). World matrices are not consulted.
    pub fn subtree_bounds(&self, id: NodeId) -> Option<Aabb> {
        let root = self.node(id)?;
        let mut stack = vec![(id, root.transform.matrix())];
        let mut out: Option<Aabb> = None;
        while let Some((cur, m)) = stack.pop() {
            let Some(node) = self.node(cur) else {
                continue;
            };
            if let NodeKind::Mesh(mesh) = &node.kind {
                if let Some(b) = self.geometry(mesh.geometry).and_then(|g| g.bounds()) {
                    let b = b.transformed(&m);
                    out = Some(match out {
                        Some(o) => o.union(&b),
                        None => b,
                    });
                }
            }
            for c in &node.children {
                if let Some(cn) = self.node(*c) {
                    stack.push((*c, m * cn.transform.matrix()));
                }
            }
        }
        out
    }

    /// Remove `id` and its descendants from the arena. Geometry and materials
    /// they reference are left in the tables for the caller to dispose.
    pub fn remove_subtree(&mut self, id: NodeId) -> Vec<(NodeId, Node)> {
        if !self.contains(id) {
            return Vec::new();
        }
        self.detach(id);
        let ids = self.descendants(id);
        ids.into_iter()
            .filter_map(|n| {
                self.nodes
                    .get_mut(n.index())
                    .and_then(Option::take)
                    .map(|node| (n, node))
            })
            .collect()
    }
}
