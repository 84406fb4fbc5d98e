use super::uniforms::{interleave, MaterialUniforms, ObjectUniforms};
use fnv::{FnvHashMap, FnvHashSet};
use hero_core::scene::{Geometry, Material};
use hero_core::{GeometryId, MaterialId, NodeId};
use wgpu::util::DeviceExt;

pub(crate) struct GpuGeometry {
    pub(crate) vertices: wgpu::Buffer,
    pub(crate) indices: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl GpuGeometry {
    /// `None` for geometry with nothing to draw.
    fn upload(device: &wgpu::Device, geometry: &Geometry) -> Option<Self> {
        if geometry.positions.is_empty() || geometry.indices.is_empty() {
            return None;
        }
        let data = interleave(&geometry.positions, &geometry.normals);
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertices"),
            contents: bytemuck::cast_slice(&data),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_indices"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Some(Self {
            vertices,
            indices,
            index_count: geometry.indices.len() as u32,
        })
    }

    fn destroy(&self) {
        self.vertices.destroy();
        self.indices.destroy();
    }
}

/// A uniform buffer and the bind group that exposes it.
pub(crate) struct UniformSlot {
    pub(crate) buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
}

impl UniformSlot {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str, contents: &[u8]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }
}

/// GPU copies of scene resources, uploaded on first use.
#[derive(Default)]
pub(crate) struct MeshCache {
    geometries: FnvHashMap<GeometryId, GpuGeometry>,
    materials: FnvHashMap<MaterialId, UniformSlot>,
    objects: FnvHashMap<NodeId, UniformSlot>,
}

impl MeshCache {
    pub(crate) fn geometry(&self, id: GeometryId) -> Option<&GpuGeometry> {
        self.geometries.get(&id)
    }

    pub(crate) fn material(&self, id: MaterialId) -> Option<&UniformSlot> {
        self.materials.get(&id)
    }

    pub(crate) fn object(&self, id: NodeId) -> Option<&UniformSlot> {
        self.objects.get(&id)
    }

    pub(crate) fn ensure_geometry(&mut self, device: &wgpu::Device, id: GeometryId, geometry: &Geometry) {
        if self.geometries.contains_key(&id) {
            return;
        }
        if let Some(gpu) = GpuGeometry::upload(device, geometry) {
            self.geometries.insert(id, gpu);
        }
    }

    pub(crate) fn ensure_material(
        &mut self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        id: MaterialId,
        material: &Material,
    ) {
        self.materials.entry(id).or_insert_with(|| {
            let u = MaterialUniforms::new(material);
            UniformSlot::new(device, layout, "material_ub", bytemuck::bytes_of(&u))
        });
    }

    /// Write this frame's transform for a node, creating its slot if needed.
    pub(crate) fn write_object(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        id: NodeId,
        uniforms: &ObjectUniforms,
    ) {
        let bytes = bytemuck::bytes_of(uniforms);
        match self.objects.get(&id) {
            Some(slot) => queue.write_buffer(&slot.buffer, 0, bytes),
            None => {
                self.objects
                    .insert(id, UniformSlot::new(device, layout, "object_ub", bytes));
            }
        }
    }

    /// Drop object slots for nodes no longer drawn.
    pub(crate) fn retain_objects(&mut self, live: &FnvHashSet<NodeId>) {
        self.objects.retain(|id, slot| {
            let keep = live.contains(id);
            if !keep {
                slot.buffer.destroy();
            }
            keep
        });
    }

    pub(crate) fn dispose_geometry(&mut self, id: GeometryId) -> bool {
        match self.geometries.remove(&id) {
            Some(gpu) => {
                gpu.destroy();
                true
            }
            None => false,
        }
    }

    pub(crate) fn dispose_material(&mut self, id: MaterialId) -> bool {
        match self.materials.remove(&id) {
            Some(slot) => {
                slot.buffer.destroy();
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        for (_, g) in self.geometries.drain() {
            g.destroy();
        }
        for (_, m) in self.materials.drain() {
            m.buffer.destroy();
        }
        for (_, o) in self.objects.drain() {
            o.buffer.destroy();
        }
    }
}
