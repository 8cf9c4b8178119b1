//! Triangle meshes before and after GPU upload.
//!
//! [`MeshData`] is the validated CPU-side geometry of a single mesh.
//! [`MeshData::upload`] consumes it and returns a [`Mesh`], so a mesh is uploaded
//! exactly once and cannot change afterwards. The CPU copies stay around for
//! bounds computation.

use crate::{
    data_structures::texture::TextureRef,
    error::LoadError,
    gpu::{
        BufferHandle, GpuBackend, NORMAL_LOCATION, POSITION_LOCATION, TEX_COORD_LOCATION,
        VertexAttribute, VertexLayoutHandle,
    },
};

/// CPU-side geometry and material summary of one mesh.
///
/// Positions and normals are stored as `x, y, z` triples and texture coordinates
/// as `u, v` pairs, all in vertex order. Indices form a flat triangle list.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    name: String,
    positions: Vec<f32>,
    normals: Vec<f32>,
    tex_coords: Vec<f32>,
    indices: Vec<u32>,
    vertex_count: u32,
    shininess: f32,
    textures: Vec<TextureRef>,
}

impl MeshData {
    /// Validate the array layout and build the mesh.
    ///
    /// Fails with [`LoadError::MalformedGeometry`] when the attribute arrays do not
    /// describe the same number of vertices, the indices are not a whole number
    /// of triangles or an index points past the last vertex.
    pub fn new(
        name: &str,
        positions: Vec<f32>,
        normals: Vec<f32>,
        tex_coords: Vec<f32>,
        indices: Vec<u32>,
        shininess: f32,
        textures: Vec<TextureRef>,
    ) -> Result<Self, LoadError> {
        let malformed = |reason: String| LoadError::MalformedGeometry {
            mesh: name.to_string(),
            reason,
        };
        if positions.len() % 3 != 0 {
            return Err(malformed(format!(
                "{} position components are not a multiple of 3",
                positions.len()
            )));
        }
        let vertices = positions.len() / 3;
        let vertex_count = u32::try_from(vertices)
            .map_err(|_| malformed(format!("{vertices} vertices exceed the u32 index range")))?;
        if normals.len() != 3 * vertices {
            return Err(malformed(format!(
                "expected {} normal components, got {}",
                3 * vertices,
                normals.len()
            )));
        }
        if tex_coords.len() != 2 * vertices {
            return Err(malformed(format!(
                "expected {} tex coord components, got {}",
                2 * vertices,
                tex_coords.len()
            )));
        }
        if indices.len() % 3 != 0 {
            return Err(malformed(format!(
                "{} indices do not form whole triangles",
                indices.len()
            )));
        }
        if u32::try_from(indices.len()).is_err() {
            return Err(malformed(format!("{} indices exceed the u32 range", indices.len())));
        }
        if let Some(index) = indices.iter().find(|&&i| i >= vertex_count) {
            return Err(malformed(format!(
                "index {index} out of range for {vertex_count} vertices"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            positions,
            normals,
            tex_coords,
            indices,
            vertex_count,
            shininess,
            textures,
        })
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        // fits, checked in `new`
        self.indices.len() as u32
    }

    /// Create the index buffer, the three attribute buffers and the layout binding
    /// them to locations 0 (position), 1 (normal) and 2 (tex coords).
    pub fn upload(self, gpu: &mut dyn GpuBackend) -> Mesh {
        let index = gpu.create_index_buffer(&format!("{} Index Buffer", self.name), &self.indices);
        let positions =
            gpu.create_vertex_buffer(&format!("{} Position Buffer", self.name), &self.positions);
        let normals = gpu.create_vertex_buffer(&format!("{} Normal Buffer", self.name), &self.normals);
        let tex_coords =
            gpu.create_vertex_buffer(&format!("{} Tex Coord Buffer", self.name), &self.tex_coords);
        let layout = gpu.create_vertex_layout(
            &format!("{} Vertex Layout", self.name),
            index,
            &[
                VertexAttribute {
                    location: POSITION_LOCATION,
                    components: 3,
                    buffer: positions,
                },
                VertexAttribute {
                    location: NORMAL_LOCATION,
                    components: 3,
                    buffer: normals,
                },
                VertexAttribute {
                    location: TEX_COORD_LOCATION,
                    components: 2,
                    buffer: tex_coords,
                },
            ],
        );

        Mesh {
            data: self,
            buffers: MeshBuffers {
                layout,
                index,
                positions,
                normals,
                tex_coords,
            },
        }
    }
}

/// GPU handles created by [`MeshData::upload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshBuffers {
    pub layout: VertexLayoutHandle,
    pub index: BufferHandle,
    pub positions: BufferHandle,
    pub normals: BufferHandle,
    pub tex_coords: BufferHandle,
}

/// An uploaded, immutable mesh owned by exactly one model.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    data: MeshData,
    buffers: MeshBuffers,
}

impl Mesh {
    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn positions(&self) -> &[f32] {
        &self.data.positions
    }

    pub fn normals(&self) -> &[f32] {
        &self.data.normals
    }

    pub fn tex_coords(&self) -> &[f32] {
        &self.data.tex_coords
    }

    pub fn indices(&self) -> &[u32] {
        &self.data.indices
    }

    pub fn vertex_count(&self) -> u32 {
        self.data.vertex_count()
    }

    pub fn index_count(&self) -> u32 {
        self.data.index_count()
    }

    pub fn shininess(&self) -> f32 {
        self.data.shininess
    }

    /// Diffuse references first, then specular, each in material order.
    pub fn textures(&self) -> &[TextureRef] {
        &self.data.textures
    }

    /// The handle draw code binds before issuing an indexed draw of [`Self::index_count`] indices.
    pub fn layout(&self) -> VertexLayoutHandle {
        self.buffers.layout
    }

    pub fn buffers(&self) -> &MeshBuffers {
        &self.buffers
    }

    pub(crate) fn release(&self, gpu: &mut dyn GpuBackend) {
        gpu.release_vertex_layout(self.buffers.layout);
        gpu.release_buffer(self.buffers.index);
        gpu.release_buffer(self.buffers.positions);
        gpu.release_buffer(self.buffers.normals);
        gpu.release_buffer(self.buffers.tex_coords);
    }
}
