//! wgpu implementation of the GPU seam.
//!
//! There are no vertex array objects in wgpu, so a vertex layout handle
//! resolves to the index buffer plus the attribute buffers it binds, and
//! [`WgpuBackend::bind_mesh`] replays them onto a render pass. Pipelines that
//! draw meshes use [`WgpuBackend::mesh_buffer_layouts`] so that the buffer slots
//! line up with the fixed attribute locations.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::{
    data_structures::mesh::Mesh,
    gpu::{
        BufferHandle, FilterMode, GpuBackend, InternalFormat, TextureDesc, TextureHandle,
        VertexAttribute, VertexLayoutHandle, WrapMode,
    },
    resources::image::PixelBuffer,
};

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const NORMAL_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
const TEX_COORD_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x2];

/// A sampled 2D texture living on the device.
#[derive(Debug)]
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

#[derive(Debug)]
struct GpuVertexLayout {
    index: BufferHandle,
    attributes: Vec<VertexAttribute>,
}

#[derive(Debug)]
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    next_id: u32,
    buffers: HashMap<BufferHandle, wgpu::Buffer>,
    layouts: HashMap<VertexLayoutHandle, GpuVertexLayout>,
    textures: HashMap<TextureHandle, GpuTexture>,
}

impl WgpuBackend {
    /// Wrap the device and queue of an existing rendering context.
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            next_id: 0,
            buffers: HashMap::new(),
            layouts: HashMap::new(),
            textures: HashMap::new(),
        }
    }

    /// Create a backend without any surface, e.g. for offline processing or tests.
    pub async fn headless() -> anyhow::Result<Self> {
        // The instance is a handle to our GPU
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await?;
        log::debug!("headless adapter: {:?}", adapter.get_info());
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("flow-models device"),
                ..Default::default()
            })
            .await?;
        Ok(Self::new(device, queue))
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn buffer(&self, handle: BufferHandle) -> Option<&wgpu::Buffer> {
        self.buffers.get(&handle)
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<&GpuTexture> {
        self.textures.get(&handle)
    }

    /// Number of buffers, layouts and textures that have not been released yet.
    pub fn live_resources(&self) -> usize {
        self.buffers.len() + self.layouts.len() + self.textures.len()
    }

    /**
     * Each attribute lives in its own tightly packed buffer, so the slot index
     * equals the shader location:
     *
     * slot 0: position, 3 floats
     * slot 1: normal, 3 floats
     * slot 2: tex coords, 2 floats
     */
    pub fn mesh_buffer_layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
        use std::mem;
        [
            wgpu::VertexBufferLayout {
                array_stride: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &POSITION_ATTRIBUTES,
            },
            wgpu::VertexBufferLayout {
                array_stride: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &NORMAL_ATTRIBUTES,
            },
            wgpu::VertexBufferLayout {
                array_stride: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &TEX_COORD_ATTRIBUTES,
            },
        ]
    }

    /// Set the index and attribute buffers of `layout` on the pass.
    ///
    /// Returns `false` if the layout (or one of its buffers) was already released.
    pub fn bind_mesh(&self, render_pass: &mut wgpu::RenderPass<'_>, layout: VertexLayoutHandle) -> bool {
        let Some(layout) = self.layouts.get(&layout) else {
            log::warn!("tried to bind unknown vertex layout {:?}", layout);
            return false;
        };
        let Some(index) = self.buffers.get(&layout.index) else {
            return false;
        };
        for attribute in &layout.attributes {
            let Some(buffer) = self.buffers.get(&attribute.buffer) else {
                return false;
            };
            render_pass.set_vertex_buffer(attribute.location, buffer.slice(..));
        }
        render_pass.set_index_buffer(index.slice(..), wgpu::IndexFormat::Uint32);
        true
    }

    /// Bind the mesh and issue one indexed draw over all of its indices.
    pub fn draw_mesh(&self, render_pass: &mut wgpu::RenderPass<'_>, mesh: &Mesh) {
        if self.bind_mesh(render_pass, mesh.layout()) {
            render_pass.draw_indexed(0..mesh.index_count(), 0, 0..1);
        }
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl From<WrapMode> for wgpu::AddressMode {
    fn from(mode: WrapMode) -> Self {
        match mode {
            WrapMode::Repeat => wgpu::AddressMode::Repeat,
            WrapMode::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
            WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        }
    }
}

impl From<FilterMode> for wgpu::FilterMode {
    fn from(mode: FilterMode) -> Self {
        match mode {
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
            FilterMode::Linear => wgpu::FilterMode::Linear,
        }
    }
}

impl GpuBackend for WgpuBackend {
    fn create_index_buffer(&mut self, label: &str, indices: &[u32]) -> BufferHandle {
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let handle = BufferHandle(self.next_id());
        self.buffers.insert(handle, buffer);
        handle
    }

    fn create_vertex_buffer(&mut self, label: &str, data: &[f32]) -> BufferHandle {
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let handle = BufferHandle(self.next_id());
        self.buffers.insert(handle, buffer);
        handle
    }

    fn create_vertex_layout(
        &mut self,
        label: &str,
        index_buffer: BufferHandle,
        attributes: &[VertexAttribute],
    ) -> VertexLayoutHandle {
        log::debug!("vertex layout {label}: {} attribute buffers", attributes.len());
        let handle = VertexLayoutHandle(self.next_id());
        self.layouts.insert(
            handle,
            GpuVertexLayout {
                index: index_buffer,
                attributes: attributes.to_vec(),
            },
        );
        handle
    }

    fn create_texture(&mut self, label: &str, desc: &TextureDesc, image: &PixelBuffer) -> TextureHandle {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        // wgpu has no three channel format, an RGB texture is stored opaque instead
        let rgba = match desc.internal_format {
            InternalFormat::Rgba => image.pixels.clone(),
            InternalFormat::Rgb => image
                .pixels
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2], u8::MAX])
                .collect(),
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            &rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: desc.sampler.wrap_s.into(),
            address_mode_v: desc.sampler.wrap_t.into(),
            address_mode_w: desc.sampler.wrap_s.into(),
            mag_filter: desc.sampler.mag_filter.into(),
            min_filter: desc.sampler.min_filter.into(),
            ..Default::default()
        });

        let handle = TextureHandle(self.next_id());
        self.textures.insert(
            handle,
            GpuTexture {
                texture,
                view,
                sampler,
            },
        );
        handle
    }

    fn release_buffer(&mut self, buffer: BufferHandle) {
        if let Some(buffer) = self.buffers.remove(&buffer) {
            buffer.destroy();
        }
    }

    fn release_vertex_layout(&mut self, layout: VertexLayoutHandle) {
        self.layouts.remove(&layout);
    }

    fn release_texture(&mut self, texture: TextureHandle) {
        if let Some(gpu_texture) = self.textures.remove(&texture) {
            gpu_texture.texture.destroy();
        }
    }
}
