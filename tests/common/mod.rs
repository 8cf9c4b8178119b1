#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::HashMap,
    path::{Path, PathBuf},
    rc::Rc,
};

use approx::assert_relative_eq;
use flow_models::{
    Vector3,
    gpu::{
        BufferHandle, GpuBackend, TextureDesc, TextureHandle, VertexAttribute, VertexLayoutHandle,
    },
    lighting::Light,
    resources::{
        image::{ImageSource, PixelBuffer},
        importer::{
            ImportedMaterial, ImportedMesh, ImportedNode, ImportedScene, PostProcess,
            SceneImporter,
        },
    },
};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn assert_vec3_eq(actual: Vector3<f32>, expected: Vector3<f32>) {
    assert_relative_eq!(actual.x, expected.x, epsilon = 1e-5);
    assert_relative_eq!(actual.y, expected.y, epsilon = 1e-5);
    assert_relative_eq!(actual.z, expected.z, epsilon = 1e-5);
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBuffer {
    pub label: String,
    pub indices: Option<Vec<u32>>,
    pub data: Option<Vec<f32>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedLayout {
    pub label: String,
    pub index_buffer: BufferHandle,
    pub attributes: Vec<VertexAttribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTexture {
    pub label: String,
    pub desc: TextureDesc,
    pub width: u32,
    pub height: u32,
}

/// Handles released through a [`RecordingGpu`], readable after the scene is gone.
#[derive(Debug, Default)]
pub struct Released {
    pub buffers: Vec<BufferHandle>,
    pub layouts: Vec<VertexLayoutHandle>,
    pub textures: Vec<TextureHandle>,
}

/// GPU backend that only records what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingGpu {
    next_id: u32,
    pub buffers: HashMap<BufferHandle, RecordedBuffer>,
    pub layouts: HashMap<VertexLayoutHandle, RecordedLayout>,
    pub textures: HashMap<TextureHandle, RecordedTexture>,
    pub released: Rc<RefCell<Released>>,
}

impl RecordingGpu {
    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn texture_uploads(&self) -> usize {
        self.textures.len()
    }
}

impl GpuBackend for RecordingGpu {
    fn create_index_buffer(&mut self, label: &str, indices: &[u32]) -> BufferHandle {
        let handle = BufferHandle(self.next_id());
        self.buffers.insert(
            handle,
            RecordedBuffer {
                label: label.to_string(),
                indices: Some(indices.to_vec()),
                data: None,
            },
        );
        handle
    }

    fn create_vertex_buffer(&mut self, label: &str, data: &[f32]) -> BufferHandle {
        let handle = BufferHandle(self.next_id());
        self.buffers.insert(
            handle,
            RecordedBuffer {
                label: label.to_string(),
                indices: None,
                data: Some(data.to_vec()),
            },
        );
        handle
    }

    fn create_vertex_layout(
        &mut self,
        label: &str,
        index_buffer: BufferHandle,
        attributes: &[VertexAttribute],
    ) -> VertexLayoutHandle {
        let handle = VertexLayoutHandle(self.next_id());
        self.layouts.insert(
            handle,
            RecordedLayout {
                label: label.to_string(),
                index_buffer,
                attributes: attributes.to_vec(),
            },
        );
        handle
    }

    fn create_texture(&mut self, label: &str, desc: &TextureDesc, image: &PixelBuffer) -> TextureHandle {
        let handle = TextureHandle(self.next_id());
        self.textures.insert(
            handle,
            RecordedTexture {
                label: label.to_string(),
                desc: *desc,
                width: image.width,
                height: image.height,
            },
        );
        handle
    }

    fn release_buffer(&mut self, buffer: BufferHandle) {
        self.released.borrow_mut().buffers.push(buffer);
    }

    fn release_vertex_layout(&mut self, layout: VertexLayoutHandle) {
        self.released.borrow_mut().layouts.push(layout);
    }

    fn release_texture(&mut self, texture: TextureHandle) {
        self.released.borrow_mut().textures.push(texture);
    }
}

/// Serves prepared scenes by path and fails for everything else.
#[derive(Debug, Default, Clone)]
pub struct MemoryImporter {
    scenes: HashMap<PathBuf, ImportedScene>,
    pub requests: Rc<RefCell<Vec<(PathBuf, PostProcess)>>>,
}

impl MemoryImporter {
    pub fn with(mut self, path: &str, scene: ImportedScene) -> Self {
        self.scenes.insert(PathBuf::from(path), scene);
        self
    }
}

impl SceneImporter for MemoryImporter {
    fn import(&self, path: &Path, flags: PostProcess) -> anyhow::Result<ImportedScene> {
        self.requests.borrow_mut().push((path.to_path_buf(), flags));
        self.scenes
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no such file: {}", path.display()))
    }
}

/// Serves solid-colour images by path and records every request.
#[derive(Debug, Default, Clone)]
pub struct FakeImages {
    images: HashMap<PathBuf, PixelBuffer>,
    pub requests: Rc<RefCell<Vec<PathBuf>>>,
}

impl FakeImages {
    pub fn with(mut self, path: &str, width: u32, height: u32) -> Self {
        let pixels = [200u8, 100, 50, 128]
            .iter()
            .cycle()
            .take(width as usize * height as usize * 4)
            .copied()
            .collect();
        let image = PixelBuffer::new(width, height, pixels).expect("valid test image");
        self.images.insert(PathBuf::from(path), image);
        self
    }
}

impl ImageSource for FakeImages {
    fn load_rgba(&self, path: &Path) -> anyhow::Result<PixelBuffer> {
        self.requests.borrow_mut().push(path.to_path_buf());
        self.images
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("cannot open {}", path.display()))
    }
}

#[derive(Debug)]
pub struct RecordingLight {
    pub position: Vector3<f32>,
    pub moves: usize,
    pub position_uploads: usize,
    pub full_uploads: usize,
}

impl RecordingLight {
    pub fn shared() -> Rc<RefCell<RecordingLight>> {
        Rc::new(RefCell::new(RecordingLight {
            position: Vector3::new(0.0, 0.0, 0.0),
            moves: 0,
            position_uploads: 0,
            full_uploads: 0,
        }))
    }
}

impl Light for RecordingLight {
    fn move_to(&mut self, position: Vector3<f32>) {
        self.position = position;
        self.moves += 1;
    }

    fn upload_pos(&mut self) {
        self.position_uploads += 1;
    }

    fn upload(&mut self) {
        self.full_uploads += 1;
    }
}

/// The cube spanning [-1, 1] on every axis, 8 shared vertices and 12 triangles.
pub fn unit_cube(name: &str, material: Option<usize>) -> ImportedMesh {
    let positions: Vec<[f32; 3]> = vec![
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [1.0, 1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, 1.0],
        [-1.0, 1.0, 1.0],
    ];
    let normals = positions
        .iter()
        .map(|p| {
            let len = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            [p[0] / len, p[1] / len, p[2] / len]
        })
        .collect();
    let faces: Vec<Vec<u32>> = [
        [0, 2, 1],
        [0, 3, 2],
        [4, 5, 6],
        [4, 6, 7],
        [0, 1, 5],
        [0, 5, 4],
        [3, 7, 6],
        [3, 6, 2],
        [0, 4, 7],
        [0, 7, 3],
        [1, 2, 6],
        [1, 6, 5],
    ]
    .iter()
    .map(|f| f.to_vec())
    .collect();
    ImportedMesh {
        name: name.to_string(),
        positions,
        normals,
        tex_coords: Some(vec![[0.5, 0.5]; 8]),
        faces,
        material,
    }
}

/// One triangle with corners at `offset`, `offset + x` and `offset + y`, without UVs.
pub fn triangle(name: &str, offset: [f32; 3], material: Option<usize>) -> ImportedMesh {
    let [x, y, z] = offset;
    ImportedMesh {
        name: name.to_string(),
        positions: vec![[x, y, z], [x + 1.0, y, z], [x, y + 1.0, z]],
        normals: vec![[0.0, 0.0, 1.0]; 3],
        tex_coords: None,
        faces: vec![vec![0, 1, 2]],
        material,
    }
}

pub fn material(name: &str, shininess: f32, diffuse: &[&str], specular: &[&str]) -> ImportedMaterial {
    ImportedMaterial {
        name: name.to_string(),
        shininess,
        diffuse_textures: diffuse.iter().map(|s| s.to_string()).collect(),
        specular_textures: specular.iter().map(|s| s.to_string()).collect(),
    }
}

/// A scene whose root references every mesh in table order.
pub fn flat_scene(meshes: Vec<ImportedMesh>, materials: Vec<ImportedMaterial>) -> ImportedScene {
    ImportedScene {
        root: Some(ImportedNode {
            name: "root".to_string(),
            meshes: (0..meshes.len()).collect(),
            children: Vec::new(),
        }),
        meshes,
        materials,
        incomplete: false,
    }
}
