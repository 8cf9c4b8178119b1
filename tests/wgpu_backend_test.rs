#[cfg(feature = "integration-tests")]
mod common;

#[test]
#[cfg(feature = "integration-tests")]
fn should_create_and_release_resources_on_device() {
    use flow_models::{
        data_structures::mesh::MeshData,
        gpu::{GpuBackend, InternalFormat, TextureDesc, wgpu_backend::WgpuBackend},
        resources::image::PixelBuffer,
    };

    common::init_logger();
    let mut gpu = match futures::executor::block_on(WgpuBackend::headless()) {
        Ok(gpu) => gpu,
        Err(e) => {
            log::warn!("no adapter available, skipping: {e:#}");
            return;
        }
    };

    let mesh = MeshData::new(
        "tri",
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
        vec![0.0; 6],
        vec![0, 1, 2],
        0.0,
        vec![],
    )
    .unwrap()
    .upload(&mut gpu);
    let buffers = *mesh.buffers();
    assert_eq!(gpu.buffer(buffers.index).unwrap().size(), 12);
    assert_eq!(gpu.buffer(buffers.positions).unwrap().size(), 36);
    assert_eq!(gpu.buffer(buffers.tex_coords).unwrap().size(), 24);

    let image = PixelBuffer::new(2, 2, vec![255; 16]).unwrap();
    let desc = TextureDesc {
        internal_format: InternalFormat::Rgba,
        ..TextureDesc::default()
    };
    let texture = gpu.create_texture("white", &desc, &image);
    let size = gpu.texture(texture).unwrap().texture.size();
    assert_eq!((size.width, size.height), (2, 2));
    assert_eq!(gpu.live_resources(), 6);

    gpu.release_vertex_layout(mesh.layout());
    gpu.release_buffer(buffers.index);
    gpu.release_buffer(buffers.positions);
    gpu.release_buffer(buffers.normals);
    gpu.release_buffer(buffers.tex_coords);
    gpu.release_texture(texture);
    assert_eq!(gpu.live_resources(), 0);
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_expose_one_vertex_buffer_per_attribute() {
    use flow_models::gpu::{
        NORMAL_LOCATION, POSITION_LOCATION, TEX_COORD_LOCATION, wgpu_backend::WgpuBackend,
    };

    let layouts = WgpuBackend::mesh_buffer_layouts();

    assert_eq!(layouts[0].array_stride, 12);
    assert_eq!(layouts[0].attributes[0].shader_location, POSITION_LOCATION);
    assert_eq!(layouts[1].array_stride, 12);
    assert_eq!(layouts[1].attributes[0].shader_location, NORMAL_LOCATION);
    assert_eq!(layouts[2].array_stride, 8);
    assert_eq!(layouts[2].attributes[0].shader_location, TEX_COORD_LOCATION);
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_follow_model_with_uniform_light() {
    use std::{cell::RefCell, rc::Rc};

    use flow_models::{
        Matrix4, RenderClass, Scene, SceneOptions, SquareMatrix, Vector3,
        gpu::wgpu_backend::WgpuBackend,
        lighting::{LightUniform, UniformLight},
    };

    common::init_logger();
    let gpu = match futures::executor::block_on(WgpuBackend::headless()) {
        Ok(gpu) => gpu,
        Err(e) => {
            log::warn!("no adapter available, skipping: {e:#}");
            return;
        }
    };
    let light = Rc::new(RefCell::new(UniformLight::new(
        gpu.device(),
        gpu.queue(),
        LightUniform::new([0.0; 3], [1.0, 1.0, 1.0]),
    )));
    let layout = UniformLight::bind_group_layout(gpu.device());
    let _bind_group = light.borrow().bind_group(gpu.device(), &layout);

    let mut scene = Scene::with_sources(
        gpu,
        common::MemoryImporter::default().with(
            "cube.obj",
            common::flat_scene(vec![common::unit_cube("cube", None)], vec![]),
        ),
        common::FakeImages::default(),
        SceneOptions::default(),
    );
    let id = scene.load_model(
        "cube.obj",
        Matrix4::identity(),
        Vector3::new(0.0, 0.0, 0.0),
        1.0,
        RenderClass::Lit,
    );
    assert_eq!(scene.gpu().live_resources(), 5);

    let model = scene.model_mut(id).unwrap();
    model.attach_light(light.clone(), Vector3::new(0.0, 2.0, 0.0));
    model.move_to(Vector3::new(1.0, 1.0, 1.0));

    assert_eq!(light.borrow().uniform().position, [1.0, 3.0, 1.0]);
    assert_eq!(light.borrow().uniform().color, [1.0, 1.0, 1.0]);
    scene.teardown();
}
