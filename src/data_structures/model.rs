//! Placed model instances.
//!
//! A [`Model`] owns the meshes of one loaded asset, its world placement and the
//! lights attached to it. Models are created through
//! [`Scene::load_model`](crate::scene::Scene::load_model), which also registers
//! them in their render class.

use cgmath::{InnerSpace, Matrix4, Rad, Vector3};

use crate::{
    data_structures::{
        bounds::BoundingSphere,
        instance::{InstanceRaw, Transform},
        mesh::Mesh,
    },
    error::LoadError,
    lighting::SharedLight,
    resources::LoadedAsset,
};

/// The draw pass a model is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderClass {
    /// Shaded by the lighting pass.
    Lit,
    /// Unshaded, e.g. UI or skybox geometry.
    Flat,
}

/// A light whose world position follows the model it is attached to.
#[derive(Clone)]
pub struct LightAttachment {
    pub light: SharedLight,
    /// Offset in the model's local frame.
    pub relative_pos: Vector3<f32>,
}

pub struct Model {
    path: String,
    directory: String,
    transform: Transform,
    m2w: Matrix4<f32>,
    meshes: Vec<Mesh>,
    lights: Vec<LightAttachment>,
    bounding_sphere: BoundingSphere,
    render_class: RenderClass,
    load_error: Option<LoadError>,
}

impl Model {
    pub(crate) fn new(
        path: &str,
        rotation: Matrix4<f32>,
        world_coord: Vector3<f32>,
        scale: f32,
        render_class: RenderClass,
    ) -> Self {
        let transform = Transform {
            position: world_coord,
            rotation,
            scale,
        };
        Self {
            path: path.to_string(),
            directory: String::new(),
            m2w: transform.to_matrix(),
            transform,
            meshes: Vec::new(),
            lights: Vec::new(),
            bounding_sphere: BoundingSphere::default(),
            render_class,
            load_error: None,
        }
    }

    /// Take over the meshes of a loaded asset and derive the bounding sphere from them.
    pub(crate) fn set_asset(&mut self, asset: LoadedAsset) {
        self.directory = asset.directory;
        self.meshes = asset.meshes;
        self.bounding_sphere = BoundingSphere::from_meshes(&self.meshes, self.transform.scale);
    }

    pub(crate) fn set_load_error(&mut self, error: LoadError) {
        self.load_error = Some(error);
    }

    pub(crate) fn take_meshes(&mut self) -> Vec<Mesh> {
        std::mem::take(&mut self.meshes)
    }

    /// Move the model and every attached light to `world_coord`.
    pub fn move_to(&mut self, world_coord: Vector3<f32>) {
        self.transform.position = world_coord;
        self.update_world();
    }

    /// Move the model and every attached light by `delta`.
    pub fn move_by(&mut self, delta: Vector3<f32>) {
        self.move_to(self.transform.position + delta);
    }

    /// Rotate around `axis` (model frame) by `angle`, i.e. `R = R · rotation(axis, angle)`.
    ///
    /// A zero-length axis has no direction and leaves the rotation unchanged.
    pub fn rotate<A: Into<Rad<f32>>>(&mut self, axis: Vector3<f32>, angle: A) {
        if axis.magnitude2() == 0.0 {
            log::warn!("ignoring rotation of {} around a zero-length axis", self.path);
            return;
        }
        self.transform.rotation = self.transform.rotation * Matrix4::from_axis_angle(axis.normalize(), angle);
        self.update_world();
    }

    /// Attach `light` at `relative_pos` in the model's local frame.
    ///
    /// The light is moved into place and fully uploaded right away.
    pub fn attach_light(&mut self, light: SharedLight, relative_pos: Vector3<f32>) {
        {
            let mut l = light.borrow_mut();
            l.move_to(self.to_world(relative_pos));
            l.upload();
        }
        self.lights.push(LightAttachment { light, relative_pos });
    }

    /// World position of the bounding sphere's center.
    pub fn get_center_point(&self) -> Vector3<f32> {
        self.to_world(self.bounding_sphere.center)
    }

    pub fn get_lights(&self) -> Vec<SharedLight> {
        self.lights.iter().map(|attachment| attachment.light.clone()).collect()
    }

    pub fn get_attachments(&self) -> &[LightAttachment] {
        &self.lights
    }

    pub fn get_meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Directory of the asset file, used to resolve material texture names.
    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn world_coord(&self) -> Vector3<f32> {
        self.transform.position
    }

    pub fn rotation(&self) -> Matrix4<f32> {
        self.transform.rotation
    }

    pub fn scale(&self) -> f32 {
        self.transform.scale
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn model_to_world(&self) -> Matrix4<f32> {
        self.m2w
    }

    pub fn to_raw(&self) -> InstanceRaw {
        self.transform.to_raw()
    }

    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.bounding_sphere
    }

    pub fn render_class(&self) -> RenderClass {
        self.render_class
    }

    /// Why loading the asset failed, if it did. A failed model has no meshes.
    pub fn load_error(&self) -> Option<&LoadError> {
        self.load_error.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.load_error.is_none()
    }

    fn to_world(&self, local: Vector3<f32>) -> Vector3<f32> {
        (self.m2w * local.extend(1.0)).truncate()
    }

    fn update_world(&mut self) {
        self.m2w = self.transform.to_matrix();
        for attachment in &self.lights {
            let position = self.to_world(attachment.relative_pos);
            let mut light = attachment.light.borrow_mut();
            light.move_to(position);
            light.upload_pos();
        }
    }
}
