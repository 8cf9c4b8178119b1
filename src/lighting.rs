//! Light sources attached to models.
//!
//! The model core never reads light state. It only moves lights and asks them
//! to upload, so any light implementation can be attached through [`Light`].
//! [`UniformLight`] is the point light the renderer binds as a uniform buffer.

use std::{cell::RefCell, rc::Rc};

use cgmath::Vector3;
use wgpu::util::DeviceExt;

pub trait Light {
    fn move_to(&mut self, position: Vector3<f32>);

    /// Push only the position to the GPU.
    fn upload_pos(&mut self);

    /// Push the complete light state to the GPU.
    fn upload(&mut self);
}

/// Lights are shared by identity between the caller and every model they are attached to.
pub type SharedLight = Rc<RefCell<dyn Light>>;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: u32,
    pub color: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding2: u32,
}

impl LightUniform {
    pub fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            position,
            _padding: 0,
            color,
            _padding2: 0,
        }
    }
}

/// A point light backed by a uniform buffer.
#[derive(Debug)]
pub struct UniformLight {
    uniform: LightUniform,
    buffer: wgpu::Buffer,
    queue: wgpu::Queue,
}

impl UniformLight {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, uniform: LightUniform) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            uniform,
            buffer,
            queue: queue.clone(),
        }
    }

    pub fn uniform(&self) -> &LightUniform {
        &self.uniform
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn set_color(&mut self, color: [f32; 3]) {
        self.uniform.color = color;
    }

    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("light_bind_group_layout"),
        })
    }

    pub fn bind_group(&self, device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: self.buffer.as_entire_binding(),
            }],
            label: Some("light_bind_group"),
        })
    }
}

impl Light for UniformLight {
    fn move_to(&mut self, position: Vector3<f32>) {
        self.uniform.position = position.into();
    }

    fn upload_pos(&mut self) {
        // position is the first field of the uniform
        self.queue
            .write_buffer(&self.buffer, 0, bytemuck::cast_slice(&self.uniform.position));
    }

    fn upload(&mut self) {
        self.queue
            .write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
