//! Shared test doubles for unit tests.

use cgmath::{Matrix4, Vector2, Vector3, Vector4};

use crate::gfx::shading::UniformSink;

/// One captured uniform write.
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Mat4(String, Matrix4<f32>),
    Vec2(String, Vector2<f32>),
    Vec3(String, Vector3<f32>),
    Vec4(String, Vector4<f32>),
    Float(String, f32),
    Int(String, i32),
    Bool(String, bool),
}

impl Write {
    pub fn name(&self) -> &str {
        match self {
            Write::Mat4(name, _)
            | Write::Vec2(name, _)
            | Write::Vec3(name, _)
            | Write::Vec4(name, _)
            | Write::Float(name, _)
            | Write::Int(name, _)
            | Write::Bool(name, _) => name,
        }
    }
}

/// Uniform sink that records every write in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub writes: Vec<Write>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.writes.iter().map(Write::name).collect()
    }

    /// Last value written under `name`, if it was a mat4.
    pub fn mat4(&self, name: &str) -> Option<Matrix4<f32>> {
        self.writes.iter().rev().find_map(|w| match w {
            Write::Mat4(n, v) if n == name => Some(*v),
            _ => None,
        })
    }

    pub fn vec3(&self, name: &str) -> Option<Vector3<f32>> {
        self.writes.iter().rev().find_map(|w| match w {
            Write::Vec3(n, v) if n == name => Some(*v),
            _ => None,
        })
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        self.writes.iter().rev().find_map(|w| match w {
            Write::Float(n, v) if n == name => Some(*v),
            _ => None,
        })
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.writes.iter().rev().find_map(|w| match w {
            Write::Bool(n, v) if n == name => Some(*v),
            _ => None,
        })
    }
}

impl UniformSink for RecordingSink {
    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        self.writes.push(Write::Mat4(name.to_string(), value));
    }

    fn set_vec2(&mut self, name: &str, value: Vector2<f32>) {
        self.writes.push(Write::Vec2(name.to_string(), value));
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        self.writes.push(Write::Vec3(name.to_string(), value));
    }

    fn set_vec4(&mut self, name: &str, value: Vector4<f32>) {
        self.writes.push(Write::Vec4(name.to_string(), value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.writes.push(Write::Float(name.to_string(), value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.writes.push(Write::Int(name.to_string(), value));
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.writes.push(Write::Bool(name.to_string(), value));
    }
}
