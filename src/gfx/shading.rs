//! Named uniform plumbing between scene code and the GPU
//!
//! Scene, camera, and view code address shader uniforms by name, exactly as the
//! shader declares them. [`ShaderState`] is the production sink: it shadows every
//! named uniform in a `#[repr(C)]` block ([`SceneBlock`]) that the render engine
//! uploads once per draw. The sink retains whatever was last written, so callers
//! must set the state they depend on before each draw.

use bytemuck::Zeroable;
use cgmath::{Matrix4, SquareMatrix, Vector2, Vector3, Vector4};

/// Uniform names shared with `rendering/shaders/scene.wgsl`.
pub mod uniforms {
    pub const MODEL: &str = "model";
    pub const VIEW: &str = "view";
    pub const PROJECTION: &str = "projection";
    pub const VIEW_POSITION: &str = "viewPosition";
    pub const OBJECT_COLOR: &str = "objectColor";
    pub const OBJECT_TEXTURE: &str = "objectTexture";
    pub const USE_TEXTURE: &str = "bUseTexture";
    pub const USE_LIGHTING: &str = "bUseLighting";
    pub const UV_SCALE: &str = "UVscale";
    pub const MATERIAL_DIFFUSE: &str = "material.diffuseColor";
    pub const MATERIAL_SPECULAR: &str = "material.specularColor";
    pub const MATERIAL_SHININESS: &str = "material.shininess";
}

/// Receiver for named, typed shader uniform values.
///
/// Writes are fire-and-forget: an unknown name is dropped (and logged), never an
/// error. Values persist until overwritten.
pub trait UniformSink {
    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>);
    fn set_vec2(&mut self, name: &str, value: Vector2<f32>);
    fn set_vec3(&mut self, name: &str, value: Vector3<f32>);
    fn set_vec4(&mut self, name: &str, value: Vector4<f32>);
    fn set_float(&mut self, name: &str, value: f32);
    fn set_int(&mut self, name: &str, value: i32);
    fn set_bool(&mut self, name: &str, value: bool);
}

/// Directional light slot, GPU layout.
///
/// Field order and padding must match the `DirectionalLight` struct in
/// `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightBlock {
    pub direction: [f32; 3],
    pub active: u32,
    pub ambient: [f32; 3],
    _pad0: f32,
    pub diffuse: [f32; 3],
    _pad1: f32,
    pub specular: [f32; 3],
    _pad2: f32,
}

/// Point light slot, GPU layout.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightBlock {
    pub position: [f32; 3],
    pub active: u32,
    pub ambient: [f32; 3],
    _pad0: f32,
    pub diffuse: [f32; 3],
    _pad1: f32,
    pub specular: [f32; 3],
    _pad2: f32,
}

/// Spot light slot, GPU layout.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpotLightBlock {
    pub position: [f32; 3],
    pub active: u32,
    pub direction: [f32; 3],
    _pad0: f32,
    pub ambient: [f32; 3],
    _pad1: f32,
    pub diffuse: [f32; 3],
    _pad2: f32,
    pub specular: [f32; 3],
    _pad3: f32,
}

/// Number of point light slots in the shader.
pub const POINT_LIGHT_SLOTS: usize = 5;

/// Everything the scene shader reads, in one per-draw uniform block.
///
/// MUST match `SceneUniforms` in `scene.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneBlock {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_position: [f32; 4],
    pub object_color: [f32; 4],
    pub uv_scale: [f32; 2],
    pub use_texture: u32,
    pub use_lighting: u32,
    pub material_diffuse: [f32; 3],
    pub material_shininess: f32,
    pub material_specular: [f32; 3],
    pub texture_slot: i32,
    pub directional_light: DirectionalLightBlock,
    pub point_lights: [PointLightBlock; POINT_LIGHT_SLOTS],
    pub spot_light: SpotLightBlock,
}

impl Default for SceneBlock {
    fn default() -> Self {
        let identity: [[f32; 4]; 4] = Matrix4::identity().into();
        Self {
            model: identity,
            view: identity,
            projection: identity,
            view_position: [0.0, 0.0, 0.0, 1.0],
            object_color: [1.0, 1.0, 1.0, 1.0],
            uv_scale: [1.0, 1.0],
            use_texture: 0,
            use_lighting: 0,
            material_diffuse: [1.0, 1.0, 1.0],
            material_shininess: 32.0,
            material_specular: [0.0, 0.0, 0.0],
            texture_slot: -1,
            directional_light: DirectionalLightBlock::zeroed(),
            point_lights: [PointLightBlock::zeroed(); POINT_LIGHT_SLOTS],
            spot_light: SpotLightBlock::zeroed(),
        }
    }
}

/// CPU-side shadow of the scene shader's uniform interface.
///
/// There is no dirty tracking: the block always reflects the latest writes, and
/// the render engine snapshots it at every draw. Texture selection rides along
/// as a tag because texture binding is a bind-group switch, not a uniform write.
pub struct ShaderState {
    block: SceneBlock,
    texture_tag: Option<String>,
}

impl ShaderState {
    pub fn new() -> Self {
        Self {
            block: SceneBlock::default(),
            texture_tag: None,
        }
    }

    /// Current uniform block, ready for upload.
    pub fn block(&self) -> &SceneBlock {
        &self.block
    }

    /// Selects the texture the next textured draw samples from, or `None` for
    /// the engine's fallback texture.
    pub fn bind_texture(&mut self, tag: Option<&str>) {
        self.texture_tag = tag.map(str::to_string);
    }

    pub fn texture_tag(&self) -> Option<&str> {
        self.texture_tag.as_deref()
    }

    fn vec3_slot(&mut self, name: &str) -> Option<&mut [f32; 3]> {
        let block = &mut self.block;
        if let Some(rest) = name.strip_prefix("pointLights[") {
            let (index, field) = rest.split_once("].")?;
            let index: usize = index.parse().ok()?;
            let light = block.point_lights.get_mut(index)?;
            return match field {
                "position" => Some(&mut light.position),
                "ambient" => Some(&mut light.ambient),
                "diffuse" => Some(&mut light.diffuse),
                "specular" => Some(&mut light.specular),
                _ => None,
            };
        }
        if let Some(field) = name.strip_prefix("directionalLight.") {
            let light = &mut block.directional_light;
            return match field {
                "direction" => Some(&mut light.direction),
                "ambient" => Some(&mut light.ambient),
                "diffuse" => Some(&mut light.diffuse),
                "specular" => Some(&mut light.specular),
                _ => None,
            };
        }
        if let Some(field) = name.strip_prefix("spotLight.") {
            let light = &mut block.spot_light;
            return match field {
                "position" => Some(&mut light.position),
                "direction" => Some(&mut light.direction),
                "ambient" => Some(&mut light.ambient),
                "diffuse" => Some(&mut light.diffuse),
                "specular" => Some(&mut light.specular),
                _ => None,
            };
        }
        match name {
            uniforms::MATERIAL_DIFFUSE => Some(&mut block.material_diffuse),
            uniforms::MATERIAL_SPECULAR => Some(&mut block.material_specular),
            _ => None,
        }
    }

    fn flag_slot(&mut self, name: &str) -> Option<&mut u32> {
        let block = &mut self.block;
        if let Some(rest) = name.strip_prefix("pointLights[") {
            let (index, field) = rest.split_once("].")?;
            if field != "bActive" {
                return None;
            }
            let index: usize = index.parse().ok()?;
            return block.point_lights.get_mut(index).map(|light| &mut light.active);
        }
        match name {
            uniforms::USE_TEXTURE => Some(&mut block.use_texture),
            uniforms::USE_LIGHTING => Some(&mut block.use_lighting),
            "directionalLight.bActive" => Some(&mut block.directional_light.active),
            "spotLight.bActive" => Some(&mut block.spot_light.active),
            _ => None,
        }
    }

    fn unknown(kind: &str, name: &str) {
        log::warn!("no {kind} uniform named '{name}'; value dropped");
    }
}

impl Default for ShaderState {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformSink for ShaderState {
    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        let slot = match name {
            uniforms::MODEL => &mut self.block.model,
            uniforms::VIEW => &mut self.block.view,
            uniforms::PROJECTION => &mut self.block.projection,
            _ => return Self::unknown("mat4", name),
        };
        *slot = value.into();
    }

    fn set_vec2(&mut self, name: &str, value: Vector2<f32>) {
        match name {
            uniforms::UV_SCALE => self.block.uv_scale = value.into(),
            _ => Self::unknown("vec2", name),
        }
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        if name == uniforms::VIEW_POSITION {
            self.block.view_position = [value.x, value.y, value.z, 1.0];
            return;
        }
        match self.vec3_slot(name) {
            Some(slot) => *slot = value.into(),
            None => Self::unknown("vec3", name),
        }
    }

    fn set_vec4(&mut self, name: &str, value: Vector4<f32>) {
        match name {
            uniforms::OBJECT_COLOR => self.block.object_color = value.into(),
            _ => Self::unknown("vec4", name),
        }
    }

    fn set_float(&mut self, name: &str, value: f32) {
        match name {
            uniforms::MATERIAL_SHININESS => self.block.material_shininess = value,
            _ => Self::unknown("float", name),
        }
    }

    fn set_int(&mut self, name: &str, value: i32) {
        match name {
            uniforms::OBJECT_TEXTURE => self.block.texture_slot = value,
            uniforms::USE_TEXTURE => self.block.use_texture = (value != 0) as u32,
            _ => Self::unknown("int", name),
        }
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        match self.flag_slot(name) {
            Some(slot) => *slot = value as u32,
            None => Self::unknown("bool", name),
        }
    }
}
