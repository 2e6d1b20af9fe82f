//! The fixed desk scene and its immediate-mode execution
//!
//! One frame is an ordered list of draw steps. For each step the composer
//! pushes the transform and appearance state into the shader state and only
//! then hands the mesh to the draw target. The sink keeps whatever was set
//! last, so the order set-state-then-draw must never interleave across steps.

use std::collections::HashSet;
use std::path::Path;

use cgmath::Vector3;

use crate::gfx::geometry::MeshKind;
use crate::gfx::resources::lighting::LightRig;
use crate::gfx::resources::material::MaterialTable;
use crate::gfx::resources::texture::{GpuTexture, TextureRegistry};
use crate::gfx::shading::{uniforms, ShaderState, UniformSink};
use crate::gfx::transform::push_transform;
use crate::persist::SceneStore;
use crate::wgpu_utils::binding_builder::BindGroupLayoutWithDesc;

/// Texture tags used by the desk scene.
pub const TAG_WOOD: &str = "wood";
pub const TAG_MOUSE_BODY: &str = "mouse_body";
pub const TAG_MOUSE_BUTTONS: &str = "mouse_buttons";

/// Solid color drawn where a texture failed to load.
const FALLBACK_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 1.0];

/// How a draw step is shaded.
#[derive(Debug, Clone, PartialEq)]
pub enum Appearance {
    /// Untextured draw with a literal color, optionally picking a material
    /// for the lighting terms.
    Color {
        rgba: [f32; 4],
        material: Option<&'static str>,
    },
    /// Textured draw sampling the registry texture under `tag`.
    Textured {
        tag: &'static str,
        uv_scale: [f32; 2],
    },
}

/// One entry of the frame's draw list.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawStep {
    pub mesh: MeshKind,
    pub scale: Vector3<f32>,
    pub rotation_degrees: Vector3<f32>,
    pub position: Vector3<f32>,
    pub appearance: Appearance,
}

/// Receiver of fully-staged draws.
///
/// By the time `draw_mesh` is called, `state` reflects everything the draw
/// needs; implementations snapshot it and must not reorder draws.
pub trait DrawTarget {
    fn draw_mesh(&mut self, kind: MeshKind, state: &ShaderState);
}

/// The composed desk: wood plane, mouse with buttons, keyboard, wrist-rest
/// spheres, and eyeglasses. Order matters for appearance-state reuse within
/// each group.
pub fn desk_scene() -> Vec<DrawStep> {
    let mut steps = Vec::new();

    // Desk surface
    steps.push(DrawStep {
        mesh: MeshKind::Plane,
        scale: Vector3::new(20.0, 1.0, 10.0),
        rotation_degrees: Vector3::new(0.0, 0.0, 0.0),
        position: Vector3::new(0.0, 0.0, 0.0),
        appearance: Appearance::Textured {
            tag: TAG_WOOD,
            uv_scale: [4.0, 2.0],
        },
    });

    // Mouse body
    steps.push(DrawStep {
        mesh: MeshKind::Sphere,
        scale: Vector3::new(0.9, 0.5, 1.3),
        rotation_degrees: Vector3::new(0.0, 0.0, -15.0),
        position: Vector3::new(-2.0, 0.5, 0.0),
        appearance: Appearance::Textured {
            tag: TAG_MOUSE_BODY,
            uv_scale: [1.0, 1.0],
        },
    });

    // Mouse buttons
    for i in 0..2 {
        steps.push(DrawStep {
            mesh: MeshKind::TaperedCylinder,
            scale: Vector3::new(0.2, 0.05, 0.2),
            rotation_degrees: Vector3::new(90.0, 0.0, 0.0),
            position: Vector3::new(-2.0 + 0.1 * i as f32, 0.65, 0.2),
            appearance: Appearance::Textured {
                tag: TAG_MOUSE_BUTTONS,
                uv_scale: [1.0, 1.0],
            },
        });
    }

    // Keyboard
    steps.push(DrawStep {
        mesh: MeshKind::Box,
        scale: Vector3::new(3.0, 0.3, 1.5),
        rotation_degrees: Vector3::new(0.0, 0.0, 0.0),
        position: Vector3::new(1.0, 0.15, 0.0),
        appearance: Appearance::Color {
            rgba: [0.9, 0.9, 0.9, 1.0],
            material: Some("matte"),
        },
    });

    // Cloud wrist rest
    for i in 0..3 {
        steps.push(DrawStep {
            mesh: MeshKind::Sphere,
            scale: Vector3::new(0.6, 0.6, 0.6),
            rotation_degrees: Vector3::new(0.0, 0.0, 0.0),
            position: Vector3::new(-0.5 + 0.6 * i as f32, 0.35, -0.6),
            appearance: Appearance::Color {
                rgba: [1.0, 1.0, 1.0, 1.0],
                material: Some("matte"),
            },
        });
    }

    // Eyeglass rims
    for i in 0..2 {
        steps.push(DrawStep {
            mesh: MeshKind::Torus,
            scale: Vector3::new(0.3, 0.3, 0.3),
            rotation_degrees: Vector3::new(90.0, 0.0, 0.0),
            position: Vector3::new(-0.5 + 0.8 * i as f32, 0.5, 1.0),
            appearance: Appearance::Color {
                rgba: [0.1, 0.1, 0.1, 1.0],
                material: Some("glass"),
            },
        });
    }

    // Eyeglass bridge
    steps.push(DrawStep {
        mesh: MeshKind::Box,
        scale: Vector3::new(0.8, 0.05, 0.05),
        rotation_degrees: Vector3::new(0.0, 0.0, 0.0),
        position: Vector3::new(-0.1, 0.5, 1.0),
        appearance: Appearance::Color {
            rgba: [0.1, 0.1, 0.1, 1.0],
            material: Some("glass"),
        },
    });

    steps
}

/// Owns the scene's resources and walks the draw list every frame.
///
/// Generic over the texture handle type so the binding discipline can be
/// exercised without a GPU; the real application uses [`GpuTexture`] handles.
pub struct SceneComposer<H = GpuTexture> {
    pub textures: TextureRegistry<H>,
    pub materials: MaterialTable,
    pub lights: LightRig,
    steps: Vec<DrawStep>,
    missing_reported: HashSet<&'static str>,
    teardown_reported: bool,
}

impl<H> SceneComposer<H> {
    pub fn new() -> Self {
        Self {
            textures: TextureRegistry::new(),
            materials: MaterialTable::new(),
            lights: LightRig::study_desk(),
            steps: desk_scene(),
            missing_reported: HashSet::new(),
            teardown_reported: false,
        }
    }

    pub fn steps(&self) -> &[DrawStep] {
        &self.steps
    }

    /// Defines the scene's materials, applies the session default, and
    /// configures the light rig. Called once at scene setup.
    pub fn prepare_tables(&mut self, state: &mut ShaderState) {
        self.materials
            .define("matte", [1.0, 1.0, 1.0], [0.6, 0.6, 0.6], 32.0);
        self.materials
            .define("glass", [0.1, 0.1, 0.1], [0.6, 0.6, 0.6], 32.0);
        self.materials.apply("matte", state);

        self.lights.configure(state);
    }

    /// Executes the frame's draw list: per step, stage state then draw.
    pub fn render<T: DrawTarget>(&mut self, state: &mut ShaderState, target: &mut T) {
        if self.textures.is_released() {
            if !self.teardown_reported {
                log::error!("scene rendered after texture teardown; draws skipped");
                self.teardown_reported = true;
            }
            return;
        }

        for index in 0..self.steps.len() {
            let step = self.steps[index].clone();
            self.render_step(&step, state, target);
        }
    }

    fn render_step<T: DrawTarget>(
        &mut self,
        step: &DrawStep,
        state: &mut ShaderState,
        target: &mut T,
    ) {
        push_transform(
            state,
            step.scale,
            step.rotation_degrees.x,
            step.rotation_degrees.y,
            step.rotation_degrees.z,
            step.position,
        );

        match &step.appearance {
            Appearance::Color { rgba, material } => {
                self.stage_color(state, *rgba, *material);
            }
            Appearance::Textured { tag, uv_scale } => {
                let tag = *tag;
                if self.textures.contains(tag) {
                    state.set_bool(uniforms::USE_TEXTURE, true);
                    state.set_vec2(uniforms::UV_SCALE, (*uv_scale).into());
                    state.set_int(uniforms::OBJECT_TEXTURE, 0);
                    state.bind_texture(Some(tag));
                } else {
                    // texture never made it into the registry; fall back to a
                    // solid color so the object still reads in the scene
                    if self.missing_reported.insert(tag) {
                        log::warn!("texture '{tag}' missing; drawing solid fallback");
                    }
                    self.stage_color(state, FALLBACK_COLOR, None);
                }
            }
        }

        target.draw_mesh(step.mesh, state);
    }

    fn stage_color(
        &mut self,
        state: &mut ShaderState,
        rgba: [f32; 4],
        material: Option<&'static str>,
    ) {
        state.set_bool(uniforms::USE_TEXTURE, false);
        state.set_int(uniforms::OBJECT_TEXTURE, -1);
        state.bind_texture(None);
        state.set_vec4(uniforms::OBJECT_COLOR, rgba.into());
        if let Some(tag) = material {
            if !self.materials.apply(tag, state) && self.missing_reported.insert(tag) {
                log::warn!("material '{tag}' not defined; draw keeps previous material");
            }
        }
    }
}

impl<H> Default for SceneComposer<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneComposer<GpuTexture> {
    /// Loads the scene's texture files.
    ///
    /// A failed decode is logged (and recorded in the store when available)
    /// and leaves the tag absent; the affected objects draw in fallback color.
    pub fn load_textures(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
        store: &SceneStore,
    ) {
        let files: [(&str, &Path); 3] = [
            (TAG_WOOD, Path::new("assets/textures/wood_seamless.jpeg")),
            (
                TAG_MOUSE_BODY,
                Path::new("assets/textures/grey_mouse_body.jpeg"),
            ),
            (
                TAG_MOUSE_BUTTONS,
                Path::new("assets/textures/dark_mouse_buttons.jpeg"),
            ),
        ];

        for (tag, path) in files {
            if let Err(err) = self.textures.load(device, queue, layout, tag, path, false) {
                log::error!("texture '{tag}': {err}");
                store.log_error("texture", &err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::transform::compose_transform;
    use crate::gfx::shading::SceneBlock;
    use approx::assert_relative_eq;
    use cgmath::Matrix4;

    /// Draw target that snapshots the staged state at every draw.
    #[derive(Default)]
    struct RecordingTarget {
        draws: Vec<(MeshKind, SceneBlock, Option<String>)>,
    }

    impl DrawTarget for RecordingTarget {
        fn draw_mesh(&mut self, kind: MeshKind, state: &ShaderState) {
            self.draws.push((
                kind,
                *state.block(),
                state.texture_tag().map(str::to_string),
            ));
        }
    }

    fn prepared_composer() -> (SceneComposer<u8>, ShaderState) {
        let mut composer = SceneComposer::<u8>::new();
        let mut state = ShaderState::new();
        composer.prepare_tables(&mut state);
        (composer, state)
    }

    #[test]
    fn the_desk_scene_is_a_fixed_ordered_list() {
        let steps = desk_scene();
        assert_eq!(steps.len(), 11);
        assert_eq!(steps[0].mesh, MeshKind::Plane);
        assert!(matches!(
            steps[0].appearance,
            Appearance::Textured { tag: TAG_WOOD, .. }
        ));
        assert_eq!(steps[10].mesh, MeshKind::Box);
    }

    #[test]
    fn every_step_produces_one_draw_with_state_staged_first() {
        let (mut composer, mut state) = prepared_composer();
        let mut target = RecordingTarget::default();

        composer.render(&mut state, &mut target);
        assert_eq!(target.draws.len(), 11);

        // the keyboard draw carries its own transform and color
        let (kind, block, _) = &target.draws[4];
        assert_eq!(*kind, MeshKind::Box);
        assert_eq!(block.object_color, [0.9, 0.9, 0.9, 1.0]);
        let expected = compose_transform(
            Vector3::new(3.0, 0.3, 1.5),
            0.0,
            0.0,
            0.0,
            Vector3::new(1.0, 0.15, 0.0),
        );
        assert_relative_eq!(Matrix4::from(block.model), expected, epsilon = 1e-5);
    }

    #[test]
    fn missing_textures_fall_back_to_solid_color() {
        let (mut composer, mut state) = prepared_composer();
        let mut target = RecordingTarget::default();

        composer.render(&mut state, &mut target);

        let (_, desk_block, desk_texture) = &target.draws[0];
        assert_eq!(desk_block.use_texture, 0);
        assert_eq!(desk_block.object_color, FALLBACK_COLOR);
        assert!(desk_texture.is_none());
    }

    #[test]
    fn installed_textures_are_bound_with_their_uv_scale() {
        let (mut composer, mut state) = prepared_composer();
        composer.textures.install(TAG_WOOD, 1u8);
        let mut target = RecordingTarget::default();

        composer.render(&mut state, &mut target);

        let (_, desk_block, desk_texture) = &target.draws[0];
        assert_eq!(desk_block.use_texture, 1);
        assert_eq!(desk_block.uv_scale, [4.0, 2.0]);
        assert_eq!(desk_texture.as_deref(), Some(TAG_WOOD));

        // the untextured keyboard afterwards must reset the mode
        let (_, keyboard_block, keyboard_texture) = &target.draws[4];
        assert_eq!(keyboard_block.use_texture, 0);
        assert!(keyboard_texture.is_none());
    }

    #[test]
    fn glasses_draw_with_the_glass_material() {
        let (mut composer, mut state) = prepared_composer();
        let mut target = RecordingTarget::default();

        composer.render(&mut state, &mut target);

        let (kind, block, _) = &target.draws[8];
        assert_eq!(*kind, MeshKind::Torus);
        assert_eq!(block.material_diffuse, [0.1, 0.1, 0.1]);
        assert_eq!(block.material_specular, [0.6, 0.6, 0.6]);
        assert_eq!(block.object_color, [0.1, 0.1, 0.1, 1.0]);
    }

    #[test]
    fn rendering_after_teardown_draws_nothing() {
        let (mut composer, mut state) = prepared_composer();
        composer.textures.release_all();
        let mut target = RecordingTarget::default();

        composer.render(&mut state, &mut target);
        assert!(target.draws.is_empty());
    }

    #[test]
    fn prepare_tables_defines_both_materials() {
        let (composer, state) = prepared_composer();
        assert!(composer.materials.get("matte").is_some());
        assert!(composer.materials.get("glass").is_some());
        // session default material is staged
        assert_eq!(state.block().material_diffuse, [1.0, 1.0, 1.0]);
        assert_eq!(state.block().use_lighting, 1);
    }
}
