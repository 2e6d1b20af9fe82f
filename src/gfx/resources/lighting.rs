//! The scene's fixed light rig
//!
//! The shader exposes one directional slot, five point slots, and one spot
//! slot. The sink's uniform state persists across frames, so every slot's
//! active flag is written on configuration, including the inactive ones;
//! otherwise a slot enabled by an earlier configuration would keep shining.

use crate::gfx::shading::{uniforms, UniformSink, POINT_LIGHT_SLOTS};

#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub active: bool,
    pub direction: [f32; 3],
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            active: false,
            direction: [0.0, -1.0, 0.0],
            ambient: [0.0; 3],
            diffuse: [0.0; 3],
            specular: [0.0; 3],
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PointLight {
    pub active: bool,
    pub position: [f32; 3],
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpotLight {
    pub active: bool,
    pub position: [f32; 3],
    pub direction: [f32; 3],
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
}

/// All light slots the shader knows about.
#[derive(Debug, Clone, Copy, Default)]
pub struct LightRig {
    pub directional: DirectionalLight,
    pub points: [PointLight; POINT_LIGHT_SLOTS],
    pub spot: SpotLight,
}

impl LightRig {
    /// The desk scene's lighting: soft white daylight from above plus one
    /// warm red accent near the mouse.
    pub fn study_desk() -> Self {
        let mut points = [PointLight::default(); POINT_LIGHT_SLOTS];
        points[0] = PointLight {
            active: true,
            position: [1.0, 3.0, 2.0],
            ambient: [0.2, 0.1, 0.1],
            diffuse: [0.9, 0.3, 0.3],
            specular: [0.9, 0.3, 0.3],
        };

        Self {
            directional: DirectionalLight {
                active: true,
                direction: [-0.3, -1.0, -0.3],
                ambient: [0.3, 0.3, 0.3],
                diffuse: [0.6, 0.6, 0.6],
                specular: [1.0, 1.0, 1.0],
            },
            points,
            spot: SpotLight::default(),
        }
    }

    /// Enables lighting and writes every slot, inactive ones included.
    pub fn configure<S: UniformSink>(&self, sink: &mut S) {
        sink.set_bool(uniforms::USE_LIGHTING, true);
        self.push(sink);
    }

    /// Writes the rig to the sink. Active slots get their full data; inactive
    /// slots still get their active flag cleared.
    pub fn push<S: UniformSink>(&self, sink: &mut S) {
        sink.set_bool("directionalLight.bActive", self.directional.active);
        if self.directional.active {
            sink.set_vec3(
                "directionalLight.direction",
                self.directional.direction.into(),
            );
            sink.set_vec3("directionalLight.ambient", self.directional.ambient.into());
            sink.set_vec3("directionalLight.diffuse", self.directional.diffuse.into());
            sink.set_vec3(
                "directionalLight.specular",
                self.directional.specular.into(),
            );
        }

        for (index, point) in self.points.iter().enumerate() {
            sink.set_bool(&format!("pointLights[{index}].bActive"), point.active);
            if point.active {
                sink.set_vec3(
                    &format!("pointLights[{index}].position"),
                    point.position.into(),
                );
                sink.set_vec3(
                    &format!("pointLights[{index}].ambient"),
                    point.ambient.into(),
                );
                sink.set_vec3(
                    &format!("pointLights[{index}].diffuse"),
                    point.diffuse.into(),
                );
                sink.set_vec3(
                    &format!("pointLights[{index}].specular"),
                    point.specular.into(),
                );
            }
        }

        sink.set_bool("spotLight.bActive", self.spot.active);
        if self.spot.active {
            sink.set_vec3("spotLight.position", self.spot.position.into());
            sink.set_vec3("spotLight.direction", self.spot.direction.into());
            sink.set_vec3("spotLight.ambient", self.spot.ambient.into());
            sink.set_vec3("spotLight.diffuse", self.spot.diffuse.into());
            sink.set_vec3("spotLight.specular", self.spot.specular.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingSink;

    #[test]
    fn every_slot_flag_is_written() {
        let rig = LightRig::study_desk();
        let mut sink = RecordingSink::new();
        rig.configure(&mut sink);

        assert_eq!(sink.bool(uniforms::USE_LIGHTING), Some(true));
        assert_eq!(sink.bool("directionalLight.bActive"), Some(true));
        assert_eq!(sink.bool("pointLights[0].bActive"), Some(true));
        for index in 1..POINT_LIGHT_SLOTS {
            assert_eq!(
                sink.bool(&format!("pointLights[{index}].bActive")),
                Some(false),
                "slot {index} must be explicitly deactivated"
            );
        }
        assert_eq!(sink.bool("spotLight.bActive"), Some(false));
    }

    #[test]
    fn inactive_slots_carry_no_color_data() {
        let rig = LightRig::study_desk();
        let mut sink = RecordingSink::new();
        rig.push(&mut sink);

        assert!(sink.vec3("pointLights[1].diffuse").is_none());
        assert!(sink.vec3("spotLight.diffuse").is_none());
        assert!(sink.vec3("pointLights[0].diffuse").is_some());
    }

    #[test]
    fn study_desk_matches_the_fixed_rig() {
        let rig = LightRig::study_desk();
        assert_eq!(rig.directional.direction, [-0.3, -1.0, -0.3]);
        assert_eq!(rig.points[0].position, [1.0, 3.0, 2.0]);
        assert!(!rig.points[4].active);
        assert!(!rig.spot.active);
    }
}
