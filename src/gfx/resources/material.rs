//! Material definitions keyed by tag
//!
//! Materials are immutable once defined for a session and looked up by tag.
//! A successful lookup pushes the material's values straight to the uniform
//! sink; in an immediate-mode pipeline the lookup *is* the application.

use std::collections::HashMap;

use crate::gfx::shading::{uniforms, UniformSink};

/// Phong-style surface description.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub tag: String,
    pub diffuse_color: [f32; 3],
    pub specular_color: [f32; 3],
    pub shininess: f32,
}

/// Session-wide material collection.
pub struct MaterialTable {
    materials: HashMap<String, Material>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self {
            materials: HashMap::new(),
        }
    }

    /// Inserts a material, overwriting any previous definition for the tag.
    pub fn define(
        &mut self,
        tag: &str,
        diffuse_color: [f32; 3],
        specular_color: [f32; 3],
        shininess: f32,
    ) {
        self.materials.insert(
            tag.to_string(),
            Material {
                tag: tag.to_string(),
                diffuse_color,
                specular_color,
                shininess,
            },
        );
    }

    pub fn get(&self, tag: &str) -> Option<&Material> {
        self.materials.get(tag)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Looks up `tag` and, on a hit, pushes its diffuse/specular/shininess to
    /// the sink for the next draw. Returns whether the material was found;
    /// a miss writes nothing.
    pub fn apply<S: UniformSink>(&self, tag: &str, sink: &mut S) -> bool {
        match self.get(tag) {
            Some(material) => {
                sink.set_vec3(uniforms::MATERIAL_DIFFUSE, material.diffuse_color.into());
                sink.set_vec3(uniforms::MATERIAL_SPECULAR, material.specular_color.into());
                sink.set_float(uniforms::MATERIAL_SHININESS, material.shininess);
                true
            }
            None => false,
        }
    }
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingSink;
    use cgmath::Vector3;

    #[test]
    fn apply_pushes_exactly_the_defined_values() {
        let mut table = MaterialTable::new();
        table.define("glass", [0.1, 0.1, 0.1], [0.6, 0.6, 0.6], 32.0);

        let mut sink = RecordingSink::new();
        assert!(table.apply("glass", &mut sink));

        assert_eq!(sink.len(), 3);
        assert_eq!(
            sink.vec3(uniforms::MATERIAL_DIFFUSE),
            Some(Vector3::new(0.1, 0.1, 0.1))
        );
        assert_eq!(
            sink.vec3(uniforms::MATERIAL_SPECULAR),
            Some(Vector3::new(0.6, 0.6, 0.6))
        );
        assert_eq!(sink.float(uniforms::MATERIAL_SHININESS), Some(32.0));
    }

    #[test]
    fn unknown_tag_writes_nothing() {
        let mut table = MaterialTable::new();
        table.define("glass", [0.1, 0.1, 0.1], [0.6, 0.6, 0.6], 32.0);

        let mut sink = RecordingSink::new();
        assert!(!table.apply("unknown", &mut sink));
        assert!(sink.is_empty());
    }

    #[test]
    fn redefining_a_tag_overwrites_it() {
        let mut table = MaterialTable::new();
        table.define("wood", [0.5, 0.3, 0.1], [0.2, 0.2, 0.2], 8.0);
        table.define("wood", [0.6, 0.4, 0.2], [0.1, 0.1, 0.1], 4.0);

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("wood").unwrap().shininess, 4.0);
    }
}
