//! Model matrix composition for immediate-mode draws
//!
//! Every object in the scene is placed by one matrix built from scale, XYZ
//! Euler rotation in degrees, and translation. The multiplication order
//! `T * Rz * Ry * Rx * S` is a contract shared with every caller; changing it
//! silently changes what ends up on screen.

use cgmath::{Deg, Matrix4, Vector3};

use super::shading::{uniforms, UniformSink};

/// Builds the model matrix `T * Rz * Ry * Rx * S`.
pub fn compose_transform(
    scale: Vector3<f32>,
    x_rotation_degrees: f32,
    y_rotation_degrees: f32,
    z_rotation_degrees: f32,
    position: Vector3<f32>,
) -> Matrix4<f32> {
    let scale = Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z);
    let rotation_x = Matrix4::from_angle_x(Deg(x_rotation_degrees));
    let rotation_y = Matrix4::from_angle_y(Deg(y_rotation_degrees));
    let rotation_z = Matrix4::from_angle_z(Deg(z_rotation_degrees));
    let translation = Matrix4::from_translation(position);

    translation * rotation_z * rotation_y * rotation_x * scale
}

/// Composes the model matrix and immediately writes it to the sink's `model`
/// slot for the next draw.
pub fn push_transform<S: UniformSink>(
    sink: &mut S,
    scale: Vector3<f32>,
    x_rotation_degrees: f32,
    y_rotation_degrees: f32,
    z_rotation_degrees: f32,
    position: Vector3<f32>,
) {
    let model = compose_transform(
        scale,
        x_rotation_degrees,
        y_rotation_degrees,
        z_rotation_degrees,
        position,
    );
    sink.set_mat4(uniforms::MODEL, model);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::SquareMatrix;

    #[test]
    fn composition_order_is_translation_rz_ry_rx_scale() {
        let scale = Vector3::new(2.0, 0.5, 1.5);
        let position = Vector3::new(-2.0, 0.5, 3.0);
        let (rx, ry, rz) = (30.0, -45.0, 15.0);

        let expected = Matrix4::from_translation(position)
            * Matrix4::from_angle_z(Deg(rz))
            * Matrix4::from_angle_y(Deg(ry))
            * Matrix4::from_angle_x(Deg(rx))
            * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z);

        let composed = compose_transform(scale, rx, ry, rz, position);
        assert_relative_eq!(composed, expected, epsilon = 1e-5);
    }

    #[test]
    fn identity_inputs_compose_to_identity() {
        let composed = compose_transform(
            Vector3::new(1.0, 1.0, 1.0),
            0.0,
            0.0,
            0.0,
            Vector3::new(0.0, 0.0, 0.0),
        );
        assert_relative_eq!(composed, Matrix4::identity(), epsilon = 1e-6);
    }

    #[test]
    fn rotation_order_is_not_commutative() {
        // swapping the X and Z rotations must produce a different matrix,
        // otherwise the ordering contract would be untestable
        let scale = Vector3::new(1.0, 1.0, 1.0);
        let position = Vector3::new(0.0, 0.0, 0.0);

        let composed = compose_transform(scale, 90.0, 0.0, 45.0, position);
        let swapped = Matrix4::from_angle_x(Deg(45.0)) * Matrix4::from_angle_z(Deg(90.0));
        assert!(!approx::relative_eq!(composed, swapped, epsilon = 1e-5));
    }

    #[test]
    fn push_writes_the_model_slot() {
        let mut sink = crate::test_support::RecordingSink::new();
        let scale = Vector3::new(3.0, 0.3, 1.5);
        let position = Vector3::new(1.0, 0.15, 0.0);

        push_transform(&mut sink, scale, 0.0, 0.0, 0.0, position);

        let model = sink.mat4(uniforms::MODEL).expect("model must be written");
        assert_relative_eq!(
            model,
            compose_transform(scale, 0.0, 0.0, 0.0, position),
            epsilon = 1e-6
        );
        assert_eq!(sink.len(), 1);
    }
}
