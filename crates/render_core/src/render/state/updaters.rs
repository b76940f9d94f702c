//! Standard uniform updaters
//!
//! Each updater reads the cached camera or texture matrix, or the draw's
//! material and transform. A missing camera contributes identity matrices.

use crate::foundation::math::Mat4;
use crate::render::api::{GraphicsApi, UniformLocation};

use super::uniforms::{UniformInputs, UniformName, UniformRegistry, UniformUpdater};

fn projection(inputs: &UniformInputs<'_>) -> Mat4 {
    inputs
        .camera
        .map_or_else(Mat4::identity, |camera| *camera.projection_matrix())
}

fn view(inputs: &UniformInputs<'_>) -> Mat4 {
    inputs
        .camera
        .map_or_else(Mat4::identity, |camera| *camera.view_matrix())
}

/// Uploads projection * view * model
#[derive(Debug, Default, Clone, Copy)]
pub struct ModelViewProjection;

impl UniformUpdater for ModelViewProjection {
    fn update(&self, gpu: &mut dyn GraphicsApi, location: UniformLocation, inputs: &UniformInputs<'_>) {
        let mvp = projection(inputs) * view(inputs) * inputs.transform;
        gpu.uniform_matrix4(location, &mvp);
    }
}

/// Uploads view * model
#[derive(Debug, Default, Clone, Copy)]
pub struct ModelView;

impl UniformUpdater for ModelView {
    fn update(&self, gpu: &mut dyn GraphicsApi, location: UniformLocation, inputs: &UniformInputs<'_>) {
        let model_view = view(inputs) * inputs.transform;
        gpu.uniform_matrix4(location, &model_view);
    }
}

/// Uploads the model transform
#[derive(Debug, Default, Clone, Copy)]
pub struct Model;

impl UniformUpdater for Model {
    fn update(&self, gpu: &mut dyn GraphicsApi, location: UniformLocation, inputs: &UniformInputs<'_>) {
        gpu.uniform_matrix4(location, inputs.transform);
    }
}

/// Uploads the camera view matrix
#[derive(Debug, Default, Clone, Copy)]
pub struct View;

impl UniformUpdater for View {
    fn update(&self, gpu: &mut dyn GraphicsApi, location: UniformLocation, inputs: &UniformInputs<'_>) {
        gpu.uniform_matrix4(location, &view(inputs));
    }
}

/// Uploads the camera projection matrix
#[derive(Debug, Default, Clone, Copy)]
pub struct Projection;

impl UniformUpdater for Projection {
    fn update(&self, gpu: &mut dyn GraphicsApi, location: UniformLocation, inputs: &UniformInputs<'_>) {
        gpu.uniform_matrix4(location, &projection(inputs));
    }
}

/// Uploads the material colour
#[derive(Debug, Default, Clone, Copy)]
pub struct MaterialColour;

impl UniformUpdater for MaterialColour {
    fn update(&self, gpu: &mut dyn GraphicsApi, location: UniformLocation, inputs: &UniformInputs<'_>) {
        gpu.uniform4f(location, inputs.material.colour());
    }
}

/// Uploads the cached texture matrix, identity when none is set
#[derive(Debug, Default, Clone, Copy)]
pub struct TextureMatrix;

impl UniformUpdater for TextureMatrix {
    fn update(&self, gpu: &mut dyn GraphicsApi, location: UniformLocation, inputs: &UniformInputs<'_>) {
        let matrix = inputs.texture_matrix.copied().unwrap_or_else(Mat4::identity);
        gpu.uniform_matrix4(location, &matrix);
    }
}

/// Points a sampler at a fixed texture unit
#[derive(Debug, Clone, Copy)]
pub struct SamplerUnit(pub u32);

impl UniformUpdater for SamplerUnit {
    fn update(&self, gpu: &mut dyn GraphicsApi, location: UniformLocation, _inputs: &UniformInputs<'_>) {
        gpu.uniform1i(location, i32::try_from(self.0).unwrap_or(i32::MAX));
    }
}

/// Register every standard updater in `registry`
pub fn register_standard(registry: &mut UniformRegistry) {
    registry.register(UniformName::ModelViewProjection, Box::new(ModelViewProjection));
    registry.register(UniformName::ModelView, Box::new(ModelView));
    registry.register(UniformName::Model, Box::new(Model));
    registry.register(UniformName::View, Box::new(View));
    registry.register(UniformName::Projection, Box::new(Projection));
    registry.register(UniformName::Colour, Box::new(MaterialColour));
    registry.register(UniformName::TextureMatrix, Box::new(TextureMatrix));
    registry.register(UniformName::Texture0, Box::new(SamplerUnit(0)));
    registry.register(UniformName::Texture1, Box::new(SamplerUnit(1)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Point3, Vec3};
    use crate::render::api::{ApiCall, TraceApi};
    use crate::render::primitives::Camera;
    use crate::render::resources::Material;
    use approx::assert_relative_eq;

    #[test]
    fn test_standard_registry_covers_standard_names() {
        let registry = UniformRegistry::standard();
        assert_eq!(registry.len(), UniformName::STANDARD.len());
        for name in UniformName::STANDARD.iter() {
            assert!(registry.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn test_mvp_combines_camera_and_transform() {
        let mut camera = Camera::perspective(60.0, 1.5, 0.1, 100.0);
        camera.look_at(Point3::new(0.0, 2.0, 5.0), Point3::origin(), Vec3::y());
        let transform = Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0));
        let material = Material::new();
        let inputs = UniformInputs {
            camera: Some(&camera),
            texture_matrix: None,
            material: &material,
            transform: &transform,
        };

        let mut api = TraceApi::new();
        let log = api.log();
        ModelViewProjection.update(&mut api, UniformLocation(4), &inputs);

        let expected = camera.projection_matrix() * camera.view_matrix() * transform;
        match log.snapshot().as_slice() {
            [ApiCall::UniformMatrix4(UniformLocation(4), uploaded)] => {
                assert_relative_eq!(*uploaded, expected, epsilon = 1e-6);
            }
            other => panic!("unexpected calls {:?}", other),
        }
    }

    #[test]
    fn test_missing_camera_uses_identity() {
        let transform = Mat4::new_scaling(2.0);
        let material = Material::new();
        let inputs = UniformInputs {
            camera: None,
            texture_matrix: None,
            material: &material,
            transform: &transform,
        };

        let mut api = TraceApi::new();
        let log = api.log();
        ModelViewProjection.update(&mut api, UniformLocation(0), &inputs);
        TextureMatrix.update(&mut api, UniformLocation(1), &inputs);
        SamplerUnit(1).update(&mut api, UniformLocation(2), &inputs);

        assert_eq!(
            log.snapshot(),
            vec![
                ApiCall::UniformMatrix4(UniformLocation(0), transform),
                ApiCall::UniformMatrix4(UniformLocation(1), Mat4::identity()),
                ApiCall::Uniform1i(UniformLocation(2), 1),
            ]
        );
    }
}
