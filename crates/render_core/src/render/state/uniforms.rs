//! Uniform updater registry
//!
//! Uniform locations differ per program, but the way a uniform's value is
//! computed depends only on its name. The registry maps each [`UniformName`]
//! to a [`UniformUpdater`] strategy; on every draw the render state walks the
//! bound shader's uniform table and lets the matching updater upload.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::foundation::math::Mat4;
use crate::render::api::{GraphicsApi, UniformLocation};
use crate::render::primitives::Camera;
use crate::render::resources::Material;
use crate::render::{RenderError, RenderResult};

/// Name of a shader uniform
///
/// The engine's standard names are variants so they hash and compare without
/// touching strings; anything else is carried as [`UniformName::Custom`].
/// Parsing maps the standard spellings onto their variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UniformName {
    /// `u_mvp`: projection * view * model
    ModelViewProjection,
    /// `u_modelView`: view * model
    ModelView,
    /// `u_model`: the draw's transform
    Model,
    /// `u_view`: camera view matrix
    View,
    /// `u_projection`: camera projection matrix
    Projection,
    /// `u_color`: material base colour
    Colour,
    /// `u_textureMatrix`: current texture matrix
    TextureMatrix,
    /// `u_texture0`: sampler bound to unit 0
    Texture0,
    /// `u_texture1`: sampler bound to unit 1
    Texture1,
    /// Any other uniform
    Custom(String),
}

impl UniformName {
    /// The standard names, in declaration order
    pub const STANDARD: [UniformName; 9] = [
        UniformName::ModelViewProjection,
        UniformName::ModelView,
        UniformName::Model,
        UniformName::View,
        UniformName::Projection,
        UniformName::Colour,
        UniformName::TextureMatrix,
        UniformName::Texture0,
        UniformName::Texture1,
    ];

    /// The name as declared in shader source
    pub fn as_str(&self) -> &str {
        match self {
            UniformName::ModelViewProjection => "u_mvp",
            UniformName::ModelView => "u_modelView",
            UniformName::Model => "u_model",
            UniformName::View => "u_view",
            UniformName::Projection => "u_projection",
            UniformName::Colour => "u_color",
            UniformName::TextureMatrix => "u_textureMatrix",
            UniformName::Texture0 => "u_texture0",
            UniformName::Texture1 => "u_texture1",
            UniformName::Custom(name) => name,
        }
    }
}

impl FromStr for UniformName {
    type Err = Infallible;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Ok(Self::STANDARD
            .iter()
            .find(|standard| standard.as_str() == name)
            .cloned()
            .unwrap_or_else(|| UniformName::Custom(name.to_string())))
    }
}

impl From<&str> for UniformName {
    fn from(name: &str) -> Self {
        match name.parse() {
            Ok(parsed) => parsed,
            Err(never) => match never {},
        }
    }
}

impl From<String> for UniformName {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl fmt::Display for UniformName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything an updater may read when computing a value
#[derive(Debug, Clone, Copy)]
pub struct UniformInputs<'a> {
    /// Camera cached by the last `set_camera`, if any
    pub camera: Option<&'a Camera>,
    /// Texture matrix cached by the last `set_texture_matrix`, if any
    pub texture_matrix: Option<&'a Mat4>,
    /// Material of the draw
    pub material: &'a Material,
    /// Model transform of the draw
    pub transform: &'a Mat4,
}

/// Strategy computing and uploading one named uniform
pub trait UniformUpdater {
    /// Upload this uniform's value to `location` of the current program
    fn update(&self, gpu: &mut dyn GraphicsApi, location: UniformLocation, inputs: &UniformInputs<'_>);
}

/// Adapter turning a closure into a [`UniformUpdater`]
pub struct FnUpdater<F> {
    update: F,
}

impl<F> FnUpdater<F>
where
    F: Fn(&mut dyn GraphicsApi, UniformLocation, &UniformInputs<'_>),
{
    /// Wrap `update`
    pub fn new(update: F) -> Self {
        Self { update }
    }
}

impl<F> UniformUpdater for FnUpdater<F>
where
    F: Fn(&mut dyn GraphicsApi, UniformLocation, &UniformInputs<'_>),
{
    fn update(&self, gpu: &mut dyn GraphicsApi, location: UniformLocation, inputs: &UniformInputs<'_>) {
        (self.update)(gpu, location, inputs);
    }
}

/// Name-keyed collection of uniform updaters
#[derive(Default)]
pub struct UniformRegistry {
    updaters: HashMap<UniformName, Box<dyn UniformUpdater>>,
}

impl fmt::Debug for UniformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.updaters.keys()).finish()
    }
}

impl UniformRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the standard updaters
    pub fn standard() -> Self {
        let mut registry = Self::new();
        super::updaters::register_standard(&mut registry);
        registry
    }

    /// Register `updater` for `name`
    ///
    /// Registering a name twice replaces the earlier updater; the replaced
    /// one is returned and the collision is logged.
    pub fn register(
        &mut self,
        name: impl Into<UniformName>,
        updater: Box<dyn UniformUpdater>,
    ) -> Option<Box<dyn UniformUpdater>> {
        let name = name.into();
        let previous = self.updaters.insert(name.clone(), updater);
        if previous.is_some() {
            log::warn!("Uniform updater for '{}' replaced", name);
        } else {
            log::debug!("Uniform updater registered for '{}'", name);
        }
        previous
    }

    /// Remove the updater for `name`
    pub fn unregister(&mut self, name: &UniformName) -> Option<Box<dyn UniformUpdater>> {
        self.updaters.remove(name)
    }

    /// Whether `name` has an updater
    pub fn contains(&self, name: &UniformName) -> bool {
        self.updaters.contains_key(name)
    }

    /// Number of registered updaters
    pub fn len(&self) -> usize {
        self.updaters.len()
    }

    /// Whether no updater is registered
    pub fn is_empty(&self) -> bool {
        self.updaters.is_empty()
    }

    /// Run the updater of every uniform in `uniforms`
    ///
    /// Uniforms without an updater do not stop the pass; they are collected
    /// and returned as [`RenderError::MissingUniformUpdaters`] afterwards.
    pub fn dispatch(
        &self,
        gpu: &mut dyn GraphicsApi,
        uniforms: &[(UniformName, UniformLocation)],
        inputs: &UniformInputs<'_>,
    ) -> RenderResult<()> {
        let mut missing = Vec::new();

        for (name, location) in uniforms {
            match self.updaters.get(name) {
                Some(updater) => updater.update(gpu, *location, inputs),
                None => missing.push(name.clone()),
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            log::warn!(
                "No uniform updater registered for {}",
                crate::render::join_names(&missing)
            );
            Err(RenderError::MissingUniformUpdaters(missing))
        }
    }
}
