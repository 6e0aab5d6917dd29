use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use glam::Mat4;
use image::RgbaImage;

use super::error::{AssetError, AssetKind};

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// A WGSL program: vertex stage followed by fragment stage in one module.
#[derive(Debug, Clone)]
pub struct Shader {
    name: Arc<str>,
    source: Arc<str>,
    projection: Mat4,
}

impl Shader {
    pub fn new(name: impl Into<Arc<str>>, source: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            projection: Mat4::IDENTITY,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn set_projection(&mut self, projection: Mat4) -> &mut Self {
        self.projection = projection;
        self
    }
}

/// Cheap reference to a cached texture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureHandle {
    name: Arc<str>,
    width: u32,
    height: u32,
}

impl TextureHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[derive(Debug, Clone)]
pub struct Texture2D {
    pub handle: TextureHandle,
    pub has_alpha: bool,
    pub image: RgbaImage,
}

impl Texture2D {
    pub fn from_image(name: &str, mut image: RgbaImage, has_alpha: bool) -> Self {
        if !has_alpha {
            for pixel in image.pixels_mut() {
                pixel.0[3] = u8::MAX;
            }
        }
        Self {
            handle: TextureHandle {
                name: name.into(),
                width: image.width(),
                height: image.height(),
            },
            has_alpha,
            image,
        }
    }
}

/// Named cache of shaders and textures, loaded once at startup.
#[derive(Default, Debug)]
pub struct ResourceManager {
    shaders: HashMap<String, Shader>,
    textures: HashMap<String, Texture2D>,
}

impl ResourceManager {
    /// Reads both stages and joins them into one module. wgpu has no geometry
    /// stage, so passing one is rejected.
    pub fn load_shader(
        &mut self,
        vertex_path: &Path,
        fragment_path: &Path,
        geometry_path: Option<&Path>,
        name: &str,
    ) -> Result<Shader, AssetError> {
        if let Some(path) = geometry_path {
            return Err(AssetError::ShaderCompile {
                name: name.to_string(),
                message: format!("geometry stage {} is not supported", path.display()),
            });
        }

        let vertex = read_text(vertex_path)?;
        let fragment = read_text(fragment_path)?;
        let source = format!("{vertex}\n{fragment}");
        for entry in [VERTEX_ENTRY, FRAGMENT_ENTRY] {
            if !source.contains(&format!("fn {entry}")) {
                return Err(AssetError::ShaderCompile {
                    name: name.to_string(),
                    message: format!("missing entry point `{entry}`"),
                });
            }
        }

        tracing::debug!(
            target: "assets",
            %name,
            vertex = %vertex_path.display(),
            fragment = %fragment_path.display(),
            "loaded shader"
        );
        let shader = Shader::new(name, source);
        self.shaders.insert(name.to_string(), shader.clone());
        Ok(shader)
    }

    pub fn get_shader(&self, name: &str) -> Result<Shader, AssetError> {
        self.shaders.get(name).cloned().ok_or_else(|| AssetError::UnknownAsset {
            kind: AssetKind::Shader,
            name: name.to_string(),
        })
    }

    pub fn shader_mut(&mut self, name: &str) -> Result<&mut Shader, AssetError> {
        self.shaders.get_mut(name).ok_or_else(|| AssetError::UnknownAsset {
            kind: AssetKind::Shader,
            name: name.to_string(),
        })
    }

    pub fn load_texture(
        &mut self,
        path: &Path,
        has_alpha: bool,
        name: &str,
    ) -> Result<TextureHandle, AssetError> {
        let bytes = std::fs::read(path).map_err(|err| AssetError::from_io(path, err))?;
        let image = image::load_from_memory(&bytes)
            .map_err(|source| AssetError::ImageDecode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();

        let texture = Texture2D::from_image(name, image, has_alpha);
        let handle = texture.handle.clone();
        tracing::debug!(
            target: "assets",
            %name,
            path = %path.display(),
            width = handle.width,
            height = handle.height,
            has_alpha,
            "loaded texture"
        );
        self.textures.insert(name.to_string(), texture);
        Ok(handle)
    }

    pub fn insert_texture(&mut self, texture: Texture2D) -> TextureHandle {
        let handle = texture.handle.clone();
        self.textures.insert(handle.name().to_string(), texture);
        handle
    }

    pub fn get_texture(&self, name: &str) -> Result<TextureHandle, AssetError> {
        self.texture(name).map(|texture| texture.handle.clone())
    }

    pub fn texture(&self, name: &str) -> Result<&Texture2D, AssetError> {
        self.textures.get(name).ok_or_else(|| AssetError::UnknownAsset {
            kind: AssetKind::Texture,
            name: name.to_string(),
        })
    }

    pub fn shaders(&self) -> impl Iterator<Item = &Shader> {
        self.shaders.values()
    }

    pub fn textures(&self) -> impl Iterator<Item = &Texture2D> {
        self.textures.values()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn clear(&mut self) {
        self.shaders.clear();
        self.textures.clear();
    }
}

fn read_text(path: &Path) -> Result<String, AssetError> {
    std::fs::read_to_string(path).map_err(|err| AssetError::from_io(path, err))
}
