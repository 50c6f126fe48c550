use crate::math::hex_to_linear_rgb;
use crate::scene::TextureId;

/// Surface appearance of a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Lit by the scene's lights (diffuse only)
    Standard {
        color: [f32; 3],
        map: Option<TextureId>,
        normal_map: Option<TextureId>,
    },
    /// Unlit, shows its color or map as-is
    Basic {
        color: [f32; 3],
        map: Option<TextureId>,
    },
}

impl Material {
    pub fn standard(hex: u32) -> Self {
        Material::Standard {
            color: hex_to_linear_rgb(hex),
            map: None,
            normal_map: None,
        }
    }

    pub fn standard_textured(map: TextureId, normal_map: Option<TextureId>) -> Self {
        Material::Standard {
            color: [1.0; 3],
            map: Some(map),
            normal_map,
        }
    }

    pub fn basic_textured(map: TextureId) -> Self {
        Material::Basic {
            color: [1.0; 3],
            map: Some(map),
        }
    }

    pub fn color(&self) -> [f32; 3] {
        match *self {
            Material::Standard { color, .. } | Material::Basic { color, .. } => color,
        }
    }

    pub fn is_lit(&self) -> bool {
        matches!(self, Material::Standard { .. })
    }

    pub fn map(&self) -> Option<TextureId> {
        match *self {
            Material::Standard { map, .. } | Material::Basic { map, .. } => map,
        }
    }

    pub fn normal_map(&self) -> Option<TextureId> {
        match *self {
            Material::Standard { normal_map, .. } => normal_map,
            Material::Basic { .. } => None,
        }
    }

    /// Whether this material samples the given texture
    pub fn uses(&self, texture: TextureId) -> bool {
        self.map() == Some(texture) || self.normal_map() == Some(texture)
    }
}
