use glam::Mat4;

/// Mesh vertex as uploaded to the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    /// xyz = tangent direction, w = bitangent sign
    pub tangent: [f32; 4],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
        3 => Float32x4
    ];

    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
            tangent: [1.0, 0.0, 0.0, 1.0],
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Colored line vertex used by helpers
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl LineVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3
    ];

    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Camera uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub _pad: f32,
}

/// Scene lighting: one point light plus ambient
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub point_position: [f32; 3],
    pub point_intensity: f32,
    pub point_color: [f32; 3],
    pub _pad1: f32,
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
}

/// Per-object transform and material parameters
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of the model matrix, padded to a mat4 for WGSL alignment
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// x = lit, y = has normal map
    pub flags: [u32; 4],
}

impl ObjectUniform {
    pub fn new(model: Mat4, color: [f32; 3], lit: bool, has_normal_map: bool) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            color: [color[0], color[1], color[2], 1.0],
            flags: [lit as u32, has_normal_map as u32, 0, 0],
        }
    }
}

/// Fits the background texture over the viewport like CSS `cover`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BackgroundUniform {
    pub uv_scale: [f32; 2],
    pub _pad: [f32; 2],
}

impl BackgroundUniform {
    pub fn cover(viewport: (u32, u32), texture: (u32, u32)) -> Self {
        let (vw, vh) = (viewport.0.max(1) as f32, viewport.1.max(1) as f32);
        let (tw, th) = (texture.0.max(1) as f32, texture.1.max(1) as f32);
        let viewport_aspect = vw / vh;
        let texture_aspect = tw / th;

        let uv_scale = if viewport_aspect > texture_aspect {
            [1.0, texture_aspect / viewport_aspect]
        } else {
            [viewport_aspect / texture_aspect, 1.0]
        };

        Self {
            uv_scale,
            _pad: [0.0; 2],
        }
    }
}
