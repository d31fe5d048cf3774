use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeFormat {
    Rg32Float,
    Rgba32Float,
}

impl AttributeFormat {
    pub fn size(self) -> usize {
        match self {
            AttributeFormat::Rg32Float => 2 * size_of::<f32>(),
            AttributeFormat::Rgba32Float => 4 * size_of::<f32>(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Semantic {
    Position,
    TexCoord,
    Color,
}

impl Semantic {
    /// The HLSL semantic name, without index.
    pub fn name(self) -> &'static str {
        match self {
            Semantic::Position => "POSITION",
            Semantic::TexCoord => "TEXCOORD",
            Semantic::Color => "COLOR",
        }
    }
}

/// One element of an input-assembler layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    pub semantic: Semantic,
    pub semantic_index: u32,
    pub format: AttributeFormat,
    pub offset: usize,
}

pub trait Vertex: Pod {
    const ATTRIBUTES: &'static [VertexAttribute];

    fn stride() -> usize {
        size_of::<Self>()
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: Vec2,
    pub uv: Vec2,
    pub color: Vec4,
}

impl TexturedVertex {
    pub const fn new(position: Vec2, uv: Vec2, color: Vec4) -> Self {
        Self {
            position,
            uv,
            color,
        }
    }
}

impl Vertex for TexturedVertex {
    const ATTRIBUTES: &'static [VertexAttribute] = &[
        VertexAttribute {
            semantic: Semantic::Position,
            semantic_index: 0,
            format: AttributeFormat::Rg32Float,
            offset: std::mem::offset_of!(TexturedVertex, position),
        },
        VertexAttribute {
            semantic: Semantic::TexCoord,
            semantic_index: 0,
            format: AttributeFormat::Rg32Float,
            offset: std::mem::offset_of!(TexturedVertex, uv),
        },
        VertexAttribute {
            semantic: Semantic::Color,
            semantic_index: 0,
            format: AttributeFormat::Rgba32Float,
            offset: std::mem::offset_of!(TexturedVertex, color),
        },
    ];
}

/// A compute-simulated point, read by the vertex shader as `POSITION`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Particle {
    pub position: Vec4,
}

impl Particle {
    pub const fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec4::new(x, y, 0.0, 0.0),
        }
    }
}

impl Vertex for Particle {
    const ATTRIBUTES: &'static [VertexAttribute] = &[VertexAttribute {
        semantic: Semantic::Position,
        semantic_index: 0,
        format: AttributeFormat::Rgba32Float,
        offset: 0,
    }];
}

pub const QUAD_VERTICES: [TexturedVertex; 4] = [
    TexturedVertex::new(
        Vec2::new(0.5, 0.5),
        Vec2::new(1.0, 0.0),
        Vec4::new(1.0, 0.0, 0.0, 1.0),
    ),
    TexturedVertex::new(
        Vec2::new(0.5, -0.5),
        Vec2::new(1.0, 1.0),
        Vec4::new(0.0, 1.0, 0.0, 1.0),
    ),
    TexturedVertex::new(
        Vec2::new(-0.5, -0.5),
        Vec2::new(0.0, 1.0),
        Vec4::new(0.0, 0.0, 1.0, 1.0),
    ),
    TexturedVertex::new(
        Vec2::new(-0.5, 0.5),
        Vec2::new(0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 1.0),
    ),
];

pub const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

pub const TRIANGLE_PARTICLES: [Particle; 3] = [
    Particle::new(0.0, 0.25),
    Particle::new(0.25, -0.25),
    Particle::new(-0.25, -0.25),
];

#[cfg(test)]
mod tests {
    use super::{
        AttributeFormat, Particle, TexturedVertex, Vertex, QUAD_INDICES, QUAD_VERTICES,
        TRIANGLE_PARTICLES,
    };

    #[test]
    fn textured_vertex_layout() {
        assert_eq!(TexturedVertex::stride(), 32);

        let offsets = TexturedVertex::ATTRIBUTES
            .iter()
            .map(|a| (a.semantic.name(), a.offset))
            .collect::<Vec<_>>();
        assert_eq!(
            offsets,
            vec![("POSITION", 0), ("TEXCOORD", 8), ("COLOR", 16)]
        );
    }

    #[test]
    fn attributes_fill_the_whole_stride() {
        let last = TexturedVertex::ATTRIBUTES.last().unwrap();

        assert_eq!(last.offset + last.format.size(), TexturedVertex::stride());
    }

    #[test]
    fn particle_layout() {
        assert_eq!(Particle::stride(), 16);
        assert_eq!(Particle::ATTRIBUTES.len(), 1);
        assert_eq!(Particle::ATTRIBUTES[0].format, AttributeFormat::Rgba32Float);
    }

    #[test]
    fn quad_indices_form_two_triangles_over_four_vertices() {
        assert_eq!(QUAD_INDICES.len(), 6);
        assert!(QUAD_INDICES
            .iter()
            .all(|&i| (i as usize) < QUAD_VERTICES.len()));
    }

    #[test]
    fn quad_bytes_match_stride() {
        let bytes: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);

        assert_eq!(bytes.len(), 4 * 8 * size_of::<f32>());
    }

    #[test]
    fn particles_start_as_a_centered_triangle() {
        let floats: &[f32] = bytemuck::cast_slice(&TRIANGLE_PARTICLES);

        assert_eq!(
            floats,
            &[0.0, 0.25, 0.0, 0.0, 0.25, -0.25, 0.0, 0.0, -0.25, -0.25, 0.0, 0.0]
        );
    }
}
