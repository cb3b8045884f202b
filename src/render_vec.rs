//! Vertex layouts: how an interleaved record maps onto shader attributes.
use bytemuck::{Pod, Zeroable};
use gl::types::{GLenum, GLint, GLuint};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlType {
    Float,  // f32
    Double, // f64
}

impl GlType {
    pub const fn get_size(&self) -> usize {
        match *self {
            GlType::Double => std::mem::size_of::<f64>(),
            GlType::Float => std::mem::size_of::<f32>(),
        }
    }
    pub const fn as_gl(&self) -> GLenum {
        match *self {
            GlType::Double => gl::DOUBLE,
            GlType::Float => gl::FLOAT,
        }
    }
}

/// One attribute declaration, as handed to `glVertexAttribPointer`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader `layout(location = ..)`.
    pub location: GLuint,
    /// 1 to 4.
    pub components: GLint,
    pub gl_type: GlType,
    /// Byte offset of the first component within one record.
    pub offset: usize,
}

impl VertexAttribute {
    pub const fn byte_size(&self) -> usize {
        self.components as usize * self.gl_type.get_size()
    }
}

/// An ordered, densely packed list of attributes.
///
/// Offsets are derived from declaration order, so the stride always equals
/// the sum of attribute sizes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    stride: usize,
}

impl VertexLayout {
    /// Build a layout from `(components, type)` pairs. Attribute `i` is bound
    /// to location `i`.
    pub fn new(attributes: &[(GLint, GlType)]) -> Self {
        let mut stride = 0;
        let mut list = Vec::with_capacity(attributes.len());
        for (location, &(components, gl_type)) in attributes.iter().enumerate() {
            let attribute = VertexAttribute {
                location: location as GLuint,
                components,
                gl_type,
                offset: stride,
            };
            stride += attribute.byte_size();
            list.push(attribute);
        }
        Self {
            attributes: list,
            stride,
        }
    }
    /// Three floats per vertex.
    pub fn position() -> Self {
        Self::new(&[(3, GlType::Float)])
    }
    /// Three position floats followed by three colour floats.
    pub fn position_color() -> Self {
        Self::new(&[(3, GlType::Float), (3, GlType::Float)])
    }
    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }
    pub fn stride(&self) -> usize {
        self.stride
    }
}

/// A vertex record that can be uploaded as raw bytes.
///
/// `Pod` guarantees the byte view; [`Mesh::upload`](crate::geometry::Mesh::upload)
/// still checks that `size_of::<Self>()` equals the layout stride.
pub trait GlLayout: Pod {
    fn gl_layout() -> VertexLayout;
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PositionVertex {
    pub position: [f32; 3],
}

impl GlLayout for PositionVertex {
    fn gl_layout() -> VertexLayout {
        VertexLayout::position()
    }
}

// If you're adding a field, update the layout below!
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl GlLayout for ColorVertex {
    fn gl_layout() -> VertexLayout {
        VertexLayout::position_color()
    }
}
