//! Exports [`Mesh`], vertex (and optional index) data living in GPU buffers.
use gl::types::GLuint;

use crate::{
    error::RenderError,
    gl_api::{BufferTarget, Gl, Primitive},
    render_vec::{GlLayout, VertexLayout},
};

/// A vertex array object together with the buffers it references.
///
/// Contents are written once at upload time and never rewritten.
pub struct Mesh {
    gl: Gl,
    vao: GLuint,
    vbo: GLuint,
    ibo: Option<GLuint>,
    primitive: Primitive,
    vertex_count: usize,
    vertex_byte_len: usize,
    index_count: usize,
}

impl Mesh {
    /// Upload typed vertex records, plus an optional index list.
    ///
    /// # Errors
    /// Errors if `V` does not have the size its layout declares, if there are
    /// no vertices, or if an index is out of range.
    pub fn upload<V: GlLayout>(
        gl: &Gl,
        vertices: &[V],
        indices: Option<&[u32]>,
    ) -> Result<Self, RenderError> {
        let layout = V::gl_layout();
        if std::mem::size_of::<V>() != layout.stride() {
            return Err(RenderError::LayoutMismatch {
                stride: layout.stride(),
                byte_len: std::mem::size_of::<V>(),
            });
        }
        Self::upload_bytes(gl, &layout, bytemuck::cast_slice(vertices), indices)
    }

    /// Upload a flat float array interpreted through `layout`.
    ///
    /// # Errors
    /// Errors if the data is empty or not a whole number of records, or if an
    /// index is out of range.
    pub fn upload_raw(
        gl: &Gl,
        layout: &VertexLayout,
        vertices: &[f32],
        indices: Option<&[u32]>,
    ) -> Result<Self, RenderError> {
        Self::upload_bytes(gl, layout, bytemuck::cast_slice(vertices), indices)
    }

    fn upload_bytes(
        gl: &Gl,
        layout: &VertexLayout,
        bytes: &[u8],
        indices: Option<&[u32]>,
    ) -> Result<Self, RenderError> {
        let stride = layout.stride();
        if stride == 0 || bytes.is_empty() || bytes.len() % stride != 0 {
            return Err(RenderError::LayoutMismatch {
                stride,
                byte_len: bytes.len(),
            });
        }
        let vertex_count = bytes.len() / stride;
        if let Some(&index) = indices
            .unwrap_or_default()
            .iter()
            .find(|&&i| i as usize >= vertex_count)
        {
            return Err(RenderError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        let vao = gl.create_vertex_array();
        let vbo = gl.create_buffer();
        // Owns whatever was created so far; dropping it releases them.
        let mut mesh = Self {
            gl: Gl::clone(gl),
            vao,
            vbo,
            ibo: None,
            primitive: Primitive::Triangles,
            vertex_count,
            vertex_byte_len: bytes.len(),
            index_count: 0,
        };
        if vao == 0 || vbo == 0 {
            return Err(RenderError::BufferCreate);
        }

        // bind the VAO first, then bind and fill the vertex buffer, then declare attributes
        gl.bind_vertex_array(vao);
        gl.bind_buffer(BufferTarget::Array, vbo);
        gl.buffer_data(BufferTarget::Array, bytes);
        for attribute in layout.attributes() {
            gl.vertex_attrib_pointer(attribute, stride);
            gl.enable_vertex_attrib_array(attribute.location);
        }

        if let Some(indices) = indices {
            let ibo = gl.create_buffer();
            if ibo == 0 {
                gl.bind_vertex_array(0);
                return Err(RenderError::BufferCreate);
            }
            mesh.ibo = Some(ibo);
            // the element binding is recorded into the bound VAO
            gl.bind_buffer(BufferTarget::ElementArray, ibo);
            gl.buffer_data(BufferTarget::ElementArray, bytemuck::cast_slice(indices));
            mesh.index_count = indices.len();
        }

        // reset bound arrays; the VAO must be unbound before the element buffer
        gl.bind_vertex_array(0);
        gl.bind_buffer(BufferTarget::Array, 0);

        log::debug!(
            "Uploaded mesh vao {vao}: {} vertices ({} bytes, stride {stride}), {} indices",
            mesh.vertex_count,
            mesh.vertex_byte_len,
            mesh.index_count
        );
        Ok(mesh)
    }

    pub fn vao(&self) -> GLuint {
        self.vao
    }
    pub fn vbo(&self) -> GLuint {
        self.vbo
    }
    pub fn ibo(&self) -> Option<GLuint> {
        self.ibo
    }
    pub fn primitive(&self) -> Primitive {
        self.primitive
    }
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }
    pub fn vertex_byte_len(&self) -> usize {
        self.vertex_byte_len
    }
    pub fn index_count(&self) -> usize {
        self.index_count
    }
    pub fn index_byte_len(&self) -> usize {
        self.index_count * std::mem::size_of::<u32>()
    }
    pub fn is_indexed(&self) -> bool {
        self.ibo.is_some()
    }

    /// Bind the vertex array (and with it the element buffer) for drawing.
    pub fn bind(&self) {
        self.gl.bind_vertex_array(self.vao);
        self.gl.bind_buffer(BufferTarget::Array, self.vbo);
    }
    pub fn unbind(&self) {
        self.gl.bind_vertex_array(0);
    }

    /// Issue the single draw call for this mesh. The mesh must be bound.
    pub fn draw(&self) {
        if self.is_indexed() {
            self.gl.draw_elements(self.primitive, self.index_count);
        } else {
            self.gl.draw_arrays(self.primitive, 0, self.vertex_count);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        if let Some(ibo) = self.ibo {
            self.gl.delete_buffer(ibo);
        }
        if self.vbo != 0 {
            self.gl.delete_buffer(self.vbo);
        }
        if self.vao != 0 {
            self.gl.delete_vertex_array(self.vao);
        }
    }
}
