//! Reading shader text from disk.
use std::{ffi::CString, fs, path::Path};

use crate::error::RenderError;

/// Read a shader file into a NUL-terminated string ready for `glShaderSource`.
///
/// Every line comes back terminated by `\n`, including the last one. An empty
/// file yields an empty string; the compiler rejects it later.
///
/// # Errors
/// Errors if the file cannot be read, or if it contains a NUL byte.
pub fn load_shader_source(path: impl AsRef<Path>) -> Result<CString, RenderError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| RenderError::ShaderSource {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "Loaded {} bytes of shader source from {}",
        text.len(),
        path.display()
    );
    source_to_cstring(&text, &path.display().to_string())
}

/// Normalise line endings and convert to a [`CString`].
pub fn source_to_cstring(text: &str, what: &str) -> Result<CString, RenderError> {
    let mut normalised = String::with_capacity(text.len() + 1);
    for line in text.lines() {
        normalised.push_str(line);
        normalised.push('\n');
    }
    CString::new(normalised).map_err(|_| RenderError::InvalidCString {
        what: what.to_owned(),
    })
}
