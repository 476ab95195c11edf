use crate::AssetError;
use std::path::Path;

/// GLSL sources for one vertex + fragment program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

/// Read a vertex and fragment shader from disk.
///
/// Both files are read in full before anything is returned; there is no
/// include handling or preprocessing.
pub fn read_shader_pair(
    vertex_path: impl AsRef<Path>,
    fragment_path: impl AsRef<Path>,
) -> Result<ShaderSource, AssetError> {
    let vertex = read_text(vertex_path.as_ref())?;
    let fragment = read_text(fragment_path.as_ref())?;
    Ok(ShaderSource { vertex, fragment })
}

fn read_text(path: &Path) -> Result<String, AssetError> {
    let text = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "read shader source");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_both_stages() {
        let mut vert = tempfile::NamedTempFile::new().unwrap();
        let mut frag = tempfile::NamedTempFile::new().unwrap();
        write!(vert, "#version 330 core\nvoid main() {{}}\n").unwrap();
        write!(frag, "#version 330 core\nout vec4 c;\nvoid main() {{ c = vec4(1.0); }}\n").unwrap();

        let pair = read_shader_pair(vert.path(), frag.path()).unwrap();
        assert!(pair.vertex.starts_with("#version 330 core"));
        assert!(pair.fragment.contains("out vec4 c;"));
    }

    #[test]
    fn missing_fragment_reports_its_path() {
        let vert = tempfile::NamedTempFile::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.frag");

        let err = read_shader_pair(vert.path(), &missing).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
        assert_eq!(err.path(), missing.as_path());
    }
}
