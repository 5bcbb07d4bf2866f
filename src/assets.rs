//! Where the textures live on disk. Decoding is kiss3d's business; this only decides
//! which files to hand over and whether they're there.

use std::path::{Path, PathBuf};

use crate::model::catalog::SurfaceTexture;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("texture root {path:?} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("missing texture {path:?}")]
    MissingTexture { path: PathBuf },

    #[error("missing cubemap face {face:?} at {path:?}")]
    MissingCubemapFace { face: CubeFace, path: PathBuf },
}

/// Faces of the background cubemap, in the usual +x, -x, +y, -y, +z, -z order.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

pub const CUBE_FACES: [CubeFace; 6] = [
    CubeFace::PositiveX,
    CubeFace::NegativeX,
    CubeFace::PositiveY,
    CubeFace::NegativeY,
    CubeFace::PositiveZ,
    CubeFace::NegativeZ,
];

impl CubeFace {
    pub fn file_name(self) -> &'static str {
        match self {
            CubeFace::PositiveX => "px.png",
            CubeFace::NegativeX => "nx.png",
            CubeFace::PositiveY => "py.png",
            CubeFace::NegativeY => "ny.png",
            CubeFace::PositiveZ => "pz.png",
            CubeFace::NegativeZ => "nz.png",
        }
    }
}

impl SurfaceTexture {
    pub fn file_name(self) -> &'static str {
        match self {
            SurfaceTexture::Mercury => "mercury.jpg",
            SurfaceTexture::Venus => "venus.jpg",
            SurfaceTexture::Earth => "earth.jpg",
            SurfaceTexture::Mars => "mars.jpg",
            SurfaceTexture::Jupiter => "jupiter.jpg",
            SurfaceTexture::Saturn => "saturn.jpg",
            SurfaceTexture::Uranus => "uranus.jpg",
            SurfaceTexture::Neptune => "neptune.jpg",
            SurfaceTexture::Moon => "moon.jpg",
            SurfaceTexture::SaturnRing => "saturn_ring.png",
        }
    }
}

const CUBEMAP_DIR: &str = "cubeMaps";

/// The six faces of the background, as files that are known to exist.
#[derive(Debug, Clone, PartialEq)]
pub struct Cubemap {
    pub faces: Vec<(CubeFace, PathBuf)>,
}

#[derive(Debug, Clone)]
pub struct TextureLibrary {
    root: PathBuf,
}

impl TextureLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, AssetError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(AssetError::NotADirectory { path: root });
        }
        Ok(TextureLibrary { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn surface_path(&self, texture: SurfaceTexture) -> PathBuf {
        self.root.join(texture.file_name())
    }

    pub fn cube_face_path(&self, face: CubeFace) -> PathBuf {
        self.root.join(CUBEMAP_DIR).join(face.file_name())
    }

    pub fn resolve_surface(&self, texture: SurfaceTexture) -> Result<PathBuf, AssetError> {
        let path = self.surface_path(texture);
        if path.is_file() {
            Ok(path)
        } else {
            Err(AssetError::MissingTexture { path })
        }
    }

    /// All six faces, or the first one that's missing.
    pub fn resolve_cubemap(&self) -> Result<Cubemap, AssetError> {
        let faces = CUBE_FACES
            .iter()
            .map(|&face| {
                let path = self.cube_face_path(face);
                if path.is_file() {
                    Ok((face, path))
                } else {
                    Err(AssetError::MissingCubemapFace { face, path })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Cubemap { faces })
    }
}
