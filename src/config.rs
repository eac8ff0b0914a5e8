//! Development parameters.

/// How the per-tile and per-row work is executed.
///
/// Both backends produce identical output.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Backend {
    /// Single-threaded.
    Scalar,
    /// Tile rows on the rayon thread pool. Runs as [`Backend::Scalar`]
    /// when the crate is built without the `rayon` feature.
    Parallel,
}

/// Tone and processing parameters shared by the demosaic and thumbnail paths.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DevelopConfig {
    /// Contrast in percent; 0 leaves the curve linear.
    pub contrast: f32,
    /// Suppress isolated hot pixels before interpolating.
    pub denoise: bool,
    /// Added to the sensor's minimum code value before toning.
    pub black_level: i32,
    pub gamma: f32,
    pub backend: Backend,
}

impl Default for DevelopConfig {
    fn default() -> Self {
        Self {
            contrast: 50.0,
            denoise: true,
            black_level: 25,
            gamma: 2.2,
            backend: Backend::Parallel,
        }
    }
}

impl DevelopConfig {
    pub fn builder() -> DevelopConfigBuilder {
        DevelopConfigBuilder::default()
    }
}

/// Builder for DevelopConfig
#[derive(Default)]
pub struct DevelopConfigBuilder {
    contrast: Option<f32>,
    denoise: Option<bool>,
    black_level: Option<i32>,
    gamma: Option<f32>,
    backend: Option<Backend>,
}

impl DevelopConfigBuilder {
    pub fn contrast(mut self, contrast: f32) -> Self {
        self.contrast = Some(contrast);
        self
    }

    pub fn denoise(mut self, enable: bool) -> Self {
        self.denoise = Some(enable);
        self
    }

    pub fn black_level(mut self, black_level: i32) -> Self {
        self.black_level = Some(black_level);
        self
    }

    pub fn gamma(mut self, gamma: f32) -> Self {
        self.gamma = Some(gamma);
        self
    }

    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn build(self) -> DevelopConfig {
        let default = DevelopConfig::default();
        DevelopConfig {
            contrast: self.contrast.unwrap_or(default.contrast),
            denoise: self.denoise.unwrap_or(default.denoise),
            black_level: self.black_level.unwrap_or(default.black_level),
            gamma: self.gamma.unwrap_or(default.gamma),
            backend: self.backend.unwrap_or(default.backend),
        }
    }
}
