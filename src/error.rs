use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageTranslateError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Rasterizer error: {0}")]
    RasterError(String),

    #[error("Detection error: {0}")]
    DetectError(String),

    #[error("Translation error: {0}")]
    TranslateError(String),

    #[error("Font error: {0}")]
    FontError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Report error: {0}")]
    ReportError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Generates factory methods for [`PageTranslateError`] variants that wrap a `String`.
macro_rules! error_constructors {
    ($(
        $(#[doc = $doc:expr])*
        $method:ident => $variant:ident
    ),* $(,)?) => {
        impl PageTranslateError {
            $(
                $(#[doc = $doc])*
                pub fn $method(msg: impl Into<String>) -> Self {
                    Self::$variant(msg.into())
                }
            )*
        }
    };
}

error_constructors! {
    /// Create a configuration error.
    config => ConfigError,
    /// Create a rasterizer error.
    raster => RasterError,
    /// Create a detection error.
    detect => DetectError,
    /// Create a translation error.
    translate => TranslateError,
    /// Create a font error.
    font => FontError,
    /// Create a render error.
    render => RenderError,
    /// Create a report error.
    report => ReportError,
}

impl From<serde_json::Error> for PageTranslateError {
    fn from(e: serde_json::Error) -> Self {
        Self::ReportError(e.to_string())
    }
}

impl From<serde_yml::Error> for PageTranslateError {
    fn from(e: serde_yml::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

impl From<image::ImageError> for PageTranslateError {
    fn from(e: image::ImageError) -> Self {
        Self::RasterError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PageTranslateError>;
