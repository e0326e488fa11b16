//! Runtime configuration.
//!
//! Defaults reproduce the demo scene. A few settings can be overridden from
//! the environment:
//!
//! - `ROTATING_SHAPES_ASSETS`: asset root directory (native) or path below the page origin (web)
//! - `ROTATING_SHAPES_FRAME_LIMIT`: stop after this many frames
//! - `ROTATING_SHAPES_ASPECT`: `fixed` keeps the 2:1 projection, `surface` follows the window size

pub const ASSETS_VAR: &str = "ROTATING_SHAPES_ASSETS";
pub const FRAME_LIMIT_VAR: &str = "ROTATING_SHAPES_FRAME_LIMIT";
pub const ASPECT_VAR: &str = "ROTATING_SHAPES_ASPECT";

/// How the camera projection picks its aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AspectRatio {
    /// Always use this ratio, whatever the surface size.
    Fixed(f32),
    /// Width over height of the surface, updated on resize.
    FollowSurface,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub title: String,
    /// Id of the canvas element the web build draws into.
    pub canvas_id: String,
    pub asset_root: String,
    pub clear_colour: wgpu::Color,
    pub aspect: AspectRatio,
    pub frame_limit: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "rotating shapes".to_string(),
            canvas_id: "c".to_string(),
            asset_root: "assets".to_string(),
            clear_colour: wgpu::Color::BLACK,
            aspect: AspectRatio::Fixed(2.0),
            frame_limit: None,
        }
    }
}

impl Config {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::from_vars(std::env::vars())
        }
        #[cfg(target_arch = "wasm32")]
        {
            Self::default()
        }
    }

    /// Defaults overridden by the given variables. Unknown variables are ignored and
    /// malformed values are logged and skipped.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in vars {
            let value = value.as_ref().trim();
            match key.as_ref() {
                ASSETS_VAR if !value.is_empty() => config.asset_root = value.to_string(),
                FRAME_LIMIT_VAR => match value.parse::<u64>() {
                    Ok(0) => config.frame_limit = None,
                    Ok(limit) => config.frame_limit = Some(limit),
                    Err(e) => log::warn!("Ignoring {}={:?}: {}", FRAME_LIMIT_VAR, value, e),
                },
                ASPECT_VAR => match value.to_ascii_lowercase().as_str() {
                    "fixed" => config.aspect = AspectRatio::Fixed(2.0),
                    "surface" => config.aspect = AspectRatio::FollowSurface,
                    other => log::warn!("Ignoring {}={:?}: expected fixed or surface", ASPECT_VAR, other),
                },
                _ => (),
            }
        }
        config
    }
}
