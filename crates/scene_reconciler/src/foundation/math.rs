//! Math utilities and types
//!
//! Provides the math types that back settable scene properties. Vectors and
//! quaternions come from nalgebra; Euler angles and colours are small local
//! types because they carry extra semantics (rotation order, colour codes).

pub use nalgebra::{Quaternion, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// Raw (not necessarily normalized) quaternion
pub type Quat = Quaternion<f32>;

/// Rotation order for [`Euler`] angles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EulerOrder {
    /// X, then Y, then Z
    #[default]
    Xyz,
    /// Y, then Z, then X
    Yzx,
    /// Z, then X, then Y
    Zxy,
    /// X, then Z, then Y
    Xzy,
    /// Y, then X, then Z
    Yxz,
    /// Z, then Y, then X
    Zyx,
}

impl EulerOrder {
    /// Parse an order code such as `"XYZ"` (case-insensitive)
    pub fn parse(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "XYZ" => Some(Self::Xyz),
            "YZX" => Some(Self::Yzx),
            "ZXY" => Some(Self::Zxy),
            "XZY" => Some(Self::Xzy),
            "YXZ" => Some(Self::Yxz),
            "ZYX" => Some(Self::Zyx),
            _ => None,
        }
    }

    /// The canonical order code
    pub fn code(self) -> &'static str {
        match self {
            Self::Xyz => "XYZ",
            Self::Yzx => "YZX",
            Self::Zxy => "ZXY",
            Self::Xzy => "XZY",
            Self::Yxz => "YXZ",
            Self::Zyx => "ZYX",
        }
    }
}

/// Euler angles in radians with an explicit rotation order
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Euler {
    /// Rotation around X
    pub x: f32,
    /// Rotation around Y
    pub y: f32,
    /// Rotation around Z
    pub z: f32,
    /// Order the rotations are applied in
    pub order: EulerOrder,
}

impl Euler {
    /// Create Euler angles with the default `XYZ` order
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, order: EulerOrder::Xyz }
    }

    /// Replace the rotation order
    pub fn with_order(mut self, order: EulerOrder) -> Self {
        self.order = order;
        self
    }
}

/// Linear RGB colour with channels in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    /// Pure white
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };

    /// Create a colour from channel values
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a colour from a `0xRRGGBB` code
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// Convert back to a `0xRRGGBB` code
    pub fn to_hex(self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Parse a colour string: `#rrggbb`, `#rgb`, or a named colour
    pub fn parse(style: &str) -> Option<Self> {
        let style = style.trim();
        if let Some(digits) = style.strip_prefix('#') {
            return match digits.len() {
                6 => u32::from_str_radix(digits, 16).ok().map(Self::from_hex),
                3 => {
                    let short = u32::from_str_radix(digits, 16).ok()?;
                    let expand = |nibble: u32| (nibble & 0xf) * 0x11;
                    Some(Self::from_hex(
                        (expand(short >> 8) << 16) | (expand(short >> 4) << 8) | expand(short),
                    ))
                }
                _ => None,
            };
        }
        named_color(&style.to_ascii_lowercase()).map(Self::from_hex)
    }
}

fn named_color(name: &str) -> Option<u32> {
    let hex = match name {
        "black" => 0x000000,
        "white" => 0xffffff,
        "red" => 0xff0000,
        "green" => 0x008000,
        "lime" => 0x00ff00,
        "blue" => 0x0000ff,
        "yellow" => 0xffff00,
        "cyan" | "aqua" => 0x00ffff,
        "magenta" | "fuchsia" => 0xff00ff,
        "orange" => 0xffa500,
        "hotpink" => 0xff69b4,
        "purple" => 0x800080,
        "gray" | "grey" => 0x808080,
        "royalblue" => 0x4169e1,
        "tomato" => 0xff6347,
        _ => return None,
    };
    Some(hex)
}
