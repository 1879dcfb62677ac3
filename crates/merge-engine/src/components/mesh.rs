use serde::{Deserialize, Serialize};

/// RGB color for SDF rendering, components in `0.0..=1.0`.
///
/// Serializes as a `#RRGGBB` hex string so configs can use web-style colors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SDFColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl SDFColor {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` (or `RRGGBB`) hex string.
    pub fn from_hex(hex: &str) -> Result<Self, String> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(format!("expected #RRGGBB color, got {hex:?}"));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| format!("invalid hex digits in color {hex:?}"))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Format as an uppercase `#RRGGBB` string.
    pub fn to_hex(&self) -> String {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02X}{:02X}{:02X}", byte(self.r), byte(self.g), byte(self.b))
    }
}

impl Default for SDFColor {
    fn default() -> Self {
        Self { r: 0.6, g: 0.6, b: 0.8 }
    }
}

impl TryFrom<String> for SDFColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<SDFColor> for String {
    fn from(color: SDFColor) -> Self {
        color.to_hex()
    }
}

/// SDF shape primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SDFShape {
    Sphere { radius: f32 },
}

impl SDFShape {
    /// Bounding radius of the shape.
    pub fn radius(&self) -> f32 {
        match *self {
            SDFShape::Sphere { radius } => radius,
        }
    }
}

/// Component for SDF-rendered meshes (raymarched spheres).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshComponent {
    pub shape: SDFShape,
    pub color: SDFColor,
    /// Phong specular exponent (default: 32.0).
    pub shininess: f32,
    /// HDR glow multiplier (default: 0.0).
    pub emissive: f32,
}

impl Default for MeshComponent {
    fn default() -> Self {
        Self {
            shape: SDFShape::Sphere { radius: 10.0 },
            color: SDFColor::default(),
            shininess: 32.0,
            emissive: 0.0,
        }
    }
}

impl MeshComponent {
    pub fn new(shape: SDFShape, color: SDFColor) -> Self {
        Self {
            shape,
            color,
            ..Default::default()
        }
    }

    /// Shorthand for a sphere of the given radius and color.
    pub fn sphere(radius: f32, color: SDFColor) -> Self {
        Self::new(SDFShape::Sphere { radius }, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        let red = SDFColor::from_hex("#FF0000").unwrap();
        assert_eq!(red, SDFColor::new(1.0, 0.0, 0.0));

        let teal = SDFColor::from_hex("40e0d0").unwrap();
        assert!((teal.g - 224.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(SDFColor::from_hex("#FFF").is_err());
        assert!(SDFColor::from_hex("#GG0000").is_err());
        assert!(SDFColor::from_hex("#ÿÿÿ").is_err());
    }

    #[test]
    fn hex_survives_serde() {
        let color: SDFColor = serde_json::from_str("\"#8B00FF\"").unwrap();
        assert_eq!(color.to_hex(), "#8B00FF");
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"#8B00FF\"");
        assert!(serde_json::from_str::<SDFColor>("\"purple\"").is_err());
    }

    #[test]
    fn sphere_radius() {
        let mesh = MeshComponent::sphere(35.0, SDFColor::default());
        assert_eq!(mesh.shape.radius(), 35.0);
        assert_eq!(mesh.shininess, 32.0);
    }
}
