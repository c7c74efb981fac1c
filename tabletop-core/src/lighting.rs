//! Two-light Phong lighting parameters
//!
//! [`phong`] and [`shade`] mirror `shaders/phong.wgsl` in the GPU crate so the
//! lighting math can be tested without an adapter.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A point light contributing ambient, diffuse and specular terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub ambient_strength: f32,
    pub specular_intensity: f32,
    pub highlight_size: f32,
    pub enabled: bool,
}

impl PointLight {
    /// Cool white key light
    pub fn key() -> Self {
        Self {
            position: [20.0, 15.0, -15.0],
            color: [0.85, 0.85, 0.86],
            ambient_strength: 0.3,
            specular_intensity: 0.1,
            highlight_size: 16.0,
            enabled: true,
        }
    }

    /// Warm pink fill light
    pub fn fill() -> Self {
        Self {
            position: [20.0, 30.0, 30.0],
            color: [0.98, 0.85, 0.95],
            ambient_strength: 0.5,
            specular_intensity: 0.2,
            highlight_size: 16.0,
            enabled: true,
        }
    }
}

/// A light table from a config file; absent fields keep the base light's value
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LightOverrides {
    position: Option<[f32; 3]>,
    color: Option<[f32; 3]>,
    ambient_strength: Option<f32>,
    specular_intensity: Option<f32>,
    highlight_size: Option<f32>,
    enabled: Option<bool>,
}

impl LightOverrides {
    fn apply(self, base: PointLight) -> PointLight {
        PointLight {
            position: self.position.unwrap_or(base.position),
            color: self.color.unwrap_or(base.color),
            ambient_strength: self.ambient_strength.unwrap_or(base.ambient_strength),
            specular_intensity: self.specular_intensity.unwrap_or(base.specular_intensity),
            highlight_size: self.highlight_size.unwrap_or(base.highlight_size),
            enabled: self.enabled.unwrap_or(base.enabled),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LightingOverrides {
    uv_scale: Option<[f32; 2]>,
    key: LightOverrides,
    fill: LightOverrides,
}

impl From<LightingOverrides> for Lighting {
    fn from(overrides: LightingOverrides) -> Self {
        let defaults = Lighting::default();
        Self {
            uv_scale: overrides.uv_scale.unwrap_or(defaults.uv_scale),
            key: overrides.key.apply(defaults.key),
            fill: overrides.fill.apply(defaults.fill),
        }
    }
}

/// Everything the fragment shader needs besides the texture
///
/// When deserialized, each light falls back field by field to its own
/// default ([`PointLight::key`] or [`PointLight::fill`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "LightingOverrides")]
pub struct Lighting {
    /// Multiplier applied to texture coordinates before sampling
    pub uv_scale: [f32; 2],
    pub key: PointLight,
    pub fill: PointLight,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            key: PointLight::key(),
            fill: PointLight::fill(),
            uv_scale: [0.5, 0.5],
        }
    }
}

impl Lighting {
    pub fn lights(&self) -> [&PointLight; 2] {
        [&self.key, &self.fill]
    }
}

fn reflect(incident: Vector3<f32>, normal: Vector3<f32>) -> Vector3<f32> {
    incident - normal * 2.0 * normal.dot(&incident)
}

/// Ambient + diffuse + specular contribution of one light, before texturing
pub fn phong(
    light: &PointLight,
    normal: &Vector3<f32>,
    frag_pos: &Point3<f32>,
    view_pos: &Point3<f32>,
) -> Vector3<f32> {
    let color = Vector3::from(light.color);
    let ambient = color * light.ambient_strength;

    let norm = normal.normalize();
    let light_dir = (Point3::from(light.position) - frag_pos).normalize();
    let impact = norm.dot(&light_dir).max(0.0);
    let diffuse = color * impact;

    let view_dir = (view_pos - frag_pos).normalize();
    let reflect_dir = reflect(-light_dir, norm);
    let specular_component = view_dir.dot(&reflect_dir).max(0.0).powf(light.highlight_size);
    let specular = color * (light.specular_intensity * specular_component);

    ambient + diffuse + specular
}

/// Final fragment color for a texel, summing every enabled light
pub fn shade(
    lighting: &Lighting,
    texel: [f32; 3],
    normal: &Vector3<f32>,
    frag_pos: &Point3<f32>,
    view_pos: &Point3<f32>,
) -> [f32; 4] {
    let total = lighting
        .lights()
        .into_iter()
        .filter(|light| light.enabled)
        .map(|light| phong(light, normal, frag_pos, view_pos))
        .fold(Vector3::zeros(), |acc, term| acc + term);
    let lit = total.component_mul(&Vector3::from(texel));
    [lit.x, lit.y, lit.z, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_partial_light_tables_keep_their_own_defaults() {
        let lighting: Lighting = toml::from_str(
            r#"
            [key]
            color = [1.0, 1.0, 1.0]

            [fill]
            position = [1.0, 2.0, 3.0]
            "#,
        )
        .unwrap();

        assert_eq!(lighting.fill.position, [1.0, 2.0, 3.0]);
        assert_eq!(lighting.fill.color, PointLight::fill().color);
        assert_eq!(lighting.fill.ambient_strength, 0.5);
        assert_eq!(lighting.fill.specular_intensity, 0.2);

        assert_eq!(lighting.key.color, [1.0, 1.0, 1.0]);
        assert_eq!(lighting.key.position, PointLight::key().position);
        assert_eq!(lighting.uv_scale, [0.5, 0.5]);
    }

    #[test]
    fn test_unknown_light_field_rejected() {
        assert!(toml::from_str::<Lighting>("[fill]
brightness = 2.0").is_err());
    }

    fn overhead(color: [f32; 3]) -> PointLight {
        PointLight {
            position: [0.0, 10.0, 0.0],
            color,
            ambient_strength: 0.3,
            specular_intensity: 0.1,
            highlight_size: 16.0,
            enabled: true,
        }
    }

    #[test]
    fn test_facing_away_is_ambient_only() {
        let light = overhead([1.0, 1.0, 1.0]);
        let c = phong(&light, &-Vector3::y(), &Point3::origin(), &Point3::new(5.0, 0.0, 0.0));
        assert_relative_eq!(c, Vector3::repeat(0.3), epsilon = 1e-6);
    }

    #[test]
    fn test_head_on_light_and_view() {
        let light = overhead([1.0, 1.0, 1.0]);
        // diffuse 1.0, perfect reflection into the eye gives full specular
        let c = phong(&light, &Vector3::y(), &Point3::origin(), &Point3::new(0.0, 5.0, 0.0));
        assert_relative_eq!(c, Vector3::repeat(0.3 + 1.0 + 0.1), epsilon = 1e-5);
    }

    #[test]
    fn test_unnormalized_normal_is_normalized() {
        let light = overhead([0.5, 0.5, 0.5]);
        let a = phong(&light, &Vector3::new(0.0, 7.0, 0.0), &Point3::origin(), &Point3::new(3.0, 1.0, 0.0));
        let b = phong(&light, &Vector3::y(), &Point3::origin(), &Point3::new(3.0, 1.0, 0.0));
        assert_relative_eq!(a, b, epsilon = 1e-6);
    }

    #[test]
    fn test_disabled_lights_are_skipped() {
        let mut lighting = Lighting::default();
        lighting.key.enabled = false;
        lighting.fill.enabled = false;
        let c = shade(&lighting, [1.0, 1.0, 1.0], &Vector3::y(), &Point3::origin(), &Point3::new(0.0, 1.0, 3.0));
        assert_eq!(c, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_shade_modulates_texel() {
        let lighting = Lighting {
            key: overhead([1.0, 1.0, 1.0]),
            fill: PointLight { enabled: false, ..PointLight::fill() },
            uv_scale: [1.0, 1.0],
        };
        let c = shade(&lighting, [1.0, 0.5, 0.0], &-Vector3::y(), &Point3::origin(), &Point3::new(5.0, 0.0, 0.0));
        assert_relative_eq!(c[0], 0.3, epsilon = 1e-6);
        assert_relative_eq!(c[1], 0.15, epsilon = 1e-6);
        assert_relative_eq!(c[2], 0.0);
        assert_eq!(c[3], 1.0);
    }

    #[test]
    fn test_default_lights() {
        let lighting = Lighting::default();
        assert_eq!(lighting.key.color, [0.85, 0.85, 0.86]);
        assert_eq!(lighting.fill.position, [20.0, 30.0, 30.0]);
        assert_eq!(lighting.uv_scale, [0.5, 0.5]);
    }
}
