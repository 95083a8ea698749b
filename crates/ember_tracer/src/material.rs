//! Surface scattering and emission.
//!
//! Materials and textures live in a [`MaterialLibrary`] for the lifetime of a
//! scene. Geometry refers to them through [`MaterialId`] / [`TextureId`]
//! handles, so many primitives can share one material.

use ember_math::{Color, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::HitRecord;
use crate::sampling::{gen_f32, random_in_unit_sphere, random_unit_vector};
use crate::texture::{Texture, TextureId};

/// Handle to a material stored in a [`MaterialLibrary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub(crate) u32);

/// A continued light path: the scattered ray and the per-channel factor
/// applied to the radiance it carries back.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Blend weight for a [`Material::Mix`].
#[derive(Debug, Clone, Copy)]
pub enum MixWeight {
    /// Fixed probability of picking the second material.
    Constant(f32),
    /// Per-point probability taken from a texture's alpha channel.
    Alpha(TextureId),
}

/// Material variants.
#[derive(Debug, Clone)]
pub enum Material {
    /// Diffuse, cosine-weighted scattering.
    Lambertian { albedo: TextureId },
    /// Specular reflection; `fuzz` in [0, 1] roughens it.
    Metal { albedo: Color, fuzz: f32 },
    /// Clear refractive surface with index of refraction `ior`.
    Dielectric { ior: f32 },
    /// One-sided emitter, never scatters.
    DiffuseLight { emit: TextureId },
    /// Picks `a` or `b` per interaction.
    Mix {
        a: MaterialId,
        b: MaterialId,
        weight: MixWeight,
    },
    /// Lets the ray continue unchanged. Pairs with an alpha mix for cut-outs.
    Transparent,
    /// Debug: shows its texture unlit.
    Flat { color: TextureId },
    /// Debug: shows the absolute shading normal.
    Normal,
    /// Debug: shows squared normalized hit distance.
    Depth { near: f32, far: f32 },
}

impl Material {
    /// Decide whether the path continues at this hit.
    ///
    /// Returns `None` when the ray is absorbed.
    pub fn scatter(
        &self,
        library: &MaterialLibrary,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Material::Lambertian { albedo } => {
                let mut scatter_direction = rec.normal + random_unit_vector(rng);

                // Catch degenerate scatter direction
                if near_zero(scatter_direction) {
                    scatter_direction = rec.normal;
                }

                Some(ScatterResult {
                    attenuation: library.texture(*albedo).value(rec.u, rec.v, rec.p),
                    scattered: Ray::new(rec.p, scatter_direction, ray_in.time()),
                })
            }

            Material::Metal { albedo, fuzz } => {
                let reflected = reflect(ray_in.direction(), rec.normal).normalize();
                let direction = reflected + *fuzz * random_in_unit_sphere(rng);

                // Fuzzed below the surface: absorbed
                if direction.dot(rec.normal) <= 0.0 {
                    return None;
                }

                Some(ScatterResult {
                    attenuation: *albedo,
                    scattered: Ray::new(rec.p, direction, ray_in.time()),
                })
            }

            Material::Dielectric { ior } => {
                let ri = if rec.front_face { 1.0 / ior } else { *ior };

                let unit_direction = ray_in.direction().normalize();
                let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

                let cannot_refract = ri * sin_theta > 1.0;
                let direction = if cannot_refract || reflectance(cos_theta, ri) > gen_f32(rng) {
                    reflect(unit_direction, rec.normal)
                } else {
                    refract(unit_direction, rec.normal, ri)
                };

                Some(ScatterResult {
                    attenuation: Color::ONE,
                    scattered: Ray::new(rec.p, direction, ray_in.time()),
                })
            }

            Material::Mix { a, b, weight } => {
                let probability_b = match weight {
                    MixWeight::Constant(w) => *w,
                    MixWeight::Alpha(tex) => library.texture(*tex).alpha(rec.u, rec.v),
                };
                let pick = if gen_f32(rng) < probability_b { *b } else { *a };
                library.get(pick).scatter(library, ray_in, rec, rng)
            }

            Material::Transparent => Some(ScatterResult {
                attenuation: Color::ONE,
                scattered: Ray::new(rec.p, ray_in.direction(), ray_in.time()),
            }),

            Material::DiffuseLight { .. }
            | Material::Flat { .. }
            | Material::Normal
            | Material::Depth { .. } => None,
        }
    }

    /// Radiance emitted at the hit point.
    pub fn emitted(&self, library: &MaterialLibrary, rec: &HitRecord) -> Color {
        match self {
            Material::DiffuseLight { emit } => {
                if rec.front_face {
                    library.texture(*emit).value(rec.u, rec.v, rec.p)
                } else {
                    Color::ZERO
                }
            }
            Material::Flat { color } => library.texture(*color).value(rec.u, rec.v, rec.p),
            Material::Normal => rec.normal.abs(),
            Material::Depth { near, far } => {
                let d = Interval::UNIT.clamp((rec.t - near) / (far - near));
                Color::splat(d * d)
            }
            _ => Color::ZERO,
        }
    }
}

/// Arena owning every texture and material of a scene.
#[derive(Debug, Clone, Default)]
pub struct MaterialLibrary {
    textures: Vec<Texture>,
    materials: Vec<Material>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_texture(&mut self, texture: Texture) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() as u32 - 1)
    }

    pub fn add(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() as u32 - 1)
    }

    /// Handles are only minted by this library, so lookups are in bounds.
    #[inline]
    pub fn get(&self, id: MaterialId) -> &Material {
        &self.materials[id.0 as usize]
    }

    #[inline]
    pub fn texture(&self, id: TextureId) -> &Texture {
        &self.textures[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn lambertian(&mut self, albedo: Color) -> MaterialId {
        let albedo = self.add_texture(Texture::SolidColor(albedo));
        self.add(Material::Lambertian { albedo })
    }

    pub fn lambertian_textured(&mut self, albedo: TextureId) -> MaterialId {
        self.add(Material::Lambertian { albedo })
    }

    /// `fuzz` is clamped to [0, 1].
    pub fn metal(&mut self, albedo: Color, fuzz: f32) -> MaterialId {
        self.add(Material::Metal {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        })
    }

    /// `ior`: 1.0 = air, 1.5 = glass, 2.4 = diamond.
    pub fn dielectric(&mut self, ior: f32) -> MaterialId {
        self.add(Material::Dielectric { ior })
    }

    pub fn diffuse_light(&mut self, emit: Color) -> MaterialId {
        let emit = self.add_texture(Texture::SolidColor(emit));
        self.add(Material::DiffuseLight { emit })
    }

    /// `weight` is the probability of `b`, clamped to [0, 1].
    pub fn mix(&mut self, a: MaterialId, b: MaterialId, weight: f32) -> MaterialId {
        self.add(Material::Mix {
            a,
            b,
            weight: MixWeight::Constant(weight.clamp(0.0, 1.0)),
        })
    }

    /// Picks `b` with probability equal to `alpha`'s alpha channel at the hit.
    pub fn mix_by_alpha(&mut self, a: MaterialId, b: MaterialId, alpha: TextureId) -> MaterialId {
        self.add(Material::Mix {
            a,
            b,
            weight: MixWeight::Alpha(alpha),
        })
    }

    pub fn transparent(&mut self) -> MaterialId {
        self.add(Material::Transparent)
    }

    pub fn flat(&mut self, color: Color) -> MaterialId {
        let color = self.add_texture(Texture::SolidColor(color));
        self.add(Material::Flat { color })
    }

    pub fn normal(&mut self) -> MaterialId {
        self.add(Material::Normal)
    }

    /// Depth visualization over [`DEPTH_NEAR`, `DEPTH_FAR`].
    pub fn depth(&mut self) -> MaterialId {
        self.add(Material::Depth {
            near: DEPTH_NEAR,
            far: DEPTH_FAR,
        })
    }
}

/// Default range of the depth debug material.
pub const DEPTH_NEAR: f32 = 0.1;
pub const DEPTH_FAR: f32 = 2000.0;

#[inline]
fn near_zero(v: Vec3) -> bool {
    const S: f32 = 1e-8;
    v.x.abs() < S && v.y.abs() < S && v.z.abs() < S
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance.
fn reflectance(cosine: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
