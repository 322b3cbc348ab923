//! RTW Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over implicit spheres.
//!
//! - BVH over shared primitives with randomized median splits
//! - Lambertian, Metal and Dielectric materials with fixed depth caps
//! - Parallel row dispatch on rayon with per-render ray and progress counters
//!
//! Scene authoring and image encoding are left to the caller; see the
//! `random_spheres` example.

mod bvh;
mod camera;
mod config;
mod dispatch;
mod error;
mod geometry;
mod integrator;
mod material;
mod output;
mod progress;
mod ray;
pub mod sampling;
mod scene;
mod sphere;
mod texture;

pub use bvh::{BvhNode, BvhStats};
pub use camera::{Camera, RayGenerator};
pub use config::RenderConfig;
pub use dispatch::{dispatch_rows, RenderCounters, RenderOutput, Renderer};
pub use error::{RenderError, RenderResult, TextureError, TextureResult};
pub use geometry::{Geometry, HitRecord};
pub use integrator::{render_pixel, DepthLimits, SkyGradient, Tracer};
pub use material::{reflect, refract, Color, Dielectric, Lambertian, Material, Metal};
pub use output::{color_to_rgba, linear_to_gamma, sanitize, ImageBuffer};
pub use progress::{poll_until_complete, PercentBar, Progress, ProgressSink, StderrProgress};
pub use ray::{RayDesc, RayPayload, T_MAX, T_MIN};
pub use scene::Scene;
pub use sphere::Sphere;
pub use texture::{Checker, ImageTexture, SolidColor, Texture};

/// Re-export Vec3 and common math types from rtw_math
pub use rtw_math::{Aabb, Interval, Ray, Vec3};
