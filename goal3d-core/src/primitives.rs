//! Primitive geometry descriptors and their tessellation
//!
//! Conventions follow the usual retained-mode scene libraries: cylinders run
//! along local Y and are centered on the origin, the torus lies in the XY
//! plane around the Z axis, planes and shapes lie in the XY plane facing +Z.

use nalgebra::{Point2, Point3, Vector3};
use std::f32::consts::PI;

use crate::error::{Result, SceneError};
use crate::geometry::{Mesh, Triangle, Vertex};

/// Radial segments for every cylinder in the scene
pub const CYLINDER_SEGMENTS: u32 = 32;
/// Longitude segments for spheres
pub const SPHERE_WIDTH_SEGMENTS: u32 = 32;
/// Latitude segments for spheres
pub const SPHERE_HEIGHT_SEGMENTS: u32 = 16;
/// Segments around the torus tube
pub const TORUS_RADIAL_SEGMENTS: u32 = 32;
/// Segments along the torus ring
pub const TORUS_TUBULAR_SEGMENTS: u32 = 100;

/// Geometry descriptor for one mesh node
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        length: f32,
        radial_segments: u32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    Plane {
        width: f32,
        height: f32,
    },
    /// Closed polygon path, filled
    Shape { points: Vec<Point2<f32>> },
}

impl Primitive {
    /// Cylinder with equal caps and the catalog's segment count
    pub fn cylinder(radius: f32, length: f32) -> Self {
        Primitive::Cylinder {
            radius_top: radius,
            radius_bottom: radius,
            length,
            radial_segments: CYLINDER_SEGMENTS,
        }
    }

    pub fn sphere(radius: f32) -> Self {
        Primitive::Sphere {
            radius,
            width_segments: SPHERE_WIDTH_SEGMENTS,
            height_segments: SPHERE_HEIGHT_SEGMENTS,
        }
    }

    pub fn torus(radius: f32, tube: f32) -> Self {
        Primitive::Torus {
            radius,
            tube,
            radial_segments: TORUS_RADIAL_SEGMENTS,
            tubular_segments: TORUS_TUBULAR_SEGMENTS,
        }
    }

    pub fn plane(width: f32, height: f32) -> Self {
        Primitive::Plane { width, height }
    }

    pub fn shape(points: impl IntoIterator<Item = (f32, f32)>) -> Self {
        Primitive::Shape {
            points: points.into_iter().map(|(x, y)| Point2::new(x, y)).collect(),
        }
    }

    /// Short name used in logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Cylinder { .. } => "cylinder",
            Primitive::Sphere { .. } => "sphere",
            Primitive::Torus { .. } => "torus",
            Primitive::Plane { .. } => "plane",
            Primitive::Shape { .. } => "shape",
        }
    }

    /// Reject parameters that cannot produce a visible mesh
    pub fn validate(&self) -> Result<()> {
        match self {
            Primitive::Cylinder {
                radius_top,
                radius_bottom,
                length,
                radial_segments,
            } => {
                non_negative("cylinder top radius", *radius_top)?;
                non_negative("cylinder bottom radius", *radius_bottom)?;
                if *radius_top == 0.0 && *radius_bottom == 0.0 {
                    return Err(SceneError::InvalidDimension {
                        what: "cylinder radius",
                        value: 0.0,
                    });
                }
                positive("cylinder length", *length)?;
                min_segments("cylinder radial", *radial_segments, 3)
            }
            Primitive::Sphere {
                radius,
                width_segments,
                height_segments,
            } => {
                positive("sphere radius", *radius)?;
                min_segments("sphere width", *width_segments, 3)?;
                min_segments("sphere height", *height_segments, 2)
            }
            Primitive::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => {
                positive("torus radius", *radius)?;
                positive("torus tube", *tube)?;
                min_segments("torus radial", *radial_segments, 3)?;
                min_segments("torus tubular", *tubular_segments, 3)
            }
            Primitive::Plane { width, height } => {
                positive("plane width", *width)?;
                positive("plane height", *height)
            }
            Primitive::Shape { points } => {
                if points.len() < 3 {
                    return Err(SceneError::DegenerateShape(format!(
                        "{} points, need at least 3",
                        points.len()
                    )));
                }
                if let Some(p) = points.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
                    return Err(SceneError::DegenerateShape(format!(
                        "non-finite point ({}, {})",
                        p.x, p.y
                    )));
                }
                if signed_area(points).abs() <= f32::EPSILON {
                    return Err(SceneError::DegenerateShape("zero area".to_string()));
                }
                Ok(())
            }
        }
    }

    /// Validate, then generate the triangle mesh
    pub fn tessellate(&self) -> Result<Mesh> {
        self.validate()?;
        let mesh = match self {
            Primitive::Cylinder {
                radius_top,
                radius_bottom,
                length,
                radial_segments,
            } => cylinder(*radius_top, *radius_bottom, *length, *radial_segments),
            Primitive::Sphere {
                radius,
                width_segments,
                height_segments,
            } => sphere(*radius, *width_segments, *height_segments),
            Primitive::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => torus(*radius, *tube, *radial_segments, *tubular_segments),
            Primitive::Plane { width, height } => plane(*width, *height),
            Primitive::Shape { points } => shape(points),
        };
        Ok(mesh)
    }
}

fn positive(what: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SceneError::InvalidDimension { what, value })
    }
}

fn non_negative(what: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SceneError::InvalidDimension { what, value })
    }
}

fn min_segments(what: &'static str, value: u32, min: u32) -> Result<()> {
    if value >= min {
        Ok(())
    } else {
        Err(SceneError::InvalidSegments { what, value })
    }
}

/// Shoelace area, positive for counter-clockwise paths
fn signed_area(points: &[Point2<f32>]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f32>()
        / 2.0
}

fn cylinder(radius_top: f32, radius_bottom: f32, length: f32, radial_segments: u32) -> Mesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let half = length / 2.0;
    let slope = (radius_bottom - radius_top) / length;

    // side: two rings, top then bottom
    for (y, radius) in [(half, radius_top), (-half, radius_bottom)] {
        for x in 0..=radial_segments {
            let theta = x as f32 / radial_segments as f32 * 2.0 * PI;
            let (sin, cos) = theta.sin_cos();
            let normal = Vector3::new(sin, slope, cos).normalize();
            vertices.push(Vertex::from_parts(
                Point3::new(radius * sin, y, radius * cos),
                normal,
            ));
        }
    }
    let ring = radial_segments + 1;
    for x in 0..radial_segments {
        let a = x;
        let b = x + ring;
        let c = b + 1;
        let d = a + 1;
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    // caps
    for (y, radius, ny) in [(half, radius_top, 1.0f32), (-half, radius_bottom, -1.0)] {
        if radius <= 0.0 {
            continue;
        }
        let center = vertices.len() as u32;
        vertices.push(Vertex::new(0.0, y, 0.0, 0.0, ny, 0.0));
        for x in 0..=radial_segments {
            let theta = x as f32 / radial_segments as f32 * 2.0 * PI;
            vertices.push(Vertex::new(radius * theta.sin(), y, radius * theta.cos(), 0.0, ny, 0.0));
        }
        for x in 0..radial_segments {
            if ny > 0.0 {
                indices.extend_from_slice(&[center, center + x + 1, center + x + 2]);
            } else {
                indices.extend_from_slice(&[center, center + x + 2, center + x + 1]);
            }
        }
    }

    Mesh::from_indexed(&vertices, &indices)
}

fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for iy in 0..=height_segments {
        let phi = iy as f32 / height_segments as f32 * PI;
        for ix in 0..=width_segments {
            let theta = ix as f32 / width_segments as f32 * 2.0 * PI;
            let normal = Vector3::new(
                -phi.sin() * theta.cos(),
                phi.cos(),
                phi.sin() * theta.sin(),
            );
            vertices.push(Vertex::from_parts(Point3::from(normal * radius), normal));
        }
    }

    let row = width_segments + 1;
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Mesh::from_indexed(&vertices, &indices)
}

fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Mesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * 2.0 * PI;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * 2.0 * PI;
            let position = Point3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Point3::new(radius * u.cos(), radius * u.sin(), 0.0);
            vertices.push(Vertex::from_parts(position, (position - center).normalize()));
        }
    }

    let row = tubular_segments + 1;
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    Mesh::from_indexed(&vertices, &indices)
}

fn plane(width: f32, height: f32) -> Mesh {
    let (hw, hh) = (width / 2.0, height / 2.0);
    let vertices = [
        Vertex::new(-hw, hh, 0.0, 0.0, 0.0, 1.0),
        Vertex::new(hw, hh, 0.0, 0.0, 0.0, 1.0),
        Vertex::new(-hw, -hh, 0.0, 0.0, 0.0, 1.0),
        Vertex::new(hw, -hh, 0.0, 0.0, 0.0, 1.0),
    ];
    Mesh::from_indexed(&vertices, &[0, 2, 1, 2, 3, 1])
}

/// Fan fill; the net and pennant paths are convex
fn shape(points: &[Point2<f32>]) -> Mesh {
    // keep faces counter-clockwise so the normal is +Z
    let ccw = signed_area(points) > 0.0;
    let vertex = |p: &Point2<f32>| Vertex::new(p.x, p.y, 0.0, 0.0, 0.0, 1.0);
    let mut mesh = Mesh::with_capacity(points.len() - 2);
    for i in 1..points.len() - 1 {
        let (b, c) = if ccw { (i, i + 1) } else { (i + 1, i) };
        let triangle = Triangle::new(vertex(&points[0]), vertex(&points[b]), vertex(&points[c]));
        if triangle.doubled_area() > f32::EPSILON {
            mesh.add_triangle(triangle);
        }
    }
    mesh
}
