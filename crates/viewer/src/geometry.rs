//! UV sphere geometry for the panorama.
//!
//! Vertices follow the usual latitude/longitude layout: `u` runs around the
//! equator, `v` from the north pole to the south pole. Equirectangular
//! images map directly onto these UVs.

use std::f64::consts::PI;

/// Sphere radius used for the panorama.
pub const DEFAULT_RADIUS: f64 = 500.0;
/// Segments around the equator.
pub const DEFAULT_WIDTH_SEGMENTS: u32 = 60;
/// Segments from pole to pole.
pub const DEFAULT_HEIGHT_SEGMENTS: u32 = 40;

/// Indexed triangle mesh of a UV sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereGeometry {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    inverted: bool,
}

impl SphereGeometry {
    /// Build a sphere. Segment counts below 3 (width) or 2 (height) are
    /// raised to those minimums.
    pub fn new(radius: f64, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let vertex_count = ((width_segments + 1) * (height_segments + 1)) as usize;
        let mut positions = Vec::with_capacity(vertex_count);
        let mut uvs = Vec::with_capacity(vertex_count);

        for iy in 0..=height_segments {
            let v = f64::from(iy) / f64::from(height_segments);
            for ix in 0..=width_segments {
                let u = f64::from(ix) / f64::from(width_segments);
                let x = -radius * (u * 2.0 * PI).cos() * (v * PI).sin();
                let y = radius * (v * PI).cos();
                let z = radius * (u * 2.0 * PI).sin() * (v * PI).sin();
                positions.push([x as f32, y as f32, z as f32]);
                uvs.push([u as f32, (1.0 - v) as f32]);
            }
        }

        let row = width_segments + 1;
        let mut indices = Vec::new();
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                // Pole rows collapse to a single triangle per quad.
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self {
            positions,
            uvs,
            indices,
            inverted: false,
        }
    }

    /// The panorama sphere: default size, turned inside out.
    pub fn panorama() -> Self {
        Self::new(DEFAULT_RADIUS, DEFAULT_WIDTH_SEGMENTS, DEFAULT_HEIGHT_SEGMENTS).inverted()
    }

    /// Mirror the sphere on the x axis so its interior faces the camera and
    /// the texture reads left-to-right from inside.
    pub fn inverted(mut self) -> Self {
        for p in &mut self.positions {
            p[0] = -p[0];
        }
        self.inverted = !self.inverted;
        self
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_and_triangle_counts() {
        let sphere = SphereGeometry::new(1.0, 8, 4);
        assert_eq!(sphere.vertex_count(), 9 * 5);
        // Two triangles per quad, minus one per quad on each pole row.
        assert_eq!(sphere.triangle_count(), 8 * 4 * 2 - 2 * 8);
        assert!(sphere
            .indices
            .iter()
            .all(|&i| (i as usize) < sphere.vertex_count()));
    }

    #[test]
    fn vertices_lie_on_the_sphere() {
        let sphere = SphereGeometry::new(DEFAULT_RADIUS, 12, 6);
        for [x, y, z] in &sphere.positions {
            let r = (x * x + y * y + z * z).sqrt() as f64;
            assert!((r - DEFAULT_RADIUS).abs() < 1e-2);
        }
    }

    #[test]
    fn inversion_mirrors_x_only() {
        let outside = SphereGeometry::new(1.0, 6, 3);
        let inside = outside.clone().inverted();

        assert!(inside.is_inverted());
        for (a, b) in outside.positions.iter().zip(&inside.positions) {
            assert_eq!(a[0], -b[0]);
            assert_eq!(a[1], b[1]);
            assert_eq!(a[2], b[2]);
        }
        assert_eq!(outside.uvs, inside.uvs);
    }

    #[test]
    fn panorama_uses_defaults_and_is_inverted() {
        let sphere = SphereGeometry::panorama();
        assert!(sphere.is_inverted());
        assert_eq!(
            sphere.vertex_count(),
            ((DEFAULT_WIDTH_SEGMENTS + 1) * (DEFAULT_HEIGHT_SEGMENTS + 1)) as usize
        );
    }

    #[test]
    fn degenerate_segment_counts_raised() {
        let sphere = SphereGeometry::new(1.0, 0, 0);
        assert_eq!(sphere.vertex_count(), 4 * 3);
    }
}
