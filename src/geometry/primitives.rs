//! Primitive mesh generation
//!
//! Boxes and cylinders are laid out the way the scene's JS renderer expects
//! them: centered on the origin, cylinders along +y.

use glam::{Vec2, Vec3};

use super::mesh::MeshData;

/// One gridded face of a box.
///
/// `u`, `v` and `w` are axis indices (0 = x, 1 = y, 2 = z); the face lies at
/// `w = depth / 2` and spans `width` along `u` and `height` along `v`.
#[allow(clippy::too_many_arguments)]
fn box_face(
    mesh: &mut MeshData,
    (u, v, w): (usize, usize, usize),
    udir: f32,
    vdir: f32,
    width: f32,
    height: f32,
    depth: f32,
    grid_x: u32,
    grid_y: u32,
) {
    let segment_width = width / grid_x as f32;
    let segment_height = height / grid_y as f32;
    let width_half = width / 2.0;
    let height_half = height / 2.0;
    let depth_half = depth / 2.0;
    let grid_x1 = grid_x + 1;
    let start = mesh.vertex_count() as u32;

    let mut normal = Vec3::ZERO;
    normal[w] = if depth > 0.0 { 1.0 } else { -1.0 };

    for iy in 0..=grid_y {
        let y = iy as f32 * segment_height - height_half;
        for ix in 0..=grid_x {
            let x = ix as f32 * segment_width - width_half;
            let mut position = Vec3::ZERO;
            position[u] = x * udir;
            position[v] = y * vdir;
            position[w] = depth_half;
            let uv = Vec2::new(ix as f32 / grid_x as f32, 1.0 - iy as f32 / grid_y as f32);
            mesh.push_vertex(position, normal, uv);
        }
    }

    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = start + ix + grid_x1 * iy;
            let b = start + ix + grid_x1 * (iy + 1);
            let c = start + (ix + 1) + grid_x1 * (iy + 1);
            let d = start + (ix + 1) + grid_x1 * iy;
            mesh.push_triangle(a, b, d);
            mesh.push_triangle(b, c, d);
        }
    }
}

/// Box of `width` (x) by `height` (y) by `depth` (z), each face subdivided
/// into its own grid. Faces do not share vertices, so each face keeps its own
/// normals.
pub fn box_grid(
    width: f32,
    height: f32,
    depth: f32,
    width_segments: u32,
    height_segments: u32,
    depth_segments: u32,
) -> MeshData {
    let (ws, hs, ds) = (
        width_segments.max(1),
        height_segments.max(1),
        depth_segments.max(1),
    );
    let vertices = 2 * ((ws + 1) * (hs + 1) + (ws + 1) * (ds + 1) + (ds + 1) * (hs + 1));
    let indices = 12 * (ws * hs + ws * ds + ds * hs);
    let mut mesh = MeshData::with_capacity(vertices as usize, indices as usize);

    const X: usize = 0;
    const Y: usize = 1;
    const Z: usize = 2;
    box_face(&mut mesh, (Z, Y, X), -1.0, -1.0, depth, height, width, ds, hs); // +x
    box_face(&mut mesh, (Z, Y, X), 1.0, -1.0, depth, height, -width, ds, hs); // -x
    box_face(&mut mesh, (X, Z, Y), 1.0, 1.0, width, depth, height, ws, ds); // +y
    box_face(&mut mesh, (X, Z, Y), 1.0, -1.0, width, depth, -height, ws, ds); // -y
    box_face(&mut mesh, (X, Y, Z), 1.0, -1.0, width, height, depth, ws, hs); // +z
    box_face(&mut mesh, (X, Y, Z), -1.0, -1.0, width, height, -depth, ws, hs); // -z

    mesh
}

/// Cylinder (or truncated cone) along the y axis, centered on the origin
pub fn cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    open_ended: bool,
) -> MeshData {
    use std::f32::consts::TAU;

    let radial = radial_segments.max(3);
    let half_height = height / 2.0;
    let slope = if height != 0.0 {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };
    let mut mesh = MeshData::with_capacity(
        (2 * (radial + 1) + 2 * (2 * radial + 1)) as usize,
        (12 * radial) as usize,
    );

    // Side wall: one row at the top, one at the bottom
    for row in 0..=1u32 {
        let t = row as f32;
        let radius = t * (radius_bottom - radius_top) + radius_top;
        for i in 0..=radial {
            let u = i as f32 / radial as f32;
            let (sin, cos) = (u * TAU).sin_cos();
            mesh.push_vertex(
                Vec3::new(radius * sin, half_height - t * height, radius * cos),
                Vec3::new(sin, slope, cos).normalize_or_zero(),
                Vec2::new(u, 1.0 - t),
            );
        }
    }
    let row = radial + 1;
    for i in 0..radial {
        let (a, b, c, d) = (i, row + i, row + i + 1, i + 1);
        // A pointed end would give zero-area triangles
        if radius_top > 0.0 {
            mesh.push_triangle(a, b, d);
        }
        if radius_bottom > 0.0 {
            mesh.push_triangle(b, c, d);
        }
    }

    if !open_ended {
        if radius_top > 0.0 {
            cap(&mut mesh, radius_top, half_height, radial, true);
        }
        if radius_bottom > 0.0 {
            cap(&mut mesh, radius_bottom, half_height, radial, false);
        }
    }

    mesh
}

fn cap(mesh: &mut MeshData, radius: f32, half_height: f32, radial: u32, top: bool) {
    use std::f32::consts::TAU;

    let sign = if top { 1.0 } else { -1.0 };
    let normal = Vec3::new(0.0, sign, 0.0);
    let y = half_height * sign;

    let centers = mesh.vertex_count() as u32;
    for _ in 0..radial {
        mesh.push_vertex(Vec3::new(0.0, y, 0.0), normal, Vec2::splat(0.5));
    }
    let rim = mesh.vertex_count() as u32;
    for i in 0..=radial {
        let (sin, cos) = (i as f32 / radial as f32 * TAU).sin_cos();
        mesh.push_vertex(
            Vec3::new(radius * sin, y, radius * cos),
            normal,
            Vec2::new(cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5),
        );
    }
    for i in 0..radial {
        let (c, r) = (centers + i, rim + i);
        if top {
            mesh.push_triangle(r, r + 1, c);
        } else {
            mesh.push_triangle(r + 1, r, c);
        }
    }
}

/// Cone along the y axis, apex at +y
pub fn cone(radius: f32, height: f32, radial_segments: u32) -> MeshData {
    cylinder(0.0, radius, height, radial_segments, false)
}
