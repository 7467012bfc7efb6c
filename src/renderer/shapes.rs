//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::consts::SEGMENTS;
use crate::{hexagon_vertices, polar_to_cartesian, segment_start_angle, wrap_segment};

fn quad(vertices: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) {
    // a-b on the inner edge, c-d on the outer edge
    vertices.push(Vertex::new(a.x, a.y, color));
    vertices.push(Vertex::new(c.x, c.y, color));
    vertices.push(Vertex::new(b.x, b.y, color));

    vertices.push(Vertex::new(b.x, b.y, color));
    vertices.push(Vertex::new(c.x, c.y, color));
    vertices.push(Vertex::new(d.x, d.y, color));
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        let p1 = center + polar_to_cartesian(radius, theta1);
        let p2 = center + polar_to_cartesian(radius, theta2);
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }

    vertices
}

/// Hexagon outline between two radii
pub fn hexagon_outline(radius: f32, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(SEGMENTS as usize * 6);
    for segment in 0..SEGMENTS {
        hexagon_band(&mut vertices, segment, radius - width / 2.0, radius + width / 2.0, color);
    }
    vertices
}

/// One segment's slice of a hexagonal band (a wall)
pub fn wall_band(segment: u8, inner_radius: f32, outer_radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    hexagon_band(&mut vertices, segment, inner_radius, outer_radius, color);
    vertices
}

fn hexagon_band(vertices: &mut Vec<Vertex>, segment: u8, inner: f32, outer: f32, color: [f32; 4]) {
    let inner = inner.max(0.0);
    if outer <= inner {
        return;
    }
    let corners = hexagon_vertices(1.0);
    let a = corners[segment as usize % corners.len()];
    let b = corners[wrap_segment(segment as i32 + 1) as usize];

    quad(vertices, a * inner, b * inner, a * outer, b * outer, color);
}

/// Thin spokes along the segment boundaries
pub fn spokes(from: f32, to: f32, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(SEGMENTS as usize * 6);
    for segment in 0..SEGMENTS {
        let dir = polar_to_cartesian(1.0, segment_start_angle(segment));
        let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
        quad(
            &mut vertices,
            dir * from - perp,
            dir * from + perp,
            dir * to - perp,
            dir * to + perp,
            color,
        );
    }
    vertices
}
