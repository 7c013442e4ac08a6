//! Arena boundary query
//!
//! Signed-distance evaluation of a sphere against the arena surface: flat
//! floor/ceiling/walls, rounded floor-wall and ceiling-wall edges, the
//! rounded corner pillar, and the goal cavity with its own rounded frame.
//!
//! The surface is mirror-symmetric across x = 0 and z = 0, so the query
//! reflects the point into the +x/+z quadrant, evaluates there, and reflects
//! the resulting normal back.
//!
//! Inside the quadrant the boundary is tiled by an ordered cascade of region
//! tests. Each test identifies the single primitive (plane, sphere inner or
//! outer, axis-aligned cylinder inner or outer) that is nearest for its
//! sub-region, and that primitive is authoritative: it either reports the
//! contact or concludes there is no penetration at all. The region bounds
//! are chosen so exactly one test applies to any point away from the seams,
//! which makes this a case-based nearest-surface selector rather than a
//! minimum over all primitives.

use glam::DVec3;

use crate::consts::*;

/// A sphere-arena contact: how deep the sphere sits past the surface and the
/// unit normal pointing back into the arena interior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaContact {
    pub penetration: f64,
    pub normal: DVec3,
}

/// Signed distance (to the authoritative primitive) plus its raw,
/// unnormalized surface normal.
#[derive(Debug, Clone, Copy)]
struct Probe {
    distance: f64,
    normal: DVec3,
}

/// Each primitive helper returns `None` when the sphere clears the primitive
/// by more than its radius, which answers the whole query with
/// "no penetration".
type Verdict = Option<Probe>;

#[inline]
fn plane(distance: f64, normal: DVec3, radius: f64) -> Verdict {
    if distance > radius {
        return None;
    }
    Some(Probe { distance, normal })
}

/// Sphere tested from the inside: the boundary curves around the point.
#[inline]
fn sphere_inner(p: DVec3, center: DVec3, r: f64, radius: f64) -> Verdict {
    let diff = center - p;
    let distance = r - diff.length();
    if distance > radius {
        return None;
    }
    Some(Probe {
        distance,
        normal: diff,
    })
}

/// Sphere tested from the outside: the boundary bulges toward the point.
#[inline]
fn sphere_outer(p: DVec3, center: DVec3, r: f64, radius: f64) -> Verdict {
    let diff = p - center;
    let distance = diff.length() - r;
    if distance > radius {
        return None;
    }
    Some(Probe {
        distance,
        normal: diff,
    })
}

/// Cylinder along x, tested from the inside.
#[inline]
fn cylinder_x_inner(p: DVec3, cy: f64, cz: f64, r: f64, radius: f64) -> Verdict {
    let dy = cy - p.y;
    let dz = cz - p.z;
    let distance = r - (dy * dy + dz * dz).sqrt();
    if distance > radius {
        return None;
    }
    Some(Probe {
        distance,
        normal: DVec3::new(0.0, dy, dz),
    })
}

/// Cylinder along y (the corner pillar), tested from the inside.
#[inline]
fn cylinder_y_inner(p: DVec3, cx: f64, cz: f64, r: f64, radius: f64) -> Verdict {
    let dx = cx - p.x;
    let dz = cz - p.z;
    let distance = r - (dx * dx + dz * dz).sqrt();
    if distance > radius {
        return None;
    }
    Some(Probe {
        distance,
        normal: DVec3::new(dx, 0.0, dz),
    })
}

/// Cylinder along z, tested from the inside.
#[inline]
fn cylinder_z_inner(p: DVec3, cx: f64, cy: f64, r: f64, radius: f64) -> Verdict {
    let dx = cx - p.x;
    let dy = cy - p.y;
    let distance = r - (dx * dx + dy * dy).sqrt();
    if distance > radius {
        return None;
    }
    Some(Probe {
        distance,
        normal: DVec3::new(dx, dy, 0.0),
    })
}

/// Cylinder along x, tested from the outside (the goal roof rounding).
#[inline]
fn cylinder_x_outer(p: DVec3, cy: f64, cz: f64, r: f64, radius: f64) -> Verdict {
    let dy = p.y - cy;
    let dz = p.z - cz;
    let distance = (dy * dy + dz * dz).sqrt() - r;
    if distance > radius {
        return None;
    }
    Some(Probe {
        distance,
        normal: DVec3::new(0.0, dy, dz),
    })
}

/// Cylinder along y, tested from the outside (the goal post rounding).
#[inline]
fn cylinder_y_outer(p: DVec3, cx: f64, cz: f64, r: f64, radius: f64) -> Verdict {
    let dx = p.x - cx;
    let dz = p.z - cz;
    let distance = (dx * dx + dz * dz).sqrt() - r;
    if distance > radius {
        return None;
    }
    Some(Probe {
        distance,
        normal: DVec3::new(dx, 0.0, dz),
    })
}

/// Boundary query in the canonical +x/+z quadrant.
///
/// The cascade walks the bottom region, the top region, the mid-height walls
/// and corner pillar, then the goal cavity. Every `return` hands the answer
/// to exactly one primitive.
fn quadrant_probe(p: DVec3, radius: f64) -> Verdict {
    let half_w = ARENA_WIDTH / 2.0;
    let half_d = ARENA_DEPTH / 2.0;
    let half_gw = ARENA_GOAL_WIDTH / 2.0;
    let br = ARENA_BOTTOM_RADIUS;
    let tr = ARENA_TOP_RADIUS;
    let cr = ARENA_CORNER_RADIUS;
    let gsr = ARENA_GOAL_SIDE_RADIUS;
    let gtr = ARENA_GOAL_TOP_RADIUS;
    let gd = ARENA_GOAL_DEPTH;
    let gh = ARENA_GOAL_HEIGHT;

    // --- Bottom region: floor and its rounded edges ---
    if p.y <= br {
        if p.z <= half_d - cr {
            if p.x <= half_w - br {
                // Flat floor
                return plane(p.y, DVec3::Y, radius);
            }
            // Floor-wall edge along z
            return cylinder_z_inner(p, half_w - br, br, br, radius);
        }
        if p.x >= half_w - cr {
            // Corner floor torus: project onto the pillar circle, then test
            // the rounding sphere centered on that projection
            let corner_x = half_w - cr;
            let corner_z = half_d - cr;
            let ground_r = cr - br;
            let nx = p.x - corner_x;
            let nz = p.z - corner_z;
            let dist2 = nx * nx + nz * nz;
            if dist2 > ground_r * ground_r {
                let dist = dist2.sqrt();
                return sphere_inner(
                    p,
                    DVec3::new(
                        corner_x + nx / dist * ground_r,
                        br,
                        corner_z + nz / dist * ground_r,
                    ),
                    br,
                    radius,
                );
            }
            return plane(p.y, DVec3::Y, radius);
        }
        if p.z <= half_d - br {
            return plane(p.y, DVec3::Y, radius);
        }
        if p.x <= half_gw - br {
            if p.z <= half_d + gd - br {
                // Floor continues into the goal
                return plane(p.y, DVec3::Y, radius);
            }
            // Goal back-wall floor edge
            return cylinder_x_inner(p, br, half_d + gd - br, br, radius);
        }
        if p.z <= half_d + gsr {
            if p.x >= half_gw + gsr {
                // End-wall floor edge
                return cylinder_x_inner(p, br, half_d - br, br, radius);
            }
            // Goal mouth outer floor corner
            let ox = half_gw + gsr;
            let oz = half_d + gsr;
            let rad = gsr + br;
            let vx = p.x - ox;
            let vz = p.z - oz;
            let vlen2 = vx * vx + vz * vz;
            if vlen2 < rad * rad {
                let vlen = vlen2.sqrt();
                return sphere_inner(
                    p,
                    DVec3::new(ox + vx / vlen * rad, br, oz + vz / vlen * rad),
                    br,
                    radius,
                );
            }
            return plane(p.y, DVec3::Y, radius);
        }
        if p.z <= half_d + gd - br {
            // Goal side-wall floor edge
            return cylinder_z_inner(p, half_gw - br, br, br, radius);
        }
        // Goal inner bottom corner
        return sphere_inner(
            p,
            DVec3::new(half_gw - br, br, half_d + gd - br),
            br,
            radius,
        );
    }

    // --- Top region: ceiling and its rounded edges ---
    if p.y >= ARENA_HEIGHT - tr {
        if p.z <= half_d - cr {
            if p.x <= half_w - tr {
                // Flat ceiling
                return plane(ARENA_HEIGHT - p.y, DVec3::NEG_Y, radius);
            }
            // Ceiling-wall edge along z
            return cylinder_z_inner(p, half_w - tr, ARENA_HEIGHT - tr, tr, radius);
        }
        if p.x >= half_w - cr {
            // Corner ceiling torus
            let corner_x = half_w - cr;
            let corner_z = half_d - cr;
            let ceil_r = cr - tr;
            let nx = p.x - corner_x;
            let nz = p.z - corner_z;
            let dist2 = nx * nx + nz * nz;
            if dist2 > ceil_r * ceil_r {
                let dist = dist2.sqrt();
                return sphere_inner(
                    p,
                    DVec3::new(
                        corner_x + nx / dist * ceil_r,
                        ARENA_HEIGHT - tr,
                        corner_z + nz / dist * ceil_r,
                    ),
                    tr,
                    radius,
                );
            }
            return plane(ARENA_HEIGHT - p.y, DVec3::NEG_Y, radius);
        }
        if p.z <= half_d - tr {
            return plane(ARENA_HEIGHT - p.y, DVec3::NEG_Y, radius);
        }
        // Ceiling-end-wall edge
        return cylinder_x_inner(p, ARENA_HEIGHT - tr, half_d - tr, tr, radius);
    }

    // --- Mid-height: side wall and corner pillar ---
    if p.z <= half_d - cr {
        return plane(half_w - p.x, DVec3::NEG_X, radius);
    }
    if p.x >= half_w - cr {
        return cylinder_y_inner(p, half_w - cr, half_d - cr, cr, radius);
    }
    // Everything farther than the sphere radius from the end wall is clear
    if p.z < half_d - radius {
        return None;
    }

    // --- Goal cavity ---
    if p.z >= half_d + gsr {
        if p.y > gh - gtr {
            if p.x > half_gw - br {
                if p.z <= half_d + gd - br {
                    // Goal side-wall top edge
                    return cylinder_z_inner(p, half_gw - br, gh - gtr, br, radius);
                }
                // Goal inner top corner
                return sphere_inner(
                    p,
                    DVec3::new(half_gw - br, gh - gtr, half_d + gd - br),
                    br,
                    radius,
                );
            }
            if p.z > half_d + gd - br {
                // Goal back-wall top edge
                return cylinder_x_inner(p, gh - gtr, half_d + gd - br, br, radius);
            }
            // Goal ceiling
            return plane(gh - p.y, DVec3::NEG_Y, radius);
        }
        if p.x > half_gw - br {
            if p.z > half_d + gd - br {
                // Goal side/back vertical edge
                return cylinder_y_inner(p, half_gw - br, half_d + gd - br, br, radius);
            }
            // Goal side wall
            return plane(half_gw - p.x, DVec3::NEG_X, radius);
        }
        // Goal back wall
        return plane(half_d + gd - p.z, DVec3::NEG_Z, radius);
    }
    if p.x <= half_gw - br {
        if p.y >= gh + gsr {
            // End wall above the goal
            return plane(half_d - p.z, DVec3::NEG_Z, radius);
        }
        // Goal mouth roof rounding
        return cylinder_x_outer(p, gh + gsr, half_d + gsr, gsr, radius);
    }
    if p.y <= gh - gtr {
        if p.x >= half_gw + gsr {
            // End wall beside the goal
            return plane(half_d - p.z, DVec3::NEG_Z, radius);
        }
        // Goal post rounding
        return cylinder_y_outer(p, half_gw + gsr, half_d + gsr, gsr, radius);
    }
    // Goal mouth frame corner: the rounding sphere sits on the arc joining
    // the post and roof roundings
    let ox = half_gw - br;
    let oy = gh - gtr;
    let rad = gtr + gsr;
    let vx = p.x - ox;
    let vy = p.y - oy;
    let len2 = vx * vx + vy * vy;
    if len2 >= rad * rad {
        return plane(half_d - p.z, DVec3::NEG_Z, radius);
    }
    let len = len2.sqrt();
    sphere_outer(
        p,
        DVec3::new(ox + vx / len * rad, oy + vy / len * rad, half_d + gsr),
        gsr,
        radius,
    )
}

/// Test a sphere against the arena surface.
///
/// Returns `None` when the sphere clears the nearest applicable primitive by
/// more than its own radius, otherwise the penetration depth and the unit
/// correction normal pointing back into the arena.
pub fn collide_sphere_with_arena(center: DVec3, radius: f64) -> Option<ArenaContact> {
    let mut p = center;
    let negate_x = p.x < 0.0;
    let negate_z = p.z < 0.0;
    if negate_x {
        p.x = -p.x;
    }
    if negate_z {
        p.z = -p.z;
    }

    let probe = quadrant_probe(p, radius)?;

    let mut normal = probe.normal;
    if negate_x {
        normal.x = -normal.x;
    }
    if negate_z {
        normal.z = -normal.z;
    }

    Some(ArenaContact {
        penetration: radius - probe.distance,
        normal: normal.normalize_or_zero(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use proptest::prelude::*;

    #[test]
    fn clear_at_arena_center() {
        assert!(collide_sphere_with_arena(DVec3::new(0.0, 10.0, 0.0), BALL_RADIUS).is_none());
    }

    #[test]
    fn floor_contact() {
        let contact = collide_sphere_with_arena(DVec3::new(0.0, 1.0, 0.0), BALL_RADIUS).unwrap();
        assert_approx_eq!(contact.penetration, 1.0);
        assert_eq!(contact.normal, DVec3::Y);
    }

    #[test]
    fn ceiling_contact() {
        let contact = collide_sphere_with_arena(DVec3::new(0.0, 19.5, 0.0), 1.0).unwrap();
        assert_approx_eq!(contact.penetration, 0.5);
        assert_eq!(contact.normal, DVec3::NEG_Y);
    }

    #[test]
    fn side_wall_contact_both_sides() {
        let contact = collide_sphere_with_arena(DVec3::new(29.5, 10.0, 0.0), 1.0).unwrap();
        assert_approx_eq!(contact.penetration, 0.5);
        assert_eq!(contact.normal, DVec3::NEG_X);

        let mirrored = collide_sphere_with_arena(DVec3::new(-29.5, 10.0, 0.0), 1.0).unwrap();
        assert_approx_eq!(mirrored.penetration, 0.5);
        assert_eq!(mirrored.normal, DVec3::X);
    }

    #[test]
    fn goal_back_wall_contact() {
        let contact = collide_sphere_with_arena(DVec3::new(0.0, 5.0, 49.5), 1.0).unwrap();
        assert_approx_eq!(contact.penetration, 0.5);
        assert_eq!(contact.normal, DVec3::NEG_Z);
    }

    #[test]
    fn goal_mouth_center_is_clear() {
        // A ball passing through the middle of the goal mouth touches nothing
        assert!(collide_sphere_with_arena(DVec3::new(0.0, 5.0, 40.0), BALL_RADIUS).is_none());
    }

    #[test]
    fn corner_region_over_flat_floor() {
        // Inside the corner region but within the pillar circle, the floor
        // plane stays authoritative
        let contact = collide_sphere_with_arena(DVec3::new(24.0, 1.5, 33.0), BALL_RADIUS).unwrap();
        assert_approx_eq!(contact.penetration, 0.5);
        assert_eq!(contact.normal, DVec3::Y);
    }

    #[test]
    fn floor_wall_edge_normal_points_inward_and_up() {
        // Deep in the floor-wall rounding the normal gains both components
        let contact = collide_sphere_with_arena(DVec3::new(28.5, 1.5, 0.0), 1.0).unwrap();
        assert!(contact.penetration > 0.0);
        assert!(contact.normal.x < 0.0);
        assert!(contact.normal.y > 0.0);
        assert_approx_eq!(contact.normal.length(), 1.0);
    }

    #[test]
    fn goal_post_rounding_pushes_sideways() {
        // Overlapping the goal post rounding at mid height: the outer
        // cylinder is authoritative and its normal has no y component
        let contact = collide_sphere_with_arena(DVec3::new(15.5, 5.0, 40.2), 1.0).unwrap();
        assert!(contact.penetration > 0.0);
        assert_approx_eq!(contact.normal.y, 0.0);
        assert!(contact.normal.x < 0.0);
        assert!(contact.normal.z < 0.0);
        assert_approx_eq!(contact.normal.length(), 1.0);
    }

    proptest! {
        /// The boundary query must agree at a point and all three of its
        /// mirror images: equal penetration, mirrored normals.
        #[test]
        fn quadrant_symmetry(
            x in 0.0..34.0f64,
            y in 0.1..19.9f64,
            z in 0.0..49.0f64,
            radius in 0.1..2.0f64,
        ) {
            let base = collide_sphere_with_arena(DVec3::new(x, y, z), radius);
            for (sx, sz) in [(-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)] {
                let mirrored =
                    collide_sphere_with_arena(DVec3::new(sx * x, y, sz * z), radius);
                match (base, mirrored) {
                    (None, None) => {}
                    (Some(a), Some(b)) => {
                        prop_assert!((a.penetration - b.penetration).abs() < 1e-12);
                        prop_assert!((a.normal.x - sx * b.normal.x).abs() < 1e-12);
                        prop_assert!((a.normal.y - b.normal.y).abs() < 1e-12);
                        prop_assert!((a.normal.z - sz * b.normal.z).abs() < 1e-12);
                    }
                    _ => prop_assert!(false, "hit/miss disagreement across mirror"),
                }
            }
        }

        /// Any point well inside the open play volume is clear.
        #[test]
        fn interior_is_clear(
            x in -20.0..20.0f64,
            y in 5.0..12.0f64,
            z in -25.0..25.0f64,
        ) {
            prop_assert!(collide_sphere_with_arena(DVec3::new(x, y, z), 1.0).is_none());
        }
    }
}
