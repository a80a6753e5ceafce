//! The ray casting engine - camera state, DDA grid traversal and movement.

use crate::{GridMap, Projection, Vec2};

/// Divisor turning the viewport aspect ratio into the view plane length.
/// Calibrated for square pixels; 640x480 gives |plane| = 2/3, about 67 deg.
pub const CALIB_PIXELS: f64 = 2.0;
/// Same, for character-cell output. Terminal cells are roughly twice as
/// tall as they are wide, hence double the pixel divisor. Calibrated, not
/// derived - keep the two constants independent.
pub const CALIB_CELLS: f64 = 4.0;

/// Which axis the normal of the hit face runs along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    /// Hit while stepping in y. Painted at half brightness, which is the
    /// engine's entire lighting model.
    NorthSouth,
    /// Hit while stepping in x.
    EastWest,
}

/// Everything the compositor needs to paint one screen column.
#[derive(Clone, Copy, Debug)]
pub struct FovRay {
    pub dir: Vec2,
    pub facing: Facing,
    /// Perpendicular distance to the hit face by default; the true ray
    /// length in Euclidean projection (which bends straight walls).
    pub distance: f64,
    /// Tile code of the hit wall.
    pub texture: u8,
    /// Fractional position along the hit face, in [0, 1).
    /// 0 is the face's left edge as seen by the player.
    pub wall_x: f64,
    /// Cells entered during the traversal.
    pub steps: u32,
}

pub struct RaycastEngine {
    pos: Vec2,
    dir: Vec2,
    plane: Vec2,
    projection: Projection,
}

impl RaycastEngine {
    /// Player starts on the map's spawn point, facing north.
    pub fn new(grid: &GridMap) -> Self {
        Self {
            pos: grid.spawn(),
            dir: Vec2::new(0.0, 1.0),
            plane: Vec2::new(0.5, 0.0),
            projection: Projection::Perpendicular,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn dir(&self) -> Vec2 {
        self.dir
    }

    #[inline]
    pub fn plane(&self) -> Vec2 {
        self.plane
    }

    #[inline]
    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    /// Place the camera explicitly (level restarts, scripted viewpoints).
    pub fn set_pose(&mut self, pos: Vec2, dir: Vec2, plane: Vec2) {
        self.pos = pos;
        self.dir = dir;
        self.plane = plane;
    }

    /// Field of view, in degrees.
    pub fn fov_deg(&self) -> f64 {
        2.0 * (self.plane.length() / self.dir.length()).atan().to_degrees()
    }

    /// Rebuild the view plane for a new viewport shape. The plane stays
    /// perpendicular to the heading; only its length changes with the
    /// aspect ratio, so wider viewports see more instead of stretching.
    pub fn fit_to_viewport(&mut self, aspect_ratio: f64, cell_output: bool) {
        let calib = if cell_output { CALIB_CELLS } else { CALIB_PIXELS };
        self.plane = self.dir.perp() * (aspect_ratio / calib);
    }

    /// Cast the ray for one screen column and return what it hit.
    pub fn cast_column(&self, grid: &GridMap, screen_x: i32, screen_width: i32) -> FovRay {
        debug_assert!(screen_width > 0);
        // camera-space offset: -1 at the left edge, +1 at the right
        let t = 2.0 * (screen_x as f64) / (screen_width as f64) - 1.0;
        let rd = self.dir + self.plane * t;

        let mut map_x = self.pos.x.floor() as i32;
        let mut map_y = self.pos.y.floor() as i32;
        let mut ray_x = AxisRay::init(rd.x, self.pos.x);
        let mut ray_y = AxisRay::init(rd.y, self.pos.y);

        // advance whichever axis crosses its next cell boundary sooner,
        // remembering that boundary's distance before stepping past it;
        // the wall ring guarantees termination
        let facing;
        let crossing_dist;
        let mut steps = 0;
        loop {
            if ray_x.side_dist < ray_y.side_dist {
                let d = ray_x.side_dist;
                ray_x.side_dist += ray_x.delta;
                map_x += ray_x.step;
                steps += 1;
                if grid.is_wall(map_x, map_y) {
                    facing = Facing::EastWest;
                    crossing_dist = d;
                    break;
                }
            } else {
                let d = ray_y.side_dist;
                ray_y.side_dist += ray_y.delta;
                map_y += ray_y.step;
                steps += 1;
                if grid.is_wall(map_x, map_y) {
                    facing = Facing::NorthSouth;
                    crossing_dist = d;
                    break;
                }
            }
        }

        // the deltas are pre-divided by the ray component, so the
        // accumulated crossing distance IS the perpendicular distance
        let distance = match self.projection {
            Projection::Perpendicular => crossing_dist,
            Projection::Euclidean => crossing_dist * rd.length(),
        };

        // fractional hit position along the face, 0 = the edge on the
        // player's left, whichever way the face is oriented
        let frac = match facing {
            Facing::EastWest => {
                let y_spot = self.pos.y + crossing_dist * rd.y;
                y_spot - y_spot.floor()
            }
            Facing::NorthSouth => {
                let x_spot = self.pos.x + crossing_dist * rd.x;
                x_spot - x_spot.floor()
            }
        };
        let mirror = match facing {
            Facing::EastWest => ray_x.step > 0,
            Facing::NorthSouth => ray_y.step < 0,
        };
        // a corner hit mirrors 0.0 to exactly 1.0; fold it back into [0, 1)
        let wall_x = if mirror { 1.0 - frac } else { frac }.fract();

        FovRay {
            dir: rd,
            facing,
            distance,
            texture: grid.tile(map_x, map_y),
            wall_x,
            steps,
        }
    }

    /// Cast one ray per screen column into `out`. Read-only with respect
    /// to the camera and map; columns do not depend on each other.
    pub fn cast_all(&self, grid: &GridMap, screen_width: i32, out: &mut Vec<FovRay>) {
        out.clear();
        out.reserve(screen_width as usize);
        for x in 0..screen_width {
            out.push(self.cast_column(grid, x, screen_width));
        }
    }

    pub fn move_forward(&mut self, grid: &GridMap, dist: f64) {
        self.slide(grid, self.dir * dist);
    }

    pub fn move_backward(&mut self, grid: &GridMap, dist: f64) {
        self.slide(grid, -(self.dir * dist));
    }

    pub fn strafe_left(&mut self, grid: &GridMap, dist: f64) {
        self.slide(grid, -(self.dir.perp() * dist));
    }

    pub fn strafe_right(&mut self, grid: &GridMap, dist: f64) {
        self.slide(grid, self.dir.perp() * dist);
    }

    /// Turning is counter-clockwise positive, so left means a positive angle.
    pub fn turn_left(&mut self, rad: f64) {
        self.rotate(rad);
    }

    pub fn turn_right(&mut self, rad: f64) {
        self.rotate(-rad);
    }

    //--------------------------
    // Internal stuff

    /// Heading and view plane always rotate together.
    fn rotate(&mut self, rad: f64) {
        self.dir = self.dir.rotated(rad);
        self.plane = self.plane.rotated(rad);
    }

    /// Displace by `delta`, sliding along walls: each axis is tested on
    /// its own, so a blocked x still lets the y component through.
    fn slide(&mut self, grid: &GridMap, delta: Vec2) {
        let new_x = self.pos.x + delta.x;
        if !grid.is_wall(new_x.floor() as i32, self.pos.y.floor() as i32) {
            self.pos.x = new_x;
        }
        let new_y = self.pos.y + delta.y;
        if !grid.is_wall(self.pos.x.floor() as i32, new_y.floor() as i32) {
            self.pos.y = new_y;
        }
    }
}

//--------------------------
// Internal stuff

/// Boundary-crossing bookkeeping for one axis of the DDA walk.
struct AxisRay {
    /// Ray-parameter distance to the next cell boundary on this axis.
    side_dist: f64,
    /// Ray-parameter distance between consecutive boundaries.
    delta: f64,
    step: i32,
}

impl AxisRay {
    /// An axis-aligned ray divides to +inf here, which simply never wins
    /// the shorter-distance comparison - no special casing needed.
    fn init(rd: f64, pos: f64) -> Self {
        let delta = (1.0 / rd).abs();
        if rd < 0.0 {
            Self {
                side_dist: (pos - pos.floor()) * delta,
                delta,
                step: -1,
            }
        } else {
            // the +1 keeps this factor nonzero, so delta = inf stays inf
            Self {
                side_dist: (pos.floor() + 1.0 - pos) * delta,
                delta,
                step: 1,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_ray_init_positive() {
        let r = AxisRay::init(0.5, 3.25);
        assert_eq!(r.step, 1);
        assert_eq!(r.delta, 2.0);
        // 0.75 of a cell to the next boundary, times the delta
        assert_eq!(r.side_dist, 1.5);
    }

    #[test]
    fn test_axis_ray_init_negative() {
        let r = AxisRay::init(-0.25, 3.25);
        assert_eq!(r.step, -1);
        assert_eq!(r.delta, 4.0);
        assert_eq!(r.side_dist, 1.0);
    }

    #[test]
    fn test_axis_ray_handles_zero_component() {
        let r = AxisRay::init(0.0, 7.0);
        assert_eq!(r.delta, f64::INFINITY);
        assert_eq!(r.side_dist, f64::INFINITY);
        assert!(!r.side_dist.is_nan());

        // integral position with a negative component: zero times a
        // finite delta, not zero times infinity
        let r = AxisRay::init(-1.0, 7.0);
        assert_eq!(r.side_dist, 0.0);
    }
}
