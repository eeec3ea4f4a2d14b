/// Analog clock renderer.
///
/// Angles are in degrees with 0° at 12 o'clock, increasing clockwise. Each
/// hand ends on the ellipse inscribed in its own bounding box, so the hour
/// hand gets a shorter box rather than a separate length.
use tiny_skia::{FillRule, LineCap, Paint, PathBuilder, Pixmap, Point, Stroke, Transform};
use tracing::debug;

use crate::face::model::AnalogBlock;
use crate::render::compositor::{Compositor, SlotId};
use crate::render::plugins::{RenderState, TickRenderer};

pub const MAJOR_PIP_RADIUS: u32 = 3;
pub const MINOR_PIP_RADIUS: u32 = 1;
/// Hour hand box radius relative to the minute hand box
pub const HOUR_HAND_RATIO: f32 = 0.6;
pub const SECOND_HAND_WIDTH: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandAngles {
    pub hour: f32,
    pub minute: f32,
    pub second: f32,
}

impl HandAngles {
    pub fn at(hour: u32, minute: u32, second: u32) -> Self {
        let hour = (hour % 12) as f32;
        let minute = minute as f32;
        Self {
            // the hour hand creeps forward through the hour
            hour: 360.0 * hour / 12.0 + 30.0 * minute / 60.0,
            minute: 360.0 * minute / 60.0,
            second: 360.0 * second as f32 / 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn center(&self) -> Point {
        Point::from_xy(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Same center, both extents scaled by `ratio`
    pub fn scaled(&self, ratio: f32) -> Self {
        let c = self.center();
        let width = self.width * ratio;
        let height = self.height * ratio;
        Self {
            x: c.x - width / 2.0,
            y: c.y - height / 2.0,
            width,
            height,
        }
    }
}

pub fn polar_point(bounds: &Bounds, angle_deg: f32) -> Point {
    let c = bounds.center();
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    Point::from_xy(c.x + bounds.width / 2.0 * sin, c.y - bounds.height / 2.0 * cos)
}

pub fn pip_radius(index: u32) -> u32 {
    if index % 3 == 0 {
        MAJOR_PIP_RADIUS
    } else {
        MINOR_PIP_RADIUS
    }
}

/// Geometry of a dial inside a canvas of side `2 * radius + 2 * MAJOR_PIP_RADIUS`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialGeometry {
    pub minute_box: Bounds,
    pub hour_box: Bounds,
}

impl DialGeometry {
    pub fn new(radius: u16) -> Self {
        // inset so pips on the rim stay on the canvas
        let inset = MAJOR_PIP_RADIUS as f32;
        let side = 2.0 * radius as f32;
        let minute_box = Bounds {
            x: inset,
            y: inset,
            width: side,
            height: side,
        };
        Self {
            minute_box,
            hour_box: minute_box.scaled(HOUR_HAND_RATIO),
        }
    }

    pub fn center(&self) -> Point {
        self.minute_box.center()
    }

    /// The twelve hour marks with their radii
    pub fn pips(&self) -> impl Iterator<Item = (Point, u32)> + '_ {
        (0..12).map(|i| (polar_point(&self.minute_box, i as f32 * 30.0), pip_radius(i)))
    }
}

pub struct AnalogRenderer {
    block: AnalogBlock,
    pub slot: SlotId,
    hour: u32,
    minute: u32,
    second: u32,
}

impl AnalogRenderer {
    pub fn new(block: AnalogBlock, slot: SlotId) -> Self {
        Self {
            block,
            slot,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }

    pub fn angles(&self) -> HandAngles {
        HandAngles::at(self.hour, self.minute, self.second)
    }

    /// Paint the dial onto a cleared canvas surface. Does nothing when the
    /// analog block is disabled.
    pub fn paint(&self, surface: &mut Pixmap) {
        if !self.block.enabled {
            return;
        }

        let geometry = DialGeometry::new(self.block.radius);
        let center = geometry.center();

        let mut paint = Paint::default();
        paint.set_color(self.block.hand_color.to_color());
        paint.anti_alias = true;

        if self.block.pips_enabled {
            for (at, radius) in geometry.pips() {
                if let Some(dot) = PathBuilder::from_circle(at.x, at.y, radius as f32) {
                    surface.fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
                }
            }
        }

        let angles = self.angles();
        let width = self.block.hand_width as f32;
        draw_hand(surface, &paint, center, polar_point(&geometry.minute_box, angles.minute), width);
        draw_hand(surface, &paint, center, polar_point(&geometry.hour_box, angles.hour), width);
        if self.block.seconds_enabled {
            draw_hand(
                surface,
                &paint,
                center,
                polar_point(&geometry.minute_box, angles.second),
                SECOND_HAND_WIDTH,
            );
        }
    }

    pub fn release(self, compositor: &mut Compositor) {
        compositor.destroy(self.slot);
    }
}

fn draw_hand(surface: &mut Pixmap, paint: &Paint, from: Point, to: Point, width: f32) {
    let mut pb = PathBuilder::new();
    pb.move_to(from.x, from.y);
    pb.line_to(to.x, to.y);
    let Some(path) = pb.finish() else {
        return;
    };
    let stroke = Stroke {
        width,
        line_cap: LineCap::Round,
        ..Stroke::default()
    };
    surface.stroke_path(&path, paint, &stroke, Transform::identity(), None);
}

impl TickRenderer for AnalogRenderer {
    fn update(&mut self, state: &RenderState, compositor: &mut Compositor) {
        if !self.block.enabled {
            return;
        }
        self.hour = state.hour % 12;
        self.minute = state.minute;
        self.second = state.second;
        compositor.mark_dirty(self.slot);
        debug!("Analog hands {}:{:02}:{:02}", self.hour, self.minute, self.second);
    }
}
