use crate::braille::{BrailleCanvas, OUTLINE_SHADE};
use crate::map::geometry::{draw_line, fill_ring, point_in_ring};
use crate::map::projection::{Bounds, Viewport};

/// Number of fill shade buckets for the choropleth color ramp.
pub const SHADE_BUCKETS: u8 = 8;

/// A state outline: full name plus the exterior rings of its polygons
/// (lon/lat coordinate sequences).
#[derive(Clone)]
pub struct StateShape {
    pub name: String,
    pub rings: Vec<Vec<(f64, f64)>>,
}

/// Choropleth renderer over the loaded state outlines
pub struct MapRenderer {
    shapes: Vec<StateShape>,
}

impl MapRenderer {
    pub fn new(shapes: Vec<StateShape>) -> Self {
        Self { shapes }
    }

    pub fn has_data(&self) -> bool {
        !self.shapes.is_empty()
    }

    /// Geographic bounding box over all loaded shapes
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;

        for shape in &self.shapes {
            for ring in &shape.rings {
                for &(lon, lat) in ring {
                    bounds = Some(match bounds {
                        None => (lon, lat, lon, lat),
                        Some((min_lon, min_lat, max_lon, max_lat)) => (
                            min_lon.min(lon),
                            min_lat.min(lat),
                            max_lon.max(lon),
                            max_lat.max(lat),
                        ),
                    });
                }
            }
        }

        bounds
    }

    /// Render the choropleth into a braille canvas.
    ///
    /// `shade_for` maps a state name to its fill bucket (1..=SHADE_BUCKETS,
    /// 0 for no fill). Outlines are drawn on top in the reserved outline
    /// shade so borders stay visible between similarly shaded neighbors.
    pub fn render<F>(&self, width: usize, height: usize, viewport: &Viewport, shade_for: F) -> BrailleCanvas
    where
        F: Fn(&str) -> u8,
    {
        let mut canvas = BrailleCanvas::new(width, height);
        let max_y = (height * 4) as i32;

        for shape in &self.shapes {
            let shade = shade_for(&shape.name);

            for ring in &shape.rings {
                let projected: Vec<(i32, i32)> =
                    ring.iter().map(|&(lon, lat)| viewport.project(lon, lat)).collect();

                if shade > 0 {
                    fill_ring(&mut canvas, &projected, shade, max_y);
                }

                self.draw_outline(&mut canvas, &projected, viewport);
            }
        }

        canvas
    }

    /// Find the state containing a geographic point (for hover)
    pub fn state_at(&self, lon: f64, lat: f64) -> Option<&str> {
        self.shapes.iter().find_map(|shape| {
            shape
                .rings
                .iter()
                .any(|ring| point_in_ring(lon, lat, ring))
                .then_some(shape.name.as_str())
        })
    }

    /// Draw a projected ring outline with viewport culling
    fn draw_outline(&self, canvas: &mut BrailleCanvas, projected: &[(i32, i32)], viewport: &Viewport) {
        if projected.len() < 2 {
            return;
        }

        let mut prev: Option<(i32, i32)> = None;

        for &(px, py) in projected {
            if let Some((prev_x, prev_y)) = prev {
                let dist = ((px - prev_x).abs() + (py - prev_y).abs()) as usize;
                if dist < viewport.width && viewport.line_might_be_visible((prev_x, prev_y), (px, py)) {
                    draw_line(canvas, prev_x, prev_y, px, py, OUTLINE_SHADE);
                }
            }

            prev = Some((px, py));
        }
    }
}
