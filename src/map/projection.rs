use std::f64::consts::PI;

/// Geographic bounding box: (min_lon, min_lat, max_lon, max_lat)
pub type Bounds = (f64, f64, f64, f64);

/// Viewport mapping geographic coordinates onto the braille pixel grid
#[derive(Clone)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude (-90 to 90)
    pub center_lat: f64,
    /// Zoom level (higher = more zoomed in)
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom,
            width,
            height,
        }
    }

    /// Fit the viewport to a geographic bounding box with a small margin.
    pub fn fit(bounds: Bounds, width: usize, height: usize) -> Self {
        let (min_lon, min_lat, max_lon, max_lat) = bounds;
        let center_lon = (min_lon + max_lon) / 2.0;
        // Mercator is nonlinear in latitude: center on the midpoint of the
        // projected y-span, not the geographic midpoint, so the top and
        // bottom edges get equal margins
        let center_lat =
            inv_mercator_lat((mercator_y(min_lat) + mercator_y(max_lat)) / 2.0);

        let lon_span = (max_lon - min_lon).max(1e-9);
        let y_span = (mercator_y(min_lat) - mercator_y(max_lat)).abs().max(1e-9);

        // scale is zoom * width pixels per normalized mercator unit
        let zoom_x = 360.0 / lon_span;
        let zoom_y = height as f64 / (width as f64 * y_span);
        let zoom = zoom_x.min(zoom_y) * 0.95;

        Self::new(center_lon, center_lat, zoom, width, height)
    }

    /// Project a geographic coordinate (lon, lat) to pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        // Web Mercator projection
        let x = (lon + 180.0) / 360.0;
        let y = mercator_y(lat);

        let center_x = (self.center_lon + 180.0) / 360.0;
        let center_y = mercator_y(self.center_lat);

        let scale = self.zoom * self.width as f64;

        let px = ((x - center_x) * scale + self.width as f64 / 2.0) as i32;
        let py = ((y - center_y) * scale + self.height as f64 / 2.0) as i32;

        (px, py)
    }

    /// Unproject pixel coordinates back to geographic coordinates (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let scale = self.zoom * self.width as f64;

        let center_x = (self.center_lon + 180.0) / 360.0;
        let center_y = mercator_y(self.center_lat);

        let x = (px as f64 - self.width as f64 / 2.0) / scale + center_x;
        let y = (py as f64 - self.height as f64 / 2.0) / scale + center_y;

        let lon = x * 360.0 - 180.0;
        let lat = inv_mercator_lat(y);

        (lon, lat)
    }

    /// Check if a line segment might be visible (rough bounding box check)
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0 && min_x < self.width as i32 && max_y >= 0 && min_y < self.height as i32
    }
}

/// Normalized Web Mercator y for a latitude (0 toward the north pole)
fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat * PI / 180.0;
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0
}

/// Latitude for a normalized Web Mercator y
fn inv_mercator_lat(y: f64) -> f64 {
    (PI * (1.0 - 2.0 * y)).sinh().atan() * 180.0 / PI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_center() {
        let vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        let (x, y) = vp.project(0.0, 0.0);
        assert_eq!(x, 50);
        assert_eq!(y, 50);
    }

    #[test]
    fn test_project_unproject_round_trip() {
        let vp = Viewport::new(-96.0, 38.0, 4.0, 200, 100);
        let (px, py) = vp.project(-120.5, 44.2);
        let (lon, lat) = vp.unproject(px, py);
        assert!((lon + 120.5).abs() < 1.0);
        assert!((lat - 44.2).abs() < 1.0);
    }

    #[test]
    fn test_fit_keeps_bounds_inside() {
        // Roughly the continental US
        let bounds = (-125.0, 24.0, -66.0, 50.0);
        let vp = Viewport::fit(bounds, 200, 100);

        for (lon, lat) in [(-125.0, 24.0), (-66.0, 50.0), (-125.0, 50.0), (-66.0, 24.0)] {
            let (px, py) = vp.project(lon, lat);
            assert!(px >= 0 && px <= 200, "px {} out of range", px);
            assert!(py >= 0 && py <= 100, "py {} out of range", py);
        }
    }

    #[test]
    fn test_fit_balances_vertical_margins() {
        // Mercator stretches high latitudes, so centering on the geographic
        // latitude midpoint would push the north edge off the canvas
        let bounds = (-125.0, 24.0, -66.0, 50.0);
        let vp = Viewport::fit(bounds, 200, 100);

        let (_, py_top) = vp.project(-95.5, 50.0);
        let (_, py_bottom) = vp.project(-95.5, 24.0);
        let top_margin = py_top;
        let bottom_margin = 100 - py_bottom;
        assert!(
            (top_margin - bottom_margin).abs() <= 1,
            "uneven margins: top {} bottom {}",
            top_margin,
            bottom_margin
        );
    }
}
