use crate::braille::BrailleCanvas;

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32, shade: u8) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y, shade);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Fill a projected polygon ring with even-odd scanline filling.
/// `max_y` bounds the scan to the canvas pixel height.
pub fn fill_ring(canvas: &mut BrailleCanvas, ring: &[(i32, i32)], shade: u8, max_y: i32) {
    if ring.len() < 3 {
        return;
    }

    let y_min = ring.iter().map(|p| p.1).min().unwrap_or(0).max(0);
    let y_max = ring.iter().map(|p| p.1).max().unwrap_or(0).min(max_y);

    let mut crossings: Vec<i32> = Vec::new();

    for y in y_min..=y_max {
        crossings.clear();

        // Collect x coordinates where edges cross this scanline
        for i in 0..ring.len() {
            let (x0, y0) = ring[i];
            let (x1, y1) = ring[(i + 1) % ring.len()];

            if (y0 <= y && y1 > y) || (y1 <= y && y0 > y) {
                let t = (y - y0) as f64 / (y1 - y0) as f64;
                crossings.push(x0 + (t * (x1 - x0) as f64) as i32);
            }
        }

        crossings.sort_unstable();

        for pair in crossings.chunks(2) {
            if let [xa, xb] = pair {
                for x in *xa..=*xb {
                    canvas.set_pixel_signed(x, y, shade);
                }
            }
        }
    }
}

/// Even-odd point-in-ring test in geographic coordinates (for hover hit tests)
pub fn point_in_ring(lon: f64, lat: f64, ring: &[(f64, f64)]) -> bool {
    let mut inside = false;
    let n = ring.len();

    for i in 0..n {
        let (x0, y0) = ring[i];
        let (x1, y1) = ring[(i + 1) % n];

        if (y0 > lat) != (y1 > lat) {
            let cross_x = x0 + (lat - y0) / (y1 - y0) * (x1 - x0);
            if lon < cross_x {
                inside = !inside;
            }
        }
    }

    inside
}
