use crate::surface::SurfaceSize;

pub type Color = [u8; 4];

pub const BLACK: Color = [0, 0, 0, 255];
pub const WHITE: Color = [255, 255, 255, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Stroke-based 2D drawing interface.
///
/// Sketch code only talks to this trait. It must not care whether the pixels end up in a
/// window framebuffer, an offscreen buffer, or a command log.
///
/// The stroke color is sticky: it applies to every primitive drawn after `set_stroke` until
/// it is changed again.
pub trait Canvas2d {
    fn size(&self) -> SurfaceSize;

    fn stroke(&self) -> Color;
    fn set_stroke(&mut self, color: Color);

    /// One-pixel segment from `(x1, y1)` to `(x2, y2)`, both endpoints inclusive.
    fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);

    /// Unfilled ellipse centred on `(cx, cy)` with diameters `w` by `h`.
    fn ellipse(&mut self, cx: i32, cy: i32, w: i32, h: i32);

    fn clear(&mut self, color: Color);
}

/// CPU canvas that rasterizes strokes into an RGBA frame buffer.
///
/// Primitives may start or end anywhere in `i32` space. Rasterization only walks the part
/// that overlaps the surface.
pub struct CpuCanvas<'a> {
    frame: &'a mut [u8],
    size: SurfaceSize,
    stroke: Color,
}

impl<'a> CpuCanvas<'a> {
    pub fn new(frame: &'a mut [u8], size: SurfaceSize) -> Self {
        Self {
            frame,
            size,
            stroke: BLACK,
        }
    }

    pub fn with_stroke(mut self, color: Color) -> Self {
        self.stroke = color;
        self
    }

    fn plot(&mut self, x: i64, y: i64) {
        if x < 0 || y < 0 || x >= self.size.width as i64 || y >= self.size.height as i64 {
            return;
        }
        let idx = ((y as usize) * (self.size.width as usize) + x as usize) * 4;
        if let Some(px) = self.frame.get_mut(idx..idx + 4) {
            px.copy_from_slice(&self.stroke);
        }
    }

    // Both ends past the same edge means nothing of the shape can land on the surface.
    fn outside(&self, min_x: i64, min_y: i64, max_x: i64, max_y: i64) -> bool {
        max_x < 0
            || max_y < 0
            || min_x >= self.size.width as i64
            || min_y >= self.size.height as i64
    }
}

impl Canvas2d for CpuCanvas<'_> {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn stroke(&self) -> Color {
        self.stroke
    }

    fn set_stroke(&mut self, color: Color) {
        self.stroke = color;
    }

    fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let (x1, y1, x2, y2) = (x1 as i64, y1 as i64, x2 as i64, y2 as i64);
        if self.outside(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2)) {
            return;
        }
        let clip = Clip::of(self.size);
        rasterize_line(x1, y1, x2, y2, clip, |x, y| self.plot(x, y));
    }

    fn ellipse(&mut self, cx: i32, cy: i32, w: i32, h: i32) {
        let rx = (w as i64).abs() / 2;
        let ry = (h as i64).abs() / 2;
        let (cx, cy) = (cx as i64, cy as i64);
        if self.outside(cx - rx, cy - ry, cx + rx, cy + ry) {
            return;
        }
        let clip = Clip::of(self.size);
        rasterize_ellipse(cx, cy, rx, ry, clip, |x, y| self.plot(x, y));
    }

    fn clear(&mut self, color: Color) {
        let len = self.size.rgba_len().min(self.frame.len());
        for px in self.frame[..len].chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }
}

/// Inclusive pixel window a rasterizer walks. Work is bounded by the window, not by the
/// length of the primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Clip {
    min_x: i64,
    min_y: i64,
    max_x: i64,
    max_y: i64,
}

impl Clip {
    fn of(size: SurfaceSize) -> Self {
        Self {
            min_x: 0,
            min_y: 0,
            max_x: size.width as i64 - 1,
            max_y: size.height as i64 - 1,
        }
    }
}

/// `round(t * num / den)` for non-negative operands, halves rounding up.
fn scaled_round(t: i64, num: i64, den: i64) -> i64 {
    let (t, num, den) = (t as i128, num as i128, den as i128);
    ((2 * t * num + den) / (2 * den)) as i64
}

/// Segment from `(x1, y1)` to `(x2, y2)`, both endpoints inclusive, walked from the first
/// endpoint toward the second.
///
/// One pixel per step along the major axis, with the minor coordinate rounded from the
/// exact slope. Only the major-axis span inside `clip` is visited.
fn rasterize_line(
    x1: i64,
    y1: i64,
    x2: i64,
    y2: i64,
    clip: Clip,
    mut plot: impl FnMut(i64, i64),
) {
    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    if dx == 0 && dy == 0 {
        plot(x1, y1);
        return;
    }

    let x_major = dx >= dy;
    let (a1, a2, b1, b2) = if x_major {
        (x1, x2, y1, y2)
    } else {
        (y1, y2, x1, x2)
    };
    let (major, minor) = if x_major { (dx, dy) } else { (dy, dx) };
    let (lo_clip, hi_clip) = if x_major {
        (clip.min_x, clip.max_x)
    } else {
        (clip.min_y, clip.max_y)
    };

    let lo = a1.min(a2).max(lo_clip);
    let hi = a1.max(a2).min(hi_clip);
    if lo > hi {
        return;
    }

    let sb = (b2 - b1).signum();
    for i in 0..=(hi - lo) {
        let a = if a1 <= a2 { lo + i } else { hi - i };
        let b = b1 + sb * scaled_round((a - a1).abs(), minor, major);
        if x_major {
            plot(a, b);
        } else {
            plot(b, a);
        }
    }
}

/// Rounded offset from the centre line to the outline, `round(other * sqrt(1 - d^2 / r^2))`,
/// at distance `d` along the axis of radius `r`.
fn outline_offset(d: i64, r: i64, other: i64) -> i64 {
    let (d, r, other) = (d as i128, r as i128, other as i128);
    let scaled = (4 * other * other * (r * r - d * d)) as u128;
    ((scaled.isqrt() as i128 + r) / (2 * r)) as i64
}

/// Ellipse outline centred on `(cx, cy)` with radii `rx` and `ry`.
///
/// Columns cover the flat parts of the outline and rows cover the steep parts, so the
/// union is gap-free. Only columns and rows inside `clip` are visited.
fn rasterize_ellipse(
    cx: i64,
    cy: i64,
    rx: i64,
    ry: i64,
    clip: Clip,
    mut plot: impl FnMut(i64, i64),
) {
    if rx == 0 || ry == 0 {
        rasterize_line(cx - rx, cy - ry, cx + rx, cy + ry, clip, plot);
        return;
    }

    for x in (cx - rx).max(clip.min_x)..=(cx + rx).min(clip.max_x) {
        let k = outline_offset(x - cx, rx, ry);
        plot(x, cy - k);
        plot(x, cy + k);
    }
    for y in (cy - ry).max(clip.min_y)..=(cy + ry).min(clip.max_y) {
        let k = outline_offset(y - cy, ry, rx);
        plot(cx - k, y);
        plot(cx + k, y);
    }
}

/// One primitive captured by [`RecordingCanvas`], with the stroke it was drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCommand {
    Clear(Color),
    Line {
        from: Point,
        to: Point,
        color: Color,
    },
    Ellipse {
        center: Point,
        width: i32,
        height: i32,
        color: Color,
    },
}

/// Canvas that records draw calls instead of rasterizing them.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    size: SurfaceSize,
    stroke: Color,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            stroke: BLACK,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Recorded segments as `(from, to)` pairs, in draw order.
    pub fn lines(&self) -> Vec<(Point, Point)> {
        self.commands
            .iter()
            .filter_map(|cmd| match *cmd {
                DrawCommand::Line { from, to, .. } => Some((from, to)),
                _ => None,
            })
            .collect()
    }

    /// Recorded ellipses as `(center, width, height)`, in draw order.
    pub fn ellipses(&self) -> Vec<(Point, i32, i32)> {
        self.commands
            .iter()
            .filter_map(|cmd| match *cmd {
                DrawCommand::Ellipse {
                    center,
                    width,
                    height,
                    ..
                } => Some((center, width, height)),
                _ => None,
            })
            .collect()
    }
}

impl Canvas2d for RecordingCanvas {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn stroke(&self) -> Color {
        self.stroke
    }

    fn set_stroke(&mut self, color: Color) {
        self.stroke = color;
    }

    fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.commands.push(DrawCommand::Line {
            from: Point::new(x1, y1),
            to: Point::new(x2, y2),
            color: self.stroke,
        });
    }

    fn ellipse(&mut self, cx: i32, cy: i32, w: i32, h: i32) {
        self.commands.push(DrawCommand::Ellipse {
            center: Point::new(cx, cy),
            width: w,
            height: h,
            color: self.stroke,
        });
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDE: Clip = Clip {
        min_x: -1000,
        min_y: -1000,
        max_x: 1000,
        max_y: 1000,
    };

    fn points_of_line(x1: i64, y1: i64, x2: i64, y2: i64) -> Vec<(i64, i64)> {
        let mut out = Vec::new();
        rasterize_line(x1, y1, x2, y2, WIDE, |x, y| out.push((x, y)));
        out
    }

    #[test]
    fn line_visits_both_endpoints() {
        let pts = points_of_line(0, 0, 5, 2);
        assert_eq!(pts.first(), Some(&(0, 0)));
        assert_eq!(pts.last(), Some(&(5, 2)));
        assert_eq!(pts.len(), 6);
    }

    #[test]
    fn diagonal_line_steps_one_pixel_per_axis() {
        let pts = points_of_line(3, 3, 0, 0);
        assert_eq!(pts, vec![(3, 3), (2, 2), (1, 1), (0, 0)]);
    }

    #[test]
    fn ellipse_hits_axis_extremes() {
        let mut pts = Vec::new();
        rasterize_ellipse(10, 10, 4, 3, WIDE, |x, y| pts.push((x, y)));
        assert!(pts.contains(&(10, 7)));
        assert!(pts.contains(&(10, 13)));
        assert!(pts.contains(&(6, 10)));
        assert!(pts.contains(&(14, 10)));
        assert!(!pts.contains(&(10, 10)));
    }

    #[test]
    fn degenerate_ellipse_collapses_to_segment() {
        let mut pts = Vec::new();
        rasterize_ellipse(5, 5, 0, 2, WIDE, |x, y| pts.push((x, y)));
        assert_eq!(pts, vec![(5, 3), (5, 4), (5, 5), (5, 6), (5, 7)]);
    }

    #[test]
    fn cpu_canvas_clips_instead_of_panicking() {
        let size = SurfaceSize::new(8, 8);
        let mut frame = vec![0u8; size.rgba_len()];
        let mut canvas = CpuCanvas::new(&mut frame, size);
        canvas.line(-20, 4, 30, 4);
        canvas.line(100, 100, 200, 200);
        canvas.ellipse(-50, -50, 10, 10);
        canvas.ellipse(4, 4, 40, 40);

        let row = 4 * 8 * 4;
        assert_eq!(&frame[row..row + 4], &BLACK);
    }

    #[test]
    fn recording_canvas_tags_primitives_with_current_stroke() {
        let red = [255, 0, 0, 255];
        let mut canvas = RecordingCanvas::new(SurfaceSize::new(10, 10));
        canvas.line(0, 0, 1, 1);
        canvas.set_stroke(red);
        canvas.ellipse(5, 5, 4, 4);

        assert_eq!(
            canvas.commands(),
            &[
                DrawCommand::Line {
                    from: Point::new(0, 0),
                    to: Point::new(1, 1),
                    color: BLACK,
                },
                DrawCommand::Ellipse {
                    center: Point::new(5, 5),
                    width: 4,
                    height: 4,
                    color: red,
                },
            ]
        );
    }
}
