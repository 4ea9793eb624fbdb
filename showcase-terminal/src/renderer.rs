/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use showcase_core::{Camera, Material, Mesh, Pose, Rgb, SceneModel, Triangle};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Minimum brightness so faces turned away from the light stay visible
const AMBIENT: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: Option<Rgb>,
}

impl Cell {
    const EMPTY: Cell = Cell {
        character: ' ',
        color: None,
    };
}

/// ASCII renderer that converts scene models to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![Cell::EMPTY; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(Cell::EMPTY);
    }

    /// Character at a cell, for inspection
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x].character)
    }

    /// Render every mesh of `model`, placed inside the `group` transform
    pub fn render_model(&mut self, model: &SceneModel, group: &Pose, camera: &Camera) {
        let model_matrix = group.model_matrix() * model.pose.model_matrix();
        for (mesh, material) in model.drawables() {
            self.render_mesh(mesh, material, &model_matrix, camera);
        }
    }

    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        material: &Material,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) {
        for triangle in &mesh.triangles {
            if material.wireframe {
                self.render_edges(triangle, material, model_matrix, camera);
            } else {
                self.render_triangle(triangle, material, model_matrix, camera);
            }
        }
    }

    fn project(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) -> Option<(f32, f32, f32)> {
        camera.project_to_screen(point, model_matrix, self.width as u32, self.height as u32)
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        material: &Material,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (coords, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match self.project(&vertex.position, model_matrix, camera) {
                Some(projected) => *coords = projected,
                None => return, // Triangle is clipped
            }
        }

        // Shade with the face normal in world space
        let normal = model_matrix.transform_vector(&triangle.calculate_normal());
        let light_dir = Vector3::new(0.3, 0.4, 1.0).normalize();
        let brightness = match normal.try_normalize(1e-6) {
            Some(normal) => normal.dot(&light_dir).abs().max(AMBIENT),
            None => AMBIENT,
        };

        // Map brightness to character
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.clamp(1, LUMINOSITY_RAMP.len() - 1);
        let cell = Cell {
            character: LUMINOSITY_RAMP[char_index],
            color: Some(surface_color(material, brightness)),
        };

        // Rasterize triangle using scanline algorithm
        self.rasterize_triangle(&screen_coords, cell);
    }

    fn render_edges(
        &mut self,
        triangle: &Triangle,
        material: &Material,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) {
        let color = Some(material.emissive.unwrap_or(material.color));
        for (start, end) in triangle.edges() {
            let (Some(a), Some(b)) = (
                self.project(&start, model_matrix, camera),
                self.project(&end, model_matrix, camera),
            ) else {
                continue;
            };
            self.draw_line(a, b, color);
        }
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], cell: Cell) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                        self.plot(x, y, depth, cell);
                    }
                }
            }
        }
    }

    /// Bresenham line with depth interpolated along its length
    fn draw_line(&mut self, from: (f32, f32, f32), to: (f32, f32, f32), color: Option<Rgb>) {
        let cell = Cell {
            character: edge_char(to.0 - from.0, to.1 - from.1),
            color,
        };
        let (mut x0, mut y0) = (from.0.floor() as i32, from.1.floor() as i32);
        let (x1, y1) = (to.0.floor() as i32, to.1.floor() as i32);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let steps = dx.max(-dy).max(1) as f32;
        let mut step = 0.0;

        loop {
            let depth = from.2 + (to.2 - from.2) * (step / steps);
            self.plot(x0, y0, depth, cell);

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
            step += 1.0;
        }
    }

    fn plot(&mut self, x: i32, y: i32, depth: f32, cell: Cell) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.cells[idx] = cell;
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                let color = cell.color.map(to_terminal_color).unwrap_or(Color::DarkGrey);
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(cell.character))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Lit surface color; emissive materials glow at full strength
fn surface_color(material: &Material, brightness: f32) -> Rgb {
    match material.emissive {
        Some(emissive) => emissive,
        None => material.color.scaled(0.4 + 0.6 * brightness),
    }
}

pub fn to_terminal_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

/// Pick a line glyph that follows the edge direction on screen
fn edge_char(dx: f32, dy: f32) -> char {
    if dx.abs() > dy.abs() * 2.0 {
        '-'
    } else if dy.abs() > dx.abs() * 2.0 {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use showcase_core::{Rgb, SceneHost, VisualMode};

    fn rendered(model: &SceneModel) -> AsciiRenderer {
        let mut renderer = AsciiRenderer::new(80, 40);
        let mut camera = Camera::showcase(80, 40);
        camera.aspect = 1.0;
        renderer.render_model(model, &Pose::default(), &camera);
        renderer
    }

    fn glyphs(renderer: &AsciiRenderer) -> Vec<char> {
        renderer.cells.iter().map(|c| c.character).collect()
    }

    #[test]
    fn test_solid_model_fills_cells() {
        let mut model = SceneModel::placeholder();
        model.for_each_material(&mut |m| m.apply(VisualMode::Normal, Rgb::GREEN));
        let renderer = rendered(&model);
        let filled = glyphs(&renderer).iter().filter(|c| **c != ' ').count();
        assert!(filled > 20);
        assert!(!glyphs(&renderer).iter().any(|c| matches!(c, '|' | '/' | '\\')));
    }

    #[test]
    fn test_wireframe_model_draws_edges_only() {
        let renderer = rendered(&SceneModel::placeholder());
        let chars = glyphs(&renderer);
        assert!(chars.iter().any(|c| matches!(c, '-' | '|' | '/' | '\\')));
        assert!(chars
            .iter()
            .all(|c| matches!(c, ' ' | '-' | '|' | '/' | '\\')));
        assert!(renderer
            .cells
            .iter()
            .filter(|c| c.character != ' ')
            .all(|c| c.color == Some(Rgb::ORANGE)));
    }

    #[test]
    fn test_wireframe_glow_uses_emissive() {
        let mut model = SceneModel::placeholder();
        model.for_each_material(&mut |m| m.apply(VisualMode::Wireframe, Rgb::GREEN));
        let renderer = rendered(&model);
        assert!(renderer
            .cells
            .iter()
            .any(|c| c.color == Some(Rgb::GREEN)));
    }

    #[test]
    fn test_clear_and_resize() {
        let mut renderer = rendered(&SceneModel::placeholder());
        renderer.clear();
        assert!(glyphs(&renderer).iter().all(|c| *c == ' '));
        renderer.resize(10, 5);
        assert_eq!((renderer.width(), renderer.height()), (10, 5));
        assert_eq!(renderer.char_at(9, 4), Some(' '));
        assert_eq!(renderer.char_at(10, 0), None);
    }

    #[test]
    fn test_draw_emits_every_row() {
        let renderer = AsciiRenderer::new(4, 3);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches("\r\n").count(), 2);
    }

    #[test]
    fn test_edge_glyphs() {
        assert_eq!(edge_char(10.0, 1.0), '-');
        assert_eq!(edge_char(0.0, 5.0), '|');
        assert_eq!(edge_char(3.0, 3.0), '\\');
        assert_eq!(edge_char(-3.0, 3.0), '/');
    }
}
