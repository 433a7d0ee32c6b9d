use std::io;
use std::io::Write;
use std::fs::File;
use std::path::Path;

use image::{ ImageBuffer, ImageFormat, Rgba };

use crate::color::Color;
use crate::error::RenderError;

/// Maximum line length of a plain PPM file.
const PPM_COLUMNS: usize = 70;

/// A canvas for drawing pixels.
///
/// This structure stores the results of the ray tracer, one `Color` per
/// pixel in raster order (row by row, top to bottom). Once rendering
/// finishes, the `Canvas` can be saved as a PPM or PNG image.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored as a flattened vector.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a new, black canvas with specified width and height.
    ///
    /// Fails if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Result<Canvas, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyImage { width, height });
        }

        Ok(Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        })
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. Pixels are specified in row-column
    /// order, where `y` is the row of the pixel, and `x` is the column. Rows
    /// and columns are zero-indexed.
    ///
    /// # Examples
    ///
    /// Writing a pixel to the fourth column, second row on an 8-by-8 canvas:
    ///
    /// ```
    /// # use pov_tracer::color::Color;
    /// # use pov_tracer::canvas::Canvas;
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// let mut canvas = Canvas::new(8, 8).unwrap();
    /// canvas.write_pixel(4, 2, &purple);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), purple);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        // Silently ignore out-of-bounds pixels
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = *pixel;
    }

    /// Reads a color from a location on the `Canvas`.
    ///
    /// If the specified pixel location is out-of-bounds, `None` is returned
    /// by this function.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        // Return nothing if pixel is out-of-bounds
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// Mutable access to every pixel in raster order.
    ///
    /// Each element is a distinct cell, so the slice can be split up and
    /// handed out to different writers.
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Converts the canvas to 8-bit premultiplied RGBA, row by row.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter()
            .flat_map(|pixel| pixel.to_rgba8().to_vec())
            .collect()
    }

    /// Saves the canvas, picking the format from the file extension: `.ppm`
    /// gives a plain PPM, anything else a PNG.
    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        let is_ppm = path.extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("ppm"));

        if is_ppm {
            self.save_ppm(path)?;
        } else {
            self.save_png(path)?;
        }

        Ok(())
    }

    /// Saves a canvas to a PPM file.
    ///
    /// Lines in the PPM file are clamped to 70 columns. If some channel value
    /// exceeds the 70 column mark on a line, it is moved to the next line over.
    pub fn save_ppm(&self, path: &Path) -> io::Result<()> {
        let mut out = io::BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out)?;
        out.flush()
    }

    /// Writes the canvas as a plain (P3) PPM. Alpha is dropped; the color
    /// channels are already premultiplied.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        // Write PPM header, as well as metadata
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?; // Maximum color value

        for row in self.pixels.chunks(self.width) {
            let mut col = 0;
            for pixel in row.iter() {
                let [r, g, b, _] = pixel.to_rgba8();

                for channel in [r, g, b].iter() {
                    let value = channel.to_string();

                    // Wrap before the value would pass the 70 column marker
                    if col != 0 && col + 1 + value.len() > PPM_COLUMNS {
                        writeln!(out)?;
                        col = 0;
                    }

                    if col != 0 {
                        write!(out, " ")?;
                        col += 1;
                    }

                    write!(out, "{}", value)?;
                    col += value.len();
                }
            }

            writeln!(out)?;
        }

        Ok(())
    }

    /// Saves a canvas to an RGBA PNG file.
    pub fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        let png: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_fn(
            self.width as u32,
            self.height as u32,
            |x, y| Rgba(self.pixels[y as usize * self.width + x as usize].to_rgba8())
        );

        png.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

#[test]
fn new_canvas_is_black() {
    let c = Canvas::new(10, 20).unwrap();

    assert_eq!(c.width, 10);
    assert_eq!(c.height, 20);
    for y in 0..20 {
        for x in 0..10 {
            assert_eq!(c.read_pixel(x, y), Some(Color::black()));
        }
    }
}

#[test]
fn empty_canvas_is_an_error() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
}

#[test]
fn out_of_bounds_pixels() {
    let mut c = Canvas::new(2, 2).unwrap();
    c.write_pixel(2, 0, &Color::white());

    assert_eq!(c.read_pixel(2, 0), None);
    assert_eq!(c.read_pixel(0, 2), None);
}

#[test]
fn rgba8_is_premultiplied_and_clamped() {
    let mut c = Canvas::new(2, 1).unwrap();
    c.write_pixel(0, 0, &Color::rgba(1.0, 0.5, 2.0, 0.5));
    c.write_pixel(1, 0, &Color::rgb(-0.5, 0.0, 1.5));

    assert_eq!(c.to_rgba8(), vec![128, 64, 255, 128, 0, 0, 255, 255]);
}

#[test]
fn ppm_header_and_pixels() {
    let mut c = Canvas::new(5, 3).unwrap();
    c.write_pixel(0, 0, &Color::rgb(1.5, 0.0, 0.0));
    c.write_pixel(2, 1, &Color::rgb(0.0, 0.5, 0.0));
    c.write_pixel(4, 2, &Color::rgb(-0.5, 0.0, 1.0));

    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();
    let ppm = String::from_utf8(out).unwrap();

    let expected = "P3\n5 3\n255\n\
        255 0 0 0 0 0 0 0 0 0 0 0 0 0 0\n\
        0 0 0 0 0 0 0 128 0 0 0 0 0 0 0\n\
        0 0 0 0 0 0 0 0 0 0 0 0 0 0 255\n";
    assert_eq!(ppm, expected);
}

#[test]
fn ppm_lines_wrap_at_70_columns() {
    let mut c = Canvas::new(10, 2).unwrap();
    for y in 0..2 {
        for x in 0..10 {
            c.write_pixel(x, y, &Color::rgb(1.0, 0.8, 0.6));
        }
    }

    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();
    let ppm = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = ppm.lines().skip(3).collect();

    assert_eq!(lines, vec![
        "255 204 153 255 204 153 255 204 153 255 204 153 255 204 153 255 204",
        "153 255 204 153 255 204 153 255 204 153 255 204 153",
        "255 204 153 255 204 153 255 204 153 255 204 153 255 204 153 255 204",
        "153 255 204 153 255 204 153 255 204 153 255 204 153",
    ]);
    assert!(ppm.lines().all(|line| line.len() <= 70));
}
