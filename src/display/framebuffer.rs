/*
 *  display/framebuffer.rs
 *
 *  pihole-dashboard - Pi-hole stats on an e-ink panel
 *  (c) 2021-26 the pihole-dashboard authors
 *
 *  Runtime-sized monochrome canvas and panel-buffer packing
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::display::error::DisplayError;

/// A runtime-sized 1-bit canvas for embedded-graphics.
///
/// `BinaryColor::On` is ink (black), `Off` is paper (white). A fresh frame
/// is built for every render; frames are never reused across cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    buf: Vec<BinaryColor>,
    w: usize,
    h: usize,
}

impl Frame {
    /// New all-white canvas.
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![BinaryColor::Off; w * h], w, h }
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }

    pub fn as_slice(&self) -> &[BinaryColor] { &self.buf }

    /// Pixel at (x, y); None when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<BinaryColor> {
        self.idx(Point::new(x as i32, y as i32)).map(|i| self.buf[i])
    }

    /// Map (x,y) to linear index; returns None if out of bounds
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }

    /// Rotate the canvas 180° in place (for upside-down mounts).
    pub fn rotate180(&mut self) {
        self.buf.reverse();
    }

    /// Pack the canvas into the panel's native buffer: MSB-first, bit set =
    /// white, rows padded to a byte boundary.
    ///
    /// The canvas may match the panel natively (portrait) or with width and
    /// height swapped (landscape mount); in the latter case the pixels are
    /// remapped exactly the way the vendor buffer conversion does it, so a
    /// 250x122 canvas lands correctly on a 122x250 panel.
    pub fn pack_for_panel(&self, panel_w: u32, panel_h: u32) -> Result<Vec<u8>, DisplayError> {
        let (pw, ph) = (panel_w as usize, panel_h as usize);
        let row_bytes = (pw + 7) / 8;
        let mut out = vec![0xFFu8; row_bytes * ph];

        let mut set_black = |nx: usize, ny: usize| {
            out[nx / 8 + ny * row_bytes] &= !(0x80 >> (nx % 8));
        };

        if (self.w, self.h) == (pw, ph) {
            for y in 0..self.h {
                for x in 0..self.w {
                    if self.buf[y * self.w + x] == BinaryColor::On {
                        set_black(x, y);
                    }
                }
            }
        } else if (self.w, self.h) == (ph, pw) {
            // landscape canvas: native x comes from canvas y, native y runs
            // backwards along canvas x
            for y in 0..self.h {
                for x in 0..self.w {
                    if self.buf[y * self.w + x] == BinaryColor::On {
                        set_black(y, ph - x - 1);
                    }
                }
            }
        } else {
            return Err(DisplayError::OrientationMismatch {
                canvas_w: self.w as u32,
                canvas_h: self.h as u32,
                panel_w,
                panel_h,
            });
        }

        Ok(out)
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buf.fill(color);
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        // fast path for rectangular fills the primitives use
        let Size { width, height } = area.size;
        if width == 0 || height == 0 {
            return Ok(());
        }
        let (x0, y0) = (area.top_left.x.max(0) as usize, area.top_left.y.max(0) as usize);
        let w = width as usize;
        let h = height as usize;

        // areas that are negative-origin or spill past an edge take the
        // clipping per-pixel path
        if area.top_left.x < 0 || area.top_left.y < 0 || x0 + w > self.w || y0 + h > self.h {
            return self.draw_iter(
                area.points().zip(colors).map(|(p, c)| Pixel(p, c)),
            );
        }

        let mut it = colors.into_iter();
        for row in 0..h {
            let base = (y0 + row) * self.w + x0;
            for col in 0..w {
                if let Some(c) = it.next() {
                    let i = base + col;
                    if i < self.buf.len() {
                        self.buf[i] = c;
                    }
                } else {
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::PrimitiveStyle;

    #[test]
    fn fresh_frame_is_white() {
        let frame = Frame::new(16, 4);
        assert!(frame.as_slice().iter().all(|&p| p == BinaryColor::Off));
    }

    #[test]
    fn portrait_packing_is_msb_first_white_high() {
        let mut frame = Frame::new(8, 2);
        // blacken pixel (0,0) and (7,1)
        frame.draw_iter([
            Pixel(Point::new(0, 0), BinaryColor::On),
            Pixel(Point::new(7, 1), BinaryColor::On),
        ]).unwrap();

        let bytes = frame.pack_for_panel(8, 2).unwrap();
        assert_eq!(bytes.len(), 2);
        assert_eq!(bytes[0], 0b0111_1111); // MSB cleared
        assert_eq!(bytes[1], 0b1111_1110); // LSB cleared
    }

    #[test]
    fn rows_are_padded_to_bytes() {
        let frame = Frame::new(122, 250);
        let bytes = frame.pack_for_panel(122, 250).unwrap();
        assert_eq!(bytes.len(), 16 * 250);
        assert!(bytes.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn landscape_canvas_remaps_onto_portrait_panel() {
        // 4x2 canvas onto a 2x4 panel; blacken canvas (0,0)
        let mut frame = Frame::new(4, 2);
        frame.draw_iter([Pixel(Point::new(0, 0), BinaryColor::On)]).unwrap();

        let bytes = frame.pack_for_panel(2, 4).unwrap();
        // native coords: nx = y = 0, ny = panel_h - x - 1 = 3
        assert_eq!(bytes.len(), 4);
        assert_eq!(bytes[3], 0b0111_1111);
        assert_eq!(&bytes[0..3], &[0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn mismatched_orientation_is_rejected() {
        let frame = Frame::new(10, 10);
        assert!(matches!(
            frame.pack_for_panel(122, 250),
            Err(DisplayError::OrientationMismatch { .. })
        ));
    }

    #[test]
    fn rotate180_moves_corner_pixel() {
        let mut frame = Frame::new(4, 3);
        frame.draw_iter([Pixel(Point::new(0, 0), BinaryColor::On)]).unwrap();
        frame.rotate180();
        assert_eq!(frame.get(3, 2), Some(BinaryColor::On));
        assert_eq!(frame.get(0, 0), Some(BinaryColor::Off));
    }

    #[test]
    fn rectangle_fill_is_bounded() {
        let mut frame = Frame::new(20, 10);
        Rectangle::with_corners(Point::new(2, 2), Point::new(5, 4))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut frame)
            .unwrap();
        assert_eq!(frame.get(2, 2), Some(BinaryColor::On));
        assert_eq!(frame.get(5, 4), Some(BinaryColor::On));
        assert_eq!(frame.get(6, 4), Some(BinaryColor::Off));
        assert_eq!(frame.get(2, 5), Some(BinaryColor::Off));
    }
}
