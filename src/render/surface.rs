use crate::foundation::core::{Affine, Canvas};
use crate::foundation::error::{MoonriseError, MoonriseResult};
use crate::foundation::math::{fnv1a64, mul_div255_u16};
use crate::render::paint::{LOGICAL_HEIGHT, LOGICAL_WIDTH, Painter};

/// A rendered frame as RGBA8 pixels.
///
/// Frames leave the surface as **premultiplied alpha**; the flag makes that explicit at API
/// boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Stable 64-bit digest of the pixel bytes.
    pub fn fingerprint(&self) -> u64 {
        fnv1a64(&self.data)
    }

    /// Encode the frame as a PNG (straight alpha).
    pub fn to_png(&self) -> MoonriseResult<Vec<u8>> {
        use anyhow::Context as _;

        let mut straight = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut straight);
        }
        let img = image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| MoonriseError::validation("frame.data size mismatch with width*height*4"))?;
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)
            .context("failed to encode frame as png")?;
        Ok(out.into_inner())
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Flatten premultiplied RGBA8 over an opaque straight-alpha background.
pub(crate) fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> MoonriseResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(MoonriseError::validation(
            "flatten_premul_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = u16::from(bg_rgba[0]);
    let bg_g = u16::from(bg_rgba[1]);
    let bg_b = u16::from(bg_rgba[2]);

    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        d[0] = (u16::from(s[0]) + mul_div255_u16(bg_r, inv)).min(255) as u8;
        d[1] = (u16::from(s[1]) + mul_div255_u16(bg_g, inv)).min(255) as u8;
        d[2] = (u16::from(s[2]) + mul_div255_u16(bg_b, inv)).min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

/// Fixed-resolution raster target shared by the render passes.
///
/// Every frame is painted from scratch through [`DrawingSurface::paint_frame`]; the capture
/// pipeline only reads the result through [`DrawingSurface::snapshot`].
pub struct DrawingSurface {
    canvas: Canvas,
    base: Affine,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    frames_painted: u64,
}

impl std::fmt::Debug for DrawingSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingSurface")
            .field("canvas", &self.canvas)
            .field("frames_painted", &self.frames_painted)
            .finish_non_exhaustive()
    }
}

impl DrawingSurface {
    /// Allocate a surface; both dimensions must be non-zero and fit in `u16`.
    pub fn new(canvas: Canvas) -> MoonriseResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(MoonriseError::validation(
                "surface width/height must be non-zero",
            ));
        }
        let w: u16 = canvas
            .width
            .try_into()
            .map_err(|_| MoonriseError::validation("surface width exceeds u16"))?;
        let h: u16 = canvas
            .height
            .try_into()
            .map_err(|_| MoonriseError::validation("surface height exceeds u16"))?;

        let base = Affine::scale_non_uniform(
            f64::from(canvas.width) / LOGICAL_WIDTH,
            f64::from(canvas.height) / LOGICAL_HEIGHT,
        );
        Ok(Self {
            canvas,
            base,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            frames_painted: 0,
        })
    }

    /// Surface dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Number of frames painted since allocation.
    pub fn frames_painted(&self) -> u64 {
        self.frames_painted
    }

    /// Paint one full frame and rasterize it into the backing pixmap.
    pub fn paint_frame(&mut self, f: impl FnOnce(&mut Painter<'_>)) {
        self.ctx.reset();
        {
            let mut painter = Painter::new(&mut self.ctx, self.base);
            f(&mut painter);
        }
        self.ctx.flush();
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.frames_painted += 1;
    }

    /// Premultiplied RGBA8 bytes of the last painted frame.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Premultiplied RGBA8 value at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        let i = ((y as usize) * (self.canvas.width as usize) + (x as usize)) * 4;
        let d = self.data();
        Some([d[i], d[i + 1], d[i + 2], d[i + 3]])
    }

    /// Copy the current pixels out as a frame.
    pub fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.data().to_vec(),
            premultiplied: true,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
