//! Alpha-over blending of pixels and offset layers
//!
//! Straight (non-premultiplied) RGBA, Porter-Duff "over". Fully transparent
//! and fully opaque top pixels take exact fast paths so that opaque pattern
//! strokes keep their colour bit for bit.

use image::{Rgba, RgbaImage};

/// Region where an offset layer overlaps a target buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    /// First target column covered (inclusive)
    pub x_start: u32,
    /// Last target column covered (exclusive)
    pub x_end: u32,
    /// First target row covered (inclusive)
    pub y_start: u32,
    /// Last target row covered (exclusive)
    pub y_end: u32,
}

impl Overlap {
    /// Intersect a layer of size `layer` placed at `offset` with a target of size `target`
    ///
    /// Returns `None` when the layer lies entirely outside the target.
    pub fn of(target: (u32, u32), layer: (u32, u32), offset: [i64; 2]) -> Option<Self> {
        let [ox, oy] = offset;
        let x_start = ox.max(0);
        let y_start = oy.max(0);
        let x_end = (ox + i64::from(layer.0)).min(i64::from(target.0));
        let y_end = (oy + i64::from(layer.1)).min(i64::from(target.1));

        (x_start < x_end && y_start < y_end).then(|| Self {
            x_start: x_start as u32,
            x_end: x_end as u32,
            y_start: y_start as u32,
            y_end: y_end as u32,
        })
    }
}

/// Blend `top` over `base`
pub fn alpha_over(base: Rgba<u8>, top: Rgba<u8>) -> Rgba<u8> {
    let [tr, tg, tb, ta] = top.0;
    let [br, bg, bb, ba] = base.0;

    if ta == 0 {
        return base;
    }
    if ta == u8::MAX || ba == 0 {
        return top;
    }

    let top_a = f32::from(ta) / 255.0;
    let base_a = f32::from(ba) / 255.0;
    let out_a = top_a + base_a * (1.0 - top_a);

    let channel = |t: u8, b: u8| -> u8 {
        let value = (f32::from(t) * top_a + f32::from(b) * base_a * (1.0 - top_a)) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(tr, br),
        channel(tg, bg),
        channel(tb, bb),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Composite `layer`, positioned at `offset`, over `target` in place
///
/// Pixels of the layer outside the target are clipped.
pub fn composite_over(target: &mut RgbaImage, layer: &RgbaImage, offset: [i64; 2]) {
    let Some(overlap) = Overlap::of(target.dimensions(), layer.dimensions(), offset) else {
        return;
    };
    let [ox, oy] = offset;

    for y in overlap.y_start..overlap.y_end {
        let ly = (i64::from(y) - oy) as u32;
        for x in overlap.x_start..overlap.x_end {
            let lx = (i64::from(x) - ox) as u32;
            let Some(&top) = layer.get_pixel_checked(lx, ly) else {
                continue;
            };
            if let Some(base) = target.get_pixel_mut_checked(x, y) {
                *base = alpha_over(*base, top);
            }
        }
    }
}
