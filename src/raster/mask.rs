//! Bit-packed binary selection masks

use bitvec::vec::BitVec;
use image::{GrayImage, Luma};

/// Binary per-pixel selector, one bit per canvas pixel in row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandMask {
    width: u32,
    height: u32,
    bits: BitVec,
}

impl BandMask {
    /// Mask of the given size with every pixel deselected
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: BitVec::repeat(false, width as usize * height as usize),
        }
    }

    /// Build a mask by evaluating `select` at every pixel, row by row
    pub fn from_fn(width: u32, height: u32, mut select: impl FnMut(u32, u32) -> bool) -> Self {
        let mut bits = BitVec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(select(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Mask width in pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Mask height in pixels
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as (width, height)
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    const fn bit_index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Whether the pixel is selected; pixels outside the mask are not
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.bit_index(x, y)
            .and_then(|index| self.bits.get(index).map(|bit| *bit))
            .unwrap_or(false)
    }

    /// Select or deselect one pixel; out-of-range writes are ignored
    pub fn set(&mut self, x: u32, y: u32, selected: bool) {
        if let Some(index) = self.bit_index(x, y) {
            if let Some(mut bit) = self.bits.get_mut(index) {
                *bit = selected;
            }
        }
    }

    /// Number of selected pixels
    pub fn count_selected(&self) -> usize {
        self.bits.count_ones()
    }

    /// True when no pixel is selected
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Whether every pixel selected here is also selected in `other`
    ///
    /// Masks of different dimensions are never subsets of each other.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions()
            && self
                .bits
                .iter_ones()
                .all(|index| other.bits.get(index).is_some_and(|bit| *bit))
    }

    /// Render as an 8-bit channel: 255 for selected pixels, 0 otherwise
    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([if self.get(x, y) { u8::MAX } else { 0 }])
        })
    }
}
