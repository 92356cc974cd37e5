//! Shelf packing for glyph atlas pages
//!
//! Glyphs are placed left to right on horizontal shelves. A glyph reuses the
//! first shelf that is tall enough without wasting more than 30% of its
//! height; otherwise a new shelf opens below the last one. Growing the page
//! never moves glyphs that are already placed.

use super::AtlasRect;

#[derive(Debug, Clone, Copy)]
struct Shelf {
    top: u32,
    height: u32,
    next_left: u32,
}

/// Shelf allocator for one atlas page
#[derive(Debug, Clone)]
pub struct ShelfPacker {
    width: u32,
    height: u32,
    gutter: u32,
    shelves: Vec<Shelf>,
    next_shelf_top: u32,
}

impl ShelfPacker {
    /// Smallest fraction of a shelf's height a glyph may occupy
    const MIN_SHELF_FILL: f32 = 0.7;

    /// Create a packer for a `width` x `height` page, keeping `gutter` empty
    /// pixels between neighbouring glyphs
    pub fn new(width: u32, height: u32, gutter: u32) -> Self {
        Self {
            width,
            height,
            gutter,
            shelves: Vec::new(),
            next_shelf_top: gutter,
        }
    }

    /// Current page dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Reserve a `width` x `height` rectangle, `None` when the page is full
    pub fn allocate(&mut self, width: u32, height: u32) -> Option<AtlasRect> {
        let padded_width = width + self.gutter;
        let padded_height = height + self.gutter;

        let existing = self.shelves.iter_mut().find(|shelf| {
            shelf.height >= padded_height
                && padded_height as f32 >= shelf.height as f32 * Self::MIN_SHELF_FILL
                && shelf.next_left + padded_width <= self.width
        });

        let shelf = match existing {
            Some(shelf) => shelf,
            None => {
                if self.next_shelf_top + padded_height > self.height
                    || self.gutter + padded_width > self.width
                {
                    return None;
                }
                self.shelves.push(Shelf {
                    top: self.next_shelf_top,
                    height: padded_height,
                    next_left: self.gutter,
                });
                self.next_shelf_top += padded_height;
                self.shelves.last_mut()?
            }
        };

        let rect = AtlasRect::new(shelf.next_left, shelf.top, width, height);
        shelf.next_left += padded_width;
        Some(rect)
    }

    /// Enlarge the page; placed rectangles keep their coordinates
    pub fn grow(&mut self, width: u32, height: u32) {
        debug_assert!(width >= self.width && height >= self.height);
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyphs_share_a_shelf() {
        let mut packer = ShelfPacker::new(64, 64, 1);

        let a = packer.allocate(10, 12).unwrap();
        let b = packer.allocate(8, 11).unwrap();

        assert_eq!(a, AtlasRect::new(1, 1, 10, 12));
        assert_eq!(b, AtlasRect::new(12, 1, 8, 11));
    }

    #[test]
    fn test_short_glyph_opens_new_shelf() {
        let mut packer = ShelfPacker::new(64, 64, 1);

        let tall = packer.allocate(10, 20).unwrap();
        let dot = packer.allocate(3, 3).unwrap();

        assert_eq!(tall.top, 1);
        assert_eq!(dot.top, 22);
    }

    #[test]
    fn test_rectangles_never_overlap() {
        let mut packer = ShelfPacker::new(128, 128, 2);
        let mut rects = Vec::new();
        for i in 0..40 {
            if let Some(rect) = packer.allocate(5 + i % 7, 8 + i % 5) {
                rects.push(rect);
            }
        }

        for (i, a) in rects.iter().enumerate() {
            assert!(a.fits_within(128, 128));
            for b in &rects[i + 1..] {
                let disjoint = a.right() <= b.left
                    || b.right() <= a.left
                    || a.bottom() <= b.top
                    || b.bottom() <= a.top;
                assert!(disjoint, "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_full_page_then_grow() {
        let mut packer = ShelfPacker::new(16, 16, 1);

        assert!(packer.allocate(14, 14).is_some());
        assert!(packer.allocate(14, 14).is_none());

        packer.grow(32, 32);
        let beside = packer.allocate(14, 14).unwrap();
        let below = packer.allocate(14, 14).unwrap();
        assert_eq!(beside, AtlasRect::new(16, 1, 14, 14));
        assert_eq!(below.top, 16);
        assert_eq!(packer.dimensions(), (32, 32));
    }

    #[test]
    fn test_too_wide_glyph_is_rejected() {
        let mut packer = ShelfPacker::new(16, 16, 1);
        assert!(packer.allocate(20, 2).is_none());
    }
}
