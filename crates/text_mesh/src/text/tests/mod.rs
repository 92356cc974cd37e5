//! End-to-end layout scenarios against scripted glyph providers

mod mock;
