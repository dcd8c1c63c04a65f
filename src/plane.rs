use crate::def::*;

/* Borrowed rectangular window over a strided sample or coefficient
 * buffer. The transform core never owns picture memory, callers hand in
 * views over their own planes. */

#[derive(Debug)]
pub struct PlaneView<'a, T> {
    data: &'a [T],
    pub width: usize,
    pub height: usize,
    pub stride: usize,
}

impl<'a, T: Copy> PlaneView<'a, T> {
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> Self {
        assert!(width > 0 && height > 0);
        assert!(stride >= width);
        assert!(data.len() >= stride * (height - 1) + width);
        PlaneView {
            data,
            width,
            height,
            stride,
        }
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> T {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.stride + x]
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        debug_assert!(y < self.height);
        &self.data[y * self.stride..y * self.stride + self.width]
    }
}

#[derive(Debug)]
pub struct PlaneViewMut<'a, T> {
    data: &'a mut [T],
    pub width: usize,
    pub height: usize,
    pub stride: usize,
}

impl<'a, T: Copy> PlaneViewMut<'a, T> {
    pub fn new(data: &'a mut [T], width: usize, height: usize, stride: usize) -> Self {
        assert!(width > 0 && height > 0);
        assert!(stride >= width);
        assert!(data.len() >= stride * (height - 1) + width);
        PlaneViewMut {
            data,
            width,
            height,
            stride,
        }
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> T {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.stride + x]
    }

    #[inline]
    pub fn at_mut(&mut self, x: usize, y: usize) -> &mut T {
        debug_assert!(x < self.width && y < self.height);
        &mut self.data[y * self.stride + x]
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        debug_assert!(y < self.height);
        &self.data[y * self.stride..y * self.stride + self.width]
    }

    #[inline]
    pub fn as_view(&self) -> PlaneView<'_, T> {
        PlaneView {
            data: self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
        }
    }
}

pub type PelView<'a> = PlaneView<'a, pel>;
pub type PelViewMut<'a> = PlaneViewMut<'a, pel>;
pub type CoeffView<'a> = PlaneView<'a, TCoeff>;
pub type CoeffViewMut<'a> = PlaneViewMut<'a, TCoeff>;
