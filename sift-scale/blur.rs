use rayon::prelude::*;
use sift_core::Image;

use crate::error::ScaleSpaceResult;

/// Kernel radius in standard deviations
const KERNEL_RADIUS_SIGMAS: f32 = 4.0;

/// Normalized 1-D Gaussian kernel of length `2 * radius + 1`
pub fn gaussian_kernel(sigma: f32, radius: usize) -> Vec<f32> {
    let denom = 2.0 * sigma * sigma;
    let r = radius as isize;
    let mut kernel: Vec<f32> = (-r..=r)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    if sum > 0.0 {
        for v in kernel.iter_mut() {
            *v /= sum;
        }
    } else {
        // sigma so small every off-center weight underflowed
        kernel.iter_mut().for_each(|v| *v = 0.0);
        kernel[radius] = 1.0;
    }
    kernel
}

/// Radius used for a blur of standard deviation `sigma`
pub fn kernel_radius(sigma: f32) -> usize {
    ((KERNEL_RADIUS_SIGMAS * sigma).ceil() as usize).max(1)
}

/// Separable Gaussian blur with replicated borders
pub fn gaussian_blur(img: &Image, sigma: f32) -> ScaleSpaceResult<Image> {
    let radius = kernel_radius(sigma);
    let kernel = gaussian_kernel(sigma, radius);
    let (w, h) = img.dimensions();

    let horizontal = horizontal_pass(img.as_slice(), w, h, &kernel);
    let vertical = vertical_pass(&horizontal, w, h, &kernel);
    Ok(Image::new(w, h, vertical)?)
}

fn horizontal_pass(src: &[f32], w: usize, h: usize, kernel: &[f32]) -> Vec<f32> {
    let half = (kernel.len() / 2) as isize;
    let mut out = vec![0f32; w * h];
    out.par_chunks_mut(w)
        .zip(src.par_chunks(w))
        .for_each(|(row_out, row_in)| {
            for (x, o) in row_out.iter_mut().enumerate() {
                let mut acc = 0f32;
                for (k, &kv) in kernel.iter().enumerate() {
                    let xx = (x as isize + k as isize - half).clamp(0, w as isize - 1) as usize;
                    acc += kv * row_in[xx];
                }
                *o = acc;
            }
        });
    out
}

fn vertical_pass(src: &[f32], w: usize, h: usize, kernel: &[f32]) -> Vec<f32> {
    let half = (kernel.len() / 2) as isize;
    let mut out = vec![0f32; w * h];
    out.par_chunks_mut(w).enumerate().for_each(|(y, row_out)| {
        for (k, &kv) in kernel.iter().enumerate() {
            let yy = (y as isize + k as isize - half).clamp(0, h as isize - 1) as usize;
            let row_in = &src[yy * w..(yy + 1) * w];
            for (o, &v) in row_out.iter_mut().zip(row_in) {
                *o += kv * v;
            }
        }
    });
    out
}
