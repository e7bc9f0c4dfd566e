// In: src/render.rs

//! Turns decoded tensors into normalized 8-bit image planes.
//!
//! This is the visualization sink reworked as a pure function: a decoded
//! archive in, pixel buffers out, with the tensor names supplied by the
//! caller instead of read from module-level globals. No plotting backend is
//! involved; callers hand the planes to whatever image writer or UI they
//! have.
//!
//! Normalization matches the original preview tooling: min-max scale to
//! [0, 1] and quantize to 0..=255. The RGB path normalizes the first three
//! channels jointly; grayscale paths normalize per plane.

use ndarray::{s, ArrayD, Axis, Ix2, Ix3, IxDyn};
use num_traits::ToPrimitive;

use crate::archive::Archive;
use crate::error::TenarcError;
use crate::tensor::Tensor;
use crate::types::ElementType;

/// A single-channel 8-bit plane, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayPlane {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// An interleaved RGB 8-bit plane, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbPlane {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Names of the three tensors the conventional preview draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSelection<'a> {
    /// H×W×C image tensor, C >= 3; first three channels become RGB.
    pub image: &'a str,
    /// H×W classification-map tensor.
    pub class_map: &'a str,
    /// H×W×C low-resolution tensor; leading channels are rendered as grayscale.
    pub low_res: &'a str,
}

/// The rendered preview: RGB composite, classification map, and up to two
/// grayscale channels of the low-resolution tensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub image_rgb: RgbPlane,
    pub class_map: GrayPlane,
    pub low_res_channels: Vec<GrayPlane>,
}

/// Renders an RGB composite from the first three channels of an H×W×C
/// tensor, normalizing the three channels jointly.
pub fn render_rgb(tensor: &Tensor) -> Result<RgbPlane, TenarcError> {
    let arr = to_f64_array(tensor)?
        .into_dimensionality::<Ix3>()
        .map_err(|_| rank_error(tensor, "H x W x C"))?;
    let (h, w, c) = arr.dim();
    if c < 3 {
        return Err(TenarcError::UnsupportedShape(format!(
            "RGB rendering needs at least 3 channels, tensor has {}",
            c
        )));
    }

    let values: Vec<f64> = arr.slice(s![.., .., ..3]).iter().copied().collect();
    Ok(RgbPlane {
        width: w as u32,
        height: h as u32,
        pixels: normalize_to_u8(&values),
    })
}

/// Renders one channel of an H×W×C tensor as a normalized grayscale plane.
pub fn render_channel(tensor: &Tensor, channel: usize) -> Result<GrayPlane, TenarcError> {
    let arr = to_f64_array(tensor)?
        .into_dimensionality::<Ix3>()
        .map_err(|_| rank_error(tensor, "H x W x C"))?;
    let (h, w, c) = arr.dim();
    if channel >= c {
        return Err(TenarcError::UnsupportedShape(format!(
            "channel {} out of range for a {}-channel tensor",
            channel, c
        )));
    }

    let values: Vec<f64> = arr.index_axis(Axis(2), channel).iter().copied().collect();
    Ok(GrayPlane {
        width: w as u32,
        height: h as u32,
        pixels: normalize_to_u8(&values),
    })
}

/// Renders an H×W classification map as a normalized grayscale plane.
pub fn render_class_map(tensor: &Tensor) -> Result<GrayPlane, TenarcError> {
    let arr = to_f64_array(tensor)?
        .into_dimensionality::<Ix2>()
        .map_err(|_| rank_error(tensor, "H x W"))?;
    let (h, w) = arr.dim();

    let values: Vec<f64> = arr.iter().copied().collect();
    Ok(GrayPlane {
        width: w as u32,
        height: h as u32,
        pixels: normalize_to_u8(&values),
    })
}

/// Renders the conventional three-tensor preview from a decoded archive.
///
/// Fails with `MissingEntry` if a selected name is absent and with
/// `UnsupportedShape` if a tensor does not fit its conventional layout.
pub fn render_preview(
    archive: &Archive,
    selection: &PreviewSelection<'_>,
) -> Result<Preview, TenarcError> {
    let image_rgb = render_rgb(lookup(archive, selection.image)?)?;
    let class_map = render_class_map(lookup(archive, selection.class_map)?)?;

    let low_res = lookup(archive, selection.low_res)?;
    let channels = match low_res.shape() {
        [_, _, c] => *c as usize,
        _ => return Err(rank_error(low_res, "H x W x C")),
    };
    let mut low_res_channels = Vec::new();
    for ch in 0..channels.min(2) {
        low_res_channels.push(render_channel(low_res, ch)?);
    }

    Ok(Preview {
        image_rgb,
        class_map,
        low_res_channels,
    })
}

//==================================================================================
// Private Helpers
//==================================================================================

fn lookup<'a>(archive: &'a Archive, name: &str) -> Result<&'a Tensor, TenarcError> {
    archive
        .get(name)
        .ok_or_else(|| TenarcError::MissingEntry(name.to_string()))
}

fn rank_error(tensor: &Tensor, wanted: &str) -> TenarcError {
    TenarcError::UnsupportedShape(format!(
        "expected a {} tensor, got shape {:?}",
        wanted,
        tensor.shape()
    ))
}

/// Widens any supported element type to f64 for normalization.
fn to_f64_array(tensor: &Tensor) -> Result<ArrayD<f64>, TenarcError> {
    let values = match tensor.dtype() {
        ElementType::Float32 => widen(&tensor.to_vec::<f32>()?),
        ElementType::Float64 => tensor.to_vec::<f64>()?,
        ElementType::Int32 => widen(&tensor.to_vec::<i32>()?),
        ElementType::UInt8 => widen(&tensor.to_vec::<u8>()?),
    };
    let dims: Vec<usize> = tensor.shape().iter().map(|&d| d as usize).collect();
    ArrayD::from_shape_vec(IxDyn(&dims), values)
        .map_err(|e| TenarcError::UnsupportedShape(e.to_string()))
}

fn widen<T: ToPrimitive>(values: &[T]) -> Vec<f64> {
    values
        .iter()
        .map(|v| v.to_f64().unwrap_or(f64::NAN))
        .collect()
}

/// Min-max normalization to 0..=255. Non-finite values map to 0; a constant
/// (or all non-finite) plane normalizes to all zeros.
fn normalize_to_u8(values: &[f64]) -> Vec<u8> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        if v.is_finite() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if !lo.is_finite() || !hi.is_finite() || hi <= lo {
        return vec![0; values.len()];
    }

    let span = hi - lo;
    values
        .iter()
        .map(|&v| {
            if v.is_finite() {
                (((v - lo) / span) * 255.0).round() as u8
            } else {
                0
            }
        })
        .collect()
}
