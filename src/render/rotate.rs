use crate::foundation::core::{Affine, Bitmap, Point, Rect, Vec2};

/// Whether `degrees` triggers a rotation. Only values strictly inside `(0, 360)` do;
/// `0`, `360`, negative and larger values pass the bitmap through untouched.
pub fn rotation_applies(degrees: i32) -> bool {
    degrees > 0 && degrees < 360
}

/// Rotate `bitmap` counter-clockwise about its center by `degrees`.
///
/// The output grows to the rotated rectangle's bounding box; exposed corners are fully
/// transparent. Degrees outside `(0, 360)` return the input unchanged.
pub fn rotate(bitmap: Bitmap, degrees: i32) -> Bitmap {
    if !rotation_applies(degrees) || bitmap.width() == 0 || bitmap.height() == 0 {
        return bitmap;
    }

    // Quarter turns are exact pixel permutations. `image` rotates clockwise.
    match degrees {
        90 => return image::imageops::rotate270(&bitmap),
        180 => return image::imageops::rotate180(&bitmap),
        270 => return image::imageops::rotate90(&bitmap),
        _ => {}
    }

    let (w, h) = (f64::from(bitmap.width()), f64::from(bitmap.height()));
    // Image space is y-down, so a negative angle turns counter-clockwise on screen.
    let spin = Affine::rotate(-f64::from(degrees).to_radians());
    let bbox = spin.transform_rect_bbox(Rect::new(-w / 2.0, -h / 2.0, w / 2.0, h / 2.0));

    let out_w = snap_ceil(bbox.width());
    let out_h = snap_ceil(bbox.height());

    let forward = Affine::translate(Vec2::new(f64::from(out_w) / 2.0, f64::from(out_h) / 2.0))
        * spin
        * Affine::translate(Vec2::new(-w / 2.0, -h / 2.0));
    let inverse = forward.inverse();

    let mut out = Bitmap::new(out_w, out_h);
    for (x, y, px) in out.enumerate_pixels_mut() {
        let src = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        px.0 = sample_bilinear(&bitmap, src.x - 0.5, src.y - 0.5);
    }
    out
}

// Round up, ignoring float noise just above an integer.
fn snap_ceil(v: f64) -> u32 {
    ((v - 1e-6).ceil().max(1.0)) as u32
}

/// Bilinear sample in premultiplied space; samples outside the source are transparent.
fn sample_bilinear(src: &Bitmap, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (i64::from(src.width()), i64::from(src.height()));
    if x <= -1.0 || y <= -1.0 || x >= w as f64 || y >= h as f64 {
        return [0, 0, 0, 0];
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let mut acc = [0.0f64; 4];
    for (dx, dy, weight) in [
        (0, 0, (1.0 - fx) * (1.0 - fy)),
        (1, 0, fx * (1.0 - fy)),
        (0, 1, (1.0 - fx) * fy),
        (1, 1, fx * fy),
    ] {
        let (sx, sy) = (x0 + dx, y0 + dy);
        if weight == 0.0 || sx < 0 || sy < 0 || sx >= w || sy >= h {
            continue;
        }
        let p = src.get_pixel(sx as u32, sy as u32).0;
        let a = f64::from(p[3]) / 255.0;
        acc[0] += f64::from(p[0]) * a * weight;
        acc[1] += f64::from(p[1]) * a * weight;
        acc[2] += f64::from(p[2]) * a * weight;
        acc[3] += f64::from(p[3]) * weight;
    }

    let alpha = acc[3];
    if alpha <= 0.0 {
        return [0, 0, 0, 0];
    }
    let unpremul = |c: f64| (c * 255.0 / alpha).round().clamp(0.0, 255.0) as u8;
    [
        unpremul(acc[0]),
        unpremul(acc[1]),
        unpremul(acc[2]),
        alpha.round().clamp(0.0, 255.0) as u8,
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/render/rotate.rs"]
mod tests;
