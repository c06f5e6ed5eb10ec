use eframe::egui;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use log::debug;
use std::path::Path;

const PLACEHOLDER_ASSET: &str = "assets/placeholder.png";

/// Decodes the image behind an icon reference, scaled to `side` x `side`.
pub fn load_icon_image(path: &Path, side: usize) -> Option<egui::ColorImage> {
    let image = decode_image_file(path).or_else(|| shell_icon(path))?;
    Some(to_color_image(&resize_to_square(image, side as u32)))
}

fn decode_image_file(path: &Path) -> Option<RgbaImage> {
    let decoded = match image::open(path) {
        Ok(decoded) => decoded,
        Err(err) => {
            debug!("cannot decode {}: {err}", path.display());
            return None;
        }
    };
    Some(decoded.to_rgba8())
}

fn to_color_image(rgba: &RgbaImage) -> egui::ColorImage {
    let size = [rgba.width() as usize, rgba.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw())
}

#[cfg(not(windows))]
fn shell_icon(_path: &Path) -> Option<RgbaImage> {
    None
}

/// Large shell icon of an executable, shortcut or any other file.
#[cfg(windows)]
fn shell_icon(path: &Path) -> Option<RgbaImage> {
    use std::os::windows::ffi::OsStrExt;
    use windows::Win32::Graphics::Gdi::{
        CreateCompatibleDC, DeleteDC, DeleteObject, GetDIBits, GetObjectW, BITMAP, BITMAPINFO,
        BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, HGDIOBJ,
    };
    use windows::Win32::Storage::FileSystem::FILE_FLAGS_AND_ATTRIBUTES;
    use windows::Win32::UI::Shell::{SHGetFileInfoW, SHFILEINFOW, SHGFI_ICON, SHGFI_LARGEICON};
    use windows::Win32::UI::WindowsAndMessaging::{DestroyIcon, GetIconInfo, ICONINFO};

    if !path.exists() {
        return None;
    }

    unsafe {
        let mut file_info = SHFILEINFOW::default();
        let path_wide: Vec<u16> = path
            .as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();

        let found = SHGetFileInfoW(
            windows::core::PCWSTR(path_wide.as_ptr()),
            FILE_FLAGS_AND_ATTRIBUTES(0),
            Some(&mut file_info),
            std::mem::size_of::<SHFILEINFOW>() as u32,
            SHGFI_ICON | SHGFI_LARGEICON,
        );
        let hicon = file_info.hIcon;
        if found == 0 || hicon.is_invalid() {
            return None;
        }

        let mut icon_info = ICONINFO::default();
        if GetIconInfo(hicon, &mut icon_info).is_err() {
            let _ = DestroyIcon(hicon);
            return None;
        }

        let release = |icon_info: &ICONINFO| {
            let _ = DeleteObject(icon_info.hbmColor);
            let _ = DeleteObject(icon_info.hbmMask);
            let _ = DestroyIcon(hicon);
        };

        let mut bitmap: BITMAP = std::mem::zeroed();
        if GetObjectW(
            HGDIOBJ(icon_info.hbmColor.0),
            std::mem::size_of::<BITMAP>() as i32,
            Some(&mut bitmap as *mut _ as *mut _),
        ) == 0
        {
            release(&icon_info);
            return None;
        }

        let width = bitmap.bmWidth as usize;
        let height = bitmap.bmHeight as usize;
        let mut bmi = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width as i32,
                biHeight: -(height as i32),
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        };

        let mut pixels = vec![0u8; width * height * 4];
        let hdc = CreateCompatibleDC(None);
        let copied = GetDIBits(
            hdc,
            icon_info.hbmColor,
            0,
            height as u32,
            Some(pixels.as_mut_ptr() as *mut _),
            &mut bmi,
            DIB_RGB_COLORS,
        );
        let _ = DeleteDC(hdc);
        release(&icon_info);

        if copied == 0 {
            return None;
        }

        // BGRA -> RGBA
        for chunk in pixels.chunks_exact_mut(4) {
            chunk.swap(0, 2);
        }
        RgbaImage::from_raw(width as u32, height as u32, pixels)
    }
}

/// Scales to a `side` x `side` square.
pub fn resize_to_square(image: RgbaImage, side: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    if (width == side && height == side) || width == 0 || height == 0 {
        return image;
    }
    imageops::resize(&image, side, side, FilterType::Lanczos3)
}

/// Icon shown for entries whose image could not be resolved: the bundled
/// asset when present, otherwise a generated rounded tile.
pub fn placeholder_image(side: usize) -> egui::ColorImage {
    let asset = crate::config::resolve_install_relative(PLACEHOLDER_ASSET);
    load_icon_image(&asset, side)
        .unwrap_or_else(|| generate_placeholder(side, [93, 214, 189, 200]))
}

fn generate_placeholder(side: usize, color: [u8; 4]) -> egui::ColorImage {
    let radius = side as f32 * 0.22;
    let mut rgba = Vec::with_capacity(side * side * 4);
    for y in 0..side {
        for x in 0..side {
            let inside = corner_distance(x, side, radius)
                .hypot(corner_distance(y, side, radius))
                <= radius;
            if inside {
                rgba.extend_from_slice(&color);
            } else {
                rgba.extend_from_slice(&[0, 0, 0, 0]);
            }
        }
    }
    egui::ColorImage::from_rgba_unmultiplied([side, side], &rgba)
}

// Distance of a pixel centre from the rounded-corner arc centre along one
// axis; zero in the straight middle section.
fn corner_distance(coord: usize, side: usize, radius: f32) -> f32 {
    let c = coord as f32 + 0.5;
    let far = side as f32 - radius;
    if c < radius {
        radius - c
    } else if c > far {
        c - far
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_keeps_requested_side() {
        let img = RgbaImage::from_pixel(10, 4, image::Rgba([200, 200, 200, 200]));
        let out = resize_to_square(img, 32);
        assert_eq!(out.dimensions(), (32, 32));
        assert_eq!(to_color_image(&out).size, [32, 32]);
    }

    #[test]
    fn square_of_the_right_side_is_untouched() {
        let img = RgbaImage::from_pixel(16, 16, image::Rgba([1, 2, 3, 4]));
        let out = resize_to_square(img.clone(), 16);
        assert_eq!(out, img);
    }

    #[test]
    fn generated_placeholder_has_transparent_corners() {
        let img = generate_placeholder(48, [1, 2, 3, 255]);
        assert_eq!(img.size, [48, 48]);
        assert_eq!(img.pixels[0].a(), 0);
        assert_eq!(
            img.pixels[24 * 48 + 24],
            egui::Color32::from_rgba_unmultiplied(1, 2, 3, 255)
        );
    }

    #[test]
    fn png_on_disk_decodes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.png");
        image::RgbaImage::from_pixel(8, 8, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let img = load_icon_image(&path, 16).expect("png should decode");
        assert_eq!(img.size, [16, 16]);
    }

    #[test]
    fn missing_file_does_not_resolve() {
        assert!(load_icon_image(Path::new("/no/such/icon.png"), 16).is_none());
    }
}
