use std::path::Path;

use crate::paint::Color;

use super::AssetError;

/// Decoded texture summary.
///
/// Pixel data is not kept; the canvas shades bodies with the average color.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    name: String,
    width: u32,
    height: u32,
    mip_levels: u32,
    average: Color,
}

impl Texture {
    /// Decodes an image file and records its dimensions and average color.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|source| match source {
                image::ImageError::IoError(source) => AssetError::Io { path: path.to_path_buf(), source },
                source => AssetError::Image { path: path.to_path_buf(), source },
            })?
            .into_rgba8();

        let (width, height) = img.dimensions();
        let average = average_color(img.pixels().map(|p| p.0));

        log::debug!("texture {} loaded: {width}x{height}", path.display());

        Ok(Self {
            name: file_stem(path),
            width,
            height,
            mip_levels: 1,
            average,
        })
    }

    /// Stand-in for a texture that failed to load.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: 1,
            height: 1,
            mip_levels: 1,
            average: Color::MAGENTA,
        }
    }

    /// Loads `path`, falling back to [`Texture::placeholder`] with a warning.
    pub fn load_or_placeholder(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("{e}; using placeholder texture");
            Self::placeholder(file_stem(path))
        })
    }

    /// Computes the full mip chain length for the texture size.
    pub fn generate_mipmaps(&mut self) {
        self.mip_levels = mip_level_count(self.width, self.height);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn mip_levels(&self) -> u32 {
        self.mip_levels
    }

    pub fn average_color(&self) -> Color {
        self.average
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

fn average_color(pixels: impl Iterator<Item = [u8; 4]>) -> Color {
    let mut sum = [0u64; 4];
    let mut n = 0u64;
    for px in pixels {
        for (acc, c) in sum.iter_mut().zip(px) {
            *acc += c as u64;
        }
        n += 1;
    }
    if n == 0 {
        return Color::transparent();
    }
    let avg = sum.map(|s| (s / n) as u8);
    Color::from_srgb_u8(avg[0], avg[1], avg[2], avg[3])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mip_chain_covers_largest_side() {
        assert_eq!(mip_level_count(2048, 1024), 12);
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(300, 5), 9);
        assert_eq!(mip_level_count(0, 0), 1);
    }

    #[test]
    fn average_of_black_and_white_is_mid_gray() {
        let c = average_color([[0, 0, 0, 255], [254, 254, 254, 255]].into_iter());
        assert_eq!(c, Color::from_srgb_u8(127, 127, 127, 255));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Texture::load("definitely/not/here/2k_sun.png").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn missing_file_falls_back_to_placeholder() {
        let mut tex = Texture::load_or_placeholder("definitely/not/here/2k_sun.png");
        assert_eq!(tex.name(), "2k_sun");
        assert_eq!(tex.average_color(), Color::MAGENTA);
        tex.generate_mipmaps();
        assert_eq!(tex.mip_levels(), 1);
    }

    #[test]
    fn decodes_png_from_disk() {
        let dir = std::env::temp_dir().join(format!("orrery-tex-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("red.png");
        image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let mut tex = Texture::load(&path).unwrap();
        assert_eq!(tex.size(), (4, 2));
        assert_eq!(tex.average_color(), Color::from_srgb_u8(255, 0, 0, 255));
        tex.generate_mipmaps();
        assert_eq!(tex.mip_levels(), 3);

        std::fs::remove_dir_all(&dir).ok();
    }
}
