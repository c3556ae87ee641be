use std::path::Path;

use ndarray::Array3;
use walkdir::WalkDir;

use crate::errors::{DoubleUnetError, Result};
use crate::tensor::to_hwc_tensor;

/// フォルダ直下の画像を読み込み、HWC 配列の列として返す
///
/// 順序はパスの辞書順で安定。リサイズは行わず、形状の互換性は呼び出し側の
/// 責務とする。画像が1枚も見つからない場合はエラー（空バッチの黙認はしない）。
pub fn load_images_from_folder(folder: &Path) -> Result<Vec<Array3<f32>>> {
    if !folder.is_dir() {
        return Err(DoubleUnetError::FileSystem {
            path: folder.to_path_buf(),
            operation: "フォルダ存在確認".to_string(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "入力フォルダが存在しません",
            ),
        });
    }

    let mut paths: Vec<_> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| image::ImageFormat::from_path(e.path()).is_ok())
        .map(|e| e.into_path())
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(DoubleUnetError::Validation {
            field: "folder".to_string(),
            reason: format!("画像ファイルが見つかりません: {}", folder.display()),
        });
    }

    let mut images = Vec::with_capacity(paths.len());
    for path in &paths {
        let img = image::open(path).map_err(|e| DoubleUnetError::ImageProcessing {
            path: path.display().to_string(),
            operation: "画像読み込み".to_string(),
            source: Box::new(e),
        })?;
        images.push(to_hwc_tensor(&img.to_rgb8()));
    }

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    #[test]
    fn test_missing_folder_is_filesystem_error() {
        let err = load_images_from_folder(Path::new("/no/such/folder")).unwrap_err();
        assert!(matches!(err, DoubleUnetError::FileSystem { .. }));
    }

    #[test]
    fn test_empty_folder_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_images_from_folder(temp_dir.path()).unwrap_err();
        assert!(matches!(err, DoubleUnetError::Validation { .. }));
    }

    #[test]
    fn test_non_image_files_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), b"not an image").unwrap();
        RgbImage::from_pixel(8, 8, Rgb([1, 2, 3]))
            .save(temp_dir.path().join("a.png"))
            .unwrap();

        let images = load_images_from_folder(temp_dir.path()).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].shape(), &[8, 8, 3]);
    }

    #[test]
    fn test_order_is_lexicographic() {
        let temp_dir = TempDir::new().unwrap();
        RgbImage::from_pixel(2, 2, Rgb([20, 20, 20]))
            .save(temp_dir.path().join("b.png"))
            .unwrap();
        RgbImage::from_pixel(2, 2, Rgb([10, 10, 10]))
            .save(temp_dir.path().join("a.png"))
            .unwrap();

        let images = load_images_from_folder(temp_dir.path()).unwrap();
        assert_eq!(images[0][[0, 0, 0]], 10.0);
        assert_eq!(images[1][[0, 0, 0]], 20.0);
    }
}
