use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};
use tempfile::TempDir;

use doubleunet_seg_rs::mocks::MockSegmentationModel;
use doubleunet_seg_rs::{Config, DoubleUnetError, ImageProcessor};

fn test_config(input: impl Into<std::path::PathBuf>, output: impl Into<std::path::PathBuf>) -> Config {
    Config {
        input: input.into(),
        output_dir: output.into(),
        model_path: "model.onnx".into(),
        format: "png".to_string(),
        device_id: 0,
        location: 0,
        model_name: "double_unet".to_string(),
    }
}

fn write_test_image(path: &Path, width: u32, height: u32) {
    RgbImage::from_pixel(width, height, Rgb([120, 60, 30]))
        .save(path)
        .unwrap();
}

#[test]
fn test_process_directory_writes_masks() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("input");
    let output_dir = temp_dir.path().join("output");
    let subdir = input_dir.join("nested");
    fs::create_dir_all(&subdir).unwrap();

    write_test_image(&input_dir.join("first.png"), 200, 150);
    write_test_image(&subdir.join("second.jpg"), 64, 64);
    fs::write(input_dir.join("notes.txt"), b"skip me").unwrap();

    let processor = ImageProcessor::new(
        MockSegmentationModel::new(128),
        test_config(&input_dir, &output_dir),
    );
    processor.process_directory().unwrap();

    // 相対パスを保ったままマスクが保存される
    assert!(output_dir.join("first.png").exists());
    assert!(output_dir.join("nested/second.png").exists());
    assert!(!output_dir.join("notes.png").exists());

    // マスクはモデル入力サイズのグレースケール画像
    let mask = image::open(output_dir.join("first.png")).unwrap();
    assert_eq!(mask.width(), 128);
    assert_eq!(mask.height(), 128);
}

#[test]
fn test_process_directory_missing_input() {
    let temp_dir = TempDir::new().unwrap();
    let processor = ImageProcessor::new(
        MockSegmentationModel::new(128),
        test_config(temp_dir.path().join("missing"), temp_dir.path().join("out")),
    );

    let err = processor.process_directory().unwrap_err();
    assert!(matches!(err, DoubleUnetError::FileSystem { .. }));
}

#[test]
fn test_process_directory_with_no_images_is_ok() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("input");
    fs::create_dir_all(&input_dir).unwrap();

    let processor = ImageProcessor::new(
        MockSegmentationModel::new(128),
        test_config(&input_dir, temp_dir.path().join("out")),
    );

    // 画像なしはエラーではなく何もしない
    processor.process_directory().unwrap();
}

#[test]
fn test_process_file_writes_single_mask() {
    let temp_dir = TempDir::new().unwrap();
    let input_file = temp_dir.path().join("photo.png");
    let output_dir = temp_dir.path().join("output");
    write_test_image(&input_file, 300, 200);

    let processor = ImageProcessor::new(
        MockSegmentationModel::new(128),
        test_config(&input_file, &output_dir),
    );
    processor.process_file().unwrap();

    assert!(output_dir.join("photo.png").exists());
}

#[test]
fn test_process_folder_batch_single_image() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("input");
    let output_dir = temp_dir.path().join("output");
    fs::create_dir_all(&input_dir).unwrap();

    // フォルダ一括モードはリサイズしないため、モデル入力サイズの画像を置く
    write_test_image(&input_dir.join("only.png"), 128, 128);

    let mut config = test_config(&input_dir, &output_dir);
    config.location = 1;
    let processor = ImageProcessor::new(MockSegmentationModel::new(128), config);

    processor.process_folder_batch().unwrap();
    assert!(output_dir.join("segmentation.png").exists());
}

#[test]
fn test_process_folder_batch_rejects_two_images() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("input");
    fs::create_dir_all(&input_dir).unwrap();
    write_test_image(&input_dir.join("a.png"), 128, 128);
    write_test_image(&input_dir.join("b.png"), 128, 128);

    let mut config = test_config(&input_dir, temp_dir.path().join("output"));
    config.location = 1;
    let processor = ImageProcessor::new(MockSegmentationModel::new(128), config);

    let err = processor.process_folder_batch().unwrap_err();
    assert!(matches!(err, DoubleUnetError::Model { .. }));
}
