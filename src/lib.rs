pub mod config;
pub mod errors;
pub mod inference;
pub mod loader;
pub mod model;
pub mod tensor;
pub mod traits;

pub mod mocks;

use image::{imageops, imageops::FilterType, DynamicImage, GrayImage, ImageFormat};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub use config::Config;
pub use errors::{DoubleUnetError, Result};
pub use inference::{generate_segmentation, SegmentationSource, CHANNELS, IMAGE_SIZE};
pub use loader::load_images_from_folder;
pub use model::Model;
pub use traits::*;

pub struct ImageProcessor<M: SegmentationModel> {
    model: M,
    config: Config,
}

impl<M: SegmentationModel> ImageProcessor<M> {
    pub const fn new(model: M, config: Config) -> Self {
        Self { model, config }
    }

    /// ディレクトリ内の画像を並列に推論してマスクを保存する
    pub fn process_directory(&self) -> Result<()> {
        let input_path = &self.config.input;
        let output_path = &self.config.output_dir;

        if !input_path.exists() {
            return Err(DoubleUnetError::FileSystem {
                path: input_path.clone(),
                operation: "ディレクトリ存在確認".to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "入力ディレクトリが存在しません",
                ),
            });
        }

        fs::create_dir_all(output_path).map_err(|e| DoubleUnetError::FileSystem {
            path: output_path.clone(),
            operation: "ディレクトリ作成".to_string(),
            source: e,
        })?;

        let image_files = self.collect_image_files(input_path)?;

        if image_files.is_empty() {
            println!("処理対象の画像ファイルが見つかりません");
            return Ok(());
        }

        let pb = ProgressBar::new(image_files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .unwrap()
                .progress_chars("#>-"),
        );

        image_files
            .par_iter()
            .try_for_each(|input_file| -> Result<()> {
                self.process_single_image(input_file, output_path)?;
                pb.inc(1);
                Ok(())
            })?;

        pb.finish_with_message("処理完了");
        println!("全ての画像処理が完了しました");
        Ok(())
    }

    /// 単一の画像ファイルを推論してマスクを保存する
    pub fn process_file(&self) -> Result<()> {
        let input_path = &self.config.input;
        let output_path = &self.config.output_dir;

        fs::create_dir_all(output_path).map_err(|e| DoubleUnetError::FileSystem {
            path: output_path.clone(),
            operation: "ディレクトリ作成".to_string(),
            source: e,
        })?;

        let img = image::open(input_path).map_err(|e| DoubleUnetError::ImageProcessing {
            path: input_path.display().to_string(),
            operation: "画像読み込み".to_string(),
            source: Box::new(e),
        })?;

        let mask = self.generate_mask(&img)?;

        let stem = input_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("segmentation");
        let output_file = output_path
            .join(stem)
            .with_extension(&self.config.format);
        self.save_mask(&mask, &output_file)
    }

    /// フォルダ一括モード: フォルダ全体を1つのバッチとして推論する
    ///
    /// 読み込んだ画像群はそのまま `[1, 128, 128, 3]` へ reshape されるため、
    /// 1枚でないフォルダは形状エラーになる
    pub fn process_folder_batch(&self) -> Result<()> {
        let output_path = &self.config.output_dir;

        fs::create_dir_all(output_path).map_err(|e| DoubleUnetError::FileSystem {
            path: output_path.clone(),
            operation: "ディレクトリ作成".to_string(),
            source: e,
        })?;

        let source = SegmentationSource::Folder(self.config.input.clone());
        let segmentation = generate_segmentation(&self.model, &source, &self.config.model_name)?;
        let mask = tensor::class_mask_image(segmentation.view());

        let output_file = output_path
            .join("segmentation")
            .with_extension(&self.config.format);
        self.save_mask(&mask, &output_file)?;
        println!("セグメンテーションを保存しました: {}", output_file.display());
        Ok(())
    }

    fn collect_image_files(&self, input_path: &Path) -> Result<Vec<PathBuf>> {
        let mut image_files = Vec::new();

        for entry in WalkDir::new(input_path).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_file() && self.is_supported_image_format(path) {
                image_files.push(path.to_path_buf());
            }
        }

        Ok(image_files)
    }

    pub fn is_supported_image_format(&self, path: &Path) -> bool {
        if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
            matches!(
                extension.to_lowercase().as_str(),
                "jpg" | "jpeg" | "png" | "webp" | "bmp" | "gif" | "tiff" | "avif"
            )
        } else {
            false
        }
    }

    fn process_single_image(&self, input_file: &Path, output_dir: &Path) -> Result<()> {
        let img = image::open(input_file).map_err(|e| DoubleUnetError::ImageProcessing {
            path: input_file.display().to_string(),
            operation: "画像読み込み".to_string(),
            source: Box::new(e),
        })?;

        let mask = self
            .generate_mask(&img)
            .map_err(|e| DoubleUnetError::ImageProcessing {
                path: input_file.display().to_string(),
                operation: "画像セグメンテーション".to_string(),
                source: Box::new(e),
            })?;

        let relative_path = self.get_relative_path(input_file)?;
        let output_file = output_dir
            .join(relative_path)
            .with_extension(&self.config.format);

        if let Some(parent) = output_file.parent() {
            fs::create_dir_all(parent).map_err(|e| DoubleUnetError::FileSystem {
                path: parent.to_path_buf(),
                operation: "出力ディレクトリ作成".to_string(),
                source: e,
            })?;
        }

        self.save_mask(&mask, &output_file)
    }

    /// 1枚の画像をモデル入力サイズへ整形して推論し、マスク画像を得る
    fn generate_mask(&self, img: &DynamicImage) -> Result<GrayImage> {
        let size = self.model.get_image_size();
        let resized = imageops::resize(&img.to_rgb8(), size, size, FilterType::Lanczos3);
        let pixels = tensor::to_hwc_tensor(&resized).into_dyn();

        let segmentation = generate_segmentation(
            &self.model,
            &SegmentationSource::Image(pixels),
            &self.config.model_name,
        )?;
        Ok(tensor::class_mask_image(segmentation.view()))
    }

    fn save_mask(&self, mask: &GrayImage, output_file: &Path) -> Result<()> {
        let output_format = match self.config.format.as_str() {
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "png" => ImageFormat::Png,
            "webp" => ImageFormat::WebP,
            "bmp" => ImageFormat::Bmp,
            "gif" => ImageFormat::Gif,
            "tiff" => ImageFormat::Tiff,
            _ => ImageFormat::Png,
        };

        mask.save_with_format(output_file, output_format)
            .map_err(|e| DoubleUnetError::ImageProcessing {
                path: output_file.display().to_string(),
                operation: "画像保存".to_string(),
                source: Box::new(e),
            })
    }

    pub fn get_relative_path(&self, input_file: &Path) -> Result<PathBuf> {
        let input_dir = &self.config.input;
        input_file
            .strip_prefix(input_dir)
            .map(|p| p.to_path_buf())
            .map_err(|_| DoubleUnetError::FileSystem {
                path: input_file.to_path_buf(),
                operation: "相対パス取得".to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "入力ファイルが入力ディレクトリ内にありません",
                ),
            })
    }
}

impl ImageProcessor<Model> {
    pub fn with_onnx_model(config: Config) -> Result<Self> {
        let model = Model::new(&config.model_path, config.device_id)?;
        Ok(Self::new(model, config))
    }
}
