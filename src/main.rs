use anyhow::{ensure, Context, Result};
use clap::Parser;

use doubleunet_seg_rs::{Config, ImageProcessor};

fn main() -> Result<()> {
    let config = Config::parse();

    ensure!(config.model_path.exists(), "Model path does not exist");
    ensure!(config.input.exists(), "Input path does not exist");

    println!(
        "モデル読み込み中: {} ({})",
        config.model_path.display(),
        config.model_name
    );
    let processor = ImageProcessor::with_onnx_model(config.clone())
        .context("Failed to initialize the segmentation model")?;

    if config.is_folder_mode() {
        ensure!(
            config.input.is_dir(),
            "Folder mode requires a directory input"
        );
        processor.process_folder_batch()?;
    } else if config.input.is_dir() {
        processor.process_directory()?;
    } else {
        processor.process_file()?;
    }

    Ok(())
}
