use clap::Parser;
use image::ImageFormat;
use std::path::PathBuf;

#[derive(Parser, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// 入力となる画像ファイルまたはディレクトリ
    pub input: PathBuf,

    #[arg(default_value = "output")]
    pub output_dir: PathBuf,

    #[arg(short, long)]
    pub model_path: PathBuf,

    #[arg(short, long, default_value = "png", value_parser = check_format)]
    pub format: String,

    #[arg(short, long, default_value_t = 0)]
    pub device_id: i32,

    /// 入力モード: 0 = 画像を直接渡す、それ以外 = フォルダを1バッチとして読み込む
    #[arg(short, long, default_value_t = 0)]
    pub location: u8,

    /// 記録用のモデル名ラベル。推論結果には影響しない
    #[arg(long, default_value = "double_unet")]
    pub model_name: String,
}

impl Config {
    /// フォルダ一括モードかどうか
    pub const fn is_folder_mode(&self) -> bool {
        self.location != 0
    }
}

fn check_format(s: &str) -> Result<String, String> {
    let supported: Vec<_> = ImageFormat::all()
        .filter(|f| f.writing_enabled())
        .flat_map(|f| f.extensions_str())
        .map(|s| format!("`{}`", s))
        .collect();
    let supported_message = format!("Supported formats: {}", supported.join(", "));

    let format = ImageFormat::from_extension(s)
        .ok_or(format!("{} is not supported. {}", s, supported_message))?;
    if !format.writing_enabled() {
        return Err(format!("{} is not supported. {}", s, supported_message));
    }

    Ok(s.to_string())
}
