use std::path::PathBuf;

use ndarray::prelude::*;

use crate::errors::Result;
use crate::loader::load_images_from_folder;
use crate::traits::SegmentationModel;

/// モデル入力の一辺のピクセル数
pub const IMAGE_SIZE: usize = 128;

/// モデル入力のチャネル数（RGB）
pub const CHANNELS: usize = 3;

/// 推論入力の指定
///
/// 画素配列を直接渡すか、フォルダから読み込むかの二択
#[derive(Debug, Clone)]
pub enum SegmentationSource {
    /// [0,255] の画素値を持つ配列。形状は reshape 時に検証される
    Image(ArrayD<f32>),
    /// フォルダパス。見つかった画像全てを1つのバッチとして扱う
    Folder(PathBuf),
}

/// 入力を正規化バッチテンソルへ整形してモデルへ渡し、予測結果をそのまま返す
///
/// 画素値を 255 で割って [0,1] にスケールし、`[1, 128, 128, 3]` へ reshape する。
/// 画素数が `128*128*3` に一致しない入力は形状エラーとして呼び出し側へ伝播する。
/// フォルダ入力も単一バッチへ reshape されるため、画像が1枚でない場合は失敗する。
/// `_model_name` は記録用のラベルであり、制御にも出力にも影響しない。
pub fn generate_segmentation<M: SegmentationModel>(
    model: &M,
    source: &SegmentationSource,
    _model_name: &str,
) -> Result<Array4<f32>> {
    let pixels = match source {
        SegmentationSource::Image(array) => array.to_owned(),
        SegmentationSource::Folder(folder) => {
            let images = load_images_from_folder(folder)?;
            let views: Vec<_> = images.iter().map(|image| image.view()).collect();
            ndarray::stack(Axis(0), &views)?.into_dyn()
        }
    };

    let batch = (pixels / 255.0).into_shape_with_order((1, IMAGE_SIZE, IMAGE_SIZE, CHANNELS))?;

    model.predict(batch.view())
}
