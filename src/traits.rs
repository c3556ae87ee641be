use crate::errors::Result;
use ndarray::prelude::*;

/// セグメンテーションモデルの抽象化
///
/// 依存関係逆転原則（DIP）に従い、具象クラスではなく抽象に依存する
pub trait SegmentationModel: Send + Sync {
    /// 正規化済みバッチテンソル `[1, 128, 128, 3]` に対する予測
    ///
    /// 入力形状の検証はモデル側に委ねる
    fn predict(&self, batch: ArrayView4<f32>) -> Result<Array4<f32>>;

    /// モデルの入力画像サイズを取得
    fn get_image_size(&self) -> u32;
}
