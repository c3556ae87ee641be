use crate::errors::Result;
use crate::traits::SegmentationModel;
use ndarray::prelude::*;

/// テスト用のモックセグメンテーションモデル
///
/// predict は入力テンソルをそのまま返すため、アダプタがモデルへ渡した
/// 正規化結果をテストからそのまま観測できる
#[derive(Debug, Clone)]
pub struct MockSegmentationModel {
    pub image_size: u32,
}

impl MockSegmentationModel {
    pub const fn new(image_size: u32) -> Self {
        Self { image_size }
    }
}

impl SegmentationModel for MockSegmentationModel {
    fn predict(&self, batch: ArrayView4<f32>) -> Result<Array4<f32>> {
        // 入力をそのまま返す
        Ok(batch.to_owned())
    }

    fn get_image_size(&self) -> u32 {
        self.image_size
    }
}

/// テスト用のファクトリー関数
pub const fn create_mock_model() -> MockSegmentationModel {
    MockSegmentationModel::new(128)
}
