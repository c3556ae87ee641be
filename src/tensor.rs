use image::{GrayImage, ImageBuffer, Pixel, Primitive, Rgb};
use ndarray::prelude::*;
use nshare::AsNdarray3;
use num_traits::AsPrimitive;

/// RGB画像を HWC 配列 `[height, width, 3]` へ変換する
///
/// 画素値はそのまま f32 に拡張する（[0,1] への正規化は推論アダプタ側の責務）
pub fn to_hwc_tensor<S>(image: &ImageBuffer<Rgb<S>, Vec<S>>) -> Array3<f32>
where
    Rgb<S>: Pixel<Subpixel = S>,
    S: AsPrimitive<f32> + Primitive + 'static,
{
    // nshare は CHW ビューを返すので HWC へ並べ替えてから実体化する
    image
        .as_ndarray3()
        .permuted_axes([1, 2, 0])
        .map(|v| (*v).as_())
}

/// クラス確率テンソル `[1, height, width, classes]` をマスク画像へ変換する
///
/// 多クラス出力は画素毎の argmax をとり、クラス番号を u8 の階調へ展開する。
/// 単一チャネル出力は確率値をそのまま階調にする。
pub fn class_mask_image(probs: ArrayView4<f32>) -> GrayImage {
    let (height, width, classes) = (probs.shape()[1], probs.shape()[2], probs.shape()[3]);

    let mut pixels = Vec::with_capacity(height * width);
    if classes == 1 {
        for value in probs.slice(s![0, .., .., 0]).iter() {
            pixels.push((value.clamp(0.0, 1.0) * 255.0).round() as u8);
        }
    } else {
        let scale = 255.0 / (classes - 1) as f32;
        for row in 0..height {
            for col in 0..width {
                let class_idx = probs
                    .slice(s![0, row, col, ..])
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                    .map_or(0, |(idx, _)| idx);
                pixels.push((class_idx as f32 * scale).round() as u8);
            }
        }
    }

    ImageBuffer::from_raw(width as u32, height as u32, pixels).unwrap()
}
