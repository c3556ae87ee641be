use std::path::Path;

use ndarray::prelude::*;
use ort::value::TensorRef;
use ort::{
    execution_providers::{CUDAExecutionProvider, TensorRTExecutionProvider},
    session::{builder::SessionBuilder, Session},
};
use parking_lot::Mutex;

use crate::errors::{DoubleUnetError, Result};
use crate::traits::SegmentationModel;

pub struct Model {
    pub image_size: u32,
    input_name: String,
    output_name: String,
    session: Mutex<Session>,
}

impl Model {
    pub fn new(model_path: &Path, device_id: i32) -> Result<Self> {
        let mut session = SessionBuilder::new()
            .map_err(|e| DoubleUnetError::Model {
                operation: "セッションビルダー初期化".to_string(),
                source: Box::new(e),
            })?
            .with_execution_providers([
                TensorRTExecutionProvider::default()
                    .with_device_id(device_id)
                    .build(),
                CUDAExecutionProvider::default()
                    .with_device_id(device_id)
                    .build(),
            ])
            .map_err(|e| DoubleUnetError::Model {
                operation: "実行プロバイダー設定".to_string(),
                source: Box::new(e),
            })?
            .with_memory_pattern(true)
            .map_err(|e| DoubleUnetError::Model {
                operation: "メモリパターン設定".to_string(),
                source: Box::new(e),
            })?
            .commit_from_file(model_path)
            .map_err(|e| DoubleUnetError::Model {
                operation: format!("モデルファイル読み込み: {}", model_path.display()),
                source: Box::new(e),
            })?;

        // NHWC 入力: [batch, height, width, channels]
        let image_size =
            session.inputs[0]
                .input_type
                .tensor_shape()
                .ok_or_else(|| DoubleUnetError::Model {
                    operation: "モデル入力形状取得".to_string(),
                    source: Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "テンソル形状が取得できません",
                    )),
                })?[1] as u32;

        let input_name = session.inputs[0].name.clone();
        let output_name = session.outputs[0].name.clone();

        // initialize model
        let data = Array4::<f32>::zeros((1, image_size as usize, image_size as usize, 3));
        session.run(ort::inputs![input_name.as_str() => TensorRef::from_array_view(&data).map_err(|e| DoubleUnetError::Model {
            operation: "初期化テンソル作成".to_string(),
            source: Box::new(e),
        })?]).map_err(|e| DoubleUnetError::Model {
            operation: "モデル初期化実行".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            image_size,
            input_name,
            output_name,
            session: Mutex::new(session),
        })
    }
}

impl SegmentationModel for Model {
    fn predict(&self, batch: ArrayView4<f32>) -> Result<Array4<f32>> {
        let mut binding = self.session.lock();
        let outputs = binding.run(
            ort::inputs![self.input_name.as_str() => TensorRef::from_array_view(&batch.as_standard_layout())?],
        )?;
        Ok(outputs[self.output_name.as_str()]
            .try_extract_array::<f32>()?
            .into_dimensionality::<Ix4>()?
            .to_owned())
    }

    fn get_image_size(&self) -> u32 {
        self.image_size
    }
}
