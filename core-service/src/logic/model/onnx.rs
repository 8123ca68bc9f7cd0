//! ONNX Runtime Engine
//!
//! Load và chạy ONNX model. The artifact is read once, checksummed, and its
//! declared inputs are matched against FEATURE_LAYOUT before any request is
//! served. Two input conventions are supported:
//!
//! - **packed**: a single float tensor `[1, 8]` in layout order
//! - **columns**: one `[1, 1]` tensor per feature, named after the trained
//!   columns, in layout order, with the column's numeric kind

use std::borrow::Cow;
use std::io::ErrorKind;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session, SessionInputValue};
use ort::tensor::TensorElementType;
use ort::value::{Tensor, ValueType};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use super::inference::{reduce_output, InferenceEngine, ModelError, ModelMetadata, RawOutput};
use crate::error::CoreError;
use crate::logic::features::{
    layout_hash, FeatureKind, FeatureRecord, FeatureValue, FEATURE_COUNT, FEATURE_LAYOUT,
};

// ============================================================================
// INPUT BINDING
// ============================================================================

/// Element type of a declared model input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Float32,
    Float64,
    Int32,
    Int64,
    Other,
}

impl ElementKind {
    fn from_ort(ty: TensorElementType) -> Self {
        match ty {
            TensorElementType::Float32 => ElementKind::Float32,
            TensorElementType::Float64 => ElementKind::Float64,
            TensorElementType::Int32 => ElementKind::Int32,
            TensorElementType::Int64 => ElementKind::Int64,
            _ => ElementKind::Other,
        }
    }

    fn is_float(self) -> bool {
        matches!(self, ElementKind::Float32 | ElementKind::Float64)
    }

    fn accepts(self, kind: FeatureKind) -> bool {
        match kind {
            FeatureKind::Float => self.is_float(),
            FeatureKind::Integer => matches!(self, ElementKind::Int32 | ElementKind::Int64),
        }
    }
}

/// A model input as declared by the artifact
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInput {
    pub name: String,
    /// None for non-tensor inputs (maps, sequences)
    pub element: Option<ElementKind>,
}

/// How a FeatureRecord is turned into session inputs
#[derive(Debug, Clone, PartialEq)]
pub enum InputBinding {
    Packed { input: String, element: ElementKind },
    /// (input name, element) per feature, in layout order
    Columns(Vec<(String, ElementKind)>),
}

impl InputBinding {
    fn label(&self) -> &'static str {
        match self {
            InputBinding::Packed { .. } => "packed",
            InputBinding::Columns(_) => "columns",
        }
    }
}

/// Match declared model inputs against FEATURE_LAYOUT
pub fn resolve_binding(inputs: &[ModelInput]) -> Result<InputBinding, String> {
    let is_column = |name: &str| FEATURE_LAYOUT.iter().any(|s| s.column == name);

    if let [only] = inputs {
        if !is_column(&only.name) {
            return match only.element {
                Some(element) if element.is_float() => Ok(InputBinding::Packed {
                    input: only.name.clone(),
                    element,
                }),
                other => Err(format!(
                    "packed input '{}' has element type {:?}; expected a float tensor of width {}",
                    only.name, other, FEATURE_COUNT
                )),
            };
        }
    }

    let missing: Vec<&str> = FEATURE_LAYOUT
        .iter()
        .map(|s| s.column)
        .filter(|c| !inputs.iter().any(|i| i.name == *c))
        .collect();
    if !missing.is_empty() {
        return Err(format!("model has no input for column(s) {}", missing.join(", ")));
    }

    let unexpected: Vec<&str> = inputs
        .iter()
        .map(|i| i.name.as_str())
        .filter(|n| !is_column(n))
        .collect();
    if !unexpected.is_empty() {
        return Err(format!("model expects unknown input(s) {}", unexpected.join(", ")));
    }

    if inputs.len() != FEATURE_COUNT {
        return Err(format!(
            "model declares {} inputs, the feature layout has {}",
            inputs.len(),
            FEATURE_COUNT
        ));
    }

    let mut columns = Vec::with_capacity(FEATURE_COUNT);
    for (position, (spec, input)) in FEATURE_LAYOUT.iter().zip(inputs).enumerate() {
        if input.name != spec.column {
            let declared: Vec<&str> = inputs.iter().map(|i| i.name.as_str()).collect();
            return Err(format!(
                "column order differs at position {}: model expects '{}', layout has '{}' (model order: {})",
                position,
                input.name,
                spec.column,
                declared.join(", ")
            ));
        }
        match input.element {
            Some(element) if element.accepts(spec.kind) => {
                columns.push((input.name.clone(), element));
            }
            other => {
                return Err(format!(
                    "column '{}' is declared {:?} by the model but the layout supplies {:?}",
                    spec.column, other, spec.kind
                ));
            }
        }
    }

    Ok(InputBinding::Columns(columns))
}

// ============================================================================
// ERROR CLASSIFICATION
// ============================================================================

/// Fragments of ONNX Runtime messages caused by a record the model can't take
const SCHEMA_ERROR_MARKERS: &[&str] = &[
    "invalid input name",
    "input name",
    "unexpected input data type",
    "data type",
    "invalid rank",
    "invalid dimensions",
    "missing input",
];

pub fn classify_run_error(message: &str) -> ModelError {
    let lower = message.to_lowercase();
    if SCHEMA_ERROR_MARKERS.iter().any(|m| lower.contains(m)) {
        ModelError::SchemaMismatch(message.to_string())
    } else {
        ModelError::Runtime(message.to_string())
    }
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// Typed data for one session input, before it becomes an ort tensor
#[derive(Debug, Clone, PartialEq)]
pub enum InputData {
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
}

impl InputData {
    pub fn element(&self) -> ElementKind {
        match self {
            InputData::Float32(_) => ElementKind::Float32,
            InputData::Float64(_) => ElementKind::Float64,
            InputData::Int32(_) => ElementKind::Int32,
            InputData::Int64(_) => ElementKind::Int64,
        }
    }
}

/// One named `[1, width]` input ready to be handed to the session
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedInput {
    pub name: String,
    pub width: usize,
    pub data: InputData,
}

/// Lay a record out as the binding expects, pinning each column's element type
pub fn plan_inputs(binding: &InputBinding, record: &FeatureRecord) -> Result<Vec<PlannedInput>, ModelError> {
    match binding {
        InputBinding::Packed { input, element } => {
            let data = match element {
                ElementKind::Float64 => InputData::Float64(record.to_f64_row().to_vec()),
                _ => InputData::Float32(record.to_f32_row().to_vec()),
            };
            Ok(vec![PlannedInput {
                name: input.clone(),
                width: FEATURE_COUNT,
                data,
            }])
        }
        InputBinding::Columns(columns) => columns
            .iter()
            .zip(record.columns())
            .map(|((name, element), (_, value))| {
                let data = match (element, value) {
                    (ElementKind::Float32, FeatureValue::Float(v)) => InputData::Float32(vec![v as f32]),
                    (ElementKind::Float64, FeatureValue::Float(v)) => InputData::Float64(vec![v]),
                    (ElementKind::Int32, FeatureValue::Integer(v)) => InputData::Int32(vec![v as i32]),
                    (ElementKind::Int64, FeatureValue::Integer(v)) => InputData::Int64(vec![v]),
                    (element, value) => {
                        return Err(ModelError::SchemaMismatch(format!(
                            "column '{}' expects {:?}, record holds {:?}",
                            name, element, value.kind()
                        )));
                    }
                };
                Ok(PlannedInput {
                    name: name.clone(),
                    width: 1,
                    data,
                })
            })
            .collect(),
    }
}

macro_rules! tensor_input {
    ($shape:expr, $data:expr) => {{
        let array = Array2::from_shape_vec($shape, $data)
            .map_err(|e| ModelError::Runtime(format!("Array error: {}", e)))?;
        let tensor = Tensor::from_array(array)
            .map_err(|e| ModelError::Runtime(format!("Tensor error: {}", e)))?;
        SessionInputValue::from(tensor)
    }};
}

type SessionInputs = Vec<(Cow<'static, str>, SessionInputValue<'static>)>;

fn session_inputs(planned: Vec<PlannedInput>) -> Result<SessionInputs, ModelError> {
    let mut inputs = Vec::with_capacity(planned.len());
    for PlannedInput { name, width, data } in planned {
        let value = match data {
            InputData::Float32(v) => tensor_input!((1, width), v),
            InputData::Float64(v) => tensor_input!((1, width), v),
            InputData::Int32(v) => tensor_input!((1, width), v),
            InputData::Int64(v) => tensor_input!((1, width), v),
        };
        inputs.push((Cow::Owned(name), value));
    }
    Ok(inputs)
}

/// ONNX Session (loaded model) plus its resolved input binding
pub struct OnnxModel {
    session: Mutex<Session>,
    binding: Result<InputBinding, String>,
    output_name: String,
    metadata: ModelMetadata,
}

impl OnnxModel {
    /// Load ONNX model từ file
    ///
    /// A missing or unreadable artifact is a startup error. A binding that
    /// does not match the layout is not: it is reported on every request.
    pub fn load(model_path: &str, intra_threads: usize) -> Result<Self, CoreError> {
        log::info!("Loading ONNX model from: {}", model_path);

        let startup = |reason: String| CoreError::Startup {
            path: model_path.to_string(),
            reason,
        };

        let bytes = std::fs::read(model_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => startup("model file not found".to_string()),
            _ => startup(format!("cannot read model file: {}", e)),
        })?;
        let checksum = hex::encode(Sha256::digest(&bytes));

        let session = Session::builder()
            .map_err(|e| startup(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| startup(format!("Failed to set optimization: {}", e)))?
            .with_intra_threads(intra_threads)
            .map_err(|e| startup(format!("Failed to set intra threads: {}", e)))?
            .commit_from_memory(&bytes)
            .map_err(|e| startup(format!("Failed to load model: {}", e)))?;

        let inputs: Vec<ModelInput> = session
            .inputs
            .iter()
            .map(|i| ModelInput {
                name: i.name.clone(),
                element: match &i.input_type {
                    ValueType::Tensor { ty, .. } => Some(ElementKind::from_ort(*ty)),
                    _ => None,
                },
            })
            .collect();

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| startup("model declares no outputs".to_string()))?;

        let binding = resolve_binding(&inputs);
        match &binding {
            Ok(b) => log::info!("ONNX model loaded ({} binding, sha256 {})", b.label(), &checksum[..12]),
            Err(detail) => log::warn!(
                "ONNX model loaded but its inputs do not match the feature layout: {}",
                detail
            ),
        }

        let metadata = ModelMetadata {
            model_path: model_path.to_string(),
            format: "onnx".to_string(),
            binding: binding.as_ref().map(|b| b.label()).unwrap_or("mismatched").to_string(),
            inputs: inputs.iter().map(|i| i.name.clone()).collect(),
            output: output_name.clone(),
            checksum: Some(checksum),
            layout_hash: format!("{:08x}", layout_hash()),
            loaded_at: chrono::Utc::now(),
        };

        Ok(Self {
            session: Mutex::new(session),
            binding,
            output_name,
            metadata,
        })
    }
}

impl InferenceEngine for OnnxModel {
    fn predict(&self, record: &FeatureRecord) -> Result<RawOutput, ModelError> {
        let binding = self
            .binding
            .as_ref()
            .map_err(|detail| ModelError::SchemaMismatch(detail.clone()))?;
        let inputs = session_inputs(plan_inputs(binding, record)?)?;

        let mut session = self.session.lock();
        let outputs = session
            .run(inputs)
            .map_err(|e| classify_run_error(&e.to_string()))?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| ModelError::MalformedOutput("No output".to_string()))?;

        let (shape, values): (Vec<i64>, Vec<f64>) =
            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                (shape.to_vec(), data.iter().map(|&v| f64::from(v)).collect())
            } else if let Ok((shape, data)) = output.try_extract_tensor::<f64>() {
                (shape.to_vec(), data.to_vec())
            } else if let Ok((shape, data)) = output.try_extract_tensor::<i64>() {
                (shape.to_vec(), data.iter().map(|&v| v as f64).collect())
            } else {
                return Ok(RawOutput::Text(format!("{:?}", output.dtype())));
            };

        reduce_output(&shape, values)
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}
