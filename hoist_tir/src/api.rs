//! Entry points for lowering whole functions.

use crate::config::LowerConfig;
use crate::error::IrResult;
use crate::ir::PrimFunc;
use crate::transform::{PassPipeline, PassReport};

/// Lower a function with the pipeline described by `config`
pub fn lower(func: PrimFunc, config: &LowerConfig) -> IrResult<PrimFunc> {
    lower_with_report(func, config).map(|(func, _)| func)
}

/// Lower a function and report what each pass changed
pub fn lower_with_report(func: PrimFunc, config: &LowerConfig) -> IrResult<(PrimFunc, PassReport)> {
    config.validate()?;
    PassPipeline::from_config(config).run(func)
}

/// Lower a JSON-serialized function with the default configuration.
///
/// Returns the lowered function as JSON.
pub fn lower_json(json: &str) -> IrResult<String> {
    lower_json_with_config(json, &LowerConfig::default())
}

/// Lower a JSON-serialized function (Rust string API).
pub fn lower_json_with_config(json: &str, config: &LowerConfig) -> IrResult<String> {
    let func: PrimFunc = serde_json::from_str(json)?;
    let lowered = lower(func, config)?;
    Ok(serde_json::to_string(&lowered)?)
}
