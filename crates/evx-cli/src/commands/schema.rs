use evx_core::responses::RpcResponse;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `evx schema`.
pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = schemars::schema_for!(RpcResponse);
    output(&schema, flags.format)
}
