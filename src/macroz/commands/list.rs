use crate::commands::CmdResult;
use crate::error::Result;
use crate::index::index_macros;
use crate::store::MacroBackend;

use super::helpers;

pub fn run<B: MacroBackend>(backend: &B) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let store = helpers::load(backend, &mut result)?;
    Ok(result.with_listed_macros(index_macros(&store)))
}
